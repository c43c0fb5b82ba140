/// Telegram MarkdownV2 escaping.
///
/// MarkdownV2 treats a fixed set of punctuation as markup; anything that may
/// contain user or schedule data must be escaped before sending.

const SPECIALS: &[char] = &[
    '_', '*', '[', ']', '(', ')', '~', '`', '>', '#', '+', '-', '=', '|', '{', '}', '.', '!',
];

/// Escapes all MarkdownV2 special characters in `text`.
pub fn escape_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if SPECIALS.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escapes_specials() {
        assert_eq!(
            escape_markdown("slot 1 (09:00-10:00)"),
            "slot 1 \\(09:00\\-10:00\\)"
        );
        assert_eq!(escape_markdown("a_b*c"), "a\\_b\\*c");
    }

    #[test]
    fn test_plain_text_untouched() {
        assert_eq!(escape_markdown("diplomatic mail"), "diplomatic mail");
        assert_eq!(escape_markdown(""), "");
    }
}
