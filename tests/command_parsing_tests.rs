use dipmail_bot::bot::commands::Command;
use teloxide::utils::command::BotCommands;

#[cfg(test)]
mod command_parsing_tests {
    use super::*;

    #[test]
    fn test_help_command_parsing() {
        let result = Command::parse("/help", "dipmailbot");
        assert!(result.is_ok());
        assert!(matches!(result.unwrap(), Command::Help));
    }

    #[test]
    fn test_start_command_parsing() {
        let result = Command::parse("/start", "dipmailbot");
        assert!(result.is_ok());
        assert!(matches!(result.unwrap(), Command::Start));
    }

    #[test]
    fn test_slots_command_parsing() {
        let result = Command::parse("/slots", "dipmailbot");
        assert!(result.is_ok());
        assert!(matches!(result.unwrap(), Command::Slots));
    }

    #[test]
    fn test_status_command_parsing() {
        let result = Command::parse("/status", "dipmailbot");
        assert!(result.is_ok());
        assert!(matches!(result.unwrap(), Command::Status));
    }

    #[test]
    fn test_enroll_command_parsing() {
        let result = Command::parse("/enroll", "dipmailbot");
        assert!(result.is_ok());
        assert!(matches!(result.unwrap(), Command::Enroll));
    }

    #[test]
    fn test_withdraw_command_parsing() {
        let result = Command::parse("/withdraw", "dipmailbot");
        assert!(result.is_ok());
        assert!(matches!(result.unwrap(), Command::Withdraw));
    }

    #[test]
    fn test_setslots_command_parsing() {
        let result = Command::parse("/setslots 1=09:00-10:00,2=20:00-21:00", "dipmailbot");
        assert!(result.is_ok());
        match result.unwrap() {
            Command::SetSlots { spec } => assert_eq!(spec, "1=09:00-10:00,2=20:00-21:00"),
            other => panic!("expected SetSlots, got {other:?}"),
        }
    }

    #[test]
    fn test_forceclose_command_parsing() {
        let result = Command::parse("/forceclose", "dipmailbot");
        assert!(result.is_ok());
        assert!(matches!(result.unwrap(), Command::ForceClose));
    }

    #[test]
    fn test_unknown_command_rejected() {
        assert!(Command::parse("/doesnotexist", "dipmailbot").is_err());
    }
}
