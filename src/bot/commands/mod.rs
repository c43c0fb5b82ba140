/// Admin-gated moderation commands
pub mod moderation;
/// Schedule display commands
pub mod slots;

use teloxide::utils::command::BotCommands;

#[derive(BotCommands, Clone, Debug)]
#[command(
    rename_rule = "lowercase",
    description = "Diplomatic Mail Bot commands:"
)]
pub enum Command {
    #[command(description = "Display this help message")]
    Help,
    #[command(description = "Start the bot")]
    Start,
    #[command(description = "Show the daily voting slot schedule")]
    Slots,
    #[command(description = "Show the open slot and the next transition")]
    Status,
    #[command(description = "Enroll this group into the mail exchange (admins only)")]
    Enroll,
    #[command(description = "Withdraw this group from the mail exchange (admins only)")]
    Withdraw,
    #[command(description = "Replace the slot schedule (admins only)")]
    SetSlots { spec: String },
    #[command(description = "Close the open voting slot early (admins only)")]
    ForceClose,
}
