//! Bot commands recognised in any dialogue state

use teloxide::utils::command::BotCommands;

#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "These commands are supported:")]
pub enum Command {
    #[command(description = "place a new order")]
    Start,
    #[command(description = "cancel the current order")]
    Cancel,
    #[command(description = "list all orders (administrator only)")]
    Orders,
    #[command(description = "show help")]
    Help,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_parsing() {
        assert!(matches!(Command::parse("/start", "order_bot"), Ok(Command::Start)));
        assert!(matches!(Command::parse("/cancel", "order_bot"), Ok(Command::Cancel)));
        assert!(matches!(Command::parse("/orders@order_bot", "order_bot"), Ok(Command::Orders)));
        assert!(matches!(Command::parse("/help", "order_bot"), Ok(Command::Help)));
        assert!(Command::parse("/unknown", "order_bot").is_err());
        assert!(Command::parse("Anna Ivanova", "order_bot").is_err());
    }
}
