use teloxide::utils::command::BotCommands;

#[derive(BotCommands, Clone, Debug, PartialEq)]
#[command(rename_rule = "snake_case", description = "Solana Wallet Analyzer Commands:")]
pub enum Command {
    #[command(description = "Show the main menu")]
    Start,

    #[command(description = "Sum the profit over a range of your tokens")]
    TotalProfit,

    #[command(description = "Show help message")]
    Help,
}
