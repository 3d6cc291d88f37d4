// Button labels
pub mod buttons {
    pub const CHANGE_WALLET: &str = "Change Wallet";
    pub const CONNECT_WALLET: &str = "Connect Wallet";
    pub const TOTAL_PROFIT: &str = "Get total profit";
    pub const CANCEL: &str = "Cancel";
    pub const PREVIOUS: &str = "Previous";
    pub const NEXT: &str = "Next";
}

// Bot messages (HTML parse mode)
pub mod messages {
    pub const WELCOME_TEXT: &str =
        "<b>Welcome to Solana Wallet Analyzer Bot!</b>\n\n<i>Connect your Wallet to continue</i>";
    pub const WALLET_HEADER: &str = "<b>Solana Wallet address:</b>";

    // Change wallet scene
    pub const PROMPT_WALLET_ADDRESS: &str = "<b>Send your Wallet address</b>";
    pub const ERR_ALREADY_CONNECTED: &str = "<b>This address is already connected. Try again</b>";
    pub const ERR_INVALID_WALLET: &str = "<b>Invalid wallet address. Try again</b>";

    // Total profit scene
    pub const PROMPT_FIRST_TOKEN: &str =
        "<b>Select the first token from the list or send its address:</b>";
    pub const PROMPT_SECOND_TOKEN: &str =
        "<b>Select the second token from the list or send its address:</b>";
    pub const ERR_INVALID_TOKEN: &str = "<b>Invalid token address. Try again</b>";
    pub const ERR_TOKEN_NOT_FOUND: &str = "<b>Token not found in this wallet. Try again</b>";
    pub const HEADER_SELECTED_TOKENS: &str = "<b>Selected Tokens:</b>";

    // Error report
    pub const ERR_REPORT_HEADER: &str = "<b>Unknown error occurred:</b>";
    pub const ERR_REPORT_FOOTER: &str = "<b>Send this message to Admin to fix the problem!</b>";
}

// Short notices, shown as callback answers or plain replies
pub mod notices {
    pub const CONNECT_WALLET_FIRST: &str = "Connect your wallet first";
    pub const NO_TOKENS: &str = "No available tokens";
    pub const BUTTON_EXPIRED: &str = "This button has expired";
    pub const REGISTRATION_FAILED: &str = "Error: ";
}
