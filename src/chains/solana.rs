use solana_sdk::pubkey::Pubkey;

/// Whether `address` decodes as a base-58 Solana public key (32 bytes).
pub fn validate_address(address: &str) -> bool {
    address.parse::<Pubkey>().is_ok()
}

/// Shortened form used on buttons: first five and last five characters.
pub fn short_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= 10 {
        return address.to_string();
    }

    let head: String = chars[..5].iter().collect();
    let tail: String = chars[chars.len() - 5..].iter().collect();
    format!("{}...{}", head, tail)
}
