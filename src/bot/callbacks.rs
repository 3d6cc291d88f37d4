use std::fmt;
use std::str::FromStr;

use thiserror::Error;

const PAGE_PREFIX: &str = "get_total_profit_";
const PICK_PREFIX: &str = "pick";

/// Payload carried by every inline button the bot sends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackAction {
    ChangeWallet,
    Cancel,
    TotalProfit,
    /// Show the given 1-based page of the token list.
    Page(u32),
    /// A token row was pressed; `second` marks the closing bound of the range.
    Select {
        index: usize,
        second: bool,
    },
}

#[derive(Debug, Error, PartialEq)]
#[error("Unknown callback data: {0}")]
pub struct UnknownCallback(pub String);

impl fmt::Display for CallbackAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallbackAction::ChangeWallet => write!(f, "change_wallet"),
            CallbackAction::Cancel => write!(f, "cancel"),
            CallbackAction::TotalProfit => write!(f, "total_profit"),
            CallbackAction::Page(page) => write!(f, "{}{}", PAGE_PREFIX, page),
            CallbackAction::Select { index, second } => {
                let bound = if *second { "second" } else { "first" };
                write!(f, "{}:{}:{}", PICK_PREFIX, bound, index)
            }
        }
    }
}

impl FromStr for CallbackAction {
    type Err = UnknownCallback;

    fn from_str(data: &str) -> Result<Self, Self::Err> {
        let unknown = || UnknownCallback(data.to_string());

        match data {
            "change_wallet" => return Ok(CallbackAction::ChangeWallet),
            "cancel" => return Ok(CallbackAction::Cancel),
            "total_profit" => return Ok(CallbackAction::TotalProfit),
            _ => {}
        }

        if let Some(page) = data.strip_prefix(PAGE_PREFIX) {
            return match page.parse::<u32>() {
                Ok(page) if page >= 1 => Ok(CallbackAction::Page(page)),
                _ => Err(unknown()),
            };
        }

        let parts: Vec<&str> = data.split(':').collect();
        match parts.as_slice() {
            [PICK_PREFIX, bound, index] => {
                let second = match *bound {
                    "first" => false,
                    "second" => true,
                    _ => {
                        return Err(unknown());
                    }
                };
                let index = index.parse::<usize>().map_err(|_| unknown())?;
                Ok(CallbackAction::Select { index, second })
            }
            _ => Err(unknown()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fixed_actions() {
        assert_eq!("change_wallet".parse(), Ok(CallbackAction::ChangeWallet));
        assert_eq!("cancel".parse(), Ok(CallbackAction::Cancel));
        assert_eq!("total_profit".parse(), Ok(CallbackAction::TotalProfit));
    }

    #[test]
    fn test_page_payload() {
        assert_eq!(CallbackAction::Page(3).to_string(), "get_total_profit_3");
        assert_eq!("get_total_profit_12".parse(), Ok(CallbackAction::Page(12)));
        assert!("get_total_profit_0".parse::<CallbackAction>().is_err());
        assert!("get_total_profit_x".parse::<CallbackAction>().is_err());
    }

    #[test]
    fn test_select_payload() {
        let action = CallbackAction::Select { index: 42, second: true };
        assert_eq!(action.to_string(), "pick:second:42");
        assert_eq!(action.to_string().parse(), Ok(action));

        assert_eq!(
            "pick:first:0".parse(),
            Ok(CallbackAction::Select { index: 0, second: false })
        );
    }

    #[test]
    fn test_malformed_select_rejected() {
        assert!("pick:third:1".parse::<CallbackAction>().is_err());
        assert!("pick:first:-1".parse::<CallbackAction>().is_err());
        assert!("pick:first".parse::<CallbackAction>().is_err());
        assert!("get_total_profit_1_15".parse::<CallbackAction>().is_err());
        assert!("".parse::<CallbackAction>().is_err());
    }
}
