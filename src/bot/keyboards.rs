use teloxide::types::{ InlineKeyboardButton, InlineKeyboardMarkup };

use super::callbacks::CallbackAction;
use super::constants::buttons;

fn button(label: &str, action: CallbackAction) -> InlineKeyboardButton {
    InlineKeyboardButton::callback(label, action.to_string())
}

// Main menu keyboard, shown once a wallet is linked
pub fn main_menu() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(
        vec![
            vec![button(buttons::CHANGE_WALLET, CallbackAction::ChangeWallet)],
            vec![button(buttons::TOTAL_PROFIT, CallbackAction::TotalProfit)]
        ]
    )
}

// First-contact keyboard
pub fn login_menu() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![button(buttons::CONNECT_WALLET, CallbackAction::ChangeWallet)]])
}

pub fn cancel() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![button(buttons::CANCEL, CallbackAction::Cancel)]])
}

#[cfg(test)]
mod tests {
    use super::*;
    use teloxide::types::InlineKeyboardButtonKind;

    fn callback_data(keyboard: &InlineKeyboardMarkup) -> Vec<String> {
        keyboard.inline_keyboard
            .iter()
            .flatten()
            .filter_map(|b| match &b.kind {
                InlineKeyboardButtonKind::CallbackData(data) => Some(data.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_menus_carry_typed_actions() {
        assert_eq!(callback_data(&main_menu()), vec!["change_wallet", "total_profit"]);
        assert_eq!(callback_data(&login_menu()), vec!["change_wallet"]);
        assert_eq!(callback_data(&cancel()), vec!["cancel"]);
    }
}
