use teloxide::types::{ InlineKeyboardButton, InlineKeyboardMarkup };

use crate::chains::solana::short_address;
use crate::services::Holding;
use super::callbacks::CallbackAction;
use super::constants::buttons;

#[derive(Debug, Clone, PartialEq)]
pub struct TokenRow {
    pub index: usize,
    pub label: String,
    pub action: CallbackAction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Previous(u32),
    Cancel,
    Next(u32),
}

impl Control {
    pub fn label(&self) -> &'static str {
        match self {
            Control::Previous(_) => buttons::PREVIOUS,
            Control::Cancel => buttons::CANCEL,
            Control::Next(_) => buttons::NEXT,
        }
    }

    pub fn action(&self) -> CallbackAction {
        match self {
            Control::Previous(page) | Control::Next(page) => CallbackAction::Page(*page),
            Control::Cancel => CallbackAction::Cancel,
        }
    }
}

/// One screen of the selectable token list.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenPage {
    pub rows: Vec<TokenRow>,
    pub controls: Vec<Control>,
}

impl TokenPage {
    pub fn into_keyboard(self) -> InlineKeyboardMarkup {
        let mut keyboard: Vec<Vec<InlineKeyboardButton>> = self.rows
            .into_iter()
            .map(|row| vec![InlineKeyboardButton::callback(row.label, row.action.to_string())])
            .collect();

        keyboard.push(
            self.controls
                .iter()
                .map(|c| InlineKeyboardButton::callback(c.label(), c.action().to_string()))
                .collect()
        );

        InlineKeyboardMarkup::new(keyboard)
    }
}

/// Number of pages needed for `total` known tokens.
pub fn last_page(total: usize, page_size: usize) -> u32 {
    total.div_ceil(page_size.max(1)) as u32
}

/// Absolute index of the first token on a 1-based page.
pub fn page_start(page_number: u32, page_size: usize) -> usize {
    (page_number.max(1) as usize - 1) * page_size
}

/// Page a given absolute index falls on.
pub fn page_of(index: usize, page_size: usize) -> u32 {
    (index / page_size.max(1)) as u32 + 1
}

/// Builds rows for the tokens in `[start_index, start_index + page_size - 1]`
/// and the navigation controls.
///
/// `last_page` only counts tokens fetched so far; the caller is expected to
/// have pulled one upstream page ahead when the cursor is still live.
pub fn render_page(
    tokens: &[Holding],
    start_index: usize,
    page_number: u32,
    page_size: usize,
    first_selected: Option<usize>
) -> TokenPage {
    let end_index = start_index + page_size.max(1) - 1;
    let second = first_selected.is_some();

    let rows = tokens
        .iter()
        .enumerate()
        .skip(start_index)
        .take_while(|(index, _)| *index <= end_index)
        .map(|(index, holding)| TokenRow {
            index,
            label: format!(
                "{}. {} - {} - {}",
                index + 1,
                holding.token.symbol,
                holding.token.name,
                short_address(&holding.token.address)
            ),
            action: CallbackAction::Select { index, second },
        })
        .collect();

    let mut controls = Vec::new();
    if page_number > 1 {
        controls.push(Control::Previous(page_number - 1));
    }
    controls.push(Control::Cancel);
    if page_number < last_page(tokens.len(), page_size) {
        controls.push(Control::Next(page_number + 1));
    }

    TokenPage { rows, controls }
}
