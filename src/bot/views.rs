use teloxide::types::InlineKeyboardMarkup;
use teloxide::utils::command::BotCommands;
use teloxide::utils::html::escape;

use crate::services::Holding;
use crate::services::profit_service::{ format_signed, format_signed_usd, parse_decimal, RangeSummary };
use super::commands::Command;
use super::constants::messages as msg;
use super::keyboards;

/// Main message: linked wallet with the menu, or the connect prompt.
pub fn main_screen(wallet_address: Option<&str>) -> (String, InlineKeyboardMarkup) {
    match wallet_address {
        Some(address) =>
            (format!("{}\n<code>{}</code>", msg::WALLET_HEADER, escape(address)), keyboards::main_menu()),
        None => (msg::WELCOME_TEXT.to_string(), keyboards::login_menu()),
    }
}

fn profit_line(holding: &Holding) -> String {
    format!(
        "Total profit: <i>{}</i> | <i>{}%</i>",
        format_signed_usd(parse_decimal(&holding.total_profit)),
        format_signed(parse_decimal(&holding.total_profit_pnl) * 100.0)
    )
}

/// Text above the token keyboard: heading plus one block per visible token.
pub fn token_list_text(heading: &str, tokens: &[Holding], start_index: usize, page_size: usize) -> String {
    let mut text = format!("{}\n\n", heading);

    for (index, holding) in tokens.iter().enumerate().skip(start_index).take(page_size) {
        text.push_str(
            &format!(
                "<b>{}.</b> Name: <i>{}</i>\n  Symbol: <i>{}</i>\n  {}\n\n",
                index + 1,
                escape(&holding.token.name),
                escape(&holding.token.symbol),
                profit_line(holding)
            )
        );
    }

    text
}

fn bound_block(label: &str, position: usize, holding: &Holding) -> String {
    format!(
        "{} (#{}):\nName: <i>{}</i>\nSymbol: <i>{}</i>\n{}\n\n",
        label,
        position + 1,
        escape(&holding.token.name),
        escape(&holding.token.symbol),
        profit_line(holding)
    )
}

pub fn range_summary_text(summary: &RangeSummary) -> String {
    let mut text = format!("{}\n\n", msg::HEADER_SELECTED_TOKENS);
    text.push_str(&bound_block("From", summary.from, &summary.first));
    text.push_str(&bound_block("To", summary.to, &summary.last));
    text.push_str(
        &format!(
            "Tokens in range: <b>{}</b>\nTotal Profit: <b>{}</b> | <b>{}%</b>",
            summary.to - summary.from + 1,
            format_signed_usd(summary.total_profit),
            format_signed(summary.total_pnl_percent)
        )
    );
    text
}

pub fn error_report(message: &str) -> String {
    format!("{}\n<code>{}</code>\n\n{}", msg::ERR_REPORT_HEADER, escape(message), msg::ERR_REPORT_FOOTER)
}

pub fn help_text() -> String {
    escape(&Command::descriptions().to_string())
}
