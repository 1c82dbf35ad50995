//! UI Builder module for creating keyboards and formatting messages

use teloxide::types::{
    InlineKeyboardButton, InlineKeyboardMarkup, KeyboardButton, KeyboardMarkup, KeyboardRemove,
    ReplyMarkup,
};

// Import localization
use crate::localization::{t_args_lang, t_lang};

// Import dialogue and order types
use crate::dialogue::DialogueReply;
use crate::order_store::Order;
use crate::validation::MAX_ITEMS;

/// Callback data of the "confirm" button
pub const CONFIRM_CALLBACK: &str = "confirm";
/// Callback data of the "edit" button
pub const EDIT_CALLBACK: &str = "edit";
/// Telegram's limit on the length of a text message, in characters
pub const MAX_MESSAGE_CHARS: usize = 4096;

const ELLIPSIS: char = '…';

/// Cut `text` to at most `max_chars` characters, ending it with an ellipsis
/// when anything was dropped
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }

    let mut truncated: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    if max_chars > 0 {
        truncated.push(ELLIPSIS);
    }
    truncated
}

/// A dialogue reply ready to be sent
#[derive(Debug, Clone)]
pub struct RenderedReply {
    pub text: String,
    pub markup: Option<ReplyMarkup>,
}

/// Format items as a bulleted list, one per line
pub fn format_item_bullets(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("• {item}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// `@username`, or a placeholder for users without one
pub fn format_username(username: Option<&str>, language_code: Option<&str>) -> String {
    match username {
        Some(username) => format!("@{username}"),
        None => t_lang("username-missing", language_code),
    }
}

/// Reply keyboard with a single `/cancel` button
pub fn create_cancel_keyboard() -> KeyboardMarkup {
    KeyboardMarkup::new(vec![vec![KeyboardButton::new("/cancel")]]).resize_keyboard()
}

/// Cancel keyboard with an example order as input placeholder
pub fn create_items_keyboard(language_code: Option<&str>) -> KeyboardMarkup {
    create_cancel_keyboard().input_field_placeholder(t_lang("items-placeholder", language_code))
}

/// Create inline keyboard for order review
pub fn create_review_keyboard(language_code: Option<&str>) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![
        InlineKeyboardButton::callback(t_lang("review-confirm", language_code), CONFIRM_CALLBACK),
        InlineKeyboardButton::callback(t_lang("review-edit", language_code), EDIT_CALLBACK),
    ]])
}

/// Turn a dialogue reply into localized text plus the keyboard to show with it
pub fn render_reply(reply: &DialogueReply, language_code: Option<&str>) -> RenderedReply {
    let cancel = || Some(ReplyMarkup::Keyboard(create_cancel_keyboard()));
    let items = || Some(ReplyMarkup::Keyboard(create_items_keyboard(language_code)));
    let remove = || Some(ReplyMarkup::KeyboardRemove(KeyboardRemove::new()));

    let (text, markup) = match reply {
        DialogueReply::Greeting { display_name } => (
            t_args_lang("greeting", &[("first_name", display_name.as_str())], language_code),
            cancel(),
        ),
        DialogueReply::InvalidName => (t_lang("name-invalid", language_code), cancel()),
        DialogueReply::AskItems { name } => (
            t_args_lang("items-prompt", &[("name", name.as_str())], language_code),
            items(),
        ),
        DialogueReply::InvalidItem { preview, truncated } => {
            let item = if *truncated {
                format!("{preview}...")
            } else {
                preview.clone()
            };
            (
                t_args_lang("item-invalid", &[("item", item.as_str())], language_code),
                items(),
            )
        }
        DialogueReply::NoItems => (t_lang("items-empty", language_code), items()),
        DialogueReply::TooManyItems => {
            let max = MAX_ITEMS.to_string();
            (
                t_args_lang("items-too-many", &[("max", max.as_str())], language_code),
                items(),
            )
        }
        DialogueReply::Review { name, items } => (
            t_args_lang(
                "review",
                &[
                    ("name", name.as_str()),
                    ("items", format_item_bullets(items).as_str()),
                ],
                language_code,
            ),
            Some(ReplyMarkup::InlineKeyboard(create_review_keyboard(
                language_code,
            ))),
        ),
        DialogueReply::OrderSaved => (t_lang("order-saved", language_code), remove()),
        DialogueReply::SaveFailed => (t_lang("order-save-failed", language_code), None),
        DialogueReply::EditItems => (t_lang("edit-items", language_code), items()),
        DialogueReply::Cancelled => (t_lang("cancelled", language_code), remove()),
        DialogueReply::NothingToCancel => (t_lang("nothing-to-cancel", language_code), remove()),
        DialogueReply::NoActiveOrder => (t_lang("no-active-session", language_code), None),
        DialogueReply::UseButtons => (t_lang("use-buttons", language_code), None),
        DialogueReply::StaleAction => (t_lang("stale-action", language_code), None),
        DialogueReply::PrivateChatOnly => (t_lang("private-chat-only", language_code), None),
    };

    RenderedReply {
        text: truncate_chars(&text, MAX_MESSAGE_CHARS),
        markup,
    }
}

/// Message sent to the administrator when an order is saved, cut to fit a
/// single Telegram message
pub fn format_admin_notification(order: &Order, language_code: Option<&str>) -> String {
    let username = format_username(order.username.as_deref(), language_code);
    let items = format_item_bullets(&order.items);

    let text = t_args_lang(
        "admin-new-order",
        &[
            ("name", order.name.as_str()),
            ("username", username.as_str()),
            ("items", items.as_str()),
        ],
        language_code,
    );
    truncate_chars(&text, MAX_MESSAGE_CHARS)
}

/// Format one stored order for the administrator listing; `index` is 1-based
pub fn format_order_entry(index: usize, order: &Order, language_code: Option<&str>) -> String {
    let index = index.to_string();
    let username = format_username(order.username.as_deref(), language_code);
    let items = order.items.join(", ");
    let date = order.display_timestamp();

    t_args_lang(
        "orders-entry",
        &[
            ("index", index.as_str()),
            ("name", order.name.as_str()),
            ("username", username.as_str()),
            ("items", items.as_str()),
            ("date", date.as_str()),
        ],
        language_code,
    )
}

/// Format every order for the administrator, split into as many messages
/// as needed to stay under Telegram's message length limit
pub fn format_orders_listing(orders: &[Order], language_code: Option<&str>) -> Vec<String> {
    let entries: Vec<String> = orders
        .iter()
        .enumerate()
        .map(|(i, order)| format_order_entry(i + 1, order, language_code))
        .collect();

    paginate(
        &t_lang("orders-title", language_code),
        &entries,
        MAX_MESSAGE_CHARS,
    )
}

/// Join `entries` under `header` with blank lines, starting a new message
/// whenever the next entry would exceed `limit` characters. Entries are
/// never split across messages; an entry too long to share the first page
/// with the header is truncated.
pub fn paginate(header: &str, entries: &[String], limit: usize) -> Vec<String> {
    const SEPARATOR: &str = "\n\n";

    let mut pages = Vec::new();
    let mut current = header.to_string();
    let mut current_len = current.chars().count();
    let max_entry_chars = limit.saturating_sub(current_len + SEPARATOR.len());

    for entry in entries {
        let entry = truncate_chars(entry, max_entry_chars);
        let entry_len = entry.chars().count();
        let needed = SEPARATOR.len() + entry_len;

        if current_len + needed > limit && !current.is_empty() && current != header {
            pages.push(std::mem::take(&mut current));
            current_len = 0;
        }

        if !current.is_empty() {
            current.push_str(SEPARATOR);
            current_len += SEPARATOR.len();
        }
        current.push_str(&entry);
        current_len += entry_len;
    }

    if !current.is_empty() {
        pages.push(current);
    }

    pages
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_item_bullets() {
        let items = vec!["Milk".to_string(), "Bread".to_string()];
        assert_eq!(format_item_bullets(&items), "• Milk\n• Bread");
        assert_eq!(format_item_bullets(&[]), "");
    }

    #[test]
    fn test_paginate_single_page() {
        let entries = vec!["a".to_string(), "b".to_string()];
        let pages = paginate("Title", &entries, 100);
        assert_eq!(pages, vec!["Title\n\na\n\nb".to_string()]);
    }

    #[test]
    fn test_paginate_splits_between_entries() {
        let entries = vec!["x".repeat(40), "y".repeat(40), "z".repeat(40)];
        let pages = paginate("Title", &entries, 100);

        assert_eq!(pages.len(), 2);
        assert!(pages[0].starts_with("Title\n\n"));
        assert!(pages[0].contains(&"x".repeat(40)));
        assert!(pages[0].contains(&"y".repeat(40)));
        assert_eq!(pages[1], "z".repeat(40));
        assert!(pages.iter().all(|page| page.chars().count() <= 100));
    }

    #[test]
    fn test_paginate_truncates_oversized_entry() {
        let entries = vec!["x".repeat(150), "y".repeat(150)];
        let pages = paginate("Title", &entries, 100);

        assert_eq!(pages.len(), 2);
        assert!(pages[0].starts_with("Title\n\nxxx"));
        assert!(pages[0].ends_with('…'));
        assert!(pages[1].starts_with("yyy"));
        assert!(pages.iter().all(|page| page.chars().count() <= 100));
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("Milk", 4), "Milk");
        assert_eq!(truncate_chars("Молоко", 4), "Мол…");
        assert_eq!(truncate_chars("Milk", 0), "");
    }

    #[test]
    fn test_review_keyboard_callbacks() {
        let keyboard = create_review_keyboard(Some("en"));
        assert_eq!(keyboard.inline_keyboard.len(), 1);
        assert_eq!(keyboard.inline_keyboard[0].len(), 2);
    }
}
