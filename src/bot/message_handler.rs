//! Message Handler module for processing incoming Telegram messages and commands

use anyhow::Result;
use std::sync::Arc;
use teloxide::prelude::*;
use tracing::{debug, info, warn};

// Import localization
use crate::localization::t_lang;

// Import configuration and storage
use crate::config::BotConfig;
use crate::order_store::OrderStore;

// Import dialogue types
use crate::dialogue::{DialogueEvent, DialogueReply, OrderDialogue};

// Import dialogue manager functions
use super::commands::Command;
use super::dialogue_manager::{drive_dialogue, remember_review_message, Customer};

// Import UI builder functions
use super::ui_builder::{format_orders_listing, render_reply};

/// Render a dialogue reply and send it to `chat_id`, returning the sent message
pub async fn send_reply(
    bot: &Bot,
    chat_id: ChatId,
    reply: &DialogueReply,
    language_code: Option<&str>,
) -> Result<Message> {
    let rendered = render_reply(reply, language_code);
    let request = bot.send_message(chat_id, rendered.text);

    let sent = match rendered.markup {
        Some(markup) => request.reply_markup(markup).await?,
        None => request.await?,
    };

    Ok(sent)
}

/// Handle `/start`, `/cancel`, `/orders` and `/help`
pub async fn command_handler(
    bot: Bot,
    msg: Message,
    cmd: Command,
    dialogue: OrderDialogue,
    store: Arc<OrderStore>,
    config: Arc<BotConfig>,
) -> Result<()> {
    let Some(user) = msg.from.as_ref() else {
        debug!(chat_id = %msg.chat.id, "Ignoring command without sender");
        return Ok(());
    };
    let customer = Customer::from_user(user);
    let language_code = customer.language_code.as_deref();

    debug!(user_id = %customer.id, command = ?cmd, "Received command from user");

    match cmd {
        Command::Start => {
            let event = DialogueEvent::Start {
                display_name: &customer.first_name,
            };
            let outcome = drive_dialogue(&dialogue, &store, &customer, event).await?;
            send_reply(&bot, msg.chat.id, &outcome.reply, language_code).await?;
        }
        Command::Cancel => {
            let outcome = drive_dialogue(&dialogue, &store, &customer, DialogueEvent::Cancel).await?;
            send_reply(&bot, msg.chat.id, &outcome.reply, language_code).await?;
        }
        Command::Orders => {
            handle_orders_command(&bot, &msg, &customer, &store, &config).await?;
        }
        Command::Help => {
            bot.send_message(msg.chat.id, t_lang("help", language_code))
                .await?;
        }
    }

    Ok(())
}

/// List every stored order, for the administrator only
async fn handle_orders_command(
    bot: &Bot,
    msg: &Message,
    customer: &Customer,
    store: &OrderStore,
    config: &BotConfig,
) -> Result<()> {
    let language_code = customer.language_code.as_deref();

    if !config.is_admin(customer.id) {
        warn!(user_id = %customer.id, "Orders listing refused for non-administrator");
        bot.send_message(msg.chat.id, t_lang("admin-only", language_code))
            .await?;
        return Ok(());
    }

    let orders = store.list_all().await;
    info!(user_id = %customer.id, orders_count = orders.len(), "Listing orders for administrator");

    if orders.is_empty() {
        bot.send_message(msg.chat.id, t_lang("orders-empty", language_code))
            .await?;
        return Ok(());
    }

    for page in format_orders_listing(&orders, language_code) {
        bot.send_message(msg.chat.id, page).await?;
    }

    Ok(())
}

async fn handle_text_message(
    bot: &Bot,
    msg: &Message,
    dialogue: OrderDialogue,
    store: &OrderStore,
    text: &str,
) -> Result<()> {
    let Some(user) = msg.from.as_ref() else {
        return Ok(());
    };
    let customer = Customer::from_user(user);
    let language_code = customer.language_code.as_deref();

    debug!(user_id = %customer.id, message_length = text.len(), "Received text message from user");

    // Group chatter is not addressed to the bot
    if !msg.chat.is_private() {
        debug!(chat_id = %msg.chat.id, "Ignoring text outside a private chat");
        return Ok(());
    }

    // Commands we do not know never reach the dialogue
    if text.starts_with('/') {
        bot.send_message(msg.chat.id, t_lang("unknown-command", language_code))
            .await?;
        return Ok(());
    }

    let outcome = drive_dialogue(&dialogue, store, &customer, DialogueEvent::Text(text)).await?;
    let sent = send_reply(bot, msg.chat.id, &outcome.reply, language_code).await?;

    if let DialogueReply::Review { .. } = outcome.reply {
        remember_review_message(&dialogue, sent.id.0).await?;
    }

    Ok(())
}

async fn handle_unsupported_message(bot: &Bot, msg: &Message) -> Result<()> {
    // Extract user's language code from Telegram
    let language_code = msg
        .from
        .as_ref()
        .and_then(|user| user.language_code.as_ref())
        .map(|s| s.as_str());

    debug!(chat_id = %msg.chat.id, "Received unsupported message type from user");

    bot.send_message(msg.chat.id, t_lang("unsupported-message", language_code))
        .await?;
    Ok(())
}

/// Handle every message that is not a known command
pub async fn message_handler(
    bot: Bot,
    msg: Message,
    dialogue: OrderDialogue,
    store: Arc<OrderStore>,
) -> Result<()> {
    match msg.text() {
        Some(text) => handle_text_message(&bot, &msg, dialogue, &store, text).await?,
        None => handle_unsupported_message(&bot, &msg).await?,
    }

    Ok(())
}
