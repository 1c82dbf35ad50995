//! Callback Handler module for processing the order review buttons

use anyhow::Result;
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::types::CallbackQuery;
use tracing::{debug, error, info, warn};

// Import localization
use crate::localization::t_lang;

// Import configuration and storage
use crate::config::BotConfig;
use crate::order_store::{Order, OrderStore};

// Import dialogue types
use crate::dialogue::{DialogueEvent, DialogueReply, OrderDialogue};

use super::dialogue_manager::{drive_dialogue, Customer};
use super::message_handler::send_reply;
use super::ui_builder::{format_admin_notification, CONFIRM_CALLBACK, EDIT_CALLBACK};

/// Handle callback queries from the review keyboard
pub async fn callback_handler(
    bot: Bot,
    q: CallbackQuery,
    dialogue: OrderDialogue,
    store: Arc<OrderStore>,
    config: Arc<BotConfig>,
) -> Result<()> {
    debug!(user_id = %q.from.id, data = ?q.data, "Received callback query from user");

    let customer = Customer::from_user(&q.from);
    let language_code = customer.language_code.as_deref();

    // The review message the pressed button belongs to
    let message_id = q.message.as_ref().map(|msg| msg.id().0);

    let event = match q.data.as_deref() {
        Some(CONFIRM_CALLBACK) => DialogueEvent::Confirm { message_id },
        Some(EDIT_CALLBACK) => DialogueEvent::Edit { message_id },
        _ => {
            debug!(user_id = %q.from.id, "Ignoring unknown callback data");
            bot.answer_callback_query(q.id).await?;
            return Ok(());
        }
    };

    let outcome = drive_dialogue(&dialogue, &store, &customer, event).await?;

    let notice = match &outcome.reply {
        DialogueReply::StaleAction => Some("stale-action"),
        DialogueReply::PrivateChatOnly => Some("private-chat-only"),
        _ => None,
    };
    if let Some(key) = notice {
        bot.answer_callback_query(q.id)
            .text(t_lang(key, language_code))
            .await?;
        return Ok(());
    }

    // Answer the callback query to remove the loading state
    bot.answer_callback_query(q.id.clone()).await?;

    let chat_id = match &q.message {
        Some(msg) => {
            // The review buttons are spent once the order is saved or reopened
            if outcome.reply != DialogueReply::SaveFailed {
                if let Err(e) = bot.edit_message_reply_markup(msg.chat().id, msg.id()).await {
                    warn!(user_id = %q.from.id, error = %e, "Failed to remove review buttons");
                }
            }
            msg.chat().id
        }
        None => ChatId::from(customer.id),
    };

    send_reply(&bot, chat_id, &outcome.reply, language_code).await?;

    if let Some(order) = &outcome.saved_order {
        notify_admin(&bot, &config, order).await;
    }

    Ok(())
}

/// Tell the configured administrator about a new order. Failures are logged
/// and never reach the customer.
pub async fn notify_admin(bot: &Bot, config: &BotConfig, order: &Order) {
    let Some(admin_id) = config.admin_id else {
        return;
    };

    let text = format_admin_notification(order, None);
    match bot.send_message(ChatId::from(admin_id), text).await {
        Ok(_) => info!(admin_id = %admin_id, user_id = order.user_id, "Administrator notified of new order"),
        Err(e) => error!(admin_id = %admin_id, error = %e, "Failed to notify administrator"),
    }
}
