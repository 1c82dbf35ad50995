//! Dialogue Manager module for applying dialogue state transitions

use anyhow::Result;
use teloxide::types::{ChatId, User, UserId};
use tracing::{debug, error, info};

// Import dialogue types
use crate::dialogue::{
    advance, DialogueEvent, DialogueReply, Next, OrderDialogue, OrderDialogueState, Step,
};

// Import order store types
use crate::order_store::{NewOrder, Order, OrderStore};

/// The Telegram user talking to the bot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    pub id: UserId,
    pub username: Option<String>,
    pub first_name: String,
    pub language_code: Option<String>,
}

impl Customer {
    pub fn from_user(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            first_name: user.first_name.clone(),
            language_code: user.language_code.clone(),
        }
    }
}

/// Result of handling one dialogue event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogueOutcome {
    pub reply: DialogueReply,
    /// Set when the event confirmed an order and it was saved
    pub saved_order: Option<Order>,
}

impl DialogueOutcome {
    fn reply(reply: DialogueReply) -> Self {
        Self {
            reply,
            saved_order: None,
        }
    }
}

/// Feed `event` to the customer's dialogue and apply the resulting step:
/// update or clear the stored state and persist confirmed orders.
///
/// When saving fails the customer stays in the confirmation step and the
/// reply becomes [`DialogueReply::SaveFailed`].
///
/// Dialogues are stored per chat, so only the private chat with the customer
/// (whose chat id equals the user id) may hold an order session. Events from
/// any other chat are answered with [`DialogueReply::PrivateChatOnly`] and
/// leave the stored state alone.
pub async fn drive_dialogue(
    dialogue: &OrderDialogue,
    store: &OrderStore,
    customer: &Customer,
    event: DialogueEvent<'_>,
) -> Result<DialogueOutcome> {
    if dialogue.chat_id() != ChatId::from(customer.id) {
        debug!(
            user_id = %customer.id,
            chat_id = %dialogue.chat_id(),
            "Ignoring dialogue event outside the private chat"
        );
        return Ok(DialogueOutcome::reply(DialogueReply::PrivateChatOnly));
    }

    let stored = dialogue.get().await?;
    let state = stored.clone().unwrap_or_default();

    let Step { reply, next } = advance(&state, event);
    debug!(
        user_id = %customer.id,
        state = ?state,
        event = ?event,
        reply = ?reply,
        "Dialogue step"
    );

    match next {
        Next::Stay => Ok(DialogueOutcome::reply(reply)),
        Next::Move(new_state) => {
            dialogue.update(new_state).await?;
            Ok(DialogueOutcome::reply(reply))
        }
        Next::Exit => {
            if stored.is_some() {
                dialogue.exit().await?;
            }
            info!(user_id = %customer.id, "Order dialogue ended without saving");
            Ok(DialogueOutcome::reply(reply))
        }
        Next::Submit { name, items } => {
            let new_order = NewOrder {
                user_id: customer.id.0,
                username: customer.username.clone(),
                name,
                items,
            };

            match store.append(new_order).await {
                Ok(order) => {
                    dialogue.exit().await?;
                    info!(user_id = %customer.id, items_count = order.items.len(), "Order confirmed");
                    Ok(DialogueOutcome {
                        reply,
                        saved_order: Some(order),
                    })
                }
                Err(e) => {
                    error!(user_id = %customer.id, error = %e, "Failed to save confirmed order");
                    Ok(DialogueOutcome::reply(DialogueReply::SaveFailed))
                }
            }
        }
    }
}

/// Record which message carries the review buttons so that buttons on older
/// review messages are treated as stale. Does nothing unless the dialogue is
/// waiting for confirmation.
pub async fn remember_review_message(dialogue: &OrderDialogue, message_id: i32) -> Result<()> {
    if let Some(OrderDialogueState::ConfirmOrder { name, items, .. }) = dialogue.get().await? {
        dialogue
            .update(OrderDialogueState::ConfirmOrder {
                name,
                items,
                review_message_id: Some(message_id),
            })
            .await?;
    }
    Ok(())
}
