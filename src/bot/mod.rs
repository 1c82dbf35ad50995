//! Bot module for handling Telegram interactions
//!
//! This module is split into several submodules for better organization:
//! - `commands`: The slash commands the bot understands
//! - `message_handler`: Handles incoming commands and text messages
//! - `callback_handler`: Handles the order review inline keyboard
//! - `ui_builder`: Creates keyboards and formats messages
//! - `dialogue_manager`: Applies dialogue state transitions and saves orders

pub mod callback_handler;
pub mod commands;
pub mod dialogue_manager;
pub mod message_handler;
pub mod ui_builder;

use teloxide::dispatching::dialogue::{self, InMemStorage};
use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;

use crate::dialogue::OrderDialogueState;

// Re-export main handler functions for use in main.rs
pub use callback_handler::callback_handler;
pub use commands::Command;
pub use message_handler::{command_handler, message_handler};

// Re-export utility functions that might be used elsewhere
pub use dialogue_manager::{drive_dialogue, remember_review_message, Customer, DialogueOutcome};
pub use ui_builder::{format_orders_listing, render_reply};

/// Build the update handler tree.
///
/// Messages and callback queries both enter the chat's order dialogue.
/// Known commands are dispatched before free text.
pub fn schema() -> UpdateHandler<anyhow::Error> {
    let messages = Update::filter_message()
        .branch(teloxide::filter_command::<Command, _>().endpoint(command_handler))
        .branch(dptree::endpoint(message_handler));

    let callback_queries = Update::filter_callback_query().endpoint(callback_handler);

    dialogue::enter::<Update, InMemStorage<OrderDialogueState>, OrderDialogueState, _>()
        .branch(messages)
        .branch(callback_queries)
}
