//! Order dialogue module: the conversation state machine.
//!
//! Each chat holds one [`OrderDialogueState`] in teloxide's dialogue
//! storage. [`advance`] is the single dispatch function: given the current
//! state and an incoming event it decides what to tell the user and where
//! the conversation goes next. It performs no I/O; the bot layer applies the
//! returned [`Step`].

use serde::{Deserialize, Serialize};
use teloxide::dispatching::dialogue::{Dialogue, InMemStorage};

use crate::validation::{parse_items, validate_name, ItemsError};

/// Represents the conversation state of one customer
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderDialogueState {
    /// No order in progress
    #[default]
    Idle,
    ReceiveName,
    ReceiveItems {
        name: String,
    },
    ConfirmOrder {
        name: String,
        items: Vec<String>,
        /// The message carrying the review buttons, once it has been sent.
        /// Buttons pressed on any other message are stale.
        #[serde(default)]
        review_message_id: Option<i32>,
    },
}

/// Type alias for our order dialogue
pub type OrderDialogue = Dialogue<OrderDialogueState, InMemStorage<OrderDialogueState>>;

/// Something the customer did
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DialogueEvent<'a> {
    /// `/start`, carrying the display name used in the greeting
    Start { display_name: &'a str },
    /// Free text that is not a command
    Text(&'a str),
    /// The "confirm" button on the review message with the given id
    Confirm { message_id: Option<i32> },
    /// The "edit" button on the review message with the given id
    Edit { message_id: Option<i32> },
    /// `/cancel`
    Cancel,
}

/// What to tell the customer after an event
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DialogueReply {
    Greeting { display_name: String },
    InvalidName,
    AskItems { name: String },
    InvalidItem { preview: String, truncated: bool },
    NoItems,
    TooManyItems,
    Review { name: String, items: Vec<String> },
    OrderSaved,
    SaveFailed,
    EditItems,
    Cancelled,
    NothingToCancel,
    NoActiveOrder,
    UseButtons,
    StaleAction,
    /// Orders are only taken in a private chat with the bot
    PrivateChatOnly,
}

/// Where the conversation goes after an event
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Next {
    /// Keep the current state untouched
    Stay,
    /// Move to a new state
    Move(OrderDialogueState),
    /// Persist the order, then end the conversation
    Submit { name: String, items: Vec<String> },
    /// End the conversation without saving anything
    Exit,
}

/// Outcome of feeding one event to the state machine
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Step {
    pub reply: DialogueReply,
    pub next: Next,
}

impl Step {
    fn new(reply: DialogueReply, next: Next) -> Self {
        Self { reply, next }
    }
}

/// Decide the reply and the next state for `event` in `state`
pub fn advance(state: &OrderDialogueState, event: DialogueEvent<'_>) -> Step {
    use DialogueEvent as E;
    use OrderDialogueState as S;

    match (state, event) {
        // Starting over is allowed at any point
        (_, E::Start { display_name }) => Step::new(
            DialogueReply::Greeting {
                display_name: display_name.to_string(),
            },
            Next::Move(S::ReceiveName),
        ),

        (S::Idle, E::Cancel) => Step::new(DialogueReply::NothingToCancel, Next::Stay),
        (_, E::Cancel) => Step::new(DialogueReply::Cancelled, Next::Exit),

        (S::Idle, E::Text(_)) => Step::new(DialogueReply::NoActiveOrder, Next::Stay),

        (S::ReceiveName, E::Text(text)) => match validate_name(text) {
            Ok(name) => Step::new(
                DialogueReply::AskItems { name: name.clone() },
                Next::Move(S::ReceiveItems { name }),
            ),
            Err(_) => Step::new(DialogueReply::InvalidName, Next::Stay),
        },

        (S::ReceiveItems { name }, E::Text(text)) => match parse_items(text) {
            Ok(items) => Step::new(
                DialogueReply::Review {
                    name: name.clone(),
                    items: items.clone(),
                },
                Next::Move(S::ConfirmOrder {
                    name: name.clone(),
                    items,
                    review_message_id: None,
                }),
            ),
            Err(ItemsError::InvalidItem { preview, truncated }) => Step::new(
                DialogueReply::InvalidItem { preview, truncated },
                Next::Stay,
            ),
            Err(ItemsError::Empty) => Step::new(DialogueReply::NoItems, Next::Stay),
            Err(ItemsError::TooMany { .. }) => Step::new(DialogueReply::TooManyItems, Next::Stay),
        },

        (S::ConfirmOrder { .. }, E::Text(_)) => Step::new(DialogueReply::UseButtons, Next::Stay),

        (
            S::ConfirmOrder {
                name,
                items,
                review_message_id,
            },
            E::Confirm { message_id },
        ) if is_current_review(*review_message_id, message_id) => Step::new(
            DialogueReply::OrderSaved,
            Next::Submit {
                name: name.clone(),
                items: items.clone(),
            },
        ),

        // Items are dropped, the name is kept
        (
            S::ConfirmOrder {
                name,
                review_message_id,
                ..
            },
            E::Edit { message_id },
        ) if is_current_review(*review_message_id, message_id) => Step::new(
            DialogueReply::EditItems,
            Next::Move(S::ReceiveItems { name: name.clone() }),
        ),

        (_, E::Confirm { .. } | E::Edit { .. }) => Step::new(DialogueReply::StaleAction, Next::Stay),
    }
}

// Until the review message id is recorded any button of the session counts
fn is_current_review(expected: Option<i32>, pressed: Option<i32>) -> bool {
    expected.is_none() || expected == pressed
}
