//! # Order Telegram Bot
//!
//! A Telegram bot that takes orders in a three-step dialogue (name, items,
//! confirmation), stores confirmed orders in a JSON file and lets an
//! administrator review them.

pub mod bot;
pub mod config;
pub mod dialogue;
pub mod localization;
pub mod order_store;
pub mod validation;
