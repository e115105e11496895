//! Bot module for handling Telegram interactions
//!
//! This module is split into several submodules for better organization:
//! - `message_handler`: Handles pasted text, text documents and commands
//! - `callback_handler`: Handles inline keyboard callback queries
//! - `ui_builder`: Creates keyboards and formats card lists
//! - `session_manager`: Actions shared by commands and buttons (parse, restore, print, export)

pub mod callback_handler;
pub mod message_handler;
pub mod session_manager;
pub mod ui_builder;

// Re-export main handler functions for use in main.rs
pub use callback_handler::callback_handler;
pub use message_handler::message_handler;

// Re-export utility functions that might be used elsewhere
pub use session_manager::{process_order_text, restore_session};
pub use ui_builder::{create_cards_keyboard, format_cards_message, format_stats};
