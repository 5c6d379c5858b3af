// src/lib.rs

//! Quest Notifier Library
//!
//! Polls community questboards, diffs the quests against the last snapshot,
//! and announces new ones on Telegram.

pub mod error;
#[cfg(feature = "health")]
pub mod health;
pub mod models;
pub mod notify;
pub mod pipeline;
pub mod scheduler;
pub mod services;
pub mod storage;
pub mod utils;
