//! Core business logic module

pub mod channel;
pub mod error;
pub mod executor;
pub mod notifier;
pub mod service;
pub mod types;
