//! Email function outbound adapters.
//!
//! This module provides a thin HTTP implementation of the
//! `NotificationSender` port over the remote email functions.

mod dto;
mod http_sender;

pub use http_sender::EmailFunctionsSender;
