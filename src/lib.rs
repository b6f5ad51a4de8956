//! acs-messages — send WhatsApp messages through Azure Communication Services.
//!
//! Parses an `endpoint=...;accesskey=...` connection string, configures one
//! HTTP client, and posts text, button, and list messages to `/messages`.
//! Non-2xx responses are returned to the caller, not raised as errors.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod credentials;
pub mod logging;
pub mod samples;
pub mod whatsapp;
