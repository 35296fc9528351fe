//! Coachgate - API gateway for an English-coaching website
//!
//! This crate fronts the site's AI practice chat and its lead-capture form.
//! Chat requests are admitted per client through a fixed-window counter before
//! they reach the paid chat-completion API; form submissions are scrubbed and
//! forwarded to a spreadsheet webhook.

pub mod admission;
pub mod config;
pub mod error;
pub mod http;
pub mod upstream;
