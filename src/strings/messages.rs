//! # Messages
//!
//! Contains constant strings and format functions for user-facing messages.

pub const EXITING: &str = "Exiting...";
pub const DIAGNOSTIC_FAULT: &str = "what the hell happened???";

/// Sent when a command produced no response.
pub fn fallback(help_verb: &str) -> String {
    format!("Not sure what you mean. Try *{help_verb}*.")
}
