//! # Miscellaneous Commands
//!
//! Static replies, the shutdown command and the diagnostic fault.

use crate::application::shutdown::{ShutdownController, ShutdownReason};
use crate::domain::error::DispatchFault;
use crate::strings::messages;

pub fn handle_reply(text: &str) -> String {
    text.to_string()
}

/// Flips the run flag; the supervisor stops at its next loop-top check.
pub fn handle_shutdown(shutdown: &ShutdownController) -> String {
    shutdown.request_shutdown(ShutdownReason::UserCommand);
    messages::EXITING.to_string()
}

pub fn handle_fault() -> DispatchFault {
    DispatchFault::Diagnostic(messages::DIAGNOSTIC_FAULT.to_string())
}
