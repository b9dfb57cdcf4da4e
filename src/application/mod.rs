//! # Application Layer
//!
//! Contains the core logic of the bot: mention parsing, command routing, the
//! event stream, shutdown handling and the connection supervisor.

pub mod events;
pub mod logging;
pub mod parsing;
pub mod router;
pub mod sender;
pub mod shutdown;
pub mod supervisor;

#[cfg(test)]
pub mod testing;
