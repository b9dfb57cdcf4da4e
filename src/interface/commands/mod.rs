//! # Command Handlers
//!
//! Contains specific handler functions for each supported command (help, static
//! replies, image lookup, shutdown, diagnostic fault).
//! These handlers are invoked by the Router.

pub mod help;
pub mod image;
pub mod misc;
