//! # Log Lines
//!
//! Operator-facing log messages, kept here so the wording stays stable.

pub const STARTING: &str = "Starting Rover...";
pub const INITIALIZED: &str = "Slackbot initialized!";
pub const FATAL: &str = "Something happened and Rover stopped.";
pub const SIGINT: &str = "SIGINT received from the os: program interrupted";
pub const SIGTERM: &str = "SIGTERM received from the os: program terminated";
pub const USER_EXIT: &str = "Connection terminated by user's exit command.";
pub const FAULT_ABSORBED: &str = "something happened";

pub fn could_not_connect(secs: u64) -> String {
    format!("Could not connect, will retry in {secs} seconds...")
}

pub fn connection_error(secs: u64) -> String {
    format!("Connection error, will retry in {secs} seconds")
}

pub fn user_command(command: &str) -> String {
    format!("User initiated command: {command}")
}

pub fn shutdown_fail(err: &str) -> String {
    format!("Unable to listen for shutdown signal: {err}")
}
