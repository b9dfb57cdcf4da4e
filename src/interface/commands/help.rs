//! # Help Command
//!
//! Handles the help verb.
//! Lists the visible command verbs to the user.

pub fn handle_help(verbs: &[&str]) -> String {
    crate::strings::help::listing(verbs)
}
