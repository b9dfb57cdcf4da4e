//! # Help Text
//!
//! Built from the visible command verbs, displayed via the help command.

pub const HEADER: &str = "Try these commands: ";
pub const SEPARATOR: &str = " / ";

pub fn listing(verbs: &[&str]) -> String {
    format!("{HEADER}{}", verbs.join(SEPARATOR))
}
