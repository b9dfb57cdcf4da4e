//! # Mention Parsing
//!
//! Splits a direct mention (a mention at the very beginning of a message) from the
//! rest of the text. A message without one is a normal outcome, not an error.

use regex::Regex;
use std::sync::LazyLock;

use crate::domain::types::ParsedMention;

/// An alphanumeric identifier, optionally prefixed with `U` (user) or `W` (workspace
/// bot). The identifier may be empty (`<@>`), in which case it can never equal a
/// resolved identity.
static MENTION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^<@([WU]?[A-Za-z0-9]+|)>(.*)").expect("mention regex is valid")
});

pub fn parse_direct_mention(text: &str) -> Option<ParsedMention> {
    let caps = MENTION_REGEX.captures(text)?;
    let identity = caps.get(1)?.as_str();
    let remainder = caps.get(2).map_or("", |m| m.as_str());
    Some(ParsedMention {
        addressed_identity: identity.to_string(),
        remainder: remainder.trim().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leading_mention_is_split() {
        let parsed = parse_direct_mention("<@UBOT123> beets?").unwrap();
        assert_eq!(parsed.addressed_identity, "UBOT123");
        assert_eq!(parsed.remainder, "beets?");
    }

    #[test]
    fn test_unprefixed_identity_is_split() {
        let parsed = parse_direct_mention("<@BOT123> beets?").unwrap();
        assert_eq!(parsed.addressed_identity, "BOT123");
        assert_eq!(parsed.remainder, "beets?");
    }

    #[test]
    fn test_remainder_is_trimmed() {
        let parsed = parse_direct_mention("<@W42>   secret logout  \n").unwrap();
        assert_eq!(parsed.addressed_identity, "W42");
        assert_eq!(parsed.remainder, "secret logout");
    }

    #[test]
    fn test_mention_without_remainder() {
        let parsed = parse_direct_mention("<@U1>").unwrap();
        assert_eq!(parsed.addressed_identity, "U1");
        assert_eq!(parsed.remainder, "");
    }

    #[test]
    fn test_empty_identity_matches() {
        let parsed = parse_direct_mention("<@> hi").unwrap();
        assert_eq!(parsed.addressed_identity, "");
        assert_eq!(parsed.remainder, "hi");
    }

    #[test]
    fn test_multiline_remainder_is_kept() {
        let parsed = parse_direct_mention("<@U1> sup?\nsecond line").unwrap();
        assert_eq!(parsed.remainder, "sup?\nsecond line");
    }

    #[test]
    fn test_non_leading_or_foreign_mentions_do_not_match() {
        let inputs = [
            "",
            "hello",
            "hey <@U1> sup?",
            " <@U1> sup?",
            "<@U-1> punctuation in the identifier",
            "<#C123|general>",
            "<@U1 unterminated",
            "@U1 plain at sign",
        ];
        for input in inputs {
            assert_eq!(parse_direct_mention(input), None, "input: {input:?}");
        }
    }

    #[test]
    fn test_shortest_identity_is_taken() {
        let parsed = parse_direct_mention("<@U1> and <@U2>").unwrap();
        assert_eq!(parsed.addressed_identity, "U1");
        assert_eq!(parsed.remainder, "and <@U2>");
    }
}
