//! # Command Router
//!
//! Classifies the text following a direct mention into exactly one [`Command`] and
//! dispatches it to the matching handler (in `interface/commands`).
//!
//! Verbs are matched as prefixes of the text. When several verbs match, the longest
//! one wins; equal lengths resolve to the earlier table entry.

use std::sync::Arc;

use crate::application::shutdown::ShutdownController;
use crate::domain::config::CommandsConfig;
use crate::domain::error::DispatchFault;
use crate::domain::traits::ImageLookup;
use crate::interface::commands;
use crate::strings::logs;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Reply(String),
    Image,
    /// Diagnostic command; always faults.
    Fault,
    Shutdown,
    Unknown,
}

#[derive(Debug, Clone)]
struct CommandRule {
    prefix: String,
    command: Command,
    /// Listed by the help command.
    visible: bool,
}

pub struct CommandRouter {
    rules: Vec<CommandRule>,
    images: Arc<dyn ImageLookup>,
    shutdown: ShutdownController,
}

impl CommandRouter {
    pub fn new(
        config: &CommandsConfig,
        images: Arc<dyn ImageLookup>,
        shutdown: ShutdownController,
    ) -> Self {
        let hidden = |prefix: &str, command| CommandRule {
            prefix: prefix.to_string(),
            command,
            visible: false,
        };

        let mut rules = vec![
            hidden(config.fault.as_str(), Command::Fault),
            hidden(config.help.as_str(), Command::Help),
        ];
        rules.extend(config.replies.iter().map(|entry| CommandRule {
            prefix: entry.prefix.clone(),
            command: Command::Reply(entry.text.clone()),
            visible: true,
        }));
        rules.push(CommandRule {
            prefix: config.image.clone(),
            command: Command::Image,
            visible: true,
        });
        rules.push(hidden(config.shutdown.as_str(), Command::Shutdown));
        rules.retain(|rule| !rule.prefix.is_empty());

        Self {
            rules,
            images,
            shutdown,
        }
    }

    pub fn classify(&self, text: &str) -> Command {
        let mut best: Option<&CommandRule> = None;
        for rule in &self.rules {
            if !text.starts_with(&rule.prefix) {
                continue;
            }
            if best.is_none_or(|current| rule.prefix.len() > current.prefix.len()) {
                best = Some(rule);
            }
        }
        best.map_or(Command::Unknown, |rule| rule.command.clone())
    }

    pub fn visible_verbs(&self) -> Vec<&str> {
        self.rules
            .iter()
            .filter(|rule| rule.visible)
            .map(|rule| rule.prefix.as_str())
            .collect()
    }

    /// Runs the command. `Ok(None)` means "no response"; the sender substitutes the
    /// fallback text. The diagnostic command and image lookup failures surface as
    /// [`DispatchFault`] for the caller to absorb.
    pub async fn route(&self, text: &str) -> Result<Option<String>, DispatchFault> {
        let command = self.classify(text);
        tracing::debug!(?command, "Router dispatching");

        let response = match command {
            Command::Fault => return Err(commands::misc::handle_fault()),
            Command::Help => Some(commands::help::handle_help(&self.visible_verbs())),
            Command::Reply(reply) => Some(commands::misc::handle_reply(&reply)),
            Command::Image => Some(commands::image::handle_image(self.images.as_ref()).await?),
            Command::Shutdown => Some(commands::misc::handle_shutdown(&self.shutdown)),
            Command::Unknown => None,
        };
        tracing::info!("{}", logs::user_command(text));
        Ok(response)
    }
}
