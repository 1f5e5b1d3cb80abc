//! Assistant panel texts.

use serde::{Deserialize, Serialize};

fn default_welcome_message() -> String {
    String::from("Great! Ask about segments, bottlenecks, or growth ideas.")
}

fn default_locked_message() -> String {
    String::from("Run an analysis to unlock the assistant.")
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChatConfig {
    /// Shown as the only message once an analysis is ready.
    #[serde(default = "default_welcome_message")]
    pub welcome_message: String,

    /// Shown as the only message while no analysis is ready.
    #[serde(default = "default_locked_message")]
    pub locked_message: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            welcome_message: default_welcome_message(),
            locked_message: default_locked_message(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_distinct() {
        let config = ChatConfig::default();
        assert!(config.welcome_message.starts_with("Great!"));
        assert_eq!(
            config.locked_message,
            "Run an analysis to unlock the assistant."
        );
        assert_ne!(config.welcome_message, config.locked_message);
    }
}
