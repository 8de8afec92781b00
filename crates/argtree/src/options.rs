//! Tokenizer and help layout configuration.

use serde::{Deserialize, Serialize};

/// How tokens are classified into long flags, short flags and positionals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ParserOptions {
    pub long_prefix: String,
    pub short_prefix: String,
    /// Splits `name<sep>value` inside a long flag token. Empty disables
    /// joined long values entirely.
    pub long_separator: String,
    /// Token after which everything is positional.
    pub terminator: String,
    pub allow_joined_short_value: bool,
    pub allow_joined_long_value: bool,
    pub allow_separate_short_value: bool,
    pub allow_separate_long_value: bool,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            long_prefix: "--".to_string(),
            short_prefix: "-".to_string(),
            long_separator: "=".to_string(),
            terminator: "--".to_string(),
            allow_joined_short_value: true,
            allow_joined_long_value: true,
            allow_separate_short_value: true,
            allow_separate_long_value: true,
        }
    }
}

impl ParserOptions {
    /// Load options from JSON. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Column layout for rendered help text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct HelpLayout {
    pub width: usize,
    pub prog_indent: usize,
    pub description_indent: usize,
    pub flag_indent: usize,
    pub help_indent: usize,
    pub gutter: usize,
    /// Mention the terminator when both flags and positionals exist.
    pub show_terminator: bool,
}

impl Default for HelpLayout {
    fn default() -> Self {
        Self {
            width: 80,
            prog_indent: 2,
            description_indent: 4,
            flag_indent: 6,
            help_indent: 25,
            gutter: 1,
            show_terminator: true,
        }
    }
}
