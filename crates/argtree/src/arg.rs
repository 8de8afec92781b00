//! Declaration builder shared by flags and positionals.

use crate::matcher::Matcher;

/// Name, help text, names to match and per-node policies of one argument.
///
/// ```ignore
/// let foo = Arg::new("foo", "Enable foo").short('f').long("foo").single();
/// ```
#[derive(Debug, Clone, Default)]
pub struct Arg {
    pub(crate) name: String,
    pub(crate) help: String,
    pub(crate) matcher: Matcher,
    pub(crate) kick_out: bool,
    pub(crate) single: bool,
    pub(crate) hidden: bool,
}

impl Arg {
    pub fn new(name: impl Into<String>, help: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            help: help.into(),
            ..Default::default()
        }
    }

    /// Replace the names this argument answers to. Ignored for positionals.
    pub fn matcher(mut self, matcher: impl Into<Matcher>) -> Self {
        self.matcher = matcher.into();
        self
    }

    pub fn short(mut self, short: char) -> Self {
        self.matcher = self.matcher.with_short(short);
        self
    }

    pub fn long(mut self, long: &str) -> Self {
        self.matcher = self.matcher.with_long(long);
        self
    }

    /// Stop the parse right after this argument is matched and hand the rest
    /// of the input back to the caller.
    pub fn kick_out(mut self) -> Self {
        self.kick_out = true;
        self
    }

    /// Raise [`crate::Error::Extra`] when matched twice in one parse.
    pub fn single(mut self) -> Self {
        self.single = true;
        self
    }

    /// Leave out of rendered help.
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }
}
