//! Exact-match name registry for one argument.

use indexmap::IndexSet;

/// Short (single character) and long (string) names an argument answers to.
///
/// Built once and never changed afterwards. Lookup is exact membership:
/// no prefixes, no abbreviations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Matcher {
    shorts: IndexSet<char>,
    longs: IndexSet<String>,
}

impl Matcher {
    pub fn new<S, L>(shorts: S, longs: L) -> Self
    where
        S: IntoIterator<Item = char>,
        L: IntoIterator,
        L::Item: Into<String>,
    {
        Self {
            shorts: shorts.into_iter().collect(),
            longs: longs.into_iter().map(Into::into).collect(),
        }
    }

    /// Matcher with only short names.
    pub fn shorts(shorts: impl IntoIterator<Item = char>) -> Self {
        Self::new(shorts, std::iter::empty::<String>())
    }

    /// Matcher with only long names.
    pub fn longs<L>(longs: L) -> Self
    where
        L: IntoIterator,
        L::Item: Into<String>,
    {
        Self::new(std::iter::empty::<char>(), longs)
    }

    pub(crate) fn with_short(mut self, short: char) -> Self {
        self.shorts.insert(short);
        self
    }

    pub(crate) fn with_long(mut self, long: impl Into<String>) -> Self {
        self.longs.insert(long.into());
        self
    }

    pub fn match_short(&self, short: char) -> bool {
        self.shorts.contains(&short)
    }

    pub fn match_long(&self, long: &str) -> bool {
        self.longs.contains(long)
    }

    pub fn is_empty(&self) -> bool {
        self.shorts.is_empty() && self.longs.is_empty()
    }

    /// Names as the user would type them: shorts first, then longs, each in
    /// declaration order.
    pub fn display_strings(&self, short_prefix: &str, long_prefix: &str) -> Vec<String> {
        self.shorts
            .iter()
            .map(|c| format!("{short_prefix}{c}"))
            .chain(self.longs.iter().map(|l| format!("{long_prefix}{l}")))
            .collect()
    }
}

impl From<char> for Matcher {
    fn from(short: char) -> Self {
        Self::shorts([short])
    }
}

impl From<&str> for Matcher {
    fn from(long: &str) -> Self {
        Self::longs([long])
    }
}

impl From<(char, &str)> for Matcher {
    fn from((short, long): (char, &str)) -> Self {
        Self::new([short], [long])
    }
}

#[cfg(test)]
mod tests {
    use super::Matcher;

    #[test]
    fn matches_exact_names_only() {
        let m = Matcher::new(['f'], ["foo"]);
        assert!(m.match_short('f'));
        assert!(m.match_long("foo"));
        assert!(!m.match_short('o'));
        assert!(!m.match_long("fo"));
        assert!(!m.match_long("foobar"));
        assert!(!m.match_long("f"));
    }

    #[test]
    fn display_strings_keep_declaration_order() {
        let m = Matcher::new(['h', '?'], ["help", "usage"]);
        assert_eq!(
            m.display_strings("-", "--"),
            vec!["-h", "-?", "--help", "--usage"]
        );
        assert_eq!(m.display_strings("/", "/"), vec!["/h", "/?", "/help", "/usage"]);
    }

    #[test]
    fn conversions() {
        assert_eq!(Matcher::from('x'), Matcher::shorts(['x']));
        assert_eq!(Matcher::from("long"), Matcher::longs(["long"]));
        assert_eq!(Matcher::from(('x', "long")), Matcher::new(['x'], ["long"]));
        assert!(Matcher::default().is_empty());
    }
}
