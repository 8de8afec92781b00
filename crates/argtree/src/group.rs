//! Group constraint policies.

use std::fmt;

/// Predicate a group applies to its children after parsing.
///
/// Every policy is evaluated over the number of children and the number of
/// matched children; a nested group counts as one child, matched when its
/// own validator holds.
#[derive(Default)]
pub enum Validator {
    /// Exactly one child matched.
    Xor,
    AtLeastOne,
    AtMostOne,
    All,
    None,
    /// All or none.
    AllOrNone,
    /// Every nested group validates. Leaf children are ignored.
    AllChildGroups,
    /// Always satisfied.
    #[default]
    DontCare,
    /// Never satisfied.
    CareTooMuch,
    /// Caller-supplied predicate over `(total, matched)`.
    Custom(Box<dyn Fn(usize, usize) -> bool>),
}

impl Validator {
    pub fn custom(f: impl Fn(usize, usize) -> bool + 'static) -> Self {
        Self::Custom(Box::new(f))
    }

    /// `child_groups_ok` is only consulted by [`Validator::AllChildGroups`].
    pub(crate) fn check(
        &self,
        total: usize,
        matched: usize,
        child_groups_ok: impl FnOnce() -> bool,
    ) -> bool {
        match self {
            Self::Xor => matched == 1,
            Self::AtLeastOne => matched >= 1,
            Self::AtMostOne => matched <= 1,
            Self::All => matched == total,
            Self::None => matched == 0,
            Self::AllOrNone => matched == total || matched == 0,
            Self::AllChildGroups => child_groups_ok(),
            Self::DontCare => true,
            Self::CareTooMuch => false,
            Self::Custom(f) => f(total, matched),
        }
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Xor => "Xor",
            Self::AtLeastOne => "AtLeastOne",
            Self::AtMostOne => "AtMostOne",
            Self::All => "All",
            Self::None => "None",
            Self::AllOrNone => "AllOrNone",
            Self::AllChildGroups => "AllChildGroups",
            Self::DontCare => "DontCare",
            Self::CareTooMuch => "CareTooMuch",
            Self::Custom(_) => "Custom",
        };
        f.write_str(name)
    }
}
