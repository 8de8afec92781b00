//! Value readers: turn one raw token into a typed value.

use std::str::FromStr;

use indexmap::IndexMap;

use crate::error::{Error, Result};

/// Parse function injected into every value-accepting argument.
///
/// Receives the argument's declared name and the raw token.
pub type Reader<T> = Box<dyn Fn(&str, &str) -> Result<T>>;

/// Default reader: the whole token must parse through [`FromStr`].
///
/// Trailing characters the target type cannot take (for example `12abc` for
/// an integer) make the whole token invalid.
pub fn read_from_str<T: FromStr>(name: &str, value: &str) -> Result<T> {
    value.parse::<T>().map_err(|_| {
        Error::Parse(format!(
            "Argument '{name}' received invalid value type '{value}'"
        ))
    })
}

pub fn from_str_reader<T: FromStr + 'static>() -> Reader<T> {
    Box::new(read_from_str::<T>)
}

/// Reader that looks the token up in a fixed key set.
pub fn map_reader<T: Clone + 'static>(map: IndexMap<String, T>) -> Reader<T> {
    Box::new(move |name, value| {
        map.get(value).cloned().ok_or_else(|| {
            Error::Map(format!(
                "Could not find key '{value}' in map for arg '{name}'"
            ))
        })
    })
}
