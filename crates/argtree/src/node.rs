//! Tree nodes: groups, flags and positionals.

use std::any::Any;
use std::fmt;

use crate::error::{Error, Result};
use crate::group::Validator;
use crate::matcher::Matcher;
use crate::reader::Reader;

/// Index of a node inside its parser's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

/// Typed storage behind a value-accepting node.
pub(crate) trait ValueSlot {
    fn parse(&mut self, name: &str, token: &str) -> Result<()>;
    fn as_any(&self) -> &dyn Any;
}

impl fmt::Debug for dyn ValueSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ValueSlot")
    }
}

/// One value, overwritten on every match.
pub(crate) struct Single<T> {
    pub(crate) value: T,
    reader: Reader<T>,
}

impl<T> Single<T> {
    pub(crate) fn new(value: T, reader: Reader<T>) -> Self {
        Self { value, reader }
    }
}

impl<T: 'static> ValueSlot for Single<T> {
    fn parse(&mut self, name: &str, token: &str) -> Result<()> {
        self.value = (self.reader)(name, token)?;
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A collection, extended on every match.
pub(crate) struct Multi<T, C> {
    pub(crate) values: C,
    reader: Reader<T>,
}

impl<T, C> Multi<T, C> {
    pub(crate) fn new(values: C, reader: Reader<T>) -> Self {
        Self { values, reader }
    }
}

impl<T: 'static, C: Extend<T> + 'static> ValueSlot for Multi<T, C> {
    fn parse(&mut self, name: &str, token: &str) -> Result<()> {
        let value = (self.reader)(name, token)?;
        self.values.extend(std::iter::once(value));
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[derive(Debug)]
pub(crate) struct Node {
    pub(crate) name: String,
    pub(crate) help: String,
    pub(crate) matched: bool,
    pub(crate) kick_out: bool,
    /// A second match within one parse raises [`Error::Extra`]. For a
    /// positional list this caps it at one token per parse.
    pub(crate) single: bool,
    pub(crate) hidden: bool,
    pub(crate) kind: NodeKind,
}

#[derive(Debug)]
pub(crate) enum NodeKind {
    Group(GroupNode),
    Flag(FlagNode),
    Positional(PositionalNode),
}

#[derive(Debug, Default)]
pub(crate) struct GroupNode {
    pub(crate) children: Vec<NodeId>,
    pub(crate) validator: Validator,
}

#[derive(Debug)]
pub(crate) struct FlagNode {
    pub(crate) matcher: Matcher,
    pub(crate) action: FlagAction,
}

#[derive(Debug)]
pub(crate) enum FlagAction {
    Switch,
    Help,
    Counter(u32),
    Value {
        slot: Box<dyn ValueSlot>,
        /// Accepted keys of a mapping-backed flag, for help output.
        keys: Option<Vec<String>>,
    },
}

#[derive(Debug)]
pub(crate) struct PositionalNode {
    pub(crate) slot: Box<dyn ValueSlot>,
    pub(crate) ready: bool,
    /// Lists stay ready after a match and keep collecting.
    pub(crate) list: bool,
}

impl Node {
    pub(crate) fn group(help: String, validator: Validator) -> Self {
        Self {
            name: String::new(),
            help,
            matched: false,
            kick_out: false,
            single: false,
            hidden: false,
            kind: NodeKind::Group(GroupNode {
                children: Vec::new(),
                validator,
            }),
        }
    }

    pub(crate) fn is_group(&self) -> bool {
        matches!(self.kind, NodeKind::Group(_))
    }

    pub(crate) fn is_help(&self) -> bool {
        matches!(
            self.kind,
            NodeKind::Flag(FlagNode {
                action: FlagAction::Help,
                ..
            })
        )
    }

    pub(crate) fn takes_value(&self) -> bool {
        match &self.kind {
            NodeKind::Flag(flag) => matches!(flag.action, FlagAction::Value { .. }),
            NodeKind::Positional(_) => true,
            NodeKind::Group(_) => false,
        }
    }

    pub(crate) fn is_ready(&self) -> bool {
        matches!(&self.kind, NodeKind::Positional(pos) if pos.ready)
    }

    pub(crate) fn matcher(&self) -> Option<&Matcher> {
        match &self.kind {
            NodeKind::Flag(flag) => Some(&flag.matcher),
            _ => None,
        }
    }

    pub(crate) fn slot(&self) -> Option<&dyn ValueSlot> {
        match &self.kind {
            NodeKind::Flag(FlagNode {
                action: FlagAction::Value { slot, .. },
                ..
            }) => Some(&**slot),
            NodeKind::Positional(pos) => Some(&*pos.slot),
            _ => None,
        }
    }

    /// Record a match of this flag. `shown` is the flag as the user wrote it.
    pub(crate) fn mark_matched(&mut self, shown: &str) -> Result<()> {
        if self.single && self.matched {
            return Err(Error::Extra(format!(
                "Flag '{shown}' was passed multiple times, but is only allowed to be passed once"
            )));
        }
        self.matched = true;
        if let NodeKind::Flag(FlagNode {
            action: FlagAction::Counter(count),
            ..
        }) = &mut self.kind
        {
            *count += 1;
        }
        Ok(())
    }

    /// Feed a token to the node's reader.
    pub(crate) fn parse_value(&mut self, token: &str) -> Result<()> {
        match &mut self.kind {
            NodeKind::Flag(FlagNode {
                action: FlagAction::Value { slot, .. },
                ..
            }) => slot.parse(&self.name, token),
            NodeKind::Positional(pos) => {
                if self.single && self.matched {
                    return Err(Error::Extra(format!(
                        "Positional '{}' was passed multiple times, but is only allowed to be passed once",
                        self.name
                    )));
                }
                pos.slot.parse(&self.name, token)?;
                if !pos.list {
                    pos.ready = false;
                }
                self.matched = true;
                Ok(())
            }
            _ => Err(Error::Parse(format!(
                "Passed an argument into a non-argument flag: {}",
                self.name
            ))),
        }
    }

    pub(crate) fn reset(&mut self) {
        self.matched = false;
        if let NodeKind::Positional(pos) = &mut self.kind {
            pos.ready = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::reader::from_str_reader;

    fn switch(single: bool) -> Node {
        Node {
            name: "bar".to_string(),
            help: String::new(),
            matched: false,
            kick_out: false,
            single,
            hidden: false,
            kind: NodeKind::Flag(FlagNode {
                matcher: Matcher::new(['b'], ["bar"]),
                action: FlagAction::Switch,
            }),
        }
    }

    fn positional(list: bool) -> Node {
        let slot: Box<dyn ValueSlot> = if list {
            Box::new(Multi::<String, Vec<String>>::new(Vec::new(), from_str_reader()))
        } else {
            Box::new(Single::new(String::new(), from_str_reader()))
        };
        Node {
            name: "input".to_string(),
            help: String::new(),
            matched: false,
            kick_out: false,
            single: false,
            hidden: false,
            kind: NodeKind::Positional(PositionalNode {
                slot,
                ready: true,
                list,
            }),
        }
    }

    #[test]
    fn single_flag_rejects_second_match() {
        let mut node = switch(true);
        node.mark_matched("--bar").unwrap();
        let err = node.mark_matched("--bar").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Extra);
        node.reset();
        node.mark_matched("-b").unwrap();
    }

    #[test]
    fn plain_flag_matches_repeatedly() {
        let mut node = switch(false);
        node.mark_matched("--bar").unwrap();
        node.mark_matched("--bar").unwrap();
        assert!(node.matched);
    }

    #[test]
    fn positional_is_consumed_once() {
        let mut node = positional(false);
        assert!(node.is_ready());
        node.parse_value("a").unwrap();
        assert!(!node.is_ready());
        assert!(node.matched);
        node.reset();
        assert!(node.is_ready());
        assert!(!node.matched);
    }

    #[test]
    fn positional_list_stays_ready() {
        let mut node = positional(true);
        node.parse_value("a").unwrap();
        node.parse_value("b").unwrap();
        assert!(node.is_ready());
        let values = node
            .slot()
            .and_then(|s| s.as_any().downcast_ref::<Multi<String, Vec<String>>>())
            .map(|m| m.values.clone());
        assert_eq!(values, Some(vec!["a".to_string(), "b".to_string()]));
    }

    #[test]
    fn single_positional_list_takes_one_token() {
        let mut node = positional(true);
        node.single = true;
        node.parse_value("a").unwrap();
        let err = node.parse_value("b").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Extra);
        node.reset();
        node.parse_value("c").unwrap();
    }

    #[test]
    fn switch_does_not_take_a_value() {
        let mut node = switch(false);
        assert!(!node.takes_value());
        assert_eq!(node.parse_value("x").unwrap_err().kind(), ErrorKind::Parse);
    }
}
