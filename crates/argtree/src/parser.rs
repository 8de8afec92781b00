//! The root group plus the token dispatch loop.

use indexmap::IndexMap;
use std::str::FromStr;

use crate::arg::Arg;
use crate::error::{Error, Result};
use crate::group::Validator;
use crate::handle::{
    CounterId, FlagId, GroupId, MapFlag, MapFlagList, Positional, PositionalList, ValueFlag,
    ValueFlagList, ValueHandle,
};
use crate::node::{
    FlagAction, FlagNode, Multi, Node, NodeId, NodeKind, PositionalNode, Single, ValueSlot,
};
use crate::options::ParserOptions;
use crate::reader::{Reader, from_str_reader, map_reader};
use crate::tree::{ROOT, Tree};

/// What the loop does after one token has been fully handled.
enum Step {
    Continue,
    KickOut,
}

/// Command line parser: owns the argument tree and the tokenizer settings.
///
/// The root group uses [`Validator::AllChildGroups`], so it only fails when a
/// nested group fails.
#[derive(Debug)]
pub struct Parser {
    pub(crate) tree: Tree,
    pub(crate) options: ParserOptions,
    pub(crate) prog: String,
    pub(crate) description: String,
    pub(crate) epilog: String,
}

impl Parser {
    pub fn new(description: impl Into<String>) -> Self {
        Self::with_options(description, ParserOptions::default())
    }

    pub fn with_options(description: impl Into<String>, options: ParserOptions) -> Self {
        Self {
            tree: Tree::new("arguments", Validator::AllChildGroups),
            options,
            prog: String::new(),
            description: description.into(),
            epilog: String::new(),
        }
    }

    pub fn epilog(mut self, epilog: impl Into<String>) -> Self {
        self.epilog = epilog.into();
        self
    }

    pub fn prog(mut self, prog: impl Into<String>) -> Self {
        self.prog = prog.into();
        self
    }

    pub fn prog_name(&self) -> &str {
        &self.prog
    }

    pub fn options_mut(&mut self) -> &mut ParserOptions {
        &mut self.options
    }

    pub fn root(&self) -> GroupId {
        GroupId(ROOT)
    }

    // Declaration.

    pub fn group(
        &mut self,
        parent: GroupId,
        help: impl Into<String>,
        validator: Validator,
    ) -> GroupId {
        GroupId(self.tree.push(parent.0, Node::group(help.into(), validator)))
    }

    pub fn flag(&mut self, parent: GroupId, arg: Arg) -> FlagId {
        FlagId(self.push_flag(parent, arg, FlagAction::Switch))
    }

    /// A flag that stops parsing with [`Error::Help`] as soon as it matches.
    pub fn help_flag(&mut self, parent: GroupId, arg: Arg) -> FlagId {
        FlagId(self.push_flag(parent, arg, FlagAction::Help))
    }

    pub fn counter(&mut self, parent: GroupId, arg: Arg, start: u32) -> CounterId {
        CounterId(self.push_flag(parent, arg, FlagAction::Counter(start)))
    }

    pub fn value_flag<T: FromStr + 'static>(
        &mut self,
        parent: GroupId,
        arg: Arg,
        default: T,
    ) -> ValueFlag<T> {
        self.value_flag_with(parent, arg, default, from_str_reader())
    }

    pub fn value_flag_with<T: 'static>(
        &mut self,
        parent: GroupId,
        arg: Arg,
        default: T,
        reader: Reader<T>,
    ) -> ValueFlag<T> {
        let slot = Box::new(Single::new(default, reader));
        ValueFlag::new(self.push_value_flag(parent, arg, slot, None))
    }

    pub fn value_flag_list<T, C>(
        &mut self,
        parent: GroupId,
        arg: Arg,
        defaults: C,
    ) -> ValueFlagList<T, C>
    where
        T: FromStr + 'static,
        C: Extend<T> + 'static,
    {
        self.value_flag_list_with(parent, arg, defaults, from_str_reader())
    }

    pub fn value_flag_list_with<T, C>(
        &mut self,
        parent: GroupId,
        arg: Arg,
        defaults: C,
        reader: Reader<T>,
    ) -> ValueFlagList<T, C>
    where
        T: 'static,
        C: Extend<T> + 'static,
    {
        let slot = Box::new(Multi::new(defaults, reader));
        ValueFlagList::new(self.push_value_flag(parent, arg, slot, None))
    }

    /// A value flag whose token must be one of the keys of `map`.
    pub fn map_flag<T: Clone + 'static>(
        &mut self,
        parent: GroupId,
        arg: Arg,
        map: IndexMap<String, T>,
        default: T,
    ) -> MapFlag<T> {
        let keys = map.keys().cloned().collect();
        let slot = Box::new(Single::new(default, map_reader(map)));
        MapFlag::new(self.push_value_flag(parent, arg, slot, Some(keys)))
    }

    pub fn map_flag_list<T, C>(
        &mut self,
        parent: GroupId,
        arg: Arg,
        map: IndexMap<String, T>,
        defaults: C,
    ) -> MapFlagList<T, C>
    where
        T: Clone + 'static,
        C: Extend<T> + 'static,
    {
        let keys = map.keys().cloned().collect();
        let slot = Box::new(Multi::new(defaults, map_reader(map)));
        MapFlagList::new(self.push_value_flag(parent, arg, slot, Some(keys)))
    }

    pub fn positional<T: FromStr + 'static>(
        &mut self,
        parent: GroupId,
        arg: Arg,
        default: T,
    ) -> Positional<T> {
        self.positional_with(parent, arg, default, from_str_reader())
    }

    pub fn positional_with<T: 'static>(
        &mut self,
        parent: GroupId,
        arg: Arg,
        default: T,
        reader: Reader<T>,
    ) -> Positional<T> {
        let slot = Box::new(Single::new(default, reader));
        Positional::new(self.push_positional(parent, arg, slot, false))
    }

    pub fn positional_list<T, C>(
        &mut self,
        parent: GroupId,
        arg: Arg,
        defaults: C,
    ) -> PositionalList<T, C>
    where
        T: FromStr + 'static,
        C: Extend<T> + 'static,
    {
        self.positional_list_with(parent, arg, defaults, from_str_reader())
    }

    pub fn positional_list_with<T, C>(
        &mut self,
        parent: GroupId,
        arg: Arg,
        defaults: C,
        reader: Reader<T>,
    ) -> PositionalList<T, C>
    where
        T: 'static,
        C: Extend<T> + 'static,
    {
        let slot = Box::new(Multi::new(defaults, reader));
        PositionalList::new(self.push_positional(parent, arg, slot, true))
    }

    fn leaf(arg: Arg, kind: NodeKind) -> Node {
        Node {
            name: arg.name,
            help: arg.help,
            matched: false,
            kick_out: arg.kick_out,
            single: arg.single,
            hidden: arg.hidden,
            kind,
        }
    }

    fn push_flag(&mut self, parent: GroupId, mut arg: Arg, action: FlagAction) -> NodeId {
        let matcher = std::mem::take(&mut arg.matcher);
        let node = Self::leaf(arg, NodeKind::Flag(FlagNode { matcher, action }));
        self.tree.push(parent.0, node)
    }

    fn push_value_flag(
        &mut self,
        parent: GroupId,
        arg: Arg,
        slot: Box<dyn ValueSlot>,
        keys: Option<Vec<String>>,
    ) -> NodeId {
        self.push_flag(parent, arg, FlagAction::Value { slot, keys })
    }

    fn push_positional(
        &mut self,
        parent: GroupId,
        arg: Arg,
        slot: Box<dyn ValueSlot>,
        list: bool,
    ) -> NodeId {
        let node = Self::leaf(
            arg,
            NodeKind::Positional(PositionalNode {
                slot,
                ready: true,
                list,
            }),
        );
        self.tree.push(parent.0, node)
    }

    // Readback.

    /// Whether the node matched in the last parse. Groups report their
    /// validator's verdict.
    pub fn matched(&self, id: impl Into<NodeId>) -> bool {
        self.tree.matched(id.into())
    }

    /// Whether a positional can still take a token.
    pub fn is_ready(&self, id: impl Into<NodeId>) -> bool {
        self.tree.node(id.into()).is_some_and(Node::is_ready)
    }

    pub fn count(&self, id: CounterId) -> u32 {
        match self.tree.node(id.0).map(|n| &n.kind) {
            Some(NodeKind::Flag(FlagNode {
                action: FlagAction::Counter(count),
                ..
            })) => *count,
            _ => 0,
        }
    }

    /// The stored value behind a handle: the last parsed value, or the
    /// default when nothing was ever parsed into it.
    pub fn get<H: ValueHandle>(&self, handle: &H) -> Option<&H::Output> {
        let slot = self.tree.node((*handle).into())?.slot()?;
        handle.downcast(slot.as_any())
    }

    // Parsing.

    /// Parse `args` against the tree.
    ///
    /// Returns the tokens left unconsumed: empty when all input was parsed
    /// and the group constraints hold, or the tail following a kick-out
    /// argument, in which case no validation runs.
    pub fn parse_args<'a, S: AsRef<str>>(&mut self, args: &'a [S]) -> Result<&'a [S]> {
        self.tree.reset();

        let mut terminated = false;
        let mut pos = 0;
        while pos < args.len() {
            let chunk = args[pos].as_ref();
            pos += 1;

            let step = if !terminated && chunk == self.options.terminator {
                tracing::trace!(token = chunk, "terminator, remaining tokens are positional");
                terminated = true;
                Step::Continue
            } else if let Some(body) = Self::strip(chunk, &self.options.long_prefix, terminated)
            {
                self.parse_long(body, args, &mut pos)?
            } else if let Some(body) = Self::strip(chunk, &self.options.short_prefix, terminated)
            {
                self.parse_short(body, args, &mut pos)?
            } else {
                self.parse_positional(chunk)?
            };

            if let Step::KickOut = step {
                tracing::debug!(consumed = pos, remaining = args.len() - pos, "kick-out");
                return Ok(&args[pos..]);
            }
        }

        self.validate()?;
        Ok(&args[args.len()..])
    }

    /// Parse a full argument vector whose first element is the program name.
    ///
    /// The program name is kept when none was set. Returns the kick-out tail.
    pub fn parse_cli<I>(&mut self, argv: I) -> Result<Vec<String>>
    where
        I: IntoIterator<Item = String>,
    {
        let mut argv = argv.into_iter();
        if let Some(prog) = argv.next()
            && self.prog.is_empty()
        {
            self.prog = prog;
        }
        let args: Vec<String> = argv.collect();
        let rest = self.parse_args(&args)?;
        Ok(rest.to_vec())
    }

    fn strip<'c>(chunk: &'c str, prefix: &str, terminated: bool) -> Option<&'c str> {
        if terminated {
            return None;
        }
        chunk.strip_prefix(prefix).filter(|body| !body.is_empty())
    }

    fn next_token<'a, S: AsRef<str>>(args: &'a [S], pos: &mut usize) -> Option<&'a str> {
        let token = args.get(*pos)?.as_ref();
        *pos += 1;
        Some(token)
    }

    fn kick_out_step(&self, id: NodeId) -> Step {
        if self.tree.node(id).is_some_and(|n| n.kick_out) {
            Step::KickOut
        } else {
            Step::Continue
        }
    }

    fn parse_long<S: AsRef<str>>(
        &mut self,
        body: &str,
        args: &[S],
        pos: &mut usize,
    ) -> Result<Step> {
        let separator = self.options.long_separator.as_str();
        let (name, joined) = match body.find(separator).filter(|_| !separator.is_empty()) {
            Some(at) => (&body[..at], Some(&body[at + separator.len()..])),
            None => (body, None),
        };
        let shown = format!("{}{name}", self.options.long_prefix);

        let id = self
            .tree
            .find_long(ROOT, name)
            .ok_or_else(|| Error::Parse(format!("Flag could not be matched: {name}")))?;
        self.tree.mark_matched(id, &shown)?;
        if self.tree.node(id).is_some_and(Node::is_help) {
            return Err(Error::Help(shown));
        }

        let takes_value = self.tree.node(id).is_some_and(Node::takes_value);
        if !takes_value && joined.is_some() {
            return Err(Error::Parse(format!(
                "Passed an argument into a non-argument flag: {}{body}",
                self.options.long_prefix
            )));
        }
        if takes_value {
            let value = match joined {
                Some(value) if self.options.allow_joined_long_value => value,
                Some(_) => {
                    return Err(Error::Parse(format!(
                        "Flag '{name}' was passed a joined argument, but these are disallowed"
                    )));
                }
                None if self.options.allow_separate_long_value => Self::next_token(args, pos)
                    .ok_or_else(|| {
                        Error::Parse(format!(
                            "Flag '{name}' requires an argument but received none"
                        ))
                    })?,
                None => {
                    return Err(Error::Parse(format!(
                        "Flag '{name}' was passed a separate argument, but these are disallowed"
                    )));
                }
            };
            self.tree.parse_value(id, value)?;
        }
        Ok(self.kick_out_step(id))
    }

    fn parse_short<S: AsRef<str>>(
        &mut self,
        body: &str,
        args: &[S],
        pos: &mut usize,
    ) -> Result<Step> {
        for (at, short) in body.char_indices() {
            let shown = format!("{}{short}", self.options.short_prefix);
            let id = self
                .tree
                .find_short(ROOT, short)
                .ok_or_else(|| Error::Parse(format!("Flag could not be matched: '{short}'")))?;
            self.tree.mark_matched(id, &shown)?;

            if self.tree.node(id).is_some_and(Node::is_help) {
                return Err(Error::Help(shown));
            }

            let rest = &body[at + short.len_utf8()..];
            if self.tree.node(id).is_some_and(Node::takes_value) {
                let value = if !rest.is_empty() {
                    if !self.options.allow_joined_short_value {
                        return Err(Error::Parse(format!(
                            "Flag '{short}' was passed a joined argument, but these are disallowed"
                        )));
                    }
                    rest
                } else {
                    if !self.options.allow_separate_short_value {
                        return Err(Error::Parse(format!(
                            "Flag '{short}' was passed a separate argument, but these are disallowed"
                        )));
                    }
                    Self::next_token(args, pos).ok_or_else(|| {
                        Error::Parse(format!(
                            "Flag '{short}' requires an argument but received none"
                        ))
                    })?
                };
                self.tree.parse_value(id, value)?;
                return Ok(self.kick_out_step(id));
            }

            // The tail handed back is whole tokens, so a kick-out flag has to
            // end its cluster.
            if let Step::KickOut = self.kick_out_step(id) {
                if !rest.is_empty() {
                    return Err(Error::Parse(format!(
                        "Flag '{short}' ends parsing, but '{rest}' follows it in the same token"
                    )));
                }
                return Ok(Step::KickOut);
            }
        }
        Ok(Step::Continue)
    }

    fn parse_positional(&mut self, chunk: &str) -> Result<Step> {
        let id = self.tree.next_ready_positional(ROOT).ok_or_else(|| {
            Error::Parse(format!(
                "Passed in argument, but no positional arguments were ready to receive it: {chunk}"
            ))
        })?;
        self.tree.parse_value(id, chunk)?;
        Ok(self.kick_out_step(id))
    }

    fn validate(&self) -> Result<()> {
        if self.tree.matched(ROOT) {
            return Ok(());
        }
        let failing = self.tree.first_failing_group(ROOT);
        let help = self
            .tree
            .node(failing)
            .map(|n| n.help.as_str())
            .unwrap_or_default();
        tracing::debug!(group = help, "group validation failed");
        Err(Error::Validation(format!("Group validation failed: {help}")))
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new(String::new())
    }
}
