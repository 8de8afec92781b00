//! Declarative argument tree parsing.
//!
//! Arguments are declared once into a tree owned by a [`Parser`]: flags,
//! counters, value flags, mapping-backed flags and positionals, grouped under
//! [`Validator`] policies that constrain how many of their children may
//! match. A parse call walks the token list once, routes each token to the
//! tree, and then checks the group constraints.
//!
//! Any argument may be marked [`Arg::kick_out`]: the parse stops right after
//! it and the unconsumed tail is returned, ready for a second parser. This is
//! how subcommands are built.
//!
//! ```ignore
//! let mut parser = Parser::new("Copy blocks around");
//! let root = parser.root();
//! let help = parser.help_flag(root, Arg::new("help", "Show help").matcher(('h', "help")));
//! let bs = parser.value_flag::<u64>(root, Arg::new("BYTES", "Block size").long("bs"), 512);
//! parser.parse_args(&["--bs", "4096"])?;
//! assert_eq!(parser.get(&bs), Some(&4096));
//! ```

mod arg;
mod error;
mod group;
mod handle;
mod help;
mod matcher;
mod node;
mod options;
mod parser;
mod reader;
mod tree;

pub use arg::Arg;
pub use error::{Error, ErrorKind, Result};
pub use group::Validator;
pub use handle::{
    CounterId, FlagId, GroupId, MapFlag, MapFlagList, Positional, PositionalList, ValueFlag,
    ValueFlagList, ValueHandle,
};
pub use help::{glyphs, wrap};
pub use matcher::Matcher;
pub use node::NodeId;
pub use options::{HelpLayout, ParserOptions};
pub use parser::Parser;
pub use reader::{Reader, from_str_reader, map_reader, read_from_str};
