//! `copy`: dd-style settings, `/bs:4096 /if:in.img`.

use anyhow::Result;
use argtree::{Arg, Parser, ParserOptions, ValueFlag};
use serde::Serialize;
use std::process::ExitCode;

use crate::{Format, report};

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
struct CopySettings {
    bs: u64,
    skip: u64,
    #[serde(rename = "if")]
    input: Option<String>,
    #[serde(rename = "of")]
    output: Option<String>,
}

struct CopyArgs {
    parser: Parser,
    bs: ValueFlag<u64>,
    skip: ValueFlag<u64>,
    input: ValueFlag<String>,
    output: ValueFlag<String>,
}

/// dd takes `/name:value` style options.
pub fn default_options() -> ParserOptions {
    ParserOptions {
        long_prefix: "/".to_string(),
        long_separator: ":".to_string(),
        ..ParserOptions::default()
    }
}

impl CopyArgs {
    fn new(options: ParserOptions) -> Self {
        let mut parser = Parser::with_options("This command likes to break your disks", options)
            .prog("argtree-demo copy");
        let root = parser.root();

        parser.help_flag(root, Arg::new("help", "Show this help menu").long("help"));
        let bs = parser.value_flag(
            root,
            Arg::new("BYTES", "Block size").long("bs").single(),
            512,
        );
        let skip = parser.value_flag(
            root,
            Arg::new("BYTES", "Bytes to skip").long("skip").single(),
            0,
        );
        let input = parser.value_flag(
            root,
            Arg::new("FILE", "Input file").long("if").single(),
            String::new(),
        );
        let output = parser.value_flag(
            root,
            Arg::new("FILE", "Output file").long("of").single(),
            String::new(),
        );

        Self {
            parser,
            bs,
            skip,
            input,
            output,
        }
    }

    fn settings(&self) -> CopySettings {
        let text = |flag: ValueFlag<String>| {
            self.parser
                .matched(flag)
                .then(|| self.parser.get(&flag).cloned())
                .flatten()
        };
        CopySettings {
            bs: self.parser.get(&self.bs).copied().unwrap_or_default(),
            skip: self.parser.get(&self.skip).copied().unwrap_or_default(),
            input: text(self.input),
            output: text(self.output),
        }
    }
}

pub fn run(args: &[String], options: ParserOptions, format: Format) -> Result<ExitCode> {
    let mut copy = CopyArgs::new(options);
    if let Err(err) = copy.parser.parse_args(args) {
        return Ok(report(&copy.parser, err));
    }

    let settings = copy.settings();
    tracing::debug!(?settings, "copy settings resolved");
    match format {
        Format::Plain => {
            let show = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".to_string());
            println!("bs = {}", settings.bs);
            println!("skip = {}", settings.skip);
            println!("if = {}", show(&settings.input));
            println!("of = {}", show(&settings.output));
        }
        Format::Json => println!("{}", serde_json::to_string_pretty(&settings)?),
    }
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CopySettings {
        let mut copy = CopyArgs::new(default_options());
        copy.parser.parse_args(args).unwrap();
        copy.settings()
    }

    #[test]
    fn defaults_apply_without_flags() {
        assert_eq!(
            parse(&[]),
            CopySettings {
                bs: 512,
                skip: 0,
                input: None,
                output: None,
            }
        );
    }

    #[test]
    fn slash_colon_flags() {
        let settings = parse(&["/bs:4096", "/skip", "2", "/if:/dev/zero", "/of:out.img"]);
        assert_eq!(settings.bs, 4096);
        assert_eq!(settings.skip, 2);
        assert_eq!(settings.input.as_deref(), Some("/dev/zero"));
        assert_eq!(settings.output.as_deref(), Some("out.img"));
    }

    #[test]
    fn repeated_block_size_is_rejected() {
        let mut copy = CopyArgs::new(default_options());
        let err = copy.parser.parse_args(&["/bs:1", "/bs:2"]).unwrap_err();
        assert_eq!(err.kind(), argtree::ErrorKind::Extra);
    }

    #[test]
    fn json_uses_dd_names() {
        let json = serde_json::to_value(parse(&["/if:a"])).unwrap();
        assert_eq!(json["if"], "a");
        assert_eq!(json["bs"], 512);
        assert!(json["of"].is_null());
    }

    #[test]
    fn help_lists_slash_flags() {
        let copy = CopyArgs::new(default_options());
        let help = copy.parser.help();
        assert!(help.contains("/bs BYTES"), "{help}");
        assert!(help.contains("/help"), "{help}");
    }
}
