//! `echo`: print the positional words back.

use anyhow::Result;
use argtree::{Arg, FlagId, Parser, ParserOptions, PositionalList};
use std::io::Write;
use std::process::ExitCode;

use crate::{Format, report};

struct EchoArgs {
    parser: Parser,
    no_newline: FlagId,
    words: PositionalList<String, Vec<String>>,
}

impl EchoArgs {
    fn new(options: ParserOptions) -> Self {
        let mut parser = Parser::with_options("Print the given words.", options).prog("argtree-demo echo");
        let root = parser.root();
        parser.help_flag(root, Arg::new("help", "Show this help menu").matcher(('h', "help")));
        let no_newline = parser.flag(root, Arg::new("n", "Do not print the trailing newline").short('n'));
        let words = parser.positional_list(root, Arg::new("WORDS", "Words to print"), Vec::new());
        Self {
            parser,
            no_newline,
            words,
        }
    }

    fn words(&self) -> &[String] {
        self.parser.get(&self.words).map(Vec::as_slice).unwrap_or_default()
    }
}

pub fn run(args: &[String], options: ParserOptions, format: Format) -> Result<ExitCode> {
    let mut echo = EchoArgs::new(options);
    if let Err(err) = echo.parser.parse_args(args) {
        return Ok(report(&echo.parser, err));
    }

    let line = match format {
        Format::Plain => echo.words().join(" "),
        Format::Json => serde_json::to_string(echo.words())?,
    };
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(line.as_bytes())?;
    if !echo.parser.matched(echo.no_newline) {
        stdout.write_all(b"\n")?;
    }
    stdout.flush()?;
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn words_after_terminator_keep_their_dashes() {
        let mut echo = EchoArgs::new(ParserOptions::default());
        echo.parser.parse_args(&["-n", "a", "--", "-n", "b"]).unwrap();
        assert!(echo.parser.matched(echo.no_newline));
        assert_eq!(echo.words(), ["a", "-n", "b"]);
    }

    #[test]
    fn no_words_is_fine() {
        let mut echo = EchoArgs::new(ParserOptions::default());
        echo.parser.parse_args(&Vec::<String>::new()).unwrap();
        assert!(echo.words().is_empty());
    }
}
