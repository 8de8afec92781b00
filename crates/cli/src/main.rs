mod copy;
mod echo;

use anyhow::{Context, Result};
use argtree::{Arg, CounterId, MapFlag, Parser, ParserOptions, Positional, ValueFlag};
use indexmap::IndexMap;
use serde_json::Value;
use std::{fs, path::PathBuf, process::ExitCode};
use tracing_subscriber::{EnvFilter, fmt};

/// How subcommands print their results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Plain,
    Json,
}

struct Global {
    parser: Parser,
    verbose: CounterId,
    config: ValueFlag<PathBuf>,
    format: MapFlag<Format>,
    command: Positional<String>,
}

impl Global {
    fn new() -> Self {
        let mut parser = Parser::new("Exercise the argtree parser with a couple of small commands.")
            .prog("argtree-demo")
            .epilog("Commands: copy, echo. Pass /help or --help after a command for its options.");
        let root = parser.root();

        parser.help_flag(root, Arg::new("help", "Show this help menu").matcher(('h', "help")));
        let verbose = parser.counter(
            root,
            Arg::new("verbose", "Raise the log level, repeat for more").matcher(('v', "verbose")),
            0,
        );
        let config = parser.value_flag(
            root,
            Arg::new("FILE", "JSON file with parser options for the command")
                .long("config")
                .single(),
            PathBuf::new(),
        );
        let formats: IndexMap<String, Format> = [
            ("plain".to_string(), Format::Plain),
            ("json".to_string(), Format::Json),
        ]
        .into_iter()
        .collect();
        let format = parser.map_flag(
            root,
            Arg::new("FORMAT", "Output format").long("format"),
            formats,
            Format::Plain,
        );
        let command = parser.positional(
            root,
            Arg::new("COMMAND", "Command to run").kick_out(),
            String::new(),
        );

        Self {
            parser,
            verbose,
            config,
            format,
            command,
        }
    }
}

fn main() -> ExitCode {
    match run(std::env::args().collect()) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(argv: Vec<String>) -> Result<ExitCode> {
    let mut global = Global::new();
    let rest = match global.parser.parse_cli(argv) {
        Ok(rest) => rest,
        Err(err) => return Ok(report(&global.parser, err)),
    };

    init_tracing(global.parser.count(global.verbose));

    let config = global
        .parser
        .matched(global.config)
        .then(|| global.parser.get(&global.config).cloned())
        .flatten();
    let format = global
        .parser
        .get(&global.format)
        .copied()
        .unwrap_or(Format::Plain);

    if !global.parser.matched(global.command) {
        let err = argtree::Error::Parse("No command given".to_string());
        return Ok(report(&global.parser, err));
    }
    let command = global.parser.get(&global.command).cloned().unwrap_or_default();
    tracing::debug!(command = %command, args = rest.len(), "dispatching command");

    match command.as_str() {
        "copy" => {
            let options = load_options(copy::default_options(), config.as_ref())?;
            copy::run(&rest, options, format)
        }
        "echo" => {
            let options = load_options(ParserOptions::default(), config.as_ref())?;
            echo::run(&rest, options, format)
        }
        other => {
            let err = argtree::Error::Parse(format!("Unknown command: {other}"));
            Ok(report(&global.parser, err))
        }
    }
}

/// Lay the fields found in the config file over `base`.
fn load_options(base: ParserOptions, path: Option<&PathBuf>) -> Result<ParserOptions> {
    let Some(path) = path else {
        return Ok(base);
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    let overrides: serde_json::Map<String, Value> = serde_json::from_str(&text)
        .with_context(|| format!("failed to parse config: {}", path.display()))?;

    let mut merged = serde_json::to_value(base)?;
    if let Value::Object(fields) = &mut merged {
        fields.extend(overrides);
    }
    tracing::debug!(config = %path.display(), "loaded parser options");
    serde_json::from_value(merged)
        .with_context(|| format!("invalid parser options in {}", path.display()))
}

/// Print the outcome of a failed parse. Help goes to stdout and succeeds.
pub fn report(parser: &Parser, err: argtree::Error) -> ExitCode {
    if err.is_help() {
        print!("{parser}");
        return ExitCode::SUCCESS;
    }
    eprintln!("{}", err.message());
    eprint!("{parser}");
    ExitCode::FAILURE
}

fn init_tracing(verbosity: u32) {
    let default = match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_flags_stop_at_the_command() {
        let mut global = Global::new();
        let argv = ["argtree-demo", "-vv", "--format", "json", "echo", "-v", "hi"]
            .map(String::from);
        let rest = global.parser.parse_cli(argv).unwrap();
        assert_eq!(rest, vec!["-v".to_string(), "hi".to_string()]);
        assert_eq!(global.parser.count(global.verbose), 2);
        assert_eq!(global.parser.get(&global.format), Some(&Format::Json));
        assert_eq!(global.parser.get(&global.command).map(String::as_str), Some("echo"));
    }

    #[test]
    fn config_only_overrides_present_fields() {
        let path = std::env::temp_dir().join(format!("argtree-demo-config-{}.json", std::process::id()));
        fs::write(&path, r#"{"long-separator": "="}"#).unwrap();

        let options = load_options(copy::default_options(), Some(&path)).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(options.long_prefix, "/");
        assert_eq!(options.long_separator, "=");
    }

    #[test]
    fn missing_config_is_an_error() {
        let path = PathBuf::from("/nonexistent/argtree-demo.json");
        let err = load_options(ParserOptions::default(), Some(&path)).unwrap_err();
        assert!(format!("{err:#}").contains("failed to read config"));
    }
}
