//! CLI front-end: argument parsing and dispatch used by the `mimic` binary.

pub mod dispatch;

use std::env;
use std::error::Error as StdError;
use std::fmt;
use std::path::PathBuf;

use crate::error::Error;
use crate::generate::Selector;
use crate::logging::{LogFormat, LogLevel, LogOptions};

/// Top-level commands supported by the `mimic` CLI.
#[derive(Debug, Clone)]
pub enum Command {
    Generate {
        source: PathBuf,
        selectors: Vec<Selector>,
        out_file: Option<PathBuf>,
        pkg_name: Option<String>,
        remove_first: bool,
        stub_impl: bool,
        skip_ensure: bool,
    },
    Help,
    Version,
}

/// Parsed CLI invocation.
#[derive(Debug, Clone)]
pub struct Cli {
    pub command: Command,
    pub log_options: LogOptions,
}

/// Error emitted while parsing command-line arguments.
#[derive(Debug, Clone)]
pub struct CliError {
    message: String,
}

impl CliError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn with_usage(message: impl Into<String>) -> Self {
        let mut owned = message.into();
        owned.push_str("\n\n");
        owned.push_str(&Cli::usage());
        Self::new(owned)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl StdError for CliError {}

impl Cli {
    /// Parse arguments from the environment.
    ///
    /// # Errors
    /// Returns a [`CliError`] when the arguments cannot be interpreted as a
    /// supported invocation.
    pub fn parse() -> Result<Self, CliError> {
        Self::parse_from(env::args().skip(1))
    }

    /// Parse arguments from an iterator (useful for testing).
    ///
    /// # Errors
    /// Returns a [`CliError`] when the provided iterator does not describe a
    /// valid invocation.
    pub fn parse_from<I, T>(args: I) -> Result<Self, CliError>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let mut iter = args.into_iter().map(Into::into);
        let mut out_file = None;
        let mut pkg_name = None;
        let mut remove_first = false;
        let mut stub_impl = false;
        let mut skip_ensure = false;
        let mut log_options = LogOptions::from_env();
        let mut positionals: Vec<String> = Vec::new();

        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--help" | "-h" | "help" => {
                    return Ok(Cli {
                        command: Command::Help,
                        log_options: LogOptions::from_env(),
                    });
                }
                "--version" | "-V" | "version" => {
                    return Ok(Cli {
                        command: Command::Version,
                        log_options: LogOptions::from_env(),
                    });
                }
                "--out" => {
                    out_file = Some(PathBuf::from(expect_value(&mut iter, "--out")?));
                }
                "--pkg" => {
                    pkg_name = Some(expect_value(&mut iter, "--pkg")?);
                }
                "--rm" => remove_first = true,
                "--stub" => stub_impl = true,
                "--skip-ensure" => skip_ensure = true,
                "--log-level" => {
                    let value = expect_value(&mut iter, "--log-level")?;
                    log_options.level = LogLevel::parse(&value).ok_or_else(|| {
                        CliError::new(format!("unknown log level '{value}'"))
                    })?;
                }
                "--log-format" => {
                    let value = expect_value(&mut iter, "--log-format")?;
                    log_options.format = LogFormat::parse(&value).ok_or_else(|| {
                        CliError::new(format!("unknown log format '{value}'"))
                    })?;
                }
                other if other.starts_with('-') && other.len() > 1 => {
                    return Err(CliError::with_usage(format!("unknown flag '{other}'")));
                }
                _ => positionals.push(arg),
            }
        }

        if positionals.is_empty() {
            return Err(CliError::with_usage("missing source directory"));
        }
        let source = PathBuf::from(positionals.remove(0));
        if positionals.is_empty() {
            return Err(CliError::with_usage(
                "missing interface name: expected at least one 'Interface' or 'Interface:Alias' argument",
            ));
        }
        let selectors = positionals
            .iter()
            .map(|raw| match Selector::parse(raw) {
                Ok(selector) => Ok(selector),
                Err(Error::Cli(err)) => Err(err),
                Err(other) => Err(CliError::new(other.to_string())),
            })
            .collect::<Result<Vec<_>, CliError>>()?;

        Ok(Cli {
            command: Command::Generate {
                source,
                selectors,
                out_file,
                pkg_name,
                remove_first,
                stub_impl,
                skip_ensure,
            },
            log_options,
        })
    }

    /// Return formatted general help text.
    #[must_use]
    pub fn usage() -> String {
        concat!(
            "mimic generates mock implementations of Go interfaces from a type-graph descriptor.\n",
            "\n",
            "Usage:\n",
            "  mimic [flags] <source-dir> <interface>[:<alias>] [<interface>[:<alias>] ...]\n",
            "\n",
            "The source directory must contain a typegraph.json descriptor (the path may\n",
            "also point at the descriptor file directly).\n",
            "\n",
            "Flags:\n",
            "  --out <file>         write the generated source to <file> instead of stdout\n",
            "  --pkg <name>         name of the generated package (default: the source package)\n",
            "  --rm                 remove the output file before generating\n",
            "  --stub               generate stubs returning zero values instead of mocks\n",
            "  --skip-ensure        omit the compile-time interface satisfaction check\n",
            "  --log-level <level>  error, warn, info, debug, or trace (default: warn)\n",
            "  --log-format <fmt>   text or json (default: text)\n",
            "  -h, --help           print this help\n",
            "  -V, --version        print version information\n",
        )
        .to_string()
    }
}

fn expect_value<I>(iter: &mut I, flag: &str) -> Result<String, CliError>
where
    I: Iterator<Item = String>,
{
    iter.next()
        .filter(|value| !value.starts_with("--"))
        .ok_or_else(|| CliError::with_usage(format!("expected value after {flag}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_minimal_generate_invocation() {
        let cli = Cli::parse_from(["./service", "Store"]).unwrap();
        match cli.command {
            Command::Generate {
                source,
                selectors,
                out_file,
                pkg_name,
                remove_first,
                stub_impl,
                skip_ensure,
            } => {
                assert_eq!(source, PathBuf::from("./service"));
                assert_eq!(selectors.len(), 1);
                assert_eq!(selectors[0].interface, "Store");
                assert_eq!(selectors[0].alias, None);
                assert_eq!(out_file, None);
                assert_eq!(pkg_name, None);
                assert!(!remove_first);
                assert!(!stub_impl);
                assert!(!skip_ensure);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_all_generate_flags_and_aliases() {
        let cli = Cli::parse_from([
            "--out",
            "mocks/store.go",
            "--pkg",
            "mocks",
            "--rm",
            "--stub",
            "--skip-ensure",
            "./service",
            "Store:FakeStore",
            "Closer",
        ])
        .unwrap();
        match cli.command {
            Command::Generate {
                source,
                selectors,
                out_file,
                pkg_name,
                remove_first,
                stub_impl,
                skip_ensure,
            } => {
                assert_eq!(source, PathBuf::from("./service"));
                assert_eq!(out_file, Some(PathBuf::from("mocks/store.go")));
                assert_eq!(pkg_name.as_deref(), Some("mocks"));
                assert!(remove_first);
                assert!(stub_impl);
                assert!(skip_ensure);
                assert_eq!(selectors.len(), 2);
                assert_eq!(selectors[0].interface, "Store");
                assert_eq!(selectors[0].alias.as_deref(), Some("FakeStore"));
                assert_eq!(selectors[1].interface, "Closer");
                assert_eq!(selectors[1].alias, None);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn flags_may_follow_positionals() {
        let cli = Cli::parse_from(["./service", "Store", "--stub"]).unwrap();
        match cli.command {
            Command::Generate { stub_impl, .. } => assert!(stub_impl),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn help_and_version_win_over_other_arguments() {
        let cli = Cli::parse_from(["--help"]).unwrap();
        assert!(matches!(cli.command, Command::Help));
        let cli = Cli::parse_from(["./service", "Store", "-h"]).unwrap();
        assert!(matches!(cli.command, Command::Help));
        let cli = Cli::parse_from(["--version"]).unwrap();
        assert!(matches!(cli.command, Command::Version));
        let cli = Cli::parse_from(["version"]).unwrap();
        assert!(matches!(cli.command, Command::Version));
    }

    #[test]
    fn missing_positionals_produce_usage_errors() {
        let err = Cli::parse_from(std::iter::empty::<String>()).unwrap_err();
        assert!(err.to_string().contains("missing source directory"));
        let err = Cli::parse_from(["./service"]).unwrap_err();
        assert!(err.to_string().contains("missing interface name"));
    }

    #[test]
    fn unknown_flags_are_rejected() {
        let err = Cli::parse_from(["--frobnicate", "./service", "Store"]).unwrap_err();
        assert!(err.to_string().contains("unknown flag '--frobnicate'"));
    }

    #[test]
    fn flag_values_must_be_present() {
        let err = Cli::parse_from(["--out"]).unwrap_err();
        assert!(err.to_string().contains("expected value after --out"));
        let err = Cli::parse_from(["--pkg", "--rm", "./service", "Store"]).unwrap_err();
        assert!(err.to_string().contains("expected value after --pkg"));
    }

    #[test]
    fn empty_selector_parts_are_rejected() {
        let err = Cli::parse_from(["./service", "Store:"]).unwrap_err();
        assert!(err.to_string().contains("invalid interface selector"));
        let err = Cli::parse_from(["./service", ":Alias"]).unwrap_err();
        assert!(err.to_string().contains("invalid interface selector"));
    }

    #[test]
    fn log_flags_override_defaults() {
        let cli = Cli::parse_from([
            "--log-level",
            "debug",
            "--log-format",
            "json",
            "./service",
            "Store",
        ])
        .unwrap();
        assert_eq!(cli.log_options.level, LogLevel::Debug);
        assert_eq!(cli.log_options.format, LogFormat::Json);
        let err = Cli::parse_from(["--log-level", "chatty", "./service", "Store"]).unwrap_err();
        assert!(err.to_string().contains("unknown log level 'chatty'"));
    }
}
