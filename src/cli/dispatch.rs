//! Execution of parsed CLI commands. Logging and error reporting are
//! configured here so the binary entrypoint can stay thin.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use crate::cli::{Cli, Command};
use crate::error::{Error, Result};
use crate::generate::{self, Config};
use crate::logging::{LogFormat, LogOptions};
use crate::oracle::DescriptorOracle;
use crate::version;

/// Execute a parsed CLI invocation.
///
/// # Errors
/// Returns the first error raised while loading the descriptor, allocating
/// names, or writing the output.
pub fn run(cli: Cli) -> Result<()> {
    init_logging(&cli.log_options);

    match cli.command {
        Command::Help => {
            println!("{}", Cli::usage());
            Ok(())
        }
        Command::Version => {
            println!("{}", version::formatted());
            Ok(())
        }
        Command::Generate {
            source,
            selectors,
            out_file,
            pkg_name,
            remove_first,
            stub_impl,
            skip_ensure,
        } => {
            tracing::info!(
                source = %source.display(),
                interfaces = selectors.len(),
                stub = stub_impl,
                "generating mocks"
            );
            if remove_first {
                if let Some(path) = &out_file {
                    remove_output(path)?;
                }
            }
            let oracle = DescriptorOracle::load(&source)?;
            let cfg = Config {
                pkg_name,
                stub_impl,
                skip_ensure,
            };
            let rendered = generate::generate(&oracle, &cfg, &selectors)?;
            write_output(out_file.as_deref(), &rendered)
        }
    }
}

/// Print an error to stderr, including the captured backtrace in debug
/// builds.
pub fn report_error(err: &Error) {
    let mut out = io::stderr();
    if let Err(io_err) = report_error_to(err, &mut out) {
        let _ = writeln!(io::stderr(), "failed to report error: {io_err}");
    }
}

fn report_error_to(err: &Error, out: &mut dyn Write) -> io::Result<()> {
    writeln!(out, "{err}")?;
    if cfg!(debug_assertions) {
        if let Some(backtrace) = err.backtrace() {
            writeln!(out, "{backtrace}")?;
        }
    }
    Ok(())
}

fn init_logging(options: &LogOptions) {
    use std::io::IsTerminal;
    use std::sync::OnceLock;
    use tracing_subscriber::{EnvFilter, fmt};

    static INITIALISED: OnceLock<()> = OnceLock::new();

    let _ = INITIALISED.get_or_init(|| {
        let use_ansi = std::env::var_os("NO_COLOR").is_none() && std::io::stderr().is_terminal();
        let level = options.level.as_tracing_level();
        let make_filter = || {
            let directive = options.level.to_string();
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive))
        };

        match options.format {
            LogFormat::Json => {
                let subscriber = fmt::fmt()
                    .with_env_filter(make_filter())
                    .with_max_level(level)
                    .with_ansi(use_ansi)
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_level(true)
                    .json()
                    .finish();
                let _ = tracing::subscriber::set_global_default(subscriber);
            }
            LogFormat::Text => {
                let subscriber = fmt::fmt()
                    .with_env_filter(make_filter())
                    .with_max_level(level)
                    .with_ansi(use_ansi)
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_level(true)
                    .compact()
                    .finish();
                let _ = tracing::subscriber::set_global_default(subscriber);
            }
        }
    });
}

/// Remove a stale output file before generating. A missing file is not an
/// error; the descriptor load would otherwise fail if the stale mock breaks
/// the package.
fn remove_output(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => {
            tracing::debug!(path = %path.display(), "removed existing output file");
            Ok(())
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(Error::Io(err)),
    }
}

fn write_output(out_file: Option<&Path>, rendered: &str) -> Result<()> {
    match out_file {
        None => {
            io::stdout().write_all(rendered.as_bytes())?;
            Ok(())
        }
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)?;
                }
            }
            fs::write(path, rendered)?;
            tracing::info!(
                path = %path.display(),
                bytes = rendered.len(),
                "wrote generated source"
            );
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_output_creates_missing_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mocks/nested/store.go");
        write_output(Some(&path), "package mocks\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "package mocks\n");
    }

    #[test]
    fn remove_output_ignores_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.go");
        remove_output(&path).unwrap();

        fs::write(&path, "stale").unwrap();
        remove_output(&path).unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn report_error_to_prints_the_display_form() {
        let mut out = Vec::new();
        let err = Error::load("descriptor missing");
        report_error_to(&err, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("load error: descriptor missing"));
    }
}
