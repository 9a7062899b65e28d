//! dunit command line
//!
//! Parses quantity strings and optionally converts them:
//!
//! ```text
//! dunit "5'6\"" --to cm        # 167.640cm
//! echo "1m 50cm" | dunit        # 1.50m
//! ```
//!
//! Environment:
//! - DUNIT_UNITS_PATH: extra unit definition file (JSON array of records)
//! - RUST_LOG: log filter, default "warn"

use std::env;
use std::io::{self, BufRead};
use std::path::PathBuf;
use std::process::ExitCode;

use dunit::{Registry, UnitError};
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: dunit [--to <unit>] [--no-defaults] [quantity text...]";

/// Parsed command line
#[derive(Debug, Default, PartialEq)]
struct Args {
    text: Option<String>,
    target: Option<String>,
    no_defaults: bool,
    help: bool,
}

impl Args {
    fn parse<I: IntoIterator<Item = String>>(args: I) -> Result<Self, String> {
        let mut parsed = Args::default();
        let mut words = Vec::new();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--to" | "-t" => {
                    let unit = args.next().ok_or_else(|| format!("{} needs a unit", arg))?;
                    parsed.target = Some(unit);
                }
                "--no-defaults" => parsed.no_defaults = true,
                "--help" | "-h" => parsed.help = true,
                other if other.starts_with("--") => return Err(format!("unknown option {}", other)),
                _ => words.push(arg),
            }
        }

        if !words.is_empty() {
            parsed.text = Some(words.join(" "));
        }
        Ok(parsed)
    }
}

/// Extra unit file from the environment
fn units_path() -> Option<PathBuf> {
    env::var_os("DUNIT_UNITS_PATH").map(PathBuf::from)
}

fn build_registry(args: &Args) -> Result<Registry, UnitError> {
    let mut registry = Registry::new(!args.no_defaults)?;
    if let Some(path) = units_path() {
        registry.load_file(&path)?;
    }
    debug!(units = registry.len(), "registry ready");
    Ok(registry)
}

/// Parse one line and render it, converted if a target was given
fn evaluate(registry: &Registry, text: &str, target: Option<&str>) -> Result<String, UnitError> {
    let quantity = registry.parse_quantity(text)?;
    match target {
        Some(unit) => Ok(quantity.to(unit)?.to_string()),
        None => Ok(quantity.to_string()),
    }
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let args = match Args::parse(env::args().skip(1)) {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{}\n{}", message, USAGE);
            return ExitCode::from(2);
        }
    };

    if args.help {
        println!("{}", USAGE);
        return ExitCode::SUCCESS;
    }

    let registry = match build_registry(&args) {
        Ok(registry) => registry,
        Err(e) => {
            error!(error = %e, "failed to load unit definitions");
            return ExitCode::FAILURE;
        }
    };

    let target = args.target.as_deref();
    let lines: Box<dyn Iterator<Item = io::Result<String>>> = match &args.text {
        Some(text) => Box::new(std::iter::once(Ok(text.clone()))),
        None => Box::new(io::stdin().lock().lines()),
    };

    let mut failed = false;
    for line in lines {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                error!(error = %e, "failed to read input");
                return ExitCode::FAILURE;
            }
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match evaluate(&registry, line, target) {
            Ok(rendered) => println!("{}", rendered),
            Err(e) => {
                eprintln!("{}: {}", line, e);
                failed = true;
            }
        }
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Result<Args, String> {
        Args::parse(list.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_parse_args() {
        let parsed = args(&["1m", "50cm", "--to", "cm"]).unwrap();
        assert_eq!(parsed.text.as_deref(), Some("1m 50cm"));
        assert_eq!(parsed.target.as_deref(), Some("cm"));
        assert!(!parsed.no_defaults);

        let parsed = args(&["--no-defaults"]).unwrap();
        assert!(parsed.no_defaults);
        assert_eq!(parsed.text, None);
    }

    #[test]
    fn test_parse_args_errors() {
        assert!(args(&["--to"]).is_err());
        assert!(args(&["--verbose"]).is_err());
        assert!(args(&["-h"]).unwrap().help);
    }

    #[test]
    fn test_evaluate() {
        let registry = Registry::new(true).unwrap();
        assert_eq!(evaluate(&registry, "1m 50cm", None).unwrap(), "1.50m");
        assert_eq!(evaluate(&registry, "1m 50cm", Some("cm")).unwrap(), "150cm");
        assert_eq!(evaluate(&registry, "5'6\"", Some("in")).unwrap(), "66.0in");
        assert!(matches!(evaluate(&registry, "3 m", Some("kg")), Err(UnitError::IncompatibleDimension { .. })));
        assert!(matches!(evaluate(&registry, "nothing here", None), Err(UnitError::NoQuantityFound(_))));
    }
}
