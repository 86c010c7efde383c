//! Entry point for the ecview TUI. Parses args, resolves config and runs the viewer.

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use ecview::app::{demo_output_path, run, spawn_demo_agent};
use ecview::config::{default_config_path, load_config, save_config, ViewerConfig};
use ecview::logging;

const USAGE: &str = "Usage: {prog} [--config PATH|-c PATH] [--interval-ms N] [--window N] [--log PATH] [--init-config] [--demo] [SOURCE_FILE]";

#[derive(Debug, Default, PartialEq)]
struct ParsedArgs {
    config: Option<PathBuf>,
    source: Option<PathBuf>,
    interval_ms: Option<u64>,
    window: Option<usize>,
    log: Option<PathBuf>,
    init_config: bool,
    demo: bool,
}

#[derive(Debug, PartialEq)]
enum ArgsError {
    Help(String),
    Invalid(String),
}

fn usage(prog: &str) -> String {
    USAGE.replace("{prog}", prog)
}

fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<ParsedArgs, ArgsError> {
    let mut it = args.into_iter();
    let prog = it.next().unwrap_or_else(|| "ecview".into());
    let mut out = ParsedArgs::default();

    fn number<T: std::str::FromStr>(flag: &str, v: Option<String>, prog: &str) -> Result<T, ArgsError> {
        v.as_deref()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| ArgsError::Invalid(format!("{flag} expects a number\n{}", usage(prog))))
    }

    while let Some(arg) = it.next() {
        match arg.as_str() {
            "-h" | "--help" => return Err(ArgsError::Help(usage(&prog))),
            "--config" | "-c" => out.config = it.next().map(PathBuf::from),
            "--interval-ms" => out.interval_ms = Some(number("--interval-ms", it.next(), &prog)?),
            "--window" => out.window = Some(number("--window", it.next(), &prog)?),
            "--log" => out.log = it.next().map(PathBuf::from),
            "--init-config" => out.init_config = true,
            "--demo" => out.demo = true,
            _ if arg.starts_with("--config=") => {
                if let Some((_, v)) = arg.split_once('=') {
                    if !v.is_empty() {
                        out.config = Some(PathBuf::from(v));
                    }
                }
            }
            _ if arg.starts_with("--interval-ms=") => {
                let v = arg.split_once('=').map(|(_, v)| v.to_string());
                out.interval_ms = Some(number("--interval-ms", v, &prog)?);
            }
            _ if arg.starts_with("--window=") => {
                let v = arg.split_once('=').map(|(_, v)| v.to_string());
                out.window = Some(number("--window", v, &prog)?);
            }
            _ if arg.starts_with('-') => {
                return Err(ArgsError::Invalid(format!(
                    "Unknown option {arg}\n{}",
                    usage(&prog)
                )));
            }
            _ => {
                if out.source.is_none() {
                    out.source = Some(PathBuf::from(arg));
                } else {
                    return Err(ArgsError::Invalid(format!(
                        "Unexpected argument. {}",
                        usage(&prog)
                    )));
                }
            }
        }
    }
    Ok(out)
}

/// File config first, CLI on top.
fn resolve(parsed: &ParsedArgs) -> anyhow::Result<(PathBuf, ViewerConfig)> {
    let path = parsed.config.clone().unwrap_or_else(default_config_path);
    let mut cfg = load_config(&path)?;
    if let Some(src) = &parsed.source {
        cfg.source = src.clone();
    }
    if let Some(ms) = parsed.interval_ms {
        cfg.interval_ms = ms;
    }
    if let Some(w) = parsed.window {
        cfg.window = w;
    }
    cfg.validate()?;
    Ok((path, cfg))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    let parsed = match parse_args(env::args()) {
        Ok(v) => v,
        Err(ArgsError::Help(msg)) => {
            eprintln!("{msg}");
            return Ok(ExitCode::SUCCESS);
        }
        Err(ArgsError::Invalid(msg)) => {
            eprintln!("{msg}");
            return Ok(ExitCode::from(2));
        }
    };

    let (config_path, mut cfg) = resolve(&parsed)?;

    if parsed.init_config {
        save_config(&config_path, &cfg)?;
        eprintln!("wrote {}", config_path.display());
        return Ok(ExitCode::SUCCESS);
    }

    let log_path = parsed.log.clone().unwrap_or_else(logging::default_log_path);
    logging::init(&log_path);

    // Demo mode: view the output of a freshly spawned agent
    let _demo = if parsed.demo {
        let guard = spawn_demo_agent(demo_output_path(), cfg.interval_ms, &log_path)?;
        cfg.source = guard.output().to_path_buf();
        Some(guard)
    } else {
        None
    };

    run(&cfg).await?;
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("ecview")
            .chain(list.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn positional_source_and_overrides() {
        let p = parse_args(args(&["--interval-ms", "250", "--window=3", "/tmp/feed"])).unwrap();
        assert_eq!(p.source, Some(PathBuf::from("/tmp/feed")));
        assert_eq!(p.interval_ms, Some(250));
        assert_eq!(p.window, Some(3));
        assert!(!p.demo);
    }

    #[test]
    fn config_long_short_and_assign() {
        for a in [
            args(&["--config", "a.json"]),
            args(&["-c", "a.json"]),
            args(&["--config=a.json"]),
        ] {
            assert_eq!(parse_args(a).unwrap().config, Some(PathBuf::from("a.json")));
        }
    }

    #[test]
    fn bad_number_and_unknown_flag_are_rejected() {
        assert!(matches!(
            parse_args(args(&["--window", "many"])),
            Err(ArgsError::Invalid(_))
        ));
        assert!(matches!(
            parse_args(args(&["--frobnicate"])),
            Err(ArgsError::Invalid(_))
        ));
        assert!(matches!(
            parse_args(args(&["a", "b"])),
            Err(ArgsError::Invalid(_))
        ));
    }

    #[test]
    fn help_wins() {
        match parse_args(args(&["--demo", "--help"])) {
            Err(ArgsError::Help(msg)) => assert!(msg.starts_with("Usage: ecview")),
            other => panic!("expected help, got {other:?}"),
        }
    }

    #[test]
    fn cli_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"window": 50, "interval_ms": 2000}"#).unwrap();
        let parsed = ParsedArgs {
            config: Some(path),
            window: Some(7),
            ..Default::default()
        };
        let (_, cfg) = resolve(&parsed).unwrap();
        assert_eq!(cfg.window, 7);
        assert_eq!(cfg.interval_ms, 2000);
    }
}
