//! ecview_agent: samples CPU load and package power once per step and rewrites
//! the sample file ecview polls.

mod estimator;
mod output;
mod power;
mod sampler;

use std::{
    io::IsTerminal,
    path::{Path, PathBuf},
    process::ExitCode,
    time::Duration,
};

use thiserror::Error;
use tokio::time::{interval, Instant, MissedTickBehavior};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use estimator::{DEFAULT_PMAX, DEFAULT_PMIN};
use power::RAPL_ROOT;
use sampler::{Sampler, SamplerConfig};

const DEFAULT_OUTPUT: &str = "/tmp/libec_daemon_demo";
const USAGE: &str = "Usage: ecview_agent [--output PATH|-o PATH] [--interval-ms N] [--pmin W] [--pmax W] [--recalibrate-secs N] [--calibration-secs N]";

#[derive(Debug, Error, PartialEq)]
enum ArgsError {
    #[error("{usage}", usage = USAGE)]
    Help,
    #[error("{flag} expects a value\n{usage}", usage = USAGE)]
    BadValue { flag: String },
    #[error("Unexpected argument {0}\n{usage}", usage = USAGE)]
    Unexpected(String),
}

#[derive(Debug, Clone, PartialEq)]
struct AgentArgs {
    output: PathBuf,
    interval: Duration,
    pmin: f64,
    pmax: f64,
    recalibrate_secs: u64,
    calibration_secs: u64,
}

impl Default for AgentArgs {
    fn default() -> Self {
        Self {
            output: PathBuf::from(DEFAULT_OUTPUT),
            interval: Duration::from_secs(1),
            pmin: DEFAULT_PMIN,
            pmax: DEFAULT_PMAX,
            recalibrate_secs: 30,
            calibration_secs: 10,
        }
    }
}

impl AgentArgs {
    fn sampler_config(&self) -> SamplerConfig {
        let step = self.interval.as_secs_f64().max(1e-3);
        let steps = |secs: u64| ((secs as f64 / step).round() as u64).max(1);
        SamplerConfig {
            pmin: self.pmin,
            pmax: self.pmax,
            recalibrate_every: steps(self.recalibrate_secs),
            calibration_len: steps(self.calibration_secs).max(2) as usize,
        }
    }
}

fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<AgentArgs, ArgsError> {
    let mut it = args.into_iter();
    let _ = it.next(); // program name
    let mut out = AgentArgs::default();

    fn value<T: std::str::FromStr>(flag: &str, v: Option<String>) -> Result<T, ArgsError> {
        v.and_then(|s| s.parse().ok()).ok_or_else(|| ArgsError::BadValue {
            flag: flag.to_string(),
        })
    }

    while let Some(a) = it.next() {
        let (flag, inline) = match a.split_once('=') {
            Some((f, v)) if f.starts_with("--") => (f.to_string(), Some(v.to_string())),
            _ => (a.clone(), None),
        };
        let mut next = || inline.clone().or_else(|| it.next());
        match flag.as_str() {
            "-h" | "--help" => return Err(ArgsError::Help),
            "--output" | "-o" => out.output = value::<PathBuf>(&flag, next())?,
            "--interval-ms" => {
                let ms: u64 = value(&flag, next())?;
                if ms == 0 {
                    return Err(ArgsError::BadValue { flag: flag.clone() });
                }
                out.interval = Duration::from_millis(ms);
            }
            "--pmin" => out.pmin = value(&flag, next())?,
            "--pmax" => out.pmax = value(&flag, next())?,
            "--recalibrate-secs" => out.recalibrate_secs = value(&flag, next())?,
            "--calibration-secs" => out.calibration_secs = value(&flag, next())?,
            _ => return Err(ArgsError::Unexpected(a)),
        }
    }
    Ok(out)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    let args = match parse_args(std::env::args()) {
        Ok(a) => a,
        Err(ArgsError::Help) => {
            eprintln!("{USAGE}");
            return Ok(ExitCode::SUCCESS);
        }
        Err(e) => {
            eprintln!("{e}");
            return Ok(ExitCode::from(2));
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .init();

    info!(
        output = %args.output.display(),
        interval_ms = args.interval.as_millis() as u64,
        "agent writing samples"
    );

    let mut sampler = Sampler::new(args.sampler_config(), Path::new(RAPL_ROOT));
    let start = Instant::now();
    let mut ticker = interval(args.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately; skip it so CPU usage has a baseline
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let t = start.elapsed().as_secs_f64();
                let reading = sampler.step();
                if let Err(e) = output::write_sample(&args.output, &reading.line(t)) {
                    error!("cannot write {}: {e}", args.output.display());
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("interrupted, exiting");
                break;
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}
