//! Terminal session: raw mode + alternate screen around the poll loop, and the
//! demo agent the viewer can spawn for itself.

use std::{
    ffi::OsString,
    fs::OpenOptions,
    io,
    path::{Path, PathBuf},
    process::{Child, Command, Stdio},
    time::Duration,
};

use crossterm::{
    event::EventStream,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{info, warn};

use crate::config::ViewerConfig;
use crate::source::FileSource;
use crate::ui::TerminalRenderer;
use crate::update::UpdateLoop;

/// Runs the viewer until `q`. The terminal is restored even when the loop fails.
pub async fn run(cfg: &ViewerConfig) -> anyhow::Result<()> {
    info!(source = %cfg.source.display(), "starting viewer");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let renderer = TerminalRenderer::new(terminal, cfg.display.clone());
    let mut update = UpdateLoop::new(
        FileSource::new(cfg.source.clone()),
        renderer,
        cfg.loop_config(),
    );
    let res = update.run(EventStream::new()).await;

    // Teardown
    let mut renderer = update.into_renderer();
    disable_raw_mode()?;
    let terminal = renderer.terminal_mut();
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res.map_err(Into::into)
}

// --- Demo mode ---

/// Kills the spawned agent and removes its output file (and any half-written
/// `.tmp` sibling) on drop.
pub struct DemoGuard {
    child: Option<Child>,
    output: PathBuf,
}

impl DemoGuard {
    pub fn output(&self) -> &Path {
        &self.output
    }
}

impl Drop for DemoGuard {
    fn drop(&mut self) {
        if let Some(mut ch) = self.child.take() {
            let _ = ch.kill();
            let _ = ch.wait();
        }
        let _ = std::fs::remove_file(&self.output);
        let _ = std::fs::remove_file(tmp_sibling(&self.output));
    }
}

/// Name the agent writes to before renaming over `output`.
fn tmp_sibling(output: &Path) -> PathBuf {
    let mut name = output
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("sample"));
    name.push(".tmp");
    output.with_file_name(name)
}

pub fn demo_output_path() -> PathBuf {
    std::env::temp_dir().join(format!("ecview-demo-{}", std::process::id()))
}

/// The chart owns the terminal: the agent's stdout/stderr go to `log`
/// (discarded if it cannot be opened) and it only logs warnings.
pub fn demo_agent_command(agent: &Path, output: &Path, interval_ms: u64, log: &Path) -> Command {
    let mut cmd = Command::new(agent);
    cmd.arg("--output")
        .arg(output)
        .arg("--interval-ms")
        .arg(interval_ms.to_string())
        .env("RUST_LOG", "warn")
        .stdin(Stdio::null());

    let sink = OpenOptions::new().create(true).append(true).open(log);
    match sink.and_then(|f| Ok((f.try_clone()?, f))) {
        Ok((out, err)) => {
            cmd.stdout(out).stderr(err);
        }
        Err(_) => {
            cmd.stdout(Stdio::null()).stderr(Stdio::null());
        }
    }
    cmd
}

pub fn spawn_demo_agent(output: PathBuf, interval_ms: u64, log: &Path) -> io::Result<DemoGuard> {
    let candidate = find_agent_executable();
    let child = demo_agent_command(&candidate, &output, interval_ms, log)
        .spawn()
        .map_err(|e| {
            warn!("cannot start {}: {e}", candidate.display());
            e
        })?;
    // Give the agent a moment to write its first line
    std::thread::sleep(Duration::from_millis(300));
    Ok(DemoGuard {
        child: Some(child),
        output,
    })
}

fn find_agent_executable() -> PathBuf {
    #[cfg(windows)]
    let name = "ecview_agent.exe";
    #[cfg(not(windows))]
    let name = "ecview_agent";

    if let Some(parent) = std::env::current_exe().ok().as_deref().and_then(Path::parent) {
        let candidate = parent.join(name);
        if candidate.exists() {
            return candidate;
        }
    }
    // Fallback to relying on PATH
    PathBuf::from(name)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::ffi::OsStr;

    fn process_alive(pid: u32) -> bool {
        Command::new("kill")
            .arg("-0")
            .arg(pid.to_string())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }

    #[test]
    fn dropping_the_guard_stops_the_agent_and_cleans_up() {
        let td = tempfile::tempdir().unwrap();
        let output = td.path().join("feed");
        std::fs::write(&output, "1 2 3 4\n").unwrap();
        std::fs::write(tmp_sibling(&output), "2 3").unwrap();

        let child = Command::new("sleep").arg("30").spawn().expect("spawn sleep");
        let pid = child.id();
        assert!(process_alive(pid));

        let guard = DemoGuard {
            child: Some(child),
            output: output.clone(),
        };
        drop(guard);

        assert!(!process_alive(pid));
        assert!(!output.exists());
        assert!(!td.path().join("feed.tmp").exists());
    }

    #[test]
    fn agent_output_goes_to_the_log_not_the_terminal() {
        let td = tempfile::tempdir().unwrap();
        let log = td.path().join("ecview.log");
        let output = td.path().join("feed");

        // `echo` stands in for the agent: whatever it prints must land in the log
        let mut cmd = demo_agent_command(Path::new("echo"), &output, 250, &log);
        assert!(cmd.status().unwrap().success());
        let logged = std::fs::read_to_string(&log).unwrap();
        assert!(logged.contains("--output"), "{logged:?}");
        assert!(logged.contains("--interval-ms 250"), "{logged:?}");

        let rust_log = cmd
            .get_envs()
            .find(|(k, _)| *k == OsStr::new("RUST_LOG"))
            .and_then(|(_, v)| v);
        assert_eq!(rust_log, Some(OsStr::new("warn")));
    }
}
