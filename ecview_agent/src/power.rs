//! Package power from the Linux RAPL energy counter.

use std::{
    fs, io,
    path::{Path, PathBuf},
    time::Instant,
};

pub const RAPL_ROOT: &str = "/sys/class/powercap/intel-rapl:0";

/// Turns a cumulative microjoule counter into watts between two reads.
pub struct RaplMeter {
    energy_path: PathBuf,
    max_range_uj: u64,
    last: Option<(u64, Instant)>,
}

impl RaplMeter {
    /// Fails when the counter is missing or unreadable (no RAPL, no permission).
    pub fn open(root: &Path) -> io::Result<Self> {
        let energy_path = root.join("energy_uj");
        read_u64(&energy_path)?;
        let max_range_uj = read_u64(&root.join("max_energy_range_uj")).unwrap_or(u64::MAX);
        Ok(Self {
            energy_path,
            max_range_uj,
            last: None,
        })
    }

    /// Average watts since the previous call; `None` on the first call.
    pub fn read_watts(&mut self) -> io::Result<Option<f64>> {
        let now = Instant::now();
        let energy = read_u64(&self.energy_path)?;
        let watts = self.last.and_then(|(prev, at)| {
            let dt = now.duration_since(at).as_secs_f64();
            (dt > 0.0).then(|| energy_delta(prev, energy, self.max_range_uj) as f64 / 1e6 / dt)
        });
        self.last = Some((energy, now));
        Ok(watts)
    }
}

/// Counter difference, accounting for a single wrap at `max_range`.
pub fn energy_delta(prev: u64, now: u64, max_range: u64) -> u64 {
    if now >= prev {
        now - prev
    } else {
        max_range.saturating_sub(prev).saturating_add(now)
    }
}

fn read_u64(path: &Path) -> io::Result<u64> {
    fs::read_to_string(path)?
        .trim()
        .parse()
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}
