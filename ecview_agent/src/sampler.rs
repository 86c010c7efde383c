//! One sampling step: CPU utilisation, reference power and both estimates.

use std::path::Path;

use sysinfo::System;
use tracing::{info, warn};

use crate::estimator::{AdaptiveCpu, MinMaxCpu};
use crate::power::RaplMeter;

#[derive(Debug, Clone, Copy)]
pub struct SamplerConfig {
    pub pmin: f64,
    pub pmax: f64,
    /// Steps between two recalibrations of the adaptive model.
    pub recalibrate_every: u64,
    /// Observations the adaptive model is fitted on.
    pub calibration_len: usize,
}

/// Values written for one step, in output order after the timestamp.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    pub wattmeter: f64,
    pub cpu_minmax: f64,
    pub cpu_adapt: f64,
}

impl Reading {
    pub fn line(&self, t: f64) -> String {
        format!(
            "{t:.3} {:.3} {:.3} {:.3}\n",
            self.wattmeter, self.cpu_minmax, self.cpu_adapt
        )
    }
}

pub struct Sampler {
    sys: System,
    meter: Option<RaplMeter>,
    minmax: MinMaxCpu,
    adapt: AdaptiveCpu,
    recalibrate_every: u64,
    steps: u64,
}

impl Sampler {
    pub fn new(cfg: SamplerConfig, rapl_root: &Path) -> Self {
        let meter = match RaplMeter::open(rapl_root) {
            Ok(m) => Some(m),
            Err(e) => {
                warn!(
                    "no RAPL counter at {} ({e}); using the min/max estimate as reference",
                    rapl_root.display()
                );
                None
            }
        };
        let mut sys = System::new();
        sys.refresh_cpu_usage();
        Self {
            sys,
            meter,
            minmax: MinMaxCpu::new(cfg.pmin, cfg.pmax),
            adapt: AdaptiveCpu::new([cfg.pmin, cfg.pmax - cfg.pmin], cfg.calibration_len),
            recalibrate_every: cfg.recalibrate_every.max(1),
            steps: 0,
        }
    }

    /// CPU utilisation in `0.0..=1.0` since the previous refresh.
    fn cpu_utilisation(&mut self) -> f64 {
        self.sys.refresh_cpu_usage();
        f64::from(self.sys.global_cpu_usage()) / 100.0
    }

    pub fn step(&mut self) -> Reading {
        let util = self.cpu_utilisation();
        let cpu_minmax = self.minmax.estimate(util);
        let measured = self.meter.as_mut().and_then(|m| match m.read_watts() {
            Ok(w) => w,
            Err(e) => {
                warn!("RAPL read failed: {e}");
                None
            }
        });
        let wattmeter = measured.unwrap_or(cpu_minmax);
        // Fit on measured power only; the min/max fallback is used for
        // training only when there is no meter at all
        if measured.is_some() || self.meter.is_none() {
            self.adapt.observe(util, wattmeter);
        }

        self.steps += 1;
        if self.steps % self.recalibrate_every == 0 {
            if self.adapt.calibrate() {
                let [w0, w1] = self.adapt.weights();
                info!(w0, w1, points = self.adapt.observed(), "adaptive model recalibrated");
            } else {
                info!("recalibration skipped: not enough utilisation variance");
            }
        }

        Reading {
            wattmeter,
            cpu_minmax,
            cpu_adapt: self.adapt.estimate(util),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_is_timestamp_then_three_series() {
        let r = Reading {
            wattmeter: 30.0,
            cpu_minmax: 20.5,
            cpu_adapt: 21.25,
        };
        assert_eq!(r.line(7.0), "7.000 30.000 20.500 21.250\n");
    }

    #[test]
    fn without_rapl_the_reference_is_the_minmax_estimate() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = Sampler::new(
            SamplerConfig {
                pmin: 10.0,
                pmax: 20.0,
                recalibrate_every: 2,
                calibration_len: 4,
            },
            dir.path(),
        );
        for _ in 0..3 {
            let r = s.step();
            assert_eq!(r.wattmeter, r.cpu_minmax);
            assert!((10.0..=20.0).contains(&r.cpu_minmax));
            assert!(r.cpu_adapt.is_finite());
        }
        assert_eq!(s.adapt.observed(), 3);
    }

    #[test]
    fn first_rapl_step_is_not_used_for_fitting() {
        let dir = tempfile::tempdir().unwrap();
        let energy = dir.path().join("energy_uj");
        std::fs::write(&energy, "1000000\n").unwrap();
        std::fs::write(dir.path().join("max_energy_range_uj"), "262143328850\n").unwrap();
        let mut s = Sampler::new(
            SamplerConfig {
                pmin: 10.0,
                pmax: 20.0,
                recalibrate_every: 100,
                calibration_len: 4,
            },
            dir.path(),
        );

        // No previous counter value yet: the reference falls back to min/max
        let r = s.step();
        assert_eq!(r.wattmeter, r.cpu_minmax);
        assert_eq!(s.adapt.observed(), 0);

        std::thread::sleep(std::time::Duration::from_millis(20));
        std::fs::write(&energy, "2000000\n").unwrap();
        let r = s.step();
        assert!(r.wattmeter > 0.0);
        assert_eq!(s.adapt.observed(), 1);
    }
}
