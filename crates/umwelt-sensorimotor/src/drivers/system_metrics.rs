// Copyright 2026 Umwelt Project Developers
// SPDX-License-Identifier: Apache-2.0

//! Built-in host vitals driver.
//!
//! Always available: every machine the subsystem runs on has a CPU, memory
//! and an uptime, which is why the service seeds this driver unconditionally
//! and why the `system` modality is perceivable from level 0.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use sysinfo::{Components, Networks, System};

use umwelt_structures::{Modality, RawInput, SystemMetrics, UmweltResult};

use super::{DetectReport, DriverConfig, SensorDriver};

pub const SYSTEM_SENSOR_ID: &str = "system";

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Cumulative byte counters captured at one poll, used to turn the next
/// poll's totals into rates.
#[derive(Debug, Clone, Copy)]
struct CounterSample {
    taken_at: Instant,
    disk_read_bytes: u64,
    disk_write_bytes: u64,
    network_bytes: u64,
}

/// Polls host vitals through `sysinfo` and emits one [`SystemMetrics`]
/// event per read.
///
/// Byte-rate channels (disk, network) need two samples to produce a value,
/// so the first read after a start reports zero rates. The counter sample
/// lives on the driver instance; two drivers never share rate state.
pub struct SystemMetricsDriver {
    config: DriverConfig,
    sys: System,
    last_sample: Option<CounterSample>,
}

impl SystemMetricsDriver {
    pub fn new() -> Self {
        Self::with_poll_interval(DEFAULT_POLL_INTERVAL)
    }

    pub fn with_poll_interval(poll_interval: Duration) -> Self {
        Self {
            config: DriverConfig::new(
                SYSTEM_SENSOR_ID,
                "Host vitals",
                Modality::System,
                poll_interval,
            ),
            sys: System::new_all(),
            last_sample: None,
        }
    }

    fn sample_metrics(&mut self) -> SystemMetrics {
        self.sys.refresh_all();

        let cpu_load_pct = self.sys.global_cpu_usage();

        let total_mem = self.sys.total_memory() as f32;
        let memory_used_pct = if total_mem > 0.0 {
            self.sys.used_memory() as f32 / total_mem * 100.0
        } else {
            0.0
        };

        let mut cpu_temp_c = 0.0;
        let components = Components::new_with_refreshed_list();
        for component in &components {
            if component.label().contains("CPU") || component.label().contains("Core") {
                cpu_temp_c = component.temperature();
                break;
            }
        }

        let uptime_hours = System::uptime() as f32 / 3600.0;
        let process_count = self.sys.processes().len();

        let mut disk_read_bytes = 0u64;
        let mut disk_write_bytes = 0u64;
        for process in self.sys.processes().values() {
            let usage = process.disk_usage();
            disk_read_bytes += usage.total_read_bytes;
            disk_write_bytes += usage.total_written_bytes;
        }

        let mut network_bytes = 0u64;
        let networks = Networks::new_with_refreshed_list();
        for (_name, data) in &networks {
            network_bytes += data.total_received() + data.total_transmitted();
        }

        let now = Instant::now();
        let sample = CounterSample {
            taken_at: now,
            disk_read_bytes,
            disk_write_bytes,
            network_bytes,
        };

        let (disk_read_kb_s, disk_write_kb_s, network_kb_s) = match self.last_sample {
            Some(prev) => {
                let elapsed = now.duration_since(prev.taken_at).as_secs_f32();
                if elapsed > 0.0 {
                    (
                        rate_kb_s(prev.disk_read_bytes, disk_read_bytes, elapsed),
                        rate_kb_s(prev.disk_write_bytes, disk_write_bytes, elapsed),
                        rate_kb_s(prev.network_bytes, network_bytes, elapsed),
                    )
                } else {
                    (0.0, 0.0, 0.0)
                }
            }
            None => (0.0, 0.0, 0.0),
        };
        self.last_sample = Some(sample);

        SystemMetrics {
            cpu_temp_c,
            memory_used_pct,
            cpu_load_pct,
            uptime_hours,
            process_count,
            disk_read_kb_s,
            disk_write_kb_s,
            network_kb_s,
        }
    }
}

impl Default for SystemMetricsDriver {
    fn default() -> Self {
        Self::new()
    }
}

// counters reset when processes exit, so a shrinking total clamps to zero
fn rate_kb_s(prev: u64, current: u64, elapsed_secs: f32) -> f32 {
    current.saturating_sub(prev) as f32 / 1024.0 / elapsed_secs
}

#[async_trait]
impl SensorDriver for SystemMetricsDriver {
    fn config(&self) -> &DriverConfig {
        &self.config
    }

    async fn detect(&mut self) -> DetectReport {
        DetectReport::detected().with_details(serde_json::json!({
            "os": System::name(),
            "kernel": System::kernel_version(),
            "cpus": self.sys.cpus().len(),
        }))
    }

    async fn start(&mut self) -> UmweltResult<()> {
        self.last_sample = None;
        Ok(())
    }

    async fn read(&mut self) -> UmweltResult<Option<RawInput>> {
        let metrics = self.sample_metrics();
        Ok(Some(RawInput::system(SYSTEM_SENSOR_ID, metrics)))
    }

    async fn stop(&mut self) -> UmweltResult<()> {
        Ok(())
    }
}
