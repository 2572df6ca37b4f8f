/*!
Sensor service.

Owns the driver fleet and the input registry. Startup walks every enabled
driver through detect and start, registers the survivors, and gives each one
an independent polling task; a slow or broken driver degrades only its own
modality. Shutdown kills every polling task before any driver releases its
resources, so no read can land on a torn-down driver.

Copyright 2026 Umwelt Project Developers
Licensed under the Apache License, Version 2.0
*/

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::Mutex as AsyncMutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use umwelt_perception::{process_events, DEFAULT_MAX_CONTEXT_PERCEPTIONS};
use umwelt_structures::{
    CollectedPerceptions, Modality, PerceptionLevel, RawInput, Species, UmweltError, UmweltResult,
};

use crate::drivers::{SensorDriver, SystemMetricsDriver};
use crate::registry::{InputRegistry, SensorRecord};

/// Where a driver sits in its per-run lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverStatus {
    /// Known to the service, not yet probed this run.
    Registered,
    /// Skipped at startup without probing.
    Disabled,
    /// Probe said the source is missing; terminal for this run.
    Unavailable,
    /// `start` failed; terminal for this run.
    Failed,
    /// Started and being polled.
    Polling,
    Stopped,
}

impl fmt::Display for DriverStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DriverStatus::Registered => "registered",
            DriverStatus::Disabled => "disabled",
            DriverStatus::Unavailable => "unavailable",
            DriverStatus::Failed => "failed",
            DriverStatus::Polling => "polling",
            DriverStatus::Stopped => "stopped",
        };
        write!(f, "{}", s)
    }
}

/// Service tuning knobs.
#[derive(Debug, Clone, Copy)]
pub struct SensorServiceOptions {
    /// Upper bound on one driver read; a read that overruns is cancelled
    /// and counts as no data for that tick.
    pub read_timeout: Duration,
    /// Poll interval for the built-in host vitals driver.
    pub system_poll_interval: Duration,
    /// How many descriptions the context string may embed.
    pub max_context_perceptions: usize,
}

impl Default for SensorServiceOptions {
    fn default() -> Self {
        Self {
            read_timeout: Duration::from_millis(5000),
            system_poll_interval: Duration::from_millis(30_000),
            max_context_perceptions: DEFAULT_MAX_CONTEXT_PERCEPTIONS,
        }
    }
}

struct DriverSlot {
    id: String,
    driver: Arc<AsyncMutex<Box<dyn SensorDriver>>>,
    handle: Option<JoinHandle<()>>,
    status: DriverStatus,
    /// Set once `start` succeeded this run; only started drivers get a
    /// `stop` call at shutdown.
    started: bool,
}

/// Driver fleet plus registry, behind one synchronous mutex for registry
/// access and one async mutex per driver.
///
/// The registry mutex is never held across an await point.
pub struct SensorService {
    registry: Arc<Mutex<InputRegistry>>,
    slots: Vec<DriverSlot>,
    options: SensorServiceOptions,
    running: bool,
}

impl SensorService {
    /// A service seeded with the built-in host vitals driver.
    pub fn new() -> Self {
        Self::with_options(SensorServiceOptions::default())
    }

    pub fn with_options(options: SensorServiceOptions) -> Self {
        let mut service = Self {
            registry: Arc::new(Mutex::new(InputRegistry::new())),
            slots: Vec::new(),
            options,
            running: false,
        };
        service.add_driver(Box::new(SystemMetricsDriver::with_poll_interval(
            options.system_poll_interval,
        )));
        service
    }

    /// Register a driver with the fleet. Takes effect at the next
    /// `start_service`; a service already running does not probe it.
    pub fn add_driver(&mut self, driver: Box<dyn SensorDriver>) {
        let id = driver.config().id.clone();
        debug!("[SENSOR-SERVICE] driver '{}' registered", id);
        self.slots.push(DriverSlot {
            id,
            driver: Arc::new(AsyncMutex::new(driver)),
            handle: None,
            status: DriverStatus::Registered,
            started: false,
        });
    }

    /// Probe and start every enabled driver, then begin polling each one on
    /// its own timer.
    ///
    /// A driver that reports itself unavailable or fails to start is skipped
    /// for this run without affecting the others.
    ///
    /// # Returns
    /// * Ids of the drivers actually started
    pub async fn start_service(&mut self) -> UmweltResult<Vec<String>> {
        if self.running {
            return Err(UmweltError::AlreadyRunning);
        }

        let mut started = Vec::new();
        for slot in self.slots.iter_mut() {
            let (modality, poll_interval) = {
                let mut driver = slot.driver.lock().await;
                let config = driver.config();
                if !config.enabled {
                    debug!("[SENSOR-SERVICE] driver '{}' disabled, skipping", slot.id);
                    slot.status = DriverStatus::Disabled;
                    continue;
                }
                let modality = config.modality;
                let poll_interval = config.poll_interval;

                let report = driver.detect().await;
                if !report.available {
                    warn!(
                        "[SENSOR-SERVICE] driver '{}' unavailable: {}",
                        slot.id,
                        report.reason.as_deref().unwrap_or("no reason given")
                    );
                    slot.status = DriverStatus::Unavailable;
                    continue;
                }

                if let Err(e) = driver.start().await {
                    warn!("[SENSOR-SERVICE] driver '{}' failed to start: {}", slot.id, e);
                    slot.status = DriverStatus::Failed;
                    continue;
                }
                (modality, poll_interval)
            };

            {
                let mut registry = self.registry.lock();
                let taken = std::mem::take(&mut *registry);
                *registry = taken.register_sensor(slot.id.clone(), modality, "driver", true);
            }

            slot.started = true;
            slot.status = DriverStatus::Polling;
            slot.handle = Some(tokio::spawn(poll_loop(
                slot.id.clone(),
                Arc::clone(&slot.driver),
                Arc::clone(&self.registry),
                poll_interval,
                self.options.read_timeout,
            )));
            started.push(slot.id.clone());
        }

        self.running = true;
        info!(
            "[SENSOR-SERVICE] started with {} of {} drivers polling",
            started.len(),
            self.slots.len()
        );
        Ok(started)
    }

    /// Tear the run down: every polling task is cancelled and awaited before
    /// any driver's `stop` runs, so no read fires on a released source.
    /// Driver `stop` failures are logged and discarded.
    pub async fn stop_service(&mut self) -> UmweltResult<()> {
        if !self.running {
            return Err(UmweltError::NotRunning);
        }

        for slot in self.slots.iter_mut() {
            if let Some(handle) = slot.handle.take() {
                handle.abort();
                let _ = handle.await;
            }
        }

        for slot in self.slots.iter_mut() {
            if !slot.started {
                continue;
            }
            let mut driver = slot.driver.lock().await;
            if let Err(e) = driver.stop().await {
                debug!("[SENSOR-SERVICE] driver '{}' stop failed: {}", slot.id, e);
            }
            slot.started = false;
            slot.status = DriverStatus::Stopped;
        }

        self.running = false;
        info!("[SENSOR-SERVICE] stopped");
        Ok(())
    }

    /// Inject one event from a non-polled source (inbound text, a test
    /// harness). Upserts the source into the catalog as a direct sensor and
    /// queues the event.
    pub fn push_direct_input(&self, event: RawInput) {
        let mut registry = self.registry.lock();
        let taken = std::mem::take(&mut *registry);
        *registry = taken
            .register_sensor(event.source.clone(), event.modality, "direct", true)
            .push_input(event);
    }

    /// Drain everything queued since the last collection and turn it into
    /// species-filtered, window-modulated perceptions.
    ///
    /// Not idempotent: a second call with no intervening activity sees an
    /// empty batch and returns the fallback context.
    pub fn collect_perceptions(
        &self,
        species: Species,
        level: PerceptionLevel,
        growth_day: u32,
    ) -> CollectedPerceptions {
        let events = {
            let mut registry = self.registry.lock();
            let taken = std::mem::take(&mut *registry);
            let (events, rest) = taken.drain();
            *registry = rest;
            events
        };
        debug!(
            "[SENSOR-SERVICE] collecting {} queued events as {} at {}",
            events.len(),
            species,
            level
        );
        process_events(
            species,
            level,
            growth_day,
            &events,
            self.options.max_context_perceptions,
        )
    }

    pub fn driver_statuses(&self) -> Vec<(String, DriverStatus)> {
        self.slots
            .iter()
            .map(|slot| (slot.id.clone(), slot.status))
            .collect()
    }

    /// Catalog entry for one sensor id.
    ///
    /// # Errors
    /// * `SensorNotFound` when the id has never been registered
    pub fn sensor_record(&self, id: &str) -> UmweltResult<SensorRecord> {
        self.registry
            .lock()
            .sensor(id)
            .cloned()
            .ok_or_else(|| UmweltError::SensorNotFound(id.to_string()))
    }

    pub fn active_modality_count(&self) -> usize {
        self.registry.lock().active_modality_count()
    }

    pub fn registered_modalities(&self) -> Vec<Modality> {
        self.registry.lock().registered_modalities()
    }

    pub fn pending_input_count(&self) -> usize {
        self.registry.lock().pending_len()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn options(&self) -> &SensorServiceOptions {
        &self.options
    }
}

impl Default for SensorService {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for SensorService {
    fn drop(&mut self) {
        // async stop is unavailable here; killing the timers is the part
        // that must not be skipped
        for slot in self.slots.iter_mut() {
            if let Some(handle) = slot.handle.take() {
                handle.abort();
            }
        }
    }
}

/// One driver's polling task: read immediately, then on every interval.
///
/// A failed, empty, or overlong read contributes nothing for that tick and
/// never stops the timer.
async fn poll_loop(
    id: String,
    driver: Arc<AsyncMutex<Box<dyn SensorDriver>>>,
    registry: Arc<Mutex<InputRegistry>>,
    poll_interval: Duration,
    read_timeout: Duration,
) {
    loop {
        let outcome = {
            let mut guard = driver.lock().await;
            tokio::time::timeout(read_timeout, guard.read()).await
        };
        match outcome {
            Ok(Ok(Some(event))) => {
                let mut guard = registry.lock();
                let taken = std::mem::take(&mut *guard);
                *guard = taken.push_input(event);
            }
            Ok(Ok(None)) => {}
            Ok(Err(e)) => {
                debug!("[SENSOR-SERVICE] driver '{}' read failed: {}", id, e);
            }
            Err(_) => {
                debug!(
                    "[SENSOR-SERVICE] driver '{}' read exceeded {:?}, dropped",
                    id, read_timeout
                );
            }
        }
        tokio::time::sleep(poll_interval).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_default_matches_documented_values() {
        let options = SensorServiceOptions::default();
        assert_eq!(options.read_timeout, Duration::from_millis(5000));
        assert_eq!(options.system_poll_interval, Duration::from_secs(30));
        assert_eq!(options.max_context_perceptions, 12);
    }

    #[test]
    fn new_service_carries_the_system_driver() {
        let service = SensorService::new();
        let statuses = service.driver_statuses();
        assert_eq!(statuses.len(), 1);
        assert_eq!(statuses[0].0, "system");
        assert_eq!(statuses[0].1, DriverStatus::Registered);
        assert!(!service.is_running());
    }

    #[test]
    fn direct_input_registers_and_queues() {
        let service = SensorService::new();
        service.push_direct_input(RawInput::text("keeper", "good morning"));
        assert_eq!(service.pending_input_count(), 1);
        assert_eq!(service.active_modality_count(), 1);

        let record = service.sensor_record("keeper").unwrap();
        assert_eq!(record.source, "direct");
        assert!(record.has_produced_data);
        assert!(service.sensor_record("nobody").is_err());
    }

    #[test]
    fn collect_without_activity_yields_fallback() {
        let service = SensorService::new();
        let collected =
            service.collect_perceptions(Species::Chromatic, PerceptionLevel::ALL[2], 10);
        assert_eq!(collected.input_count, 0);
        assert!(collected.perceptions.is_empty());
        assert!(!collected.context.is_empty());
    }

    #[test]
    fn status_display_names() {
        assert_eq!(DriverStatus::Polling.to_string(), "polling");
        assert_eq!(DriverStatus::Unavailable.to_string(), "unavailable");
    }
}
