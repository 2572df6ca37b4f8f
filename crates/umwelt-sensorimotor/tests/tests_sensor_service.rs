//! Tests for the sensor service lifecycle
//!
//! Tests cover:
//! - Startup fan-out (detect, start, skip rules per driver)
//! - Independent polling timers feeding the registry
//! - Drain semantics through collect_perceptions
//! - Shutdown ordering (timers die before drivers are stopped)
//! - Read timeout isolation for stuck drivers
//!
//! All timing runs on tokio's paused test clock, so tick counts are exact.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use umwelt_perception::FALLBACK_CONTEXT;
use umwelt_sensorimotor::drivers::{DetectReport, DriverConfig, SensorDriver};
use umwelt_sensorimotor::service::{DriverStatus, SensorService, SensorServiceOptions};
use umwelt_structures::{
    Modality, PerceptionLevel, RawInput, ScalarReading, Species, UmweltError, UmweltResult,
};

#[derive(Default)]
struct DriverProbes {
    detects: AtomicUsize,
    starts: AtomicUsize,
    reads: AtomicUsize,
    stops: AtomicUsize,
}

impl DriverProbes {
    fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

/// Deterministic in-memory driver: every read yields one scalar event
/// stamped with a running counter.
struct ScriptedDriver {
    config: DriverConfig,
    available: bool,
    fail_start: bool,
    read_delay: Option<Duration>,
    probes: Arc<DriverProbes>,
}

impl ScriptedDriver {
    fn new(id: &str, modality: Modality, poll_ms: u64) -> (Self, Arc<DriverProbes>) {
        let probes = Arc::new(DriverProbes::default());
        let driver = Self {
            config: DriverConfig::new(id, id, modality, Duration::from_millis(poll_ms)),
            available: true,
            fail_start: false,
            read_delay: None,
            probes: Arc::clone(&probes),
        };
        (driver, probes)
    }

    fn disabled(mut self) -> Self {
        self.config.enabled = false;
        self
    }

    fn unavailable(mut self) -> Self {
        self.available = false;
        self
    }

    fn failing_start(mut self) -> Self {
        self.fail_start = true;
        self
    }

    fn with_read_delay(mut self, delay: Duration) -> Self {
        self.read_delay = Some(delay);
        self
    }
}

#[async_trait]
impl SensorDriver for ScriptedDriver {
    fn config(&self) -> &DriverConfig {
        &self.config
    }

    async fn detect(&mut self) -> DetectReport {
        self.probes.detects.fetch_add(1, Ordering::SeqCst);
        if self.available {
            DetectReport::detected()
        } else {
            DetectReport::missing("scripted as absent")
        }
    }

    async fn start(&mut self) -> UmweltResult<()> {
        self.probes.starts.fetch_add(1, Ordering::SeqCst);
        if self.fail_start {
            Err(UmweltError::driver(&self.config.id, "scripted start failure"))
        } else {
            Ok(())
        }
    }

    async fn read(&mut self) -> UmweltResult<Option<RawInput>> {
        if let Some(delay) = self.read_delay {
            tokio::time::sleep(delay).await;
        }
        let n = self.probes.reads.fetch_add(1, Ordering::SeqCst);
        Ok(Some(RawInput::scalar(
            self.config.modality,
            self.config.id.clone(),
            ScalarReading::steady(20.0 + n as f64, "u"),
        )))
    }

    async fn stop(&mut self) -> UmweltResult<()> {
        self.probes.stops.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Options that park the built-in system driver far in the virtual future
/// so it contributes exactly one event at startup.
fn quiet_system_options() -> SensorServiceOptions {
    SensorServiceOptions {
        system_poll_interval: Duration::from_secs(3600),
        ..Default::default()
    }
}

fn status_of(service: &SensorService, id: &str) -> DriverStatus {
    service
        .driver_statuses()
        .into_iter()
        .find(|(slot_id, _)| slot_id == id)
        .map(|(_, status)| status)
        .unwrap_or_else(|| panic!("driver '{}' not listed", id))
}

mod test_startup {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn start_reports_started_ids_and_polling_status() {
        let mut service = SensorService::with_options(quiet_system_options());
        let (driver, _probes) = ScriptedDriver::new("therm-1", Modality::Temperature, 100);
        service.add_driver(Box::new(driver));

        let started = service.start_service().await.unwrap();
        assert_eq!(started, vec!["system".to_string(), "therm-1".to_string()]);
        assert!(service.is_running());
        assert_eq!(status_of(&service, "therm-1"), DriverStatus::Polling);
        assert_eq!(status_of(&service, "system"), DriverStatus::Polling);

        match service.start_service().await {
            Err(UmweltError::AlreadyRunning) => {}
            other => panic!("expected AlreadyRunning, got {:?}", other.map(|_| ())),
        }

        service.stop_service().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn broken_drivers_are_skipped_without_affecting_the_rest() {
        let mut service = SensorService::with_options(quiet_system_options());

        let (off, off_probes) = ScriptedDriver::new("off", Modality::Light, 100);
        service.add_driver(Box::new(off.disabled()));
        let (missing, missing_probes) = ScriptedDriver::new("missing", Modality::Touch, 100);
        service.add_driver(Box::new(missing.unavailable()));
        let (broken, broken_probes) = ScriptedDriver::new("broken", Modality::Audio, 100);
        service.add_driver(Box::new(broken.failing_start()));
        let (good, good_probes) = ScriptedDriver::new("good", Modality::Temperature, 100);
        service.add_driver(Box::new(good));

        let started = service.start_service().await.unwrap();
        assert_eq!(started, vec!["system".to_string(), "good".to_string()]);

        assert_eq!(status_of(&service, "off"), DriverStatus::Disabled);
        assert_eq!(status_of(&service, "missing"), DriverStatus::Unavailable);
        assert_eq!(status_of(&service, "broken"), DriverStatus::Failed);
        assert_eq!(status_of(&service, "good"), DriverStatus::Polling);

        // disabled drivers are never probed, unavailable ones never started
        assert_eq!(off_probes.detects.load(Ordering::SeqCst), 0);
        assert_eq!(missing_probes.detects.load(Ordering::SeqCst), 1);
        assert_eq!(missing_probes.starts.load(Ordering::SeqCst), 0);
        assert_eq!(broken_probes.starts.load(Ordering::SeqCst), 1);
        assert_eq!(broken_probes.reads(), 0);
        assert_eq!(good_probes.starts.load(Ordering::SeqCst), 1);

        // no polling task is ever attached to a skipped driver
        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(off_probes.reads(), 0);
        assert_eq!(missing_probes.reads(), 0);

        service.stop_service().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn started_drivers_appear_in_the_modality_listing() {
        let mut service = SensorService::with_options(quiet_system_options());
        let (cam, _) = ScriptedDriver::new("cam0", Modality::Image, 100);
        let (mic, _) = ScriptedDriver::new("mic0", Modality::Audio, 100);
        let (therm, _) = ScriptedDriver::new("therm-1", Modality::Temperature, 100);
        service.add_driver(Box::new(cam));
        service.add_driver(Box::new(mic));
        service.add_driver(Box::new(therm));

        service.start_service().await.unwrap();
        assert_eq!(
            service.registered_modalities(),
            vec![
                Modality::Image,
                Modality::Audio,
                Modality::Temperature,
                Modality::System
            ]
        );
        service.stop_service().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn driver_added_while_running_waits_for_the_next_start() {
        let mut service = SensorService::with_options(quiet_system_options());
        service.start_service().await.unwrap();

        let (late, late_probes) = ScriptedDriver::new("late", Modality::Light, 100);
        service.add_driver(Box::new(late));
        assert_eq!(status_of(&service, "late"), DriverStatus::Registered);

        tokio::time::sleep(Duration::from_millis(250)).await;
        assert_eq!(late_probes.reads(), 0);

        service.stop_service().await.unwrap();
        let started = service.start_service().await.unwrap();
        assert!(started.contains(&"late".to_string()));
        assert_eq!(status_of(&service, "late"), DriverStatus::Polling);
        service.stop_service().await.unwrap();
    }
}

mod test_polling_and_collection {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn polling_fills_the_queue_and_collect_drains_it_once() {
        let mut service = SensorService::with_options(quiet_system_options());
        let (therm, therm_probes) = ScriptedDriver::new("therm-1", Modality::Temperature, 100);
        service.add_driver(Box::new(therm));

        service.start_service().await.unwrap();
        tokio::time::sleep(Duration::from_millis(350)).await;

        // immediate read at start, then ticks at 100/200/300 ms
        assert_eq!(therm_probes.reads(), 4);
        // plus the single startup read from the system driver
        assert_eq!(service.pending_input_count(), 5);

        let collected =
            service.collect_perceptions(Species::Temporal, PerceptionLevel::MAX, 60);
        assert_eq!(collected.input_count, 5);
        assert_eq!(collected.perceptions.len(), 5);
        assert!(collected.context.contains("temperature"));
        assert_eq!(service.pending_input_count(), 0);

        // nothing new since the drain
        let empty = service.collect_perceptions(Species::Temporal, PerceptionLevel::MAX, 60);
        assert_eq!(empty.input_count, 0);
        assert!(empty.perceptions.is_empty());
        assert_eq!(empty.context, FALLBACK_CONTEXT);

        service.stop_service().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn polled_sensors_become_active_for_growth_gating() {
        let mut service = SensorService::with_options(quiet_system_options());
        let (therm, _probes) = ScriptedDriver::new("therm-1", Modality::Temperature, 100);
        service.add_driver(Box::new(therm));
        assert_eq!(service.active_modality_count(), 0);

        service.start_service().await.unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;

        // both the system driver and the thermometer have produced data
        assert_eq!(service.active_modality_count(), 2);
        let record = service.sensor_record("therm-1").unwrap();
        assert!(record.available);
        assert!(record.has_produced_data);

        service.stop_service().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn direct_input_mixes_with_polled_events() {
        let mut service = SensorService::with_options(quiet_system_options());
        service.start_service().await.unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;

        service.push_direct_input(RawInput::text("keeper", "time to wake up"));

        let collected =
            service.collect_perceptions(Species::Temporal, PerceptionLevel::ALL[2], 20);
        // system startup read plus the injected text
        assert_eq!(collected.input_count, 2);
        assert!(collected
            .perceptions
            .iter()
            .any(|p| p.modality == Modality::Text));

        service.stop_service().await.unwrap();
    }
}

mod test_shutdown {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn stop_kills_timers_before_stopping_drivers() {
        let mut service = SensorService::with_options(quiet_system_options());
        let (therm, therm_probes) = ScriptedDriver::new("therm-1", Modality::Temperature, 100);
        service.add_driver(Box::new(therm));

        service.start_service().await.unwrap();
        tokio::time::sleep(Duration::from_millis(250)).await;
        let reads_before_stop = therm_probes.reads();
        assert!(reads_before_stop >= 1);

        service.stop_service().await.unwrap();
        assert!(!service.is_running());
        assert_eq!(status_of(&service, "therm-1"), DriverStatus::Stopped);
        assert_eq!(therm_probes.stops.load(Ordering::SeqCst), 1);

        // no tick may land after the stop sequence
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(therm_probes.reads(), reads_before_stop);

        match service.stop_service().await {
            Err(UmweltError::NotRunning) => {}
            other => panic!("expected NotRunning, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn drivers_that_never_started_are_not_stopped() {
        let mut service = SensorService::with_options(quiet_system_options());
        let (missing, missing_probes) = ScriptedDriver::new("missing", Modality::Touch, 100);
        service.add_driver(Box::new(missing.unavailable()));

        service.start_service().await.unwrap();
        service.stop_service().await.unwrap();

        assert_eq!(missing_probes.stops.load(Ordering::SeqCst), 0);
        assert_eq!(status_of(&service, "missing"), DriverStatus::Unavailable);
    }
}

mod test_read_timeout {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn stuck_driver_degrades_only_its_own_modality() {
        let mut service = SensorService::with_options(SensorServiceOptions {
            read_timeout: Duration::from_millis(200),
            system_poll_interval: Duration::from_secs(3600),
            ..Default::default()
        });
        let (stuck, stuck_probes) = ScriptedDriver::new("stuck", Modality::Light, 100);
        service.add_driver(Box::new(stuck.with_read_delay(Duration::from_secs(60))));
        let (therm, therm_probes) = ScriptedDriver::new("therm-1", Modality::Temperature, 100);
        service.add_driver(Box::new(therm));

        service.start_service().await.unwrap();
        tokio::time::sleep(Duration::from_millis(550)).await;

        // the stuck driver's reads are cancelled at the timeout and
        // contribute nothing
        assert_eq!(stuck_probes.reads(), 0);
        assert_eq!(therm_probes.reads(), 6);
        // 6 thermometer events plus the system startup read
        assert_eq!(service.pending_input_count(), 7);

        service.stop_service().await.unwrap();
        assert_eq!(stuck_probes.stops.load(Ordering::SeqCst), 1);
    }
}
