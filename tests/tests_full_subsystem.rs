//! The whole subsystem through the facade: a polled driver and a direct
//! source filling the queue, growth-gated collection cycles, and a service
//! built from discovered configuration.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use umwelt::prelude::*;

/// Scripted ambient light sensor; every read succeeds with a fresh reading.
struct LightDriver {
    config: DriverConfig,
    reads: Arc<AtomicUsize>,
}

impl LightDriver {
    fn new(poll_ms: u64) -> (Self, Arc<AtomicUsize>) {
        let reads = Arc::new(AtomicUsize::new(0));
        let driver = Self {
            config: DriverConfig::new(
                "lux-0",
                "Ambient light",
                Modality::Light,
                Duration::from_millis(poll_ms),
            ),
            reads: Arc::clone(&reads),
        };
        (driver, reads)
    }
}

#[async_trait]
impl SensorDriver for LightDriver {
    fn config(&self) -> &DriverConfig {
        &self.config
    }

    async fn detect(&mut self) -> DetectReport {
        DetectReport::detected()
    }

    async fn start(&mut self) -> UmweltResult<()> {
        Ok(())
    }

    async fn read(&mut self) -> UmweltResult<Option<RawInput>> {
        let n = self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(Some(RawInput::scalar(
            Modality::Light,
            "lux-0",
            ScalarReading::steady(120.0 + n as f64, "lux"),
        )))
    }

    async fn stop(&mut self) -> UmweltResult<()> {
        Ok(())
    }
}

#[tokio::test(start_paused = true)]
async fn polled_and_direct_sources_share_one_cycle() -> Result<(), Box<dyn std::error::Error>> {
    let mut service = SensorService::new();
    let (driver, reads) = LightDriver::new(50);
    service.add_driver(Box::new(driver));

    let started = service.start_service().await?;
    assert_eq!(started, vec!["system".to_string(), "lux-0".to_string()]);

    // reads land at 0, 50, ... 300 ms; the system driver reads once at 0
    tokio::time::sleep(Duration::from_millis(320)).await;
    assert_eq!(reads.load(Ordering::SeqCst), 7);

    service.push_direct_input(RawInput::text("keeper", "lights on in five"));

    let out = service.collect_perceptions(Species::Temporal, PerceptionLevel::MAX, 60);
    assert_eq!(out.input_count, 9);
    assert_eq!(out.perceptions.len(), 9);
    assert!(out.context.starts_with("9 sensations arrive"));
    assert!(out.context.contains("light"));
    assert!(out.context.contains("text"));

    // the drain is exactly-once
    let quiet = service.collect_perceptions(Species::Temporal, PerceptionLevel::MAX, 60);
    assert_eq!(quiet.context, FALLBACK_CONTEXT);

    service.stop_service().await?;
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn maturity_widens_what_one_driver_means() -> Result<(), Box<dyn std::error::Error>> {
    let mut service = SensorService::new();
    let (driver, _reads) = LightDriver::new(50);
    service.add_driver(Box::new(driver));
    service.start_service().await?;

    tokio::time::sleep(Duration::from_millis(120)).await;

    // heat-led newborns do not perceive light yet, only the inner sense
    let newborn = service.collect_perceptions(Species::Thermal, PerceptionLevel::MIN, 0);
    assert_eq!(newborn.input_count, 4);
    assert_eq!(newborn.perceptions.len(), 1);
    assert!(newborn.context.starts_with("1 sensation arrives (system)"));

    // the catalog is maturity-independent: both sensors have produced data
    assert_eq!(service.active_modality_count(), 2);

    tokio::time::sleep(Duration::from_millis(200)).await;

    let grown = service.collect_perceptions(Species::Thermal, PerceptionLevel::MAX, 60);
    assert_eq!(grown.input_count, 4);
    assert_eq!(grown.perceptions.len(), 4);
    assert!(grown.context.contains("light level at"));

    assert_eq!(
        service.registered_modalities(),
        vec![Modality::Light, Modality::System]
    );

    service.stop_service().await?;
    Ok(())
}

#[test]
fn discovered_config_builds_a_ready_service() -> Result<(), Box<dyn std::error::Error>> {
    for key in [
        "UMWELT_CONFIG_PATH",
        "UMWELT_READ_TIMEOUT_MS",
        "UMWELT_SYSTEM_POLL_INTERVAL_MS",
        "UMWELT_MAX_CONTEXT_PERCEPTIONS",
        "UMWELT_LOG_LEVEL",
    ] {
        std::env::remove_var(key);
    }

    let service = umwelt::service_from_default_config()?;
    let defaults = SensorServiceOptions::default();
    assert_eq!(service.options().read_timeout, defaults.read_timeout);
    assert_eq!(
        service.options().system_poll_interval,
        defaults.system_poll_interval
    );
    assert_eq!(
        service.options().max_context_perceptions,
        defaults.max_context_perceptions
    );
    assert!(!service.is_running());
    Ok(())
}
