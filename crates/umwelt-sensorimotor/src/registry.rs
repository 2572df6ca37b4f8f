/*!
Input registry.

The only shared mutable structure in the subsystem: a sensor catalog plus a
pending event queue. The API is copy-on-write in the value-semantics sense:
mutating operations consume the registry and return the updated one, so a
caller can never observe a half-applied change. The service serializes all
access behind one mutex; the registry itself carries no locking.

Copyright 2026 Umwelt Project Developers
Licensed under the Apache License, Version 2.0
*/

use ahash::AHashMap;

use umwelt_structures::{Modality, RawInput};

/// Catalog entry for one registered sensor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SensorRecord {
    pub modality: Modality,
    /// Where the backing data comes from ("hardware", "synthetic", ...).
    pub source: String,
    pub available: bool,
    /// First-write flag: set once the first event from this sensor is
    /// pushed, never cleared by drains.
    pub has_produced_data: bool,
}

/// Sensor catalog and pending event queue.
#[derive(Debug, Clone, Default)]
pub struct InputRegistry {
    sensors: AHashMap<String, SensorRecord>,
    pending: Vec<RawInput>,
}

impl InputRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Idempotent upsert of a catalog entry.
    ///
    /// Re-registering an id refreshes modality, source and availability but
    /// keeps the first-write flag: a sensor that has produced data stays
    /// counted as active across re-registration.
    #[must_use]
    pub fn register_sensor(
        mut self,
        id: impl Into<String>,
        modality: Modality,
        source: impl Into<String>,
        available: bool,
    ) -> Self {
        let id = id.into();
        let has_produced_data = self
            .sensors
            .get(&id)
            .map(|record| record.has_produced_data)
            .unwrap_or(false);
        self.sensors.insert(
            id,
            SensorRecord {
                modality,
                source: source.into(),
                available,
                has_produced_data,
            },
        );
        self
    }

    /// Unconditional append to the queue tail. No backpressure, no
    /// deduplication. Marks the producing sensor's first-write flag when the
    /// event's source matches a catalog id.
    #[must_use]
    pub fn push_input(mut self, event: RawInput) -> Self {
        if let Some(record) = self.sensors.get_mut(&event.source) {
            record.has_produced_data = true;
        }
        self.pending.push(event);
        self
    }

    /// Atomically take every pending event in insertion order, leaving the
    /// queue empty. Nothing is ever drained twice.
    #[must_use]
    pub fn drain(mut self) -> (Vec<RawInput>, Self) {
        let events = std::mem::take(&mut self.pending);
        (events, self)
    }

    /// Count of sensors marked available that have produced at least one
    /// event. Feeds growth gating outside this subsystem.
    pub fn active_modality_count(&self) -> usize {
        self.sensors
            .values()
            .filter(|record| record.available && record.has_produced_data)
            .count()
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn sensor(&self, id: &str) -> Option<&SensorRecord> {
        self.sensors.get(id)
    }

    pub fn sensor_count(&self) -> usize {
        self.sensors.len()
    }

    /// Distinct modalities with at least one available sensor, sorted for
    /// stable listings.
    pub fn registered_modalities(&self) -> Vec<Modality> {
        let mut modalities: Vec<Modality> = self
            .sensors
            .values()
            .filter(|record| record.available)
            .map(|record| record.modality)
            .collect();
        modalities.sort();
        modalities.dedup();
        modalities
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use umwelt_structures::{ScalarReading, SystemMetrics};

    #[test]
    fn drain_empties_the_queue_exactly_once() {
        let registry = InputRegistry::new()
            .push_input(RawInput::text("chat", "one"))
            .push_input(RawInput::text("chat", "two"));
        assert_eq!(registry.pending_len(), 2);

        let (events, registry) = registry.drain();
        assert_eq!(events.len(), 2);
        assert_eq!(registry.pending_len(), 0);

        let (again, _registry) = registry.drain();
        assert!(again.is_empty());
    }

    #[test]
    fn drain_preserves_combined_insertion_order() {
        let registry = InputRegistry::new()
            .push_input(RawInput::scalar(
                Modality::Temperature,
                "dht22",
                ScalarReading::steady(21.0, "C"),
            ))
            .push_input(RawInput::text("chat", "hello"))
            .push_input(RawInput::system("system", SystemMetrics::default()));

        let (events, _registry) = registry.drain();
        let sources: Vec<&str> = events.iter().map(|e| e.source.as_str()).collect();
        assert_eq!(sources, ["dht22", "chat", "system"]);
    }

    #[test]
    fn upsert_preserves_first_write_flag() {
        let registry = InputRegistry::new()
            .register_sensor("dht22", Modality::Temperature, "hardware", true)
            .push_input(RawInput::scalar(
                Modality::Temperature,
                "dht22",
                ScalarReading::steady(21.0, "C"),
            ));
        assert_eq!(registry.active_modality_count(), 1);

        // re-registration must not reset the flag
        let registry = registry.register_sensor("dht22", Modality::Temperature, "hardware", true);
        assert_eq!(registry.active_modality_count(), 1);
    }

    #[test]
    fn active_count_requires_both_availability_and_data() {
        let registry = InputRegistry::new()
            .register_sensor("cam", Modality::Image, "hardware", true)
            .register_sensor("mic", Modality::Audio, "hardware", false)
            .register_sensor("dht22", Modality::Temperature, "hardware", true);
        // registered but silent
        assert_eq!(registry.active_modality_count(), 0);

        let registry = registry
            .push_input(RawInput::scalar(
                Modality::Temperature,
                "dht22",
                ScalarReading::steady(21.0, "C"),
            ))
            .push_input(RawInput::audio("mic", Default::default()));
        // mic produced data but is unavailable
        assert_eq!(registry.active_modality_count(), 1);
    }

    #[test]
    fn events_from_unregistered_sources_still_queue() {
        let registry = InputRegistry::new().push_input(RawInput::text("ghost", "boo"));
        assert_eq!(registry.pending_len(), 1);
        assert_eq!(registry.active_modality_count(), 0);
    }

    #[test]
    fn registered_modalities_are_sorted_and_deduped() {
        let registry = InputRegistry::new()
            .register_sensor("cam-a", Modality::Image, "hardware", true)
            .register_sensor("cam-b", Modality::Image, "hardware", true)
            .register_sensor("chat", Modality::Text, "direct", true)
            .register_sensor("broken", Modality::Audio, "hardware", false);
        assert_eq!(
            registry.registered_modalities(),
            vec![Modality::Text, Modality::Image]
        );
    }
}
