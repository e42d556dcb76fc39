// ── Presentation entities ──
//
// One sensor entity per (device MAC, metric). Entities are created by
// an explicit ensure-exists pass each poll cycle and never removed;
// a vanished device reports unavailable instead. All metadata (display
// name, model description) is recomputed from the freshest record on
// every read, so a renamed alias or changed model code shows up without
// recreating the entity.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::warn;

use jaalee_api::DeviceRecord;

use crate::devices::model_description;
use crate::store::DeviceStore;

/// The measurements a device may expose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Metric {
    Temperature,
    Humidity,
    /// Battery level.
    Power,
}

impl Metric {
    pub const ALL: [Self; 3] = [Self::Temperature, Self::Humidity, Self::Power];

    /// The wire field name.
    pub fn key(self) -> &'static str {
        match self {
            Self::Temperature => "temperature",
            Self::Humidity => "humidity",
            Self::Power => "power",
        }
    }

    /// Display label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Temperature => "Temperature",
            Self::Humidity => "Humidity",
            Self::Power => "Battery",
        }
    }

    /// Unit of measurement.
    pub fn unit(self) -> &'static str {
        match self {
            Self::Temperature => "°C",
            Self::Humidity | Self::Power => "%",
        }
    }

    /// The raw wire value on a record, if the device reports this metric.
    pub fn raw(self, record: &DeviceRecord) -> Option<&serde_json::Value> {
        match self {
            Self::Temperature => record.temperature.as_ref(),
            Self::Humidity => record.humidity.as_ref(),
            Self::Power => record.power.as_ref(),
        }
    }

    /// Round a parsed value for display: temperature to one decimal,
    /// humidity to the nearest integer, battery passed through.
    pub fn normalize(self, value: f64) -> f64 {
        match self {
            Self::Temperature => (value * 10.0).round() / 10.0,
            Self::Humidity => value.round(),
            Self::Power => value,
        }
    }
}

/// Parse a wire value that may be a JSON number or a numeric string.
fn parse_number(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// The rendered state of one sensor entity at one instant.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorState {
    /// Stable identity: `{mac}_{metric}`.
    pub unique_id: String,
    pub mac: String,
    pub metric: Metric,
    /// `{alias-or-mac} {metric label}`, from the freshest record.
    pub name: String,
    /// Model description from the device type map, or the raw code.
    pub model: Option<String>,
    pub value: Option<f64>,
    pub unit: &'static str,
    pub available: bool,
}

/// One presentation entity, identified by `(mac, metric)`.
#[derive(Debug, Clone)]
pub struct SensorEntity {
    mac: String,
    metric: Metric,
}

impl SensorEntity {
    pub fn unique_id(&self) -> String {
        format!("{}_{}", self.mac, self.metric.key())
    }

    pub fn mac(&self) -> &str {
        &self.mac
    }

    pub fn metric(&self) -> Metric {
        self.metric
    }

    /// Render this entity against the latest store contents.
    ///
    /// Availability requires both a successful last cycle and the
    /// device being present in it. A value that fails numeric parsing
    /// is logged and reported as absent; it never fails the read.
    pub fn state(&self, store: &DeviceStore) -> SensorState {
        let record = store.get(&self.mac);
        let available = store.last_update().success && record.is_some();

        let (name, model, value) = match record {
            Some(ref record) => (
                format!("{} {}", record.display_name(), self.metric.label()),
                record
                    .model_code
                    .as_deref()
                    .map(|code| model_description(code).unwrap_or(code).to_owned()),
                self.value(record),
            ),
            None => (
                format!("{} {}", self.mac, self.metric.label()),
                None,
                None,
            ),
        };

        SensorState {
            unique_id: self.unique_id(),
            mac: self.mac.clone(),
            metric: self.metric,
            name,
            model,
            value,
            unit: self.metric.unit(),
            available,
        }
    }

    fn value(&self, record: &DeviceRecord) -> Option<f64> {
        let raw = self.metric.raw(record)?;
        let parsed = parse_number(raw);
        if parsed.is_none() {
            warn!(
                mac = %self.mac,
                metric = self.metric.key(),
                %raw,
                "unparsable metric value, treating as absent"
            );
        }
        parsed.map(|v| self.metric.normalize(v))
    }
}

/// Registry of presentation entities for one account.
///
/// Keyed by `(mac, metric)`; `BTreeMap` keeps iteration in stable
/// display order.
#[derive(Debug, Default)]
pub struct SensorRegistry {
    entities: BTreeMap<(String, Metric), SensorEntity>,
}

impl SensorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Idempotent ensure-exists pass, invoked once per poll cycle.
    ///
    /// Creates an entity the first time a metric appears for a MAC.
    /// Entities are never removed. Returns how many were created.
    pub fn ensure_entities(&mut self, snapshot: &[Arc<DeviceRecord>]) -> usize {
        let mut created = 0;
        for record in snapshot {
            for metric in Metric::ALL {
                if metric.raw(record).is_none() {
                    continue;
                }
                self.entities
                    .entry((record.mac.clone(), metric))
                    .or_insert_with(|| {
                        created += 1;
                        SensorEntity {
                            mac: record.mac.clone(),
                            metric,
                        }
                    });
            }
        }
        created
    }

    pub fn entities(&self) -> impl Iterator<Item = &SensorEntity> {
        self.entities.values()
    }

    /// Render every entity against the latest store contents.
    pub fn states(&self, store: &DeviceStore) -> Vec<SensorState> {
        self.entities.values().map(|e| e.state(store)).collect()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}
