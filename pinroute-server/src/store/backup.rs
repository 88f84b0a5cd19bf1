//! Backup bundles for export and import.
//!
//! Current backups carry a `format` tag and a `version`. Two older shapes
//! are still accepted on import: an untagged `{pins, pinHistory,
//! searchHistory}` object and a bare array of pin records. Pins from those
//! shapes get fresh ids, since their original ids were not UUIDs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{GeoPoint, Pin};

use super::error::StoreError;
use super::history::{MAX_HISTORY_ITEMS, PinHistoryEntry, SearchHistoryEntry};

/// Value of the `format` tag.
pub const BACKUP_FORMAT: &str = "pinroute-backup";

/// Newest backup version this build writes and reads.
pub const BACKUP_VERSION: u32 = 1;

/// Everything the store holds, as exported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportBundle {
    pub format: String,
    pub version: u32,
    pub pins: Vec<Pin>,
    pub pin_history: Vec<PinHistoryEntry>,
    pub search_history: Vec<SearchHistoryEntry>,
    pub exported_at: DateTime<Utc>,
}

impl ExportBundle {
    pub fn new(
        pins: Vec<Pin>,
        pin_history: Vec<PinHistoryEntry>,
        search_history: Vec<SearchHistoryEntry>,
    ) -> Self {
        Self {
            format: BACKUP_FORMAT.to_string(),
            version: BACKUP_VERSION,
            pins,
            pin_history,
            search_history,
            exported_at: Utc::now(),
        }
    }
}

/// Which shape an import was recognized as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportFormat {
    Tagged,
    LegacyBundle,
    LegacyPinList,
}

/// Sections decoded from an import. `None` sections are left untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportData {
    pub format: ImportFormat,
    pub pins: Option<Vec<Pin>>,
    pub pin_history: Option<Vec<PinHistoryEntry>>,
    pub search_history: Option<Vec<SearchHistoryEntry>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TaggedBundle {
    version: u32,
    pins: Option<Vec<Pin>>,
    pin_history: Option<Vec<PinHistoryEntry>>,
    search_history: Option<Vec<SearchHistoryEntry>>,
}

/// A pin record from an older backup; any `id` is discarded.
#[derive(Deserialize)]
struct LegacyPin {
    lat: f64,
    lng: f64,
    #[serde(default)]
    address: String,
    timestamp: Option<i64>,
}

impl LegacyPin {
    fn into_pin(self) -> Result<Pin, StoreError> {
        let point = GeoPoint::new(self.lat, self.lng)
            .map_err(|e| StoreError::UnrecognizedImport(format!("invalid pin: {e}")))?;
        Ok(Pin::new(point, self.address))
    }
}

/// Decode import data, detecting its shape.
pub fn parse_import(value: Value) -> Result<ImportData, StoreError> {
    let format = match &value {
        Value::Array(_) => ImportFormat::LegacyPinList,
        Value::Object(map) => match map.get("format") {
            None => ImportFormat::LegacyBundle,
            Some(Value::String(tag)) if tag == BACKUP_FORMAT => ImportFormat::Tagged,
            Some(other) => {
                return Err(StoreError::UnrecognizedImport(format!(
                    "unknown format {other}"
                )));
            }
        },
        _ => {
            return Err(StoreError::UnrecognizedImport(
                "expected an object or an array".to_string(),
            ));
        }
    };

    match format {
        ImportFormat::Tagged => parse_tagged(value),
        ImportFormat::LegacyBundle => parse_legacy_bundle(value),
        ImportFormat::LegacyPinList => Ok(ImportData {
            format,
            pins: Some(legacy_pins(value)?),
            pin_history: None,
            search_history: None,
        }),
    }
}

fn parse_tagged(value: Value) -> Result<ImportData, StoreError> {
    let bundle: TaggedBundle = decode(value)?;
    if bundle.version > BACKUP_VERSION {
        return Err(StoreError::UnsupportedVersion(bundle.version));
    }

    Ok(ImportData {
        format: ImportFormat::Tagged,
        pins: bundle.pins,
        pin_history: bundle.pin_history.map(bounded),
        search_history: bundle.search_history.map(bounded),
    })
}

fn parse_legacy_bundle(mut value: Value) -> Result<ImportData, StoreError> {
    let section = |value: &mut Value, key: &str| match value.get_mut(key).map(Value::take) {
        Some(array @ Value::Array(_)) => Some(array),
        _ => None,
    };

    let pins = section(&mut value, "pins");
    let pin_history = section(&mut value, "pinHistory");
    let search_history = section(&mut value, "searchHistory");

    if pins.is_none() && pin_history.is_none() && search_history.is_none() {
        return Err(StoreError::UnrecognizedImport(
            "no pins, pinHistory or searchHistory".to_string(),
        ));
    }

    let pins = pins.map(legacy_pins).transpose()?;

    let pin_history = pin_history
        .map(|v| {
            let records: Vec<LegacyPin> = decode(v)?;
            records
                .into_iter()
                .map(|record| {
                    let timestamp = record.timestamp.unwrap_or_default();
                    Ok(PinHistoryEntry {
                        pin: record.into_pin()?,
                        timestamp,
                    })
                })
                .collect::<Result<Vec<_>, StoreError>>()
        })
        .transpose()?
        .map(bounded);

    let search_history = search_history
        .map(decode::<Vec<SearchHistoryEntry>>)
        .transpose()?
        .map(bounded);

    Ok(ImportData {
        format: ImportFormat::LegacyBundle,
        pins,
        pin_history,
        search_history,
    })
}

fn legacy_pins(value: Value) -> Result<Vec<Pin>, StoreError> {
    let records: Vec<LegacyPin> = decode(value)?;
    records.into_iter().map(LegacyPin::into_pin).collect()
}

fn decode<T: serde::de::DeserializeOwned>(value: Value) -> Result<T, StoreError> {
    serde_json::from_value(value).map_err(|e| StoreError::UnrecognizedImport(e.to_string()))
}

fn bounded<T>(mut history: Vec<T>) -> Vec<T> {
    history.truncate(MAX_HISTORY_ITEMS);
    history
}
