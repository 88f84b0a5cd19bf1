//! Pin collection and history persistence.

use std::sync::{Arc, Mutex, MutexGuard};

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::domain::{GeoPoint, Pin};
use crate::resolve::{SearchRecord, SearchRecorder};

use super::backup::{ExportBundle, ImportFormat, parse_import};
use super::error::StoreError;
use super::history::{PinHistoryEntry, SearchHistoryEntry, now_millis, push_newest};
use super::kv::KeyValueStore;
use super::mirror::{MirrorWrite, RemoteMirror};

/// Storage key for the current pins.
pub const PINS_KEY: &str = "pins";

/// Storage key for the pin history.
pub const PIN_HISTORY_KEY: &str = "pin_history";

/// Storage key for the search history.
pub const SEARCH_HISTORY_KEY: &str = "search_history";

/// Counts of what an import replaced. `None` sections were untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub format: ImportFormat,
    pub pins: Option<usize>,
    pub pin_history: Option<usize>,
    pub search_history: Option<usize>,
}

/// Pins, pin history and search history over a key-value store.
///
/// Every mutation writes the whole affected list back. Read-modify-write
/// cycles are serialized in-process.
pub struct PinStore {
    store: Arc<dyn KeyValueStore>,
    mirror: Option<RemoteMirror>,
    write_lock: Mutex<()>,
}

impl PinStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            mirror: None,
            write_lock: Mutex::new(()),
        }
    }

    /// Copy every successful write to `mirror`.
    pub fn with_mirror(mut self, mirror: RemoteMirror) -> Self {
        self.mirror = Some(mirror);
        self
    }

    /// Current pins, in placement order.
    pub fn pins(&self) -> Vec<Pin> {
        self.load(PINS_KEY)
    }

    /// Place a new pin and record it in the pin history.
    pub fn add_pin(
        &self,
        location: GeoPoint,
        address: impl Into<String>,
    ) -> Result<Pin, StoreError> {
        let pin = Pin::new(location, address);
        let _guard = self.lock();

        let mut pins: Vec<Pin> = self.load(PINS_KEY);
        pins.push(pin.clone());
        self.save(PINS_KEY, &pins)?;

        let mut history: Vec<PinHistoryEntry> = self.load(PIN_HISTORY_KEY);
        push_newest(
            &mut history,
            PinHistoryEntry {
                pin: pin.clone(),
                timestamp: now_millis(),
            },
        );
        self.save(PIN_HISTORY_KEY, &history)?;

        tracing::debug!(id = %pin.id, "pin added");
        Ok(pin)
    }

    /// Remove one pin. Its history entries are kept.
    pub fn delete_pin(&self, id: &str) -> Result<Pin, StoreError> {
        let _guard = self.lock();

        let mut pins: Vec<Pin> = self.load(PINS_KEY);
        let index = pins
            .iter()
            .position(|pin| pin.id == id)
            .ok_or_else(|| StoreError::PinNotFound(id.to_string()))?;
        let removed = pins.remove(index);
        self.save(PINS_KEY, &pins)?;

        Ok(removed)
    }

    pub fn clear_pins(&self) -> Result<(), StoreError> {
        let _guard = self.lock();
        self.save::<Pin>(PINS_KEY, &[])
    }

    /// Pin history, newest first.
    pub fn pin_history(&self) -> Vec<PinHistoryEntry> {
        self.load(PIN_HISTORY_KEY)
    }

    /// Delete pin history entries with this timestamp. Returns how many
    /// were removed.
    pub fn delete_pin_history(&self, timestamp: i64) -> Result<usize, StoreError> {
        let _guard = self.lock();
        let mut history: Vec<PinHistoryEntry> = self.load(PIN_HISTORY_KEY);
        let before = history.len();
        history.retain(|entry| entry.timestamp != timestamp);
        let removed = before - history.len();
        if removed > 0 {
            self.save(PIN_HISTORY_KEY, &history)?;
        }
        Ok(removed)
    }

    /// Search history, newest first.
    pub fn search_history(&self) -> Vec<SearchHistoryEntry> {
        self.load(SEARCH_HISTORY_KEY)
    }

    /// Append a completed search to the history.
    pub fn record_search(&self, record: SearchRecord) -> Result<SearchHistoryEntry, StoreError> {
        let entry = SearchHistoryEntry::from_record(record, now_millis());
        let _guard = self.lock();

        let mut history: Vec<SearchHistoryEntry> = self.load(SEARCH_HISTORY_KEY);
        push_newest(&mut history, entry.clone());
        self.save(SEARCH_HISTORY_KEY, &history)?;

        Ok(entry)
    }

    /// Delete search history entries with this timestamp. Returns how many
    /// were removed.
    pub fn delete_search_history(&self, timestamp: i64) -> Result<usize, StoreError> {
        let _guard = self.lock();
        let mut history: Vec<SearchHistoryEntry> = self.load(SEARCH_HISTORY_KEY);
        let before = history.len();
        history.retain(|entry| entry.timestamp != timestamp);
        let removed = before - history.len();
        if removed > 0 {
            self.save(SEARCH_HISTORY_KEY, &history)?;
        }
        Ok(removed)
    }

    /// Clear both histories, keeping the pins.
    pub fn clear_history(&self) -> Result<(), StoreError> {
        let _guard = self.lock();
        self.remove(PIN_HISTORY_KEY)?;
        self.remove(SEARCH_HISTORY_KEY)
    }

    /// Remove everything.
    pub fn clear_all(&self) -> Result<(), StoreError> {
        let _guard = self.lock();
        self.remove(PINS_KEY)?;
        self.remove(PIN_HISTORY_KEY)?;
        self.remove(SEARCH_HISTORY_KEY)
    }

    /// Snapshot of everything, for backup.
    pub fn export(&self) -> ExportBundle {
        let _guard = self.lock();
        ExportBundle::new(
            self.load(PINS_KEY),
            self.load(PIN_HISTORY_KEY),
            self.load(SEARCH_HISTORY_KEY),
        )
    }

    /// Replace stored sections with those present in `value`.
    pub fn import(&self, value: serde_json::Value) -> Result<ImportSummary, StoreError> {
        let data = parse_import(value)?;
        let _guard = self.lock();

        let mut summary = ImportSummary {
            format: data.format,
            pins: None,
            pin_history: None,
            search_history: None,
        };

        if let Some(pins) = data.pins {
            self.save(PINS_KEY, &pins)?;
            summary.pins = Some(pins.len());
        }
        if let Some(history) = data.pin_history {
            self.save(PIN_HISTORY_KEY, &history)?;
            summary.pin_history = Some(history.len());
        }
        if let Some(history) = data.search_history {
            self.save(SEARCH_HISTORY_KEY, &history)?;
            summary.search_history = Some(history.len());
        }

        tracing::info!(?summary, "import complete");
        Ok(summary)
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        self.write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Load a list, treating missing or unreadable values as empty.
    fn load<T: DeserializeOwned>(&self, key: &str) -> Vec<T> {
        let raw = match self.store.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(error) => {
                tracing::warn!(key, %error, "failed to read stored value");
                return Vec::new();
            }
        };

        serde_json::from_str(&raw).unwrap_or_else(|error| {
            tracing::warn!(key, %error, "ignoring corrupt stored value");
            Vec::new()
        })
    }

    fn save<T: Serialize>(&self, key: &str, items: &[T]) -> Result<(), StoreError> {
        let json = serde_json::to_string(items).map_err(|e| StoreError::Encode {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        self.store.set(key, &json)?;

        // Callers hold the write lock, so mirror sequence follows local order
        if let Some(mirror) = &self.mirror {
            mirror.submit(MirrorWrite::Set {
                key: key.to_string(),
                value: json,
            });
        }
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.store.remove(key)?;

        if let Some(mirror) = &self.mirror {
            mirror.submit(MirrorWrite::Remove {
                key: key.to_string(),
            });
        }
        Ok(())
    }
}

impl SearchRecorder for PinStore {
    fn record_search(&self, record: SearchRecord) {
        if let Err(error) = PinStore::record_search(self, record) {
            tracing::warn!(%error, "failed to record search history");
        }
    }
}
