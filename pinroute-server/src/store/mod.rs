//! Local persistence of pins, pin history and search history.
//!
//! Values live in a [`KeyValueStore`] under three keys (`pins`,
//! `pin_history`, `search_history`). The local store is authoritative; an
//! optional [`RemoteMirror`] receives a copy of every write.

mod backup;
mod error;
mod history;
mod kv;
mod mirror;
mod pins;

pub use backup::{
    BACKUP_FORMAT, BACKUP_VERSION, ExportBundle, ImportData, ImportFormat, parse_import,
};
pub use error::StoreError;
pub use history::{MAX_HISTORY_ITEMS, PinHistoryEntry, SearchHistoryEntry};
pub use kv::{FileStore, KeyValueStore, MemoryStore};
pub use mirror::{MirrorWrite, RemoteMirror};
pub use pins::{ImportSummary, PIN_HISTORY_KEY, PINS_KEY, PinStore, SEARCH_HISTORY_KEY};
