//! Best-effort remote copy of local state.
//!
//! The local store is authoritative. After each successful local write the
//! new value is copied to the mirror in the background; mirror failures are
//! logged and never reach the caller.
//!
//! Background writes may finish out of order, so every write is stamped
//! with a sequence number at submission and a write older than the last one
//! applied to its key is dropped.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tokio::task::JoinHandle;

use super::kv::KeyValueStore;

/// A write to replay on the mirror.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MirrorWrite {
    Set { key: String, value: String },
    Remove { key: String },
}

impl MirrorWrite {
    fn key(&self) -> &str {
        match self {
            MirrorWrite::Set { key, .. } | MirrorWrite::Remove { key } => key,
        }
    }
}

/// Mirrors writes to a secondary store.
#[derive(Clone)]
pub struct RemoteMirror {
    name: String,
    target: Arc<dyn KeyValueStore>,
    next_seq: Arc<AtomicU64>,
    /// Sequence number of the last write applied, per key. Held while the
    /// target is written so the check and the write are one step.
    applied: Arc<Mutex<HashMap<String, u64>>>,
}

impl RemoteMirror {
    pub fn new(name: impl Into<String>, target: Arc<dyn KeyValueStore>) -> Self {
        Self {
            name: name.into(),
            target,
            next_seq: Arc::new(AtomicU64::new(0)),
            applied: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Replay `write` on the mirror.
    ///
    /// Runs on a blocking task when called inside a tokio runtime (and
    /// returns its handle), inline otherwise. Whatever order the tasks run
    /// in, the mirror ends up holding the last write submitted per key.
    pub fn submit(&self, write: MirrorWrite) -> Option<JoinHandle<()>> {
        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst) + 1;
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let mirror = self.clone();
                Some(handle.spawn_blocking(move || mirror.apply(seq, &write)))
            }
            Err(_) => {
                self.apply(seq, &write);
                None
            }
        }
    }

    fn apply(&self, seq: u64, write: &MirrorWrite) {
        let key = write.key();
        let mut applied = self.applied.lock().unwrap_or_else(|p| p.into_inner());

        if applied.get(key).is_some_and(|&last| last > seq) {
            tracing::debug!(mirror = %self.name, key, seq, "superseded write dropped");
            return;
        }

        let result = match write {
            MirrorWrite::Set { key, value } => self.target.set(key, value),
            MirrorWrite::Remove { key } => self.target.remove(key),
        };

        match result {
            Ok(()) => {
                applied.insert(key.to_string(), seq);
                tracing::debug!(mirror = %self.name, key, seq, "mirrored");
            }
            Err(error) => {
                tracing::warn!(mirror = %self.name, key, %error, "mirror write failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StoreError;
    use crate::store::kv::MemoryStore;

    struct Unreachable;

    impl KeyValueStore for Unreachable {
        fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
            Ok(None)
        }

        fn set(&self, key: &str, _value: &str) -> Result<(), StoreError> {
            Err(StoreError::Mirror(format!("{key}: connection refused")))
        }

        fn remove(&self, key: &str) -> Result<(), StoreError> {
            Err(StoreError::Mirror(format!("{key}: connection refused")))
        }
    }

    /// Stalls every write of `slow_value` so later writes overtake it.
    struct Stalling {
        inner: MemoryStore,
        slow_value: &'static str,
    }

    impl KeyValueStore for Stalling {
        fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
            if value == self.slow_value {
                std::thread::sleep(std::time::Duration::from_millis(100));
            }
            self.inner.set(key, value)
        }

        fn remove(&self, key: &str) -> Result<(), StoreError> {
            self.inner.remove(key)
        }
    }

    #[test]
    fn applies_inline_without_runtime() {
        let target = Arc::new(MemoryStore::new());
        let mirror = RemoteMirror::new("memory", target.clone());

        let handle = mirror.submit(MirrorWrite::Set {
            key: "pins".into(),
            value: "[]".into(),
        });

        assert!(handle.is_none());
        assert_eq!(target.get("pins").unwrap().as_deref(), Some("[]"));

        mirror.submit(MirrorWrite::Remove { key: "pins".into() });
        assert_eq!(target.get("pins").unwrap(), None);
    }

    #[tokio::test]
    async fn runs_in_background_inside_runtime() {
        let target = Arc::new(MemoryStore::new());
        let mirror = RemoteMirror::new("memory", target.clone());

        let handle = mirror
            .submit(MirrorWrite::Set {
                key: "pins".into(),
                value: "[1]".into(),
            })
            .unwrap();
        handle.await.unwrap();

        assert_eq!(target.get("pins").unwrap().as_deref(), Some("[1]"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn last_submitted_write_wins() {
        let target = Arc::new(Stalling {
            inner: MemoryStore::new(),
            slow_value: r#"["old"]"#,
        });
        let mirror = RemoteMirror::new("stalling", target.clone());

        let old = mirror
            .submit(MirrorWrite::Set {
                key: "pins".into(),
                value: r#"["old"]"#.into(),
            })
            .unwrap();
        let new = mirror
            .submit(MirrorWrite::Set {
                key: "pins".into(),
                value: r#"["new"]"#.into(),
            })
            .unwrap();
        old.await.unwrap();
        new.await.unwrap();

        assert_eq!(target.get("pins").unwrap().as_deref(), Some(r#"["new"]"#));
    }

    #[test]
    fn stale_write_after_newer_one_is_dropped() {
        let target = Arc::new(MemoryStore::new());
        let mirror = RemoteMirror::new("memory", target.clone());
        let set = |key: &str, value: &str| MirrorWrite::Set {
            key: key.into(),
            value: value.into(),
        };

        // The newer write lands first.
        mirror.apply(2, &set("pins", "[2]"));
        mirror.apply(1, &set("pins", "[1]"));
        mirror.apply(1, &set("history", "[1]"));

        assert_eq!(target.get("pins").unwrap().as_deref(), Some("[2]"));
        assert_eq!(target.get("history").unwrap().as_deref(), Some("[1]"));
    }

    #[test]
    fn failures_are_swallowed() {
        let mirror = RemoteMirror::new("down", Arc::new(Unreachable));
        assert!(
            mirror
                .submit(MirrorWrite::Set {
                    key: "pins".into(),
                    value: "[]".into(),
                })
                .is_none()
        );
    }
}
