// ── Reactive device snapshot store ──
//
// Lock-free concurrent storage for the latest poll result, with
// push-based change notification via `watch` channels. Single writer
// (the account's poll task), many readers (presentation entities).

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tokio::sync::watch;

use jaalee_api::DeviceRecord;

/// Outcome of the most recent poll cycle.
///
/// Presentation consults `success` for availability rather than
/// inferring it from data presence -- a failed cycle keeps the previous
/// device data around for display but everything reads unavailable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LastUpdate {
    pub success: bool,
    /// Completion time of the last successful cycle.
    pub last_success_at: Option<DateTime<Utc>>,
}

impl Default for LastUpdate {
    fn default() -> Self {
        // Nothing has been fetched yet; nothing is available.
        Self {
            success: false,
            last_success_at: None,
        }
    }
}

/// Reactive storage for one account's device snapshot, keyed by MAC.
///
/// Every mutation bumps a version counter and rebuilds the snapshot
/// that subscribers receive.
pub struct DeviceStore {
    by_mac: DashMap<String, Arc<DeviceRecord>>,
    version: watch::Sender<u64>,
    snapshot: watch::Sender<Arc<Vec<Arc<DeviceRecord>>>>,
    last_update: watch::Sender<LastUpdate>,
}

impl Default for DeviceStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DeviceStore {
    pub fn new() -> Self {
        let (version, _) = watch::channel(0u64);
        let (snapshot, _) = watch::channel(Arc::new(Vec::new()));
        let (last_update, _) = watch::channel(LastUpdate::default());

        Self {
            by_mac: DashMap::new(),
            version,
            snapshot,
            last_update,
        }
    }

    /// Apply a successful poll result, replacing the previous one
    /// wholesale.
    ///
    /// Uses upsert-then-prune: incoming records are upserted first,
    /// then any MACs not present in the incoming set are removed. This
    /// avoids the brief "empty" state that clear-then-insert would show
    /// subscribers.
    pub fn apply_snapshot(&self, devices: HashMap<String, DeviceRecord>) {
        let incoming: HashSet<String> = devices.keys().cloned().collect();

        for (mac, record) in devices {
            self.by_mac.insert(mac, Arc::new(record));
        }
        self.by_mac.retain(|mac, _| incoming.contains(mac));

        self.rebuild_snapshot();
        self.bump_version();
        self.last_update.send_modify(|lu| {
            *lu = LastUpdate {
                success: true,
                last_success_at: Some(Utc::now()),
            };
        });
    }

    /// Record a failed poll cycle. Previous device data is retained;
    /// only the availability flag drops.
    pub fn mark_failed(&self) {
        self.last_update.send_modify(|lu| lu.success = false);
    }

    /// Look up a device by MAC.
    pub fn get(&self, mac: &str) -> Option<Arc<DeviceRecord>> {
        self.by_mac.get(mac).map(|r| Arc::clone(r.value()))
    }

    pub fn contains(&self, mac: &str) -> bool {
        self.by_mac.contains_key(mac)
    }

    /// Get the current snapshot (cheap `Arc` clone).
    pub fn snapshot(&self) -> Arc<Vec<Arc<DeviceRecord>>> {
        self.snapshot.borrow().clone()
    }

    /// Subscribe to snapshot changes.
    pub fn subscribe(&self) -> watch::Receiver<Arc<Vec<Arc<DeviceRecord>>>> {
        self.snapshot.subscribe()
    }

    /// The most recent cycle outcome.
    pub fn last_update(&self) -> LastUpdate {
        *self.last_update.borrow()
    }

    /// Subscribe to cycle-outcome changes.
    pub fn subscribe_last_update(&self) -> watch::Receiver<LastUpdate> {
        self.last_update.subscribe()
    }

    pub fn len(&self) -> usize {
        self.by_mac.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_mac.is_empty()
    }

    // ── Private helpers ──────────────────────────────────────────────

    /// Collect all records into a snapshot vec, sorted by MAC for
    /// stable presentation order, and broadcast to subscribers.
    fn rebuild_snapshot(&self) {
        let mut values: Vec<Arc<DeviceRecord>> =
            self.by_mac.iter().map(|r| Arc::clone(r.value())).collect();
        values.sort_by(|a, b| a.mac.cmp(&b.mac));
        // `send_modify` updates unconditionally, even with zero receivers.
        self.snapshot.send_modify(|snap| *snap = Arc::new(values));
    }

    fn bump_version(&self) {
        self.version.send_modify(|v| *v += 1);
    }
}
