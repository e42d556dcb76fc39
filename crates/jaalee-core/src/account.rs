// ── Account lifecycle ──
//
// One Account per configured email: owns the API client, the reactive
// device store, the sensor registry, and the background poll task.
// Exactly one poll cycle runs at a time; the interval tick only fires
// again after the previous cycle returned.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::Mutex as AsyncMutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use jaalee_api::{ApiClient, TransportConfig};

use crate::config::AccountConfig;
use crate::entity::{SensorRegistry, SensorState};
use crate::error::CoreError;
use crate::store::DeviceStore;

/// Per-account polling facade.
///
/// Cheaply cloneable via `Arc`. [`connect()`](Self::connect) performs an
/// initial refresh and spawns the poll task;
/// [`disconnect()`](Self::disconnect) cancels it and joins. The client,
/// store, and registry are owned here and unshared across accounts.
#[derive(Clone)]
pub struct Account {
    inner: Arc<AccountInner>,
}

struct AccountInner {
    config: AccountConfig,
    client: ApiClient,
    store: Arc<DeviceStore>,
    registry: Mutex<SensorRegistry>,
    cancel: CancellationToken,
    task: AsyncMutex<Option<JoinHandle<()>>>,
}

impl Account {
    /// Build an account from its configuration. Does NOT touch the
    /// network -- call [`connect()`](Self::connect) or
    /// [`refresh()`](Self::refresh).
    pub fn new(config: AccountConfig) -> Result<Self, CoreError> {
        let transport = TransportConfig {
            timeout: config.timeout,
        };
        let client = match &config.base_url {
            Some(url) => ApiClient::with_base_url(url.clone(), &config.email, &transport)?,
            None => ApiClient::new(&config.email, &transport)?,
        };
        if let Some(token) = &config.token {
            client.set_token(token.clone());
        }

        Ok(Self {
            inner: Arc::new(AccountInner {
                config,
                client,
                store: Arc::new(DeviceStore::new()),
                registry: Mutex::new(SensorRegistry::new()),
                cancel: CancellationToken::new(),
                task: AsyncMutex::new(None),
            }),
        })
    }

    pub fn email(&self) -> &str {
        &self.inner.config.email
    }

    /// The reactive device store (read-only access for presentation).
    pub fn store(&self) -> &Arc<DeviceStore> {
        &self.inner.store
    }

    /// Perform the initial refresh and start periodic polling.
    ///
    /// A failing first refresh aborts the connect -- a stale token is
    /// better surfaced immediately than two minutes later.
    pub async fn connect(&self) -> Result<(), CoreError> {
        self.refresh().await?;

        let mut task = self.inner.task.lock().await;
        if task.is_some() {
            return Ok(());
        }

        let account = self.clone();
        let interval = self.inner.config.poll_interval;
        let cancel = self.inner.cancel.clone();
        *task = Some(tokio::spawn(poll_task(account, interval, cancel)));

        info!(account = %self.email(), "connected, polling started");
        Ok(())
    }

    /// Stop polling and wait for the in-flight cycle, if any, to finish.
    pub async fn disconnect(&self) {
        self.inner.cancel.cancel();
        if let Some(handle) = self.inner.task.lock().await.take() {
            let _ = handle.await;
        }
        debug!(account = %self.email(), "disconnected");
    }

    /// Run one poll cycle: fetch all device data, apply it to the
    /// store, and ensure presentation entities exist for every
    /// `(mac, metric)` seen.
    ///
    /// On failure the store keeps its previous data and only the
    /// availability flag drops.
    pub async fn refresh(&self) -> Result<(), CoreError> {
        match self.inner.client.fetch_all().await {
            Ok(devices) => {
                debug!(account = %self.email(), devices = devices.len(), "poll cycle complete");
                self.inner.store.apply_snapshot(devices);
                if let Ok(mut registry) = self.inner.registry.lock() {
                    registry.ensure_entities(&self.inner.store.snapshot());
                }
                Ok(())
            }
            Err(e) => {
                self.inner.store.mark_failed();
                if e.is_auth_expired() {
                    return Err(CoreError::StaleCredential {
                        email: self.email().to_owned(),
                    });
                }
                Err(CoreError::Api(e))
            }
        }
    }

    /// Render every registered sensor entity against the latest data.
    pub fn sensor_states(&self) -> Vec<SensorState> {
        match self.inner.registry.lock() {
            Ok(registry) => registry.states(&self.inner.store),
            Err(_) => Vec::new(),
        }
    }
}

/// Background poll loop. One cycle at a time: the next tick is only
/// awaited after the previous refresh returned. Failures degrade --
/// the loop never exits except through cancellation.
async fn poll_task(account: Account, period: Duration, cancel: CancellationToken) {
    let mut interval = tokio::time::interval(period);
    interval.tick().await; // consume the immediate first tick

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                match account.refresh().await {
                    Ok(()) => {}
                    Err(CoreError::StaleCredential { ref email }) => {
                        // Known gap: no automatic re-authentication.
                        // Data stays unavailable until the user logs in again.
                        error!(account = %email, "token expired; polling continues but requires manual re-auth");
                    }
                    Err(e) => {
                        warn!(account = %account.email(), error = %e, "poll cycle failed");
                    }
                }
            }
        }
    }
}
