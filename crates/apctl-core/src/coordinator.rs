// ── Polling coordinator ──
//
// Owns the last-known access point snapshot for one controller site,
// refreshes it on a fixed period, and routes power/LED writes through the
// client followed by an immediate re-fetch. Fetch and install run under a
// single async mutex so snapshots are installed in the order they were
// fetched.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use apctl_api::{AccessPoint, Band, ControllerClient, LedMode, MacAddress, PowerLevel};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::ControllerConfig;
use crate::error::CoreError;

// ── Snapshot ─────────────────────────────────────────────────────

/// Access points keyed by MAC, as returned by one successful fetch.
///
/// Replaced wholesale on every refresh; never patched in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Snapshot {
    access_points: BTreeMap<MacAddress, AccessPoint>,
}

impl Snapshot {
    pub fn from_access_points(access_points: impl IntoIterator<Item = AccessPoint>) -> Self {
        Self {
            access_points: access_points
                .into_iter()
                .map(|ap| (ap.mac.clone(), ap))
                .collect(),
        }
    }

    pub fn get(&self, mac: &MacAddress) -> Option<&AccessPoint> {
        self.access_points.get(mac)
    }

    pub fn contains(&self, mac: &MacAddress) -> bool {
        self.access_points.contains_key(mac)
    }

    /// Access points in MAC order.
    pub fn access_points(&self) -> impl Iterator<Item = &AccessPoint> {
        self.access_points.values()
    }

    pub fn len(&self) -> usize {
        self.access_points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.access_points.is_empty()
    }
}

// ── Status ───────────────────────────────────────────────────────

/// Outcome of the most recent refresh.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CoordinatorStatus {
    /// A snapshot has been installed at least once.
    pub initialized: bool,
    /// The most recent refresh succeeded. A failure keeps the previous
    /// snapshot, so data may be stale while this is `false`.
    pub last_update_success: bool,
    /// When the current snapshot was installed.
    pub last_refresh: Option<DateTime<Utc>>,
    /// Message of the most recent failed refresh, cleared on success.
    pub last_error: Option<String>,
}

// ── Coordinator ──────────────────────────────────────────────────

/// Process-wide cache and write path for one controller site.
///
/// Cheaply cloneable via `Arc`. Call [`start()`](Self::start) to load the
/// first snapshot and spawn the periodic refresh, and
/// [`shutdown()`](Self::shutdown) to stop it.
#[derive(Clone)]
pub struct Coordinator {
    inner: Arc<CoordinatorInner>,
}

struct CoordinatorInner {
    client: ControllerClient,
    poll_interval: Duration,
    snapshot: watch::Sender<Arc<Snapshot>>,
    status: watch::Sender<CoordinatorStatus>,
    /// Held across fetch + install.
    refresh_lock: Mutex<()>,
    started: AtomicBool,
    cancel: CancellationToken,
    task_handles: Mutex<Vec<JoinHandle<()>>>,
}

impl Coordinator {
    /// Create a coordinator from configuration. Does not contact the
    /// controller.
    pub fn new(config: &ControllerConfig) -> Result<Self, CoreError> {
        let client = config.build_client()?;
        Ok(Self::with_client(client, config.poll_interval))
    }

    /// Create a coordinator around an existing client.
    pub fn with_client(client: ControllerClient, poll_interval: Duration) -> Self {
        let (snapshot, _) = watch::channel(Arc::new(Snapshot::default()));
        let (status, _) = watch::channel(CoordinatorStatus::default());

        Self {
            inner: Arc::new(CoordinatorInner {
                client,
                poll_interval,
                snapshot,
                status,
                refresh_lock: Mutex::new(()),
                started: AtomicBool::new(false),
                cancel: CancellationToken::new(),
                task_handles: Mutex::new(Vec::new()),
            }),
        }
    }

    pub fn client(&self) -> &ControllerClient {
        &self.inner.client
    }

    // ── Lifecycle ────────────────────────────────────────────────

    /// Load the first snapshot, then spawn the periodic refresh task.
    ///
    /// A failed first load is returned and nothing is spawned; `start()` may
    /// then be retried. Once started, or after [`shutdown()`](Self::shutdown),
    /// further calls do nothing.
    pub async fn start(&self) -> Result<(), CoreError> {
        if self.inner.cancel.is_cancelled() || self.inner.started.swap(true, Ordering::AcqRel) {
            debug!("coordinator already started or shut down, ignoring start");
            return Ok(());
        }
        if let Err(e) = self.first_refresh().await {
            self.inner.started.store(false, Ordering::Release);
            return Err(e);
        }

        let period = self.inner.poll_interval;
        if period.is_zero() {
            debug!("periodic refresh disabled");
            return Ok(());
        }

        let ctrl = self.clone();
        let cancel = self.inner.cancel.child_token();
        self.inner
            .task_handles
            .lock()
            .await
            .push(tokio::spawn(refresh_task(ctrl, period, cancel)));

        info!(interval_secs = period.as_secs(), "coordinator started");
        Ok(())
    }

    /// Stop the periodic refresh and end the controller session.
    ///
    /// Waits for the refresh task to exit. Logs out only when a session is
    /// held; logout failures are logged.
    pub async fn shutdown(&self) {
        self.inner.cancel.cancel();

        let mut handles = self.inner.task_handles.lock().await;
        for handle in handles.drain(..) {
            let _ = handle.await;
        }
        drop(handles);

        if self.inner.client.is_authenticated() {
            if let Err(e) = self.inner.client.logout().await {
                warn!(error = %e, "logout failed (non-fatal)");
            }
        } else {
            debug!("no active session, skipping logout");
        }
        debug!("coordinator shut down");
    }

    // ── Refresh ──────────────────────────────────────────────────

    /// Initial fetch. Failure is returned so setup can abort.
    pub async fn first_refresh(&self) -> Result<(), CoreError> {
        self.fetch_and_install().await
    }

    /// Fetch and install a new snapshot.
    ///
    /// A failure is recorded in [`status()`](Self::status) and leaves the
    /// current snapshot in place. Returns whether the refresh succeeded.
    pub async fn refresh(&self) -> bool {
        match self.fetch_and_install().await {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "refresh failed, keeping previous snapshot");
                false
            }
        }
    }

    async fn fetch_and_install(&self) -> Result<(), CoreError> {
        let _guard = self.inner.refresh_lock.lock().await;

        match self.inner.client.fetch_access_points().await {
            Ok(access_points) => {
                let snapshot = Snapshot::from_access_points(access_points);
                debug!(access_points = snapshot.len(), "installing snapshot");
                // Status before snapshot: snapshot receivers read the
                // status that matches the data they were woken for.
                self.inner.status.send_modify(|status| {
                    status.initialized = true;
                    status.last_update_success = true;
                    status.last_refresh = Some(Utc::now());
                    status.last_error = None;
                });
                self.inner.snapshot.send_replace(Arc::new(snapshot));
                Ok(())
            }
            Err(e) => {
                let err = CoreError::from(e);
                let message = err.to_string();
                self.inner.status.send_modify(|status| {
                    status.last_update_success = false;
                    status.last_error = Some(message);
                });
                Err(err)
            }
        }
    }

    // ── Reads ────────────────────────────────────────────────────

    /// The current snapshot. Empty until the first successful refresh.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.inner.snapshot.borrow().clone()
    }

    /// Receiver that wakes on every installed snapshot.
    pub fn subscribe(&self) -> watch::Receiver<Arc<Snapshot>> {
        self.inner.snapshot.subscribe()
    }

    /// Receiver that wakes on every refresh outcome, failures included.
    pub fn subscribe_status(&self) -> watch::Receiver<CoordinatorStatus> {
        self.inner.status.subscribe()
    }

    pub fn status(&self) -> CoordinatorStatus {
        self.inner.status.borrow().clone()
    }

    /// Whether entities for `mac` should be shown as available: the last
    /// refresh succeeded and the AP is in the snapshot.
    pub fn is_available(&self, mac: &MacAddress) -> bool {
        let last_ok = self.inner.status.borrow().last_update_success;
        last_ok && self.snapshot().contains(mac)
    }

    // ── Writes ───────────────────────────────────────────────────

    /// Set the transmit power of `band` on the AP with `mac`.
    ///
    /// On success the snapshot is refreshed before returning `true`. An
    /// unknown MAC, a rejected write, or a transport failure returns
    /// `false` and leaves the snapshot untouched.
    pub async fn set_power(&self, mac: &MacAddress, band: Band, power: PowerLevel) -> bool {
        let Some((device_id, radio_table)) = self
            .snapshot()
            .get(mac)
            .map(|ap| (ap.id.clone(), ap.raw_radio_table.clone()))
        else {
            warn!(%mac, "access point not found");
            return false;
        };

        let result = self
            .inner
            .client
            .set_radio_power(&device_id, mac, &radio_table, band, power)
            .await;
        self.after_write(mac, result).await
    }

    /// Set the LED override on the AP with `mac`. Same contract as
    /// [`set_power`](Self::set_power).
    pub async fn set_led(&self, mac: &MacAddress, mode: LedMode) -> bool {
        let Some(device_id) = self.snapshot().get(mac).map(|ap| ap.id.clone()) else {
            warn!(%mac, "access point not found");
            return false;
        };

        let result = self
            .inner
            .client
            .set_led_override(&device_id, mac, mode)
            .await;
        self.after_write(mac, result).await
    }

    async fn after_write(&self, mac: &MacAddress, result: Result<bool, apctl_api::Error>) -> bool {
        match result {
            Ok(true) => {
                // The write stands even if this refresh fails; the failure
                // shows up in status().
                self.refresh().await;
                true
            }
            Ok(false) => false,
            Err(e) => {
                warn!(%mac, error = %e, "update failed");
                false
            }
        }
    }
}

/// Periodic refresh loop. Exits when `cancel` fires.
async fn refresh_task(coordinator: Coordinator, period: Duration, cancel: CancellationToken) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    interval.tick().await; // consume the immediate first tick

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                debug!("periodic refresh");
                coordinator.refresh().await;
            }
        }
    }
    debug!("refresh task stopped");
}
