//! Snapshot poller - periodic pulls of the stats and activity endpoints.
//!
//! Each endpoint runs on its own fixed-interval schedule, with one pull
//! straight away at startup. Every pull is a separate task, so a slow request
//! never holds back the next tick. A result that lands after a newer pull of
//! the same endpoint has already been posted is dropped. Failed pulls are
//! logged and dropped too: the reconciler never hears about them and keeps
//! showing the last good data.

use crate::config::{PollConfig, ServerConfig};
use crate::event::DashEvent;
use rassh_shared::{ActivityRecord, RasshError, StatsResponse};
use serde::de::DeserializeOwned;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, warn};

/// Read side of the honeypot dashboard API
pub trait SnapshotSource: Send + Sync + 'static {
    fn fetch_stats(&self) -> impl Future<Output = Result<StatsResponse, RasshError>> + Send;

    fn fetch_activity(
        &self,
    ) -> impl Future<Output = Result<Vec<ActivityRecord>, RasshError>> + Send;
}

/// Pull endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Stats,
    Activity,
}

impl Endpoint {
    pub fn name(self) -> &'static str {
        match self {
            Endpoint::Stats => "stats",
            Endpoint::Activity => "recent_activity",
        }
    }
}

/// HTTP implementation over reqwest
#[derive(Debug, Clone)]
pub struct HttpSnapshotSource {
    client: reqwest::Client,
    stats_url: String,
    activity_url: String,
}

impl HttpSnapshotSource {
    pub fn new(server: &ServerConfig, timeout: Option<Duration>) -> Result<Self, RasshError> {
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("rasshdash/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| RasshError::Http(e.to_string()))?;

        Ok(Self {
            client,
            stats_url: server.stats_url(),
            activity_url: server.activity_url(),
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, RasshError> {
        let resp = self.client.get(url).send().await.map_err(|e| {
            if e.is_connect() || e.is_timeout() {
                RasshError::Unreachable(e.to_string())
            } else {
                RasshError::Http(e.to_string())
            }
        })?;

        if !resp.status().is_success() {
            return Err(RasshError::Status(resp.status().as_u16()));
        }

        let body = resp
            .text()
            .await
            .map_err(|e| RasshError::Http(e.to_string()))?;
        serde_json::from_str(&body).map_err(|e| RasshError::Malformed(e.to_string()))
    }
}

impl SnapshotSource for HttpSnapshotSource {
    async fn fetch_stats(&self) -> Result<StatsResponse, RasshError> {
        self.get_json(&self.stats_url).await
    }

    async fn fetch_activity(&self) -> Result<Vec<ActivityRecord>, RasshError> {
        self.get_json(&self.activity_url).await
    }
}

/// Pull one endpoint and normalize the response
pub async fn pull<S: SnapshotSource>(source: &S, endpoint: Endpoint) -> Result<DashEvent, RasshError> {
    match endpoint {
        Endpoint::Stats => source.fetch_stats().await.map(DashEvent::StatsPolled),
        Endpoint::Activity => source.fetch_activity().await.map(DashEvent::ActivityPolled),
    }
}

pub struct SnapshotPoller<S> {
    source: Arc<S>,
    stats_every: Duration,
    activity_every: Duration,
}

impl<S: SnapshotSource> SnapshotPoller<S> {
    pub fn new(source: S, stats_every: Duration, activity_every: Duration) -> Self {
        Self {
            source: Arc::new(source),
            stats_every,
            activity_every,
        }
    }

    pub fn from_config(source: S, config: &PollConfig) -> Self {
        Self::new(source, config.stats_interval(), config.activity_interval())
    }

    /// Start both schedules; events go to `tx`
    pub fn spawn(self, tx: mpsc::Sender<DashEvent>) -> PollerHandle {
        let stats = tokio::spawn(run_schedule(
            Arc::clone(&self.source),
            Endpoint::Stats,
            self.stats_every,
            tx.clone(),
        ));
        let activity = tokio::spawn(run_schedule(
            self.source,
            Endpoint::Activity,
            self.activity_every,
            tx,
        ));
        PollerHandle { stats, activity }
    }
}

/// Running schedules; aborting them also drops in-flight pulls
pub struct PollerHandle {
    stats: JoinHandle<()>,
    activity: JoinHandle<()>,
}

impl PollerHandle {
    pub fn abort(&self) {
        self.stats.abort();
        self.activity.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.stats.is_finished() && self.activity.is_finished()
    }
}

async fn run_schedule<S: SnapshotSource>(
    source: Arc<S>,
    endpoint: Endpoint,
    every: Duration,
    tx: mpsc::Sender<DashEvent>,
) {
    // First tick completes immediately: that is the startup pull
    let mut ticker = time::interval(every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut inflight = JoinSet::new();
    let mut tick: u64 = 0;
    // Highest tick whose result has been posted
    let posted = Arc::new(AtomicU64::new(0));

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if tx.is_closed() {
                    debug!(endpoint = endpoint.name(), "Queue closed, stopping schedule");
                    return;
                }
                tick += 1;
                let seq = tick;
                let source = Arc::clone(&source);
                let posted = Arc::clone(&posted);
                let tx = tx.clone();
                inflight.spawn(async move {
                    match pull(source.as_ref(), endpoint).await {
                        Ok(event) => {
                            if posted.fetch_max(seq, Ordering::SeqCst) > seq {
                                debug!(endpoint = endpoint.name(), seq, "Dropping pull overtaken by a newer one");
                                return;
                            }
                            let _ = tx.send(event).await;
                        }
                        Err(e) => {
                            warn!(endpoint = endpoint.name(), error = %e, "Pull failed, keeping last data");
                        }
                    }
                });
            }
            Some(_) = inflight.join_next() => {}
        }
    }
}
