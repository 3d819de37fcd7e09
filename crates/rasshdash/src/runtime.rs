//! Dashboard runtime - the controller loop.
//!
//! One bounded queue carries every [`DashEvent`]. The poller, the push
//! listener, the input reader and the deferred timers all post into it;
//! the loop below is its only consumer, so reconciler state is never shared.

use crate::config::DashConfig;
use crate::event::{DashEvent, Deferred};
use crate::poller::{HttpSnapshotSource, PollerHandle, SnapshotPoller};
use crate::presenter::{LogPresenter, Presenter};
use crate::push::{PushHandle, PushListener};
use crate::reconciler::{AnimationTimings, ViewReconciler};
use crate::tui::{self, TuiPresenter};
use crate::view::ViewModel;
use anyhow::{Context, Result};
use chrono::Local;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Controller queue depth
pub const QUEUE_CAPACITY: usize = 64;

pub struct Controller<P> {
    reconciler: ViewReconciler,
    view: ViewModel,
    presenter: P,
    tx: mpsc::Sender<DashEvent>,
    rx: mpsc::Receiver<DashEvent>,
    timers: JoinSet<()>,
    poller: Option<PollerHandle>,
    push: Option<PushHandle>,
}

impl<P: Presenter> Controller<P> {
    pub fn new(timings: AnimationTimings, presenter: P) -> Self {
        let (tx, rx) = mpsc::channel(QUEUE_CAPACITY);
        let reconciler = ViewReconciler::new(timings, Local::now());
        let view = reconciler.view();
        Self {
            reconciler,
            view,
            presenter,
            tx,
            rx,
            timers: JoinSet::new(),
            poller: None,
            push: None,
        }
    }

    /// Hand over the producers so shutdown can stop them
    pub fn attach(&mut self, poller: PollerHandle, push: PushHandle) {
        self.poller = Some(poller);
        self.push = Some(push);
    }

    /// Producer side of the queue
    pub fn sender(&self) -> mpsc::Sender<DashEvent> {
        self.tx.clone()
    }

    pub fn view(&self) -> &ViewModel {
        &self.view
    }

    /// Consume events until shutdown; returns the presenter for inspection
    pub async fn run(mut self) -> Result<P> {
        let initial = self.reconciler.view();
        let result = match self.presenter.present(&initial, &Default::default()) {
            Ok(()) => self.event_loop().await,
            Err(e) => Err(e.context("Initial render failed")),
        };

        if let Some(poller) = self.poller.take() {
            poller.abort();
        }
        if let Some(push) = self.push.take() {
            push.unsubscribe();
        }
        self.timers.abort_all();
        let teardown = self.presenter.teardown();
        result?;
        teardown?;
        Ok(self.presenter)
    }

    async fn event_loop(&mut self) -> Result<()> {
        loop {
            tokio::select! {
                event = self.rx.recv() => {
                    let Some(event) = event else {
                        return Ok(());
                    };
                    let outcome = self.reconciler.apply(event, Local::now());
                    if outcome.shutdown {
                        info!("Shutting down dashboard");
                        return Ok(());
                    }
                    for deferred in outcome.deferred {
                        self.schedule(deferred);
                    }
                    if outcome.patch.is_empty() {
                        continue;
                    }
                    debug!(changed = ?outcome.patch.changed(), "Render");
                    self.view.apply(&outcome.patch);
                    self.presenter.present(&self.view, &outcome.patch)?;
                }
                Some(joined) = self.timers.join_next() => {
                    if let Err(e) = joined {
                        if !e.is_cancelled() {
                            warn!(error = %e, "Timer task failed");
                        }
                    }
                }
            }
        }
    }

    fn schedule(&mut self, deferred: Deferred) {
        let tx = self.tx.clone();
        self.timers.spawn(async move {
            tokio::time::sleep(deferred.after).await;
            let _ = tx.send(DashEvent::Timer(deferred.timer)).await;
        });
    }
}

/// Run the live dashboard until the operator quits
pub async fn watch(config: &DashConfig, headless: bool) -> Result<()> {
    let timings = AnimationTimings::from(config.animation.clone());

    if headless {
        let controller = Controller::new(timings, LogPresenter);
        run_wired(config, controller).await
    } else {
        let presenter = TuiPresenter::new()?;
        let controller = Controller::new(timings, presenter);
        let stop = Arc::new(AtomicBool::new(false));
        spawn_input_reader(controller.sender(), Arc::clone(&stop));
        let result = run_wired(config, controller).await;
        // Lets the blocking reader return so the runtime can shut down
        stop.store(true, Ordering::Relaxed);
        result
    }
}

async fn run_wired<P: Presenter>(
    config: &DashConfig,
    mut controller: Controller<P>,
) -> Result<()> {
    let source = HttpSnapshotSource::new(&config.server, config.poll.request_timeout())
        .context("Failed to build HTTP client")?;
    let listener = PushListener::from_config(&config.server, &config.push)
        .context("Invalid server URL")?;
    let poller = SnapshotPoller::from_config(source, &config.poll).spawn(controller.sender());
    let push = listener.spawn(controller.sender());
    controller.attach(poller, push);

    let signal_tx = controller.sender();
    let signals = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = signal_tx.send(DashEvent::Shutdown).await;
        }
    });

    info!(url = %config.server.base_url, "Dashboard started");
    let result = controller.run().await.map(|_| ());
    signals.abort();
    result
}

/// Raw mode swallows Ctrl-C, so quit keys are read here
fn spawn_input_reader(tx: mpsc::Sender<DashEvent>, stop: Arc<AtomicBool>) {
    tokio::task::spawn_blocking(move || {
        match tui::wait_for_quit(|| !stop.load(Ordering::Relaxed)) {
            Ok(true) => {
                let _ = tx.blocking_send(DashEvent::Shutdown);
            }
            Ok(false) => {}
            Err(e) => {
                warn!(error = %e, "Terminal input failed");
                let _ = tx.blocking_send(DashEvent::Shutdown);
            }
        }
    });
}
