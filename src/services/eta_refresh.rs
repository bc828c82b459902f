//! Responsible for keeping the bus panel up to date
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info};

use crate::{client::BackendClient, view::EtaPanel};

/// Polls the active buses into an [`EtaPanel`].
///
/// Polls aren't awaited before the next one is dispatched, so several can be in flight.
/// Each one gets a sequence number and the panel drops results older than what it shows.
#[derive(Clone)]
pub struct EtaRefresher {
    backend: BackendClient,
    panel: Arc<watch::Sender<EtaPanel>>,
    next_sequence: Arc<AtomicU64>,
}

impl EtaRefresher {
    pub fn new(backend: BackendClient, panel: EtaPanel) -> Self {
        let (sender, _) = watch::channel(panel);

        EtaRefresher {
            backend,
            panel: Arc::new(sender),
            next_sequence: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Notified every time a poll result is shown or the panel is toggled
    pub fn subscribe(&self) -> watch::Receiver<EtaPanel> {
        self.panel.subscribe()
    }

    pub fn panel(&self) -> EtaPanel {
        self.panel.borrow().clone()
    }

    pub fn set_visible(&self, visible: bool) {
        self.panel.send_if_modified(|panel| {
            let changed = panel.visible != visible;
            if visible {
                panel.show();
            } else {
                panel.hide();
            }
            changed
        });
    }

    /// Runs a single poll. Returns whether its result ended up on the panel.
    #[tracing::instrument(skip(self))]
    pub async fn refresh(&self) -> bool {
        let sequence = self.next_sequence.fetch_add(1, Ordering::Relaxed);

        let result = self.backend.fetch_buses().await;
        if let Err(e) = &result {
            error!("Error fetching buses for poll {sequence}: {e}");
        }

        let applied = self
            .panel
            .send_if_modified(|panel| panel.apply(sequence, result));

        if !applied {
            debug!("poll {sequence} finished after a newer one, dropping it");
        }

        applied
    }

    /// Polls every `period` starting right away, until the returned handle is aborted.
    /// Aborting doesn't cancel polls that are already in flight.
    pub fn spawn(&self, period: Duration) -> JoinHandle<()> {
        let refresher = self.clone();

        tokio::spawn(async move {
            info!("Refreshing buses every {} seconds", period.as_secs_f64());

            let mut ticks = interval(period);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                ticks.tick().await;

                let poll = refresher.clone();
                tokio::spawn(async move {
                    poll.refresh().await;
                });
            }
        })
    }
}
