use std::{sync::Arc, time::Duration};

use chestmenu_api::{Menu, MenuView};
use tokio::{
    task::JoinHandle,
    time::{MissedTickBehavior, interval},
};
use tokio_util::sync::CancellationToken;

use crate::menu::OpenViews;

/// Refreshes open views of menus that have a refresh period.
///
/// A menu refreshing every `n` ticks is refreshed on every tick divisible by
/// `n`. Ticks are counted from 1 when the refresher starts.
pub struct AutoRefresher {
    views: Arc<OpenViews>,
    tick_interval: Duration,
    cancel: CancellationToken,
}

const DEFAULT_TPS: f32 = 20.0;
const MAX_TPS: f32 = 1000.0;

impl AutoRefresher {
    /// Rates above 1000 tps are capped. Zero, negative or non-finite rates
    /// fall back to 20 tps.
    #[must_use]
    pub fn new(views: Arc<OpenViews>, tps: f32) -> Self {
        let tps = if tps.is_finite() && tps > 0.0 {
            tps.min(MAX_TPS)
        } else {
            log::warn!("Invalid menu tick rate {tps}, using {DEFAULT_TPS}");
            DEFAULT_TPS
        };
        Self {
            views,
            tick_interval: Duration::from_millis(((1000.0 / tps) as u64).max(1)),
            cancel: CancellationToken::new(),
        }
    }

    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    /// Cancelling the token stops [`Self::run`] after the current tick.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Refreshes the views due on `tick`, returning how many were refreshed.
    pub fn refresh_due(&self, tick: u64) -> usize {
        let mut refreshed = 0;
        for view in self.views.all() {
            let Some(period) = view.chest_menu().refresh_ticks() else {
                continue;
            };
            if tick % u64::from(period.get()) == 0 {
                view.refresh();
                refreshed += 1;
            }
        }
        refreshed
    }

    /// IMPORTANT: Run this in a new tokio task, see [`Self::spawn`].
    pub async fn run(self) {
        let mut ticker = interval(self.tick_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // the first tick completes immediately
        ticker.tick().await;

        let mut tick: u64 = 0;
        loop {
            tokio::select! {
                () = self.cancel.cancelled() => break,
                _ = ticker.tick() => {
                    tick += 1;
                    let refreshed = self.refresh_due(tick);
                    if refreshed > 0 {
                        log::trace!("Refreshed {refreshed} menu views on tick {tick}");
                    }
                }
            }
        }
        log::debug!("Auto refresh stopped");
    }

    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }
}
