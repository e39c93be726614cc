//! Background tick driver: calls the engine's tick once per configured period.

use crate::state::PluginState;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

pub struct TickDriver {
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl TickDriver {
    /// Start ticking on `runtime`. The first tick fires one full period after spawn.
    #[must_use]
    pub fn spawn_on(runtime: &Handle, state: PluginState, period: Duration) -> Self {
        let (shutdown, rx) = watch::channel(false);
        let handle = runtime.spawn(run_ticks(state, period, rx));
        log::info!("raidguard: tick driver started ({}ms period)", period.as_millis());
        Self { shutdown, handle }
    }

    /// Signal the loop and wait for it to finish the tick it is in.
    pub async fn stop(self) {
        // Receiver gone means the loop already exited.
        let _ = self.shutdown.send(true);
        if let Err(e) = self.handle.await {
            log::error!("raidguard: tick driver task failed: {e}");
        }
        log::info!("raidguard: tick driver stopped");
    }
}

async fn run_ticks(state: PluginState, period: Duration, mut shutdown: watch::Receiver<bool>) {
    let mut interval = tokio::time::interval_at(Instant::now() + period, period);
    // No catch-up bursts after a stall.
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                state.tick().await;
            }
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RaidGuardConfig;

    #[tokio::test(start_paused = true)]
    async fn ticks_once_per_period_until_stopped() {
        let state = PluginState::new(RaidGuardConfig::default().sanitize());
        let driver = TickDriver::spawn_on(&Handle::current(), state.clone(), Duration::from_secs(1));

        tokio::time::sleep(Duration::from_millis(3500)).await;
        assert_eq!(state.engine.lock().await.now(), 3);

        driver.stop().await;
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(state.engine.lock().await.now(), 3);
    }
}
