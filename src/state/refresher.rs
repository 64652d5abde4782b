use crate::state::messages::UiEvent;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::interval;
use tokio_util::sync::CancellationToken;

/// Periodic scoreboard refresh. Sends a tick to the UI loop, which knows the
/// selected week and issues the actual request.
pub struct PeriodicRefresher {
    ui_events: mpsc::Sender<UiEvent>,
    every: Duration,
    cancel: CancellationToken,
}

impl PeriodicRefresher {
    pub fn new(ui_events: mpsc::Sender<UiEvent>, every: Duration, cancel: CancellationToken) -> Self {
        Self { ui_events, every, cancel }
    }

    pub async fn run(self) {
        let mut ticker = interval(self.every);
        // Skip the immediate first tick so startup loading isn't double-triggered.
        ticker.tick().await;

        loop {
            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => break,
                _ = ticker.tick() => {}
            }

            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => break,
                sent = self.ui_events.send(UiEvent::RefreshTick) => {
                    if sent.is_err() {
                        break;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn ticks_until_cancelled() {
        let (tx, mut rx) = mpsc::channel(8);
        let cancel = CancellationToken::new();
        let refresher = PeriodicRefresher::new(tx, Duration::from_millis(10), cancel.clone());
        let handle = tokio::spawn(refresher.run());

        let first = tokio::time::timeout(Duration::from_secs(2), rx.recv()).await.unwrap();
        assert!(matches!(first, Some(UiEvent::RefreshTick)));

        cancel.cancel();
        tokio::time::timeout(Duration::from_secs(2), handle)
            .await
            .expect("refresher should stop once cancelled")
            .unwrap();
    }

    #[tokio::test]
    async fn stops_when_receiver_is_gone() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let refresher = PeriodicRefresher::new(tx, Duration::from_millis(5), CancellationToken::new());
        tokio::time::timeout(Duration::from_secs(2), refresher.run())
            .await
            .expect("refresher should stop without a receiver");
    }
}
