use std::{future::Future, time::Duration};

use tokio::{
    sync::watch,
    task::JoinHandle,
    time::{self, MissedTickBehavior},
};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TickerError {
    #[error("ticker period must be non-zero")]
    ZeroPeriod,
}

/// Runs a job on a fixed period. The first run happens as soon as it starts.
#[derive(Debug)]
pub struct Ticker {
    period: Duration,
}

pub struct TickerHandle {
    stop_sender: watch::Sender<bool>,
    task: JoinHandle<u64>,
}

impl Ticker {
    pub fn new(period: Duration) -> Result<Self, TickerError> {
        match period.is_zero() {
            true => Err(TickerError::ZeroPeriod),
            false => Ok(Ticker { period }),
        }
    }

    pub fn start<F, Fut>(self, mut job: F) -> TickerHandle
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let (stop_sender, mut stop_receiver) = watch::channel(false);
        let period = self.period;

        let task = tokio::spawn(async move {
            let mut interval = time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut runs = 0;

            loop {
                tokio::select! {
                    biased;
                    _ = stop_receiver.changed() => break,
                    _ = interval.tick() => {
                        job().await;
                        runs += 1;
                    }
                }
            }

            log::info!("Ticker stopped after {} runs", runs);
            runs
        });

        TickerHandle { stop_sender, task }
    }
}

impl TickerHandle {
    /// Stops the ticker once any run in progress finishes. Returns how many runs completed.
    pub async fn stop(self) -> u64 {
        _ = self.stop_sender.send(true);

        match self.task.await {
            Ok(runs) => runs,
            Err(e) => {
                log::error!("Ticker task ended abnormally: {:?}", e);
                0
            }
        }
    }
}
