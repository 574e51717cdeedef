use std::sync::mpsc;

use anyhow::{Context, Result};

use crate::api::{self, ApiError, BackendClient, SaveRequest, SaveResponse, StatsSnapshot};
use crate::stats::StatsQuery;
use crate::tui::event::AppEvent;

/// Backend work requested by the screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendJob {
    Save(SaveRequest),
    LoadStats(StatsQuery),
    LoadYears,
}

/// Settled backend work, delivered back through the event queue.
#[derive(Debug)]
pub enum BackendEvent {
    SaveFinished(Result<SaveResponse, ApiError>),
    StatsLoaded(Result<StatsSnapshot, ApiError>),
    YearsLoaded(Result<Vec<i32>, ApiError>),
}

/// Runs backend calls off the UI thread.
///
/// Jobs execute one after another on a dedicated thread with its own
/// single-threaded runtime, so a save is always answered before the stats
/// reload it triggers.
pub struct BackendWorker {
    jobs: mpsc::Sender<BackendJob>,
    _handle: std::thread::JoinHandle<()>,
}

impl BackendWorker {
    pub fn spawn(client: BackendClient, events: mpsc::Sender<AppEvent>) -> Result<Self> {
        let rt = api::runtime()?;
        let (jobs, job_rx) = mpsc::channel::<BackendJob>();

        let handle = std::thread::Builder::new()
            .name("backend-worker".into())
            .spawn(move || {
                for job in job_rx {
                    tracing::debug!(?job, "backend job");
                    let event = match job {
                        BackendJob::Save(request) => {
                            BackendEvent::SaveFinished(rt.block_on(client.save_pomodoros(&request)))
                        }
                        BackendJob::LoadStats(query) => {
                            BackendEvent::StatsLoaded(rt.block_on(client.fetch_stats(&query)))
                        }
                        BackendJob::LoadYears => {
                            BackendEvent::YearsLoaded(rt.block_on(client.fetch_years()))
                        }
                    };
                    if events.send(AppEvent::Backend(event)).is_err() {
                        return;
                    }
                }
            })
            .context("Failed to start backend worker thread")?;

        Ok(Self {
            jobs,
            _handle: handle,
        })
    }

    pub fn submit(&self, job: BackendJob) {
        if self.jobs.send(job).is_err() {
            tracing::error!("backend worker is gone, job dropped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn failed_call_comes_back_as_event() {
        let (tx, rx) = mpsc::channel();
        let client = BackendClient::new("http://127.0.0.1:1", Duration::from_secs(2)).unwrap();
        let worker = BackendWorker::spawn(client, tx).unwrap();

        worker.submit(BackendJob::LoadYears);

        match rx.recv_timeout(Duration::from_secs(10)).unwrap() {
            AppEvent::Backend(BackendEvent::YearsLoaded(result)) => assert!(result.is_err()),
            _ => panic!("expected YearsLoaded"),
        }
    }
}
