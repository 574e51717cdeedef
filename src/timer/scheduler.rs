use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Identity of one scheduled tick source.
///
/// Every `schedule` call hands out a fresh id, so a tick that was already in
/// flight when its source got cancelled can be told apart from a live one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TickId(pub u64);

/// Periodic tick source driving the countdown.
pub trait TickScheduler {
    /// Start emitting ticks every `period` until cancelled.
    fn schedule(&mut self, period: Duration) -> TickId;

    /// Stop the given source. Unknown or already cancelled ids are ignored.
    fn cancel(&mut self, id: TickId);
}

type TickSink = Arc<dyn Fn(TickId) -> bool + Send + Sync>;

/// Wall-clock scheduler: one sleeper thread per live tick source.
///
/// The sink returns `false` once nobody is listening any more, which also
/// ends the thread. Drift from sleep granularity is not corrected.
pub struct IntervalScheduler {
    sink: TickSink,
    next_id: u64,
    live: HashMap<TickId, Arc<AtomicBool>>,
}

impl IntervalScheduler {
    pub fn new<F>(sink: F) -> Self
    where
        F: Fn(TickId) -> bool + Send + Sync + 'static,
    {
        Self {
            sink: Arc::new(sink),
            next_id: 0,
            live: HashMap::new(),
        }
    }
}

impl TickScheduler for IntervalScheduler {
    fn schedule(&mut self, period: Duration) -> TickId {
        self.next_id += 1;
        let id = TickId(self.next_id);
        let cancelled = Arc::new(AtomicBool::new(false));
        self.live.insert(id, cancelled.clone());

        let sink = self.sink.clone();
        std::thread::spawn(move || loop {
            std::thread::sleep(period);
            if cancelled.load(Ordering::Acquire) {
                return;
            }
            if !sink(id) {
                return;
            }
        });

        tracing::debug!(tick_id = id.0, ?period, "tick source scheduled");
        id
    }

    fn cancel(&mut self, id: TickId) {
        if let Some(flag) = self.live.remove(&id) {
            flag.store(true, Ordering::Release);
            tracing::debug!(tick_id = id.0, "tick source cancelled");
        }
    }
}

impl Drop for IntervalScheduler {
    fn drop(&mut self) {
        for flag in self.live.values() {
            flag.store(true, Ordering::Release);
        }
    }
}

/// Virtual-time scheduler for tests: records what was scheduled and
/// cancelled, never fires on its own. Tests call `TimerEngine::tick` with
/// `active()` to advance time.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct ManualScheduler {
    next_id: u64,
    active: Vec<TickId>,
    cancelled: Vec<TickId>,
}

#[cfg(test)]
impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recently scheduled source that is still live.
    pub fn active(&self) -> Option<TickId> {
        self.active.last().copied()
    }

    pub fn live_count(&self) -> usize {
        self.active.len()
    }

    pub fn cancelled(&self) -> &[TickId] {
        &self.cancelled
    }
}

#[cfg(test)]
impl TickScheduler for ManualScheduler {
    fn schedule(&mut self, _period: Duration) -> TickId {
        self.next_id += 1;
        let id = TickId(self.next_id);
        self.active.push(id);
        id
    }

    fn cancel(&mut self, id: TickId) {
        if let Some(pos) = self.active.iter().position(|live| *live == id) {
            self.active.remove(pos);
            self.cancelled.push(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn manual_scheduler_hands_out_fresh_ids() {
        let mut sched = ManualScheduler::new();
        let a = sched.schedule(Duration::from_secs(1));
        let b = sched.schedule(Duration::from_secs(1));
        assert_ne!(a, b);
        assert_eq!(sched.active(), Some(b));
        assert_eq!(sched.live_count(), 2);
    }

    #[test]
    fn manual_scheduler_cancel_is_idempotent() {
        let mut sched = ManualScheduler::new();
        let id = sched.schedule(Duration::from_secs(1));
        sched.cancel(id);
        sched.cancel(id);
        assert_eq!(sched.active(), None);
        assert_eq!(sched.cancelled(), &[id]);
    }

    #[test]
    fn interval_scheduler_emits_tagged_ticks() {
        let (tx, rx) = mpsc::channel();
        let mut sched = IntervalScheduler::new(move |id| tx.send(id).is_ok());
        let id = sched.schedule(Duration::from_millis(5));

        let first = rx.recv_timeout(Duration::from_secs(2)).unwrap();
        assert_eq!(first, id);
        sched.cancel(id);
    }

    #[test]
    fn interval_scheduler_stops_after_cancel() {
        let (tx, rx) = mpsc::channel();
        let mut sched = IntervalScheduler::new(move |id| tx.send(id).is_ok());
        let id = sched.schedule(Duration::from_millis(5));
        rx.recv_timeout(Duration::from_secs(2)).unwrap();

        sched.cancel(id);
        // At most one tick can already be past the cancel check; drain it.
        std::thread::sleep(Duration::from_millis(30));
        while rx.try_recv().is_ok() {}
        assert!(rx.recv_timeout(Duration::from_millis(50)).is_err());
    }
}
