//! Exam Sweep Scheduler
//!
//! Runs the auto-completion sweep once immediately at start and then on
//! a fixed interval for the lifetime of the store. The timer is
//! cancelled on shutdown (and on drop) so a sweep never fires against a
//! torn-down store.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::mpsc;

use crate::study::store::StudyStore;

/// How often the sweep re-checks the timetable.
pub const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Message types for scheduler communication
#[derive(Debug)]
pub enum SchedulerMessage {
    /// Run a sweep right now
    SweepNow,
    /// Shutdown the scheduler
    Shutdown,
}

/// Periodic exam auto-completion task, owned by the store's lifecycle.
pub struct ExamSweepScheduler {
    store: Arc<Mutex<StudyStore>>,
    sender: Option<mpsc::Sender<SchedulerMessage>>,
}

impl ExamSweepScheduler {
    pub fn new(store: Arc<Mutex<StudyStore>>) -> Self {
        Self {
            store,
            sender: None,
        }
    }

    /// Start the sweep loop in a background task.
    ///
    /// Must be called from within a tokio runtime. The first sweep runs
    /// immediately.
    pub fn start(&mut self) {
        let (tx, rx) = mpsc::channel(8);
        self.sender = Some(tx);

        let store = Arc::clone(&self.store);
        tokio::spawn(async move {
            sweep_loop(store, rx).await;
        });
    }

    /// Request an out-of-band sweep.
    pub fn sweep_now(&self) {
        if let Some(sender) = &self.sender {
            let _ = sender.try_send(SchedulerMessage::SweepNow);
        }
    }

    /// Stop the recurring sweep.
    pub fn shutdown(&self) {
        if let Some(sender) = &self.sender {
            let _ = sender.try_send(SchedulerMessage::Shutdown);
        }
    }
}

impl Drop for ExamSweepScheduler {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Main sweep loop
async fn sweep_loop(store: Arc<Mutex<StudyStore>>, mut receiver: mpsc::Receiver<SchedulerMessage>) {
    let mut ticker = tokio::time::interval(SWEEP_INTERVAL);

    loop {
        tokio::select! {
            // The first tick fires immediately, then every SWEEP_INTERVAL
            _ = ticker.tick() => {
                run_sweep(&store);
            }
            msg = receiver.recv() => {
                match msg {
                    Some(SchedulerMessage::SweepNow) => run_sweep(&store),
                    Some(SchedulerMessage::Shutdown) | None => {
                        log::info!("Exam sweep scheduler shutting down");
                        break;
                    }
                }
            }
        }
    }
}

fn run_sweep(store: &Arc<Mutex<StudyStore>>) {
    if let Ok(mut store) = store.lock() {
        store.auto_complete_exams();
    }
}
