//! Persistence worker: background task driving the persistence timers
//!
//! Receives state snapshots over a channel, sleeps until the controller's
//! next deadline, fires due timers, and flushes the pending write on
//! shutdown.

use shared::models::WizardState;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

use super::clock::Clock;
use super::controller::{PersistenceController, PollOutcome};
use super::store::KvStore;

/// Commands accepted by the worker
#[derive(Debug)]
pub enum PersistenceCommand {
    Schedule(Box<WizardState>),
    Touch,
    Flush,
    Clear,
}

/// Sender side handed to the wizard
#[derive(Debug, Clone)]
pub struct PersistenceHandle {
    tx: mpsc::UnboundedSender<PersistenceCommand>,
}

impl PersistenceHandle {
    fn send(&self, command: PersistenceCommand) {
        if self.tx.send(command).is_err() {
            tracing::warn!("PersistenceWorker stopped, dropping command");
        }
    }

    pub fn schedule(&self, state: &WizardState) {
        self.send(PersistenceCommand::Schedule(Box::new(state.clone())));
    }

    pub fn touch(&self) {
        self.send(PersistenceCommand::Touch);
    }

    pub fn flush(&self) {
        self.send(PersistenceCommand::Flush);
    }

    pub fn clear(&self) {
        self.send(PersistenceCommand::Clear);
    }
}

pub struct PersistenceWorker<S, C> {
    controller: PersistenceController<S, C>,
    rx: mpsc::UnboundedReceiver<PersistenceCommand>,
    shutdown: CancellationToken,
}

impl<S, C> PersistenceWorker<S, C>
where
    S: KvStore + Send + 'static,
    C: Clock + Send + 'static,
{
    pub fn new(
        controller: PersistenceController<S, C>,
        shutdown: CancellationToken,
    ) -> (Self, PersistenceHandle) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                controller,
                rx,
                shutdown,
            },
            PersistenceHandle { tx },
        )
    }

    /// Spawn the worker on the current runtime
    ///
    /// The join handle yields the controller back once the worker stops.
    pub fn spawn(
        controller: PersistenceController<S, C>,
        shutdown: CancellationToken,
    ) -> (PersistenceHandle, JoinHandle<PersistenceController<S, C>>) {
        let (worker, handle) = Self::new(controller, shutdown);
        (handle, tokio::spawn(worker.run()))
    }

    /// Run until shutdown or until every handle is dropped
    pub async fn run(mut self) -> PersistenceController<S, C> {
        tracing::info!("PersistenceWorker started");

        loop {
            let deadline = self.controller.next_deadline();
            let sleep_until = match deadline {
                Some(due_at) => {
                    let wait = (due_at - self.controller.now()).max(0) as u64;
                    Instant::now() + Duration::from_millis(wait)
                }
                None => Instant::now() + Duration::from_secs(3600),
            };

            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    tracing::info!("PersistenceWorker shutting down");
                    // Apply snapshots queued before the shutdown signal
                    while let Ok(command) = self.rx.try_recv() {
                        self.handle(command);
                    }
                    self.controller.flush();
                    break;
                }

                _ = tokio::time::sleep_until(sleep_until), if deadline.is_some() => {
                    if self.controller.poll() == PollOutcome::Expired {
                        tracing::info!("Persisted wizard state expired from inactivity");
                    }
                }

                command = self.rx.recv() => {
                    match command {
                        Some(command) => self.handle(command),
                        None => {
                            tracing::info!("All persistence handles dropped, flushing");
                            self.controller.flush();
                            break;
                        }
                    }
                }
            }
        }

        tracing::info!("PersistenceWorker stopped");
        self.controller
    }

    fn handle(&mut self, command: PersistenceCommand) {
        match command {
            PersistenceCommand::Schedule(state) => {
                self.controller.schedule(&state);
            }
            PersistenceCommand::Touch => self.controller.touch(),
            PersistenceCommand::Flush => self.controller.flush(),
            PersistenceCommand::Clear => self.controller.clear(),
        }
    }
}
