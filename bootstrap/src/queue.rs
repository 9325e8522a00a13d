use crate::config::{Admission, TerminalBootstrapConfig};
use crate::error::Result;
use crate::garden::Garden;
use crate::pipeline;
use futures::future::join_all;
use kube::ResourceExt;
use log::{debug, error, warn};
use std::sync::Arc;
use terminal_model::Seed;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;

/// The result of one drained bootstrap task, delivered to the observer channel. The production
/// caller may drop the receiver; tests use it to assert outcomes deterministically.
#[derive(Debug)]
pub struct BootstrapOutcome {
    pub seed: String,
    pub result: Result<()>,
}

/// Serializing scheduler for seed bootstrap tasks. Admission gates are checked at submission
/// time; admitted seeds are drained by a worker pool of the configured width (default 1, which
/// also prevents two concurrent passes over the same seed from racing). Tasks run to completion
/// or failure, are never retried here, and do not survive a process restart; re-bootstrap relies
/// on external resubmission and the idempotence of the pipeline.
pub struct SeedBootstrapQueue {
    admission: Admission,
    sender: Option<mpsc::UnboundedSender<Seed>>,
    workers: Vec<JoinHandle<()>>,
}

impl SeedBootstrapQueue {
    /// Validates the configuration once and spawns the worker pool.
    pub fn start(
        config: Arc<TerminalBootstrapConfig>,
        garden: Arc<dyn Garden>,
        observer: Option<mpsc::UnboundedSender<BootstrapOutcome>>,
    ) -> Self {
        let admission = config.admission();
        let (sender, receiver) = mpsc::unbounded_channel();
        let receiver = Arc::new(Mutex::new(receiver));
        let width = config.queue_width.max(1);
        let workers = (0..width)
            .map(|_| {
                tokio::spawn(worker_loop(
                    Arc::clone(&receiver),
                    Arc::clone(&config),
                    Arc::clone(&garden),
                    observer.clone(),
                ))
            })
            .collect();
        Self {
            admission,
            sender: Some(sender),
            workers,
        }
    }

    /// Submits a seed for bootstrapping. Fire-and-forget: the seed is silently skipped when the
    /// subsystem is disabled, required configuration was absent at startup, or the seed opted
    /// out; otherwise a task is enqueued and its outcome is logged by the worker.
    pub fn submit(&self, seed: Seed) {
        let seed_name = seed.name_any();
        match &self.admission {
            Admission::Disabled => return,
            Admission::MissingConfiguration(missing) => {
                debug!(
                    "skipping terminal bootstrap for seed '{}', missing config: {}",
                    seed_name,
                    missing.join(", ")
                );
                return;
            }
            Admission::Enabled => {}
        }
        if seed.bootstrap_disabled() {
            debug!("terminal bootstrap disabled for seed '{}'", seed_name);
            return;
        }
        if let Some(sender) = &self.sender {
            if sender.send(seed).is_err() {
                warn!("bootstrap queue is shut down, dropping seed '{}'", seed_name);
            }
        }
    }

    /// Closes the queue and waits for the workers to drain the remaining tasks.
    pub async fn shutdown(mut self) {
        self.sender.take();
        join_all(self.workers.drain(..)).await;
    }
}

async fn worker_loop(
    receiver: Arc<Mutex<mpsc::UnboundedReceiver<Seed>>>,
    config: Arc<TerminalBootstrapConfig>,
    garden: Arc<dyn Garden>,
    observer: Option<mpsc::UnboundedSender<BootstrapOutcome>>,
) {
    loop {
        let seed = { receiver.lock().await.recv().await };
        let seed = match seed {
            Some(seed) => seed,
            None => break,
        };
        let seed_name = seed.name_any();
        let result = pipeline::bootstrap_seed(garden.as_ref(), &config, &seed).await;
        match &result {
            Ok(()) => debug!("bootstrapped terminal resources for seed '{}'", seed_name),
            Err(err) => error!(
                "failed to bootstrap terminal resources for seed '{}': {}",
                seed_name, err
            ),
        }
        if let Some(observer) = &observer {
            let _ = observer.send(BootstrapOutcome {
                seed: seed_name,
                result,
            });
        }
    }
}
