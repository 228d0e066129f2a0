use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};

use crate::models::{ProfileUpdate, PublishedRecommendations};

use super::recommender::RecommendationService;

/// A queued profile update, optionally waiting for the envelope it lands in
struct ProfileCommand {
    update: ProfileUpdate,
    reply: Option<oneshot::Sender<Arc<PublishedRecommendations>>>,
}

/// Sender side of the profile event queue
///
/// Every profile mutation goes through this queue, so updates are applied in
/// the order they were accepted no matter which endpoint accepted them.
#[derive(Clone)]
pub struct ProfileQueue {
    command_tx: mpsc::UnboundedSender<ProfileCommand>,
}

/// Handle for gracefully shutting down the profile worker
pub struct ProfileWorkerHandle {
    shutdown_tx: mpsc::Sender<()>,
    task: tokio::task::JoinHandle<()>,
}

impl ProfileQueue {
    /// Queues an update for the worker without waiting for it
    ///
    /// Returns `false` once the worker has stopped.
    pub fn enqueue(&self, update: ProfileUpdate) -> bool {
        self.command_tx
            .send(ProfileCommand {
                update,
                reply: None,
            })
            .is_ok()
    }

    /// Queues an update and waits for the recommendations published with it
    ///
    /// The returned envelope also reflects any updates coalesced into the same
    /// batch after this one. Returns `None` once the worker has stopped.
    pub async fn apply(&self, update: ProfileUpdate) -> Option<Arc<PublishedRecommendations>> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.command_tx
            .send(ProfileCommand {
                update,
                reply: Some(reply_tx),
            })
            .ok()?;
        reply_rx.await.ok()
    }
}

impl ProfileWorkerHandle {
    /// Stops the worker after every queued update has been applied
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
        tracing::info!("Profile worker shutdown signal sent");
        if let Err(e) = self.task.await {
            tracing::error!(error = %e, "Profile worker task join error");
        }
    }
}

/// Spawns the background task that applies queued profile updates
///
/// Updates that pile up while a recomputation is running are merged together
/// and recomputed once, so a burst of changes only ever publishes results for
/// the newest profile.
pub fn spawn(service: RecommendationService) -> (ProfileQueue, ProfileWorkerHandle) {
    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let (shutdown_tx, shutdown_rx) = mpsc::channel(1);

    let task = tokio::spawn(async move {
        profile_worker_task(service, command_rx, shutdown_rx).await;
    });

    (
        ProfileQueue { command_tx },
        ProfileWorkerHandle { shutdown_tx, task },
    )
}

async fn profile_worker_task(
    service: RecommendationService,
    mut command_rx: mpsc::UnboundedReceiver<ProfileCommand>,
    mut shutdown_rx: mpsc::Receiver<()>,
) {
    tracing::info!("Profile worker task started");

    loop {
        tokio::select! {
            Some(first) = command_rx.recv() => {
                let batch = drain_pending(first, &mut command_rx);
                apply_commands(&service, batch).await;
            }
            Some(()) = shutdown_rx.recv() => {
                command_rx.close();

                let mut remaining = Vec::new();
                while let Some(command) = command_rx.recv().await {
                    remaining.push(command);
                }
                tracing::info!(pending = remaining.len(), "Profile worker shutting down, flushing queued updates");
                if !remaining.is_empty() {
                    apply_commands(&service, remaining).await;
                }

                tracing::info!("Profile worker task stopped");
                break;
            }
            else => break,
        }
    }
}

/// Collects `first` plus everything already waiting in the queue
fn drain_pending(
    first: ProfileCommand,
    command_rx: &mut mpsc::UnboundedReceiver<ProfileCommand>,
) -> Vec<ProfileCommand> {
    let mut batch = vec![first];
    while let Ok(command) = command_rx.try_recv() {
        batch.push(command);
    }

    if batch.len() > 1 {
        tracing::debug!(coalesced = batch.len(), "Coalescing queued profile updates");
    }
    batch
}

async fn apply_commands(service: &RecommendationService, batch: Vec<ProfileCommand>) {
    let (updates, replies): (Vec<_>, Vec<_>) = batch
        .into_iter()
        .map(|command| (command.update, command.reply))
        .unzip();

    let published = service.apply_batch(updates).await;

    // Callers that gave up waiting have dropped their receiver
    for reply in replies.into_iter().flatten() {
        let _ = reply.send(published.clone());
    }
}
