use std::{
    collections::VecDeque,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use dkg_dataset::Content;
use dkg_domain::PublishResult;
use dkg_observability::{record_queue_depth, record_queue_enqueued};
use serde::Serialize;
use tokio::sync::Mutex;

pub(crate) const NODE_PUBLISH_STAGE: &str = "node_publish";
pub(crate) const LEDGER_REGISTRATION_STAGE: &str = "ledger_registration";

/// The two task lists and their processing flags.
///
/// Stage A holds raw content waiting to be published; stage B holds publish
/// results waiting for the next registration cycle.
#[derive(Default)]
pub(crate) struct QueueState {
    pending_content: Mutex<VecDeque<Content>>,
    pending_registration: Mutex<VecDeque<PublishResult>>,
    node_publish_busy: AtomicBool,
    ledger_registration_busy: AtomicBool,
}

impl QueueState {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(super) fn try_start_node_publish(&self) -> Option<StageGuard<'_>> {
        StageGuard::try_acquire(&self.node_publish_busy)
    }

    pub(super) fn try_start_ledger_registration(&self) -> Option<StageGuard<'_>> {
        StageGuard::try_acquire(&self.ledger_registration_busy)
    }

    pub(super) async fn next_content(&self) -> Option<Content> {
        let mut pending = self.pending_content.lock().await;
        let content = pending.pop_front();
        record_queue_depth(NODE_PUBLISH_STAGE, pending.len());
        content
    }

    pub(super) async fn push_result(&self, result: PublishResult) {
        let mut pending = self.pending_registration.lock().await;
        pending.push_back(result);
        record_queue_depth(LEDGER_REGISTRATION_STAGE, pending.len());
    }

    /// Takes every result queued for registration, leaving the list empty.
    pub(super) async fn take_results(&self) -> Vec<PublishResult> {
        let mut pending = self.pending_registration.lock().await;
        let batch = pending.drain(..).collect();
        record_queue_depth(LEDGER_REGISTRATION_STAGE, 0);
        batch
    }

    /// Puts a batch back ahead of anything queued since it was taken.
    pub(super) async fn restore_results(&self, batch: Vec<PublishResult>) {
        let mut pending = self.pending_registration.lock().await;
        for result in batch.into_iter().rev() {
            pending.push_front(result);
        }
        record_queue_depth(LEDGER_REGISTRATION_STAGE, pending.len());
    }

    pub(crate) async fn depths(&self) -> QueueDepths {
        QueueDepths {
            stage_a: self.pending_content.lock().await.len(),
            stage_b: self.pending_registration.lock().await.len(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct QueueDepths {
    pub stage_a: usize,
    pub stage_b: usize,
}

/// Marks a stage as processing until dropped.
pub(crate) struct StageGuard<'a> {
    busy: &'a AtomicBool,
}

impl<'a> StageGuard<'a> {
    fn try_acquire(busy: &'a AtomicBool) -> Option<Self> {
        busy.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { busy })
    }
}

impl Drop for StageGuard<'_> {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}

/// Producer side of the queue. Cheap to clone.
#[derive(Clone)]
pub(crate) struct QueueHandle {
    state: Arc<QueueState>,
}

impl QueueHandle {
    pub(crate) fn new(state: Arc<QueueState>) -> Self {
        Self { state }
    }

    /// Appends content for the next publish cycle and returns the stage A
    /// depth. Never blocks on capacity.
    pub(crate) async fn enqueue(&self, content: Content) -> usize {
        self.enqueue_all(vec![content], "single").await
    }

    /// Appends several items in order and returns the resulting stage A depth.
    pub(crate) async fn enqueue_all(&self, contents: Vec<Content>, source: &str) -> usize {
        let count = contents.len();
        let mut pending = self.state.pending_content.lock().await;
        pending.extend(contents);
        let depth = pending.len();
        drop(pending);

        record_queue_enqueued(source, count);
        record_queue_depth(NODE_PUBLISH_STAGE, depth);
        tracing::debug!(source, count, depth, "Content enqueued for publishing");
        depth
    }

    pub(crate) async fn depths(&self) -> QueueDepths {
        self.state.depths().await
    }
}
