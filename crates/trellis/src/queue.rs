//! The deferred message queue.
//!
//! Posted messages wait here until the next flush, the engine's stand-in
//! for an animation-frame tick. The queue is an explicit object owned by
//! the [`WidgetTree`](crate::WidgetTree) rather than ambient process
//! state, so a test can drive flushes deterministically without a frame
//! clock.
//!
//! # Coalescing
//!
//! Kinds that declare themselves compressible
//! ([`MessageKind::is_compressible`]) keep at most one pending entry per
//! target: re-posting removes the pending entry and appends the new one,
//! so the surviving entry sits at the position of the latest post and
//! carries the latest payload. Non-compressible kinds queue up in FIFO
//! order.

use std::collections::VecDeque;

use crate::message::{Message, MessageKind};
use crate::widget::WidgetId;

/// A pending posted message.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PostedMessage {
    pub target: WidgetId,
    pub message: Message,
}

/// Queue of messages awaiting the next flush.
///
/// The queue itself only stores and coalesces; delivery happens in the
/// widget tree, which drains one batch per flush.
#[derive(Debug, Default)]
pub(crate) struct MessageQueue {
    pending: VecDeque<PostedMessage>,
}

impl MessageQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self {
            pending: VecDeque::new(),
        }
    }

    /// Enqueue a message for a target.
    ///
    /// Compressible kinds replace any pending message of the same kind for
    /// the same target; the replacement takes the latest-post position.
    pub fn post(&mut self, target: WidgetId, message: Message) {
        let kind = message.kind();
        if kind.is_compressible() {
            if let Some(pos) = self
                .pending
                .iter()
                .position(|p| p.target == target && p.message.kind() == kind)
            {
                tracing::trace!(
                    target: "trellis::queue",
                    widget = ?target,
                    kind = %kind,
                    "replacing pending compressible message"
                );
                self.pending.remove(pos);
            }
        }
        tracing::trace!(target: "trellis::queue", widget = ?target, kind = %kind, "posting message");
        self.pending.push_back(PostedMessage { target, message });
    }

    /// Drop every pending message for a target.
    ///
    /// Used on disposal so a dead widget never receives deferred delivery.
    pub fn clear(&mut self, target: WidgetId) {
        let before = self.pending.len();
        self.pending.retain(|p| p.target != target);
        let dropped = before - self.pending.len();
        if dropped > 0 {
            tracing::trace!(
                target: "trellis::queue",
                widget = ?target,
                dropped,
                "cleared pending messages"
            );
        }
    }

    /// Take everything pending right now, leaving the queue empty.
    ///
    /// Messages posted while the batch is being delivered land in the
    /// queue again and wait for the next flush.
    pub fn drain_batch(&mut self) -> Vec<PostedMessage> {
        self.pending.drain(..).collect()
    }

    /// Number of pending messages.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Number of pending messages for a specific target.
    pub fn pending_count_for(&self, target: WidgetId) -> usize {
        self.pending.iter().filter(|p| p.target == target).count()
    }

    /// Whether the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Iterate over pending entries, oldest first.
    #[cfg(test)]
    pub fn iter(&self) -> impl Iterator<Item = &PostedMessage> {
        self.pending.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::ResizeMessage;
    use slotmap::SlotMap;

    fn test_ids(count: usize) -> Vec<WidgetId> {
        let mut map: SlotMap<WidgetId, ()> = SlotMap::with_key();
        (0..count).map(|_| map.insert(())).collect()
    }

    #[test]
    fn test_post_and_drain_fifo() {
        let ids = test_ids(2);
        let mut queue = MessageQueue::new();

        queue.post(ids[0], Message::ShowRequest);
        queue.post(ids[1], Message::HideRequest);
        queue.post(ids[0], Message::CloseRequest);

        let batch = queue.drain_batch();
        assert!(queue.is_empty());
        assert_eq!(batch.len(), 3);
        assert_eq!(batch[0].message.kind(), MessageKind::ShowRequest);
        assert_eq!(batch[1].message.kind(), MessageKind::HideRequest);
        assert_eq!(batch[2].message.kind(), MessageKind::CloseRequest);
    }

    #[test]
    fn test_compressible_replaces_pending() {
        let ids = test_ids(1);
        let mut queue = MessageQueue::new();

        queue.post(ids[0], Message::Resize(ResizeMessage::new(10, 10)));
        queue.post(ids[0], Message::Resize(ResizeMessage::new(20, 30)));

        assert_eq!(queue.pending_count(), 1);
        let batch = queue.drain_batch();
        // The latest payload wins.
        assert_eq!(batch[0].message, Message::Resize(ResizeMessage::new(20, 30)));
    }

    #[test]
    fn test_compressed_message_takes_latest_position() {
        let ids = test_ids(2);
        let mut queue = MessageQueue::new();

        queue.post(ids[0], Message::UpdateRequest);
        queue.post(ids[1], Message::ShowRequest);
        queue.post(ids[0], Message::UpdateRequest);

        let batch = queue.drain_batch();
        assert_eq!(batch.len(), 2);
        // The replacement is delivered at the position of the latest
        // post, after the unrelated entry.
        assert_eq!(batch[0].target, ids[1]);
        assert_eq!(batch[1].target, ids[0]);
        assert_eq!(batch[1].message.kind(), MessageKind::UpdateRequest);
    }

    #[test]
    fn test_compression_is_per_target() {
        let ids = test_ids(2);
        let mut queue = MessageQueue::new();

        queue.post(ids[0], Message::UpdateRequest);
        queue.post(ids[1], Message::UpdateRequest);

        // Different targets do not coalesce with each other.
        assert_eq!(queue.pending_count(), 2);
    }

    #[test]
    fn test_compression_is_per_kind() {
        let ids = test_ids(1);
        let mut queue = MessageQueue::new();

        queue.post(ids[0], Message::UpdateRequest);
        queue.post(ids[0], Message::FitRequest);
        queue.post(ids[0], Message::Resize(ResizeMessage::UNKNOWN));

        // Distinct compressible kinds coexist for the same target.
        assert_eq!(queue.pending_count(), 3);
    }

    #[test]
    fn test_non_compressible_kinds_accumulate() {
        let ids = test_ids(1);
        let mut queue = MessageQueue::new();

        queue.post(ids[0], Message::ShowRequest);
        queue.post(ids[0], Message::ShowRequest);

        assert_eq!(queue.pending_count(), 2);
    }

    #[test]
    fn test_clear_target() {
        let ids = test_ids(2);
        let mut queue = MessageQueue::new();

        queue.post(ids[0], Message::UpdateRequest);
        queue.post(ids[1], Message::UpdateRequest);
        queue.post(ids[0], Message::ShowRequest);

        queue.clear(ids[0]);
        assert_eq!(queue.pending_count(), 1);
        assert_eq!(queue.pending_count_for(ids[0]), 0);
        assert_eq!(queue.iter().next().unwrap().target, ids[1]);
    }
}
