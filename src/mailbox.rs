// src/mailbox.rs - Latest-frame handoff from the detector to the pipeline
use std::time::Duration;

use tokio::sync::watch;
use tracing::debug;

use crate::error::MailboxError;
use crate::landmarks::LandmarkFrame;

#[derive(Debug, Clone, PartialEq)]
pub struct DetectorFrame {
    /// Monotonic per-publisher sequence number, starting at 0.
    pub seq: u64,
    pub captured_at: Duration,
    /// `None` when the detector saw no hand.
    pub landmarks: Option<LandmarkFrame>,
}

/// Creates a single-slot mailbox. A new frame overwrites an unread one, so the
/// consumer always sees the freshest detection and never a backlog.
pub fn frame_mailbox() -> (FramePublisher, FrameReceiver) {
    let (tx, rx) = watch::channel(None);
    (
        FramePublisher { tx, next_seq: 0 },
        FrameReceiver {
            rx,
            last_seq: None,
            dropped: 0,
        },
    )
}

pub struct FramePublisher {
    tx: watch::Sender<Option<DetectorFrame>>,
    next_seq: u64,
}

impl FramePublisher {
    /// Stores a frame, replacing any unread one. Returns its sequence number.
    pub fn publish(&mut self, landmarks: Option<LandmarkFrame>, captured_at: Duration) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.tx.send_replace(Some(DetectorFrame {
            seq,
            captured_at,
            landmarks,
        }));
        seq
    }

    /// True once the receiver has gone away.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

pub struct FrameReceiver {
    rx: watch::Receiver<Option<DetectorFrame>>,
    last_seq: Option<u64>,
    dropped: u64,
}

impl FrameReceiver {
    /// Takes the latest unread frame without waiting.
    pub fn try_take(&mut self) -> Option<DetectorFrame> {
        let frame = self.rx.borrow_and_update().clone()?;
        if self.last_seq.is_some_and(|last| frame.seq <= last) {
            return None;
        }

        let skipped = match self.last_seq {
            Some(last) => frame.seq - last - 1,
            None => frame.seq,
        };
        if skipped > 0 {
            debug!(skipped, seq = frame.seq, "detector frames overwritten before read");
            self.dropped += skipped;
        }
        self.last_seq = Some(frame.seq);
        Some(frame)
    }

    /// Waits for the next unread frame. Fails once the publisher is gone and
    /// the last frame has been taken.
    pub async fn recv(&mut self) -> Result<DetectorFrame, MailboxError> {
        loop {
            if let Some(frame) = self.try_take() {
                return Ok(frame);
            }
            self.rx.changed().await.map_err(|_| MailboxError::Closed)?;
        }
    }

    /// Frames that were overwritten before this receiver read them.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[tokio::test]
    async fn empty_mailbox_has_nothing() {
        let (_publisher, mut receiver) = frame_mailbox();
        assert!(receiver.try_take().is_none());
        assert_eq!(receiver.dropped(), 0);
    }

    #[tokio::test]
    async fn newest_frame_wins() {
        let (mut publisher, mut receiver) = frame_mailbox();
        publisher.publish(None, ms(0));
        publisher.publish(None, ms(33));
        let last = publisher.publish(None, ms(66));

        let frame = receiver.try_take().expect("frame");
        assert_eq!(frame.seq, last);
        assert_eq!(frame.captured_at, ms(66));
        assert_eq!(receiver.dropped(), 2);
        assert!(receiver.try_take().is_none());

        publisher.publish(None, ms(99));
        assert_eq!(receiver.try_take().map(|f| f.seq), Some(3));
        assert_eq!(receiver.dropped(), 2);
    }

    #[tokio::test]
    async fn recv_drains_then_reports_closed() {
        let (mut publisher, mut receiver) = frame_mailbox();
        let producer = std::thread::spawn(move || {
            for i in 0..50u64 {
                publisher.publish(None, ms(i * 33));
            }
        });

        let mut last = None;
        while let Ok(frame) = receiver.recv().await {
            if let Some(prev) = last {
                assert!(frame.seq > prev);
            }
            last = Some(frame.seq);
        }
        producer.join().expect("producer thread");

        assert_eq!(last, Some(49));
        assert!(matches!(receiver.recv().await, Err(MailboxError::Closed)));
    }

    #[tokio::test]
    async fn publisher_sees_closed_receiver() {
        let (publisher, receiver) = frame_mailbox();
        assert!(!publisher.is_closed());
        drop(receiver);
        assert!(publisher.is_closed());
    }
}
