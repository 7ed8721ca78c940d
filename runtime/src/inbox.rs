//! Inbox - Serialized Message Delivery
//!
//! Every coordinator owns exactly one inbox. Screen actions, child flow
//! actions, dismissal callbacks and service completions all arrive here and
//! are processed one at a time, so a coordinator's state is only ever
//! touched from its own message loop.
//!
//! # Philosophy
//! > Callbacks post. The loop decides.
//!
//! Nothing outside the coordinator holds a reference into it. Producers
//! hold a [`Poster`], which outlives the coordinator harmlessly: once the
//! inbox is gone, posts are dropped.

use async_trait::async_trait;
use spaceflow_core::{DismissCallback, EventSource, FnSink, SharedSink};
use std::fmt;
use std::sync::Arc;
use tokio::sync::{Notify, mpsc};

/// Receiving half, owned by the coordinator.
pub struct Inbox<M> {
    poster: Poster<M>,
    rx: mpsc::UnboundedReceiver<M>,
}

impl<M: Send + 'static> Inbox<M> {
    /// Create an inbox that rings `wake` whenever something is posted.
    ///
    /// Coordinators of one tree share a single wake signal so the root's
    /// loop notices work queued anywhere below it.
    pub fn new(wake: Arc<Notify>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            poster: Poster { tx, wake },
            rx,
        }
    }

    pub fn poster(&self) -> Poster<M> {
        self.poster.clone()
    }

    /// Next queued message without waiting.
    pub fn try_next(&mut self) -> Option<M> {
        self.rx.try_recv().ok()
    }
}

#[async_trait]
impl<M: Send> EventSource<M> for Inbox<M> {
    async fn next_event(&mut self) -> Option<M> {
        self.rx.recv().await
    }
}

impl<M> fmt::Debug for Inbox<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Inbox")
            .field("queued", &self.rx.len())
            .finish()
    }
}

/// Sending half, handed to screens, children and spawned tasks.
pub struct Poster<M> {
    tx: mpsc::UnboundedSender<M>,
    wake: Arc<Notify>,
}

impl<M> Clone for Poster<M> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
            wake: Arc::clone(&self.wake),
        }
    }
}

impl<M: Send + 'static> Poster<M> {
    /// Queue a message. Returns `false` if the owning coordinator is gone.
    pub fn post(&self, message: M) -> bool {
        let delivered = self.tx.send(message).is_ok();
        if delivered {
            self.wake.notify_one();
        }
        delivered
    }

    /// A sink that tags each action with `wrap` on its way into the inbox.
    pub fn sink<A, F>(&self, wrap: F) -> SharedSink<A>
    where
        A: 'static,
        F: Fn(A) -> M + Send + Sync + 'static,
    {
        let poster = self.clone();
        Arc::new(FnSink::new(move |action| {
            if !poster.post(wrap(action)) {
                tracing::debug!("Dropped action for a torn-down flow");
            }
        }))
    }

    /// A dismissal callback that posts `message` when invoked.
    pub fn callback(&self, message: M) -> DismissCallback {
        let poster = self.clone();
        Box::new(move || {
            poster.post(message);
        })
    }
}

impl<M> fmt::Debug for Poster<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Poster")
            .field("closed", &self.tx.is_closed())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_posts_are_delivered_in_order() {
        let mut inbox = Inbox::new(Arc::new(Notify::new()));
        let poster = inbox.poster();
        poster.post(1);
        poster.post(2);

        assert_eq!(inbox.try_next(), Some(1));
        assert_eq!(inbox.try_next(), Some(2));
        assert_eq!(inbox.try_next(), None);
    }

    #[test]
    fn test_sink_tags_actions() {
        let mut inbox = Inbox::new(Arc::new(Notify::new()));
        let sink = inbox.poster().sink(|n: u32| (7u8, n));
        sink.send_action(3);

        assert_eq!(inbox.try_next(), Some((7, 3)));
    }

    #[test]
    fn test_post_after_drop_is_ignored() {
        let inbox: Inbox<u32> = Inbox::new(Arc::new(Notify::new()));
        let poster = inbox.poster();
        let callback = poster.callback(5);
        drop(inbox);

        assert!(!poster.post(1));
        callback();
    }

    #[tokio::test]
    async fn test_post_rings_wake() {
        let wake = Arc::new(Notify::new());
        let mut inbox = Inbox::new(Arc::clone(&wake));
        inbox.poster().post(9);

        // The permit is stored, so this returns immediately.
        wake.notified().await;
        assert_eq!(inbox.next_event().await, Some(9));
    }
}
