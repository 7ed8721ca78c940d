use async_trait::async_trait;
use std::fmt::Debug;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Represents a source of events (e.g. a coordinator inbox).
#[async_trait]
pub trait EventSource<E>: Send {
    /// Returns the next event, or None if the source is exhausted/closed.
    async fn next_event(&mut self) -> Option<E>;
}

#[async_trait]
impl<E: Send> EventSource<E> for mpsc::UnboundedReceiver<E> {
    async fn next_event(&mut self) -> Option<E> {
        self.recv().await
    }
}

/// Represents a sink for actions (a parent coordinator, the app router).
///
/// Sending never blocks and never fails from the sender's point of view: a
/// sink whose receiver is gone belongs to a flow that was torn down, and
/// its actions are dropped.
pub trait ActionSink<A>: Send + Sync {
    fn send_action(&self, action: A);
}

pub type SharedSink<A> = Arc<dyn ActionSink<A>>;

impl<A: Send + Debug> ActionSink<A> for mpsc::UnboundedSender<A> {
    fn send_action(&self, action: A) {
        if let Err(mpsc::error::SendError(action)) = self.send(action) {
            tracing::debug!(?action, "Dropped action: receiver closed");
        }
    }
}

/// Sink backed by a closure. Used to tag actions on their way into an inbox.
pub struct FnSink<A> {
    f: Box<dyn Fn(A) + Send + Sync>,
}

impl<A> FnSink<A> {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(A) + Send + Sync + 'static,
    {
        Self { f: Box::new(f) }
    }
}

impl<A> ActionSink<A> for FnSink<A> {
    fn send_action(&self, action: A) {
        (self.f)(action)
    }
}

impl<A> std::fmt::Debug for FnSink<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnSink").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_channel_sink_and_source() {
        let (tx, mut rx) = mpsc::unbounded_channel::<u32>();
        tx.send_action(7);
        assert_eq!(rx.next_event().await, Some(7));
    }

    #[test]
    fn test_closed_channel_drops_silently() {
        let (tx, rx) = mpsc::unbounded_channel::<u32>();
        drop(rx);
        tx.send_action(1);
    }

    #[test]
    fn test_fn_sink_maps_actions() {
        let (tx, mut rx) = mpsc::unbounded_channel::<String>();
        let sink = FnSink::new(move |n: u32| tx.send_action(format!("n={n}")));
        sink.send_action(3);
        assert_eq!(rx.try_recv().ok().as_deref(), Some("n=3"));
    }
}
