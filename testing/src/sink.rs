use parking_lot::Mutex;
use spaceflow_core::ActionSink;

/// Collects every action sent to it.
#[derive(Debug)]
pub struct RecordingSink<A> {
    actions: Mutex<Vec<A>>,
}

impl<A> Default for RecordingSink<A> {
    fn default() -> Self {
        Self {
            actions: Mutex::new(Vec::new()),
        }
    }
}

impl<A: Clone> RecordingSink<A> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn actions(&self) -> Vec<A> {
        self.actions.lock().clone()
    }

    /// Drain what was recorded so far.
    pub fn take(&self) -> Vec<A> {
        std::mem::take(&mut *self.actions.lock())
    }

    pub fn len(&self) -> usize {
        self.actions.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.lock().is_empty()
    }
}

impl<A: Send> ActionSink<A> for RecordingSink<A> {
    fn send_action(&self, action: A) {
        self.actions.lock().push(action);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_drains() {
        let sink = RecordingSink::new();
        sink.send_action(1);
        sink.send_action(2);

        assert_eq!(sink.take(), vec![1, 2]);
        assert!(sink.is_empty());
    }
}
