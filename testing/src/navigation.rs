//! Recording navigation stack
//!
//! Keeps screens the way a real stack would (root, pushed screens, detail
//! column, sheet) and invokes dismissal callbacks whenever a screen leaves,
//! programmatically or through one of the `simulate_*` helpers.

use parking_lot::Mutex;
use spaceflow_core::{
    DismissCallback, NavigationStack, Screen, ScreenAction, ScreenId, ScreenKind,
};

/// One call made against the stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavOp {
    SetRoot(Option<ScreenKind>),
    Push(ScreenKind),
    Pop,
    SetDetail(Option<ScreenKind>),
    SetSheet(Option<ScreenKind>),
    /// Back gesture, see [`RecordingNavigationStack::simulate_user_pop`].
    UserPop,
    /// Sheet swiped away by the user.
    UserDismissSheet,
}

impl NavOp {
    /// Whether a coordinator (rather than the simulated user) issued it.
    pub fn is_programmatic(&self) -> bool {
        !matches!(self, NavOp::UserPop | NavOp::UserDismissSheet)
    }
}

struct Entry {
    screen: Screen,
    on_dismiss: Option<DismissCallback>,
}

impl Entry {
    fn new(screen: Screen, on_dismiss: Option<DismissCallback>) -> Self {
        Self { screen, on_dismiss }
    }
}

#[derive(Default)]
struct Stack {
    root: Option<Entry>,
    pushed: Vec<Entry>,
    detail: Option<Screen>,
    sheet: Option<Entry>,
    ops: Vec<NavOp>,
}

#[derive(Default)]
pub struct RecordingNavigationStack {
    inner: Mutex<Stack>,
}

/// Run dismissal callbacks outside the lock; they may touch the stack.
fn dismissed(entries: impl IntoIterator<Item = Entry>) {
    for entry in entries {
        if let Some(callback) = entry.on_dismiss {
            callback();
        }
    }
}

impl RecordingNavigationStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ops(&self) -> Vec<NavOp> {
        self.inner.lock().ops.clone()
    }

    /// Operations issued by coordinators, leaving out simulated user input.
    pub fn programmatic_ops(&self) -> Vec<NavOp> {
        self.inner
            .lock()
            .ops
            .iter()
            .filter(|op| op.is_programmatic())
            .cloned()
            .collect()
    }

    pub fn clear_ops(&self) {
        self.inner.lock().ops.clear();
    }

    pub fn root_kind(&self) -> Option<ScreenKind> {
        self.inner
            .lock()
            .root
            .as_ref()
            .map(|e| e.screen.kind().clone())
    }

    /// Kinds of pushed screens, bottom first.
    pub fn stack_kinds(&self) -> Vec<ScreenKind> {
        self.inner
            .lock()
            .pushed
            .iter()
            .map(|e| e.screen.kind().clone())
            .collect()
    }

    /// Topmost pushed screen, or the root when nothing is pushed.
    pub fn top_kind(&self) -> Option<ScreenKind> {
        self.with_top(|screen| screen.kind().clone())
    }

    pub fn top_id(&self) -> Option<ScreenId> {
        self.with_top(Screen::id)
    }

    pub fn detail_kind(&self) -> Option<ScreenKind> {
        self.inner.lock().detail.as_ref().map(|s| s.kind().clone())
    }

    pub fn sheet_kind(&self) -> Option<ScreenKind> {
        self.inner
            .lock()
            .sheet
            .as_ref()
            .map(|e| e.screen.kind().clone())
    }

    pub fn with_top<R>(&self, f: impl FnOnce(&Screen) -> R) -> Option<R> {
        let inner = self.inner.lock();
        inner
            .pushed
            .last()
            .or(inner.root.as_ref())
            .map(|entry| f(&entry.screen))
    }

    /// Report `action` from the topmost screen, as its view-model would.
    pub fn send_to_top(&self, action: ScreenAction) {
        if self.with_top(|screen| screen.send(action)).is_none() {
            tracing::warn!("No screen on the stack to send to");
        }
    }

    pub fn send_to_root(&self, action: ScreenAction) {
        if let Some(entry) = &self.inner.lock().root {
            entry.screen.send(action);
        }
    }

    pub fn send_to_detail(&self, action: ScreenAction) {
        if let Some(screen) = &self.inner.lock().detail {
            screen.send(action);
        }
    }

    pub fn send_to_sheet(&self, action: ScreenAction) {
        if let Some(entry) = &self.inner.lock().sheet {
            entry.screen.send(action);
        }
    }

    /// Highlighted row of the topmost screen.
    pub fn top_selection(&self) -> Option<String> {
        self.with_top(Screen::selected).flatten()
    }

    /// The user taps back on the topmost pushed screen.
    pub fn simulate_user_pop(&self) {
        let entry = {
            let mut inner = self.inner.lock();
            inner.ops.push(NavOp::UserPop);
            inner.pushed.pop()
        };
        dismissed(entry);
    }

    /// The user swipes the sheet away.
    pub fn simulate_sheet_swipe(&self) {
        let entry = {
            let mut inner = self.inner.lock();
            inner.ops.push(NavOp::UserDismissSheet);
            inner.sheet.take()
        };
        dismissed(entry);
    }
}

impl NavigationStack for RecordingNavigationStack {
    fn set_root(&self, screen: Option<Screen>, on_dismiss: Option<DismissCallback>) {
        let removed: Vec<Entry> = {
            let mut inner = self.inner.lock();
            inner
                .ops
                .push(NavOp::SetRoot(screen.as_ref().map(|s| s.kind().clone())));
            // A new root resets the stack above it.
            let mut removed: Vec<Entry> = inner.pushed.drain(..).rev().collect();
            removed.extend(inner.root.take());
            inner.root = screen.map(|screen| Entry::new(screen, on_dismiss));
            removed
        };
        dismissed(removed);
    }

    fn push(&self, screen: Screen, _animated: bool, on_pop: Option<DismissCallback>) {
        let mut inner = self.inner.lock();
        inner.ops.push(NavOp::Push(screen.kind().clone()));
        inner.pushed.push(Entry::new(screen, on_pop));
    }

    fn pop(&self, _animated: bool) {
        let entry = {
            let mut inner = self.inner.lock();
            inner.ops.push(NavOp::Pop);
            inner.pushed.pop()
        };
        if entry.is_none() {
            tracing::warn!("Pop on an empty stack");
        }
        dismissed(entry);
    }

    fn set_detail(&self, screen: Option<Screen>, _animated: bool) {
        let mut inner = self.inner.lock();
        inner
            .ops
            .push(NavOp::SetDetail(screen.as_ref().map(|s| s.kind().clone())));
        inner.detail = screen;
    }

    fn set_sheet(
        &self,
        screen: Option<Screen>,
        _animated: bool,
        on_dismiss: Option<DismissCallback>,
    ) {
        let previous = {
            let mut inner = self.inner.lock();
            inner
                .ops
                .push(NavOp::SetSheet(screen.as_ref().map(|s| s.kind().clone())));
            std::mem::replace(
                &mut inner.sheet,
                screen.map(|screen| Entry::new(screen, on_dismiss)),
            )
        };
        dismissed(previous);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spaceflow_core::{FnSink, RoomId};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn room_screen(room: &str) -> Screen {
        Screen::new(
            ScreenId::new(),
            ScreenKind::Room {
                room_id: RoomId::new(room),
            },
            Arc::new(FnSink::new(|_: ScreenAction| {})),
        )
    }

    fn counter() -> (Arc<AtomicUsize>, DismissCallback) {
        let count = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&count);
        (
            count,
            Box::new(move || {
                c.fetch_add(1, Ordering::SeqCst);
            }),
        )
    }

    #[test]
    fn test_programmatic_pop_invokes_callback() {
        let stack = RecordingNavigationStack::new();
        let (count, callback) = counter();
        stack.push(room_screen("!a"), true, Some(callback));
        stack.pop(true);

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(stack.stack_kinds().is_empty());
        assert_eq!(stack.programmatic_ops().len(), 2);
    }

    #[test]
    fn test_user_pop_is_recorded_separately() {
        let stack = RecordingNavigationStack::new();
        let (count, callback) = counter();
        stack.push(room_screen("!a"), true, Some(callback));
        stack.simulate_user_pop();

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(stack.ops().last(), Some(&NavOp::UserPop));
        assert_eq!(stack.programmatic_ops().len(), 1);
    }

    #[test]
    fn test_new_root_dismisses_everything_above() {
        let stack = RecordingNavigationStack::new();
        let (root_count, root_cb) = counter();
        let (pushed_count, pushed_cb) = counter();
        stack.set_root(Some(room_screen("!root")), Some(root_cb));
        stack.push(room_screen("!a"), false, Some(pushed_cb));
        stack.set_root(None, None);

        assert_eq!(root_count.load(Ordering::SeqCst), 1);
        assert_eq!(pushed_count.load(Ordering::SeqCst), 1);
        assert_eq!(stack.top_kind(), None);
    }
}
