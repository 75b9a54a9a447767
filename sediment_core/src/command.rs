// Copyright 2026 the Sediment Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Deferred draw commands and their identities.

use core::fmt;
use core::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use crate::backend::Painter;

/// Global id source. Ids are process-unique and monotonically increasing;
/// they are never reused, so an id held by a caller stays unambiguous after
/// the command is removed.
static NEXT_COMMAND_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a [`DrawCommand`], assigned once at creation.
///
/// Identity is the only equality the backlog understands: two commands with
/// identical actions are still distinct entries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CommandId(u64);

impl CommandId {
    /// Raw id value, for logs and trace encodings.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

/// Boxed draw action invoked with the active backend painter.
pub type DrawFn = Box<dyn Fn(&mut dyn Painter) + Send + Sync>;

/// A named, individually disable-able unit of deferred drawing.
///
/// A command is immutable except for its disabled flag. Commands are shared
/// as `Arc<DrawCommand>`: the backlog keeps one clone, and callers may keep
/// another as a handle for later [`disable`](Self::disable) or removal.
///
/// Actions run on the render thread with the cache texture bound, in queue
/// order, and should be cheap per invocation: the frame budget is only
/// checked between commands, so a single slow action extends the frame (see
/// the display driver docs).
pub struct DrawCommand {
    id: CommandId,
    name: Option<String>,
    disabled: AtomicBool,
    action: DrawFn,
}

impl DrawCommand {
    /// Creates an enabled command with a fresh id and no name.
    #[must_use]
    pub fn new(action: impl Fn(&mut dyn Painter) + Send + Sync + 'static) -> Self {
        Self {
            id: CommandId(NEXT_COMMAND_ID.fetch_add(1, Ordering::Relaxed)),
            name: None,
            disabled: AtomicBool::new(false),
            action: Box::new(action),
        }
    }

    /// Creates an enabled command with a diagnostic label.
    #[must_use]
    pub fn named(
        name: impl Into<String>,
        action: impl Fn(&mut dyn Painter) + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::new(action)
        }
    }

    /// This command's identity.
    #[must_use]
    pub const fn id(&self) -> CommandId {
        self.id
    }

    /// Diagnostic label, if any.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// True iff the command is currently skipped during replay.
    ///
    /// The flag is atomic and read without the backlog lock; a toggle from
    /// another thread may lag by at most the command's next visit.
    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.disabled.load(Ordering::Relaxed)
    }

    /// Skips this command during replay. It stays in the queue with its
    /// identity and position unchanged.
    pub fn disable(&self) {
        self.disabled.store(true, Ordering::Relaxed);
    }

    /// Re-enables a disabled command.
    pub fn enable(&self) {
        self.disabled.store(false, Ordering::Relaxed);
    }

    /// Sets the disabled flag directly.
    pub fn set_disabled(&self, disabled: bool) {
        self.disabled.store(disabled, Ordering::Relaxed);
    }

    /// Runs the draw action against `painter`.
    pub fn run(&self, painter: &mut dyn Painter) {
        (self.action)(painter);
    }
}

impl fmt::Debug for DrawCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DrawCommand")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("disabled", &self.is_disabled())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::RecordingPainter;

    #[test]
    fn ids_are_unique_and_increasing() {
        let a = DrawCommand::new(|_| {});
        let b = DrawCommand::new(|_| {});
        assert_ne!(a.id(), b.id());
        assert!(a.id() < b.id());
    }

    #[test]
    fn named_keeps_label() {
        let command = DrawCommand::named("grid", |_| {});
        assert_eq!(command.name(), Some("grid"));
        assert_eq!(DrawCommand::new(|_| {}).name(), None);
    }

    #[test]
    fn disable_toggles_flag_only() {
        let command = DrawCommand::new(|_| {});
        assert!(!command.is_disabled());

        command.disable();
        assert!(command.is_disabled());

        command.enable();
        assert!(!command.is_disabled());

        command.set_disabled(true);
        assert!(command.is_disabled());
    }

    #[test]
    fn run_invokes_action() {
        let mut painter = RecordingPainter::default();
        let command = DrawCommand::new(|p| {
            p.fill_rect(kurbo::Rect::new(0.0, 0.0, 4.0, 4.0));
        });
        command.run(&mut painter);
        command.run(&mut painter);
        assert_eq!(painter.draw_calls, 2);
    }
}
