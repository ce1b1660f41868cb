//! Cancellation and deadline context carried into every client call.
//!
//! A [`Context`] is a cheap handle around shared state. Clones refer to the
//! same context, so equality is identity: two handles compare equal only when
//! one was cloned from the other.
//!
//! ```text
//! background ──with_timeout──> child (deadline)
//!                                 └──with_cancel──> grandchild (cancel flag)
//! ```
//!
//! A child is done as soon as it, or any of its ancestors, is done.

mod error;

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

pub use error::ContextError;

/// A cancellation/deadline context.
#[derive(Clone)]
pub struct Context {
    inner: Arc<ContextInner>,
}

struct ContextInner {
    parent: Option<Context>,
    deadline: Option<Instant>,
    /// Present only for contexts created through [`Context::with_cancel`].
    cancelled: Option<AtomicBool>,
}

impl Context {
    /// A context that is never cancelled and has no deadline.
    pub fn background() -> Self {
        Self::from_inner(ContextInner {
            parent: None,
            deadline: None,
            cancelled: None,
        })
    }

    fn from_inner(inner: ContextInner) -> Self {
        Self {
            inner: Arc::new(inner),
        }
    }

    /// Derive a child context that expires at `deadline`.
    pub fn with_deadline(&self, deadline: Instant) -> Self {
        Self::from_inner(ContextInner {
            parent: Some(self.clone()),
            deadline: Some(deadline),
            cancelled: None,
        })
    }

    /// Derive a child context that expires after `timeout`.
    ///
    /// A timeout too large to represent as an `Instant` gives a child with no
    /// deadline of its own.
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        Self::from_inner(ContextInner {
            parent: Some(self.clone()),
            deadline: Instant::now().checked_add(timeout),
            cancelled: None,
        })
    }

    /// Derive a child context together with the handle that cancels it.
    pub fn with_cancel(&self) -> (Self, CancelHandle) {
        let ctx = Self::from_inner(ContextInner {
            parent: Some(self.clone()),
            deadline: None,
            cancelled: Some(AtomicBool::new(false)),
        });
        let handle = CancelHandle { ctx: ctx.clone() };
        (ctx, handle)
    }

    /// The earliest deadline along the ancestor chain.
    pub fn deadline(&self) -> Option<Instant> {
        let parent = self.inner.parent.as_ref().and_then(Context::deadline);
        match (self.inner.deadline, parent) {
            (Some(own), Some(parent)) => Some(own.min(parent)),
            (own, parent) => own.or(parent),
        }
    }

    /// Whether this context can ever become done.
    pub fn is_cancellable(&self) -> bool {
        self.inner.deadline.is_some()
            || self.inner.cancelled.is_some()
            || self
                .inner
                .parent
                .as_ref()
                .is_some_and(Context::is_cancellable)
    }

    /// The reason this context is done, if it is.
    pub fn err(&self) -> Option<ContextError> {
        if let Some(flag) = &self.inner.cancelled {
            if flag.load(Ordering::Acquire) {
                return Some(ContextError::Canceled);
            }
        }
        if let Some(deadline) = self.inner.deadline {
            if Instant::now() >= deadline {
                return Some(ContextError::DeadlineExceeded);
            }
        }
        self.inner.parent.as_ref().and_then(Context::err)
    }

    /// Whether this context is cancelled or past its deadline.
    pub fn is_done(&self) -> bool {
        self.err().is_some()
    }

    /// `Ok(())` while the context is live, its error otherwise.
    pub fn check(&self) -> Result<(), ContextError> {
        match self.err() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Time left before the deadline; `None` when there is no deadline.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline()
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::background()
    }
}

impl PartialEq for Context {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Context {}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("deadline", &self.deadline())
            .field("err", &self.err())
            .finish()
    }
}

/// Cancels the context it was created with.
#[derive(Clone)]
pub struct CancelHandle {
    ctx: Context,
}

impl CancelHandle {
    /// Cancel the context. Idempotent.
    pub fn cancel(&self) {
        if let Some(flag) = &self.ctx.inner.cancelled {
            flag.store(true, Ordering::Release);
        }
    }

    /// The context this handle cancels.
    pub fn context(&self) -> &Context {
        &self.ctx
    }
}

impl fmt::Debug for CancelHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CancelHandle")
            .field("cancelled", &self.ctx.is_done())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_background_never_done() {
        let ctx = Context::background();
        assert!(!ctx.is_cancellable());
        assert!(ctx.deadline().is_none());
        assert!(ctx.err().is_none());
        assert!(ctx.check().is_ok());
    }

    #[test]
    fn test_identity_equality() {
        let a = Context::background();
        let b = Context::background();
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }

    #[test]
    fn test_cancel_propagates_to_children() {
        let (parent, handle) = Context::background().with_cancel();
        let child = parent.with_timeout(Duration::from_secs(60));
        assert!(!child.is_done());

        handle.cancel();
        assert_eq!(parent.err(), Some(ContextError::Canceled));
        assert_eq!(child.err(), Some(ContextError::Canceled));
    }

    #[test]
    fn test_expired_deadline() {
        let ctx = Context::background().with_deadline(Instant::now());
        assert!(ctx.is_cancellable());
        assert_eq!(ctx.check(), Err(ContextError::DeadlineExceeded));
        assert_eq!(ctx.remaining(), Some(Duration::ZERO));
    }

    #[test]
    fn test_deadline_takes_earliest() {
        let root = Context::background();
        let near = Instant::now() + Duration::from_secs(5);
        let far = Instant::now() + Duration::from_secs(500);

        let ctx = root.with_deadline(near).with_deadline(far);
        assert_eq!(ctx.deadline(), Some(near));
    }

    #[test]
    fn test_cancel_from_other_thread() {
        let (ctx, handle) = Context::background().with_cancel();
        std::thread::spawn(move || handle.cancel()).join().unwrap();
        assert!(ctx.is_done());
    }

    #[test]
    fn test_huge_timeout_has_no_deadline() {
        let root = Context::background();
        let ctx = root.with_timeout(Duration::MAX);
        assert!(ctx.deadline().is_none());
        assert!(ctx.check().is_ok());
        assert_ne!(ctx, root);

        let near = Instant::now() + Duration::from_secs(5);
        let child = root.with_deadline(near).with_timeout(Duration::MAX);
        assert_eq!(child.deadline(), Some(near));
    }
}
