//! # Listener handles.
//!
//! [`Listener`] wraps a callback as a tagged union of:
//! - **sync consumers** `Fn(&P)` / `Fn(&P) -> ListenerResult`, settled as soon as they return;
//! - **async consumers** `Fn(P) -> impl Future<Output = ListenerResult>` or a [`Listen`] impl,
//!   settled when the future resolves (or the wait limit elapses).
//!
//! Each handle gets a process-unique [`ListenerId`] at construction. Clones share the
//! id, which is what `subscribe`/`unsubscribe` compare.

use std::borrow::Cow;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use futures::FutureExt;
use futures::future::BoxFuture;

use crate::listeners::{Listen, ListenerResult};

/// Global counter for listener identities.
static LISTENER_SEQ: AtomicU64 = AtomicU64::new(0);

type SyncFn<P> = dyn Fn(&P) -> ListenerResult + Send + Sync;
type AsyncFn<P> = dyn Fn(P) -> BoxFuture<'static, ListenerResult> + Send + Sync;

/// Identity of a listener handle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(u64);

impl ListenerId {
    fn next() -> Self {
        Self(LISTENER_SEQ.fetch_add(1, Ordering::Relaxed) + 1)
    }

    #[cfg(test)]
    pub(crate) fn from_raw(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Listener identity as it appears in log records.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListenerRef {
    /// Handle identity.
    pub id: ListenerId,
    /// Display name.
    pub name: Cow<'static, str>,
}

impl ListenerRef {
    pub(crate) fn new(id: ListenerId, name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

impl fmt::Display for ListenerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.id, self.name)
    }
}

enum Kind<P> {
    Sync(Arc<SyncFn<P>>),
    Async(Arc<AsyncFn<P>>),
}

impl<P> Clone for Kind<P> {
    fn clone(&self) -> Self {
        match self {
            Kind::Sync(f) => Kind::Sync(Arc::clone(f)),
            Kind::Async(f) => Kind::Async(Arc::clone(f)),
        }
    }
}

/// Result of calling a listener once.
pub(crate) enum Call {
    /// Sync listener returned.
    Returned(ListenerResult),
    /// Async listener handed back its work.
    Pending(BoxFuture<'static, ListenerResult>),
}

/// Cloneable listener handle for values of type `P`.
pub struct Listener<P> {
    id: ListenerId,
    name: Cow<'static, str>,
    kind: Kind<P>,
}

impl<P: Send + 'static> Listener<P> {
    /// Creates a sync listener that cannot fail.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&P) + Send + Sync + 'static,
    {
        Self::with_kind(
            std::any::type_name::<F>(),
            Kind::Sync(Arc::new(move |value: &P| {
                f(value);
                Ok(())
            })),
        )
    }

    /// Creates a sync listener whose errors are logged as listener failures.
    pub fn fallible<F>(f: F) -> Self
    where
        F: Fn(&P) -> ListenerResult + Send + Sync + 'static,
    {
        Self::with_kind(std::any::type_name::<F>(), Kind::Sync(Arc::new(f)))
    }

    /// Creates an async listener from a closure producing a fresh future per value.
    ///
    /// ## Example
    /// ```rust
    /// use eventvisor::{Listener, ListenerResult};
    ///
    /// let l = Listener::future(|order: u64| async move {
    ///     // persist the order...
    ///     let _ = order;
    ///     ListenerResult::Ok(())
    /// })
    /// .named("persist");
    ///
    /// assert!(l.is_async());
    /// assert_eq!(l.name(), "persist");
    /// ```
    pub fn future<F, Fut>(f: F) -> Self
    where
        F: Fn(P) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ListenerResult> + Send + 'static,
    {
        Self::with_kind(
            std::any::type_name::<F>(),
            Kind::Async(Arc::new(move |value: P| f(value).boxed())),
        )
    }

    /// Creates an async listener backed by a [`Listen`] implementation.
    pub fn from_listen(listen: Arc<dyn Listen<P>>) -> Self {
        let name = listen.name();
        Self::with_kind(
            name,
            Kind::Async(Arc::new(move |value: P| {
                let listen = Arc::clone(&listen);
                async move { listen.on_value(value).await }.boxed()
            })),
        )
    }

    fn with_kind(name: &'static str, kind: Kind<P>) -> Self {
        Self {
            id: ListenerId::next(),
            name: Cow::Borrowed(name),
            kind,
        }
    }
}

impl<P> Listener<P> {
    /// Overrides the name used in log records.
    #[must_use]
    pub fn named(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.name = name.into();
        self
    }

    /// Returns the handle identity.
    #[inline]
    pub fn id(&self) -> ListenerId {
        self.id
    }

    /// Returns the display name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns true for listeners that produce a future.
    #[inline]
    pub fn is_async(&self) -> bool {
        matches!(self.kind, Kind::Async(_))
    }

    pub(crate) fn describe(&self) -> ListenerRef {
        ListenerRef::new(self.id, self.name.clone())
    }

    /// Invokes the callback. Panics propagate to the caller.
    pub(crate) fn call(&self, value: P) -> Call {
        match &self.kind {
            Kind::Sync(f) => Call::Returned(f(&value)),
            Kind::Async(f) => Call::Pending(f(value)),
        }
    }
}

impl<P> Clone for Listener<P> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            name: self.name.clone(),
            kind: self.kind.clone(),
        }
    }
}

impl<P> PartialEq for Listener<P> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<P> Eq for Listener<P> {}

impl<P> fmt::Debug for Listener<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listener")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("async", &self.is_async())
            .finish()
    }
}
