//! Topic-based publish/subscribe
//!
//! A single-threaded bus: handlers run synchronously inside [`EventBus::emit`]
//! in registration order. The handler list is snapshotted before dispatch,
//! so a handler may subscribe, unsubscribe or emit again without
//! invalidating the iteration. Handlers registered during a dispatch first
//! see the next event.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

/// An event that can travel on an [`EventBus`]
pub trait BusEvent {
    /// Discriminant used for topic filtering
    type Kind: Copy + Eq + fmt::Debug + 'static;

    fn kind(&self) -> Self::Kind;
}

/// Subscription filter
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Topic<K> {
    /// Wildcard: receives every event regardless of kind
    All,
    /// Receives events of one kind
    Only(K),
}

impl<K: Copy + Eq> Topic<K> {
    #[inline]
    pub fn matches(&self, kind: K) -> bool {
        match self {
            Topic::All => true,
            Topic::Only(k) => *k == kind,
        }
    }
}

impl<K> From<K> for Topic<K> {
    fn from(kind: K) -> Self {
        Topic::Only(kind)
    }
}

type Handler<E> = Rc<dyn Fn(&E)>;

struct Registration<E: BusEvent> {
    id: u64,
    topic: Topic<E::Kind>,
    handler: Handler<E>,
}

struct Registry<E: BusEvent> {
    next_id: u64,
    entries: Vec<Registration<E>>,
}

impl<E: BusEvent> Registry<E> {
    fn remove(&mut self, id: u64) -> bool {
        let before = self.entries.len();
        self.entries.retain(|r| r.id != id);
        self.entries.len() != before
    }
}

/// Synchronous event bus
pub struct EventBus<E: BusEvent> {
    registry: Rc<RefCell<Registry<E>>>,
}

impl<E: BusEvent + 'static> Default for EventBus<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: BusEvent + 'static> EventBus<E> {
    pub fn new() -> Self {
        Self {
            registry: Rc::new(RefCell::new(Registry {
                next_id: 1,
                entries: Vec::new(),
            })),
        }
    }

    /// Register a handler for one kind or for [`Topic::All`]
    pub fn subscribe(
        &self,
        topic: impl Into<Topic<E::Kind>>,
        handler: impl Fn(&E) + 'static,
    ) -> Subscription {
        let id = {
            let mut registry = self.registry.borrow_mut();
            let id = registry.next_id;
            registry.next_id += 1;
            registry.entries.push(Registration {
                id,
                topic: topic.into(),
                handler: Rc::new(handler),
            });
            id
        };

        let weak: Weak<RefCell<Registry<E>>> = Rc::downgrade(&self.registry);
        Subscription {
            id,
            cancel: Some(Box::new(move || match weak.upgrade() {
                Some(registry) => registry.borrow_mut().remove(id),
                None => false,
            })),
        }
    }

    /// Dispatch an event to every matching handler
    pub fn emit(&self, event: &E) {
        let kind = event.kind();
        let handlers: Vec<Handler<E>> = self
            .registry
            .borrow()
            .entries
            .iter()
            .filter(|r| r.topic.matches(kind))
            .map(|r| Rc::clone(&r.handler))
            .collect();

        for handler in handlers {
            handler(event);
        }
    }

    /// Number of live registrations
    pub fn handler_count(&self) -> usize {
        self.registry.borrow().entries.len()
    }

    /// Drop every registration
    pub fn clear(&self) {
        self.registry.borrow_mut().entries.clear();
    }
}

/// Token for one registration.
///
/// Dropping the token leaves the handler registered; call
/// [`Subscription::unsubscribe`] to remove it.
pub struct Subscription {
    id: u64,
    cancel: Option<Box<dyn FnOnce() -> bool>>,
}

impl Subscription {
    /// Remove exactly this registration; returns whether it was still live
    pub fn unsubscribe(mut self) -> bool {
        match self.cancel.take() {
            Some(cancel) => cancel(),
            None => false,
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}
