//! Registrant lists for one-to-many notification
//!
//! Handlers are closures or channel senders. Each registration gets a
//! [`RegistrantId`] that is later used to remove it.

use crossbeam_channel::Sender;
use derive_more::Display;

/// A trait for types that can receive notifications
pub trait EventHandler<T>: Send {
    /// Handle an event
    fn handle(&mut self, event: T);
}

impl<T, F> EventHandler<T> for F
where
    F: FnMut(T) + Send,
{
    fn handle(&mut self, event: T) {
        self(event)
    }
}

impl<T: Send> EventHandler<T> for Sender<T> {
    fn handle(&mut self, event: T) {
        // A dropped receiver only means nobody listens any more
        let _ = self.send(event);
    }
}

/// Identity of a registration within its list
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[display("registrant#{_0}")]
pub struct RegistrantId(u64);

struct Registrant<T> {
    id: RegistrantId,
    handler: Box<dyn EventHandler<T>>,
}

/// Ordered collection of registrants notified together
pub struct RegistrantList<T> {
    registrants: Vec<Registrant<T>>,
    next_id: u64,
}

impl<T> RegistrantList<T> {
    /// Create an empty list
    pub const fn new() -> Self {
        Self {
            registrants: Vec::new(),
            next_id: 0,
        }
    }

    /// Add a handler and return its identity
    pub fn add<H>(&mut self, handler: H) -> RegistrantId
    where
        H: EventHandler<T> + 'static,
    {
        let id = RegistrantId(self.next_id);
        self.next_id += 1;
        self.registrants.push(Registrant {
            id,
            handler: Box::new(handler),
        });
        id
    }

    /// Remove a handler, returns whether it was registered
    pub fn remove(&mut self, id: RegistrantId) -> bool {
        let before = self.registrants.len();
        self.registrants.retain(|r| r.id != id);
        self.registrants.len() != before
    }

    /// Whether `id` is currently registered
    pub fn contains(&self, id: RegistrantId) -> bool {
        self.registrants.iter().any(|r| r.id == id)
    }

    /// Notify every registrant in registration order
    pub fn notify(&mut self, event: T)
    where
        T: Clone,
    {
        for registrant in &mut self.registrants {
            registrant.handler.handle(event.clone());
        }
    }

    /// Notify a single registrant, returns whether it was found
    pub fn notify_one(&mut self, id: RegistrantId, event: T) -> bool {
        match self.registrants.iter_mut().find(|r| r.id == id) {
            Some(registrant) => {
                registrant.handler.handle(event);
                true
            }
            None => false,
        }
    }

    /// Number of registrants
    pub fn len(&self) -> usize {
        self.registrants.len()
    }

    /// Whether the list is empty
    pub fn is_empty(&self) -> bool {
        self.registrants.is_empty()
    }

    /// Remove every registrant
    pub fn clear(&mut self) {
        self.registrants.clear();
    }
}

impl<T> Default for RegistrantList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for RegistrantList<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistrantList")
            .field("registrants", &self.registrants.len())
            .finish()
    }
}
