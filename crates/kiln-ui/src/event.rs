use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

struct Slot<T> {
    alive: Rc<Cell<bool>>,
    callback: Box<dyn FnMut(&T)>,
}

/// A list of callbacks invoked with `&T` on [`notify`](Event::notify).
///
/// Each callback stays registered while its [`Subscription`] is alive.
pub struct Event<T> {
    slots: RefCell<Vec<Slot<T>>>,
}

impl<T> Default for Event<T> {
    fn default() -> Self {
        Self {
            slots: RefCell::new(Vec::new()),
        }
    }
}

impl<T> fmt::Debug for Event<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

impl<T> Event<T> {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe(&self, callback: impl FnMut(&T) + 'static) -> Subscription {
        let alive = Rc::new(Cell::new(true));
        self.slots.borrow_mut().push(Slot {
            alive: Rc::clone(&alive),
            callback: Box::new(callback),
        });
        Subscription { alive: Some(alive) }
    }

    /// Calls every live subscriber in subscription order.
    ///
    /// Subscribing from inside a callback is allowed; the new subscriber is
    /// first called on the next notify.
    pub fn notify(&self, value: &T) {
        let mut slots = std::mem::take(&mut *self.slots.borrow_mut());
        for slot in slots.iter_mut() {
            if slot.alive.get() {
                (slot.callback)(value);
            }
        }
        let mut current = self.slots.borrow_mut();
        slots.append(&mut current);
        slots.retain(|s| s.alive.get());
        *current = slots;
    }

    pub fn subscriber_count(&self) -> usize {
        self.slots.borrow().iter().filter(|s| s.alive.get()).count()
    }
}

/// Keeps an [`Event`] callback registered. Dropping it unsubscribes.
#[derive(Debug)]
pub struct Subscription {
    alive: Option<Rc<Cell<bool>>>,
}

impl Subscription {
    pub fn unsubscribe(self) {}

    /// Keeps the callback registered for the lifetime of the event.
    pub fn detach(mut self) {
        self.alive = None;
    }

    pub fn is_active(&self) -> bool {
        self.alive.as_ref().is_some_and(|a| a.get())
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(alive) = &self.alive {
            alive.set(false);
        }
    }
}
