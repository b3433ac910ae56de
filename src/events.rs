//! Change notification for the partition configuration
//!
//! Pages that display a choice register a callback and are told about every
//! change, synchronously, before the setter returns.

use std::fmt;

use crate::types::{InstallChoice, SwapChoice};

/// A state change in [`Config`](crate::config::Config)
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigEvent {
    InstallChoiceChanged(InstallChoice),
    SwapChoiceChanged(SwapChoice),
    /// Canonical name of the new erase-mode filesystem (may be empty)
    EraseFsTypeChanged(String),
}

/// Handle returned by [`Observers::subscribe`]
pub type ObserverId = u64;

type Callback = Box<dyn FnMut(&ConfigEvent)>;

/// Registered callbacks, called in registration order.
#[derive(Default)]
pub struct Observers {
    next_id: ObserverId,
    callbacks: Vec<(ObserverId, Callback)>,
}

impl Observers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, callback: impl FnMut(&ConfigEvent) + 'static) -> ObserverId {
        let id = self.next_id;
        self.next_id += 1;
        self.callbacks.push((id, Box::new(callback)));
        id
    }

    /// Returns false if `id` was not registered
    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        let before = self.callbacks.len();
        self.callbacks.retain(|(i, _)| *i != id);
        self.callbacks.len() != before
    }

    pub fn notify(&mut self, event: &ConfigEvent) {
        for (_, callback) in &mut self.callbacks {
            callback(event);
        }
    }

    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }
}

impl fmt::Debug for Observers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observers")
            .field("count", &self.callbacks.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_notify_in_registration_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut observers = Observers::new();

        let s = Rc::clone(&seen);
        observers.subscribe(move |e| s.borrow_mut().push((1, e.clone())));
        let s = Rc::clone(&seen);
        observers.subscribe(move |e| s.borrow_mut().push((2, e.clone())));

        let event = ConfigEvent::SwapChoiceChanged(SwapChoice::SmallSwap);
        observers.notify(&event);

        assert_eq!(*seen.borrow(), vec![(1, event.clone()), (2, event)]);
    }

    #[test]
    fn test_unsubscribe() {
        let count = Rc::new(RefCell::new(0));
        let mut observers = Observers::new();

        let c = Rc::clone(&count);
        let id = observers.subscribe(move |_| *c.borrow_mut() += 1);
        assert_eq!(observers.len(), 1);

        assert!(observers.unsubscribe(id));
        assert!(!observers.unsubscribe(id));
        assert!(observers.is_empty());

        observers.notify(&ConfigEvent::InstallChoiceChanged(InstallChoice::Erase));
        assert_eq!(*count.borrow(), 0);
    }

    #[test]
    fn test_ids_are_not_reused() {
        let mut observers = Observers::new();
        let a = observers.subscribe(|_| {});
        observers.unsubscribe(a);
        let b = observers.subscribe(|_| {});
        assert_ne!(a, b);
    }
}
