//! Ordered subscriber registry shared by the points and filter models.

use std::{
    cell::{Cell, RefCell},
    fmt,
    rc::Rc,
};

use shared::protocol::UpdateType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

pub type Observer<P> = Rc<dyn Fn(UpdateType, &P)>;

/// Observers are called synchronously, in subscription order.
///
/// `notify` works on a snapshot of the registry, so an observer may
/// subscribe or unsubscribe from inside its own callback; such changes take
/// effect from the next notification.
pub struct Observable<P> {
    observers: RefCell<Vec<(SubscriptionId, Observer<P>)>>,
    next_id: Cell<u64>,
}

impl<P> Default for Observable<P> {
    fn default() -> Self {
        Self {
            observers: RefCell::new(Vec::new()),
            next_id: Cell::new(0),
        }
    }
}

impl<P> fmt::Debug for Observable<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observable")
            .field("observers", &self.observer_count())
            .finish()
    }
}

impl<P> Observable<P> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, observer: impl Fn(UpdateType, &P) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.observers.borrow_mut().push((id, Rc::new(observer)));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut observers = self.observers.borrow_mut();
        let before = observers.len();
        observers.retain(|(existing, _)| *existing != id);
        observers.len() != before
    }

    pub fn observer_count(&self) -> usize {
        self.observers.borrow().len()
    }

    pub fn notify(&self, update_type: UpdateType, payload: &P) {
        let observers: Vec<Observer<P>> = self
            .observers
            .borrow()
            .iter()
            .map(|(_, observer)| Rc::clone(observer))
            .collect();
        for observer in observers {
            observer(update_type, payload);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notifies_in_subscription_order() {
        let observable = Observable::<u32>::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        for tag in ["first", "second", "third"] {
            let log = Rc::clone(&log);
            observable.subscribe(move |update_type, payload| {
                log.borrow_mut().push(format!("{tag}:{update_type}:{payload}"));
            });
        }

        observable.notify(UpdateType::Minor, &7);
        assert_eq!(
            *log.borrow(),
            vec!["first:minor:7", "second:minor:7", "third:minor:7"]
        );
    }

    #[test]
    fn unsubscribed_observer_is_not_called() {
        let observable = Observable::<u32>::new();
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let id = observable.subscribe(move |_, _| counter.set(counter.get() + 1));

        observable.notify(UpdateType::Patch, &1);
        assert!(observable.unsubscribe(id));
        assert!(!observable.unsubscribe(id));
        observable.notify(UpdateType::Patch, &2);

        assert_eq!(calls.get(), 1);
        assert_eq!(observable.observer_count(), 0);
    }

    #[test]
    fn observer_may_unsubscribe_itself_during_notify() {
        let observable = Rc::new(Observable::<u32>::new());
        let slot: Rc<Cell<Option<SubscriptionId>>> = Rc::new(Cell::new(None));

        let weak = Rc::downgrade(&observable);
        let own_id = Rc::clone(&slot);
        let id = observable.subscribe(move |_, _| {
            if let (Some(observable), Some(id)) = (weak.upgrade(), own_id.get()) {
                observable.unsubscribe(id);
            }
        });
        slot.set(Some(id));

        observable.notify(UpdateType::Major, &0);
        assert_eq!(observable.observer_count(), 0);
    }
}
