use std::cell::RefCell;

use crate::filter::FilterState;

type Subscriber = Box<dyn Fn(&FilterState)>;

/// "Filters changed" channel between the page controls and the views.
/// Subscribers must not publish from inside their callback.
#[derive(Default)]
pub struct FilterBus {
    subscribers: RefCell<Vec<Subscriber>>,
}

impl FilterBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&self, subscriber: F)
    where
        F: Fn(&FilterState) + 'static,
    {
        self.subscribers.borrow_mut().push(Box::new(subscriber));
    }

    /// Delivers the state to every subscriber, returning how many ran.
    pub fn publish(&self, state: &FilterState) -> usize {
        let subscribers = self.subscribers.borrow();
        for subscriber in subscribers.iter() {
            subscriber(state);
        }
        subscribers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_publish_reaches_each_subscriber_once() {
        let bus = FilterBus::new();
        let calls = Rc::new(Cell::new(0));
        let seen = Rc::new(RefCell::new(Vec::new()));

        {
            let calls = calls.clone();
            bus.subscribe(move |_| calls.set(calls.get() + 1));
        }
        {
            let seen = seen.clone();
            bus.subscribe(move |state| seen.borrow_mut().push(state.query().to_string()));
        }

        assert_eq!(bus.publish(&FilterState::new("Brew")), 2);
        assert_eq!(bus.publish(&FilterState::new("")), 2);
        assert_eq!(calls.get(), 2);
        assert_eq!(*seen.borrow(), vec!["brew".to_string(), String::new()]);
    }

    #[test]
    fn test_publish_without_subscribers() {
        assert_eq!(FilterBus::new().publish(&FilterState::default()), 0);
    }
}
