//! Synchronous change notification for model entities.
//!
//! Entities that a view wants to follow own a [`ChangeNotifier`] and call
//! [`ChangeNotifier::notify`] after every mutation. Subscribers run inline on
//! the caller's thread, in the order they subscribed, and the first failing
//! subscriber aborts the notification.

use std::error::Error as StdError;
use std::fmt;
use thiserror::Error;

/// Failure raised by a subscriber while handling an event.
#[derive(Debug, Error)]
#[error("change subscriber failed: {source}")]
pub struct NotifyError {
    #[source]
    source: Box<dyn StdError + Send + Sync>,
}

impl NotifyError {
    pub fn new(source: impl Into<Box<dyn StdError + Send + Sync>>) -> Self {
        Self {
            source: source.into(),
        }
    }
}

impl From<std::io::Error> for NotifyError {
    fn from(value: std::io::Error) -> Self {
        NotifyError::new(value)
    }
}

pub type Subscriber<E> = Box<dyn FnMut(&E) -> Result<(), NotifyError>>;

pub struct ChangeNotifier<E> {
    subscribers: Vec<Subscriber<E>>,
}

impl<E> ChangeNotifier<E> {
    pub fn new() -> Self {
        Self {
            subscribers: Vec::new(),
        }
    }

    pub fn subscribe<F>(&mut self, callback: F)
    where
        F: FnMut(&E) -> Result<(), NotifyError> + 'static,
    {
        self.subscribers.push(Box::new(callback));
    }

    pub fn notify(&mut self, event: &E) -> Result<(), NotifyError> {
        for subscriber in self.subscribers.iter_mut() {
            subscriber(event)?;
        }
        Ok(())
    }
}

impl<E> Default for ChangeNotifier<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for ChangeNotifier<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeNotifier")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::{ChangeNotifier, NotifyError};
    use std::cell::RefCell;
    use std::io;
    use std::rc::Rc;

    #[test]
    fn subscribers_run_in_registration_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut notifier = ChangeNotifier::new();

        for label in ["first", "second", "third"] {
            let seen = Rc::clone(&seen);
            notifier.subscribe(move |value: &u32| {
                seen.borrow_mut().push(format!("{label}:{value}"));
                Ok(())
            });
        }

        notifier.notify(&7).unwrap();
        assert_eq!(
            *seen.borrow(),
            vec!["first:7", "second:7", "third:7"]
        );
    }

    #[test]
    fn failing_subscriber_stops_notification() {
        let calls = Rc::new(RefCell::new(0));
        let mut notifier = ChangeNotifier::new();

        notifier.subscribe(|_: &()| Err(NotifyError::from(io::Error::other("broken pipe"))));
        let later = Rc::clone(&calls);
        notifier.subscribe(move |_: &()| {
            *later.borrow_mut() += 1;
            Ok(())
        });

        let err = notifier.notify(&()).unwrap_err();
        assert!(err.to_string().contains("broken pipe"));
        assert_eq!(*calls.borrow(), 0);
    }

    #[test]
    fn notify_without_subscribers_is_noop() {
        let mut notifier: ChangeNotifier<u8> = ChangeNotifier::default();
        assert!(notifier.notify(&1).is_ok());
    }
}
