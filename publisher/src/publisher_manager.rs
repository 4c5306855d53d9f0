use dashmap::DashMap;
use std::cmp::Eq;
use std::hash::Hash;
use std::sync::Arc;
use uuid::Uuid;

use super::publisher::{Publishable, Publisher};
use common::traits::Notifiable;

#[derive(PartialEq, Clone, Debug)]
pub enum PublisherError {
    PublisherNotFound(String),
    ListenerNotFound(String),
}

/// This module defines the `PublisherManager` struct, which manages publishers and their listeners.
/// The set of publishers is fixed at construction. Listeners are added to and removed from
/// specific publishers. Internal maps are `DashMap`s, so a manager can be shared between
/// the task producing events and the tasks registering listeners.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use uuid::Uuid;
/// use publisher::{listener, PublisherManager};
///
/// #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
/// enum Topic {
///     Status,
///     Data,
/// }
///
/// struct Printer;
///
/// impl Printer {
///     fn handle(&self, _id: Uuid, value: Arc<String>) {
///         println!("Received: {}", value);
///     }
/// }
///
/// let manager = PublisherManager::<String, Topic>::new(&[Topic::Status, Topic::Data]);
///
/// let printer = Arc::new(Printer);
/// let mut listener = listener!(printer.handle);
///
/// let id = manager.add_listener(&mut listener, &Topic::Status).unwrap();
/// manager.notify_listeners(Topic::Status, Arc::new("ready".to_string()));
/// manager.remove_listener(id).unwrap();
/// ```
pub struct PublisherManager<T, S>
where
    S: Hash + Eq,
{
    publishers: Arc<DashMap<S, Publisher<T>>>,
    control: Arc<DashMap<Uuid, S>>,
}

impl<T, S> Clone for PublisherManager<T, S>
where
    S: Hash + Eq,
{
    fn clone(&self) -> Self {
        Self {
            publishers: self.publishers.clone(),
            control: self.control.clone(),
        }
    }
}

impl<T, S> PublisherManager<T, S>
where
    T: Send + Sync + 'static,
    S: Send + Sync + Hash + Eq + Clone + std::fmt::Debug,
{
    pub fn new(publisher_types: &[S]) -> Self {
        let collection = DashMap::<S, Publisher<T>>::new();
        for publisher_type in publisher_types {
            collection.insert(publisher_type.clone(), Publisher::new());
        }

        Self {
            publishers: Arc::new(collection),
            control: Arc::new(DashMap::new()),
        }
    }

    pub fn add_listener(
        &self,
        listener: &mut dyn Notifiable<T>,
        publisher_type: &S,
    ) -> Result<Uuid, PublisherError> {
        if let Some(publisher) = self.publishers.get(publisher_type) {
            let id = publisher.register_listener(listener);
            self.control.insert(id, publisher_type.clone());
            return Ok(id);
        }
        Err(PublisherError::PublisherNotFound(format!(
            "Publisher {:?} doesnt exist",
            publisher_type
        )))
    }

    pub fn remove_listener(&self, id: Uuid) -> Result<(), PublisherError> {
        if let Some((_, publisher_type)) = self.control.remove(&id) {
            if let Some(publisher) = self.publishers.get(&publisher_type) {
                publisher.unregister_listener(id);
                return Ok(());
            }
            return Err(PublisherError::PublisherNotFound(format!(
                "Publisher {:?} doesnt exist",
                publisher_type
            )));
        }
        Err(PublisherError::ListenerNotFound(format!(
            "Listener {} not found",
            id
        )))
    }

    pub fn notify_listeners(&self, publisher_type: S, data: Arc<T>) {
        // Clone out of the map so no shard lock is held while callbacks run
        let publisher = self
            .publishers
            .get(&publisher_type)
            .map(|entry| entry.value().clone());
        if let Some(publisher) = publisher {
            publisher.notify_listeners(data);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.control.len()
    }
}
