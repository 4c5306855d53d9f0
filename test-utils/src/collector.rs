use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// Listener handler that keeps every value it is notified with.
///
/// ```ignore
/// let collector = Collector::new();
/// let mut listener = listener!(collector.collect);
/// ```
#[derive(Debug)]
pub struct Collector<T> {
    values: Arc<Mutex<Vec<T>>>,
}

impl<T> Clone for Collector<T> {
    fn clone(&self) -> Self {
        Self {
            values: self.values.clone(),
        }
    }
}

impl<T> Default for Collector<T> {
    fn default() -> Self {
        Self {
            values: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl<T: Clone> Collector<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn collect(&self, _id: Uuid, value: Arc<T>) {
        self.values.lock().unwrap().push((*value).clone());
    }

    pub fn values(&self) -> Vec<T> {
        self.values.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.values.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
