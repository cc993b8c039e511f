//! Snapshot container with change listeners.
//!
//! Stores keep their collection in an [`Observable`]. Every mutation computes
//! a whole new collection and hands it to [`Observable::replace`], which swaps
//! the snapshot and then calls each listener, in subscription order, with the
//! new contents. Reads never trigger recomputation.

/// Handle returned by [`Observable::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener<T> = Box<dyn FnMut(&[T])>;

pub struct Observable<T> {
    items: Vec<T>,
    listeners: Vec<(ListenerId, Listener<T>)>,
    next_id: u64,
}

impl<T> Observable<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items,
            listeners: Vec::new(),
            next_id: 0,
        }
    }

    pub fn get(&self) -> &[T] {
        &self.items
    }

    /// Swaps in a new snapshot and notifies listeners.
    pub fn replace(&mut self, items: Vec<T>) {
        self.items = items;
        for (_, listener) in self.listeners.iter_mut() {
            listener(&self.items);
        }
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&[T]) + 'static) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns false if the listener was already gone.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }
}

impl<T: Clone> Observable<T> {
    /// Clones the snapshot for copy-modify-replace updates.
    pub fn to_vec(&self) -> Vec<T> {
        self.items.clone()
    }
}

impl<T> Default for Observable<T> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}
