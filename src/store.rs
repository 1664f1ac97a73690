//! The shared state a [`ReorderGrid`](crate::ReorderGrid) reads its order from and writes the
//! reordered list back to.
//!
//! The grid only ever swaps the whole list, so a store never observes a half-applied move.

/// Read access to the current order and a way to replace it wholesale.
pub trait OrderStore<T> {
    fn current(&self) -> &[T];
    fn replace(&mut self, items: Vec<T>);
}

impl<T> OrderStore<T> for Vec<T> {
    fn current(&self) -> &[T] {
        self
    }

    fn replace(&mut self, items: Vec<T>) {
        *self = items;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// A single-threaded reactive cell. Every [`Atom::set`] bumps the version and notifies subscribers
/// in the order they subscribed.
pub struct Atom<V> {
    value: V,
    version: u64,
    next_subscription: u64,
    subscribers: Vec<(SubscriptionId, Box<dyn FnMut(&V)>)>,
}

impl<V> Atom<V> {
    pub fn new(value: V) -> Self {
        Self {
            value,
            version: 0,
            next_subscription: 0,
            subscribers: Vec::new(),
        }
    }

    pub fn get(&self) -> &V {
        &self.value
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn set(&mut self, value: V) {
        self.value = value;
        self.version += 1;
        for (_, subscriber) in self.subscribers.iter_mut() {
            subscriber(&self.value);
        }
    }

    pub fn subscribe(&mut self, subscriber: impl FnMut(&V) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(subscriber)));
        id
    }

    /// Returns `false` if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub_id, _)| *sub_id != id);
        self.subscribers.len() != before
    }
}

impl<V: Default> Default for Atom<V> {
    fn default() -> Self {
        Self::new(V::default())
    }
}

impl<V: std::fmt::Debug> std::fmt::Debug for Atom<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Atom")
            .field("value", &self.value)
            .field("version", &self.version)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl<T> OrderStore<T> for Atom<Vec<T>> {
    fn current(&self) -> &[T] {
        &self.value
    }

    fn replace(&mut self, items: Vec<T>) {
        self.set(items);
    }
}
