//! Typed listener list for broadcasting game events

/// Handle returned by [`Signal::add`], used to remove a listener later
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

struct Listener<T> {
    id: ListenerId,
    callback: Box<dyn FnMut(&T)>,
    once: bool,
}

/// Calls every registered listener, in registration order, on dispatch.
pub struct Signal<T> {
    listeners: Vec<Listener<T>>,
    next_id: u64,
}

impl<T> Default for Signal<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Signal<T> {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
            next_id: 1,
        }
    }

    fn push(&mut self, callback: Box<dyn FnMut(&T)>, once: bool) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push(Listener { id, callback, once });
        id
    }

    pub fn add(&mut self, callback: impl FnMut(&T) + 'static) -> ListenerId {
        self.push(Box::new(callback), false)
    }

    /// Register a listener that is removed after its first dispatch
    pub fn add_once(&mut self, callback: impl FnMut(&T) + 'static) -> ListenerId {
        self.push(Box::new(callback), true)
    }

    pub fn contains(&self, id: ListenerId) -> bool {
        self.listeners.iter().any(|l| l.id == id)
    }

    /// Returns false if the listener was not registered
    pub fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|l| l.id != id);
        self.listeners.len() != before
    }

    pub fn remove_all(&mut self) {
        self.listeners.clear();
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    pub fn dispatch(&mut self, value: &T) {
        for listener in &mut self.listeners {
            (listener.callback)(value);
        }
        self.listeners.retain(|l| !l.once);
    }
}
