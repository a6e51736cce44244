//! Pending store: not-yet-started work kept in stack order.

/// Stack of pending entries. The most recently pushed entry is popped first.
#[derive(Debug)]
pub struct PendingStack<T> {
    items: Vec<T>,
}

impl<T> Default for PendingStack<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> PendingStack<T> {
    /// Create an empty stack.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Push an entry on top; it becomes the next one popped.
    pub fn push(&mut self, item: T) {
        self.items.push(item);
    }

    /// Pop the most recently pushed entry.
    pub fn pop(&mut self) -> Option<T> {
        self.items.pop()
    }

    /// Remove every entry, most recent first.
    pub fn drain(&mut self) -> impl Iterator<Item = T> + '_ {
        self.items.drain(..).rev()
    }

    /// Number of entries waiting.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether nothing is waiting.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
