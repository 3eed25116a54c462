//! Deferred removal from ordered lists

/// Indices recorded for removal at the end of a frame.
///
/// Sweeping walks the recorded indices from highest to lowest so earlier
/// removals never shift later ones, and only removes entries that are still
/// flagged destroyed at sweep time.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PendingRemoval {
    indices: Vec<usize>,
}

impl PendingRemoval {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `index` once
    pub fn mark(&mut self, index: usize) {
        if !self.indices.contains(&index) {
            self.indices.push(index);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Remove every marked entry of `items` that `is_destroyed` still accepts.
    /// Clears the marks and returns the removed entries, highest index first.
    pub fn sweep<T>(&mut self, items: &mut Vec<T>, is_destroyed: impl Fn(&T) -> bool) -> Vec<T> {
        let mut removed = Vec::new();
        if self.indices.is_empty() {
            return removed;
        }

        self.indices.sort_unstable();
        for &index in self.indices.iter().rev() {
            if index < items.len() && is_destroyed(&items[index]) {
                removed.push(items.remove(index));
            }
        }
        self.indices.clear();
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sweep_removes_only_destroyed() {
        // (name, destroyed)
        let mut items = vec![("a", false), ("b", true), ("c", false), ("d", true), ("e", true)];
        let mut pending = PendingRemoval::new();
        pending.mark(4);
        pending.mark(1);
        pending.mark(3);
        pending.mark(3);
        assert_eq!(pending.len(), 3);

        let removed = pending.sweep(&mut items, |i| i.1);
        assert_eq!(items, vec![("a", false), ("c", false)]);
        assert_eq!(removed.len(), 3);
        assert!(pending.is_empty());
    }

    #[test]
    fn revived_entries_survive() {
        let mut items = vec![("a", false), ("b", false), ("c", true)];
        let mut pending = PendingRemoval::new();
        pending.mark(1);
        pending.mark(2);
        pending.sweep(&mut items, |i| i.1);
        assert_eq!(items, vec![("a", false), ("b", false)]);
    }
}
