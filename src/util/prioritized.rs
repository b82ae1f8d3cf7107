//! A list kept sorted by a numeric priority. Smaller numbers come first and items with equal
//! priority keep their insertion order.

/// Priority given to items that don't ask for one
pub const DEFAULT_PRIORITY: i32 = 5;

/// Handle returned by [`PrioritizedList::add`], used to remove the item again
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ItemId(u64);

#[derive(Debug, Clone)]
struct PrioritizedItem<T> {
    id:       ItemId,
    priority: i32,
    item:     T,
}

/// Items sorted by priority
#[derive(Debug, Clone)]
pub struct PrioritizedList<T> {
    items:   Vec<PrioritizedItem<T>>,
    next_id: u64,
}

impl<T> Default for PrioritizedList<T> {
    fn default() -> Self {
        Self { items: Vec::new(), next_id: 0 }
    }
}

impl<T> PrioritizedList<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `item` after every item whose priority is smaller or equal.
    pub fn add(&mut self, item: T, priority: i32) -> ItemId {
        let id = ItemId(self.next_id);
        self.next_id += 1;
        let mut i = self.items.len();
        while i > 0 && priority < self.items[i - 1].priority {
            i -= 1;
        }
        self.items.insert(i, PrioritizedItem { id, priority, item });
        id
    }

    /// Same as [`PrioritizedList::add`] with [`DEFAULT_PRIORITY`]
    pub fn push(&mut self, item: T) -> ItemId {
        self.add(item, DEFAULT_PRIORITY)
    }

    /// Remove the item with the given handle. Returns it if it was present.
    pub fn remove(&mut self, id: ItemId) -> Option<T> {
        let i = self.items.iter().position(|entry| entry.id == id)?;
        Some(self.items.remove(i).item)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items in priority order
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> + '_ {
        self.items.iter().map(|entry| &entry.item)
    }

    /// Items in priority order, with their priorities
    pub fn iter_with_priority(&self) -> impl Iterator<Item = (i32, &T)> + '_ {
        self.items.iter().map(|entry| (entry.priority, &entry.item))
    }

    pub(crate) fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index).map(|entry| &entry.item)
    }
}

impl<T: PartialEq> PrioritizedList<T> {
    /// Remove every item equal to `item`
    pub fn remove_item(&mut self, item: &T) {
        self.items.retain(|entry| &entry.item != item);
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insertion_is_stable_and_sorted() {
        let mut list = PrioritizedList::new();
        list.add("c", 10);
        list.push("a1");
        list.add("first", 1);
        list.push("a2");
        list.add("b", 7);
        let order: Vec<_> = list.iter().copied().collect();
        assert_eq!(order, vec!["first", "a1", "a2", "b", "c"]);
    }

    #[test]
    fn removal_by_handle() {
        let mut list = PrioritizedList::new();
        let x = list.push("x");
        let y = list.push("x");
        assert_eq!(list.remove(x), Some("x"));
        assert_eq!(list.remove(x), None);
        assert_eq!(list.len(), 1);
        assert_eq!(list.remove(y), Some("x"));
        assert!(list.is_empty());
    }
}
