//! A doubly-linked list closed into a ring by a sentinel.
//!
//! Links are indices into an arena owned by the list; slot 0 is the sentinel, whose `next` is the
//! head and whose `prev` is the tail, so pushing and popping at either end need no special cases.
//! Sorting is a merge sort: every item starts as a singleton run and runs are merged pairwise
//! until one is left.

use std::collections::VecDeque;

const SENTINEL: usize = 0;

#[derive(Debug, Clone)]
struct Link<T> {
    data: Option<T>,
    prev: usize,
    next: usize,
}

/// A doubly-linked list
#[derive(Debug, Clone)]
pub struct LinkedList<T> {
    links: Vec<Link<T>>,
    free:  Vec<usize>,
    len:   usize,
}

impl<T> Default for LinkedList<T> {
    fn default() -> Self {
        Self {
            links: vec![Link { data: None, prev: SENTINEL, next: SENTINEL }],
            free:  Vec::new(),
            len:   0,
        }
    }
}

impl<T> LinkedList<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn alloc(&mut self, data: T) -> usize {
        let link = Link { data: Some(data), prev: SENTINEL, next: SENTINEL };
        self.len += 1;
        match self.free.pop() {
            Some(i) => { self.links[i] = link; i },
            None    => { self.links.push(link); self.links.len() - 1 },
        }
    }

    fn release(&mut self, i: usize) -> Option<T> {
        let data = self.links[i].data.take();
        self.free.push(i);
        self.len -= 1;
        data
    }

    /// Link slot `i` in just before slot `before`
    fn link_before(&mut self, i: usize, before: usize) {
        let prev = self.links[before].prev;
        self.links[i].prev = prev;
        self.links[i].next = before;
        self.links[prev].next = i;
        self.links[before].prev = i;
    }

    fn unlink(&mut self, i: usize) {
        let Link { prev, next, .. } = self.links[i];
        self.links[prev].next = next;
        self.links[next].prev = prev;
    }

    /// Add items at the end
    pub fn push(&mut self, data: T) {
        let i = self.alloc(data);
        self.link_before(i, SENTINEL);
    }

    /// Remove the last item
    pub fn pop(&mut self) -> Option<T> {
        let i = self.links[SENTINEL].prev;
        if i == SENTINEL { return None; }
        self.unlink(i);
        self.release(i)
    }

    /// Add items at the front
    pub fn unshift(&mut self, data: T) {
        let i = self.alloc(data);
        let head = self.links[SENTINEL].next;
        self.link_before(i, head);
    }

    /// Remove the first item
    pub fn shift(&mut self) -> Option<T> {
        let i = self.links[SENTINEL].next;
        if i == SENTINEL { return None; }
        self.unlink(i);
        self.release(i)
    }

    pub fn first(&self) -> Option<&T> {
        self.links[self.links[SENTINEL].next].data.as_ref()
    }

    pub fn last(&self) -> Option<&T> {
        self.links[self.links[SENTINEL].prev].data.as_ref()
    }

    /// Remove every item for which `pred` holds
    pub fn remove_where(&mut self, mut pred: impl FnMut(&T) -> bool) -> usize {
        let mut removed = 0;
        let mut i = self.links[SENTINEL].next;
        while i != SENTINEL {
            let next = self.links[i].next;
            if self.links[i].data.as_ref().map_or(false, &mut pred) {
                self.unlink(i);
                self.release(i);
                removed += 1;
            }
            i = next;
        }
        removed
    }

    /// Insert `data` before the first item it sorts before, according to `is_before`
    pub fn insert_by(&mut self, data: T, mut is_before: impl FnMut(&T, &T) -> bool) {
        let mut at = self.links[SENTINEL].next;
        while at != SENTINEL {
            match self.links[at].data.as_ref() {
                Some(item) if is_before(item, &data) => at = self.links[at].next,
                _ => break,
            }
        }
        let i = self.alloc(data);
        self.link_before(i, at);
    }

    /// Stable merge sort using `is_before(a, b)` ("`a` strictly precedes `b`")
    pub fn sort_by(&mut self, mut is_before: impl FnMut(&T, &T) -> bool) {
        let mut runs: VecDeque<(usize, usize)> = VecDeque::with_capacity(self.len);
        let mut i = self.links[SENTINEL].next;
        while i != SENTINEL {
            let next = self.links[i].next;
            self.links[i].prev = SENTINEL;
            self.links[i].next = SENTINEL;
            runs.push_back((i, i));
            i = next;
        }
        while runs.len() > 1 {
            let mut merged = VecDeque::with_capacity(runs.len() / 2 + 1);
            while let Some(a) = runs.pop_front() {
                match runs.pop_front() {
                    Some(b) => merged.push_back(self.merge_runs(a, b, &mut is_before)),
                    None    => merged.push_back(a),
                }
            }
            runs = merged;
        }
        match runs.pop_front() {
            Some((head, tail)) => {
                self.links[SENTINEL].next = head;
                self.links[head].prev = SENTINEL;
                self.links[SENTINEL].prev = tail;
                self.links[tail].next = SENTINEL;
            },
            None => {
                self.links[SENTINEL].next = SENTINEL;
                self.links[SENTINEL].prev = SENTINEL;
            },
        }
    }

    /// Merge two detached runs `(head, tail)`; items of `a` win ties.
    fn merge_runs(&mut self, a: (usize, usize), b: (usize, usize), is_before: &mut impl FnMut(&T, &T) -> bool) -> (usize, usize) {
        let (mut x, a_tail) = a;
        let (mut y, b_tail) = b;
        let mut head = SENTINEL;
        let mut tail = SENTINEL;
        loop {
            let take_b = match (self.links[x].data.as_ref(), self.links[y].data.as_ref()) {
                (Some(dx), Some(dy)) => is_before(dy, dx),
                _ => false,
            };
            let pick = if take_b { y } else { x };
            let exhausted = if take_b { pick == b_tail } else { pick == a_tail };
            let following = self.links[pick].next;
            if head == SENTINEL {
                head = pick;
                self.links[pick].prev = SENTINEL;
            } else {
                self.links[tail].next = pick;
                self.links[pick].prev = tail;
            }
            tail = pick;
            if take_b { y = following } else { x = following }
            if exhausted {
                // splice the rest of the other run on
                let (rest, rest_tail) = if take_b { (x, a_tail) } else { (y, b_tail) };
                self.links[tail].next = rest;
                self.links[rest].prev = tail;
                return (head, rest_tail);
            }
        }
    }

    /// Move every item of `other` into this list, keeping the order given by `is_before`.
    /// Both lists are assumed sorted already.
    pub fn merge_by(&mut self, other: LinkedList<T>, mut is_before: impl FnMut(&T, &T) -> bool) {
        let mut at = self.links[SENTINEL].next;
        for data in other {
            while at != SENTINEL {
                match self.links[at].data.as_ref() {
                    Some(item) if !is_before(&data, item) => at = self.links[at].next,
                    _ => break,
                }
            }
            let i = self.alloc(data);
            self.link_before(i, at);
        }
    }

    pub fn iter(&self) -> Iter<'_, T> {
        Iter { list: self, front: self.links[SENTINEL].next, back: self.links[SENTINEL].prev, remaining: self.len }
    }

    /// Items from last to first
    pub fn reversed(&self) -> impl Iterator<Item = &T> + '_ {
        self.iter().rev()
    }

    /// Mutable access to every item, in order
    pub fn for_each_mut(&mut self, mut f: impl FnMut(&mut T)) {
        let mut i = self.links[SENTINEL].next;
        while i != SENTINEL {
            if let Some(data) = self.links[i].data.as_mut() {
                f(data);
            }
            i = self.links[i].next;
        }
    }
}

impl<T: PartialEq> LinkedList<T> {
    /// Remove the given items
    pub fn remove(&mut self, items: &[T]) -> usize {
        self.remove_where(|data| items.contains(data))
    }
}

impl<T: PartialOrd> LinkedList<T> {
    /// Sorted insertion with `<`
    pub fn insert(&mut self, data: T) {
        self.insert_by(data, |a, b| a < b)
    }

    /// Sort with `<`
    pub fn sort(&mut self) {
        self.sort_by(|a, b| a < b)
    }
}

impl<T> FromIterator<T> for LinkedList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = LinkedList::new();
        for item in iter {
            list.push(item);
        }
        list
    }
}

impl<T> IntoIterator for LinkedList<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;
    fn into_iter(self) -> IntoIter<T> {
        IntoIter { list: self }
    }
}

/// Borrowing iterator over a [`LinkedList`]
pub struct Iter<'a, T> {
    list:      &'a LinkedList<T>,
    front:     usize,
    back:      usize,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;
    fn next(&mut self) -> Option<&'a T> {
        if self.remaining == 0 { return None; }
        let link = &self.list.links[self.front];
        self.front = link.next;
        self.remaining -= 1;
        link.data.as_ref()
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    fn next_back(&mut self) -> Option<&'a T> {
        if self.remaining == 0 { return None; }
        let link = &self.list.links[self.back];
        self.back = link.prev;
        self.remaining -= 1;
        link.data.as_ref()
    }
}

/// Owning iterator over a [`LinkedList`]
pub struct IntoIter<T> {
    list: LinkedList<T>,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;
    fn next(&mut self) -> Option<T> {
        self.list.shift()
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn items<T: Clone>(list: &LinkedList<T>) -> Vec<T> {
        list.iter().cloned().collect()
    }

    #[test]
    fn both_ends() {
        let mut list = LinkedList::new();
        list.push(2);
        list.push(3);
        list.unshift(1);
        assert_eq!(items(&list), vec![1, 2, 3]);
        assert_eq!(list.pop(), Some(3));
        assert_eq!(list.shift(), Some(1));
        assert_eq!(list.shift(), Some(2));
        assert_eq!(list.shift(), None);
        assert_eq!(list.pop(), None);
        assert!(list.is_empty());
    }

    #[test]
    fn remove_and_reuse_slots() {
        let mut list: LinkedList<_> = (1 ..= 5).collect();
        assert_eq!(list.remove(&[2, 4]), 2);
        list.push(6);
        assert_eq!(items(&list), vec![1, 3, 5, 6]);
        assert_eq!(list.reversed().copied().collect::<Vec<_>>(), vec![6, 5, 3, 1]);
    }

    #[test]
    fn sorted_insert() {
        let mut list = LinkedList::new();
        for x in [5, 1, 4, 2, 3] {
            list.insert(x);
        }
        assert_eq!(items(&list), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn merge_sort_is_stable() {
        let mut list: LinkedList<(u32, char)> =
            vec![(3, 'a'), (1, 'b'), (3, 'c'), (2, 'd'), (1, 'e'), (0, 'f'), (2, 'g')]
            .into_iter().collect();
        list.sort_by(|a, b| a.0 < b.0);
        assert_eq!(
            items(&list),
            vec![(0, 'f'), (1, 'b'), (1, 'e'), (2, 'd'), (2, 'g'), (3, 'a'), (3, 'c')]
        );
        assert_eq!(list.len(), 7);
        assert_eq!(list.last(), Some(&(3, 'c')));
    }

    #[test]
    fn merge_two_sorted_lists() {
        let mut a: LinkedList<_> = vec![1, 4, 6].into_iter().collect();
        let b: LinkedList<_> = vec![2, 3, 7].into_iter().collect();
        a.merge_by(b, |x, y| x < y);
        assert_eq!(items(&a), vec![1, 2, 3, 4, 6, 7]);
    }
}
