use {
    crate::iterator::{BoxedIterator, QueryIterator, NOT_READY, NO_MORE},
    std::{cmp::Reverse, collections::BinaryHeap},
};

struct HeapEntry(Reverse<i32>, usize, BoxedIterator);

impl HeapEntry {
    /// `index` is the child's position in the original, caller-declared order — carried through
    /// the heap so matches can be re-sorted back into that order before scoring.
    fn new(index: usize, child: BoxedIterator) -> Self {
        let id = child.current_id();
        Self(Reverse(id), index, child)
    }
}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}
impl Eq for HeapEntry {}
impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.cmp(&other.0)
    }
}

/// Shared positioning logic behind [`crate::or_query::Or`] and [`crate::dis_max::DisMax`]: both
/// are a binary min-heap over children's `current_id`, differing only in how they combine the
/// scores of the children that land on the winning id. This type owns the heap and the current
/// match set; the two public node types each wrap it and supply their own `score()`.
pub(crate) struct DisjunctionCore {
    heap: BinaryHeap<HeapEntry>,
    current_id: i32,
    matched: Vec<(usize, BoxedIterator)>,
}

impl DisjunctionCore {
    pub(crate) fn new(children: Vec<BoxedIterator>) -> Self {
        let mut heap = BinaryHeap::with_capacity(children.len());
        for (index, mut child) in children.into_iter().enumerate() {
            if child.current_id() == NOT_READY {
                child.next();
            }
            if child.current_id() != NO_MORE {
                heap.push(HeapEntry::new(index, child));
            }
        }
        Self {
            heap,
            current_id: NOT_READY,
            matched: Vec::new(),
        }
    }

    pub(crate) fn current_id(&self) -> i32 {
        self.current_id
    }

    /// Children currently at the winning id, in the order they were originally declared — not
    /// heap pop order — so callers summing their scores get a result independent of how the heap
    /// happened to break ties.
    pub(crate) fn matched(&self) -> impl Iterator<Item = &BoxedIterator> {
        self.matched.iter().map(|(_, child)| child)
    }

    pub(crate) fn cost(&self) -> u64 {
        self.heap.iter().map(|e| e.2.cost()).sum::<u64>() + self.matched.iter().map(|(_, c)| c.cost()).sum::<u64>()
    }

    fn collect_matches(&mut self) {
        self.matched.clear();
        while let Some(top) = self.heap.peek() {
            if top.0 .0 != self.current_id {
                break;
            }
            let HeapEntry(_, index, child) = self.heap.pop().unwrap();
            self.matched.push((index, child));
        }
        self.matched.sort_by_key(|(index, _)| *index);
    }

    pub(crate) fn next(&mut self) -> i32 {
        if self.current_id == NO_MORE {
            return NO_MORE;
        }
        let prev = self.current_id;
        for (index, mut child) in self.matched.drain(..) {
            child.next();
            if child.current_id() != NO_MORE {
                self.heap.push(HeapEntry::new(index, child));
            }
        }

        loop {
            let Some(top) = self.heap.peek() else {
                self.current_id = NO_MORE;
                return NO_MORE;
            };
            if top.0 .0 > prev {
                self.current_id = top.0 .0;
                self.collect_matches();
                return self.current_id;
            }
            let HeapEntry(_, index, mut child) = self.heap.pop().unwrap();
            child.next();
            if child.current_id() != NO_MORE {
                self.heap.push(HeapEntry::new(index, child));
            }
        }
    }

    pub(crate) fn advance(&mut self, target: i32) -> i32 {
        if self.current_id == NO_MORE {
            return NO_MORE;
        }
        if self.current_id != NOT_READY && self.current_id >= target {
            return self.current_id;
        }
        for (index, mut child) in self.matched.drain(..) {
            child.advance(target);
            if child.current_id() != NO_MORE {
                self.heap.push(HeapEntry::new(index, child));
            }
        }

        loop {
            let Some(top) = self.heap.peek() else {
                self.current_id = NO_MORE;
                return NO_MORE;
            };
            if top.0 .0 >= target {
                self.current_id = top.0 .0;
                self.collect_matches();
                return self.current_id;
            }
            let HeapEntry(_, index, mut child) = self.heap.pop().unwrap();
            child.advance(target);
            if child.current_id() != NO_MORE {
                self.heap.push(HeapEntry::new(index, child));
            }
        }
    }
}
