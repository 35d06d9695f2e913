use crate::iterator::{BoxedIterator, QueryIterator, NOT_READY, NO_MORE};

/// Conjunction over `children.len() >= 1` owned children, found via leapfrog: the cheapest child
/// (by [`QueryIterator::cost`]) drives the walk, and every other child is pulled forward to catch
/// up. The scan restarts from the first non-lead child whenever any child reports an id past the
/// current target — a single pass is not enough when a later child skips further ahead than an
/// earlier one already agreed to.
pub struct And {
    children: Vec<BoxedIterator>,
    /// `children[score_order[i]]` is the child that was originally declared at position `i`.
    /// Kept separate from the cost-sorted `children` vector so `score()` can sum in the order
    /// the caller declared the children, independent of how leapfrog happened to reorder them.
    score_order: Vec<usize>,
    current_id: i32,
    boost: f32,
}

impl And {
    /// `children` is sorted once, here, by ascending cost so the cheapest leads; the order is
    /// never recomputed during advancement. `score_order` records where each child landed so
    /// scoring can still visit them in the order they were declared.
    pub fn new(children: Vec<BoxedIterator>) -> Self {
        let mut indexed: Vec<(usize, BoxedIterator)> = children.into_iter().enumerate().collect();
        indexed.sort_by_key(|(_, child)| child.cost());

        let mut score_order = vec![0usize; indexed.len()];
        let mut children = Vec::with_capacity(indexed.len());
        for (sorted_position, (declared_position, child)) in indexed.into_iter().enumerate() {
            score_order[declared_position] = sorted_position;
            children.push(child);
        }

        Self {
            children,
            score_order,
            current_id: NOT_READY,
            boost: 1.0,
        }
    }

    /// Runs the leapfrog protocol starting from whatever `current_id` the lead child reports
    /// after its own `next`/`advance` has already been applied by the caller.
    fn converge(&mut self) -> i32 {
        let Some((lead, rest)) = self.children.split_first_mut() else {
            return NO_MORE;
        };

        let mut target = lead.current_id();
        if target == NO_MORE {
            return NO_MORE;
        }

        'restart: loop {
            for child in rest.iter_mut() {
                let id = child.advance(target);
                if id == NO_MORE {
                    return NO_MORE;
                }
                if id > target {
                    target = lead.advance(id);
                    if target == NO_MORE {
                        return NO_MORE;
                    }
                    continue 'restart;
                }
            }
            return target;
        }
    }
}

impl QueryIterator for And {
    fn cost(&self) -> u64 {
        self.children.first().map(|c| c.cost()).unwrap_or(0)
    }

    fn current_id(&self) -> i32 {
        self.current_id
    }

    fn next(&mut self) -> i32 {
        if self.current_id == NO_MORE {
            return NO_MORE;
        }
        let Some((lead, _)) = self.children.split_first_mut() else {
            self.current_id = NO_MORE;
            return NO_MORE;
        };
        lead.next();
        self.current_id = self.converge();
        self.current_id
    }

    fn advance(&mut self, target: i32) -> i32 {
        if self.current_id == NO_MORE {
            return NO_MORE;
        }
        if self.current_id != NOT_READY && self.current_id >= target {
            return self.current_id;
        }
        let Some((lead, _)) = self.children.split_first_mut() else {
            self.current_id = NO_MORE;
            return NO_MORE;
        };
        lead.advance(target);
        self.current_id = self.converge();
        self.current_id
    }

    fn score(&self) -> f32 {
        if self.current_id == NOT_READY || self.current_id == NO_MORE {
            return 0.0;
        }
        self.score_order.iter().map(|&i| self.children[i].score()).sum::<f32>() * self.boost
    }

    fn set_boost(&mut self, boost: f32) {
        self.boost = boost;
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{iterator::test_support::Fixed, term::Term},
        pretty_assertions::assert_eq,
    };

    fn drain(mut it: impl QueryIterator) -> Vec<(i32, f32)> {
        let mut out = Vec::new();
        loop {
            let id = it.next();
            if id == NO_MORE {
                break;
            }
            out.push((id, it.score()));
        }
        out
    }

    #[test]
    fn intersects_two_terms() {
        let a = Term::new(10, "a", vec![4, 5]);
        let b = Term::new(10, "b", vec![4, 100]);
        let idf = (1.0f64 + 10.0 / 2.0).ln() as f32;
        let and = And::new(vec![Box::new(a), Box::new(b)]);
        assert_eq!(drain(and), vec![(4, idf + idf)]);
    }

    #[test]
    fn commutative_in_children_order() {
        let a = Term::new(10, "a", vec![1, 2, 3, 7]);
        let b = Term::new(10, "b", vec![2, 3, 5, 7]);
        let c = Term::new(10, "c", vec![1, 2, 3, 6, 7]);

        let forward = And::new(vec![Box::new(Term::new(10, "a", vec![1, 2, 3, 7])), Box::new(Term::new(10, "b", vec![2, 3, 5, 7])), Box::new(Term::new(10, "c", vec![1, 2, 3, 6, 7]))]);
        let backward = And::new(vec![Box::new(c), Box::new(b), Box::new(a)]);

        let forward = drain(forward);
        let backward = drain(backward);
        assert_eq!(forward.iter().map(|(id, _)| *id).collect::<Vec<_>>(), backward.iter().map(|(id, _)| *id).collect::<Vec<_>>());
        // Scores are summed in each tree's own declaration order, so with 3+ children they can
        // differ by a rounding ulp or two even though the same terms contribute either way.
        for ((_, forward_score), (_, backward_score)) in forward.iter().zip(backward.iter()) {
            assert!((forward_score - backward_score).abs() < 1e-5, "{forward_score} vs {backward_score}");
        }
    }

    #[test]
    fn no_shared_ids_yields_nothing() {
        let and = And::new(vec![Box::new(Fixed::new(vec![1, 2], 1.0)), Box::new(Fixed::new(vec![3, 4], 1.0))]);
        assert_eq!(drain(and), vec![]);
    }

    #[test]
    fn single_child_passes_through() {
        let and = And::new(vec![Box::new(Term::new(10, "a", vec![1, 2, 3]))]);
        let idf = (1.0f64 + 10.0 / 3.0).ln() as f32;
        assert_eq!(drain(and), vec![(1, idf), (2, idf), (3, idf)]);
    }

    #[test]
    fn restarts_scan_when_a_later_child_skips_past() {
        // The lead (cost 2) first agrees on 4, but the second child has no 4 and skips to 50,
        // which pushes the lead to 100 and forces the first child to be re-probed there too.
        let and = And::new(vec![Box::new(Fixed::new(vec![4, 100], 1.0)), Box::new(Fixed::new(vec![50, 100], 1.0)), Box::new(Fixed::new(vec![4, 60, 100], 1.0))]);
        assert_eq!(drain(and), vec![(100, 3.0)]);
    }

    #[test]
    fn zero_children_is_empty() {
        let and = And::new(vec![]);
        assert_eq!(drain(and), vec![]);
    }

    #[test]
    fn advance_is_idempotent() {
        let mut and = And::new(vec![Box::new(Term::new(10, "a", vec![4, 5, 9])), Box::new(Term::new(10, "b", vec![4, 9]))]);
        assert_eq!(and.advance(5), 9);
        assert_eq!(and.advance(5), 9);
        assert_eq!(and.next(), NO_MORE);
    }
}
