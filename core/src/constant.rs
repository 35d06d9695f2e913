use crate::iterator::{BoxedIterator, QueryIterator, NOT_READY, NO_MORE};

/// Wraps a single child, delegating all positioning to it but replacing its score with a fixed
/// constant (times boost) regardless of what the child itself would have scored.
pub struct Constant {
    child: BoxedIterator,
    constant_score: f32,
    boost: f32,
}

impl Constant {
    pub fn new(constant_score: f32, child: BoxedIterator) -> Self {
        Self {
            child,
            constant_score,
            boost: 1.0,
        }
    }
}

impl QueryIterator for Constant {
    fn cost(&self) -> u64 {
        self.child.cost()
    }

    fn current_id(&self) -> i32 {
        self.child.current_id()
    }

    fn next(&mut self) -> i32 {
        self.child.next()
    }

    fn advance(&mut self, target: i32) -> i32 {
        self.child.advance(target)
    }

    fn score(&self) -> f32 {
        let id = self.child.current_id();
        if id == NOT_READY || id == NO_MORE {
            return 0.0;
        }
        self.constant_score * self.boost
    }

    fn set_boost(&mut self, boost: f32) {
        self.boost = boost;
    }
}
