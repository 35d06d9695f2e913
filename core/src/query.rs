//! The construction boundary: the only functions external callers (including the
//! [`crate::dsl`] translator) need to build a query tree out of owned child iterators.

use crate::{
    and_not::AndNot,
    and_query::And,
    constant::Constant,
    dis_max::DisMax,
    iterator::{BoxedIterator, QueryIterator, NO_MORE},
    or_query::Or,
    term::Term,
};

/// An iterator that is immediately exhausted. Used for the `and()`/`or()` zero-children edge
/// case: rather than special-casing "no children" throughout the combinators, it is
/// represented as a real, if degenerate, tree node.
struct Empty;

impl QueryIterator for Empty {
    fn cost(&self) -> u64 {
        0
    }
    fn current_id(&self) -> i32 {
        NO_MORE
    }
    fn next(&mut self) -> i32 {
        NO_MORE
    }
    fn advance(&mut self, _target: i32) -> i32 {
        NO_MORE
    }
    fn score(&self) -> f32 {
        0.0
    }
    fn set_boost(&mut self, _boost: f32) {}
}

/// Builds a [`Term`] leaf. `corpus_size` must be positive; `postings` must already be sorted and
/// duplicate-free.
pub fn term(corpus_size: u64, identity: impl Into<String>, postings: Vec<i32>) -> BoxedIterator {
    Box::new(Term::new(corpus_size, identity, postings))
}

/// Builds a conjunction. Zero children is an immediately exhausted iterator; one child is
/// returned unwrapped rather than paying for a useless wrapper node.
pub fn and(mut children: Vec<BoxedIterator>) -> BoxedIterator {
    match children.len() {
        0 => Box::new(Empty),
        1 => children.pop().unwrap(),
        _ => Box::new(And::new(children)),
    }
}

/// Builds a disjunction. Same zero/one-child edge rules as [`and`].
pub fn or(mut children: Vec<BoxedIterator>) -> BoxedIterator {
    match children.len() {
        0 => Box::new(Empty),
        1 => children.pop().unwrap(),
        _ => Box::new(Or::new(children)),
    }
}

/// Builds an exclusion over `positive` minus the union of `excluders`. Zero excluders degrades to
/// the positive child unchanged — there is nothing to exclude, not a contract violation, since a
/// positive child is always present by construction (unlike the Java source, Rust's type system
/// makes "AndNot with no positive" unrepresentable).
pub fn and_not(positive: BoxedIterator, excluders: Vec<BoxedIterator>) -> BoxedIterator {
    if excluders.is_empty() {
        return positive;
    }
    Box::new(AndNot::new(positive, excluders))
}

/// Builds a disjunction-max. Zero/one-child edge rules match [`and`]/[`or`]; a single child makes
/// the tiebreaker moot so it is returned unwrapped.
pub fn dis_max(tiebreaker: f32, mut children: Vec<BoxedIterator>) -> BoxedIterator {
    match children.len() {
        0 => Box::new(Empty),
        1 => children.pop().unwrap(),
        _ => Box::new(DisMax::new(tiebreaker, children)),
    }
}

/// Wraps `child`, overriding its score with a fixed constant.
pub fn constant(score: f32, child: BoxedIterator) -> BoxedIterator {
    Box::new(Constant::new(score, child))
}

#[cfg(test)]
mod tests {
    use {super::*, pretty_assertions::assert_eq};

    #[test]
    fn zero_children_and_or_are_immediately_exhausted() {
        let mut a = and(vec![]);
        let mut o = or(vec![]);
        assert_eq!(a.next(), NO_MORE);
        assert_eq!(o.next(), NO_MORE);
    }

    #[test]
    fn single_child_is_unwrapped() {
        // No wrapper: behaves exactly like the bare term.
        let mut one = and(vec![term(10, "a", vec![1, 2])]);
        assert_eq!(one.next(), 1);
        assert_eq!(one.current_id(), 1);
    }

    #[test]
    fn and_not_with_no_excluders_passes_through() {
        let mut it = and_not(term(10, "p", vec![1, 2, 3]), vec![]);
        assert_eq!(it.next(), 1);
        assert_eq!(it.next(), 2);
        assert_eq!(it.next(), 3);
        assert_eq!(it.next(), NO_MORE);
    }
}
