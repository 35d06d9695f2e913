use crate::iterator::{QueryIterator, NO_MORE};

/// Drives `root` to exhaustion, invoking `callback` with each `(doc_id, score)` pair in ascending
/// id order. This is the only sanctioned way to consume a query tree — it owns the tree for the
/// duration of the call and the tree is expected to be discarded afterwards.
pub fn for_each<I, F>(mut root: I, mut callback: F)
where
    I: QueryIterator,
    F: FnMut(i32, f32),
{
    loop {
        let id = root.next();
        if id == NO_MORE {
            return;
        }
        callback(id, root.score());
    }
}

#[cfg(test)]
mod tests {
    use {super::*, crate::term::Term, pretty_assertions::assert_eq};

    #[test]
    fn delivers_every_pair_in_order() {
        let term = Term::new(10, "a", vec![4, 5, 9]);
        let mut seen = Vec::new();
        for_each(term, |id, score| seen.push((id, score)));
        assert_eq!(seen.len(), 3);
        assert_eq!(seen.iter().map(|(id, _)| *id).collect::<Vec<_>>(), vec![4, 5, 9]);
    }

    #[test]
    fn empty_tree_invokes_callback_zero_times() {
        let term = Term::new(10, "empty", vec![]);
        let mut calls = 0;
        for_each(term, |_, _| calls += 1);
        assert_eq!(calls, 0);
    }
}
