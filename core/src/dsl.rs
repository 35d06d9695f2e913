//! Translates a tree-shaped query description into a query tree.
//!
//! The description is deserialized with `serde`, the idiom this crate reaches for whenever it
//! needs to parse an externally-authored tree (there is no equivalent need anywhere else in this
//! crate's own reference implementation, so this is the one module that adds the dependency).
//! Leaf construction is delegated to a caller-supplied resolver — this is where an external index
//! plugs in its posting-list retrieval; the translator itself never touches a posting list.

use {
    crate::{error::QueryError, iterator::BoxedIterator, query},
    serde::Deserialize,
};

/// A tree-shaped query description. `field`/`value` leaves are resolved by the caller; everything
/// else mirrors the factory functions in [`crate::query`].
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QueryDescription {
    Term {
        field: String,
        value: String,
    },
    And {
        children: Vec<QueryDescription>,
    },
    Or {
        children: Vec<QueryDescription>,
    },
    AndNot {
        positive: Box<QueryDescription>,
        excluders: Vec<QueryDescription>,
    },
    DisMax {
        tiebreaker: f32,
        children: Vec<QueryDescription>,
    },
    Constant {
        score: f32,
        child: Box<QueryDescription>,
    },
}

/// Builds a query tree from `description`, resolving every `Term` leaf through `resolve_leaf`.
///
/// This is a parsing boundary and rejects malformed input rather than silently degrading it: an
/// unknown node kind is a deserialization error surfaced by `serde_json` before this function
/// ever runs, while an `and_not` with no excluders or a `dis_max` with an out-of-range tiebreaker
/// are rejected here — stricter than the in-process builders in [`crate::query`], which tolerate
/// both by degrading to a harmless degenerate tree instead of erroring.
pub fn translate(description: &QueryDescription, resolve_leaf: &mut dyn FnMut(&str, &str) -> BoxedIterator) -> Result<BoxedIterator, QueryError> {
    match description {
        QueryDescription::Term {
            field,
            value,
        } => Ok(resolve_leaf(field, value)),
        QueryDescription::And {
            children,
        } => {
            let children = translate_all(children, resolve_leaf)?;
            Ok(query::and(children))
        }
        QueryDescription::Or {
            children,
        } => {
            let children = translate_all(children, resolve_leaf)?;
            Ok(query::or(children))
        }
        QueryDescription::AndNot {
            positive,
            excluders,
        } => {
            if excluders.is_empty() {
                return Err(QueryError::EmptyAndNotExcluders);
            }
            let positive = translate(positive, resolve_leaf)?;
            let excluders = translate_all(excluders, resolve_leaf)?;
            Ok(query::and_not(positive, excluders))
        }
        QueryDescription::DisMax {
            tiebreaker,
            children,
        } => {
            if !(0.0..=1.0).contains(tiebreaker) {
                return Err(QueryError::InvalidTieBreaker(*tiebreaker));
            }
            let children = translate_all(children, resolve_leaf)?;
            Ok(query::dis_max(*tiebreaker, children))
        }
        QueryDescription::Constant {
            score,
            child,
        } => {
            let child = translate(child, resolve_leaf)?;
            Ok(query::constant(*score, child))
        }
    }
}

/// Parses a JSON-encoded query description and translates it in one step. Unknown node kinds or
/// malformed shapes surface as a `serde_json` error; translation-level violations (empty
/// `and_not`, out-of-range `dis_max` tiebreaker) surface as a [`QueryError`].
pub fn translate_json(json: &str, resolve_leaf: &mut dyn FnMut(&str, &str) -> BoxedIterator) -> Result<BoxedIterator, serde_json::Error> {
    let description: QueryDescription = serde_json::from_str(json)?;
    match translate(&description, resolve_leaf) {
        Ok(tree) => Ok(tree),
        Err(err) => Err(serde::de::Error::custom(err)),
    }
}

fn translate_all(descriptions: &[QueryDescription], resolve_leaf: &mut dyn FnMut(&str, &str) -> BoxedIterator) -> Result<Vec<BoxedIterator>, QueryError> {
    descriptions.iter().map(|d| translate(d, resolve_leaf)).collect()
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::iterator::{QueryIterator, NO_MORE},
        pretty_assertions::assert_eq,
    };

    fn resolve(field: &str, value: &str) -> BoxedIterator {
        // A tiny fixed in-memory index for tests: field "f" has terms "a"->[1,2], "b"->[2,3].
        let postings = match (field, value) {
            ("f", "a") => vec![1, 2],
            ("f", "b") => vec![2, 3],
            ("f", "c") => vec![2],
            _ => vec![],
        };
        query::term(10, format!("{field}:{value}"), postings)
    }

    fn drain(mut it: BoxedIterator) -> Vec<i32> {
        let mut out = Vec::new();
        loop {
            let id = it.next();
            if id == NO_MORE {
                break;
            }
            out.push(id);
        }
        out
    }

    #[test]
    fn translates_and_and_term() {
        let json = r#"{"kind":"and","children":[{"kind":"term","field":"f","value":"a"},{"kind":"term","field":"f","value":"b"}]}"#;
        let tree = translate_json(json, &mut resolve).unwrap();
        assert_eq!(drain(tree), vec![2]);
    }

    #[test]
    fn translates_or() {
        let json = r#"{"kind":"or","children":[{"kind":"term","field":"f","value":"a"},{"kind":"term","field":"f","value":"b"}]}"#;
        let tree = translate_json(json, &mut resolve).unwrap();
        assert_eq!(drain(tree), vec![1, 2, 3]);
    }

    #[test]
    fn translates_dis_max() {
        let json = r#"{"kind":"dis_max","tiebreaker":0.5,"children":[{"kind":"term","field":"f","value":"a"},{"kind":"term","field":"f","value":"b"}]}"#;
        let mut tree = translate_json(json, &mut resolve).unwrap();
        // f:a -> [1, 2], f:b -> [2, 3]; both share df=2 so they tie on id 2.
        let idf = (1.0f64 + 10.0 / 2.0).ln() as f32;
        let max = idf;
        let sum = idf + idf;
        assert_eq!(tree.next(), 1);
        assert_eq!(tree.next(), 2);
        assert_eq!(tree.score(), max + 0.5 * (sum - max));
    }

    #[test]
    fn translates_constant() {
        let json = r#"{"kind":"constant","score":2.5,"child":{"kind":"term","field":"f","value":"a"}}"#;
        let mut tree = translate_json(json, &mut resolve).unwrap();
        assert_eq!(tree.next(), 1);
        assert_eq!(tree.score(), 2.5);
    }

    #[test]
    fn translates_and_not() {
        let json = r#"{"kind":"and_not","positive":{"kind":"term","field":"f","value":"a"},"excluders":[{"kind":"term","field":"f","value":"c"}]}"#;
        let tree = translate_json(json, &mut resolve).unwrap();
        assert_eq!(drain(tree), vec![1]);
    }

    #[test]
    fn rejects_empty_and_not_excluders() {
        let description = QueryDescription::AndNot {
            positive: Box::new(QueryDescription::Term {
                field: "f".into(),
                value: "a".into(),
            }),
            excluders: vec![],
        };
        let err = translate(&description, &mut resolve).unwrap_err();
        assert!(matches!(err, QueryError::EmptyAndNotExcluders));
    }

    #[test]
    fn rejects_out_of_range_tiebreaker() {
        let description = QueryDescription::DisMax {
            tiebreaker: 1.5,
            children: vec![QueryDescription::Term {
                field: "f".into(),
                value: "a".into(),
            }],
        };
        let err = translate(&description, &mut resolve).unwrap_err();
        assert!(matches!(err, QueryError::InvalidTieBreaker(v) if v == 1.5));
    }

    #[test]
    fn rejects_unknown_node_kind() {
        let json = r#"{"kind":"fuzzy","field":"f","value":"a"}"#;
        assert!(translate_json(json, &mut resolve).is_err());
    }
}
