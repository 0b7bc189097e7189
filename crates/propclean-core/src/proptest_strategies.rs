//! Property-based testing strategies for generating property trees
//!
//! This module provides proptest strategies for random but well-formed
//! [`Node`] trees, biased towards the string shapes the anonymizer cares
//! about (absolute paths, device paths, drive-qualified paths).

#![cfg(test)]

use crate::node::{Mapping, Node, Scalar};
use proptest::collection::{hash_map, vec};
use proptest::prelude::*;

/// Strategy for string leaves that look like paths more often than not
pub fn path_like_string_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "/[a-z]{1,6}(/[a-z0-9.-]{1,8}){0,3}/?",
        "/dev/sd[a-z][0-9]?",
        r"\\\\\.\\PhysicalDrive[0-9]",
        r"[A-Z]:\\[a-z]{1,6}(\\[a-z0-9.]{1,8}){0,2}",
        "[a-z0-9 ._-]{0,12}",
        Just(String::new()),
        Just("/".to_string()),
    ]
}

/// Strategy for mapping keys: camelCase, snake_case and ENV_STYLE mixed
pub fn key_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z]{1,6}([A-Z][a-z]{0,5}){0,2}",
        "[a-z]{1,5}(_[a-z0-9]{1,4}){0,2}",
        "[A-Z_]{1,8}",
        "[a-zA-Z0-9 .-]{1,10}",
    ]
}

/// Strategy for scalar leaves
pub fn scalar_strategy() -> impl Strategy<Value = Scalar> {
    prop_oneof![
        Just(Scalar::Null),
        any::<bool>().prop_map(Scalar::Bool),
        any::<i64>().prop_map(|n| Scalar::Number(n.into())),
        path_like_string_strategy().prop_map(Scalar::String),
    ]
}

/// Strategy for whole trees with bounded depth
pub fn node_strategy() -> impl Strategy<Value = Node> {
    let leaf = prop_oneof![
        8 => scalar_strategy().prop_map(Node::Scalar),
        1 => Just(Node::Absent),
    ];

    leaf.prop_recursive(
        4,  // max depth
        48, // max size
        6,  // items per collection
        |inner| {
            prop_oneof![
                vec(inner.clone(), 0..6).prop_map(Node::Sequence),
                hash_map(key_strategy(), inner, 0..6)
                    .prop_map(|m| Node::Mapping(m.into_iter().collect::<Mapping>())),
            ]
        },
    )
}

/// Strategy for trees whose root is a mapping
pub fn mapping_node_strategy() -> impl Strategy<Value = Node> {
    hash_map(key_strategy(), node_strategy(), 0..6)
        .prop_map(|m| Node::Mapping(m.into_iter().collect::<Mapping>()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anonymize::{anonymize_with, AnonymizeOptions};
    use crate::casing::render_key;
    use crate::paths::PathStyle;
    use crate::transform::transform;
    use std::collections::BTreeSet;

    fn same_shape(left: &Node, right: &Node) -> bool {
        match (left, right) {
            (Node::Absent, Node::Absent) | (Node::Scalar(_), Node::Scalar(_)) => true,
            (Node::Sequence(a), Node::Sequence(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| same_shape(x, y))
            }
            (Node::Mapping(a), Node::Mapping(b)) => {
                a.len() == b.len()
                    && a.iter()
                        .all(|(key, x)| b.get(key).is_some_and(|y| same_shape(x, y)))
            }
            _ => false,
        }
    }

    fn non_string_leaves<'a>(node: &'a Node, out: &mut Vec<&'a Node>) {
        match node {
            Node::Scalar(Scalar::String(_)) => {}
            Node::Absent | Node::Scalar(_) => out.push(node),
            Node::Sequence(items) => items.iter().for_each(|item| non_string_leaves(item, out)),
            Node::Mapping(map) => map.values().for_each(|value| non_string_leaves(value, out)),
        }
    }

    /// Flattened keys computed independently of the flattener
    fn expected_paths(map: &Mapping, prefix: Option<&str>, out: &mut BTreeSet<String>) {
        for (key, value) in map.iter() {
            let path = match prefix {
                Some(prefix) => format!("{prefix} {}", render_key(key)),
                None => render_key(key).into_owned(),
            };
            match value {
                Node::Absent => {}
                Node::Mapping(inner) => expected_paths(inner, Some(&path), out),
                _ => {
                    out.insert(path);
                }
            }
        }
    }

    fn style_strategy() -> impl Strategy<Value = PathStyle> {
        prop_oneof![Just(PathStyle::Posix), Just(PathStyle::Windows)]
    }

    proptest! {
        /// Property: anonymizing keeps every key and the nesting shape
        #[test]
        fn prop_anonymize_preserves_shape(node in node_strategy(), style in style_strategy()) {
            let options = AnonymizeOptions::default().with_style(style);
            let out = anonymize_with(&node, &options).unwrap();
            prop_assert!(same_shape(&node, &out));
        }

        /// Property: anonymizing twice is the same as anonymizing once
        #[test]
        fn prop_anonymize_idempotent(node in node_strategy(), style in style_strategy()) {
            let options = AnonymizeOptions::default().with_style(style);
            let once = anonymize_with(&node, &options).unwrap();
            let twice = anonymize_with(&once, &options).unwrap();
            prop_assert_eq!(once, twice);
        }

        /// Property: only string leaves may change
        #[test]
        fn prop_anonymize_keeps_non_string_leaves(node in node_strategy(), style in style_strategy()) {
            let options = AnonymizeOptions::default().with_style(style);
            let out = anonymize_with(&node, &options).unwrap();
            let (mut before, mut after) = (Vec::new(), Vec::new());
            non_string_leaves(&node, &mut before);
            non_string_leaves(&out, &mut after);
            prop_assert_eq!(before, after);
        }

        /// Property: every leaf path of a mapping shows up exactly once as a flat key
        #[test]
        fn prop_transform_covers_every_leaf(node in mapping_node_strategy()) {
            let Node::Mapping(source) = &node else { unreachable!() };
            let mut expected = BTreeSet::new();
            expected_paths(source, None, &mut expected);

            let out = transform(&node);
            let flat = out.as_mapping().unwrap();
            let actual: BTreeSet<String> = flat.keys().map(str::to_string).collect();
            prop_assert_eq!(actual, expected);
        }

        /// Property: the flattened mapping never contains a nested mapping
        #[test]
        fn prop_transform_output_is_flat(node in mapping_node_strategy()) {
            let out = transform(&node);
            let flat = out.as_mapping().unwrap();
            prop_assert!(flat.values().all(|v| !matches!(v, Node::Mapping(_) | Node::Absent)));
        }

        /// Property: sequences keep their length
        #[test]
        fn prop_transform_keeps_sequence_length(items in vec(node_strategy(), 0..8)) {
            let out = transform(&Node::Sequence(items.clone()));
            prop_assert_eq!(out.as_sequence().map(<[Node]>::len), Some(items.len()));
        }

        /// Property: transform never panics and never changes its input
        #[test]
        fn prop_transform_is_pure(node in node_strategy()) {
            let snapshot = node.clone();
            let _ = transform(&node);
            prop_assert_eq!(node, snapshot);
        }
    }
}
