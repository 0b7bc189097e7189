//! Path anonymizer
//!
//! Walks a tree and replaces every string leaf that is an absolute
//! filesystem path with its basename. Device identifiers (`/dev/sda`,
//! `\\.\PhysicalDrive0`) are kept, as are relative paths and any other
//! string. Keys are never rewritten and the shape of the tree is preserved.

use crate::error::{Error, Result};
use crate::node::{Mapping, Node, Scalar};
use crate::paths::{is_device_path, PathStyle};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::trace;

/// Options for [`anonymize_with`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnonymizeOptions {
    /// Path convention used for the absoluteness test and basename
    pub style: PathStyle,
    /// Deepest container nesting accepted, `None` for no limit
    pub max_depth: Option<usize>,
}

impl AnonymizeOptions {
    pub fn with_style(mut self, style: PathStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }
}

/// Anonymize a single string value. The result is always a suffix of `value`.
pub fn anonymize_str(style: PathStyle, value: &str) -> &str {
    if is_device_path(value) || !style.is_absolute(value) {
        return value;
    }
    style.basename(value)
}

/// Anonymize every string leaf using the host path convention. Total.
pub fn anonymize(node: &Node) -> Node {
    match anonymize_with(node, &AnonymizeOptions::default()) {
        Ok(out) => out,
        Err(_) => unreachable!("anonymizing without a depth limit cannot fail"),
    }
}

/// [`anonymize`] with an explicit path convention and an optional nesting limit
pub fn anonymize_with(node: &Node, options: &AnonymizeOptions) -> Result<Node> {
    walk(node, options, 0)
}

/// [`anonymize`] for callers holding a [`serde_json::Value`]
pub fn anonymize_value(value: &Value) -> Value {
    anonymize(&Node::from(value))
        .into_value()
        .unwrap_or(Value::Null)
}

fn walk(node: &Node, options: &AnonymizeOptions, depth: usize) -> Result<Node> {
    let level = depth + 1;
    if node.is_structural() {
        if let Some(limit) = options.max_depth.filter(|&limit| level > limit) {
            return Err(Error::depth_exceeded(limit));
        }
    }

    match node {
        Node::Absent => Ok(Node::Absent),
        Node::Scalar(Scalar::String(value)) => {
            let rewritten = anonymize_str(options.style, value);
            if rewritten.len() != value.len() {
                trace!("Replaced absolute path with its basename");
            }
            Ok(Node::Scalar(Scalar::String(rewritten.to_string())))
        }
        Node::Scalar(other) => Ok(Node::Scalar(other.clone())),
        Node::Sequence(items) => items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                walk(item, options, level).map_err(|e| e.within(&index.to_string()))
            })
            .collect::<Result<Vec<_>>>()
            .map(Node::Sequence),
        Node::Mapping(map) => {
            let mut out = Mapping::with_capacity(map.len());
            for (key, value) in map.iter() {
                out.insert(key, walk(value, options, level).map_err(|e| e.within(key))?);
            }
            Ok(Node::Mapping(out))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn posix(value: Value) -> Value {
        let options = AnonymizeOptions::default().with_style(PathStyle::Posix);
        anonymize_with(&Node::from(value), &options)
            .unwrap()
            .into_value()
            .unwrap()
    }

    fn windows(value: Value) -> Value {
        let options = AnonymizeOptions::default().with_style(PathStyle::Windows);
        anonymize_with(&Node::from(value), &options)
            .unwrap()
            .into_value()
            .unwrap()
    }

    #[test]
    fn test_device_paths_are_kept() {
        assert_eq!(posix(json!({"d": "/dev/sda1"})), json!({"d": "/dev/sda1"}));
        assert_eq!(
            windows(json!({"d": r"\\.\PhysicalDrive1"})),
            json!({"d": r"\\.\PhysicalDrive1"})
        );
        assert_eq!(windows(json!({"d": "/dev/disk2"})), json!({"d": "/dev/disk2"}));
    }

    #[test]
    fn test_absolute_paths_become_basenames() {
        assert_eq!(
            posix(json!({"path1": "/home/john/rpi.img"})),
            json!({"path1": "rpi.img"})
        );
        assert_eq!(
            windows(json!({"path1": r"C:\Users\john\rpi.img"})),
            json!({"path1": "rpi.img"})
        );
    }

    #[test]
    fn test_relative_paths_and_plain_strings_untouched() {
        assert_eq!(
            posix(json!({"path3": "yet-another-image.img", "name": "Sandisk", "rel": "a/b.img"})),
            json!({"path3": "yet-another-image.img", "name": "Sandisk", "rel": "a/b.img"})
        );
        assert_eq!(posix(json!({"empty": ""})), json!({"empty": ""}));
    }

    #[test]
    fn test_non_string_leaves_untouched() {
        let input = json!({"simpleProperty": null, "otherProperty": false, "n": 3.5});
        assert_eq!(posix(input.clone()), input);
    }

    #[test]
    fn test_nested_structures() {
        let input = json!({
            "path1": "/home/john/rpi.img",
            "simpleProperty": null,
            "nested": {
                "path2": "/home/john/another-image.img",
                "path3": "yet-another-image.img",
                "otherProperty": false
            },
            "list": ["/var/tmp/a.iso", {"deep": ["/mnt/x/b.zip"]}]
        });
        assert_eq!(
            posix(input),
            json!({
                "path1": "rpi.img",
                "simpleProperty": null,
                "nested": {
                    "path2": "another-image.img",
                    "path3": "yet-another-image.img",
                    "otherProperty": false
                },
                "list": ["a.iso", {"deep": ["b.zip"]}]
            })
        );
    }

    #[test]
    fn test_keys_are_not_rewritten() {
        assert_eq!(
            posix(json!({"/etc/passwd": "/etc/passwd"})),
            json!({"/etc/passwd": "passwd"})
        );
    }

    #[test]
    fn test_root_scalars_and_absent() {
        let options = AnonymizeOptions::default().with_style(PathStyle::Posix);
        assert_eq!(anonymize_with(&Node::Absent, &options).unwrap(), Node::Absent);
        assert_eq!(
            anonymize_with(&Node::from("/tmp/file.txt"), &options).unwrap(),
            Node::from("file.txt")
        );
    }

    #[test]
    fn test_idempotent() {
        let input = Node::from(json!({"a": "/x/y/z.img", "b": ["/", "/dev/sdb", "rel"]}));
        let options = AnonymizeOptions::default().with_style(PathStyle::Posix);
        let once = anonymize_with(&input, &options).unwrap();
        let twice = anonymize_with(&once, &options).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_anonymize_str() {
        assert_eq!(anonymize_str(PathStyle::Posix, "/a/b"), "b");
        assert_eq!(anonymize_str(PathStyle::Posix, "/"), "");
        assert_eq!(anonymize_str(PathStyle::Windows, r"D:\backups\sd.img"), "sd.img");
        assert_eq!(anonymize_str(PathStyle::Posix, "no-separators"), "no-separators");
    }

    #[test]
    fn test_depth_limit() {
        let input = Node::from(json!({"a": [{"b": "/x/y"}]}));
        let options = AnonymizeOptions::default()
            .with_style(PathStyle::Posix)
            .with_max_depth(2);
        let err = anonymize_with(&input, &options).unwrap_err();
        assert_eq!(err.to_string(), "Nesting depth limit of 2 exceeded at 'a.0'");

        let options = options.with_max_depth(3);
        assert!(anonymize_with(&input, &options).is_ok());
    }

    #[test]
    fn test_host_style_default() {
        let out = anonymize_value(&json!({"p": "/dev/sda"}));
        assert_eq!(out, json!({"p": "/dev/sda"}));
    }
}
