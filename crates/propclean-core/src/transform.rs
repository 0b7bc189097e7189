//! Key-transformation flattener
//!
//! Renames every mapping key to start case (environment-style keys excepted)
//! and collapses nested mappings into one level whose keys are the renamed
//! segments joined by a delimiter:
//!
//! ```
//! use propclean_core::{transform, Node};
//! use serde_json::json;
//!
//! let input = Node::from(json!({
//!     "image": { "size": 10000000000u64, "recommendedSize": 10000000000u64 }
//! }));
//! assert_eq!(
//!     transform(&input),
//!     Node::from(json!({
//!         "Image Size": 10000000000u64,
//!         "Image Recommended Size": 10000000000u64
//!     }))
//! );
//! ```
//!
//! Rules:
//!
//! - `Absent` comes back unchanged.
//! - A scalar is wrapped as `{ "Value": scalar }`.
//! - A sequence keeps its length; structural elements are transformed,
//!   scalar elements pass through.
//! - Under a mapping, sequences are leaves (transformed as above), empty
//!   mappings and absent values are omitted, and a repeated flattened key is
//!   won by the entry visited last.

use crate::casing::render_key;
use crate::error::{Error, Result};
use crate::node::{Mapping, Node};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, trace};

/// Key under which a bare scalar input is wrapped
pub const SCALAR_KEY: &str = "Value";

/// Options for [`transform_with`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformOptions {
    /// Separator placed between key segments
    pub delimiter: String,
    /// Deepest container nesting accepted, `None` for no limit
    pub max_depth: Option<usize>,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            delimiter: " ".to_string(),
            max_depth: None,
        }
    }
}

impl TransformOptions {
    pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = delimiter.into();
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }
}

/// Rename and flatten a tree. Total over every input.
pub fn transform(node: &Node) -> Node {
    match transform_with(node, &TransformOptions::default()) {
        Ok(out) => out,
        Err(_) => unreachable!("flattening without a depth limit cannot fail"),
    }
}

/// [`transform`] with a custom delimiter and an optional nesting limit
pub fn transform_with(node: &Node, options: &TransformOptions) -> Result<Node> {
    Flattener { options }.node(node, 0)
}

/// [`transform`] for callers holding a [`serde_json::Value`]
pub fn transform_value(value: &Value) -> Value {
    transform(&Node::from(value))
        .into_value()
        .unwrap_or(Value::Null)
}

struct Flattener<'o> {
    options: &'o TransformOptions,
}

impl Flattener<'_> {
    /// Fails when a container at nesting `level` (root container = 1) is too deep
    fn enter(&self, level: usize) -> Result<()> {
        match self.options.max_depth {
            Some(limit) if level > limit => Err(Error::depth_exceeded(limit)),
            _ => Ok(()),
        }
    }

    fn node(&self, node: &Node, depth: usize) -> Result<Node> {
        match node {
            Node::Absent => Ok(Node::Absent),
            Node::Scalar(scalar) => {
                let mut wrapped = Mapping::with_capacity(1);
                wrapped.insert(SCALAR_KEY, Node::Scalar(scalar.clone()));
                Ok(Node::Mapping(wrapped))
            }
            Node::Sequence(items) => self.sequence(items, depth + 1),
            Node::Mapping(map) => {
                let mut flat = Mapping::with_capacity(map.len());
                self.flatten_into(&mut flat, None, map, depth + 1)?;
                debug!(
                    source_keys = map.len(),
                    entries = flat.len(),
                    "Flattened mapping"
                );
                Ok(Node::Mapping(flat))
            }
        }
    }

    fn sequence(&self, items: &[Node], level: usize) -> Result<Node> {
        self.enter(level)?;
        items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                if item.is_structural() {
                    self.node(item, level)
                        .map_err(|e| e.within(&index.to_string()))
                } else {
                    Ok(item.clone())
                }
            })
            .collect::<Result<Vec<_>>>()
            .map(Node::Sequence)
    }

    fn flatten_into(
        &self,
        flat: &mut Mapping,
        prefix: Option<&str>,
        map: &Mapping,
        level: usize,
    ) -> Result<()> {
        self.enter(level)?;
        for (key, value) in map.iter() {
            let segment = render_key(key);
            let path = match prefix {
                Some(prefix) => format!("{prefix}{}{segment}", self.options.delimiter),
                None => segment.into_owned(),
            };

            let leaf = match value {
                Node::Absent => continue,
                Node::Scalar(scalar) => Node::Scalar(scalar.clone()),
                Node::Sequence(items) => self
                    .sequence(items, level + 1)
                    .map_err(|e| e.within(key))?,
                Node::Mapping(inner) => {
                    self.flatten_into(flat, Some(&path), inner, level + 1)
                        .map_err(|e| e.within(key))?;
                    continue;
                }
            };

            if flat.insert(path.as_str(), leaf).is_some() {
                trace!(path = %path, "Flattened key collision, keeping the later value");
            }
        }
        Ok(())
    }
}
