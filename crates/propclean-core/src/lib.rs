//! Propclean Core - property tree preparation for reporting
//!
//! This crate turns arbitrary JSON-like property trees into a shape that is
//! safe and readable to report.
//!
//! # Main Components
//!
//! - **Node model**: an explicit sum type for scalars, sequences, mappings
//!   and absent values, bridged to `serde_json::Value`
//! - **Key flattener** ([`transform`]): start-cases keys and flattens nested
//!   mappings into space-joined key paths
//! - **Path anonymizer** ([`anonymize`]): reduces absolute filesystem paths in
//!   string values to their basename, leaving device paths alone
//!
//! Both operations are pure and total. The `*_with` variants take options
//! (delimiter, path convention, nesting limit) and return a [`Result`].
//!
//! # Example
//!
//! ```
//! use propclean_core::{prepare_with, Node, PathStyle, PrepareOptions};
//! use serde_json::json;
//!
//! let event = Node::from(json!({
//!     "image": { "path": "/home/john/rpi.img", "recommendedSize": 4 },
//!     "NODE_ENV": "production"
//! }));
//! let options = PrepareOptions::default().with_style(PathStyle::Posix);
//! let prepared = prepare_with(&event, &options).unwrap();
//! assert_eq!(
//!     prepared,
//!     Node::from(json!({
//!         "Image Path": "rpi.img",
//!         "Image Recommended Size": 4,
//!         "NODE_ENV": "production"
//!     }))
//! );
//! ```

pub mod anonymize;
pub mod casing;
pub mod error;
pub mod node;
pub mod paths;
pub mod transform;

#[cfg(test)]
mod proptest_strategies;

// Re-export main types for convenience
pub use anonymize::{anonymize, anonymize_str, anonymize_value, anonymize_with, AnonymizeOptions};
pub use casing::{is_preserved_key, start_case};
pub use error::{Error, Result};
pub use node::{Mapping, Node, Scalar};
pub use paths::PathStyle;
pub use transform::{transform, transform_value, transform_with, TransformOptions};

use serde::{Deserialize, Serialize};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Options for [`prepare_with`]
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PrepareOptions {
    pub transform: TransformOptions,
    pub anonymize: AnonymizeOptions,
}

impl PrepareOptions {
    pub fn with_style(mut self, style: PathStyle) -> Self {
        self.anonymize.style = style;
        self
    }

    /// Apply the same nesting limit to both passes
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.transform.max_depth = Some(max_depth);
        self.anonymize.max_depth = Some(max_depth);
        self
    }
}

/// Anonymize paths, then rename and flatten keys
pub fn prepare(node: &Node) -> Node {
    transform(&anonymize(node))
}

/// [`prepare`] with explicit options for both passes
pub fn prepare_with(node: &Node, options: &PrepareOptions) -> Result<Node> {
    let anonymized = anonymize_with(node, &options.anonymize)?;
    transform_with(&anonymized, &options.transform)
}
