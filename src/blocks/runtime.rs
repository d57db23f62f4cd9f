//! The block-editor capabilities the builder calls into.

use serde_json::{Map, Value};

use super::Block;
use crate::dom::ElementRef;

/// Attributes to merge into the block a raw transform creates.
///
/// Carried by the [`TransformContext`] of one call; applies only to blocks
/// whose name equals `block_name`.
#[derive(Debug, Clone, Default)]
pub struct AttributeOverride {
    pub block_name: String,
    pub attributes: Map<String, Value>,
}

impl AttributeOverride {
    pub fn new(block_name: impl Into<String>, attributes: Map<String, Value>) -> Self {
        Self {
            block_name: block_name.into(),
            attributes,
        }
    }

    /// Shallow-merge the override over `attributes` if `block_name` matches.
    pub fn apply(&self, block_name: &str, mut attributes: Map<String, Value>) -> Map<String, Value> {
        if block_name == self.block_name {
            for (key, value) in &self.attributes {
                attributes.insert(key.clone(), value.clone());
            }
        }
        attributes
    }
}

/// Block creation for one raw-transform call.
///
/// Blocks go through the runtime's `create_block`, with the call's
/// [`AttributeOverride`] merged in first.
pub struct TransformContext<'a> {
    attributes: AttributeOverride,
    create: &'a dyn Fn(&str, Map<String, Value>, Vec<Block>) -> Block,
}

impl<'a> TransformContext<'a> {
    pub fn new(
        attributes: AttributeOverride,
        create: &'a dyn Fn(&str, Map<String, Value>, Vec<Block>) -> Block,
    ) -> Self {
        Self { attributes, create }
    }

    pub fn create_block(&self, name: &str, attributes: Map<String, Value>, inner_blocks: Vec<Block>) -> Block {
        (self.create)(name, self.attributes.apply(name, attributes), inner_blocks)
    }
}

/// A tag-matched conversion from an element to a block.
pub trait RawTransform {
    /// Name of the block this transform produces.
    fn block_name(&self) -> &str;

    /// Tags this transform claims.
    fn tags(&self) -> &[&'static str];

    /// Lower runs first.
    fn priority(&self) -> i32 {
        10
    }

    fn is_match(&self, node: ElementRef<'_>) -> bool {
        self.tags().contains(&node.tag().as_str())
    }

    fn transform(&self, node: ElementRef<'_>, blocks: &TransformContext<'_>) -> Block;
}

/// Block creation and raw-transform lookup.
pub trait BlockRuntime {
    fn create_block(&self, name: &str, attributes: Map<String, Value>, inner_blocks: Vec<Block>) -> Block {
        Block::new(name, attributes, inner_blocks)
    }

    /// Best transform for `node`, ignoring transforms that claim any of `exclude`.
    fn find_raw_transform(&self, node: ElementRef<'_>, exclude: &[&str]) -> Option<&dyn RawTransform>;
}
