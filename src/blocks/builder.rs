//! Bottom-up walk from a styled subtree to a block tree.

use log::{debug, trace};
use serde_json::{Map, Value};

use super::attributes::element_attributes;
use super::runtime::{AttributeOverride, BlockRuntime, TransformContext};
use super::tag_transforms;
use super::{Block, ConvertOptions};
use crate::dom::ElementRef;

/// Containers the walk handles itself; raw transforms claiming them are
/// never used.
pub const HANDLED_TAGS: &[&str] = &[
    "div", "section", "main", "footer", "header", "article", "nav", "aside", "sidebar", "img",
    "figure", "ul", "ol", "li",
];

/// Converts elements to blocks against a [`BlockRuntime`].
pub struct BlockBuilder<'a, R: ?Sized> {
    runtime: &'a R,
    options: &'a ConvertOptions,
}

impl<'a, R: BlockRuntime + ?Sized> BlockBuilder<'a, R> {
    pub fn new(runtime: &'a R, options: &'a ConvertOptions) -> Self {
        Self { runtime, options }
    }

    pub fn runtime(&self) -> &'a R {
        self.runtime
    }

    pub fn options(&self) -> &'a ConvertOptions {
        self.options
    }

    /// Convert `node`. `None` means the node contributes nothing.
    pub fn build(&self, node: ElementRef<'_>) -> Option<Block> {
        let tag = node.tag();
        let special = tag_transforms::for_tag::<R>(&tag).and_then(|transform| transform(self, node));
        if special.is_some() {
            return special;
        }
        if !HANDLED_TAGS.contains(&tag.as_str()) {
            return Some(self.delegate(node));
        }

        let inner = self.build_children(node);
        if !inner.is_empty() {
            return Some(
                self.runtime
                    .create_block("core/group", element_attributes(node), inner),
            );
        }

        let keeps_text =
            self.options.preserve_text_containers && !node.text().trim().is_empty();
        if tag == "li" || keeps_text {
            return Some(self.text_container(node));
        }

        debug!("<{tag}> produced no blocks");
        None
    }

    fn build_children(&self, node: ElementRef<'_>) -> Vec<Block> {
        node.children().filter_map(|child| self.build(child)).collect()
    }

    /// A group holding the node's text as a single paragraph.
    fn text_container(&self, node: ElementRef<'_>) -> Block {
        let mut content = Map::new();
        content.insert("content".into(), Value::String(node.text()));
        let paragraph = self.runtime.create_block("core/paragraph", content, vec![]);
        self.runtime
            .create_block("core/group", element_attributes(node), vec![paragraph])
    }

    /// Hand `node` to the best raw transform, or keep its markup verbatim.
    fn delegate(&self, node: ElementRef<'_>) -> Block {
        match self.runtime.find_raw_transform(node, HANDLED_TAGS) {
            Some(transform) => {
                trace!("<{}> delegated to {}", node.tag(), transform.block_name());
                let over = AttributeOverride::new(transform.block_name(), element_attributes(node));
                let create = |name: &str, attributes: Map<String, Value>, inner: Vec<Block>| {
                    self.runtime.create_block(name, attributes, inner)
                };
                transform.transform(node, &TransformContext::new(over, &create))
            }
            None => {
                trace!("<{}> has no transform, keeping markup", node.tag());
                let mut attributes = Map::new();
                attributes.insert("content".into(), Value::String(node.outer_html()));
                self.runtime.create_block("core/paragraph", attributes, vec![])
            }
        }
    }
}
