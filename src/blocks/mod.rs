//! Conversion phase: styled markup in, block tree out.
//!
//! The wire string produced by [`crate::capture`] is parsed back into a DOM
//! and walked bottom-up. Tag-specific transforms handle anchors, images,
//! code, and SVG; handled containers become groups; everything else is
//! delegated to a [`BlockRuntime`] raw transform with the element's inline
//! style mapped onto the block's attributes.

mod attributes;
mod block;
mod builder;
mod core_blocks;
mod runtime;
mod tag_transforms;

pub use attributes::{BlockAttributes, element_attributes, map_style_to_attributes};
pub use block::Block;
pub use builder::{BlockBuilder, HANDLED_TAGS};
pub use core_blocks::CoreBlocks;
pub use runtime::{AttributeOverride, BlockRuntime, RawTransform, TransformContext};

use crate::dom::{ElementRef, first_body_element, parse_document};
use crate::error::Result;

/// Options for a conversion.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Class substrings that make an anchor a button (case-insensitive).
    pub button_classes: Vec<String>,
    /// Keep handled containers that only hold text as a text group.
    pub preserve_text_containers: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            button_classes: vec!["btn".into(), "button".into()],
            preserve_text_containers: false,
        }
    }
}

/// Convert a wire string with the built-in [`CoreBlocks`] runtime.
///
/// Returns `None` when the markup holds no element or converts to nothing.
pub fn convert_html(html: &str, options: &ConvertOptions) -> Option<Block> {
    convert_html_with(html, &CoreBlocks::new(), options)
}

/// Convert a wire string against a custom runtime.
pub fn convert_html_with<R>(html: &str, runtime: &R, options: &ConvertOptions) -> Option<Block>
where
    R: BlockRuntime + ?Sized,
{
    let dom = parse_document(html);
    let root = first_body_element(&dom)?;
    BlockBuilder::new(runtime, options).build(ElementRef::new(&dom, root))
}

/// Serialize a conversion result; `None` becomes `false`.
pub fn to_json(block: Option<&Block>, pretty: bool) -> Result<String> {
    let json = match (block, pretty) {
        (Some(block), true) => serde_json::to_string_pretty(block)?,
        (Some(block), false) => serde_json::to_string(block)?,
        (None, _) => "false".to_string(),
    };
    Ok(json)
}
