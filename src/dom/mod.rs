//! In-memory DOM used by both the capture and the conversion phase.
//!
//! Pages and wire strings are parsed with html5ever into an [`ArenaDom`];
//! [`ElementRef`] is the element handle the style resolver and the block
//! builder work against.

mod arena;
mod element_ref;
mod serialize;
mod tree_sink;

pub use arena::{ArenaDom, ArenaNode, ArenaNodeData, ArenaNodeId, Attribute};
pub use element_ref::{ElementRef, PageSelectors, matches_any, parse_selector_list};
pub use serialize::SerializableNode;

use html5ever::driver::ParseOpts;
use html5ever::parse_document as html5ever_parse_document;
use html5ever::tendril::TendrilSink;
use selectors::context::SelectorCaches;

use crate::error::{Error, Result};
use tree_sink::ArenaSink;

/// Parse an HTML document or fragment.
///
/// Fragments get the implied `html`/`head`/`body` wrappers a browser adds.
pub fn parse_document(html: &str) -> ArenaDom {
    html5ever_parse_document(ArenaSink::new(), ParseOpts::default())
        .from_utf8()
        .one(html.as_bytes())
        .into_dom()
}

/// First element in document order matching `selector`.
pub fn query_selector(dom: &ArenaDom, selector: &str) -> Result<Option<ArenaNodeId>> {
    let selectors =
        parse_selector_list(selector).ok_or_else(|| Error::InvalidSelector(selector.to_string()))?;
    let mut caches = SelectorCaches::default();

    Ok(dom
        .descendants(dom.document())
        .into_iter()
        .filter(|&id| dom.is_element(id))
        .find(|&id| matches_any(ElementRef::new(dom, id), &selectors, &mut caches)))
}

/// The first element child of `<body>`, i.e. the root of a parsed wire string.
pub fn first_body_element(dom: &ArenaDom) -> Option<ArenaNodeId> {
    let body = dom.body()?;
    dom.element_children(body).next()
}
