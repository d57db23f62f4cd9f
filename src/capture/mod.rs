//! Capture phase: page in, styled wire string out.
//!
//! The page is parsed, its stylesheets indexed once, and the chosen root is
//! cloned with every element's resolved style written inline. The result is
//! self-contained markup that the conversion phase can read without access
//! to the page's stylesheets.

mod materialize;

pub use materialize::{StyledSubtree, materialize};

use log::debug;
use url::Url;

use crate::css::RuleIndex;
use crate::dom::{ElementRef, parse_document, query_selector};
use crate::error::{Error, Result};
use crate::style::Cascade;
pub use crate::style::ComputedFallback;

/// Options for a capture.
#[derive(Debug, Clone, Default)]
pub struct CaptureOptions {
    /// Base for absolute `img[src]` and `a[href]`; left untouched when `None`.
    pub base_url: Option<Url>,
    pub fallback: ComputedFallback,
}

impl CaptureOptions {
    /// Parse and set the base URL.
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self> {
        self.base_url = Some(Url::parse(base_url)?);
        Ok(self)
    }
}

/// Capture the first element matching `root_selector` in `page_html`.
///
/// `extra_css` holds stylesheets the page links to; they are indexed ahead
/// of the page's own `<style>` elements.
pub fn capture_html(
    page_html: &str,
    root_selector: &str,
    extra_css: &[String],
    options: &CaptureOptions,
) -> Result<String> {
    if page_html.trim().is_empty() {
        return Err(Error::EmptyDocument);
    }

    let dom = parse_document(page_html);
    let root = query_selector(&dom, root_selector)?
        .ok_or_else(|| Error::RootNotFound(root_selector.to_string()))?;

    let mut rules = RuleIndex::new();
    for css in extra_css {
        rules.add_css(css);
    }
    rules.add_document_styles(&dom);
    debug!("indexed {} style rules", rules.len());

    let cascade = Cascade::new(&rules);
    let subtree = materialize(ElementRef::new(&dom, root), &rules, &cascade, options);
    Ok(subtree.to_html())
}
