//! Stylesheet model: rules, declarations and the per-capture rule index.

mod rule_index;
pub mod shorthand;
mod stylesheet;

pub use rule_index::RuleIndex;
pub use stylesheet::{
    CssRule, Declaration, DeclarationBlock, Specificity, Stylesheet, parse_inline_style,
};

use std::fs;
use std::path::Path;

use log::warn;

/// Read stylesheet sources from disk.
///
/// A source that cannot be read is skipped with a warning, the same way a
/// page skips a stylesheet it is not allowed to inspect.
pub fn read_stylesheets<P: AsRef<Path>>(paths: &[P]) -> Vec<String> {
    paths
        .iter()
        .filter_map(|path| {
            let path = path.as_ref();
            match fs::read(path) {
                Ok(bytes) => Some(crate::util::decode_stylesheet(&bytes)),
                Err(e) => {
                    warn!("skipping stylesheet {}: {e}", path.display());
                    None
                }
            }
        })
        .collect()
}
