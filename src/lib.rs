//! # patterns-everywhere
//!
//! Capture an element of a rendered web page together with the styles that
//! were applied to it, and rebuild it as a tree of WordPress blocks.
//!
//! ## Pipeline
//!
//! - **Capture** ([`capture`]): the page is parsed, its stylesheets indexed,
//!   and the chosen subtree cloned with each element's resolved style
//!   written into its `style` attribute. Only an allow-listed set of
//!   properties per tag survives.
//! - **Convert** ([`blocks`]): the styled markup is parsed back and walked
//!   bottom-up into `{name, attributes, innerBlocks}` blocks.
//!
//! ## Quick Start
//!
//! ```
//! use patterns_everywhere::{CaptureOptions, ConvertOptions, capture_html, convert_html};
//!
//! let page = r#"<html><head><style>.hero { padding-top: 2rem }</style></head>
//!     <body><section class="hero"><h1 style="text-align: center">Hi</h1></section></body></html>"#;
//!
//! let wire = capture_html(page, ".hero", &[], &CaptureOptions::default()).unwrap();
//! let block = convert_html(&wire, &ConvertOptions::default()).unwrap();
//!
//! assert_eq!(block.name, "core/group");
//! assert_eq!(block.inner_blocks[0].name, "core/heading");
//! ```

pub mod blocks;
pub mod capture;
pub mod css;
pub mod dom;
pub mod error;
pub mod style;
pub(crate) mod util;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use blocks::{Block, ConvertOptions, convert_html, to_json};
pub use capture::{CaptureOptions, ComputedFallback, capture_html};
pub use error::{Error, Result};
pub use util::decode_page;
