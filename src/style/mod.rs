//! Style system: allow-lists, computed styles and per-element resolution.
//!
//! This module contains:
//! - The per-tag property allow-list and zero-value suppression
//! - A cascade that stands in for `getComputedStyle`
//! - The resolver that picks directly applied values

mod allow_list;
mod cascade;
mod resolver;
mod variables;

pub use allow_list::{allow_list, is_zero_suppressed};
pub use cascade::{Cascade, ComputedStyleSource, ComputedValues, InlineStyleSource, Origin};
pub use resolver::{ComputedFallback, ResolvedStyle, resolve};
pub use variables::{CustomProperties, substitute_vars};
