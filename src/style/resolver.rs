//! Per-element style resolution.
//!
//! Picks, for every property a tag may carry, the value that was directly
//! applied to the element (inline style first, then matched rules in
//! document order) and falls back to the computed value where needed.

use std::fmt;

use super::allow_list::{allow_list, is_zero_length, is_zero_suppressed};
use super::cascade::ComputedValues;
use crate::css::{CssRule, DeclarationBlock, parse_inline_style};
use crate::dom::ElementRef;

/// When to use the computed value instead of a directly applied one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ComputedFallback {
    /// Whenever there is no directly applied value, or it is a `var()` reference.
    #[default]
    Always,
    /// Only to replace `var()` references; undeclared properties are dropped.
    VariablesOnly,
}

/// Final `property -> value` pairs for one element, in allow-list order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedStyle {
    entries: Vec<(&'static str, String)>,
}

impl ResolvedStyle {
    pub fn get(&self, property: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(p, _)| *p == property)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.entries.iter().map(|(p, v)| (*p, v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serialize as `prop:value;prop:value`.
    pub fn to_style_string(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ResolvedStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (property, value)) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(";")?;
            }
            write!(f, "{property}:{value}")?;
        }
        Ok(())
    }
}

/// Resolve the style of `elem`.
///
/// `matched_rules` must be in document order; the first rule declaring a
/// property wins, regardless of specificity.
pub fn resolve(
    elem: ElementRef<'_>,
    computed: &ComputedValues,
    matched_rules: &[&CssRule],
    fallback: ComputedFallback,
) -> ResolvedStyle {
    let tag = elem.tag();
    let inline = elem.attr("style").map(parse_inline_style).unwrap_or_default();

    let mut entries = Vec::new();
    for property in allow_list(&tag) {
        if is_border_color_without_width(property, computed) {
            continue;
        }

        let direct = inline
            .declared_value(property)
            .or_else(|| matched_rules.iter().find_map(|r| r.declared_value(property)));
        let value = match direct {
            Some(value) if !is_var_reference(value) => Some(value),
            Some(_) => computed.get(property),
            None if fallback == ComputedFallback::Always && !needs_direct_value(property) => {
                computed.get(property)
            }
            None => None,
        };

        let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
            continue;
        };
        if is_zero_suppressed(&tag, property, value) {
            continue;
        }
        entries.push((property, value.to_string()));
    }

    ResolvedStyle { entries }
}

/// Backgrounds are not inherited, and every element computes a transparent
/// one, so only a directly applied background is kept.
fn needs_direct_value(property: &str) -> bool {
    matches!(property, "background" | "background-color")
}

fn is_var_reference(value: &str) -> bool {
    value
        .trim_start()
        .get(..4)
        .is_some_and(|head| head.eq_ignore_ascii_case("var("))
}

/// A border color is meaningless when the computed width of its side is zero.
fn is_border_color_without_width(property: &str, computed: &ComputedValues) -> bool {
    let Some(side) = property
        .strip_prefix("border-")
        .and_then(|rest| rest.strip_suffix("-color"))
    else {
        return false;
    };
    computed
        .get(&format!("border-{side}-width"))
        .is_some_and(is_zero_length)
}
