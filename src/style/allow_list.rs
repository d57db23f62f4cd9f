//! Which CSS properties each tag may carry.
//!
//! Property groups mirror the editor's block supports: a property outside
//! a tag's list has nowhere to go on the block it becomes.

pub const COLOR: &[&str] = &["color", "background-color", "background"];

pub const TYPOGRAPHY: &[&str] = &[
    "font-size",
    "font-weight",
    "font-family",
    "line-height",
    "text-align",
];

pub const DIMENSIONS: &[&str] = &[
    "padding-right",
    "padding-left",
    "padding-top",
    "padding-bottom",
    "margin-right",
    "margin-left",
    "margin-top",
    "margin-bottom",
];

pub const BORDER_RADIUS: &[&str] = &[
    "border-top-left-radius",
    "border-top-right-radius",
    "border-bottom-left-radius",
    "border-bottom-right-radius",
];

pub const BORDER: &[&str] = &[
    "border-top-color",
    "border-top-width",
    "border-right-color",
    "border-right-width",
    "border-bottom-color",
    "border-bottom-width",
    "border-left-color",
    "border-left-width",
];

pub const DISPLAY_TYPES: &[&str] = &[
    "display",
    "flex-direction",
    "justify-content",
    "align-items",
    "flex-wrap",
    "flex-basis",
    "grid-template-columns",
    "gap",
    "row-gap",
    "column-gap",
];

/// Tags whose zero spacing and border values are the default, and so noise.
const ZERO_SUPPRESSED_TAGS: &[&str] = &["div", "section", "main", "ul", "li", "nav"];

fn concat(groups: &[&[&'static str]]) -> Vec<&'static str> {
    groups.iter().flat_map(|g| g.iter().copied()).collect()
}

/// Ordered list of properties allowed on `tag` (case-insensitive).
///
/// Unknown tags yield an empty list. The order is the order properties are
/// written back into the `style` attribute.
pub fn allow_list(tag: &str) -> Vec<&'static str> {
    match tag.to_ascii_lowercase().as_str() {
        "div" | "ul" | "li" | "section" | "main" | "nav" => concat(&[
            COLOR,
            TYPOGRAPHY,
            DIMENSIONS,
            BORDER_RADIUS,
            BORDER,
            DISPLAY_TYPES,
        ]),
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "p" => concat(&[COLOR, TYPOGRAPHY, DIMENSIONS]),
        "img" => concat(&[BORDER_RADIUS, BORDER]),
        _ => Vec::new(),
    }
}

/// Whether `property: value` should be treated as absent on `tag`.
///
/// Only literal `0` and `0px` qualify, and only for radius, border and
/// spacing properties on container tags.
pub fn is_zero_suppressed(tag: &str, property: &str, value: &str) -> bool {
    let tag = tag.to_ascii_lowercase();
    if !ZERO_SUPPRESSED_TAGS.contains(&tag.as_str()) {
        return false;
    }
    let relevant = BORDER_RADIUS.contains(&property)
        || BORDER.contains(&property)
        || DIMENSIONS.contains(&property);
    relevant && is_zero_length(value)
}

/// Literal `0` or `0px`; lengths are compared as authored.
pub fn is_zero_length(value: &str) -> bool {
    matches!(value.trim(), "0" | "0px")
}
