//! Shorthand to longhand expansion.
//!
//! Values are split into components with cssparser so that functions such
//! as `rgb(0, 0, 0)` or `var(--gap, 1rem)` stay in one piece. Component text
//! is kept as authored.

use cssparser::{ParseError, Parser, ParserInput, Token};

const SIDES: [&str; 4] = ["top", "right", "bottom", "left"];
const CORNERS: [&str; 4] = ["top-left", "top-right", "bottom-right", "bottom-left"];

const BORDER_STYLES: &[&str] = &[
    "none", "hidden", "dotted", "dashed", "solid", "double", "groove", "ridge", "inset", "outset",
];

const COLOR_FUNCTIONS: &[&str] = &[
    "rgb", "rgba", "hsl", "hsla", "hwb", "lab", "lch", "oklab", "oklch", "color", "color-mix",
    "light-dark",
];

/// Keywords that can appear in `background` without being a color.
const BACKGROUND_KEYWORDS: &[&str] = &[
    "none", "repeat", "repeat-x", "repeat-y", "no-repeat", "space", "round", "scroll", "fixed",
    "local", "left", "right", "top", "bottom", "center", "auto", "cover", "contain", "border-box",
    "padding-box", "content-box", "text", "inherit", "initial", "unset", "revert",
];

/// Result of expanding a shorthand declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expansion {
    /// Whether the shorthand itself is also kept as a declaration.
    pub keep_shorthand: bool,
    pub longhands: Vec<(String, String)>,
}

impl Expansion {
    fn replace(longhands: Vec<(String, String)>) -> Self {
        Self {
            keep_shorthand: false,
            longhands,
        }
    }

    fn keep(longhands: Vec<(String, String)>) -> Self {
        Self {
            keep_shorthand: true,
            longhands,
        }
    }
}

/// Expand `property: value` if `property` is a shorthand we track.
///
/// Returns `None` for longhands and for shorthand values we cannot split
/// (for example a lone `var()`), in which case the declaration is kept as is.
pub fn expand(property: &str, value: &str) -> Option<Expansion> {
    let parts = components(value);
    if parts.is_empty() {
        return None;
    }
    // A var() reference may stand for several components; leave it alone.
    let opaque = parts.iter().any(|p| p.to_ascii_lowercase().starts_with("var("));

    match property {
        "margin" | "padding" if !opaque => {
            let values = expand_box(&parts)?;
            Some(Expansion::replace(
                SIDES
                    .iter()
                    .zip(values)
                    .map(|(side, v)| (format!("{property}-{side}"), v))
                    .collect(),
            ))
        }
        "border-width" | "border-style" | "border-color" if !opaque => {
            let kind = &property["border-".len()..];
            let values = expand_box(&parts)?;
            Some(Expansion::replace(
                SIDES
                    .iter()
                    .zip(values)
                    .map(|(side, v)| (format!("border-{side}-{kind}"), v))
                    .collect(),
            ))
        }
        "border-radius" if !opaque => {
            // Only the horizontal radii; `a / b` elliptical forms keep the part before '/'.
            let horizontal: Vec<String> =
                parts.into_iter().take_while(|p| p != "/").collect();
            // Corners take the box rule clockwise from the top-left.
            let values = expand_box(&horizontal)?;
            Some(Expansion::replace(
                CORNERS
                    .iter()
                    .zip(values)
                    .map(|(corner, v)| (format!("border-{corner}-radius"), v))
                    .collect(),
            ))
        }
        "border" if !opaque => {
            let (width, style, color) = split_border(&parts)?;
            let mut longhands = Vec::with_capacity(12);
            for side in SIDES {
                longhands.push((format!("border-{side}-width"), width.clone()));
                longhands.push((format!("border-{side}-style"), style.clone()));
                longhands.push((format!("border-{side}-color"), color.clone()));
            }
            Some(Expansion::replace(longhands))
        }
        "border-top" | "border-right" | "border-bottom" | "border-left" if !opaque => {
            let (width, style, color) = split_border(&parts)?;
            Some(Expansion::replace(vec![
                (format!("{property}-width"), width),
                (format!("{property}-style"), style),
                (format!("{property}-color"), color),
            ]))
        }
        "gap" if !opaque => {
            let (row, column) = match parts.as_slice() {
                [both] => (both.clone(), both.clone()),
                [row, column] => (row.clone(), column.clone()),
                _ => return None,
            };
            Some(Expansion::keep(vec![
                ("row-gap".to_string(), row),
                ("column-gap".to_string(), column),
            ]))
        }
        "flex-flow" if !opaque => {
            let mut longhands = Vec::new();
            for part in &parts {
                match part.to_ascii_lowercase().as_str() {
                    "row" | "row-reverse" | "column" | "column-reverse" => {
                        longhands.push(("flex-direction".to_string(), part.clone()))
                    }
                    "nowrap" | "wrap" | "wrap-reverse" => {
                        longhands.push(("flex-wrap".to_string(), part.clone()))
                    }
                    _ => return None,
                }
            }
            Some(Expansion::replace(longhands))
        }
        "background" => {
            let color = parts.iter().rev().find(|p| is_color(p));
            Some(Expansion::keep(
                color
                    .map(|c| vec![("background-color".to_string(), c.clone())])
                    .unwrap_or_default(),
            ))
        }
        _ => None,
    }
}

/// Split a value into whitespace-separated components.
///
/// Functions and bracketed blocks are kept whole; commas are their own
/// component.
pub fn components(value: &str) -> Vec<String> {
    let mut input = ParserInput::new(value);
    let mut parser = Parser::new(&mut input);
    let mut parts = Vec::new();

    loop {
        parser.skip_whitespace();
        let start = parser.position();
        let is_block = match parser.next() {
            Ok(token) => matches!(
                token,
                Token::Function(_)
                    | Token::ParenthesisBlock
                    | Token::SquareBracketBlock
                    | Token::CurlyBracketBlock
            ),
            Err(_) => break,
        };
        if is_block {
            let _ = parser.parse_nested_block(|nested| {
                while nested.next().is_ok() {}
                Ok::<(), ParseError<'_, ()>>(())
            });
        }
        let text = parser.slice_from(start).trim();
        if !text.is_empty() {
            parts.push(text.to_string());
        }
    }
    parts
}

/// The 1-4 value box rule: top, right, bottom, left.
fn expand_box(parts: &[String]) -> Option<[String; 4]> {
    let [top, right, bottom, left] = match parts {
        [a] => [a, a, a, a],
        [a, b] => [a, b, a, b],
        [a, b, c] => [a, b, c, b],
        [a, b, c, d] => [a, b, c, d],
        _ => return None,
    };
    Some([top.clone(), right.clone(), bottom.clone(), left.clone()])
}

/// Order-insensitive `<width> || <style> || <color>` with initial values for
/// the missing parts.
fn split_border(parts: &[String]) -> Option<(String, String, String)> {
    let mut width = None;
    let mut style = None;
    let mut color = None;

    for part in parts {
        let lower = part.to_ascii_lowercase();
        if style.is_none() && BORDER_STYLES.contains(&lower.as_str()) {
            style = Some(part.clone());
        } else if width.is_none() && is_length(&lower) {
            width = Some(part.clone());
        } else if color.is_none() {
            color = Some(part.clone());
        } else {
            return None;
        }
    }

    Some((
        width.unwrap_or_else(|| "medium".to_string()),
        style.unwrap_or_else(|| "none".to_string()),
        color.unwrap_or_else(|| "currentcolor".to_string()),
    ))
}

fn is_length(lower: &str) -> bool {
    matches!(lower, "thin" | "medium" | "thick")
        || lower.starts_with("calc(")
        || lower
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_digit() || c == '.')
}

/// Whether a component of a `background` value is a color.
pub fn is_color(part: &str) -> bool {
    let lower = part.to_ascii_lowercase();
    if lower.starts_with('#') {
        return true;
    }
    if let Some((name, _)) = lower.split_once('(') {
        return COLOR_FUNCTIONS.contains(&name);
    }
    !lower.is_empty()
        && lower.chars().all(|c| c.is_ascii_alphabetic())
        && !BACKGROUND_KEYWORDS.contains(&lower.as_str())
}
