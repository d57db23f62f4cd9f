//! Inline style string to block attributes.
//!
//! The mapping follows the attribute schema the block editor uses for its
//! `style`, `layout`, `align` and `textAlign` supports.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::css::shorthand::components;
use crate::dom::ElementRef;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockAttributes {
    pub style: StyleAttributes,
    pub layout: LayoutAttributes,
    pub align: String,
    pub text_align: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StyleAttributes {
    pub border: BorderAttributes,
    pub color: ColorAttributes,
    pub spacing: SpacingAttributes,
    pub elements: ElementsAttributes,
    pub typography: TypographyAttributes,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BorderAttributes {
    pub radius: Corners,
    pub top: BorderSide,
    pub right: BorderSide,
    pub bottom: BorderSide,
    pub left: BorderSide,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Corners {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_left: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_right: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bottom_left: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bottom_right: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BorderSide {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ColorAttributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpacingAttributes {
    pub padding: Sides,
    pub margin: Sides,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_gap: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Sides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bottom: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ElementsAttributes {
    pub link: LinkAttributes,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LinkAttributes {
    pub color: ColorAttributes,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypographyAttributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_style: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_height: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutAttributes {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flex_wrap: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub justify_content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orientation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vertical_alignment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column_count: Option<u32>,
}

impl BlockAttributes {
    /// Apply one `property: value` pair. Unknown properties are ignored.
    pub fn apply(&mut self, property: &str, value: &str) {
        let set = |slot: &mut Option<String>| *slot = Some(value.to_string());
        let style = &mut self.style;
        let layout = &mut self.layout;

        match property {
            "display" => match value {
                "flex" => {
                    layout.kind = Some("flex".into());
                    layout.flex_wrap = Some("nowrap".into());
                }
                "grid" => layout.kind = Some("grid".into()),
                // `block` and the rest have no layout counterpart.
                _ => {}
            },
            "justify-content" => set(&mut layout.justify_content),
            "flex-direction" => {
                let orientation = if value == "column" { "vertical" } else { "horizontal" };
                layout.orientation = Some(orientation.into());
            }
            "flex-wrap" => set(&mut layout.flex_wrap),
            "align-items" => {
                if let Some(alignment) = vertical_alignment(value) {
                    layout.vertical_alignment = Some(alignment.into());
                }
            }
            "grid-template-columns" => {
                if let Some(count) = grid_track_count(value) {
                    layout.column_count = Some(count);
                }
            }

            "background" | "background-color" => set(&mut style.color.background),
            "color" => {
                set(&mut style.color.text);
                set(&mut style.elements.link.color.text);
            }

            "padding-top" => set(&mut style.spacing.padding.top),
            "padding-right" => set(&mut style.spacing.padding.right),
            "padding-bottom" => set(&mut style.spacing.padding.bottom),
            "padding-left" => set(&mut style.spacing.padding.left),
            "margin-top" => set(&mut style.spacing.margin.top),
            "margin-right" => set(&mut style.spacing.margin.right),
            "margin-bottom" => set(&mut style.spacing.margin.bottom),
            "margin-left" => set(&mut style.spacing.margin.left),
            "gap" => set(&mut style.spacing.block_gap),

            "border-top-left-radius" => set(&mut style.border.radius.top_left),
            "border-top-right-radius" => set(&mut style.border.radius.top_right),
            "border-bottom-left-radius" => set(&mut style.border.radius.bottom_left),
            "border-bottom-right-radius" => set(&mut style.border.radius.bottom_right),
            "border-top-color" => set(&mut style.border.top.color),
            "border-top-width" => set(&mut style.border.top.width),
            "border-right-color" => set(&mut style.border.right.color),
            "border-right-width" => set(&mut style.border.right.width),
            "border-bottom-color" => set(&mut style.border.bottom.color),
            "border-bottom-width" => set(&mut style.border.bottom.width),
            "border-left-color" => set(&mut style.border.left.color),
            "border-left-width" => set(&mut style.border.left.width),

            "font-size" => set(&mut style.typography.font_size),
            "font-weight" => set(&mut style.typography.font_weight),
            "font-family" => set(&mut style.typography.font_family),
            "font-style" => set(&mut style.typography.font_style),
            "line-height" => set(&mut style.typography.line_height),

            // Paragraphs read `align`, headings read `textAlign`.
            "text-align" => {
                self.align = value.to_string();
                self.text_align = value.to_string();
            }
            _ => {}
        }
    }

    /// Drop border colors on sides that have no width.
    fn drop_widthless_border_colors(&mut self) {
        let border = &mut self.style.border;
        for side in [
            &mut border.top,
            &mut border.right,
            &mut border.bottom,
            &mut border.left,
        ] {
            if side.width.is_none() {
                side.color = None;
            }
        }
    }

    /// The attributes as a JSON object.
    pub fn into_map(self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }
}

/// Parse a `prop:value;prop:value` string into block attributes.
pub fn map_style_to_attributes(style: &str) -> BlockAttributes {
    let mut attributes = BlockAttributes::default();
    for segment in style.split(';').filter(|s| !s.trim().is_empty()) {
        let Some((property, value)) = segment.split_once(':') else {
            continue;
        };
        attributes.apply(property.trim(), value.trim());
    }
    attributes.drop_widthless_border_colors();
    attributes
}

/// Attributes for `elem` read from its `style` attribute.
///
/// An element without a style yields an empty object rather than the
/// skeleton [`BlockAttributes`] serializes to.
pub fn element_attributes(elem: ElementRef<'_>) -> Map<String, Value> {
    match elem.attr("style").filter(|s| !s.is_empty()) {
        Some(style) => map_style_to_attributes(style).into_map(),
        None => Map::new(),
    }
}

fn vertical_alignment(value: &str) -> Option<&'static str> {
    match value {
        "flex-start" | "start" => Some("top"),
        "center" => Some("center"),
        "flex-end" | "end" => Some("bottom"),
        "stretch" => Some("stretch"),
        _ => None,
    }
}

/// Number of column tracks in a `grid-template-columns` value.
///
/// `repeat(N, ...)` counts as N tracks; `repeat(auto-fill, ...)` as one.
fn grid_track_count(value: &str) -> Option<u32> {
    if value.eq_ignore_ascii_case("none") {
        return None;
    }

    let mut count = 0;
    for part in components(value) {
        // Line names take no track.
        if part.starts_with('[') {
            continue;
        }
        let lower = part.to_ascii_lowercase();
        count += match lower.strip_prefix("repeat(") {
            Some(args) => args
                .split(',')
                .next()
                .and_then(|n| n.trim().parse::<u32>().ok())
                .unwrap_or(1),
            None => 1,
        };
    }
    (count > 0).then_some(count)
}
