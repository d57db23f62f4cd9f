//! CSS cascade implementation.
//!
//! [`Cascade`] stands in for `getComputedStyle`: it orders the declarations
//! that apply to an element by importance, origin, specificity and source
//! order, then fills in inherited and initial values. Values stay as
//! authored text; lengths are not resolved to pixels.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};

use selectors::context::SelectorCaches;

use super::variables::{CustomProperties, substitute_vars};
use crate::css::{
    Declaration, DeclarationBlock, RuleIndex, Specificity, Stylesheet, parse_inline_style,
};
use crate::dom::{ArenaNodeId, ElementRef, matches_any};

/// Default styles applied before any page stylesheet.
const USER_AGENT_CSS: &str = r#"
address, article, aside, blockquote, body, div, dl, fieldset, figcaption, figure,
footer, form, h1, h2, h3, h4, h5, h6, header, hr, html, main, nav, ol, p, pre,
section, ul { display: block }
li { display: list-item }
head, link, meta, script, style, template, title { display: none }
table { display: table }
tr { display: table-row }
td, th { display: table-cell }
body { margin: 8px }
p, blockquote, figure, dl, ul, ol { margin-top: 1em; margin-bottom: 1em }
ul, ol { padding-left: 40px }
blockquote, figure { margin-left: 40px; margin-right: 40px }
h1 { font-size: 2em; margin-top: 0.67em; margin-bottom: 0.67em }
h2 { font-size: 1.5em; margin-top: 0.83em; margin-bottom: 0.83em }
h3 { font-size: 1.17em; margin-top: 1em; margin-bottom: 1em }
h4 { margin-top: 1.33em; margin-bottom: 1.33em }
h5 { font-size: 0.83em; margin-top: 1.67em; margin-bottom: 1.67em }
h6 { font-size: 0.67em; margin-top: 2.33em; margin-bottom: 2.33em }
h1, h2, h3, h4, h5, h6, b, strong, th { font-weight: bold }
pre, code, kbd, samp { font-family: monospace }
center, th { text-align: center }
a:link { color: #0000ee }
"#;

/// Where a declaration came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Origin {
    UserAgent,
    Author,
}

/// A property the cascade always reports.
struct Property<'a> {
    name: &'a str,
    inherited: bool,
    initial: Option<&'static str>,
}

const fn prop(name: &'static str, inherited: bool, initial: &'static str) -> Property<'static> {
    Property {
        name,
        inherited,
        initial: Some(initial),
    }
}

const PROPERTIES: &[Property<'static>] = &[
    prop("color", true, "rgb(0, 0, 0)"),
    prop("background-color", false, "rgba(0, 0, 0, 0)"),
    Property {
        name: "background",
        inherited: false,
        initial: None,
    },
    prop("font-size", true, "16px"),
    prop("font-weight", true, "400"),
    prop("font-family", true, "serif"),
    prop("font-style", true, "normal"),
    prop("line-height", true, "normal"),
    prop("text-align", true, "start"),
    prop("padding-top", false, "0px"),
    prop("padding-right", false, "0px"),
    prop("padding-bottom", false, "0px"),
    prop("padding-left", false, "0px"),
    prop("margin-top", false, "0px"),
    prop("margin-right", false, "0px"),
    prop("margin-bottom", false, "0px"),
    prop("margin-left", false, "0px"),
    prop("border-top-left-radius", false, "0px"),
    prop("border-top-right-radius", false, "0px"),
    prop("border-bottom-left-radius", false, "0px"),
    prop("border-bottom-right-radius", false, "0px"),
    prop("border-top-width", false, "medium"),
    prop("border-right-width", false, "medium"),
    prop("border-bottom-width", false, "medium"),
    prop("border-left-width", false, "medium"),
    prop("border-top-style", false, "none"),
    prop("border-right-style", false, "none"),
    prop("border-bottom-style", false, "none"),
    prop("border-left-style", false, "none"),
    prop("border-top-color", false, "currentcolor"),
    prop("border-right-color", false, "currentcolor"),
    prop("border-bottom-color", false, "currentcolor"),
    prop("border-left-color", false, "currentcolor"),
    prop("display", false, "inline"),
    prop("flex-direction", false, "row"),
    prop("justify-content", false, "normal"),
    prop("align-items", false, "normal"),
    prop("flex-wrap", false, "nowrap"),
    prop("flex-basis", false, "auto"),
    prop("grid-template-columns", false, "none"),
    prop("row-gap", false, "normal"),
    prop("column-gap", false, "normal"),
];

/// Computed as a combination of other properties rather than cascaded.
const DERIVED: &[&str] = &["gap"];

const SIDES: [&str; 4] = ["top", "right", "bottom", "left"];

/// Computed values for one element: `property -> value`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComputedValues {
    values: BTreeMap<String, String>,
}

impl ComputedValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// The `getPropertyValue` equivalent.
    pub fn get(&self, property: &str) -> Option<&str> {
        self.values.get(property).map(String::as_str)
    }

    pub fn insert(&mut self, property: impl Into<String>, value: impl Into<String>) {
        self.values.insert(property.into(), value.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn custom_properties(&self) -> CustomProperties {
        self.values
            .iter()
            .filter(|(k, _)| k.starts_with("--"))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ComputedValues {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Anything that can report an element's computed style.
pub trait ComputedStyleSource {
    fn computed_style(&self, elem: ElementRef<'_>) -> ComputedValues;
}

impl<F> ComputedStyleSource for F
where
    F: Fn(ElementRef<'_>) -> ComputedValues,
{
    fn computed_style(&self, elem: ElementRef<'_>) -> ComputedValues {
        self(elem)
    }
}

/// Computed style that is exactly the element's own `style` attribute.
///
/// This models a page whose rendering is fully described by inline styles,
/// which is what a captured subtree is.
#[derive(Debug, Default, Clone, Copy)]
pub struct InlineStyleSource;

impl ComputedStyleSource for InlineStyleSource {
    fn computed_style(&self, elem: ElementRef<'_>) -> ComputedValues {
        let decls = elem.attr("style").map(parse_inline_style).unwrap_or_default();
        decls
            .iter()
            .filter_map(|d| {
                decls
                    .declared_value(&d.property)
                    .map(|v| (d.property.clone(), v.to_string()))
            })
            .collect()
    }
}

/// A declaration that applies to the element, with its cascade position.
#[derive(Debug)]
struct MatchedDeclaration<'a> {
    declaration: &'a Declaration,
    origin: Origin,
    inline: bool,
    specificity: Specificity,
    order: usize,
}

/// Cascade-backed computed styles for the elements of one document.
///
/// Results are cached per node, so a `Cascade` must only be asked about
/// elements of the DOM its [`RuleIndex`] was built for.
pub struct Cascade<'r> {
    rules: &'r RuleIndex,
    user_agent: Stylesheet,
    cache: RefCell<HashMap<ArenaNodeId, ComputedValues>>,
}

impl<'r> Cascade<'r> {
    pub fn new(rules: &'r RuleIndex) -> Self {
        Self {
            rules,
            user_agent: Stylesheet::parse(USER_AGENT_CSS),
            cache: RefCell::new(HashMap::new()),
        }
    }

    /// Compute styles for an element, computing (and caching) its ancestors first.
    pub fn compute(&self, elem: ElementRef<'_>) -> ComputedValues {
        if let Some(hit) = self.cache.borrow().get(&elem.id) {
            return hit.clone();
        }

        let parent = elem.parent().map(|p| self.compute(p));
        let computed = self.compute_uncached(elem, parent.as_ref());
        self.cache.borrow_mut().insert(elem.id, computed.clone());
        computed
    }

    fn compute_uncached(
        &self,
        elem: ElementRef<'_>,
        parent: Option<&ComputedValues>,
    ) -> ComputedValues {
        let inline = elem.attr("style").map(parse_inline_style).unwrap_or_default();
        let matched = self.matched_declarations(elem, &inline);

        // Apply in cascade order; later entries win.
        let mut declared: HashMap<&str, &str> = HashMap::new();
        for m in &matched {
            declared.insert(&m.declaration.property, &m.declaration.value);
        }

        let custom = compute_custom_properties(&declared, parent);

        let mut values = ComputedValues::new();
        for (name, value) in &custom {
            values.insert(name.as_str(), value.as_str());
        }

        for property in PROPERTIES {
            let value = match declared.get(property.name) {
                Some(raw) => specified_value(raw, property, &custom, parent),
                None => default_value(property, parent),
            };
            if let Some(value) = value {
                values.insert(property.name, value);
            }
        }

        // Anything else the element declares is reported as a non-inherited value.
        for (&name, &raw) in &declared {
            if name.starts_with("--")
                || DERIVED.contains(&name)
                || PROPERTIES.iter().any(|p| p.name == name)
            {
                continue;
            }
            let property = Property {
                name,
                inherited: false,
                initial: None,
            };
            if let Some(value) = specified_value(raw, &property, &custom, parent) {
                values.insert(name, value);
            }
        }

        finish_computed_values(&mut values, parent);
        values
    }

    fn matched_declarations<'s>(
        &'s self,
        elem: ElementRef<'_>,
        inline: &'s [Declaration],
    ) -> Vec<MatchedDeclaration<'s>> {
        // Pre-allocate with typical capacity (most elements match 5-20 declarations)
        let mut matched = Vec::with_capacity(16);
        let mut order = 0;
        let mut caches = SelectorCaches::default();

        let user_agent = self
            .user_agent
            .rules
            .iter()
            .filter(|rule| matches_any(elem, &rule.selectors, &mut caches))
            .map(|rule| (rule, Origin::UserAgent));
        let author = self
            .rules
            .matched_rules(elem)
            .into_iter()
            .map(|rule| (rule, Origin::Author));

        for (rule, origin) in user_agent.collect::<Vec<_>>().into_iter().chain(author) {
            for declaration in &rule.declarations {
                matched.push(MatchedDeclaration {
                    declaration,
                    origin,
                    inline: false,
                    specificity: rule.specificity,
                    order,
                });
                order += 1;
            }
        }

        for declaration in inline {
            matched.push(MatchedDeclaration {
                declaration,
                origin: Origin::Author,
                inline: true,
                specificity: Specificity::default(),
                order,
            });
            order += 1;
        }

        if matched.len() > 1 {
            matched.sort_by_key(|m| {
                (
                    m.declaration.important,
                    m.origin,
                    m.inline,
                    m.specificity,
                    m.order,
                )
            });
        }
        matched
    }
}

impl ComputedStyleSource for Cascade<'_> {
    fn computed_style(&self, elem: ElementRef<'_>) -> ComputedValues {
        self.compute(elem)
    }
}

/// Inherit the parent's custom properties, then apply this element's own.
fn compute_custom_properties(
    declared: &HashMap<&str, &str>,
    parent: Option<&ComputedValues>,
) -> CustomProperties {
    let inherited = parent
        .map(ComputedValues::custom_properties)
        .unwrap_or_default();
    let own: Vec<(&str, &str)> = declared
        .iter()
        .filter(|(name, _)| name.starts_with("--"))
        .map(|(&name, &value)| (name, value))
        .collect();

    let mut raw = inherited.clone();
    for &(name, value) in &own {
        raw.insert(name.to_string(), value.to_string());
    }

    let mut custom = inherited.clone();
    for (name, value) in own {
        let resolved = match value.trim().to_ascii_lowercase().as_str() {
            "initial" => None,
            "inherit" | "unset" => inherited.get(name).cloned(),
            _ => substitute_vars(value, &raw, &mut vec![name.to_string()]),
        };
        match resolved {
            Some(value) => custom.insert(name.to_string(), value),
            None => custom.remove(name),
        };
    }
    custom
}

/// Turn a declared value into a computed one, honoring CSS-wide keywords.
fn specified_value(
    raw: &str,
    property: &Property<'_>,
    custom: &CustomProperties,
    parent: Option<&ComputedValues>,
) -> Option<String> {
    let Some(value) = substitute_vars(raw, custom, &mut Vec::new()) else {
        // Invalid at computed-value time behaves like `unset`.
        return default_value(property, parent);
    };

    match value.trim().to_ascii_lowercase().as_str() {
        "inherit" => parent
            .and_then(|p| p.get(property.name))
            .map(str::to_string)
            .or_else(|| property.initial.map(str::to_string)),
        "initial" => property.initial.map(str::to_string),
        "unset" | "revert" | "revert-layer" => default_value(property, parent),
        _ => Some(value),
    }
}

fn default_value(property: &Property<'_>, parent: Option<&ComputedValues>) -> Option<String> {
    let inherited = if property.inherited {
        parent.and_then(|p| p.get(property.name))
    } else {
        None
    };
    inherited.or(property.initial).map(str::to_string)
}

/// Resolve values that depend on other computed values.
fn finish_computed_values(values: &mut ComputedValues, parent: Option<&ComputedValues>) {
    let parent_color = parent
        .and_then(|p| p.get("color"))
        .unwrap_or("rgb(0, 0, 0)")
        .to_string();
    if values
        .get("color")
        .is_some_and(|c| c.eq_ignore_ascii_case("currentcolor"))
    {
        values.insert("color", parent_color);
    }
    let color = values.get("color").unwrap_or("rgb(0, 0, 0)").to_string();

    let mut color_properties = vec!["background-color".to_string()];
    color_properties.extend(SIDES.iter().map(|side| format!("border-{side}-color")));
    for property in color_properties {
        if values
            .get(&property)
            .is_some_and(|v| v.eq_ignore_ascii_case("currentcolor"))
        {
            values.insert(property, color.clone());
        }
    }

    for side in SIDES {
        let style = values
            .get(&format!("border-{side}-style"))
            .unwrap_or("none")
            .to_ascii_lowercase();
        let width_property = format!("border-{side}-width");
        let width = match style.as_str() {
            "none" | "hidden" => "0px".to_string(),
            _ => match values.get(&width_property).unwrap_or("medium") {
                w if w.eq_ignore_ascii_case("thin") => "1px".to_string(),
                w if w.eq_ignore_ascii_case("medium") => "3px".to_string(),
                w if w.eq_ignore_ascii_case("thick") => "5px".to_string(),
                w => w.to_string(),
            },
        };
        values.insert(width_property, width);
    }

    if let Some(weight) = values.get("font-weight") {
        let numeric = match weight.to_ascii_lowercase().as_str() {
            "normal" => Some("400"),
            "bold" => Some("700"),
            _ => None,
        };
        if let Some(numeric) = numeric {
            values.insert("font-weight", numeric);
        }
    }

    let row = values.get("row-gap").unwrap_or("normal").to_string();
    let column = values.get("column-gap").unwrap_or("normal").to_string();
    let gap = if row == column {
        row
    } else {
        format!("{row} {column}")
    };
    values.insert("gap", gap);
}
