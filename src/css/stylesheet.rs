//! Stylesheet and inline-style parsing.
//!
//! Declarations keep the authored value text. Shorthands are expanded into
//! their longhands on the way in, so looking up `padding-left` on a rule that
//! says `padding: 0 1rem` behaves like `rule.style.paddingLeft` in a browser.

use cssparser::{
    AtRuleParser, CowRcStr, DeclarationParser, ParseError, Parser, ParserInput, ParserState,
    QualifiedRuleParser, RuleBodyItemParser, RuleBodyParser, StyleSheetParser,
};
use log::trace;
use selectors::parser::Selector;

use super::shorthand;
use crate::dom::PageSelectors;

/// A parsed stylesheet.
#[derive(Debug, Default, Clone)]
pub struct Stylesheet {
    pub rules: Vec<CssRule>,
}

/// A style rule: selector list plus declarations.
#[derive(Debug, Clone)]
pub struct CssRule {
    /// The selector list as written (`rule.selectorText`).
    pub selector_text: String,
    pub selectors: Vec<Selector<PageSelectors>>,
    pub declarations: Vec<Declaration>,
    pub specificity: Specificity,
}

/// A single `property: value` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub property: String,
    /// Authored value text, trimmed, without `!important`.
    pub value: String,
    pub important: bool,
}

/// Selector specificity, used by the cascade. Compares field by field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Specificity {
    pub ids: u16,
    pub classes: u16,
    pub elements: u16,
}

impl Specificity {
    pub fn from_selector(selector: &Selector<PageSelectors>) -> Self {
        let spec = selector.specificity();
        // Packed as (ids << 20) | (classes << 10) | elements.
        Self {
            ids: ((spec >> 20) & 0x3FF) as u16,
            classes: ((spec >> 10) & 0x3FF) as u16,
            elements: (spec & 0x3FF) as u16,
        }
    }
}

impl Stylesheet {
    /// Parse a stylesheet. Malformed rules and all at-rules are skipped.
    pub fn parse(css: &str) -> Self {
        let mut input = ParserInput::new(css);
        let mut parser = Parser::new(&mut input);
        let mut rules = Vec::new();

        let mut rule_parser = TopLevelRuleParser { rules: &mut rules };
        for result in StyleSheetParser::new(&mut parser, &mut rule_parser) {
            if let Err((_, slice)) = result {
                trace!("skipping css rule: {}", slice.trim());
            }
        }

        Self { rules }
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Value lookup shared by rules and inline styles.
pub trait DeclarationBlock {
    fn declarations(&self) -> &[Declaration];

    /// The value a `CSSStyleDeclaration` would report for `property`:
    /// the last `!important` declaration if any, else the last declaration.
    fn declared_value(&self, property: &str) -> Option<&str> {
        let decls = self.declarations();
        decls
            .iter()
            .rev()
            .find(|d| d.important && d.property == property)
            .or_else(|| decls.iter().rev().find(|d| d.property == property))
            .map(|d| d.value.as_str())
    }
}

impl DeclarationBlock for CssRule {
    fn declarations(&self) -> &[Declaration] {
        &self.declarations
    }
}

impl DeclarationBlock for [Declaration] {
    fn declarations(&self) -> &[Declaration] {
        self
    }
}

impl DeclarationBlock for Vec<Declaration> {
    fn declarations(&self) -> &[Declaration] {
        self
    }
}

/// Parse the contents of a `style` attribute.
pub fn parse_inline_style(style: &str) -> Vec<Declaration> {
    let mut input = ParserInput::new(style);
    let mut parser = Parser::new(&mut input);
    parse_declaration_list(&mut parser)
}

fn parse_declaration_list(input: &mut Parser<'_, '_>) -> Vec<Declaration> {
    let mut declarations = Vec::new();
    let mut decl_parser = DeclarationListParser {
        declarations: &mut declarations,
    };
    for result in RuleBodyParser::new(input, &mut decl_parser) {
        if let Err((_, slice)) = result {
            trace!("skipping css declaration: {}", slice.trim());
        }
    }
    declarations
}

struct TopLevelRuleParser<'a> {
    rules: &'a mut Vec<CssRule>,
}

impl<'i> AtRuleParser<'i> for TopLevelRuleParser<'_> {
    type Prelude = ();
    type AtRule = ();
    type Error = ();

    fn parse_prelude<'t>(
        &mut self,
        _name: CowRcStr<'i>,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::Prelude, ParseError<'i, Self::Error>> {
        Err(input.new_custom_error(()))
    }

    fn parse_block<'t>(
        &mut self,
        _prelude: Self::Prelude,
        _start: &ParserState,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::AtRule, ParseError<'i, Self::Error>> {
        Err(input.new_custom_error(()))
    }
}

impl<'i> QualifiedRuleParser<'i> for TopLevelRuleParser<'_> {
    type Prelude = (String, Vec<Selector<PageSelectors>>);
    type QualifiedRule = ();
    type Error = ();

    fn parse_prelude<'t>(
        &mut self,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::Prelude, ParseError<'i, Self::Error>> {
        let start = input.position();
        let location = input.current_source_location();
        let list = selectors::parser::SelectorList::parse(
            &PageSelectors,
            input,
            selectors::parser::ParseRelative::No,
        )
        .map_err(|_| location.new_custom_error(()))?;
        let text = input.slice_from(start).trim().to_string();
        Ok((text, list.slice().to_vec()))
    }

    fn parse_block<'t>(
        &mut self,
        (selector_text, selectors): Self::Prelude,
        _start: &ParserState,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::QualifiedRule, ParseError<'i, Self::Error>> {
        let specificity = selectors
            .iter()
            .map(Specificity::from_selector)
            .max()
            .unwrap_or_default();
        let declarations = parse_declaration_list(input);

        self.rules.push(CssRule {
            selector_text,
            selectors,
            declarations,
            specificity,
        });
        Ok(())
    }
}

struct DeclarationListParser<'a> {
    declarations: &'a mut Vec<Declaration>,
}

impl<'i> AtRuleParser<'i> for DeclarationListParser<'_> {
    type Prelude = ();
    type AtRule = ();
    type Error = ();
}

impl<'i> QualifiedRuleParser<'i> for DeclarationListParser<'_> {
    type Prelude = ();
    type QualifiedRule = ();
    type Error = ();
}

impl<'i> DeclarationParser<'i> for DeclarationListParser<'_> {
    type Declaration = ();
    type Error = ();

    fn parse_value<'t>(
        &mut self,
        name: CowRcStr<'i>,
        input: &mut Parser<'i, 't>,
        _start: &ParserState,
    ) -> Result<Self::Declaration, ParseError<'i, Self::Error>> {
        let start = input.position();
        while input.next().is_ok() {}
        let (value, important) = split_important(input.slice_from(start));
        if value.is_empty() {
            return Err(input.new_custom_error(()));
        }

        let property = if name.starts_with("--") {
            name.to_string()
        } else {
            name.to_ascii_lowercase()
        };
        push_expanded(self.declarations, &property, value, important);
        Ok(())
    }
}

impl<'i> RuleBodyItemParser<'i, (), ()> for DeclarationListParser<'_> {
    fn parse_declarations(&self) -> bool {
        true
    }

    fn parse_qualified(&self) -> bool {
        false
    }
}

/// Split a trailing `!important` off a raw value.
fn split_important(raw: &str) -> (&str, bool) {
    let trimmed = raw.trim();
    if let Some(idx) = trimmed.rfind('!')
        && trimmed[idx + 1..].trim().eq_ignore_ascii_case("important")
    {
        return (trimmed[..idx].trim_end(), true);
    }
    (trimmed, false)
}

fn push_expanded(out: &mut Vec<Declaration>, property: &str, value: &str, important: bool) {
    let mut push = |property: &str, value: &str| {
        out.push(Declaration {
            property: property.to_string(),
            value: value.to_string(),
            important,
        })
    };

    match shorthand::expand(property, value) {
        Some(expansion) => {
            if expansion.keep_shorthand {
                push(property, value);
            }
            for (longhand, v) in &expansion.longhands {
                push(longhand, v);
            }
        }
        None => push(property, value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn find<'a>(decls: &'a [Declaration], property: &str) -> Option<&'a str> {
        decls.declared_value(property)
    }

    #[test]
    fn test_parse_rules_in_document_order() {
        let sheet = Stylesheet::parse(".a { color: red } @media print { p { color: blue } } .b p { color: green }");

        let texts: Vec<_> = sheet.rules.iter().map(|r| r.selector_text.as_str()).collect();
        assert_eq!(texts, [".a", ".b p"]);
    }

    #[test]
    fn test_raw_values_are_preserved() {
        let sheet = Stylesheet::parse(
            "p { font-family: \"Inter\", sans-serif; color: var(--brand, #333); background: url(a.png) no-repeat }",
        );
        let rule = &sheet.rules[0];

        assert_eq!(rule.declared_value("font-family"), Some("\"Inter\", sans-serif"));
        assert_eq!(rule.declared_value("color"), Some("var(--brand, #333)"));
        assert_eq!(rule.declared_value("background"), Some("url(a.png) no-repeat"));
    }

    #[test]
    fn test_important_is_split_off() {
        let decls = parse_inline_style("color: red !important; color: blue");

        assert_eq!(decls[0].value, "red");
        assert!(decls[0].important);
        // The important declaration wins over a later normal one.
        assert_eq!(find(&decls, "color"), Some("red"));
    }

    #[test]
    fn test_later_declaration_wins() {
        let decls = parse_inline_style("margin-top: 4px; margin-top: 8px");
        assert_eq!(find(&decls, "margin-top"), Some("8px"));
    }

    #[test]
    fn test_inline_shorthand_expands() {
        let decls = parse_inline_style("padding: 4px 8px; border: 1px solid red");

        assert_eq!(find(&decls, "padding-left"), Some("8px"));
        assert_eq!(find(&decls, "padding-bottom"), Some("4px"));
        assert_eq!(find(&decls, "border-right-width"), Some("1px"));
        assert_eq!(find(&decls, "border-right-color"), Some("red"));
        assert_eq!(find(&decls, "padding"), None);
    }

    #[test]
    fn test_custom_property_case_is_kept() {
        let decls = parse_inline_style("--Brand-Color: #f00; COLOR: blue");
        assert_eq!(find(&decls, "--Brand-Color"), Some("#f00"));
        assert_eq!(find(&decls, "color"), Some("blue"));
    }

    #[test]
    fn test_malformed_inline_style_is_skipped() {
        let decls = parse_inline_style("color:; ;font-size 12px; line-height: 1.5");
        assert_eq!(decls.len(), 1);
        assert_eq!(find(&decls, "line-height"), Some("1.5"));
    }

    #[test]
    fn test_specificity_uses_strongest_selector() {
        let sheet = Stylesheet::parse("p, #main .x { color: red }");
        let spec = sheet.rules[0].specificity;
        assert_eq!((spec.ids, spec.classes, spec.elements), (1, 1, 0));
    }

    #[test]
    fn test_specificity_ordering() {
        let id = Specificity { ids: 1, classes: 0, elements: 0 };
        let classes = Specificity { ids: 0, classes: 10, elements: 0 };
        let elements = Specificity { ids: 0, classes: 0, elements: 100 };

        assert!(id > classes);
        assert!(classes > elements);
    }
}
