//! Document-ordered index of every accessible style rule.

use log::debug;
use selectors::context::SelectorCaches;

use super::stylesheet::{CssRule, Stylesheet};
use crate::dom::{ArenaDom, ElementRef, matches_any};

/// All rules of all stylesheets, in the order they were added.
///
/// Built once per capture; rules never change during a walk.
#[derive(Debug, Default, Clone)]
pub struct RuleIndex {
    rules: Vec<CssRule>,
}

impl RuleIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index the `<style>` elements of a parsed page.
    pub fn from_document(dom: &ArenaDom) -> Self {
        let mut index = Self::new();
        index.add_document_styles(dom);
        index
    }

    pub fn add_stylesheet(&mut self, sheet: Stylesheet) {
        self.rules.extend(sheet.rules);
    }

    pub fn add_css(&mut self, css: &str) {
        self.add_stylesheet(Stylesheet::parse(css));
    }

    /// Append the rules of every `<style>` element, in document order.
    pub fn add_document_styles(&mut self, dom: &ArenaDom) {
        let styles: Vec<_> = dom
            .descendants(dom.document())
            .into_iter()
            .filter(|&id| dom.is_element(id) && dom.tag_name(id) == "style")
            .collect();

        for id in styles {
            let before = self.rules.len();
            self.add_css(&dom.text_of(id));
            debug!("indexed {} rules from <style>", self.rules.len() - before);
        }
    }

    pub fn rules(&self) -> &[CssRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rules whose selector list matches `elem`, in document order.
    pub fn matched_rules(&self, elem: ElementRef<'_>) -> Vec<&CssRule> {
        let mut caches = SelectorCaches::default();
        self.rules
            .iter()
            .filter(|rule| matches_any(elem, &rule.selectors, &mut caches))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parse_document;

    #[test]
    fn test_rules_from_style_elements_in_document_order() {
        let dom = parse_document(
            "<html><head><style>.a{color:red}</style></head>\
             <body><style>.b{color:blue}</style><p class=\"a b\">x</p></body></html>",
        );
        let index = RuleIndex::from_document(&dom);
        assert_eq!(index.len(), 2);

        let p = ElementRef::new(&dom, dom.find_by_tag("p").unwrap());
        let matched: Vec<_> = index
            .matched_rules(p)
            .iter()
            .map(|r| r.selector_text.as_str())
            .collect();
        assert_eq!(matched, [".a", ".b"]);
    }

    #[test]
    fn test_matched_rules_are_not_specificity_sorted() {
        let mut index = RuleIndex::new();
        index.add_css("p { color: red } #x { color: blue } p { margin: 0 }");

        let dom = parse_document(r#"<p id="x">x</p>"#);
        let p = ElementRef::new(&dom, dom.find_by_tag("p").unwrap());

        let matched: Vec<_> = index
            .matched_rules(p)
            .iter()
            .map(|r| r.selector_text.as_str())
            .collect();
        assert_eq!(matched, ["p", "#x", "p"]);
    }

    #[test]
    fn test_non_matching_rules_are_excluded() {
        let mut index = RuleIndex::new();
        index.add_css(".card { padding: 1rem } h1 { color: red }");

        let dom = parse_document(r#"<div class="card"><p>x</p></div>"#);
        let p = ElementRef::new(&dom, dom.find_by_tag("p").unwrap());
        assert!(index.matched_rules(p).is_empty());
    }
}
