//! `selectors::Element` over the arena DOM.
//!
//! Stylesheet rules are matched against captured elements the way
//! `element.matches(rule.selectorText)` does in the page.

use std::fmt;

use cssparser::{CowRcStr, ParseError, SourceLocation};
use html5ever::{LocalName, Namespace};
use precomputed_hash::PrecomputedHash;
use selectors::attr::{AttrSelectorOperation, CaseSensitivity, NamespaceConstraint};
use selectors::context::{MatchingContext, SelectorCaches};
use selectors::matching::ElementSelectorFlags;
use selectors::parser::{Selector, SelectorParseErrorKind};
use selectors::{OpaqueElement, SelectorImpl};

use super::arena::{ArenaDom, ArenaNodeData, ArenaNodeId};

/// Selector implementation for page stylesheets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSelectors;

/// Newtypes the selector parser uses for names and values. Each one needs
/// `ToCss` and conversion from parsed strings.
macro_rules! selector_atom {
    ($(#[$meta:meta])* $name:ident($inner:ty)) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Default, Hash)]
        pub struct $name(pub $inner);

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(<$inner>::from(s))
            }
        }

        impl<'a> From<&'a str> for $name {
            fn from(s: &'a str) -> Self {
                Self(<$inner>::from(s))
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl cssparser::ToCss for $name {
            fn to_css<W: fmt::Write>(&self, dest: &mut W) -> fmt::Result {
                dest.write_str(&self.0)
            }
        }
    };
}

selector_atom!(
    /// Attribute values, ids, classes and namespace prefixes.
    IdentStr(String)
);
selector_atom!(CssLocalName(LocalName));
selector_atom!(CssNamespace(Namespace));

impl PrecomputedHash for IdentStr {
    fn precomputed_hash(&self) -> u32 {
        self.0
            .bytes()
            .fold(0u32, |h, byte| h.wrapping_mul(31).wrapping_add(byte as u32))
    }
}

impl PrecomputedHash for CssLocalName {
    fn precomputed_hash(&self) -> u32 {
        self.0.precomputed_hash()
    }
}

impl PrecomputedHash for CssNamespace {
    fn precomputed_hash(&self) -> u32 {
        self.0.precomputed_hash()
    }
}

/// Pseudo-elements never match a captured element, so none are parsed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PseudoElement {}

impl cssparser::ToCss for PseudoElement {
    fn to_css<W: fmt::Write>(&self, _dest: &mut W) -> fmt::Result {
        match *self {}
    }
}

impl selectors::parser::PseudoElement for PseudoElement {
    type Impl = PageSelectors;

    fn accepts_state_pseudo_classes(&self) -> bool {
        false
    }

    fn valid_after_slotted(&self) -> bool {
        false
    }
}

/// Dynamic pseudo-classes.
///
/// These are accepted by the parser so that a selector list such as
/// `a, a:hover` still yields its static half. Only `:link` can match a
/// snapshot; user-action states are never active.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NonTSPseudoClass {
    Link,
    AnyLink,
    Visited,
    Hover,
    Active,
    Focus,
    FocusVisible,
    FocusWithin,
}

impl selectors::parser::NonTSPseudoClass for NonTSPseudoClass {
    type Impl = PageSelectors;

    fn is_active_or_hover(&self) -> bool {
        matches!(self, Self::Hover | Self::Active)
    }

    fn is_user_action_state(&self) -> bool {
        matches!(
            self,
            Self::Hover | Self::Active | Self::Focus | Self::FocusVisible | Self::FocusWithin
        )
    }
}

impl cssparser::ToCss for NonTSPseudoClass {
    fn to_css<W: fmt::Write>(&self, dest: &mut W) -> fmt::Result {
        dest.write_str(match self {
            Self::Link => ":link",
            Self::AnyLink => ":any-link",
            Self::Visited => ":visited",
            Self::Hover => ":hover",
            Self::Active => ":active",
            Self::Focus => ":focus",
            Self::FocusVisible => ":focus-visible",
            Self::FocusWithin => ":focus-within",
        })
    }
}

impl<'i> selectors::parser::Parser<'i> for PageSelectors {
    type Impl = PageSelectors;
    type Error = SelectorParseErrorKind<'i>;

    fn parse_non_ts_pseudo_class(
        &self,
        location: SourceLocation,
        name: CowRcStr<'i>,
    ) -> Result<NonTSPseudoClass, ParseError<'i, Self::Error>> {
        let pseudo = match name.to_ascii_lowercase().as_str() {
            "link" => NonTSPseudoClass::Link,
            "any-link" => NonTSPseudoClass::AnyLink,
            "visited" => NonTSPseudoClass::Visited,
            "hover" => NonTSPseudoClass::Hover,
            "active" => NonTSPseudoClass::Active,
            "focus" => NonTSPseudoClass::Focus,
            "focus-visible" => NonTSPseudoClass::FocusVisible,
            "focus-within" => NonTSPseudoClass::FocusWithin,
            _ => {
                return Err(location.new_custom_error(
                    SelectorParseErrorKind::UnsupportedPseudoClassOrElement(name),
                ));
            }
        };
        Ok(pseudo)
    }
}

impl SelectorImpl for PageSelectors {
    type ExtraMatchingData<'a> = ();
    type AttrValue = IdentStr;
    type Identifier = IdentStr;
    type LocalName = CssLocalName;
    type NamespaceUrl = CssNamespace;
    type NamespacePrefix = IdentStr;
    type BorrowedLocalName = CssLocalName;
    type BorrowedNamespaceUrl = CssNamespace;
    type NonTSPseudoClass = NonTSPseudoClass;
    type PseudoElement = PseudoElement;
}

/// Parse a single selector list (e.g. the capture root selector).
pub fn parse_selector_list(text: &str) -> Option<Vec<Selector<PageSelectors>>> {
    let mut input = cssparser::ParserInput::new(text);
    let mut parser = cssparser::Parser::new(&mut input);
    selectors::parser::SelectorList::parse(
        &PageSelectors,
        &mut parser,
        selectors::parser::ParseRelative::No,
    )
    .ok()
    .map(|list| list.slice().to_vec())
}

/// Whether `elem` matches any selector in `selectors`.
pub fn matches_any(
    elem: ElementRef<'_>,
    selectors: &[Selector<PageSelectors>],
    caches: &mut SelectorCaches,
) -> bool {
    let mut context = MatchingContext::new(
        selectors::matching::MatchingMode::Normal,
        None,
        caches,
        selectors::context::QuirksMode::NoQuirks,
        selectors::matching::NeedsSelectorFlags::No,
        selectors::matching::MatchingForInvalidation::No,
    );
    selectors
        .iter()
        .any(|selector| selectors::matching::matches_selector(selector, 0, None, &elem, &mut context))
}

/// Reference to an element in an [`ArenaDom`].
///
/// This is the node handle both phases pass around: it reads tag,
/// attributes and children, and matches selectors.
#[derive(Clone, Copy)]
pub struct ElementRef<'a> {
    pub dom: &'a ArenaDom,
    pub id: ArenaNodeId,
}

impl<'a> ElementRef<'a> {
    pub fn new(dom: &'a ArenaDom, id: ArenaNodeId) -> Self {
        Self { dom, id }
    }

    /// Lower-cased tag name.
    pub fn tag(&self) -> String {
        self.dom.tag_name(self.id)
    }

    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.dom.get_attr(self.id, name)
    }

    /// Element children, in document order.
    pub fn children(&self) -> impl Iterator<Item = ElementRef<'a>> + 'a {
        let dom = self.dom;
        dom.element_children(self.id).map(move |id| ElementRef::new(dom, id))
    }

    /// Number of child nodes of any kind (the `childNodes.length` view).
    pub fn child_node_count(&self) -> usize {
        self.dom.children(self.id).count()
    }

    pub fn parent(&self) -> Option<ElementRef<'a>> {
        let parent = self.dom.get(self.id)?.parent?;
        self.dom
            .is_element(parent)
            .then(|| ElementRef::new(self.dom, parent))
    }

    /// Descendant text, the stand-in for `innerText`.
    pub fn text(&self) -> String {
        self.dom.text_of(self.id)
    }

    pub fn outer_html(&self) -> String {
        self.dom.outer_html(self.id)
    }

    pub fn inner_html(&self) -> String {
        self.dom.inner_html(self.id)
    }
}

impl fmt::Debug for ElementRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementRef")
            .field("id", &self.id)
            .field("name", &self.dom.element_name(self.id))
            .finish()
    }
}

impl selectors::Element for ElementRef<'_> {
    type Impl = PageSelectors;

    fn opaque(&self) -> OpaqueElement {
        OpaqueElement::new(self)
    }

    fn parent_element(&self) -> Option<Self> {
        self.parent()
    }

    fn parent_node_is_shadow_root(&self) -> bool {
        false
    }

    fn containing_shadow_host(&self) -> Option<Self> {
        None
    }

    fn is_pseudo_element(&self) -> bool {
        false
    }

    fn prev_sibling_element(&self) -> Option<Self> {
        let dom = self.dom;
        std::iter::successors(dom.get(self.id)?.prev_sibling, |&id| dom.get(id)?.prev_sibling)
            .find(|&id| dom.is_element(id))
            .map(|id| Self::new(dom, id))
    }

    fn next_sibling_element(&self) -> Option<Self> {
        let dom = self.dom;
        std::iter::successors(dom.get(self.id)?.next_sibling, |&id| dom.get(id)?.next_sibling)
            .find(|&id| dom.is_element(id))
            .map(|id| Self::new(dom, id))
    }

    fn first_element_child(&self) -> Option<Self> {
        self.dom
            .element_children(self.id)
            .next()
            .map(|child| Self::new(self.dom, child))
    }

    fn is_html_element_in_html_document(&self) -> bool {
        true
    }

    fn has_local_name(&self, name: &CssLocalName) -> bool {
        self.dom
            .element_name(self.id)
            .is_some_and(|n| n == &name.0)
    }

    fn has_namespace(&self, ns: &CssNamespace) -> bool {
        self.dom
            .element_namespace(self.id)
            .is_some_and(|n| n == &ns.0)
    }

    fn is_same_type(&self, other: &Self) -> bool {
        self.dom.element_name(self.id) == other.dom.element_name(other.id)
    }

    fn attr_matches(
        &self,
        ns: &NamespaceConstraint<&CssNamespace>,
        local_name: &CssLocalName,
        operation: &AttrSelectorOperation<&IdentStr>,
    ) -> bool {
        let Some(ArenaNodeData::Element { attrs, .. }) = self.dom.get(self.id).map(|n| &n.data)
        else {
            return false;
        };

        attrs
            .iter()
            .filter(|attr| match ns {
                NamespaceConstraint::Any => true,
                NamespaceConstraint::Specific(ns) => attr.name.ns == ns.0,
            })
            .find(|attr| attr.name.local == local_name.0)
            .is_some_and(|attr| operation.eval_str(&attr.value))
    }

    fn match_non_ts_pseudo_class(
        &self,
        pc: &NonTSPseudoClass,
        _context: &mut MatchingContext<'_, Self::Impl>,
    ) -> bool {
        match pc {
            NonTSPseudoClass::Link | NonTSPseudoClass::AnyLink => self.is_link(),
            _ => false,
        }
    }

    fn match_pseudo_element(
        &self,
        _pe: &PseudoElement,
        _context: &mut MatchingContext<'_, Self::Impl>,
    ) -> bool {
        false
    }

    fn is_link(&self) -> bool {
        self.dom
            .element_name(self.id)
            .is_some_and(|n| n.as_ref() == "a")
            && self.dom.get_attr(self.id, "href").is_some()
    }

    fn is_html_slot_element(&self) -> bool {
        false
    }

    fn has_id(&self, id: &IdentStr, case_sensitivity: CaseSensitivity) -> bool {
        self.dom
            .element_id(self.id)
            .is_some_and(|elem_id| case_sensitivity.eq(elem_id.as_bytes(), id.0.as_bytes()))
    }

    fn has_class(&self, name: &IdentStr, case_sensitivity: CaseSensitivity) -> bool {
        self.dom
            .element_classes(self.id)
            .iter()
            .any(|c| case_sensitivity.eq(c.as_bytes(), name.0.as_bytes()))
    }

    fn imported_part(&self, _name: &IdentStr) -> Option<IdentStr> {
        None
    }

    fn is_part(&self, _name: &IdentStr) -> bool {
        false
    }

    fn is_empty(&self) -> bool {
        self.dom.children(self.id).all(|child| {
            match self.dom.get(child).map(|n| &n.data) {
                Some(ArenaNodeData::Element { .. }) => false,
                Some(ArenaNodeData::Text(t)) => t.is_empty(),
                _ => true,
            }
        })
    }

    fn is_root(&self) -> bool {
        self.dom
            .get(self.id)
            .and_then(|n| n.parent)
            .and_then(|p| self.dom.get(p))
            .is_some_and(|p| matches!(p.data, ArenaNodeData::Document))
    }

    fn apply_selector_flags(&self, _flags: ElementSelectorFlags) {}

    fn add_element_unique_hashes(&self, _filter: &mut selectors::bloom::BloomFilter) -> bool {
        false
    }

    fn has_custom_state(&self, _name: &IdentStr) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parse_document;

    fn matches(html: &str, tag: &str, selector: &str) -> bool {
        let dom = parse_document(html);
        let id = dom.find_by_tag(tag).unwrap();
        let list = parse_selector_list(selector).expect("selector parses");
        matches_any(ElementRef::new(&dom, id), &list, &mut SelectorCaches::default())
    }

    #[test]
    fn test_class_and_descendant_selectors() {
        let html = r#"<main><section class="hero"><h1 class="title">Hi</h1></section></main>"#;
        assert!(matches(html, "h1", ".hero .title"));
        assert!(matches(html, "h1", "main h1"));
        assert!(matches(html, "h1", "section > h1.title"));
        assert!(!matches(html, "h1", "main > h1"));
    }

    #[test]
    fn test_attribute_selector() {
        let html = r#"<a href="https://wp.org" target="_blank">WP</a>"#;
        assert!(matches(html, "a", "a[target=_blank]"));
        assert!(matches(html, "a", r#"a[href^="https"]"#));
        assert!(!matches(html, "a", "a[rel]"));
    }

    #[test]
    fn test_dynamic_pseudo_classes_parse_but_only_link_matches() {
        let html = r#"<a href="/x">x</a>"#;
        assert!(matches(html, "a", "a:link"));
        assert!(!matches(html, "a", "a:hover"));
        // The list still applies through its static member.
        assert!(matches(html, "a", "a:hover, a"));
    }

    #[test]
    fn test_pseudo_element_selector_is_rejected() {
        assert!(parse_selector_list("p::before").is_none());
    }

    #[test]
    fn test_element_ref_helpers() {
        let dom = parse_document(r#"<p class="x">Hello <b>world</b></p>"#);
        let p = ElementRef::new(&dom, dom.find_by_tag("p").unwrap());

        assert_eq!(p.tag(), "p");
        assert_eq!(p.attr("class"), Some("x"));
        assert_eq!(p.text(), "Hello world");
        assert_eq!(p.children().count(), 1);
        assert_eq!(p.child_node_count(), 2);
        assert_eq!(p.parent().map(|e| e.tag()), Some("body".to_string()));
    }
}
