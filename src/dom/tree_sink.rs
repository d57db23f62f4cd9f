//! html5ever `TreeSink` that builds an [`ArenaDom`].
//!
//! Node ids are the tree builder's handles. The sink methods take `&self`,
//! so the arena sits in a `RefCell` until parsing finishes.

use std::borrow::Cow;
use std::cell::RefCell;

use html5ever::tendril::StrTendril;
use html5ever::tree_builder::{ElementFlags, NodeOrText, QuirksMode, TreeSink};
use html5ever::{Attribute as ParsedAttribute, QualName, local_name, ns};
use log::trace;

use super::arena::{ArenaDom, ArenaNodeData, ArenaNodeId, Attribute};

static NO_NAME: QualName = QualName {
    prefix: None,
    ns: ns!(),
    local: local_name!(""),
};

pub struct ArenaSink {
    dom: RefCell<ArenaDom>,
}

impl ArenaSink {
    pub fn new() -> Self {
        Self {
            dom: RefCell::new(ArenaDom::new()),
        }
    }

    pub fn into_dom(self) -> ArenaDom {
        self.dom.into_inner()
    }

    /// Turn a builder payload into a node id, creating text nodes as needed.
    fn node_for(dom: &mut ArenaDom, child: NodeOrText<ArenaNodeId>) -> ArenaNodeId {
        match child {
            NodeOrText::AppendNode(id) => id,
            NodeOrText::AppendText(text) => dom.create_text(text.to_string()),
        }
    }
}

fn convert_attrs(attrs: Vec<ParsedAttribute>) -> Vec<Attribute> {
    attrs
        .into_iter()
        .map(|attr| Attribute {
            name: attr.name,
            value: attr.value.to_string(),
        })
        .collect()
}

impl TreeSink for ArenaSink {
    type Handle = ArenaNodeId;
    type Output = Self;
    type ElemName<'a>
        = &'a QualName
    where
        Self: 'a;

    fn finish(self) -> Self {
        self
    }

    fn parse_error(&self, msg: Cow<'static, str>) {
        trace!("html parse error: {msg}");
    }

    fn get_document(&self) -> ArenaNodeId {
        self.dom.borrow().document()
    }

    fn elem_name<'a>(&'a self, target: &'a ArenaNodeId) -> &'a QualName {
        let dom = self.dom.borrow();
        let Some(ArenaNodeData::Element { name, .. }) = dom.get(*target).map(|n| &n.data) else {
            return &NO_NAME;
        };
        // SAFETY: nodes are never removed from the arena and an element's
        // name is never rewritten, so the name lives as long as the sink.
        unsafe { std::mem::transmute::<&QualName, &'a QualName>(name) }
    }

    fn create_element(&self, name: QualName, attrs: Vec<ParsedAttribute>, _: ElementFlags) -> ArenaNodeId {
        self.dom
            .borrow_mut()
            .create_element(name, convert_attrs(attrs))
    }

    fn create_comment(&self, text: StrTendril) -> ArenaNodeId {
        self.dom.borrow_mut().create_comment(text.to_string())
    }

    /// Processing instructions do not occur in HTML; keep an empty comment.
    fn create_pi(&self, _: StrTendril, _: StrTendril) -> ArenaNodeId {
        self.dom.borrow_mut().create_comment(String::new())
    }

    fn append(&self, parent: &ArenaNodeId, child: NodeOrText<ArenaNodeId>) {
        let mut dom = self.dom.borrow_mut();
        match child {
            NodeOrText::AppendText(text) => dom.append_text(*parent, &text),
            node => {
                let id = Self::node_for(&mut dom, node);
                dom.append(*parent, id);
            }
        }
    }

    fn append_based_on_parent_node(
        &self,
        element: &ArenaNodeId,
        prev_element: &ArenaNodeId,
        child: NodeOrText<ArenaNodeId>,
    ) {
        let has_parent = self
            .dom
            .borrow()
            .get(*element)
            .is_some_and(|n| n.parent.is_some());
        if has_parent {
            self.append_before_sibling(element, child);
        } else {
            self.append(prev_element, child);
        }
    }

    fn append_doctype_to_document(&self, name: StrTendril, public_id: StrTendril, system_id: StrTendril) {
        let mut dom = self.dom.borrow_mut();
        let doctype = dom.create_doctype(name.to_string(), public_id.to_string(), system_id.to_string());
        let document = dom.document();
        dom.append(document, doctype);
    }

    fn get_template_contents(&self, target: &ArenaNodeId) -> ArenaNodeId {
        *target
    }

    fn same_node(&self, x: &ArenaNodeId, y: &ArenaNodeId) -> bool {
        x == y
    }

    fn set_quirks_mode(&self, mode: QuirksMode) {
        trace!("quirks mode: {mode:?}");
    }

    fn append_before_sibling(&self, sibling: &ArenaNodeId, new_node: NodeOrText<ArenaNodeId>) {
        let mut dom = self.dom.borrow_mut();
        let id = Self::node_for(&mut dom, new_node);
        dom.insert_before(*sibling, id);
    }

    fn add_attrs_if_missing(&self, target: &ArenaNodeId, attrs: Vec<ParsedAttribute>) {
        let mut dom = self.dom.borrow_mut();
        for attr in convert_attrs(attrs) {
            let name = attr.name.local.to_string();
            if dom.get_attr(*target, &name).is_none() {
                dom.set_attr(*target, &name, &attr.value);
            }
        }
    }

    fn remove_from_parent(&self, target: &ArenaNodeId) {
        self.dom.borrow_mut().detach(*target);
    }

    fn reparent_children(&self, node: &ArenaNodeId, new_parent: &ArenaNodeId) {
        let mut dom = self.dom.borrow_mut();
        let children: Vec<_> = dom.children(*node).collect();
        for child in children {
            dom.detach(child);
            dom.append(*new_parent, child);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::dom::parse_document;

    #[test]
    fn test_wire_string_root_is_first_body_child() {
        let dom = parse_document(r#"<section class="hero"><h1>Hi</h1></section>"#);

        let body = dom.body().unwrap();
        let section = dom.element_children(body).next().unwrap();
        assert_eq!(dom.tag_name(section), "section");
        assert_eq!(dom.get_attr(section, "class"), Some("hero"));
        assert_eq!(dom.text_of(section), "Hi");
    }

    #[test]
    fn test_button_classes_are_split() {
        let dom = parse_document(r#"<a id="cta" class="btn  btn-lg" href="/join">Join</a>"#);

        let a = dom.find_by_tag("a").unwrap();
        assert_eq!(dom.element_id(a), Some("cta"));
        assert_eq!(dom.element_classes(a), ["btn", "btn-lg"]);
    }

    #[test]
    fn test_paragraph_closed_before_div() {
        let dom = parse_document("<p>One<div>Two</div>");

        let body = dom.body().unwrap();
        let tags: Vec<_> = dom.element_children(body).map(|c| dom.tag_name(c)).collect();
        assert_eq!(tags, ["p", "div"]);
    }

    #[test]
    fn test_table_text_is_foster_parented() {
        let dom = parse_document("<div><table>stray<tr><td>cell</td></tr></table></div>");

        let div = dom.find_by_tag("div").unwrap();
        let first = dom.children(div).next().unwrap();
        assert_eq!(dom.text_content(first), Some("stray"));
    }
}
