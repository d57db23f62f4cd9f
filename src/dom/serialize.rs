//! Markup serialization for arena nodes via html5ever's serializer.

use std::io;

use html5ever::serialize::{Serialize, SerializeOpts, Serializer, TraversalScope, serialize};
use log::warn;

use super::arena::{ArenaDom, ArenaNodeData, ArenaNodeId};

/// A node that html5ever can serialize.
pub struct SerializableNode<'a> {
    dom: &'a ArenaDom,
    id: ArenaNodeId,
}

impl<'a> SerializableNode<'a> {
    pub fn new(dom: &'a ArenaDom, id: ArenaNodeId) -> Self {
        Self { dom, id }
    }

    fn write_node<S: Serializer>(&self, serializer: &mut S, id: ArenaNodeId) -> io::Result<()> {
        let Some(node) = self.dom.get(id) else {
            return Ok(());
        };
        match &node.data {
            ArenaNodeData::Element { name, attrs, .. } => {
                serializer.start_elem(
                    name.clone(),
                    attrs.iter().map(|a| (&a.name, a.value.as_str())),
                )?;
                self.write_children(serializer, id)?;
                serializer.end_elem(name.clone())
            }
            ArenaNodeData::Text(text) => serializer.write_text(text),
            ArenaNodeData::Comment(text) => serializer.write_comment(text),
            ArenaNodeData::Doctype { name, .. } => serializer.write_doctype(name),
            ArenaNodeData::Document => self.write_children(serializer, id),
        }
    }

    fn write_children<S: Serializer>(&self, serializer: &mut S, id: ArenaNodeId) -> io::Result<()> {
        for child in self.dom.children(id) {
            self.write_node(serializer, child)?;
        }
        Ok(())
    }
}

impl Serialize for SerializableNode<'_> {
    fn serialize<S>(&self, serializer: &mut S, traversal_scope: TraversalScope) -> io::Result<()>
    where
        S: Serializer,
    {
        match traversal_scope {
            TraversalScope::IncludeNode => self.write_node(serializer, self.id),
            TraversalScope::ChildrenOnly(_) => self.write_children(serializer, self.id),
        }
    }
}

fn to_markup(dom: &ArenaDom, id: ArenaNodeId, traversal_scope: TraversalScope) -> String {
    let mut bytes = Vec::new();
    let opts = SerializeOpts {
        traversal_scope,
        ..Default::default()
    };
    if let Err(e) = serialize(&mut bytes, &SerializableNode::new(dom, id), opts) {
        warn!("failed to serialize node {id:?}: {e}");
    }
    String::from_utf8(bytes).unwrap_or_default()
}

impl ArenaDom {
    /// Markup of the node including itself (`outerHTML`).
    pub fn outer_html(&self, id: ArenaNodeId) -> String {
        to_markup(self, id, TraversalScope::IncludeNode)
    }

    /// Markup of the node's children (`innerHTML`).
    pub fn inner_html(&self, id: ArenaNodeId) -> String {
        to_markup(self, id, TraversalScope::ChildrenOnly(None))
    }
}

#[cfg(test)]
mod tests {
    use crate::dom::parse_document;

    #[test]
    fn test_outer_html_round_trips_attributes() {
        let dom = parse_document(r#"<div style="color:red"><a href="/x?a=1&amp;b=2">Go</a></div>"#);
        let div = dom.find_by_tag("div").unwrap();

        assert_eq!(
            dom.outer_html(div),
            r#"<div style="color:red"><a href="/x?a=1&amp;b=2">Go</a></div>"#
        );
    }

    #[test]
    fn test_inner_html_escapes_text() {
        let dom = parse_document("<p>1 &lt; 2 <em>yes</em></p>");
        let p = dom.find_by_tag("p").unwrap();

        assert_eq!(dom.inner_html(p), "1 &lt; 2 <em>yes</em>");
    }

    #[test]
    fn test_void_elements_have_no_end_tag() {
        let dom = parse_document(r#"<div><img src="a.png" alt=""><br></div>"#);
        let div = dom.find_by_tag("div").unwrap();

        assert_eq!(dom.inner_html(div), r#"<img src="a.png" alt=""><br>"#);
    }
}
