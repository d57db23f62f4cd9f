//! Arena-allocated DOM.
//!
//! Both phases of the pipeline work on this tree: the capture phase reads a
//! parsed page and deep-clones the selected subtree into a fresh arena, and
//! the conversion phase reads the re-parsed wire string. Nodes are never
//! freed; detaching only unlinks them.

use html5ever::{LocalName, Namespace, QualName, ns};

/// Index of a node in its [`ArenaDom`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ArenaNodeId(u32);

impl ArenaNodeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone)]
pub enum ArenaNodeData {
    Document,
    Element {
        name: QualName,
        attrs: Vec<Attribute>,
        /// Cached `id` attribute for selector matching.
        id: Option<String>,
        /// Cached `class` tokens for selector matching.
        classes: Vec<String>,
    },
    Text(String),
    Comment(String),
    Doctype {
        name: String,
        public_id: String,
        system_id: String,
    },
}

#[derive(Debug, Clone)]
pub struct Attribute {
    pub name: QualName,
    pub value: String,
}

#[derive(Debug)]
pub struct ArenaNode {
    pub data: ArenaNodeData,
    pub parent: Option<ArenaNodeId>,
    pub first_child: Option<ArenaNodeId>,
    pub last_child: Option<ArenaNodeId>,
    pub prev_sibling: Option<ArenaNodeId>,
    pub next_sibling: Option<ArenaNodeId>,
}

impl From<ArenaNodeData> for ArenaNode {
    fn from(data: ArenaNodeData) -> Self {
        Self {
            data,
            parent: None,
            first_child: None,
            last_child: None,
            prev_sibling: None,
            next_sibling: None,
        }
    }
}

#[derive(Debug)]
pub struct ArenaDom {
    nodes: Vec<ArenaNode>,
}

impl Default for ArenaDom {
    fn default() -> Self {
        Self::new()
    }
}

impl ArenaDom {
    /// An empty tree holding only the document node.
    pub fn new() -> Self {
        Self {
            nodes: vec![ArenaNode::from(ArenaNodeData::Document)],
        }
    }

    pub fn document(&self) -> ArenaNodeId {
        ArenaNodeId(0)
    }

    pub fn get(&self, id: ArenaNodeId) -> Option<&ArenaNode> {
        self.nodes.get(id.index())
    }

    fn get_mut(&mut self, id: ArenaNodeId) -> Option<&mut ArenaNode> {
        self.nodes.get_mut(id.index())
    }

    fn push(&mut self, data: ArenaNodeData) -> ArenaNodeId {
        let id = ArenaNodeId(self.nodes.len() as u32);
        self.nodes.push(data.into());
        id
    }

    pub fn create_element(&mut self, name: QualName, attrs: Vec<Attribute>) -> ArenaNodeId {
        let value_of = |wanted: &str| {
            attrs
                .iter()
                .find(|a| a.name.local.as_ref() == wanted)
                .map(|a| a.value.as_str())
        };
        let id = value_of("id").map(str::to_string);
        let classes = value_of("class").map(split_classes).unwrap_or_default();

        self.push(ArenaNodeData::Element {
            name,
            attrs,
            id,
            classes,
        })
    }

    pub fn create_text(&mut self, text: String) -> ArenaNodeId {
        self.push(ArenaNodeData::Text(text))
    }

    pub fn create_comment(&mut self, text: String) -> ArenaNodeId {
        self.push(ArenaNodeData::Comment(text))
    }

    pub fn create_doctype(&mut self, name: String, public_id: String, system_id: String) -> ArenaNodeId {
        self.push(ArenaNodeData::Doctype {
            name,
            public_id,
            system_id,
        })
    }

    /// Link `child` as the last child of `parent`. `child` must be detached.
    pub fn append(&mut self, parent: ArenaNodeId, child: ArenaNodeId) {
        let Some(prev) = self.get(parent).map(|p| p.last_child) else {
            return;
        };
        let Some(node) = self.get_mut(child) else {
            return;
        };
        node.parent = Some(parent);
        node.prev_sibling = prev;
        node.next_sibling = None;

        match prev.and_then(|prev| self.get_mut(prev)) {
            Some(prev) => prev.next_sibling = Some(child),
            None => {
                if let Some(p) = self.get_mut(parent) {
                    p.first_child = Some(child);
                }
            }
        }
        if let Some(p) = self.get_mut(parent) {
            p.last_child = Some(child);
        }
    }

    /// Link `new_node` immediately before `sibling`. `new_node` must be detached.
    pub fn insert_before(&mut self, sibling: ArenaNodeId, new_node: ArenaNodeId) {
        let Some((parent, prev)) = self.get(sibling).map(|s| (s.parent, s.prev_sibling)) else {
            return;
        };
        let Some(node) = self.get_mut(new_node) else {
            return;
        };
        node.parent = parent;
        node.prev_sibling = prev;
        node.next_sibling = Some(sibling);

        if let Some(s) = self.get_mut(sibling) {
            s.prev_sibling = Some(new_node);
        }
        match prev.and_then(|prev| self.get_mut(prev)) {
            Some(prev) => prev.next_sibling = Some(new_node),
            None => {
                if let Some(p) = parent.and_then(|p| self.get_mut(p)) {
                    p.first_child = Some(new_node);
                }
            }
        }
    }

    /// Append text under `parent`, merging into a trailing text node.
    pub fn append_text(&mut self, parent: ArenaNodeId, text: &str) {
        let last = self.get(parent).and_then(|p| p.last_child);
        if let Some(ArenaNode {
            data: ArenaNodeData::Text(existing),
            ..
        }) = last.and_then(|id| self.get_mut(id))
        {
            existing.push_str(text);
            return;
        }

        let node = self.create_text(text.to_string());
        self.append(parent, node);
    }

    /// Unlink a node from its parent and siblings.
    pub fn detach(&mut self, target: ArenaNodeId) {
        let Some(node) = self.get_mut(target) else {
            return;
        };
        let parent = node.parent.take();
        let prev = node.prev_sibling.take();
        let next = node.next_sibling.take();

        match prev.and_then(|id| self.get_mut(id)) {
            Some(prev) => prev.next_sibling = next,
            None => {
                if let Some(p) = parent.and_then(|id| self.get_mut(id)) {
                    p.first_child = next;
                }
            }
        }
        match next.and_then(|id| self.get_mut(id)) {
            Some(next) => next.prev_sibling = prev,
            None => {
                if let Some(p) = parent.and_then(|id| self.get_mut(id)) {
                    p.last_child = prev;
                }
            }
        }
    }

    /// Copy the subtree at `node` in `source` under `parent` in `self`.
    ///
    /// Child order is preserved, so the i-th child of the copy corresponds to
    /// the i-th child of the original. `None` if `node` is not in `source`.
    pub fn deep_clone_from(
        &mut self,
        source: &ArenaDom,
        node: ArenaNodeId,
        parent: ArenaNodeId,
    ) -> Option<ArenaNodeId> {
        let copy = self.push(source.get(node)?.data.clone());
        self.append(parent, copy);
        for child in source.children(node) {
            self.deep_clone_from(source, child, copy);
        }
        Some(copy)
    }

    /// Child nodes of any kind, in order.
    pub fn children(&self, parent: ArenaNodeId) -> impl Iterator<Item = ArenaNodeId> + '_ {
        let first = self.get(parent).and_then(|p| p.first_child);
        std::iter::successors(first, move |&id| self.get(id).and_then(|n| n.next_sibling))
    }

    /// Element children only (the `element.children` view).
    pub fn element_children(&self, parent: ArenaNodeId) -> impl Iterator<Item = ArenaNodeId> + '_ {
        self.children(parent).filter(|&c| self.is_element(c))
    }

    /// All descendants of `root` in document order, excluding `root` itself.
    pub fn descendants(&self, root: ArenaNodeId) -> Vec<ArenaNodeId> {
        fn walk(dom: &ArenaDom, id: ArenaNodeId, out: &mut Vec<ArenaNodeId>) {
            for child in dom.children(id) {
                out.push(child);
                walk(dom, child, out);
            }
        }

        let mut out = Vec::new();
        walk(self, root, &mut out);
        out
    }

    /// First element named `tag` in document order.
    pub fn find_by_tag(&self, tag: &str) -> Option<ArenaNodeId> {
        self.descendants(self.document())
            .into_iter()
            .find(|&id| self.element_name(id).is_some_and(|name| name.as_ref() == tag))
    }

    pub fn body(&self) -> Option<ArenaNodeId> {
        self.find_by_tag("body")
    }
}

/// Element accessors.
impl ArenaDom {
    pub fn element_name(&self, id: ArenaNodeId) -> Option<&LocalName> {
        match &self.get(id)?.data {
            ArenaNodeData::Element { name, .. } => Some(&name.local),
            _ => None,
        }
    }

    pub fn element_namespace(&self, id: ArenaNodeId) -> Option<&Namespace> {
        match &self.get(id)?.data {
            ArenaNodeData::Element { name, .. } => Some(&name.ns),
            _ => None,
        }
    }

    /// Lower-cased tag name, or an empty string for non-elements.
    pub fn tag_name(&self, id: ArenaNodeId) -> String {
        self.element_name(id)
            .map(|n| n.to_ascii_lowercase().to_string())
            .unwrap_or_default()
    }

    pub fn attrs(&self, id: ArenaNodeId) -> &[Attribute] {
        match self.get(id).map(|n| &n.data) {
            Some(ArenaNodeData::Element { attrs, .. }) => attrs,
            _ => &[],
        }
    }

    pub fn get_attr(&self, id: ArenaNodeId, name: &str) -> Option<&str> {
        self.attrs(id)
            .iter()
            .find(|a| a.name.local.as_ref() == name)
            .map(|a| a.value.as_str())
    }

    /// Set an attribute in place, or append it after the existing ones.
    pub fn set_attr(&mut self, id: ArenaNodeId, name: &str, value: &str) {
        let Some(ArenaNodeData::Element {
            attrs,
            id: cached_id,
            classes,
            ..
        }) = self.get_mut(id).map(|n| &mut n.data)
        else {
            return;
        };

        match attrs.iter_mut().find(|a| a.name.local.as_ref() == name) {
            Some(attr) => attr.value = value.to_string(),
            None => attrs.push(Attribute {
                name: QualName::new(None, ns!(), LocalName::from(name)),
                value: value.to_string(),
            }),
        }
        match name {
            "id" => *cached_id = Some(value.to_string()),
            "class" => *classes = split_classes(value),
            _ => {}
        }
    }

    pub fn remove_attr(&mut self, id: ArenaNodeId, name: &str) {
        let Some(ArenaNodeData::Element {
            attrs,
            id: cached_id,
            classes,
            ..
        }) = self.get_mut(id).map(|n| &mut n.data)
        else {
            return;
        };

        attrs.retain(|a| a.name.local.as_ref() != name);
        match name {
            "id" => *cached_id = None,
            "class" => classes.clear(),
            _ => {}
        }
    }

    pub fn element_id(&self, id: ArenaNodeId) -> Option<&str> {
        match &self.get(id)?.data {
            ArenaNodeData::Element { id, .. } => id.as_deref(),
            _ => None,
        }
    }

    pub fn element_classes(&self, id: ArenaNodeId) -> &[String] {
        match self.get(id).map(|n| &n.data) {
            Some(ArenaNodeData::Element { classes, .. }) => classes,
            _ => &[],
        }
    }

    pub fn is_element(&self, id: ArenaNodeId) -> bool {
        self.element_name(id).is_some()
    }

    /// Text of a text node.
    pub fn text_content(&self, id: ArenaNodeId) -> Option<&str> {
        match &self.get(id)?.data {
            ArenaNodeData::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Concatenated descendant text, the `innerText` stand-in.
    pub fn text_of(&self, id: ArenaNodeId) -> String {
        if let Some(text) = self.text_content(id) {
            return text.to_string();
        }
        self.descendants(id)
            .into_iter()
            .filter_map(|d| self.text_content(d))
            .collect()
    }
}

fn split_classes(value: &str) -> Vec<String> {
    value.split_whitespace().map(str::to_string).collect()
}
