//! Styled clone of a captured subtree.

use log::{debug, trace};
use url::Url;

use super::CaptureOptions;
use crate::css::RuleIndex;
use crate::dom::{ArenaDom, ArenaNodeId, ElementRef};
use crate::style::{ComputedStyleSource, resolve};

/// Root tags that are sent as is; anything else gets a `<div>` wrapper.
const DIV_LIKE: &[&str] = &[
    "div", "section", "main", "header", "footer", "article", "nav", "aside",
];

/// Non-content elements removed from the clone.
const STRIPPED: &[&str] = &["script", "style"];

/// A deep clone of a subtree whose `style` attributes carry resolved styles.
#[derive(Debug)]
pub struct StyledSubtree {
    dom: ArenaDom,
    root: ArenaNodeId,
}

impl StyledSubtree {
    pub fn dom(&self) -> &ArenaDom {
        &self.dom
    }

    pub fn root(&self) -> ElementRef<'_> {
        ElementRef::new(&self.dom, self.root)
    }

    /// The wire string: outer markup of the clone, wrapped in a `<div>`
    /// unless the clone is already a div-like container.
    pub fn to_html(&self) -> String {
        let markup = self.dom.outer_html(self.root);
        let tag = self.dom.tag_name(self.root);
        if DIV_LIKE.contains(&tag.as_str()) {
            markup
        } else {
            format!("<div>{markup}</div>")
        }
    }
}

/// Clone `root` and write each element's resolved style onto the clone.
///
/// The original tree is not modified. `rules` must index the stylesheets of
/// the document `root` belongs to.
pub fn materialize<S>(
    root: ElementRef<'_>,
    rules: &RuleIndex,
    styles: &S,
    options: &CaptureOptions,
) -> StyledSubtree
where
    S: ComputedStyleSource + ?Sized,
{
    let mut dom = ArenaDom::new();
    let document = dom.document();
    let clone_root = dom
        .deep_clone_from(root.dom, root.id, document)
        .unwrap_or(document);

    let mut walker = Walker {
        rules,
        styles,
        options,
        clone: &mut dom,
    };
    walker.visit(root, clone_root);

    strip_non_content(&mut dom, clone_root);
    StyledSubtree {
        dom,
        root: clone_root,
    }
}

struct Walker<'a, S: ?Sized> {
    rules: &'a RuleIndex,
    styles: &'a S,
    options: &'a CaptureOptions,
    clone: &'a mut ArenaDom,
}

impl<S: ComputedStyleSource + ?Sized> Walker<'_, S> {
    /// Style `copy` from `original`, then recurse over element children by index.
    fn visit(&mut self, original: ElementRef<'_>, copy: ArenaNodeId) {
        let matched = self.rules.matched_rules(original);
        let computed = self.styles.computed_style(original);
        let resolved = resolve(original, &computed, &matched, self.options.fallback);

        if resolved.is_empty() {
            self.clone.remove_attr(copy, "style");
        } else {
            self.clone
                .set_attr(copy, "style", &resolved.to_style_string());
        }
        trace!("<{}> resolved {} properties", original.tag(), resolved.len());

        if let Some(base) = &self.options.base_url {
            match original.tag().as_str() {
                "img" => absolutize(self.clone, copy, "src", base),
                "a" => absolutize(self.clone, copy, "href", base),
                _ => {}
            }
        }

        let copies: Vec<_> = self.clone.element_children(copy).collect();
        for (child, child_copy) in original.children().zip(copies) {
            self.visit(child, child_copy);
        }
    }
}

fn absolutize(dom: &mut ArenaDom, id: ArenaNodeId, attr: &str, base: &Url) {
    let Some(value) = dom.get_attr(id, attr).map(str::to_string) else {
        return;
    };
    match base.join(value.trim()) {
        Ok(url) => dom.set_attr(id, attr, url.as_str()),
        Err(e) => debug!("leaving {attr}=\"{value}\" as is: {e}"),
    }
}

fn strip_non_content(dom: &mut ArenaDom, root: ArenaNodeId) {
    let doomed: Vec<_> = dom
        .descendants(root)
        .into_iter()
        .filter(|&id| dom.is_element(id) && STRIPPED.contains(&dom.tag_name(id).as_str()))
        .collect();
    for id in doomed {
        dom.detach(id);
    }
}
