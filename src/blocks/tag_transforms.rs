//! Tag-specific transforms, tried on every node before the generic walk.

use serde_json::{Map, Value};

use super::attributes::element_attributes;
use super::builder::BlockBuilder;
use super::runtime::BlockRuntime;
use super::Block;
use crate::dom::ElementRef;

/// Returns `None` to let the node go through the generic walk.
pub(super) type TagTransform<R> = fn(&BlockBuilder<'_, R>, ElementRef<'_>) -> Option<Block>;

/// The transform for `tag`, if it has one.
pub(super) fn for_tag<R: BlockRuntime + ?Sized>(tag: &str) -> Option<TagTransform<R>> {
    let transform: TagTransform<R> = match tag {
        "a" => anchor::<R>,
        "svg" => svg::<R>,
        "pre" | "code" => code::<R>,
        "img" => image::<R>,
        "p" => paragraph_with_anchor::<R>,
        _ => return None,
    };
    Some(transform)
}

fn string(value: &str) -> Value {
    Value::String(value.to_string())
}

/// Button-like anchors become a buttons block; any other anchor is kept as
/// markup in a paragraph.
fn anchor<R: BlockRuntime + ?Sized>(builder: &BlockBuilder<'_, R>, node: ElementRef<'_>) -> Option<Block> {
    let runtime = builder.runtime();
    let classes = node.attr("class").unwrap_or_default().to_lowercase();
    let is_button = builder
        .options()
        .button_classes
        .iter()
        .any(|class| classes.contains(&class.to_lowercase()));

    if !is_button {
        let mut attributes = Map::new();
        attributes.insert("content".into(), string(&node.outer_html()));
        return Some(runtime.create_block("core/paragraph", attributes, vec![]));
    }

    let mut attributes = element_attributes(node);
    attributes.insert("text".into(), string(&node.text()));
    attributes.insert("url".into(), string(node.attr("href").unwrap_or_default()));
    let button = runtime.create_block("core/button", attributes, vec![]);
    Some(runtime.create_block("core/buttons", Map::new(), vec![button]))
}

fn svg<R: BlockRuntime + ?Sized>(builder: &BlockBuilder<'_, R>, node: ElementRef<'_>) -> Option<Block> {
    let mut attributes = Map::new();
    attributes.insert("content".into(), string(&node.outer_html()));
    Some(builder.runtime().create_block("core/html", attributes, vec![]))
}

/// Plain text, so entities are not escaped twice.
fn code<R: BlockRuntime + ?Sized>(builder: &BlockBuilder<'_, R>, node: ElementRef<'_>) -> Option<Block> {
    let mut attributes = element_attributes(node);
    attributes.insert("content".into(), string(&node.text()));
    Some(builder.runtime().create_block("core/code", attributes, vec![]))
}

fn image<R: BlockRuntime + ?Sized>(builder: &BlockBuilder<'_, R>, node: ElementRef<'_>) -> Option<Block> {
    let mut attributes = element_attributes(node);
    attributes.insert("url".into(), string(node.attr("src").unwrap_or_default()));
    attributes.insert("alt".into(), string(node.attr("alt").unwrap_or_default()));
    Some(builder.runtime().create_block("core/image", attributes, vec![]))
}

/// A paragraph whose only child node is an anchor is the anchor.
fn paragraph_with_anchor<R: BlockRuntime + ?Sized>(
    builder: &BlockBuilder<'_, R>,
    node: ElementRef<'_>,
) -> Option<Block> {
    if node.child_node_count() != 1 {
        return None;
    }
    let child = node.children().next().filter(|child| child.tag() == "a")?;
    anchor(builder, child)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::{ConvertOptions, CoreBlocks};
    use crate::dom::parse_document;

    fn run(html: &str, tag: &str) -> Option<Block> {
        let dom = parse_document(html);
        let node = ElementRef::new(&dom, dom.find_by_tag(tag).unwrap());
        let runtime = CoreBlocks::new();
        let options = ConvertOptions::default();
        let builder = BlockBuilder::new(&runtime, &options);
        for_tag::<CoreBlocks>(tag).and_then(|transform| transform(&builder, node))
    }

    #[test]
    fn test_button_classes_substring_case_insensitive() {
        let block = run(r#"<a class="Wp-Block-Button__link" href="/go">Go</a>"#, "a").unwrap();
        assert_eq!(block.name, "core/buttons");
        let button = &block.inner_blocks[0];
        assert_eq!(button.name, "core/button");
        assert_eq!(button.attribute_str("text"), Some("Go"));
        assert_eq!(button.attribute_str("url"), Some("/go"));
    }

    #[test]
    fn test_plain_anchor_kept_as_markup() {
        let block = run(r#"<a href="/x">Link</a>"#, "a").unwrap();
        assert_eq!(block.name, "core/paragraph");
        assert_eq!(block.attribute_str("content"), Some(r#"<a href="/x">Link</a>"#));
    }

    #[test]
    fn test_button_carries_mapped_style() {
        let block = run(r#"<a class="btn" style="color:red">Go</a>"#, "a").unwrap();
        assert_eq!(
            block.inner_blocks[0].attribute_str("style.color.text"),
            Some("red")
        );
    }

    #[test]
    fn test_code_uses_text() {
        let block = run("<pre>if a &lt; b {}</pre>", "pre").unwrap();
        assert_eq!(block.name, "core/code");
        assert_eq!(block.attribute_str("content"), Some("if a < b {}"));
    }

    #[test]
    fn test_image_url_and_alt() {
        let block = run(r#"<img src="//wp.org/test.png" alt="alt-text">"#, "img").unwrap();
        assert_eq!(block.attribute_str("url"), Some("//wp.org/test.png"));
        assert_eq!(block.attribute_str("alt"), Some("alt-text"));

        let block = run(r#"<img src="a.png">"#, "img").unwrap();
        assert_eq!(block.attribute_str("alt"), Some(""));
    }

    #[test]
    fn test_paragraph_only_with_sole_anchor() {
        assert_eq!(
            run(r#"<p><a class="button">Submit</a></p>"#, "p").unwrap().name,
            "core/buttons"
        );
        assert!(run(r#"<p>Go <a class="button">Submit</a></p>"#, "p").is_none());
        assert!(run("<p><em>x</em></p>", "p").is_none());
    }

    #[test]
    fn test_other_tags_have_no_transform() {
        assert!(for_tag::<CoreBlocks>("div").is_none());
        assert!(for_tag::<CoreBlocks>("h1").is_none());
    }
}
