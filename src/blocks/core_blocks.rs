//! Built-in raw transforms for standard HTML.

use log::trace;
use serde_json::{Map, Value, json};

use super::runtime::{BlockRuntime, RawTransform, TransformContext};
use super::Block;
use crate::dom::ElementRef;

const HEADINGS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6"];

/// Offline [`BlockRuntime`] with transforms for the common core blocks.
pub struct CoreBlocks {
    transforms: Vec<Box<dyn RawTransform>>,
}

impl CoreBlocks {
    pub fn new() -> Self {
        Self {
            transforms: vec![
                Box::new(Heading),
                Box::new(Paragraph),
                Box::new(Quote),
                Box::new(Separator),
                Box::new(Media {
                    block_name: "core/video",
                    tags: &["video"],
                }),
                Box::new(Media {
                    block_name: "core/audio",
                    tags: &["audio"],
                }),
            ],
        }
    }

    /// Add a transform; it competes with the built-ins by priority.
    pub fn register(&mut self, transform: Box<dyn RawTransform>) {
        self.transforms.push(transform);
    }
}

impl Default for CoreBlocks {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockRuntime for CoreBlocks {
    fn find_raw_transform(&self, node: ElementRef<'_>, exclude: &[&str]) -> Option<&dyn RawTransform> {
        let found = self
            .transforms
            .iter()
            .filter(|t| !t.tags().iter().any(|tag| exclude.contains(tag)))
            .filter(|t| t.is_match(node))
            .min_by_key(|t| t.priority())
            .map(|t| &**t);
        if let Some(transform) = found {
            trace!("<{}> -> {}", node.tag(), transform.block_name());
        }
        found
    }
}

fn content(node: ElementRef<'_>) -> Map<String, Value> {
    let mut attributes = Map::new();
    attributes.insert("content".into(), Value::String(node.inner_html()));
    attributes
}

struct Heading;

impl RawTransform for Heading {
    fn block_name(&self) -> &str {
        "core/heading"
    }

    fn tags(&self) -> &[&'static str] {
        HEADINGS
    }

    fn transform(&self, node: ElementRef<'_>, blocks: &TransformContext<'_>) -> Block {
        let mut own = content(node);
        let level = node.tag()[1..].parse::<u8>().unwrap_or(2);
        own.insert("level".into(), json!(level));
        blocks.create_block(self.block_name(), own, vec![])
    }
}

struct Paragraph;

impl RawTransform for Paragraph {
    fn block_name(&self) -> &str {
        "core/paragraph"
    }

    fn tags(&self) -> &[&'static str] {
        &["p"]
    }

    fn priority(&self) -> i32 {
        20
    }

    fn transform(&self, node: ElementRef<'_>, blocks: &TransformContext<'_>) -> Block {
        blocks.create_block(self.block_name(), content(node), vec![])
    }
}

/// `blockquote` with one paragraph per `p` child, or one for the whole body.
struct Quote;

impl RawTransform for Quote {
    fn block_name(&self) -> &str {
        "core/quote"
    }

    fn tags(&self) -> &[&'static str] {
        &["blockquote"]
    }

    fn transform(&self, node: ElementRef<'_>, blocks: &TransformContext<'_>) -> Block {
        let paragraphs: Vec<_> = node
            .children()
            .filter(|child| child.tag() == "p")
            .map(|p| blocks.create_block("core/paragraph", content(p), vec![]))
            .collect();
        let inner = if paragraphs.is_empty() {
            vec![blocks.create_block("core/paragraph", content(node), vec![])]
        } else {
            paragraphs
        };

        blocks.create_block(self.block_name(), Map::new(), inner)
    }
}

struct Separator;

impl RawTransform for Separator {
    fn block_name(&self) -> &str {
        "core/separator"
    }

    fn tags(&self) -> &[&'static str] {
        &["hr"]
    }

    fn transform(&self, _node: ElementRef<'_>, blocks: &TransformContext<'_>) -> Block {
        blocks.create_block(self.block_name(), Map::new(), vec![])
    }
}

/// `video`/`audio` carrying their own `src`.
struct Media {
    block_name: &'static str,
    tags: &'static [&'static str],
}

impl RawTransform for Media {
    fn block_name(&self) -> &str {
        self.block_name
    }

    fn tags(&self) -> &[&'static str] {
        self.tags
    }

    fn is_match(&self, node: ElementRef<'_>) -> bool {
        self.tags.contains(&node.tag().as_str()) && node.attr("src").is_some()
    }

    fn transform(&self, node: ElementRef<'_>, blocks: &TransformContext<'_>) -> Block {
        let mut own = Map::new();
        if let Some(src) = node.attr("src") {
            own.insert("src".into(), Value::String(src.to_string()));
        }
        blocks.create_block(self.block_name, own, vec![])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::runtime::AttributeOverride;
    use crate::dom::parse_document;

    fn plain(name: &str, attributes: Map<String, Value>, inner: Vec<Block>) -> Block {
        Block::new(name, attributes, inner)
    }

    fn convert(html: &str, tag: &str, exclude: &[&str]) -> Option<Block> {
        let dom = parse_document(html);
        let node = ElementRef::new(&dom, dom.find_by_tag(tag).unwrap());
        let runtime = CoreBlocks::new();
        let blocks = TransformContext::new(AttributeOverride::default(), &plain);
        runtime
            .find_raw_transform(node, exclude)
            .map(|t| t.transform(node, &blocks))
    }

    #[test]
    fn test_heading_level_and_content() {
        let block = convert("<h3>Title <em>here</em></h3>", "h3", &[]).unwrap();
        assert_eq!(block.name, "core/heading");
        assert_eq!(block.attribute("level"), Some(&json!(3)));
        assert_eq!(block.attribute_str("content"), Some("Title <em>here</em>"));
    }

    #[test]
    fn test_quote_paragraphs() {
        let block = convert("<blockquote><p>a</p><p>b</p></blockquote>", "blockquote", &[]).unwrap();
        assert_eq!(block.name, "core/quote");
        let contents: Vec<_> = block
            .inner_blocks
            .iter()
            .map(|b| b.attribute_str("content").unwrap())
            .collect();
        assert_eq!(contents, ["a", "b"]);

        let block = convert("<blockquote>bare</blockquote>", "blockquote", &[]).unwrap();
        assert_eq!(block.inner_blocks[0].attribute_str("content"), Some("bare"));
    }

    #[test]
    fn test_media_needs_src() {
        let block = convert(r#"<video src="a.mp4"></video>"#, "video", &[]).unwrap();
        assert_eq!(block.name, "core/video");
        assert_eq!(block.attribute_str("src"), Some("a.mp4"));
        assert!(convert("<audio></audio>", "audio", &[]).is_none());
    }

    #[test]
    fn test_excluded_and_unknown_tags() {
        assert!(convert("<hr>", "hr", &["hr"]).is_none());
        assert!(convert("<custom>x</custom>", "custom", &[]).is_none());
        assert_eq!(convert("<hr>", "hr", &["div"]).unwrap().name, "core/separator");
    }

    #[test]
    fn test_override_reaches_created_block() {
        let dom = parse_document("<p>x</p>");
        let node = ElementRef::new(&dom, dom.find_by_tag("p").unwrap());
        let runtime = CoreBlocks::new();
        let transform = runtime.find_raw_transform(node, &[]).unwrap();

        let mut attributes = Map::new();
        attributes.insert("align".into(), json!("right"));
        let over = AttributeOverride::new("core/paragraph", attributes);
        let block = transform.transform(node, &TransformContext::new(over, &plain));
        assert_eq!(block.attribute_str("align"), Some("right"));
        assert_eq!(block.attribute_str("content"), Some("x"));
    }

    #[test]
    fn test_lowest_priority_wins() {
        struct Loud;
        impl RawTransform for Loud {
            fn block_name(&self) -> &str {
                "test/loud"
            }
            fn tags(&self) -> &[&'static str] {
                &["p"]
            }
            fn priority(&self) -> i32 {
                1
            }
            fn transform(&self, _: ElementRef<'_>, blocks: &TransformContext<'_>) -> Block {
                blocks.create_block(self.block_name(), Map::new(), vec![])
            }
        }

        let mut runtime = CoreBlocks::new();
        runtime.register(Box::new(Loud));
        let dom = parse_document("<p>x</p>");
        let node = ElementRef::new(&dom, dom.find_by_tag("p").unwrap());
        assert_eq!(
            runtime.find_raw_transform(node, &[]).unwrap().block_name(),
            "test/loud"
        );
    }
}
