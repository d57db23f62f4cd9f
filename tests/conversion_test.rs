//! Block conversion tests.
//!
//! Every case parses a styled wire string and checks the block tree the
//! builder produces for it.

use patterns_everywhere::{Block, ConvertOptions, convert_html};

const WP_LOGO: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" role="img" width="28" height="28" viewBox="0 0 28 28"><path fill="currentColor" d="M13.6 0.9C16.1 0.9 18.6 1.6 20.7 3.0Z"></path></svg>"#;

fn convert(html: &str) -> Option<Block> {
    convert_html(html, &ConvertOptions::default())
}

fn convert_some(html: &str) -> Block {
    convert(html).unwrap_or_else(|| panic!("{html} produced no block"))
}

// ============================================================================
// General
// ============================================================================

#[test]
fn test_empty_div_is_no_block() {
    assert_eq!(convert("<div></div>"), None);
}

#[test]
fn test_heading_inside_div() {
    let block = convert_some("<div><h1>Heading</h1></div>");
    assert_eq!(block.name, "core/group");
    assert_eq!(block.inner_blocks[0].name, "core/heading");
}

#[test]
fn test_display_background_padding_on_group() {
    let block =
        convert_some(r#"<div style="display:flex;background:red;padding-left:10px"><h1>Heading</h1></div>"#);
    assert_eq!(block.attribute_str("layout.type"), Some("flex"));
    assert_eq!(block.attribute_str("style.color.background"), Some("red"));
    assert_eq!(block.attribute_str("style.spacing.padding.left"), Some("10px"));
}

#[test]
fn test_unsupported_style_not_mapped() {
    let block = convert_some(r#"<div style="white-space-collapse:preserve"><h1>Heading</h1></div>"#);
    let style = serde_json::to_string(&block.attributes["style"]).unwrap();
    assert!(!style.contains("white-space-collapse"));
    assert!(!style.contains("preserve"));
}

#[test]
fn test_svg_is_html_block() {
    let block = convert_some(&format!("<div>{WP_LOGO}</div>"));
    let html = &block.inner_blocks[0];
    assert_eq!(html.name, "core/html");
    assert!(html.attribute_str("content").unwrap().starts_with("<svg"));
}

#[test]
fn test_unknown_element_is_paragraph() {
    let block = convert_some("<div><custom>Something</custom></div>");
    assert_eq!(block.inner_blocks[0].name, "core/paragraph");
}

#[test]
fn test_no_empty_group() {
    let block = convert_some("<div><h2>Heading</h2><div></div></div>");
    assert_eq!(block.inner_blocks.len(), 1);
}

#[test]
fn test_list_with_structured_items() {
    let block = convert_some("<div><ul><li><h3>Title</h3><p>Content</p></li></ul></div>");

    let ul = &block.inner_blocks[0];
    assert_eq!(ul.name, "core/group");
    let li = &ul.inner_blocks[0];
    assert_eq!(li.name, "core/group");
    assert_eq!(li.inner_blocks[0].name, "core/heading");
    assert_eq!(li.inner_blocks[1].name, "core/paragraph");
    assert_eq!(li.inner_blocks.len(), 2);
    assert!(li.inner_blocks.iter().all(|b| b.inner_blocks.is_empty()));
}

#[test]
fn test_list_with_text_items() {
    let block = convert_some(
        r#"<div><ul style="line-height:1.75;padding-left:16px"><li>A world of thought-provoking articles.</li></ul></div>"#,
    );

    let ul = &block.inner_blocks[0];
    assert_eq!(ul.attribute_str("style.typography.lineHeight"), Some("1.75"));
    let paragraph = &ul.inner_blocks[0].inner_blocks[0];
    assert_eq!(paragraph.name, "core/paragraph");
    assert_eq!(
        paragraph.attribute_str("content"),
        Some("A world of thought-provoking articles.")
    );
}

#[test]
fn test_anchor_wrapping_blocks_is_paragraph() {
    let block = convert_some(r#"<div><a href="//wp.org"><h3>Title</h3><p>Content</p></a></div>"#);
    let paragraph = &block.inner_blocks[0];
    assert_eq!(paragraph.name, "core/paragraph");
    assert!(paragraph.attribute_str("content").unwrap().starts_with("<a href"));
}

#[test]
fn test_whitespace_carried_verbatim_in_fallback() {
    let block = convert_some("<div><custom>  spaced  </custom></div>");
    assert_eq!(
        block.inner_blocks[0].attribute_str("content"),
        Some("<custom>  spaced  </custom>")
    );
}

// ============================================================================
// Heading
// ============================================================================

#[test]
fn test_heading_alignment() {
    let block = convert_some(r#"<div><h3 style="color:red;text-align:center;">Title</h3></div>"#);
    assert_eq!(block.inner_blocks[0].attribute_str("textAlign"), Some("center"));
}

#[test]
fn test_heading_font_size() {
    let block = convert_some(r#"<div><h3 style="font-size:12px;">Title</h3></div>"#);
    assert_eq!(
        block.inner_blocks[0].attribute_str("style.typography.fontSize"),
        Some("12px")
    );
}

// ============================================================================
// Button
// ============================================================================

#[test]
fn test_button_like_anchors() {
    let block = convert_some(r#"<div><a class="button">Submit</a><a class="btn">Submit</a><a>Submit</a></div>"#);
    let names: Vec<_> = block.inner_blocks.iter().map(|b| b.name.as_str()).collect();
    assert_eq!(names, ["core/buttons", "core/buttons", "core/paragraph"]);

    let button = &block.inner_blocks[0].inner_blocks[0];
    assert_eq!(button.name, "core/button");
    assert_eq!(button.attribute_str("text"), Some("Submit"));
    assert_eq!(block.inner_blocks[1].inner_blocks[0].name, "core/button");
}

#[test]
fn test_button_wrapped_by_paragraph() {
    let block = convert_some(r#"<div><p><a class="button">Submit</a></p></div>"#);
    assert_eq!(block.inner_blocks[0].name, "core/buttons");
    assert_eq!(block.inner_blocks[0].inner_blocks[0].name, "core/button");
}

#[test]
fn test_button_href() {
    let block = convert_some(r#"<div><a href="//wp.org" class="button">Submit</a></div>"#);
    let button = &block.inner_blocks[0].inner_blocks[0];
    assert_eq!(button.name, "core/button");
    assert_eq!(button.attribute_str("url"), Some("//wp.org"));
}

// ============================================================================
// Pre/Code
// ============================================================================

#[test]
fn test_code_block() {
    let block = convert_some(
        "<div><pre><code>registerBlockType( 'your-first-block/hello-world', {
    edit: function () {
        return &lt;p&gt;Hello world (from the editor)&lt;/p&gt;;
    },
} );</code></pre></div>",
    );
    let code = &block.inner_blocks[0];
    assert_eq!(code.name, "core/code");
    assert!(
        code.attribute_str("content")
            .unwrap()
            .contains("return <p>Hello world (from the editor)</p>;")
    );
}

// ============================================================================
// Figure/Image
// ============================================================================

#[test]
fn test_image_block() {
    let block = convert_some(r#"<div><img src="//wp.org/test.png" alt="alt-text"></div>"#);
    let image = &block.inner_blocks[0];
    assert_eq!(image.name, "core/image");
    assert_eq!(image.attribute_str("url"), Some("//wp.org/test.png"));
    assert_eq!(image.attribute_str("alt"), Some("alt-text"));
}

#[test]
fn test_figure_is_group() {
    let block = convert_some(r#"<div><figure><img src="//wp.org/test.png"></figure></div>"#);
    assert_eq!(block.inner_blocks[0].name, "core/group");
}

#[test]
fn test_image_border_styles() {
    let block = convert_some(
        r#"<div><img style="border-right-width:1px;border-right-color:red;" src="//wp.org/test.png"></div>"#,
    );
    let image = &block.inner_blocks[0];
    assert_eq!(image.attribute_str("style.border.right.width"), Some("1px"));
    assert_eq!(image.attribute_str("style.border.right.color"), Some("red"));
}

#[test]
fn test_image_border_color_without_width() {
    let block = convert_some(r#"<div><img style="border-right-color:red;" src="//wp.org/test.png"></div>"#);
    assert_eq!(block.inner_blocks[0].attribute("style.border.right.color"), None);
}

// ============================================================================
// Delegated blocks
// ============================================================================

#[test]
fn test_quote_and_separator() {
    let block = convert_some("<section><blockquote><p>Said</p></blockquote><hr></section>");
    let names: Vec<_> = block.inner_blocks.iter().map(|b| b.name.as_str()).collect();
    assert_eq!(names, ["core/quote", "core/separator"]);
    assert_eq!(
        block.inner_blocks[0].inner_blocks[0].attribute_str("content"),
        Some("Said")
    );
}

#[test]
fn test_paragraph_alignment_from_style() {
    let block = convert_some(r#"<div><p style="text-align:right;color:blue">Text</p></div>"#);
    let paragraph = &block.inner_blocks[0];
    assert_eq!(paragraph.attribute_str("align"), Some("right"));
    assert_eq!(paragraph.attribute_str("style.elements.link.color.text"), Some("blue"));
    assert_eq!(paragraph.attribute_str("content"), Some("Text"));
}
