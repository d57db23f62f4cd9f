use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A block: name, attributes and nested blocks.
///
/// Serializes to the shape `wp.blocks.createBlock` takes:
/// `{"name": ..., "attributes": {...}, "innerBlocks": [...]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    pub name: String,
    pub attributes: Map<String, Value>,
    pub inner_blocks: Vec<Block>,
}

impl Block {
    pub fn new(name: impl Into<String>, attributes: Map<String, Value>, inner_blocks: Vec<Block>) -> Self {
        Self {
            name: name.into(),
            attributes,
            inner_blocks,
        }
    }

    /// Look up a nested attribute by a dotted path such as `style.color.text`.
    pub fn attribute(&self, path: &str) -> Option<&Value> {
        let mut parts = path.split('.');
        let mut current = self.attributes.get(parts.next()?)?;
        for part in parts {
            current = current.as_object()?.get(part)?;
        }
        Some(current)
    }

    /// String value of [`Block::attribute`].
    pub fn attribute_str(&self, path: &str) -> Option<&str> {
        self.attribute(path).and_then(Value::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_serializes_with_inner_blocks_key() {
        let mut attributes = Map::new();
        attributes.insert("content".into(), json!("Hi"));
        let block = Block::new(
            "core/group",
            Map::new(),
            vec![Block::new("core/paragraph", attributes, vec![])],
        );

        assert_eq!(
            serde_json::to_value(&block).unwrap(),
            json!({
                "name": "core/group",
                "attributes": {},
                "innerBlocks": [
                    {"name": "core/paragraph", "attributes": {"content": "Hi"}, "innerBlocks": []}
                ]
            })
        );
    }

    #[test]
    fn test_attribute_path_lookup() {
        let attributes = json!({"style": {"color": {"text": "red"}}, "level": 2});
        let block = Block::new(
            "core/heading",
            attributes.as_object().cloned().unwrap(),
            vec![],
        );

        assert_eq!(block.attribute_str("style.color.text"), Some("red"));
        assert_eq!(block.attribute("level"), Some(&json!(2)));
        assert_eq!(block.attribute("style.color.background"), None);
        assert_eq!(block.attribute("level.x"), None);
    }
}
