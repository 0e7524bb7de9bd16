//! Tool result content.
//!
//! Forwarded calls only ever produce [`ToolContent::Text`]; the other variants mirror the MCP
//! content kinds so results can be converted losslessly at the protocol boundary.

use rmcp::model::Content;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolContent {
    Text(String),
    Image { data: String, mime_type: String },
    EmbeddedResource { uri: String, text: String },
}

impl ToolContent {
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(t) => Some(t),
            _ => None,
        }
    }
}

impl From<ToolContent> for Content {
    fn from(value: ToolContent) -> Self {
        match value {
            ToolContent::Text(text) => Content::text(text),
            ToolContent::Image { data, mime_type } => Content::image(data, mime_type),
            ToolContent::EmbeddedResource { uri, text } => Content::embedded_text(uri, text),
        }
    }
}
