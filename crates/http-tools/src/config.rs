//! Startup configuration: the server's static key/value config plus the declared tools.
//!
//! ```yaml
//! server:
//!   name: home-assistant
//!   config:
//!     baseUrl: http://localhost:8123
//! tools:
//!   - name: get_entity_state
//!     description: Read one entity
//!     args:
//!       - name: entity_id
//!         description: Entity id, e.g. light.kitchen
//!     requestTemplate:
//!       method: GET
//!       url: "{{.config.baseUrl}}/api/states/{{.args.entity_id}}"
//! ```

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Static server configuration (`server.config`), substituted into `{{.config.<key>}}`.
pub type ServerConfig = BTreeMap<String, String>;

/// Root of the configuration file.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayConfig {
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub tools: Vec<ToolDefinition>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerSection {
    /// Name advertised to MCP clients during `initialize`.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub config: ServerConfig,
}

/// One declared tool.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub args: Vec<ToolArgSpec>,
    /// Tools without a request template are listed but cannot be called.
    #[serde(default)]
    pub request_template: Option<RequestTemplate>,
}

/// A string argument accepted by a tool.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolArgSpec {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestTemplate {
    pub method: String,
    /// URL pattern containing `{{.args.<key>}}` and `{{.config.<key>}}` placeholders.
    pub url: String,
}

impl GatewayConfig {
    /// Parse a configuration document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not valid YAML or does not match the expected shape
    /// (e.g. a tool without a `name`).
    pub fn from_yaml_str(s: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(s)?)
    }

    /// Read and parse a configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&raw)
    }
}
