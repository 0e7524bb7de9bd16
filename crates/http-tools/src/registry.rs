//! Tool registry built once from the declared tool definitions.
//!
//! The registry owns two views of the same data: the MCP descriptors returned by `tools/list`
//! (in declaration order) and a name-keyed table used to route `tools/call`.

use crate::config::{ToolArgSpec, ToolDefinition};
use crate::error::{HttpToolsError, Result};
use reqwest::Method;
use rmcp::model::{JsonObject, Tool};
use serde_json::{Value, json};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Parsed request template of a callable tool.
#[derive(Debug, Clone)]
pub struct HttpRoute {
    pub method: Method,
    pub url_pattern: String,
}

#[derive(Debug, Clone)]
pub struct RegisteredTool {
    pub definition: ToolDefinition,
    /// `None` when the tool was declared without a request template.
    pub route: Option<HttpRoute>,
}

#[derive(Debug, Default)]
pub struct ToolRegistry {
    descriptors: Vec<Tool>,
    by_name: HashMap<String, RegisteredTool>,
}

impl ToolRegistry {
    /// Build the registry.
    ///
    /// # Errors
    ///
    /// Returns a config error if a tool name is empty or duplicated, if a tool declares the same
    /// argument twice, or if a request template has an invalid HTTP method.
    pub fn build(tools: Vec<ToolDefinition>) -> Result<Self> {
        let mut descriptors = Vec::with_capacity(tools.len());
        let mut by_name = HashMap::with_capacity(tools.len());

        for definition in tools {
            if definition.name.trim().is_empty() {
                return Err(HttpToolsError::Config(
                    "Tool name must not be empty".to_string(),
                ));
            }
            if by_name.contains_key(&definition.name) {
                return Err(HttpToolsError::Config(format!(
                    "Duplicate tool name '{}'",
                    definition.name
                )));
            }
            check_unique_args(&definition)?;

            let route = definition
                .request_template
                .as_ref()
                .map(|t| {
                    Ok::<_, HttpToolsError>(HttpRoute {
                        method: parse_http_method(&definition.name, &t.method)?,
                        url_pattern: t.url.clone(),
                    })
                })
                .transpose()?;

            let mut tool = Tool::new(
                definition.name.clone(),
                definition.description.clone(),
                Arc::new(input_schema(&definition.args)),
            );
            if let Some(route) = &route {
                tool.annotations = Some(crate::semantics::annotations_for_method(&route.method));
            }

            tracing::debug!(
                tool = %definition.name,
                args = definition.args.len(),
                callable = route.is_some(),
                "registered tool"
            );

            descriptors.push(tool);
            by_name.insert(
                definition.name.clone(),
                RegisteredTool { definition, route },
            );
        }

        Ok(Self {
            descriptors,
            by_name,
        })
    }

    /// MCP descriptors in declaration order.
    #[must_use]
    pub fn descriptors(&self) -> &[Tool] {
        &self.descriptors
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&RegisteredTool> {
        self.by_name.get(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

fn check_unique_args(definition: &ToolDefinition) -> Result<()> {
    let mut seen: HashSet<&str> = HashSet::new();
    for arg in &definition.args {
        if !seen.insert(arg.name.as_str()) {
            return Err(HttpToolsError::Config(format!(
                "Duplicate arg '{}' in tool '{}'",
                arg.name, definition.name
            )));
        }
    }
    Ok(())
}

fn parse_http_method(tool_name: &str, method: &str) -> Result<Method> {
    let method_str = method.trim();
    method_str.to_uppercase().parse().map_err(|_| {
        HttpToolsError::Config(format!(
            "Invalid HTTP method '{method_str}' in tool '{tool_name}'"
        ))
    })
}

/// Every argument is a string property; none is marked required.
fn input_schema(args: &[ToolArgSpec]) -> JsonObject {
    let properties: JsonObject = args
        .iter()
        .map(|a| {
            (
                a.name.clone(),
                json!({ "type": "string", "description": a.description }),
            )
        })
        .collect();

    let mut schema = JsonObject::new();
    schema.insert("type".to_string(), json!("object"));
    schema.insert("properties".to_string(), Value::Object(properties));
    schema
}
