// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Tool registry and handler trait.
//!
//! - [`ToolHandler`] trait that all tools implement
//! - [`ToolRegistry`] for looking up and dispatching tool calls
//! - [`ToolOutput`] for returning results from tool execution

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info_span, Instrument};

use crate::error::ToolError;
#[cfg(feature = "telemetry")]
use crate::telemetry::metrics::GLOBAL_METRICS;
use crate::types::ToolDefinition;

/// Output from executing a tool.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    content: String,
    success: bool,
}

impl ToolOutput {
    pub fn new(content: impl Into<String>, success: bool) -> Self {
        Self {
            content: content.into(),
            success,
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self::new(content, true)
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self::new(content, false)
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn is_success(&self) -> bool {
        self.success
    }
}

impl From<ToolError> for ToolOutput {
    fn from(err: ToolError) -> Self {
        Self::error(err.to_string())
    }
}

/// Trait that all tool handlers must implement.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    /// Get the tool definition (name, description, input schema).
    fn definition(&self) -> ToolDefinition;

    /// Execute the tool with the given input parameters.
    async fn execute(&self, input: serde_json::Value) -> Result<ToolOutput, ToolError>;
}

/// Registry of available tools, maps names to handlers.
#[derive(Default)]
pub struct ToolRegistry {
    handlers: BTreeMap<String, Arc<dyn ToolHandler>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn ToolHandler>> {
        self.handlers.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Dispatch a tool call and return the result.
    ///
    /// Handler failures come back as an error [`DispatchResult`]; only an
    /// unknown tool name is an `Err`.
    pub async fn dispatch(
        &self,
        tool_name: &str,
        input: serde_json::Value,
    ) -> Result<DispatchResult, ToolError> {
        let handler = self
            .get(tool_name)
            .ok_or_else(|| ToolError::NotFound(tool_name.to_string()))?;

        debug!(tool = %tool_name, "Executing tool");
        let start = Instant::now();

        let result = handler
            .execute(input)
            .instrument(info_span!("tool_execute", tool = %tool_name))
            .await;

        let duration = start.elapsed();

        #[cfg(feature = "telemetry")]
        GLOBAL_METRICS.record_tool(tool_name, duration, result.is_ok());

        let (output, is_error) = match result {
            Ok(output) => {
                debug!(
                    tool = %tool_name,
                    duration_ms = duration.as_secs_f64() * 1000.0,
                    "Tool execution succeeded"
                );
                (output, false)
            }
            Err(err) => {
                debug!(
                    tool = %tool_name,
                    duration_ms = duration.as_secs_f64() * 1000.0,
                    error = %err,
                    "Tool execution failed"
                );
                (ToolOutput::from(err), true)
            }
        };

        Ok(DispatchResult {
            tool_name: tool_name.to_string(),
            output,
            duration,
            is_error,
        })
    }
}

/// Result of dispatching a tool call.
#[derive(Debug)]
pub struct DispatchResult {
    pub tool_name: String,
    pub output: ToolOutput,
    pub duration: Duration,
    /// The handler returned an error; `output` carries its message.
    pub is_error: bool,
}

/// Builder for constructing a ToolRegistry.
#[derive(Default)]
pub struct ToolRegistryBuilder {
    handlers: BTreeMap<String, Arc<dyn ToolHandler>>,
}

impl ToolRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool handler under its definition's name.
    pub fn register<T: ToolHandler + 'static>(&mut self, handler: T) -> &mut Self {
        self.register_arc(Arc::new(handler))
    }

    pub fn register_arc(&mut self, handler: Arc<dyn ToolHandler>) -> &mut Self {
        let def = handler.definition();
        self.handlers.insert(def.name, handler);
        self
    }

    pub fn build(self) -> ToolRegistry {
        ToolRegistry {
            handlers: self.handlers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockTool {
        name: &'static str,
        fail: bool,
    }

    #[async_trait]
    impl ToolHandler for MockTool {
        fn definition(&self) -> ToolDefinition {
            ToolDefinition::new(self.name, "A mock tool")
        }

        async fn execute(&self, _input: serde_json::Value) -> Result<ToolOutput, ToolError> {
            if self.fail {
                Err(ToolError::ExecutionFailed("boom".into()))
            } else {
                Ok(ToolOutput::success("mock result"))
            }
        }
    }

    #[test]
    fn test_tool_output_accessors() {
        let output = ToolOutput::success("test");
        assert!(output.is_success());
        assert_eq!(output.content(), "test");

        let output = ToolOutput::from(ToolError::Timeout(5));
        assert!(!output.is_success());
        assert_eq!(output.content(), "Timeout after 5ms");
    }

    #[test]
    fn test_registry_builder() {
        let mut builder = ToolRegistryBuilder::new();
        builder
            .register(MockTool { name: "b", fail: false })
            .register(MockTool { name: "a", fail: false });

        let registry = builder.build();
        assert!(registry.contains("a"));
        assert_eq!(registry.get("b").unwrap().definition().name, "b");
        assert!(!registry.contains("c"));
    }

    #[tokio::test]
    async fn test_registry_dispatch() {
        let mut builder = ToolRegistryBuilder::new();
        builder.register(MockTool { name: "ok", fail: false });
        builder.register(MockTool { name: "bad", fail: true });
        let registry = builder.build();

        let result = registry.dispatch("ok", serde_json::json!({})).await.unwrap();
        assert_eq!(result.tool_name, "ok");
        assert!(result.output.is_success());
        assert!(!result.is_error);

        let result = registry.dispatch("bad", serde_json::json!({})).await.unwrap();
        assert!(result.is_error);
        assert!(result.output.content().contains("boom"));
    }

    #[tokio::test]
    async fn test_registry_dispatch_not_found() {
        let registry = ToolRegistry::new();
        let result = registry.dispatch("nonexistent", serde_json::json!({})).await;
        assert!(matches!(result, Err(ToolError::NotFound(_))));
    }
}
