//! Blueprint and package tools
//!
//! Blueprints are remotely-hosted Lua snippets; loading one is a fetch
//! followed by the ordinary eval flow. apm-install generates the install
//! call for the package manager already loaded in the process.

use serde::Deserialize;

use crate::format;
use crate::protocol::{Tool, ToolAnnotations, ToolContent, ToolsCallResult};

use super::{eval_in_process, ToolContext};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadBlueprintParams {
    /// URL the blueprint source is fetched from
    pub url: String,

    /// Process to load it into
    pub process_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadOfficialBlueprintParams {
    /// Name of a blueprint in the official collection, e.g. "token"
    pub blueprint_name: String,

    /// Process to load it into
    pub process_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApmInstallParams {
    /// Package to install, e.g. "@rakis/DbAdmin"
    pub package_name: String,

    /// Process the package manager runs in
    pub process_id: String,
}

pub fn load_tool_definition() -> Tool {
    Tool {
        name: "load-blueprint".to_string(),
        title: Some("Load Blueprint".to_string()),
        description: "Fetch Lua source from a URL and evaluate it inside a process."
            .to_string(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {
                "url": {
                    "type": "string",
                    "description": "URL serving the blueprint source"
                },
                "processId": {
                    "type": "string",
                    "description": "Id of the process to load the blueprint into"
                }
            },
            "required": ["url", "processId"]
        }),
        output_schema: None,
        annotations: Some(ToolAnnotations::remote_write()),
    }
}

pub fn load_official_tool_definition() -> Tool {
    Tool {
        name: "load-official-blueprint".to_string(),
        title: Some("Load Official Blueprint".to_string()),
        description: "Load a blueprint from the official collection (token, chat, chatroom, \
                      staking, voting, ...) into a process by name."
            .to_string(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {
                "blueprintName": {
                    "type": "string",
                    "description": "Blueprint name in the official collection"
                },
                "processId": {
                    "type": "string",
                    "description": "Id of the process to load the blueprint into"
                }
            },
            "required": ["blueprintName", "processId"]
        }),
        output_schema: None,
        annotations: Some(ToolAnnotations::remote_write()),
    }
}

pub fn apm_install_tool_definition() -> Tool {
    Tool {
        name: "apm-install".to_string(),
        title: Some("Install APM Package".to_string()),
        description: "Install a package through the APM package manager loaded in the \
                      process. The APM blueprint must have been loaded first."
            .to_string(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {
                "packageName": {
                    "type": "string",
                    "description": "Package name, letters/digits and @ / _ . - only"
                },
                "processId": {
                    "type": "string",
                    "description": "Id of the process running APM"
                }
            },
            "required": ["packageName", "processId"]
        }),
        output_schema: None,
        annotations: Some(ToolAnnotations::remote_write()),
    }
}

/// Fetch source from a URL and run it through the eval flow.
async fn load_from_url(ctx: &ToolContext, url: &str, process_id: &str) -> ToolsCallResult {
    let source = match ctx.bridge.fetch_text(url).await {
        Ok(s) => s,
        Err(e) => {
            return ToolsCallResult::error(format!("Error fetching blueprint from {}: {}", url, e));
        }
    };

    match eval_in_process(ctx, process_id, &source, vec![]).await {
        Ok(output) => {
            let text = if output.is_empty() {
                format!("Blueprint loaded into {}", process_id)
            } else {
                format!("Blueprint loaded into {}\n{}", process_id, output)
            };
            ToolsCallResult::success(vec![ToolContent::text(text)])
        }
        Err(e) => ToolsCallResult::error(format!(
            "Error evaluating blueprint in {}: {}",
            process_id, e
        )),
    }
}

/// Execute the load blueprint tool
pub async fn execute_load(ctx: &ToolContext, arguments: serde_json::Value) -> ToolsCallResult {
    let params: LoadBlueprintParams = match serde_json::from_value(arguments) {
        Ok(p) => p,
        Err(e) => return ToolsCallResult::error(format!("Invalid parameters: {}", e)),
    };

    load_from_url(ctx, &params.url, &params.process_id).await
}

/// Execute the load official blueprint tool
pub async fn execute_load_official(
    ctx: &ToolContext,
    arguments: serde_json::Value,
) -> ToolsCallResult {
    let params: LoadOfficialBlueprintParams = match serde_json::from_value(arguments) {
        Ok(p) => p,
        Err(e) => return ToolsCallResult::error(format!("Invalid parameters: {}", e)),
    };

    if !format::is_valid_package_name(&params.blueprint_name) {
        return ToolsCallResult::error(format!(
            "Invalid blueprint name '{}'",
            params.blueprint_name
        ));
    }

    let url = ctx.config.blueprint_url(&params.blueprint_name);
    load_from_url(ctx, &url, &params.process_id).await
}

/// Execute the apm install tool
pub async fn execute_apm_install(
    ctx: &ToolContext,
    arguments: serde_json::Value,
) -> ToolsCallResult {
    let params: ApmInstallParams = match serde_json::from_value(arguments) {
        Ok(p) => p,
        Err(e) => return ToolsCallResult::error(format!("Invalid parameters: {}", e)),
    };

    if !format::is_valid_package_name(&params.package_name) {
        return ToolsCallResult::error(format!(
            "Invalid package name '{}': letters, digits and @ / _ . - only",
            params.package_name
        ));
    }

    let code = format!("apm.install(\"{}\")", params.package_name);

    match eval_in_process(ctx, &params.process_id, &code, vec![]).await {
        Ok(output) => {
            let text = if output.is_empty() {
                format!("Install requested for {}", params.package_name)
            } else {
                output
            };
            ToolsCallResult::success(vec![ToolContent::text(text)])
        }
        Err(e) => ToolsCallResult::error(format!(
            "Error installing {} in {}: {}",
            params.package_name, params.process_id, e
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{AoBridge, RecordedCall};
    use crate::config::AoConfig;
    use std::sync::Arc;

    fn mock_context() -> ToolContext {
        ToolContext {
            bridge: Arc::new(AoBridge::new_mock()),
            config: Arc::new(AoConfig::default()),
        }
    }

    #[tokio::test]
    async fn test_load_blueprint_fetches_then_evals() {
        let ctx = mock_context();
        ctx.bridge.mock().unwrap().set_source("Handlers.add('x')");

        let args = serde_json::json!({
            "url": "https://example.com/bp.lua",
            "processId": "proc-1"
        });
        let result = execute_load(&ctx, args).await;
        assert!(result.is_error.is_none());

        let calls = ctx.bridge.mock().unwrap().recorded_calls();
        assert_eq!(
            calls[0],
            RecordedCall::Fetch {
                url: "https://example.com/bp.lua".to_string()
            }
        );
        match &calls[1] {
            RecordedCall::Message { data, .. } => assert_eq!(data, "Handlers.add('x')"),
            other => panic!("expected message call, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_official_blueprint_builds_well_known_url() {
        let ctx = mock_context();
        let args = serde_json::json!({
            "blueprintName": "token",
            "processId": "proc-1"
        });
        execute_load_official(&ctx, args).await;

        let calls = ctx.bridge.mock().unwrap().recorded_calls();
        assert_eq!(
            calls[0],
            RecordedCall::Fetch {
                url: "https://raw.githubusercontent.com/permaweb/aos/main/blueprints/token.lua"
                    .to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_official_blueprint_rejects_path_traversal() {
        let ctx = mock_context();
        let args = serde_json::json!({
            "blueprintName": "../../../etc/passwd x",
            "processId": "proc-1"
        });
        let result = execute_load_official(&ctx, args).await;
        assert_eq!(result.is_error, Some(true));
        assert!(ctx.bridge.mock().unwrap().recorded_calls().is_empty());
    }

    #[tokio::test]
    async fn test_apm_install_builds_install_call() {
        let ctx = mock_context();
        let args = serde_json::json!({
            "packageName": "@rakis/DbAdmin",
            "processId": "proc-1"
        });
        execute_apm_install(&ctx, args).await;

        let calls = ctx.bridge.mock().unwrap().recorded_calls();
        match &calls[0] {
            RecordedCall::Message { data, .. } => {
                assert_eq!(data, "apm.install(\"@rakis/DbAdmin\")");
            }
            other => panic!("expected message call, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_apm_install_rejects_code_in_name() {
        let ctx = mock_context();
        let args = serde_json::json!({
            "packageName": "x\")os.exit()--",
            "processId": "proc-1"
        });
        let result = execute_apm_install(&ctx, args).await;
        assert_eq!(result.is_error, Some(true));
        assert!(ctx.bridge.mock().unwrap().recorded_calls().is_empty());
    }
}
