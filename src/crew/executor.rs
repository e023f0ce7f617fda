use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::error::{Result, ToolCrewError};
use crate::mcp::McpClient;
use crate::servers::ToolServerDescriptor;

use super::agent::AgentProfile;
use super::context::TaskContext;
use super::task::{TaskOutput, TaskSpec};

/// Runs a single task on behalf of an agent.
#[async_trait]
pub trait TaskExecutor: Send + Sync {
    async fn execute(
        &self,
        agent: &AgentProfile,
        task: &TaskSpec,
        context: &TaskContext,
    ) -> Result<TaskOutput>;
}

/// Executes task steps as tool calls against connected tool servers.
///
/// Calls are issued one at a time; there is no retry and no timeout.
pub struct McpTaskExecutor {
    clients: Mutex<HashMap<String, McpClient>>,
}

impl McpTaskExecutor {
    pub fn from_clients(clients: impl IntoIterator<Item = McpClient>) -> Self {
        Self {
            clients: Mutex::new(
                clients
                    .into_iter()
                    .map(|client| (client.server().to_string(), client))
                    .collect(),
            ),
        }
    }

    /// Spawns every descriptor. The first server that cannot be started
    /// aborts the whole connection attempt.
    pub async fn connect(descriptors: &[ToolServerDescriptor]) -> Result<Self> {
        let mut clients = Vec::with_capacity(descriptors.len());
        for descriptor in descriptors {
            let mut client = McpClient::spawn(descriptor).await?;
            let tools = client.list_tools().await?;
            info!(
                server = %descriptor.name,
                tools = ?tools.iter().map(|tool| tool.name.as_str()).collect::<Vec<_>>(),
                "discovered tools"
            );
            clients.push(client);
        }
        Ok(Self::from_clients(clients))
    }
}

#[async_trait]
impl TaskExecutor for McpTaskExecutor {
    async fn execute(
        &self,
        agent: &AgentProfile,
        task: &TaskSpec,
        context: &TaskContext,
    ) -> Result<TaskOutput> {
        let mut local = context.clone();
        let mut output = TaskOutput {
            task: task.name.clone(),
            agent: agent.role.clone(),
            ..TaskOutput::default()
        };
        let mut transcript = Vec::with_capacity(task.steps.len());
        let mut clients = self.clients.lock().await;

        for step in &task.steps {
            if !agent.can_use(&step.server) {
                return Err(ToolCrewError::ToolNotRegistered(format!(
                    "{}/{} (agent `{}` has no access to `{}`)",
                    step.server, step.tool, agent.role, step.server
                )));
            }
            let client = clients.get_mut(&step.server).ok_or_else(|| {
                ToolCrewError::ToolUnavailable {
                    server: step.server.clone(),
                    reason: "not connected".to_string(),
                }
            })?;

            let arguments = local.render(&step.arguments);
            info!(task = %task.name, server = %step.server, tool = %step.tool, "calling tool");
            let result = client.call_tool(&step.tool, arguments).await?;
            let text = result.joined_text();
            if result.is_error {
                warn!(task = %task.name, tool = %step.tool, %text, "tool reported an error");
                return Err(ToolCrewError::RemoteApi(format!(
                    "{}/{}: {text}",
                    step.server, step.tool
                )));
            }

            if let Some(artifact) = &step.produces {
                local.insert(artifact.clone(), text.clone());
                output.artifacts.insert(artifact.clone(), text.clone());
            }
            transcript.push(format!("[{}/{}] {text}", step.server, step.tool));
        }

        output.raw = transcript.join("\n");
        Ok(output)
    }
}
