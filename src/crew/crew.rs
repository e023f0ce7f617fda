use std::collections::HashSet;
use std::fmt;

use anyhow::anyhow;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Result, ToolCrewError};

use super::agent::AgentProfile;
use super::context::TaskContext;
use super::executor::TaskExecutor;
use super::task::{TaskOutput, TaskSpec};

/// Agents plus an ordered task list whose artifact dependencies have been
/// checked.
#[derive(Clone, Debug)]
pub struct Crew {
    agents: Vec<AgentProfile>,
    tasks: Vec<TaskSpec>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CrewOutput {
    pub tasks: Vec<TaskOutput>,
}

impl CrewOutput {
    /// Output of the last task, which is the crew's answer.
    pub fn raw(&self) -> &str {
        self.tasks.last().map(|task| task.raw.as_str()).unwrap_or("")
    }
}

impl fmt::Display for CrewOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, task) in self.tasks.iter().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            writeln!(f, "## {} ({})", task.task, task.agent)?;
            write!(f, "{}", task.raw)?;
        }
        Ok(())
    }
}

impl Crew {
    pub fn new(agents: Vec<AgentProfile>, tasks: Vec<TaskSpec>) -> Result<Self> {
        validate(&agents, &tasks)?;
        Ok(Self { agents, tasks })
    }

    pub fn agents(&self) -> &[AgentProfile] {
        &self.agents
    }

    pub fn tasks(&self) -> &[TaskSpec] {
        &self.tasks
    }

    /// Runs every task in declared order. The first failing task stops the
    /// run.
    pub async fn kickoff(&self, executor: &dyn TaskExecutor) -> Result<CrewOutput> {
        let mut context = TaskContext::new();
        let mut output = CrewOutput::default();

        for task in &self.tasks {
            let agent = self.agent(&task.agent)?;
            info!(task = %task.name, agent = %agent.role, "starting task");
            let task_output = executor.execute(agent, task, &context).await?;
            for (name, value) in &task_output.artifacts {
                context.insert(name.clone(), value.clone());
            }
            if agent.verbose {
                info!(task = %task.name, output = %task_output.raw, "task finished");
            }
            output.tasks.push(task_output);
        }
        Ok(output)
    }

    fn agent(&self, role: &str) -> Result<&AgentProfile> {
        self.agents
            .iter()
            .find(|agent| agent.role == role)
            .ok_or_else(|| ToolCrewError::Other(anyhow!("no agent with role `{role}`")))
    }
}

fn validate(agents: &[AgentProfile], tasks: &[TaskSpec]) -> Result<()> {
    let mut produced: HashSet<&str> = HashSet::new();

    for task in tasks {
        if !agents.iter().any(|agent| agent.role == task.agent) {
            return Err(ToolCrewError::Other(anyhow!(
                "task `{}` is assigned to unknown agent `{}`",
                task.name,
                task.agent
            )));
        }
        for artifact in &task.consumes {
            if !produced.contains(artifact.as_str()) {
                return Err(ToolCrewError::UnsatisfiedDependency {
                    task: task.name.clone(),
                    artifact: artifact.clone(),
                });
            }
        }

        let mut visible: HashSet<&str> = task.consumes.iter().map(String::as_str).collect();
        for step in &task.steps {
            for reference in step.references() {
                if !visible.contains(reference.as_str()) {
                    return Err(ToolCrewError::UnsatisfiedDependency {
                        task: task.name.clone(),
                        artifact: reference,
                    });
                }
            }
            if let Some(artifact) = step.produces.as_deref() {
                visible.insert(artifact);
            }
        }
        produced.extend(task.produces());
    }
    Ok(())
}
