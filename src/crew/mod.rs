//! Sequential crew: one or more agents, tasks run strictly in order, each
//! task declaring which earlier artifacts it consumes.

mod agent;
mod context;
#[allow(clippy::module_inception)]
mod crew;
mod executor;
mod task;

pub use agent::{AgentProfile, AgentProfileBuilder};
pub use context::TaskContext;
pub use crew::{Crew, CrewOutput};
pub use executor::{McpTaskExecutor, TaskExecutor};
pub use task::{TaskOutput, TaskSpec, TaskStep};
