use serde::{Deserialize, Serialize};

/// Role, goal and tool access of one agent in a crew.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AgentProfile {
    pub role: String,
    pub goal: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub backstory: String,
    /// Tool servers this agent may call, by descriptor name.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub servers: Vec<String>,
    #[serde(default)]
    pub verbose: bool,
}

impl AgentProfile {
    pub fn builder(role: impl Into<String>) -> AgentProfileBuilder {
        AgentProfileBuilder::new(role)
    }

    pub fn can_use(&self, server: &str) -> bool {
        self.servers.iter().any(|name| name == server)
    }
}

pub struct AgentProfileBuilder {
    profile: AgentProfile,
}

impl AgentProfileBuilder {
    pub fn new(role: impl Into<String>) -> Self {
        Self {
            profile: AgentProfile {
                role: role.into(),
                goal: String::new(),
                backstory: String::new(),
                servers: Vec::new(),
                verbose: false,
            },
        }
    }

    pub fn goal(mut self, goal: impl Into<String>) -> Self {
        self.profile.goal = goal.into();
        self
    }

    pub fn backstory(mut self, backstory: impl Into<String>) -> Self {
        self.profile.backstory = backstory.into();
        self
    }

    pub fn server(mut self, server: impl Into<String>) -> Self {
        self.profile.servers.push(server.into());
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.profile.verbose = verbose;
        self
    }

    pub fn build(self) -> AgentProfile {
        self.profile
    }
}
