//! The demo crew: one "Creator" agent, a research-and-diagram task and a
//! summarize-and-save task.

use std::path::Path;

use serde_json::json;

use crate::crew::{AgentProfile, Crew, TaskSpec, TaskStep};
use crate::error::Result;
use crate::servers::{BRAVE_SEARCH_SERVER, FILESYSTEM_SERVER, IMAGE_SERVER};
use crate::tools::IMAGE_CREATION_TOOL;

pub const CREATOR_ROLE: &str = "Creator";
pub const RESEARCH_TASK: &str = "research_and_diagram";
pub const SUMMARY_TASK: &str = "summarize_and_save";

pub const RESEARCH_ARTIFACT: &str = "research";
pub const DIAGRAM_ARTIFACT: &str = "diagram";
pub const SUMMARY_ARTIFACT: &str = "summary_file";

pub const DIAGRAM_IMAGE_NAME: &str = "mcp_diagram";
pub const SUMMARY_FILE_NAME: &str = "mcp_summary.txt";

pub fn creator_agent() -> AgentProfile {
    AgentProfile::builder(CREATOR_ROLE)
        .goal("You are an amazing AI Creator who uses MCP Tools.")
        .backstory("An AI that can create images via an MCP tool.")
        .server(FILESYSTEM_SERVER)
        .server(BRAVE_SEARCH_SERVER)
        .server(IMAGE_SERVER)
        .verbose(true)
        .build()
}

pub fn research_task() -> TaskSpec {
    TaskSpec::new(RESEARCH_TASK, CREATOR_ROLE)
        .with_description(
            "I need you to research Model Context Protocol and create an in-depth diagram on how it works.",
        )
        .with_expected_output("A summary of the brave search results and a successful image creation.")
        .step(
            TaskStep::new(
                BRAVE_SEARCH_SERVER,
                "brave_web_search",
                json!({ "query": "Model Context Protocol", "count": 5 }),
            )
            .produces(RESEARCH_ARTIFACT),
        )
        .step(
            TaskStep::new(
                IMAGE_SERVER,
                IMAGE_CREATION_TOOL,
                json!({
                    "query": "An in-depth technical diagram of how the Model Context Protocol works: \
                              a host application with MCP clients exchanging JSON-RPC messages with \
                              MCP servers that expose tools, resources and prompts.",
                    "image_name": DIAGRAM_IMAGE_NAME,
                }),
            )
            .produces(DIAGRAM_ARTIFACT),
        )
}

/// `downloads_dir` must be a directory the filesystem server allows.
pub fn summary_task(downloads_dir: &Path) -> TaskSpec {
    let path = downloads_dir.join(SUMMARY_FILE_NAME);
    TaskSpec::new(SUMMARY_TASK, CREATOR_ROLE)
        .with_description(
            "Summarize the results of the task and create a text file in the downloads folder (check allowed folders) and save it.",
        )
        .with_expected_output("A summary of the brave search results in a text file in the downloads folder.")
        .consumes(RESEARCH_ARTIFACT)
        .consumes(DIAGRAM_ARTIFACT)
        .step(
            TaskStep::new(
                FILESYSTEM_SERVER,
                "write_file",
                json!({
                    "path": path.display().to_string(),
                    "content": "Model Context Protocol research summary\n\n\
                                {{research}}\n\nDiagram: {{diagram}}\n",
                }),
            )
            .produces(SUMMARY_ARTIFACT),
        )
}

pub fn demo_crew(downloads_dir: &Path) -> Result<Crew> {
    Crew::new(
        vec![creator_agent()],
        vec![research_task(), summary_task(downloads_dir)],
    )
}
