use std::path::PathBuf;

use clap::Parser;
use toolcrew::logging::LoggingConfig;
use toolcrew::orchestration::demo_crew;
use toolcrew::servers::default_descriptors;
use toolcrew::{Credentials, McpTaskExecutor};

#[derive(Parser)]
#[command(name = "toolcrew", version, about = "Runs the MCP creator crew", author)]
struct Cli {
    /// Directory the filesystem server may read and write.
    #[arg(long, default_value = "downloads")]
    downloads_dir: PathBuf,
    /// Command that starts the image tool server.
    #[arg(long)]
    image_server: Option<String>,
    /// Print the server descriptors and exit without running the crew.
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    LoggingConfig::init();
    let cli = Cli::parse();

    let credentials = Credentials::from_env();
    let image_server = cli.image_server.unwrap_or_else(default_image_server);
    let descriptors = default_descriptors(&cli.downloads_dir, &image_server, &credentials);

    println!("Server parameters configured successfully");
    for descriptor in &descriptors {
        println!("{descriptor}");
    }
    if cli.dry_run {
        return Ok(());
    }

    let crew = demo_crew(&cli.downloads_dir)?;
    let executor = McpTaskExecutor::connect(&descriptors).await?;
    let result = crew.kickoff(&executor).await?;
    println!("{result}");
    Ok(())
}

/// Prefers the `image-server` binary installed next to this one.
fn default_image_server() -> String {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join("image-server")))
        .filter(|candidate| candidate.exists())
        .map(|candidate| candidate.display().to_string())
        .unwrap_or_else(|| "image-server".to_string())
}
