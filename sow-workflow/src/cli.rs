//! CLI argument parsing for the SOW workflow

use std::path::PathBuf;

use clap::Parser;

use crate::config::PipelineConfig;
use crate::workflow::{WorkflowConfig, DEFAULT_SERVICE};

/// SOW Workflow CLI Arguments
#[derive(Parser, Debug, Clone)]
#[command(
    name = "sow-workflow",
    about = "Research-driven Statement of Work drafting: client research → service research → SOW composition"
)]
pub struct Args {
    /// Client name to research and draft for
    #[arg(short, long)]
    pub client: Option<String>,

    /// Service being proposed
    #[arg(short, long, default_value = DEFAULT_SERVICE)]
    pub service: String,

    /// Project brief (file path or string)
    #[arg(short, long)]
    pub brief: Option<String>,

    /// Comma-separated phases to execute (0=client research, 1=service research, 2=compose)
    #[arg(long, default_value = "0,1,2")]
    pub phases: String,

    /// Path to saved client research YAML (for resuming without Phase 0)
    #[arg(long)]
    pub client_research_file: Option<String>,

    /// Path to saved service research YAML (for resuming without Phase 1)
    #[arg(long)]
    pub service_research_file: Option<String>,

    /// Output file path for the generated SOW markdown
    #[arg(short, long)]
    pub output: Option<String>,

    /// Directory for research and personalization state files
    #[arg(long, default_value = "./OUTPUT")]
    pub output_dir: PathBuf,

    /// Pipeline configuration YAML
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Base hour estimate before research-driven adjustment
    #[arg(long)]
    pub base_hours: Option<u32>,

    /// Upstream workspace slug
    #[arg(short, long)]
    pub workspace: Option<String>,

    /// Log level for diagnostics (RUST_LOG takes precedence)
    #[arg(long, default_value = "warn")]
    pub log_level: String,

    /// Emit structured progress events on stderr instead of console lines
    #[arg(long)]
    pub json_events: bool,
}

impl Args {
    /// Parse the comma-separated phases string into a Vec<u32>
    pub fn parse_phases(&self) -> Vec<u32> {
        self.phases
            .split(',')
            .filter_map(|p| p.trim().parse().ok())
            .filter(|p| *p <= 2)
            .collect()
    }

    /// Apply flag overrides on top of file and environment configuration
    pub fn apply_overrides(&self, config: &mut PipelineConfig) {
        if let Some(hours) = self.base_hours {
            config.pricing.base_hours = hours;
        }
        if let Some(workspace) = &self.workspace {
            config.endpoint.workspace = workspace.clone();
        }
    }
}

impl From<Args> for WorkflowConfig {
    fn from(args: Args) -> Self {
        let phases = args.parse_phases();
        WorkflowConfig {
            client: args.client,
            service: args.service,
            brief: args.brief,
            phases,
            client_research_file: args.client_research_file,
            service_research_file: args.service_research_file,
            output: args.output,
            output_dir: args.output_dir,
        }
    }
}
