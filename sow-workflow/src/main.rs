/*
┌─────────────────────────────────────────────────────────────────────────────┐
│                            SOW WORKFLOW                                      │
└─────────────────────────────────────────────────────────────────────────────┘

  Phase 0: CLIENT RESEARCH
    │
    ├─> company profile, industry, technology, competitors, compliance
    ├─> one query at a time, 2s stagger, 45s timeout per query
    └─> Output: client_research_<timestamp>.yaml

         ↓

  Phase 1: SERVICE RESEARCH
    │
    ├─> best practices, industry specifics, ROI metrics, resourcing
    ├─> industry hint taken from client research
    └─> Output: service_research_<timestamp>.yaml

         ↓

  Phase 2: SOW COMPOSITION
    │
    ├─> personalization bundle + adapted content + pricing adjustment
    ├─> one composition query, sections extracted from the answer
    └─> Output: sow_<client>_<timestamp>.md, personalization_<timestamp>.yaml

EXAMPLE COMMANDS:

  # Full run
  sow-workflow --client "Acme Co" --service "marketing automation" \
    --brief briefs/acme.md --output docs/acme_sow.md

  # Research only
  sow-workflow --client "Acme Co" --phases 0,1

  # Compose from saved research
  sow-workflow --client "Acme Co" --phases 2 --brief briefs/acme.md \
    --client-research-file OUTPUT/client_research_20250101_120000.yaml \
    --service-research-file OUTPUT/service_research_20250101_120000.yaml
*/

use std::sync::Arc;

use agent_chat_sdk::HttpChatClient;
use anyhow::Context;
use clap::Parser;
use sow_workflow::{
    cli::Args,
    config::PipelineConfig,
    run_sow_workflow,
    sow::SowAssembler,
    telemetry::init_telemetry_with_level,
    WorkflowConfig,
};
use sow_workflow_sdk::{ConsoleSink, ProgressSink, StderrSink};
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let args = Args::parse();
    init_telemetry_with_level(&args.log_level);

    let mut pipeline = PipelineConfig::resolve(args.config.as_deref())?;
    pipeline.apply_env();
    args.apply_overrides(&mut pipeline);
    pipeline.validate()?;

    let client = HttpChatClient::new(pipeline.endpoint_config()?)
        .context("Failed to create chat client")?;

    let sink: Arc<dyn ProgressSink> = if args.json_events {
        Arc::new(StderrSink)
    } else {
        Arc::new(ConsoleSink)
    };

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted; finishing with placeholders for remaining topics");
            on_interrupt.cancel();
        }
    });

    let assembler = SowAssembler::new(
        Arc::new(client),
        pipeline.session(),
        pipeline.assembly_options(),
    )
    .with_sink(sink)
    .with_cancellation(cancel);

    let config: WorkflowConfig = args.into();
    let outcome = run_sow_workflow(config, &assembler).await?;

    if let Some(path) = outcome.document_file {
        println!("\nSOW written to {}", path.display());
    }
    Ok(())
}
