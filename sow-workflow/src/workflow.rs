//! Phase-based SOW workflow with resumable state files
//!
//! The entry point is [`run_sow_workflow`], which runs any subset of the
//! three phases:
//!
//! - **Phase 0**: client research, saved to `OUTPUT/client_research_*.yaml`
//! - **Phase 1**: service research, saved to `OUTPUT/service_research_*.yaml`
//! - **Phase 2**: SOW composition, saved as markdown plus
//!   `OUTPUT/personalization_*.yaml`
//!
//! Skipped research phases can be replaced by the state files of an earlier
//! run.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use serde::Serialize;
use sow_workflow_sdk::ProgressEvent;
use tokio::fs;
use tracing::{info, warn};

use crate::pricing::PricingAdjustment;
use crate::research::catalog::{CLIENT_PHASE, SERVICE_PHASE};
use crate::research::{Topic, Weight, WeightedResearchSet};
use crate::sections::SowSections;
use crate::sow::{DocumentMetadata, SowAssembler, SowRequest, SowRun, COMPOSITION_PHASE};
use crate::synthesis::{AdaptedContent, PersonalizationBundle};

pub const DEFAULT_SERVICE: &str = "digital transformation";

/// Configuration for one workflow invocation
///
/// Most fields are optional so a run can resume from saved research.
#[derive(Debug, Clone)]
pub struct WorkflowConfig {
    /// Client name (required for phases 0 and 2)
    pub client: Option<String>,
    /// Service label
    pub service: String,
    /// Project brief, literal text or a file path (required for phase 2)
    pub brief: Option<String>,
    /// Which phases to execute (0-2)
    pub phases: Vec<u32>,
    /// Saved client research (resume without phase 0)
    pub client_research_file: Option<String>,
    /// Saved service research (resume without phase 1)
    pub service_research_file: Option<String>,
    /// Markdown output path for the generated SOW
    pub output: Option<String>,
    /// Directory for state files
    pub output_dir: PathBuf,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            client: None,
            service: DEFAULT_SERVICE.to_string(),
            brief: None,
            phases: vec![0, 1, 2],
            client_research_file: None,
            service_research_file: None,
            output: None,
            output_dir: PathBuf::from("./OUTPUT"),
        }
    }
}

/// Files written and the run produced, if phase 2 ran
#[derive(Debug, Default)]
pub struct WorkflowOutcome {
    pub client_research_file: Option<PathBuf>,
    pub service_research_file: Option<PathBuf>,
    pub document_file: Option<PathBuf>,
    pub personalization_file: Option<PathBuf>,
    pub run: Option<SowRun>,
}

/// Phase 2 state file contents
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PersonalizationState<'a> {
    document_id: String,
    metadata: &'a DocumentMetadata,
    sections: &'a SowSections,
    bundle: &'a PersonalizationBundle,
    adapted: &'a AdaptedContent,
    pricing: &'a PricingAdjustment,
    research_coverage: ResearchCoverage,
}

/// Research topics behind a document, highest weight first
#[derive(Serialize)]
struct ResearchCoverage {
    client: Vec<CoverageEntry>,
    service: Vec<CoverageEntry>,
}

#[derive(Serialize)]
struct CoverageEntry {
    topic: Topic,
    weight: Weight,
    ok: bool,
}

impl ResearchCoverage {
    fn new(client: &WeightedResearchSet, service: &WeightedResearchSet) -> Self {
        Self {
            client: coverage(client),
            service: coverage(service),
        }
    }
}

fn coverage(research: &WeightedResearchSet) -> Vec<CoverageEntry> {
    research
        .by_priority()
        .into_iter()
        .map(|(topic, result)| CoverageEntry {
            topic,
            weight: result.weight,
            ok: result.ok,
        })
        .collect()
}

/// Load file content or return literal string
async fn load_text_or_file(value: &str) -> Result<String> {
    let path = Path::new(value);
    if path.is_file() {
        fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read brief file: {}", value))
    } else {
        Ok(value.to_string())
    }
}

async fn load_research(file: &str) -> Result<WeightedResearchSet> {
    let content = fs::read_to_string(file)
        .await
        .with_context(|| format!("Failed to read research file: {}", file))?;
    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse research YAML from: {}", file))
}

/// Filesystem-friendly form of a client name
fn slug(name: &str) -> String {
    let slug = name
        .split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
        .to_lowercase();
    if slug.is_empty() {
        "client".to_string()
    } else {
        slug
    }
}

fn timestamp() -> String {
    Local::now().format("%Y%m%d_%H%M%S").to_string()
}

async fn write_state(
    assembler: &SowAssembler,
    phase: usize,
    path: &Path,
    content: &str,
    description: &str,
) -> Result<()> {
    fs::write(path, content)
        .await
        .with_context(|| format!("Failed to write {}: {}", description, path.display()))?;
    assembler.sink().emit(&ProgressEvent::StateFileCreated {
        phase,
        file_path: path.display().to_string(),
        description: description.to_string(),
    });
    Ok(())
}

/// Run the selected phases of the SOW workflow
///
/// # Errors
///
/// Returns an error if:
/// - Required parameters for a phase are missing
/// - A state file cannot be read, parsed or written
/// - The composition call of phase 2 fails
pub async fn run_sow_workflow(
    config: WorkflowConfig,
    assembler: &SowAssembler,
) -> Result<WorkflowOutcome> {
    let runs = |phase: u32| config.phases.contains(&phase);

    if (runs(0) || runs(2)) && config.client.as_deref().map_or(true, |c| c.trim().is_empty()) {
        anyhow::bail!("--client is required when running phase 0 or 2");
    }
    if runs(2) && config.brief.is_none() {
        anyhow::bail!("--brief is required when running phase 2");
    }

    fs::create_dir_all(&config.output_dir)
        .await
        .with_context(|| format!("Failed to create {}", config.output_dir.display()))?;

    let brief = match &config.brief {
        Some(brief) => load_text_or_file(brief).await?,
        None => String::new(),
    };
    let request = SowRequest::new(
        config.client.clone().unwrap_or_default().trim(),
        config.service.trim(),
        brief,
    );

    let mut outcome = WorkflowOutcome::default();
    let mut client_research: Option<WeightedResearchSet> = None;
    let mut service_research: Option<WeightedResearchSet> = None;

    // Phase 0: Client research
    if runs(0) {
        let research = assembler.research_client(&request).await;

        let path = config
            .output_dir
            .join(format!("client_research_{}.yaml", timestamp()));
        let yaml = serde_yaml::to_string(&research)?;
        write_state(assembler, CLIENT_PHASE, &path, &yaml, "Client research").await?;

        outcome.client_research_file = Some(path);
        client_research = Some(research);
    } else if let Some(file) = &config.client_research_file {
        client_research = Some(load_research(file).await?);
        info!(file = %file, "Loaded client research");
    }

    // Phase 1: Service research
    if runs(1) {
        let prior = match &client_research {
            Some(research) => research.clone(),
            None => {
                warn!("No client research available; service research runs without an industry hint");
                WeightedResearchSet::new()
            }
        };
        let research = assembler.research_service(&request, &prior).await;

        let path = config
            .output_dir
            .join(format!("service_research_{}.yaml", timestamp()));
        let yaml = serde_yaml::to_string(&research)?;
        write_state(assembler, SERVICE_PHASE, &path, &yaml, "Service research").await?;

        outcome.service_research_file = Some(path);
        service_research = Some(research);
    } else if let Some(file) = &config.service_research_file {
        service_research = Some(load_research(file).await?);
        info!(file = %file, "Loaded service research");
    }

    // Phase 2: SOW composition
    if runs(2) {
        let client_research = client_research.ok_or_else(|| {
            anyhow::anyhow!("Phase 0 must run before Phase 2, or provide --client-research-file")
        })?;
        let service_research = service_research.ok_or_else(|| {
            anyhow::anyhow!("Phase 1 must run before Phase 2, or provide --service-research-file")
        })?;

        let run = assembler
            .assemble_from_research(&request, client_research, service_research)
            .await
            .context("SOW generation failed")?;

        let ts = timestamp();
        let document_path = match &config.output {
            Some(output) => PathBuf::from(output),
            None => config
                .output_dir
                .join(format!("sow_{}_{}.md", slug(&request.subject), ts)),
        };
        if let Some(parent) = document_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        write_state(
            assembler,
            COMPOSITION_PHASE,
            &document_path,
            &run.document.full_content,
            "Statement of Work",
        )
        .await?;

        let state = PersonalizationState {
            document_id: run.document.id.to_string(),
            metadata: &run.document.metadata,
            sections: &run.document.sections,
            bundle: &run.bundle,
            adapted: &run.adapted,
            pricing: &run.pricing,
            research_coverage: ResearchCoverage::new(&run.client_research, &run.service_research),
        };
        let personalization_path = config
            .output_dir
            .join(format!("personalization_{}.yaml", ts));
        let yaml = serde_yaml::to_string(&state)?;
        write_state(
            assembler,
            COMPOSITION_PHASE,
            &personalization_path,
            &yaml,
            "Personalization insights",
        )
        .await?;

        outcome.document_file = Some(document_path);
        outcome.personalization_file = Some(personalization_path);
        outcome.run = Some(run);
    }

    Ok(outcome)
}
