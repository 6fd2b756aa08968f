//! Tests for phase selection and state files

use std::sync::Arc;

use agent_chat_sdk::Session;
use sow_workflow::research::{ResearchResult, Topic, Weight, WeightedResearchSet};
use sow_workflow::sow::{AssemblyOptions, SowAssembler};
use sow_workflow::{run_sow_workflow, WorkflowConfig};
use sow_workflow_sdk::{CollectingSink, ProgressEvent};

use super::common::*;

fn scripted_endpoint() -> Arc<ScriptedClient> {
    ScriptedClient::new(|prompt| {
        if is_composition(prompt) {
            answer(SAMPLE_SOW)
        } else {
            match topic_of(prompt) {
                Some(Topic::IndustryContext) => answer("Retail chains face thin margins"),
                Some(topic) => Reply::Answer(format!("{} findings", topic)),
                None => answer("unexpected"),
            }
        }
    })
}

fn assembler(client: Arc<ScriptedClient>, sink: Arc<CollectingSink>) -> SowAssembler {
    SowAssembler::new(client, Session::default(), AssemblyOptions::default()).with_sink(sink)
}

fn state_files(events: &[ProgressEvent]) -> Vec<(usize, String)> {
    events
        .iter()
        .filter_map(|e| match e {
            ProgressEvent::StateFileCreated {
                phase, file_path, ..
            } => Some((*phase, file_path.clone())),
            _ => None,
        })
        .collect()
}

#[tokio::test(start_paused = true)]
async fn test_full_run_writes_every_state_file() {
    let dir = tempfile::tempdir().unwrap();
    let client = scripted_endpoint();
    let sink = Arc::new(CollectingSink::new());

    let config = WorkflowConfig {
        client: Some("Acme Co".to_string()),
        service: "marketing automation".to_string(),
        brief: Some("Consolidate email tooling".to_string()),
        output_dir: dir.path().to_path_buf(),
        ..Default::default()
    };

    let outcome = run_sow_workflow(config, &assembler(client.clone(), sink.clone()))
        .await
        .unwrap();

    let client_file = outcome.client_research_file.unwrap();
    let saved: WeightedResearchSet =
        serde_yaml::from_str(&std::fs::read_to_string(&client_file).unwrap()).unwrap();
    assert_eq!(saved.len(), 5);
    assert_eq!(saved.ok_data(Topic::IndustryContext), Some("Retail chains face thin margins"));

    let service_file = outcome.service_research_file.unwrap();
    assert!(service_file.exists());

    let document_file = outcome.document_file.unwrap();
    assert_eq!(std::fs::read_to_string(&document_file).unwrap(), SAMPLE_SOW);
    assert!(document_file
        .file_name()
        .unwrap()
        .to_string_lossy()
        .starts_with("sow_acme-co_"));

    let personalization = std::fs::read_to_string(outcome.personalization_file.unwrap()).unwrap();
    assert!(personalization.contains("optimizedHours"));
    assert!(personalization.contains("executiveSummary"));

    let phases: Vec<usize> = state_files(&sink.events()).into_iter().map(|(p, _)| p).collect();
    assert_eq!(phases, vec![0, 1, 2, 2]);

    let run = outcome.run.unwrap();
    assert_eq!(run.document.sections.found(), 8);
    assert!(client
        .prompts()
        .iter()
        .any(|p| p.contains("specifically for Retail industry")));
}

#[tokio::test(start_paused = true)]
async fn test_compose_from_saved_research() {
    let dir = tempfile::tempdir().unwrap();
    let client_path = dir.path().join("client.yaml");
    let service_path = dir.path().join("service.yaml");
    std::fs::write(
        &client_path,
        serde_yaml::to_string(&answered_set(&Topic::CLIENT, "client data")).unwrap(),
    )
    .unwrap();
    std::fs::write(
        &service_path,
        serde_yaml::to_string(&answered_set(&Topic::SERVICE, "service data")).unwrap(),
    )
    .unwrap();
    let brief_path = dir.path().join("brief.md");
    std::fs::write(&brief_path, "Brief read from disk").unwrap();
    let output = dir.path().join("docs").join("acme.md");

    let client = scripted_endpoint();
    let sink = Arc::new(CollectingSink::new());
    let config = WorkflowConfig {
        client: Some("Acme Co".to_string()),
        brief: Some(brief_path.display().to_string()),
        phases: vec![2],
        client_research_file: Some(client_path.display().to_string()),
        service_research_file: Some(service_path.display().to_string()),
        output: Some(output.display().to_string()),
        output_dir: dir.path().to_path_buf(),
        ..Default::default()
    };

    let outcome = run_sow_workflow(config, &assembler(client.clone(), sink.clone()))
        .await
        .unwrap();

    assert_eq!(outcome.document_file.as_deref(), Some(output.as_path()));
    assert_eq!(std::fs::read_to_string(&output).unwrap(), SAMPLE_SOW);
    assert!(outcome.client_research_file.is_none());

    let calls = client.calls();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].contains("BRIEF: Brief read from disk"));
    assert!(calls[0].contains("SERVICE: digital transformation"));
}

#[tokio::test(start_paused = true)]
async fn test_personalization_lists_research_by_weight() {
    let dir = tempfile::tempdir().unwrap();
    let client_research: WeightedResearchSet = vec![
        (
            Topic::CompanyProfile,
            ResearchResult::failure("company_profile search timed out"),
        ),
        (
            Topic::ComplianceRequirements,
            ResearchResult::success("GDPR applies", Weight::Low),
        ),
        (
            Topic::IndustryContext,
            ResearchResult::success("Retail chains", Weight::High),
        ),
    ]
    .into_iter()
    .collect();
    let client_path = dir.path().join("client.yaml");
    let service_path = dir.path().join("service.yaml");
    std::fs::write(&client_path, serde_yaml::to_string(&client_research).unwrap()).unwrap();
    std::fs::write(
        &service_path,
        serde_yaml::to_string(&answered_set(&Topic::SERVICE, "service data")).unwrap(),
    )
    .unwrap();

    let config = WorkflowConfig {
        client: Some("Acme Co".to_string()),
        brief: Some("Modernise the CRM".to_string()),
        phases: vec![2],
        client_research_file: Some(client_path.display().to_string()),
        service_research_file: Some(service_path.display().to_string()),
        output_dir: dir.path().to_path_buf(),
        ..Default::default()
    };

    let outcome = run_sow_workflow(
        config,
        &assembler(scripted_endpoint(), Arc::new(CollectingSink::new())),
    )
    .await
    .unwrap();

    let yaml = std::fs::read_to_string(outcome.personalization_file.unwrap()).unwrap();
    let state: serde_yaml::Value = serde_yaml::from_str(&yaml).unwrap();
    let client_coverage = state["researchCoverage"]["client"].as_sequence().unwrap();

    let topics: Vec<&str> = client_coverage
        .iter()
        .map(|entry| entry["topic"].as_str().unwrap())
        .collect();
    assert_eq!(
        topics,
        vec!["industry_context", "compliance_requirements", "company_profile"]
    );
    assert_eq!(client_coverage[2]["weight"].as_str(), Some("error"));
    assert_eq!(client_coverage[2]["ok"].as_bool(), Some(false));
    assert_eq!(
        state["researchCoverage"]["service"].as_sequence().unwrap().len(),
        Topic::SERVICE.len()
    );
}

#[tokio::test(start_paused = true)]
async fn test_service_research_without_client_research() {
    let dir = tempfile::tempdir().unwrap();
    let client = scripted_endpoint();

    let config = WorkflowConfig {
        phases: vec![1],
        output_dir: dir.path().to_path_buf(),
        ..Default::default()
    };

    let outcome = run_sow_workflow(config, &assembler(client.clone(), Arc::new(CollectingSink::new())))
        .await
        .unwrap();

    assert!(outcome.service_research_file.is_some());
    assert!(outcome.run.is_none());
    assert_eq!(client.prompts().len(), 4);
}

#[tokio::test]
async fn test_missing_inputs_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let client = scripted_endpoint();
    let assembler = assembler(client.clone(), Arc::new(CollectingSink::new()));

    let err = run_sow_workflow(
        WorkflowConfig {
            phases: vec![0],
            output_dir: dir.path().to_path_buf(),
            ..Default::default()
        },
        &assembler,
    )
    .await
    .unwrap_err();
    assert!(err.to_string().contains("--client"));

    let err = run_sow_workflow(
        WorkflowConfig {
            client: Some("Acme Co".to_string()),
            phases: vec![2],
            output_dir: dir.path().to_path_buf(),
            ..Default::default()
        },
        &assembler,
    )
    .await
    .unwrap_err();
    assert!(err.to_string().contains("--brief"));

    let err = run_sow_workflow(
        WorkflowConfig {
            client: Some("Acme Co".to_string()),
            brief: Some("brief".to_string()),
            phases: vec![2],
            output_dir: dir.path().to_path_buf(),
            ..Default::default()
        },
        &assembler,
    )
    .await
    .unwrap_err();
    assert!(err.to_string().contains("--client-research-file"));

    assert!(client.calls().is_empty());
}
