//! Tests for end-to-end SOW assembly

use std::sync::Arc;
use std::time::Duration;

use agent_chat_sdk::{ChatError, Session};
use sow_workflow::research::Topic;
use sow_workflow::sow::{assemble_sow, AssemblyOptions, SowAssembler, SowError, SowRequest};
use sow_workflow_sdk::{CollectingSink, NullSink, ProgressEvent};
use tokio_util::sync::CancellationToken;

use super::common::*;

fn acme_request() -> SowRequest {
    SowRequest::new(
        "Acme Co",
        "marketing automation",
        "Consolidate three email tools into one platform",
    )
}

#[tokio::test(start_paused = true)]
async fn test_client_timeouts_still_produce_a_document() {
    let client = ScriptedClient::new(|prompt| {
        if is_composition(prompt) {
            return answer(SAMPLE_SOW);
        }
        match topic_of(prompt) {
            Some(topic) if topic.is_client_topic() => Reply::Hang,
            Some(topic) => Reply::Answer(format!("{} guidance", topic)),
            None => answer("unexpected"),
        }
    });
    let sink = Arc::new(CollectingSink::new());

    let run = assemble_sow(
        client.clone(),
        &Session::new("proposals"),
        &acme_request(),
        AssemblyOptions::default(),
        sink.clone(),
        CancellationToken::new(),
    )
    .await
    .unwrap();

    assert_eq!(run.client_research.len(), 5);
    assert_eq!(run.client_research.succeeded(), 0);
    assert_eq!(run.service_research.succeeded(), 4);

    assert!(run.bundle.opportunities.is_empty());
    assert_eq!(
        run.bundle.risk_mitigation,
        vec!["Proven methodology based on industry best practices and lessons learned"]
    );
    assert!(run.bundle.pricing_justification.is_empty());

    // The composition call is issued exactly once, after all research
    let prompts = client.prompts();
    assert_eq!(prompts.len(), 10);
    assert_eq!(prompts.iter().filter(|p| is_composition(p)).count(), 1);
    assert!(is_composition(prompts.last().unwrap()));

    // No industry hint without client industry research
    let industry = prompts
        .iter()
        .find(|p| topic_of(p) == Some(Topic::IndustrySpecific))
        .unwrap();
    assert!(industry.contains("specifically for  industry"));

    assert_eq!(run.document.full_content, SAMPLE_SOW);
    assert_eq!(run.document.sections.found(), 8);
    assert_eq!(run.document.metadata.subject, "Acme Co");

    let events = sink.events();
    assert!(events.contains(&ProgressEvent::CompositionStarted {
        subject: "Acme Co".to_string(),
        service: "marketing automation".to_string(),
    }));
    assert!(matches!(
        events.last(),
        Some(ProgressEvent::CompositionCompleted { words }) if *words == run.document.metadata.word_count
    ));
}

#[tokio::test(start_paused = true)]
async fn test_industry_hint_and_pricing_flow_through() {
    let client = ScriptedClient::new(|prompt| {
        if is_composition(prompt) {
            return answer(SAMPLE_SOW);
        }
        match topic_of(prompt) {
            Some(Topic::CompanyProfile) => answer("A Fortune 500 enterprise"),
            Some(Topic::IndustryContext) => answer("Healthcare providers are consolidating"),
            Some(Topic::TechnologyLandscape) => answer("Mostly legacy on-premise systems"),
            Some(Topic::ComplianceRequirements) => answer("Heavily regulated data handling"),
            _ => answer("useful findings"),
        }
    });

    let run = SowAssembler::new(client.clone(), Session::default(), AssemblyOptions::default())
        .assemble(&acme_request())
        .await
        .unwrap();

    assert_eq!(run.pricing.base_hours, 100);
    assert_eq!(run.pricing.optimized_hours, 152);
    assert_eq!(run.bundle.opportunities.len(), 3);
    assert!(run.bundle.pricing_justification.starts_with("Our pricing reflects"));
    assert_eq!(run.adapted.objectives.len(), 3);

    let prompts = client.prompts();
    let industry = prompts
        .iter()
        .find(|p| topic_of(p) == Some(Topic::IndustrySpecific))
        .unwrap();
    assert!(industry.contains("marketing automation implementation specifically for Healthcare industry"));

    let composite = prompts.iter().find(|p| is_composition(p)).unwrap();
    assert!(composite.contains("CLIENT: Acme Co"));
    assert!(composite.contains("BRIEF: Consolidate three email tools into one platform"));
    assert!(composite.contains("approximately 152 hours"));
    assert!(composite.contains("Technology integration assessment and compatibility analysis"));
}

#[tokio::test(start_paused = true)]
async fn test_composition_failure_surfaces_as_error() {
    let client = ScriptedClient::new(|prompt| {
        if is_composition(prompt) {
            Reply::Fail(ChatError::Status {
                status: 500,
                body: "model overloaded".to_string(),
            })
        } else {
            answer("findings")
        }
    });
    let sink = Arc::new(CollectingSink::new());

    let err = SowAssembler::new(client, Session::default(), AssemblyOptions::default())
        .with_sink(sink.clone())
        .assemble(&acme_request())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        SowError::Composition {
            source: ChatError::Status { status: 500, .. }
        }
    ));
    assert!(matches!(
        sink.events().last(),
        Some(ProgressEvent::CompositionFailed { .. })
    ));
}

#[tokio::test(start_paused = true)]
async fn test_composition_timeout() {
    let client = ScriptedClient::new(|prompt| {
        if is_composition(prompt) {
            Reply::Hang
        } else {
            answer("findings")
        }
    });
    let options = AssemblyOptions {
        composition_timeout: Duration::from_secs(30),
        ..AssemblyOptions::default()
    };

    let err = SowAssembler::new(client, Session::default(), options)
        .assemble_from_research(
            &acme_request(),
            answered_set(&Topic::CLIENT, "client data"),
            answered_set(&Topic::SERVICE, "service data"),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, SowError::CompositionTimeout(d) if d == Duration::from_secs(30)));
}

#[tokio::test(start_paused = true)]
async fn test_assemble_from_research_skips_research_calls() {
    let client = ScriptedClient::new(|_| answer("Thanks! Here is a short note without headings."));

    let run = SowAssembler::new(client.clone(), Session::default(), AssemblyOptions::default())
        .with_sink(Arc::new(NullSink))
        .assemble_from_research(
            &acme_request(),
            answered_set(&Topic::CLIENT, "client data"),
            answered_set(&Topic::SERVICE, "service data"),
        )
        .await
        .unwrap();

    assert_eq!(client.calls().len(), 1);
    assert_eq!(run.document.sections.found(), 0);
    assert_eq!(
        run.document.full_content,
        "Thanks! Here is a short note without headings."
    );
}

#[tokio::test(start_paused = true)]
async fn test_cancelled_run_skips_composition() {
    let client = ScriptedClient::new(|_| answer("findings"));
    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = SowAssembler::new(client.clone(), Session::default(), AssemblyOptions::default())
        .with_cancellation(cancel)
        .assemble(&acme_request())
        .await
        .unwrap_err();

    assert!(matches!(err, SowError::Cancelled));
    assert!(client.calls().is_empty());
}
