//! End-to-end SOW assembly: research, synthesis, pricing, composition

use std::sync::Arc;
use std::time::Duration;

use agent_chat_sdk::{ChatClient, Session};
use sow_workflow_sdk::{NullSink, ProgressEvent, ProgressSink};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::pricing::{self, PricingRules, RateCard};
use crate::research::{
    client_catalog, industry_hint, service_catalog, ResearchOrchestrator, ResearchTiming,
    WeightedResearchSet,
};
use crate::sow::error::SowError;
use crate::sow::prompt::composite_prompt;
use crate::sow::types::{parse_document, SowRequest, SowRun};
use crate::synthesis::synthesize_all;

/// Phase number used for composition progress
pub const COMPOSITION_PHASE: usize = 2;

#[derive(Debug, Clone, PartialEq)]
pub struct AssemblyOptions {
    pub timing: ResearchTiming,
    pub composition_timeout: Duration,
    pub base_hours: u32,
    pub pricing_rules: PricingRules,
    pub rate_card: RateCard,
}

impl Default for AssemblyOptions {
    fn default() -> Self {
        Self {
            timing: ResearchTiming::default(),
            composition_timeout: Duration::from_secs(120),
            base_hours: 100,
            pricing_rules: PricingRules::default(),
            rate_card: RateCard::default(),
        }
    }
}

/// Sequences the research phases and the final composition call on one session
#[derive(Clone)]
pub struct SowAssembler {
    client: Arc<dyn ChatClient>,
    session: Session,
    options: AssemblyOptions,
    sink: Arc<dyn ProgressSink>,
    cancel: CancellationToken,
}

impl SowAssembler {
    pub fn new(client: Arc<dyn ChatClient>, session: Session, options: AssemblyOptions) -> Self {
        Self {
            client,
            session,
            options,
            sink: Arc::new(NullSink),
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_sink(mut self, sink: Arc<dyn ProgressSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn options(&self) -> &AssemblyOptions {
        &self.options
    }

    pub fn sink(&self) -> &Arc<dyn ProgressSink> {
        &self.sink
    }

    fn orchestrator(&self) -> ResearchOrchestrator {
        ResearchOrchestrator::new(self.client.clone(), self.session.clone())
            .with_timing(self.options.timing)
            .with_sink(self.sink.clone())
            .with_cancellation(self.cancel.clone())
    }

    /// Client catalog, keyed on the client with the service as context
    pub async fn research_client(&self, request: &SowRequest) -> WeightedResearchSet {
        self.orchestrator()
            .run(&client_catalog(), &request.subject, &request.service_label)
            .await
    }

    /// Service catalog, keyed on the service with the client's industry as context
    pub async fn research_service(
        &self,
        request: &SowRequest,
        client_research: &WeightedResearchSet,
    ) -> WeightedResearchSet {
        let industry = industry_hint(client_research);
        self.orchestrator()
            .run(&service_catalog(), &request.service_label, &industry)
            .await
    }

    /// Run both research phases, then compose the document
    pub async fn assemble(&self, request: &SowRequest) -> Result<SowRun, SowError> {
        let client_research = self.research_client(request).await;
        let service_research = self.research_service(request, &client_research).await;
        self.assemble_from_research(request, client_research, service_research)
            .await
    }

    /// Compose the document from research collected earlier
    pub async fn assemble_from_research(
        &self,
        request: &SowRequest,
        client_research: WeightedResearchSet,
        service_research: WeightedResearchSet,
    ) -> Result<SowRun, SowError> {
        let (bundle, adapted) = synthesize_all(
            &client_research,
            &service_research,
            &request.subject,
            &request.service_label,
        );
        let pricing = pricing::adjust(
            &self.options.pricing_rules,
            &client_research,
            &service_research,
            self.options.base_hours,
        );
        let prompt = composite_prompt(
            request,
            &bundle,
            &adapted,
            &pricing,
            &self.options.rate_card,
        )?;

        let raw = self.compose(request, &prompt).await?;
        let document = parse_document(raw, &request.subject, &request.service_label);

        info!(
            id = %document.id,
            words = document.metadata.word_count,
            sections = document.sections.found(),
            "SOW generated"
        );
        self.sink.emit(&ProgressEvent::CompositionCompleted {
            words: document.metadata.word_count,
        });

        Ok(SowRun {
            document,
            bundle,
            adapted,
            pricing,
            client_research,
            service_research,
        })
    }

    /// One composition call raced against its timeout and cancellation
    async fn compose(&self, request: &SowRequest, prompt: &str) -> Result<String, SowError> {
        self.sink.emit(&ProgressEvent::CompositionStarted {
            subject: request.subject.clone(),
            service: request.service_label.clone(),
        });
        info!(subject = %request.subject, chars = prompt.len(), "Requesting SOW composition");

        let timeout = self.options.composition_timeout;
        let outcome = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(SowError::Cancelled),
            answer = self.client.chat(&self.session, prompt) => answer.map_err(SowError::from),
            _ = tokio::time::sleep(timeout) => Err(SowError::CompositionTimeout(timeout)),
        };

        if let Err(e) = &outcome {
            warn!(error = %e, "SOW composition failed");
            self.sink.emit(&ProgressEvent::CompositionFailed {
                error: e.to_string(),
            });
        }
        outcome
    }
}

/// Run a complete assembly with explicit collaborators
pub async fn assemble_sow(
    client: Arc<dyn ChatClient>,
    session: &Session,
    request: &SowRequest,
    options: AssemblyOptions,
    sink: Arc<dyn ProgressSink>,
    cancel: CancellationToken,
) -> Result<SowRun, SowError> {
    SowAssembler::new(client, session.clone(), options)
        .with_sink(sink)
        .with_cancellation(cancel)
        .assemble(request)
        .await
}
