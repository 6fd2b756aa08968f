//! Research phases
//!
//! Two fixed catalogs of topical queries are run against the chat endpoint:
//! the client catalog (phase 0) and the service catalog (phase 1). Each run
//! yields a [`WeightedResearchSet`] holding one entry per topic.

pub mod catalog;
pub mod orchestrator;
pub mod types;

pub use catalog::{client_catalog, industry_hint, service_catalog, CatalogError, ResearchCatalog};
pub use orchestrator::{run_research, ResearchFailure, ResearchOrchestrator, ResearchTiming};
pub use types::{PromptTemplate, ResearchResult, ResearchTask, Topic, Weight, WeightedResearchSet};
