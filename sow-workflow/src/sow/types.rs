//! Request, document and run types for SOW assembly

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::pricing::PricingAdjustment;
use crate::research::WeightedResearchSet;
use crate::sections::{self, SowSections};
use crate::synthesis::{AdaptedContent, PersonalizationBundle};

/// Words per page used for the page estimate
pub const WORDS_PER_PAGE: usize = 250;

/// What to draft: who for, which service, and the free-text brief
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SowRequest {
    pub subject: String,
    pub service_label: String,
    pub brief: String,
}

impl SowRequest {
    pub fn new(
        subject: impl Into<String>,
        service_label: impl Into<String>,
        brief: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            service_label: service_label.into(),
            brief: brief.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMetadata {
    pub subject: String,
    pub service_label: String,
    pub generated_at: DateTime<Utc>,
    pub word_count: usize,
    pub page_estimate: usize,
}

/// A generated Statement of Work
///
/// `full_content` is the model's answer exactly as received; `sections`
/// holds whatever could be extracted from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SowDocument {
    pub id: Uuid,
    pub full_content: String,
    pub sections: SowSections,
    pub metadata: DocumentMetadata,
}

impl SowDocument {
    pub fn word_count(&self) -> usize {
        self.metadata.word_count
    }
}

/// Build a document from a raw model answer
pub fn parse_document(raw: impl Into<String>, subject: &str, service_label: &str) -> SowDocument {
    let full_content = raw.into();
    let sections = sections::extract(&full_content);
    let word_count = full_content.split_whitespace().count();

    SowDocument {
        id: Uuid::new_v4(),
        sections,
        metadata: DocumentMetadata {
            subject: subject.to_string(),
            service_label: service_label.to_string(),
            generated_at: Utc::now(),
            word_count,
            page_estimate: word_count.div_ceil(WORDS_PER_PAGE),
        },
        full_content,
    }
}

/// Everything produced by one assembly run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SowRun {
    pub document: SowDocument,
    pub bundle: PersonalizationBundle,
    pub adapted: AdaptedContent,
    pub pricing: PricingAdjustment,
    pub client_research: WeightedResearchSet,
    pub service_research: WeightedResearchSet,
}
