//! Research-driven additions to the document's objectives, deliverables and scope

use serde::{Deserialize, Serialize};

use super::{collect, rule, PersonalizationBundle, TopicSentence};
use crate::research::{Topic, WeightedResearchSet};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdaptedContent {
    pub objectives: Vec<String>,
    pub deliverables: Vec<String>,
    pub scope_items: Vec<String>,
    pub additional_considerations: Vec<String>,
}

const OBJECTIVES: &[TopicSentence] = &[
    rule(
        Topic::IndustryContext,
        "Address industry-specific challenges identified in our research analysis",
    ),
    rule(
        Topic::CompetitiveAnalysis,
        "Establish competitive advantages through strategic implementation approach",
    ),
    rule(
        Topic::RoiMetrics,
        "Achieve measurable ROI through industry-benchmarked success metrics",
    ),
];

const DELIVERABLES: &[TopicSentence] = &[
    rule(
        Topic::TechnologyLandscape,
        "Technology integration assessment and compatibility analysis",
    ),
    rule(
        Topic::ComplianceRequirements,
        "Compliance framework and regulatory alignment documentation",
    ),
    rule(
        Topic::BestPractices,
        "Best practices implementation guide specific to your industry",
    ),
];

const SCOPE_ITEMS: &[TopicSentence] = &[
    rule(
        Topic::CompanyProfile,
        "Stakeholder analysis and organizational change management",
    ),
    rule(
        Topic::IndustrySpecific,
        "Industry-specific customization and optimization",
    ),
];

const ADDITIONAL_CONSIDERATIONS: &[TopicSentence] = &[
    rule(
        Topic::TechnologyLandscape,
        "Existing technology stack integration requirements",
    ),
    rule(
        Topic::ComplianceRequirements,
        "Regulatory compliance and security considerations",
    ),
];

/// Derive adapted content from the research sets
///
/// The bundle is accepted so callers can chain the two steps; the current
/// tables depend on research alone.
pub fn adapt(
    _bundle: &PersonalizationBundle,
    client: &WeightedResearchSet,
    service: &WeightedResearchSet,
) -> AdaptedContent {
    AdaptedContent {
        objectives: collect(OBJECTIVES, client, service, ""),
        deliverables: collect(DELIVERABLES, client, service, ""),
        scope_items: collect(SCOPE_ITEMS, client, service, ""),
        additional_considerations: collect(ADDITIONAL_CONSIDERATIONS, client, service, ""),
    }
}
