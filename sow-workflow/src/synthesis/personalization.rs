//! Personalization bundle: research-gated selling points for the document

use serde::{Deserialize, Serialize};

use super::{answered, collect, rule, TopicSentence};
use crate::research::{Topic, WeightedResearchSet};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalizationBundle {
    pub executive_summary: String,
    pub opportunities: Vec<String>,
    pub risk_mitigation: Vec<String>,
    pub customized_approach: Vec<String>,
    pub success_metrics: Vec<String>,
    /// Empty unless both company profile and resource research answered
    pub pricing_justification: String,
}

const OPPORTUNITIES: &[TopicSentence] = &[
    rule(
        Topic::CompanyProfile,
        "Leverage {subject}'s current initiatives for enhanced project synergy",
    ),
    rule(
        Topic::IndustryContext,
        "Capitalize on industry trends to maximize competitive advantage",
    ),
    rule(
        Topic::TechnologyLandscape,
        "Optimize integration with existing technology investments",
    ),
];

const RISK_MITIGATION: &[TopicSentence] = &[
    rule(
        Topic::ComplianceRequirements,
        "Proactive compliance framework addressing industry-specific requirements",
    ),
    rule(
        Topic::BestPractices,
        "Proven methodology based on industry best practices and lessons learned",
    ),
];

const CUSTOMIZED_APPROACH: &[TopicSentence] = &[
    rule(
        Topic::IndustrySpecific,
        "Industry-specific implementation approach tailored for your sector",
    ),
    rule(
        Topic::CompetitiveAnalysis,
        "Competitive differentiation strategy based on market analysis",
    ),
];

const SUCCESS_METRICS: &[TopicSentence] = &[rule(
    Topic::RoiMetrics,
    "Industry-benchmarked KPIs and ROI tracking aligned with your business objectives",
)];

const PRICING_JUSTIFICATION: &str = "Our pricing reflects the specialized expertise required \
    for your unique requirements, competitive market rates, and value delivered through our \
    research-driven approach.";

fn executive_summary(subject: &str, service_label: &str) -> String {
    format!(
        "This Statement of Work outlines our strategic approach to delivering {service_label} \
         services specifically tailored for {subject}. Based on our comprehensive research \
         analysis, we have identified key opportunities and optimized our methodology to align \
         with your organization's unique requirements, industry context, and strategic objectives."
    )
}

/// Build the personalization bundle from client and service research
pub fn synthesize(
    client: &WeightedResearchSet,
    service: &WeightedResearchSet,
    subject: &str,
    service_label: &str,
) -> PersonalizationBundle {
    let pricing_justification = if answered(client, service, Topic::CompanyProfile)
        && answered(client, service, Topic::ResourceRequirements)
    {
        PRICING_JUSTIFICATION.to_string()
    } else {
        String::new()
    };

    PersonalizationBundle {
        executive_summary: executive_summary(subject, service_label),
        opportunities: collect(OPPORTUNITIES, client, service, subject),
        risk_mitigation: collect(RISK_MITIGATION, client, service, subject),
        customized_approach: collect(CUSTOMIZED_APPROACH, client, service, subject),
        success_metrics: collect(SUCCESS_METRICS, client, service, subject),
        pricing_justification,
    }
}
