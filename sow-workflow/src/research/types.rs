//! Data structures for research phases

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Research topic identifiers
///
/// The first five belong to the client catalog, the last four to the service
/// catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    CompanyProfile,
    IndustryContext,
    TechnologyLandscape,
    CompetitiveAnalysis,
    ComplianceRequirements,
    BestPractices,
    IndustrySpecific,
    RoiMetrics,
    ResourceRequirements,
}

impl Topic {
    pub const CLIENT: [Topic; 5] = [
        Topic::CompanyProfile,
        Topic::IndustryContext,
        Topic::TechnologyLandscape,
        Topic::CompetitiveAnalysis,
        Topic::ComplianceRequirements,
    ];

    pub const SERVICE: [Topic; 4] = [
        Topic::BestPractices,
        Topic::IndustrySpecific,
        Topic::RoiMetrics,
        Topic::ResourceRequirements,
    ];

    /// Stable snake_case id, as used in state files and failure messages
    pub fn as_str(&self) -> &'static str {
        match self {
            Topic::CompanyProfile => "company_profile",
            Topic::IndustryContext => "industry_context",
            Topic::TechnologyLandscape => "technology_landscape",
            Topic::CompetitiveAnalysis => "competitive_analysis",
            Topic::ComplianceRequirements => "compliance_requirements",
            Topic::BestPractices => "best_practices",
            Topic::IndustrySpecific => "industry_specific",
            Topic::RoiMetrics => "roi_metrics",
            Topic::ResourceRequirements => "resource_requirements",
        }
    }

    /// Display label, e.g. `COMPANY PROFILE`
    pub fn label(&self) -> String {
        self.as_str().replace('_', " ").to_uppercase()
    }

    /// Whether the topic is researched about the client rather than the service
    pub fn is_client_topic(&self) -> bool {
        Self::CLIENT.contains(self)
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Qualitative importance of a research result
///
/// Tasks declare `High`, `Medium` or `Low`; `Error` marks failed results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weight {
    High,
    Medium,
    Low,
    Error,
}

impl Weight {
    /// Priority rank, lower first; errors sort last
    pub fn rank(&self) -> u8 {
        match self {
            Weight::High => 0,
            Weight::Medium => 1,
            Weight::Low => 2,
            Weight::Error => 3,
        }
    }
}

impl fmt::Display for Weight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Weight::High => "high",
            Weight::Medium => "medium",
            Weight::Low => "low",
            Weight::Error => "error",
        };
        f.write_str(s)
    }
}

/// Builds the prompt for a topic from `(subject, context)`
pub type PromptTemplate = fn(&str, &str) -> String;

/// Descriptor for one topical query
#[derive(Debug, Clone, Copy)]
pub struct ResearchTask {
    pub topic: Topic,
    pub weight: Weight,
    pub prompt: PromptTemplate,
}

impl ResearchTask {
    pub fn new(topic: Topic, weight: Weight, prompt: PromptTemplate) -> Self {
        Self {
            topic,
            weight,
            prompt,
        }
    }

    /// Render the prompt for this task
    pub fn render(&self, subject: &str, context: &str) -> String {
        (self.prompt)(subject, context)
    }
}

/// Outcome of one research task execution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearchResult {
    pub data: String,
    pub weight: Weight,
    pub timestamp: DateTime<Utc>,
    pub ok: bool,
}

impl ResearchResult {
    pub fn success(data: impl Into<String>, weight: Weight) -> Self {
        Self {
            data: data.into(),
            weight,
            timestamp: Utc::now(),
            ok: true,
        }
    }

    /// Placeholder recorded when a task did not produce an answer
    pub fn failure(data: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            weight: Weight::Error,
            timestamp: Utc::now(),
            ok: false,
        }
    }
}

/// Research results keyed by topic, in execution order
///
/// Holds exactly one entry per requested topic; failed topics keep an
/// error-weighted placeholder instead of being dropped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeightedResearchSet {
    entries: IndexMap<Topic, ResearchResult>,
}

impl WeightedResearchSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the result for `topic`, keeping its original position if it
    /// was already present
    pub fn insert(&mut self, topic: Topic, result: ResearchResult) {
        self.entries.insert(topic, result);
    }

    pub fn get(&self, topic: Topic) -> Option<&ResearchResult> {
        self.entries.get(&topic)
    }

    /// Present and answered successfully
    pub fn is_ok(&self, topic: Topic) -> bool {
        self.get(topic).map_or(false, |r| r.ok)
    }

    /// Answer text for `topic`, only when the topic succeeded
    pub fn ok_data(&self, topic: Topic) -> Option<&str> {
        self.get(topic).filter(|r| r.ok).map(|r| r.data.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Topic, &ResearchResult)> {
        self.entries.iter()
    }

    pub fn topics(&self) -> impl Iterator<Item = Topic> + '_ {
        self.entries.keys().copied()
    }

    pub fn succeeded(&self) -> usize {
        self.entries.values().filter(|r| r.ok).count()
    }

    pub fn failed(&self) -> usize {
        self.len() - self.succeeded()
    }

    /// Entries ordered by weight priority, execution order within a weight
    pub fn by_priority(&self) -> Vec<(Topic, &ResearchResult)> {
        let mut entries: Vec<_> = self.entries.iter().map(|(t, r)| (*t, r)).collect();
        entries.sort_by_key(|(_, r)| r.weight.rank());
        entries
    }
}

impl FromIterator<(Topic, ResearchResult)> for WeightedResearchSet {
    fn from_iter<I: IntoIterator<Item = (Topic, ResearchResult)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
