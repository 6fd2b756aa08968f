//! Research catalogs: the ordered topic lists queried in each research phase

use crate::research::types::{ResearchTask, Topic, Weight};
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum CatalogError {
    #[error("Catalog '{catalog}' repeats topic {topic}")]
    DuplicateTopic { catalog: String, topic: Topic },

    #[error("Catalog '{catalog}' declares error weight for {topic}")]
    ErrorWeight { catalog: String, topic: Topic },

    #[error("Catalog '{0}' has no tasks")]
    Empty(String),
}

/// Ordered list of research tasks for one phase
#[derive(Debug, Clone)]
pub struct ResearchCatalog {
    phase: usize,
    name: String,
    tasks: Vec<ResearchTask>,
}

impl ResearchCatalog {
    /// Build a validated catalog
    ///
    /// Rejects empty catalogs, repeated topics and tasks declaring the
    /// `error` weight, which is reserved for failed results.
    pub fn new(
        phase: usize,
        name: impl Into<String>,
        tasks: Vec<ResearchTask>,
    ) -> Result<Self, CatalogError> {
        let name = name.into();
        if tasks.is_empty() {
            return Err(CatalogError::Empty(name));
        }

        let mut seen = HashSet::new();
        for task in &tasks {
            if task.weight == Weight::Error {
                return Err(CatalogError::ErrorWeight {
                    catalog: name,
                    topic: task.topic,
                });
            }
            if !seen.insert(task.topic) {
                return Err(CatalogError::DuplicateTopic {
                    catalog: name,
                    topic: task.topic,
                });
            }
        }

        Ok(Self { phase, name, tasks })
    }

    pub fn phase(&self) -> usize {
        self.phase
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tasks(&self) -> &[ResearchTask] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

pub const CLIENT_PHASE: usize = 0;
pub const SERVICE_PHASE: usize = 1;

fn company_profile(client: &str, _service: &str) -> String {
    format!(
        "@agent Research {client}: company size, revenue, key executives, recent news, \
         strategic initiatives, and business model. Focus on current priorities and growth areas."
    )
}

fn industry_context(client: &str, _service: &str) -> String {
    format!(
        "@agent Research {client}'s industry: current trends, digital transformation patterns, \
         common challenges, emerging technologies, and market pressures affecting similar companies."
    )
}

fn technology_landscape(client: &str, service: &str) -> String {
    format!(
        "@agent Research {client}'s technology stack, recent tech investments, digital initiatives, \
         system integrations, and technology partnerships. Focus on {service} readiness."
    )
}

fn competitive_analysis(client: &str, service: &str) -> String {
    format!(
        "@agent Research {client}'s main competitors and their approach to {service}. \
         What competitive advantages could our solution provide?"
    )
}

fn compliance_requirements(client: &str, service: &str) -> String {
    format!(
        "@agent Research regulatory and compliance requirements for {client}'s industry that would \
         impact {service} implementation, data handling, and security."
    )
}

fn best_practices(service: &str, _industry: &str) -> String {
    format!(
        "@agent Research best practices for {service} implementation: methodology, phases, \
         success factors, common pitfalls, and industry standards. Include timeline estimates."
    )
}

fn industry_specific(service: &str, industry: &str) -> String {
    format!(
        "@agent Research {service} implementation specifically for {industry} industry: \
         unique considerations, compliance requirements, and specialized approaches."
    )
}

fn roi_metrics(service: &str, _industry: &str) -> String {
    format!(
        "@agent Research ROI metrics and success measurements for {service} projects: \
         KPIs, benchmarks, and expected outcomes that justify investment."
    )
}

fn resource_requirements(service: &str, _industry: &str) -> String {
    format!(
        "@agent Research typical resource requirements for {service}: team structure, \
         skill sets, tools needed, and role-specific hour estimates."
    )
}

/// Client catalog, queried with `(client name, service label)`
pub fn client_catalog() -> ResearchCatalog {
    ResearchCatalog {
        phase: CLIENT_PHASE,
        name: "Client Research".to_string(),
        tasks: vec![
            ResearchTask::new(Topic::CompanyProfile, Weight::High, company_profile),
            ResearchTask::new(Topic::IndustryContext, Weight::High, industry_context),
            ResearchTask::new(Topic::TechnologyLandscape, Weight::Medium, technology_landscape),
            ResearchTask::new(Topic::CompetitiveAnalysis, Weight::Medium, competitive_analysis),
            ResearchTask::new(Topic::ComplianceRequirements, Weight::Low, compliance_requirements),
        ],
    }
}

/// Service catalog, queried with `(service label, industry hint)`
pub fn service_catalog() -> ResearchCatalog {
    ResearchCatalog {
        phase: SERVICE_PHASE,
        name: "Service Research".to_string(),
        tasks: vec![
            ResearchTask::new(Topic::BestPractices, Weight::High, best_practices),
            ResearchTask::new(Topic::IndustrySpecific, Weight::Medium, industry_specific),
            ResearchTask::new(Topic::RoiMetrics, Weight::Medium, roi_metrics),
            ResearchTask::new(Topic::ResourceRequirements, Weight::High, resource_requirements),
        ],
    }
}

/// Industry hint for the service catalog: first word of the client's
/// industry research, or empty when that topic did not succeed
pub fn industry_hint(client_research: &crate::research::WeightedResearchSet) -> String {
    client_research
        .ok_data(Topic::IndustryContext)
        .and_then(|data| data.split_whitespace().next())
        .unwrap_or_default()
        .to_string()
}
