//! Keyword-driven hour adjustment and the rate card offered to the model

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::research::{Topic, WeightedResearchSet};

const JUSTIFICATION: &str = "Pricing optimized based on complexity analysis, risk assessment, \
    and value alignment from our comprehensive research.";

#[derive(Debug, Error, PartialEq)]
pub enum PricingRuleError {
    #[error("{rule} multiplier must be at least 1.0, got {value}")]
    MultiplierBelowOne { rule: &'static str, value: f64 },

    #[error("{0} rule has an empty keyword")]
    EmptyKeyword(&'static str),
}

/// Multiplier applied when any keyword appears in one topic's research
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordRule {
    pub topic: Topic,
    /// Case-sensitive substrings
    pub keywords: Vec<String>,
    pub multiplier: f64,
}

impl KeywordRule {
    pub fn new(topic: Topic, keywords: &[&str], multiplier: f64) -> Self {
        Self {
            topic,
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            multiplier,
        }
    }

    /// The rule's multiplier if it fires against `research`, else 1.0
    fn factor(&self, research: &WeightedResearchSet) -> f64 {
        let fires = research
            .ok_data(self.topic)
            .map_or(false, |data| self.keywords.iter().any(|k| data.contains(k.as_str())));
        if fires {
            self.multiplier
        } else {
            1.0
        }
    }

    fn validate(&self, name: &'static str) -> Result<(), PricingRuleError> {
        if self.multiplier.is_nan() || self.multiplier < 1.0 {
            return Err(PricingRuleError::MultiplierBelowOne {
                rule: name,
                value: self.multiplier,
            });
        }
        if self.keywords.iter().any(|k| k.is_empty()) {
            return Err(PricingRuleError::EmptyKeyword(name));
        }
        Ok(())
    }
}

/// Pricing signals read from client research
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingRules {
    pub complexity: KeywordRule,
    pub risk: KeywordRule,
    pub value: KeywordRule,
}

impl Default for PricingRules {
    fn default() -> Self {
        Self {
            complexity: KeywordRule::new(Topic::TechnologyLandscape, &["complex", "legacy"], 1.2),
            risk: KeywordRule::new(Topic::ComplianceRequirements, &["strict", "regulated"], 1.15),
            value: KeywordRule::new(Topic::CompanyProfile, &["enterprise", "Fortune"], 1.1),
        }
    }
}

impl PricingRules {
    pub fn validate(&self) -> Result<(), PricingRuleError> {
        self.complexity.validate("complexity")?;
        self.risk.validate("risk")?;
        self.value.validate("value")?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingFactors {
    pub complexity_multiplier: f64,
    pub risk_multiplier: f64,
    pub value_multiplier: f64,
    pub timeline_multiplier: f64,
}

impl Default for PricingFactors {
    fn default() -> Self {
        Self {
            complexity_multiplier: 1.0,
            risk_multiplier: 1.0,
            value_multiplier: 1.0,
            timeline_multiplier: 1.0,
        }
    }
}

impl PricingFactors {
    pub fn total(&self) -> f64 {
        self.complexity_multiplier
            * self.risk_multiplier
            * self.value_multiplier
            * self.timeline_multiplier
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingAdjustment {
    pub base_hours: u32,
    pub optimized_hours: u32,
    pub factors: PricingFactors,
    pub justification: String,
}

/// Scale `base_hours` by the signals found in the client research
///
/// Signals come from the client set only; the service set is accepted for
/// symmetry with the synthesis step and currently unused.
pub fn adjust(
    rules: &PricingRules,
    client: &WeightedResearchSet,
    _service: &WeightedResearchSet,
    base_hours: u32,
) -> PricingAdjustment {
    let factors = PricingFactors {
        complexity_multiplier: rules.complexity.factor(client),
        risk_multiplier: rules.risk.factor(client),
        value_multiplier: rules.value.factor(client),
        timeline_multiplier: 1.0,
    };
    let optimized_hours = (f64::from(base_hours) * factors.total()).round() as u32;

    PricingAdjustment {
        base_hours,
        optimized_hours,
        factors,
        justification: JUSTIFICATION.to_string(),
    }
}

/// One billable role offered to the model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleRate {
    pub role: String,
    pub hourly_rate: u32,
}

/// Ordered role/rate line items
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RateCard {
    pub roles: Vec<RoleRate>,
}

impl Default for RateCard {
    fn default() -> Self {
        let role = |role: &str, hourly_rate| RoleRate {
            role: role.to_string(),
            hourly_rate,
        };
        Self {
            roles: vec![
                role("Tech Sr. Consultant", 295),
                role("Tech Specialist", 180),
                role("Project Coordination", 110),
                role("Account Management", 210),
            ],
        }
    }
}

impl RateCard {
    /// `Tech Sr. Consultant ($295/hr), Tech Specialist ($180/hr), ...`
    pub fn line_items(&self) -> String {
        self.roles
            .iter()
            .map(|r| format!("{} (${}/hr)", r.role, r.hourly_rate))
            .collect::<Vec<_>>()
            .join(", ")
    }
}
