//! Named section extraction from one free-text document answer
//!
//! Each section is located independently by a case-insensitive pattern that
//! runs from its heading (or a synonym) to the first following terminator
//! heading, or to the end of the text. Matches may overlap; a section whose
//! heading never appears is left empty.
//!
//! A heading only counts on a line of its own: optional markdown markers or
//! numbering before the word, then end of line or a colon. Heading words in
//! ordinary prose never open or close a section.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::error;

/// Leading `#`, `*`, numbering like `1.` or `2)` and indentation
const HEADING_PREFIX: &str = r"^[\t #*\d.)]*";

/// Closing bold markers, then a colon or end of line
const HEADING_SUFFIX: &str = r"\b[\t *#\r]*(?::[\t *]*|$)";

/// Sections of a generated Statement of Work
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    ExecutiveSummary,
    Objectives,
    Scope,
    Deliverables,
    Timeline,
    Investment,
    Terms,
    NextSteps,
}

impl SectionKind {
    pub const ALL: [SectionKind; 8] = [
        SectionKind::ExecutiveSummary,
        SectionKind::Objectives,
        SectionKind::Scope,
        SectionKind::Deliverables,
        SectionKind::Timeline,
        SectionKind::Investment,
        SectionKind::Terms,
        SectionKind::NextSteps,
    ];

    /// Heading and its synonyms, longest first
    pub fn headings(&self) -> &'static [&'static str] {
        match self {
            SectionKind::ExecutiveSummary => &["Executive Summary"],
            SectionKind::Objectives => &["Project Objectives", "Objectives"],
            SectionKind::Scope => &["Scope of Work", "Scope"],
            SectionKind::Deliverables => &["Deliverables"],
            SectionKind::Timeline => &["Timeline"],
            SectionKind::Investment => &["Investment", "Pricing"],
            SectionKind::Terms => &["Terms"],
            SectionKind::NextSteps => &["Next Steps"],
        }
    }

    /// Headings that end this section; empty means end of text
    pub fn terminators(&self) -> &'static [&'static str] {
        match self {
            SectionKind::ExecutiveSummary => &["Project Objectives", "Objectives", "Scope"],
            SectionKind::Objectives => &["Scope of Work", "Scope", "Deliverables"],
            SectionKind::Scope => &["Deliverables", "Timeline"],
            SectionKind::Deliverables => &["Timeline", "Investment"],
            SectionKind::Timeline => &["Investment", "Terms"],
            SectionKind::Investment => &["Terms", "Next Steps"],
            SectionKind::Terms => &["Next Steps"],
            SectionKind::NextSteps => &[],
        }
    }

    fn pattern(&self) -> String {
        let heading = heading_line(self.headings());
        let terminators = self.terminators();
        if terminators.is_empty() {
            format!(r"(?ims){}(.*)\z", heading)
        } else {
            format!(r"(?ims){}(.*?)(?:{}|\z)", heading, heading_line(terminators))
        }
    }
}

fn heading_line(words: &[&str]) -> String {
    format!("{}(?:{}){}", HEADING_PREFIX, alternation(words), HEADING_SUFFIX)
}

fn alternation(words: &[&str]) -> String {
    words
        .iter()
        .map(|w| regex::escape(w))
        .collect::<Vec<_>>()
        .join("|")
}

static SECTION_PATTERNS: Lazy<Vec<(SectionKind, Option<Regex>)>> = Lazy::new(|| {
    SectionKind::ALL
        .iter()
        .map(|kind| {
            let re = Regex::new(&kind.pattern())
                .map_err(|e| error!(section = ?kind, error = %e, "Section pattern failed to compile"))
                .ok();
            (*kind, re)
        })
        .collect()
});

/// The eight extracted sections; unmatched ones are empty
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SowSections {
    pub executive_summary: String,
    pub objectives: String,
    pub scope: String,
    pub deliverables: String,
    pub timeline: String,
    pub investment: String,
    pub terms: String,
    pub next_steps: String,
}

impl SowSections {
    pub fn get(&self, kind: SectionKind) -> &str {
        match kind {
            SectionKind::ExecutiveSummary => &self.executive_summary,
            SectionKind::Objectives => &self.objectives,
            SectionKind::Scope => &self.scope,
            SectionKind::Deliverables => &self.deliverables,
            SectionKind::Timeline => &self.timeline,
            SectionKind::Investment => &self.investment,
            SectionKind::Terms => &self.terms,
            SectionKind::NextSteps => &self.next_steps,
        }
    }

    fn slot(&mut self, kind: SectionKind) -> &mut String {
        match kind {
            SectionKind::ExecutiveSummary => &mut self.executive_summary,
            SectionKind::Objectives => &mut self.objectives,
            SectionKind::Scope => &mut self.scope,
            SectionKind::Deliverables => &mut self.deliverables,
            SectionKind::Timeline => &mut self.timeline,
            SectionKind::Investment => &mut self.investment,
            SectionKind::Terms => &mut self.terms,
            SectionKind::NextSteps => &mut self.next_steps,
        }
    }

    /// Number of sections that were found
    pub fn found(&self) -> usize {
        SectionKind::ALL
            .iter()
            .filter(|k| !self.get(**k).is_empty())
            .count()
    }
}

/// Split a document answer into its named sections
pub fn extract(raw: &str) -> SowSections {
    let mut sections = SowSections::default();
    for (kind, re) in SECTION_PATTERNS.iter() {
        let Some(re) = re else { continue };
        if let Some(body) = re.captures(raw).and_then(|c| c.get(1)) {
            *sections.slot(*kind) = clean(body.as_str());
        }
    }
    sections
}

/// Trim whitespace, a colon after the heading, and markdown heading markers
/// belonging to the next heading
fn clean(body: &str) -> String {
    body.trim()
        .trim_start_matches(':')
        .trim_end_matches('#')
        .trim()
        .to_string()
}
