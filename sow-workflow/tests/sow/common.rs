//! Common test utilities for SOW workflow tests

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use agent_chat_sdk::{ChatClient, ChatError, Session, RESET_COMMAND};
use async_trait::async_trait;
use sow_workflow::research::{ResearchResult, Topic, Weight, WeightedResearchSet};

/// What the scripted endpoint does with one prompt
#[derive(Debug)]
pub enum Reply {
    Answer(String),
    AnswerAfter(Duration, String),
    Fail(ChatError),
    /// Never answers within any test timeout
    Hang,
}

pub fn answer(text: &str) -> Reply {
    Reply::Answer(text.to_string())
}

type Script = Box<dyn Fn(&str) -> Reply + Send + Sync>;

/// Chat client that answers from a script and records every message
pub struct ScriptedClient {
    script: Script,
    fail_resets: bool,
    calls: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl ScriptedClient {
    pub fn new<F>(script: F) -> Arc<Self>
    where
        F: Fn(&str) -> Reply + Send + Sync + 'static,
    {
        Arc::new(Self::build(script, false))
    }

    /// Like [`ScriptedClient::new`], but every `/exit` fails
    pub fn with_failing_resets<F>(script: F) -> Arc<Self>
    where
        F: Fn(&str) -> Reply + Send + Sync + 'static,
    {
        Arc::new(Self::build(script, true))
    }

    fn build<F>(script: F, fail_resets: bool) -> Self
    where
        F: Fn(&str) -> Reply + Send + Sync + 'static,
    {
        Self {
            script: Box::new(script),
            fail_resets,
            calls: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    /// Every message sent, resets included, in order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Messages other than resets
    pub fn prompts(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|m| m != RESET_COMMAND)
            .collect()
    }

    pub fn reset_count(&self) -> usize {
        self.calls().iter().filter(|m| *m == RESET_COMMAND).count()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChatClient for ScriptedClient {
    async fn chat(&self, _session: &Session, message: &str) -> agent_chat_sdk::Result<String> {
        self.calls.lock().unwrap().push(message.to_string());
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        let _guard = InFlight(&self.in_flight);

        if message == RESET_COMMAND {
            return if self.fail_resets {
                Err(ChatError::Transport("connection reset".to_string()))
            } else {
                Ok("Exited agent mode".to_string())
            };
        }

        match (self.script)(message) {
            Reply::Answer(text) => Ok(text),
            Reply::AnswerAfter(delay, text) => {
                tokio::time::sleep(delay).await;
                Ok(text)
            }
            Reply::Fail(err) => Err(err),
            Reply::Hang => {
                tokio::time::sleep(Duration::from_secs(24 * 3600)).await;
                Ok("far too late".to_string())
            }
        }
    }
}

/// Which topic a catalog prompt asks about
pub fn topic_of(prompt: &str) -> Option<Topic> {
    let markers = [
        ("company size, revenue", Topic::CompanyProfile),
        ("'s industry: current trends", Topic::IndustryContext),
        ("technology stack", Topic::TechnologyLandscape),
        ("main competitors", Topic::CompetitiveAnalysis),
        ("regulatory and compliance requirements", Topic::ComplianceRequirements),
        ("Research best practices for", Topic::BestPractices),
        ("implementation specifically for", Topic::IndustrySpecific),
        ("ROI metrics and success measurements", Topic::RoiMetrics),
        ("typical resource requirements", Topic::ResourceRequirements),
    ];
    markers
        .iter()
        .find(|(marker, _)| prompt.contains(marker))
        .map(|(_, topic)| *topic)
}

pub fn is_composition(prompt: &str) -> bool {
    prompt.starts_with("Create a highly personalized Statement of Work")
}

/// A composed answer containing all eight headings
pub const SAMPLE_SOW: &str = "# Executive Summary
Acme Co will modernise its marketing operations.

## Project Objectives
Lift qualified leads by 30%.

## Scope of Work
Platform configuration, data migration and training.

## Deliverables
Configured platform, migration report, runbooks.

## Timeline
Twelve weeks from kickoff.

## Investment
Tech Sr. Consultant 40h at $295/hr.

## Terms
Net 30.

## Next Steps
Sign the SOW and book the kickoff workshop.
";

/// Research set where every topic answered with `data`
pub fn answered_set(topics: &[Topic], data: &str) -> WeightedResearchSet {
    topics
        .iter()
        .map(|t| (*t, ResearchResult::success(data, Weight::High)))
        .collect()
}
