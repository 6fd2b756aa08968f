//! Research-driven Statement of Work drafting.
//!
//! The pipeline queries a stateful chat endpoint topic by topic, folds the
//! answers into personalization content and a pricing adjustment, and asks
//! for one composed document whose named sections are then extracted.
//!
//! - [`research`]: topic catalogs and the sequential orchestrator
//! - [`synthesis`]: personalization bundle and adapted content
//! - [`pricing`]: keyword-driven hour adjustment and rate card
//! - [`sections`]: section extraction from the composed answer
//! - [`sow`]: the assembler tying it together
//! - [`workflow`]: phase selection and state files for the CLI

pub mod cli;
pub mod config;
pub mod pricing;
pub mod research;
pub mod sections;
pub mod sow;
pub mod synthesis;
pub mod telemetry;
pub mod workflow;

pub use research::{run_research, Topic, WeightedResearchSet};
pub use sow::{assemble_sow, SowAssembler, SowDocument, SowError, SowRequest, SowRun};
pub use synthesis::synthesize_all;
pub use workflow::{run_sow_workflow, WorkflowConfig};
