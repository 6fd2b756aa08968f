//! Statement of Work assembly
//!
//! [`SowAssembler`] runs the client and service research phases, derives the
//! personalization bundle and pricing, and issues exactly one composition
//! call whose answer becomes the [`SowDocument`].

pub mod assembler;
pub mod error;
pub mod prompt;
pub mod types;

pub use assembler::{assemble_sow, AssemblyOptions, SowAssembler, COMPOSITION_PHASE};
pub use error::SowError;
pub use prompt::composite_prompt;
pub use types::{parse_document, DocumentMetadata, SowDocument, SowRequest, SowRun};
