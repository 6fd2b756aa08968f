//! Session handle for workspace-scoped conversations

use serde::{Deserialize, Serialize};
use std::fmt;

/// Control message that makes the endpoint leave any tool/agent sub-mode
pub const RESET_COMMAND: &str = "/exit";

/// Handle naming the upstream workspace a conversation lives in.
///
/// The endpoint keeps history per workspace, so two concurrent calls on the
/// same session interleave into one conversation. Callers own the handle and
/// pass it explicitly to every call.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Session {
    slug: String,
}

impl Session {
    pub fn new(slug: impl Into<String>) -> Self {
        Self { slug: slug.into() }
    }

    /// Workspace slug used in the request path
    pub fn slug(&self) -> &str {
        &self.slug
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new("main")
    }
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.slug)
    }
}
