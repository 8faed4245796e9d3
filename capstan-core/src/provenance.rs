//! Tag provenance
//!
//! A tag is release-eligible when its commit is reachable from a staging
//! branch on the remote. The policy is a substring match on branch names,
//! so `staging-2024` qualifies the same as `staging`.

use serde::{Deserialize, Serialize};

/// Which remote branches contain a tag's commit, and whether that makes
/// the tag eligible for release. Computed once per trigger, not persisted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProvenanceResult {
    pub is_eligible: bool,
    pub containing_branches: Vec<String>,
}

impl ProvenanceResult {
    /// Builds a result from the branches containing the tag.
    pub fn from_branches(branches: Vec<String>) -> Self {
        Self {
            is_eligible: is_release_eligible(&branches),
            containing_branches: branches,
        }
    }

    /// The result used when resolution fails: not eligible, no branches.
    pub fn ineligible() -> Self {
        Self::default()
    }
}

/// Release policy: any containing branch whose name includes "staging".
pub fn is_release_eligible(branches: &[String]) -> bool {
    branches.iter().any(|branch| branch.contains("staging"))
}
