//! Score weights for free-text relevance.

use serde::{Deserialize, Serialize};

/// Points awarded by the relevance scorer for each kind of hit.
///
/// The defaults rank a name hit above a description hit, and both above tag
/// and address hits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreWeights {
    /// Name contains the whole term.
    #[serde(default = "default_name_contains")]
    pub name_contains: u32,
    /// Name equals the whole term (on top of `name_contains`).
    #[serde(default = "default_name_exact")]
    pub name_exact: u32,
    /// Per sub-term found in the name.
    #[serde(default = "default_name_subterm")]
    pub name_subterm: u32,
    /// Description contains the whole term.
    #[serde(default = "default_description_contains")]
    pub description_contains: u32,
    /// Per sub-term found in the description.
    #[serde(default = "default_description_subterm")]
    pub description_subterm: u32,
    /// Per tag containing the term or any sub-term.
    #[serde(default = "default_tag")]
    pub tag: u32,
    /// Address contains the whole term.
    #[serde(default = "default_address")]
    pub address: u32,
}

fn default_name_contains() -> u32 {
    10
}

fn default_name_exact() -> u32 {
    5
}

fn default_name_subterm() -> u32 {
    3
}

fn default_description_contains() -> u32 {
    5
}

fn default_description_subterm() -> u32 {
    2
}

fn default_tag() -> u32 {
    3
}

fn default_address() -> u32 {
    2
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            name_contains: default_name_contains(),
            name_exact: default_name_exact(),
            name_subterm: default_name_subterm(),
            description_contains: default_description_contains(),
            description_subterm: default_description_subterm(),
            tag: default_tag(),
            address: default_address(),
        }
    }
}

impl ScoreWeights {
    /// Create weights with the default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the name weights.
    pub fn name(mut self, contains: u32, exact: u32, subterm: u32) -> Self {
        self.name_contains = contains;
        self.name_exact = exact;
        self.name_subterm = subterm;
        self
    }

    /// Set the description weights.
    pub fn description(mut self, contains: u32, subterm: u32) -> Self {
        self.description_contains = contains;
        self.description_subterm = subterm;
        self
    }

    /// Set the per-tag weight.
    pub fn tag(mut self, tag: u32) -> Self {
        self.tag = tag;
        self
    }

    /// Set the address weight.
    pub fn address(mut self, address: u32) -> Self {
        self.address = address;
        self
    }
}
