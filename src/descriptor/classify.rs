use std::collections::{BTreeMap, BTreeSet};

/// Operation names treated as queries when no configuration overrides them.
///
/// This is a name list, not effect analysis: a mutating circuit with one of
/// these names would still be reported as read-only.
pub const DEFAULT_READ_ONLY: &[&str] = &[
    "get_round",
    "get_total_voters",
    "get_vote_count",
    "get_choice",
    "get_results",
    "has_voted",
];

const DEFAULT_DESCRIPTIONS: &[(&str, &str)] = &[
    ("vote_for", "Cast a vote for one of the ballot choices"),
    ("get_round", "Show the current ballot round"),
    ("get_total_voters", "Show how many identities have voted"),
    ("get_vote_count", "Show the number of votes for a choice"),
    ("get_choice", "Show the label of a choice"),
    ("get_results", "Show the current tally"),
    ("has_voted", "Check whether an identity has already voted"),
    ("increment", "Increment the counter"),
];

/// Read-only allow-list and description table for generated operations.
#[derive(Debug, Clone)]
pub struct OperationCatalog {
    read_only: BTreeSet<String>,
    descriptions: BTreeMap<String, String>,
}

impl Default for OperationCatalog {
    fn default() -> Self {
        Self {
            read_only: DEFAULT_READ_ONLY.iter().map(|s| s.to_string()).collect(),
            descriptions: DEFAULT_DESCRIPTIONS
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

impl OperationCatalog {
    /// Replace the read-only list and merge extra descriptions over the defaults.
    pub fn new(
        read_only: Option<Vec<String>>,
        descriptions: impl IntoIterator<Item = (String, String)>,
    ) -> Self {
        let mut catalog = Self::default();
        if let Some(list) = read_only {
            catalog.read_only = list.into_iter().collect();
        }
        catalog.descriptions.extend(descriptions);
        catalog
    }

    pub fn is_read_only(&self, name: &str) -> bool {
        self.read_only.contains(name)
    }

    pub fn describe(&self, name: &str) -> String {
        match self.descriptions.get(name) {
            Some(text) => text.clone(),
            None => format!("Call the `{}` operation", name),
        }
    }
}
