use super::ContractAddress;
use crate::{BallotError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single public ledger value as reported by the runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum LedgerValue {
    Counter(u64),
    Text(String),
    Bytes(String),
    List(Vec<LedgerValue>),
    /// A set whose members are not disclosed; only its size is.
    Set(u64),
}

/// Queryable state of one contract at one point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerSnapshot {
    pub address: ContractAddress,
    pub block_height: u64,
    pub fields: BTreeMap<String, LedgerValue>,
}

impl LedgerSnapshot {
    /// All scalar counter fields, used to report counters after a transaction.
    pub fn counters(&self) -> BTreeMap<String, u64> {
        self.fields
            .iter()
            .filter_map(|(name, value)| match value {
                LedgerValue::Counter(n) => Some((name.clone(), *n)),
                _ => None,
            })
            .collect()
    }

    fn counter(&self, name: &str) -> Result<u64> {
        match self.fields.get(name) {
            Some(LedgerValue::Counter(n)) => Ok(*n),
            _ => Err(missing_field(name)),
        }
    }

    fn list(&self, name: &str) -> Result<&[LedgerValue]> {
        match self.fields.get(name) {
            Some(LedgerValue::List(items)) => Ok(items),
            _ => Err(missing_field(name)),
        }
    }
}

fn missing_field(name: &str) -> BallotError {
    BallotError::Session(format!("ledger has no `{}` field of the expected shape", name))
}

/// Tally view of a ballot ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BallotTally {
    pub total_voters: u64,
    pub choices: Vec<String>,
    pub vote_counts: Vec<u64>,
}

impl BallotTally {
    pub fn from_snapshot(snapshot: &LedgerSnapshot) -> Result<Self> {
        let total_voters = snapshot.counter("total_voters")?;
        let choices = snapshot
            .list("choices")?
            .iter()
            .map(|value| match value {
                LedgerValue::Text(label) => Ok(label.clone()),
                _ => Err(missing_field("choices")),
            })
            .collect::<Result<Vec<_>>>()?;
        let vote_counts = snapshot
            .list("vote_counts")?
            .iter()
            .map(|value| match value {
                LedgerValue::Counter(n) => Ok(*n),
                _ => Err(missing_field("vote_counts")),
            })
            .collect::<Result<Vec<_>>>()?;

        if choices.len() != vote_counts.len() {
            return Err(BallotError::Session(format!(
                "ledger lists {} choices but {} vote counts",
                choices.len(),
                vote_counts.len()
            )));
        }

        Ok(Self {
            total_voters,
            choices,
            vote_counts,
        })
    }
}
