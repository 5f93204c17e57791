//! Line-tagged stdout protocol shared by the CLI and the bridge.
//!
//! Each machine-readable result is one `TAG:payload` line. Anything else on
//! stdout is ignored by the parser.

use crate::session::{BallotTally, ContractAddress};
use crate::{BallotError, Result};
use std::collections::BTreeMap;
use std::fmt;

const CONTRACT_ADDRESS: &str = "CONTRACT_ADDRESS:";
const TOTAL_VOTERS: &str = "TOTAL_VOTERS:";
const CHOICE: &str = "CHOICE_";
const VOTE_SUCCESS: &str = "VOTE_SUCCESS:";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tag {
    ContractAddress(String),
    TotalVoters(u64),
    Choice {
        index: usize,
        label: String,
        count: u64,
    },
    VoteSuccess(String),
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tag::ContractAddress(address) => write!(f, "{}{}", CONTRACT_ADDRESS, address),
            Tag::TotalVoters(n) => write!(f, "{}{}", TOTAL_VOTERS, n),
            Tag::Choice {
                index,
                label,
                count,
            } => write!(f, "{}{}:{}:{}", CHOICE, index, label, count),
            Tag::VoteSuccess(tx_id) => write!(f, "{}{}", VOTE_SUCCESS, tx_id),
        }
    }
}

impl Tag {
    /// Parse one stdout line; untagged lines yield `None`.
    pub fn parse(line: &str) -> Option<Tag> {
        let line = line.trim_end_matches(['\r', '\n']);
        if let Some(rest) = line.strip_prefix(CONTRACT_ADDRESS) {
            return Some(Tag::ContractAddress(rest.trim().to_string()));
        }
        if let Some(rest) = line.strip_prefix(TOTAL_VOTERS) {
            return rest.trim().parse().ok().map(Tag::TotalVoters);
        }
        if let Some(rest) = line.strip_prefix(VOTE_SUCCESS) {
            return Some(Tag::VoteSuccess(rest.trim().to_string()));
        }
        let rest = line.strip_prefix(CHOICE)?;
        let (index, rest) = rest.split_once(':')?;
        // labels may contain ':', the count never does
        let (label, count) = rest.rsplit_once(':')?;
        Some(Tag::Choice {
            index: index.parse().ok()?,
            label: label.to_string(),
            count: count.trim().parse().ok()?,
        })
    }
}

/// Tag lines describing a tally, in output order.
pub fn tally_tags(tally: &BallotTally) -> Vec<Tag> {
    let mut tags = vec![Tag::TotalVoters(tally.total_voters)];
    tags.extend(
        tally
            .choices
            .iter()
            .zip(&tally.vote_counts)
            .enumerate()
            .map(|(index, (label, count))| Tag::Choice {
                index,
                label: label.clone(),
                count: *count,
            }),
    );
    tags
}

/// Everything recognised in one CLI run's stdout.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaggedOutput {
    pub contract_address: Option<String>,
    pub total_voters: Option<u64>,
    pub choices: BTreeMap<usize, (String, u64)>,
    pub vote_tx: Option<String>,
}

impl TaggedOutput {
    pub fn parse(stdout: &str) -> Self {
        let mut output = Self::default();
        for tag in stdout.lines().filter_map(Tag::parse) {
            match tag {
                Tag::ContractAddress(address) => output.contract_address = Some(address),
                Tag::TotalVoters(n) => output.total_voters = Some(n),
                Tag::Choice {
                    index,
                    label,
                    count,
                } => {
                    output.choices.insert(index, (label, count));
                }
                Tag::VoteSuccess(tx_id) => output.vote_tx = Some(tx_id),
            }
        }
        output
    }

    pub fn address(&self) -> Result<ContractAddress> {
        self.contract_address
            .as_deref()
            .ok_or_else(|| missing("CONTRACT_ADDRESS"))
            .and_then(ContractAddress::parse)
    }

    pub fn tx_id(&self) -> Result<&str> {
        self.vote_tx.as_deref().ok_or_else(|| missing("VOTE_SUCCESS"))
    }

    /// Choices ordered by index. Gaps in the indices are an error.
    pub fn tally(&self) -> Result<BallotTally> {
        let total_voters = self.total_voters.ok_or_else(|| missing("TOTAL_VOTERS"))?;
        if let Some((position, index)) = self
            .choices
            .keys()
            .enumerate()
            .find(|(position, index)| position != *index)
        {
            return Err(BallotError::Session(format!(
                "CLI output skipped choice {} (next was {})",
                position, index
            )));
        }
        let (choices, vote_counts) = self.choices.values().cloned().unzip();
        Ok(BallotTally {
            total_voters,
            choices,
            vote_counts,
        })
    }
}

fn missing(tag: &str) -> BallotError {
    BallotError::Session(format!("CLI output has no {} line", tag))
}
