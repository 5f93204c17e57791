//! The ballot program executed by the local network.
//!
//! Mirrors the circuits of `contract/ballot.compact`: four fixed choices, one
//! vote per identity, a counter per choice.

use crate::session::{ArgValue, ContractAddress, LedgerSnapshot, LedgerValue};
use crate::{BallotError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

pub const CHOICE_COUNT: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BallotLedger {
    pub round: u64,
    pub total_voters: u64,
    pub choices: Vec<String>,
    pub vote_counts: Vec<u64>,
    /// Hex-encoded voter identities.
    pub voters: BTreeSet<String>,
}

fn failed_assert(message: &str) -> BallotError {
    BallotError::Session(format!("failed assert: {}", message))
}

impl BallotLedger {
    /// Run the constructor with the four choice labels.
    pub fn construct(init_args: &[ArgValue]) -> Result<Self> {
        if init_args.len() != CHOICE_COUNT {
            return Err(BallotError::Validation(format!(
                "a ballot needs exactly {} choices, got {}",
                CHOICE_COUNT,
                init_args.len()
            )));
        }
        let choices = init_args
            .iter()
            .enumerate()
            .map(|(i, arg)| match arg.as_text().map(str::trim) {
                Some(label) if !label.is_empty() => Ok(label.to_string()),
                _ => Err(BallotError::Validation(format!(
                    "choice {} must be a non-empty label",
                    i
                ))),
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            round: 1,
            total_voters: 0,
            choices,
            vote_counts: vec![0; CHOICE_COUNT],
            voters: BTreeSet::new(),
        })
    }

    /// Execute one circuit on behalf of `caller`.
    pub fn call(
        &mut self,
        caller: &[u8; 32],
        operation: &str,
        args: &[ArgValue],
    ) -> Result<Option<ArgValue>> {
        match operation {
            "vote_for" => {
                let index = self.index_arg(operation, args)?;
                let voter = hex::encode(caller);
                if self.voters.contains(&voter) {
                    return Err(failed_assert("voter is already a member of the voters set"));
                }
                self.voters.insert(voter);
                self.vote_counts[index] += 1;
                self.total_voters += 1;
                Ok(None)
            }
            "get_total_voters" => {
                expect_arity(operation, args, 0)?;
                Ok(Some(ArgValue::Number(self.total_voters as i128)))
            }
            "get_vote_count" => {
                let index = self.index_arg(operation, args)?;
                Ok(Some(ArgValue::Number(self.vote_counts[index] as i128)))
            }
            "get_choice" => {
                let index = self.index_arg(operation, args)?;
                Ok(Some(ArgValue::Text(self.choices[index].clone())))
            }
            other => Err(BallotError::Session(format!(
                "contract has no circuit named `{}`",
                other
            ))),
        }
    }

    fn index_arg(&self, operation: &str, args: &[ArgValue]) -> Result<usize> {
        expect_arity(operation, args, 1)?;
        let index = args[0].as_number().ok_or_else(|| {
            BallotError::Session(format!("`{}` expects a numeric choice index", operation))
        })?;
        usize::try_from(index)
            .ok()
            .filter(|i| *i < self.choices.len())
            .ok_or_else(|| failed_assert("choice index out of range"))
    }

    pub fn snapshot(&self, address: &ContractAddress, block_height: u64) -> LedgerSnapshot {
        let mut fields = BTreeMap::new();
        fields.insert("round".to_string(), LedgerValue::Counter(self.round));
        fields.insert(
            "total_voters".to_string(),
            LedgerValue::Counter(self.total_voters),
        );
        fields.insert(
            "choices".to_string(),
            LedgerValue::List(self.choices.iter().cloned().map(LedgerValue::Text).collect()),
        );
        fields.insert(
            "vote_counts".to_string(),
            LedgerValue::List(self.vote_counts.iter().copied().map(LedgerValue::Counter).collect()),
        );
        fields.insert(
            "voters".to_string(),
            LedgerValue::Set(self.voters.len() as u64),
        );
        LedgerSnapshot {
            address: address.clone(),
            block_height,
            fields,
        }
    }
}

fn expect_arity(operation: &str, args: &[ArgValue], expected: usize) -> Result<()> {
    if args.len() != expected {
        return Err(BallotError::Session(format!(
            "`{}` takes {} argument(s), got {}",
            operation,
            expected,
            args.len()
        )));
    }
    Ok(())
}
