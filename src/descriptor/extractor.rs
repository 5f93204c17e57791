//! Extraction of a [`ContractDescriptor`] from generated declaration text.
//!
//! The compiler emits one declaration file per contract with a fixed layout:
//!
//! ```text
//! export type Circuits<T> = {
//!   vote_for(context: __compactRuntime.CircuitContext<T>, index_0: bigint): __compactRuntime.CircuitResults<T, []>;
//! }
//!
//! export type Ledger = {
//!   readonly round: bigint;
//!   voters: { isEmpty(): boolean; ... };
//! }
//! ```
//!
//! Only that layout is understood. If either block is missing the extraction
//! fails instead of guessing.

use super::{
    ContractDescriptor, LedgerFieldType, OperationCatalog, OperationDescriptor, Parameter,
    SemanticType,
};
use crate::{BallotError, Result};
use regex::Regex;
use std::collections::{BTreeMap, HashSet};
use std::sync::OnceLock;
use tracing::debug;

const CIRCUITS_MARKER: &str = "export type Circuits<T> = {";
const LEDGER_MARKER: &str = "export type Ledger = {";
const DEFAULT_CONTRACT_NAME: &str = "contract";

fn circuit_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"(?s)^([A-Za-z_$][\w$]*)\s*\((.*)\)\s*:\s*__compactRuntime\.CircuitResults<\s*T\s*,\s*(.*)>$",
        )
        .expect("circuit pattern is valid")
    })
}

fn ledger_member_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?s)^(?:readonly\s+)?([A-Za-z_$][\w$]*)\s*:\s*(.+)$")
            .expect("ledger member pattern is valid")
    })
}

fn generated_suffix() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"_\d+$").expect("suffix pattern is valid"))
}

/// Extract a descriptor using the default operation catalog.
pub fn extract(text: &str) -> Result<ContractDescriptor> {
    extract_with(DEFAULT_CONTRACT_NAME, text, &OperationCatalog::default())
}

/// Extract a descriptor for `contract_name` using `catalog` for read-only
/// classification and descriptions.
pub fn extract_with(
    contract_name: &str,
    text: &str,
    catalog: &OperationCatalog,
) -> Result<ContractDescriptor> {
    let circuits = block_body(text, CIRCUITS_MARKER).ok_or_else(|| {
        BallotError::Extraction(format!(
            "no operation block (`{}`) found in generated interface",
            CIRCUITS_MARKER
        ))
    })?;
    let ledger = block_body(text, LEDGER_MARKER).ok_or_else(|| {
        BallotError::Extraction(format!(
            "no ledger block (`{}`) found in generated interface",
            LEDGER_MARKER
        ))
    })?;

    let operations = parse_operations(circuits, catalog)?;
    let ledger_fields = parse_ledger(ledger);

    debug!(
        contract = contract_name,
        operations = operations.len(),
        ledger_fields = ledger_fields.len(),
        "Extracted contract descriptor"
    );

    Ok(ContractDescriptor {
        contract_name: contract_name.to_string(),
        operations,
        ledger_fields,
    })
}

fn parse_operations(body: &str, catalog: &OperationCatalog) -> Result<Vec<OperationDescriptor>> {
    let mut seen = HashSet::new();
    let mut operations = Vec::new();

    for member in split_members(body) {
        let Some(caps) = circuit_pattern().captures(&member) else {
            debug!(member = member.as_str(), "Skipping non-circuit member");
            continue;
        };
        let name = caps[1].to_string();
        let mut params = split_top_level(&caps[2], ',').into_iter();

        // The first parameter is always the circuit context.
        if params.next().is_none() {
            debug!(circuit = name.as_str(), "Skipping circuit without context parameter");
            continue;
        }

        let parameters = params
            .map(|raw| parse_parameter(&name, &raw))
            .collect::<Result<Vec<_>>>()?;

        if !seen.insert(name.clone()) {
            return Err(BallotError::Extraction(format!(
                "operation `{}` is declared more than once",
                name
            )));
        }

        operations.push(OperationDescriptor {
            is_read_only: catalog.is_read_only(&name),
            description: catalog.describe(&name),
            return_type: SemanticType::from_generated(&caps[3]),
            parameters,
            name,
        });
    }

    Ok(operations)
}

fn parse_parameter(operation: &str, raw: &str) -> Result<Parameter> {
    let (name, ty) = raw.split_once(':').ok_or_else(|| {
        BallotError::Extraction(format!(
            "parameter `{}` of `{}` has no type annotation",
            raw.trim(),
            operation
        ))
    })?;
    let name = generated_suffix().replace(name.trim(), "").into_owned();
    Ok(Parameter::new(name, SemanticType::from_generated(ty)))
}

fn parse_ledger(body: &str) -> BTreeMap<String, LedgerFieldType> {
    split_members(body)
        .iter()
        .filter_map(|member| {
            let caps = ledger_member_pattern().captures(member)?;
            Some((caps[1].to_string(), LedgerFieldType::from_generated(&caps[2])))
        })
        .collect()
}

/// Text between the marker's opening brace and its matching closing brace.
fn block_body<'a>(text: &'a str, marker: &str) -> Option<&'a str> {
    let start = text.find(marker)? + marker.len();
    let mut depth = 1usize;
    for (offset, ch) in text[start..].char_indices() {
        match ch {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Split a block body into members. A member ends at `;` or a newline when no
/// bracket is open, so multi-line composite types stay in one piece.
fn split_members(body: &str) -> Vec<String> {
    let mut members = Vec::new();
    let mut current = String::new();
    let mut depth = 0i32;

    for ch in body.chars() {
        match ch {
            '{' | '(' | '[' => depth += 1,
            '}' | ')' | ']' => depth -= 1,
            _ => {}
        }
        if depth == 0 && (ch == ';' || ch == '\n') {
            push_member(&mut members, &mut current);
            continue;
        }
        current.push(ch);
    }
    push_member(&mut members, &mut current);
    members
}

fn push_member(members: &mut Vec<String>, current: &mut String) {
    let member = current.trim();
    if !member.is_empty() && !member.starts_with("//") {
        members.push(member.to_string());
    }
    current.clear();
}

/// Split on `separator` outside any bracket pair.
fn split_top_level(text: &str, separator: char) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut depth = 0i32;
    let mut previous = '\0';

    for ch in text.chars() {
        match ch {
            '{' | '(' | '[' | '<' => depth += 1,
            '}' | ')' | ']' => depth -= 1,
            '>' if previous != '=' => depth -= 1,
            _ => {}
        }
        if ch == separator && depth == 0 {
            parts.push(current.trim().to_string());
            current.clear();
        } else {
            current.push(ch);
        }
        previous = ch;
    }
    if !current.trim().is_empty() {
        parts.push(current.trim().to_string());
    }
    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    const COUNTER: &str = r#"
import type * as __compactRuntime from '@midnight-ntwrk/compact-runtime';

export type Circuits<T> = {
  get_round(context: __compactRuntime.CircuitContext<T>): __compactRuntime.CircuitResults<T, bigint>;
  vote_for(context: __compactRuntime.CircuitContext<T>, index_0: bigint): __compactRuntime.CircuitResults<T, []>;
}

export type Ledger = {
  readonly round: bigint;
  readonly votesA: bigint;
}
"#;

    #[test]
    fn test_extracts_operations_in_source_order() {
        let descriptor = extract(COUNTER).unwrap();
        let names: Vec<_> = descriptor.operations.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["get_round", "vote_for"]);
    }

    #[test]
    fn test_strips_context_and_generated_suffix() {
        let descriptor = extract(COUNTER).unwrap();
        let vote = descriptor.operation("vote_for").unwrap();
        assert_eq!(vote.parameters, vec![Parameter::new("index", SemanticType::Number)]);
        assert_eq!(vote.return_type, SemanticType::Void);
        assert!(!vote.is_read_only);

        let round = descriptor.operation("get_round").unwrap();
        assert!(round.parameters.is_empty());
        assert_eq!(round.return_type, SemanticType::Number);
        assert!(round.is_read_only);
    }

    #[test]
    fn test_ledger_fields() {
        let descriptor = extract(COUNTER).unwrap();
        assert_eq!(descriptor.ledger_fields.len(), 2);
        assert_eq!(descriptor.ledger_fields["round"], LedgerFieldType::Counter);
        assert_eq!(descriptor.ledger_fields["votesA"], LedgerFieldType::Counter);
    }

    #[test]
    fn test_multiline_collection_field() {
        let text = r#"
export type Circuits<T> = {
}
export type Ledger = {
  voters: {
    isEmpty(): boolean;
    member(elem_0: Uint8Array): boolean;
    [Symbol.iterator](): Iterator<Uint8Array>
  };
  readonly owner: Uint8Array;
}
"#;
        let descriptor = extract(text).unwrap();
        assert!(descriptor.is_empty());
        assert_eq!(descriptor.ledger_fields["voters"], LedgerFieldType::Collection);
        assert_eq!(descriptor.ledger_fields["owner"], LedgerFieldType::Bytes);
    }

    #[test]
    fn test_missing_operation_block_fails() {
        let err = extract("export type Ledger = {\n  readonly round: bigint;\n}\n").unwrap_err();
        assert!(matches!(err, BallotError::Extraction(_)));
    }

    #[test]
    fn test_missing_ledger_block_fails() {
        let text = "export type Circuits<T> = {\n}\n";
        assert!(matches!(extract(text), Err(BallotError::Extraction(_))));
    }

    #[test]
    fn test_duplicate_operation_fails() {
        let text = r#"
export type Circuits<T> = {
  tick(context: __compactRuntime.CircuitContext<T>): __compactRuntime.CircuitResults<T, []>;
  tick(context: __compactRuntime.CircuitContext<T>): __compactRuntime.CircuitResults<T, []>;
}
export type Ledger = {
}
"#;
        assert!(matches!(extract(text), Err(BallotError::Extraction(_))));
    }

    #[test]
    fn test_composite_parameter_types_stay_whole() {
        let text = r#"
export type Circuits<T> = {
  register(context: __compactRuntime.CircuitContext<T>, who_0: { bytes: Uint8Array }, flag_0: boolean, label_0: string): __compactRuntime.CircuitResults<T, boolean>;
}
export type Ledger = {
}
"#;
        let descriptor = extract(text).unwrap();
        let op = descriptor.operation("register").unwrap();
        assert_eq!(op.parameters.len(), 3);
        assert_eq!(
            op.parameters[0].ty,
            SemanticType::Unknown("{ bytes: Uint8Array }".to_string())
        );
        assert_eq!(op.parameters[1].ty, SemanticType::Boolean);
        assert_eq!(op.parameters[2], Parameter::new("label", SemanticType::Text));
        assert_eq!(op.return_type, SemanticType::Boolean);
    }

    #[test]
    fn test_extraction_is_idempotent() {
        assert_eq!(extract(COUNTER).unwrap(), extract(COUNTER).unwrap());
    }

    #[test]
    fn test_other_blocks_are_ignored() {
        let text = format!(
            "export type ImpureCircuits<T> = {{\n  ghost(context: __compactRuntime.CircuitContext<T>): __compactRuntime.CircuitResults<T, []>;\n}}\n{}",
            COUNTER
        );
        let descriptor = extract(&text).unwrap();
        assert!(descriptor.operation("ghost").is_none());
        assert_eq!(descriptor.operations.len(), 2);
    }
}
