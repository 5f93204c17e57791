//! Structural description of a compiled contract's callable surface.
//!
//! The rest of the crate only sees [`ContractDescriptor`]; how it was obtained
//! (today: pattern matching over the generated declaration file) stays inside
//! [`extractor`].

pub mod classify;
pub mod discovery;
pub mod extractor;

pub use classify::OperationCatalog;
pub use discovery::{discover, ContractSource};
pub use extractor::{extract, extract_with};

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Value domain of a parameter or return value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "name")]
pub enum SemanticType {
    Number,
    Bytes,
    Boolean,
    Text,
    Void,
    /// A generated type name with no entry in the mapping table, kept verbatim.
    Unknown(String),
}

impl SemanticType {
    /// Map a generated type name onto its semantic domain.
    pub fn from_generated(name: &str) -> Self {
        match name.trim() {
            "bigint" | "number" => SemanticType::Number,
            "Uint8Array" => SemanticType::Bytes,
            "boolean" => SemanticType::Boolean,
            "string" => SemanticType::Text,
            "[]" | "void" | "undefined" => SemanticType::Void,
            other => SemanticType::Unknown(other.to_string()),
        }
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SemanticType::Number => f.write_str("number"),
            SemanticType::Bytes => f.write_str("bytes"),
            SemanticType::Boolean => f.write_str("boolean"),
            SemanticType::Text => f.write_str("text"),
            SemanticType::Void => f.write_str("void"),
            SemanticType::Unknown(name) => write!(f, "unknown<{}>", name),
        }
    }
}

/// Shape of a ledger field, used for display only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "name")]
pub enum LedgerFieldType {
    Counter,
    Bytes,
    Boolean,
    Text,
    Collection,
    Other(String),
}

impl LedgerFieldType {
    pub fn from_generated(name: &str) -> Self {
        let name = name.trim();
        if name.starts_with('{') {
            return LedgerFieldType::Collection;
        }
        match SemanticType::from_generated(name) {
            SemanticType::Number => LedgerFieldType::Counter,
            SemanticType::Bytes => LedgerFieldType::Bytes,
            SemanticType::Boolean => LedgerFieldType::Boolean,
            SemanticType::Text => LedgerFieldType::Text,
            _ => LedgerFieldType::Other(name.to_string()),
        }
    }
}

impl fmt::Display for LedgerFieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LedgerFieldType::Counter => f.write_str("Counter"),
            LedgerFieldType::Bytes => f.write_str("Bytes"),
            LedgerFieldType::Boolean => f.write_str("Boolean"),
            LedgerFieldType::Text => f.write_str("Text"),
            LedgerFieldType::Collection => f.write_str("Collection"),
            LedgerFieldType::Other(name) => f.write_str(name),
        }
    }
}

/// A named, typed positional parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: SemanticType,
}

impl Parameter {
    pub fn new(name: impl Into<String>, ty: SemanticType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// One callable contract entry point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationDescriptor {
    pub name: String,
    pub parameters: Vec<Parameter>,
    pub return_type: SemanticType,
    /// Taken from the configured allow-list, not from the contract itself.
    pub is_read_only: bool,
    pub description: String,
}

impl OperationDescriptor {
    /// `name(a: number, b: text) -> number`
    pub fn signature(&self) -> String {
        let params = self
            .parameters
            .iter()
            .map(|p| format!("{}: {}", p.name, p.ty))
            .join(", ");
        format!("{}({}) -> {}", self.name, params, self.return_type)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractDescriptor {
    pub contract_name: String,
    /// Discovery order; determines menu numbering.
    pub operations: Vec<OperationDescriptor>,
    pub ledger_fields: BTreeMap<String, LedgerFieldType>,
}

impl ContractDescriptor {
    pub fn operation(&self, name: &str) -> Option<&OperationDescriptor> {
        self.operations.iter().find(|op| op.name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}
