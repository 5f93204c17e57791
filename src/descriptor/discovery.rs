use super::{extract_with, ContractDescriptor, OperationCatalog};
use crate::{BallotError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const SOURCE_EXTENSION: &str = "compact";
const INTERFACE_FILES: &[&str] = &["index.d.cts", "index.d.ts"];

/// A contract source together with its generated interface file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractSource {
    pub name: String,
    pub source_path: PathBuf,
    pub interface_path: PathBuf,
}

impl ContractSource {
    /// Locate the contract in `dir`.
    ///
    /// When several sources are present the first one in lexical order wins
    /// and a warning is logged.
    pub fn locate(dir: &Path) -> Result<Self> {
        let entries = fs::read_dir(dir).map_err(|e| {
            BallotError::Extraction(format!(
                "cannot read contract directory {}: {}",
                dir.display(),
                e
            ))
        })?;

        let mut sources: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.is_file()
                    && path.extension().and_then(|ext| ext.to_str()) == Some(SOURCE_EXTENSION)
            })
            .collect();
        sources.sort();

        let source_path = sources.first().cloned().ok_or_else(|| {
            BallotError::Extraction(format!(
                "no .{} source found in {}",
                SOURCE_EXTENSION,
                dir.display()
            ))
        })?;

        if sources.len() > 1 {
            warn!(
                chosen = %source_path.display(),
                candidates = sources.len(),
                "Multiple contract sources found; using the first in lexical order"
            );
        }

        let name = source_path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .ok_or_else(|| {
                BallotError::Extraction(format!(
                    "contract source {} has no usable file name",
                    source_path.display()
                ))
            })?
            .to_string();

        let generated_dir = dir.join("managed").join(&name).join("contract");
        let interface_path = INTERFACE_FILES
            .iter()
            .map(|file| generated_dir.join(file))
            .find(|path| path.is_file())
            .ok_or_else(|| {
                BallotError::Extraction(format!(
                    "generated interface for `{}` not found under {}",
                    name,
                    generated_dir.display()
                ))
            })?;

        Ok(Self {
            name,
            source_path,
            interface_path,
        })
    }

    pub fn load(&self, catalog: &OperationCatalog) -> Result<ContractDescriptor> {
        let text = fs::read_to_string(&self.interface_path).map_err(|e| {
            BallotError::Extraction(format!(
                "cannot read {}: {}",
                self.interface_path.display(),
                e
            ))
        })?;
        extract_with(&self.name, &text, catalog)
    }
}

/// Locate and extract the contract in `dir`.
pub fn discover(dir: &Path, catalog: &OperationCatalog) -> Result<ContractDescriptor> {
    let source = ContractSource::locate(dir)?;
    info!(
        contract = source.name.as_str(),
        interface = %source.interface_path.display(),
        "Loading contract interface"
    );
    source.load(catalog)
}
