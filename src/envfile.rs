//! `KEY=VALUE` environment file holding the wallet seed and contract address.
//!
//! Reads take a shared lock and writes an exclusive one on a sidecar
//! `.<name>.lock` file, so concurrent CLI runs and bridge requests never
//! interleave a rewrite.

use crate::{logging, BallotError, Result};
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

pub const WALLET_SEED: &str = "WALLET_SEED";
pub const CONTRACT_ADDRESS: &str = "CONTRACT_ADDRESS";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Line {
    /// `raw` is the original text; `None` once the value was changed.
    Pair {
        key: String,
        value: String,
        raw: Option<String>,
    },
    Verbatim(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvFile {
    path: PathBuf,
    lines: Vec<Line>,
}

impl EnvFile {
    /// Load the file; a missing file reads as empty.
    pub fn load(path: &Path) -> Result<Self> {
        let lock = lock_file(path)?;
        lock.lock_shared()?;
        let loaded = Self::read_unlocked(path);
        lock.unlock()?;
        loaded
    }

    pub fn parse(path: &Path, content: &str) -> Result<Self> {
        let lines = content
            .lines()
            .enumerate()
            .map(|(number, raw)| parse_line(raw).map_err(|reason| {
                BallotError::EnvFile(format!("{}:{}: {}", path.display(), number + 1, reason))
            }))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            path: path.to_path_buf(),
            lines,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.lines.iter().rev().find_map(|line| match line {
            Line::Pair { key: k, value, .. } if k == key => Some(value.as_str()),
            _ => None,
        })
    }

    /// Set `key`, keeping every other line as it was.
    pub fn set(&mut self, key: &str, value: &str) {
        let mut replaced = false;
        for line in &mut self.lines {
            if let Line::Pair { key: k, value: v, raw } = line {
                if k == key {
                    *v = value.to_string();
                    *raw = None;
                    replaced = true;
                }
            }
        }
        if !replaced {
            self.lines.push(Line::Pair {
                key: key.to_string(),
                value: value.to_string(),
                raw: None,
            });
        }
    }

    /// File text; untouched lines keep their original spelling.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            match line {
                Line::Pair { raw: Some(text), .. } | Line::Verbatim(text) => out.push_str(text),
                Line::Pair { key, value, raw: None } => {
                    out.push_str(key);
                    out.push('=');
                    out.push_str(value);
                }
            }
            out.push('\n');
        }
        out
    }

    /// Re-read, set `key` and write back under an exclusive lock.
    pub fn upsert(path: &Path, key: &str, value: &str) -> Result<Self> {
        let lock = lock_file(path)?;
        lock.lock_exclusive()?;
        let result = Self::read_unlocked(path).and_then(|mut env| {
            env.set(key, value);
            let tmp = path.with_extension("tmp");
            fs::write(&tmp, env.render())?;
            fs::rename(&tmp, path)?;
            Ok(env)
        });
        lock.unlock()?;
        if result.is_ok() {
            logging::log_env_file_written(&path.to_string_lossy(), key);
        }
        result
    }

    fn read_unlocked(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(content) => Self::parse(path, &content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self {
                path: path.to_path_buf(),
                lines: Vec::new(),
            }),
            Err(e) => Err(BallotError::EnvFile(format!(
                "cannot read {}: {}",
                path.display(),
                e
            ))),
        }
    }
}

fn lock_file(path: &Path) -> Result<File> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| BallotError::EnvFile(format!("{} is not a file path", path.display())))?;
    let lock_path = path.with_file_name(format!(".{}.lock", name));
    if let Some(parent) = lock_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    Ok(OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .open(lock_path)?)
}

fn parse_line(raw: &str) -> std::result::Result<Line, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(Line::Verbatim(raw.to_string()));
    }
    let body = trimmed.strip_prefix("export ").unwrap_or(trimmed);
    let (key, value) = body
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, found `{}`", trimmed))?;
    let key = key.trim();
    if key.is_empty() || !key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(format!("invalid key `{}`", key));
    }
    Ok(Line::Pair {
        key: key.to_string(),
        value: unquote(value.trim()).to_string(),
        raw: Some(raw.to_string()),
    })
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|v| v.strip_suffix(quote))
        {
            return inner;
        }
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_comments_quotes_and_export() {
        let env = EnvFile::parse(
            Path::new(".env"),
            "# wallet\nWALLET_SEED=\"abc\"\n\nexport CONTRACT_ADDRESS='ff01'\n",
        )
        .unwrap();
        assert_eq!(env.get(WALLET_SEED), Some("abc"));
        assert_eq!(env.get(CONTRACT_ADDRESS), Some("ff01"));
        assert_eq!(env.get("MISSING"), None);
    }

    #[test]
    fn test_malformed_line_is_an_error() {
        let err = EnvFile::parse(Path::new(".env"), "WALLET_SEED=a\nnot a pair\n").unwrap_err();
        assert!(err.to_string().contains(".env:2"));
    }

    #[test]
    fn test_upsert_preserves_other_lines() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".env");
        fs::write(&path, "# keep me\nWALLET_SEED=seed\nCONTRACT_ADDRESS=old\n").unwrap();

        EnvFile::upsert(&path, CONTRACT_ADDRESS, "new").unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "# keep me\nWALLET_SEED=seed\nCONTRACT_ADDRESS=new\n");
    }

    #[test]
    fn test_upsert_keeps_export_and_quotes_on_other_lines() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".env");
        let original = "export WALLET_SEED=\"seed # with hash\"\nexport OTHER='x'\n";
        fs::write(&path, original).unwrap();

        EnvFile::upsert(&path, CONTRACT_ADDRESS, "abcd").unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, format!("{}CONTRACT_ADDRESS=abcd\n", original));
        let env = EnvFile::load(&path).unwrap();
        assert_eq!(env.get(WALLET_SEED), Some("seed # with hash"));
        assert_eq!(env.get("OTHER"), Some("x"));
    }

    #[test]
    fn test_upsert_rewrites_only_the_changed_key() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".env");
        fs::write(&path, "WALLET_SEED='s'\nexport CONTRACT_ADDRESS=\"old\"\n").unwrap();

        EnvFile::upsert(&path, CONTRACT_ADDRESS, "ff").unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "WALLET_SEED='s'\nCONTRACT_ADDRESS=ff\n");
    }

    #[test]
    fn test_upsert_creates_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("fresh.env");
        EnvFile::upsert(&path, CONTRACT_ADDRESS, "abcd").unwrap();
        assert_eq!(EnvFile::load(&path).unwrap().get(CONTRACT_ADDRESS), Some("abcd"));
    }
}
