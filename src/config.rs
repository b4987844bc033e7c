//! The list of run-time source files with their display labels. The
//! subcommands carry built-in lists with the fixed file names of the
//! experiment setup; a JSON5 config file can replace them, which is
//! what makes the loaders testable with arbitrary inputs.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// One run-time input file and the label its samples are tagged with.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourceSpec {
    pub path: PathBuf,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourcesConfig {
    pub sources: Vec<SourceSpec>,
}

/// Returns None if the file does not exist
pub fn try_load_json5_file<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    match std::fs::read_to_string(path) {
        Ok(s) => Ok(Some(json5::from_str(&s).with_context(|| {
            anyhow!("decoding JSON5 from config file {path:?}")
        })?)),
        Err(e) => match e.kind() {
            std::io::ErrorKind::NotFound => Ok(None),
            _ => bail!("loading config file from {path:?}: {e}"),
        },
    }
}

impl SourcesConfig {
    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        Self {
            sources: pairs
                .iter()
                .map(|(path, label)| SourceSpec {
                    path: PathBuf::from(path),
                    label: (*label).to_string(),
                })
                .collect(),
        }
    }

    /// If `path` is given, the file must exist or an error is
    /// returned. Without a `path` the built-in `default` list for the
    /// subcommand is used.
    pub fn load_or_default<P: AsRef<Path>>(
        path: Option<P>,
        default: &[(&str, &str)],
    ) -> Result<Self> {
        if let Some(path) = path {
            let path = path.as_ref();
            try_load_json5_file(path)?
                .ok_or_else(|| anyhow!("config file with specified location {path:?} does not exist"))
        } else {
            Ok(Self::from_pairs(default))
        }
    }
}
