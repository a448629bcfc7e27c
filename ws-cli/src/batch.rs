//! Batch decompilation driven by a YAML manifest.
//!
//! ```yaml
//! functions:
//!   - kind: system
//!     id: 2
//!     offset: 0x181E
//!     listing: |
//!       RESET
//!       RETURN
//!   - name: model_3
//!     offset: "1900"
//!     alias: system_2_update
//! ```

use serde::Deserialize;
use ws_decompiler::{DecompileError, Options, decompile_listing};
use ws_isa::symbols::{ScriptKind, script_name};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    pub functions: Vec<Entry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Entry {
    name: Option<String>,
    kind: Option<Kind>,
    id: Option<u16>,
    offset: Offset,
    listing: Option<String>,
    alias: Option<String>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
enum Kind {
    System,
    Model,
}

/// Either a YAML integer or a hex string with optional `0x`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Offset {
    Number(u32),
    Text(String),
}

#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error(transparent)]
    Decompile(#[from] DecompileError),
    #[error("alias target {0} is not in the manifest")]
    MissingAlias(String),
    #[error("entry needs exactly one of `listing` or `alias`")]
    Body,
    #[error("invalid offset {0:?}")]
    Offset(String),
}

/// Result of one manifest entry.
#[derive(Debug)]
pub struct Outcome {
    pub name: String,
    pub result: Result<String, BatchError>,
}

impl Manifest {
    pub fn from_yaml(text: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(text)
    }

    /// Decompile every entry. Failures are recorded per entry; the rest
    /// still run.
    pub fn process(&self, options: Options) -> Vec<Outcome> {
        let names: Vec<String> = self
            .functions
            .iter()
            .enumerate()
            .map(|(i, entry)| entry.display_name(i))
            .collect();

        self.functions
            .iter()
            .zip(&names)
            .map(|(entry, name)| {
                let result = entry.run(&names, options);
                match &result {
                    Ok(_) => log::debug!("{name}: ok"),
                    Err(e) => log::warn!("{name}: {e}"),
                }
                Outcome {
                    name: name.clone(),
                    result,
                }
            })
            .collect()
    }
}

impl Entry {
    fn display_name(&self, index: usize) -> String {
        match (&self.name, self.kind, self.id) {
            (Some(name), _, _) => name.clone(),
            (None, Some(Kind::System), Some(id)) => script_name(ScriptKind::System, id),
            (None, Some(Kind::Model), Some(id)) => script_name(ScriptKind::Model, id),
            _ => format!("function_{index}"),
        }
    }

    fn run(&self, names: &[String], options: Options) -> Result<String, BatchError> {
        let offset = self.offset.value()?;
        match (&self.listing, &self.alias) {
            (Some(listing), None) => Ok(decompile_listing(listing, offset, options)?),
            (None, Some(target)) if names.contains(target) => {
                Ok(format!("-- alias of {target} at {offset:04X}"))
            }
            (None, Some(target)) => Err(BatchError::MissingAlias(target.clone())),
            _ => Err(BatchError::Body),
        }
    }
}

impl Offset {
    fn value(&self) -> Result<u32, BatchError> {
        match self {
            Offset::Number(n) => Ok(*n),
            Offset::Text(text) => {
                crate::parse_hex(text).map_err(|_| BatchError::Offset(text.clone()))
            }
        }
    }
}
