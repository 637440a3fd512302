//! Program manifest
//!
//! Describes the debuggee's line tables and symbols when no live tracer is
//! attached:
//!
//! ```toml
//! [[files]]
//! path = "app/worker.rb"
//! lines = 40
//! stop_points = [3, 4, 7, 12]
//!
//! [[symbols]]
//! name = "Worker"
//! kind = "class"
//! ```

use serde::{Deserialize, Serialize};
use snare_common::{Error, Result};
use snare_core::{ModuleKind, StaticLineTable, SymbolTable};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestFile {
    pub path: String,
    pub lines: usize,
    #[serde(default)]
    pub stop_points: Vec<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolKind {
    Class,
    Module,
    Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestSymbol {
    pub name: String,
    pub kind: SymbolKind,
    /// Type reported for `value` symbols
    #[serde(default)]
    pub type_name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProgramManifest {
    #[serde(default)]
    pub files: Vec<ManifestFile>,
    #[serde(default)]
    pub symbols: Vec<ManifestSymbol>,
}

impl ProgramManifest {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| Error::Config(format!("Failed to read manifest: {}", e)))?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let manifest: Self = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Failed to parse manifest: {}", e)))?;
        manifest.validate()?;
        Ok(manifest)
    }

    fn validate(&self) -> Result<()> {
        for file in &self.files {
            if let Some(bad) = file
                .stop_points
                .iter()
                .find(|&&line| line == 0 || line > file.lines)
            {
                return Err(Error::Config(format!(
                    "Stop point {} outside 1..={} in {}",
                    bad, file.lines, file.path
                )));
            }
        }
        Ok(())
    }

    pub fn line_table(&self) -> StaticLineTable {
        let mut table = StaticLineTable::new();
        for file in &self.files {
            table.insert(file.path.clone(), file.lines, file.stop_points.iter().copied());
        }
        table
    }

    pub fn symbol_table(&self) -> SymbolTable {
        let mut table = SymbolTable::new();
        for symbol in &self.symbols {
            match symbol.kind {
                SymbolKind::Class => table.insert_module(symbol.name.clone(), ModuleKind::Class),
                SymbolKind::Module => table.insert_module(symbol.name.clone(), ModuleKind::Module),
                SymbolKind::Value => table.insert_value(
                    symbol.name.clone(),
                    symbol.type_name.clone().unwrap_or_else(|| "Object".to_string()),
                ),
            }
        }
        table
    }
}
