//! Notebook model - an ordered list of markdown, code and raw cells

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Cell type as stored in nbformat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellKind {
    Markdown,
    Code,
    /// Raw cells, and any cell type this model does not know about
    #[serde(other)]
    Raw,
}

/// A single notebook cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub kind: CellKind,
    pub source: String,
    /// Source area collapsed in the notebook view
    pub collapsed: bool,
}

impl Cell {
    pub fn markdown(source: &str) -> Self {
        Self {
            kind: CellKind::Markdown,
            source: source.to_string(),
            collapsed: false,
        }
    }

    pub fn code(source: &str) -> Self {
        Self {
            kind: CellKind::Code,
            source: source.to_string(),
            collapsed: false,
        }
    }

    pub fn raw(source: &str) -> Self {
        Self {
            kind: CellKind::Raw,
            source: source.to_string(),
            collapsed: false,
        }
    }

    pub fn collapsed(mut self) -> Self {
        self.collapsed = true;
        self
    }

    /// Number of lines in the cell source (an empty cell has one line)
    pub fn line_count(&self) -> usize {
        self.source.split('\n').count()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Notebook {
    pub cells: Vec<Cell>,
}

// ============================================================================
// nbformat parsing
// ============================================================================

#[derive(Deserialize)]
struct RawNotebook {
    #[serde(default)]
    cells: Vec<RawCell>,
}

#[derive(Deserialize)]
struct RawCell {
    cell_type: CellKind,
    #[serde(default)]
    source: RawSource,
    #[serde(default)]
    metadata: RawMetadata,
}

/// nbformat allows the source as one string or as a list of lines
#[derive(Deserialize)]
#[serde(untagged)]
enum RawSource {
    Text(String),
    Lines(Vec<String>),
}

impl Default for RawSource {
    fn default() -> Self {
        RawSource::Text(String::new())
    }
}

impl RawSource {
    fn into_string(self) -> String {
        match self {
            RawSource::Text(text) => text,
            RawSource::Lines(lines) => lines.concat(),
        }
    }
}

#[derive(Deserialize, Default)]
struct RawMetadata {
    #[serde(default)]
    jupyter: Option<JupyterMetadata>,
}

#[derive(Deserialize, Default)]
struct JupyterMetadata {
    #[serde(default)]
    source_hidden: bool,
}

impl Notebook {
    pub fn new(cells: Vec<Cell>) -> Self {
        Self { cells }
    }

    /// Parse an nbformat 4 `.ipynb` document
    pub fn from_ipynb(json: &str) -> Result<Self> {
        let raw: RawNotebook = serde_json::from_str(json)?;
        let cells = raw
            .cells
            .into_iter()
            .map(|cell| {
                let collapsed = cell
                    .metadata
                    .jupyter
                    .map(|j| j.source_hidden)
                    .unwrap_or(false);
                Cell {
                    kind: cell.cell_type,
                    source: cell.source.into_string(),
                    collapsed,
                }
            })
            .collect();
        Ok(Self { cells })
    }
}
