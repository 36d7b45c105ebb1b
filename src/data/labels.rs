//! Row-to-gene labels table

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{FeatselError, Result};

/// How a data row is looked up in the labels table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LabelLookup {
    /// Data row `i` (0-based) is labels row `i` after an optional header
    #[default]
    Position,
    /// Data row `i` is line `i` of the file counted from 1, header included;
    /// row 0 has no label
    LineNumber,
}

/// Gene names for the rows of the matched tables.
///
/// By default row `i` of the labels table (after an optional header) names
/// data row `i` of the RNA and protein tables. The gene name is the first
/// tab-separated field of the line.
#[derive(Debug, Clone)]
pub struct GeneLabels {
    genes: Vec<String>,
    lookup: LabelLookup,
}

impl GeneLabels {
    pub fn new(genes: Vec<String>) -> Self {
        Self {
            genes,
            lookup: LabelLookup::Position,
        }
    }

    /// Read a labels table, skipping the first line when `has_header` is set
    pub fn read<P: AsRef<Path>>(path: P, has_header: bool) -> Result<Self> {
        let genes = read_first_fields(path.as_ref(), usize::from(has_header))?;
        Ok(Self {
            genes,
            lookup: LabelLookup::Position,
        })
    }

    /// Read a labels table for line-number lookup. Every line is kept, so a
    /// header occupies line 1.
    pub fn read_line_numbered<P: AsRef<Path>>(path: P) -> Result<Self> {
        let genes = read_first_fields(path.as_ref(), 0)?;
        Ok(Self {
            genes,
            lookup: LabelLookup::LineNumber,
        })
    }

    pub fn lookup(&self) -> LabelLookup {
        self.lookup
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// Gene name for data row `row`
    pub fn gene_for_row(&self, row: usize) -> Option<&str> {
        let index = match self.lookup {
            LabelLookup::Position => Some(row),
            LabelLookup::LineNumber => row.checked_sub(1),
        };
        index.and_then(|i| self.genes.get(i)).map(String::as_str)
    }
}

fn read_first_fields(path: &Path, skip: usize) -> Result<Vec<String>> {
    let reader = BufReader::new(File::open(path)?);

    let mut genes = Vec::new();
    for line in reader.lines().skip(skip) {
        let line = line?;
        let gene = line.split('\t').next().unwrap_or("").trim();
        genes.push(gene.to_string());
    }

    if genes.is_empty() {
        return Err(FeatselError::EmptyData {
            reason: format!("No rows found in labels table {}", path.display()),
        });
    }

    Ok(genes)
}
