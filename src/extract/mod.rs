//! Gene record extraction for selected rows
//!
//! Selected rows are named through the labels table, and for every gene the
//! first raw-table line that contains the gene name as a whole word is kept.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use rayon::prelude::*;

use crate::data::GeneLabels;
use crate::error::{FeatselError, Result};

/// Gene names for the given data rows, in the given order
pub fn genes_for_rows(labels: &GeneLabels, rows: &[usize]) -> Result<Vec<String>> {
    rows.iter()
        .map(|&row| {
            labels
                .gene_for_row(row)
                .map(str::to_string)
                .ok_or_else(|| FeatselError::InvalidLabels {
                    reason: format!("Row {} has no label ({} labels available)", row, labels.len()),
                })
        })
        .collect()
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Whether `line` contains `word` with non-word characters (or the line
/// boundary) on both sides of at least one occurrence.
pub fn contains_word(line: &str, word: &str) -> bool {
    if word.is_empty() {
        return false;
    }

    // occurrences may overlap, so resume one char past each rejected start
    let mut from = 0;
    while let Some(offset) = line[from..].find(word) {
        let start = from + offset;
        let end = start + word.len();
        let before_ok = line[..start].chars().next_back().map_or(true, |c| !is_word_char(c));
        let after_ok = line[end..].chars().next().map_or(true, |c| !is_word_char(c));
        if before_ok && after_ok {
            return true;
        }
        from = start + line[start..].chars().next().map_or(1, char::len_utf8);
    }
    false
}

/// Lines of a raw source table, searched by gene name
#[derive(Debug, Clone)]
pub struct RecordIndex {
    lines: Vec<String>,
}

impl RecordIndex {
    pub fn new(lines: Vec<String>) -> Self {
        Self { lines }
    }

    /// Load every line of a raw table
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let lines = reader.lines().collect::<std::io::Result<Vec<String>>>()?;
        Ok(Self { lines })
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// First line containing `gene` as a whole word
    pub fn first_match(&self, gene: &str) -> Option<&str> {
        self.lines
            .iter()
            .find(|line| contains_word(line, gene))
            .map(String::as_str)
    }
}

/// First matching record for each gene, in gene order.
///
/// Genes without a match contribute nothing; repeated genes repeat their
/// record.
pub fn extract_records(index: &RecordIndex, genes: &[String]) -> Vec<String> {
    let matches: Vec<Option<String>> = genes
        .par_iter()
        .map(|gene| index.first_match(gene).map(str::to_string))
        .collect();

    let mut records = Vec::with_capacity(matches.len());
    for (gene, record) in genes.iter().zip(matches) {
        match record {
            Some(line) => records.push(line),
            None => log::debug!("No record found for gene '{}'", gene),
        }
    }

    let missing = genes.len() - records.len();
    if missing > 0 {
        log::warn!("{} of {} genes have no record in the raw table", missing, genes.len());
    }

    records
}
