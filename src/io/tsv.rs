//! Reading and writing delimited tables

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use ndarray::Array2;

use crate::data::ExpressionMatrix;
use crate::error::{FeatselError, Result};
use crate::io::CorrelationResults;

/// How the first column of a table is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdColumn {
    /// Feature ids when the header is one field short or the column holds
    /// any non-numeric value
    #[default]
    Auto,
    /// Always feature ids
    First,
    /// Never feature ids; rows are named by position
    None,
}

/// Cell values read as missing
const MISSING: [&str; 6] = ["", "NA", "N/A", "NaN", "nan", "null"];

fn parse_value(field: &str) -> Option<f64> {
    if MISSING.contains(&field) {
        return Some(f64::NAN);
    }
    field.parse::<f64>().ok()
}

/// Tab if the header line contains one, comma otherwise
fn detect_delimiter(path: &Path) -> Result<u8> {
    let mut reader = BufReader::new(File::open(path)?);
    let mut header_line = String::new();
    reader.read_line(&mut header_line)?;

    if header_line.trim().is_empty() {
        return Err(FeatselError::EmptyData {
            reason: format!("Empty table: {}", path.display()),
        });
    }

    Ok(if header_line.contains('\t') { b'\t' } else { b',' })
}

/// Read an abundance table.
///
/// The first row is the header of sample ids. Depending on `id_column` the
/// first column holds feature ids; otherwise features are named by their
/// 0-based row position.
pub fn read_matrix<P: AsRef<Path>>(path: P, id_column: IdColumn) -> Result<ExpressionMatrix> {
    let path = path.as_ref();
    let delimiter = detect_delimiter(path)?;

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;

    let header: Vec<String> = reader.headers()?.iter().map(|s| s.trim().to_string()).collect();

    let mut rows: Vec<Vec<String>> = Vec::new();
    for record in reader.records() {
        // rows with every cell empty stay, as all-missing features
        let record = record?;
        rows.push(record.iter().map(|s| s.trim().to_string()).collect());
    }

    if rows.is_empty() {
        return Err(FeatselError::EmptyData {
            reason: format!("No rows found in {}", path.display()),
        });
    }

    let n_fields = rows[0].len();
    if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != n_fields) {
        return Err(FeatselError::InvalidTable {
            reason: format!("Row {} has {} columns, expected {}", i + 1, row.len(), n_fields),
        });
    }

    // a header one field short means the first column is an unnamed index
    let unnamed_index = header.len() + 1 == n_fields;
    if !unnamed_index && header.len() != n_fields {
        return Err(FeatselError::InvalidTable {
            reason: format!("Header has {} columns, rows have {}", header.len(), n_fields),
        });
    }

    let has_ids = match id_column {
        IdColumn::First => true,
        IdColumn::None => {
            if unnamed_index {
                return Err(FeatselError::InvalidTable {
                    reason: "Header is one column short of the rows".to_string(),
                });
            }
            false
        }
        IdColumn::Auto => unnamed_index || rows.iter().any(|r| parse_value(&r[0]).is_none()),
    };

    let sample_ids: Vec<String> = if has_ids && !unnamed_index {
        header[1..].to_vec()
    } else {
        header
    };
    let first_value = usize::from(has_ids);
    let n_samples = n_fields - first_value;

    if n_samples == 0 {
        return Err(FeatselError::InvalidTable {
            reason: "Table has no sample columns".to_string(),
        });
    }

    let mut values = Array2::zeros((rows.len(), n_samples));
    let mut feature_ids = Vec::with_capacity(rows.len());
    for (i, row) in rows.iter().enumerate() {
        feature_ids.push(if has_ids { row[0].clone() } else { i.to_string() });

        for (j, field) in row[first_value..].iter().enumerate() {
            values[[i, j]] = parse_value(field).ok_or_else(|| FeatselError::InvalidTable {
                reason: format!("Invalid value '{}' in row {}, column {}", field, i + 1, sample_ids[j]),
            })?;
        }
    }

    log::debug!(
        "Read {} x {} table from {} (feature ids: {})",
        rows.len(),
        n_samples,
        path.display(),
        has_ids
    );

    ExpressionMatrix::new(values, feature_ids, sample_ids)
}

/// Write per-row correlations: `row`, `feature_id`, `correlation`.
/// An undefined correlation is written as an empty field.
pub fn write_correlations<P: AsRef<Path>>(path: P, results: &CorrelationResults) -> Result<()> {
    let mut file = BufWriter::new(File::create(path)?);

    writeln!(file, "row\tfeature_id\tcorrelation")?;
    for i in 0..results.n_rows() {
        let r = results.correlations[i];
        let value = if r == 0.0 {
            "0".to_string()
        } else if r.is_finite() {
            r.to_string()
        } else {
            String::new()
        };
        writeln!(file, "{}\t{}\t{}", results.row_indices[i], results.feature_ids[i], value)?;
    }

    file.flush()?;
    Ok(())
}

/// Write only the selected positions of `results`
pub fn write_selected<P: AsRef<Path>>(path: P, results: &CorrelationResults, selected: &[usize]) -> Result<()> {
    write_correlations(path, &results.subset(selected))
}

/// Read a table written by [`write_correlations`]
pub fn read_correlations<P: AsRef<Path>>(path: P) -> Result<CorrelationResults> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .from_path(path)?;

    let mut row_indices = Vec::new();
    let mut feature_ids = Vec::new();
    let mut correlations = Vec::new();

    for (line, record) in reader.records().enumerate() {
        let record = record?;
        if record.len() < 3 {
            return Err(FeatselError::InvalidTable {
                reason: format!("Correlation row {} has {} columns, expected 3", line + 1, record.len()),
            });
        }

        let row = record[0].trim().parse::<usize>().map_err(|_| FeatselError::InvalidTable {
            reason: format!("Invalid row index '{}'", &record[0]),
        })?;
        let value = parse_value(record[2].trim()).ok_or_else(|| FeatselError::InvalidTable {
            reason: format!("Invalid correlation '{}' for row {}", &record[2], row),
        })?;

        row_indices.push(row);
        feature_ids.push(record[1].trim().to_string());
        correlations.push(value);
    }

    Ok(CorrelationResults::from_scores(row_indices, feature_ids, correlations))
}

/// Write one line per entry
pub fn write_lines<P: AsRef<Path>, S: AsRef<str>>(path: P, lines: &[S]) -> Result<()> {
    let mut file = BufWriter::new(File::create(path)?);
    for line in lines {
        writeln!(file, "{}", line.as_ref())?;
    }
    file.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::round_half_even;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_read_matrix_with_ids() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "gene\ts1\ts2\ts3").unwrap();
        writeln!(file, "TP53\t1.5\t2\tNA").unwrap();
        writeln!(file, "EGFR\t3\t\t4").unwrap();

        let matrix = read_matrix(file.path(), IdColumn::Auto).unwrap();
        assert_eq!(matrix.n_features(), 2);
        assert_eq!(matrix.n_samples(), 3);
        assert_eq!(matrix.feature_ids(), &["TP53", "EGFR"]);
        assert_eq!(matrix.sample_ids(), &["s1", "s2", "s3"]);
        assert_eq!(matrix.n_missing(), 2);
    }

    #[test]
    fn test_read_matrix_numeric_only() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "s1\ts2").unwrap();
        writeln!(file, "1\t2").unwrap();
        writeln!(file, "3\t4").unwrap();

        let matrix = read_matrix(file.path(), IdColumn::Auto).unwrap();
        assert_eq!(matrix.n_samples(), 2);
        assert_eq!(matrix.feature_ids(), &["0", "1"]);
    }

    #[test]
    fn test_read_matrix_unnamed_index() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "s1,s2").unwrap();
        writeln!(file, "10,1,2").unwrap();
        writeln!(file, "11,3,4").unwrap();

        let matrix = read_matrix(file.path(), IdColumn::Auto).unwrap();
        assert_eq!(matrix.feature_ids(), &["10", "11"]);
        assert_eq!(matrix.sample_ids(), &["s1", "s2"]);
        assert_eq!(matrix.values()[[1, 1]], 4.0);
    }

    #[test]
    fn test_read_matrix_keeps_all_missing_row() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "s1\ts2").unwrap();
        writeln!(file, "1\t2").unwrap();
        writeln!(file, "\t").unwrap();
        writeln!(file, "3\t4").unwrap();

        let matrix = read_matrix(file.path(), IdColumn::Auto).unwrap();
        assert_eq!(matrix.n_features(), 3);
        assert_eq!(matrix.feature_ids(), &["0", "1", "2"]);
        assert!(matrix.feature_values(1).iter().all(|x| x.is_nan()));
        assert_eq!(matrix.values()[[2, 0]], 3.0);
    }

    #[test]
    fn test_read_matrix_keeps_id_with_missing_values() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "gene\ts1\ts2").unwrap();
        writeln!(file, "TP53\t1\t2").unwrap();
        writeln!(file, "EGFR\t\t").unwrap();
        writeln!(file, "MYC\t3\t4").unwrap();

        let matrix = read_matrix(file.path(), IdColumn::Auto).unwrap();
        assert_eq!(matrix.feature_ids(), &["TP53", "EGFR", "MYC"]);
        assert_eq!(matrix.n_missing(), 2);
    }

    #[test]
    fn test_read_matrix_forced_id_column() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "id\ts1").unwrap();
        writeln!(file, "7\t2.5").unwrap();

        let matrix = read_matrix(file.path(), IdColumn::First).unwrap();
        assert_eq!(matrix.feature_ids(), &["7"]);
        assert_eq!(matrix.n_samples(), 1);
    }

    #[test]
    fn test_read_matrix_rejects_text_without_ids() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "s1\ts2").unwrap();
        writeln!(file, "TP53\t2").unwrap();

        assert!(read_matrix(file.path(), IdColumn::None).is_err());
    }

    #[test]
    fn test_read_matrix_ragged_rows() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "gene\ts1\ts2").unwrap();
        writeln!(file, "a\t1\t2").unwrap();
        writeln!(file, "b\t1").unwrap();

        assert!(read_matrix(file.path(), IdColumn::Auto).is_err());
    }

    #[test]
    fn test_read_matrix_empty() {
        let file = NamedTempFile::new().unwrap();
        assert!(matches!(
            read_matrix(file.path(), IdColumn::Auto),
            Err(FeatselError::EmptyData { .. })
        ));
    }

    #[test]
    fn test_correlations_written_and_read_back() {
        let results = CorrelationResults::from_scores(
            vec![0, 1, 2],
            vec!["a".into(), "b".into(), "c".into()],
            vec![0.64, f64::NAN, -0.2],
        );
        let file = NamedTempFile::new().unwrap();
        write_correlations(file.path(), &results).unwrap();

        let text = std::fs::read_to_string(file.path()).unwrap();
        assert_eq!(text, "row\tfeature_id\tcorrelation\n0\ta\t0.64\n1\tb\t\n2\tc\t-0.2\n");

        let back = read_correlations(file.path()).unwrap();
        assert_eq!(back.row_indices, vec![0, 1, 2]);
        assert_eq!(back.correlations[0], 0.64);
        assert!(back.correlations[1].is_nan());
    }

    #[test]
    fn test_negative_zero_written_as_zero() {
        let results = CorrelationResults::from_scores(
            vec![0, 1],
            vec!["a".into(), "b".into()],
            vec![round_half_even(-0.001, 2), -0.0],
        );
        let file = NamedTempFile::new().unwrap();
        write_correlations(file.path(), &results).unwrap();

        let text = std::fs::read_to_string(file.path()).unwrap();
        assert_eq!(text, "row\tfeature_id\tcorrelation\n0\ta\t0\n1\tb\t0\n");
    }

    #[test]
    fn test_write_lines() {
        let file = NamedTempFile::new().unwrap();
        write_lines(file.path(), &["TP53", "EGFR"]).unwrap();
        assert_eq!(std::fs::read_to_string(file.path()).unwrap(), "TP53\nEGFR\n");
    }
}
