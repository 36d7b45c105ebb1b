//! rust_featsel command-line interface

use std::path::{Path, PathBuf};

use clap::Parser;
use log::{info, LevelFilter};

use rust_featsel::cli::{Cli, Commands};
use rust_featsel::prelude::*;
use rust_featsel::{extract_selected, select_correlated, Extraction};

const VERSION: &str = env!("CARGO_PKG_VERSION");

const CORRELATIONS_FILE: &str = "feature_corr.tsv";
const SELECTED_FILE: &str = "corrs_gte5.tsv";
const GENES_FILE: &str = "corrs_gte5_genes.txt";
const PROTEIN_RECORDS_FILE: &str = "train_pro_selected_features.tsv";
const RNA_RECORDS_FILE: &str = "train_rna_select_features.tsv";

fn main() {
    let args: Vec<String> = std::env::args().collect();

    let first_positional = args.iter().skip(1).find(|a| !a.starts_with('-'));
    let subcommands = ["run", "correlate", "select", "extract", "help"];
    let has_subcommand = first_positional.map_or(false, |a| subcommands.contains(&a.as_str()));

    if !has_subcommand {
        if args.iter().any(|a| a == "--help") {
            print_long_help();
        } else if args.iter().any(|a| a == "-h") {
            print_short_help();
        } else if args.iter().any(|a| a == "-V" || a == "--version") {
            println!("rust_featsel {}", VERSION);
        } else {
            print_no_args();
        }
        return;
    }

    let cli = Cli::parse();

    let log_level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp(None)
        .init();

    if cli.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(cli.threads)
            .build_global()
            .ok();
    }

    let result = match cli.command {
        Some(Commands::Run {
            rna,
            protein,
            labels,
            labels_header,
            labels_line_numbers,
            raw_rna,
            raw_pro,
            threshold,
            method,
            decimals,
            median_anchor,
            id_column,
            bins,
            out_dir,
            summary_json,
        }) => parse_params(threshold, &method, decimals, median_anchor, bins).and_then(|mut params| {
            params.correlation.significance = summary_json.is_some();
            run_pipeline(
                &rna,
                &protein,
                &labels,
                label_options(labels_header, labels_line_numbers),
                &raw_rna,
                &raw_pro,
                &params,
                &id_column,
                &out_dir,
                summary_json.as_deref(),
            )
        }),
        Some(Commands::Correlate {
            rna,
            protein,
            output,
            method,
            decimals,
            median_anchor,
            id_column,
            bins,
        }) => parse_params(0.5, &method, decimals, median_anchor, bins)
            .and_then(|params| run_correlate(&rna, &protein, &output, &params, &id_column)),
        Some(Commands::Select {
            input,
            threshold,
            output,
        }) => run_select(&input, threshold, &output),
        Some(Commands::Extract {
            input,
            labels,
            labels_header,
            labels_line_numbers,
            raw_rna,
            raw_pro,
            out_dir,
        }) => run_extract(
            &input,
            &labels,
            label_options(labels_header, labels_line_numbers),
            &raw_rna,
            &raw_pro,
            &out_dir,
        ),
        None => {
            print_no_args();
            return;
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

// ---------------------------------------------------------------------------
// Custom help output
// ---------------------------------------------------------------------------

fn print_no_args() {
    println!("rust_featsel v{}", VERSION);
    println!("Run `rust_featsel -h` for usage or `rust_featsel --help` for detailed information.");
}

fn print_short_help() {
    println!("rust_featsel v{}", VERSION);
    println!();
    println!("Usage: rust_featsel <COMMAND> [OPTIONS]");
    println!();
    println!("Commands:");
    println!("  run        Correlate, select and extract in one pass");
    println!("  correlate  Per-row RNA/protein correlation");
    println!("  select     Keep rows at or above a correlation threshold");
    println!("  extract    Pull raw records for selected rows");
    println!();
    println!("Run `rust_featsel <COMMAND> --help` for command-specific options.");
}

fn print_long_help() {
    println!("rust_featsel v{}", VERSION);
    println!("Feature selection for matched RNA and protein tables");
    println!();
    println!("Usage: rust_featsel <COMMAND> [OPTIONS]");
    println!();
    println!("Commands:");
    println!("  run        Correlate, select and extract in one pass");
    println!("               - median centering and absolute deviation per row");
    println!("               - Pearson or Spearman row correlation");
    println!("               - whole-word record lookup in the raw tables");
    println!("  correlate  Per-row RNA/protein correlation");
    println!("  select     Keep rows at or above a correlation threshold");
    println!("  extract    Pull raw records for selected rows");
    println!();
    println!("Global Options:");
    println!("  -v, --verbose      Enable verbose output");
    println!("      --threads <N>  Worker threads (0 = auto)");
    println!("  -h                 Print short help");
    println!("      --help         Print detailed help");
    println!("  -V, --version      Print version");
    println!();
    println!("Examples:");
    println!("  rust_featsel run -r train_rna_common.tsv -p train_pro_common.tsv \\");
    println!("    -l train_pro_common_labels.tsv --raw-rna train_rna.tsv --raw-pro train_pro.tsv");
    println!();
    println!("  rust_featsel correlate -r rna.tsv -p pro.tsv -o feature_corr.tsv");
    println!("  rust_featsel select -i feature_corr.tsv -t 0.5 -o corrs_gte5.tsv");
}

// ---------------------------------------------------------------------------
// Option parsing
// ---------------------------------------------------------------------------

fn parse_params(
    threshold: f64,
    method: &str,
    decimals: u32,
    median_anchor: bool,
    bins: usize,
) -> Result<SelectionParams> {
    let method = match method {
        "pearson" => CorrelationMethod::Pearson,
        "spearman" => CorrelationMethod::Spearman,
        _ => {
            return Err(FeatselError::InvalidInput {
                reason: format!("Unknown correlation method '{}'. Use 'pearson' or 'spearman'.", method),
            });
        }
    };

    if !threshold.is_finite() {
        return Err(FeatselError::InvalidInput {
            reason: format!("Threshold must be a finite number, got {}", threshold),
        });
    }

    Ok(SelectionParams {
        threshold,
        histogram_bins: bins,
        correlation: CorrelationParams {
            method,
            decimals,
            median_anchor,
            significance: false,
        },
    })
}

/// Labels header flag and lookup mode, as given on the command line
#[derive(Debug, Clone, Copy)]
struct LabelOptions {
    header: bool,
    lookup: LabelLookup,
}

fn label_options(labels_header: bool, labels_line_numbers: bool) -> LabelOptions {
    LabelOptions {
        header: labels_header,
        lookup: if labels_line_numbers {
            LabelLookup::LineNumber
        } else {
            LabelLookup::Position
        },
    }
}

fn load_labels(labels_path: &str, options: LabelOptions) -> Result<GeneLabels> {
    info!("Loading labels from: {}", labels_path);
    match options.lookup {
        LabelLookup::Position => GeneLabels::read(labels_path, options.header),
        LabelLookup::LineNumber => GeneLabels::read_line_numbered(labels_path),
    }
}

fn parse_id_column(id_column: &str) -> Result<IdColumn> {
    match id_column {
        "auto" => Ok(IdColumn::Auto),
        "first" => Ok(IdColumn::First),
        "none" => Ok(IdColumn::None),
        _ => Err(FeatselError::InvalidInput {
            reason: format!("Unknown id column mode '{}'. Use: auto, first, or none", id_column),
        }),
    }
}

fn out_path(out_dir: &str, name: &str) -> PathBuf {
    Path::new(out_dir).join(name)
}

fn load_tables(rna_path: &str, protein_path: &str, id_column: &str) -> Result<(ExpressionMatrix, ExpressionMatrix)> {
    let id_column = parse_id_column(id_column)?;

    info!("Loading RNA table from: {}", rna_path);
    let rna = read_matrix(rna_path, id_column)?;
    info!("  {} rows, {} samples", rna.n_features(), rna.n_samples());

    info!("Loading protein table from: {}", protein_path);
    let protein = read_matrix(protein_path, id_column)?;
    info!("  {} rows, {} samples", protein.n_features(), protein.n_samples());

    Ok((rna, protein))
}

fn write_extraction(extraction: &Extraction, out_dir: &str) -> Result<()> {
    let genes_path = out_path(out_dir, GENES_FILE);
    info!("Writing {} selected genes to: {}", extraction.genes.len(), genes_path.display());
    write_lines(&genes_path, &extraction.genes[..])?;

    let protein_path = out_path(out_dir, PROTEIN_RECORDS_FILE);
    info!(
        "Writing {} protein records to: {}",
        extraction.protein_records.len(),
        protein_path.display()
    );
    write_lines(&protein_path, &extraction.protein_records[..])?;

    let rna_path = out_path(out_dir, RNA_RECORDS_FILE);
    info!("Writing {} RNA records to: {}", extraction.rna_records.len(), rna_path.display());
    write_lines(&rna_path, &extraction.rna_records[..])?;

    Ok(())
}

// ---------------------------------------------------------------------------
// Subcommand implementations
// ---------------------------------------------------------------------------

#[allow(clippy::too_many_arguments)]
fn run_pipeline(
    rna_path: &str,
    protein_path: &str,
    labels_path: &str,
    label_options: LabelOptions,
    raw_rna_path: &str,
    raw_pro_path: &str,
    params: &SelectionParams,
    id_column: &str,
    out_dir: &str,
    summary_json: Option<&str>,
) -> Result<()> {
    let (rna, protein) = load_tables(rna_path, protein_path, id_column)?;

    std::fs::create_dir_all(out_dir)?;

    let (results, selected) = select_correlated(&rna, &protein, params)?;

    let corr_path = out_path(out_dir, CORRELATIONS_FILE);
    info!("Writing correlations to: {}", corr_path.display());
    write_correlations(&corr_path, &results)?;

    let selected_path = out_path(out_dir, SELECTED_FILE);
    info!("Writing {} selected rows to: {}", selected.len(), selected_path.display());
    write_selected(&selected_path, &results, &selected)?;

    let labels = load_labels(labels_path, label_options)?;
    if label_options.lookup == LabelLookup::Position && labels.len() != results.n_rows() {
        log::warn!(
            "Labels table has {} rows, correlation tables have {}",
            labels.len(),
            results.n_rows()
        );
    }

    info!("Loading raw protein table from: {}", raw_pro_path);
    let raw_protein = RecordIndex::read(raw_pro_path)?;
    info!("Loading raw RNA table from: {}", raw_rna_path);
    let raw_rna = RecordIndex::read(raw_rna_path)?;

    let extraction = extract_selected(&results, &selected, &labels, &raw_protein, &raw_rna)?;
    write_extraction(&extraction, out_dir)?;

    let summary = results.summary(params.threshold, params.histogram_bins);
    println!("\n{}", summary);

    if let Some(json_path) = summary_json {
        info!("Writing JSON report to: {}", json_path);
        let report = RunReport {
            summary,
            selected_genes: extraction.genes,
            protein_records: extraction.protein_records.len(),
            rna_records: extraction.rna_records.len(),
            results,
        };
        let file = std::io::BufWriter::new(std::fs::File::create(json_path)?);
        serde_json::to_writer_pretty(file, &report)?;
    }

    info!("Done!");
    Ok(())
}

fn run_correlate(
    rna_path: &str,
    protein_path: &str,
    output_path: &str,
    params: &SelectionParams,
    id_column: &str,
) -> Result<()> {
    let (rna, protein) = load_tables(rna_path, protein_path, id_column)?;

    let results = feature_correlation(&rna, &protein, &params.correlation)?;

    info!("Writing correlations to: {}", output_path);
    write_correlations(output_path, &results)?;

    println!("\n{}", results.summary(params.threshold, params.histogram_bins));
    Ok(())
}

fn run_select(input_path: &str, threshold: f64, output_path: &str) -> Result<()> {
    info!("Loading correlations from: {}", input_path);
    let results = read_correlations(input_path)?;

    let selected = select_features(&results, threshold);
    info!(
        "{} of {} rows have correlation >= {}",
        selected.len(),
        results.n_rows(),
        threshold
    );

    info!("Writing selected rows to: {}", output_path);
    write_selected(output_path, &results, &selected)?;
    Ok(())
}

fn run_extract(
    input_path: &str,
    labels_path: &str,
    label_options: LabelOptions,
    raw_rna_path: &str,
    raw_pro_path: &str,
    out_dir: &str,
) -> Result<()> {
    info!("Loading selected rows from: {}", input_path);
    let results = read_correlations(input_path)?;
    let all_rows: Vec<usize> = (0..results.n_rows()).collect();

    let labels = load_labels(labels_path, label_options)?;

    info!("Loading raw protein table from: {}", raw_pro_path);
    let raw_protein = RecordIndex::read(raw_pro_path)?;
    info!("Loading raw RNA table from: {}", raw_rna_path);
    let raw_rna = RecordIndex::read(raw_rna_path)?;

    std::fs::create_dir_all(out_dir)?;
    let extraction = extract_selected(&results, &all_rows, &labels, &raw_protein, &raw_rna)?;
    write_extraction(&extraction, out_dir)?;

    info!("Done!");
    Ok(())
}
