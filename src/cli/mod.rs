//! Command-line interface for rust_featsel

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "rust_featsel")]
#[command(version)]
#[command(about = "RNA/protein feature selection by robust per-gene correlation")]
#[command(disable_help_flag = true)]
#[command(disable_version_flag = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Number of threads (0 = auto) [default: 0]
    #[arg(long, global = true, default_value = "0")]
    pub threads: usize,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run correlation, selection and record extraction
    #[command(
        about = "Run correlation, selection and record extraction",
        long_about = "Run the full feature selection pass\n\n\
            Median-centers the RNA and protein tables row by row, correlates the\n\
            absolute deviations of each row, keeps rows at or above the threshold,\n\
            names them through the labels table and extracts the first matching\n\
            record of each gene from the raw protein and RNA tables.",
        after_long_help = "\
Examples:
  rust_featsel run -r train_rna_common.tsv -p train_pro_common.tsv \\
    -l train_pro_common_labels.tsv --raw-rna train_rna.tsv --raw-pro train_pro.tsv

  # Spearman correlation, stricter threshold, JSON report
  rust_featsel run -r rna.tsv -p pro.tsv -l labels.tsv --raw-rna raw_rna.tsv \\
    --raw-pro raw_pro.tsv --method spearman --threshold 0.7 --summary-json report.json"
    )]
    Run {
        /// Matched RNA table
        #[arg(short, long,
            long_help = "Matched RNA table (rows = genes, columns = samples).\n\
                Tab or comma delimited (auto-detected from the header line).")]
        rna: String,

        /// Matched protein table
        #[arg(short, long,
            long_help = "Matched protein table. Row i must describe the same gene as row i\n\
                of the RNA table. Sample columns are matched by header name.")]
        protein: String,

        /// Labels table mapping rows to gene names
        #[arg(short, long,
            long_help = "Labels table. Line i (after the header, if --labels-header)\n\
                names data row i; the gene name is the first tab-separated field.\n\
                With --labels-line-numbers, data row i is line i of the file counted\n\
                from 1 with the header included, and row 0 has no label.")]
        labels: String,

        /// Labels table starts with a header line
        #[arg(long)]
        labels_header: bool,

        /// Look up data row i as line i of the labels file (1-based, header included)
        #[arg(long, conflicts_with = "labels_header")]
        labels_line_numbers: bool,

        /// Raw RNA table to extract selected records from
        #[arg(long)]
        raw_rna: String,

        /// Raw protein table to extract selected records from
        #[arg(long)]
        raw_pro: String,

        /// Minimum correlation for selection [default: 0.5]
        #[arg(short, long, default_value = "0.5")]
        threshold: f64,

        /// Correlation method [default: pearson]
        #[arg(long, default_value = "pearson",
            long_help = "Correlation method.\n\
                pearson:  Pearson correlation (default)\n\
                spearman: Pearson correlation of average ranks")]
        method: String,

        /// Decimal places of reported correlations [default: 2]
        #[arg(long, default_value = "2")]
        decimals: u32,

        /// Add each row's median as an extra sample before centering
        #[arg(long,
            long_help = "Append each row's median as an extra sample column to both tables\n\
                before centering. The column centers to zero, adding a (0, 0) point\n\
                to every row correlation.")]
        median_anchor: bool,

        /// First column handling [default: auto]
        #[arg(long, default_value = "auto",
            long_help = "How the first column of the matched tables is read.\n\
                auto:  feature ids if non-numeric or the header is one field short\n\
                first: always feature ids\n\
                none:  all columns are samples; rows are named by position")]
        id_column: String,

        /// Bins in the correlation histogram [default: 10]
        #[arg(long, default_value = "10")]
        bins: usize,

        /// Output directory [default: .]
        #[arg(short, long, default_value = ".")]
        out_dir: String,

        /// Write a JSON report to this path
        #[arg(long, value_name = "PATH",
            long_help = "Write the summary, selected genes and per-row results as JSON.\n\
                The report also carries t-test p-values and Benjamini-Hochberg\n\
                adjusted p-values, which are only computed when this is set.")]
        summary_json: Option<String>,
    },

    /// Compute per-row correlations only
    #[command(
        long_about = "Compute the per-row correlation of the median-centered, absolute-valued\n\
            RNA and protein tables and write it as a table (row, feature_id, correlation).",
        after_long_help = "\
Examples:
  rust_featsel correlate -r rna.tsv -p pro.tsv -o feature_corr.tsv
  rust_featsel correlate -r rna.tsv -p pro.tsv --method spearman --median-anchor"
    )]
    Correlate {
        /// Matched RNA table
        #[arg(short, long)]
        rna: String,

        /// Matched protein table
        #[arg(short, long)]
        protein: String,

        /// Output file path [default: feature_corr.tsv]
        #[arg(short, long, default_value = "feature_corr.tsv")]
        output: String,

        /// Correlation method [default: pearson]
        #[arg(long, default_value = "pearson")]
        method: String,

        /// Decimal places of reported correlations [default: 2]
        #[arg(long, default_value = "2")]
        decimals: u32,

        /// Add each row's median as an extra sample before centering
        #[arg(long)]
        median_anchor: bool,

        /// First column handling: auto, first, none [default: auto]
        #[arg(long, default_value = "auto")]
        id_column: String,

        /// Bins in the correlation histogram [default: 10]
        #[arg(long, default_value = "10")]
        bins: usize,
    },

    /// Keep rows at or above a correlation threshold
    #[command(
        long_about = "Filter a correlation table, keeping rows whose correlation is at least\n\
            the threshold. Rows with an undefined correlation are dropped.",
        after_long_help = "\
Examples:
  rust_featsel select -i feature_corr.tsv -t 0.5 -o corrs_gte5.tsv"
    )]
    Select {
        /// Correlation table from `correlate`
        #[arg(short, long)]
        input: String,

        /// Minimum correlation [default: 0.5]
        #[arg(short, long, default_value = "0.5")]
        threshold: f64,

        /// Output file path [default: corrs_gte5.tsv]
        #[arg(short, long, default_value = "corrs_gte5.tsv")]
        output: String,
    },

    /// Extract raw records for selected rows
    #[command(
        long_about = "Name every row of a selected correlation table through the labels table\n\
            and write the gene list plus the first whole-word matching record of each\n\
            gene in the raw protein and RNA tables.",
        after_long_help = "\
Examples:
  rust_featsel extract -i corrs_gte5.tsv -l labels.tsv --raw-rna train_rna.tsv --raw-pro train_pro.tsv"
    )]
    Extract {
        /// Selected correlation table from `select`
        #[arg(short, long)]
        input: String,

        /// Labels table mapping rows to gene names
        #[arg(short, long)]
        labels: String,

        /// Labels table starts with a header line
        #[arg(long)]
        labels_header: bool,

        /// Look up data row i as line i of the labels file (1-based, header included)
        #[arg(long, conflicts_with = "labels_header")]
        labels_line_numbers: bool,

        /// Raw RNA table
        #[arg(long)]
        raw_rna: String,

        /// Raw protein table
        #[arg(long)]
        raw_pro: String,

        /// Output directory [default: .]
        #[arg(short, long, default_value = ".")]
        out_dir: String,
    },
}
