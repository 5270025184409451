use anyhow::{Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;

use nptaxon_cli::init_logging;
use nptaxon_core::{
    Dataset, StandardizeColumns, TaxonomyConfig, TaxonomyError, TaxonomyProcessor,
};

#[derive(Parser)]
#[command(name = "nptaxon")]
#[command(about = "Fill and canonicalize nurse-practitioner specialty columns")]
struct Args {
    /// Path to custom config file (YAML format)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Debug-level logging (rule hits, per-row decisions)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable timing of each pipeline step
    #[arg(long, global = true)]
    profile: bool,

    /// Prefix written CSV with a UTF-8 BOM
    #[arg(long, global = true)]
    bom: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fill blank specialty values from credentials (two-pass)
    Fill(FillArgs),
    /// Canonicalize a specialty column in place
    Normalize(NormalizeArgs),
    /// Standardize ZIP, street and specialty fields
    Standardize(StandardizeArgs),
    /// Print distinct values and counts of a column
    PrintTypes(PrintTypesArgs),
}

#[derive(ClapArgs)]
struct FillArgs {
    /// Input CSV
    #[arg(long = "in")]
    input: PathBuf,

    /// Output CSV
    #[arg(long = "out")]
    output: PathBuf,

    /// Existing specialty column
    #[arg(long)]
    np_type_col: Option<String>,

    /// Credentials column
    #[arg(long)]
    cred_col: Option<String>,

    /// Column to write the filled value into
    #[arg(long)]
    output_col: Option<String>,

    /// Canonicalize the filled column afterwards ("Other" becomes "Other NP")
    #[arg(long)]
    canonicalize: bool,

    /// Fill rows on the current thread only
    #[arg(long)]
    sequential: bool,

    /// Also write the fill report as JSON
    #[arg(long)]
    report_json: Option<PathBuf>,
}

#[derive(ClapArgs)]
struct NormalizeArgs {
    #[arg(long = "in")]
    input: PathBuf,

    #[arg(long = "out")]
    output: PathBuf,

    /// Column to canonicalize
    #[arg(long, default_value = "NP_Type_filled")]
    np_col: String,
}

#[derive(ClapArgs)]
struct StandardizeArgs {
    #[arg(long = "in")]
    input: PathBuf,

    #[arg(long = "out")]
    output: PathBuf,

    #[arg(long, default_value = "NP_Type")]
    np_col: String,

    #[arg(long, default_value = "ZIP")]
    zip_col: String,

    #[arg(long, default_value = "Street1")]
    street1_col: String,

    #[arg(long, default_value = "Street2")]
    street2_col: String,
}

#[derive(ClapArgs)]
struct PrintTypesArgs {
    #[arg(long = "in")]
    input: PathBuf,

    /// Column name
    #[arg(long, default_value = "NP_Type_filled")]
    col: String,
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    if let Err(e) = run(args) {
        match e.downcast_ref::<TaxonomyError>() {
            Some(TaxonomyError::MissingColumn { .. }) => eprintln!("❌ {e}"),
            _ => eprintln!("❌ Processing failed: {e:#}"),
        }
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let mut config = TaxonomyConfig::load_with_fallback(args.config.as_deref());
    if let Some(config_path) = &args.config {
        info!("📋 Loaded config from: {config_path}");
    } else {
        info!("📋 Using default config");
    }

    // Apply CLI overrides to config
    if args.bom {
        config.output.write_bom = true;
    }

    let mut processor = TaxonomyProcessor::with_profiling(args.profile)?;

    match args.command {
        Command::Fill(fill) => run_fill(&mut processor, &mut config, fill)?,
        Command::Normalize(normalize) => run_normalize(&mut processor, &config, normalize)?,
        Command::Standardize(standardize) => {
            run_standardize(&mut processor, &config, standardize)?
        }
        Command::PrintTypes(print) => {
            let dataset = read_dataset(&print.input, &config)?;
            let report = processor.summarize_column(&dataset, &print.col)?;
            print!("{report}");
        }
    }

    processor.profiler().print_summary();
    Ok(())
}

fn run_fill(
    processor: &mut TaxonomyProcessor,
    config: &mut TaxonomyConfig,
    args: FillArgs,
) -> Result<()> {
    if let Some(col) = args.np_type_col {
        config.columns.specialty = col;
    }
    if let Some(col) = args.cred_col {
        config.columns.credentials = col;
    }
    if let Some(col) = args.output_col {
        config.columns.output = col;
    }
    if args.canonicalize {
        config.canonicalize_output = true;
    }
    if args.sequential {
        config.parallel = false;
    }

    let mut dataset = read_dataset(&args.input, config)?;
    let report = processor.fill_dataset(&mut dataset, config)?;
    write_dataset(&dataset, &args.output, config)?;

    print!("{report}");

    if let Some(path) = &args.report_json {
        report.save_json(path)?;
        println!("💾 Report saved to: {}", path.display());
    }
    Ok(())
}

fn run_normalize(
    processor: &mut TaxonomyProcessor,
    config: &TaxonomyConfig,
    args: NormalizeArgs,
) -> Result<()> {
    let mut dataset = read_dataset(&args.input, config)?;
    let report = processor.canonicalize_column(&mut dataset, &args.np_col)?;
    write_dataset(&dataset, &args.output, config)?;
    print!("{report}");
    Ok(())
}

fn run_standardize(
    processor: &mut TaxonomyProcessor,
    config: &TaxonomyConfig,
    args: StandardizeArgs,
) -> Result<()> {
    let columns = StandardizeColumns {
        specialty: args.np_col,
        zip: args.zip_col,
        street1: args.street1_col,
        street2: args.street2_col,
    };
    let mut dataset = read_dataset(&args.input, config)?;
    let report = processor.standardize_dataset(&mut dataset, &columns, config)?;
    write_dataset(&dataset, &args.output, config)?;
    print!("{report}");
    Ok(())
}

fn read_dataset(path: &Path, config: &TaxonomyConfig) -> Result<Dataset> {
    Dataset::from_path(path, config).with_context(|| format!("Failed reading {}", path.display()))
}

fn write_dataset(dataset: &Dataset, path: &Path, config: &TaxonomyConfig) -> Result<()> {
    dataset
        .write_to_path(path, config.output.write_bom)
        .with_context(|| format!("Failed writing {}", path.display()))?;
    println!("\n💾 Wrote: {}", path.display());
    Ok(())
}
