use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use log::info;
use serde::Serialize;

use erd_data::data::convert::{self, ValueConverter};
use erd_data::data::{
    match_strs_to_elements, parse_file, Element, IsotopeChoices, IsotopeTable, ParseOptions,
};

#[derive(Parser)]
#[command(
    name = "erd-data",
    about = "Inspect ToF-ERD data files and isotope tables",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Standard mass, most common isotope and selectable isotopes of elements
    Isotopes(IsotopesArgs),

    /// Parse columns from a delimited text file
    Columns(ColumnsArgs),

    /// Match labels to elements
    Match(MatchArgs),
}

#[derive(Args)]
struct IsotopesArgs {
    /// Isotope table (masses.dat)
    #[arg(short, long, value_name = "FILE", env = "ERD_MASSES_FILE")]
    masses: PathBuf,

    /// Print JSON instead of text
    #[arg(long)]
    json: bool,

    /// Element symbols, e.g. H He C
    #[arg(required = true)]
    symbols: Vec<String>,
}

#[derive(Args)]
struct ColumnsArgs {
    /// Input file
    file: PathBuf,

    /// Column index to read, repeatable
    #[arg(short, long = "column", value_name = "IDX", required = true)]
    columns: Vec<usize>,

    /// Converter per column (int, float, str, bool, auto); defaults to auto
    #[arg(short = 't', long = "type", value_name = "TYPE")]
    types: Vec<String>,

    /// Column separator (whitespace if omitted)
    #[arg(short, long, value_name = "SEP")]
    separator: Option<String>,

    /// Lines to skip from the start of the file
    #[arg(long, value_name = "N", default_value = "0")]
    skip: usize,

    /// Print JSON instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct MatchArgs {
    /// Known element, e.g. 12C or "Si 0.5", repeatable
    #[arg(short, long = "element", value_name = "ELEMENT", required = true)]
    elements: Vec<String>,

    /// Only match full isotope names, not bare symbols
    #[arg(long)]
    exact: bool,

    /// Labels to match
    #[arg(required_unless_present = "labels_file")]
    labels: Vec<String>,

    /// Read the labels from a column of this file instead
    #[arg(long, value_name = "FILE", conflicts_with = "labels")]
    labels_file: Option<PathBuf>,

    /// Column of --labels-file holding the labels
    #[arg(long, value_name = "IDX", default_value = "0")]
    label_column: usize,

    /// Lines to skip from the start of --labels-file
    #[arg(long, value_name = "N", default_value = "0")]
    skip: usize,
}

#[derive(Serialize)]
struct IsotopeReport {
    symbol: String,
    standard_mass: f64,
    most_common: Option<(i64, f64)>,
    choices: IsotopeChoices,
}

fn main() -> Result<()> {
    env_logger::init();

    match Cli::parse().command {
        Command::Isotopes(args) => isotopes(args),
        Command::Columns(args) => columns(args),
        Command::Match(args) => match_labels(args),
    }
}

fn isotopes(args: IsotopesArgs) -> Result<()> {
    let table = IsotopeTable::from_path(&args.masses)
        .with_context(|| format!("loading isotopes from {}", args.masses.display()))?;

    let mut reports = Vec::with_capacity(args.symbols.len());
    for symbol in &args.symbols {
        let standard_mass = table
            .get_standard_isotope(symbol)
            .with_context(|| format!("standard mass of {symbol}"))?;
        let most_common = if table.isotopes(symbol).is_empty() {
            None
        } else {
            Some(
                table
                    .get_most_common_isotope(symbol)
                    .with_context(|| format!("most common isotope of {symbol}"))?,
            )
        };
        let choices = table.isotope_choices(symbol, None)?;
        reports.push(IsotopeReport {
            symbol: symbol.clone(),
            standard_mass,
            most_common,
            choices,
        });
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
        return Ok(());
    }

    for report in &reports {
        println!("{}", report.symbol);
        println!("  standard mass: {:.5}", report.standard_mass);
        match report.most_common {
            Some((mass_number, abundance)) => {
                println!("  most common:   {mass_number} ({abundance}%)")
            }
            None => println!("  most common:   unknown element"),
        }
        for (mass, abundance) in &report.choices.items {
            println!("    {mass:>6}  {abundance}%");
        }
    }
    Ok(())
}

fn columns(args: ColumnsArgs) -> Result<()> {
    let converters: Vec<ValueConverter> = if args.types.is_empty() {
        vec![convert::auto as ValueConverter; args.columns.len()]
    } else {
        args.types
            .iter()
            .map(|name| {
                convert::by_name(name).with_context(|| format!("unknown column type '{name}'"))
            })
            .collect::<Result<_>>()?
    };

    let mut options = ParseOptions::default().with_skip_lines(args.skip);
    if let Some(sep) = args.separator {
        options = options.with_separator(sep);
    }

    let table = parse_file(&args.file, &args.columns, &converters, &options)
        .with_context(|| format!("parsing {}", args.file.display()))?;
    info!("{} rows read from {}", table.len(), args.file.display());

    if args.json {
        println!("{}", serde_json::to_string_pretty(&table)?);
        return Ok(());
    }

    for row in 0..table.len() {
        let cells: Vec<String> = table
            .columns()
            .iter()
            .map(|column| column[row].to_string())
            .collect();
        println!("{}", cells.join("\t"));
    }
    Ok(())
}

fn match_labels(args: MatchArgs) -> Result<()> {
    let elements = args
        .elements
        .iter()
        .map(|s| Element::from_string(s))
        .collect::<Result<Vec<_>, _>>()
        .context("reading --element values")?;

    let labels: Vec<String> = match &args.labels_file {
        Some(path) => {
            let options = ParseOptions::default().with_skip_lines(args.skip);
            let converters = [convert::string as ValueConverter];
            let table = parse_file(path, &[args.label_column], &converters, &options)
                .with_context(|| format!("reading labels from {}", path.display()))?;
            table
                .into_columns()
                .into_iter()
                .flatten()
                .filter_map(|value| value.as_str().map(str::to_string))
                .collect()
        }
        None => args.labels,
    };

    for (label, found) in match_strs_to_elements(&labels, &elements, !args.exact) {
        match found {
            Some(elem) => println!("{label}\t{elem}"),
            None => println!("{label}\t-"),
        }
    }
    Ok(())
}
