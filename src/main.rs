//! datasheet - Load, sort, format and aggregate delimited data from the command line

mod cli;
mod config;

use anyhow::{Context, bail};
use datasheet_core::{Grid, SortOrder};
use std::env;
use tracing_subscriber::EnvFilter;

use cli::Args;

fn init_tracing(verbose: bool) {
    let from_env = env::var("RUST_LOG").is_ok();
    if !verbose && !from_env {
        return;
    }
    let filter = if from_env {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::new("debug")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let args: Vec<String> = env::args().skip(1).collect();
    let args = match cli::parse_args(&args) {
        Ok(Some(args)) => args,
        Ok(None) => {
            cli::print_usage();
            return;
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            cli::print_usage();
            std::process::exit(1);
        }
    };

    init_tracing(args.verbose);

    if let Err(e) = run(args) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    let (config, warnings) = if args.no_config {
        (config::Config::default(), Vec::new())
    } else {
        config::load_config(args.config.as_deref())
    };
    for warning in warnings {
        eprintln!("Warning: {}", warning);
    }

    let mut csv = config.csv;
    if args.header {
        csv = csv.with_column_names(true);
    }
    if let Some(delimiter) = args.delimiter {
        csv = csv.with_delimiter(delimiter);
    }
    if let Some(encoding) = &args.encoding {
        csv = csv.with_encoding(encoding);
    }
    if args.raw {
        csv = csv.with_raw_values(true);
    }

    let mut grid = Grid::load_with_options(&args.file, &csv, config.format)
        .with_context(|| format!("failed to load {}", args.file.display()))?;
    tracing::info!(
        rows = grid.row_count(),
        columns = grid.column_count(),
        "loaded grid"
    );

    for spec in &args.types {
        let Some(column) = spec.column.resolve(&grid) else {
            bail!("--type: no column {}", spec.column);
        };
        grid.set_cell_type_for_column(column, spec.cell_type);
    }

    for spec in &args.aggregates {
        if !spec.apply(&mut grid) {
            eprintln!(
                "Warning: aggregate target ({}, {}) is outside the grid",
                spec.column, spec.row
            );
        }
    }

    if !args.sort.is_empty() {
        let columns = args
            .sort
            .iter()
            .map(|column| {
                column
                    .resolve(&grid)
                    .with_context(|| format!("--sort: no column {}", column))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;
        let order = if args.descending {
            SortOrder::Descending
        } else {
            SortOrder::Ascending
        };
        let keys: Vec<_> = columns.into_iter().map(|column| (column, order)).collect();
        grid.sort(&keys);
    }

    match &args.output {
        Some(path) => {
            grid.save(path, &csv)
                .with_context(|| format!("failed to save {}", path.display()))?;
            println!("Saved to {}", path.display());
        }
        None => print!("{}", grid),
    }
    Ok(())
}
