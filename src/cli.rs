//! Command-line arguments and the small specs they carry.

use datasheet_core::{CellType, Grid, Operation};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

pub fn print_usage() {
    eprintln!("Usage: datasheet [OPTIONS] <FILE>");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  <FILE>                      Delimited text file to load");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --header                    Treat the first line as column names");
    eprintln!("  -d, --delimiter <C>         Field delimiter (default ','; 'tab' for TSV)");
    eprintln!("  --encoding <LABEL>          File encoding (default utf-8, e.g. windows-1252)");
    eprintln!("  --sort <COLS>               Sort by comma-separated columns (index or name)");
    eprintln!("  --desc                      Sort descending");
    eprintln!("  --type <COL>=<TYPE>         Set a column's type: text, number, percentage,");
    eprintln!("                              currency or date (can be repeated)");
    eprintln!("  --aggregate <C>,<R>=<OP>(<C1>,<R1>,<C2>,<R2>)");
    eprintln!("                              Put SUM, AVG or COUNT over a range into a cell");
    eprintln!("                              (can be repeated)");
    eprintln!("  --raw                       Save stored values instead of formatted ones");
    eprintln!("  -o, --output <FILE>         Save to a delimited file instead of printing");
    eprintln!("  --config <FILE>             Load settings from this TOML file");
    eprintln!("  --no-config                 Ignore the user config file");
    eprintln!("  -v, --verbose               Log debug output to stderr");
    eprintln!("  -h, --help                  Print help");
}

/// A column given by position or by name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ColumnRef {
    Index(usize),
    Name(String),
}

impl ColumnRef {
    pub fn resolve(&self, grid: &Grid) -> Option<usize> {
        match self {
            ColumnRef::Index(index) if *index < grid.column_count() => Some(*index),
            ColumnRef::Index(_) => None,
            ColumnRef::Name(name) => grid
                .column_names()?
                .iter()
                .position(|candidate| candidate == name),
        }
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnRef::Index(index) => write!(f, "{}", index),
            ColumnRef::Name(name) => write!(f, "'{}'", name),
        }
    }
}

impl FromStr for ColumnRef {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err("empty column".to_string());
        }
        Ok(match s.parse::<usize>() {
            Ok(index) => ColumnRef::Index(index),
            Err(_) => ColumnRef::Name(s.to_string()),
        })
    }
}

/// `--type COL=TYPE`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeSpec {
    pub column: ColumnRef,
    pub cell_type: CellType,
}

impl FromStr for TypeSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (column, cell_type) = s
            .rsplit_once('=')
            .ok_or_else(|| format!("expected COL=TYPE, got '{}'", s))?;
        Ok(TypeSpec {
            column: column.parse()?,
            cell_type: cell_type.parse()?,
        })
    }
}

/// `--aggregate C,R=OP(C1,R1,C2,R2)`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AggregateSpec {
    pub column: usize,
    pub row: usize,
    pub operation: Operation,
    pub from_column: usize,
    pub from_row: usize,
    pub to_column: usize,
    pub to_row: usize,
}

impl AggregateSpec {
    pub fn apply(&self, grid: &mut Grid) -> bool {
        if grid.cell(self.column, self.row).is_none() {
            return false;
        }
        grid.set_expression(
            self.column,
            self.row,
            self.operation,
            self.from_column,
            self.from_row,
            self.to_column,
            self.to_row,
        );
        true
    }
}

impl FromStr for AggregateSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || format!("expected C,R=OP(C1,R1,C2,R2), got '{}'", s);
        let (target, call) = s.split_once('=').ok_or_else(malformed)?;
        let [column, row] = indices::<2>(target).ok_or_else(malformed)?;

        let call = call.trim();
        let (operation, range) = call
            .strip_suffix(')')
            .and_then(|call| call.split_once('('))
            .ok_or_else(malformed)?;
        let operation: Operation = operation.parse()?;
        let [from_column, from_row, to_column, to_row] = indices::<4>(range).ok_or_else(malformed)?;

        Ok(AggregateSpec {
            column,
            row,
            operation,
            from_column,
            from_row,
            to_column,
            to_row,
        })
    }
}

fn indices<const N: usize>(list: &str) -> Option<[usize; N]> {
    let parsed: Vec<usize> = list
        .split(',')
        .map(|part| part.trim().parse().ok())
        .collect::<Option<_>>()?;
    parsed.try_into().ok()
}

/// Accepts a single character, `\t` or `tab`.
pub fn parse_delimiter(s: &str) -> Result<char, String> {
    match s {
        "\\t" | "tab" | "TAB" => return Ok('\t'),
        _ => {}
    }
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(format!("delimiter must be a single character, got '{}'", s)),
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Args {
    pub file: PathBuf,
    pub header: bool,
    pub delimiter: Option<char>,
    pub encoding: Option<String>,
    pub sort: Vec<ColumnRef>,
    pub descending: bool,
    pub types: Vec<TypeSpec>,
    pub aggregates: Vec<AggregateSpec>,
    pub raw: bool,
    pub output: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub no_config: bool,
    pub verbose: bool,
}

/// Parse `args` (without the program name). `Ok(None)` means help was asked for.
pub fn parse_args(args: &[String]) -> Result<Option<Args>, String> {
    let mut parsed = Args::default();
    let mut file: Option<PathBuf> = None;

    let mut i = 0;
    while i < args.len() {
        let arg = args[i].as_str();
        let mut value = |name: &str| -> Result<String, String> {
            i += 1;
            args.get(i)
                .cloned()
                .ok_or_else(|| format!("{} requires a value", name))
        };
        match arg {
            "-h" | "--help" => return Ok(None),
            "--header" => parsed.header = true,
            "--desc" => parsed.descending = true,
            "--raw" => parsed.raw = true,
            "--no-config" => parsed.no_config = true,
            "-v" | "--verbose" => parsed.verbose = true,
            "-d" | "--delimiter" => parsed.delimiter = Some(parse_delimiter(&value(arg)?)?),
            "--encoding" => parsed.encoding = Some(value(arg)?),
            "--sort" => {
                parsed.sort = value(arg)?
                    .split(',')
                    .map(str::parse::<ColumnRef>)
                    .collect::<Result<Vec<_>, _>>()?;
            }
            "--type" => parsed.types.push(value(arg)?.parse()?),
            "--aggregate" => parsed.aggregates.push(value(arg)?.parse()?),
            "-o" | "--output" => parsed.output = Some(PathBuf::from(value(arg)?)),
            "--config" => parsed.config = Some(PathBuf::from(value(arg)?)),
            other if other.starts_with('-') && other.len() > 1 => {
                return Err(format!("Unknown option: {}", other));
            }
            other => {
                if file.is_some() {
                    return Err(format!("Unexpected argument: {}", other));
                }
                file = Some(PathBuf::from(other));
            }
        }
        i += 1;
    }

    parsed.file = file.ok_or_else(|| "missing input file".to_string())?;
    Ok(Some(parsed))
}
