use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use sqint_core::{ColumnValues, ConditionSet, ResultSet, Value};
use sqint_sqlite::{Database, OpenOptions, Session};

/// Output format for result grids and metadata.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliOutputFormat {
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "sqint")]
#[command(about = "Browse and edit SQLite databases")]
struct Cli {
    /// YAML file with open options.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Open the database without write access.
    #[arg(long, global = true)]
    read_only: bool,
    /// Output format.
    #[arg(long, global = true, default_value = "text")]
    format: CliOutputFormat,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List tables and views.
    Schema(SchemaArgs),
    /// Show column metadata and the row key of a table.
    Info(TableArgs),
    /// Show the contents of a table or view.
    Data(TableArgs),
    /// Run an ad-hoc SQL statement. Errors are shown inline.
    Query(QueryArgs),
    /// Change a single cell.
    Update(UpdateArgs),
    /// Insert a row.
    Insert(InsertArgs),
}

#[derive(Debug, Args)]
struct SchemaArgs {
    /// Database file path.
    db: PathBuf,
}

#[derive(Debug, Args)]
struct TableArgs {
    /// Database file path.
    db: PathBuf,
    /// Table or view name.
    table: String,
}

#[derive(Debug, Args)]
struct QueryArgs {
    /// Database file path.
    db: PathBuf,
    /// SQL text. Use `?` placeholders for literals.
    sql: String,
    /// Value bound to the next placeholder (repeatable).
    #[arg(long = "arg")]
    args: Vec<String>,
}

#[derive(Debug, Args)]
struct UpdateArgs {
    /// Database file path.
    db: PathBuf,
    /// Table name.
    table: String,
    /// Column to change.
    column: String,
    /// New value.
    value: String,
    /// Key condition as column=value (repeatable).
    #[arg(long = "where", value_name = "COLUMN=VALUE", conflicts_with = "row")]
    conditions: Vec<String>,
    /// Select the row by its position in `data` output (0-based).
    #[arg(long)]
    row: Option<usize>,
    /// Allow an update without conditions, changing every row.
    #[arg(long)]
    all_rows: bool,
}

#[derive(Debug, Args)]
struct InsertArgs {
    /// Database file path.
    db: PathBuf,
    /// Table name.
    table: String,
    /// Column value as column=value (repeatable). Omitted columns take
    /// their default.
    #[arg(long = "set", value_name = "COLUMN=VALUE")]
    values: Vec<String>,
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let result = match open_options(&cli) {
        Ok(options) => match cli.command {
            Command::Schema(args) => run_schema(args, &options, cli.format),
            Command::Info(args) => run_info(args, &options, cli.format),
            Command::Data(args) => run_data(args, &options, cli.format),
            Command::Query(args) => run_query(args, &options, cli.format),
            Command::Update(args) => run_update(args, &options),
            Command::Insert(args) => run_insert(args, &options),
        },
        Err(err) => Err(err),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::{EnvFilter, fmt};
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with(fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

fn open_options(cli: &Cli) -> Result<OpenOptions, String> {
    let mut options = match &cli.config {
        Some(path) => OpenOptions::load(path)
            .map_err(|e| format!("Failed to load config '{}': {e}", path.display()))?,
        None => OpenOptions::default(),
    };
    if cli.read_only {
        options.read_only = true;
    }
    Ok(options)
}

fn open(path: &Path, options: &OpenOptions) -> Result<Session, String> {
    let mut session = Session::new(options.clone());
    session.try_open(path).map_err(|e| e.to_string())?;
    Ok(session)
}

fn database(session: &Session) -> Result<&Database, String> {
    session.database().map_err(|e| e.to_string())
}

fn run_schema(
    args: SchemaArgs,
    options: &OpenOptions,
    format: CliOutputFormat,
) -> Result<(), String> {
    let session = open(&args.db, options)?;
    let db = database(&session)?;

    match format {
        CliOutputFormat::Json => print_json(db.schema())?,
        CliOutputFormat::Text => {
            println!("{}", db.name());
            println!("Tables:");
            for table in db.tables() {
                println!("  {table}");
            }
            println!("Views:");
            for view in db.views() {
                println!("  {view}");
            }
        }
    }
    Ok(())
}

fn run_info(args: TableArgs, options: &OpenOptions, format: CliOutputFormat) -> Result<(), String> {
    let session = open(&args.db, options)?;
    let db = database(&session)?;
    let keys = db.primary_keys_of(&args.table).map_err(|e| e.to_string())?;
    let is_view = db.is_view(&args.table).map_err(|e| e.to_string())?;

    match format {
        CliOutputFormat::Json => {
            #[derive(serde::Serialize)]
            struct InfoOutput {
                columns: Vec<sqint_core::ColumnInfo>,
                keys: Vec<String>,
            }
            let columns = db.columns_of(&args.table).map_err(|e| e.to_string())?;
            print_json(&InfoOutput { columns, keys })?;
        }
        CliOutputFormat::Text => {
            print!("{}", format_grid(&db.table_info(&args.table)));
            if is_view {
                println!("Key: none (view)");
            } else if keys.is_empty() {
                println!("Key: none");
            } else {
                println!("Key: {}", keys.join(", "));
            }
        }
    }
    Ok(())
}

fn run_data(args: TableArgs, options: &OpenOptions, format: CliOutputFormat) -> Result<(), String> {
    let session = open(&args.db, options)?;
    let db = database(&session)?;
    print_result(&db.table_data(&args.table), format)
}

fn run_query(args: QueryArgs, options: &OpenOptions, format: CliOutputFormat) -> Result<(), String> {
    let session = open(&args.db, options)?;
    let db = database(&session)?;
    let bound: Vec<Value> = args.args.into_iter().map(Value::from).collect();
    print_result(&db.query(&args.sql, &bound), format)
}

fn run_update(args: UpdateArgs, options: &OpenOptions) -> Result<(), String> {
    let session = open(&args.db, options)?;
    let db = database(&session)?;

    let changed = if let Some(row) = args.row {
        let grid = db.browse(&args.table).map_err(|e| e.to_string())?;
        let edit = grid
            .edit(row, &args.column, args.value)
            .map_err(|e| e.to_string())?
            .ok_or_else(|| format!("'{}' has no row identity and cannot be edited", args.table))?;
        db.apply(&edit).map_err(|e| e.to_string())?
    } else {
        let conditions: ConditionSet = parse_pairs(&args.conditions)?;
        if conditions.is_empty() && !args.all_rows {
            return Err(
                "Specify the row with --where or --row, or pass --all-rows to change every row"
                    .to_string(),
            );
        }
        db.update_field(&args.table, &args.column, args.value, &conditions)
            .map_err(|e| e.to_string())?
    };

    println!("Updated {changed} row(s).");
    Ok(())
}

fn run_insert(args: InsertArgs, options: &OpenOptions) -> Result<(), String> {
    let session = open(&args.db, options)?;
    let db = database(&session)?;
    let values: ColumnValues = parse_pairs(&args.values)?;
    match db
        .insert_row(&args.table, &values)
        .map_err(|e| e.to_string())?
    {
        Some(rowid) => println!("Inserted row {rowid}."),
        None => println!("Inserted 1 row."),
    }
    Ok(())
}

/// Parses `column=value` arguments in order. Values are text; SQLite's
/// column affinity converts them on write.
fn parse_pairs(raw: &[String]) -> Result<ColumnValues, String> {
    raw.iter()
        .map(|pair| {
            pair.split_once('=')
                .map(|(column, value)| (column.to_string(), value.to_string()))
                .ok_or_else(|| format!("Expected COLUMN=VALUE, got '{pair}'"))
        })
        .collect::<Result<Vec<_>, _>>()
        .map(|pairs| pairs.into_iter().collect())
}

fn print_result(result: &ResultSet, format: CliOutputFormat) -> Result<(), String> {
    match format {
        CliOutputFormat::Json => print_json(result),
        CliOutputFormat::Text => {
            print!("{}", format_grid(result));
            Ok(())
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), String> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| format!("Failed to serialize output: {e}"))?;
    println!("{json}");
    Ok(())
}

/// Renders a result as a pipe-separated grid with padded columns.
fn format_grid(result: &ResultSet) -> String {
    if result.columns.is_empty() {
        return String::new();
    }

    let cells = result.rendered();
    let mut widths: Vec<usize> = result.columns.iter().map(|c| c.chars().count()).collect();
    for row in &cells {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(cell.chars().count());
            }
        }
    }

    let line = |row: &[String]| -> String {
        row.iter()
            .zip(&widths)
            .map(|(cell, &w)| format!("{cell:<w$}"))
            .collect::<Vec<_>>()
            .join(" | ")
            .trim_end()
            .to_string()
    };

    let mut out = String::new();
    out.push_str(&line(&result.columns));
    out.push('\n');
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&rule.join("-+-"));
    out.push('\n');
    for row in &cells {
        out.push_str(&line(row));
        out.push('\n');
    }
    out
}
