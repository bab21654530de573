//! oxide-sql-parse CLI
//!
//! Parses SQL text with `oxide-sql-frontend` and prints the result.

use std::fmt::Debug;
use std::io::Read;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;

use oxide_sql_frontend::{ParseError, ParserConfig, PredictionStrategy, SqlParser};

/// Parse SQL text into data types, expressions, names, schemas or plans.
#[derive(Parser)]
#[allow(clippy::struct_excessive_bools)]
#[command(name = "oxide-sql-parse")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON parser configuration file.
    #[arg(short, long, env = "OXIDE_SQL_CONFIG")]
    config: Option<PathBuf>,

    /// Use exact prediction from the start.
    #[arg(long)]
    exact_only: bool,

    /// Lookahead budget of approximate prediction, in tokens.
    #[arg(long)]
    lookahead: Option<usize>,

    /// Maximum nesting depth of grammar rules.
    #[arg(long)]
    max_depth: Option<usize>,

    /// Lex `"..."` as quoted identifiers.
    #[arg(long)]
    double_quoted_identifiers: bool,

    /// Print results and errors as JSON.
    #[arg(long)]
    json: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a statement into a logical plan.
    Plan {
        /// SQL text, or `-` to read standard input.
        sql: String,
    },

    /// Parse an expression.
    Expr {
        /// SQL text, or `-` to read standard input.
        sql: String,
    },

    /// Parse a data type.
    DataType {
        /// SQL text, or `-` to read standard input.
        sql: String,
    },

    /// Parse a table identifier.
    Table {
        /// SQL text, or `-` to read standard input.
        sql: String,
    },

    /// Parse a function identifier.
    Function {
        /// SQL text, or `-` to read standard input.
        sql: String,
    },

    /// Parse a column list.
    Schema {
        /// SQL text, or `-` to read standard input.
        sql: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut config = match &cli.config {
        Some(path) => ParserConfig::load(path)?,
        None => ParserConfig::DEFAULT,
    };
    if cli.exact_only {
        config = config.with_prediction(PredictionStrategy::ExactOnly);
    }
    if let Some(tokens) = cli.lookahead {
        config = config.with_sll_lookahead(tokens);
    }
    if let Some(depth) = cli.max_depth {
        config = config.with_max_depth(depth);
    }
    if cli.double_quoted_identifiers {
        config = config.with_double_quoted_identifiers(true);
    }
    debug!(?config, "configuration");

    let parser = SqlParser::new(config);
    let json = cli.json;
    match cli.command {
        Commands::Plan { sql } => emit(parser.parse_plan(&read_sql(sql)?), json),
        Commands::Expr { sql } => emit(parser.parse_expression(&read_sql(sql)?), json),
        Commands::DataType { sql } => emit(parser.parse_data_type(&read_sql(sql)?), json),
        Commands::Table { sql } => emit(parser.parse_table_identifier(&read_sql(sql)?), json),
        Commands::Function { sql } => {
            emit(parser.parse_function_identifier(&read_sql(sql)?), json)
        }
        Commands::Schema { sql } => emit(parser.parse_table_schema(&read_sql(sql)?), json),
    }
}

/// Returns `sql`, or standard input when it is `-`.
fn read_sql(sql: String) -> anyhow::Result<String> {
    if sql != "-" {
        return Ok(sql);
    }
    let mut buf = String::new();
    std::io::stdin().read_to_string(&mut buf)?;
    Ok(buf.trim_end().to_owned())
}

/// Prints a result, or the error and exits with status 1.
fn emit<T: Debug + Serialize>(result: Result<T, ParseError>, json: bool) -> anyhow::Result<()> {
    match result {
        Ok(value) if json => println!("{}", serde_json::to_string_pretty(&value)?),
        Ok(value) => println!("{value:#?}"),
        Err(err) => {
            if json {
                eprintln!("{}", serde_json::to_string_pretty(&err)?);
            } else {
                eprintln!("{err}");
            }
            std::process::exit(1);
        }
    }
    Ok(())
}
