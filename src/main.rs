use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use db_dict::introspect::list_tables;
use db_dict::{generate_dictionary, DictOptions, OutputFormat, SqliteConnection, Vendor};

#[derive(Parser)]
#[command(name = "db-dict")]
#[command(author, version, about = "Generate a database dictionary from schema metadata")]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the dictionary of a SQLite database file
    Generate {
        /// Path to the database file
        database: PathBuf,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        /// Output format (md, markdown, xlsx, spreadsheet)
        #[arg(short, long, default_value = "xlsx")]
        format: OutputFormat,

        /// Only document these tables (comma separated)
        #[arg(short, long, value_delimiter = ',')]
        tables: Option<Vec<String>>,

        /// Replace an existing dictionary file
        #[arg(long)]
        overwrite: bool,
    },

    /// List the tables and views of a SQLite database file
    Tables {
        /// Path to the database file
        database: PathBuf,
    },
}

fn init_logging(verbose: bool) {
    let default = if verbose { "db_dict=debug" } else { "db_dict=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Generate {
            database,
            output,
            format,
            tables,
            overwrite,
        } => {
            let conn = SqliteConnection::open(&database)?;
            let options = DictOptions {
                vendor: Vendor::Sqlite,
                database: None,
                source_file: Some(database),
                tables,
                output_dir: output,
                format,
                overwrite,
            };

            for path in generate_dictionary(&conn, &options)? {
                println!("{}", path.display());
            }
        }
        Commands::Tables { database } => {
            let conn = SqliteConnection::open(&database)?;
            for name in list_tables(&conn, Vendor::Sqlite, "main")? {
                println!("{}", name);
            }
        }
    }

    Ok(())
}
