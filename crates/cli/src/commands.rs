use clap::{Parser, Subcommand};
use mosaify_db::EntityStore;
use serde::Serialize;

/// Create, reset and inspect the mosaify database schema.
#[derive(Parser, Debug)]
#[command(name = "mosaify-cli", version)]
pub struct Cli {
    /// Connection URL. Overrides DB_CONN_STRING and DATABASE_URL.
    #[arg(long, global = true)]
    pub database_url: Option<String>,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create any missing tables.
    Init {
        /// Drop every table (and all data) before creating.
        #[arg(long)]
        reset: bool,
    },

    /// Print the row count of every table.
    Status {
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Serialize)]
struct TableCount {
    table: &'static str,
    rows: i64,
}

pub async fn run(store: &mut EntityStore, command: &Command) -> anyhow::Result<()> {
    match command {
        Command::Init { reset } => {
            if *reset {
                tracing::warn!("Resetting schema, all data will be dropped");
            }
            store.create_tables(*reset).await?;
            println!("Schema ready");
        }
        Command::Status { json } => {
            let counts: Vec<TableCount> = store
                .table_row_counts()
                .await?
                .into_iter()
                .map(|(table, rows)| TableCount { table, rows })
                .collect();
            if *json {
                println!("{}", serde_json::to_string_pretty(&counts)?);
            } else {
                for TableCount { table, rows } in &counts {
                    println!("{table:<16} {rows}");
                }
            }
        }
    }
    Ok(())
}
