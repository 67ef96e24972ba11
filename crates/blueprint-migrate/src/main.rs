//! blueprint-migrate CLI
//!
//! Command-line tool that turns JSON table definitions into statements and
//! runs them.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use blueprint_migrate::prelude::*;

/// Create and drop tables from JSON blueprint definitions.
#[derive(Parser)]
#[command(name = "blueprint-migrate")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file.
    #[arg(short, long, default_value = "blueprint.json")]
    config: PathBuf,

    /// Database URL, overriding the configuration file.
    #[arg(short, long, env = "DATABASE_URL")]
    database: Option<String>,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the CREATE TABLE statement of each definition.
    Render {
        /// Table definition files.
        #[arg(required = true)]
        definitions: Vec<PathBuf>,
    },

    /// Create the defined tables, in order.
    Apply {
        /// Table definition files.
        #[arg(required = true)]
        definitions: Vec<PathBuf>,

        /// Show SQL without executing.
        #[arg(long)]
        dry_run: bool,
    },

    /// Drop the defined tables, in reverse order.
    Rollback {
        /// Table definition files.
        #[arg(required = true)]
        definitions: Vec<PathBuf>,

        /// Show SQL without executing.
        #[arg(long)]
        dry_run: bool,
    },
}

fn load_migrations(
    paths: &[PathBuf],
    options: &TableOptions,
) -> anyhow::Result<Vec<DefinitionMigration>> {
    paths
        .iter()
        .map(|path| {
            let definition = TableDefinition::from_path(path)
                .with_context(|| format!("loading {}", path.display()))?;
            Ok(DefinitionMigration::new(definition, options.clone()))
        })
        .collect()
}

async fn run<E: StatementExecutor>(
    runner: MigrationRunner<E>,
    migrations: &[DefinitionMigration],
    direction: Direction,
) -> anyhow::Result<()> {
    let migrations: Vec<&dyn Migration> = migrations.iter().map(|m| m as &dyn Migration).collect();
    let count = match direction {
        Direction::Up => runner.apply(&migrations).await?,
        Direction::Down => runner.rollback(&migrations).await?,
    };
    info!("{count} statement(s) executed.");
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
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

    let config = MigrateConfig::load(&cli.config)?;
    let database_url = cli.database.or(config.database_url);

    let (paths, direction, dry_run) = match cli.command {
        Commands::Render { definitions } => {
            for migration in load_migrations(&definitions, &config.table)? {
                let blueprint = migration.definition().blueprint(&config.table)?;
                match blueprint.to_sql() {
                    Some(sql) => println!("{}", bind_table(&sql, &migration.definition().table)),
                    None => info!("Table '{}' declares no columns.", migration.definition().table),
                }
            }
            return Ok(());
        }
        Commands::Apply {
            definitions,
            dry_run,
        } => (definitions, Direction::Up, dry_run),
        Commands::Rollback {
            definitions,
            dry_run,
        } => (definitions, Direction::Down, dry_run),
    };

    let migrations = load_migrations(&paths, &config.table)?;

    if dry_run {
        info!("Dry run mode - SQL will be printed but not executed.");
        let runner = MigrationRunner::new(DryRunExecutor::new(), config.table);
        return run(runner, &migrations, direction).await;
    }

    let database_url = database_url
        .context("no database URL: pass --database, set DATABASE_URL or add database_url to the config")?;
    let executor = MySqlExecutor::connect(&database_url).await?;
    let runner = MigrationRunner::new(executor, config.table);
    run(runner, &migrations, direction).await
}
