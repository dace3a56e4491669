use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use taskdeck::{cli, config::AppConfig, AppContext};

#[derive(Parser)]
#[command(
    name = "taskdeck",
    about = "Local-first task list with a deterministic priority analyzer",
    version
)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Data directory for the task database and config.toml
    #[arg(long, env = "TASKDECK_DATA_DIR", global = true)]
    data_dir: Option<std::path::PathBuf>,

    /// Log level filter (trace, debug, info, warn, error)
    #[arg(long, env = "TASKDECK_LOG", global = true)]
    log: Option<String>,
}

#[derive(Subcommand)]
enum Command {
    /// Add a task.
    ///
    /// Due dates are ISO dates (2026-12-01) and must not be in the past.
    /// Invalid hours fall back to 1, invalid importance to 5.
    ///
    /// Examples:
    ///   taskdeck add "Write report" --due 2026-12-01 --hours 2 --importance 8
    ///   taskdeck add "Deploy" --deps 01J3ZK...,01J3ZM...
    Add {
        title: String,
        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<NaiveDate>,
        /// Estimated hours (positive)
        #[arg(long)]
        hours: Option<f64>,
        /// Importance 1-10
        #[arg(long)]
        importance: Option<u8>,
        /// Comma-separated ids of tasks this one depends on
        #[arg(long, value_delimiter = ',')]
        deps: Vec<String>,
    },
    /// Edit an existing task. Unset flags keep the stored values.
    Update {
        id: String,
        #[arg(long)]
        title: Option<String>,
        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<NaiveDate>,
        /// Estimated hours (positive)
        #[arg(long)]
        hours: Option<f64>,
        /// Importance 1-10
        #[arg(long)]
        importance: Option<u8>,
        /// Comma-separated dependency ids; replaces the whole list
        #[arg(long, value_delimiter = ',')]
        deps: Option<Vec<String>>,
    },
    /// List tasks in stored order.
    List {
        #[arg(long)]
        json: bool,
    },
    /// Rank every task under a strategy.
    ///
    /// Strategies: urgency, importance, balanced, dependency_aware.
    ///
    /// Examples:
    ///   taskdeck analyze
    ///   taskdeck analyze dependency_aware --json
    Analyze {
        #[arg(default_value = "balanced")]
        strategy: String,
        #[arg(long)]
        json: bool,
    },
    /// Show the top N recommendations (same ranking as analyze, truncated).
    Suggest {
        #[arg(default_value = "balanced")]
        strategy: String,
        /// How many tasks to suggest
        #[arg(short = 'n', long, default_value_t = 3)]
        count: usize,
        #[arg(long)]
        json: bool,
    },
    /// Mark a task as done (removes it from the list).
    Done { id: String },
    /// Move a task from one position to another (0-based indices).
    Reorder { from: usize, to: usize },
}

fn init_logging(filter: &str, format: &str) {
    if format == "json" {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .compact()
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = AppConfig::new(args.data_dir, args.log);
    init_logging(&config.log, &config.log_format);

    let ctx = AppContext::init(config).await?;

    match args.command {
        Command::Add {
            title,
            due,
            hours,
            importance,
            deps,
        } => cli::cmd_add(&ctx, title, due, hours, importance, deps).await,
        Command::Update {
            id,
            title,
            due,
            hours,
            importance,
            deps,
        } => cli::cmd_update(&ctx, id, title, due, hours, importance, deps).await,
        Command::List { json } => cli::cmd_list(&ctx, json).await,
        Command::Analyze { strategy, json } => cli::cmd_analyze(&ctx, &strategy, json).await,
        Command::Suggest {
            strategy,
            count,
            json,
        } => cli::cmd_suggest(&ctx, &strategy, count, json).await,
        Command::Done { id } => cli::cmd_done(&ctx, &id).await,
        Command::Reorder { from, to } => cli::cmd_reorder(&ctx, from, to).await,
    }
}
