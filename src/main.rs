use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use taskboard::config::BoardConfig;
use taskboard::models::{CreateTaskInput, Priority, TaskId};
use taskboard::{api, db, render, BoardStore};

#[derive(Parser)]
#[command(name = "taskboard")]
#[command(about = "Kanban task board")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the board over HTTP
    Serve {
        /// Port for HTTP API (defaults to the configured port)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Print the board
    Show,
    /// List columns with their task counts
    Columns,
    /// Create a task in the default column
    Add {
        #[arg(short, long)]
        title: String,
        #[arg(short, long, default_value = "")]
        description: String,
        /// Team member to assign the task to
        #[arg(short, long)]
        assignee: String,
        /// high, medium or low
        #[arg(short, long)]
        priority: String,
    },
    /// Move a task to another column
    Move {
        id: TaskId,
        /// Column the task is in now
        #[arg(long)]
        from: String,
        /// Column to move it to
        #[arg(long)]
        to: String,
    },
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "taskboard=debug,tower_http=debug".into()),
    );

    // stdout carries command output; logs go to stderr
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn open_database(config: &BoardConfig) -> anyhow::Result<db::Database> {
    let db = match &config.database_path {
        Some(path) => db::Database::open(path.clone())?,
        None => db::Database::open_default()?,
    };
    db.migrate()?;
    Ok(db)
}

fn open_store(config: &BoardConfig, db: &db::Database) -> anyhow::Result<BoardStore> {
    BoardStore::from_config(config, Box::new(db.clone()))
}

async fn serve(config: &BoardConfig, port: u16) -> anyhow::Result<()> {
    let db = open_database(config)?;
    let store = open_store(config, &db)?;
    let app = api::create_router(store, config.team.clone());

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port)).await?;
    tracing::info!("Task board listening on http://127.0.0.1:{}", port);

    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let config = BoardConfig::load();
    config.validate()?;

    match cli.command {
        Some(Commands::Serve { port }) => {
            serve(&config, port.unwrap_or(config.port)).await?;
        }
        Some(Commands::Show) => {
            let db = open_database(&config)?;
            let store = open_store(&config, &db)?;
            print!("{}", render::render_board(store.board()));
            if let Some(saved_at) = db.last_saved_at()? {
                println!("\nLast saved {}", saved_at.format("%Y-%m-%d %H:%M:%S UTC"));
            }
        }
        Some(Commands::Columns) => {
            let db = open_database(&config)?;
            let store = open_store(&config, &db)?;
            print!("{}", render::render_column_summary(store.board()));
        }
        Some(Commands::Add {
            title,
            description,
            assignee,
            priority,
        }) => {
            if !config.is_team_member(&assignee) {
                anyhow::bail!(
                    "Unknown assignee '{}'. Team: {}",
                    assignee,
                    config.team.join(", ")
                );
            }
            let priority = Priority::parse(&priority)?;

            let db = open_database(&config)?;
            let mut store = open_store(&config, &db)?;
            let task = store
                .create_task(CreateTaskInput::new(title, description, assignee, priority))
                .context("Failed to create task")?;
            println!(
                "Created #{} '{}' in {}",
                task.id,
                task.title,
                store.default_column()
            );
        }
        Some(Commands::Move { id, from, to }) => {
            let db = open_database(&config)?;
            let mut store = open_store(&config, &db)?;
            let outcome = store
                .move_task(id, &from, &to)
                .with_context(|| format!("Failed to move task {}", id))?;
            println!("Task #{} {:?} ({} -> {})", id, outcome, from, to);
        }
        None => {
            serve(&config, config.port).await?;
        }
    }

    Ok(())
}
