use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use client_core::{config::load_settings, DeleteOutcome, ListController};
use shared::{
    domain::{CategoryId, ItemId, ResourceKind},
    protocol::NewQuestion,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod prompt;
mod render;

use prompt::{StderrNotifier, StdinConfirmer};

#[derive(Parser, Debug)]
#[command(about = "Browse and manage a remote trivia collection")]
struct Args {
    /// Overrides `api_server_url` from client.toml / the environment.
    #[arg(long, global = true)]
    server_url: Option<String>,
    #[arg(long, value_enum, default_value_t = ResourceArg::Questions, global = true)]
    resource: ResourceArg,
    #[arg(long, global = true)]
    show_answers: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show one page of the collection.
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Show the items of one category.
    Category { id: i64 },
    /// Free-text search.
    Search { term: String },
    /// Delete an item after confirmation, then show the refreshed page.
    Delete {
        id: i64,
        /// Page to show after the delete; loaded first so the refresh stays on it.
        #[arg(long)]
        page: Option<u32>,
        #[arg(long, short = 'y')]
        yes: bool,
    },
    /// Add a question, then show the refreshed page.
    Add {
        #[arg(long)]
        question: String,
        #[arg(long)]
        answer: String,
        #[arg(long)]
        category: i64,
        #[arg(long, default_value_t = 1)]
        difficulty: i32,
    },
    /// List the known categories.
    Categories,
    /// Print the effective client configuration.
    Config,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ResourceArg {
    Questions,
    Venues,
    Artists,
}

impl From<ResourceArg> for ResourceKind {
    fn from(value: ResourceArg) -> Self {
        match value {
            ResourceArg::Questions => ResourceKind::Questions,
            ResourceArg::Venues => ResourceKind::Venues,
            ResourceArg::Artists => ResourceKind::Artists,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = load_settings().context("failed to load client settings")?;
    if let Some(server_url) = args.server_url.clone() {
        settings
            .override_server_url(server_url)
            .context("invalid --server-url")?;
    }

    let yes = matches!(args.command, Command::Delete { yes: true, .. });
    let controller: ListController = ListController::from_settings(
        &settings,
        Arc::new(StderrNotifier),
        Arc::new(StdinConfirmer::new(yes)),
    )
    .with_resource(args.resource.into());
    info!(base_url = settings.base_url(), resource = %controller.resource(), "client ready");

    match args.command {
        Command::List { page } => controller.load_page(page).await?,
        Command::Category { id } => controller.filter_by_category(CategoryId(id)).await?,
        Command::Search { term } => controller.search(&term).await?,
        Command::Delete { id, page, .. } => {
            if let Some(page) = page {
                controller.load_page(page).await?;
            }
            if controller.delete_item(ItemId(id)).await? == DeleteOutcome::Cancelled {
                println!("Delete cancelled.");
                return Ok(());
            }
        }
        Command::Add {
            question,
            answer,
            category,
            difficulty,
        } => {
            controller
                .create_item(&NewQuestion {
                    question,
                    answer,
                    category: CategoryId(category),
                    difficulty,
                })
                .await?
        }
        Command::Categories => {
            controller.load_categories().await?;
            print!("{}", render::render_categories(&*controller.state()));
            return Ok(());
        }
        Command::Config => {
            print!("{}", render::render_settings(&settings));
            return Ok(());
        }
    }

    print!(
        "{}",
        render::render_state(&*controller.state(), args.resource.into(), args.show_answers)
    );
    Ok(())
}
