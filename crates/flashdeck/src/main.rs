//! `fdeck` - CLI for flashdeck
//!
//! This binary runs the flashdeck HTTP server and provides a terminal front end
//! for browsing, creating and reviewing flashcards through it.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::io::Write;

use anyhow::Context;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

use flashdeck::api::{self, AppState, RouterOptions};
use flashdeck::cli::interactive::{is_confirmed, ReviewInput};
use flashdeck::cli::{
    render, CategoriesCommand, Cli, Command, ConfigCommand, CreateCommand, ReviewCommand,
    ServeCommand,
};
use flashdeck::review::{Action, CategoryFilter, Notification, ReviewController, ReviewSession};
use flashdeck::{init_logging, ApiClient, Config, NewFlashcard, Storage};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone())?;

    // Execute the command
    match cli.command {
        Command::Serve(serve_cmd) => handle_serve(config, serve_cmd).await,
        Command::Categories(categories_cmd) => handle_categories(&config, categories_cmd).await,
        Command::Create(create_cmd) => handle_create(&config, create_cmd).await,
        Command::Review(review_cmd) => handle_review(&config, review_cmd).await,
        Command::Status(status_cmd) => handle_status(&config, status_cmd.json),
        Command::Config(config_cmd) => handle_config(&config, cli.config, config_cmd),
    }
}

async fn handle_serve(mut config: Config, cmd: ServeCommand) -> anyhow::Result<()> {
    if let Some(host) = cmd.host {
        config.server.host = host;
    }
    if let Some(port) = cmd.port {
        config.server.port = port;
    }
    config.validate()?;
    let addr = config.bind_addr()?;

    let path = config.database_path();
    let storage = Storage::open(&path)
        .with_context(|| format!("failed to open flashcard store at {}", path.display()))?;
    info!(database = %path.display(), "Opened flashcard store");

    let options = RouterOptions {
        cors_permissive: config.server.cors_permissive,
    };
    api::serve(addr, AppState::new(storage), options).await?;
    Ok(())
}

fn client_for(config: &Config, server: Option<&str>) -> anyhow::Result<ApiClient> {
    let base_url = server.unwrap_or(&config.client.base_url);
    ApiClient::new(base_url).with_context(|| format!("invalid server URL {base_url}"))
}

async fn handle_categories(config: &Config, cmd: CategoriesCommand) -> anyhow::Result<()> {
    let client = client_for(config, cmd.server.as_deref())?;
    let counts = client
        .list_categories()
        .await
        .context("Failed to fetch categories")?;

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&counts)?);
        return Ok(());
    }

    print!("{}", render::category_grid(&counts));
    if !counts.is_empty() {
        println!("Review a category with: fdeck review --category <NAME>");
    }
    Ok(())
}

async fn handle_create(config: &Config, cmd: CreateCommand) -> anyhow::Result<()> {
    let new = NewFlashcard::new(cmd.front, cmd.back, cmd.category);
    new.validate()?;

    let client = client_for(config, cmd.server.as_deref())?;
    let flashcard = client
        .create_flashcard(&new)
        .await
        .context("Failed to create flashcard")?;

    println!(
        "{}",
        render::notification(&Notification::success("Flashcard created successfully"))
    );
    println!("  Id:       {}", flashcard.id);
    println!("  Category: {}", flashcard.category);
    Ok(())
}

async fn handle_review(config: &Config, cmd: ReviewCommand) -> anyhow::Result<()> {
    let client = client_for(config, cmd.server.as_deref())?;
    let filter = cmd
        .category
        .as_deref()
        .map_or(CategoryFilter::All, CategoryFilter::from_label);
    let mut controller =
        ReviewController::with_session(client, ReviewSession::with_category(filter));
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    print_notifications(&controller.load().await);
    print!("{}", render::view(&controller.session().view()));

    loop {
        prompt("> ")?;
        let Some(line) = lines.next_line().await? else {
            break;
        };

        let notifications = match ReviewInput::parse(&line) {
            ReviewInput::Next => controller.dispatch(Action::Next).await,
            ReviewInput::Previous => controller.dispatch(Action::Previous).await,
            ReviewInput::Flip => controller.dispatch(Action::Flip).await,
            ReviewInput::Category(filter) => {
                controller.dispatch(Action::SelectCategory(filter)).await
            }
            ReviewInput::Reload => controller.load().await,
            ReviewInput::Add(new) => controller.dispatch(Action::RequestCreate(new)).await,
            ReviewInput::Delete => {
                let Some(id) = controller.session().current_card().map(|card| card.id) else {
                    println!("There is no flashcard to delete.");
                    continue;
                };
                prompt("Delete this flashcard? [y/N] ")?;
                let answer = lines.next_line().await?.unwrap_or_default();
                if !is_confirmed(&answer) {
                    continue;
                }
                controller.dispatch(Action::RequestDelete(id)).await
            }
            ReviewInput::ListCategories => {
                let session = controller.session();
                print!(
                    "{}",
                    render::category_choices(
                        &session.categories(),
                        session.selected_category().label()
                    )
                );
                continue;
            }
            ReviewInput::Help => {
                print!("{}", render::review_help());
                continue;
            }
            ReviewInput::Quit => break,
            ReviewInput::Unknown(input) => {
                println!("Unknown command: {input} (h for help)");
                continue;
            }
        };

        print_notifications(&notifications);
        print!("{}", render::view(&controller.session().view()));
    }

    Ok(())
}

fn prompt(text: &str) -> anyhow::Result<()> {
    print!("{text}");
    std::io::stdout().flush()?;
    Ok(())
}

fn print_notifications(notifications: &[Notification]) {
    for notification in notifications {
        println!("{}", render::notification(notification));
    }
}

fn handle_status(config: &Config, json: bool) -> anyhow::Result<()> {
    let path = config.database_path();
    let stats = if path.exists() {
        Some(Storage::open(&path)?.stats()?)
    } else {
        None
    };

    if json {
        let status = serde_json::json!({
            "database_path": path,
            "database_exists": stats.is_some(),
            "total_flashcards": stats.as_ref().map_or(0, |s| s.total_flashcards),
            "total_categories": stats.as_ref().map_or(0, |s| s.total_categories),
            "oldest_flashcard": stats.as_ref().and_then(|s| s.oldest_flashcard),
            "newest_flashcard": stats.as_ref().and_then(|s| s.newest_flashcard),
            "db_size_bytes": stats.as_ref().map_or(0, |s| s.db_size_bytes),
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!("fdeck status");
    println!("------------");
    println!("Database:      {}", path.display());
    let Some(stats) = stats else {
        println!("               (not created yet; run `fdeck serve`)");
        return Ok(());
    };
    println!("Flashcards:    {}", stats.total_flashcards);
    println!("Categories:    {}", stats.total_categories);
    if let Some(oldest) = stats.oldest_flashcard {
        println!("Oldest:        {}", oldest.format("%Y-%m-%d %H:%M:%S UTC"));
    }
    if let Some(newest) = stats.newest_flashcard {
        println!("Newest:        {}", newest.format("%Y-%m-%d %H:%M:%S UTC"));
    }
    println!("Size:          {} bytes", stats.db_size_bytes);
    Ok(())
}

fn handle_config(
    config: &Config,
    config_path: Option<std::path::PathBuf>,
    cmd: ConfigCommand,
) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Server]");
                println!("  Host:               {}", config.server.host);
                println!("  Port:               {}", config.server.port);
                println!("  Permissive CORS:    {}", config.server.cors_permissive);
                println!();
                println!("[Storage]");
                println!("  Database path:      {}", config.database_path().display());
                println!();
                println!("[Client]");
                println!("  Base URL:           {}", config.client.base_url);
            }
        }
        ConfigCommand::Path => {
            let path = config_path.unwrap_or_else(Config::default_config_path);
            println!("{}", path.display());
        }
        ConfigCommand::Validate { file } => {
            let path = file
                .or(config_path)
                .unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
