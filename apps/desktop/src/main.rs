use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    view::{render_feed, render_todo_form},
    ClientEvent, FeedController, HttpResourceService, LoadOutcome, ResourceService,
    TodoFormController,
};
use shared::domain::ArticleId;
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::broadcast,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod render;

use config::{load_settings, normalize_base_url};

#[derive(Parser, Debug)]
#[command(about = "Terminal client for the article feed and todo form")]
struct Cli {
    #[arg(long)]
    api_base_url: Option<String>,
    #[arg(long)]
    timeout_secs: Option<u64>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load the feed, page further, and optionally expand one article.
    Articles {
        #[arg(long, default_value_t = 0)]
        more: u32,
        #[arg(long)]
        expand: Option<String>,
    },
    /// Submit each title through the todo form.
    Todo { titles: Vec<String> },
    /// Drive both views interactively from stdin.
    Shell,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut settings = load_settings();
    if let Some(url) = cli.api_base_url {
        settings.api_base_url = normalize_base_url(&url);
    }
    if let Some(timeout) = cli.timeout_secs {
        settings.request_timeout_secs = timeout;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    info!(api_base_url = %settings.api_base_url, "desktop: starting");
    let service: Arc<dyn ResourceService> = Arc::new(
        HttpResourceService::with_timeout(
            settings.api_base_url.clone(),
            settings.request_timeout(),
        )
        .context("failed to build HTTP client")?,
    );

    match cli.command {
        Command::Articles { more, expand } => run_articles(service, more, expand).await,
        Command::Todo { titles } => run_todo(service, titles).await,
        Command::Shell => run_shell(service).await,
    }
}

async fn run_articles(
    service: Arc<dyn ResourceService>,
    more: u32,
    expand: Option<String>,
) -> Result<()> {
    let feed = FeedController::new(service);
    let mut events = feed.subscribe_events();

    feed.start().await;
    for _ in 0..more {
        if feed.load_more().await == LoadOutcome::Failed {
            break;
        }
    }
    if let Some(article_id) = expand {
        feed.expand(ArticleId::from(article_id)).await;
    }

    print!("{}", render::feed_text(&render_feed(&feed.snapshot().await)));
    print_errors(&mut events);
    Ok(())
}

async fn run_todo(service: Arc<dyn ResourceService>, titles: Vec<String>) -> Result<()> {
    let form = TodoFormController::new(service);
    let mut events = form.subscribe_events();

    for title in titles {
        form.set_title(title).await;
        form.submit().await;
    }

    print!(
        "{}",
        render::todo_form_text(&render_todo_form(&form.snapshot().await))
    );
    print_errors(&mut events);
    Ok(())
}

const SHELL_HELP: &str = "commands: feed | more | retry | expand <id> | collapse | \
form | title <text> | submit | help | quit";

async fn run_shell(service: Arc<dyn ResourceService>) -> Result<()> {
    let feed = Arc::new(FeedController::new(Arc::clone(&service)));
    let form = Arc::new(TodoFormController::new(service));
    let mut feed_events = feed.subscribe_events();
    let mut form_events = form.subscribe_events();

    println!("{SHELL_HELP}");
    tokio::spawn({
        let feed = Arc::clone(&feed);
        async move {
            feed.start().await;
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        let line = line.trim();
        let (command, arg) = line
            .split_once(' ')
            .map(|(command, arg)| (command, arg.trim()))
            .unwrap_or((line, ""));

        // Requests run in the background so further input is accepted while
        // they are outstanding.
        match command {
            "" => {}
            "feed" => print!("{}", render::feed_text(&render_feed(&feed.snapshot().await))),
            "more" => {
                let feed = Arc::clone(&feed);
                tokio::spawn(async move {
                    if feed.load_more().await == LoadOutcome::Busy {
                        println!("a page is still loading");
                    }
                });
            }
            "retry" => {
                let feed = Arc::clone(&feed);
                tokio::spawn(async move {
                    if feed.retry().await == LoadOutcome::Ignored {
                        println!("nothing to retry");
                    }
                });
            }
            "expand" if !arg.is_empty() => {
                let feed = Arc::clone(&feed);
                let article_id = ArticleId::from(arg);
                tokio::spawn(async move {
                    feed.expand(article_id).await;
                });
            }
            "collapse" => feed.collapse().await,
            "form" => print!(
                "{}",
                render::todo_form_text(&render_todo_form(&form.snapshot().await))
            ),
            "title" => {
                form.set_title(arg).await;
                let snapshot = form.snapshot().await;
                if !snapshot.field.is_valid() {
                    println!("! {}", snapshot.field.validation_message);
                }
            }
            "submit" => {
                let form = Arc::clone(&form);
                tokio::spawn(async move {
                    form.submit().await;
                });
            }
            "help" => println!("{SHELL_HELP}"),
            "quit" | "exit" => break,
            _ => println!("unknown command: {line}\n{SHELL_HELP}"),
        }

        print_errors(&mut feed_events);
        print_errors(&mut form_events);
    }

    Ok(())
}

fn print_errors(events: &mut broadcast::Receiver<ClientEvent>) {
    loop {
        match events.try_recv() {
            Ok(ClientEvent::Error { context, message }) => {
                eprintln!("error ({}): {message}", context.as_str());
            }
            Ok(_) => {}
            Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                eprintln!("({skipped} events skipped)");
            }
            Err(_) => break,
        }
    }
}
