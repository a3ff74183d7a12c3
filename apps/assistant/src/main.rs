use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use client_core::{
    message_log::render_entry, BuildOutcome, FormState, HttpPortfolioClient, PortfolioSession,
    RawForm, SubmitOutcome,
};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    task::JoinSet,
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

mod config;
mod console;

use config::load_settings;
use console::{apply_field, describe_form, parse_command, render_events, Command, ConsolePresenter, HELP};

#[derive(Parser, Debug)]
#[command(about = "Portfolio advice and site builder assistant")]
struct Args {
    /// Config file; defaults to ./assistant.toml when present.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    base_url: Option<String>,
    /// Print site links instead of opening them in a browser.
    #[arg(long)]
    no_open: bool,
    #[arg(long, default_value = "")]
    industry: String,
    #[arg(long, default_value = "")]
    goals: String,
    #[arg(long, default_value = "")]
    competitors: String,
    #[arg(long, default_value = "")]
    projects: String,
    #[arg(long, default_value = "modern")]
    theme: String,
}

impl Args {
    fn initial_form(&self) -> RawForm {
        RawForm {
            industry: self.industry.clone(),
            goals: self.goals.clone(),
            theme: self.theme.clone(),
            competitors: self.competitors.clone(),
            project_descriptions: self.projects.clone(),
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

    let mut settings = load_settings(args.config.as_deref())?;
    if let Some(base_url) = &args.base_url {
        settings.base_url = base_url.clone();
    }
    if args.no_open {
        settings.open_site = false;
    }
    info!(base_url = %settings.base_url, open_site = settings.open_site, "starting assistant");

    let client = HttpPortfolioClient::new(settings.transport_config()?)
        .context("failed to build HTTP client")?;
    let form = Arc::new(FormState::new(args.initial_form()));
    let presenter = Arc::new(ConsolePresenter::new(settings.open_site));
    let session = PortfolioSession::over_http(Arc::new(client), form.clone(), presenter);

    let renderer = tokio::spawn(render_events(session.subscribe()));
    println!("{HELP}");

    let mut running = JoinSet::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(message) => {
                println!("{message}");
                continue;
            }
        };

        match command {
            Command::Set(field, value) => form.update(|f| apply_field(f, field, value)).await,
            Command::Show => println!("{}", describe_form(&form.current().await)),
            Command::Submit => {
                let session = session.clone();
                running.spawn(async move {
                    match session.submit().await {
                        SubmitOutcome::Dropped => println!("Advice request already running."),
                        SubmitOutcome::AdviceReady(_) => println!("Type `build` to generate the site."),
                        SubmitOutcome::Failed(_) => {}
                    }
                });
            }
            Command::Build => {
                let session = session.clone();
                running.spawn(async move {
                    if let BuildOutcome::Built { location, .. } = session.trigger_build().await {
                        debug!(%location, "build finished");
                    }
                });
            }
            Command::Log => {
                for entry in session.log().entries().await {
                    println!("{}", render_entry(&entry));
                }
            }
            Command::Help => println!("{HELP}"),
            Command::Quit => break,
        }

        // Reap finished tasks so the set does not grow for the whole session.
        while running.try_join_next().is_some() {}
    }

    // Requests cannot be cancelled; let them settle before exiting.
    while running.join_next().await.is_some() {}
    drop(session);
    let _ = renderer.await;
    Ok(())
}
