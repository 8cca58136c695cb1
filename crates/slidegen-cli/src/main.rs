//! Slidegen CLI - Prompt to presentation
//!
//! Sends a prompt to the generation backend and saves the returned deck.

mod api;
mod config;
mod download;
mod view;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use dialoguer::Input;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api::SlidegenClient;
use config::{Config, BASE_URL_ENV};
use download::FileDownloader;
use slidegen::{ControllerConfig, FormController, FormView, GenerationService, SubmitOutcome};
use view::{TerminalView, CLEAR_COMMAND, QUIT_COMMAND};

#[derive(Parser)]
#[command(name = "slidegen")]
#[command(about = "Slidegen CLI - Turn a prompt into a presentation", long_about = None)]
#[command(version)]
struct Cli {
    /// Backend base URL (overrides config and SLIDEGEN_BASE_URL)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Verbose diagnostic logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate one presentation
    Generate {
        /// Prompt text (or use -f for file; prompts if neither)
        prompt: Option<String>,
        /// Read prompt from file
        #[arg(short, long)]
        file: Option<String>,
        /// Directory to save the presentation into
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Interactive form: one prompt per line
    Interactive {
        /// Directory to save presentations into
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Check that the backend is reachable
    Health,

    /// Show or change configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration
    Show,
    /// Set the backend base URL
    SetUrl {
        /// e.g. http://localhost:5009
        url: String,
    },
    /// Set the default download directory
    SetOutput {
        dir: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Generate {
            prompt,
            file,
            output,
        } => cmd_generate(cli.base_url, prompt, file, output).await,
        Commands::Interactive { output } => cmd_interactive(cli.base_url, output).await,
        Commands::Health => cmd_health(cli.base_url).await,
        Commands::Config { action } => cmd_config(action.unwrap_or(ConfigAction::Show)),
    }
}

fn init_tracing(verbose: bool) {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if verbose {
            "slidegen=debug,slidegen_cli=debug".into()
        } else {
            "warn".into()
        }
    });

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_config(base_url: Option<String>) -> Result<Config> {
    Ok(Config::load()?.with_overrides(std::env::var(BASE_URL_ENV).ok(), base_url))
}

// ============================================
// Command Implementations
// ============================================

async fn cmd_generate(
    base_url: Option<String>,
    prompt: Option<String>,
    file: Option<String>,
    output: Option<PathBuf>,
) -> Result<()> {
    let config = load_config(base_url)?;
    let output_dir = config.resolve_output_dir(output);

    // Get prompt from argument, file, or interactive input
    let asked = prompt.is_none() && file.is_none();
    let mut prompt_text = match (prompt, file) {
        (Some(p), None) => p,
        (None, Some(f)) => {
            fs::read_to_string(&f).with_context(|| format!("Failed to read file: {}", f))?
        }
        (Some(_), Some(_)) => {
            bail!("Cannot specify both a prompt and --file");
        }
        (None, None) => ask_prompt()?,
    };

    let view = Arc::new(TerminalView::one_shot(
        output_dir.display().to_string(),
        asked,
    ));
    let controller = FormController::new(
        view.clone(),
        Arc::new(SlidegenClient::new(config.endpoint())),
        Arc::new(FileDownloader::new(&output_dir)),
        ControllerConfig::default().with_reset_offer(asked),
    );
    let _events = controller.init().await;

    loop {
        view.set_prompt(&prompt_text);
        controller.on_input_changed(&prompt_text);

        match controller.submit(&prompt_text).await {
            SubmitOutcome::Completed(file) => {
                println!("  {}", file.location.display().to_string().dimmed());
            }
            SubmitOutcome::Failed(err) => bail!("{}", err.user_message()),
            SubmitOutcome::Ignored => bail!("A presentation is already being generated"),
        }

        if !view.take_restart() {
            break;
        }
        prompt_text = ask_prompt()?;
    }

    Ok(())
}

fn ask_prompt() -> Result<String> {
    Input::new()
        .with_prompt("Describe your presentation")
        .interact_text()
        .context("Failed to read input")
}

async fn cmd_interactive(base_url: Option<String>, output: Option<PathBuf>) -> Result<()> {
    let config = load_config(base_url)?;
    let downloader = FileDownloader::new(config.resolve_output_dir(output));

    println!("{}", "Slidegen".bold());
    println!("  Backend: {}", config.base_url.cyan());
    println!("  Saving to: {}", downloader.output_dir().display());
    println!(
        "{}",
        format!(
            "Type a prompt and press Enter. {} resets, {} exits.",
            CLEAR_COMMAND, QUIT_COMMAND
        )
        .dimmed()
    );

    let view = Arc::new(TerminalView::interactive(
        downloader.output_dir().display().to_string(),
    ));
    let controller = Arc::new(FormController::new(
        view,
        Arc::new(SlidegenClient::new(config.endpoint())),
        Arc::new(downloader),
        ControllerConfig::default(),
    ));

    let events = controller.init().await;
    controller.run(events).await;

    Ok(())
}

async fn cmd_health(base_url: Option<String>) -> Result<()> {
    let config = load_config(base_url)?;
    let client = SlidegenClient::new(config.endpoint());

    print!("Checking {}... ", config.base_url);

    match client.health().await {
        Ok(health) => {
            println!("{}", "OK".green());
            println!("  {}", health.to_string().dimmed());
            Ok(())
        }
        Err(e) => {
            println!("{}", "Failed".red());
            bail!("{}", e.user_message());
        }
    }
}

fn cmd_config(action: ConfigAction) -> Result<()> {
    let mut config = Config::load()?;

    match action {
        ConfigAction::Show => {
            let env_url = std::env::var(BASE_URL_ENV).ok();

            println!("{}", "Configuration:".bold());
            println!("  Path: {:?}", Config::default_path()?);
            println!("  Base URL: {}", config.base_url.cyan());
            if let Some(url) = env_url {
                println!("  {} override: {}", BASE_URL_ENV, url.yellow());
            }
            println!(
                "  Output Dir: {}",
                config.resolve_output_dir(None).display()
            );
        }

        ConfigAction::SetUrl { url } => {
            config.set_base_url(url);
            config.save()?;
            println!("{} Base URL set to {}", "✓".green(), config.base_url);
        }

        ConfigAction::SetOutput { dir } => {
            config.set_output_dir(dir);
            config.save()?;
            println!(
                "{} Output directory set to {}",
                "✓".green(),
                config.resolve_output_dir(None).display()
            );
        }
    }

    Ok(())
}
