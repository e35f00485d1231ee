use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use samchat::agent::ChatAgent;
use samchat::backend::HttpBackend;
use samchat::config::Config;
use samchat::ui::{self, panels};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "samchat")]
#[command(version)]
#[command(about = "Chat with the knowledge assistant from your terminal", long_about = None)]
struct Cli {
    /// Config file (default: ~/.samchat/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Example category to start with
    #[arg(long, global = true)]
    category: Option<String>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive chat (default)
    Chat,
    /// Ask a single question and print the answer
    Ask {
        #[arg(required = true, trailing_var_arg = true)]
        prompt: Vec<String>,
    },
    /// List example prompts
    Examples {
        /// Only this category
        category: Option<String>,
    },
    /// Write a default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn init_logging(verbose: bool) {
    let default = if verbose { "samchat=debug" } else { "samchat=warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn build_agent(config: &Config, category: Option<&str>) -> Result<ChatAgent> {
    let backend = HttpBackend::new(config)?;
    let mut agent = ChatAgent::new(config, Arc::new(backend));
    if let Some(name) = category {
        agent.select_category(name);
    }
    Ok(agent)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command.unwrap_or(Commands::Chat) {
        Commands::Chat => {
            let config = Config::load(cli.config.as_deref())?;
            let mut agent = build_agent(&config, cli.category.as_deref())?;
            ui::run(&mut agent).await?;
        }
        Commands::Ask { prompt } => {
            let config = Config::load(cli.config.as_deref())?;
            let mut agent = build_agent(&config, cli.category.as_deref())?;
            let reply = agent.submit_prompt(&prompt.join(" ")).await?;
            if reply.transport_failed {
                bail!("{}", reply.display.display_text);
            }
            println!("{}", reply.display.display_text);
        }
        Commands::Examples { category } => match category.or(cli.category) {
            Some(name) => println!("{}", panels::examples(&name)),
            None => {
                let config = Config::load(cli.config.as_deref())?;
                println!("{}\n", panels::categories(&config.default_category));
                for category in samchat::prompts::categories() {
                    println!("{}\n", panels::examples(category.key));
                }
            }
        },
        Commands::Init { force } => {
            let path = match cli.config {
                Some(path) => path,
                None => Config::default_path()?,
            };
            if path.exists() && !force {
                bail!("{} already exists (use --force to overwrite)", path.display());
            }
            Config::default().save(&path)?;
            println!("📝 Wrote {}", path.display());
            println!("Set api_url there, and export {} with your token.", samchat::config::DEFAULT_TOKEN_ENV);
        }
    }

    Ok(())
}
