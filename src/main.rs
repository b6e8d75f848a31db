use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

mod cli;

#[derive(Parser)]
#[command(name = "ai-team")]
#[command(about = "Turn LLM answers into project files", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, global = true, help = "Enable verbose debug output")]
    verbose: bool,

    #[arg(long, global = true, help = "Show what would be written without touching the disk")]
    dry_run: bool,
}

#[derive(Args)]
struct OutputArgs {
    #[arg(short, long, default_value = ".", help = "Directory the files are written under")]
    output: PathBuf,

    #[arg(long, help = "Keep a .backup copy of files that get overwritten")]
    backup: bool,

    #[arg(long, help = "Print a JSON report instead of text")]
    json: bool,
}

impl From<OutputArgs> for cli::OutputOptions {
    fn from(args: OutputArgs) -> Self {
        Self {
            output: args.output,
            backup: args.backup,
            json: args.json,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Extract code blocks from a saved LLM answer and write them as files")]
    Extract {
        #[arg(short, long, help = "File holding the answer (reads stdin when omitted)")]
        input: Option<PathBuf>,

        #[arg(long, help = "feature, frontend, backend, testing, bug_fix or refactor")]
        task_type: Option<String>,

        #[arg(long = "area", help = "Affected area (frontend, backend, testing, general); repeatable")]
        areas: Vec<String>,

        #[command(flatten)]
        output: OutputArgs,
    },

    #[command(about = "Classify a task description")]
    Analyze {
        #[arg(help = "Task description")]
        description: String,

        #[arg(long, help = "Task title (defaults to the description)")]
        title: Option<String>,

        #[arg(long, help = "Print JSON instead of text")]
        json: bool,
    },

    #[command(about = "Print the prompt that would be sent for a task")]
    Prompt {
        #[arg(help = "Task title")]
        title: String,

        #[arg(short, long, help = "Task description")]
        description: Option<String>,

        #[arg(long)]
        task_type: Option<String>,

        #[arg(long, help = "Directory with prompt templates (defaults to ./agents)")]
        agents_dir: Option<PathBuf>,
    },

    #[command(about = "Ask the model for code and write the files it returns")]
    Generate {
        #[arg(help = "Task description")]
        description: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        task_type: Option<String>,

        #[arg(long = "area")]
        areas: Vec<String>,

        #[arg(long, help = "Directory with prompt templates (defaults to ./agents)")]
        agents_dir: Option<PathBuf>,

        #[arg(long, help = "Bypass the response cache")]
        no_cache: bool,

        #[command(flatten)]
        output: OutputArgs,
    },

    #[command(about = "Check that the API credentials are configured and valid")]
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let config = cli::Config {
        verbose: cli.verbose,
        dry_run: cli.dry_run,
    };

    match cli.command {
        Commands::Extract {
            input,
            task_type,
            areas,
            output,
        } => {
            let options = cli::ExtractOptions {
                input,
                task_type,
                areas,
                output: output.into(),
            };
            cli::extract(options, &config).await?;
        }
        Commands::Analyze {
            description,
            title,
            json,
        } => {
            cli::analyze(description, title, json).await?;
        }
        Commands::Prompt {
            title,
            description,
            task_type,
            agents_dir,
        } => {
            cli::prompt(title, description, task_type, agents_dir, &config).await?;
        }
        Commands::Generate {
            description,
            title,
            task_type,
            areas,
            agents_dir,
            no_cache,
            output,
        } => {
            let options = cli::GenerateOptions {
                description,
                title,
                task_type,
                areas,
                agents_dir,
                no_cache,
                output: output.into(),
            };
            cli::generate(options, &config).await?;
        }
        Commands::Check => {
            cli::check(&config).await?;
        }
    }

    Ok(())
}
