mod config;
mod export_cmd;
mod generate_cmd;
mod serve_cmd;
#[cfg(test)]
mod test_util;

use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use config::HabitConfig;
use generate_cmd::GenerateOptions;

#[derive(Parser)]
#[command(name = "habit", version, about = "Turn free-form goals into SMART habit plans")]
struct Cli {
    /// Model command, e.g. "ollama run llama3.2" (overrides HABIT_MODEL_COMMAND env var)
    #[arg(long, global = true)]
    model_command: Option<String>,

    /// Token budget per generation (overrides HABIT_MAX_TOKENS env var)
    #[arg(long, global = true)]
    max_tokens: Option<u32>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a habit config file
    Init {
        /// Model binary to invoke
        #[arg(long, default_value = "ollama")]
        command: String,
        /// Argument passed to the model binary (repeatable; {max_tokens} is substituted)
        #[arg(long = "arg", allow_hyphen_values = true, default_values = ["run", "llama3.2"])]
        args: Vec<String>,
        /// Kill model calls that run longer than this many seconds
        #[arg(long)]
        timeout_secs: Option<u64>,
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
    /// Generate three SMART plans for a goal
    Generate {
        /// The goal, in your own words
        #[arg(required = true)]
        goal: Vec<String>,
        /// Show only this version (1, 2 or 3)
        #[arg(long)]
        pick: Option<usize>,
        /// Export the picked version to a PDF file
        #[arg(long, requires = "pick")]
        export: Option<PathBuf>,
        /// Print a JSON report instead of text
        #[arg(long)]
        json: bool,
    },
    /// Export an edited plan to PDF
    Export {
        /// Plan text file, or - for stdin
        input: String,
        /// Output PDF path (defaults to a new temporary file)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Serve the web form and JSON API
    Serve {
        /// Address to bind
        #[arg(long, default_value = "127.0.0.1")]
        bind: String,
        /// Port to listen on
        #[arg(long, default_value_t = 3000)]
        port: u16,
    },
    /// Print shell completions
    Completions {
        /// Target shell
        shell: Shell,
    },
}

/// Execute the `habit init` command: write config file.
fn cmd_init(
    command: &str,
    args: Vec<String>,
    max_tokens: Option<u32>,
    timeout_secs: Option<u64>,
    force: bool,
) -> anyhow::Result<()> {
    let path = config::config_path();

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}\nUse --force to overwrite.",
            path.display()
        );
    }

    let cfg = config::ConfigFile {
        model: config::ModelSection {
            command: Some(command.to_string()),
            args,
            max_tokens,
            timeout_secs,
        },
    };

    config::save_config(&cfg)?;

    println!("Config written to {}", path.display());
    println!("  model.command = {command}");
    println!("  model.args = {:?}", cfg.model.args);
    println!();
    println!("Next: run `habit generate \"<your goal>\"`.");

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init {
            command,
            args,
            timeout_secs,
            force,
        } => {
            cmd_init(&command, args, cli.max_tokens, timeout_secs, force)?;
        }
        Commands::Generate {
            goal,
            pick,
            export,
            json,
        } => {
            let resolved = HabitConfig::resolve(cli.model_command.as_deref(), cli.max_tokens)?;
            let model = resolved.gateway();
            let options = GenerateOptions { pick, export, json };
            let mut stdout = std::io::stdout();
            generate_cmd::run_generate(
                model.as_ref(),
                &resolved.generation,
                &goal.join(" "),
                &options,
                &mut stdout,
            )
            .await?;
        }
        Commands::Export { input, output } => {
            let path = export_cmd::run_export(&input, output.as_deref())?;
            println!("Exported to {}", path.display());
        }
        Commands::Serve { bind, port } => {
            let resolved = HabitConfig::resolve(cli.model_command.as_deref(), cli.max_tokens)?;
            let state = serve_cmd::AppState {
                model: resolved.gateway(),
                config: resolved.generation,
            };
            serve_cmd::run_serve(state, &bind, port).await?;
        }
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "habit", &mut std::io::stdout());
        }
    }

    Ok(())
}
