mod aggregate;
mod diagnostics;
mod fetch;
mod links;
mod normalize;
mod output;
mod pipeline;
mod record;
mod settings;
mod term;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;

use fetch::{PageSource, SkedClient};
use settings::Settings;

#[derive(Parser)]
#[command(
    name = "sked_parser",
    about = "Convert sked timetables from overview URLs into a readable format for spluseins.de"
)]
struct Cli {
    /// Main yaml configuration file
    #[arg(short = 'c', long, default_value = "config.yaml", global = true)]
    config_file: PathBuf,
    /// Yaml secrets file with the sked user and password
    #[arg(short = 's', long, default_value = "secrets.yaml", global = true)]
    secrets_file: PathBuf,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse all configured plans and write the timetable json (default)
    Run {
        /// Where to store the resulting json file, can be given multiple times
        #[arg(short = 'o', long = "out-file")]
        out_files: Vec<PathBuf>,
    },
    /// Print the timetable links found on one overview page
    Links {
        url: String,
        /// Faculty name, enables faculty specific link heuristics
        #[arg(short, long, default_value = "")]
        faculty: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let settings = Settings::load(&cli.config_file, &cli.secrets_file)?;
    let client = SkedClient::new(settings.credentials()?);

    let command = cli.command.unwrap_or(Commands::Run { out_files: Vec::new() });
    match command {
        Commands::Run { mut out_files } => {
            if out_files.is_empty() {
                out_files.push(PathBuf::from(output::DEFAULT_OUT_FILE));
            }
            let records = pipeline::run(&client, &settings).await?;
            output::write_json(&records, &out_files)?;
            let targets: Vec<String> = out_files.iter().map(|p| p.display().to_string()).collect();
            info!(
                "Successfully parsed {} timetables and wrote them to {}",
                records.len(),
                targets.join(", ")
            );
        }
        Commands::Links { url, faculty } => {
            let markup = client.fetch(&url).await?;
            let pairs = links::extract(&markup, &url, &faculty, &settings.base_url)
                .with_context(|| format!("Failed to parse {}", url))?;
            for pair in &pairs {
                println!("{:<60} {}", pair.description, pair.path);
            }
            println!("\n{} timetable links", pairs.len());
        }
    }

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }
    Ok(())
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else {
        format!("{}m {}s", secs / 60, secs % 60)
    }
}
