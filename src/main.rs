mod bootstrap;
mod config;
mod crawler;
mod dataset;
mod model;
mod normalize;
mod persist;
mod prompt;
mod store;

use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use crate::bootstrap::SetupOutcome;
use crate::config::Config;
use crate::normalize::Normalizer;

#[derive(Parser)]
#[command(name = "recipe_crawler", about = "10000recipe.com scraper and Supabase importer")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape ranking recipes into a JSON file
    Collect {
        /// Max recipe pages to scrape
        #[arg(short = 'n', long, default_value_t = crawler::links::DEFAULT_LIMIT)]
        limit: usize,
        /// Where to write the scraped recipes
        #[arg(short, long, default_value = dataset::DEFAULT_PATH)]
        output: PathBuf,
    },
    /// Normalize scraped recipes and insert them into Supabase
    Import {
        /// Scraped recipes file
        #[arg(short, long, default_value = dataset::DEFAULT_PATH)]
        input: PathBuf,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Print normalized recipes without touching the database
    Normalize {
        /// Scraped recipes file
        #[arg(short, long, default_value = dataset::DEFAULT_PATH)]
        input: PathBuf,
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Create .env.local with Supabase credentials
    Setup,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Collect { limit, output } => {
            let client = crawler::build_client()?;
            println!("Collecting up to {} recipe links...", limit);
            let (recipes, stats) = crawler::collect(&client, limit, crawler::PAGE_DELAY).await?;
            dataset::save_raw(&output, &recipes)?;
            println!(
                "Done: {} links ({} ok, {} errors). Saved {}",
                stats.links,
                stats.ok,
                stats.errors,
                output.display()
            );
            Ok(())
        }
        Commands::Import { input, yes } => {
            let config = Config::load()
                .map_err(|e| anyhow::anyhow!("{}\n\n{}", e, e.remediation()))?;
            let recipes = dataset::load_raw(&input)?;
            if recipes.is_empty() {
                println!("No recipes in {}. Run 'collect' first.", input.display());
                return Ok(());
            }
            println!("Loaded {} recipes from {}", recipes.len(), input.display());

            if !yes {
                let question = format!("Import {} recipes into Supabase. Continue?", recipes.len());
                if !prompt::confirm(&mut io::stdin().lock(), &mut io::stdout(), &question)? {
                    println!("Import cancelled.");
                    return Ok(());
                }
            }

            let store = store::SupabaseStore::new(&config).context("Failed to create Supabase client")?;
            let normalizer = Normalizer::new(config.noise_tokens.clone());
            info!(
                url = %config.supabase_url,
                env_file = ?config.env_file,
                anon_key = config.anon_key.is_some(),
                perplexity = config.perplexity_api_key.is_some(),
                openai = config.openai_api_key.is_some(),
                noise_tokens = ?normalizer.noise_tokens(),
                "Supabase target configured"
            );
            let stats =
                persist::persist_all(&store, &normalizer, &recipes, persist::INSERT_DELAY).await?;
            println!("\nImport finished:");
            println!("  Success: {}", stats.success);
            println!("  Failed:  {}", stats.errors);
            println!("  Total:   {}", stats.total());
            Ok(())
        }
        Commands::Normalize { input, output } => {
            let recipes = dataset::load_raw(&input)?;
            let normalizer = match config::load_noise_tokens() {
                Ok(tokens) => Normalizer::new(tokens),
                Err(e) => {
                    warn!("{}; using default noise tokens", e);
                    Normalizer::default()
                }
            };
            let normalized: Vec<_> = recipes.iter().map(|r| normalizer.normalize(r)).collect();
            let json = serde_json::to_string_pretty(&normalized)?;
            match output {
                Some(path) => {
                    std::fs::write(&path, json)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    println!("Wrote {} normalized recipes to {}", normalized.len(), path.display());
                }
                None => {
                    let mut stdout = io::stdout().lock();
                    writeln!(stdout, "{}", json)?;
                }
            }
            Ok(())
        }
        Commands::Setup => {
            let target = config::project_env_file();
            match bootstrap::run_setup(&mut io::stdin().lock(), &mut io::stdout(), &target)? {
                SetupOutcome::Written(path) => info!("Setup complete: {}", path.display()),
                SetupOutcome::Cancelled => {}
                SetupOutcome::MissingInput(key) => {
                    anyhow::bail!("{} is required; nothing was written", key)
                }
            }
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
