mod db;
mod fetch;
mod parser;
mod pipeline;

use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "tasman_scraper",
    about = "Tasman Council advertised planning applications scraper"
)]
struct Cli {
    /// SQLite database file
    #[arg(long, global = true, env = "TASMAN_DB_PATH", default_value = db::DEFAULT_DB_PATH)]
    db: PathBuf,
    /// Listing page to scrape
    #[arg(long, global = true, env = "TASMAN_URL", default_value = fetch::LISTING_URL)]
    url: String,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the listing page and save new applications (default)
    Run,
    /// Show database statistics
    Stats,
    /// List stored applications, newest first
    List {
        /// Max rows to display
        #[arg(short = 'n', long, default_value = "50")]
        limit: usize,
        /// Print one JSON object per line instead of a table
        #[arg(long)]
        json: bool,
    },
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

    let result = match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => pipeline::run(&cli.url, &cli.db).await.map(|_| ()),
        Commands::Stats => {
            let conn = db::connect(&cli.db)?;
            db::init_schema(&conn)?;
            let s = db::get_stats(&conn)?;
            println!("Applications: {}", s.total);
            println!("References:   {}", s.references);
            println!("On notice:    {}", s.on_notice);
            println!("Last scraped: {}", s.last_scraped.as_deref().unwrap_or("never"));
            Ok(())
        }
        Commands::List { limit, json } => {
            let conn = db::connect(&cli.db)?;
            db::init_schema(&conn)?;
            let rows = db::fetch_records(&conn, limit)?;
            if json {
                for r in &rows {
                    println!("{}", serde_json::to_string(r)?);
                }
                return Ok(());
            }
            if rows.is_empty() {
                println!("No applications stored. Run 'run' first.");
                return Ok(());
            }

            println!(
                "{:>3} | {:<16} | {:<40} | {:<14} | {:<14} | {:<10}",
                "#", "Reference", "Description", "Received", "On notice to", "Scraped"
            );
            println!("{}", "-".repeat(112));

            for (i, r) in rows.iter().enumerate() {
                println!(
                    "{:>3} | {:<16} | {:<40} | {:<14} | {:<14} | {:<10}",
                    i + 1,
                    truncate(&r.council_reference, 16),
                    truncate(&r.description, 40),
                    r.date_received.as_deref().unwrap_or("-"),
                    r.on_notice_to.as_deref().unwrap_or("-"),
                    r.date_scraped,
                );
            }
            println!("\n{} applications", rows.len());
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {:.1}s", elapsed.as_secs_f64());
    }

    result
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
    }
}
