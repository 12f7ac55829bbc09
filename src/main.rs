mod document;
mod error;
mod model;
mod parser;
mod settings;

use std::path::PathBuf;
use std::time::Instant;

use chrono::Utc;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};

use parser::{CleanOutcome, Cleaner};
use settings::CleanerConfig;

#[derive(Parser)]
#[command(name = "quora_cleaner", about = "Split, clean and deduplicate scraped profile Q&A")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Clean an extractor JSON file into <user_id>_cleaned.json / .txt
    Clean {
        /// Path to the <user_id>_ultimate.json file
        input: PathBuf,
        /// Output directory
        #[arg(short, long, default_value = "./output_cleaned")]
        output: PathBuf,
        #[command(flatten)]
        tuning: Tuning,
    },
    /// Write the raw-stage <user_id>_ultimate.txt for an extractor JSON file
    Render {
        input: PathBuf,
        #[arg(short, long, default_value = "./output_ultimate")]
        output: PathBuf,
    },
    /// Clean in memory and print the first records without writing files
    Preview {
        input: PathBuf,
        /// Max rows to display
        #[arg(short = 'n', long, default_value = "20")]
        limit: usize,
        #[command(flatten)]
        tuning: Tuning,
    },
}

#[derive(clap::Args)]
struct Tuning {
    /// Config file (TOML/JSON/YAML); QA_CLEANER_* env vars override it
    #[arg(long)]
    config: Option<PathBuf>,
    /// Questions must be longer than this many characters
    #[arg(long)]
    min_question_chars: Option<usize>,
    /// Answers must be longer than this many characters
    #[arg(long)]
    min_answer_chars: Option<usize>,
}

impl Tuning {
    fn load(&self) -> anyhow::Result<CleanerConfig> {
        Ok(CleanerConfig::load(self.config.as_deref())?
            .with_overrides(self.min_question_chars, self.min_answer_chars))
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Clean { input, output, tuning } => {
            let config = tuning.load()?;
            let doc = document::read_document(&input)?;
            println!("Cleaning {} raw blocks for {}...", doc.blocks.len(), doc.profile.user_id);

            let pb = ProgressBar::new(doc.blocks.len() as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})")?
                    .progress_chars("#>-"),
            );
            let outcome = run_cleaner(config, &doc, &pb)?;
            pb.finish_and_clear();

            let (json_path, txt_path) = document::write_cleaned(&output, &outcome.document)?;
            print_summary(&outcome);
            println!("\nSaved {}", json_path.display());
            println!("Saved {}", txt_path.display());
            Ok(())
        }
        Commands::Render { input, output } => {
            let doc = document::read_document(&input)?;
            let path = document::write_raw_text(&output, &doc)?;
            println!("Rendered {} raw blocks to {}", doc.blocks.len(), path.display());
            Ok(())
        }
        Commands::Preview { input, limit, tuning } => {
            let config = tuning.load()?;
            let doc = document::read_document(&input)?;
            let outcome = run_cleaner(config, &doc, &ProgressBar::hidden())?;
            let answers = &outcome.document.answers;
            if answers.is_empty() {
                println!("No answers survived cleaning.");
                return Ok(());
            }

            println!("{:>3} | {:<48} | {:<48} | {:>6}", "#", "Question", "Answer", "Chars");
            println!("{}", "-".repeat(115));
            for (i, a) in answers.iter().take(limit).enumerate() {
                println!(
                    "{:>3} | {:<48} | {:<48} | {:>6}",
                    i + 1,
                    truncate(&a.question, 45),
                    truncate(&a.answer, 45),
                    a.answer.chars().count()
                );
            }
            if answers.len() > limit {
                println!("... {} more", answers.len() - limit);
            }
            print_summary(&outcome);
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

fn run_cleaner(
    config: CleanerConfig,
    doc: &model::RawDocument,
    pb: &ProgressBar,
) -> anyhow::Result<CleanOutcome> {
    let run_at = Utc::now().to_rfc3339();
    let cleaner = Cleaner::new(config)?;
    Ok(cleaner.clean(doc, &run_at, pb)?)
}

fn print_summary(outcome: &CleanOutcome) {
    let s = &outcome.document.scraping_stats;
    let k = &outcome.skips;
    println!("\nOriginal extractions:         {}", s.original_extractions);
    println!("Blocks split (multiple Q&As): {}", s.blocks_split);
    println!(
        "Skipped:                      {} (empty question {}, short question {}, short answer {}, same text {})",
        s.entries_skipped, k.empty_question, k.question_too_short, k.answer_too_short, k.question_is_answer
    );
    println!("After cleaning:               {}", s.after_cleaning);
    println!("After deduplication:          {}", s.after_deduplication);
    println!(
        "Extraction rate:              {}/{}",
        s.after_deduplication,
        outcome.document.profile.claimed()
    );
}

fn truncate(s: &str, max: usize) -> String {
    let flat = s.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= max {
        flat
    } else {
        let truncated: String = flat.chars().take(max).collect();
        format!("{}...", truncated)
    }
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
