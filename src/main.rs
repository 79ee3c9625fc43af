//! # slack2csv CLI
//!
//! Command-line interface for the slack2csv library.

use std::process;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use slack2csv::api::SlackClient;
use slack2csv::cli::Args;
use slack2csv::export::CsvExporter;
use slack2csv::paginate::Paginator;
use slack2csv::progress::{Progress, ProgressCallback};
use slack2csv::resolve::{Resolver, Target, is_conversation_id};
use slack2csv::Slack2CsvError;

fn main() {
    if let Err(e) = run() {
        eprintln!("❌ Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<(), Slack2CsvError> {
    let total_start = Instant::now();
    let args = Args::parse_args();
    init_tracing(args.verbose);

    // Validate everything local before touching the network
    let oldest = args.oldest(Utc::now())?;
    let export_config = args.export_config()?;
    let paging = args.pagination_config();
    let target = args.target()?;

    println!("📦 slack2csv v{}", env!("CARGO_PKG_VERSION"));
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("💬 Target:  {}", target);
    println!("📅 Since:   {}", fmt_ts(oldest));
    println!("💾 Output:  {}", args.filename.display());
    if export_config.has_text_filter() {
        println!("🔍 Prefix:  {:?}", export_config.text_prefix);
    }
    println!();

    let client = SlackClient::with_config(&args.token, &args.client_config())?;

    // Step 1: Resolve names to a conversation ID
    if !matches!(&target, Target::Channel(id) if is_conversation_id(id)) {
        println!("🔎 Resolving {}...", target);
    }
    let channel = Resolver::new(&client, &paging)
        .with_types(args.conversation_types())
        .resolve(&target)?
        .ok_or_else(|| Slack2CsvError::unresolved(target.kind(), target.value()))?;
    println!("   Conversation ID: {}", channel);

    // Step 2 + 3: Page through history straight into the CSV file
    println!("⏳ Fetching history ({} pagination)...", paging.mode);
    let spinner = spinner();
    let mut pager = Paginator::new(&client, channel.as_str(), oldest, &paging)
        .with_progress(spinner_callback(spinner.clone()));

    let mut exporter = CsvExporter::create(&args.filename, &export_config)?;
    let result = exporter.export(&mut pager);
    spinner.finish_and_clear();
    let stats = result?;
    let fetched = pager.stats();

    println!(
        "   Fetched {} messages in {} pages",
        fetched.messages, fetched.pages
    );
    println!();
    println!("✅ Done! Output saved to {}", args.filename.display());

    // Summary
    println!();
    println!("📊 Summary:");
    println!("   Rows written:     {}", stats.rows);
    println!("   Bot messages:     {}", stats.skipped_bot);
    println!("   Without author:   {}", stats.skipped_no_author);
    if export_config.has_text_filter() {
        println!("   Prefix mismatch:  {}", stats.skipped_text);
    }
    if let (Some(first), Some(last)) = (fetched.oldest, fetched.newest) {
        println!("   First timestamp:  {}", fmt_ts(first));
        println!("   Last timestamp:   {}", fmt_ts(last));
    }
    println!("   Total time:       {:.2}s", total_start.elapsed().as_secs_f64());

    Ok(())
}

/// Logs go to stderr; `RUST_LOG` overrides the level chosen here.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "slack2csv=debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .compact()
        .try_init();
}

fn spinner() -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message("waiting for first page...");
    pb
}

fn spinner_callback(pb: ProgressBar) -> ProgressCallback {
    Arc::new(move |progress: Progress| pb.set_message(progress.to_string()))
}

fn fmt_ts(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}
