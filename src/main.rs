use std::io::{self, BufRead, IsTerminal};
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use feedbackanalyzer::models::{FeedbackReport, StoredRunSummary};
use feedbackanalyzer::{Config, FeedbackPipeline, GeminiProvider, PipelineConfig, Storage};

#[derive(Parser, Debug)]
#[command(name = "feedbackanalyzer")]
#[command(version = "0.1.0")]
#[command(about = "Classify customer feedback and summarize it with Gemini")]
struct Args {
    /// Comments to analyze (read from stdin, one per line, when omitted)
    comments: Vec<String>,

    /// Product or service name shown in the report
    #[arg(short, long, default_value = "Produto Analisado")]
    product: String,

    /// Output format (json, text)
    #[arg(short, long, default_value = "text")]
    format: String,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    output: Option<String>,

    /// Maximum concurrent classification requests
    #[arg(long)]
    concurrency: Option<usize>,

    /// Per-comment timeout in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Database path for storing results
    #[arg(long)]
    database: Option<String>,

    /// Do not store the report
    #[arg(long)]
    no_save: bool,

    /// List stored reports and exit
    #[arg(long)]
    list: bool,

    /// Print a stored report and exit
    #[arg(long)]
    show: Option<i64>,

    /// Hide the progress bar
    #[arg(long)]
    no_progress: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("feedbackanalyzer=info".parse()?)
                .add_directive("reqwest=warn".parse()?),
        )
        .with_writer(io::stderr)
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // History commands only need the database
    if args.list || args.show.is_some() {
        let path = args
            .database
            .clone()
            .or_else(|| std::env::var("DATABASE_PATH").ok())
            .unwrap_or_else(|| "feedbackanalyzer.db".to_string());
        let storage = Storage::new(&path)?;

        if let Some(id) = args.show {
            let report = storage
                .get_report(id)?
                .ok_or_else(|| anyhow::anyhow!("No stored report with id {}", id))?;
            output_report(&report, &args)?;
        } else {
            print_runs(&storage.list_reports()?);
        }
        return Ok(());
    }

    let config = Config::from_env()?;

    let comments = if args.comments.is_empty() {
        read_stdin_comments()?
    } else {
        args.comments.clone()
    };

    let storage = if args.no_save {
        None
    } else {
        let path = args.database.as_deref().unwrap_or(&config.database_path);
        Some(Storage::new(path)?)
    };

    let llm = GeminiProvider::new(&config)?;

    let mut pipeline_config = PipelineConfig::from(&config);
    if let Some(limit) = args.concurrency {
        pipeline_config.concurrency_limit = limit;
    }
    if let Some(secs) = args.timeout_secs {
        pipeline_config.task_timeout = Duration::from_secs(secs);
    }
    pipeline_config.show_progress = !args.no_progress;

    let pipeline = FeedbackPipeline::new(llm, storage, pipeline_config);

    tracing::info!("Starting analysis of {} comments for: {}", comments.len(), args.product);
    let report = pipeline.analyze(&args.product, comments).await?;

    output_report(&report, &args)?;

    Ok(())
}

fn read_stdin_comments() -> anyhow::Result<Vec<String>> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        anyhow::bail!("No comments given; pass them as arguments or pipe them on stdin");
    }

    let mut comments = Vec::new();
    for line in stdin.lock().lines() {
        let line = line?;
        let line = line.trim();
        if !line.is_empty() {
            comments.push(line.to_string());
        }
    }
    Ok(comments)
}

fn output_report(report: &FeedbackReport, args: &Args) -> anyhow::Result<()> {
    let output = match args.format.as_str() {
        "json" => serde_json::to_string_pretty(report)?,
        _ => format_text(report),
    };

    if let Some(ref path) = args.output {
        std::fs::write(path, &output)?;
        tracing::info!("Output written to: {}", path);
    } else {
        println!("{}", output);
    }

    Ok(())
}

fn format_text(report: &FeedbackReport) -> String {
    let stats = &report.statistics;
    let mut output = String::new();

    output.push_str(&format!("\n=== Feedback Analysis: {} ===\n\n", report.product_name));
    output.push_str(&format!("Comments: {}\n", stats.total));
    output.push_str(&format!("Classified: {}\n", stats.classified));
    if stats.failed > 0 {
        output.push_str(&format!("Failed: {}\n", stats.failed));
    }

    output.push_str("\nSentiment:\n");
    for (sentiment, count) in &stats.sentiments {
        output.push_str(&format!(
            "  - {}: {} ({:.0}%)\n",
            sentiment,
            count,
            stats.percentage(*count)
        ));
    }

    output.push_str("\nCategories:\n");
    for (category, count) in &stats.categories {
        output.push_str(&format!(
            "  - {}: {} ({:.0}%)\n",
            category,
            count,
            stats.percentage(*count)
        ));
    }

    output.push_str(&format!("\nExecutive Summary:\n{}\n", report.executive_summary));

    output.push_str("\nComments:\n");
    for (i, entry) in report.entries.iter().enumerate() {
        output.push_str(&format!(
            "  {:>3}. [{} | {}] {}\n",
            i + 1,
            entry.classification.sentiment,
            entry.classification.category,
            entry.classification.short_summary
        ));
    }

    output.push_str(&format!(
        "\nModel: {}\nAnalyzed on: {}\n",
        report.model,
        report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));

    output
}

fn print_runs(runs: &[StoredRunSummary]) {
    if runs.is_empty() {
        println!("No stored reports.");
        return;
    }

    for run in runs {
        println!(
            "#{:<4} {}  {} ({} comments, {} failed)",
            run.id,
            run.generated_at.format("%Y-%m-%d %H:%M"),
            run.product_name,
            run.total,
            run.failed
        );
    }
}
