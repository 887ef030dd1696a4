//! AI Journalist command line client
//!
//! # Usage
//!
//! ```bash
//! # Latest news on a topic
//! journalist fetch-news --topic "AI" --num-articles 5
//!
//! # Fact-check pasted content
//! journalist fact-check --content "The Eiffel Tower is in Berlin."
//!
//! # Summarize an article as a paragraph, raw JSON output
//! journalist --json summarize --url https://example.com/story --format paragraph
//!
//! # Translate to French against a local backend
//! journalist --base-url http://localhost:8000/api/v1 translate --topic "Good morning" --language fr
//! ```

use std::future::Future;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;

use ai_journalist::notify::NotificationId;
use ai_journalist::requests::language_name;
use ai_journalist::responses::sample_articles;
use ai_journalist::{
    Article, BiasDetectionRequest, BiasReport, ClientConfig, FactCheckReport, FactCheckRequest,
    FetchNewsRequest, HttpTransport, JournalistClient, JournalistError, JournalistResult,
    NewsFeed, NormalizedResult, Notifier, Operation, ProgressSimulator, Summary, SummarizeRequest,
    SummaryFormat, TranslateRequest, Translation,
};

#[derive(Parser)]
#[command(name = "journalist")]
#[command(version)]
#[command(about = "Fact-check, bias detection, summarization, translation and news fetch from the AI Journalist backend")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// YAML config file (base_url, timeout_secs, with_credentials)
    #[arg(long, global = true, env = "AI_JOURNALIST_CONFIG")]
    config: Option<PathBuf>,

    /// Backend base URL, overrides config and environment
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    /// Print the normalized result as JSON
    #[arg(long, global = true)]
    json: bool,

    /// No progress bar or notifications
    #[arg(long, short, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Check content or an article URL against trusted sources
    FactCheck {
        #[arg(long)]
        url: Option<String>,

        /// Pasted content (at least 10 characters)
        #[arg(long)]
        content: Option<String>,
    },

    /// Detect bias in content or an article URL
    Bias {
        #[arg(long)]
        url: Option<String>,

        #[arg(long)]
        topic: Option<String>,
    },

    /// Summarize content or an article URL
    Summarize {
        #[arg(long, default_value = "")]
        url: String,

        #[arg(long, default_value = "")]
        topic: String,

        /// bulletPoint, paragraph or keyHighlight
        #[arg(long, default_value = "bulletPoint")]
        format: SummaryFormat,
    },

    /// Translate content or an article URL
    Translate {
        #[arg(long, default_value = "")]
        url: String,

        #[arg(long, default_value = "")]
        topic: String,

        /// Target language code (es, fr, de, ...)
        #[arg(long)]
        language: String,
    },

    /// Fetch the latest articles on a topic
    FetchNews {
        #[arg(long)]
        topic: String,

        #[arg(long, default_value_t = 3)]
        num_articles: u32,

        /// Show the built-in sample articles if the fetch fails
        #[arg(long)]
        fallback_samples: bool,
    },
}

impl Commands {
    fn operation(&self) -> Operation {
        match self {
            Commands::FactCheck { .. } => Operation::FactCheck,
            Commands::Bias { .. } => Operation::BiasDetection,
            Commands::Summarize { .. } => Operation::Summarize,
            Commands::Translate { .. } => Operation::Translate,
            Commands::FetchNews { .. } => Operation::FetchNews,
        }
    }
}

/// Prints notifications to stderr
#[derive(Default)]
struct ConsoleNotifier {
    next_id: AtomicU64,
}

impl Notifier for ConsoleNotifier {
    fn loading(&self, _label: &str) -> NotificationId {
        NotificationId(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    fn dismiss(&self, _id: NotificationId) {}

    fn success(&self, message: &str) {
        eprintln!("{} {}", "✓".green().bold(), message);
    }

    fn error(&self, message: &str) {
        eprintln!("{} {}", "ERROR:".red().bold(), message);
    }
}

fn load_config(cli: &Cli) -> Result<ClientConfig> {
    let mut config = match &cli.config {
        Some(path) => ClientConfig::from_yaml_file(path)?,
        None => ClientConfig::from_env()?,
    };
    if let Some(base_url) = &cli.base_url {
        config.base_url = base_url.clone();
    }
    if let Some(timeout_secs) = cli.timeout_secs {
        config.timeout_secs = timeout_secs;
    }
    config.validate()?;
    Ok(config)
}

/// Drive the fake progress bar until `fut` settles
async fn with_progress<F>(op: Operation, quiet: bool, fut: F) -> JournalistResult<NormalizedResult>
where
    F: Future<Output = JournalistResult<NormalizedResult>>,
{
    if quiet {
        return fut.await;
    }

    let mut sim = ProgressSimulator::for_operation(op);
    let mut ticker = tokio::time::interval(sim.profile().interval);
    tokio::pin!(fut);

    loop {
        tokio::select! {
            outcome = &mut fut => {
                if outcome.is_ok() {
                    sim.finish();
                    draw(&sim);
                }
                eprintln!();
                return outcome;
            }
            _ = ticker.tick() => {
                sim.tick();
                draw(&sim);
            }
        }
    }
}

fn draw(sim: &ProgressSimulator) {
    let mut stderr = std::io::stderr();
    let _ = write!(stderr, "\r\x1b[2K{} {}", sim.render_bar(30).cyan(), sim.label().dimmed());
    let _ = stderr.flush();
}

fn print_articles(articles: &[Article]) {
    for (i, article) in articles.iter().enumerate() {
        println!("\n{} {}", format!("{}.", i + 1).cyan().bold(), article.heading.bold());
        if !article.description.is_empty() {
            println!("   {}", article.description);
        }
        let meta: Vec<&str> = [
            article.publisher.as_str(),
            article.published_at.as_str(),
            article.category.as_str(),
            article.tone.as_str(),
        ]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect();
        if !meta.is_empty() {
            println!("   {}", meta.join(" · ").dimmed());
        }
        if !article.url.is_empty() {
            println!("   {}", article.url.blue());
        }
    }
}

fn render(command: &Commands, result: &NormalizedResult) -> JournalistResult<()> {
    match command {
        Commands::FetchNews { .. } => {
            let feed = NewsFeed::from_result(result)?;
            println!("{} {} articles", "Found:".green().bold(), feed.articles.len());
            print_articles(&feed.articles);
        }
        Commands::Summarize { format, .. } => {
            let summary = Summary::from_result(result)?;
            println!("{} {}", "Summary".cyan().bold(), format!("({})", format.label()).dimmed());
            match format {
                SummaryFormat::Paragraph => println!("{}", summary.summary.joined()),
                _ => {
                    for bullet in summary.summary.bullets() {
                        println!("  • {}", bullet);
                    }
                }
            }
            if let Some(words) = &summary.word_count {
                println!("{} {}", "Words:".dimmed(), words);
            }
            if let Some(time) = &summary.reading_time {
                println!("{} {}", "Reading time:".dimmed(), time);
            }
        }
        Commands::Translate { language, .. } => {
            let translation = Translation::from_result(result)?;
            let target = language_name(language).unwrap_or(language.as_str());
            println!("{} {}", "Translation →".cyan().bold(), target);
            println!("{}", translation.translated_text);
            if let Some(detected) = &translation.detected_language {
                println!("{} {}", "Detected:".dimmed(), detected);
            }
        }
        Commands::Bias { .. } => {
            let report = BiasReport::from_result(result)?;
            println!(
                "{} {} ({:.0}/100)",
                "Bias level:".cyan().bold(),
                report.level().to_string().bold(),
                report.overall_score
            );
            if let Some(sentiment) = &report.sentiment {
                println!("{} {}", "Sentiment:".dimmed(), sentiment);
            }
            if let Some(confidence) = report.confidence {
                println!("{} {:.0}%", "Confidence:".dimmed(), confidence);
            }
            if !report.key_phrases.is_empty() {
                println!("{} {}", "Key phrases:".dimmed(), report.key_phrases.join(", "));
            }
            for (category, score) in &report.categories {
                println!("  {:<20} {}", category, score);
            }
        }
        Commands::FactCheck { .. } => {
            let report = FactCheckReport::from_result(result)?;
            println!("{} {}", "Verdict:".cyan().bold(), report.verdict().to_string().bold());
            if let Some(score) = report.overall_score {
                println!("{} {:.0}%", "Truth score:".dimmed(), score);
            }
            for claim in &report.key_claims {
                println!("  • {}", claim);
            }
            if let Some(reasoning) = &report.reasoning {
                println!("\n{}", reasoning);
            }
            for source in &report.sources {
                let mark = if source.verified { "✓".green() } else { "?".yellow() };
                println!("  {} {} {}", mark, source.title, source.url.blue());
            }
        }
    }
    Ok(())
}

async fn execute(client: &JournalistClient, command: &Commands) -> JournalistResult<NormalizedResult> {
    match command {
        Commands::FactCheck { url, content } => {
            client
                .fact_check(&FactCheckRequest {
                    url: url.clone(),
                    content: content.clone(),
                })
                .await
        }
        Commands::Bias { url, topic } => {
            client
                .detect_bias(&BiasDetectionRequest {
                    topic: topic.clone(),
                    url: url.clone(),
                })
                .await
        }
        Commands::Summarize { url, topic, format } => {
            client
                .summarize(&SummarizeRequest {
                    topic: topic.clone(),
                    url: url.clone(),
                    format: *format,
                })
                .await
        }
        Commands::Translate {
            url,
            topic,
            language,
        } => {
            client
                .translate(&TranslateRequest {
                    topic: topic.clone(),
                    url: url.clone(),
                    language: language.clone(),
                })
                .await
        }
        Commands::FetchNews {
            topic,
            num_articles,
            ..
        } => {
            client
                .fetch_news(&FetchNewsRequest::new(topic.clone()).with_num_articles(*num_articles))
                .await
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let config = load_config(&cli).context("Failed to load configuration")?;
    let transport = Arc::new(HttpTransport::new(&config).map_err(JournalistError::from)?);
    let notifier: Arc<dyn Notifier> = if cli.quiet {
        Arc::new(ai_journalist::SilentNotifier)
    } else {
        Arc::new(ConsoleNotifier::default())
    };
    let client = JournalistClient::with_parts(&config, transport, notifier)?;

    let op = cli.command.operation();
    let outcome = with_progress(op, cli.quiet, execute(&client, &cli.command)).await;

    match outcome {
        Ok(result) => {
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                render(&cli.command, &result)?;
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            // Validation never reaches the dispatcher, so nothing has been shown yet.
            if matches!(err, JournalistError::Validation(_)) || cli.quiet {
                eprintln!("{} {}", "ERROR:".red().bold(), err.message());
            }
            if let Commands::FetchNews {
                fallback_samples: true,
                ..
            } = &cli.command
            {
                eprintln!("{}", "Displaying sample articles instead.".yellow());
                print_articles(&sample_articles());
            }
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Applied on top of `RUST_LOG`
const DEFAULT_LOG_LEVEL: tracing::Level = tracing::Level::WARN;

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(DEFAULT_LOG_LEVEL.into()),
        )
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{} {:#}", "ERROR:".red().bold(), err);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_log_level_shows_dispatch_warnings() {
        assert_eq!(DEFAULT_LOG_LEVEL, tracing::Level::WARN);
    }

    #[test]
    fn test_cli_parses_global_flags() {
        let cli = Cli::try_parse_from(["journalist", "fetch-news", "--topic", "AI", "--json", "--quiet"])
            .unwrap();
        assert!(cli.json);
        assert!(cli.quiet);
        assert_eq!(cli.command.operation(), Operation::FetchNews);
    }
}
