use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing::info;

use city_scrapers::crawl::{self, write_meetings};
use city_scrapers::fetch::Fetcher;
use city_scrapers::pipeline::Pipeline;
use city_scrapers::settings::Settings;
use city_scrapers::spiders::{self, Callback, RequestMeta, Response, SPIDER_NAMES};

#[derive(Parser)]
#[command(name = "city_scrapers", about = "Public meeting scrapers for Pittsburgh-area agencies")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List available spiders
    List,
    /// Fetch a spider's pages and print meetings as JSON lines
    Crawl {
        /// Spider name (see `list`)
        spider: String,
        /// Max linked documents to fetch (default: all)
        #[arg(short = 'n', long)]
        limit: Option<usize>,
        /// Write meetings here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Run a spider callback on a saved page or PDF
    Parse {
        /// Spider name (see `list`)
        spider: String,
        /// Saved listing page, or a .pdf agenda
        file: PathBuf,
        /// URL the file was downloaded from
        #[arg(long)]
        url: Option<String>,
        /// Fallback title, as carried from a listing row
        #[arg(long)]
        title: Option<String>,
        /// Fallback date (YYYY-MM-DD), as carried from a listing row
        #[arg(long)]
        date: Option<NaiveDate>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let pipeline = Pipeline::new();

    match cli.command {
        Commands::List => {
            for spider in spiders::all(pipeline) {
                println!(
                    "{:<14} | {:<46} | {}",
                    spider.name(),
                    spider.agency(),
                    spider.timezone()
                );
            }
            Ok(())
        }
        Commands::Crawl { spider, limit, output } => {
            let spider = spiders::by_name(&spider, pipeline)
                .with_context(|| format!("Expected one of: {}", SPIDER_NAMES.join(", ")))?;
            let settings = Settings::load().context("Failed to load settings")?;
            info!(settings = ?settings, "Loaded settings");
            let fetcher = Fetcher::new(&settings)?;

            let mut sink = open_sink(output.as_deref())?;
            let stats = crawl::crawl(spider.as_ref(), &fetcher, limit, sink.as_mut()).await?;
            eprintln!(
                "Done: {} responses, {} meetings, {} errors in {:.1}s",
                stats.fetched,
                stats.meetings,
                stats.errors,
                t0.elapsed().as_secs_f64()
            );
            Ok(())
        }
        Commands::Parse { spider, file, url, title, date } => {
            let spider = spiders::by_name(&spider, pipeline)
                .with_context(|| format!("Expected one of: {}", SPIDER_NAMES.join(", ")))?;
            let body = std::fs::read(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let url = match url {
                Some(u) => u,
                None => file_url(&file)?,
            };
            let callback = if is_pdf(&file) {
                Callback::Document
            } else {
                Callback::Listing
            };
            let response = Response {
                url,
                body,
                meta: RequestMeta {
                    title,
                    date: date.and_then(|d| d.and_hms_opt(0, 0, 0)),
                },
            };

            let out = spider
                .dispatch(callback, &response)
                .with_context(|| format!("Failed to parse {}", file.display()))?;
            for request in &out.requests {
                info!("Would follow {}", request.url);
            }
            let stdout = io::stdout();
            write_meetings(&mut stdout.lock(), &out.items)?;
            Ok(())
        }
    }
}

fn open_sink(path: Option<&Path>) -> anyhow::Result<Box<dyn Write>> {
    Ok(match path {
        Some(p) => {
            let file = File::create(p).with_context(|| format!("Failed to create {}", p.display()))?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(BufWriter::new(io::stdout())),
    })
}

fn file_url(path: &Path) -> anyhow::Result<String> {
    let abs = path
        .canonicalize()
        .with_context(|| format!("Failed to resolve {}", path.display()))?;
    url::Url::from_file_path(&abs)
        .map(|u| u.to_string())
        .map_err(|_| anyhow::anyhow!("Not an absolute path: {}", abs.display()))
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
}
