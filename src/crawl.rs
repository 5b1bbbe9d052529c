use std::collections::VecDeque;
use std::io::Write;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, warn};

use crate::fetch::Fetcher;
use crate::meeting::Meeting;
use crate::spiders::{Callback, ParseOutput, Request, Spider};

/// Crawl stats returned after completion.
#[derive(Debug, Default)]
pub struct CrawlStats {
    pub fetched: usize,
    pub meetings: usize,
    pub errors: usize,
}

/// Run one spider to completion: fetch its start URLs, feed every response
/// to the matching callback and follow the requests it yields, writing each
/// meeting as a JSON line.
///
/// `limit` caps how many linked documents are fetched.
pub async fn crawl(
    spider: &dyn Spider,
    fetcher: &Fetcher,
    limit: Option<usize>,
    sink: &mut dyn Write,
) -> Result<CrawlStats> {
    let mut queue: VecDeque<Request> = spider.start_requests().into();
    let mut stats = CrawlStats::default();
    let mut documents = 0usize;

    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} documents ({per_sec})")?
            .progress_chars("=> "),
    );

    info!("Crawling {} ({})", spider.name(), spider.agency());

    while let Some(request) = queue.pop_front() {
        if !spider.allows(&request.url) {
            debug!("Skipping off-site request {}", request.url);
            continue;
        }
        if request.callback == Callback::Document {
            if limit.is_some_and(|n| documents >= n) {
                debug!("Document limit reached, dropping {}", request.url);
                continue;
            }
            documents += 1;
        }

        let response = match fetcher.fetch(&request).await {
            Ok(r) => r,
            Err(e) => {
                warn!("Fetch failed for {}: {}", request.url, e);
                stats.errors += 1;
                advance(&pb, request.callback);
                continue;
            }
        };
        stats.fetched += 1;

        match spider.dispatch(request.callback, &response) {
            Ok(out) => {
                stats.meetings += out.items.len();
                enqueue(&pb, &mut queue, out, sink)?;
            }
            Err(e) => {
                warn!("Skipping {}: {}", response.url, e);
                stats.errors += 1;
            }
        }
        advance(&pb, request.callback);
    }

    pb.finish_and_clear();
    info!(
        "{}: {} responses, {} meetings, {} errors",
        spider.name(),
        stats.fetched,
        stats.meetings,
        stats.errors
    );
    Ok(stats)
}

fn enqueue(
    pb: &ProgressBar,
    queue: &mut VecDeque<Request>,
    out: ParseOutput,
    sink: &mut dyn Write,
) -> Result<()> {
    write_meetings(sink, &out.items)?;
    let documents = out
        .requests
        .iter()
        .filter(|r| r.callback == Callback::Document)
        .count();
    pb.inc_length(documents as u64);
    queue.extend(out.requests);
    Ok(())
}

fn advance(pb: &ProgressBar, callback: Callback) {
    if callback == Callback::Document {
        pb.inc(1);
    }
}

/// One JSON object per line.
pub fn write_meetings(sink: &mut dyn Write, meetings: &[Meeting]) -> Result<()> {
    for meeting in meetings {
        serde_json::to_writer(&mut *sink, meeting).context("Failed to serialize meeting")?;
        writeln!(sink)?;
    }
    sink.flush()?;
    Ok(())
}
