pub mod detail;
pub mod links;

use std::time::Duration;

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::Client;
use tracing::{info, warn};

use crate::model::RawRecord;

const USER_AGENT: &str = concat!("recipe_crawler/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Pause between detail-page fetches.
pub const PAGE_DELAY: Duration = Duration::from_secs(1);

/// Collect stats returned after completion.
pub struct CollectStats {
    pub links: usize,
    pub ok: usize,
    pub errors: usize,
}

pub fn build_client() -> Result<Client> {
    let client = Client::builder()
        .user_agent(USER_AGENT)
        .timeout(REQUEST_TIMEOUT)
        .build()?;
    Ok(client)
}

pub(crate) async fn fetch_html(client: &Client, url: &str) -> reqwest::Result<String> {
    client.get(url).send().await?.error_for_status()?.text().await
}

/// Scrape the ranking page, then each recipe page one at a time.
/// A page that fails to fetch or parse is logged and skipped.
pub async fn collect(
    client: &Client,
    limit: usize,
    delay: Duration,
) -> Result<(Vec<RawRecord>, CollectStats)> {
    let urls = links::collect_links(client, limit).await?;
    let total = urls.len();

    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} {msg}")?
            .progress_chars("=> "),
    );

    let mut recipes = Vec::with_capacity(total);
    let mut errors = 0usize;

    for url in &urls {
        pb.set_message(url.clone());
        match detail::extract(client, url).await {
            Ok(recipe) => recipes.push(recipe),
            Err(e) => {
                errors += 1;
                pb.suspend(|| warn!("Error parsing {}: {}", url, e));
            }
        }
        pb.inc(1);
        tokio::time::sleep(delay).await;
    }

    pb.finish_and_clear();
    info!("Collected {} recipes ({} errors)", recipes.len(), errors);

    let stats = CollectStats {
        links: total,
        ok: recipes.len(),
        errors,
    };
    Ok((recipes, stats))
}
