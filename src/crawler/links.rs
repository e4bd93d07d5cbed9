use std::sync::LazyLock;

use anyhow::{Context, Result};
use reqwest::Client;
use scraper::{Html, Selector};
use tracing::info;

pub const BASE_URL: &str = "https://www.10000recipe.com";
pub const RANKING_PATH: &str = "/ranking/home_new.html";
pub const DEFAULT_LIMIT: usize = 50;

static RANKING_LINK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".common_sp_link").unwrap());

/// Fetch the ranking page and return up to `limit` recipe detail URLs.
pub async fn collect_links(client: &Client, limit: usize) -> Result<Vec<String>> {
    let url = format!("{}{}", BASE_URL, RANKING_PATH);
    info!("Fetching ranking page: {}", url);
    let html = super::fetch_html(client, &url)
        .await
        .context("Failed to fetch ranking page")?;

    let links = parse_ranking_page(&html, limit);
    info!("Recipe links on ranking page: {}", links.len());
    Ok(links)
}

/// Absolute `/recipe/…` links in document order, capped at `limit`.
/// Duplicates are kept.
pub fn parse_ranking_page(html: &str, limit: usize) -> Vec<String> {
    let doc = Html::parse_document(html);
    doc.select(&RANKING_LINK)
        .filter_map(|a| a.value().attr("href"))
        .filter(|href| href.starts_with("/recipe/"))
        .map(|href| format!("{}{}", BASE_URL, href))
        .take(limit)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_recipe_links_only() {
        let html = r#"
            <a class="common_sp_link" href="/recipe/6903394">a</a>
            <a class="common_sp_link" href="/profile/index.html?uid=x">b</a>
            <a class="common_sp_link">no href</a>
            <a class="other" href="/recipe/1">c</a>
            <a class="common_sp_link" href="/recipe/6846342">d</a>
        "#;
        assert_eq!(
            parse_ranking_page(html, 50),
            vec![
                "https://www.10000recipe.com/recipe/6903394",
                "https://www.10000recipe.com/recipe/6846342",
            ]
        );
    }

    #[test]
    fn caps_at_limit_and_keeps_duplicates() {
        let html = r#"
            <a class="common_sp_link" href="/recipe/1">1</a>
            <a class="common_sp_link" href="/recipe/1">1 again</a>
            <a class="common_sp_link" href="/recipe/2">2</a>
        "#;
        let links = parse_ranking_page(html, 2);
        assert_eq!(links.len(), 2);
        assert_eq!(links[0], links[1]);
        assert!(parse_ranking_page(html, 0).is_empty());
    }

    #[test]
    fn ranking_fixture() {
        let html = std::fs::read_to_string("tests/fixtures/ranking.html").unwrap();
        let links = parse_ranking_page(&html, DEFAULT_LIMIT);
        assert_eq!(links.len(), 3);
        assert!(links.iter().all(|l| l.starts_with("https://www.10000recipe.com/recipe/")));
    }
}
