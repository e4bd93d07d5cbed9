use std::sync::LazyLock;

use regex::Regex;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use thiserror::Error;

use crate::model::{RawIngredient, RawInstructions, RawRecord, RawScalar};

static TITLE: LazyLock<Selector> = LazyLock::new(|| Selector::parse(".view2_summary h3").unwrap());
static IMAGE: LazyLock<Selector> = LazyLock::new(|| Selector::parse(".centeredcrop img").unwrap());
static INGREDIENT: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".ready_ingre3 ul li").unwrap());
static STEP: LazyLock<Selector> = LazyLock::new(|| Selector::parse(".view_step_cont").unwrap());
static TAG: LazyLock<Selector> = LazyLock::new(|| Selector::parse(".tag_cont a").unwrap());
static SERVINGS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".view2_summary_info1").unwrap());
static TIME: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".view2_summary_info2").unwrap());
static LEVEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".view2_summary_info3").unwrap());

/// "돼지고기 300g" → ("돼지고기", "300g")
static INGREDIENT_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+?)\s+([\d\w]+)$").unwrap());

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Page has no {0} element")]
    MissingElement(&'static str),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Fetch one recipe page and pull out its raw fields.
pub async fn extract(client: &Client, url: &str) -> Result<RawRecord, ExtractError> {
    let html = super::fetch_html(client, url).await?;
    parse_recipe_page(&html)
}

/// A missing title is an error; every other element is optional.
pub fn parse_recipe_page(html: &str) -> Result<RawRecord, ExtractError> {
    let doc = Html::parse_document(html);

    let name = doc
        .select(&TITLE)
        .next()
        .map(element_text)
        .ok_or(ExtractError::MissingElement("title (.view2_summary h3)"))?;

    let image = doc
        .select(&IMAGE)
        .next()
        .and_then(|img| img.value().attr("src"))
        .unwrap_or_default()
        .to_string();

    let ingredients = doc
        .select(&INGREDIENT)
        .map(element_text)
        .filter(|line| !line.is_empty())
        .map(|line| split_ingredient_line(&line))
        .collect();

    let instructions = doc.select(&STEP).map(element_text).collect();
    let tags = doc.select(&TAG).map(element_text).collect();

    Ok(RawRecord {
        name: Some(name),
        image: Some(image),
        ingredients: Some(ingredients),
        instructions: Some(RawInstructions::Many(instructions)),
        cooking_time_minutes: None,
        cooking_time: badge(&doc, &TIME),
        difficulty: badge(&doc, &LEVEL),
        servings: badge(&doc, &SERVINGS),
        tags: Some(tags),
    })
}

/// Last word becomes the quantity when it is a single token of word chars.
pub fn split_ingredient_line(line: &str) -> RawIngredient {
    let (name, quantity) = match INGREDIENT_LINE_RE.captures(line) {
        Some(caps) => (caps[1].to_string(), caps[2].to_string()),
        None => (line.to_string(), String::new()),
    };
    RawIngredient::Structured {
        name: Some(name),
        quantity: Some(RawScalar::Text(quantity)),
        is_available: Some(false),
    }
}

fn badge(doc: &Html, selector: &Selector) -> Option<RawScalar> {
    doc.select(selector)
        .next()
        .map(element_text)
        .filter(|t| !t.is_empty())
        .map(RawScalar::Text)
}

/// Text nodes trimmed and joined with single spaces.
fn element_text(el: ElementRef<'_>) -> String {
    el.text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
