//! Raw scraped record → canonical `recipes` row.
//!
//! Every rule here is total: malformed input falls back to a default instead
//! of failing.

use uuid::Uuid;

use crate::model::{
    CanonicalRecord, Difficulty, Ingredient, RawIngredient, RawInstructions, RawRecord, RawScalar,
};

pub const DEFAULT_NAME: &str = "제목 없음";
pub const DEFAULT_COOKING_TIME: u32 = 30;
pub const DEFAULT_SERVINGS: u32 = 2;

/// The "buy" button label that 10000recipe renders inside ingredient rows.
pub const DEFAULT_NOISE_TOKENS: &[&str] = &["구매"];

const MINUTE_SUFFIX: &str = "분";
const SERVINGS_SUFFIX: &str = "인분";

// Checked in this order; the first list with a hit wins.
const EASY_TOKENS: &[&str] = &["초급", "easy"];
const MEDIUM_TOKENS: &[&str] = &["중급", "medium"];
const HARD_TOKENS: &[&str] = &["고급", "hard"];

/// Recipes inserted by the importer have no authenticated owner.
pub const NO_OWNER: Uuid = Uuid::nil();

#[derive(Debug, Clone)]
pub struct Normalizer {
    noise_tokens: Vec<String>,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(DEFAULT_NOISE_TOKENS.iter().map(|t| t.to_string()))
    }
}

impl Normalizer {
    /// Empty tokens are ignored.
    pub fn new<I>(noise_tokens: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let noise_tokens = noise_tokens
            .into_iter()
            .filter(|t| !t.is_empty())
            .collect();
        Self { noise_tokens }
    }

    pub fn noise_tokens(&self) -> &[String] {
        &self.noise_tokens
    }

    pub fn normalize(&self, raw: &RawRecord) -> CanonicalRecord {
        CanonicalRecord {
            id: Uuid::new_v4(),
            name: normalize_name(raw.name.as_deref()),
            image: raw.image.clone().unwrap_or_default(),
            ingredients: self.normalize_ingredients(raw.ingredients.as_deref().unwrap_or_default()),
            instructions: normalize_instructions(raw.instructions.as_ref()),
            cooking_time: parse_cooking_time(
                raw.cooking_time_minutes.as_ref(),
                raw.cooking_time.as_ref(),
            ),
            difficulty: parse_difficulty(raw.difficulty.as_ref()),
            servings: parse_servings(raw.servings.as_ref()),
            tags: raw.tags.clone().unwrap_or_default(),
            created_by: NO_OWNER,
        }
    }

    /// Removes every noise token, then trims.
    pub fn clean_ingredient_name(&self, name: &str) -> String {
        let mut cleaned = name.to_string();
        for token in &self.noise_tokens {
            cleaned = cleaned.replace(token.as_str(), "");
        }
        cleaned.trim().to_string()
    }

    pub fn normalize_ingredients(&self, raw: &[RawIngredient]) -> Vec<Ingredient> {
        raw.iter()
            .filter_map(|entry| {
                let (name, quantity, is_available) = match entry {
                    RawIngredient::Structured {
                        name,
                        quantity,
                        is_available,
                    } => (
                        self.clean_ingredient_name(name.as_deref().unwrap_or_default()),
                        quantity.as_ref().map(|q| q.to_string()).unwrap_or_default(),
                        is_available.unwrap_or(false),
                    ),
                    RawIngredient::Plain(line) => {
                        (self.clean_ingredient_name(line), String::new(), false)
                    }
                };
                if name.is_empty() {
                    return None;
                }
                Some(Ingredient {
                    name,
                    quantity,
                    is_available,
                })
            })
            .collect()
    }
}

/// Trimmed; blank or missing names get the placeholder title.
pub fn normalize_name(raw: Option<&str>) -> String {
    raw.map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or(DEFAULT_NAME)
        .to_string()
}

pub fn normalize_instructions(raw: Option<&RawInstructions>) -> Vec<String> {
    match raw {
        Some(RawInstructions::Many(steps)) => steps.clone(),
        Some(RawInstructions::One(step)) => vec![step.clone()],
        None => Vec::new(),
    }
}

/// `cookingTime` (already in minutes) wins over the free-text `cooking_time`.
pub fn parse_cooking_time(minutes: Option<&RawScalar>, text: Option<&RawScalar>) -> u32 {
    if let Some(value) = minutes {
        return coerce_minutes(value).unwrap_or(DEFAULT_COOKING_TIME);
    }
    text.and_then(|t| parse_scalar_suffixed(t, MINUTE_SUFFIX))
        .unwrap_or(DEFAULT_COOKING_TIME)
}

fn coerce_minutes(value: &RawScalar) -> Option<u32> {
    match value {
        RawScalar::Int(n) => u32::try_from(*n).ok(),
        RawScalar::Float(x) if x.is_finite() && *x >= 0.0 && *x <= u32::MAX as f64 => {
            Some(x.trunc() as u32)
        }
        RawScalar::Float(_) | RawScalar::Bool(_) => None,
        RawScalar::Text(s) => parse_suffixed(s, MINUTE_SUFFIX),
    }
}

pub fn parse_difficulty(raw: Option<&RawScalar>) -> Difficulty {
    let Some(raw) = raw else {
        return Difficulty::default();
    };
    let text = raw.to_string().to_lowercase();
    let has_any = |tokens: &[&str]| tokens.iter().any(|t| text.contains(t));

    if has_any(EASY_TOKENS) {
        Difficulty::Easy
    } else if has_any(MEDIUM_TOKENS) {
        Difficulty::Medium
    } else if has_any(HARD_TOKENS) {
        Difficulty::Hard
    } else {
        Difficulty::default()
    }
}

/// Zero servings is treated as unparseable.
pub fn parse_servings(raw: Option<&RawScalar>) -> u32 {
    raw.and_then(|r| parse_scalar_suffixed(r, SERVINGS_SUFFIX))
        .filter(|n| *n > 0)
        .unwrap_or(DEFAULT_SERVINGS)
}

/// Floats render with a fractional part (`"45.0"`) in the scraped text and so
/// never count as a bare number.
fn parse_scalar_suffixed(raw: &RawScalar, suffix: &str) -> Option<u32> {
    match raw {
        RawScalar::Float(_) => None,
        other => parse_suffixed(&other.to_string(), suffix),
    }
}

/// `"30분"` / `"30"` → 30. Anything else (`"30분 이내"`, `"abc"`, `"-1"`) → None.
fn parse_suffixed(text: &str, suffix: &str) -> Option<u32> {
    let text = text.trim();
    if text.contains(suffix) {
        text.replace(suffix, "").trim().parse().ok()
    } else if is_digits(text) {
        text.parse().ok()
    } else {
        None
    }
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(json: &str) -> RawRecord {
        serde_json::from_str(json).unwrap()
    }

    fn text(s: &str) -> RawScalar {
        RawScalar::from(s)
    }

    // ── cooking time ──

    #[test]
    fn cooking_time_prefers_camel_case_minutes() {
        let r = raw(r#"{"cookingTime": 45, "cooking_time": "10분"}"#);
        assert_eq!(Normalizer::default().normalize(&r).cooking_time, 45);
    }

    #[test]
    fn cooking_time_from_minute_suffix() {
        let r = raw(r#"{"cooking_time": "30분"}"#);
        assert_eq!(Normalizer::default().normalize(&r).cooking_time, 30);
        assert_eq!(parse_cooking_time(None, Some(&text("90분"))), 90);
    }

    #[test]
    fn cooking_time_plain_digits() {
        assert_eq!(parse_cooking_time(None, Some(&text("15"))), 15);
        assert_eq!(parse_cooking_time(None, Some(&RawScalar::Int(20))), 20);
    }

    #[test]
    fn cooking_time_garbage_falls_back() {
        assert_eq!(parse_cooking_time(None, Some(&text("abc"))), 30);
        assert_eq!(parse_cooking_time(None, Some(&text("30분 이내"))), 30);
        assert_eq!(parse_cooking_time(None, Some(&text("-5"))), 30);
        assert_eq!(parse_cooking_time(None, None), 30);
    }

    #[test]
    fn float_text_fields_fall_back() {
        assert_eq!(parse_cooking_time(None, Some(&RawScalar::Float(45.0))), 30);
        assert_eq!(parse_servings(Some(&RawScalar::Float(4.0))), 2);
        let r = raw(r#"{"cooking_time": 45.0, "servings": 3.0}"#);
        let c = Normalizer::default().normalize(&r);
        assert_eq!((c.cooking_time, c.servings), (30, 2));
    }

    #[test]
    fn cooking_time_camel_case_coercion() {
        assert_eq!(parse_cooking_time(Some(&RawScalar::Float(45.9)), None), 45);
        assert_eq!(parse_cooking_time(Some(&text("60")), None), 60);
        assert_eq!(parse_cooking_time(Some(&RawScalar::Int(-1)), None), 30);
        assert_eq!(parse_cooking_time(Some(&text("soon")), Some(&text("10분"))), 30);
    }

    // ── difficulty ──

    #[test]
    fn difficulty_korean_and_english_tokens() {
        assert_eq!(parse_difficulty(Some(&text("초급"))), Difficulty::Easy);
        assert_eq!(parse_difficulty(Some(&text("중급"))), Difficulty::Medium);
        assert_eq!(parse_difficulty(Some(&text("고급 난이도"))), Difficulty::Hard);
        assert_eq!(parse_difficulty(Some(&text("EASY"))), Difficulty::Easy);
        assert_eq!(parse_difficulty(Some(&text("Hard"))), Difficulty::Hard);
    }

    #[test]
    fn difficulty_defaults_to_medium() {
        assert_eq!(parse_difficulty(Some(&text("???"))), Difficulty::Medium);
        assert_eq!(parse_difficulty(Some(&RawScalar::Int(3))), Difficulty::Medium);
        assert_eq!(parse_difficulty(None), Difficulty::Medium);
    }

    #[test]
    fn difficulty_easy_wins_over_hard() {
        assert_eq!(parse_difficulty(Some(&text("초급~고급"))), Difficulty::Easy);
    }

    // ── servings ──

    #[test]
    fn servings_parsing() {
        assert_eq!(parse_servings(Some(&text("4인분"))), 4);
        assert_eq!(parse_servings(Some(&text("3"))), 3);
        assert_eq!(parse_servings(Some(&RawScalar::Int(6))), 6);
        assert_eq!(parse_servings(None), 2);
    }

    #[test]
    fn servings_invalid_falls_back() {
        assert_eq!(parse_servings(Some(&text("여러"))), 2);
        assert_eq!(parse_servings(Some(&text("6인분 이상"))), 2);
        assert_eq!(parse_servings(Some(&text("0인분"))), 2);
    }

    // ── ingredients ──

    #[test]
    fn clean_name_is_idempotent_on_clean_input() {
        let n = Normalizer::default();
        assert_eq!(n.clean_ingredient_name("대파"), "대파");
        let once = n.clean_ingredient_name(" 대파 구매 ");
        assert_eq!(once, "대파");
        assert_eq!(n.clean_ingredient_name(&once), once);
    }

    #[test]
    fn noise_only_ingredient_is_dropped() {
        let r = raw(
            r#"{"ingredients": [
                {"name": "양파", "quantity": "1개"},
                {"name": "구매", "quantity": "1"},
                "간장 구매"
            ]}"#,
        );
        let input_len = r.ingredients.as_ref().unwrap().len();
        let out = Normalizer::default().normalize(&r).ingredients;
        assert_eq!(out.len(), input_len - 1);
        assert_eq!(
            out[0],
            Ingredient {
                name: "양파".into(),
                quantity: "1개".into(),
                is_available: false,
            }
        );
        assert_eq!(out[1].name, "간장");
        assert_eq!(out[1].quantity, "");
    }

    #[test]
    fn structured_defaults_and_passthrough() {
        let r = raw(r#"{"ingredients": [{"name": "물", "isAvailable": true}, {"quantity": "2"}]}"#);
        let out = Normalizer::default().normalize(&r).ingredients;
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].quantity, "");
        assert!(out[0].is_available);
    }

    #[test]
    fn custom_noise_tokens() {
        let n = Normalizer::new(vec!["구매".to_string(), "[광고]".to_string(), String::new()]);
        assert_eq!(n.noise_tokens().len(), 2);
        assert_eq!(n.clean_ingredient_name("[광고] 참기름 구매"), "참기름");
    }

    // ── instructions ──

    #[test]
    fn instructions_shapes() {
        assert_eq!(
            normalize_instructions(Some(&RawInstructions::One("Boil water".into()))),
            vec!["Boil water".to_string()]
        );
        let steps = vec!["a".to_string(), "b".to_string()];
        assert_eq!(
            normalize_instructions(Some(&RawInstructions::Many(steps.clone()))),
            steps
        );
        assert!(normalize_instructions(None).is_empty());
    }

    // ── whole record ──

    #[test]
    fn name_only_record_gets_defaults() {
        let r = raw(r#"{"name": "Test"}"#);
        let c = Normalizer::default().normalize(&r);
        assert_eq!(c.name, "Test");
        assert_eq!(c.image, "");
        assert_eq!(c.cooking_time, 30);
        assert_eq!(c.difficulty, Difficulty::Medium);
        assert_eq!(c.servings, 2);
        assert!(c.tags.is_empty());
        assert!(c.ingredients.is_empty());
        assert!(c.instructions.is_empty());
        assert_eq!(c.created_by, NO_OWNER);
        assert_ne!(c.id, Uuid::nil());
    }

    #[test]
    fn blank_name_gets_placeholder() {
        let n = Normalizer::default();
        assert_eq!(n.normalize(&raw(r#"{"name": ""}"#)).name, DEFAULT_NAME);
        assert_eq!(n.normalize(&raw(r#"{"name": "   "}"#)).name, DEFAULT_NAME);
        assert_eq!(n.normalize(&raw(r#"{"name": " 된장국 "}"#)).name, "된장국");
    }

    #[test]
    fn off_type_record_still_normalizes() {
        let r = raw(r#"{"name": 123, "instructions": 5, "ingredients": [null, "쌀"], "servings": null}"#);
        let c = Normalizer::default().normalize(&r);
        assert_eq!(c.name, DEFAULT_NAME);
        assert!(c.instructions.is_empty());
        assert_eq!(c.ingredients.len(), 1);
        assert_eq!(c.servings, 2);
    }

    #[test]
    fn empty_record_is_total() {
        let c = Normalizer::default().normalize(&RawRecord::default());
        assert_eq!(c.name, DEFAULT_NAME);
        assert!(c.servings > 0);
    }

    #[test]
    fn ids_are_fresh_per_call() {
        let r = raw(r#"{"name": "Test"}"#);
        let n = Normalizer::default();
        assert_ne!(n.normalize(&r).id, n.normalize(&r).id);
    }

    #[test]
    fn tags_pass_through() {
        let r = raw(r#"{"tags": ["찌개", "한식"]}"#);
        assert_eq!(Normalizer::default().normalize(&r).tags, vec!["찌개", "한식"]);
    }
}
