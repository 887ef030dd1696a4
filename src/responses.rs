//! Typed views over a [`NormalizedResult`]'s `data`
//!
//! The backend's shapes are informal, so every field is optional or
//! defaulted. These helpers never change what the dispatcher returned.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::dispatch::NormalizedResult;
use crate::error::{JournalistError, JournalistResult};

pub const INVALID_FORMAT_MESSAGE: &str = "Invalid response format";

// ---------------------------------------------------------------------------
// News
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Article {
    pub id: String,
    pub heading: String,
    pub description: String,
    pub url: String,
    pub image: String,
    pub publisher: String,
    pub published_at: String,
    pub tone: String,
    pub category: String,
    pub source: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewsFeed {
    pub articles: Vec<Article>,
}

impl NewsFeed {
    pub fn from_result(result: &NormalizedResult) -> JournalistResult<Self> {
        result.data_as()
    }
}

/// Articles a caller may show when the news fetch fails. Never returned by
/// the client itself.
pub fn sample_articles() -> Vec<Article> {
    vec![
        Article {
            id: "1".into(),
            heading: "Quantum Computing Breakthrough Promises Unbreakable Encryption".into(),
            description: "Researchers have developed a new quantum algorithm that could render current encryption methods obsolete, paving the way for a new era of secure communication.".into(),
            url: "https://example.com/quantum-breakthrough".into(),
            image: "https://images.unsplash.com/photo-1534723452862-4c874018d66d?w=400&h=250&fit=crop&crop=center".into(),
            publisher: "TechCrunch".into(),
            published_at: "2025-09-06T08:30:00Z".into(),
            tone: "Positive".into(),
            category: "AI".into(),
            source: "Tech Journal".into(),
        },
        Article {
            id: "2".into(),
            heading: "Global Stock Markets Face Volatility Amid New Regulations".into(),
            description: "New international trade regulations have introduced significant uncertainty into the global stock markets, with analysts predicting a period of increased volatility.".into(),
            url: "https://example.com/market-volatility".into(),
            image: "https://images.unsplash.com/photo-1611974789855-9c2a0a7236a3?w=400&h=250&fit=crop&crop=center".into(),
            publisher: "Reuters".into(),
            published_at: "2025-09-06T07:45:00Z".into(),
            tone: "Negative".into(),
            category: "Business".into(),
            source: "Financial Times".into(),
        },
        Article {
            id: "3".into(),
            heading: "NASA's Artemis Mission Successfully Launches Orion Spacecraft".into(),
            description: "The Orion spacecraft is now on its way to the Moon as part of the Artemis program, marking a major milestone in humanity's return to lunar exploration.".into(),
            url: "https://example.com/artemis-launch".into(),
            image: "https://images.unsplash.com/photo-1630514933924-7386765792e3?w=400&h=250&fit=crop&crop=center".into(),
            publisher: "Associated Press".into(),
            published_at: "2025-09-06T09:00:00Z".into(),
            tone: "Neutral".into(),
            category: "Space".into(),
            source: "NASA TV".into(),
        },
    ]
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

/// The backend sends either one string or a list of lines
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SummaryText {
    Text(String),
    Lines(Vec<String>),
}

impl Default for SummaryText {
    fn default() -> Self {
        SummaryText::Text(String::new())
    }
}

impl SummaryText {
    pub fn joined(&self) -> String {
        match self {
            SummaryText::Text(text) => text.clone(),
            SummaryText::Lines(lines) => lines.join("\n"),
        }
    }

    /// Non-blank lines, for bullet rendering
    pub fn bullets(&self) -> Vec<String> {
        self.joined()
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Summary {
    pub summary: SummaryText,
    pub word_count: Option<Value>,
    pub reading_time: Option<Value>,
}

impl Summary {
    pub fn from_result(result: &NormalizedResult) -> JournalistResult<Self> {
        result.data_as()
    }
}

// ---------------------------------------------------------------------------
// Translation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Translation {
    pub translated_text: String,
    pub detected_language: Option<String>,
    pub target_language: Option<String>,
    pub original_length: Option<u64>,
    pub translated_length: Option<u64>,
    pub processing_time: Option<Value>,
}

impl Translation {
    pub fn from_result(result: &NormalizedResult) -> JournalistResult<Self> {
        result.data_as()
    }
}

// ---------------------------------------------------------------------------
// Bias detection
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BiasLevel {
    Low,
    Moderate,
    High,
}

impl BiasLevel {
    pub fn from_score(score: f64) -> Self {
        if score < 30.0 {
            BiasLevel::Low
        } else if score < 60.0 {
            BiasLevel::Moderate
        } else {
            BiasLevel::High
        }
    }
}

impl fmt::Display for BiasLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BiasLevel::Low => "Low",
            BiasLevel::Moderate => "Moderate",
            BiasLevel::High => "High",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BiasReport {
    pub overall_score: f64,
    pub confidence: Option<f64>,
    pub sentiment: Option<String>,
    pub key_phrases: Vec<String>,
    pub categories: BTreeMap<String, Value>,
}

impl BiasReport {
    /// Reads `data.biasData`; its absence is an API error.
    pub fn from_result(result: &NormalizedResult) -> JournalistResult<Self> {
        let bias = result
            .data()
            .get("biasData")
            .filter(|v| v.is_object())
            .ok_or_else(|| JournalistError::api(INVALID_FORMAT_MESSAGE))?;
        Ok(serde_json::from_value(bias.clone())?)
    }

    pub fn level(&self) -> BiasLevel {
        BiasLevel::from_score(self.overall_score)
    }
}

// ---------------------------------------------------------------------------
// Fact check
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    True,
    MostlyTrue,
    Mixed,
    False,
}

impl Verdict {
    /// Case-insensitive; anything unrecognised reads as false
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_uppercase().as_str() {
            "TRUE" => Verdict::True,
            "MOSTLY TRUE" => Verdict::MostlyTrue,
            "MIXED" => Verdict::Mixed,
            _ => Verdict::False,
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Verdict::True => "TRUE",
            Verdict::MostlyTrue => "MOSTLY TRUE",
            Verdict::Mixed => "MIXED",
            Verdict::False => "FALSE",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FactSource {
    pub title: String,
    pub url: String,
    pub credibility: Option<Value>,
    pub verified: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FactCheckReport {
    pub verdict: String,
    pub overall_score: Option<f64>,
    pub confidence: Option<f64>,
    pub key_claims: Vec<String>,
    pub categories: BTreeMap<String, Value>,
    pub reasoning: Option<String>,
    pub sources: Vec<FactSource>,
}

impl FactCheckReport {
    pub fn from_result(result: &NormalizedResult) -> JournalistResult<Self> {
        result.data_as()
    }

    pub fn verdict(&self) -> Verdict {
        Verdict::parse(&self.verdict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_news_feed_from_wrapped_body() {
        let result = NormalizedResult::wrap(json!({
            "articles": [{"id": "1", "heading": "X", "publishedAt": "2025-09-06T08:30:00Z"}]
        }));
        let feed = NewsFeed::from_result(&result).unwrap();
        assert_eq!(feed.articles.len(), 1);
        assert_eq!(feed.articles[0].heading, "X");
        assert_eq!(feed.articles[0].published_at, "2025-09-06T08:30:00Z");
        assert_eq!(feed.articles[0].tone, "");
    }

    #[test]
    fn test_summary_lines_join() {
        let result = NormalizedResult::wrap(json!({
            "summary": ["First point", "", "Second point"],
            "wordCount": 120
        }));
        let summary = Summary::from_result(&result).unwrap();
        assert_eq!(summary.summary.joined(), "First point\n\nSecond point");
        assert_eq!(summary.summary.bullets(), vec!["First point", "Second point"]);
        assert_eq!(summary.word_count, Some(json!(120)));
    }

    #[test]
    fn test_bias_report_levels() {
        assert_eq!(BiasLevel::from_score(29.9), BiasLevel::Low);
        assert_eq!(BiasLevel::from_score(30.0), BiasLevel::Moderate);
        assert_eq!(BiasLevel::from_score(60.0), BiasLevel::High);

        let result = NormalizedResult::wrap(json!({
            "biasData": {"overallScore": 42, "sentiment": "neutral", "keyPhrases": ["a"]}
        }));
        let report = BiasReport::from_result(&result).unwrap();
        assert_eq!(report.level(), BiasLevel::Moderate);
        assert_eq!(report.key_phrases, vec!["a"]);
    }

    #[test]
    fn test_bias_report_missing_data_is_api_error() {
        let result = NormalizedResult::wrap(json!({"score": 1}));
        let err = BiasReport::from_result(&result).unwrap_err();
        assert!(err.is_api());
        assert_eq!(err.message(), INVALID_FORMAT_MESSAGE);
    }

    #[test]
    fn test_verdict_parse() {
        assert_eq!(Verdict::parse("mostly true"), Verdict::MostlyTrue);
        assert_eq!(Verdict::parse("Mixed"), Verdict::Mixed);
        assert_eq!(Verdict::parse("unverifiable"), Verdict::False);

        let result = NormalizedResult::wrap(json!({
            "verdict": "TRUE",
            "sources": [{"title": "Wire", "url": "https://w.example", "verified": true}]
        }));
        let report = FactCheckReport::from_result(&result).unwrap();
        assert_eq!(report.verdict(), Verdict::True);
        assert!(report.sources[0].verified);
    }

    #[test]
    fn test_sample_articles_are_complete() {
        let samples = sample_articles();
        assert_eq!(samples.len(), 3);
        assert!(samples.iter().all(|a| !a.heading.is_empty() && !a.url.is_empty()));
    }
}
