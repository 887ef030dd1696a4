//! Typed requests for each operation, with the caller-side checks the
//! dispatcher deliberately does not perform.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::dispatch::{to_payload, Payload};
use crate::error::{JournalistResult, ValidationError};

/// Minimum length of pasted content for a fact check
pub const MIN_FACT_CHECK_CONTENT: usize = 10;
pub const DEFAULT_NUM_ARTICLES: u32 = 3;

/// Target languages the translator accepts: (code, display name)
pub const SUPPORTED_LANGUAGES: [(&str, &str); 15] = [
    ("es", "Spanish (Español)"),
    ("fr", "French (Français)"),
    ("de", "German (Deutsch)"),
    ("it", "Italian (Italiano)"),
    ("pt", "Portuguese (Português)"),
    ("ru", "Russian (Русский)"),
    ("ja", "Japanese (日本語)"),
    ("ko", "Korean (한국어)"),
    ("zh", "Chinese (中文)"),
    ("ar", "Arabic (العربية)"),
    ("hi", "Hindi (हिंदी)"),
    ("tr", "Turkish (Türkçe)"),
    ("pl", "Polish (Polski)"),
    ("nl", "Dutch (Nederlands)"),
    ("sv", "Swedish (Svenska)"),
];

pub fn language_name(code: &str) -> Option<&'static str> {
    SUPPORTED_LANGUAGES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// A request that can be checked and turned into a dispatcher payload
pub trait OperationRequest {
    fn validate(&self) -> Result<(), ValidationError>;
    fn to_payload(&self) -> JournalistResult<Payload>;
}

// ---------------------------------------------------------------------------
// Fact check
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactCheckRequest {
    pub url: Option<String>,
    pub content: Option<String>,
}

#[derive(Serialize)]
struct FactCheckBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<String>,
}

impl OperationRequest for FactCheckRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        let url = non_blank(&self.url);
        let content = non_blank(&self.content);

        if url.is_none() && content.is_none() {
            return Err(ValidationError::MissingInput {
                what: "some content or URL to fact-check",
            });
        }
        if let Some(content) = content {
            if content.chars().count() < MIN_FACT_CHECK_CONTENT {
                return Err(ValidationError::ContentTooShort {
                    min: MIN_FACT_CHECK_CONTENT,
                });
            }
        }
        Ok(())
    }

    /// Only trimmed, non-empty fields are sent
    fn to_payload(&self) -> JournalistResult<Payload> {
        to_payload(&FactCheckBody {
            url: non_blank(&self.url),
            content: non_blank(&self.content),
        })
    }
}

// ---------------------------------------------------------------------------
// Bias detection
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BiasDetectionRequest {
    pub topic: Option<String>,
    pub url: Option<String>,
}

impl OperationRequest for BiasDetectionRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        if non_blank(&self.topic).is_none() && non_blank(&self.url).is_none() {
            return Err(ValidationError::MissingInput {
                what: "some content to analyze",
            });
        }
        Ok(())
    }

    /// Blank fields are sent as explicit nulls
    fn to_payload(&self) -> JournalistResult<Payload> {
        let empty_to_none = |v: &Option<String>| v.clone().filter(|s| !s.is_empty());
        to_payload(&BiasDetectionRequest {
            topic: empty_to_none(&self.topic),
            url: empty_to_none(&self.url),
        })
    }
}

// ---------------------------------------------------------------------------
// Summarizer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SummaryFormat {
    #[default]
    #[serde(rename = "bulletPoint")]
    BulletPoint,
    #[serde(rename = "paragraph")]
    Paragraph,
    #[serde(rename = "keyHighlight")]
    KeyHighlight,
}

impl SummaryFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            SummaryFormat::BulletPoint => "bulletPoint",
            SummaryFormat::Paragraph => "paragraph",
            SummaryFormat::KeyHighlight => "keyHighlight",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SummaryFormat::BulletPoint => "Bullet Points",
            SummaryFormat::Paragraph => "Paragraph",
            SummaryFormat::KeyHighlight => "Key Highlights",
        }
    }
}

impl fmt::Display for SummaryFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SummaryFormat {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "bulletPoint" | "bullet-point" | "bullets" => Ok(SummaryFormat::BulletPoint),
            "paragraph" => Ok(SummaryFormat::Paragraph),
            "keyHighlight" | "key-highlight" | "highlights" => Ok(SummaryFormat::KeyHighlight),
            other => Err(ValidationError::UnknownFormat(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummarizeRequest {
    pub topic: String,
    pub url: String,
    pub format: SummaryFormat,
}

impl OperationRequest for SummarizeRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        if is_blank(&self.topic) && is_blank(&self.url) {
            return Err(ValidationError::MissingInput {
                what: "either a URL or paste content to summarize",
            });
        }
        Ok(())
    }

    fn to_payload(&self) -> JournalistResult<Payload> {
        to_payload(self)
    }
}

// ---------------------------------------------------------------------------
// Translator
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslateRequest {
    pub topic: String,
    pub url: String,
    /// Target language code, e.g. `fr`
    pub language: String,
}

impl OperationRequest for TranslateRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        if is_blank(&self.topic) && is_blank(&self.url) {
            return Err(ValidationError::MissingInput {
                what: "either a URL or paste content to translate",
            });
        }
        if is_blank(&self.language) {
            return Err(ValidationError::MissingLanguage);
        }
        if language_name(&self.language).is_none() {
            return Err(ValidationError::UnsupportedLanguage(self.language.clone()));
        }
        Ok(())
    }

    fn to_payload(&self) -> JournalistResult<Payload> {
        to_payload(self)
    }
}

// ---------------------------------------------------------------------------
// News fetch
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchNewsRequest {
    pub topic: String,
    pub num_articles: u32,
}

impl FetchNewsRequest {
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            num_articles: DEFAULT_NUM_ARTICLES,
        }
    }

    pub fn with_num_articles(mut self, num_articles: u32) -> Self {
        self.num_articles = num_articles;
        self
    }
}

impl OperationRequest for FetchNewsRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        if is_blank(&self.topic) {
            return Err(ValidationError::MissingInput {
                what: "a topic or URL to fetch news",
            });
        }
        if self.num_articles == 0 {
            return Err(ValidationError::NoArticlesRequested);
        }
        Ok(())
    }

    fn to_payload(&self) -> JournalistResult<Payload> {
        to_payload(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn as_value(payload: Payload) -> Value {
        Value::Object(payload)
    }

    #[test]
    fn test_fact_check_requires_input() {
        let err = FactCheckRequest::default().validate().unwrap_err();
        assert!(matches!(err, ValidationError::MissingInput { .. }));
    }

    #[test]
    fn test_fact_check_short_content() {
        let req = FactCheckRequest {
            url: None,
            content: Some("  too short ".into()),
        };
        assert_eq!(
            req.validate().unwrap_err(),
            ValidationError::ContentTooShort { min: 10 }
        );
    }

    #[test]
    fn test_fact_check_payload_skips_blank_fields() {
        let req = FactCheckRequest {
            url: Some("  ".into()),
            content: Some("  The moon is made of rock.  ".into()),
        };
        req.validate().unwrap();
        assert_eq!(
            as_value(req.to_payload().unwrap()),
            json!({"content": "The moon is made of rock."})
        );
    }

    #[test]
    fn test_bias_payload_sends_nulls() {
        let req = BiasDetectionRequest {
            topic: Some(String::new()),
            url: Some("https://example.com/a".into()),
        };
        req.validate().unwrap();
        assert_eq!(
            as_value(req.to_payload().unwrap()),
            json!({"topic": null, "url": "https://example.com/a"})
        );
    }

    #[test]
    fn test_summarize_payload_shape() {
        let req = SummarizeRequest {
            topic: "Long article text".into(),
            url: String::new(),
            format: SummaryFormat::Paragraph,
        };
        req.validate().unwrap();
        assert_eq!(
            as_value(req.to_payload().unwrap()),
            json!({"topic": "Long article text", "url": "", "format": "paragraph"})
        );
    }

    #[test]
    fn test_summary_format_parse() {
        assert_eq!("keyHighlight".parse::<SummaryFormat>().unwrap(), SummaryFormat::KeyHighlight);
        assert_eq!(SummaryFormat::default(), SummaryFormat::BulletPoint);
        assert!("poem".parse::<SummaryFormat>().is_err());
    }

    #[test]
    fn test_translate_language_rules() {
        let mut req = TranslateRequest {
            topic: "Bonjour".into(),
            url: String::new(),
            language: String::new(),
        };
        assert_eq!(req.validate().unwrap_err(), ValidationError::MissingLanguage);

        req.language = "xx".into();
        assert_eq!(
            req.validate().unwrap_err(),
            ValidationError::UnsupportedLanguage("xx".into())
        );

        req.language = "de".into();
        req.validate().unwrap();
        assert_eq!(language_name("de"), Some("German (Deutsch)"));
    }

    #[test]
    fn test_fetch_news_defaults() {
        let req = FetchNewsRequest::new("AI");
        req.validate().unwrap();
        assert_eq!(
            as_value(req.to_payload().unwrap()),
            json!({"topic": "AI", "num_articles": 3})
        );
        assert_eq!(
            FetchNewsRequest::new("AI").with_num_articles(0).validate().unwrap_err(),
            ValidationError::NoArticlesRequested
        );
        assert!(FetchNewsRequest::new("   ").validate().is_err());
    }
}
