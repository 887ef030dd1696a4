//! Endpoint table: one absolute backend URL per operation

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{JournalistError, JournalistResult};

/// The logical operations the backend exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    FetchNews,
    FactCheck,
    BiasDetection,
    Summarize,
    Translate,
}

impl Operation {
    pub const ALL: [Operation; 5] = [
        Operation::FetchNews,
        Operation::FactCheck,
        Operation::BiasDetection,
        Operation::Summarize,
        Operation::Translate,
    ];

    /// Path under the backend base URL
    pub fn path(self) -> &'static str {
        match self {
            Operation::FetchNews => "/fetch-news",
            Operation::FactCheck => "/fact-check",
            Operation::BiasDetection => "/bias-detection",
            Operation::Summarize => "/summarizer",
            Operation::Translate => "/translate",
        }
    }

    /// Notification text shown when a dispatch succeeds
    pub fn success_label(self) -> &'static str {
        match self {
            Operation::FetchNews => "Fetched latest news articles",
            Operation::FactCheck => "Fact check completed",
            Operation::BiasDetection => "Bias detection completed",
            Operation::Summarize => "Paragraph summarization successful",
            Operation::Translate => "Translation successful",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Operation::FetchNews => "fetch_news",
            Operation::FactCheck => "fact_check",
            Operation::BiasDetection => "bias_detection",
            Operation::Summarize => "summarize",
            Operation::Translate => "translate",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable map from operation to endpoint URL, built once at start-up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointTable {
    endpoints: BTreeMap<Operation, Url>,
}

impl EndpointTable {
    /// Root every operation's path at `base_url`.
    ///
    /// The base path is kept: `https://host/api` + `/translate` gives
    /// `https://host/api/translate`.
    pub fn from_base_url(base_url: &str) -> JournalistResult<Self> {
        let base = base_url.trim_end_matches('/');
        let mut endpoints = BTreeMap::new();

        for op in Operation::ALL {
            let raw = format!("{}{}", base, op.path());
            let url = Url::parse(&raw).map_err(|e| JournalistError::InvalidUrl {
                url: raw.clone(),
                reason: e.to_string(),
            })?;
            endpoints.insert(op, url);
        }

        Ok(Self { endpoints })
    }

    pub fn get(&self, op: Operation) -> &Url {
        // Every operation is inserted by the only constructor.
        &self.endpoints[&op]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Operation, &Url)> {
        self.endpoints.iter().map(|(op, url)| (*op, url))
    }
}
