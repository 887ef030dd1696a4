//! AI Journalist client
//!
//! Posts fact-check, bias detection, summarization, translation and news
//! fetch requests to the AI Journalist backend and normalizes what comes back.
//!
//! ```no_run
//! use ai_journalist::{ClientConfig, FetchNewsRequest, JournalistClient, NewsFeed};
//!
//! # async fn run() -> ai_journalist::JournalistResult<()> {
//! let client = JournalistClient::new(&ClientConfig::default())?;
//! let result = client.fetch_news(&FetchNewsRequest::new("AI")).await?;
//! let feed = NewsFeed::from_result(&result)?;
//! println!("{} articles", feed.articles.len());
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod dispatch;
pub mod endpoints;
pub mod error;
pub mod loading;
pub mod notify;
pub mod progress;
pub mod requests;
pub mod responses;
pub mod transport;

pub use client::JournalistClient;
pub use config::ClientConfig;
pub use dispatch::{ActionDispatcher, NormalizedResult, Payload, ResponseShape};
pub use endpoints::{EndpointTable, Operation};
pub use error::{JournalistError, JournalistResult, ValidationError};
pub use loading::{LoadingGuard, LoadingState};
pub use notify::{Notification, Notifier, RecordingNotifier, SilentNotifier, TracingNotifier};
pub use progress::{ProgressProfile, ProgressSimulator};
pub use requests::{
    BiasDetectionRequest, FactCheckRequest, FetchNewsRequest, OperationRequest, SummarizeRequest,
    SummaryFormat, TranslateRequest,
};
pub use responses::{
    Article, BiasLevel, BiasReport, FactCheckReport, NewsFeed, Summary, Translation, Verdict,
};
pub use transport::{HttpTransport, Method, Transport, TransportError, TransportRequest, TransportResponse};
