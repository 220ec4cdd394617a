//! External retrieval clients for finvest
//!
//! This crate wraps the two outbound retrieval boundaries:
//!
//! - A Tavily-style search/extract/crawl/map HTTP API, exposed through the
//!   `SearchApi` trait so the workflow can be tested against doubles
//! - Transcript document download and PDF text extraction, behind the
//!   `DocumentReader` trait

pub mod document;
pub mod error;
pub mod tavily;

pub use document::{DocumentReader, PdfDocumentReader};
pub use error::{Result, SearchError};
pub use tavily::{
    CrawlRequest, CrawlResponse, ExtractResponse, ExtractedPage, MapRequest, MapResponse,
    SearchApi, SearchRequest, SearchResponse, SearchResult, TavilyClient,
};
