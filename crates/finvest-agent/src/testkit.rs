//! Hand-rolled doubles shared by the fetch, transcript, synthesis, and
//! workflow tests

use async_trait::async_trait;
use finvest_core::{AnalysisRequest, AnalysisType, CompanyRegistry};
use finvest_llm::{CompletionRequest, CompletionResponse, LLMProvider, LLMError, StopReason, TokenUsage};
use finvest_search::{
    CrawlRequest, CrawlResponse, DocumentReader, ExtractResponse, MapRequest, MapResponse,
    SearchApi, SearchError, SearchRequest, SearchResponse,
};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Build a request over the standard registry with a forced analysis type
pub(crate) fn request_for(query: &str, analysis_type: AnalysisType) -> AnalysisRequest {
    let registry = CompanyRegistry::standard();
    AnalysisRequest {
        raw_query: query.to_string(),
        companies: registry.detect(query),
        analysis_type,
    }
}

enum Scripted<T> {
    Response(T),
    Error(String),
}

/// Scripted search double: responses are queued per endpoint and popped in
/// call order. An exhausted queue returns an error so a test that issues
/// more calls than it scripted fails loudly.
#[derive(Default)]
pub(crate) struct StubSearch {
    searches: Mutex<VecDeque<Scripted<SearchResponse>>>,
    extracts: Mutex<VecDeque<Scripted<ExtractResponse>>>,
    crawls: Mutex<VecDeque<Scripted<CrawlResponse>>>,
    maps: Mutex<VecDeque<Scripted<MapResponse>>>,
    crawl_count: AtomicUsize,
}

impl StubSearch {
    pub(crate) fn push_search(&self, response: SearchResponse) {
        self.searches.lock().unwrap().push_back(Scripted::Response(response));
    }

    pub(crate) fn push_search_error(&self, message: &str) {
        self.searches.lock().unwrap().push_back(Scripted::Error(message.to_string()));
    }

    pub(crate) fn push_extract(&self, response: ExtractResponse) {
        self.extracts.lock().unwrap().push_back(Scripted::Response(response));
    }

    pub(crate) fn push_extract_error(&self, message: &str) {
        self.extracts.lock().unwrap().push_back(Scripted::Error(message.to_string()));
    }

    pub(crate) fn push_crawl(&self, response: CrawlResponse) {
        self.crawls.lock().unwrap().push_back(Scripted::Response(response));
    }

    pub(crate) fn push_map(&self, response: MapResponse) {
        self.maps.lock().unwrap().push_back(Scripted::Response(response));
    }

    pub(crate) fn crawl_calls(&self) -> usize {
        self.crawl_count.load(Ordering::SeqCst)
    }

    fn pop<T>(queue: &Mutex<VecDeque<Scripted<T>>>) -> finvest_search::Result<T> {
        match queue.lock().unwrap().pop_front() {
            Some(Scripted::Response(response)) => Ok(response),
            Some(Scripted::Error(message)) => Err(SearchError::ApiError(message)),
            None => Err(SearchError::ApiError("stub queue exhausted".to_string())),
        }
    }
}

#[async_trait]
impl SearchApi for StubSearch {
    async fn search(&self, _request: SearchRequest) -> finvest_search::Result<SearchResponse> {
        Self::pop(&self.searches)
    }

    async fn extract(&self, _urls: &[String]) -> finvest_search::Result<ExtractResponse> {
        Self::pop(&self.extracts)
    }

    async fn crawl(&self, _request: CrawlRequest) -> finvest_search::Result<CrawlResponse> {
        self.crawl_count.fetch_add(1, Ordering::SeqCst);
        Self::pop(&self.crawls)
    }

    async fn map(&self, _request: MapRequest) -> finvest_search::Result<MapResponse> {
        Self::pop(&self.maps)
    }
}

/// Document reader that always fails; for tests that never reach a PDF
pub(crate) struct NullReader;

#[async_trait]
impl DocumentReader for NullReader {
    async fn fetch_text(&self, _url: &str) -> finvest_search::Result<String> {
        Err(SearchError::DocumentError("no document scripted".to_string()))
    }
}

/// Document reader returning a fixed text body
pub(crate) struct FixedReader(pub String);

#[async_trait]
impl DocumentReader for FixedReader {
    async fn fetch_text(&self, _url: &str) -> finvest_search::Result<String> {
        Ok(self.0.clone())
    }
}

/// LLM that always fails; for tests that never reach a completion
pub(crate) struct NullLlm;

#[async_trait]
impl LLMProvider for NullLlm {
    async fn complete(
        &self,
        _request: CompletionRequest,
    ) -> finvest_llm::Result<CompletionResponse> {
        Err(LLMError::RequestFailed("no completion scripted".to_string()))
    }

    fn name(&self) -> &str {
        "null"
    }
}

/// Scripted LLM: queued response contents are popped in call order; the
/// requests seen are recorded for assertions on prompt content
#[derive(Default)]
pub(crate) struct ScriptedLlm {
    responses: Mutex<VecDeque<Scripted<String>>>,
    pub(crate) requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedLlm {
    pub(crate) fn push(&self, content: &str) {
        self.responses.lock().unwrap().push_back(Scripted::Response(content.to_string()));
    }

    pub(crate) fn push_error(&self, message: &str) {
        self.responses.lock().unwrap().push_back(Scripted::Error(message.to_string()));
    }
}

#[async_trait]
impl LLMProvider for ScriptedLlm {
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> finvest_llm::Result<CompletionResponse> {
        self.requests.lock().unwrap().push(request);
        match self.responses.lock().unwrap().pop_front() {
            Some(Scripted::Response(content)) => Ok(CompletionResponse {
                content,
                stop_reason: StopReason::EndTurn,
                usage: TokenUsage::default(),
            }),
            Some(Scripted::Error(message)) => Err(LLMError::RequestFailed(message)),
            None => Err(LLMError::RequestFailed("stub queue exhausted".to_string())),
        }
    }

    fn name(&self) -> &str {
        "scripted"
    }
}
