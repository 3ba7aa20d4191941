//! Scripted knowledge base transport
//!
//! Responses are looked up by query: queued one-shot responses first, then
//! the persistent response for that query, then an empty `200 {}` (which
//! every action parses as "nothing found"). Every call is recorded.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use courtstats_enrich::knowledge_base::{ApiQuery, ApiResponse, Transport};
use courtstats_enrich::TransportError;

type Scripted = Result<ApiResponse, String>;

#[derive(Default)]
pub struct MockTransport {
    queued: Mutex<HashMap<ApiQuery, VecDeque<Scripted>>>,
    persistent: Mutex<HashMap<ApiQuery, ApiResponse>>,
    calls: Mutex<Vec<ApiQuery>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `query` with `response` every time (replaces any earlier one)
    pub fn respond(&self, query: ApiQuery, response: ApiResponse) {
        self.persistent.lock().unwrap().insert(query, response);
    }

    /// Answer the next call for `query` with `response`
    pub fn enqueue(&self, query: ApiQuery, response: ApiResponse) {
        self.push(query, Ok(response));
    }

    /// Fail the next call for `query` at the transport level
    pub fn enqueue_transport_error(&self, query: ApiQuery, message: &str) {
        self.push(query, Err(message.to_string()));
    }

    fn push(&self, query: ApiQuery, scripted: Scripted) {
        self.queued
            .lock()
            .unwrap()
            .entry(query)
            .or_default()
            .push_back(scripted);
    }

    pub fn calls(&self) -> Vec<ApiQuery> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn calls_for(&self, query: &ApiQuery) -> usize {
        self.calls.lock().unwrap().iter().filter(|q| *q == query).count()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn get(&self, query: &ApiQuery) -> Result<ApiResponse, TransportError> {
        self.calls.lock().unwrap().push(query.clone());

        let next = self
            .queued
            .lock()
            .unwrap()
            .get_mut(query)
            .and_then(VecDeque::pop_front);

        match next {
            Some(scripted) => scripted.map_err(TransportError),
            None => Ok(self
                .persistent
                .lock()
                .unwrap()
                .get(query)
                .cloned()
                .unwrap_or_else(|| ApiResponse::ok("{}"))),
        }
    }
}
