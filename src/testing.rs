//! Test doubles shared by the unit tests

use crate::http::{HttpClient, HttpResponse};
use crate::stash::Row;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::Mutex;

#[derive(Debug, Clone)]
pub(crate) struct RecordedRequest {
    pub method: String,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

impl RecordedRequest {
    /// Parsed JSON body, or `Value::Null` when there is none.
    pub fn json(&self) -> Value {
        self.body
            .as_deref()
            .map(|b| serde_json::from_slice(b).unwrap())
            .unwrap_or(Value::Null)
    }

    /// URL with scheme and host stripped, e.g. `tables?onSchemaError=dropColumns`.
    pub fn path(&self) -> &str {
        let without_scheme = self.url.split_once("://").map_or(&*self.url, |(_, rest)| rest);
        without_scheme
            .split_once('/')
            .map_or("", |(_, path)| path)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

type Responder = Box<dyn Fn(&RecordedRequest) -> Option<HttpResponse> + Send + Sync>;

/// Mock HTTP client that records every request and answers from a closure.
pub(crate) struct MockHttpClient {
    responder: Responder,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockHttpClient {
    pub fn new<F>(respond: F) -> Self
    where
        F: Fn(&RecordedRequest) -> HttpResponse + Send + Sync + 'static,
    {
        Self {
            responder: Box::new(move |request| Some(respond(request))),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Replies with `responses` in order, then fails like a dropped connection.
    pub fn scripted(responses: Vec<HttpResponse>) -> Self {
        let queue = Mutex::new(VecDeque::from(responses));
        Self {
            responder: Box::new(move |_| queue.lock().unwrap().pop_front()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn always(status: u16) -> Self {
        Self::always_with_body(status, "")
    }

    pub fn always_with_body(status: u16, body: &'static str) -> Self {
        Self::new(move |_| response(status, body))
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn request(
        &self,
        method: &str,
        url: &str,
        headers: Vec<(String, String)>,
        body: Option<Vec<u8>>,
    ) -> Result<HttpResponse> {
        let request = RecordedRequest {
            method: method.to_string(),
            url: url.to_string(),
            headers,
            body,
        };
        let reply = (self.responder)(&request);
        self.requests.lock().unwrap().push(request);
        reply.ok_or_else(|| anyhow!("No more mock responses"))
    }
}

pub(crate) fn response(status: u16, body: &str) -> HttpResponse {
    HttpResponse {
        status,
        headers: vec![],
        body: body.as_bytes().to_vec(),
    }
}

pub(crate) fn json_response(status: u16, body: Value) -> HttpResponse {
    HttpResponse {
        status,
        headers: vec![("Content-Type".to_string(), "application/json".to_string())],
        body: serde_json::to_vec(&body).unwrap(),
    }
}

pub(crate) fn json_rows(count: usize) -> Vec<Row> {
    (0..count)
        .map(|i| match json!({"test-str": format!("one {}", i), "test-num": i}) {
            Value::Object(row) => row,
            _ => unreachable!(),
        })
        .collect()
}
