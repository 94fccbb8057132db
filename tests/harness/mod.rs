//! In-memory Big Tables service for integration tests
//!
//! Implements just enough of the REST API to run whole sessions:
//! stash chunks, table listing, create and overwrite. Requests are
//! recorded so tests can assert on the exact call sequence.

#![allow(dead_code)]

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use glide_bigtable::{HttpClient, HttpResponse, Row};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::Mutex;

pub const API_HOST: &str = "https://bigtables.test";
pub const API_KEY: &str = "integration-key";

#[derive(Debug, Clone, PartialEq)]
pub struct StoredTable {
    pub id: String,
    pub name: String,
    pub columns: Value,
    pub rows: Vec<Value>,
}

#[derive(Debug, Clone)]
pub struct Call {
    pub method: String,
    pub path: String,
    pub rows: usize,
}

#[derive(Default)]
struct State {
    /// stash id -> serial -> rows
    stashes: BTreeMap<String, BTreeMap<u64, Vec<Value>>>,
    tables: Vec<StoredTable>,
    calls: Vec<Call>,
    next_table: usize,
}

/// Fake Big Tables API reachable through [`HttpClient`].
#[derive(Default)]
pub struct FakeBigTables {
    state: Mutex<State>,
    /// Requests carrying more rows than this are answered with 413.
    max_rows_per_request: Option<usize>,
}

impl FakeBigTables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_request_limit(max_rows: usize) -> Self {
        Self {
            max_rows_per_request: Some(max_rows),
            ..Self::default()
        }
    }

    /// Seed a table directly, as if created by some other client.
    pub fn seed_table(&self, id: &str, name: &str) {
        self.state.lock().unwrap().tables.push(StoredTable {
            id: id.to_string(),
            name: name.to_string(),
            columns: json!([]),
            rows: vec![],
        });
    }

    pub fn tables(&self) -> Vec<StoredTable> {
        self.state.lock().unwrap().tables.clone()
    }

    pub fn table_named(&self, name: &str) -> Option<StoredTable> {
        self.tables().into_iter().find(|t| t.name == name)
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn stash_chunks(&self, stash_id: &str) -> BTreeMap<u64, Vec<Value>> {
        self.state
            .lock()
            .unwrap()
            .stashes
            .get(stash_id)
            .cloned()
            .unwrap_or_default()
    }

    fn handle(&self, method: &str, path: &str, body: Option<&Value>) -> HttpResponse {
        let mut state = self.state.lock().unwrap();
        let (resource, query) = path.split_once('?').unwrap_or((path, ""));
        let segments: Vec<&str> = resource.split('/').collect();

        match (method, segments.as_slice()) {
            ("PUT", ["stashes", stash_id, serial]) => {
                let Some(rows) = body.and_then(Value::as_array) else {
                    return reply(400, json!({"error": "expected an array of rows"}));
                };
                if self.max_rows_per_request.is_some_and(|max| rows.len() > max) {
                    return reply(413, json!({"error": "Payload Too Large"}));
                }
                let Ok(serial) = serial.parse::<u64>() else {
                    return reply(400, json!({"error": "bad serial"}));
                };
                state
                    .stashes
                    .entry(stash_id.to_string())
                    .or_default()
                    .insert(serial, rows.clone());
                reply(200, json!({}))
            }
            ("GET", ["tables"]) => {
                let data: Vec<Value> = state
                    .tables
                    .iter()
                    .map(|t| json!({"id": t.id, "name": t.name}))
                    .collect();
                reply(200, json!({ "data": data }))
            }
            ("POST", ["tables"]) if query == "onSchemaError=dropColumns" => {
                let Some(body) = body else {
                    return reply(400, json!({"error": "missing body"}));
                };
                let rows = stash_rows(&state, body);
                state.next_table += 1;
                let id = format!("native-table-{}", state.next_table);
                state.tables.push(StoredTable {
                    id: id.clone(),
                    name: body["name"].as_str().unwrap_or_default().to_string(),
                    columns: body["schema"]["columns"].clone(),
                    rows,
                });
                reply(200, json!({"data": {"tableID": id}}))
            }
            ("PUT", ["tables", table_id]) if query == "onSchemaError=dropColumns" => {
                let Some(body) = body else {
                    return reply(400, json!({"error": "missing body"}));
                };
                let rows = stash_rows(&state, body);
                match state.tables.iter_mut().find(|t| t.id == *table_id) {
                    Some(table) => {
                        table.columns = body["schema"]["columns"].clone();
                        table.rows = rows;
                        reply(200, json!({"data": {"tableID": table_id}}))
                    }
                    None => reply(404, json!({"error": "table not found"})),
                }
            }
            _ => reply(404, json!({"error": "not found"})),
        }
    }
}

/// Rows of the stash a commit body points at, in serial order.
fn stash_rows(state: &State, body: &Value) -> Vec<Value> {
    body["rows"]["$stashID"]
        .as_str()
        .and_then(|id| state.stashes.get(id))
        .map(|chunks| chunks.values().flatten().cloned().collect())
        .unwrap_or_default()
}

fn reply(status: u16, body: Value) -> HttpResponse {
    HttpResponse {
        status,
        headers: vec![("Content-Type".to_string(), "application/json".to_string())],
        body: body.to_string().into_bytes(),
    }
}

#[async_trait]
impl HttpClient for FakeBigTables {
    async fn request(
        &self,
        method: &str,
        url: &str,
        headers: Vec<(String, String)>,
        body: Option<Vec<u8>>,
    ) -> Result<HttpResponse> {
        let path = url
            .strip_prefix(API_HOST)
            .and_then(|p| p.strip_prefix('/'))
            .ok_or_else(|| anyhow!("connection refused: {}", url))?;

        let authorized = headers
            .iter()
            .any(|(k, v)| k == "Authorization" && *v == format!("Bearer {}", API_KEY));
        if !authorized {
            return Ok(reply(401, json!({"error": "unauthorized"})));
        }

        let body: Option<Value> = body
            .map(|b| serde_json::from_slice(&b))
            .transpose()
            .map_err(|e| anyhow!("client sent invalid JSON: {}", e))?;
        let rows = body.as_ref().and_then(Value::as_array).map_or(0, Vec::len);

        let response = self.handle(method, path, body.as_ref());
        self.state.lock().unwrap().calls.push(Call {
            method: method.to_string(),
            path: path.to_string(),
            rows,
        });
        Ok(response)
    }
}

/// `count` rows shaped `{"name": "<prefix>-i", "score": i}`.
pub fn rows(prefix: &str, count: usize) -> Vec<Row> {
    (0..count)
        .map(|i| {
            let mut row = Row::new();
            row.insert("name".to_string(), json!(format!("{}-{}", prefix, i)));
            row.insert("score".to_string(), json!(i));
            row
        })
        .collect()
}
