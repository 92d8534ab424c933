//! Scripted transport shared by the behaviour tests.
//!
//! Responses are routed by exact request URL. Each route holds a queue of
//! steps; the last step of a route repeats once the others are used up.
//! Unrouted URLs fail like an unreachable backend.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use finbot_core::{BackendClient, BackendConfig, HttpClient, HttpError, HttpRequest, HttpResponse};
use serde_json::{json, Value};
use tokio::sync::{watch, Notify};

pub const REALTIME: &str = "http://localhost:8002/realtime";
pub const NEWS: &str = "http://localhost:8001/news";
pub const GENERAL_NEWS: &str = "http://localhost:8001/market/general-news";
pub const QUERY: &str = "http://localhost:8002/query";

#[derive(Clone)]
struct Step {
    response: Result<HttpResponse, HttpError>,
    gate: Option<Arc<Notify>>,
}

/// Releases a response that was scripted with [`ScriptedHttpClient::respond_after`].
#[derive(Clone)]
pub struct Gate(Arc<Notify>);

impl Gate {
    pub fn open(&self) {
        self.0.notify_one();
    }
}

pub struct ScriptedHttpClient {
    routes: Mutex<HashMap<String, VecDeque<Step>>>,
    requests: Mutex<Vec<HttpRequest>>,
    calls: watch::Sender<usize>,
}

impl ScriptedHttpClient {
    pub fn new() -> Arc<Self> {
        let (calls, _) = watch::channel(0);
        Arc::new(Self {
            routes: Mutex::new(HashMap::new()),
            requests: Mutex::new(Vec::new()),
            calls,
        })
    }

    pub fn respond(&self, url: &str, response: Result<HttpResponse, HttpError>) {
        self.push(url, Step { response, gate: None });
    }

    pub fn respond_json(&self, url: &str, body: Value) {
        self.respond(url, Ok(HttpResponse::ok_json(body.to_string())));
    }

    /// Script a response that is held back until the returned gate opens.
    pub fn respond_after(&self, url: &str, body: Value) -> Gate {
        let gate = Arc::new(Notify::new());
        self.push(
            url,
            Step {
                response: Ok(HttpResponse::ok_json(body.to_string())),
                gate: Some(Arc::clone(&gate)),
            },
        );
        Gate(gate)
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests
            .lock()
            .expect("request log should not be poisoned")
            .clone()
    }

    pub fn call_count(&self) -> usize {
        *self.calls.borrow()
    }

    pub fn calls_to(&self, url: &str) -> usize {
        self.requests()
            .iter()
            .filter(|request| request.url == url)
            .count()
    }

    pub async fn wait_for_calls(&self, count: usize) {
        let mut calls = self.calls.subscribe();
        calls
            .wait_for(|seen| *seen >= count)
            .await
            .expect("client outlives the wait");
    }

    fn push(&self, url: &str, step: Step) {
        self.routes
            .lock()
            .expect("route table should not be poisoned")
            .entry(url.to_owned())
            .or_default()
            .push_back(step);
    }

    fn next_step(&self, url: &str) -> Option<Step> {
        let mut routes = self.routes.lock().expect("route table should not be poisoned");
        let queue = routes.get_mut(url)?;
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }
}

impl HttpClient for ScriptedHttpClient {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        let step = self.next_step(&request.url);
        let url = request.url.clone();
        self.requests
            .lock()
            .expect("request log should not be poisoned")
            .push(request);
        self.calls.send_modify(|calls| *calls += 1);

        Box::pin(async move {
            let Some(step) = step else {
                return Err(HttpError::new(format!("connection failed: no route to {url}")));
            };
            if let Some(gate) = step.gate {
                gate.notified().await;
            }
            step.response
        })
    }
}

pub fn backend(http: &Arc<ScriptedHttpClient>) -> BackendClient {
    BackendClient::new(Arc::clone(http) as Arc<dyn HttpClient>, BackendConfig::default())
}

pub fn quote(price: f64) -> Value {
    json!({
        "error": null,
        "data": {
            "current_price": price,
            "change": 1.5,
            "percent_change": 0.8,
            "high": price + 2.0,
            "low": price - 2.0,
            "open": price - 1.0,
            "previous_close": price - 1.5
        }
    })
}

pub fn articles(titles: &[&str]) -> Value {
    let articles: Vec<Value> = titles
        .iter()
        .map(|title| {
            json!({
                "title": title,
                "source": "Reuters",
                "time_published": "20250301T140000",
                "summary": format!("{title} summary"),
                "url": format!("https://news.example.test/{}", title.len())
            })
        })
        .collect();
    json!({ "articles": articles })
}
