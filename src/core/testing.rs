//! Test doubles shared by the unit tests

use std::cell::RefCell;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use futures::future::LocalBoxFuture;
use leptos::prelude::Owner;
use serde_json::json;

use crate::core::api::{ApiError, ApiRequest, ApiResponse, Transport};

/// Reactive owner for tests that create signals.
///
/// Keep the returned owner alive for the whole test.
pub fn reactive_owner() -> Owner {
    let owner = Owner::new();
    owner.set();
    owner
}

struct Scripted {
    result: Result<ApiResponse, ApiError>,
    /// Times the response yields before resolving
    yields: u32,
}

/// Transport answering with scripted responses in order.
///
/// Clones share the script and the request log.
#[derive(Clone, Default)]
pub struct MockTransport {
    script: Arc<Mutex<VecDeque<Scripted>>>,
    requests: Arc<Mutex<Vec<ApiRequest>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, result: Result<ApiResponse, ApiError>, yields: u32) {
        self.script
            .lock()
            .unwrap()
            .push_back(Scripted { result, yields });
    }

    pub fn push_json(&self, status: u16, body: serde_json::Value) {
        self.push_json_after(0, status, body);
    }

    /// Response that only resolves after yielding `yields` times
    pub fn push_json_after(&self, yields: u32, status: u16, body: serde_json::Value) {
        self.push(Ok(ApiResponse::new(status, body.to_string())), yields);
    }

    pub fn push_status(&self, status: u16, body: &str) {
        self.push(Ok(ApiResponse::new(status, body)), 0);
    }

    pub fn push_network_error(&self, message: &str) {
        self.push(Err(ApiError::Network(message.to_string())), 0);
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

impl Transport for MockTransport {
    fn send(&self, request: ApiRequest) -> LocalBoxFuture<'_, Result<ApiResponse, ApiError>> {
        self.requests.lock().unwrap().push(request);
        let next = self.script.lock().unwrap().pop_front();

        Box::pin(async move {
            let Some(scripted) = next else {
                return Err(ApiError::Network("no scripted response".to_string()));
            };
            for _ in 0..scripted.yields {
                tokio::task::yield_now().await;
            }
            scripted.result
        })
    }
}

thread_local! {
    static QUEUED_TASKS: RefCell<Vec<LocalBoxFuture<'static, ()>>> = RefCell::new(Vec::new());
}

/// Spawner that parks tasks until [`run_queued_tasks`] is awaited
pub fn queue_task(task: LocalBoxFuture<'static, ()>) {
    QUEUED_TASKS.with(|tasks| tasks.borrow_mut().push(task));
}

/// Run parked tasks, including tasks they park in turn, in spawn order
pub async fn run_queued_tasks() {
    loop {
        let batch = QUEUED_TASKS.with(|tasks| std::mem::take(&mut *tasks.borrow_mut()));
        if batch.is_empty() {
            break;
        }
        for task in batch {
            task.await;
        }
    }
}

/// `/users/me` body
pub fn user_json(id: i64, login: &str) -> serde_json::Value {
    json!({
        "id": id,
        "login": login,
        "created_at": "2024-05-01T10:00:00.000000"
    })
}
