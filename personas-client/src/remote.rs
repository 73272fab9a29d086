//! HTTP implementation of [`PersonApi`] over a blocking `ureq` agent.
//!
//! Each call runs on tokio's blocking pool so callers can await it without
//! stalling the runtime. No retries, no caching.

use std::io::Read;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use personas_core::{ClientConfig, Person, Rut};

use crate::api::PersonApi;
use crate::response::ApiResponse;

/// Resource path appended to the configured API origin.
pub const RESOURCE_PATH: &str = "/personas";

/// REST client for the `/personas` resource.
#[derive(Clone)]
pub struct RemoteStore {
    agent: ureq::Agent,
    resource_url: String,
}

impl RemoteStore {
    pub fn new(config: &ClientConfig) -> Self {
        let mut builder = ureq::AgentBuilder::new();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        Self {
            agent: builder.build(),
            resource_url: format!("{}{RESOURCE_PATH}", config.api_url.trim_end_matches('/')),
        }
    }

    /// `<api_url>/personas`
    pub fn resource_url(&self) -> &str {
        &self.resource_url
    }

    fn item_url(&self, rut: &Rut) -> String {
        format!("{}/{}", self.resource_url, rut)
    }

    async fn run<T, F>(&self, method: &'static str, url: String, call: F) -> ApiResponse<T>
    where
        T: DeserializeOwned + Send + 'static,
        F: FnOnce(&ureq::Agent, &str) -> Result<ureq::Response, ureq::Error> + Send + 'static,
    {
        tracing::debug!(method, url = %url, "sending request");
        let agent = self.agent.clone();
        let task_url = url.clone();
        let joined = tokio::task::spawn_blocking(move || normalize(call(&agent, &task_url))).await;
        let response = match joined {
            Ok(response) => response,
            Err(err) => {
                tracing::error!(method, url = %url, error = %err, "request task aborted");
                ApiResponse::network_failure()
            }
        };
        tracing::debug!(method, url = %url, status = response.status, "response received");
        response
    }
}

#[async_trait]
impl PersonApi for RemoteStore {
    async fn create(&self, person: &Person) -> ApiResponse<Person> {
        let body = person.clone();
        self.run("POST", self.resource_url.clone(), move |agent, url| {
            agent.post(url).send_json(&body)
        })
        .await
    }

    async fn update(&self, rut: &Rut, person: &Person) -> ApiResponse<Person> {
        let body = person.clone();
        self.run("PUT", self.item_url(rut), move |agent, url| {
            agent.put(url).send_json(&body)
        })
        .await
    }

    async fn delete(&self, rut: &Rut) -> ApiResponse<()> {
        let response: ApiResponse<Value> = self
            .run("DELETE", self.item_url(rut), |agent, url| agent.delete(url).call())
            .await;
        response.map(|_| ())
    }

    async fn get_one(&self, rut: &Rut) -> ApiResponse<Person> {
        self.run("GET", self.item_url(rut), |agent, url| agent.get(url).call())
            .await
    }

    async fn get_all(&self) -> ApiResponse<Vec<Person>> {
        self.run("GET", self.resource_url.clone(), |agent, url| {
            agent.get(url).call()
        })
        .await
    }
}

/// Fold a `ureq` result into the uniform response shape.
fn normalize<T: DeserializeOwned>(result: Result<ureq::Response, ureq::Error>) -> ApiResponse<T> {
    match result {
        Ok(response) => {
            let status = response.status();
            ApiResponse::success(status, read_json(response))
        }
        Err(ureq::Error::Status(status, response)) => {
            let body: Option<Value> = read_json(response);
            ApiResponse::failure(status, body.as_ref())
        }
        Err(ureq::Error::Transport(transport)) => {
            tracing::warn!(error = %transport, "backend unreachable");
            ApiResponse::network_failure()
        }
    }
}

/// Empty or non-JSON bodies become `None`. The body is read in full;
/// `into_string` would cap it at 10 MB.
fn read_json<T: DeserializeOwned>(response: ureq::Response) -> Option<T> {
    let mut body = Vec::new();
    if let Err(err) = response.into_reader().read_to_end(&mut body) {
        tracing::warn!(error = %err, "failed to read response body");
        return None;
    }
    if body.iter().all(u8::is_ascii_whitespace) {
        return None;
    }
    match serde_json::from_slice(&body) {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::debug!(error = %err, "response body is not the expected JSON");
            None
        }
    }
}
