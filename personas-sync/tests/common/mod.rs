//! Scripted in-memory backend shared by the reconciler tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use personas_client::{ApiResponse, PersonApi};
use personas_core::{Direccion, Person, Rut};
use serde_json::json;

/// One canned reply, optionally delayed.
pub struct Reply<T> {
    pub delay: Duration,
    pub response: ApiResponse<T>,
}

impl<T> From<ApiResponse<T>> for Reply<T> {
    fn from(response: ApiResponse<T>) -> Self {
        Self {
            delay: Duration::ZERO,
            response,
        }
    }
}

/// Replies are consumed in order per method; an empty queue answers as an
/// unreachable backend.
#[derive(Default)]
pub struct ScriptedApi {
    creates: Mutex<VecDeque<Reply<Person>>>,
    updates: Mutex<VecDeque<Reply<Person>>>,
    deletes: Mutex<VecDeque<Reply<()>>>,
    get_ones: Mutex<VecDeque<Reply<Person>>>,
    get_alls: Mutex<VecDeque<Reply<Vec<Person>>>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_create(self, reply: impl Into<Reply<Person>>) -> Self {
        self.creates.lock().unwrap().push_back(reply.into());
        self
    }

    pub fn on_update(self, reply: impl Into<Reply<Person>>) -> Self {
        self.updates.lock().unwrap().push_back(reply.into());
        self
    }

    pub fn on_delete(self, reply: impl Into<Reply<()>>) -> Self {
        self.deletes.lock().unwrap().push_back(reply.into());
        self
    }

    pub fn on_get_one(self, reply: impl Into<Reply<Person>>) -> Self {
        self.get_ones.lock().unwrap().push_back(reply.into());
        self
    }

    pub fn on_get_all(self, reply: impl Into<Reply<Vec<Person>>>) -> Self {
        self.get_alls.lock().unwrap().push_back(reply.into());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    async fn answer<T>(&self, queue: &Mutex<VecDeque<Reply<T>>>, call: String) -> ApiResponse<T> {
        self.calls.lock().unwrap().push(call);
        let reply = queue.lock().unwrap().pop_front();
        match reply {
            Some(reply) => {
                if !reply.delay.is_zero() {
                    tokio::time::sleep(reply.delay).await;
                }
                reply.response
            }
            None => ApiResponse::network_failure(),
        }
    }
}

#[async_trait]
impl PersonApi for ScriptedApi {
    async fn create(&self, person: &Person) -> ApiResponse<Person> {
        self.answer(&self.creates, format!("create {}", person.rut))
            .await
    }

    async fn update(&self, rut: &Rut, _person: &Person) -> ApiResponse<Person> {
        self.answer(&self.updates, format!("update {rut}")).await
    }

    async fn delete(&self, rut: &Rut) -> ApiResponse<()> {
        self.answer(&self.deletes, format!("delete {rut}")).await
    }

    async fn get_one(&self, rut: &Rut) -> ApiResponse<Person> {
        self.answer(&self.get_ones, format!("get {rut}")).await
    }

    async fn get_all(&self) -> ApiResponse<Vec<Person>> {
        self.answer(&self.get_alls, "get_all".to_string()).await
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub fn person(rut: &str, nombre: &str) -> Person {
    Person {
        rut: Rut::from(rut),
        nombre: nombre.into(),
        apellido: "Rojas".into(),
        fecha_nacimiento: "15-03-1990".into(),
        direccion: Direccion {
            calle: "Av. Matta 123".into(),
            comuna: "Santiago".into(),
            region: "Metropolitana".into(),
        },
    }
}

pub fn ok<T>(status: u16, data: T) -> ApiResponse<T> {
    ApiResponse::success(status, Some(data))
}

pub fn empty<T>(status: u16) -> ApiResponse<T> {
    ApiResponse::success(status, None)
}

pub fn rejected<T>(status: u16, message: Option<&str>) -> ApiResponse<T> {
    let body = message.map(|m| json!({ "message": m, "statusCode": status }));
    ApiResponse::failure(status, body.as_ref())
}

pub fn offline<T>() -> ApiResponse<T> {
    ApiResponse::network_failure()
}

pub fn delayed<T>(millis: u64, response: ApiResponse<T>) -> Reply<T> {
    Reply {
        delay: Duration::from_millis(millis),
        response,
    }
}
