//! The seam between the reconciler and the backend.

use std::sync::Arc;

use async_trait::async_trait;
use personas_core::{Person, Rut};

use crate::response::ApiResponse;

/// The five CRUD calls against `/personas`.
///
/// Implementations never fail: every transport problem is folded into the
/// returned [`ApiResponse`].
#[async_trait]
pub trait PersonApi: Send + Sync {
    /// `POST /personas`
    async fn create(&self, person: &Person) -> ApiResponse<Person>;

    /// `PUT /personas/{rut}`
    async fn update(&self, rut: &Rut, person: &Person) -> ApiResponse<Person>;

    /// `DELETE /personas/{rut}`
    async fn delete(&self, rut: &Rut) -> ApiResponse<()>;

    /// `GET /personas/{rut}`
    async fn get_one(&self, rut: &Rut) -> ApiResponse<Person>;

    /// `GET /personas`
    async fn get_all(&self) -> ApiResponse<Vec<Person>>;
}

#[async_trait]
impl<A: PersonApi + ?Sized> PersonApi for Arc<A> {
    async fn create(&self, person: &Person) -> ApiResponse<Person> {
        (**self).create(person).await
    }

    async fn update(&self, rut: &Rut, person: &Person) -> ApiResponse<Person> {
        (**self).update(rut, person).await
    }

    async fn delete(&self, rut: &Rut) -> ApiResponse<()> {
        (**self).delete(rut).await
    }

    async fn get_one(&self, rut: &Rut) -> ApiResponse<Person> {
        (**self).get_one(rut).await
    }

    async fn get_all(&self) -> ApiResponse<Vec<Person>> {
        (**self).get_all().await
    }
}
