//! Backend collaborators: the appointments query and the update endpoint.

pub mod http;
pub mod protocol;

use async_trait::async_trait;

use crate::appointment::AppointmentPayload;

pub use http::HttpBackend;
pub use protocol::{AppointmentQuery, AppointmentUpdate, CustomerFields};

/// Answers range + filter queries with appointment records, in server order.
#[async_trait]
pub trait DataSource: Send + Sync {
    async fn appointments(&self, query: &AppointmentQuery) -> anyhow::Result<Vec<AppointmentPayload>>;
}

/// Stores changes to an existing appointment.
#[async_trait]
pub trait Persister: Send + Sync {
    async fn update(&self, update: &AppointmentUpdate) -> anyhow::Result<()>;
}
