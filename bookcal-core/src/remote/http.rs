//! HTTP implementation of the backend collaborators.
//!
//! Both endpoints take form-encoded POST bodies. The appointments endpoint
//! answers with a JSON array of appointment records; the save endpoint takes
//! the update as a JSON document in the `appointment_data` field.

use std::time::Duration;

use anyhow::{Context, bail};
use async_trait::async_trait;
use tracing::debug;
use url::Url;

use crate::appointment::AppointmentPayload;
use crate::config::BookcalConfig;
use crate::error::{CalendarError, CalendarResult};
use crate::remote::protocol::{AppointmentQuery, AppointmentUpdate};
use crate::remote::{DataSource, Persister};

#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    appointments_url: Url,
    update_url: Url,
}

impl HttpBackend {
    pub fn new(
        base_url: &str,
        appointments_path: &str,
        update_path: &str,
        timeout: Duration,
    ) -> CalendarResult<Self> {
        // Url::join drops the last path segment unless the base ends with '/'
        let base = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };
        let base = Url::parse(&base)
            .map_err(|e| CalendarError::Config(format!("Invalid base_url '{}': {}", base_url, e)))?;
        let join = |path: &str| {
            base.join(path.trim_start_matches('/'))
                .map_err(|e| CalendarError::Config(format!("Invalid endpoint '{}': {}", path, e)))
        };

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CalendarError::Config(format!("Could not build HTTP client: {e}")))?;

        Ok(HttpBackend {
            client,
            appointments_url: join(appointments_path)?,
            update_url: join(update_path)?,
        })
    }

    pub fn from_config(config: &BookcalConfig) -> CalendarResult<Self> {
        HttpBackend::new(
            &config.base_url,
            &config.appointments_path,
            &config.update_path,
            Duration::from_secs(config.request_timeout_secs),
        )
    }
}

#[async_trait]
impl DataSource for HttpBackend {
    async fn appointments(&self, query: &AppointmentQuery) -> anyhow::Result<Vec<AppointmentPayload>> {
        debug!(url = %self.appointments_url, record_id = %query.record_id, filter_type = %query.filter_type, "querying appointments");

        let response = self
            .client
            .post(self.appointments_url.clone())
            .form(query)
            .send()
            .await
            .context("Appointments request failed")?;

        let status = response.status();
        if !status.is_success() {
            bail!("Appointments request returned HTTP {}", status);
        }

        response
            .json::<Vec<AppointmentPayload>>()
            .await
            .context("Failed to parse appointments response")
    }
}

#[async_trait]
impl Persister for HttpBackend {
    async fn update(&self, update: &AppointmentUpdate) -> anyhow::Result<()> {
        debug!(url = %self.update_url, id = %update.id, "saving appointment");

        let appointment_data =
            serde_json::to_string(update).context("Failed to serialize appointment update")?;

        let response = self
            .client
            .post(self.update_url.clone())
            .form(&[("appointment_data", appointment_data)])
            .send()
            .await
            .context("Save request failed")?;

        let status = response.status();
        if !status.is_success() {
            bail!("Save request returned HTTP {}", status);
        }
        Ok(())
    }
}
