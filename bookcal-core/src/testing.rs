//! In-memory collaborators shared by the unit tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::anyhow;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::json;
use tokio::sync::oneshot;

use crate::appointment::{AppointmentEvent, AppointmentPayload, Id};
use crate::date_range::DateRange;
use crate::directory::Directory;
use crate::remote::{AppointmentQuery, AppointmentUpdate, DataSource, Persister};
use crate::view::CalendarView;

pub fn payload(id: u64, service_name: &str) -> AppointmentPayload {
    serde_json::from_value(json!({
        "id": id,
        "start_datetime": "2024-01-02 10:00:00",
        "end_datetime": "2024-01-02 11:00:00",
        "service": { "id": 5, "name": service_name },
        "provider": { "id": 2, "first_name": "Bob", "last_name": "Ray", "services": [5, 6] },
        "customer": {
            "first_name": "John",
            "last_name": "Smith",
            "email": "john@example.com",
            "phone_number": "555-0100",
            "address": "1 Main St",
            "city": "Springfield",
            "zip_code": "12345",
            "notes": null
        },
        "id_services": 5,
        "id_users_provider": 2
    }))
    .unwrap()
}

pub fn event(id: u64, service_name: &str) -> AppointmentEvent {
    AppointmentEvent::from(payload(id, service_name))
}

pub fn directory() -> Directory {
    serde_json::from_value(json!({
        "providers": [
            { "id": 1, "first_name": "Ann", "last_name": "Lee", "services": [5] },
            { "id": 2, "first_name": "Bob", "last_name": "Ray", "services": [5, 6] },
            { "id": 3, "first_name": "Cat", "last_name": "Fox", "services": [7] }
        ],
        "services": [
            { "id": 5, "name": "Consultation" },
            { "id": 6, "name": "Checkup" },
            { "id": 7, "name": "Surgery" },
            { "id": 9, "name": "Massage" }
        ]
    }))
    .unwrap()
}

pub fn range(start: &str, end: &str) -> DateRange {
    DateRange {
        start: NaiveDate::parse_from_str(start, "%Y-%m-%d").unwrap(),
        end: NaiveDate::parse_from_str(end, "%Y-%m-%d").unwrap(),
    }
}

/// Answers every query with the payloads registered for its record id.
#[derive(Default)]
pub struct StaticSource {
    responses: Mutex<HashMap<Id, Vec<AppointmentPayload>>>,
    failing: Mutex<bool>,
    pub queries: Mutex<Vec<AppointmentQuery>>,
}

impl StaticSource {
    pub fn with(self, record_id: u64, payloads: Vec<AppointmentPayload>) -> Self {
        self.responses.lock().unwrap().insert(Id::from(record_id), payloads);
        self
    }

    pub fn set_failing(&self, failing: bool) {
        *self.failing.lock().unwrap() = failing;
    }

    pub fn query_count(&self) -> usize {
        self.queries.lock().unwrap().len()
    }
}

#[async_trait]
impl DataSource for StaticSource {
    async fn appointments(&self, query: &AppointmentQuery) -> anyhow::Result<Vec<AppointmentPayload>> {
        self.queries.lock().unwrap().push(query.clone());
        if *self.failing.lock().unwrap() {
            return Err(anyhow!("connection reset"));
        }
        Ok(self
            .responses
            .lock()
            .unwrap()
            .get(&query.record_id)
            .cloned()
            .unwrap_or_default())
    }
}

type Reply = anyhow::Result<Vec<AppointmentPayload>>;

/// Holds each query open until the test releases its reply, so responses
/// can be delivered in any order.
#[derive(Default)]
pub struct GatedSource {
    gates: Mutex<HashMap<Id, oneshot::Receiver<Reply>>>,
}

impl GatedSource {
    pub fn gate(&self, record_id: u64) -> oneshot::Sender<Reply> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().insert(Id::from(record_id), rx);
        tx
    }
}

#[async_trait]
impl DataSource for GatedSource {
    async fn appointments(&self, query: &AppointmentQuery) -> Reply {
        let rx = self
            .gates
            .lock()
            .unwrap()
            .remove(&query.record_id)
            .expect("no gate registered for query");
        rx.await.expect("gate dropped")
    }
}

/// Records what the calendar was told to display.
pub struct RecordingView {
    range: Mutex<DateRange>,
    pub installed: Mutex<Vec<AppointmentEvent>>,
    pub clears: AtomicUsize,
}

impl RecordingView {
    pub fn new(range: DateRange) -> Self {
        RecordingView {
            range: Mutex::new(range),
            installed: Mutex::new(Vec::new()),
            clears: AtomicUsize::new(0),
        }
    }

    pub fn navigate(&self, range: DateRange) {
        *self.range.lock().unwrap() = range;
    }

    pub fn installed_ids(&self) -> Vec<Id> {
        self.installed.lock().unwrap().iter().map(|e| e.id.clone()).collect()
    }

    pub fn clear_count(&self) -> usize {
        self.clears.load(Ordering::SeqCst)
    }
}

impl CalendarView for RecordingView {
    fn clear_events(&self) {
        self.clears.fetch_add(1, Ordering::SeqCst);
        self.installed.lock().unwrap().clear();
    }

    fn set_event_source(&self, events: &[AppointmentEvent]) {
        self.installed.lock().unwrap().extend(events.iter().cloned());
    }

    fn visible_range(&self) -> DateRange {
        *self.range.lock().unwrap()
    }
}

#[derive(Default)]
pub struct RecordingPersister {
    failing: Mutex<bool>,
    pub updates: Mutex<Vec<AppointmentUpdate>>,
}

impl RecordingPersister {
    pub fn set_failing(&self, failing: bool) {
        *self.failing.lock().unwrap() = failing;
    }

    pub fn update_count(&self) -> usize {
        self.updates.lock().unwrap().len()
    }
}

#[async_trait]
impl Persister for RecordingPersister {
    async fn update(&self, update: &AppointmentUpdate) -> anyhow::Result<()> {
        self.updates.lock().unwrap().push(update.clone());
        if *self.failing.lock().unwrap() {
            return Err(anyhow!("HTTP 500"));
        }
        Ok(())
    }
}
