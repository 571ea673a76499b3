//! Reconciles backend query results into the event cache and the view.
//!
//! Queries are tagged with a sequence number as they are issued. Only the
//! response to the most recently issued query is applied; anything older is
//! dropped on arrival, whatever order the responses come back in. A failed
//! query leaves the cache and the view exactly as they were.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, warn};

use crate::appointment::{AppointmentEvent, AppointmentPayload};
use crate::cache::EventCache;
use crate::date_range::DateRange;
use crate::error::{CalendarError, CalendarResult};
use crate::filter::FilterSelection;
use crate::remote::{AppointmentQuery, DataSource};
use crate::view::CalendarView;

/// What happened to a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The response was current and is now on display.
    Applied { sequence: u64, events: usize },
    /// A newer query was issued before this response arrived.
    Discarded { sequence: u64 },
}

/// A query that has been issued but not yet reconciled.
#[derive(Debug, Clone)]
pub struct PendingQuery {
    pub sequence: u64,
    pub query: AppointmentQuery,
}

pub struct SyncEngine {
    source: Arc<dyn DataSource>,
    cache: Arc<EventCache>,
    view: Arc<dyn CalendarView>,
    issued: AtomicU64,
    /// Serializes the stale check with the cache/view swap.
    apply: Mutex<()>,
}

impl SyncEngine {
    pub fn new(
        source: Arc<dyn DataSource>,
        cache: Arc<EventCache>,
        view: Arc<dyn CalendarView>,
    ) -> Self {
        SyncEngine {
            source,
            cache,
            view,
            issued: AtomicU64::new(0),
            apply: Mutex::new(()),
        }
    }

    pub fn cache(&self) -> &Arc<EventCache> {
        &self.cache
    }

    pub fn view(&self) -> &Arc<dyn CalendarView> {
        &self.view
    }

    /// Sequence number of the most recently issued query (0 before the first).
    pub fn latest_sequence(&self) -> u64 {
        self.issued.load(Ordering::SeqCst)
    }

    /// Load `filter` over `range` and display the result if it is still current.
    pub async fn refresh(
        &self,
        filter: &FilterSelection,
        range: &DateRange,
    ) -> CalendarResult<SyncOutcome> {
        let pending = self.issue(filter, range)?;
        self.complete(pending).await
    }

    /// Fetch an already issued query and reconcile its response.
    ///
    /// Callers that hand the fetch to another task issue first, so the
    /// sequence follows the order the refreshes were requested in.
    pub async fn complete(&self, pending: PendingQuery) -> CalendarResult<SyncOutcome> {
        let response = self.source.appointments(&pending.query).await;
        self.reconcile(pending.sequence, response)
    }

    /// `refresh` over the range the view currently shows.
    pub async fn refresh_visible(&self, filter: &FilterSelection) -> CalendarResult<SyncOutcome> {
        let range = self.view.visible_range();
        self.refresh(filter, &range).await
    }

    /// Validate the range and allocate the next sequence number.
    ///
    /// An invalid range fails before a sequence number is taken, so it does
    /// not supersede queries already in flight.
    pub fn issue(&self, filter: &FilterSelection, range: &DateRange) -> CalendarResult<PendingQuery> {
        range.validate()?;

        let query = AppointmentQuery::new(filter, range);
        let sequence = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(sequence, %filter, %range, "issuing appointments query");

        Ok(PendingQuery { sequence, query })
    }

    /// Apply the response to query `sequence` unless a newer query exists.
    pub fn reconcile(
        &self,
        sequence: u64,
        response: anyhow::Result<Vec<AppointmentPayload>>,
    ) -> CalendarResult<SyncOutcome> {
        let _guard = self.apply.lock().unwrap_or_else(PoisonError::into_inner);

        let latest = self.latest_sequence();
        if sequence != latest {
            debug!(sequence, latest, "discarding stale appointments response");
            return Ok(SyncOutcome::Discarded { sequence });
        }

        let payloads = response.map_err(|e| {
            let message = format!("{e:#}");
            warn!(sequence, error = %message, "appointments query failed");
            CalendarError::SyncFailed(message)
        })?;

        let events: Vec<AppointmentEvent> = payloads.into_iter().map(AppointmentEvent::from).collect();
        self.cache.replace_all(events);

        let snapshot = self.cache.all();
        self.view.clear_events();
        self.view.set_event_source(snapshot.events());

        debug!(sequence, events = snapshot.len(), "appointments reconciled");
        Ok(SyncOutcome::Applied {
            sequence,
            events: snapshot.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::appointment::Id;
    use crate::testing::{GatedSource, RecordingView, StaticSource, payload, range};

    fn engine_with(source: Arc<dyn DataSource>, view: Arc<RecordingView>) -> SyncEngine {
        SyncEngine::new(source, Arc::new(EventCache::new()), view)
    }

    fn week() -> DateRange {
        range("2024-01-01", "2024-01-08")
    }

    #[tokio::test]
    async fn refresh_installs_server_records() {
        let source = Arc::new(
            StaticSource::default().with(9, vec![payload(1, "Massage"), payload(2, "Massage")]),
        );
        let view = Arc::new(RecordingView::new(week()));
        let engine = engine_with(source.clone(), view.clone());

        let outcome = engine.refresh(&FilterSelection::service(9), &week()).await.unwrap();

        assert_eq!(outcome, SyncOutcome::Applied { sequence: 1, events: 2 });
        assert_eq!(engine.cache().all().len(), 2);
        assert!(engine.cache().lookup(&Id::from(1)).is_some());
        assert!(engine.cache().lookup(&Id::from(2)).is_some());
        assert_eq!(view.installed_ids(), vec![Id::from(1), Id::from(2)]);
        assert_eq!(view.clear_count(), 1);

        let queries = source.queries.lock().unwrap();
        assert_eq!(queries[0].start_date, "2024-01-01");
        assert_eq!(queries[0].end_date, "2024-01-08");
    }

    #[tokio::test]
    async fn inverted_range_fails_without_a_request() {
        let source = Arc::new(StaticSource::default());
        let view = Arc::new(RecordingView::new(week()));
        let engine = engine_with(source.clone(), view);

        let err = engine
            .refresh(&FilterSelection::service(9), &range("2024-01-08", "2024-01-01"))
            .await
            .unwrap_err();

        assert!(matches!(err, CalendarError::InvalidRange { .. }));
        assert_eq!(source.query_count(), 0);
        assert_eq!(engine.latest_sequence(), 0);
    }

    #[tokio::test]
    async fn failed_refresh_keeps_last_good_state() {
        let source = Arc::new(StaticSource::default().with(9, vec![payload(1, "Massage")]));
        let view = Arc::new(RecordingView::new(week()));
        let engine = engine_with(source.clone(), view.clone());
        engine.refresh(&FilterSelection::service(9), &week()).await.unwrap();

        source.set_failing(true);
        let err = engine.refresh(&FilterSelection::service(9), &week()).await.unwrap_err();

        assert!(matches!(err, CalendarError::SyncFailed(_)));
        assert_eq!(engine.cache().all().len(), 1);
        assert_eq!(view.installed_ids(), vec![Id::from(1)]);
        assert_eq!(view.clear_count(), 1);
    }

    #[tokio::test]
    async fn last_issued_query_wins_when_responses_arrive_out_of_order() {
        let source = Arc::new(GatedSource::default());
        let first = source.gate(1);
        let second = source.gate(2);
        let view = Arc::new(RecordingView::new(week()));
        let engine = engine_with(source.clone(), view.clone());

        let (older, newer, visible) = (FilterSelection::provider(1), FilterSelection::provider(2), week());
        let (slow, fast, ()) = tokio::join!(
            engine.refresh(&older, &visible),
            engine.refresh(&newer, &visible),
            async {
                second.send(Ok(vec![payload(20, "Checkup")])).unwrap();
                tokio::task::yield_now().await;
                first.send(Ok(vec![payload(10, "Consultation")])).unwrap();
            }
        );

        assert_eq!(slow.unwrap(), SyncOutcome::Discarded { sequence: 1 });
        assert_eq!(fast.unwrap(), SyncOutcome::Applied { sequence: 2, events: 1 });
        assert_eq!(view.installed_ids(), vec![Id::from(20)]);
        assert!(engine.cache().lookup(&Id::from(10)).is_none());
    }

    #[test]
    fn stale_failure_is_discarded_not_reported() {
        let view = Arc::new(RecordingView::new(week()));
        let engine = engine_with(Arc::new(StaticSource::default()), view);

        let old = engine.issue(&FilterSelection::provider(1), &week()).unwrap();
        let new = engine.issue(&FilterSelection::provider(2), &week()).unwrap();

        let applied = engine.reconcile(new.sequence, Ok(vec![payload(5, "Checkup")])).unwrap();
        let stale = engine
            .reconcile(old.sequence, Err(anyhow::anyhow!("timed out")))
            .unwrap();

        assert!(matches!(applied, SyncOutcome::Applied { events: 1, .. }));
        assert_eq!(stale, SyncOutcome::Discarded { sequence: old.sequence });
        assert!(engine.cache().lookup(&Id::from(5)).is_some());
    }

    #[tokio::test]
    async fn refresh_visible_uses_the_view_range() {
        let source = Arc::new(StaticSource::default());
        let view = Arc::new(RecordingView::new(week()));
        let engine = engine_with(source.clone(), view.clone());

        view.navigate(range("2024-01-08", "2024-01-15"));
        engine.refresh_visible(&FilterSelection::provider(2)).await.unwrap();

        let queries = source.queries.lock().unwrap();
        assert_eq!(queries[0].start_date, "2024-01-08");
    }

    #[tokio::test]
    async fn issue_order_decides_even_when_completed_in_reverse() {
        let source = Arc::new(
            StaticSource::default()
                .with(1, vec![payload(10, "Consultation")])
                .with(2, vec![payload(20, "Checkup")]),
        );
        let view = Arc::new(RecordingView::new(week()));
        let engine = engine_with(source, view.clone());

        let first = engine.issue(&FilterSelection::provider(1), &week()).unwrap();
        let second = engine.issue(&FilterSelection::provider(2), &week()).unwrap();

        let newer = engine.complete(second).await.unwrap();
        let older = engine.complete(first).await.unwrap();

        assert_eq!(newer, SyncOutcome::Applied { sequence: 2, events: 1 });
        assert_eq!(older, SyncOutcome::Discarded { sequence: 1 });
        assert_eq!(view.installed_ids(), vec![Id::from(20)]);
    }
}
