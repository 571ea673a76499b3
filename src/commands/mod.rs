pub mod config;
pub mod edit;
pub mod events;
pub mod filters;
pub mod show;

use std::sync::Arc;

use anyhow::{Context, Result};
use bookcal_core::config::BookcalConfig;
use bookcal_core::date_range::{DateRange, ViewKind, parse_date};
use bookcal_core::directory::Directory;
use bookcal_core::filter::FilterSelection;
use bookcal_core::remote::HttpBackend;
use bookcal_core::sync::SyncOutcome;
use bookcal_core::{BackendCalendar, Reaction, UiEvent};
use clap::Args;

use crate::utils::tui::create_spinner;
use crate::view::TerminalView;

/// Which appointments to load.
#[derive(Args, Debug)]
pub struct CalendarArgs {
    /// Show one provider's appointments (by id)
    #[arg(long, conflicts_with = "service")]
    pub provider: Option<String>,

    /// Show one service's appointments (by id)
    #[arg(long)]
    pub service: Option<String>,

    /// Calendar layout: day, week or month (defaults to the configured view)
    #[arg(long)]
    pub view: Option<ViewKind>,

    /// Date the view should show (YYYY-MM-DD, default today)
    #[arg(long)]
    pub date: Option<String>,

    /// Pages to move from --date, e.g. 1 for next week or -1 for last week
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    pub offset: i32,

    /// Explicit range start (YYYY-MM-DD), overrides --view
    #[arg(long, requires = "to")]
    pub from: Option<String>,

    /// Explicit range end, exclusive (YYYY-MM-DD)
    #[arg(long, requires = "from")]
    pub to: Option<String>,
}

impl CalendarArgs {
    fn range(&self, config: &BookcalConfig) -> Result<DateRange> {
        if let (Some(from), Some(to)) = (&self.from, &self.to) {
            return Ok(DateRange::from_args(from, to)?);
        }

        let view = self.view.unwrap_or(config.default_view);
        let date = match &self.date {
            Some(date) => parse_date(date)?,
            None => chrono::Local::now().date_naive(),
        };
        Ok(view.visible_range(view.shift(date, self.offset)?)?)
    }

    fn selection(&self) -> Option<FilterSelection> {
        match (&self.provider, &self.service) {
            (Some(id), _) => Some(FilterSelection::provider(id.as_str())),
            (None, Some(id)) => Some(FilterSelection::service(id.as_str())),
            (None, None) => None,
        }
    }
}

/// A calendar page wired to the configured backend.
pub struct LoadedCalendar {
    pub calendar: BackendCalendar,
    pub view: Arc<TerminalView>,
}

/// Build the calendar and load the requested filter and range.
///
/// Without --provider or --service the first filter option is used.
pub async fn load_calendar(args: &CalendarArgs) -> Result<LoadedCalendar> {
    let config = BookcalConfig::load()?;
    let directory_path = config.directory_file();
    let directory = Directory::load(&directory_path).with_context(|| {
        format!(
            "Could not load providers and services.\n\n\
            Create {} with:\n  \
            {{ \"providers\": [...], \"services\": [...] }}",
            directory_path.display()
        )
    })?;

    let backend = Arc::new(HttpBackend::from_config(&config)?);
    let view = Arc::new(TerminalView::new(args.range(&config)?));
    let mut calendar = BackendCalendar::new(directory, backend.clone(), backend, view.clone());

    let reaction = match args.selection() {
        Some(selection) => calendar.handle(UiEvent::FilterChanged(selection)).await?,
        None => calendar.initialize()?,
    };

    let Reaction::Refreshing(handle) = reaction else {
        anyhow::bail!("No providers or services to show. Add some to {}", directory_path.display());
    };

    let spinner = create_spinner("Loading appointments...".to_string());
    let outcome = handle.await.context("Refresh task failed")?;
    spinner.finish_and_clear();

    if let SyncOutcome::Discarded { .. } = outcome? {
        anyhow::bail!("Appointments changed while loading, try again");
    }

    Ok(LoadedCalendar { calendar, view })
}
