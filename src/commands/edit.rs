use anyhow::Result;
use bookcal_core::edit::EditField;
use bookcal_core::popover::Anchor;
use bookcal_core::sync::SyncOutcome;
use bookcal_core::{Id, Reaction, UiEvent};
use owo_colors::OwoColorize;

use super::{CalendarArgs, load_calendar};
use crate::render::Render;
use crate::utils::tui::create_spinner;

pub async fn run(
    id: String,
    changes: Vec<(EditField, String)>,
    dry_run: bool,
    args: CalendarArgs,
) -> Result<()> {
    let mut loaded = load_calendar(&args).await?;
    let calendar = &mut loaded.calendar;

    calendar
        .handle(UiEvent::EventClicked {
            event_id: Id::new(id.clone()),
            anchor: Anchor::new(format!("appointment-{id}")),
        })
        .await?;

    calendar.handle(UiEvent::EditRequested).await?;

    for (field, value) in changes {
        calendar.handle(UiEvent::FieldEdited { field, value }).await?;
    }

    if let Some(form) = calendar.edit_session().form() {
        println!("{}", form.render());
        println!();
    }

    if dry_run {
        let update = calendar.edit_session().build_update()?;
        println!("{}", update.render());
        calendar.handle(UiEvent::EditCancelled).await?;
        return Ok(());
    }

    let spinner = create_spinner("Saving appointment...".to_string());
    let result = calendar.handle(UiEvent::EditCommitted).await;
    spinner.finish_and_clear();

    let Reaction::Committed(committed) = result? else {
        return Ok(());
    };

    println!("{} appointment #{}", "Saved".green(), committed.update.id);
    match committed.refresh {
        Some(Ok(SyncOutcome::Applied { events, .. })) => {
            println!("{}", format!("Reloaded {} appointments", events).dimmed());
        }
        Some(Err(e)) => println!("{}", format!("Could not reload the calendar: {e}").yellow()),
        _ => {}
    }

    Ok(())
}
