use anyhow::Result;
use bookcal_core::view::CalendarView;
use owo_colors::OwoColorize;

use super::{CalendarArgs, load_calendar};
use crate::render::render_agenda;

pub async fn run(args: CalendarArgs) -> Result<()> {
    let loaded = load_calendar(&args).await?;

    if let Some(selection) = loaded.calendar.filter().get() {
        let range = loaded.view.visible_range();
        println!("{}", format!("{} · {}", selection, range).dimmed());
        println!();
    }

    if loaded.calendar.cache().all().is_empty() {
        println!("{}", "No appointments".dimmed());
        return Ok(());
    }

    println!("{}", render_agenda(&loaded.view.events()));
    Ok(())
}
