use anyhow::Result;
use bookcal_core::popover::Anchor;
use bookcal_core::{Id, Reaction, UiEvent};

use super::{CalendarArgs, load_calendar};
use crate::render::Render;

pub async fn run(id: String, args: CalendarArgs) -> Result<()> {
    let mut loaded = load_calendar(&args).await?;

    let reaction = loaded
        .calendar
        .handle(UiEvent::EventClicked {
            event_id: Id::new(id.clone()),
            anchor: Anchor::new(format!("appointment-{id}")),
        })
        .await?;

    if let Reaction::PopoverShown(summary) = reaction {
        println!("{}", summary.render());
    }

    Ok(())
}
