//! TUI rendering traits for bookcal types.
//!
//! Extension traits that add colored terminal rendering to bookcal-core
//! types using owo_colors.

use bookcal_core::AppointmentEvent;
use bookcal_core::edit::{EditField, EditForm};
use bookcal_core::popover::PopoverSummary;
use bookcal_core::remote::AppointmentUpdate;
use owo_colors::OwoColorize;

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

impl Render for AppointmentEvent {
    fn render(&self) -> String {
        let time = format!("{}-{}", self.start.format("%H:%M"), self.end.format("%H:%M"));
        let who = format!("[{} / {}]", self.provider_name(), self.customer_name());
        format!("  {} {} {} {}", time, self.title, who.dimmed(), format!("#{}", self.id).dimmed())
    }
}

impl Render for PopoverSummary {
    fn render(&self) -> String {
        let mut lines = vec![self.title.bold().to_string()];
        for (label, value) in self.rows() {
            lines.push(format!("  {:<10}{}", label.dimmed(), value));
        }
        lines.join("\n")
    }
}

impl Render for EditForm {
    fn render(&self) -> String {
        let mut lines = Vec::new();

        for field in EditField::ALL {
            let value = self.value(field);
            let shown = match field {
                EditField::Service => self
                    .services
                    .iter()
                    .find(|s| s.id.as_str() == value)
                    .map(|s| format!("{} ({})", s.name, value))
                    .unwrap_or_else(|| value.to_string()),
                EditField::Provider => self
                    .providers
                    .iter()
                    .find(|p| p.id.as_str() == value)
                    .map(|p| format!("{} ({})", p.display_name(), value))
                    .unwrap_or_else(|| value.to_string()),
                _ => value.to_string(),
            };
            lines.push(format!("  {:<18}{}", field.name().dimmed(), shown));
        }

        let choices: Vec<String> = self
            .providers
            .iter()
            .map(|p| format!("{} ({})", p.display_name(), p.id))
            .collect();
        let choices = if choices.is_empty() {
            "none".to_string()
        } else {
            choices.join(", ")
        };
        lines.push(format!("  {:<18}{}", "providers".dimmed(), choices.dimmed()));

        lines.join("\n")
    }
}

impl Render for AppointmentUpdate {
    fn render(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|e| e.to_string().red().to_string())
    }
}

/// Render events grouped under a heading per day, in the order given.
pub fn render_agenda(events: &[AppointmentEvent]) -> String {
    let mut lines = Vec::new();
    let mut current_date = None;

    for event in events {
        let date = event.start.date();
        if current_date != Some(date) {
            if current_date.is_some() {
                lines.push(String::new());
            }
            lines.push(date.format("%a %b %-d").to_string().bold().to_string());
            current_date = Some(date);
        }
        lines.push(event.render());
    }

    lines.join("\n")
}
