use anyhow::Result;
use bookcal_core::config::BookcalConfig;
use bookcal_core::directory::Directory;
use bookcal_core::filter::FilterKind;
use owo_colors::OwoColorize;

pub fn run() -> Result<()> {
    let config = BookcalConfig::load()?;
    let directory = Directory::load(&config.directory_file())?;
    let options = directory.filter_options();

    for (kind, heading) in [(FilterKind::Provider, "Providers"), (FilterKind::Service, "Services")] {
        println!("{}", heading.bold());
        let mut any = false;
        for option in options.iter().filter(|o| o.selection.kind == kind) {
            println!("  {:>4}  {}", option.selection.record_id.dimmed(), option.label);
            any = true;
        }
        if !any {
            println!("  {}", "none".dimmed());
        }
    }

    Ok(())
}
