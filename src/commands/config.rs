use anyhow::Result;
use bookcal_core::config::BookcalConfig;
use owo_colors::OwoColorize;

pub fn run() -> Result<()> {
    let path = BookcalConfig::config_path()?;
    let config = BookcalConfig::load()?;

    println!("{}", path.display().bold());
    println!("  {:<22}{}", "base_url".dimmed(), config.base_url);
    println!("  {:<22}{}", "appointments_path".dimmed(), config.appointments_path);
    println!("  {:<22}{}", "update_path".dimmed(), config.update_path);
    println!("  {:<22}{}s", "request_timeout_secs".dimmed(), config.request_timeout_secs);
    println!("  {:<22}{}", "directory_path".dimmed(), config.directory_file().display());
    println!("  {:<22}{:?}", "default_view".dimmed(), config.default_view);

    Ok(())
}
