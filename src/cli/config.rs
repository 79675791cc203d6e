use crate::error::Result;
use crate::settings::{load_settings, save_settings, settings_path, Settings};

pub fn show() -> Result<()> {
    println!("{}", format_settings(&load_settings()));
    Ok(())
}

pub fn set(key: &str, value: &str) -> Result<()> {
    let mut settings = load_settings();
    settings.set(key, value)?;
    save_settings(&settings)?;
    println!("{key} updated.");
    Ok(())
}

pub fn format_settings(settings: &Settings) -> String {
    let path = settings_path();
    let state = if path.exists() { "" } else { " (not created, using defaults)" };
    format!(
        "Settings:   {}{state}\ndelimiter:  {}\nformat:     {}\ntop_k:      {}",
        path.display(),
        settings.delimiter.key(),
        settings.format.key(),
        settings.top_k,
    )
}
