//! Interactive prompts. Falls back to plain stdin when there is no terminal,
//! so `echo Paris | weather` works.

use std::io::BufRead;

use anyhow::{Context, Result};
use inquire::{InquireError, Password, PasswordDisplayMode, Select, Text};
use weather_core::{DEFAULT_CITY, Units};

pub fn city() -> Result<String> {
    let answer = Text::new("Please enter a city name:")
        .with_placeholder(DEFAULT_CITY)
        .prompt();

    match answer {
        Ok(city) => Ok(city),
        Err(InquireError::NotTTY) => read_line_from(std::io::stdin().lock()),
        Err(err) => Err(err).context("Failed to read city name"),
    }
}

/// `None` means keep the key that is already stored.
pub fn api_key(has_existing: bool) -> Result<Option<String>> {
    let help = if has_existing {
        "Leave empty to keep the current key"
    } else {
        "Get one at https://home.openweathermap.org/api_keys"
    };

    let key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .with_help_message(help)
        .prompt()
        .context("Failed to read API key")?;

    Ok(non_empty_key(&key, has_existing))
}

pub fn units(current: Units) -> Result<Units> {
    let options = Units::all().to_vec();
    let start = options.iter().position(|u| *u == current).unwrap_or(0);

    Select::new("Unit system:", options)
        .with_starting_cursor(start)
        .prompt()
        .context("Failed to read unit system")
}

/// One line of piped input; EOF yields an empty string.
fn read_line_from(mut reader: impl BufRead) -> Result<String> {
    let mut line = String::new();
    reader
        .read_line(&mut line)
        .context("Failed to read city name from stdin")?;
    Ok(line)
}

fn non_empty_key(input: &str, has_existing: bool) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() && has_existing {
        None
    } else {
        Some(trimmed.to_string())
    }
}
