use chrono::{Local, TimeZone};

use crate::error::WeatherError;
use crate::models::{ApiUnits, Coordinates, CurrentWeatherResponse, Units, WeatherReading, WeatherSummary};

const KELVIN_OFFSET: f64 = 273.15;

/// Ordered condition rules; the first whose keywords appear in the description wins.
pub const MOTIVATION_RULES: &[(&[&str], &str)] = &[
    (&["sun", "clear"], "☀️ Perfect day to shine bright and achieve your goals!"),
    (&["rain"], "🌧️ Let the rain wash away yesterday's worries - fresh start ahead!"),
    (&["cloud"], "☁️ Even cloudy skies can't dim your inner light!"),
    (&["snow"], "❄️ Like snowflakes, you're unique and beautiful!"),
];

pub const FALLBACK_MOTIVATION: &str = "🌟 Every weather brings new opportunities!";

pub const HEAT_SUFFIX: &str = " Stay hydrated and keep cool! 💧";
pub const COLD_SUFFIX: &str = " Bundle up and stay warm! 🧥";

/// Converts a temperature fetched in `fetched` units into the caller's display unit.
pub fn to_display_temperature(value: f64, fetched: ApiUnits, requested: Units) -> f64 {
    match (requested, fetched) {
        (Units::Kelvin, ApiUnits::Metric) => value + KELVIN_OFFSET,
        (Units::Kelvin, ApiUnits::Imperial) => (value - 32.0) * 5.0 / 9.0 + KELVIN_OFFSET,
        _ => value,
    }
}

/// Rounds to one decimal place, ties to even on the exact binary value.
pub fn round1(value: f64) -> f64 {
    format!("{:.1}", value).parse().unwrap_or(value)
}

/// Upper-cases the first letter of every word and lower-cases the rest.
pub fn title_case(text: &str) -> String {
    let mut output = String::with_capacity(text.len());
    let mut previous_is_letter = false;
    for ch in text.chars() {
        if previous_is_letter {
            output.extend(ch.to_lowercase());
        } else {
            output.extend(ch.to_uppercase());
        }
        previous_is_letter = ch.is_alphabetic();
    }
    output
}

/// Formats a unix timestamp as local `HH:MM:SS`.
pub fn local_clock(unix_seconds: i64) -> String {
    Local
        .timestamp_opt(unix_seconds, 0)
        .single()
        .map(|time| time.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "--:--:--".to_string())
}

pub fn now_timestamp() -> String {
    Local::now().to_rfc3339()
}

/// Motivational line for a description and a celsius temperature.
pub fn motivation_for(description: &str, temperature: f64) -> String {
    let description = description.to_lowercase();
    let base = MOTIVATION_RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|keyword| description.contains(keyword)))
        .map(|(_, message)| *message)
        .unwrap_or(FALLBACK_MOTIVATION);

    let mut motivation = base.to_string();
    if let Some(suffix) = temperature_suffix(temperature) {
        motivation.push_str(suffix);
    }
    motivation
}

pub fn temperature_suffix(temperature: f64) -> Option<&'static str> {
    if temperature > 25.0 {
        Some(HEAT_SUFFIX)
    } else if temperature < 5.0 {
        Some(COLD_SUFFIX)
    } else {
        None
    }
}

/// Shapes an upstream response into a reading in the requested units.
pub fn format_reading(
    response: CurrentWeatherResponse,
    fetched: ApiUnits,
    requested: Units,
    coordinates: Option<Coordinates>,
) -> Result<WeatherReading, WeatherError> {
    let condition = response
        .weather
        .first()
        .ok_or(WeatherError::MissingConditions)?;

    Ok(WeatherReading {
        coordinates,
        city: response.name,
        country: response.sys.country,
        temperature: round1(to_display_temperature(response.main.temp, fetched, requested)),
        feels_like: round1(to_display_temperature(response.main.feels_like, fetched, requested)),
        units: requested,
        description: title_case(&condition.description),
        humidity: response.main.humidity,
        pressure: response.main.pressure,
        wind_speed: response.wind.speed,
        wind_direction: response.wind.deg,
        sunrise: local_clock(response.sys.sunrise),
        sunset: local_clock(response.sys.sunset),
        timestamp: now_timestamp(),
        status: "success",
    })
}

/// Condenses a reading into a summary with a motivational line.
pub fn format_summary(reading: &WeatherReading) -> WeatherSummary {
    WeatherSummary {
        location: format!("{}, {}", reading.city, reading.country),
        temperature: format!("{:.1}°{}", reading.temperature, reading.units.symbol()),
        condition: reading.description.clone(),
        summary: format!(
            "It's {:.1}° with {} in {}",
            reading.temperature,
            reading.description.to_lowercase(),
            reading.city
        ),
        motivation: motivation_for(&reading.description, reading.temperature),
        timestamp: now_timestamp(),
        status: "success",
    }
}
