//! Plain-text rendering of a weather reading and its alerts.

use chrono::NaiveDate;

use crate::{
    icon::WeatherIcon,
    model::{AlertRecord, WeatherReading},
};

/// Alert descriptions longer than this many characters are cut.
pub const ALERT_DESCRIPTION_LIMIT: usize = 100;

/// Render the message body. `alert_block` is appended verbatim when non-empty.
pub fn compose(city: &str, reading: &WeatherReading, alert_block: &str, date: NaiveDate) -> String {
    let icon = WeatherIcon::from_code(reading.code);

    let mut message = format!(
        "{icon} Weather Update for {city} - {date}\n\n\
         • Condition: {desc} {icon}\n\
         • Temperature: {temp:.1}°C\n\
         • Feels like: {feels:.1}°C\n\
         • Humidity: {humidity}%\n\
         • Wind speed: {wind} m/s\n\n\
         Have a great day! {clear}",
        date = date.format("%d %b %Y"),
        desc = reading.description,
        temp = reading.temperature_c,
        feels = reading.feels_like_c,
        humidity = reading.humidity_pct,
        wind = reading.wind_speed_mps,
        clear = WeatherIcon::Clear,
    );

    message.push_str(alert_block);
    message
}

/// One `⚠️ event: description` line per alert, preceded by a blank line.
/// No alerts renders as an empty string.
pub fn format_alerts(alerts: &[AlertRecord]) -> String {
    if alerts.is_empty() {
        return String::new();
    }

    let lines: Vec<String> = alerts
        .iter()
        .map(|alert| {
            format!(
                "{} {}: {}",
                WeatherIcon::Warning,
                alert.event,
                shorten(&alert.description, ALERT_DESCRIPTION_LIMIT)
            )
        })
        .collect();

    format!("\n\n{}", lines.join("\n"))
}

fn shorten(text: &str, limit: usize) -> String {
    if text.chars().count() > limit {
        format!("{}...", text.chars().take(limit).collect::<String>())
    } else {
        text.to_string()
    }
}
