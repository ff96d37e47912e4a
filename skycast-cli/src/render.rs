//! Human-friendly rendering of provider payloads.
//!
//! The engine hands over whatever shape the winning vendor returned, so
//! every field extraction here is provider-specific by design.

use chrono::DateTime;
use serde_json::Value;
use skycast_core::{ProviderId, ProviderResult, Renderer, Units};

/// Renders a result as a small two-column metric table, with an optional
/// forecast summary for the providers that return one.
#[derive(Debug, Default)]
pub struct TablePresenter;

impl TablePresenter {
    fn rows(result: &ProviderResult, units: Units) -> Vec<(&'static str, String)> {
        let payload = &result.payload;
        let symbol = units.temp_symbol();

        match result.provider {
            ProviderId::OpenWeather => vec![
                ("City", text(payload, "/name")),
                ("Temperature", format!("{} {symbol}", num(payload, "/main/temp"))),
                ("Humidity", format!("{}%", num(payload, "/main/humidity"))),
                ("Weather", text(payload, "/weather/0/description")),
            ],
            ProviderId::WeatherApi => {
                let temp_ptr = match units {
                    Units::Metric => "/current/temp_c",
                    Units::Imperial => "/current/temp_f",
                };
                vec![
                    (
                        "City",
                        format!(
                            "{}, {}",
                            text(payload, "/location/name"),
                            text(payload, "/location/country")
                        ),
                    ),
                    ("Temperature", format!("{} {symbol}", num(payload, temp_ptr))),
                    ("Humidity", format!("{}%", num(payload, "/current/humidity"))),
                    ("Condition", text(payload, "/current/condition/text")),
                ]
            }
            ProviderId::VisualCrossing => vec![
                ("City", text(payload, "/address")),
                ("Temperature", format!("{} {symbol}", num(payload, "/currentConditions/temp"))),
                ("Weather", text(payload, "/currentConditions/conditions")),
            ],
            // Open-Meteo is queried without a unit preference and always
            // reports metric values.
            ProviderId::OpenMeteo => vec![
                (
                    "Temperature",
                    format!("{} °C", num(payload, "/current_weather/temperature")),
                ),
                ("Windspeed", format!("{} km/h", num(payload, "/current_weather/windspeed"))),
            ],
        }
    }

    fn forecast_lines(result: &ProviderResult, units: Units) -> Vec<String> {
        let payload = &result.payload;
        let symbol = units.temp_symbol();

        match result.provider {
            ProviderId::OpenWeather => entries(payload, "/list")
                .iter()
                .take(5)
                .map(|entry| {
                    let when = entry
                        .pointer("/dt")
                        .and_then(Value::as_i64)
                        .and_then(|ts| DateTime::from_timestamp(ts, 0))
                        .map(|dt| dt.format("%a %H:%M").to_string())
                        .unwrap_or_else(|| "?".to_string());
                    format!(
                        "• {when}: {} {symbol}, {}",
                        num(entry, "/main/temp"),
                        text(entry, "/weather/0/description")
                    )
                })
                .collect(),
            ProviderId::WeatherApi => {
                let temp_ptr = match units {
                    Units::Metric => "/day/avgtemp_c",
                    Units::Imperial => "/day/avgtemp_f",
                };
                entries(payload, "/forecast/forecastday")
                    .iter()
                    .map(|day| {
                        format!(
                            "• {}: {}{symbol}, {}",
                            text(day, "/date"),
                            num(day, temp_ptr),
                            text(day, "/day/condition/text")
                        )
                    })
                    .collect()
            }
            // Forecast is best-effort; the other providers only ever hand
            // back current conditions.
            _ => Vec::new(),
        }
    }
}

impl Renderer for TablePresenter {
    fn render(&self, result: &ProviderResult, units: Units, forecast: bool) {
        println!("\nWeather Report ({})", result.provider);

        let rows = Self::rows(result, units);
        let width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
        for (label, value) in &rows {
            println!("  {label:>width$}  {value}");
        }

        if forecast {
            let lines = Self::forecast_lines(result, units);
            if !lines.is_empty() {
                println!("\n5-Day Forecast:");
                for line in lines {
                    println!("{line}");
                }
            }
        }
    }
}

fn text(payload: &Value, pointer: &str) -> String {
    payload.pointer(pointer).and_then(Value::as_str).unwrap_or("?").to_string()
}

fn num(payload: &Value, pointer: &str) -> String {
    match payload.pointer(pointer) {
        Some(Value::Number(n)) => n.to_string(),
        _ => "?".to_string(),
    }
}

fn entries<'a>(payload: &'a Value, pointer: &str) -> &'a [Value] {
    payload.pointer(pointer).and_then(Value::as_array).map(Vec::as_slice).unwrap_or(&[])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openweather_rows_extract_the_expected_fields() {
        let result = ProviderResult {
            provider: ProviderId::OpenWeather,
            payload: serde_json::json!({
                "name": "London",
                "main": {"temp": 11.2, "humidity": 81},
                "weather": [{"description": "overcast clouds"}]
            }),
        };

        let rows = TablePresenter::rows(&result, Units::Metric);
        assert_eq!(rows[0], ("City", "London".to_string()));
        assert_eq!(rows[1], ("Temperature", "11.2 °C".to_string()));
        assert_eq!(rows[2], ("Humidity", "81%".to_string()));
        assert_eq!(rows[3], ("Weather", "overcast clouds".to_string()));
    }

    #[test]
    fn weatherapi_temperature_follows_the_unit_system() {
        let result = ProviderResult {
            provider: ProviderId::WeatherApi,
            payload: serde_json::json!({
                "location": {"name": "Austin", "country": "USA"},
                "current": {"temp_c": 31.0, "temp_f": 87.8, "humidity": 40,
                            "condition": {"text": "Sunny"}}
            }),
        };

        let metric = TablePresenter::rows(&result, Units::Metric);
        assert_eq!(metric[1].1, "31.0 °C");

        let imperial = TablePresenter::rows(&result, Units::Imperial);
        assert_eq!(imperial[1].1, "87.8 °F");
    }

    #[test]
    fn missing_fields_render_as_placeholders() {
        let result = ProviderResult {
            provider: ProviderId::VisualCrossing,
            payload: serde_json::json!({"currentConditions": {}}),
        };

        let rows = TablePresenter::rows(&result, Units::Metric);
        assert_eq!(rows[0].1, "?");
        assert_eq!(rows[1].1, "? °C");
    }

    #[test]
    fn weatherapi_forecast_lines_summarize_each_day() {
        let result = ProviderResult {
            provider: ProviderId::WeatherApi,
            payload: serde_json::json!({
                "forecast": {"forecastday": [
                    {"date": "2026-08-28",
                     "day": {"avgtemp_c": 24.0, "avgtemp_f": 75.2,
                             "condition": {"text": "Partly cloudy"}}}
                ]}
            }),
        };

        let lines = TablePresenter::forecast_lines(&result, Units::Metric);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("2026-08-28"));
        assert!(lines[0].contains("24"));
        assert!(lines[0].contains("Partly cloudy"));
    }

    #[test]
    fn providers_without_forecast_payloads_produce_no_lines() {
        let result = ProviderResult {
            provider: ProviderId::VisualCrossing,
            payload: serde_json::json!({"address": "London"}),
        };

        assert!(TablePresenter::forecast_lines(&result, Units::Metric).is_empty());
    }
}
