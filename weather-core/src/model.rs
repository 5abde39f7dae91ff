use serde::{Deserialize, Deserializer, Serialize, de};
use thiserror::Error;

use crate::format::{LogicalIcon, format_time, resolve_icon, unit_for};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoordinateError {
    #[error("latitude {0} is outside -90..=90")]
    Latitude(f64),
    #[error("longitude {0} is outside -180..=180")]
    Longitude(f64),
}

/// A validated latitude/longitude pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoordinateError> {
        // NaN fails the range check too.
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(CoordinateError::Latitude(latitude));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(CoordinateError::Longitude(longitude));
        }
        Ok(Self { latitude, longitude })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherCondition {
    pub main: String,
    pub description: String,
    #[serde(rename = "icon")]
    pub icon_code: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MainMetrics {
    pub temp: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub humidity: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wind {
    pub speed: f64,
}

/// The provider's `sys` block: country code plus sunrise/sunset in Unix seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemInfo {
    #[serde(default)]
    pub country: String,
    pub sunrise: i64,
    pub sunset: i64,
}

/// Current weather for one location, in the provider's wire shape.
///
/// The same shape is used for the cached slot, so a stored report reads back
/// exactly as it was received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    #[serde(rename = "weather", deserialize_with = "non_empty_conditions")]
    pub conditions: Vec<WeatherCondition>,
    pub main: MainMetrics,
    pub wind: Wind,
    pub sys: SystemInfo,
    #[serde(rename = "name", default)]
    pub location_name: String,
}

impl WeatherReport {
    pub fn country_code(&self) -> &str {
        &self.sys.country
    }
}

fn non_empty_conditions<'de, D>(deserializer: D) -> Result<Vec<WeatherCondition>, D::Error>
where
    D: Deserializer<'de>,
{
    let conditions = Vec::<WeatherCondition>::deserialize(deserializer)?;
    if conditions.is_empty() {
        return Err(de::Error::invalid_length(0, &"at least one weather condition"));
    }
    Ok(conditions)
}

/// Display-ready fields derived from a [`WeatherReport`] and a locale.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewModel {
    pub condition_main: String,
    pub condition_description: String,
    /// `None` when no condition carried a mapped icon code.
    pub icon: Option<LogicalIcon>,
    pub temp_display: String,
    pub humidity_display: String,
    pub min_display: String,
    pub max_display: String,
    pub wind_speed: String,
    pub sunrise_display: String,
    pub sunset_display: String,
    pub location_name: String,
    pub country_code: String,
}

impl ViewModel {
    /// Builds the view for `report`.
    ///
    /// Every condition entry is applied in order and overwrites the condition
    /// fields, so the last entry is the one displayed. An entry with an
    /// unmapped icon code leaves the previously resolved icon in place.
    pub fn build(report: &WeatherReport, locale: &str) -> Self {
        let mut condition_main = String::new();
        let mut condition_description = String::new();
        let mut icon = None;

        for condition in &report.conditions {
            condition_main.clone_from(&condition.main);
            condition_description.clone_from(&condition.description);
            if let Some(resolved) = resolve_icon(&condition.icon_code) {
                icon = Some(resolved);
            }
        }

        let main = &report.main;
        Self {
            condition_main,
            condition_description,
            icon,
            temp_display: format!("{}{}", decimal(main.temp), unit_for(locale)),
            humidity_display: format!("{} per cent", main.humidity),
            min_display: format!("{} min", decimal(main.temp_min)),
            max_display: format!("{} max", decimal(main.temp_max)),
            wind_speed: decimal(report.wind.speed),
            sunrise_display: format_time(report.sys.sunrise),
            sunset_display: format_time(report.sys.sunset),
            location_name: report.location_name.clone(),
            country_code: report.sys.country.clone(),
        }
    }
}

/// Renders a float with at least one fractional digit ("5.0", "12.34").
fn decimal(value: f64) -> String {
    format!("{value:?}")
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn sample_json() -> serde_json::Value {
        serde_json::json!({
            "coord": { "lon": 13.41, "lat": 52.52 },
            "weather": [
                { "id": 803, "main": "Clouds", "description": "broken clouds", "icon": "04d" }
            ],
            "base": "stations",
            "main": {
                "temp": 21.5,
                "feels_like": 21.2,
                "temp_min": 19.0,
                "temp_max": 23.25,
                "pressure": 1012,
                "humidity": 64
            },
            "wind": { "speed": 4.12, "deg": 250 },
            "dt": 1_700_000_000,
            "sys": { "country": "DE", "sunrise": 1_699_990_000, "sunset": 1_700_022_000 },
            "name": "Berlin",
            "cod": 200
        })
    }

    pub(crate) fn sample_report() -> WeatherReport {
        serde_json::from_value(sample_json()).expect("sample must parse")
    }

    fn condition(main: &str, icon: &str) -> WeatherCondition {
        WeatherCondition {
            main: main.to_string(),
            description: format!("{} description", main.to_lowercase()),
            icon_code: icon.to_string(),
        }
    }

    #[test]
    fn coordinate_accepts_bounds() {
        assert!(Coordinate::new(90.0, 180.0).is_ok());
        assert!(Coordinate::new(-90.0, -180.0).is_ok());
    }

    #[test]
    fn coordinate_rejects_out_of_range_and_nan() {
        assert_eq!(Coordinate::new(90.5, 0.0), Err(CoordinateError::Latitude(90.5)));
        assert_eq!(Coordinate::new(0.0, -181.0), Err(CoordinateError::Longitude(-181.0)));
        assert!(Coordinate::new(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn report_parses_provider_payload_ignoring_extra_fields() {
        let report = sample_report();
        assert_eq!(report.conditions.len(), 1);
        assert_eq!(report.conditions[0].icon_code, "04d");
        assert_eq!(report.main.humidity, 64);
        assert_eq!(report.location_name, "Berlin");
        assert_eq!(report.country_code(), "DE");
    }

    #[test]
    fn report_rejects_empty_condition_list() {
        let mut json = sample_json();
        json["weather"] = serde_json::json!([]);
        let err = serde_json::from_value::<WeatherReport>(json).unwrap_err();
        assert!(err.to_string().contains("at least one weather condition"));
    }

    #[test]
    fn view_model_formats_metrics() {
        let vm = ViewModel::build(&sample_report(), "GB");

        assert_eq!(vm.condition_main, "Clouds");
        assert_eq!(vm.condition_description, "broken clouds");
        assert_eq!(vm.icon, Some(LogicalIcon::Cloud));
        assert_eq!(vm.temp_display, "21.5°C");
        assert_eq!(vm.humidity_display, "64 per cent");
        assert_eq!(vm.min_display, "19.0 min");
        assert_eq!(vm.max_display, "23.25 max");
        assert_eq!(vm.wind_speed, "4.12");
        assert_eq!(vm.sunrise_display, format_time(1_699_990_000));
        assert_eq!(vm.sunset_display, format_time(1_700_022_000));
        assert_eq!(vm.location_name, "Berlin");
        assert_eq!(vm.country_code, "DE");
    }

    #[test]
    fn view_model_uses_fahrenheit_symbol_for_us_locale() {
        let vm = ViewModel::build(&sample_report(), "US");
        assert_eq!(vm.temp_display, "21.5°F");
    }

    #[test]
    fn last_condition_wins() {
        let mut report = sample_report();
        report.conditions = vec![
            condition("Clear", "01d"),
            condition("Rain", "10d"),
            condition("Snow", "13d"),
        ];

        let vm = ViewModel::build(&report, "GB");

        assert_eq!(vm.condition_main, "Snow");
        assert_eq!(vm.condition_description, "snow description");
        assert_eq!(vm.icon, Some(LogicalIcon::Snowflake));
    }

    #[test]
    fn unmapped_icon_keeps_previous_icon() {
        let mut report = sample_report();
        report.conditions = vec![condition("Thunderstorm", "11d"), condition("Mist", "50d")];

        let vm = ViewModel::build(&report, "GB");

        assert_eq!(vm.condition_main, "Mist");
        assert_eq!(vm.icon, Some(LogicalIcon::Storm));
    }

    #[test]
    fn no_mapped_icon_at_all() {
        let mut report = sample_report();
        report.conditions = vec![condition("Mist", "50n")];

        assert_eq!(ViewModel::build(&report, "GB").icon, None);
    }

    #[test]
    fn build_is_pure() {
        let report = sample_report();
        assert_eq!(ViewModel::build(&report, "MM"), ViewModel::build(&report, "MM"));
    }
}
