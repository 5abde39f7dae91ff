//! Pure display helpers: temperature unit, local clock time and icon lookup.

use chrono::{DateTime, Local};
use serde::Serialize;

pub const CELSIUS: &str = "°C";
pub const FAHRENHEIT: &str = "°F";

/// Country codes that display temperatures in Fahrenheit.
const FAHRENHEIT_REGIONS: [&str; 3] = ["US", "LR", "MM"];

/// Temperature unit symbol for a locale string.
///
/// Fahrenheit only when the whole string equals one of the listed country
/// codes; a full locale such as `"en_US.UTF-8"` gives Celsius.
pub fn unit_for(locale: &str) -> &'static str {
    if FAHRENHEIT_REGIONS.contains(&locale) {
        FAHRENHEIT
    } else {
        CELSIUS
    }
}

/// Formats Unix seconds as zero-padded 24-hour `HH:mm` in the system time zone.
pub fn format_time(unix_seconds: i64) -> String {
    unix_seconds
        .checked_mul(1000)
        .and_then(DateTime::from_timestamp_millis)
        .map(|utc| utc.with_timezone(&Local).format("%H:%M").to_string())
        .unwrap_or_else(|| "--:--".to_string())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogicalIcon {
    Sunny,
    Cloud,
    Rain,
    Storm,
    Snowflake,
}

impl LogicalIcon {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogicalIcon::Sunny => "sunny",
            LogicalIcon::Cloud => "cloud",
            LogicalIcon::Rain => "rain",
            LogicalIcon::Storm => "storm",
            LogicalIcon::Snowflake => "snowflake",
        }
    }
}

impl std::fmt::Display for LogicalIcon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps a provider icon code to a display icon.
///
/// Codes outside the table return `None`, meaning "keep whatever icon is
/// already shown". Night clear sky (`01n`) and night rain (`10n`) map to
/// cloud, and night thunderstorm (`11n`) maps to rain.
pub fn resolve_icon(code: &str) -> Option<LogicalIcon> {
    let icon = match code {
        "01d" => LogicalIcon::Sunny,
        "02d" | "03d" | "04d" | "04n" | "01n" | "02n" | "03n" | "10n" => LogicalIcon::Cloud,
        "10d" | "11n" => LogicalIcon::Rain,
        "11d" => LogicalIcon::Storm,
        "13d" | "13n" => LogicalIcon::Snowflake,
        _ => return None,
    };
    Some(icon)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minutes_of_day(hh_mm: &str) -> u32 {
        let (h, m) = hh_mm.split_once(':').expect("HH:mm");
        h.parse::<u32>().expect("hour") * 60 + m.parse::<u32>().expect("minute")
    }

    #[test]
    fn fahrenheit_for_listed_regions() {
        for locale in ["US", "LR", "MM"] {
            assert_eq!(unit_for(locale), FAHRENHEIT, "locale {locale}");
        }
    }

    #[test]
    fn celsius_for_everything_else() {
        for locale in ["", "GB", "DE", "us", "USA", "RU", "MX", "en_GB.UTF-8"] {
            assert_eq!(unit_for(locale), CELSIUS, "locale {locale}");
        }
    }

    #[test]
    fn full_locale_strings_are_not_country_codes() {
        for locale in ["en_US.UTF-8", "[en_US]", "[en_LR]", "my-MM", " US", "US "] {
            assert_eq!(unit_for(locale), CELSIUS, "locale {locale}");
        }
    }

    #[test]
    fn format_time_matches_local_clock() {
        let expected = DateTime::from_timestamp(0, 0)
            .expect("epoch")
            .with_timezone(&Local)
            .format("%H:%M")
            .to_string();
        assert_eq!(format_time(0), expected);
    }

    #[test]
    fn format_time_is_zero_padded_hh_mm() {
        let s = format_time(1_700_000_000);
        assert_eq!(s.len(), 5);
        assert_eq!(&s[2..3], ":");
        assert!(minutes_of_day(&s) < 24 * 60);
    }

    #[test]
    fn one_hour_later_modulo_a_day() {
        let base = 1_700_000_000;
        let diff = (minutes_of_day(&format_time(base + 3600)) + 24 * 60
            - minutes_of_day(&format_time(base)))
            % (24 * 60);
        assert_eq!(diff, 60);
    }

    #[test]
    fn epoch_plus_one_hour() {
        let diff =
            (minutes_of_day(&format_time(3600)) + 24 * 60 - minutes_of_day(&format_time(0)))
                % (24 * 60);
        assert_eq!(diff, 60);
    }

    #[test]
    fn format_time_is_stable() {
        assert_eq!(format_time(3600), format_time(3600));
    }

    #[test]
    fn format_time_out_of_range() {
        assert_eq!(format_time(i64::MAX), "--:--");
    }

    #[test]
    fn every_known_icon_code() {
        let table = [
            ("01d", LogicalIcon::Sunny),
            ("02d", LogicalIcon::Cloud),
            ("03d", LogicalIcon::Cloud),
            ("04d", LogicalIcon::Cloud),
            ("04n", LogicalIcon::Cloud),
            ("10d", LogicalIcon::Rain),
            ("11d", LogicalIcon::Storm),
            ("13d", LogicalIcon::Snowflake),
            ("01n", LogicalIcon::Cloud),
            ("02n", LogicalIcon::Cloud),
            ("03n", LogicalIcon::Cloud),
            ("10n", LogicalIcon::Cloud),
            ("11n", LogicalIcon::Rain),
            ("13n", LogicalIcon::Snowflake),
        ];

        for (code, icon) in table {
            assert_eq!(resolve_icon(code), Some(icon), "code {code}");
        }
    }

    #[test]
    fn unknown_icon_code_is_a_no_op() {
        assert_eq!(resolve_icon("99x"), None);
        assert_eq!(resolve_icon("50d"), None);
        assert_eq!(resolve_icon(""), None);
    }

    #[test]
    fn icon_display_names() {
        assert_eq!(LogicalIcon::Snowflake.to_string(), "snowflake");
        assert_eq!(LogicalIcon::Sunny.as_str(), "sunny");
    }
}
