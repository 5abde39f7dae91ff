use weather_core::ViewModel;

/// Plain-text block for one view.
pub fn render(title: &str, view: &ViewModel) -> String {
    let icon = view.icon.map(|i| i.as_str()).unwrap_or("-");
    let place = if view.country_code.is_empty() {
        view.location_name.clone()
    } else {
        format!("{}, {}", view.location_name, view.country_code)
    };

    [
        format!("{title}: {place}"),
        format!("  {} ({}) [{icon}]", view.condition_main, view.condition_description),
        format!("  Temperature: {}", view.temp_display),
        format!("  Range:       {} / {}", view.min_display, view.max_display),
        format!("  Humidity:    {}", view.humidity_display),
        format!("  Wind:        {}", view.wind_speed),
        format!("  Sunrise:     {}", view.sunrise_display),
        format!("  Sunset:      {}", view.sunset_display),
    ]
    .join("\n")
}
