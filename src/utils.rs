pub fn format_duration(duration: chrono::Duration) -> String {
    let hours = duration.num_hours();
    let minutes = duration.num_minutes() % 60;
    let seconds = duration.num_seconds() % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

/// Short form for calendar/session listings: "1h 23m" or "23m".
pub fn format_duration_short(duration: chrono::Duration) -> String {
    let hours = duration.num_hours();
    let minutes = duration.num_minutes() % 60;

    if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else {
        format!("{}m", minutes)
    }
}

/// Drop a trailing ".0" so weights print as "45kg" rather than "45.0kg"
/// while keeping "42.5kg" intact.
pub fn format_weight(weight: f32) -> String {
    if (weight - weight.round()).abs() < f32::EPSILON {
        format!("{:.0}", weight)
    } else {
        format!("{:.1}", weight)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_formats_zero_padded() {
        assert_eq!(format_duration(chrono::Duration::seconds(3661)), "01:01:01");
        assert_eq!(format_duration(chrono::Duration::seconds(59)), "00:00:59");
    }

    #[test]
    fn short_duration_drops_zero_hours() {
        assert_eq!(format_duration_short(chrono::Duration::minutes(83)), "1h 23m");
        assert_eq!(format_duration_short(chrono::Duration::minutes(23)), "23m");
    }

    #[test]
    fn weight_drops_trailing_zero() {
        assert_eq!(format_weight(45.0), "45");
        assert_eq!(format_weight(42.5), "42.5");
    }
}
