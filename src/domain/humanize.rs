//! Human readable durations and file sizes shown on jobs.

const DURATION_UNITS: [(&str, u64); 3] = [("MS", 1000), ("Sec", 60), ("Min", 60)];
const LAST_DURATION_UNIT: &str = "Hours";

const SIZE_UNITS: [&str; 6] = ["B", "KiB", "MiB", "GiB", "TiB", "PiB"];

/// Formats a duration given in milliseconds using the largest unit it reaches.
pub fn format_duration(millis: u64) -> String {
    let mut value = millis;
    for (unit, step) in DURATION_UNITS {
        if value < step {
            return format!("{value}{unit}");
        }
        value /= step;
    }
    format!("{value}{LAST_DURATION_UNIT}")
}

/// Converts a duration in (possibly fractional) seconds to whole milliseconds.
pub fn seconds_to_millis(seconds: f64) -> u64 {
    // saturating: negative and NaN become 0
    (seconds * 1000.0) as u64
}

/// Formats a byte count in binary units, e.g. `512B`, `2KiB`, `1.5MiB`.
pub fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        return format!("{bytes}{}", SIZE_UNITS[0]);
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    // 1023.96KiB would print as 1024KiB
    if (value * 10.0).round() >= 10240.0 && unit < SIZE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let text = format!("{value:.1}");
    let text = text.strip_suffix(".0").unwrap_or(&text);
    format!("{text}{}", SIZE_UNITS[unit])
}
