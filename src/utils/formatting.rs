pub fn format_duration(ms: u64) -> String {
    if ms < 1000 {
        format!("{}ms", ms)
    } else if ms < 60_000 {
        format!("{:.1}s", ms as f64 / 1000.0)
    } else if ms < 3_600_000 {
        let mins = ms / 60_000;
        let secs = (ms % 60_000) / 1000;
        format!("{}m {}s", mins, secs)
    } else {
        let hours = ms / 3_600_000;
        let mins = (ms % 3_600_000) / 60_000;
        format!("{}h {}m", hours, mins)
    }
}

/// Rough duration of a sweep at the configured rate, excluding bind latency.
pub fn estimate_sweep_ms(pairs: usize, delay_ms: u64) -> u64 {
    (pairs.saturating_sub(1) as u64).saturating_mul(delay_ms)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(200), "200ms");
        assert_eq!(format_duration(1500), "1.5s");
        assert_eq!(format_duration(125_000), "2m 5s");
        assert_eq!(format_duration(3_660_000), "1h 1m");
    }

    #[test]
    fn test_estimate_sweep_ms() {
        assert_eq!(estimate_sweep_ms(0, 200), 0);
        assert_eq!(estimate_sweep_ms(1, 200), 0);
        assert_eq!(estimate_sweep_ms(4, 200), 600);
    }
}
