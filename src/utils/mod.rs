//! Common utilities and helpers

pub mod logging;
pub mod path;

/// Formatting helpers for reports
pub struct Utils;

impl Utils {
    /// Format a bit rate in bits per second for display
    pub fn format_bitrate(bits_per_second: u64) -> String {
        const UNITS: &[&str] = &["b/s", "kb/s", "Mb/s", "Gb/s"];
        let mut rate = bits_per_second as f64;
        let mut unit_index = 0;

        while rate >= 1000.0 && unit_index < UNITS.len() - 1 {
            rate /= 1000.0;
            unit_index += 1;
        }

        if unit_index == 0 {
            format!("{} {}", bits_per_second, UNITS[unit_index])
        } else {
            format!("{:.2} {}", rate, UNITS[unit_index])
        }
    }

    /// Format a sample rate in Hz for display
    pub fn format_sample_rate(hz: f64) -> String {
        if hz >= 1000.0 {
            format!("{:.1} kHz", hz / 1000.0)
        } else {
            format!("{} Hz", hz)
        }
    }

    /// Trim trailing zeros from a rate such as `29.970`
    pub fn format_rate(rate: f64) -> String {
        let text = format!("{:.3}", rate);
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bitrate() {
        assert_eq!(Utils::format_bitrate(800), "800 b/s");
        assert_eq!(Utils::format_bitrate(128_000), "128.00 kb/s");
        assert_eq!(Utils::format_bitrate(8_192_000), "8.19 Mb/s");
    }

    #[test]
    fn test_format_sample_rate() {
        assert_eq!(Utils::format_sample_rate(44100.0), "44.1 kHz");
        assert_eq!(Utils::format_sample_rate(800.0), "800 Hz");
    }

    #[test]
    fn test_format_rate() {
        assert_eq!(Utils::format_rate(29.97), "29.97");
        assert_eq!(Utils::format_rate(25.0), "25");
    }
}
