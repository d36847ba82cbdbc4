pub mod console;
pub mod markdown;

pub use console::{print_summary, print_units, print_validation};
pub use markdown::render_markdown;

/// `75` -> `1m 15s`, `8` -> `8s`.
pub fn format_duration(seconds: u64) -> String {
    let (minutes, seconds) = (seconds / 60, seconds % 60);
    if minutes == 0 {
        format!("{seconds}s")
    } else {
        format!("{minutes}m {seconds:02}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0), "0s");
        assert_eq!(format_duration(59), "59s");
        assert_eq!(format_duration(75), "1m 15s");
        assert_eq!(format_duration(3600), "60m 00s");
    }
}
