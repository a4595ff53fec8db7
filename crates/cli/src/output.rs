//! CLI output formatting utilities.
//!
//! Provides consistent formatting for terminal output: status symbols and
//! human-readable duration formatting.

use std::time::Duration;

pub mod symbols {
  pub const SUCCESS: &str = "✓";
  pub const INFO: &str = "•";
  pub const ARROW: &str = "→";
}

pub fn format_duration(duration: Duration) -> String {
  let secs = duration.as_secs();
  let millis = duration.subsec_millis();

  if secs >= 60 {
    let mins = secs / 60;
    let remaining_secs = secs % 60;
    format!("{}m {}s", mins, remaining_secs)
  } else if secs > 0 {
    format!("{}.{:02}s", secs, millis / 10)
  } else {
    format!("{}ms", millis)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn format_duration_scales_units() {
    assert_eq!(format_duration(Duration::from_millis(250)), "250ms");
    assert_eq!(format_duration(Duration::from_millis(1500)), "1.50s");
    assert_eq!(format_duration(Duration::from_secs(90)), "1m 30s");
  }
}
