//! Progress spinner shown while the pagination loop runs.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Create a steady-tick spinner, or `None` in quiet mode.
pub fn create_spinner(message: &str, quiet: bool) -> Option<ProgressBar> {
    if quiet {
        return None;
    }
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner()
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
        .template("{spinner:.blue} {msg}")
    {
        spinner.set_style(style);
    }
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    Some(spinner)
}

pub fn finish_spinner(spinner: Option<ProgressBar>, message: &str) {
    if let Some(s) = spinner {
        s.finish_with_message(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiet_mode_disables_spinner() {
        assert!(create_spinner("fetching", true).is_none());
    }

    #[test]
    fn finishing_a_missing_spinner_is_a_no_op() {
        finish_spinner(None, "done");
    }
}
