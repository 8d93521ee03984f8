use owo_colors::{OwoColorize, Style};
use ripple_core::notify::{NotificationSink, Severity};

/// Prints engine notifications to the terminal with a severity-coded prefix.
#[derive(Debug, Default)]
pub struct ConsoleSink;

impl NotificationSink for ConsoleSink {
    fn notify(&self, message: &str, severity: Severity) {
        match severity {
            Severity::Success => {
                println!("{} {}", "✓".style(Style::new().green().bold()), message)
            }
            Severity::Error => {
                eprintln!("{} {}", "✗".style(Style::new().red().bold()), message)
            }
            Severity::Warning => {
                eprintln!("{} {}", "!".style(Style::new().yellow().bold()), message)
            }
            Severity::Info => println!("{} {}", "→".style(Style::new().blue()), message),
        }
    }
}
