use chrono::Local;
use nu_ansi_term::{Color, Style};
use std::fmt;
use tracing::{Event, Level, Subscriber};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt::{format::Writer, FmtContext, FormatEvent, FormatFields},
    prelude::*,
    registry::LookupSpan,
    Layer,
};

/// Target used for per-transaction status lines. Always shown on the console.
pub const TASK_RESULT_TARGET: &str = "task_result";

pub fn setup_logger() -> Option<WorkerGuard> {
    if std::fs::create_dir_all("logs").is_err() {
        return setup_console_only();
    }

    let file_appender = tracing_appender::rolling::hourly("logs", "app");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // File layer: INFO everywhere so a run can be audited afterwards
    let file_filter = tracing_subscriber::filter::Targets::new()
        .with_target(TASK_RESULT_TARGET, Level::INFO)
        .with_default(Level::INFO);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .event_format(FileFormatter)
        .with_filter(file_filter);

    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stdout)
        .with_ansi(true)
        .event_format(TerminalFormatter)
        .with_filter(console_filter());

    let installed = tracing_subscriber::registry()
        .with(file_layer)
        .with(console_layer)
        .try_init();

    // Return guard - MUST be kept alive by caller
    installed.ok().map(|_| guard)
}

fn setup_console_only() -> Option<WorkerGuard> {
    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stdout)
        .with_ansi(true)
        .event_format(TerminalFormatter)
        .with_filter(console_filter());

    let _ = tracing_subscriber::registry().with(console_layer).try_init();
    None
}

// Console: INFO for task_result, WARN for others
fn console_filter() -> tracing_subscriber::filter::Targets {
    tracing_subscriber::filter::Targets::new()
        .with_target(TASK_RESULT_TARGET, Level::INFO)
        .with_default(Level::WARN)
}

// --- Formatters ---

struct MessageVisitor {
    message: String,
}

impl tracing::field::Visit for MessageVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{:?}", value);
        }
    }
    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        }
    }
}

fn event_message(event: &Event<'_>) -> String {
    let mut visitor = MessageVisitor {
        message: String::new(),
    };
    event.record(&mut visitor);
    visitor.message
}

/// Highlights SUCCESS/FAILED words the same way on every console line.
pub fn highlight_status(msg: &str) -> String {
    let green_text = Style::new().fg(Color::LightGreen).bold();
    let red_text = Style::new().fg(Color::LightRed).bold();
    if msg.contains("SUCCESS") || msg.contains("Success") || msg.contains("successfully") {
        msg.replace("SUCCESS", &green_text.paint("SUCCESS").to_string())
            .replace("Success", &green_text.paint("Success").to_string())
            .replace("successfully", &green_text.paint("successfully").to_string())
    } else if msg.contains("FAILED") || msg.contains("Failed") {
        msg.replace("FAILED", &red_text.paint("FAILED").to_string())
            .replace("Failed", &red_text.paint("Failed").to_string())
    } else {
        msg.to_string()
    }
}

pub struct TerminalFormatter;

impl<S, N> FormatEvent<S, N> for TerminalFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let meta = event.metadata();
        let msg = event_message(event);

        if meta.target() != TASK_RESULT_TARGET {
            let label = match *meta.level() {
                Level::ERROR => Color::Red.bold().paint("ERROR"),
                Level::WARN => Color::Yellow.bold().paint("WARN"),
                _ => Color::DarkGray.paint("INFO"),
            };
            write!(writer, "{} ", label)?;
        } else if *meta.level() <= Level::WARN {
            // Failed status lines are red as a whole
            return writeln!(writer, "{}", Color::LightRed.paint(msg));
        }

        writeln!(writer, "{}", highlight_status(&msg))
    }
}

pub struct FileFormatter;

impl<S, N> FormatEvent<S, N> for FileFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
        let level = event.metadata().level();

        write!(writer, "{} [{}] ", timestamp, level)?;
        writeln!(writer, "{}", event_message(event))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_highlight_keeps_plain_text() {
        assert_eq!(highlight_status("nothing to see"), "nothing to see");
    }

    #[test]
    fn test_highlight_paints_status_words() {
        let green = Style::new().fg(Color::LightGreen).bold();
        let red = Style::new().fg(Color::LightRed).bold();

        let done = highlight_status("Staking transaction 1 completed successfully!");
        assert!(done.contains(&green.paint("successfully").to_string()));

        let failed = highlight_status("Stake FAILED");
        assert_eq!(failed, format!("Stake {}", red.paint("FAILED")));
    }
}
