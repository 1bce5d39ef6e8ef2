// Copyright (c) The junit-report Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Logging setup for the command-line interface.

use clap::{Args, ValueEnum};
use color_eyre::{eyre::WrapErr, Result};
use owo_colors::{style, OwoColorize, Style};
use std::fmt;
use tracing::{
    field::{Field, Visit},
    level_filters::LevelFilter,
    Event, Level, Subscriber,
};
use tracing_subscriber::{
    filter::Targets,
    fmt::{format, FmtContext, FormatEvent, FormatFields},
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
    Layer,
};

/// Environment variable holding a log filter, e.g. `debug` or `junit_report_cli=trace`.
static LOG_ENV: &str = "JUNIT_REPORT_LOG";

#[derive(Copy, Clone, Debug, Args)]
#[must_use]
pub(crate) struct OutputOpts {
    /// Verbose output
    #[arg(long, short, global = true, env = "JUNIT_REPORT_VERBOSE")]
    pub(crate) verbose: bool,

    /// Produce color output: auto, always, never
    #[arg(
        long,
        value_enum,
        default_value_t,
        hide_possible_values = true,
        global = true,
        value_name = "WHEN"
    )]
    pub(crate) color: Color,
}

impl OutputOpts {
    /// Installs the global log subscriber.
    pub(crate) fn init(self) -> Result<()> {
        let OutputOpts { verbose, color } = self;

        let mut log_styles = LogStyles::default();
        if color.should_colorize(supports_color::Stream::Stderr) {
            log_styles.colorize();
        }

        let targets = targets_from_env(std::env::var(LOG_ENV).ok().as_deref(), verbose)?;

        let layer = tracing_subscriber::fmt::layer()
            .event_format(SimpleFormatter { styles: log_styles })
            .with_writer(std::io::stderr)
            .with_filter(targets);

        tracing_subscriber::registry()
            .with(layer)
            .try_init()
            .wrap_err("failed to install log subscriber")
    }
}

fn targets_from_env(level_str: Option<&str>, verbose: bool) -> Result<Targets> {
    match level_str {
        // If the level string is empty, use the standard level filter instead.
        None | Some("") => {
            let level = if verbose {
                LevelFilter::DEBUG
            } else {
                LevelFilter::INFO
            };
            Ok(Targets::new().with_default(level))
        }
        Some(level_str) => level_str
            .parse::<Targets>()
            .wrap_err_with(|| format!("unable to parse {LOG_ENV}: `{level_str}`")),
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
#[must_use]
pub(crate) enum Color {
    #[default]
    Auto,
    Always,
    Never,
}

impl Color {
    pub(crate) fn should_colorize(self, stream: supports_color::Stream) -> bool {
        match self {
            Color::Auto => supports_color::on_cached(stream).is_some(),
            Color::Always => true,
            Color::Never => false,
        }
    }
}

struct SimpleFormatter {
    styles: LogStyles,
}

impl<S, N> FormatEvent<S, N> for SimpleFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: format::Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        match *event.metadata().level() {
            Level::ERROR => write!(writer, "{}: ", "error".style(self.styles.error))?,
            Level::WARN => write!(writer, "{}: ", "warning".style(self.styles.warning))?,
            Level::INFO => write!(writer, "{}: ", "info".style(self.styles.info))?,
            Level::DEBUG => write!(writer, "{}: ", "debug".style(self.styles.debug))?,
            Level::TRACE => write!(writer, "{}: ", "trace".style(self.styles.trace))?,
        }

        let mut visitor = MessageVisitor {
            writer: &mut writer,
            error: None,
        };

        event.record(&mut visitor);

        if let Some(error) = visitor.error {
            return Err(error);
        }

        writeln!(writer)
    }
}

static MESSAGE_FIELD: &str = "message";

struct MessageVisitor<'writer, 'a> {
    writer: &'a mut format::Writer<'writer>,
    error: Option<fmt::Error>,
}

impl Visit for MessageVisitor<'_, '_> {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == MESSAGE_FIELD {
            if let Err(error) = write!(self.writer, "{value:?}") {
                self.error = Some(error);
            }
        }
    }
}

#[derive(Debug, Default)]
struct LogStyles {
    error: Style,
    warning: Style,
    info: Style,
    debug: Style,
    trace: Style,
}

impl LogStyles {
    fn colorize(&mut self) {
        self.error = style().red().bold();
        self.warning = style().yellow().bold();
        self.info = style().bold();
        self.debug = style().bold();
        self.trace = style().dimmed();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_targets() {
        let targets = targets_from_env(None, false).expect("default parses");
        assert!(targets.would_enable("junit_report", &Level::INFO));
        assert!(!targets.would_enable("junit_report", &Level::DEBUG));

        let targets = targets_from_env(Some(""), true).expect("empty parses");
        assert!(targets.would_enable("junit_report", &Level::DEBUG));
    }

    #[test]
    fn targets_from_env_var() {
        let targets = targets_from_env(Some("warn,junit_report=trace"), false)
            .expect("filter parses");
        assert!(targets.would_enable("junit_report", &Level::TRACE));
        assert!(!targets.would_enable("other", &Level::INFO));

        let error =
            targets_from_env(Some("junit_report=loud"), false).expect_err("bad level is rejected");
        assert!(!error.to_string().is_empty());
    }
}
