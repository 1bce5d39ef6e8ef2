// Copyright (c) The junit-report Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{errors::DisplayErrorChain, output::OutputOpts, sample::sample_report};
use camino::Utf8PathBuf;
use chrono::Utc;
use clap::Parser;
use junit_report::Report;
use tracing::{debug, error, info};

/// Builds a sample JUnit XML report, then writes it to a file or logs it.
#[derive(Debug, Parser)]
#[command(version)]
pub(crate) struct App {
    /// Write the JUnit report to this file instead of logging it
    #[arg(long, value_name = "PATH", env = "JUNIT_REPORT_FILE")]
    file: Option<Utf8PathBuf>,

    /// Name of the generated report
    #[arg(long, default_value = "junit lib compliance checking")]
    name: String,

    #[command(flatten)]
    pub(crate) output: OutputOpts,
}

impl App {
    /// Runs the command.
    ///
    /// Failures to render or write the report are logged, not returned.
    pub(crate) fn exec(self) {
        let report = sample_report(&self.name, Utc::now());
        debug!(
            "built report `{}`: {} tests, {} errors, {} failures",
            report.name, report.tests, report.errors, report.failures,
        );

        match &self.file {
            Some(path) => match report.write_to_path(path) {
                Ok(()) => info!("wrote JUnit report to `{path}`"),
                Err(err) => error!("{}", DisplayErrorChain::new(err)),
            },
            None => log_report(&report),
        }
    }
}

fn log_report(report: &Report) {
    match report.to_string() {
        Ok(xml) => info!("junit report:\n{xml}"),
        Err(err) => error!("{}", DisplayErrorChain::new(err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino_tempfile::Utf8TempDir;
    use clap::CommandFactory;

    #[test]
    fn verify_app() {
        App::command().debug_assert();
    }

    #[test]
    fn parse_args() {
        let app = App::try_parse_from(["junit-report-cli", "--file", "out/report.xml"])
            .expect("arguments parse");
        assert_eq!(app.file, Some(Utf8PathBuf::from("out/report.xml")));
        assert_eq!(app.name, "junit lib compliance checking");

        let app = App::try_parse_from(["junit-report-cli", "--name", "nightly", "-v"])
            .expect("arguments parse");
        assert_eq!(app.name, "nightly");
        assert!(app.output.verbose);
    }

    #[test]
    fn exec_writes_file() {
        let dir = Utf8TempDir::new().expect("created temp dir");
        let path = dir.path().join("report.xml");
        let app = App::try_parse_from(["junit-report-cli", "--file", path.as_str()])
            .expect("arguments parse");
        app.exec();

        let xml = std::fs::read_to_string(&path).expect("report was written");
        let report = Report::deserialize_from_str(&xml).expect("report reads back");
        assert_eq!(report.name, "junit lib compliance checking");
        assert_eq!(report.test_suites.len(), 1);
    }

    #[test]
    fn exec_survives_unwritable_path() {
        let dir = Utf8TempDir::new().expect("created temp dir");
        let path = dir.path().join("missing").join("report.xml");
        let app = App::try_parse_from(["junit-report-cli", "--file", path.as_str()])
            .expect("arguments parse");

        // The failure is logged, not propagated.
        app.exec();
        assert!(!path.exists());
    }
}
