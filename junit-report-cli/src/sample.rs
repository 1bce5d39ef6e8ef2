// Copyright (c) The junit-report Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The sample report written by the command-line interface.

use chrono::{DateTime, Utc};
use junit_report::{status, Property, Report, TestCase, TestSuite};

/// Builds a report with one suite of two cases, one passing and one errored.
///
/// Cases are added to the suite before the suite is added to the report, so every total is
/// accumulated rather than set by hand.
pub(crate) fn sample_report(name: &str, timestamp: DateTime<Utc>) -> Report {
    let mut test_suite = TestSuite::new(1, "szlabs-suite-1");
    test_suite
        .set_hostname("szlabs-hostname")
        .set_package("szlabs-package")
        .set_system_err("szlabs system error")
        .set_system_out("szlabs system out")
        .set_timestamp(timestamp)
        .add_property(Property::new("engine", env!("CARGO_PKG_NAME")));

    let mut test_case = TestCase::new("case-1");
    test_case
        .set_time(500)
        .set_system_out("case1 system out")
        .set_system_err("case1 system err")
        .set_status(status::PASSED)
        .set_assertions(2)
        .set_classname("case-classname-1");
    test_suite.add_test_case(test_case);

    let mut test_case = TestCase::new("case-2");
    test_case
        .set_time(300)
        .set_system_out("case2 system out")
        .set_system_err("case2 system err")
        .set_status(status::ERROR)
        .set_assertions(2)
        .set_classname("case-classname-1")
        .set_error("my error", "error", "500 error");
    test_suite.add_test_case(test_case);

    let mut report = Report::new(name);
    report.add_test_suite(test_suite);
    report
}
