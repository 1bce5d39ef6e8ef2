// Copyright (c) The junit-report Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Build, write and read JUnit XML test reports.
//!
//! A report is a three-level tree: a [`Report`] (the `testsuites` element) owns
//! [`TestSuite`]s, which own [`TestCase`]s. Counters roll up as children are added:
//!
//! ```
//! use junit_report::{Report, TestCase, TestSuite};
//!
//! let mut c1 = TestCase::new("c1");
//! c1.set_time(500);
//! let mut c2 = TestCase::new("c2");
//! c2.set_time(300).set_error("E", "t", "d");
//!
//! let mut suite = TestSuite::new(1, "S");
//! suite.add_test_case(c1).add_test_case(c2);
//!
//! let mut report = Report::new("R");
//! report.add_test_suite(suite);
//!
//! assert_eq!(report.tests, 2);
//! assert_eq!(report.errors, 1);
//! assert_eq!(report.time, 800);
//!
//! let xml = report.to_string().unwrap();
//! assert!(xml.contains(r#"<error message="E" type="t">"#));
//! ```

mod deserialize;
mod errors;
mod report;
mod serialize;

pub use errors::*;
pub use report::*;
