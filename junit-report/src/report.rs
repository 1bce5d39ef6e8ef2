// Copyright (c) The junit-report Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{
    deserialize::deserialize_report,
    errors::{DeserializeError, SerializeError, WriteReportError},
    serialize::{serialize_report, write_report_to_path},
};
use camino::Utf8Path;
use chrono::{DateTime, Utc};
use std::{borrow::Borrow, fmt, io, ops::Deref};

/// Conventional values for [`TestCase::status`].
///
/// The status label is free text and is stored verbatim; these are the values most JUnit
/// consumers recognize.
pub mod status {
    /// The test case passed.
    pub const PASSED: &str = "passed";

    /// The test case hit an unexpected error.
    pub const ERROR: &str = "error";

    /// The test case failed an assertion.
    pub const FAILURE: &str = "failure";

    /// The test case was not run.
    pub const SKIPPED: &str = "skipped";
}

/// The root element of a JUnit report, serialized as `testsuites`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Report {
    /// The name of this report.
    pub name: XmlString,

    /// The total number of tests from all test suites.
    pub tests: i64,

    /// The total number of disabled tests from all test suites.
    pub disabled: i64,

    /// The total number of errors from all test suites.
    pub errors: i64,

    /// The total number of failures from all test suites.
    pub failures: i64,

    /// The overall time taken, in seconds.
    pub time: i64,

    /// The test suites contained in this report.
    pub test_suites: Vec<TestSuite>,
}

impl Report {
    /// Creates a new, empty `Report` with the given name.
    pub fn new(name: impl AsRef<str>) -> Self {
        Self {
            name: XmlString::new(name),
            ..Default::default()
        }
    }

    /// Sets the total number of tests.
    ///
    /// This overwrites any count accumulated through [`Self::add_test_suite`].
    pub fn set_tests(&mut self, tests: i64) -> &mut Self {
        self.tests = tests;
        self
    }

    /// Sets the total number of disabled tests.
    pub fn set_disabled(&mut self, disabled: i64) -> &mut Self {
        self.disabled = disabled;
        self
    }

    /// Sets the total number of errors.
    pub fn set_errors(&mut self, errors: i64) -> &mut Self {
        self.errors = errors;
        self
    }

    /// Sets the total number of failures.
    pub fn set_failures(&mut self, failures: i64) -> &mut Self {
        self.failures = failures;
        self
    }

    /// Sets the time taken for overall execution, in seconds.
    pub fn set_time(&mut self, time: i64) -> &mut Self {
        self.time = time;
        self
    }

    /// Adds a test suite and updates the `tests`, `disabled`, `errors`, `failures` and `time`
    /// totals with the suite's values as they are now. Totals wrap on overflow.
    ///
    /// Passing `None` does nothing.
    pub fn add_test_suite(&mut self, test_suite: impl Into<Option<TestSuite>>) -> &mut Self {
        if let Some(test_suite) = test_suite.into() {
            self.tests = self.tests.wrapping_add(test_suite.tests);
            self.disabled = self.disabled.wrapping_add(test_suite.disabled);
            self.errors = self.errors.wrapping_add(test_suite.errors);
            self.failures = self.failures.wrapping_add(test_suite.failures);
            self.time = self.time.wrapping_add(test_suite.time);
            self.test_suites.push(test_suite);
        }
        self
    }

    /// Adds several test suites, updating totals as [`Self::add_test_suite`] does.
    pub fn add_test_suites(
        &mut self,
        test_suites: impl IntoIterator<Item = TestSuite>,
    ) -> &mut Self {
        for test_suite in test_suites {
            self.add_test_suite(test_suite);
        }
        self
    }

    /// Serializes this report to the given writer.
    pub fn serialize(&self, writer: impl io::Write) -> Result<(), SerializeError> {
        serialize_report(self, writer).map_err(SerializeError::from)
    }

    /// Serializes this report to a byte vector.
    pub fn to_bytes(&self) -> Result<Vec<u8>, SerializeError> {
        let mut buf: Vec<u8> = vec![];
        self.serialize(&mut buf)?;
        Ok(buf)
    }

    /// Serializes this report to a string.
    pub fn to_string(&self) -> Result<String, SerializeError> {
        let buf = self.to_bytes()?;
        String::from_utf8(buf).map_err(|utf8_err| {
            let encoding_err = quick_xml::encoding::EncodingError::from(utf8_err.utf8_error());
            SerializeError::from(quick_xml::Error::from(encoding_err))
        })
    }

    /// Writes this report to `path`, replacing any existing file.
    ///
    /// The report is written to a temporary file in the same directory and then renamed into
    /// place, so a failed write never leaves partial content at `path`.
    pub fn write_to_path(&self, path: impl AsRef<Utf8Path>) -> Result<(), WriteReportError> {
        write_report_to_path(self, path.as_ref())
    }

    /// Reads a report from the given reader.
    ///
    /// Counts and times are taken from the document as written, without re-aggregation.
    pub fn deserialize(mut reader: impl io::Read) -> Result<Self, DeserializeError> {
        let mut xml = String::new();
        reader
            .read_to_string(&mut xml)
            .map_err(DeserializeError::Io)?;
        Self::deserialize_from_str(&xml)
    }

    /// Reads a report from a string.
    pub fn deserialize_from_str(xml: &str) -> Result<Self, DeserializeError> {
        deserialize_report(xml)
    }
}

/// Represents a single test suite, serialized as `testsuite`.
///
/// A `TestSuite` groups together several [`TestCase`] instances.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[non_exhaustive]
pub struct TestSuite {
    /// The numeric id of this test suite.
    pub id: i64,

    /// The name of this test suite.
    pub name: XmlString,

    /// The total number of tests in this test suite.
    pub tests: i64,

    /// The total number of disabled tests in this test suite.
    pub disabled: i64,

    /// The total number of tests in this suite that errored.
    ///
    /// An "error" is usually some sort of *unexpected* issue in a test.
    pub errors: i64,

    /// The total number of tests in this suite that failed.
    ///
    /// A "failure" is usually some sort of *expected* issue in a test.
    pub failures: i64,

    /// The total number of tests in this suite that were skipped.
    pub skipped: i64,

    /// The host the test suite ran on.
    pub hostname: XmlString,

    /// The package label of this test suite.
    pub package: XmlString,

    /// The overall time taken by the test suite, in seconds.
    pub time: i64,

    /// The time at which the test suite began execution.
    pub timestamp: Option<DateTime<Utc>>,

    /// Custom properties, e.g. environment variables.
    pub properties: Vec<Property>,

    /// The test cases that form this test suite.
    pub test_cases: Vec<TestCase>,

    /// Data written to standard output while the test suite was executed.
    pub system_out: Option<XmlString>,

    /// Data written to standard error while the test suite was executed.
    pub system_err: Option<XmlString>,
}

impl TestSuite {
    /// Creates a new `TestSuite`.
    pub fn new(id: i64, name: impl AsRef<str>) -> Self {
        Self {
            id,
            name: XmlString::new(name),
            ..Default::default()
        }
    }

    /// Sets the number of tests.
    ///
    /// This overwrites any count accumulated through [`Self::add_test_case`].
    pub fn set_tests(&mut self, tests: i64) -> &mut Self {
        self.tests = tests;
        self
    }

    /// Sets the number of disabled tests.
    pub fn set_disabled(&mut self, disabled: i64) -> &mut Self {
        self.disabled = disabled;
        self
    }

    /// Sets the number of errored tests.
    pub fn set_errors(&mut self, errors: i64) -> &mut Self {
        self.errors = errors;
        self
    }

    /// Sets the number of failed tests.
    pub fn set_failures(&mut self, failures: i64) -> &mut Self {
        self.failures = failures;
        self
    }

    /// Sets the number of skipped tests.
    pub fn set_skipped(&mut self, skipped: i64) -> &mut Self {
        self.skipped = skipped;
        self
    }

    /// Sets the hostname.
    pub fn set_hostname(&mut self, hostname: impl AsRef<str>) -> &mut Self {
        self.hostname = XmlString::new(hostname);
        self
    }

    /// Sets the package label.
    pub fn set_package(&mut self, package: impl AsRef<str>) -> &mut Self {
        self.package = XmlString::new(package);
        self
    }

    /// Sets the start timestamp, converting it to UTC.
    pub fn set_timestamp(&mut self, timestamp: impl Into<DateTime<Utc>>) -> &mut Self {
        self.timestamp = Some(timestamp.into());
        self
    }

    /// Sets the time taken, in seconds.
    pub fn set_time(&mut self, time: i64) -> &mut Self {
        self.time = time;
        self
    }

    /// Sets standard output.
    pub fn set_system_out(&mut self, system_out: impl AsRef<str>) -> &mut Self {
        self.system_out = Some(XmlString::new(system_out));
        self
    }

    /// Sets standard output from a `Vec<u8>`.
    ///
    /// The output is converted to a string, lossily.
    pub fn set_system_out_lossy(&mut self, system_out: impl AsRef<[u8]>) -> &mut Self {
        self.set_system_out(String::from_utf8_lossy(system_out.as_ref()))
    }

    /// Sets standard error.
    pub fn set_system_err(&mut self, system_err: impl AsRef<str>) -> &mut Self {
        self.system_err = Some(XmlString::new(system_err));
        self
    }

    /// Sets standard error from a `Vec<u8>`.
    ///
    /// The output is converted to a string, lossily.
    pub fn set_system_err_lossy(&mut self, system_err: impl AsRef<[u8]>) -> &mut Self {
        self.set_system_err(String::from_utf8_lossy(system_err.as_ref()))
    }

    /// Adds a property. Passing `None` does nothing.
    pub fn add_property(&mut self, property: impl Into<Option<Property>>) -> &mut Self {
        if let Some(property) = property.into() {
            self.properties.push(property);
        }
        self
    }

    /// Adds several properties, e.g. `(name, value)` pairs.
    pub fn add_properties(
        &mut self,
        properties: impl IntoIterator<Item = impl Into<Property>>,
    ) -> &mut Self {
        for property in properties {
            let property: Property = property.into();
            self.add_property(property);
        }
        self
    }

    /// Adds a test case and updates the counts and time. Counts and time wrap on overflow.
    ///
    /// Passing `None` does nothing.
    pub fn add_test_case(&mut self, test_case: impl Into<Option<TestCase>>) -> &mut Self {
        let Some(test_case) = test_case.into() else {
            return self;
        };

        self.time = self.time.wrapping_add(test_case.time);
        self.tests = self.tests.wrapping_add(1);
        let counter = match &test_case.outcome {
            TestCaseOutcome::Success => None,
            TestCaseOutcome::Skipped { .. } => Some(&mut self.skipped),
            TestCaseOutcome::NonSuccess { kind, .. } => match kind {
                NonSuccessKind::Failure => Some(&mut self.failures),
                NonSuccessKind::Error => Some(&mut self.errors),
            },
        };
        if let Some(counter) = counter {
            *counter = counter.wrapping_add(1);
        }
        self.test_cases.push(test_case);
        self
    }

    /// Adds several test cases, updating counts as [`Self::add_test_case`] does.
    pub fn add_test_cases(&mut self, test_cases: impl IntoIterator<Item = TestCase>) -> &mut Self {
        for test_case in test_cases {
            self.add_test_case(test_case);
        }
        self
    }
}

/// Represents a single test case, serialized as `testcase`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[non_exhaustive]
pub struct TestCase {
    /// The name of the test case.
    pub name: XmlString,

    /// The number of assertions in the test case.
    pub assertions: i64,

    /// The "classname" of the test case.
    ///
    /// Typically, this represents the fully qualified path to the test. In other words,
    /// `classname` + `name` together should uniquely identify and locate a test.
    pub classname: XmlString,

    /// A free-text status label. See [`status`] for conventional values.
    pub status: XmlString,

    /// The time it took to execute this test case, in seconds.
    pub time: i64,

    /// The outcome of this test case.
    pub outcome: TestCaseOutcome,

    /// Data written to standard output while the test case was executed.
    pub system_out: Option<XmlString>,

    /// Data written to standard error while the test case was executed.
    pub system_err: Option<XmlString>,
}

impl TestCase {
    /// Creates a new test case with a successful outcome.
    pub fn new(name: impl AsRef<str>) -> Self {
        Self {
            name: XmlString::new(name),
            ..Default::default()
        }
    }

    /// Sets the number of assertions in the test case.
    pub fn set_assertions(&mut self, assertions: i64) -> &mut Self {
        self.assertions = assertions;
        self
    }

    /// Sets the classname of the test.
    pub fn set_classname(&mut self, classname: impl AsRef<str>) -> &mut Self {
        self.classname = XmlString::new(classname);
        self
    }

    /// Sets the status label, stored verbatim.
    pub fn set_status(&mut self, status: impl AsRef<str>) -> &mut Self {
        self.status = XmlString::new(status);
        self
    }

    /// Replaces the outcome of this test case.
    pub fn set_outcome(&mut self, outcome: TestCaseOutcome) -> &mut Self {
        self.outcome = outcome;
        self
    }

    /// Marks this test case as errored, replacing any previous outcome.
    pub fn set_error(
        &mut self,
        message: impl AsRef<str>,
        ty: impl AsRef<str>,
        description: impl AsRef<str>,
    ) -> &mut Self {
        self.set_outcome(TestCaseOutcome::non_success(
            NonSuccessKind::Error,
            message,
            ty,
            description,
        ))
    }

    /// Marks this test case as failed, replacing any previous outcome.
    pub fn set_failure(
        &mut self,
        message: impl AsRef<str>,
        ty: impl AsRef<str>,
        description: impl AsRef<str>,
    ) -> &mut Self {
        self.set_outcome(TestCaseOutcome::non_success(
            NonSuccessKind::Failure,
            message,
            ty,
            description,
        ))
    }

    /// Marks this test case as skipped, replacing any previous outcome.
    pub fn set_skipped(&mut self, message: impl AsRef<str>) -> &mut Self {
        self.set_outcome(TestCaseOutcome::skipped(message))
    }

    /// Sets the time taken, in seconds.
    pub fn set_time(&mut self, time: i64) -> &mut Self {
        self.time = time;
        self
    }

    /// Sets standard output.
    pub fn set_system_out(&mut self, system_out: impl AsRef<str>) -> &mut Self {
        self.system_out = Some(XmlString::new(system_out));
        self
    }

    /// Sets standard output from a `Vec<u8>`.
    ///
    /// The output is converted to a string, lossily.
    pub fn set_system_out_lossy(&mut self, system_out: impl AsRef<[u8]>) -> &mut Self {
        self.set_system_out(String::from_utf8_lossy(system_out.as_ref()))
    }

    /// Sets standard error.
    pub fn set_system_err(&mut self, system_err: impl AsRef<str>) -> &mut Self {
        self.system_err = Some(XmlString::new(system_err));
        self
    }

    /// Sets standard error from a `Vec<u8>`.
    ///
    /// The output is converted to a string, lossily.
    pub fn set_system_err_lossy(&mut self, system_err: impl AsRef<[u8]>) -> &mut Self {
        self.set_system_err(String::from_utf8_lossy(system_err.as_ref()))
    }
}

/// The outcome of a test case. A test case has exactly one outcome.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum TestCaseOutcome {
    /// This test case passed. No outcome element is serialized.
    #[default]
    Success,

    /// This test case was not run. Serialized as `skipped`.
    Skipped {
        /// The skip message.
        message: XmlString,
    },

    /// This test case did not pass. Serialized as `failure` or `error`.
    NonSuccess {
        /// Whether this test case failed in an expected way (failure) or an unexpected way
        /// (error).
        kind: NonSuccessKind,

        /// The failure message.
        message: XmlString,

        /// The "type" of failure that occurred.
        ty: XmlString,

        /// The description of the failure.
        ///
        /// This is serialized and deserialized from the character data of the element.
        description: XmlString,
    },
}

impl TestCaseOutcome {
    /// Creates a new outcome representing a skipped test.
    pub fn skipped(message: impl AsRef<str>) -> Self {
        TestCaseOutcome::Skipped {
            message: XmlString::new(message),
        }
    }

    /// Creates a new outcome representing an unsuccessful test.
    pub fn non_success(
        kind: NonSuccessKind,
        message: impl AsRef<str>,
        ty: impl AsRef<str>,
        description: impl AsRef<str>,
    ) -> Self {
        TestCaseOutcome::NonSuccess {
            kind,
            message: XmlString::new(message),
            ty: XmlString::new(ty),
            description: XmlString::new(description),
        }
    }

    /// Returns true if this is a successful outcome.
    pub fn is_success(&self) -> bool {
        matches!(self, TestCaseOutcome::Success)
    }
}

/// The kind of a non-successful test case outcome.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum NonSuccessKind {
    /// This is an expected failure. Serialized as `failure`.
    Failure,

    /// This is an unexpected error. Serialized as `error`.
    Error,
}

/// Custom properties set during test execution, e.g. environment variables.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Property {
    /// The name of the property.
    pub name: XmlString,

    /// The value of the property.
    pub value: XmlString,
}

impl Property {
    /// Creates a new `Property` instance.
    pub fn new(name: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        Self {
            name: XmlString::new(name),
            value: XmlString::new(value),
        }
    }
}

impl<T> From<(T, T)> for Property
where
    T: AsRef<str>,
{
    fn from((k, v): (T, T)) -> Self {
        Property::new(k, v)
    }
}

/// A string that can be written into an XML document.
///
/// # Encoding
///
/// XML 1.0 forbids most C0 control characters, even as character references. `XmlString`
/// removes them (keeping tab, newline and carriage return) along with the noncharacters
/// U+FFFE and U+FFFF. Everything else is kept verbatim.
#[derive(Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct XmlString {
    data: Box<str>,
}

impl XmlString {
    /// Creates a new `XmlString`, removing any characters that XML cannot represent.
    pub fn new(data: impl AsRef<str>) -> Self {
        let data = data.as_ref();
        let data = if data.contains(is_invalid_xml_char) {
            data.replace(is_invalid_xml_char, "").into_boxed_str()
        } else {
            data.into()
        };
        Self { data }
    }

    /// Returns the string.
    pub fn as_str(&self) -> &str {
        &self.data
    }

    /// Converts this into a `String`.
    pub fn into_string(self) -> String {
        self.data.into_string()
    }
}

fn is_invalid_xml_char(c: char) -> bool {
    matches!(
        c,
        '\x00'..='\x08' | '\x0b' | '\x0c' | '\x0e'..='\x1f' | '\u{fffe}' | '\u{ffff}'
    )
}

impl fmt::Debug for XmlString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.data, f)
    }
}

impl fmt::Display for XmlString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.data, f)
    }
}

impl Deref for XmlString {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.data
    }
}

impl AsRef<str> for XmlString {
    fn as_ref(&self) -> &str {
        &self.data
    }
}

impl Borrow<str> for XmlString {
    fn borrow(&self) -> &str {
        &self.data
    }
}

impl From<&str> for XmlString {
    fn from(s: &str) -> Self {
        XmlString::new(s)
    }
}

impl From<String> for XmlString {
    fn from(s: String) -> Self {
        XmlString::new(s)
    }
}

impl From<XmlString> for String {
    fn from(s: XmlString) -> Self {
        s.into_string()
    }
}

impl PartialEq<str> for XmlString {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for XmlString {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::{collection::vec, prelude::any};
    use test_strategy::{proptest, Arbitrary};

    #[derive(Copy, Clone, Debug, Arbitrary)]
    enum OutcomeKind {
        Success,
        Skipped,
        Error,
        Failure,
    }

    fn make_test_case(index: usize, time: i64, kind: OutcomeKind) -> TestCase {
        let mut test_case = TestCase::new(format!("case-{index}"));
        test_case.set_time(time);
        match kind {
            OutcomeKind::Success => {}
            OutcomeKind::Skipped => {
                test_case.set_skipped("skipped");
            }
            OutcomeKind::Error => {
                test_case.set_error("message", "type", "description");
            }
            OutcomeKind::Failure => {
                test_case.set_failure("message", "type", "description");
            }
        }
        test_case
    }

    #[test]
    fn scenario_counts() {
        let mut c1 = TestCase::new("c1");
        c1.set_time(500);
        let mut c2 = TestCase::new("c2");
        c2.set_time(300).set_error("E", "t", "d");

        let mut suite = TestSuite::new(1, "S");
        suite.add_test_case(c1).add_test_case(c2);
        assert_eq!(suite.tests, 2);
        assert_eq!(suite.time, 800);
        assert_eq!(suite.errors, 1);
        assert_eq!(suite.failures, 0);
        assert_eq!(suite.skipped, 0);

        let mut report = Report::new("R");
        report.add_test_suite(suite);
        assert_eq!(report.tests, 2);
        assert_eq!(report.errors, 1);
        assert_eq!(report.failures, 0);
        assert_eq!(report.time, 800);
        assert_eq!(report.test_suites.len(), 1);
    }

    #[test]
    fn add_none_is_noop() {
        let mut suite = TestSuite::new(3, "suite");
        suite.add_test_case(TestCase::new("only"));
        let before = suite.clone();
        suite
            .add_test_case(None::<TestCase>)
            .add_property(None::<Property>);
        assert_eq!(suite, before);

        let mut report = Report::new("report");
        report.add_test_suite(suite);
        let before = report.clone();
        report.add_test_suite(None::<TestSuite>);
        assert_eq!(report, before);
    }

    #[test]
    fn last_outcome_wins() {
        let mut test_case = TestCase::new("case");
        test_case
            .set_error("my error", "error", "500 error")
            .set_failure("my failure", "not equal", "expected a larger value");
        assert_eq!(
            test_case.outcome,
            TestCaseOutcome::non_success(
                NonSuccessKind::Failure,
                "my failure",
                "not equal",
                "expected a larger value",
            )
        );

        test_case.set_skipped("not today");
        assert_eq!(test_case.outcome, TestCaseOutcome::skipped("not today"));

        let mut suite = TestSuite::new(1, "suite");
        suite.add_test_case(test_case);
        assert_eq!(suite.skipped, 1);
        assert_eq!(suite.errors, 0);
        assert_eq!(suite.failures, 0);
    }

    #[test]
    fn direct_setters_overwrite_accumulated_counts() {
        let mut suite = TestSuite::new(1, "suite");
        suite.add_test_cases([
            make_test_case(0, 10, OutcomeKind::Error),
            make_test_case(1, 20, OutcomeKind::Failure),
        ]);
        assert_eq!((suite.tests, suite.errors, suite.failures), (2, 1, 1));

        suite.set_tests(7).set_errors(0);
        assert_eq!((suite.tests, suite.errors, suite.failures), (7, 0, 1));

        // Appending after a direct set accumulates on top of the set value.
        suite.add_test_case(make_test_case(2, 5, OutcomeKind::Error));
        assert_eq!((suite.tests, suite.errors, suite.time), (8, 1, 35));
    }

    #[test]
    fn suite_counts_taken_at_append_time() {
        let mut report = Report::new("report");
        let mut suite = TestSuite::new(1, "suite");
        suite.set_disabled(2);
        report.add_test_suite(suite.clone());

        // Later changes to the original suite don't reach the report.
        suite.add_test_case(make_test_case(0, 10, OutcomeKind::Failure));
        assert_eq!(report.tests, 0);
        assert_eq!(report.disabled, 2);
        assert_eq!(report.failures, 0);
    }

    #[test]
    fn large_totals_wrap_instead_of_panicking() {
        let mut a = TestCase::new("a");
        a.set_time(i64::MAX);
        let mut b = TestCase::new("b");
        b.set_time(1);

        let mut suite = TestSuite::new(1, "suite");
        suite.add_test_case(a).add_test_case(b);
        assert_eq!(suite.time, i64::MIN);
        assert_eq!(suite.tests, 2);

        let mut big = TestSuite::new(2, "big");
        big.set_tests(i64::MAX).set_errors(i64::MAX);
        let mut report = Report::new("report");
        report.add_test_suite(big.clone()).add_test_suite(big);
        assert_eq!(report.tests, -2);
        assert_eq!(report.errors, -2);
    }

    #[test]
    fn xml_string_strips_invalid_chars() {
        let s = XmlString::new("a\x00b\x1b[31mc\td\ne\r\u{ffff}");
        assert_eq!(s, "ab[31mc\td\ne\r");

        let property = Property::from(("key\x07", "value"));
        assert_eq!(property.name, "key");
        assert_eq!(property.value, "value");
    }

    #[test]
    fn lossy_output() {
        let mut test_case = TestCase::new("case");
        test_case.set_system_out_lossy(b"ok \xff done");
        assert_eq!(
            test_case.system_out.as_deref(),
            Some("ok \u{fffd} done"),
        );
    }

    #[proptest]
    fn suite_counts_match_appended_cases(
        #[strategy(vec((-10_000i64..10_000, any::<OutcomeKind>()), 0..64))] cases: Vec<(
            i64,
            OutcomeKind,
        )>,
    ) {
        let mut suite = TestSuite::new(1, "suite");
        for (index, (time, kind)) in cases.iter().enumerate() {
            suite.add_test_case(make_test_case(index, *time, *kind));
        }

        let count = |want: fn(&OutcomeKind) -> bool| {
            cases.iter().filter(|(_, kind)| want(kind)).count() as i64
        };
        assert_eq!(suite.tests, cases.len() as i64);
        assert_eq!(suite.time, cases.iter().map(|(time, _)| time).sum::<i64>());
        assert_eq!(suite.skipped, count(|k| matches!(k, OutcomeKind::Skipped)));
        assert_eq!(suite.errors, count(|k| matches!(k, OutcomeKind::Error)));
        assert_eq!(suite.failures, count(|k| matches!(k, OutcomeKind::Failure)));
        assert_eq!(suite.disabled, 0);
        assert_eq!(suite.test_cases.len(), cases.len());
    }

    #[proptest]
    fn report_counts_are_sums_of_suites(
        #[strategy(vec(
            (0i64..1_000, 0i64..1_000, 0i64..1_000, 0i64..1_000, -1_000i64..1_000),
            0..32,
        ))]
        suites: Vec<(i64, i64, i64, i64, i64)>,
    ) {
        let mut report = Report::new("report");
        for (id, (tests, disabled, errors, failures, time)) in suites.iter().enumerate() {
            let mut suite = TestSuite::new(id as i64, "suite");
            suite
                .set_tests(*tests)
                .set_disabled(*disabled)
                .set_errors(*errors)
                .set_failures(*failures)
                .set_time(*time);
            report.add_test_suite(suite);
        }

        assert_eq!(report.tests, suites.iter().map(|s| s.0).sum::<i64>());
        assert_eq!(report.disabled, suites.iter().map(|s| s.1).sum::<i64>());
        assert_eq!(report.errors, suites.iter().map(|s| s.2).sum::<i64>());
        assert_eq!(report.failures, suites.iter().map(|s| s.3).sum::<i64>());
        assert_eq!(report.time, suites.iter().map(|s| s.4).sum::<i64>());
        assert_eq!(report.test_suites.len(), suites.len());
    }
}
