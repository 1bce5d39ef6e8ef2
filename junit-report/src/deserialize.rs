// Copyright (c) The junit-report Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Read a `Report` back from XML in the shape this crate writes.
//!
//! This is not a general JUnit reader: unknown elements are skipped, unknown attributes are
//! ignored and nothing is validated against a schema.

use crate::{
    serialize::{
        ERROR_TAG, FAILURE_TAG, PROPERTIES_TAG, PROPERTY_TAG, SKIPPED_TAG, SYSTEM_ERR_TAG,
        SYSTEM_OUT_TAG, TESTCASE_TAG, TESTSUITES_TAG, TESTSUITE_TAG,
    },
    DeserializeError, NonSuccessKind, Property, Report, TestCase, TestCaseOutcome, TestSuite,
    XmlString,
};
use chrono::{DateTime, Utc};
use quick_xml::{
    events::{BytesStart, Event},
    Reader,
};

type XmlReader<'a> = Reader<&'a [u8]>;

pub(crate) fn deserialize_report(xml: &str) -> Result<Report, DeserializeError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    loop {
        match reader.read_event()? {
            Event::Start(start) => return read_report(&mut reader, &start, false),
            Event::Empty(start) => return read_report(&mut reader, &start, true),
            Event::Eof => return Err(DeserializeError::MissingRoot),
            // The declaration, comments, doctypes and processing instructions carry no data.
            _ => {}
        }
    }
}

fn read_report(
    reader: &mut XmlReader<'_>,
    start: &BytesStart<'_>,
    empty: bool,
) -> Result<Report, DeserializeError> {
    if !is_tag(start, TESTSUITES_TAG) {
        return Err(DeserializeError::UnexpectedElement {
            parent: "document".to_owned(),
            found: tag_name(start),
        });
    }

    let mut report = Report::default();
    for attribute in start.attributes() {
        let attribute = attribute?;
        let value = attribute.unescape_value()?;
        match attribute.key.as_ref() {
            b"name" => report.name = XmlString::new(value),
            b"tests" => report.tests = parse_int(TESTSUITES_TAG, "tests", &value)?,
            b"disabled" => report.disabled = parse_int(TESTSUITES_TAG, "disabled", &value)?,
            b"errors" => report.errors = parse_int(TESTSUITES_TAG, "errors", &value)?,
            b"failures" => report.failures = parse_int(TESTSUITES_TAG, "failures", &value)?,
            b"time" => report.time = parse_int(TESTSUITES_TAG, "time", &value)?,
            _ => {}
        }
    }
    if empty {
        return Ok(report);
    }

    loop {
        match reader.read_event()? {
            Event::Start(start) if is_tag(&start, TESTSUITE_TAG) => {
                let test_suite = read_test_suite(reader, &start, false)?;
                report.test_suites.push(test_suite);
            }
            Event::Empty(start) if is_tag(&start, TESTSUITE_TAG) => {
                let test_suite = read_test_suite(reader, &start, true)?;
                report.test_suites.push(test_suite);
            }
            Event::Start(start) => skip_element(reader, &start)?,
            Event::End(_) => return Ok(report),
            Event::Eof => return Err(unexpected_eof(TESTSUITES_TAG)),
            _ => {}
        }
    }
}

fn read_test_suite(
    reader: &mut XmlReader<'_>,
    start: &BytesStart<'_>,
    empty: bool,
) -> Result<TestSuite, DeserializeError> {
    let mut test_suite = TestSuite::default();
    for attribute in start.attributes() {
        let attribute = attribute?;
        let value = attribute.unescape_value()?;
        match attribute.key.as_ref() {
            b"name" => test_suite.name = XmlString::new(value),
            b"tests" => test_suite.tests = parse_int(TESTSUITE_TAG, "tests", &value)?,
            b"disabled" => test_suite.disabled = parse_int(TESTSUITE_TAG, "disabled", &value)?,
            b"errors" => test_suite.errors = parse_int(TESTSUITE_TAG, "errors", &value)?,
            b"failures" => test_suite.failures = parse_int(TESTSUITE_TAG, "failures", &value)?,
            b"skipped" => test_suite.skipped = parse_int(TESTSUITE_TAG, "skipped", &value)?,
            b"hostname" => test_suite.hostname = XmlString::new(value),
            b"id" => test_suite.id = parse_int(TESTSUITE_TAG, "id", &value)?,
            b"package" => test_suite.package = XmlString::new(value),
            b"time" => test_suite.time = parse_int(TESTSUITE_TAG, "time", &value)?,
            b"timestamp" => test_suite.timestamp = Some(parse_timestamp(TESTSUITE_TAG, &value)?),
            _ => {}
        }
    }
    if empty {
        return Ok(test_suite);
    }

    loop {
        let (start, empty) = match reader.read_event()? {
            Event::Start(start) => (start, false),
            Event::Empty(start) => (start, true),
            Event::End(_) => return Ok(test_suite),
            Event::Eof => return Err(unexpected_eof(TESTSUITE_TAG)),
            _ => continue,
        };

        if is_tag(&start, PROPERTIES_TAG) {
            if !empty {
                read_properties(reader, &mut test_suite.properties)?;
            }
        } else if is_tag(&start, TESTCASE_TAG) {
            let test_case = read_test_case(reader, &start, empty)?;
            test_suite.test_cases.push(test_case);
        } else if is_tag(&start, SYSTEM_OUT_TAG) {
            test_suite.system_out = Some(read_output(reader, SYSTEM_OUT_TAG, empty)?);
        } else if is_tag(&start, SYSTEM_ERR_TAG) {
            test_suite.system_err = Some(read_output(reader, SYSTEM_ERR_TAG, empty)?);
        } else if !empty {
            skip_element(reader, &start)?;
        }
    }
}

fn read_properties(
    reader: &mut XmlReader<'_>,
    properties: &mut Vec<Property>,
) -> Result<(), DeserializeError> {
    loop {
        let (start, empty) = match reader.read_event()? {
            Event::Start(start) => (start, false),
            Event::Empty(start) => (start, true),
            Event::End(_) => return Ok(()),
            Event::Eof => return Err(unexpected_eof(PROPERTIES_TAG)),
            _ => continue,
        };

        if is_tag(&start, PROPERTY_TAG) {
            let mut property = Property::default();
            for attribute in start.attributes() {
                let attribute = attribute?;
                match attribute.key.as_ref() {
                    b"name" => property.name = XmlString::new(attribute.unescape_value()?),
                    b"value" => property.value = XmlString::new(attribute.unescape_value()?),
                    _ => {}
                }
            }
            properties.push(property);
        }
        if !empty {
            skip_element(reader, &start)?;
        }
    }
}

fn read_test_case(
    reader: &mut XmlReader<'_>,
    start: &BytesStart<'_>,
    empty: bool,
) -> Result<TestCase, DeserializeError> {
    let mut test_case = TestCase::default();
    for attribute in start.attributes() {
        let attribute = attribute?;
        let value = attribute.unescape_value()?;
        match attribute.key.as_ref() {
            b"name" => test_case.name = XmlString::new(value),
            b"assertions" => {
                test_case.assertions = parse_int(TESTCASE_TAG, "assertions", &value)?;
            }
            b"classname" => test_case.classname = XmlString::new(value),
            b"status" => test_case.status = XmlString::new(value),
            b"time" => test_case.time = parse_int(TESTCASE_TAG, "time", &value)?,
            _ => {}
        }
    }
    if empty {
        return Ok(test_case);
    }

    loop {
        let (start, empty) = match reader.read_event()? {
            Event::Start(start) => (start, false),
            Event::Empty(start) => (start, true),
            Event::End(_) => return Ok(test_case),
            Event::Eof => return Err(unexpected_eof(TESTCASE_TAG)),
            _ => continue,
        };

        // If more than one outcome element is present, the last one wins.
        if is_tag(&start, SKIPPED_TAG) {
            let mut message = XmlString::default();
            for attribute in start.attributes() {
                let attribute = attribute?;
                if attribute.key.as_ref() == b"message" {
                    message = XmlString::new(attribute.unescape_value()?);
                }
            }
            if !empty {
                skip_element(reader, &start)?;
            }
            test_case.outcome = TestCaseOutcome::Skipped { message };
        } else if is_tag(&start, FAILURE_TAG) {
            test_case.outcome =
                read_non_success(reader, &start, NonSuccessKind::Failure, FAILURE_TAG, empty)?;
        } else if is_tag(&start, ERROR_TAG) {
            test_case.outcome =
                read_non_success(reader, &start, NonSuccessKind::Error, ERROR_TAG, empty)?;
        } else if is_tag(&start, SYSTEM_OUT_TAG) {
            test_case.system_out = Some(read_output(reader, SYSTEM_OUT_TAG, empty)?);
        } else if is_tag(&start, SYSTEM_ERR_TAG) {
            test_case.system_err = Some(read_output(reader, SYSTEM_ERR_TAG, empty)?);
        } else if !empty {
            skip_element(reader, &start)?;
        }
    }
}

fn read_non_success(
    reader: &mut XmlReader<'_>,
    start: &BytesStart<'_>,
    kind: NonSuccessKind,
    tag: &'static str,
    empty: bool,
) -> Result<TestCaseOutcome, DeserializeError> {
    let mut message = XmlString::default();
    let mut ty = XmlString::default();
    for attribute in start.attributes() {
        let attribute = attribute?;
        match attribute.key.as_ref() {
            b"message" => message = XmlString::new(attribute.unescape_value()?),
            b"type" => ty = XmlString::new(attribute.unescape_value()?),
            _ => {}
        }
    }

    let description = if empty {
        XmlString::default()
    } else {
        XmlString::new(read_text(reader, tag)?)
    };

    Ok(TestCaseOutcome::NonSuccess {
        kind,
        message,
        ty,
        description,
    })
}

fn read_output(
    reader: &mut XmlReader<'_>,
    tag: &'static str,
    empty: bool,
) -> Result<XmlString, DeserializeError> {
    if empty {
        Ok(XmlString::default())
    } else {
        Ok(XmlString::new(read_text(reader, tag)?))
    }
}

/// Reads character data up to the end of the current element, joining text and CDATA sections.
fn read_text(reader: &mut XmlReader<'_>, tag: &'static str) -> Result<String, DeserializeError> {
    let mut text = String::new();
    loop {
        match reader.read_event()? {
            Event::Text(t) => text.push_str(&t.unescape()?),
            Event::CData(cdata) => {
                let cdata = std::str::from_utf8(&cdata).map_err(|error| DeserializeError::Utf8 {
                    element: tag.to_owned(),
                    error,
                })?;
                text.push_str(cdata);
            }
            Event::End(_) => return Ok(text),
            Event::Start(start) | Event::Empty(start) => {
                return Err(DeserializeError::UnexpectedElement {
                    parent: tag.to_owned(),
                    found: tag_name(&start),
                });
            }
            Event::Eof => return Err(unexpected_eof(tag)),
            _ => {}
        }
    }
}

fn skip_element(reader: &mut XmlReader<'_>, start: &BytesStart<'_>) -> Result<(), DeserializeError> {
    reader.read_to_end(start.name())?;
    Ok(())
}

fn is_tag(start: &BytesStart<'_>, tag: &str) -> bool {
    start.name().as_ref() == tag.as_bytes()
}

fn tag_name(start: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(start.name().as_ref()).into_owned()
}

fn unexpected_eof(tag: &str) -> DeserializeError {
    DeserializeError::UnexpectedEof {
        element: tag.to_owned(),
    }
}

fn parse_int(
    element: &'static str,
    attribute: &'static str,
    value: &str,
) -> Result<i64, DeserializeError> {
    value
        .trim()
        .parse()
        .map_err(|error| DeserializeError::InvalidInteger {
            element: element.to_owned(),
            attribute,
            value: value.to_owned(),
            error,
        })
}

fn parse_timestamp(element: &'static str, value: &str) -> Result<DateTime<Utc>, DeserializeError> {
    DateTime::parse_from_rfc3339(value.trim())
        .map(|timestamp| timestamp.with_timezone(&Utc))
        .map_err(|error| DeserializeError::InvalidTimestamp {
            element: element.to_owned(),
            value: value.to_owned(),
            error,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status;
    use chrono::{FixedOffset, TimeZone};
    use pretty_assertions::assert_eq;

    fn rich_report() -> Report {
        let mut passed = TestCase::new("passed <case>");
        passed
            .set_time(5)
            .set_assertions(2)
            .set_classname("pkg::\"quoted\" & 'single'")
            .set_status(status::PASSED)
            .set_system_out("line 1\nline 2 <b>bold</b> &amp;\n")
            .set_system_err("");

        let mut errored = TestCase::new("errored");
        errored
            .set_time(-3)
            .set_status(status::ERROR)
            .set_error("boom", "panic", "stack:\n  at <main>\n  ]]> marker ]]>");

        let mut failed = TestCase::new("failed");
        failed.set_failure("", "assert_eq", "");

        let mut skipped = TestCase::new("skipped");
        skipped.set_skipped("not on this platform");

        let mut suite = TestSuite::new(7, "suite one");
        let timestamp = FixedOffset::east_opt(2 * 3600)
            .unwrap()
            .with_ymd_and_hms(2023, 11, 5, 8, 15, 42)
            .unwrap();
        suite
            .set_hostname("build-host")
            .set_package("org.example")
            .set_timestamp(timestamp)
            .set_system_out("suite out")
            .set_system_err("suite err")
            .add_property(Property::new("engine", "junit-report"))
            .add_property(Property::new("engine", "duplicate"))
            .add_test_cases([passed, errored, failed, skipped])
            .set_disabled(1);

        let empty_suite = TestSuite::new(0, "");

        let mut report = Report::new("round trip");
        report.add_test_suites([suite, empty_suite]);
        report
    }

    #[test]
    fn round_trip() {
        let report = rich_report();
        let xml = report.to_string().expect("serializing succeeds");
        let read_back = Report::deserialize_from_str(&xml).expect("deserializing succeeds");
        assert_eq!(read_back, report);

        let read_back = Report::deserialize(xml.as_bytes()).expect("deserializing succeeds");
        assert_eq!(read_back, report);
    }

    #[test]
    fn round_trip_empty_report() {
        let report = Report::new("");
        let xml = report.to_string().expect("serializing succeeds");
        assert_eq!(
            Report::deserialize_from_str(&xml).expect("deserializing succeeds"),
            report
        );
    }

    #[test]
    fn counts_are_read_verbatim() {
        // The counts don't match the cases, and are kept as written.
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<testsuites tests="10" failures="4">
  <testsuite name="s" tests="3" errors="9">
    <testcase name="c"/>
  </testsuite>
</testsuites>"#;
        let report = Report::deserialize_from_str(xml).expect("deserializing succeeds");
        assert_eq!(report.tests, 10);
        assert_eq!(report.failures, 4);
        assert_eq!(report.test_suites[0].tests, 3);
        assert_eq!(report.test_suites[0].errors, 9);
        assert_eq!(report.test_suites[0].test_cases.len(), 1);
    }

    #[test]
    fn plain_text_and_unknown_elements() {
        let xml = r#"<testsuites>
  <!-- produced elsewhere -->
  <testsuite name="s" tests="1" flavor="ignored">
    <testcase name="c" time="2">
      <failure message="m">text &lt;escaped&gt;<![CDATA[ and <cdata>]]></failure>
      <rerunFailure message="ignored"><stackTrace>trace</stackTrace></rerunFailure>
    </testcase>
    <unknown><nested/></unknown>
  </testsuite>
</testsuites>"#;
        let report = Report::deserialize_from_str(xml).expect("deserializing succeeds");
        let test_case = &report.test_suites[0].test_cases[0];
        assert_eq!(test_case.time, 2);
        assert_eq!(
            test_case.outcome,
            TestCaseOutcome::non_success(
                NonSuccessKind::Failure,
                "m",
                "",
                "text <escaped> and <cdata>"
            )
        );
    }

    #[test]
    fn last_outcome_element_wins() {
        let xml = r#"<testsuites><testsuite name="s" tests="1"><testcase name="c">
            <error message="e"/><skipped message="s"/>
        </testcase></testsuite></testsuites>"#;
        let report = Report::deserialize_from_str(xml).expect("deserializing succeeds");
        assert_eq!(
            report.test_suites[0].test_cases[0].outcome,
            TestCaseOutcome::skipped("s")
        );
    }

    #[test]
    fn errors() {
        let error = Report::deserialize_from_str("").expect_err("no root");
        assert!(matches!(error, DeserializeError::MissingRoot), "{error:?}");

        let error = Report::deserialize_from_str("<testsuite name=\"s\"/>").expect_err("wrong root");
        assert!(
            matches!(
                &error,
                DeserializeError::UnexpectedElement { found, .. } if found == "testsuite"
            ),
            "{error:?}"
        );

        let error =
            Report::deserialize_from_str("<testsuites tests=\"many\"/>").expect_err("bad integer");
        assert!(
            matches!(
                &error,
                DeserializeError::InvalidInteger { attribute: "tests", value, .. } if value == "many"
            ),
            "{error:?}"
        );

        let error = Report::deserialize_from_str(
            "<testsuites><testsuite name=\"s\" timestamp=\"yesterday\"/></testsuites>",
        )
        .expect_err("bad timestamp");
        assert!(
            matches!(error, DeserializeError::InvalidTimestamp { .. }),
            "{error:?}"
        );

        let error = Report::deserialize_from_str("<testsuites><testsuite name=\"s\">")
            .expect_err("truncated");
        assert!(
            matches!(
                error,
                DeserializeError::UnexpectedEof { .. } | DeserializeError::Xml(_)
            ),
            "{error:?}"
        );

        let error = Report::deserialize_from_str(
            "<testsuites><testsuite name=\"s\"><system-out>a<b/></system-out></testsuite></testsuites>",
        )
        .expect_err("markup inside output");
        assert!(
            matches!(error, DeserializeError::UnexpectedElement { .. }),
            "{error:?}"
        );
    }
}
