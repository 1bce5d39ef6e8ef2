// Copyright (c) The junit-report Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Serialize a `Report`.

use crate::{
    NonSuccessKind, Property, Report, TestCase, TestCaseOutcome, TestSuite, WriteReportError,
    XmlString,
};
use atomicwrites::{AtomicFile, OverwriteBehavior};
use camino::Utf8Path;
use chrono::{DateTime, SecondsFormat, Utc};
use quick_xml::{
    escape::escape,
    events::{BytesCData, BytesDecl, BytesEnd, BytesStart, Event},
    Writer,
};
use std::io::{self, Write};

pub(crate) static TESTSUITES_TAG: &str = "testsuites";
pub(crate) static TESTSUITE_TAG: &str = "testsuite";
pub(crate) static TESTCASE_TAG: &str = "testcase";
pub(crate) static PROPERTIES_TAG: &str = "properties";
pub(crate) static PROPERTY_TAG: &str = "property";
pub(crate) static FAILURE_TAG: &str = "failure";
pub(crate) static ERROR_TAG: &str = "error";
pub(crate) static SKIPPED_TAG: &str = "skipped";
pub(crate) static SYSTEM_OUT_TAG: &str = "system-out";
pub(crate) static SYSTEM_ERR_TAG: &str = "system-err";

pub(crate) fn serialize_report(report: &Report, writer: impl io::Write) -> quick_xml::Result<()> {
    // Indentation only; no line prefix is written before elements.
    let mut writer = Writer::new_with_indent(writer, b' ', 4);

    let decl = BytesDecl::new("1.0", Some("UTF-8"), None);
    writer.write_event(Event::Decl(decl))?;

    serialize_report_impl(report, &mut writer)?;

    // Add a trailing newline.
    writer.write_indent()?;
    Ok(())
}

pub(crate) fn write_report_to_path(
    report: &Report,
    path: &Utf8Path,
) -> Result<(), WriteReportError> {
    // Render fully before touching the filesystem, so that encoding and I/O failures stay
    // distinguishable.
    let bytes = report.to_bytes()?;

    let file = AtomicFile::new(path, OverwriteBehavior::AllowOverwrite);
    file.write(|f| f.write_all(&bytes))
        .map_err(|err| match err {
            atomicwrites::Error::Internal(error) | atomicwrites::Error::User(error) => {
                WriteReportError::Io {
                    path: path.to_owned(),
                    error,
                }
            }
        })
}

fn serialize_report_impl(
    report: &Report,
    writer: &mut Writer<impl io::Write>,
) -> quick_xml::Result<()> {
    // Use the destructuring syntax to ensure that all fields are handled.
    let Report {
        name,
        tests,
        disabled,
        errors,
        failures,
        time,
        test_suites,
    } = report;

    let mut testsuites_tag = BytesStart::new(TESTSUITES_TAG);
    push_str_attribute(&mut testsuites_tag, "name", name);
    push_int_attribute(&mut testsuites_tag, "tests", *tests);
    push_int_attribute(&mut testsuites_tag, "disabled", *disabled);
    push_int_attribute(&mut testsuites_tag, "errors", *errors);
    push_int_attribute(&mut testsuites_tag, "failures", *failures);
    push_int_attribute(&mut testsuites_tag, "time", *time);

    if test_suites.is_empty() {
        writer.write_event(Event::Empty(testsuites_tag))?;
        return Ok(());
    }

    writer.write_event(Event::Start(testsuites_tag))?;
    for test_suite in test_suites {
        serialize_test_suite(test_suite, writer)?;
    }
    serialize_end_tag(TESTSUITES_TAG, writer)
}

fn serialize_test_suite(
    test_suite: &TestSuite,
    writer: &mut Writer<impl io::Write>,
) -> quick_xml::Result<()> {
    // Use the destructuring syntax to ensure that all fields are handled.
    let TestSuite {
        id,
        name,
        tests,
        disabled,
        errors,
        failures,
        skipped,
        hostname,
        package,
        time,
        timestamp,
        properties,
        test_cases,
        system_out,
        system_err,
    } = test_suite;

    let mut testsuite_tag = BytesStart::new(TESTSUITE_TAG);
    // name and tests are required by the JUnit format, so they're always written.
    push_escaped_attribute(&mut testsuite_tag, "name", name);
    testsuite_tag.push_attribute(("tests", tests.to_string().as_str()));
    push_int_attribute(&mut testsuite_tag, "disabled", *disabled);
    push_int_attribute(&mut testsuite_tag, "errors", *errors);
    push_int_attribute(&mut testsuite_tag, "failures", *failures);
    push_int_attribute(&mut testsuite_tag, "skipped", *skipped);
    push_str_attribute(&mut testsuite_tag, "hostname", hostname);
    push_int_attribute(&mut testsuite_tag, "id", *id);
    push_str_attribute(&mut testsuite_tag, "package", package);
    push_int_attribute(&mut testsuite_tag, "time", *time);
    if let Some(timestamp) = timestamp {
        testsuite_tag.push_attribute(("timestamp", serialize_timestamp(timestamp).as_str()));
    }

    if properties.is_empty()
        && test_cases.is_empty()
        && system_out.is_none()
        && system_err.is_none()
    {
        writer.write_event(Event::Empty(testsuite_tag))?;
        return Ok(());
    }

    writer.write_event(Event::Start(testsuite_tag))?;

    if !properties.is_empty() {
        serialize_empty_start_tag(PROPERTIES_TAG, writer)?;
        for property in properties {
            serialize_property(property, writer)?;
        }
        serialize_end_tag(PROPERTIES_TAG, writer)?;
    }

    for test_case in test_cases {
        serialize_test_case(test_case, writer)?;
    }

    if let Some(system_out) = system_out {
        serialize_output(system_out, SYSTEM_OUT_TAG, writer)?;
    }
    if let Some(system_err) = system_err {
        serialize_output(system_err, SYSTEM_ERR_TAG, writer)?;
    }

    serialize_end_tag(TESTSUITE_TAG, writer)
}

fn serialize_property(
    property: &Property,
    writer: &mut Writer<impl io::Write>,
) -> quick_xml::Result<()> {
    let mut property_tag = BytesStart::new(PROPERTY_TAG);
    push_escaped_attribute(&mut property_tag, "name", &property.name);
    push_escaped_attribute(&mut property_tag, "value", &property.value);

    writer.write_event(Event::Empty(property_tag))?;
    Ok(())
}

fn serialize_test_case(
    test_case: &TestCase,
    writer: &mut Writer<impl io::Write>,
) -> quick_xml::Result<()> {
    let TestCase {
        name,
        assertions,
        classname,
        status,
        time,
        outcome,
        system_out,
        system_err,
    } = test_case;

    let mut testcase_tag = BytesStart::new(TESTCASE_TAG);
    push_escaped_attribute(&mut testcase_tag, "name", name);
    push_int_attribute(&mut testcase_tag, "assertions", *assertions);
    push_str_attribute(&mut testcase_tag, "classname", classname);
    push_str_attribute(&mut testcase_tag, "status", status);
    push_int_attribute(&mut testcase_tag, "time", *time);

    if outcome.is_success() && system_out.is_none() && system_err.is_none() {
        writer.write_event(Event::Empty(testcase_tag))?;
        return Ok(());
    }

    writer.write_event(Event::Start(testcase_tag))?;

    match outcome {
        TestCaseOutcome::Success => {}
        TestCaseOutcome::Skipped { message } => {
            let mut tag = BytesStart::new(SKIPPED_TAG);
            push_str_attribute(&mut tag, "message", message);
            writer.write_event(Event::Empty(tag))?;
        }
        TestCaseOutcome::NonSuccess {
            kind,
            message,
            ty,
            description,
        } => {
            let tag_name = match kind {
                NonSuccessKind::Failure => FAILURE_TAG,
                NonSuccessKind::Error => ERROR_TAG,
            };
            serialize_non_success(message, ty, description, tag_name, writer)?;
        }
    }

    if let Some(system_out) = system_out {
        serialize_output(system_out, SYSTEM_OUT_TAG, writer)?;
    }
    if let Some(system_err) = system_err {
        serialize_output(system_err, SYSTEM_ERR_TAG, writer)?;
    }

    serialize_end_tag(TESTCASE_TAG, writer)
}

fn serialize_non_success(
    message: &XmlString,
    ty: &XmlString,
    description: &XmlString,
    tag_name: &'static str,
    writer: &mut Writer<impl io::Write>,
) -> quick_xml::Result<()> {
    let mut tag = BytesStart::new(tag_name);
    push_str_attribute(&mut tag, "message", message);
    push_str_attribute(&mut tag, "type", ty);

    if description.is_empty() {
        writer.write_event(Event::Empty(tag))?;
        return Ok(());
    }

    writer.write_event(Event::Start(tag))?;
    serialize_cdata(description, writer)?;
    serialize_end_tag(tag_name, writer)
}

fn serialize_output(
    output: &XmlString,
    tag_name: &'static str,
    writer: &mut Writer<impl io::Write>,
) -> quick_xml::Result<()> {
    if output.is_empty() {
        writer.write_event(Event::Empty(BytesStart::new(tag_name)))?;
        return Ok(());
    }

    serialize_empty_start_tag(tag_name, writer)?;
    serialize_cdata(output, writer)?;
    serialize_end_tag(tag_name, writer)
}

// Free-form text is written as CDATA so that markup and newlines in it are kept literally.
fn serialize_cdata(text: &str, writer: &mut Writer<impl io::Write>) -> quick_xml::Result<()> {
    // "]]>" would end the section early: split it so that "]]" closes one section and ">"
    // opens the next.
    let mut rest = text;
    while let Some(pos) = rest.find("]]>") {
        let (head, tail) = rest.split_at(pos + 2);
        writer.write_event(Event::CData(BytesCData::new(head)))?;
        rest = tail;
    }
    writer.write_event(Event::CData(BytesCData::new(rest)))?;
    Ok(())
}

fn serialize_empty_start_tag(
    tag_name: &'static str,
    writer: &mut Writer<impl io::Write>,
) -> quick_xml::Result<()> {
    writer.write_event(Event::Start(BytesStart::new(tag_name)))?;
    Ok(())
}

fn serialize_end_tag(
    tag_name: &'static str,
    writer: &mut Writer<impl io::Write>,
) -> quick_xml::Result<()> {
    writer.write_event(Event::End(BytesEnd::new(tag_name)))?;
    Ok(())
}

// Zero-valued attributes are omitted.
fn push_int_attribute(tag: &mut BytesStart<'_>, key: &str, value: i64) {
    if value != 0 {
        tag.push_attribute((key, value.to_string().as_str()));
    }
}

fn push_str_attribute(tag: &mut BytesStart<'_>, key: &str, value: &XmlString) {
    if !value.is_empty() {
        push_escaped_attribute(tag, key, value);
    }
}

fn push_escaped_attribute(tag: &mut BytesStart<'_>, key: &str, value: &str) {
    let escaped = escape_attribute_value(value);
    // The byte form is pushed as-is, without a second round of escaping.
    tag.push_attribute((key.as_bytes(), escaped.as_bytes()));
}

// Readers normalize literal whitespace in attribute values to spaces, so tabs and line breaks
// are written as character references.
fn escape_attribute_value(value: &str) -> String {
    let escaped = escape(value);
    let mut out = String::with_capacity(escaped.len());
    for c in escaped.chars() {
        match c {
            '\t' => out.push_str("&#x9;"),
            '\n' => out.push_str("&#xA;"),
            '\r' => out.push_str("&#xD;"),
            c => out.push(c),
        }
    }
    out
}

pub(crate) fn serialize_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}
