// JUnit-style run document parser
// Root element carries the run counters, direct <testcase> children are the cases.

use crate::report::types::{Outcome, RunStatistics, TestCaseRecord};
use anyhow::{Context, Result};
use log::debug;
use quick_xml::events::attributes::AttrError;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::path::Path;
use thiserror::Error;

/// Structural problems with the run document. All of them are fatal.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("invalid attribute: {0}")]
    Attribute(#[from] AttrError),

    #[error("document has no root element")]
    MissingRoot,

    #[error("<{element}> is missing required attribute `{attribute}`")]
    MissingAttribute { element: String, attribute: String },

    #[error("attribute `{attribute}` is not a non-negative integer: {value:?}")]
    InvalidNumber { attribute: String, value: String },

    #[error("failures, errors and skips add up to {unsuccess}, more than the {tests} tests run")]
    InconsistentCounts { tests: u64, unsuccess: u64 },

    #[error("failures ({failures}), errors ({errors}) and skips ({skip}) overflow when added")]
    CountOverflow { failures: u64, errors: u64, skip: u64 },
}

/// Parsed run document, cases in document order
#[derive(Debug, Clone)]
pub struct RunDocument {
    pub stats: RunStatistics,
    pub cases: Vec<TestCaseRecord>,
}

/// Read and parse a run document from disk
pub fn parse_file(path: &Path) -> Result<RunDocument> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read test results: {}", path.display()))?;
    let document = parse_document(&content)
        .with_context(|| format!("Malformed test results: {}", path.display()))?;
    Ok(document)
}

/// Parse a run document from its XML text
pub fn parse_document(xml: &str) -> Result<RunDocument, ParseError> {
    let mut reader = Reader::from_str(xml);

    let mut stats: Option<RunStatistics> = None;
    let mut cases = Vec::new();
    let mut current: Option<CaseBuilder> = None;
    let mut depth = 0usize;

    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(ref e) => {
                match depth {
                    0 if stats.is_none() => stats = Some(parse_run_statistics(e)?),
                    1 if e.name().as_ref() == b"testcase" => {
                        current = Some(CaseBuilder::new(parse_case(e)?));
                    }
                    1 => debug!("Ignoring <{}> in run document", element_name(e)),
                    2 => {
                        if let Some(case) = current.as_mut() {
                            case.open_child(e)?;
                        }
                    }
                    _ => {}
                }
                depth += 1;
            }
            Event::Empty(ref e) => match depth {
                0 if stats.is_none() => stats = Some(parse_run_statistics(e)?),
                1 if e.name().as_ref() == b"testcase" => cases.push(parse_case(e)?),
                2 => {
                    if let Some(case) = current.as_mut() {
                        case.open_child(e)?;
                        case.close_child();
                    }
                }
                _ => {}
            },
            Event::End(_) => {
                depth = depth.saturating_sub(1);
                match depth {
                    1 => {
                        if let Some(case) = current.take() {
                            cases.push(case.finish());
                        }
                    }
                    2 => {
                        if let Some(case) = current.as_mut() {
                            case.close_child();
                        }
                    }
                    _ => {}
                }
            }
            Event::Text(ref e) => {
                if let Some(case) = current.as_mut() {
                    case.push_text(depth, &e.unescape()?);
                }
            }
            Event::CData(ref e) => {
                if let Some(case) = current.as_mut() {
                    case.push_text(depth, &String::from_utf8_lossy(e));
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    let stats = stats.ok_or(ParseError::MissingRoot)?;
    Ok(RunDocument { stats, cases })
}

/// Read the run counters off the root element
pub fn parse_run_statistics(root: &BytesStart<'_>) -> Result<RunStatistics, ParseError> {
    let total = required_count(root, "tests")?;
    let failure = required_count(root, "failures")?;
    let error = required_count(root, "errors")?;
    let skip = required_count(root, "skip")?;

    let unsuccess = failure
        .checked_add(error)
        .and_then(|n| n.checked_add(skip))
        .ok_or(ParseError::CountOverflow {
            failures: failure,
            errors: error,
            skip,
        })?;
    if unsuccess > total {
        return Err(ParseError::InconsistentCounts {
            tests: total,
            unsuccess,
        });
    }

    Ok(RunStatistics {
        total,
        success: total - unsuccess,
        skip,
        error,
        failure,
        unsuccess,
    })
}

/// Build a case record from a <testcase> start tag. Outcome defaults to success.
pub fn parse_case(case: &BytesStart<'_>) -> Result<TestCaseRecord, ParseError> {
    let classname = required_attribute(case, "classname")?;
    let name = required_attribute(case, "name")?;
    let time = required_attribute(case, "time")?;
    Ok(TestCaseRecord::new(&classname, &name, &time))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Sink {
    Output,
    Traceback,
    Ignored,
}

/// Accumulates one <testcase> while its children stream past
struct CaseBuilder {
    record: TestCaseRecord,
    output: String,
    traceback: String,
    sink: Sink,
}

impl CaseBuilder {
    fn new(record: TestCaseRecord) -> Self {
        Self {
            record,
            output: String::new(),
            traceback: String::new(),
            sink: Sink::Ignored,
        }
    }

    fn open_child(&mut self, child: &BytesStart<'_>) -> Result<(), ParseError> {
        let tag = child.name();
        if let Some(outcome) = Outcome::from_tag(tag.as_ref()) {
            // Several outcome children: the last one wins.
            self.record.result = outcome;
            self.record.exc_type = attribute(child, "type")?;
            self.record.exc_message = attribute(child, "message")?;
            self.record.traceback = None;
            self.traceback.clear();
            self.sink = Sink::Traceback;
        } else if tag.as_ref() == b"system-out" {
            self.sink = Sink::Output;
        } else {
            debug!(
                "Ignoring <{}> in test case {}",
                element_name(child),
                self.record.name
            );
            self.sink = Sink::Ignored;
        }
        Ok(())
    }

    fn close_child(&mut self) {
        if self.sink == Sink::Traceback {
            self.record.traceback = normalize(std::mem::take(&mut self.traceback));
        }
        self.sink = Sink::Ignored;
    }

    /// `depth` is the nesting level of the text: 2 is directly inside the case
    fn push_text(&mut self, depth: usize, text: &str) {
        match (depth, self.sink) {
            (2, _) | (3, Sink::Output) => self.output.push_str(text),
            (3, Sink::Traceback) => self.traceback.push_str(text),
            _ => {}
        }
    }

    fn finish(mut self) -> TestCaseRecord {
        self.record.output = normalize(self.output);
        self.record
    }
}

fn normalize(text: String) -> Option<String> {
    let text = text.trim_end();
    let first = text.find(|c: char| !c.is_whitespace())?;
    // Keep the indentation of the first non-blank line, drop blank lines before it.
    let line_start = text[..first].rfind('\n').map_or(0, |i| i + 1);
    Some(text[line_start..].to_string())
}

fn attribute(element: &BytesStart<'_>, name: &str) -> Result<Option<String>, ParseError> {
    match element.try_get_attribute(name)? {
        Some(attr) => Ok(Some(attr.unescape_value()?.into_owned())),
        None => Ok(None),
    }
}

fn required_attribute(element: &BytesStart<'_>, name: &str) -> Result<String, ParseError> {
    attribute(element, name)?.ok_or_else(|| ParseError::MissingAttribute {
        element: element_name(element),
        attribute: name.to_string(),
    })
}

fn required_count(element: &BytesStart<'_>, name: &str) -> Result<u64, ParseError> {
    let value = required_attribute(element, name)?;
    value
        .trim()
        .parse()
        .map_err(|_| ParseError::InvalidNumber {
            attribute: name.to_string(),
            value,
        })
}

fn element_name(element: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(element.name().as_ref()).into_owned()
}
