//! XML event reader built on `quick-xml`.
//!
//! Produces [`XmlEvent`]s with resolved element and attribute names, the
//! namespace bindings in scope and 1-based line numbers. Adjacent text and
//! CDATA are merged into one text event.

use crate::{StartElement, XmlEvent};
use bpel_core::{is_ncname, NamespaceStack, QName};
use bpel_model::XmlAttribute;
use quick_xml::events::attributes::AttrError;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::VecDeque;
use thiserror::Error;

/// Errors that stop reading a document.
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("XML syntax error at line {line}: {source}")]
    Xml {
        line: usize,
        #[source]
        source: quick_xml::Error,
    },

    #[error("Malformed attribute at line {line}: {source}")]
    Attr {
        line: usize,
        #[source]
        source: AttrError,
    },

    #[error("Invalid UTF-8 at line {line}")]
    Utf8 {
        line: usize,
        #[source]
        source: std::str::Utf8Error,
    },

    #[error("Malformed name '{name}' at line {line}")]
    MalformedName { name: String, line: usize },

    #[error("Unbound namespace prefix '{prefix}' at line {line}")]
    UnboundPrefix { prefix: String, line: usize },

    #[error("Document ended with {open} unclosed element(s)")]
    UnclosedElements { open: usize, line: usize },
}

impl ReadError {
    pub fn line(&self) -> usize {
        match self {
            ReadError::Xml { line, .. }
            | ReadError::Attr { line, .. }
            | ReadError::Utf8 { line, .. }
            | ReadError::MalformedName { line, .. }
            | ReadError::UnboundPrefix { line, .. }
            | ReadError::UnclosedElements { line, .. } => *line,
        }
    }
}

/// Byte offset to line lookup.
#[derive(Debug)]
struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    fn new(source: &str) -> Self {
        let starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self { starts }
    }

    fn line_of(&self, offset: usize) -> usize {
        self.starts.partition_point(|&start| start <= offset)
    }
}

/// Streaming reader over a document held in memory.
pub struct EventReader<'a> {
    reader: Reader<&'a [u8]>,
    lines: LineIndex,
    namespaces: NamespaceStack,
    text: String,
    /// Line the buffered text starts on.
    text_line: usize,
    pending: VecDeque<XmlEvent>,
    depth: usize,
    done: bool,
}

/// Read `source` as a stream of parse events.
pub fn read_events(source: &str) -> EventReader<'_> {
    let mut reader = Reader::from_str(source);
    reader.config_mut().expand_empty_elements = true;
    EventReader {
        reader,
        lines: LineIndex::new(source),
        namespaces: NamespaceStack::new(),
        text: String::new(),
        text_line: 1,
        pending: VecDeque::new(),
        depth: 0,
        done: false,
    }
}

fn utf8(bytes: &[u8], line: usize) -> Result<&str, ReadError> {
    std::str::from_utf8(bytes).map_err(|source| ReadError::Utf8 { line, source })
}

impl<'a> EventReader<'a> {
    /// Queue `event`, flushing buffered text ahead of it.
    fn emit(&mut self, event: XmlEvent) -> XmlEvent {
        if self.text.is_empty() {
            event
        } else {
            self.pending.push_back(event);
            self.take_text()
        }
    }

    fn buffer_text(&mut self, text: &str, line: usize) {
        if self.text.is_empty() {
            self.text_line = line;
        }
        self.text.push_str(text);
    }

    fn take_text(&mut self) -> XmlEvent {
        let content = std::mem::take(&mut self.text);
        let leading = content.len() - content.trim_start().len();
        let line = self.text_line + content[..leading].matches('\n').count();
        XmlEvent::Text { content, line }
    }

    fn resolve(&self, raw: &str, use_default: bool, line: usize) -> Result<QName, ReadError> {
        let malformed = || ReadError::MalformedName {
            name: raw.to_string(),
            line,
        };
        match raw.split_once(':') {
            Some((prefix, local)) => {
                if !is_ncname(prefix) || !is_ncname(local) {
                    return Err(malformed());
                }
                let ns = self
                    .namespaces
                    .lookup(prefix)
                    .ok_or_else(|| ReadError::UnboundPrefix {
                        prefix: prefix.to_string(),
                        line,
                    })?;
                Ok(QName::new(ns, local))
            }
            None => {
                if !is_ncname(raw) {
                    return Err(malformed());
                }
                let ns = if use_default {
                    self.namespaces.lookup("").unwrap_or("")
                } else {
                    ""
                };
                Ok(QName::new(ns, raw))
            }
        }
    }

    fn start(&mut self, e: &BytesStart<'_>, line: usize) -> Result<StartElement, ReadError> {
        self.namespaces.push();

        // Declarations first: they apply to the element's own name and attributes
        let mut plain = Vec::new();
        for attr in e.attributes() {
            let attr = attr.map_err(|source| ReadError::Attr { line, source })?;
            let key = utf8(attr.key.as_ref(), line)?.to_string();
            let value = attr
                .unescape_value()
                .map_err(|source| ReadError::Xml { line, source })?
                .into_owned();
            if key == "xmlns" {
                self.namespaces.declare("", value);
            } else if let Some(prefix) = key.strip_prefix("xmlns:") {
                self.namespaces.declare(prefix, value);
            } else {
                plain.push((key, value));
            }
        }

        let qname = e.name();
        let raw_name = utf8(qname.as_ref(), line)?;
        let mut start = StartElement::new(self.resolve(raw_name, true, line)?, line);
        for (key, value) in plain {
            if key.contains(':') {
                let name = self.resolve(&key, false, line)?;
                start
                    .extension_attributes
                    .push(XmlAttribute::new(name, value));
            } else {
                start.attributes.insert(key, value);
            }
        }
        start.namespaces = self.namespaces.snapshot();
        Ok(start)
    }

    fn fail(&mut self, err: ReadError) -> Option<Result<XmlEvent, ReadError>> {
        self.done = true;
        Some(Err(err))
    }
}

impl<'a> Iterator for EventReader<'a> {
    type Item = Result<XmlEvent, ReadError>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(event) = self.pending.pop_front() {
            return Some(Ok(event));
        }
        if self.done {
            return None;
        }

        loop {
            let line = self.lines.line_of(self.reader.buffer_position() as usize);
            let event = match self.reader.read_event() {
                Ok(event) => event,
                Err(source) => return self.fail(ReadError::Xml { line, source }),
            };

            match event {
                Event::Text(t) => match t.unescape() {
                    Ok(text) => self.buffer_text(&text, line),
                    Err(source) => return self.fail(ReadError::Xml { line, source }),
                },
                Event::CData(c) => match utf8(&c, line) {
                    Ok(text) => self.buffer_text(text, line),
                    Err(err) => return self.fail(err),
                },
                Event::Start(e) => {
                    let start = match self.start(&e, line) {
                        Ok(start) => start,
                        Err(err) => return self.fail(err),
                    };
                    self.depth += 1;
                    return Some(Ok(self.emit(XmlEvent::Start(start))));
                }
                Event::Empty(e) => {
                    let start = match self.start(&e, line) {
                        Ok(start) => start,
                        Err(err) => return self.fail(err),
                    };
                    self.namespaces.pop();
                    let first = self.emit(XmlEvent::Start(start));
                    self.pending.push_back(XmlEvent::End);
                    return Some(Ok(first));
                }
                Event::End(_) => {
                    self.namespaces.pop();
                    self.depth = self.depth.saturating_sub(1);
                    return Some(Ok(self.emit(XmlEvent::End)));
                }
                Event::Eof => {
                    self.done = true;
                    if self.depth > 0 {
                        return Some(Err(ReadError::UnclosedElements {
                            open: self.depth,
                            line,
                        }));
                    }
                    if !self.text.is_empty() {
                        return Some(Ok(self.take_text()));
                    }
                    return None;
                }
                // Declarations, comments, processing instructions, doctype
                _ => {}
            }
        }
    }
}
