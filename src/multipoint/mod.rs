//! # Multipoint Position List
//!
//! Reads operator-authored named stage positions from a multipoint XML export.
//!
//! ```text
//! variant (root)
//! └── no_name                          (point container)
//!     ├── bIncludeZ value="false"      (list flags, ignored)
//!     ├── Point00000
//!     │   ├── strName value="A1"
//!     │   ├── dXPosition value="-1520.25"
//!     │   └── dYPosition value="3310.5"
//!     └── Point00001 ...
//! ```
//!
//! A child of the container becomes a [`PointRecord`] only when it carries all
//! three fields. Children with none of them are silently ignored; children with
//! some but not all, or with non-numeric coordinates, are reported and skipped.

use std::io::BufRead;
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::diagnostics::DiagnosticSink;
use crate::records::PointRecord;
use crate::xml::{get_attribute, transcode_utf16};

mod error;


pub use error::MultipointError;

/// Name of the point container element under the document root
pub const POINT_CONTAINER: &str = "no_name";

const ROOT_DEPTH: usize = 1;
const CONTAINER_DEPTH: usize = 2;
const POINT_DEPTH: usize = 3;
const FIELD_DEPTH: usize = 4;

/// Fields collected for one child of the point container.
///
/// The outer `Option` records whether the field element was present, the inner
/// one whether its `value` attribute was usable.
#[derive(Default)]
struct Candidate {
    tag: String,
    name: Option<Option<String>>,
    x: Option<Option<f64>>,
    y: Option<Option<f64>>,
}

impl Candidate {
    fn new(e: &BytesStart) -> Self {
        Self {
            tag: String::from_utf8_lossy(e.name().as_ref()).into_owned(),
            ..Default::default()
        }
    }

    fn add_field(&mut self, e: &BytesStart) -> Result<(), MultipointError> {
        match e.name().as_ref() {
            b"strName" if self.name.is_none() => {
                self.name = Some(get_attribute(e, "value")?);
            }
            b"dXPosition" if self.x.is_none() => {
                self.x = Some(parse_value(e)?);
            }
            b"dYPosition" if self.y.is_none() => {
                self.y = Some(parse_value(e)?);
            }
            _ => {}
        }
        Ok(())
    }

    fn finish(self, points: &mut Vec<PointRecord>, sink: &mut dyn DiagnosticSink) {
        match (self.name, self.x, self.y) {
            (None, None, None) => {}
            (Some(Some(label)), Some(Some(x)), Some(Some(y))) => {
                points.push(PointRecord::new(label, x, y));
            }
            (name, x, y) => {
                let mut missing = Vec::new();
                if !matches!(name, Some(Some(_))) {
                    missing.push("strName");
                }
                if !matches!(x, Some(Some(_))) {
                    missing.push("dXPosition");
                }
                if !matches!(y, Some(Some(_))) {
                    missing.push("dYPosition");
                }
                sink.warning(format!(
                    "Multipoint entry '{}' has no usable {}; skipping",
                    self.tag,
                    missing.join("/")
                ));
            }
        }
    }
}

fn parse_value(e: &BytesStart) -> Result<Option<f64>, MultipointError> {
    Ok(get_attribute(e, "value")?.and_then(|s| s.trim().parse().ok()))
}

/// Parse a multipoint XML document into point records in document order
pub fn parse_multipoints<R: BufRead>(
    reader: R,
    sink: &mut dyn DiagnosticSink,
) -> Result<Vec<PointRecord>, MultipointError> {
    let mut xml_reader = Reader::from_reader(reader);
    xml_reader.config_mut().trim_text(true);

    let mut points = Vec::new();
    let mut depth = 0usize;
    let mut container_found = false;
    let mut in_container = false;
    let mut candidate: Option<Candidate> = None;
    let mut buf = Vec::new();

    loop {
        match xml_reader.read_event_into(&mut buf)? {
            Event::Start(ref e) => {
                depth += 1;
                match depth {
                    CONTAINER_DEPTH if !container_found && e.name().as_ref() == POINT_CONTAINER.as_bytes() => {
                        container_found = true;
                        in_container = true;
                    }
                    POINT_DEPTH if in_container => candidate = Some(Candidate::new(e)),
                    FIELD_DEPTH => {
                        if let Some(c) = candidate.as_mut() {
                            c.add_field(e)?;
                        }
                    }
                    _ => {}
                }
            }
            Event::Empty(ref e) => match depth + 1 {
                CONTAINER_DEPTH if !container_found && e.name().as_ref() == POINT_CONTAINER.as_bytes() => {
                    container_found = true;
                }
                FIELD_DEPTH => {
                    if let Some(c) = candidate.as_mut() {
                        c.add_field(e)?;
                    }
                }
                _ => {}
            },
            Event::End(_) => {
                match depth {
                    POINT_DEPTH => {
                        if let Some(c) = candidate.take() {
                            c.finish(&mut points, sink);
                        }
                    }
                    CONTAINER_DEPTH => in_container = false,
                    ROOT_DEPTH => break,
                    _ => {}
                }
                depth = depth.saturating_sub(1);
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if !container_found {
        return Err(MultipointError::MissingContainer(POINT_CONTAINER.to_string()));
    }

    Ok(points)
}

/// Read a multipoint XML file, transcoding UTF-16 exports first
pub fn parse_multipoints_file<P: AsRef<Path>>(
    path: P,
    sink: &mut dyn DiagnosticSink,
) -> Result<Vec<PointRecord>, MultipointError> {
    let bytes = std::fs::read(path.as_ref())?;
    let content = transcode_utf16(&bytes);
    parse_multipoints(content.as_ref(), sink)
}
