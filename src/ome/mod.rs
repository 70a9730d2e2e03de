//! # OME-XML Plane Source
//!
//! Extracts one [`PlaneRecord`] per acquisition unit from the OME-XML metadata
//! exported from an acquisition container.
//!
//! ## Document Structure
//!
//! ```text
//! OME (root, namespace http://www.openmicroscopy.org/Schemas/OME/2016-06)
//! ├── Instrument ...
//! └── Image Name="Plate (Series 03)"   (one per acquisition unit)
//!     └── Pixels
//!         ├── Channel ...
//!         └── Plane PositionX=".." PositionY=".."   (first one is used)
//! ```
//!
//! Only `Image` elements directly under the root are considered, and only the
//! first `Plane` descendant of each. Images without a plane contribute nothing.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::NsReader;

use crate::diagnostics::DiagnosticSink;
use crate::records::PlaneRecord;
use crate::xml::{get_attribute, get_f64_attribute};

mod error;


pub use error::OmeError;

/// OME schema namespace the plane source reads
pub const OME_NAMESPACE: &str = "http://www.openmicroscopy.org/Schemas/OME/2016-06";

/// Default input buffer size for OME-XML parsing (64KB)
pub const DEFAULT_INPUT_BUFFER_SIZE: usize = 64 * 1024;

/// Image currently being read
struct OpenImage {
    name: String,
    depth: usize,
    position: Option<Option<(f64, f64)>>,
}

/// Streaming reader for OME-XML acquisition metadata
pub struct OmeReader<R: BufRead> {
    reader: NsReader<R>,
    namespace: String,
}

impl<R: BufRead> OmeReader<R> {
    /// Create a new reader from a BufRead source
    pub fn new(reader: R) -> Self {
        let mut xml_reader = NsReader::from_reader(reader);
        xml_reader.config_mut().trim_text(true);

        Self {
            reader: xml_reader,
            namespace: OME_NAMESPACE.to_string(),
        }
    }

    /// Read elements from a different OME schema namespace
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Read every acquisition unit in document order.
    ///
    /// Images whose first plane has no parsable `PositionX`/`PositionY` are
    /// reported to `sink` and skipped.
    pub fn read_planes(
        mut self,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<Vec<PlaneRecord>, OmeError> {
        let namespace = self.namespace.into_bytes();
        let mut planes = Vec::new();
        let mut depth = 0usize;
        let mut image: Option<OpenImage> = None;
        let mut buf = Vec::new();

        loop {
            let (ns, event) = self.reader.read_resolved_event_into(&mut buf)?;
            let in_ome = matches!(ns, ResolveResult::Bound(Namespace(n)) if n == namespace.as_slice());

            match &event {
                Event::Start(e) => {
                    depth += 1;
                    if in_ome {
                        Self::open_element(e, depth, &mut image)?;
                    }
                }
                Event::Empty(e) => {
                    if in_ome {
                        // An empty Image has no planes; nothing to open
                        if e.local_name().as_ref() != b"Image" {
                            Self::open_element(e, depth + 1, &mut image)?;
                        }
                    }
                }
                Event::End(_) => {
                    if image.as_ref().is_some_and(|img| img.depth == depth) {
                        if let Some(img) = image.take() {
                            Self::close_image(img, &mut planes, sink);
                        }
                    }
                    depth = depth.saturating_sub(1);
                }
                Event::Eof => break,
                _ => {}
            }
            drop(event);
            buf.clear();
        }

        Ok(planes)
    }

    fn open_element(
        e: &BytesStart,
        depth: usize,
        image: &mut Option<OpenImage>,
    ) -> Result<(), OmeError> {
        match e.local_name().as_ref() {
            b"Image" if depth == 2 => {
                *image = Some(OpenImage {
                    name: get_attribute(e, "Name")?.unwrap_or_default(),
                    depth,
                    position: None,
                });
            }
            b"Plane" => {
                if let Some(img) = image.as_mut() {
                    if img.position.is_none() {
                        let x = get_f64_attribute(e, "PositionX")?;
                        let y = get_f64_attribute(e, "PositionY")?;
                        img.position = Some(x.zip(y));
                    }
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn close_image(img: OpenImage, planes: &mut Vec<PlaneRecord>, sink: &mut dyn DiagnosticSink) {
        match img.position {
            Some(Some((x, y))) => planes.push(PlaneRecord::new(img.name, x, y)),
            Some(None) => sink.warning(format!(
                "Image '{}' has a plane without a valid PositionX/PositionY; skipping",
                img.name
            )),
            None => log::debug!("Image '{}' has no plane; skipping", img.name),
        }
    }
}

impl OmeReader<BufReader<File>> {
    /// Open an OME-XML file for streaming
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, OmeError> {
        let file = File::open(path.as_ref())?;
        Ok(Self::new(BufReader::with_capacity(DEFAULT_INPUT_BUFFER_SIZE, file)))
    }
}

/// Read all plane records from an OME-XML file
pub fn read_planes_from_file<P: AsRef<Path>>(
    path: P,
    sink: &mut dyn DiagnosticSink,
) -> Result<Vec<PlaneRecord>, OmeError> {
    OmeReader::open(path)?.read_planes(sink)
}
