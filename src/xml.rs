//! Small quick-xml helpers shared by the OME-XML and multipoint readers.

use std::borrow::Cow;

use quick_xml::escape::unescape;
use quick_xml::events::BytesStart;

/// Get an unescaped attribute value from a start or empty element
pub(crate) fn get_attribute(e: &BytesStart, name: &str) -> Result<Option<String>, quick_xml::Error> {
    for attr in e.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        if attr.key.local_name().as_ref() == name.as_bytes() {
            let raw = String::from_utf8_lossy(&attr.value);
            let value = unescape(&raw).map_err(quick_xml::Error::from)?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

/// Get an attribute and parse it as a floating point number.
///
/// Returns `Ok(None)` when the attribute is missing or not a number.
pub(crate) fn get_f64_attribute(e: &BytesStart, name: &str) -> Result<Option<f64>, quick_xml::Error> {
    Ok(get_attribute(e, name)?.and_then(|s| s.trim().parse().ok()))
}

/// Transcode a UTF-16 document (detected by its byte order mark) to UTF-8.
///
/// Documents without a UTF-16 BOM are returned untouched. The XML declaration
/// is left as-is; attribute values are always read as UTF-8.
pub(crate) fn transcode_utf16(bytes: &[u8]) -> Cow<'_, [u8]> {
    let from_units: fn([u8; 2]) -> u16 = match bytes {
        [0xFF, 0xFE, ..] => u16::from_le_bytes,
        [0xFE, 0xFF, ..] => u16::from_be_bytes,
        _ => return Cow::Borrowed(bytes),
    };
    let units: Vec<u16> = bytes[2..]
        .chunks_exact(2)
        .map(|pair| from_units([pair[0], pair[1]]))
        .collect();
    Cow::Owned(String::from_utf16_lossy(&units).into_bytes())
}
