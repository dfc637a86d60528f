//! Parsers KML basés sur le flux d'événements quick-xml

pub mod coords;
pub mod document;
pub mod metadata;

use quick_xml::events::BytesStart;
use quick_xml::Reader;

use crate::KmlError;

/// Valeur d'un attribut, décodée
pub(crate) fn attribute(
    reader: &Reader<&[u8]>,
    element: &BytesStart,
    key: &str,
) -> Result<Option<String>, KmlError> {
    let position = reader.buffer_position() as u64;
    match element
        .try_get_attribute(key)
        .map_err(|e| KmlError::xml(position, e))?
    {
        Some(attr) => {
            let value = attr
                .unescape_value()
                .map_err(|e| KmlError::xml(position, e))?;
            Ok(Some(value.into_owned()))
        }
        None => Ok(None),
    }
}

/// Réduit les suites de blancs à un seul espace
pub(crate) fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
