//! Extraction des ExtendedData d'un fichier KML
//!
//! Chaque élément `<name>` ouvre une entrée; les `<Data name="..."><value>`
//! (ou `<SimpleData name="...">`) qui suivent sont rangés dans cette entrée.

use std::collections::BTreeMap;

use quick_xml::events::Event;
use quick_xml::Reader;

use super::{attribute, normalize_whitespace};
use crate::KmlError;

/// Entrées brutes: nom -> (clé ExtendedData -> valeur)
pub type Entries = BTreeMap<String, BTreeMap<String, String>>;

/// Parse le KML et retourne toutes les entrées nommées
pub fn parse(data: &[u8]) -> Result<Entries, KmlError> {
    let mut reader = Reader::from_reader(data);

    let mut entries = Entries::new();
    let mut current: Option<String> = None;
    let mut data_name: Option<String> = None;
    let mut content = String::new();

    loop {
        let event = reader
            .read_event()
            .map_err(|e| KmlError::xml(reader.buffer_position() as u64, e))?;

        match event {
            Event::Start(e) => {
                content.clear();
                if matches!(e.local_name().as_ref(), b"Data" | b"SimpleData") {
                    data_name = attribute(&reader, &e, "name")?.map(|n| normalize_whitespace(&n));
                }
            }
            Event::Text(t) => {
                let text = t
                    .unescape()
                    .map_err(|e| KmlError::xml(reader.buffer_position() as u64, e))?;
                content.push_str(&text);
            }
            Event::CData(c) => content.push_str(&String::from_utf8_lossy(&c)),
            Event::End(e) => {
                match e.local_name().as_ref() {
                    b"name" => {
                        let name = content.trim().to_string();
                        entries.insert(name.clone(), BTreeMap::new());
                        current = Some(name);
                    }
                    b"value" | b"SimpleData" => {
                        if let (Some(entry), Some(key)) = (current.as_ref(), data_name.take()) {
                            if let Some(values) = entries.get_mut(entry) {
                                values.insert(key, content.trim().to_string());
                            }
                        }
                    }
                    _ => {}
                }
                content.clear();
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(entries)
}
