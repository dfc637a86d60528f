//! Parser de la structure KML: couches, placemarks et polygones
//!
//! Chaque `<Folder>` contenant des placemarks devient une couche. Les
//! placemarks hors de tout Folder forment la couche du Document.

use std::collections::BTreeMap;

use geo::{LineString, MultiPolygon, Polygon};
use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::debug;

use super::{attribute, coords, normalize_whitespace};
use crate::types::{DataSource, Feature, Layer, KML_SRID};
use crate::KmlError;

#[derive(Default)]
struct PlacemarkBuilder {
    name: Option<String>,
    polygons: Vec<Polygon<f64>>,
    properties: BTreeMap<String, String>,
}

impl PlacemarkBuilder {
    fn label(&self) -> String {
        self.name.clone().unwrap_or_else(|| "<unnamed>".to_string())
    }

    fn build(self) -> Feature {
        Feature {
            name: self.name,
            geometry: MultiPolygon::new(self.polygons),
            properties: self.properties,
        }
    }
}

#[derive(Default)]
struct PolygonBuilder {
    exterior: Option<LineString<f64>>,
    interiors: Vec<LineString<f64>>,
    inner: bool,
}

/// Parse un document KML complet
pub fn parse(data: &[u8]) -> Result<DataSource, KmlError> {
    let mut reader = Reader::from_reader(data);

    let mut stack: Vec<Vec<u8>> = Vec::new();
    let mut document = Layer::default();
    let mut folders: Vec<Layer> = Vec::new();
    let mut layers: Vec<Layer> = Vec::new();
    let mut placemark: Option<PlacemarkBuilder> = None;
    let mut polygon: Option<PolygonBuilder> = None;
    let mut data_name: Option<String> = None;
    let mut content = String::new();

    loop {
        let event = reader
            .read_event()
            .map_err(|e| KmlError::xml(reader.buffer_position() as u64, e))?;

        match event {
            Event::Start(e) => {
                content.clear();
                let tag = e.local_name().as_ref().to_vec();
                match tag.as_slice() {
                    b"Folder" => folders.push(Layer::default()),
                    b"Placemark" => placemark = Some(PlacemarkBuilder::default()),
                    b"Polygon" if placemark.is_some() => polygon = Some(PolygonBuilder::default()),
                    b"outerBoundaryIs" => {
                        if let Some(p) = polygon.as_mut() {
                            p.inner = false;
                        }
                    }
                    b"innerBoundaryIs" => {
                        if let Some(p) = polygon.as_mut() {
                            p.inner = true;
                        }
                    }
                    b"Data" | b"SimpleData" => {
                        data_name =
                            attribute(&reader, &e, "name")?.map(|n| normalize_whitespace(&n));
                    }
                    b"Point" | b"LineString" => {
                        debug!(
                            element = %String::from_utf8_lossy(&tag),
                            "Ignoring non-polygonal geometry"
                        );
                    }
                    _ => {}
                }
                stack.push(tag);
            }
            Event::Text(t) => {
                let text = t
                    .unescape()
                    .map_err(|e| KmlError::xml(reader.buffer_position() as u64, e))?;
                content.push_str(&text);
            }
            Event::CData(c) => content.push_str(&String::from_utf8_lossy(&c)),
            Event::End(e) => {
                stack.pop();
                let parent = stack.last().map(|p| p.as_slice());

                match e.local_name().as_ref() {
                    b"name" => {
                        let name = Some(content.trim().to_string());
                        match parent {
                            Some(b"Placemark") => {
                                if let Some(p) = placemark.as_mut() {
                                    p.name = name;
                                }
                            }
                            Some(b"Folder") => {
                                if let Some(f) = folders.last_mut() {
                                    f.name = name;
                                }
                            }
                            Some(b"Document") if document.name.is_none() => document.name = name,
                            _ => {}
                        }
                    }
                    b"coordinates" if matches!(parent, Some(b"LinearRing")) => {
                        if let Some(p) = polygon.as_mut() {
                            let ring = coords::parse(&content)?;
                            if p.inner {
                                p.interiors.push(ring);
                            } else if p.exterior.is_none() {
                                p.exterior = Some(ring);
                            } else {
                                let label = placemark.as_ref().map(|pm| pm.label()).unwrap_or_default();
                                return Err(KmlError::invalid_geometry(
                                    label,
                                    "polygon with several outer boundaries",
                                ));
                            }
                        }
                    }
                    b"Polygon" => {
                        if let (Some(p), Some(pm)) = (polygon.take(), placemark.as_mut()) {
                            let exterior = p.exterior.ok_or_else(|| {
                                KmlError::invalid_geometry(pm.label(), "polygon without outer boundary")
                            })?;
                            pm.polygons.push(Polygon::new(exterior, p.interiors));
                        }
                    }
                    b"value" | b"SimpleData" => {
                        if let (Some(pm), Some(key)) = (placemark.as_mut(), data_name.take()) {
                            pm.properties.insert(key, content.trim().to_string());
                        }
                    }
                    b"Placemark" => {
                        if let Some(pm) = placemark.take() {
                            let feature = pm.build();
                            match folders.last_mut() {
                                Some(folder) => folder.features.push(feature),
                                None => document.features.push(feature),
                            }
                        }
                    }
                    b"Folder" => {
                        if let Some(folder) = folders.pop() {
                            if !folder.features.is_empty() {
                                layers.push(folder);
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

    if !document.features.is_empty() {
        layers.insert(0, document);
    }

    Ok(DataSource {
        layers,
        srid: KML_SRID,
    })
}
