//! Parser pour le contenu des éléments <coordinates>

use geo::{Coord, LineString};

use crate::KmlError;

/// Parse une liste de tuples `lon,lat[,alt]` séparés par des blancs.
///
/// L'altitude éventuelle est ignorée.
pub fn parse(text: &str) -> Result<LineString<f64>, KmlError> {
    let mut coords = Vec::new();

    for tuple in text.split_ascii_whitespace() {
        let mut parts = tuple.split(',');
        let x = parse_number(tuple, parts.next())?;
        let y = parse_number(tuple, parts.next())?;
        if parts.count() > 1 {
            return Err(KmlError::invalid_coordinates(tuple, "too many components"));
        }
        coords.push(Coord { x, y });
    }

    Ok(LineString::new(coords))
}

fn parse_number(tuple: &str, part: Option<&str>) -> Result<f64, KmlError> {
    let part = part.ok_or_else(|| KmlError::invalid_coordinates(tuple, "missing component"))?;
    fast_float::parse(part).map_err(|_| KmlError::invalid_coordinates(tuple, "not a number"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_2d_and_3d() {
        let ls = parse("1.5,2 3,4,0\n  5,6").unwrap();
        assert_eq!(ls.0.len(), 3);
        assert_eq!(ls.0[0], Coord { x: 1.5, y: 2.0 });
        assert_eq!(ls.0[1], Coord { x: 3.0, y: 4.0 });
    }

    #[test]
    fn test_parse_empty() {
        assert!(parse("   ").unwrap().0.is_empty());
    }

    #[test]
    fn test_parse_missing_latitude() {
        let result = parse("1.0");
        assert!(matches!(result, Err(KmlError::InvalidCoordinates { .. })));
    }

    #[test]
    fn test_parse_garbage() {
        assert!(parse("1.0,abc").is_err());
        assert!(parse("1,2,3,4").is_err());
    }
}
