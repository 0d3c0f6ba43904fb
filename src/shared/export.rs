use chrono::{DateTime, Utc};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::io::Cursor;
use thiserror::Error;

use crate::domain::Reading;

/// Root element of the XML export document
const ROOT_ELEMENT: &str = "HealthReadings";

/// Per-reading element name
const READING_ELEMENT: &str = "Reading";

/// Errors produced while serializing or parsing the XML export format
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("I/O error while writing XML: {0}")]
    Io(#[from] std::io::Error),

    #[error("Required element missing: {0}")]
    MissingElement(&'static str),

    #[error("Invalid value for element {element}: {value}")]
    InvalidElement { element: &'static str, value: String },

    #[error("Unexpected element: {0}")]
    UnexpectedElement(String),
}

/// Serialize readings as an XML document
///
/// One `Reading` element per entry with child elements in the order
/// `Id, DeviceId, DeviceType, Value, Unit, Timestamp, Notes`. Timestamps
/// are RFC3339 so the document round-trips; absent notes become an empty
/// `Notes` element.
pub fn readings_to_xml(readings: &[Reading]) -> Result<String, ExportError> {
    let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
    writer.write_event(Event::Start(BytesStart::new(ROOT_ELEMENT)))?;

    for reading in readings {
        writer.write_event(Event::Start(BytesStart::new(READING_ELEMENT)))?;

        write_text_element(&mut writer, "Id", &reading.id.to_string())?;
        write_text_element(&mut writer, "DeviceId", &reading.device_id)?;
        write_text_element(&mut writer, "DeviceType", &reading.device_type)?;
        write_text_element(&mut writer, "Value", &reading.value.to_string())?;
        write_text_element(&mut writer, "Unit", &reading.unit)?;
        write_text_element(&mut writer, "Timestamp", &reading.timestamp.to_rfc3339())?;
        write_text_element(&mut writer, "Notes", reading.notes.as_deref().unwrap_or(""))?;

        writer.write_event(Event::End(BytesEnd::new(READING_ELEMENT)))?;
    }

    writer.write_event(Event::End(BytesEnd::new(ROOT_ELEMENT)))?;

    let bytes = writer.into_inner().into_inner();
    // The writer only ever receives valid UTF-8
    Ok(String::from_utf8(bytes).expect("XML writer produced valid UTF-8"))
}

fn write_text_element(
    writer: &mut Writer<Cursor<Vec<u8>>>,
    name: &str,
    text: &str,
) -> Result<(), ExportError> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

/// Parse an XML export document back into readings
///
/// Accepts the format produced by [`readings_to_xml`]. Text inside field
/// elements is taken verbatim, so whitespace-padded values survive the
/// round trip. An empty `Notes` element parses as `None`; the two are
/// deliberately not distinguished. Whitespace between elements is ignored
/// because text is only consumed while a field element is open.
pub fn readings_from_xml(xml: &str) -> Result<Vec<Reading>, ExportError> {
    let mut reader = Reader::from_str(xml);

    let mut readings = Vec::new();
    let mut current: Option<PartialReading> = None;
    let mut current_field: Option<String> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                match name.as_str() {
                    ROOT_ELEMENT => {}
                    READING_ELEMENT => current = Some(PartialReading::default()),
                    _ if current.is_some() => current_field = Some(name),
                    _ => return Err(ExportError::UnexpectedElement(name)),
                }
            }
            Event::Text(t) => {
                if let (Some(partial), Some(field)) = (current.as_mut(), current_field.as_deref())
                {
                    let text = t.unescape()?.into_owned();
                    partial.set_field(field, text)?;
                }
            }
            Event::End(e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                match name.as_str() {
                    READING_ELEMENT => {
                        if let Some(partial) = current.take() {
                            readings.push(partial.build()?);
                        }
                    }
                    ROOT_ELEMENT => {}
                    _ => current_field = None,
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(readings)
}

/// Accumulates child elements of a `Reading` while parsing
#[derive(Default)]
struct PartialReading {
    id: Option<u64>,
    device_id: Option<String>,
    device_type: Option<String>,
    value: Option<f64>,
    unit: Option<String>,
    timestamp: Option<DateTime<Utc>>,
    notes: Option<String>,
}

impl PartialReading {
    fn set_field(&mut self, field: &str, text: String) -> Result<(), ExportError> {
        match field {
            "Id" => {
                self.id = Some(text.parse().map_err(|_| ExportError::InvalidElement {
                    element: "Id",
                    value: text,
                })?);
            }
            "DeviceId" => self.device_id = Some(text),
            "DeviceType" => self.device_type = Some(text),
            "Value" => {
                self.value = Some(text.parse().map_err(|_| ExportError::InvalidElement {
                    element: "Value",
                    value: text,
                })?);
            }
            "Unit" => self.unit = Some(text),
            "Timestamp" => {
                let parsed = DateTime::parse_from_rfc3339(&text)
                    .map_err(|_| ExportError::InvalidElement {
                        element: "Timestamp",
                        value: text,
                    })?
                    .with_timezone(&Utc);
                self.timestamp = Some(parsed);
            }
            "Notes" => {
                if !text.is_empty() {
                    self.notes = Some(text);
                }
            }
            other => return Err(ExportError::UnexpectedElement(other.to_string())),
        }
        Ok(())
    }

    fn build(self) -> Result<Reading, ExportError> {
        Ok(Reading {
            id: self.id.ok_or(ExportError::MissingElement("Id"))?,
            device_id: self
                .device_id
                .ok_or(ExportError::MissingElement("DeviceId"))?,
            device_type: self
                .device_type
                .ok_or(ExportError::MissingElement("DeviceType"))?,
            value: self.value.ok_or(ExportError::MissingElement("Value"))?,
            unit: self.unit.ok_or(ExportError::MissingElement("Unit"))?,
            timestamp: self
                .timestamp
                .ok_or(ExportError::MissingElement("Timestamp"))?,
            notes: self.notes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn reading(id: u64, notes: Option<&str>) -> Reading {
        Reading {
            id,
            device_id: String::from("polar-h10"),
            device_type: String::from("heart_rate"),
            value: 72.5,
            unit: String::from("BPM"),
            timestamp: Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap(),
            notes: notes.map(String::from),
        }
    }

    #[test]
    fn test_xml_element_order() {
        let xml = readings_to_xml(&[reading(1, Some("morning"))]).unwrap();

        let positions: Vec<usize> = [
            "<Id>",
            "<DeviceId>",
            "<DeviceType>",
            "<Value>",
            "<Unit>",
            "<Timestamp>",
            "<Notes>",
        ]
        .iter()
        .map(|tag| xml.find(tag).unwrap_or_else(|| panic!("missing {}", tag)))
        .collect();

        // Child elements appear in the documented order
        for pair in positions.windows(2) {
            assert!(pair[0] < pair[1]);
        }

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\"?>"));
        assert!(xml.contains("<HealthReadings>"));
        assert!(xml.contains("</HealthReadings>"));
    }

    #[test]
    fn test_xml_absent_notes_is_empty_element() {
        let xml = readings_to_xml(&[reading(1, None)]).unwrap();
        assert!(xml.contains("<Notes></Notes>") || xml.contains("<Notes/>"));
    }

    #[test]
    fn test_xml_empty_collection() {
        let xml = readings_to_xml(&[]).unwrap();
        assert!(xml.contains("<HealthReadings>"));
        assert!(!xml.contains("<Reading>"));

        let parsed = readings_from_xml(&xml).unwrap();
        assert!(parsed.is_empty());
    }

    #[test]
    fn test_xml_roundtrip() {
        let original = vec![
            reading(1, Some("after coffee")),
            Reading {
                id: 2,
                device_id: String::from("thermo-1"),
                device_type: String::from("thermometer"),
                value: 36.9,
                unit: String::from("°C"),
                timestamp: Utc.with_ymd_and_hms(2024, 1, 15, 11, 0, 0).unwrap(),
                notes: None,
            },
        ];

        let xml = readings_to_xml(&original).unwrap();
        let parsed = readings_from_xml(&xml).unwrap();
        assert_eq!(parsed, original);
    }

    #[test]
    fn test_xml_preserves_whitespace_padded_fields() {
        let mut r = reading(1, Some("  padded note  "));
        r.device_id = String::from(" dev a ");
        r.unit = String::from(" BPM ");

        let xml = readings_to_xml(&[r.clone()]).unwrap();
        let parsed = readings_from_xml(&xml).unwrap();
        assert_eq!(parsed, vec![r]);
    }

    #[test]
    fn test_xml_preserves_whitespace_only_notes() {
        let xml = readings_to_xml(&[reading(1, Some("   "))]).unwrap();
        let parsed = readings_from_xml(&xml).unwrap();
        assert_eq!(parsed[0].notes.as_deref(), Some("   "));
    }

    #[test]
    fn test_xml_escapes_special_characters() {
        let mut r = reading(1, Some("pulse <resting> & steady"));
        r.device_id = String::from("dev \"a\" & b");

        let xml = readings_to_xml(&[r.clone()]).unwrap();
        assert!(!xml.contains("pulse <resting>"));

        let parsed = readings_from_xml(&xml).unwrap();
        assert_eq!(parsed, vec![r]);
    }

    #[test]
    fn test_parse_missing_required_element() {
        let xml = r#"<?xml version="1.0" encoding="utf-8"?>
<HealthReadings>
  <Reading>
    <Id>1</Id>
    <DeviceId>dev-a</DeviceId>
  </Reading>
</HealthReadings>"#;

        let err = readings_from_xml(xml).unwrap_err();
        assert!(matches!(err, ExportError::MissingElement(_)));
    }

    #[test]
    fn test_parse_invalid_value() {
        let xml = r#"<HealthReadings>
  <Reading>
    <Id>1</Id>
    <DeviceId>dev-a</DeviceId>
    <DeviceType>heart_rate</DeviceType>
    <Value>not-a-number</Value>
    <Unit>BPM</Unit>
    <Timestamp>2024-01-15T10:30:00+00:00</Timestamp>
    <Notes></Notes>
  </Reading>
</HealthReadings>"#;

        let err = readings_from_xml(xml).unwrap_err();
        assert!(matches!(
            err,
            ExportError::InvalidElement { element: "Value", .. }
        ));
    }

    #[test]
    fn test_parse_invalid_timestamp() {
        let xml = r#"<HealthReadings>
  <Reading>
    <Id>1</Id>
    <DeviceId>dev-a</DeviceId>
    <DeviceType>heart_rate</DeviceType>
    <Value>72</Value>
    <Unit>BPM</Unit>
    <Timestamp>yesterday</Timestamp>
    <Notes></Notes>
  </Reading>
</HealthReadings>"#;

        let err = readings_from_xml(xml).unwrap_err();
        assert!(matches!(
            err,
            ExportError::InvalidElement {
                element: "Timestamp",
                ..
            }
        ));
    }
}
