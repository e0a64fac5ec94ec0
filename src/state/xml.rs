/// Animation list XML
///
/// The catalog is persisted as:
///
/// ```xml
/// <?xml version="1.0" encoding="utf-8"?>
/// <Graphics>
///   <!--Entries in Mob tab-->
///   ...
///   <Mob name="Orc" body="17" type="0"/>
///   <Equip name="Plate Helm" body="5001" type="4"/>
/// </Graphics>
/// ```
///
/// The comments are regenerated on save and ignored on load.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use super::data::Category;
use crate::error::CatalogError;

const ROOT: &str = "Graphics";

const HEADER_COMMENTS: [&str; 4] = [
    "Entries in Mob tab",
    "Name=Displayed name",
    "body=Graphic",
    "type=0:Monster, 1:Sea, 2:Animal, 3:Human/Equipment",
];

/// One `Mob` or `Equip` element, as stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Element kind the record was stored as
    pub kind: Category,
    pub name: String,
    pub body: u32,
    pub type_tag: i64,
}

fn kind_for(name: &[u8]) -> Option<Category> {
    Category::ALL
        .into_iter()
        .find(|c| c.xml_tag().as_bytes() == name)
}

fn parse_field<T: std::str::FromStr>(
    kind: Category,
    attribute: &'static str,
    value: Option<String>,
) -> Result<T, CatalogError> {
    let value = value.unwrap_or_default();
    value.trim().parse::<T>().map_err(|_| CatalogError::Parse {
        record: kind.xml_tag().to_string(),
        attribute,
        value,
    })
}

fn record_from(element: &BytesStart<'_>, kind: Category) -> Result<Record, CatalogError> {
    let mut name = String::new();
    let mut body = None;
    let mut type_tag = None;

    for attr in element.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        let value = attr
            .unescape_value()
            .map_err(quick_xml::Error::from)?
            .into_owned();
        match attr.key.as_ref() {
            b"name" => name = value,
            b"body" => body = Some(value),
            b"type" => type_tag = Some(value),
            _ => {}
        }
    }

    Ok(Record {
        kind,
        name,
        body: parse_field(kind, "body", body)?,
        type_tag: parse_field(kind, "type", type_tag)?,
    })
}

/// Parse every record directly under the `Graphics` root, in document order
pub fn parse(xml: &str) -> Result<Vec<Record>, CatalogError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut records = Vec::new();
    let mut depth = 0usize;
    let mut root_seen = false;
    let mut in_root = false;

    loop {
        let (element, has_children) = match reader.read_event()? {
            Event::Start(e) => (e, true),
            Event::Empty(e) => (e, false),
            Event::End(_) => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    in_root = false;
                }
                continue;
            }
            Event::Eof => break,
            _ => continue,
        };

        if depth == 0 && element.name().as_ref() == ROOT.as_bytes() {
            root_seen = true;
            in_root = has_children;
        } else if depth == 1 && in_root {
            if let Some(kind) = kind_for(element.name().as_ref()) {
                records.push(record_from(&element, kind)?);
            }
        }

        if has_children {
            depth += 1;
        }
    }

    if !root_seen {
        return Err(CatalogError::MissingRoot);
    }
    Ok(records)
}

/// Serialize records (already in the order they should be written)
pub fn write(records: &[Record]) -> Result<String, CatalogError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
    writer.write_event(Event::Start(BytesStart::new(ROOT)))?;
    for comment in HEADER_COMMENTS {
        writer.write_event(Event::Comment(BytesText::new(comment)))?;
    }

    for record in records {
        let body = record.body.to_string();
        let type_tag = record.type_tag.to_string();
        let mut element = BytesStart::new(record.kind.xml_tag());
        element.push_attribute(("name", record.name.as_str()));
        element.push_attribute(("body", body.as_str()));
        element.push_attribute(("type", type_tag.as_str()));
        writer.write_event(Event::Empty(element))?;
    }

    writer.write_event(Event::End(BytesEnd::new(ROOT)))?;

    let mut xml = String::from_utf8(writer.into_inner())
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    xml.push('\n');
    Ok(xml)
}
