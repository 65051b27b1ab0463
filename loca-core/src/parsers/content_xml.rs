use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

use crate::model::entry::{ContentRecord, TranslationEntry};

/// Fixed metadata written on every `content` element.
const CONTENT_VERSION: &str = "1";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ContentDecodeError {
    #[error("missing <contentList> root element")]
    MissingContentList,

    #[error("content list has no entries")]
    Empty,

    #[error("content #{index} has no contentuid attribute")]
    MissingAttribute { index: usize },

    #[error("content #{index} is not closed")]
    Unterminated { index: usize },

    #[error("content #{index}: unknown entity `&{entity};`")]
    InvalidEntity { index: usize, entity: String },
}

fn comment_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)<!--.*?-->").expect("static regex"))
}

fn root_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<contentList\b").expect("static regex"))
}

fn open_tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<content\b").expect("static regex"))
}

// Groups:
// - attrs: everything between the tag name and the tag end
// - body: element text, absent for the self-closing form
fn content_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)<content\b(?P<attrs>[^>]*?)(?:/>|>(?P<body>.*?)</content\s*>)")
            .expect("static regex")
    })
}

fn uid_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"\bcontentuid\s*=\s*(?:"(?P<dq>[^"]*)"|'(?P<sq>[^']*)')"#)
            .expect("static regex")
    })
}

/// Parses a content list into records, in document order.
pub fn decode(text: &str) -> Result<Vec<ContentRecord>, ContentDecodeError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    // Commented-out elements are not records.
    let stripped = comment_re().replace_all(text, "");
    let text: &str = &stripped;

    if !root_re().is_match(text) {
        return Err(ContentDecodeError::MissingContentList);
    }

    let mut records = Vec::new();

    for (index, caps) in content_re().captures_iter(text).enumerate() {
        let attrs = caps.name("attrs").map(|m| m.as_str()).unwrap_or("");

        let raw_id = uid_re()
            .captures(attrs)
            .and_then(|c| c.name("dq").or_else(|| c.name("sq")))
            .ok_or(ContentDecodeError::MissingAttribute { index })?;

        let id = unescape(raw_id.as_str(), index)?;
        let body = caps.name("body").map(|m| m.as_str()).unwrap_or("");
        let text = decode_text(body, index)?;

        records.push(ContentRecord { id, text });
    }

    let opened = open_tag_re().find_iter(text).count();
    if opened > records.len() {
        return Err(ContentDecodeError::Unterminated {
            index: records.len(),
        });
    }

    if records.is_empty() {
        return Err(ContentDecodeError::Empty);
    }

    Ok(records)
}

/// Serializes records back into a content list.
pub fn encode(records: &[ContentRecord]) -> String {
    let mut out = String::with_capacity(64 + records.len() * 64);

    out.push_str(r#"<?xml version="1.0" encoding="utf-8"?>"#);
    out.push('\n');
    out.push_str("<contentList>\n");

    for r in records {
        out.push_str(r#"  <content contentuid=""#);
        out.push_str(&escape(&r.id, true));
        out.push_str(r#"" version=""#);
        out.push_str(CONTENT_VERSION);
        out.push_str(r#"">"#);
        out.push_str(&escape(&r.text, false));
        out.push_str("</content>\n");
    }

    out.push_str("</contentList>\n");
    out
}

/// What gets written on save: ids with their translated text.
pub fn records_for_write(entries: &[TranslationEntry]) -> Vec<ContentRecord> {
    entries
        .iter()
        .map(|e| ContentRecord::new(e.id.clone(), e.translated_text.clone()))
        .collect()
}

fn decode_text(body: &str, index: usize) -> Result<String, ContentDecodeError> {
    const CDATA_OPEN: &str = "<![CDATA[";
    const CDATA_CLOSE: &str = "]]>";

    let mut out = String::with_capacity(body.len());
    let mut rest = body;

    while let Some(start) = rest.find(CDATA_OPEN) {
        out.push_str(&unescape(&rest[..start], index)?);

        let inner = &rest[start + CDATA_OPEN.len()..];
        let end = inner
            .find(CDATA_CLOSE)
            .ok_or(ContentDecodeError::Unterminated { index })?;

        out.push_str(&inner[..end]);
        rest = &inner[end + CDATA_CLOSE.len()..];
    }

    out.push_str(&unescape(rest, index)?);
    Ok(out)
}

fn unescape(input: &str, index: usize) -> Result<String, ContentDecodeError> {
    if !input.contains('&') {
        return Ok(input.to_string());
    }

    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp + 1..];

        let semi = tail.find(';').ok_or_else(|| ContentDecodeError::InvalidEntity {
            index,
            entity: tail.chars().take(8).collect(),
        })?;
        let entity = &tail[..semi];

        let ch = match entity {
            "lt" => Some('<'),
            "gt" => Some('>'),
            "amp" => Some('&'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            _ => numeric_entity(entity),
        };

        match ch {
            Some(c) => out.push(c),
            None => {
                return Err(ContentDecodeError::InvalidEntity {
                    index,
                    entity: entity.to_string(),
                })
            }
        }

        rest = &tail[semi + 1..];
    }

    out.push_str(rest);
    Ok(out)
}

fn numeric_entity(entity: &str) -> Option<char> {
    let digits = entity.strip_prefix('#')?;
    let code = match digits.strip_prefix('x').or_else(|| digits.strip_prefix('X')) {
        Some(hex) => u32::from_str_radix(hex, 16).ok()?,
        None => digits.parse::<u32>().ok()?,
    };
    char::from_u32(code)
}

fn escape(input: &str, attribute: bool) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<contentList>
  <content contentuid="h0001" version="1">Hello</content>
  <content contentuid="h0002" version="3">&lt;LSTag&gt;Fire&lt;/LSTag&gt; &amp; ice</content>
  <content contentuid='h0003' version="1"/>
</contentList>
"#;

    #[test]
    fn decodes_records_in_file_order() {
        let records = decode(SAMPLE).unwrap();

        assert_eq!(
            records,
            vec![
                ContentRecord::new("h0001", "Hello"),
                ContentRecord::new("h0002", "<LSTag>Fire</LSTag> & ice"),
                ContentRecord::new("h0003", ""),
            ]
        );
    }

    #[test]
    fn commented_content_is_ignored() {
        let xml = "<contentList>\n<!-- <content contentuid=\"x\" version=\"1\">old</content> -->\n<content contentuid=\"a\" version=\"1\">A</content>\n<!--\n<content contentuid=\"y\">unclosed\n-->\n</contentList>";

        assert_eq!(decode(xml).unwrap(), vec![ContentRecord::new("a", "A")]);
    }

    #[test]
    fn strips_bom() {
        let text = format!("\u{feff}{SAMPLE}");
        assert_eq!(decode(&text).unwrap().len(), 3);
    }

    #[test]
    fn missing_root_is_rejected() {
        let err = decode(r#"<root><content contentuid="a">x</content></root>"#).unwrap_err();
        assert_eq!(err, ContentDecodeError::MissingContentList);
    }

    #[test]
    fn empty_list_is_rejected() {
        let err = decode("<contentList></contentList>").unwrap_err();
        assert_eq!(err, ContentDecodeError::Empty);
    }

    #[test]
    fn missing_uid_reports_index() {
        let xml = r#"<contentList>
            <content contentuid="a">x</content>
            <content version="1">y</content>
        </contentList>"#;
        assert_eq!(
            decode(xml).unwrap_err(),
            ContentDecodeError::MissingAttribute { index: 1 }
        );
    }

    #[test]
    fn unclosed_content_is_rejected() {
        let xml = r#"<contentList>
            <content contentuid="a">x</content>
            <content contentuid="b">y
        </contentList>"#;
        assert!(matches!(
            decode(xml).unwrap_err(),
            ContentDecodeError::Unterminated { .. }
        ));
    }

    #[test]
    fn unknown_entity_is_rejected() {
        let xml = r#"<contentList><content contentuid="a">&nbsp;</content></contentList>"#;
        assert_eq!(
            decode(xml).unwrap_err(),
            ContentDecodeError::InvalidEntity {
                index: 0,
                entity: "nbsp".into()
            }
        );
    }

    #[test]
    fn numeric_references_and_cdata() {
        let xml = r#"<contentList><content contentuid="a">&#65;&#x42;<![CDATA[<b>&raw]]></content></contentList>"#;
        assert_eq!(decode(xml).unwrap()[0].text, "AB<b>&raw");
    }

    #[test]
    fn encode_writes_fixed_version_and_escapes() {
        let xml = encode(&[ContentRecord::new("h\"1", "a < b & c")]);

        assert!(xml.starts_with(r#"<?xml version="1.0" encoding="utf-8"?>"#));
        assert!(xml.contains(
            r#"<content contentuid="h&quot;1" version="1">a &lt; b &amp; c</content>"#
        ));
        assert!(xml.trim_end().ends_with("</contentList>"));
    }

    #[test]
    fn round_trip_preserves_id_and_text() {
        let records = vec![
            ContentRecord::new("h1", "plain"),
            ContentRecord::new("h2", "multi\nline <tag> & 'quotes' \"too\""),
            ContentRecord::new("h3", ""),
            ContentRecord::new("h4", "日本語テキスト"),
        ];

        assert_eq!(decode(&encode(&records)).unwrap(), records);
    }

    #[test]
    fn records_for_write_uses_translated_text() {
        let mut e = TranslationEntry::from_record(0, ContentRecord::new("h1", "Hello"));
        e.translated_text = "Hallo".into();

        assert_eq!(
            records_for_write(&[e]),
            vec![ContentRecord::new("h1", "Hallo")]
        );
    }
}
