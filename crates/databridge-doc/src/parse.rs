//! XML text to [`Document`].

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::document::{Document, NodeId};
use crate::error::{DocError, DocResult};

/// Root attribute naming the form a document conforms to.
pub const FORM_ATTR: &str = "SPXML-FORM";

impl Document {
    /// Parse XML text into a document.
    ///
    /// Whitespace-only text is dropped and element text is trimmed. The
    /// root's [`FORM_ATTR`] attribute is lifted into [`Document::form_ref`].
    /// Comments, processing instructions and doctype declarations are ignored.
    pub fn parse(text: &str) -> DocResult<Self> {
        let mut reader = Reader::from_str(text);
        reader.trim_text(true);

        let mut doc: Option<Document> = None;
        let mut open: Vec<NodeId> = Vec::new();

        loop {
            let event = match reader.read_event() {
                Ok(event) => event,
                Err(err) => return Err(parse_error(reader.buffer_position(), err)),
            };
            match event {
                Event::Start(start) => {
                    let node = open_element(&mut doc, &open, &start, reader.buffer_position())?;
                    open.push(node);
                }
                Event::Empty(start) => {
                    open_element(&mut doc, &open, &start, reader.buffer_position())?;
                }
                Event::End(_) => {
                    open.pop();
                }
                Event::Text(text) => {
                    let position = reader.buffer_position();
                    let text = text.unescape().map_err(|err| parse_error(position, err))?;
                    append_text(&mut doc, &open, &text, position)?;
                }
                Event::CData(data) => {
                    let position = reader.buffer_position();
                    let bytes = data.into_inner();
                    let text = std::str::from_utf8(&bytes).map_err(|err| DocError::Parse {
                        position,
                        reason: err.to_string(),
                    })?;
                    append_text(&mut doc, &open, text, position)?;
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if !open.is_empty() {
            return Err(DocError::Parse {
                position: reader.buffer_position(),
                reason: "unexpected end of input inside an element".to_string(),
            });
        }
        doc.ok_or(DocError::NoRoot)
    }
}

fn parse_error(position: usize, err: quick_xml::Error) -> DocError {
    DocError::Parse {
        position,
        reason: err.to_string(),
    }
}

fn open_element(
    doc: &mut Option<Document>,
    open: &[NodeId],
    start: &BytesStart<'_>,
    position: usize,
) -> DocResult<NodeId> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();

    let mut attrs = Vec::new();
    for attr in start.attributes() {
        let attr = attr.map_err(|err| DocError::Parse {
            position,
            reason: err.to_string(),
        })?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|err| parse_error(position, err))?
            .into_owned();
        attrs.push((key, value));
    }

    match (doc.as_mut(), open.last()) {
        (Some(doc), Some(&parent)) => {
            let node = doc.append_child(parent, name);
            for (key, value) in attrs {
                doc.set_attr(node, key, value);
            }
            Ok(node)
        }
        (Some(_), None) => Err(DocError::MultipleRoots),
        (None, _) => {
            let mut created = Document::new(name);
            let root = created.root();
            for (key, value) in attrs {
                if key == FORM_ATTR {
                    created.set_form_ref(Some(value));
                } else {
                    created.set_attr(root, key, value);
                }
            }
            *doc = Some(created);
            Ok(root)
        }
    }
}

fn append_text(
    doc: &mut Option<Document>,
    open: &[NodeId],
    text: &str,
    position: usize,
) -> DocResult<()> {
    let (Some(doc), Some(&node)) = (doc.as_mut(), open.last()) else {
        if text.trim().is_empty() {
            return Ok(());
        }
        return Err(DocError::Parse {
            position,
            reason: "text outside of the root element".to_string(),
        });
    };
    let mut value = doc.value(node).unwrap_or_default().to_owned();
    value.push_str(text);
    doc.set_value(node, Some(value));
    Ok(())
}
