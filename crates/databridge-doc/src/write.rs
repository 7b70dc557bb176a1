//! [`Document`] to XML text.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::document::{Document, NodeId};
use crate::error::{DocError, DocResult};
use crate::parse::FORM_ATTR;

impl Document {
    /// Serialize the document as indented UTF-8 XML.
    ///
    /// The form reference, when set, is written as the root's first attribute.
    pub fn to_xml(&self) -> DocResult<String> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))
            .map_err(write_error)?;
        self.write_node(&mut writer, self.root())?;
        String::from_utf8(writer.into_inner()).map_err(|err| DocError::Write(err.to_string()))
    }

    fn write_node(&self, writer: &mut Writer<Vec<u8>>, id: NodeId) -> DocResult<()> {
        let name = self.name(id);
        let mut start = BytesStart::new(name);
        if id == self.root() {
            if let Some(form_ref) = self.form_ref() {
                start.push_attribute((FORM_ATTR, form_ref));
            }
        }
        for (key, value) in self.attrs(id) {
            start.push_attribute((key.as_str(), value.as_str()));
        }

        let children = self.children(id);
        let value = self.value(id);
        if children.is_empty() && value.is_none() {
            return writer.write_event(Event::Empty(start)).map_err(write_error);
        }

        writer.write_event(Event::Start(start)).map_err(write_error)?;
        if let Some(value) = value {
            writer
                .write_event(Event::Text(BytesText::new(value)))
                .map_err(write_error)?;
        }
        for &child in children {
            self.write_node(writer, child)?;
        }
        writer
            .write_event(Event::End(BytesEnd::new(name)))
            .map_err(write_error)
    }
}

fn write_error(err: quick_xml::Error) -> DocError {
    DocError::Write(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_form_ref_first_and_escapes_text() {
        let mut doc = Document::new("collaborator");
        doc.set_form_ref(Some("x-local://wtv/wtv_collaborator.xmd".into()));
        let root = doc.root();
        doc.set_attr(root, "lang", "en");
        let name = doc.append_child(root, "fullname");
        doc.set_value(name, Some("Smith & <Sons>".into()));
        doc.append_child(root, "position_id");

        let xml = doc.to_xml().unwrap();
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\"?>"));
        assert!(xml.contains(
            r#"<collaborator SPXML-FORM="x-local://wtv/wtv_collaborator.xmd" lang="en">"#
        ));
        assert!(xml.contains("<fullname>Smith &amp; &lt;Sons&gt;</fullname>"));
        assert!(xml.contains("<position_id/>"));
    }

    #[test]
    fn written_text_parses_back_to_the_same_tree() {
        let source = r#"<person SPXML-FORM="person.xmd">
            <name>Ada</name>
            <tags><tag>a</tag><tag>b</tag></tags>
            <note/>
        </person>"#;
        let doc = Document::parse(source).unwrap();
        let reparsed = Document::parse(&doc.to_xml().unwrap()).unwrap();

        assert_eq!(reparsed.form_ref(), Some("person.xmd"));
        let names = |d: &Document| {
            d.descendants(d.root())
                .into_iter()
                .map(|n| (d.name(n).to_owned(), d.value(n).map(str::to_owned)))
                .collect::<Vec<_>>()
        };
        assert_eq!(names(&doc), names(&reparsed));
    }
}
