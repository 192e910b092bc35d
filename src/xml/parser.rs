/*!
 * quick-xml driven parser feeding a [`Document`](super::document::Document).
 *
 * The reader runs with end-name checking off; tag balance is tracked here so
 * a mismatch is recorded and recovered from instead of stopping the parse.
 * quick-xml never reads a DTD, so no entity defined in one can be expanded;
 * a DOCTYPE in XML mode is additionally reported as an error and skipped.
 */

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ParseMode {
    Xml,
    Html,
}

#[cfg(not(feature = "xml"))]
pub(crate) fn parse(_text: &str, _mode: ParseMode) -> super::document::Document {
    let mut doc = super::document::Document::new();
    doc.push_error("XML support is not compiled in (enable the `xml` feature)");
    doc
}

#[cfg(feature = "xml")]
pub(crate) use engine::parse;

#[cfg(feature = "xml")]
mod engine {
    use std::borrow::Cow;

    use log::trace;
    use once_cell::sync::Lazy;
    use quick_xml::events::{BytesStart, Event};
    use quick_xml::reader::Reader;
    use regex::{Captures, Regex};

    use super::ParseMode;
    use crate::xml::document::{Document, NodeId};
    use crate::xml::traversal::Tree;

    // @const: Elements that never have content in HTML
    const HTML_VOID_ELEMENTS: &[&str] = &[
        "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
        "source", "track", "wbr",
    ];

    const HTML_FRAGMENT_ROOT: &str = "body";

    // @const: Entity or character reference inside HTML text
    static HTML_ENTITY_REGEX: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"&(#[0-9]+|#[xX][0-9a-fA-F]+|[a-zA-Z][a-zA-Z0-9]*);").unwrap()
    });

    struct Builder {
        doc: Document,
        stack: Vec<NodeId>,
        mode: ParseMode,
        // stack depth that belongs to the synthetic roots and can never be closed
        floor: usize,
    }

    pub(crate) fn parse(text: &str, mode: ParseMode) -> Document {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);

        let mut doc = Document::new();
        let mut stack = vec![doc.root()];
        if mode == ParseMode::Html {
            let root = doc.root();
            stack.push(doc.create_element(root, HTML_FRAGMENT_ROOT));
        }
        let floor = stack.len();
        let mut builder = Builder {
            doc,
            stack,
            mode,
            floor,
        };

        let mut reader = Reader::from_str(text);
        reader.trim_text(false);
        reader.expand_empty_elements(false);
        reader.check_end_names(false);

        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) => {
                    let node = builder.open_element(&e);
                    let void = builder.mode == ParseMode::Html
                        && builder
                            .doc
                            .tag(node)
                            .is_some_and(|name| HTML_VOID_ELEMENTS.contains(&name));
                    if !void {
                        builder.stack.push(node);
                    }
                }
                Ok(Event::Empty(e)) => {
                    builder.open_element(&e);
                }
                Ok(Event::End(e)) => {
                    let name = builder.element_name(e.name().as_ref());
                    builder.close_element(&name);
                }
                Ok(Event::Text(e)) => {
                    let raw = String::from_utf8_lossy(&e).into_owned();
                    let text = match e.unescape() {
                        Ok(text) => text.into_owned(),
                        Err(err) => builder.recover_text(&raw, &err.to_string()),
                    };
                    builder.text(&text);
                }
                Ok(Event::CData(e)) => {
                    let text = String::from_utf8_lossy(&e.into_inner()).into_owned();
                    builder.text(&text);
                }
                Ok(Event::Comment(e)) => {
                    let parent = builder.current();
                    builder
                        .doc
                        .append_comment(parent, &String::from_utf8_lossy(&e));
                }
                Ok(Event::PI(e)) => {
                    let parent = builder.current();
                    builder
                        .doc
                        .append_processing_instruction(parent, &String::from_utf8_lossy(&e));
                }
                Ok(Event::Decl(_)) => {}
                Ok(Event::DocType(_)) => {
                    if builder.mode == ParseMode::Xml {
                        builder
                            .doc
                            .push_error("DOCTYPE declarations are not allowed; declaration ignored");
                    }
                }
                Ok(Event::Eof) => break,
                Err(err) => {
                    // quick-xml cannot resynchronize after a syntax error
                    builder.doc.push_error(format!(
                        "Syntax error at byte {}: {}",
                        reader.buffer_position(),
                        err
                    ));
                    break;
                }
            }
        }

        builder.finish()
    }

    impl Builder {
        fn current(&self) -> NodeId {
            // the stack always holds the document root
            self.stack[self.stack.len() - 1]
        }

        fn element_name(&self, raw: &[u8]) -> String {
            let name = String::from_utf8_lossy(raw).into_owned();
            match self.mode {
                ParseMode::Xml => name,
                ParseMode::Html => name.to_lowercase(),
            }
        }

        fn open_element(&mut self, start: &BytesStart<'_>) -> NodeId {
            let name = self.element_name(start.name().as_ref());
            let parent = self.current();

            if self.mode == ParseMode::Xml
                && parent == self.doc.root()
                && self.doc.document_element().is_some()
            {
                self.doc
                    .push_error(format!("Extra root element <{}>", name));
            }

            let node = self.doc.create_element(parent, &name);
            let attributes = match self.mode {
                ParseMode::Xml => start.attributes(),
                ParseMode::Html => start.html_attributes(),
            };
            for attribute in attributes {
                let attribute = match attribute {
                    Ok(attribute) => attribute,
                    Err(err) => {
                        self.doc
                            .push_error(format!("Invalid attribute on <{}>: {}", name, err));
                        break;
                    }
                };
                let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
                let raw = String::from_utf8_lossy(&attribute.value).into_owned();
                let value = match attribute.unescape_value() {
                    Ok(value) => value.into_owned(),
                    Err(err) => self.recover_text(&raw, &err.to_string()),
                };
                self.doc.set_attribute(node, &key, &value);
            }
            node
        }

        fn close_element(&mut self, name: &str) {
            let open = &self.stack[self.floor..];
            let Some(position) = open
                .iter()
                .rposition(|id| self.doc.tag(*id) == Some(name))
            else {
                if self.mode == ParseMode::Xml {
                    self.doc
                        .push_error(format!("Unexpected end tag </{}>", name));
                } else {
                    trace!("Ignoring stray end tag </{}>", name);
                }
                return;
            };

            let index = self.floor + position;
            if self.mode == ParseMode::Xml {
                for unclosed in &self.stack[index + 1..] {
                    let unclosed_name = self.doc.tag(*unclosed).unwrap_or_default().to_string();
                    self.doc.push_error(format!(
                        "End tag </{}> found while <{}> is still open",
                        name, unclosed_name
                    ));
                }
            }
            self.stack.truncate(index);
        }

        fn text(&mut self, text: &str) {
            let parent = self.current();
            if parent == self.doc.root() {
                if !text.trim().is_empty() {
                    self.doc
                        .push_error(format!("Text outside the root element: {:?}", text.trim()));
                }
                return;
            }
            self.doc.append_text(parent, text);
        }

        fn recover_text(&mut self, raw: &str, reason: &str) -> String {
            match self.mode {
                ParseMode::Xml => {
                    self.doc
                        .push_error(format!("Invalid entity reference: {}", reason));
                    raw.to_string()
                }
                ParseMode::Html => lenient_unescape(raw),
            }
        }

        fn finish(mut self) -> Document {
            if self.mode == ParseMode::Xml {
                let unclosed: Vec<String> = self.stack[self.floor..]
                    .iter()
                    .map(|id| self.doc.tag(*id).unwrap_or_default().to_string())
                    .collect();
                for name in unclosed {
                    self.doc
                        .push_error(format!("Element <{}> is never closed", name));
                }
                if self.doc.document_element().is_none() {
                    self.doc.push_error("Document has no root element");
                }
            }
            self.doc
        }
    }

    // Decode the references we know and keep everything else as written
    fn lenient_unescape(raw: &str) -> String {
        HTML_ENTITY_REGEX
            .replace_all(raw, |caps: &Captures<'_>| {
                let entity = &caps[1];
                let decoded: Option<Cow<'_, str>> = match entity {
                    "amp" => Some("&".into()),
                    "lt" => Some("<".into()),
                    "gt" => Some(">".into()),
                    "quot" => Some("\"".into()),
                    "apos" => Some("'".into()),
                    "nbsp" => Some("\u{a0}".into()),
                    _ => entity
                        .strip_prefix("#x")
                        .or_else(|| entity.strip_prefix("#X"))
                        .map(|hex| u32::from_str_radix(hex, 16))
                        .or_else(|| entity.strip_prefix('#').map(str::parse::<u32>))
                        .and_then(Result::ok)
                        .and_then(char::from_u32)
                        .map(|c| c.to_string().into()),
                };
                decoded.unwrap_or_else(|| caps[0].to_string().into()).into_owned()
            })
            .into_owned()
    }

}
