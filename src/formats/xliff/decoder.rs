use log::{debug, warn};

use super::dialect::TextTag;
use super::{XliffDialect, XliffVersion};
use crate::errors::ImportError;
use crate::import::{EntryDecoder, FileHeader, ImportEntry, MalformedPolicy};
use crate::reference::{EntryId, RefContext};
use crate::xml::{DepthFirst, Document, NodeId, Tree};
use crate::xml::document::local_name;

/// XLIFF decoder for every supported version.
///
/// The whole document is parsed up front; units are then handed out one at
/// a time by walking the tree depth-first.
pub struct XliffDecoder {
    doc: Document,
    dialect: XliffDialect,
    header: FileHeader,
    walker: DepthFirst<NodeId>,
    policy: MalformedPolicy,
    position: usize,
    skipped: usize,
}

impl XliffDecoder {
    /// Parse and pick the dialect from the declared version
    pub fn parse(text: &str, policy: MalformedPolicy) -> Result<Self, ImportError> {
        let doc = Document::from_xml(text);
        if doc.has_errors() {
            return Err(ImportError::MalformedXml(doc.get_errors().to_vec()));
        }

        let declared = doc
            .select_value("/xliff/@version")
            .ok_or(ImportError::MissingVersion)?;
        let version = XliffVersion::from_declared(&declared)?;
        let dialect = version.dialect();
        let header = dialect.read_header(&doc);
        debug!(
            "Parsed XLIFF {} (read as {}), target language {:?}",
            declared, version, header.target_language
        );

        let walker = DepthFirst::new(doc.root());
        Ok(Self {
            doc,
            dialect,
            header,
            walker,
            policy,
            position: 0,
            skipped: 0,
        })
    }

    /// Dialect chosen for this file
    pub fn dialect(&self) -> XliffDialect {
        self.dialect
    }

    fn next_unit(&mut self) -> Option<NodeId> {
        let unit_tag = self.dialect.unit_tag();
        while let Some(node) = self.walker.next_node(&self.doc) {
            if self.doc.tag(node).map(local_name) == Some(unit_tag) {
                return Some(node);
            }
        }
        None
    }

    fn unit_to_entry(&self, unit: NodeId) -> Result<ImportEntry, String> {
        let doc = &self.doc;
        let dialect = &self.dialect;
        let unit_id = doc.attr_local(unit, "id").unwrap_or("?");

        let group = enclosing_group(doc, unit)
            .ok_or_else(|| format!("unit {} is not inside a group", unit_id))?;
        let content_type = dialect
            .group_content_type(doc, group)
            .ok_or_else(|| format!("group of unit {} declares no content type", unit_id))?;

        let mut context =
            RefContext::from_flat_string(dialect.unit_context(doc, unit).unwrap_or_default());
        if context.encoding.is_empty() {
            if let Some(encoding) = doc.attr_local(unit, "extradata") {
                context.encoding = encoding.to_string();
            }
        }
        if context.field_type.is_empty() {
            return Err(format!("unit {} has no field type", unit_id));
        }
        let id = EntryId::from_context(&context)
            .or_else(|| dialect.group_entry_name(doc, group).map(id_from_name))
            .ok_or_else(|| format!("unit {} has no content or field id", unit_id))?;

        let sources = dialect.text_elements(doc, unit, TextTag::Source);
        let source = concat_text(doc, &sources);
        if source.is_empty() {
            return Err(format!("unit {} has no source text", unit_id));
        }

        let targets = dialect.text_elements(doc, unit, TextTag::Target);
        if targets
            .iter()
            .any(|t| doc.subtree_contains_disallowed_node_type(*t))
        {
            return Err(format!("unit {} target contains markup we cannot import", unit_id));
        }

        Ok(ImportEntry {
            content_type,
            id,
            context,
            source,
            translation: concat_text(doc, &targets),
        })
    }
}

impl EntryDecoder for XliffDecoder {
    fn header(&self) -> &FileHeader {
        &self.header
    }

    fn get_next_entry(&mut self) -> Result<Option<ImportEntry>, ImportError> {
        while let Some(unit) = self.next_unit() {
            self.position += 1;
            match self.unit_to_entry(unit) {
                Ok(entry) => return Ok(Some(entry)),
                Err(reason) => {
                    self.policy
                        .handle(self.position, reason, &mut self.skipped)?;
                }
            }
        }
        if self.skipped > 0 {
            warn!("{} XLIFF units were skipped", self.skipped);
        }
        Ok(None)
    }

    fn skipped(&self) -> usize {
        self.skipped
    }
}

fn enclosing_group(doc: &Document, node: NodeId) -> Option<NodeId> {
    let mut current = doc.parent(node);
    while let Some(parent) = current {
        if doc.tag(parent).map(local_name) == Some("group") {
            return Some(parent);
        }
        current = doc.parent(parent);
    }
    None
}

// Group names are numeric for content items, anything else is a field id
fn id_from_name(name: &str) -> EntryId {
    match name.parse::<u64>() {
        Ok(id) if id > 0 => EntryId::Content(id),
        _ => EntryId::Field(name.to_string()),
    }
}

fn concat_text(doc: &Document, nodes: &[NodeId]) -> String {
    nodes.iter().map(|node| doc.text_content(*node)).collect()
}
