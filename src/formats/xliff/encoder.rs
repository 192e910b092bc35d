use std::collections::HashMap;

use log::debug;

use super::XliffDialect;
use crate::export::ExportTarget;
use crate::reference::EntryId;
use crate::xml::{Document, NodeId};

/// Render a target as XLIFF in the given dialect.
///
/// Groups appear in the order of their first entry, units keep insertion
/// order inside their group.
pub fn render(dialect: XliffDialect, target: &ExportTarget) -> Vec<u8> {
    build_document(dialect, target).to_xml_string().into_bytes()
}

/// The document [`render`] serializes
pub fn build_document(dialect: XliffDialect, target: &ExportTarget) -> Document {
    let mut doc = Document::new();
    let container = dialect.create_skeleton(&mut doc, target);

    let mut groups: HashMap<(&str, Option<EntryId>), NodeId> = HashMap::new();
    let mut unit_count = 0usize;

    for entry in target.entries() {
        let reference = &entry.reference;
        let key = (reference.content_type.as_str(), reference.entry_id());
        let group = match groups.get(&key) {
            Some(group) => *group,
            None => {
                let group = dialect.create_group(&mut doc, container, groups.len() + 1, reference);
                groups.insert(key, group);
                group
            }
        };

        unit_count += 1;
        dialect.add_valid_entry(
            &mut doc,
            group,
            unit_count,
            reference,
            &entry.source,
            &entry.target,
        );
    }

    debug!(
        "Built XLIFF {} document with {} groups and {} units",
        dialect.version_string(),
        groups.len(),
        unit_count
    );
    doc
}
