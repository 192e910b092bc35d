use crate::export::ExportTarget;
use crate::import::FileHeader;
use crate::reference::Ref;
use crate::xml::{Document, NodeId};

use super::{NS_METADATA_2, NS_XLIFF_1, NS_XLIFF_2, TOOL_CATEGORY, XliffVersion};

const XLIFF_TAG: &str = "xliff";
const FILE_TAG: &str = "file";
const GROUP_TAG: &str = "group";
const SOURCE_TAG: &str = "source";
const TARGET_TAG: &str = "target";
const NOTE_TAG: &str = "note";

const UNIT_TAG_1: &str = "trans-unit";
const UNIT_TAG_2: &str = "unit";
const EXTRADATA_1: &str = "extradata";
const EXTRADATA_2: &str = "xml:extradata";

const PROP_SITE_REFERENCE: &str = "site-reference";
const PROP_GENERATOR: &str = "generator";
const PROP_GENERATOR_VERSION: &str = "generator-version";

/// Structural generation of an XLIFF version
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Family {
    /// `trans-unit`, `restype`/`resname`, header props
    V1,
    /// `unit`/`segment`, `srcLang`/`trgLang`, metadata module
    V2,
}

/// Everything that differs between the XLIFF versions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XliffDialect {
    version: XliffVersion,
    family: Family,
}

impl XliffDialect {
    pub fn new(version: XliffVersion) -> Self {
        let family = match version {
            XliffVersion::V12 => Family::V1,
            XliffVersion::V20 | XliffVersion::V21 => Family::V2,
        };
        Self { version, family }
    }

    pub fn version(&self) -> XliffVersion {
        self.version
    }

    pub fn family(&self) -> Family {
        self.family
    }

    /// Value of the root `version` attribute
    pub fn version_string(&self) -> &'static str {
        self.version.as_str()
    }

    /// Name of the element holding one source/target pair
    pub fn unit_tag(&self) -> &'static str {
        match self.family {
            Family::V1 => UNIT_TAG_1,
            Family::V2 => UNIT_TAG_2,
        }
    }

    /// Attribute carrying a structured value's encoding on a unit
    pub fn extradata_attribute(&self) -> &'static str {
        match self.family {
            Family::V1 => EXTRADATA_1,
            Family::V2 => EXTRADATA_2,
        }
    }

    // -- encoding ---------------------------------------------------------

    /// Root, file and header elements. Returns the element groups are appended to.
    pub(crate) fn create_skeleton(&self, doc: &mut Document, target: &ExportTarget) -> NodeId {
        let options = target.options();
        let original = format!("{}_{}", target.source_language(), target.target_language());
        let props = [
            (PROP_SITE_REFERENCE, options.site_reference.as_str()),
            (PROP_GENERATOR, options.generator_name.as_str()),
            (PROP_GENERATOR_VERSION, options.generator_version.as_str()),
        ];

        let root = doc.root();
        let xliff = doc.create_element(root, XLIFF_TAG);
        doc.set_attribute(xliff, "version", self.version_string());

        match self.family {
            Family::V1 => {
                doc.set_attribute(xliff, "xmlns", NS_XLIFF_1);

                let file = doc.create_element(xliff, FILE_TAG);
                doc.set_attribute(file, "original", &original);
                doc.set_attribute(file, "datatype", "plaintext");
                doc.set_attribute(file, "source-language", target.source_language());
                doc.set_attribute(file, "target-language", target.target_language());

                let header = doc.create_element(file, "header");
                let group = doc.create_element(header, "prop-group");
                doc.set_attribute(group, "name", TOOL_CATEGORY);
                for (kind, value) in props {
                    let prop = doc.create_text_element(group, "prop", value);
                    doc.set_attribute(prop, "prop-type", kind);
                }

                doc.create_element(file, "body")
            }
            Family::V2 => {
                doc.set_attribute(xliff, "xmlns", NS_XLIFF_2);
                doc.set_attribute(xliff, "xmlns:mda", NS_METADATA_2);
                doc.set_attribute(xliff, "srcLang", target.source_language());
                doc.set_attribute(xliff, "trgLang", target.target_language());

                let file = doc.create_element(xliff, FILE_TAG);
                doc.set_attribute(file, "id", "f1");
                doc.set_attribute(file, "original", &original);

                let metadata = doc.create_element(file, "mda:metadata");
                let group = doc.create_element(metadata, "mda:metaGroup");
                doc.set_attribute(group, "category", TOOL_CATEGORY);
                for (kind, value) in props {
                    let meta = doc.create_text_element(group, "mda:meta", value);
                    doc.set_attribute(meta, "type", kind);
                }

                file
            }
        }
    }

    /// Create the group element for the content item `reference` belongs to
    pub(crate) fn create_group(
        &self,
        doc: &mut Document,
        parent: NodeId,
        index: usize,
        reference: &Ref,
    ) -> NodeId {
        let group = doc.create_element(parent, GROUP_TAG);
        self.add_group_attributes(doc, group, index, reference);
        group
    }

    /// Id, content type and item id on a group
    pub fn add_group_attributes(
        &self,
        doc: &mut Document,
        group: NodeId,
        index: usize,
        reference: &Ref,
    ) {
        let entry_id = reference
            .entry_id()
            .map(|id| id.to_string())
            .unwrap_or_default();
        match self.family {
            Family::V1 => {
                doc.set_attribute(group, "id", &index.to_string());
                doc.set_attribute(group, "restype", &format!("x-{}", reference.content_type));
                doc.set_attribute(group, "resname", &entry_id);
            }
            Family::V2 => {
                doc.set_attribute(group, "id", &format!("g{}", index));
                doc.set_attribute(
                    group,
                    "type",
                    &format!("{}:{}", TOOL_CATEGORY, reference.content_type),
                );
                doc.set_attribute(group, "name", &entry_id);
            }
        }
    }

    /// Append one unit to `group`. The caller has already validated the entry.
    pub fn add_valid_entry(
        &self,
        doc: &mut Document,
        group: NodeId,
        index: usize,
        reference: &Ref,
        source: &str,
        target: &str,
    ) -> NodeId {
        let context = reference.context().to_flat_string();
        let comment = reference.comment.as_deref().filter(|c| !c.is_empty());

        let unit = doc.create_element(group, self.unit_tag());
        match self.family {
            Family::V1 => {
                doc.set_attribute(unit, "id", &index.to_string());
                doc.set_attribute(unit, "resname", &context);
                doc.set_attribute(unit, "restype", &format!("x-{}", reference.field_type));
                self.add_encoding_group_attributes(doc, unit, reference);

                doc.create_text_element(unit, SOURCE_TAG, source);
                doc.create_text_element(unit, TARGET_TAG, target);
                if let Some(comment) = comment {
                    doc.create_text_element(unit, NOTE_TAG, comment);
                }
            }
            Family::V2 => {
                doc.set_attribute(unit, "id", &format!("u{}", index));
                doc.set_attribute(unit, "name", &context);
                self.add_encoding_group_attributes(doc, unit, reference);

                if let Some(comment) = comment {
                    let notes = doc.create_element(unit, "notes");
                    doc.create_text_element(notes, NOTE_TAG, comment);
                }
                let segment = doc.create_element(unit, "segment");
                doc.create_text_element(segment, SOURCE_TAG, source);
                doc.create_text_element(segment, TARGET_TAG, target);
            }
        }
        unit
    }

    /// Encoding marker on a unit, only for structured values
    pub fn add_encoding_group_attributes(&self, doc: &mut Document, unit: NodeId, reference: &Ref) {
        if let Some(encoding) = reference.encoding {
            doc.set_attribute(unit, self.extradata_attribute(), encoding.as_str());
        }
    }

    // -- decoding ---------------------------------------------------------

    /// Language pair, generator and site reference from the file header
    pub fn read_header(&self, doc: &Document) -> FileHeader {
        let (source_path, target_path) = match self.family {
            Family::V1 => ("//file/@source-language", "//file/@target-language"),
            Family::V2 => ("/xliff/@srcLang", "/xliff/@trgLang"),
        };
        let prop = |kind: &str| {
            let path = match self.family {
                Family::V1 => format!("//header//prop[@prop-type='{}']", kind),
                Family::V2 => format!(
                    "//metaGroup[@category='{}']/meta[@type='{}']",
                    TOOL_CATEGORY, kind
                ),
            };
            doc.select_value(&path).filter(|value| !value.is_empty())
        };

        FileHeader {
            source_language: doc.select_value(source_path),
            target_language: doc.select_value(target_path),
            site_reference: prop(PROP_SITE_REFERENCE),
            generator_name: prop(PROP_GENERATOR),
            generator_version: prop(PROP_GENERATOR_VERSION),
        }
    }

    /// Source or target elements of a unit, in document order
    pub fn text_elements(&self, doc: &Document, unit: NodeId, tag: TextTag) -> Vec<NodeId> {
        let name = match tag {
            TextTag::Source => SOURCE_TAG,
            TextTag::Target => TARGET_TAG,
        };
        match self.family {
            Family::V1 => doc.select_from(unit, name),
            Family::V2 => doc.select_from(unit, &format!("segment/{}", name)),
        }
    }

    /// Flat ref context written on a unit
    pub fn unit_context<'a>(&self, doc: &'a Document, unit: NodeId) -> Option<&'a str> {
        match self.family {
            Family::V1 => doc.attr_local(unit, "resname"),
            Family::V2 => doc.attr_local(unit, "name"),
        }
    }

    /// Content type declared on a group
    pub fn group_content_type(&self, doc: &Document, group: NodeId) -> Option<String> {
        let (attribute, prefix) = match self.family {
            Family::V1 => ("restype", "x-".to_string()),
            Family::V2 => ("type", format!("{}:", TOOL_CATEGORY)),
        };
        let raw = doc.attr_local(group, attribute)?;
        let content_type = raw.strip_prefix(prefix.as_str()).unwrap_or(raw);
        (!content_type.is_empty()).then(|| content_type.to_string())
    }

    /// Item id declared on a group
    pub fn group_entry_name<'a>(&self, doc: &'a Document, group: NodeId) -> Option<&'a str> {
        let name = match self.family {
            Family::V1 => doc.attr_local(group, "resname"),
            Family::V2 => doc.attr_local(group, "name"),
        };
        name.filter(|name| !name.is_empty())
    }
}

/// Which text child of a unit to look up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextTag {
    Source,
    Target,
}
