/*!
 * Safe XML document helper used by the XLIFF codecs.
 *
 * - `document`: arena DOM, builder and serializer
 * - `parser`: non-panicking XML/HTML parsing with accumulated errors
 * - `path`: tiny path queries for header lookups
 * - `traversal`: generic depth-first walk over any [`Tree`]
 */

pub mod document;
mod parser;
pub mod path;
pub mod traversal;

pub use document::{Document, NodeId, NodeKind};
pub use traversal::{DepthFirst, Tree};

/// Whether this build can parse XML at all
pub fn engine_available() -> bool {
    cfg!(feature = "xml")
}
