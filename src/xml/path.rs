/*!
 * A very small XPath subset for locating header values.
 *
 * Supported: absolute (`/xliff/file`) and relative (`segment/source`) child
 * steps, descendant steps (`//prop`), `*`, one attribute-equality predicate
 * per step (`prop[@prop-type='generator']`) and a trailing attribute step
 * (`/xliff/@trgLang`). Element and attribute names match on their local
 * part, so documents using a different namespace prefix still resolve.
 */

use std::collections::HashSet;

use super::document::{Document, NodeId, NodeKind, local_name};
use super::traversal::{DepthFirst, Tree};

#[derive(Debug)]
struct Step {
    descendant: bool,
    name: String,
    predicate: Option<(String, String)>,
}

/// Result of evaluating a path
#[derive(Debug, Default)]
pub struct Selection {
    /// Matched element nodes
    pub nodes: Vec<NodeId>,
    /// Trailing attribute step, if the path ended in one
    pub attribute: Option<String>,
}

impl Selection {
    /// Attribute value of the first node carrying it, or text of the first node
    pub fn first_value(&self, doc: &Document) -> Option<String> {
        match &self.attribute {
            Some(attribute) => self
                .nodes
                .iter()
                .find_map(|node| doc.attr_local(*node, attribute))
                .map(str::to_string),
            None => self.nodes.first().map(|node| doc.text_content(*node)),
        }
    }
}

/// Evaluate `expr` with `context` as the starting node (ignored for absolute paths)
pub fn select(doc: &Document, context: NodeId, expr: &str) -> Selection {
    let expr = expr.trim();
    let (steps, attribute) = parse(expr);
    let start = if expr.starts_with('/') { doc.root() } else { context };

    let mut current = vec![start];
    for step in &steps {
        let mut seen = HashSet::new();
        let mut next = Vec::new();
        for node in &current {
            let candidates: Vec<NodeId> = if step.descendant {
                // skip the node itself, it was matched by the previous step
                DepthFirst::new(*node).iter(doc).skip(1).collect()
            } else {
                doc.children(*node).to_vec()
            };
            for candidate in candidates {
                if matches(doc, candidate, step) && seen.insert(candidate) {
                    next.push(candidate);
                }
            }
        }
        current = next;
    }

    Selection {
        nodes: current,
        attribute,
    }
}

fn matches(doc: &Document, node: NodeId, step: &Step) -> bool {
    let NodeKind::Element { name, .. } = doc.kind(node) else {
        return false;
    };
    if step.name != "*" && local_name(name) != step.name {
        return false;
    }
    match &step.predicate {
        Some((attribute, value)) => doc.attr_local(node, attribute) == Some(value.as_str()),
        None => true,
    }
}

fn parse(expr: &str) -> (Vec<Step>, Option<String>) {
    let mut steps = Vec::new();
    let mut attribute = None;
    let mut rest = expr;

    while !rest.is_empty() {
        let descendant = if let Some(stripped) = rest.strip_prefix("//") {
            rest = stripped;
            true
        } else {
            rest = rest.strip_prefix('/').unwrap_or(rest);
            false
        };

        let end = step_end(rest);
        let raw = &rest[..end];
        rest = &rest[end..];

        if let Some(name) = raw.strip_prefix('@') {
            attribute = Some(local_name(name).to_string());
            break;
        }
        if raw.is_empty() {
            continue;
        }
        steps.push(parse_step(raw, descendant));
    }

    (steps, attribute)
}

// Index of the next '/' outside of a predicate
fn step_end(rest: &str) -> usize {
    let mut depth = 0usize;
    for (i, c) in rest.char_indices() {
        match c {
            '[' => depth += 1,
            ']' => depth = depth.saturating_sub(1),
            '/' if depth == 0 => return i,
            _ => {}
        }
    }
    rest.len()
}

fn parse_step(raw: &str, descendant: bool) -> Step {
    let (name, predicate) = match raw.split_once('[') {
        Some((name, predicate)) => (name, parse_predicate(predicate.trim_end_matches(']'))),
        None => (raw, None),
    };
    Step {
        descendant,
        name: local_name(name.trim()).to_string(),
        predicate,
    }
}

// `@name='value'` or `@name="value"`
fn parse_predicate(raw: &str) -> Option<(String, String)> {
    let (name, value) = raw.trim().strip_prefix('@')?.split_once('=')?;
    let value = value.trim().trim_matches(|c| c == '\'' || c == '"');
    Some((local_name(name.trim()).to_string(), value.to_string()))
}
