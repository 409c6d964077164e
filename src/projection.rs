//! Projection of a decoded object graph into a plain [`Value`] tree.
//!
//! The record parser produces instances that still carry class metadata and
//! id-valued member slots. Projection walks the graph from the root and rewrites it
//! into the user-facing shape: strings and primitive arrays pass through, arrays
//! become [`Value::Array`], and class instances become [`Value::Object`] maps keyed
//! by member name.
//!
//! Two member names trigger wrapper collapse instead of map construction: `_items`
//! (the backing array of the collection types, whose siblings like `_size` are
//! bookkeeping) and `value__` (the box the formatter wraps enum values in). When one
//! of these is present, the projected member replaces the whole instance.
//!
//! The walk is depth-limited: object graphs can be cyclic through member
//! references, and a cycle must surface as [`Error::DepthLimit`] rather than
//! unbounded recursion.

use std::collections::BTreeMap;

use crate::{
    records::class::{Instance, InstanceKind, Slot},
    records::graph::{Node, ObjectGraph},
    Error, Result, Value,
};

/// Backing array member of the collection wrapper classes
pub(crate) const MEMBER_ITEMS: &str = "_items";
/// Payload member of a boxed enum value
pub(crate) const MEMBER_ENUM_VALUE: &str = "value__";

/// Project the root object of a resolved graph.
///
/// # Errors
/// Returns [`Error::NoRoot`] for a graph with no objects, [`Error::DepthLimit`] when
/// the walk exceeds `max_depth` nested objects, or [`Error::DanglingReference`] for
/// an id missing from the table
pub(crate) fn project_root(graph: &ObjectGraph, max_depth: usize) -> Result<Value> {
    let root = graph.root().ok_or(Error::NoRoot)?;
    project_object(graph, root, max_depth, 0)
}

fn project_object(
    graph: &ObjectGraph,
    object_id: u32,
    limit: usize,
    depth: usize,
) -> Result<Value> {
    if depth >= limit {
        return Err(Error::DepthLimit(limit));
    }

    match graph.get(object_id) {
        Some(Node::String(value)) => Ok(Value::String(value.clone())),
        Some(Node::PrimitiveArray(values)) => Ok(Value::Array(values.clone())),
        Some(Node::Instance(instance)) => project_instance(graph, instance, limit, depth),
        None => Err(Error::DanglingReference(object_id)),
    }
}

fn project_instance(
    graph: &ObjectGraph,
    instance: &Instance,
    limit: usize,
    depth: usize,
) -> Result<Value> {
    let descriptor = match &instance.kind {
        InstanceKind::Array(_) => {
            let mut values = Vec::with_capacity(instance.members.len());
            for slot in &instance.members {
                values.push(project_slot(graph, slot, limit, depth)?);
            }
            return Ok(Value::Array(values));
        }
        InstanceKind::Class(descriptor) => descriptor,
    };

    // A wrapper member replaces the instance wholesale; its siblings are dropped
    for (index, slot) in instance.members.iter().enumerate() {
        if let Some(name) = descriptor.member_names.get(index) {
            if name == MEMBER_ITEMS || name == MEMBER_ENUM_VALUE {
                return project_slot(graph, slot, limit, depth);
            }
        }
    }

    let mut members = BTreeMap::new();
    for (index, slot) in instance.members.iter().enumerate() {
        let Some(name) = descriptor.member_names.get(index) else {
            continue;
        };
        members.insert(name.clone(), project_slot(graph, slot, limit, depth)?);
    }

    Ok(Value::Object(members))
}

fn project_slot(graph: &ObjectGraph, slot: &Slot, limit: usize, depth: usize) -> Result<Value> {
    match slot {
        Slot::Scalar(value) => Ok(value.clone()),
        Slot::Object(object_id) => project_object(graph, *object_id, limit, depth + 1),
        Slot::Ref(object_id) => Err(malformed_error!(
            "Unresolved reference placeholder - {}",
            object_id
        )),
    }
}
