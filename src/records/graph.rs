//! Object table and deferred reference resolution.
//!
//! Decoded objects live in an arena keyed by object id. Member slots refer to nested
//! objects by id rather than by pointer, which keeps forward references and cyclic
//! graphs representable: a `MemberReference` record leaves a [`Slot::Ref`] placeholder
//! and queues a fix-up, and once the stream has been fully consumed the queued
//! fix-ups are applied in insertion order, rewriting each placeholder to the resolved
//! object id. A fix-up whose target id never appeared is a fatal
//! [`Error::DanglingReference`].
//!
//! The graph also carries the stream-scoped side tables: the library list and the
//! stream header.

use rustc_hash::FxHashMap;

use crate::{
    records::class::{Instance, Library, Slot},
    records::parser::StreamHeader,
    Error, Result, Value,
};

/// One entry in the object table.
#[derive(Debug, Clone)]
pub enum Node {
    /// A class instance or general array
    Instance(Instance),
    /// A string object; the id maps directly to the string, there is no wrapper
    String(String),
    /// A single-dimensional primitive array, complete on creation
    PrimitiveArray(Vec<Value>),
}

/// A queued reference fix-up: write `ref_id` into slot `index` of `parent_id`.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Fixup {
    pub(crate) parent_id: u32,
    pub(crate) index: usize,
    pub(crate) ref_id: u32,
}

/// The decoded object graph of one stream.
///
/// Holds the object table, the implicit root (the first object the stream defined),
/// the queued reference fix-ups, and the stream-scoped library and header data.
/// All state is local to one decode call.
#[derive(Debug, Default)]
pub struct ObjectGraph {
    objects: FxHashMap<u32, Node>,
    root: Option<u32>,
    fixups: Vec<Fixup>,
    libraries: Vec<Library>,
    header: Option<StreamHeader>,
}

impl ObjectGraph {
    /// Create an empty graph
    #[must_use]
    pub fn new() -> Self {
        ObjectGraph::default()
    }

    /// Number of objects in the table
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Returns true if no object has been defined yet
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Id of the root object: the first entry inserted into the table
    #[must_use]
    pub fn root(&self) -> Option<u32> {
        self.root
    }

    /// Libraries defined by the stream, in definition order
    #[must_use]
    pub fn libraries(&self) -> &[Library] {
        &self.libraries
    }

    /// The stream header, once one has been read
    #[must_use]
    pub fn header(&self) -> Option<&StreamHeader> {
        self.header.as_ref()
    }

    /// Look up an object by id
    #[must_use]
    pub fn get(&self, object_id: u32) -> Option<&Node> {
        self.objects.get(&object_id)
    }

    /// Insert an object under its id. The first insertion fixes the root.
    ///
    /// # Errors
    /// Returns [`Error::Malformed`] if the id is already taken; every id must
    /// resolve to exactly one object
    pub fn insert(&mut self, object_id: u32, node: Node) -> Result<()> {
        if self.objects.contains_key(&object_id) {
            return Err(malformed_error!("Duplicate object id - {}", object_id));
        }

        if self.root.is_none() {
            self.root = Some(object_id);
        }

        self.objects.insert(object_id, node);
        Ok(())
    }

    /// Borrow the instance registered under `object_id`.
    ///
    /// # Errors
    /// Returns [`Error::Malformed`] if the id is absent or names a non-instance object
    pub fn instance(&self, object_id: u32) -> Result<&Instance> {
        match self.objects.get(&object_id) {
            Some(Node::Instance(instance)) => Ok(instance),
            Some(_) => Err(malformed_error!(
                "Object id {} does not name a class or array",
                object_id
            )),
            None => Err(malformed_error!("Undefined object id - {}", object_id)),
        }
    }

    /// Mutably borrow the instance registered under `object_id`.
    ///
    /// # Errors
    /// Returns [`Error::Malformed`] if the id is absent or names a non-instance object
    pub fn instance_mut(&mut self, object_id: u32) -> Result<&mut Instance> {
        match self.objects.get_mut(&object_id) {
            Some(Node::Instance(instance)) => Ok(instance),
            Some(_) => Err(malformed_error!(
                "Object id {} does not name a class or array",
                object_id
            )),
            None => Err(malformed_error!("Undefined object id - {}", object_id)),
        }
    }

    pub(crate) fn push_fixup(&mut self, parent_id: u32, index: usize, ref_id: u32) {
        self.fixups.push(Fixup {
            parent_id,
            index,
            ref_id,
        });
    }

    pub(crate) fn add_library(&mut self, library: Library) {
        self.libraries.push(library);
    }

    pub(crate) fn set_header(&mut self, header: StreamHeader) {
        self.header = Some(header);
    }

    /// Apply all queued reference fix-ups in insertion order.
    ///
    /// Each fix-up overwrites its [`Slot::Ref`] placeholder with [`Slot::Object`],
    /// after which no placeholder reachable from the table remains.
    ///
    /// # Errors
    /// Returns [`Error::DanglingReference`] if a referenced id was never defined, or
    /// [`Error::Malformed`] if a fix-up target slot does not exist
    pub fn apply_fixups(&mut self) -> Result<()> {
        let fixups = std::mem::take(&mut self.fixups);

        for fixup in fixups {
            if !self.objects.contains_key(&fixup.ref_id) {
                return Err(Error::DanglingReference(fixup.ref_id));
            }

            let instance = self.instance_mut(fixup.parent_id)?;
            match instance.members.get_mut(fixup.index) {
                Some(slot) => *slot = Slot::Object(fixup.ref_id),
                None => {
                    return Err(malformed_error!(
                        "Fix-up slot {} missing on object {}",
                        fixup.index,
                        fixup.parent_id
                    ))
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::records::class::ClassDescriptor;
    use crate::records::typecodes::BinaryType;

    fn string_member_class(object_id: u32) -> Instance {
        Instance::class(
            object_id,
            Arc::new(ClassDescriptor {
                name: "Holder".to_string(),
                member_names: vec!["s".to_string()],
                member_types: vec![BinaryType::String],
                additional_infos: vec![None],
                library_id: None,
            }),
        )
    }

    #[test]
    fn test_first_insert_is_root() {
        let mut graph = ObjectGraph::new();
        assert_eq!(graph.root(), None);

        graph.insert(10, Node::String("a".to_string())).unwrap();
        graph.insert(11, Node::String("b".to_string())).unwrap();

        assert_eq!(graph.root(), Some(10));
        assert_eq!(graph.len(), 2);
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut graph = ObjectGraph::new();
        graph.insert(1, Node::String("a".to_string())).unwrap();
        assert!(matches!(
            graph.insert(1, Node::String("b".to_string())),
            Err(Error::Malformed { .. })
        ));
    }

    #[test]
    fn test_fixup_rewrites_placeholder() {
        let mut graph = ObjectGraph::new();

        let mut holder = string_member_class(1);
        holder.members.push(Slot::Ref(10));
        graph.insert(1, Node::Instance(holder)).unwrap();
        graph.push_fixup(1, 0, 10);

        graph.insert(10, Node::String("hi".to_string())).unwrap();
        graph.apply_fixups().unwrap();

        assert_eq!(graph.instance(1).unwrap().members[0], Slot::Object(10));
    }

    #[test]
    fn test_fixup_dangling_reference() {
        let mut graph = ObjectGraph::new();

        let mut holder = string_member_class(1);
        holder.members.push(Slot::Ref(99));
        graph.insert(1, Node::Instance(holder)).unwrap();
        graph.push_fixup(1, 0, 99);

        assert!(matches!(
            graph.apply_fixups(),
            Err(Error::DanglingReference(99))
        ));
    }

    #[test]
    fn test_instance_lookup_kind_mismatch() {
        let mut graph = ObjectGraph::new();
        graph.insert(5, Node::String("x".to_string())).unwrap();

        assert!(graph.instance(5).is_err());
        assert!(graph.instance(6).is_err());
        assert!(matches!(graph.get(5), Some(Node::String(_))));
    }
}
