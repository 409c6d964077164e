//! Record stream state machine.
//!
//! [`GraphBuilder`] drives the decode: it alternates between filling pending member
//! slots of the innermost open object and consuming the next record tag. Class and
//! array records push an open instance onto an explicit stack; primitive members of
//! the stack tip are read inline with no record prefix, every other member arrives
//! as its own record. The stack is a `Vec` rather than host recursion so that arrays
//! with large slot counts cannot exhaust the call stack.
//!
//! The stream must open with the `SerializedStreamHeader` tag (`0x00`) and ends at
//! `MessageEnd` (`0x0B`), at which point the queued reference fix-ups are applied
//! and the finished [`ObjectGraph`] is handed out.

use std::sync::Arc;

use crate::{
    reader::parser::Parser,
    records::class::{ArrayInfo, ClassDescriptor, Instance, Library, Slot},
    records::graph::{Node, ObjectGraph},
    records::typecodes::{AdditionalInfo, BinaryType, PrimitiveType, RecordType},
    Error, Result, Value,
};

/// The `SerializedStreamHeader` record.
///
/// Recorded for inspection; it is not an object and does not enter the object table.
/// The declared `root_id` is retained but not used for root selection - the decoded
/// root is the first object the stream defines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamHeader {
    /// Declared id of the root object
    pub root_id: u32,
    /// Id of the header itself
    pub header_id: u32,
    /// Format major version
    pub major_version: u32,
    /// Format minor version
    pub minor_version: u32,
}

/// State machine that consumes a record stream and produces an [`ObjectGraph`].
///
/// # Examples
///
/// ```rust
/// use nrbf::records::GraphBuilder;
///
/// // header, string object id=2 "hi", end
/// let mut data = vec![0x00, 1, 0, 0, 0, 0xFF, 0xFF, 0xFF, 0xFF, 1, 0, 0, 0, 0, 0, 0, 0];
/// data.extend_from_slice(&[0x06, 2, 0, 0, 0, 0x02, b'h', b'i', 0x0B]);
///
/// let graph = GraphBuilder::new(&data)?.run()?;
/// assert_eq!(graph.root(), Some(2));
/// # Ok::<(), nrbf::Error>(())
/// ```
pub struct GraphBuilder<'a> {
    parser: Parser<'a>,
    graph: ObjectGraph,
    stack: Vec<u32>,
}

impl<'a> GraphBuilder<'a> {
    /// Create a builder over a fully-buffered stream.
    ///
    /// ## Arguments
    /// * 'data' - The raw stream, starting with the header record tag
    ///
    /// # Errors
    /// Returns [`Error::Empty`] for empty input, or [`Error::InvalidHeader`] when
    /// the first byte is not the header tag `0x00`
    pub fn new(data: &'a [u8]) -> Result<Self> {
        match data.first() {
            None => Err(Error::Empty),
            Some(0x00) => Ok(GraphBuilder {
                parser: Parser::new(data),
                graph: ObjectGraph::new(),
                stack: Vec::new(),
            }),
            Some(&tag) => Err(Error::InvalidHeader(tag)),
        }
    }

    /// Consume the stream through `MessageEnd`, resolve references, and return the graph.
    ///
    /// # Errors
    /// Any error of the record handlers: [`Error::UnknownRecord`],
    /// [`Error::UnsupportedPrimitive`], [`Error::TruncatedInput`],
    /// [`Error::MalformedLength`], [`Error::DanglingReference`], or
    /// [`Error::Malformed`] for structurally inconsistent records
    pub fn run(mut self) -> Result<ObjectGraph> {
        loop {
            if let Some(&top_id) = self.stack.last() {
                let top = self.graph.instance(top_id)?;

                if top.is_complete() {
                    self.stack.pop();
                    continue;
                }

                let index = top.members.len();
                if top.member_type(index)? == BinaryType::Primitive {
                    let primitive = match top.additional_info(index) {
                        Some(AdditionalInfo::Primitive(primitive)) => *primitive,
                        _ => {
                            return Err(malformed_error!(
                                "Primitive member {} of object {} has no primitive type code",
                                index,
                                top_id
                            ))
                        }
                    };

                    let value = Value::read_primitive(primitive, &mut self.parser)?;
                    self.graph
                        .instance_mut(top_id)?
                        .members
                        .push(Slot::Scalar(value));
                    continue;
                }
            }

            let tag = self.parser.read_le::<u8>()?;
            match RecordType::from_tag(tag)? {
                RecordType::SerializedStreamHeader => self.read_stream_header()?,
                RecordType::ClassWithId => self.read_class_with_id()?,
                RecordType::SystemClassWithMembersAndTypes => self.read_class_with_members(false)?,
                RecordType::ClassWithMembersAndTypes => self.read_class_with_members(true)?,
                RecordType::BinaryObjectString => self.read_object_string()?,
                RecordType::BinaryArray => self.read_binary_array()?,
                RecordType::MemberReference => self.read_member_reference()?,
                RecordType::ObjectNull => self.append_nulls(1)?,
                RecordType::ObjectNullMultiple256 => {
                    let count = self.parser.read_le::<u8>()?;
                    self.append_nulls(usize::from(count))?;
                }
                RecordType::BinaryLibrary => self.read_library()?,
                RecordType::ArraySinglePrimitive => self.read_primitive_array()?,
                RecordType::MessageEnd => break,
            }
        }

        self.graph.apply_fixups()?;
        Ok(self.graph)
    }

    fn read_stream_header(&mut self) -> Result<()> {
        let header = StreamHeader {
            root_id: self.parser.read_le::<u32>()?,
            header_id: self.parser.read_le::<u32>()?,
            major_version: self.parser.read_le::<u32>()?,
            minor_version: self.parser.read_le::<u32>()?,
        };

        self.graph.set_header(header);
        Ok(())
    }

    fn read_class_with_members(&mut self, with_library: bool) -> Result<()> {
        let (object_id, mut descriptor) = ClassDescriptor::parse(&mut self.parser)?;
        if with_library {
            descriptor.library_id = Some(self.parser.read_le::<u32>()?);
        }

        self.register_and_push(Instance::class(object_id, Arc::new(descriptor)), true)
    }

    fn read_class_with_id(&mut self) -> Result<()> {
        let object_id = self.parser.read_le::<u32>()?;
        let metadata_id = self.parser.read_le::<u32>()?;

        let kind = match self.graph.get(metadata_id) {
            Some(Node::Instance(instance)) => instance.kind.clone(),
            Some(_) => {
                return Err(malformed_error!(
                    "Metadata id {} does not name a class or array",
                    metadata_id
                ))
            }
            None => return Err(malformed_error!("Undefined metadata id - {}", metadata_id)),
        };

        let instance = Instance {
            object_id,
            kind,
            members: Vec::new(),
        };

        self.register_and_push(instance, true)
    }

    fn read_object_string(&mut self) -> Result<()> {
        let object_id = self.parser.read_le::<u32>()?;
        let value = self.parser.read_prefixed_string_utf8()?;

        // The parent receives the string itself, not a wrapper around it
        if self.stack.last().is_some() {
            self.append_to_parent(Slot::Scalar(Value::String(value.clone())))?;
        }

        self.graph.insert(object_id, Node::String(value))
    }

    fn read_binary_array(&mut self) -> Result<()> {
        let object_id = self.parser.read_le::<u32>()?;
        let array_type = self.parser.read_le::<u8>()?;
        let rank = self.parser.read_le::<u32>()?;

        let mut lengths = Vec::new();
        for _ in 0..rank {
            lengths.push(self.parser.read_le::<u32>()?);
        }

        // Only the offset shape variants carry lower bounds
        let mut lower_bounds = Vec::new();
        if array_type > 2 {
            for _ in 0..rank {
                lower_bounds.push(self.parser.read_le::<u32>()?);
            }
        }

        let item_type = BinaryType::from_code(self.parser.read_le::<u8>()?)?;
        let item_info = AdditionalInfo::read(item_type, &mut self.parser)?;

        let info = ArrayInfo {
            array_type,
            rank,
            lengths,
            lower_bounds,
            item_type,
            item_info,
        };

        // Arrays are reached through references, never appended to an open parent
        self.register_and_push(Instance::array(object_id, Arc::new(info)), false)
    }

    fn read_member_reference(&mut self) -> Result<()> {
        let ref_id = self.parser.read_le::<u32>()?;

        let Some(&parent_id) = self.stack.last() else {
            return Err(malformed_error!(
                "Member reference with no open object to receive it"
            ));
        };

        let index = self.graph.instance(parent_id)?.members.len();
        self.graph.push_fixup(parent_id, index, ref_id);
        self.append_slot(parent_id, Slot::Ref(ref_id))
    }

    fn read_library(&mut self) -> Result<()> {
        let library_id = self.parser.read_le::<u32>()?;
        let name = self.parser.read_prefixed_string_utf8()?;

        self.graph.add_library(Library { library_id, name });
        Ok(())
    }

    fn read_primitive_array(&mut self) -> Result<()> {
        let object_id = self.parser.read_le::<u32>()?;
        let length = self.parser.read_le::<u32>()?;
        let primitive = PrimitiveType::from_code(self.parser.read_le::<u8>()?)?;

        let mut values = Vec::new();
        for _ in 0..length {
            values.push(Value::read_primitive(primitive, &mut self.parser)?);
        }

        // Complete on creation: never pushed, reached through references
        self.graph.insert(object_id, Node::PrimitiveArray(values))
    }

    fn append_nulls(&mut self, count: usize) -> Result<()> {
        for _ in 0..count {
            self.append_to_parent(Slot::Scalar(Value::Null))?;
        }
        Ok(())
    }

    fn append_to_parent(&mut self, slot: Slot) -> Result<()> {
        let Some(&parent_id) = self.stack.last() else {
            return Err(malformed_error!(
                "Member value with no open object to receive it"
            ));
        };

        self.append_slot(parent_id, slot)
    }

    fn append_slot(&mut self, parent_id: u32, slot: Slot) -> Result<()> {
        let instance = self.graph.instance_mut(parent_id)?;
        if instance.is_complete() {
            return Err(malformed_error!(
                "Too many member values for object {}",
                parent_id
            ));
        }

        instance.members.push(slot);
        Ok(())
    }

    /// Register a freshly-introduced instance, append it to the open parent when
    /// `append` is set and a parent exists, and make it the new stack tip.
    fn register_and_push(&mut self, instance: Instance, append: bool) -> Result<()> {
        let object_id = instance.object_id;

        if append {
            if let Some(&parent_id) = self.stack.last() {
                self.append_slot(parent_id, Slot::Object(object_id))?;
            }
        }

        self.graph.insert(object_id, Node::Instance(instance))?;
        self.stack.push(object_id);
        Ok(())
    }
}
