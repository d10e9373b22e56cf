//! Type-driven schema declaration.
//!
//! Each type that implements [`DynamicFields`] knows how to describe its own
//! fields, including which ones are nested objects or collections of
//! objects. [`SchemaTree::of`](crate::SchemaTree::of) walks those
//! declarations once and records them as an arena of nodes, which is what
//! the selection pass runs over.
//!
//! Most types derive the trait:
//!
//! ```ignore
//! use dynfields::DynamicFields;
//!
//! #[derive(Serialize, DynamicFields)]
//! struct Teacher {
//!     id: u64,
//!     name: Option<String>,
//!     #[fields(nested)]
//!     class_pet: Option<Pet>,
//! }
//!
//! #[derive(Serialize, DynamicFields)]
//! struct School {
//!     id: u64,
//!     #[fields(nested)]
//!     teachers: Vec<Teacher>, // Vec => collection node
//!     #[serde(flatten)]
//!     address: Address, // fields inlined into School's node
//! }
//! ```

use crate::error::DynFieldsError;
use crate::tree::{NodeId, SchemaTree, MAX_DEPTH};

/// Trait implemented by types that can describe their serialized fields.
pub trait DynamicFields {
    /// Declare this type's fields, in serialization order.
    fn declare(schema: &mut SchemaBuilder<'_>);
}

/// Records one node's declarations into a [`SchemaTree`].
///
/// The first error stops all further declarations; it is reported by
/// [`SchemaTree::of`].
pub struct SchemaBuilder<'a> {
    tree: &'a mut SchemaTree,
    node: NodeId,
    error: &'a mut Option<DynFieldsError>,
    flattened: usize,
}

impl<'a> SchemaBuilder<'a> {
    pub(crate) fn new(
        tree: &'a mut SchemaTree,
        node: NodeId,
        error: &'a mut Option<DynFieldsError>,
    ) -> Self {
        Self {
            tree,
            node,
            error,
            flattened: 0,
        }
    }

    /// The node being declared.
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Declare a plain field.
    pub fn field(&mut self, name: &str) -> &mut Self {
        if self.error.is_none() {
            if let Err(e) = self.tree.add_field(self.node, name) {
                *self.error = Some(e);
            }
        }
        self
    }

    /// Declare a field holding a single nested `T`.
    pub fn nested<T: DynamicFields + ?Sized>(&mut self, name: &str) -> &mut Self {
        self.child::<T>(name, false)
    }

    /// Declare a field holding a collection of `T`.
    pub fn many<T: DynamicFields + ?Sized>(&mut self, name: &str) -> &mut Self {
        self.child::<T>(name, true)
    }

    /// Declare `T`'s fields directly on this node, for a field serialized
    /// with `#[serde(flatten)]`.
    pub fn flatten<T: DynamicFields + ?Sized>(&mut self) -> &mut Self {
        if self.error.is_some() {
            return self;
        }
        if self.flattened >= MAX_DEPTH {
            *self.error = Some(DynFieldsError::SchemaTooDeep {
                path: self.tree.path_string(self.node),
            });
            return self;
        }
        self.flattened += 1;
        T::declare(self);
        self.flattened -= 1;
        self
    }

    fn child<T: DynamicFields + ?Sized>(&mut self, name: &str, many: bool) -> &mut Self {
        if self.error.is_some() {
            return self;
        }
        if self.tree.depth(self.node) >= MAX_DEPTH {
            *self.error = Some(DynFieldsError::SchemaTooDeep {
                path: self.tree.path_string(self.node),
            });
            return self;
        }
        match self.tree.add_child(self.node, name, many) {
            Ok(child) => {
                let mut nested = SchemaBuilder::new(&mut *self.tree, child, &mut *self.error);
                T::declare(&mut nested);
            }
            Err(e) => *self.error = Some(e),
        }
        self
    }
}
