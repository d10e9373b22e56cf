//! Schema trees: the declared fields of every node, stored as an arena.
//!
//! Nodes refer to their parent by [`NodeId`], never by reference, so a tree
//! has no ownership cycles and is freely shareable between threads. Nodes
//! are stored parents-first; iterating the arena visits the tree top-down.

use serde_json::{Map, Value};

use crate::config::DEFAULT_PATH_SEPARATOR;
use crate::error::DynFieldsError;
use crate::field_selection::{DynamicFields, SchemaBuilder};

/// Deepest nesting a declared schema may reach. Self-referential types hit
/// this limit instead of recursing forever.
pub const MAX_DEPTH: usize = 32;

/// Index of a node inside its [`SchemaTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub const ROOT: NodeId = NodeId(0);

    pub fn index(self) -> usize {
        self.0
    }
}

/// One declared field of a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDecl {
    pub name: String,
    /// Set when the field holds a nested object (or collection of objects).
    pub child: Option<NodeId>,
}

/// A position in the serialization tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaNode {
    name: Option<String>,
    parent: Option<NodeId>,
    many: bool,
    fields: Vec<FieldDecl>,
}

impl SchemaNode {
    /// Field name within the parent; `None` for the root.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Whether this node is a template for repeated elements. All elements
    /// share the node, and therefore its selection.
    pub fn is_many(&self) -> bool {
        self.many
    }

    pub fn fields(&self) -> &[FieldDecl] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldDecl> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }
}

/// Arena of [`SchemaNode`]s rooted at [`NodeId::ROOT`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaTree {
    nodes: Vec<SchemaNode>,
}

impl Default for SchemaTree {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaTree {
    /// A tree holding only an empty root.
    pub fn new() -> Self {
        Self {
            nodes: vec![SchemaNode {
                name: None,
                parent: None,
                many: false,
                fields: Vec::new(),
            }],
        }
    }

    /// Build the tree declared by `T`.
    pub fn of<T: DynamicFields + ?Sized>() -> Result<Self, DynFieldsError> {
        let mut tree = Self::new();
        let mut error = None;
        T::declare(&mut SchemaBuilder::new(&mut tree, NodeId::ROOT, &mut error));
        match error {
            Some(e) => Err(e),
            None => Ok(tree),
        }
    }

    /// Build the tree for a list of `T` (e.g. a list endpoint).
    pub fn of_many<T: DynamicFields + ?Sized>() -> Result<Self, DynFieldsError> {
        let mut tree = Self::of::<T>()?;
        tree.nodes[0].many = true;
        Ok(tree)
    }

    /// Derive a tree from a sample document. Objects become nodes, arrays
    /// containing objects become collection nodes, and keys are merged across
    /// array elements in first-seen order.
    pub fn infer(value: &Value) -> Self {
        let mut tree = Self::new();
        match value {
            Value::Object(object) => tree.merge_object(NodeId::ROOT, object),
            Value::Array(items) => {
                tree.nodes[0].many = true;
                for object in items.iter().filter_map(Value::as_object) {
                    tree.merge_object(NodeId::ROOT, object);
                }
            }
            _ => {}
        }
        tree
    }

    fn merge_object(&mut self, node: NodeId, object: &Map<String, Value>) {
        for (key, value) in object {
            let index = match self.nodes[node.0].fields.iter().position(|f| f.name == *key) {
                Some(index) => index,
                None => {
                    self.nodes[node.0].fields.push(FieldDecl {
                        name: key.clone(),
                        child: None,
                    });
                    self.nodes[node.0].fields.len() - 1
                }
            };
            match value {
                Value::Object(nested) => {
                    let child = self.child_at(node, index, false);
                    self.merge_object(child, nested);
                }
                Value::Array(items) if items.iter().any(Value::is_object) => {
                    let child = self.child_at(node, index, true);
                    for nested in items.iter().filter_map(Value::as_object) {
                        self.merge_object(child, nested);
                    }
                }
                _ => {}
            }
        }
    }

    fn child_at(&mut self, node: NodeId, index: usize, many: bool) -> NodeId {
        if let Some(child) = self.nodes[node.0].fields[index].child {
            self.nodes[child.0].many |= many;
            return child;
        }
        let name = self.nodes[node.0].fields[index].name.clone();
        let child = self.push_node(node, name, many);
        self.nodes[node.0].fields[index].child = Some(child);
        child
    }

    fn push_node(&mut self, parent: NodeId, name: String, many: bool) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(SchemaNode {
            name: Some(name),
            parent: Some(parent),
            many,
            fields: Vec::new(),
        });
        id
    }

    fn ensure_unique(&self, node: NodeId, name: &str) -> Result<(), DynFieldsError> {
        if self.nodes[node.0].field(name).is_some() {
            return Err(DynFieldsError::DuplicateField {
                path: self.path_string(node),
                field: name.to_string(),
            });
        }
        Ok(())
    }

    /// Declare a plain field on `node`.
    pub fn add_field(&mut self, node: NodeId, name: &str) -> Result<(), DynFieldsError> {
        self.ensure_unique(node, name)?;
        self.nodes[node.0].fields.push(FieldDecl {
            name: name.to_string(),
            child: None,
        });
        Ok(())
    }

    /// Declare a nested field on `node` and return the new child node.
    pub fn add_child(
        &mut self,
        node: NodeId,
        name: &str,
        many: bool,
    ) -> Result<NodeId, DynFieldsError> {
        self.ensure_unique(node, name)?;
        let child = self.push_node(node, name.to_string(), many);
        self.nodes[node.0].fields.push(FieldDecl {
            name: name.to_string(),
            child: Some(child),
        });
        Ok(child)
    }

    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Look up a node. Panics if `id` came from another tree and is out of range.
    pub fn node(&self, id: NodeId) -> &SchemaNode {
        &self.nodes[id.0]
    }

    pub fn get(&self, id: NodeId) -> Option<&SchemaNode> {
        self.nodes.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: a tree has at least its root.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All nodes, parents before children.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &SchemaNode)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    /// Child nodes of `id`, in declaration order.
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes[id.0].fields.iter().filter_map(|f| f.child)
    }

    /// Field names from the root down to `id`. Empty for the root.
    pub fn path(&self, id: NodeId) -> Vec<&str> {
        let mut path = Vec::new();
        let mut current = Some(id);
        while let Some(node) = current.map(|c| &self.nodes[c.0]) {
            if let Some(name) = node.name() {
                path.push(name);
            }
            current = node.parent;
        }
        path.reverse();
        path
    }

    pub fn depth(&self, id: NodeId) -> usize {
        let mut depth = 0;
        let mut current = self.nodes[id.0].parent;
        while let Some(parent) = current {
            depth += 1;
            current = self.nodes[parent.0].parent;
        }
        depth
    }

    /// Find a node by its path from the root.
    pub fn find<S: AsRef<str>>(&self, path: &[S]) -> Option<NodeId> {
        path.iter().try_fold(NodeId::ROOT, |node, segment| {
            self.nodes[node.0].field(segment.as_ref())?.child
        })
    }

    pub(crate) fn path_string(&self, id: NodeId) -> String {
        self.path(id).join(DEFAULT_PATH_SEPARATOR)
    }
}
