//! Path-aware dynamic field selection for nested serialized objects.
//!
//! Clients pass two selectors, `fields` (include) and `omit` (exclude), as
//! comma-separated lists of `__`-delimited paths:
//!
//! ```text
//! GET /schools/?fields=name,teachers__name&omit=teachers__class_pet__age
//! ```
//!
//! Every node of the serialized tree is filtered on its own: the resolver
//! localizes the selectors to the node's path, the filter prunes the node's
//! declared fields. See [`Selection`] for the full pass.
//!
//! ```ignore
//! let tree = SchemaTree::of_many::<School>()?;
//! let params = QueryParams::from_uri(request_uri);
//! let selection = Selection::for_request(&tree, Some(&params), &Config::default());
//! let body = dynfields::project::to_value(&tree, &selection, &schools)?;
//! ```

pub mod config;
pub mod error;
pub mod field_selection;
pub mod filter;
pub mod params;
pub mod project;
pub mod resolve;
pub mod selection;
pub mod selector;
pub mod tree;

// Re-export key types at crate root for convenience.
pub use config::Config;
pub use dynfields_derive::DynamicFields;
pub use error::DynFieldsError;
pub use field_selection::{DynamicFields, SchemaBuilder};
pub use params::{QueryParams, RawParam, SelectorSource};
pub use selection::{Diagnostic, Selection};
pub use selector::{ParsedSelectors, SelectorList, Selectors, Token};
pub use tree::{FieldDecl, NodeId, SchemaNode, SchemaTree};
