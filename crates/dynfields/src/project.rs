//! Render JSON documents through a [`Selection`].

use serde::Serialize;
use serde_json::{Map, Value};

use crate::selection::Selection;
use crate::tree::{NodeId, SchemaTree};

/// Keep only the retained fields of every node of `value`.
///
/// Object keys come out in declaration order. Keys the schema does not
/// declare are dropped, and retained keys missing from the document are
/// skipped. Collection nodes apply to every element of an array. A value
/// whose shape does not match its node (`null` where an object is declared,
/// a scalar where an array is declared) is copied unchanged.
pub fn project(tree: &SchemaTree, selection: &Selection, value: &Value) -> Value {
    project_node(tree, selection, tree.root(), value)
}

/// Serialize `value` with serde and project the result.
pub fn to_value<T: Serialize + ?Sized>(
    tree: &SchemaTree,
    selection: &Selection,
    value: &T,
) -> Result<Value, serde_json::Error> {
    serde_json::to_value(value).map(|v| project(tree, selection, &v))
}

fn project_node(tree: &SchemaTree, selection: &Selection, id: NodeId, value: &Value) -> Value {
    match value {
        Value::Array(items) if tree.node(id).is_many() => Value::Array(
            items
                .iter()
                .map(|item| project_object(tree, selection, id, item))
                .collect(),
        ),
        _ => project_object(tree, selection, id, value),
    }
}

fn project_object(tree: &SchemaTree, selection: &Selection, id: NodeId, value: &Value) -> Value {
    let Value::Object(object) = value else {
        return value.clone();
    };
    let node = tree.node(id);
    let mut out = Map::new();
    for name in selection.retained(id) {
        let Some(field_value) = object.get(name) else {
            continue;
        };
        let projected = match node.field(name).and_then(|f| f.child) {
            Some(child) => project_node(tree, selection, child, field_value),
            None => field_value.clone(),
        };
        out.insert(name.clone(), projected);
    }
    Value::Object(out)
}
