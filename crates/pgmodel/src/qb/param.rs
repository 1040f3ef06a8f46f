//! Ordered parameter storage for the query builder.

use crate::value::{ParamKind, Value};
use tokio_postgres::types::ToSql;

/// A parameter as it will be bound: placeholder name, value and declared kind.
#[derive(Clone, Debug, PartialEq)]
pub struct BoundParam {
    /// Placeholder name in the rendered SQL, e.g. `$2`.
    pub name: String,
    pub value: Value,
    pub kind: ParamKind,
}

/// A collection of parameters in bind order.
///
/// Indices are 1-based and handed out as values are pushed, so placeholder
/// numbers always follow the order in which SQL text is rendered.
#[derive(Clone, Debug, Default)]
pub struct ParamList {
    params: Vec<Value>,
}

impl ParamList {
    /// Create a new empty parameter list.
    pub fn new() -> Self {
        Self { params: Vec::new() }
    }

    /// Add a parameter and return its 1-based index.
    pub fn push(&mut self, value: Value) -> usize {
        self.params.push(value);
        self.params.len()
    }

    /// Get the current parameter count.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Check if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Get all parameters as references for tokio-postgres.
    pub fn as_refs(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.params.iter().map(|p| p as &(dyn ToSql + Sync)).collect()
    }

    /// Parameters with their placeholder names and kinds.
    pub fn bindings(&self) -> Vec<BoundParam> {
        self.params
            .iter()
            .enumerate()
            .map(|(i, value)| BoundParam {
                name: format!("${}", i + 1),
                kind: value.kind(),
                value: value.clone(),
            })
            .collect()
    }

    pub fn values(&self) -> &[Value] {
        &self.params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_returns_one_based_index() {
        let mut params = ParamList::new();
        assert!(params.is_empty());
        assert_eq!(params.push(Value::from(1)), 1);
        assert_eq!(params.push(Value::from("x")), 2);
        assert_eq!(params.len(), 2);
        assert_eq!(params.as_refs().len(), 2);
    }

    #[test]
    fn bindings_are_named_in_order() {
        let mut params = ParamList::new();
        params.push(Value::from(18));
        params.push(Value::from(true));
        params.push(Value::Null);

        let bound = params.bindings();
        let names: Vec<_> = bound.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["$1", "$2", "$3"]);
        assert_eq!(bound[0].kind, ParamKind::Integer);
        assert_eq!(bound[1].kind, ParamKind::Boolean);
        assert_eq!(bound[2].kind, ParamKind::Null);
    }
}
