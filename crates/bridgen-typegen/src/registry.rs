//! Registry of declared object types for one build.

use crate::error::BuildError;
use crate::model::{Direction, TypeNode};
use crate::path::TypePath;
use std::collections::BTreeMap;

/// Declared object types seen so far, keyed by module, direction and name.
///
/// Owned by a single build. Names only need to be unique within one module and direction;
/// registering a name again is fine when the new node is the same logical type as the one
/// already recorded.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    types: BTreeMap<TypeKey, TypeNode>,
}

/// Module, direction and declared name of a registered type.
pub type TypeKey = (String, Direction, String);

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `node` under its declared name in `module`. Nodes without a declared name are
    /// ignored.
    pub fn register(
        &mut self,
        module: &str,
        direction: Direction,
        node: &TypeNode,
        path: &TypePath,
    ) -> Result<(), BuildError> {
        let Some(name) = &node.declared_name else {
            return Ok(());
        };
        let key = (module.to_string(), direction, name.clone());
        match self.types.get(&key) {
            Some(existing) if existing.same_logical_type(node) => Ok(()),
            Some(_) => Err(BuildError::DuplicateTypeName {
                name: name.clone(),
                path: path.to_string(),
            }),
            None => {
                self.types.insert(key, node.clone());
                Ok(())
            }
        }
    }

    pub fn get(&self, module: &str, direction: Direction, name: &str) -> Option<&TypeNode> {
        self.types
            .get(&(module.to_string(), direction, name.to_string()))
    }

    /// Declared names of one module in one direction, sorted.
    pub fn names(&self, module: &str, direction: Direction) -> Vec<&str> {
        self.types
            .keys()
            .filter(|(m, d, _)| m == module && *d == direction)
            .map(|(_, _, name)| name.as_str())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn into_types(self) -> BTreeMap<TypeKey, TypeNode> {
        self.types
    }
}
