//! Schema to type model conversion.

use crate::error::BuildError;
use crate::model::{Direction, PropertyNode, TypeKind, TypeNode};
use crate::path::TypePath;
use crate::registry::TypeRegistry;
use crate::renames::{RenameScope, Renames};
use bridgen_docs::{EntityDocs, Reformatter, resolve};
use bridgen_schema::{OverrideInfo, SchemaKind, SchemaNode, names};
use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet};

/// How a property is being built.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Position {
    /// Output position (resource outputs, function results, config values).
    pub output: bool,
    /// Provider configuration variable.
    pub config: bool,
    /// Always optional, regardless of schema (lookup state).
    pub force_optional: bool,
}

impl Position {
    pub const INPUT: Position = Position {
        output: false,
        config: false,
        force_optional: false,
    };
    pub const OUTPUT: Position = Position {
        output: true,
        config: false,
        force_optional: false,
    };
    pub const STATE: Position = Position {
        output: false,
        config: false,
        force_optional: true,
    };
    pub const CONFIG: Position = Position {
        output: true,
        config: true,
        force_optional: false,
    };
}

/// Builds [`TypeNode`]s for one entity.
///
/// Holds the entity's parsed docs for description lookup plus the build-wide type registry
/// and rename tables, which it updates as object types and properties are produced. Object
/// types are declared in the root module unless [`in_module`](Self::in_module) says otherwise.
pub struct TypeBuilder<'a> {
    docs: &'a EntityDocs,
    module: &'a str,
    reformatter: &'a Reformatter,
    registry: &'a mut TypeRegistry,
    renames: &'a mut Renames,
}

impl<'a> TypeBuilder<'a> {
    pub fn new(
        docs: &'a EntityDocs,
        reformatter: &'a Reformatter,
        registry: &'a mut TypeRegistry,
        renames: &'a mut Renames,
    ) -> Self {
        Self {
            docs,
            module: "",
            reformatter,
            registry,
            renames,
        }
    }

    /// Declares object types in `module`.
    pub fn in_module(mut self, module: &'a str) -> Self {
        self.module = module;
        self
    }

    /// Builds the type at `path`.
    ///
    /// Returns `Ok(None)` when the node is omitted (by override, or because it is write-only)
    /// and the schema does not require it.
    pub fn build_type(
        &mut self,
        schema: Option<&SchemaNode>,
        info: Option<&OverrideInfo>,
        path: &TypePath,
        is_output: bool,
    ) -> Result<Option<TypeNode>, BuildError> {
        if schema.is_none() && info.is_none() {
            return Err(BuildError::MissingSchema {
                path: path.to_string(),
            });
        }

        let omitted = info.is_some_and(|i| i.omit) || schema.is_some_and(|s| s.write_only);
        if omitted {
            if schema.is_some_and(|s| s.required && !s.optional) {
                return Err(BuildError::RequiredOmitted {
                    path: path.to_string(),
                });
            }
            tracing::debug!(path = %path, "omitting property");
            return Ok(None);
        }

        let deprecation = deprecation_message(schema, info);
        let Some(schema) = schema else {
            let token = info.and_then(|i| i.type_name.clone().or_else(|| i.opaque_type.clone()));
            return Ok(Some(TypeNode::opaque(token).with_deprecation(deprecation)));
        };
        if let Some(token) = info.and_then(|i| i.opaque_type.clone()) {
            return Ok(Some(TypeNode::opaque(Some(token)).with_deprecation(deprecation)));
        }

        let node = match schema.kind {
            SchemaKind::Bool => TypeNode::new(TypeKind::Bool),
            SchemaKind::Int => TypeNode::new(TypeKind::Int),
            SchemaKind::Float => TypeNode::new(TypeKind::Float),
            SchemaKind::String => TypeNode::string(),
            SchemaKind::Dynamic => TypeNode::new(TypeKind::Any),
            SchemaKind::Block => {
                let name = info
                    .and_then(|i| i.type_name.clone())
                    .unwrap_or_else(|| path.declared_name());
                let fields = info.map(|i| &i.fields);
                self.build_object(
                    name,
                    &schema.nested_fields,
                    fields,
                    path,
                    Position {
                        output: is_output,
                        ..Position::default()
                    },
                )?
            }
            SchemaKind::List | SchemaKind::Set | SchemaKind::Map => {
                let element_info = element_override(schema, info);
                let element = match schema.element.as_deref() {
                    Some(element) => {
                        self.build_type(Some(element), element_info.as_deref(), path, is_output)?
                    }
                    None if schema.kind == SchemaKind::Map => Some(TypeNode::string()),
                    None => None,
                };
                if schema.is_max_items_one(info) {
                    return Ok(element);
                }
                // A map of blocks projects as the block itself.
                if schema.kind == SchemaKind::Map
                    && element.as_ref().is_some_and(|e| e.kind == TypeKind::Object)
                {
                    return Ok(element);
                }
                let kind = match schema.kind {
                    SchemaKind::List => TypeKind::List,
                    SchemaKind::Set => TypeKind::Set,
                    _ => TypeKind::Map,
                };
                TypeNode::collection(kind, element)
            }
        };
        Ok(Some(node.with_deprecation(deprecation)))
    }

    /// Builds an object type from `fields`, registers it and returns it.
    ///
    /// Children are visited in key order; removed children are skipped and a repeated target
    /// name is fatal. `position` applies to the direct children only.
    pub fn build_object(
        &mut self,
        declared_name: String,
        fields: &BTreeMap<String, SchemaNode>,
        infos: Option<&BTreeMap<String, OverrideInfo>>,
        path: &TypePath,
        position: Position,
    ) -> Result<TypeNode, BuildError> {
        let properties = self.build_properties(
            fields,
            infos,
            path,
            position,
            RenameScope::Type(&declared_name),
        )?;
        let node = TypeNode::object(declared_name, properties);
        self.registry
            .register(self.module, Direction::of(position.output), &node, path)?;
        Ok(node)
    }

    /// Builds the sorted, de-duplicated property list for `fields`.
    pub fn build_properties<'f>(
        &mut self,
        fields: impl IntoIterator<Item = (&'f String, &'f SchemaNode)>,
        infos: Option<&BTreeMap<String, OverrideInfo>>,
        path: &TypePath,
        position: Position,
        scope: RenameScope<'_>,
    ) -> Result<Vec<PropertyNode>, BuildError> {
        let mut properties = Vec::new();
        let mut seen = BTreeSet::new();
        for (key, schema) in fields {
            if schema.is_removed() {
                continue;
            }
            let info = infos.and_then(|i| i.get(key));
            let Some(property) =
                self.build_property(key, Some(schema), info, path, position, scope)?
            else {
                continue;
            };
            if !seen.insert(property.target_name.clone()) {
                return Err(BuildError::DuplicateProperty {
                    name: property.target_name,
                    path: path.child(key).to_string(),
                });
            }
            properties.push(property);
        }
        Ok(properties)
    }

    /// Builds one property. Returns `Ok(None)` when its target name comes out empty.
    pub fn build_property(
        &mut self,
        key: &str,
        schema: Option<&SchemaNode>,
        info: Option<&OverrideInfo>,
        parent: &TypePath,
        position: Position,
        scope: RenameScope<'_>,
    ) -> Result<Option<PropertyNode>, BuildError> {
        let target_name = names::property_name(key, info);
        if target_name.is_empty() {
            return Ok(None);
        }
        let path = parent.child(key);

        let ty = self.build_type(schema, info, &path, position.output)?;
        let raw_description = schema.map_or("", |s| s.description.as_str());
        let doc = resolve(self.docs, path.segments(), raw_description, self.reformatter).text;

        self.renames.record_property(scope, key, &target_name);

        Ok(Some(PropertyNode {
            source_key: key.to_string(),
            target_name,
            doc,
            optional: is_optional(schema, info, position),
            is_output: position.output,
            is_config: position.config,
            force_new: info
                .and_then(|i| i.force_new)
                .unwrap_or_else(|| schema.is_some_and(|s| s.force_new)),
            deprecation_message: deprecation_message(schema, info),
            default: info.and_then(|i| i.default.clone()).filter(|d| !d.is_empty()),
            ty,
        }))
    }
}

/// Whether a property is optional in `position`.
///
/// Forced optionality wins, then an explicit override. Otherwise an output is optional only
/// if the schema says optional, not computed and there is no custom default; an input is
/// optional if the schema says optional or computed, or a custom default exists. Defaults do
/// not count for config values.
pub fn is_optional(
    schema: Option<&SchemaNode>,
    info: Option<&OverrideInfo>,
    position: Position,
) -> bool {
    if position.force_optional {
        return true;
    }
    if let Some(explicit) = info.and_then(|i| i.optional) {
        return explicit;
    }
    let custom_default = !position.config && info.is_some_and(|i| i.has_default());
    let (optional, computed) = schema.map_or((false, false), |s| (s.optional, s.computed));
    if position.output {
        optional && !computed && !custom_default
    } else {
        optional || computed || custom_default
    }
}

fn deprecation_message(schema: Option<&SchemaNode>, info: Option<&OverrideInfo>) -> Option<String> {
    schema
        .filter(|s| s.is_deprecated())
        .map(|s| s.deprecated.clone())
        .or_else(|| info.and_then(|i| i.deprecation_message.clone()))
        .filter(|m| !m.is_empty())
}

/// The override for a collection's element, carrying the container's deprecation down when
/// the element has none of its own.
fn element_override<'i>(
    schema: &SchemaNode,
    info: Option<&'i OverrideInfo>,
) -> Option<Cow<'i, OverrideInfo>> {
    let element = info.and_then(|i| i.elem.as_deref());
    if !schema.is_deprecated() || element.is_some_and(|e| e.deprecation_message.is_some()) {
        return element.map(Cow::Borrowed);
    }
    let mut owned = element.cloned().unwrap_or_default();
    owned.deprecation_message = Some(schema.deprecated.clone());
    Some(Cow::Owned(owned))
}
