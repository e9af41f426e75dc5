//! Entity gatherer: builds the module graph of a whole provider.

use crate::builder::{Position, TypeBuilder};
use crate::error::{BuildError, GatherError, MappingErrors, Mismatch};
use crate::info::{Block, ProviderInfo, ProviderSchema, ResourceInfo};
use crate::model::{PropertyNode, TypeNode};
use crate::module::{
    CONFIG_MODULE, FunctionType, Member, Module, OverlayFile, Package, ResourceType,
};
use crate::naming::{self, EntityName};
use crate::path::TypePath;
use crate::policy::{MappingPolicy, Strictness};
use crate::registry::TypeRegistry;
use crate::renames::{RenameScope, Renames};
use bridgen_docs::{DocKind, EntityDocs, Reformatter};
use bridgen_schema::{OverrideInfo, SchemaNode, names};
use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet};

/// Parsed documentation keyed by entity kind and upstream name.
pub type DocsMap = BTreeMap<(DocKind, String), EntityDocs>;

const ID_DESCRIPTION: &str = "The provider-assigned unique ID for this managed resource.";

/// Settings for [`gather`].
#[derive(Debug, Clone, Default)]
pub struct GatherOptions {
    pub policy: MappingPolicy,
    /// Cleans raw schema descriptions used as documentation fallback.
    pub reformatter: Reformatter,
}

/// Result of gathering a provider.
#[derive(Debug)]
pub struct Gathered {
    pub package: Package,
    pub renames: Renames,
    /// Every declared object type, including the top-level argument/state/result types.
    pub types: TypeRegistry,
}

/// Builds the package for `schema` as mapped by `info`.
///
/// Structural errors abort immediately. Mapping mismatches are collected over the whole
/// provider and, for the classes `options.policy` marks as errors, returned together at the
/// end; otherwise they are logged and the entity is skipped.
pub fn gather(
    schema: &ProviderSchema,
    info: &ProviderInfo,
    docs: &DocsMap,
    options: &GatherOptions,
) -> Result<Gathered, GatherError> {
    let mut gatherer = Gatherer {
        info,
        docs,
        options,
        registry: TypeRegistry::new(),
        renames: Renames::default(),
        mismatches: MappingErrors::default(),
    };

    let mut package = Package::new(&info.name, &info.version);
    if let Some(config) = gatherer.gather_config(&schema.config)? {
        package.add_module(config)?;
    }
    package.provider = Some(gatherer.gather_provider(&schema.config)?);
    package.add_modules(gatherer.gather_resources(&schema.resources)?)?;
    package.add_modules(gatherer.gather_data_sources(&schema.data_sources)?)?;
    package.add_modules(gatherer.gather_overlays()?)?;

    if !gatherer.mismatches.is_empty() {
        return Err(GatherError::Mappings(gatherer.mismatches));
    }
    tracing::debug!(
        package = %info.name,
        modules = package.modules.len(),
        types = gatherer.registry.len(),
        "gathered package"
    );
    Ok(Gathered {
        package,
        renames: gatherer.renames,
        types: gatherer.registry,
    })
}

struct Gatherer<'a> {
    info: &'a ProviderInfo,
    docs: &'a DocsMap,
    options: &'a GatherOptions,
    registry: TypeRegistry,
    renames: Renames,
    mismatches: MappingErrors,
}

/// What the three resource passes need to know about one resource.
struct ResourceSpec<'s> {
    raw_name: &'s str,
    entity: EntityName,
    root: TypePath,
    doc: String,
    import_instructions: String,
    is_provider: bool,
    fields: &'s Block,
    infos: &'s BTreeMap<String, OverrideInfo>,
}

impl<'a> Gatherer<'a> {
    fn builder<'b>(&'b mut self, docs: &'b EntityDocs, module: &'b str) -> TypeBuilder<'b> {
        TypeBuilder::new(
            docs,
            &self.options.reformatter,
            &mut self.registry,
            &mut self.renames,
        )
        .in_module(module)
    }

    /// Docs parsed for the entity itself, else the page it borrows through `docs_source`.
    fn docs_for(&self, kind: DocKind, raw_name: &str, info: &ResourceInfo) -> Cow<'a, EntityDocs> {
        let docs = self.docs;
        let found = docs.get(&(kind, raw_name.to_string())).or_else(|| {
            let source = info.docs_source.as_deref()?;
            docs.get(&(kind, source.to_string()))
        });
        match found {
            Some(docs) => Cow::Borrowed(docs),
            None => {
                tracing::debug!(entity = raw_name, %kind, "no documentation");
                Cow::Owned(EntityDocs::default())
            }
        }
    }

    fn gather_config(&mut self, config: &Block) -> Result<Option<Module>, BuildError> {
        if config.is_empty() && self.info.extra_config.is_empty() {
            return Ok(None);
        }
        let info = self.info;
        let docs = EntityDocs::default();
        let root = TypePath::new("config", "Config");
        let mut module = Module::config_module();
        let mut builder = self.builder(&docs, CONFIG_MODULE);

        for (key, schema) in config {
            if schema.is_removed() {
                continue;
            }
            let variable = builder.build_property(
                key,
                Some(schema),
                info.config.get(key),
                &root,
                Position::CONFIG,
                RenameScope::Config,
            )?;
            if let Some(variable) = variable {
                module.add_member(Member::Variable(variable))?;
            }
        }
        for (key, extra) in &info.extra_config {
            let variable = builder.build_property(
                key,
                extra.schema.as_ref(),
                extra.info.as_ref(),
                &root,
                Position::CONFIG,
                RenameScope::Config,
            )?;
            if let Some(variable) = variable {
                module.add_member(Member::Variable(variable))?;
            }
        }

        for key in info.config.keys().filter(|k| !config.contains_key(*k)) {
            tracing::warn!(key = %key, "config override has no schema entry");
        }
        Ok(Some(module))
    }

    fn gather_provider(&mut self, config: &Block) -> Result<ResourceType, BuildError> {
        let info = self.info;
        let provider = &info.name;
        let doc = format!(
            "The provider type for the {provider} package. By default, resources use package-wide configuration\n\
             settings, however an explicit `Provider` instance may be created and passed during resource\n\
             construction to achieve fine-grained programmatic control over provider settings."
        );
        self.gather_resource_type(
            &EntityDocs::default(),
            ResourceSpec {
                raw_name: "",
                entity: EntityName {
                    name: "Provider".to_string(),
                    module: String::new(),
                    token: format!("pulumi:providers:{provider}"),
                },
                root: TypePath::new("provider", "Provider"),
                doc,
                import_instructions: String::new(),
                is_provider: true,
                fields: config,
                infos: &info.config,
            },
        )
    }

    fn gather_resources(
        &mut self,
        resources: &BTreeMap<String, Block>,
    ) -> Result<Vec<Module>, BuildError> {
        let info = self.info;
        let mut modules = BTreeMap::new();
        for (raw_name, fields) in resources {
            let Some(resource_info) = info.resources.get(raw_name) else {
                self.missing_mapping(DocKind::Resource, raw_name);
                continue;
            };
            let entity = naming::resource_name(&info.name, raw_name, resource_info)?;
            let docs = self.docs_for(DocKind::Resource, raw_name, resource_info);
            self.warn_unknown_fields(raw_name, fields, &resource_info.fields);

            let module = entity.module.clone();
            let resource = self.gather_resource_type(
                &docs,
                ResourceSpec {
                    raw_name,
                    root: TypePath::new(format!("resource:{raw_name}"), entity.name.clone()),
                    entity,
                    doc: docs.description.clone(),
                    import_instructions: docs.import_instructions.clone(),
                    is_provider: false,
                    fields,
                    infos: &resource_info.fields,
                },
            )?;
            self.renames.record_resource(&resource.token, raw_name);
            ensure_module(&mut modules, &module).add_member(Member::Resource(resource))?;
        }

        for raw_name in info.resources.keys() {
            if !resources.contains_key(raw_name) {
                self.extra_mapping(DocKind::Resource, raw_name);
            }
        }
        Ok(modules.into_values().collect())
    }

    /// Runs the output, input and state passes over one resource's fields.
    fn gather_resource_type(
        &mut self,
        docs: &EntityDocs,
        spec: ResourceSpec<'_>,
    ) -> Result<ResourceType, BuildError> {
        let ResourceSpec {
            raw_name,
            entity,
            root,
            doc,
            import_instructions,
            is_provider,
            fields,
            infos,
        } = spec;
        let name = entity.name;
        let scope = RenameScope::Type(&entity.token);
        let mut builder = self.builder(docs, &entity.module);

        // Provider outputs are not modelled.
        let outputs = if is_provider {
            Vec::new()
        } else {
            builder.build_properties(fields, Some(infos), &root, Position::OUTPUT, scope)?
        };
        let settable = fields
            .iter()
            .filter(|(key, schema)| schema.is_settable(infos.get(*key)));
        let inputs = builder.build_properties(settable, Some(infos), &root, Position::INPUT, scope)?;
        let state = builder.build_properties(fields, Some(infos), &root, Position::STATE, scope)?;

        let required_inputs = required(&inputs);
        let args = TypeNode::object(format!("{name}Args"), inputs)
            .with_doc(format!("The set of arguments for constructing a {name} resource."));
        let state = TypeNode::object(format!("{name}State"), state).with_doc(format!(
            "Input properties used for looking up and filtering {name} resources."
        ));

        tracing::debug!(resource = raw_name, name = %name, "gathered resource");
        Ok(ResourceType {
            name,
            raw_name: raw_name.to_string(),
            token: entity.token,
            doc,
            import_instructions,
            is_provider,
            args,
            outputs,
            state,
            required_inputs,
        })
    }

    fn gather_data_sources(
        &mut self,
        data_sources: &BTreeMap<String, Block>,
    ) -> Result<Vec<Module>, BuildError> {
        let info = self.info;
        let mut modules = BTreeMap::new();
        for (raw_name, fields) in data_sources {
            let Some(source_info) = info.data_sources.get(raw_name) else {
                self.missing_mapping(DocKind::DataSource, raw_name);
                continue;
            };
            let entity = naming::data_source_name(&info.name, raw_name, source_info)?;
            let docs = self.docs_for(DocKind::DataSource, raw_name, source_info);
            self.warn_unknown_fields(raw_name, fields, &source_info.fields);

            let module = entity.module.clone();
            let function = self.gather_function(raw_name, entity, &docs, fields, &source_info.fields)?;
            self.renames.record_function(&function.token, raw_name);
            ensure_module(&mut modules, &module).add_member(Member::Function(function))?;
        }

        for raw_name in info.data_sources.keys() {
            if !data_sources.contains_key(raw_name) {
                self.extra_mapping(DocKind::DataSource, raw_name);
            }
        }
        Ok(modules.into_values().collect())
    }

    fn gather_function(
        &mut self,
        raw_name: &str,
        entity: EntityName,
        docs: &EntityDocs,
        fields: &Block,
        infos: &BTreeMap<String, OverrideInfo>,
    ) -> Result<FunctionType, BuildError> {
        let prefix = names::upper_first(&entity.name);
        let root = TypePath::new(format!("data_source:{raw_name}"), prefix.clone());
        let scope = RenameScope::Type(&entity.token);
        let mut builder = self.builder(docs, &entity.module);

        let settable = fields
            .iter()
            .filter(|(key, schema)| schema.is_settable(infos.get(*key)));
        let args = builder.build_properties(settable, Some(infos), &root, Position::INPUT, scope)?;
        let mut results =
            builder.build_properties(fields, Some(infos), &root, Position::OUTPUT, scope)?;

        if !fields.contains_key("id") {
            let id = SchemaNode::string()
                .computed()
                .with_description(ID_DESCRIPTION);
            if let Some(property) =
                builder.build_property("id", Some(&id), None, &root, Position::OUTPUT, scope)?
            {
                results.push(property);
                results.sort_by(|a, b| a.source_key.cmp(&b.source_key));
            }
        }

        let name = &entity.name;
        let required_args = required(&args);
        let args = (!args.is_empty()).then(|| {
            TypeNode::object(format!("{prefix}Args"), args)
                .with_doc(format!("A collection of arguments for invoking {name}."))
        });
        let result = TypeNode::object(format!("{prefix}Result"), results)
            .with_doc(format!("A collection of values returned by {name}."));

        tracing::debug!(data_source = raw_name, name = %name, "gathered data source");
        Ok(FunctionType {
            name: entity.name.clone(),
            raw_name: raw_name.to_string(),
            token: entity.token.clone(),
            doc: docs.description.clone(),
            args,
            result,
            required_args,
        })
    }

    fn gather_overlays(&self) -> Result<Vec<Module>, BuildError> {
        let Some(overlay) = &self.info.overlay else {
            return Ok(Vec::new());
        };
        let mut modules = BTreeMap::new();
        for file in &overlay.dest_files {
            ensure_module(&mut modules, "").add_member(overlay_member(file))?;
        }
        for (name, nested) in &overlay.modules {
            if !nested.modules.is_empty() {
                return Err(BuildError::NestedOverlay {
                    module: name.clone(),
                });
            }
            let module = ensure_module(&mut modules, name);
            for file in &nested.dest_files {
                module.add_member(overlay_member(file))?;
            }
        }
        Ok(modules.into_values().collect())
    }

    fn missing_mapping(&mut self, kind: DocKind, raw_name: &str) {
        match self.options.policy.missing {
            Strictness::Error => self.mismatches.missing.push(Mismatch {
                kind,
                name: raw_name.to_string(),
            }),
            Strictness::Warn => {
                tracing::warn!(entity = raw_name, %kind, "not found in provider map; skipping")
            }
        }
    }

    fn extra_mapping(&mut self, kind: DocKind, raw_name: &str) {
        match self.options.policy.extra {
            Strictness::Error => self.mismatches.extra.push(Mismatch {
                kind,
                name: raw_name.to_string(),
            }),
            Strictness::Warn => tracing::warn!(
                entity = raw_name,
                %kind,
                "mapped but not present in the provider schema; possible name mismatch"
            ),
        }
    }

    fn warn_unknown_fields(
        &self,
        raw_name: &str,
        fields: &Block,
        infos: &BTreeMap<String, OverrideInfo>,
    ) {
        for key in infos.keys().filter(|k| !fields.contains_key(*k)) {
            tracing::warn!(entity = raw_name, key = %key, "field override has no schema entry");
        }
    }
}

fn required(properties: &[PropertyNode]) -> BTreeSet<String> {
    properties
        .iter()
        .filter(|p| !p.optional)
        .map(|p| p.target_name.clone())
        .collect()
}

fn ensure_module<'m>(modules: &'m mut BTreeMap<String, Module>, name: &str) -> &'m mut Module {
    let name = naming::module_name(name);
    modules
        .entry(name.clone())
        .or_insert_with(|| Module::new(name))
}

fn overlay_member(file: &str) -> Member {
    Member::Overlay(OverlayFile {
        name: file.to_string(),
    })
}
