//! The end-to-end build: fetch and parse docs in parallel, then gather.

use crate::config::BridgenConfig;
use crate::error::Error;
use crate::source::{DocsCache, DocsSource, SourceError};
use bridgen_batch::par_transform_map;
use bridgen_docs::{DocKind, ParseOptions, Reformatter, parse_with};
use bridgen_typegen::info::Block;
use bridgen_typegen::naming::{self, EntityName};
use bridgen_typegen::{
    BuildError, DocsMap, GatherOptions, Gathered, ProviderInfo, ProviderSchema, ResourceInfo,
    gather,
};
use std::collections::BTreeMap;

/// Per entity: the page to fetch and how to parse it for that entity.
type DocRequests = BTreeMap<(DocKind, String), (String, ParseOptions)>;
type Namer = fn(&str, &str, &ResourceInfo) -> Result<EntityName, BuildError>;

/// Builds the package for `schema` as mapped by `info`, with documentation from `source`.
///
/// Every mapped resource and data source has its page fetched (once per page, through a
/// [`DocsCache`] scoped to this call) and parsed for that entity on the batch runner, then the
/// whole provider is gathered.
pub fn generate(
    schema: &ProviderSchema,
    info: &ProviderInfo,
    source: &dyn DocsSource,
    config: &BridgenConfig,
) -> Result<Gathered, Error> {
    let mut requests = DocRequests::new();
    let base_url = &config.docs.base_url;
    collect_requests(
        &mut requests,
        DocKind::Resource,
        &schema.resources,
        info,
        &info.resources,
        naming::resource_name,
        base_url,
    );
    collect_requests(
        &mut requests,
        DocKind::DataSource,
        &schema.data_sources,
        info,
        &info.data_sources,
        naming::data_source_name,
        base_url,
    );
    tracing::debug!(pages = requests.len(), "parsing documentation");

    let cache = DocsCache::new(source);
    let docs = par_transform_map(
        requests,
        |batch| parse_batch(&cache, batch),
        config.generate.workers,
        config.generate.batch_size,
    )?;

    let options = GatherOptions {
        policy: config.mappings,
        reformatter: Reformatter::new(base_url.as_str()),
    };
    Ok(gather(schema, info, &docs, &options)?)
}

/// Queues one parse per mapped entity. Entities sharing a page through `docs_source` each get
/// their own parse, so import examples carry their own token.
fn collect_requests(
    requests: &mut DocRequests,
    kind: DocKind,
    entities: &BTreeMap<String, Block>,
    info: &ProviderInfo,
    mappings: &BTreeMap<String, ResourceInfo>,
    namer: Namer,
    base_url: &str,
) {
    for raw_name in entities.keys() {
        let Some(mapping) = mappings.get(raw_name) else {
            continue;
        };
        let page = mapping.docs_source.clone().unwrap_or_else(|| raw_name.clone());
        // Naming errors surface from gathering.
        let import_token = namer(&info.name, raw_name, mapping).ok().map(|e| e.token);
        let options = ParseOptions {
            raw_name: raw_name.clone(),
            import_token,
            import_details: mapping.import_details.clone(),
            base_url: base_url.to_string(),
            ..ParseOptions::default()
        };
        requests.insert((kind, raw_name.clone()), (page, options));
    }
}

fn parse_batch(cache: &DocsCache<'_>, batch: DocRequests) -> Result<DocsMap, SourceError> {
    let mut docs = DocsMap::new();
    for ((kind, name), (page_name, options)) in batch {
        match cache.get(kind, &page_name)? {
            Some(page) => {
                docs.insert((kind, name), parse_with(&page, &options));
            }
            None => {
                tracing::debug!(entity = %name, page = %page_name, %kind, "no documentation page")
            }
        }
    }
    Ok(docs)
}
