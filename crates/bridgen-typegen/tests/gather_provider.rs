//! End-to-end gathering of a small provider with parsed documentation.

use bridgen_docs::{DocKind, ParseOptions, parse_with};
use bridgen_schema::{OverrideInfo, SchemaNode};
use bridgen_typegen::{
    DocsMap, Emitter, GatherOptions, JsonEmitter, Member, ProviderInfo, ProviderSchema,
    ResourceInfo, TypeKind, gather,
};
use std::collections::BTreeMap;

const BUCKET_DOCS: &str = r#"---
subcategory: "S3"
---

# Resource: aws_s3_bucket

Provides a S3 bucket resource.

## Argument Reference

* `bucket` - (Optional, Forces new resource) The name of the bucket.
* `website` - (Optional) A website object (documented below).
* `tags` - (Optional) A map of tags to assign to the bucket.

The `website` object supports the following:

* `index_document` - (Required) Amazon S3 returns this index document.
* `routing_rules` - (Optional) A json array containing routing rules.

## Attributes Reference

* `arn` - The ARN of the bucket.

## Import

S3 bucket can be imported using the `bucket`, e.g.

```
$ terraform import aws_s3_bucket.bucket bucket-name
```
"#;

fn schema() -> ProviderSchema {
    let website = SchemaNode::block([
        ("index_document", SchemaNode::string().optional()),
        ("routing_rules", SchemaNode::string().optional()),
    ]);
    let bucket = BTreeMap::from([
        (
            "bucket".to_string(),
            SchemaNode::string().optional().computed().force_new(),
        ),
        (
            "website".to_string(),
            SchemaNode::list(website).max_items_one().optional(),
        ),
        (
            "tags".to_string(),
            SchemaNode::map(Some(SchemaNode::string())).optional(),
        ),
        ("arn".to_string(), SchemaNode::string().computed()),
    ]);
    ProviderSchema {
        config: BTreeMap::from([(
            "region".to_string(),
            SchemaNode::string().required(),
        )]),
        resources: BTreeMap::from([("aws_s3_bucket".to_string(), bucket)]),
        data_sources: BTreeMap::new(),
    }
}

fn info() -> ProviderInfo {
    ProviderInfo {
        name: "aws".to_string(),
        version: "6.0.0".to_string(),
        resources: BTreeMap::from([(
            "aws_s3_bucket".to_string(),
            ResourceInfo::with_token("aws:s3/bucket:Bucket")
                .with_field("tags", OverrideInfo::default().with_elem(OverrideInfo::default())),
        )]),
        ..ProviderInfo::default()
    }
}

fn docs() -> DocsMap {
    let options = ParseOptions {
        raw_name: "aws_s3_bucket".to_string(),
        import_token: Some("aws:s3/bucket:Bucket".to_string()),
        ..ParseOptions::default()
    };
    DocsMap::from([(
        (DocKind::Resource, "aws_s3_bucket".to_string()),
        parse_with(BUCKET_DOCS.as_bytes(), &options),
    )])
}

#[test]
fn bucket_resource_is_documented() {
    let gathered = gather(&schema(), &info(), &docs(), &GatherOptions::default()).unwrap();
    let Some(Member::Resource(bucket)) = gathered
        .package
        .module("s3")
        .and_then(|m| m.member("Bucket"))
    else {
        panic!("bucket resource missing");
    };

    assert_eq!(bucket.doc, "Provides a S3 bucket resource.");
    assert!(bucket.import_instructions.contains("$ pulumi import aws:s3/bucket:Bucket"));

    let name = bucket.args.property("bucket").unwrap();
    assert!(name.optional);
    assert!(name.force_new);
    assert_eq!(name.doc, "The name of the bucket.");

    let website = bucket.args.property("website").unwrap();
    let website_type = website.ty.as_ref().unwrap();
    assert_eq!(website_type.kind, TypeKind::Object);
    assert_eq!(website_type.declared_name.as_deref(), Some("BucketWebsite"));
    let index = website_type.property("indexDocument").unwrap();
    assert_eq!(index.doc, "Amazon S3 returns this index document.");

    let tags = bucket.args.property("tags").unwrap().ty.as_ref().unwrap();
    assert_eq!(tags.kind, TypeKind::Map);

    let arn = bucket
        .outputs
        .iter()
        .find(|p| p.target_name == "arn")
        .unwrap();
    assert!(!arn.optional);
    assert_eq!(arn.doc, "The ARN of the bucket.");
    assert!(bucket.args.property("arn").is_none());
    assert!(bucket.required_inputs.is_empty());
}

#[test]
fn rename_tables() {
    let gathered = gather(&schema(), &info(), &docs(), &GatherOptions::default()).unwrap();
    insta::assert_snapshot!(
        serde_json::to_string(&gathered.renames).unwrap(),
        @r#"{"resources":{"aws:s3/bucket:Bucket":"aws_s3_bucket"},"renamedProperties":{"BucketWebsite":{"indexDocument":"index_document","routingRules":"routing_rules"}}}"#
    );
}

#[test]
fn required_config_is_required_on_the_provider() {
    let gathered = gather(&schema(), &info(), &docs(), &GatherOptions::default()).unwrap();
    let provider = gathered.package.provider.as_ref().unwrap();
    assert_eq!(
        provider.required_inputs.iter().collect::<Vec<_>>(),
        ["region"]
    );
    let Some(Member::Variable(region)) = gathered
        .package
        .module("config")
        .and_then(|m| m.member("region"))
    else {
        panic!("region variable missing");
    };
    assert!(!region.optional);
}

#[test]
fn json_emitter_output_is_stable() {
    let emitter = JsonEmitter::default();
    let first = gather(&schema(), &info(), &docs(), &GatherOptions::default()).unwrap();
    let second = gather(&schema(), &info(), &docs(), &GatherOptions::default()).unwrap();
    let a = emitter.emit(&first.package).unwrap();
    let b = emitter.emit(&second.package).unwrap();
    assert_eq!(a, b);
    assert!(a["schema.json"].contains("\"declaredName\": \"BucketWebsite\""));
}
