//! Target names, modules and tokens of resources and data sources.

use crate::error::BuildError;
use crate::info::ResourceInfo;
use bridgen_schema::names;

/// Placement of an entity in the generated package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityName {
    pub name: String,
    /// Module name; `""` is the root module.
    pub module: String,
    pub token: String,
}

/// Name of a resource: the explicit token if any, otherwise the upstream name without the
/// provider prefix in upper camel case, in a module named after it in lower camel case.
pub fn resource_name(
    provider: &str,
    raw_name: &str,
    info: &ResourceInfo,
) -> Result<EntityName, BuildError> {
    if let Some(token) = explicit_token(info) {
        return parse_token(token);
    }
    let stripped = without_provider_prefix(provider, raw_name)?;
    let name = names::type_name(stripped);
    let module = names::property_name(stripped, None);
    Ok(EntityName {
        token: format!("{provider}:{module}:{name}"),
        name,
        module,
    })
}

/// Name of a data source function: like [`resource_name`] but in lower camel case, so the
/// function and its module share a name (`aws_ami` is `ami` in module `ami`).
pub fn data_source_name(
    provider: &str,
    raw_name: &str,
    info: &ResourceInfo,
) -> Result<EntityName, BuildError> {
    if let Some(token) = explicit_token(info) {
        return parse_token(token);
    }
    let stripped = without_provider_prefix(provider, raw_name)?;
    let name = names::property_name(stripped, None);
    Ok(EntityName {
        token: format!("{provider}:{name}:{name}"),
        module: name.clone(),
        name,
    })
}

/// Module a token's module part maps to: `index` is the root module and anything after a
/// `/` is dropped (`s3/bucket` is `s3`).
pub fn module_name(module: &str) -> String {
    let module = module.split('/').next().unwrap_or_default();
    if module == "index" {
        String::new()
    } else {
        module.to_string()
    }
}

fn explicit_token(info: &ResourceInfo) -> Option<&str> {
    info.token.as_deref().filter(|t| !t.is_empty())
}

fn parse_token(token: &str) -> Result<EntityName, BuildError> {
    let mut parts = token.split(':');
    match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(pkg), Some(module), Some(name), None)
            if !pkg.is_empty() && !name.is_empty() =>
        {
            Ok(EntityName {
                name: name.to_string(),
                module: module_name(module),
                token: token.to_string(),
            })
        }
        _ => Err(BuildError::InvalidToken {
            token: token.to_string(),
        }),
    }
}

fn without_provider_prefix<'r>(provider: &str, raw_name: &'r str) -> Result<&'r str, BuildError> {
    raw_name
        .strip_prefix(provider)
        .and_then(|rest| rest.strip_prefix('_'))
        .ok_or_else(|| BuildError::MissingPrefix {
            name: raw_name.to_string(),
            prefix: format!("{provider}_"),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_names() {
        let info = ResourceInfo::default();
        let res = resource_name("aws", "aws_s3_bucket_policy", &info).unwrap();
        assert_eq!(res.name, "S3BucketPolicy");
        assert_eq!(res.module, "s3BucketPolicy");
        assert_eq!(res.token, "aws:s3BucketPolicy:S3BucketPolicy");

        let ds = data_source_name("aws", "aws_ami", &info).unwrap();
        assert_eq!(ds.name, "ami");
        assert_eq!(ds.module, "ami");
        assert_eq!(ds.token, "aws:ami:ami");

        let ds = data_source_name("aws", "aws_ec2_instance_type", &info).unwrap();
        assert_eq!(ds.name, "ec2InstanceType");
    }

    #[test]
    fn explicit_tokens() {
        let info = ResourceInfo::with_token("aws:s3/bucket:Bucket");
        let res = resource_name("aws", "aws_s3_bucket", &info).unwrap();
        assert_eq!(
            res,
            EntityName {
                name: "Bucket".into(),
                module: "s3".into(),
                token: "aws:s3/bucket:Bucket".into(),
            }
        );

        let root = ResourceInfo::with_token("aws:index/getRegion:getRegion");
        assert_eq!(data_source_name("aws", "aws_region", &root).unwrap().module, "");

        let bad = ResourceInfo::with_token("aws:Bucket");
        assert!(matches!(
            resource_name("aws", "aws_s3_bucket", &bad),
            Err(BuildError::InvalidToken { .. })
        ));
    }

    #[test]
    fn prefix_required() {
        let err = resource_name("aws", "azurerm_thing", &ResourceInfo::default()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "`azurerm_thing` does not start with the provider prefix `aws_`"
        );
    }
}
