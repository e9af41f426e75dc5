use bridgen_schema::names;
use std::fmt;

/// Where a node sits: the entity it belongs to plus the source keys leading to it.
///
/// Collection elements share their container's path. The display form
/// (`resource:aws_s3_bucket.website.index_document`) is what errors report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypePath {
    root: String,
    type_prefix: String,
    segments: Vec<String>,
}

impl TypePath {
    /// `root` identifies the entity (`resource:aws_s3_bucket`); `type_prefix` starts the
    /// derived names of nested object types (`Bucket`).
    pub fn new(root: impl Into<String>, type_prefix: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            type_prefix: type_prefix.into(),
            segments: Vec::new(),
        }
    }

    pub fn child(&self, key: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(key.to_string());
        Self {
            root: self.root.clone(),
            type_prefix: self.type_prefix.clone(),
            segments,
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Derived name of an object type at this path: the prefix followed by each segment in
    /// upper camel case.
    pub fn declared_name(&self) -> String {
        let mut name = self.type_prefix.clone();
        for segment in &self.segments {
            name.push_str(&names::type_name(segment));
        }
        name
    }
}

impl fmt::Display for TypePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.root)?;
        for segment in &self.segments {
            write!(f, ".{segment}")?;
        }
        Ok(())
    }
}
