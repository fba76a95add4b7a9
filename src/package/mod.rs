//! Package records and the wire payloads that carry them.
//!
//! The backend groups packages by category: a listing is a JSON object whose
//! keys are category names and whose values are lists of raw package objects.
//! [`flatten_catalog`] turns such a payload into a flat list of [`Package`]s,
//! preserving the order of the payload.

mod report;

use anyhow::{Result, bail};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

pub use report::{BatchReport, FailureDetail, SourceAck};

/// Category label carried by every user-registered package source.
pub const EXTERNAL_MODULE_SOURCES: &str = "External Module Sources";

/// A MagicMirror package as listed by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Package {
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub repository: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub author: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub category: String,
    /// Local install directory; empty until installed.
    #[serde(default, deserialize_with = "lenient_string")]
    pub directory: String,
}

impl Package {
    /// Create a package registered by the user as an external source.
    pub fn external_source(
        title: impl Into<String>,
        repository: impl Into<String>,
        author: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            repository: repository.into(),
            author: author.into(),
            description: description.into(),
            category: EXTERNAL_MODULE_SOURCES.to_string(),
            directory: String::new(),
        }
    }

    /// Two records describe the same package when title, repository, author
    /// and category all match. The directory is ignored.
    pub fn is_same_package(&self, other: &Package) -> bool {
        self.title == other.title
            && self.repository == other.repository
            && self.author == other.author
            && self.category == other.category
    }

    pub fn is_external(&self) -> bool {
        self.category == EXTERNAL_MODULE_SOURCES
    }
}

/// Flatten a category-keyed payload into package records.
///
/// A `null` payload is an empty listing. Each entry takes its category from
/// the key it is listed under, overriding anything the entry itself carries.
pub fn flatten_catalog(payload: &Value) -> Result<Vec<Package>> {
    let categories = match payload {
        Value::Null => return Ok(Vec::new()),
        Value::Object(map) => map,
        other => bail!(
            "Expected a category-keyed package listing, got {}",
            describe(other)
        ),
    };

    let mut packages = Vec::new();

    for (category, entries) in categories {
        let entries = match entries {
            Value::Array(entries) => entries,
            Value::Null => continue,
            other => bail!(
                "Expected a list of packages under '{}', got {}",
                category,
                describe(other)
            ),
        };

        for entry in entries {
            let mut package = Package::deserialize(entry)?;
            package.category = category.clone();
            packages.push(package);
        }
    }

    Ok(packages)
}

/// Decode a list of packages that may be either a flat array or a
/// category-keyed object.
pub fn packages_from_value(value: &Value) -> Result<Vec<Package>> {
    match value {
        Value::Array(entries) => entries
            .iter()
            .map(|entry| Package::deserialize(entry).map_err(anyhow::Error::from))
            .collect(),
        other => flatten_catalog(other),
    }
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

/// Accept strings as-is, `null` as empty, and render any other JSON value
/// as its textual form.
pub(crate) fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    })
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::Package;

    pub fn package(title: &str, category: &str) -> Package {
        Package {
            title: title.to_string(),
            repository: format!("https://github.com/example/{}", title),
            author: "example".to_string(),
            description: format!("{} description", title),
            category: category.to_string(),
            directory: String::new(),
        }
    }
}
