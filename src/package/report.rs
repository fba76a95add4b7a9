//! Results reported by the backend for batch and source operations.

use serde::{Deserialize, Serialize};

use super::{Package, lenient_string};

/// A package the backend failed to process, with the reason it gave.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FailureDetail {
    #[serde(flatten)]
    pub package: Package,
    #[serde(default, deserialize_with = "lenient_string")]
    pub error: String,
}

/// Outcome of an install, uninstall or upgrade request.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct BatchReport {
    pub failures: Vec<FailureDetail>,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Install and uninstall answer `{"failures": [...]}` while upgrade answers
/// with the bare list. Both decode to the same report.
#[derive(Deserialize)]
#[serde(untagged)]
enum WireBatchReport {
    Wrapped {
        #[serde(default)]
        failures: Vec<FailureDetail>,
    },
    Bare(Vec<FailureDetail>),
}

impl<'de> Deserialize<'de> for BatchReport {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let failures = match WireBatchReport::deserialize(deserializer)? {
            WireBatchReport::Wrapped { failures } | WireBatchReport::Bare(failures) => failures,
        };
        Ok(Self { failures })
    }
}

/// Acknowledgement of an add-source request.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SourceAck {
    #[serde(default, deserialize_with = "lenient_string")]
    pub error: String,
}

impl SourceAck {
    /// The literal marker the backend sends when nothing went wrong.
    pub const NO_ERROR: &'static str = "no_error";

    pub fn is_success(&self) -> bool {
        self.error == Self::NO_ERROR
    }
}
