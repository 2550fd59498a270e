//! Built-in registry generations.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RegistryError;

const KAGGLE_V1: &str = include_str!("../../../standards/registry/kaggle_v1.toml");
const CDC_V2: &str = include_str!("../../../standards/registry/cdc_v2.toml");

/// A schema generation shipped with the pipeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Generation {
    /// Initial survey subset.
    #[serde(rename = "kaggle-v1")]
    KaggleV1,
    /// Expanded schema aligned to the public diabetes indicators dataset.
    #[default]
    #[serde(rename = "cdc-v2")]
    CdcV2,
}

impl Generation {
    pub const ALL: [Generation; 2] = [Generation::KaggleV1, Generation::CdcV2];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::KaggleV1 => "kaggle-v1",
            Self::CdcV2 => "cdc-v2",
        }
    }

    pub(crate) fn source(self) -> &'static str {
        match self {
            Self::KaggleV1 => KAGGLE_V1,
            Self::CdcV2 => CDC_V2,
        }
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Generation {
    type Err = RegistryError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|generation| generation.as_str().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| RegistryError::UnknownGeneration {
                name: value.to_string(),
            })
    }
}
