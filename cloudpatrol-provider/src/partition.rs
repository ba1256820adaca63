//! AWS partition identifiers.
//!
//! Partitions are a closed set; an identifier outside it is a configuration
//! error and is rejected instead of silently falling back to the standard
//! partition.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// A top-level division of AWS infrastructure with its own endpoints and
/// region set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Partition {
    /// Standard public partition (`aws`).
    Aws,
    /// GovCloud (`aws-us-gov`).
    AwsUsGov,
    /// China (`aws-cn`).
    AwsCn,
    /// Isolated (`aws-iso`).
    AwsIso,
    /// Isolated B (`aws-iso-b`).
    AwsIsoB,
}

/// The supplied partition identifier is not one of the known partitions.
#[derive(Debug, Error)]
#[error("unrecognized partition identifier: {0}")]
pub struct UnknownPartitionError(pub String);

impl Partition {
    /// Canonical identifier as it appears in ARNs and configuration.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Aws => "aws",
            Self::AwsUsGov => "aws-us-gov",
            Self::AwsCn => "aws-cn",
            Self::AwsIso => "aws-iso",
            Self::AwsIsoB => "aws-iso-b",
        }
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Partition {
    type Err = UnknownPartitionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "aws" => Ok(Self::Aws),
            "aws-us-gov" => Ok(Self::AwsUsGov),
            "aws-cn" => Ok(Self::AwsCn),
            "aws-iso" => Ok(Self::AwsIso),
            "aws-iso-b" => Ok(Self::AwsIsoB),
            other => Err(UnknownPartitionError(other.to_string())),
        }
    }
}
