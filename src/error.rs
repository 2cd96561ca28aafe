// Copyright 2023 Mikael Lund
//
// Licensed under the Apache license, version 2.0 (the "license");
// you may not use this file except in compliance with the license.
// You may obtain a copy of the license at
//
//     http://www.apache.org/licenses/license-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the license is distributed on an "as is" basis,
// without warranties or conditions of any kind, either express or implied.
// See the license for the specific language governing permissions and
// limitations under the license.

use thiserror::Error;

/// Errors raised when constructing or using an interaction scheme
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// A construction parameter is missing or outside its domain
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Number of squared moments does not match the number of self-energy prefactors
    #[error("expected {expected} squared moments but got {found}")]
    DimensionMismatch { expected: usize, found: usize },

    /// Scheme tag that does not name any known scheme
    #[error("unknown interaction scheme `{0}`")]
    UnknownScheme(String),

    /// Malformed scheme configuration
    #[error("cannot parse scheme configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<validator::ValidationErrors> for Error {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::InvalidParameter(errors.to_string())
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(error: serde_yaml::Error) -> Self {
        Self::Config(error.to_string())
    }
}
