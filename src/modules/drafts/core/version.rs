use crate::shared::core::primitives::EpochMillis;
use serde::{Deserialize, Serialize};

/// One timestamped snapshot of a description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Version {
    pub text: String,
    pub timestamp: EpochMillis,
}

impl Version {
    pub fn new(text: impl Into<String>, timestamp: EpochMillis) -> Self {
        Self {
            text: text.into(),
            timestamp,
        }
    }
}
