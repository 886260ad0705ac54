//! Optional change-detection capabilities declared by a plugin.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Optional capability of a task source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Discovering changes by polling since a sync point.
    Polling,
    /// Parsing push notifications from the source.
    Webhooks,
}

impl Capability {
    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Polling => "polling",
            Self::Webhooks => "webhooks",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Change-detection capabilities of a plugin. Defaults to neither.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceCapabilities {
    supports_polling: bool,
    supports_webhooks: bool,
}

impl SourceCapabilities {
    /// Creates capabilities with no optional support.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            supports_polling: false,
            supports_webhooks: false,
        }
    }

    /// Declares polling support.
    #[must_use]
    pub const fn with_polling(mut self) -> Self {
        self.supports_polling = true;
        self
    }

    /// Declares webhook support.
    #[must_use]
    pub const fn with_webhooks(mut self) -> Self {
        self.supports_webhooks = true;
        self
    }

    /// Returns whether polling is supported.
    #[must_use]
    pub const fn supports_polling(self) -> bool {
        self.supports_polling
    }

    /// Returns whether webhook parsing is supported.
    #[must_use]
    pub const fn supports_webhooks(self) -> bool {
        self.supports_webhooks
    }

    /// Returns whether the given capability is supported.
    #[must_use]
    pub const fn supports(self, capability: Capability) -> bool {
        match capability {
            Capability::Polling => self.supports_polling,
            Capability::Webhooks => self.supports_webhooks,
        }
    }
}
