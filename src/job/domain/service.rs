//! Service-specific payload carried by a job request.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of service a job request is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceKind {
    /// Delivery and transport drivers.
    Driver,
    /// Kitchen staff.
    Kitchen,
    /// Bar staff.
    Bar,
}

impl ServiceKind {
    /// Returns the service title.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Driver => "driver",
            Self::Kitchen => "kitchen staff",
            Self::Bar => "bar staff",
        }
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Role a bar staff job request asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BarRole {
    /// Bartender.
    #[default]
    Bartender,
    /// Cocktail specialist.
    Mixologist,
    /// Coffee specialist.
    Barista,
}

/// Service-specific details of a job request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "service", rename_all = "snake_case")]
pub enum ServiceDetails {
    /// A driving job.
    Driver {
        /// Vehicle the driver should bring, if any.
        vehicle_type: Option<String>,
    },
    /// A kitchen job.
    Kitchen {
        /// Food hygiene certification required, if any.
        certification: Option<String>,
    },
    /// A bar job.
    Bar {
        /// Requested bar role.
        role: BarRole,
    },
}

impl ServiceDetails {
    /// Returns the kind of service.
    #[must_use]
    pub const fn service_kind(&self) -> ServiceKind {
        match self {
            Self::Driver { .. } => ServiceKind::Driver,
            Self::Kitchen { .. } => ServiceKind::Kitchen,
            Self::Bar { .. } => ServiceKind::Bar,
        }
    }
}
