use std::fmt;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// Closed set of permissions checked by the API routes.
///
/// The wire form is the `"resource:action"` string the routes check, so a
/// granted set round-trips through the store and the session token unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    PatientRead,
    PatientCreate,
    PatientUpdate,
    PatientDelete,
    AppointmentRead,
    AppointmentCreate,
    AppointmentUpdate,
    AppointmentDelete,
    AvailabilityRead,
    AvailabilityCreate,
    AvailabilityUpdate,
    AvailabilityDelete,
}

impl Capability {
    pub const ALL: [Capability; 12] = [
        Capability::PatientRead,
        Capability::PatientCreate,
        Capability::PatientUpdate,
        Capability::PatientDelete,
        Capability::AppointmentRead,
        Capability::AppointmentCreate,
        Capability::AppointmentUpdate,
        Capability::AppointmentDelete,
        Capability::AvailabilityRead,
        Capability::AvailabilityCreate,
        Capability::AvailabilityUpdate,
        Capability::AvailabilityDelete,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::PatientRead => "patient:read",
            Capability::PatientCreate => "patient:create",
            Capability::PatientUpdate => "patient:update",
            Capability::PatientDelete => "patient:delete",
            Capability::AppointmentRead => "appointment:read",
            Capability::AppointmentCreate => "appointment:create",
            Capability::AppointmentUpdate => "appointment:update",
            Capability::AppointmentDelete => "appointment:delete",
            Capability::AvailabilityRead => "availability:read",
            Capability::AvailabilityCreate => "availability:create",
            Capability::AvailabilityUpdate => "availability:update",
            Capability::AvailabilityDelete => "availability:delete",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Capability {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Capability::ALL
            .iter()
            .find(|cap| cap.as_str() == s)
            .copied()
            .ok_or_else(|| format!("Unknown capability: {}", s))
    }
}

impl Serialize for Capability {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Capability {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}
