//! Process-wide service identity.

use super::parse::Vars;

/// Metadata describing the running service, stamped on every event.
///
/// Built once at startup and passed by reference to the assembler.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ServiceInfo {
    /// Service type, e.g. `order-service`. Absent when not configured.
    pub service_type: Option<String>,
}

impl ServiceInfo {
    pub fn new(service_type: impl Into<String>) -> Self {
        Self {
            service_type: Some(service_type.into()),
        }
    }

    pub(crate) fn from_vars(vars: &Vars) -> Self {
        Self {
            service_type: vars.opt("SERVICE_TYPE"),
        }
    }
}
