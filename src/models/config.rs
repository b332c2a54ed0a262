//! Planning configuration as read from JSON.

use std::collections::BTreeMap;
use std::io::Read;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{Coordinate, TimeWindow};

/// Default solve time limit in seconds.
pub const DEFAULT_TIME_LIMIT_SECS: f64 = 600.0;

fn default_time_limit() -> f64 {
    DEFAULT_TIME_LIMIT_SECS
}

/// A homogeneous fleet: `size` identical vehicles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FleetConfig {
    pub size: usize,
    pub capacity: f64,
    pub max_route_duration: f64,
    /// Distance units per minute.
    pub speed: f64,
}

/// One explicitly described vehicle of a heterogeneous fleet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VehicleConfig {
    pub capacity: f64,
    pub max_route_duration: f64,
    pub speed: f64,
}

/// One row of the customer table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CustomerConfig {
    pub coordinates: Coordinate,
    pub delivery_amount: f64,
    /// `[start, end]` in clock minutes.
    pub delivery_window: TimeWindow,
    /// Minutes spent at the customer.
    pub service_time: f64,
}

/// Immutable input snapshot for one planning run.
///
/// # Examples
///
/// ```
/// use u_routing_milp::models::PlanningConfig;
///
/// let config = PlanningConfig::from_json_str(r#"{
///     "fleet": { "size": 1, "capacity": 1000, "max_route_duration": 480, "speed": 1.0 },
///     "depot": [0, 0],
///     "customers": {
///         "1": { "coordinates": [3, 4], "delivery_amount": 400,
///                "delivery_window": [0, 480], "service_time": 15 }
///     }
/// }"#).unwrap();
/// assert_eq!(config.customers.len(), 1);
/// assert_eq!(config.departure_time, 0.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlanningConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fleet: Option<FleetConfig>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub vehicles: Vec<VehicleConfig>,
    pub depot: Coordinate,
    /// Clock minute at which every vehicle leaves the depot.
    #[serde(default)]
    pub departure_time: f64,
    #[serde(default = "default_time_limit")]
    pub time_limit_secs: f64,
    /// Keyed by customer identifier; iteration order fixes the node numbering.
    pub customers: BTreeMap<usize, CustomerConfig>,
}

impl PlanningConfig {
    /// Creates a configuration for a homogeneous fleet with no customers.
    pub fn new(fleet: FleetConfig, depot: Coordinate) -> Self {
        Self {
            fleet: Some(fleet),
            vehicles: Vec::new(),
            depot,
            departure_time: 0.0,
            time_limit_secs: DEFAULT_TIME_LIMIT_SECS,
            customers: BTreeMap::new(),
        }
    }

    /// Adds (or replaces) a customer row.
    pub fn with_customer(mut self, id: usize, customer: CustomerConfig) -> Self {
        self.customers.insert(id, customer);
        self
    }

    /// Sets the depot departure time (clock minutes).
    pub fn with_departure_time(mut self, minutes: f64) -> Self {
        self.departure_time = minutes;
        self
    }

    /// Sets the solver time limit in seconds.
    pub fn with_time_limit_secs(mut self, secs: f64) -> Self {
        self.time_limit_secs = secs;
        self
    }

    /// Parses a configuration from a JSON string.
    pub fn from_json_str(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }

    /// Parses a configuration from a JSON reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, serde_json::Error> {
        serde_json::from_reader(reader)
    }

    /// The solver time budget. Non-positive or non-finite limits fall back to
    /// the default; limits too large for a `Duration` saturate.
    pub fn time_budget(&self) -> Duration {
        if self.time_limit_secs.is_finite() && self.time_limit_secs > 0.0 {
            Duration::try_from_secs_f64(self.time_limit_secs).unwrap_or(Duration::MAX)
        } else {
            Duration::from_secs_f64(DEFAULT_TIME_LIMIT_SECS)
        }
    }
}
