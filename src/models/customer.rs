//! Location, customer, and delivery window types.

use serde::{Deserialize, Serialize};

/// A point in the plane. Distances between points are straight-line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coordinate {
    /// X-coordinate.
    pub x: f64,
    /// Y-coordinate.
    pub y: f64,
}

impl Coordinate {
    /// Creates a coordinate.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another coordinate.
    pub fn distance_to(&self, other: &Coordinate) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Returns `true` if both components are finite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<[f64; 2]> for Coordinate {
    fn from([x, y]: [f64; 2]) -> Self {
        Self { x, y }
    }
}

impl From<Coordinate> for [f64; 2] {
    fn from(c: Coordinate) -> Self {
        [c.x, c.y]
    }
}

/// The interval within which service at a customer must begin.
///
/// Times are clock minutes. A vehicle arriving before `start` waits.
///
/// # Examples
///
/// ```
/// use u_routing_milp::models::TimeWindow;
///
/// let tw = TimeWindow::new(540.0, 660.0).unwrap();
/// assert!(tw.contains(600.0));
/// assert!(!tw.contains(661.0));
/// assert!(TimeWindow::new(660.0, 540.0).is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct TimeWindow {
    start: f64,
    end: f64,
}

impl TimeWindow {
    /// Creates a new delivery window.
    ///
    /// Returns `None` if `start > end` or either value is non-finite.
    pub fn new(start: f64, end: f64) -> Option<Self> {
        if !start.is_finite() || !end.is_finite() || start > end {
            return None;
        }
        Some(Self { start, end })
    }

    /// Earliest allowed service start.
    pub fn start(&self) -> f64 {
        self.start
    }

    /// Latest allowed service start.
    pub fn end(&self) -> f64 {
        self.end
    }

    /// Returns `true` if service may begin at the given time.
    pub fn contains(&self, time: f64) -> bool {
        time >= self.start && time <= self.end
    }

    /// Returns `true` if `time` lies in the window allowing `tol` of slack on
    /// either side.
    pub fn contains_within(&self, time: f64, tol: f64) -> bool {
        time >= self.start - tol && time <= self.end + tol
    }
}

// Deserialization goes through `From`, so malformed windows are kept as-is and
// rejected later by validation with a descriptive error.
impl From<[f64; 2]> for TimeWindow {
    fn from([start, end]: [f64; 2]) -> Self {
        Self { start, end }
    }
}

impl From<TimeWindow> for [f64; 2] {
    fn from(tw: TimeWindow) -> Self {
        [tw.start, tw.end]
    }
}

/// A customer awaiting a delivery.
///
/// `id` is the external identifier from the customer table; the node index
/// used by the model is assigned by [`RoutingInstance`](super::RoutingInstance).
///
/// # Examples
///
/// ```
/// use u_routing_milp::models::{Coordinate, Customer, TimeWindow};
///
/// let tw = TimeWindow::new(540.0, 660.0).unwrap();
/// let c = Customer::new(1, Coordinate::new(10.0, 15.0), 300.0, tw, 15.0);
/// assert_eq!(c.id(), 1);
/// assert_eq!(c.demand(), 300.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Customer {
    id: usize,
    location: Coordinate,
    demand: f64,
    time_window: TimeWindow,
    service_duration: f64,
}

impl Customer {
    /// Creates a new customer.
    pub fn new(
        id: usize,
        location: Coordinate,
        demand: f64,
        time_window: TimeWindow,
        service_duration: f64,
    ) -> Self {
        Self {
            id,
            location,
            demand,
            time_window,
            service_duration,
        }
    }

    /// External customer identifier.
    pub fn id(&self) -> usize {
        self.id
    }

    /// Where the delivery takes place.
    pub fn location(&self) -> Coordinate {
        self.location
    }

    /// Delivery amount (mass).
    pub fn demand(&self) -> f64 {
        self.demand
    }

    /// Delivery window in clock minutes.
    pub fn time_window(&self) -> &TimeWindow {
        &self.time_window
    }

    /// Fixed service duration in minutes.
    pub fn service_duration(&self) -> f64 {
        self.service_duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_window_valid() {
        let tw = TimeWindow::new(10.0, 20.0).expect("valid");
        assert_eq!(tw.start(), 10.0);
        assert_eq!(tw.end(), 20.0);
    }

    #[test]
    fn test_time_window_invalid() {
        assert!(TimeWindow::new(20.0, 10.0).is_none());
        assert!(TimeWindow::new(f64::NAN, 10.0).is_none());
        assert!(TimeWindow::new(10.0, f64::INFINITY).is_none());
    }

    #[test]
    fn test_time_window_contains() {
        let tw = TimeWindow::new(10.0, 20.0).expect("valid");
        assert!(tw.contains(10.0));
        assert!(tw.contains(20.0));
        assert!(!tw.contains(9.9));
        assert!(!tw.contains(20.1));
        assert!(tw.contains_within(20.0000001, 1e-6));
    }

    #[test]
    fn test_time_window_serde_pair() {
        let tw: TimeWindow = serde_json::from_str("[540, 660]").expect("pair");
        assert_eq!(tw.start(), 540.0);
        assert_eq!(tw.end(), 660.0);
        assert_eq!(serde_json::to_string(&tw).expect("ser"), "[540.0,660.0]");
    }

    #[test]
    fn test_coordinate_distance() {
        let a = Coordinate::new(0.0, 0.0);
        let b = Coordinate::new(3.0, 4.0);
        assert!((a.distance_to(&b) - 5.0).abs() < 1e-10);
        assert!((a.distance_to(&b) - b.distance_to(&a)).abs() < 1e-10);
    }

    #[test]
    fn test_coordinate_finite() {
        assert!(Coordinate::new(1.0, 2.0).is_finite());
        assert!(!Coordinate::new(f64::NAN, 2.0).is_finite());
    }

    #[test]
    fn test_customer_new() {
        let tw = TimeWindow::new(100.0, 200.0).expect("valid");
        let c = Customer::new(7, Coordinate::new(10.0, 20.0), 5.0, tw, 3.0);
        assert_eq!(c.id(), 7);
        assert_eq!(c.location(), Coordinate::new(10.0, 20.0));
        assert_eq!(c.demand(), 5.0);
        assert_eq!(c.service_duration(), 3.0);
        assert_eq!(c.time_window().start(), 100.0);
    }
}
