//! Vehicle type with capacity, duration, and speed parameters.

/// A vehicle that leaves the depot, serves customers, and returns.
///
/// # Examples
///
/// ```
/// use u_routing_milp::models::Vehicle;
///
/// let v = Vehicle::new(0, 2000.0, 480.0, 40.0 / 60.0);
/// assert_eq!(v.id(), 0);
/// assert_eq!(v.capacity(), 2000.0);
/// assert!((v.travel_time(20.0) - 30.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Vehicle {
    id: usize,
    capacity: f64,
    max_duration: f64,
    speed: f64,
}

impl Vehicle {
    /// Creates a vehicle.
    ///
    /// `max_duration` is in minutes, `speed` in distance units per minute.
    pub fn new(id: usize, capacity: f64, max_duration: f64, speed: f64) -> Self {
        Self {
            id,
            capacity,
            max_duration,
            speed,
        }
    }

    /// Vehicle ID.
    pub fn id(&self) -> usize {
        self.id
    }

    /// Maximum load capacity.
    pub fn capacity(&self) -> f64 {
        self.capacity
    }

    /// Maximum route duration, from depot departure to depot return.
    pub fn max_duration(&self) -> f64 {
        self.max_duration
    }

    /// Travel speed in distance units per minute.
    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Minutes needed to cover `distance`.
    pub fn travel_time(&self, distance: f64) -> f64 {
        distance / self.speed
    }
}
