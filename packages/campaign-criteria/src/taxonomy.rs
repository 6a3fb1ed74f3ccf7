//! Well-known criterion ids from the service's location and language taxonomies.
//!
//! Full lists live with the service (location and constant data lookups).

pub mod location {
    /// California, USA
    pub const CALIFORNIA: i64 = 21137;
    pub const MEXICO: i64 = 2484;
}

pub mod language {
    pub const ENGLISH: i64 = 1000;
    pub const SPANISH: i64 = 1003;
}
