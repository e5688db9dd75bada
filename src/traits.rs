//! Shared trait abstractions for common patterns
//!
//! The map engine never owns the records it displays. Anything that has an
//! identifier and a coordinate can be projected and clustered.

use crate::core::geo::GeoPoint;

/// A record that can be placed on the map
pub trait Locatable {
    /// Stable identifier of the record
    fn id(&self) -> &str;

    /// Where the record sits
    fn location(&self) -> GeoPoint;
}

impl<T: Locatable + ?Sized> Locatable for &T {
    fn id(&self) -> &str {
        (**self).id()
    }

    fn location(&self) -> GeoPoint {
        (**self).location()
    }
}
