//! Location resolution with an injected geocoder.
//!
//! The engine never talks to a geocoding service itself; callers inject a
//! [`Geocoder`] (any `Fn(&str) -> Option<Coordinates>` closure works). A
//! location that cannot be resolved becomes `None`; the facility later
//! fails the distance hard filter instead of aborting the batch.

use tracing::warn;

use crate::types::{Coordinates, LocationInput};

/// Resolves free-text addresses to coordinates.
///
/// Implementations may be backed by anything from a static city table to a
/// full geocoding service; returning `None` marks the address unresolved.
pub trait Geocoder {
    fn geocode(&self, address: &str) -> Option<Coordinates>;
}

impl<F> Geocoder for F
where
    F: Fn(&str) -> Option<Coordinates>,
{
    fn geocode(&self, address: &str) -> Option<Coordinates> {
        self(address)
    }
}

/// A geocoder that resolves nothing; submissions must carry explicit
/// coordinates to pass the distance gate.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullGeocoder;

impl Geocoder for NullGeocoder {
    fn geocode(&self, _address: &str) -> Option<Coordinates> {
        None
    }
}

/// Explicit coordinates win; otherwise the geocoder is consulted.
pub(crate) fn resolve_location(
    input: Option<&LocationInput>,
    geocoder: &dyn Geocoder,
) -> Option<Coordinates> {
    match input {
        Some(LocationInput::Coords { lat, lon }) => Some(Coordinates::new(*lat, *lon)),
        Some(LocationInput::Address(address)) => {
            let resolved = geocoder.geocode(address);
            if resolved.is_none() {
                warn!(address = %address, "location unresolved; facility will fail distance gates");
            }
            resolved
        }
        None => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_coordinates_bypass_the_geocoder() {
        let geocoder = |_: &str| -> Option<Coordinates> { panic!("must not be called") };
        let input = LocationInput::Coords { lat: 1.0, lon: 2.0 };
        assert_eq!(
            resolve_location(Some(&input), &geocoder),
            Some(Coordinates::new(1.0, 2.0))
        );
    }

    #[test]
    fn address_goes_through_the_geocoder() {
        let geocoder = |address: &str| {
            (address == "Chennai").then(|| Coordinates::new(13.0827, 80.2707))
        };
        let input = LocationInput::Address("Chennai".into());
        assert_eq!(
            resolve_location(Some(&input), &geocoder),
            Some(Coordinates::new(13.0827, 80.2707))
        );

        let unknown = LocationInput::Address("Atlantis".into());
        assert_eq!(resolve_location(Some(&unknown), &geocoder), None);
    }

    #[test]
    fn missing_location_resolves_to_none() {
        assert_eq!(resolve_location(None, &NullGeocoder), None);
    }
}
