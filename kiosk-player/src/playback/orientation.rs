//! Orientation derivation from the active item

use kiosk_common::events::OrientationDirective;
use kiosk_common::{Orientation, PlaylistItem};

/// Landscape/portrait lock, auto or no item unlocks
pub fn derive_orientation(item: Option<&PlaylistItem>) -> OrientationDirective {
    match item.map(|i| i.orientation) {
        Some(Orientation::Landscape) => OrientationDirective::Lock(Orientation::Landscape),
        Some(Orientation::Portrait) => OrientationDirective::Lock(Orientation::Portrait),
        Some(Orientation::Auto) | None => OrientationDirective::Unlock,
    }
}
