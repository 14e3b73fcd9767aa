// ABOUTME: Validated domain types for registry entries.
// ABOUTME: Labels, versions, destinations and target names are checked once at load time.

mod destination;
mod image_label;
mod image_ref;
mod release_version;
mod target_name;

pub use destination::{Destination, DestinationError};
pub use image_label::{ImageLabel, ImageLabelError};
pub use image_ref::ImageRef;
pub use release_version::{ReleaseVersion, ReleaseVersionError};
pub use target_name::{TargetName, TargetNameError};
