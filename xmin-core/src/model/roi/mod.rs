mod region_of_interest;
mod roi_error;
mod travel_mode;

pub use region_of_interest::RegionOfInterest;
pub use roi_error::RoiError;
pub use travel_mode::{ModeSpeeds, TravelMode};
