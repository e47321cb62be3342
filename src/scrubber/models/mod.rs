//! Scrubber data models

pub mod phi_category;
pub mod scrub_result;

pub use phi_category::{PhiCategory, TOKEN_PREFIX};
pub(crate) use scrub_result::{CategoryTally, Match};
pub use scrub_result::ScrubResult;
