//! The story pipeline: group casts by shared URL, keep the corroborated
//! groups, and rank them.

mod aggregate;
mod rank;

pub use aggregate::StoryPipeline;
pub use rank::rank;

pub(crate) use aggregate::{hostname_of, is_denylisted};
