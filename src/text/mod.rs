//! Pure text transforms applied to cast bodies before display.

mod mentions;
mod urls;

pub use mentions::insert_mentions;
pub use urls::{clean_text, find_urls};
