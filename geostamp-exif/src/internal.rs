mod exif_raw;
mod raw;
mod type_;

pub use exif_raw::*;
pub use geostamp_common::exif::{Ifd, Tag, TagIfd};
pub use raw::*;
pub use type_::*;
