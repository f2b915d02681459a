//! Product entity and its column codecs.

mod product;
mod string_list;

pub use product::*;
pub use string_list::StringList;
