//! Response normalization.
//!
//! Each operation declares the shape of its result as data ([`Shape`],
//! [`Field`]); a single interpreter walks the XML tree with it. The
//! interpreter guarantees that `items` is always an array, merges sibling
//! groups and omits optional groups whose element is absent.

mod engine;
mod shape;

pub use engine::{normalize, normalize_xml, ITEMS_KEY};
pub use shape::{Field, ItemsSpec, LeafKind, Presence, Shape};
