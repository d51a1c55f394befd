//! Generic XML tree access on top of `roxmltree`.

mod utils;

pub use utils::{
    find_all_by_path, find_by_path, find_child, get_attribute, get_tag_name, get_text,
    resolve_text, split_last_segment,
};
