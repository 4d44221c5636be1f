use crate::core::node::{PathLoader, path_loader};
use crate::core::path::normalize_lexically;
use std::path::Path;

/// Loader that honours the location recorded by `add_class`.
///
/// Relative locations are taken from the registry base directory. Classes
/// that were never declared fall back to the default path convention.
pub fn declared_location() -> PathLoader {
    path_loader(|node, class_name| match node.get_class(class_name) {
        Some(entry) => {
            let location = Path::new(&entry.location);
            if location.is_absolute() {
                Ok(normalize_lexically(location))
            } else {
                let base = node.registry().base_dir()?;
                Ok(normalize_lexically(&base.join(location)))
            }
        }
        None => node.default_path(class_name),
    })
}
