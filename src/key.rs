use std::any::{TypeId, type_name};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Identity token for a dependency slot.
///
/// A key is the `TypeId` of the injected handle type — typically `Arc<Svc>`
/// for a concrete service or `Arc<dyn Contract>` for an abstract one — plus
/// the type name for display. Equality and hashing use the `TypeId` only, so
/// two structurally identical but distinct types are always distinct keys.
///
/// # Examples
///
/// ```rust
/// use injex::DependencyKey;
/// use std::sync::Arc;
///
/// struct Database;
///
/// let key = DependencyKey::of::<Arc<Database>>();
/// assert_eq!(key, DependencyKey::of::<Arc<Database>>());
/// assert_eq!(key.to_string(), "Arc<Database>");
/// ```
#[derive(Clone, Copy)]
pub struct DependencyKey {
    id: TypeId,
    name: &'static str,
}

impl DependencyKey {
    /// Returns the key for the handle type `T`.
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    /// Returns the full type name of the handle type, including module paths.
    pub fn type_name(&self) -> &'static str {
        self.name
    }

    /// Returns the display name: the type name with module paths stripped,
    /// including inside generic arguments.
    pub fn display_name(&self) -> String {
        short_type_name(self.name)
    }
}

impl PartialEq for DependencyKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for DependencyKey {}

impl Hash for DependencyKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for DependencyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DependencyKey")
            .field("name", &self.name)
            .finish()
    }
}

impl fmt::Display for DependencyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_name())
    }
}

/// Strips module paths from a type name, keeping generic structure intact:
/// `alloc::sync::Arc<core::option::Option<i32>>` becomes `Arc<Option<i32>>`.
pub(crate) fn short_type_name(full: &str) -> String {
    let mut out = String::with_capacity(full.len());
    let mut segment = String::new();
    for ch in full.chars() {
        if ch.is_alphanumeric() || ch == '_' || ch == ':' {
            segment.push(ch);
        } else {
            flush_segment(&mut out, &mut segment);
            out.push(ch);
        }
    }
    flush_segment(&mut out, &mut segment);
    out
}

fn flush_segment(out: &mut String, segment: &mut String) {
    if segment.is_empty() {
        return;
    }
    match segment.rsplit("::").next() {
        Some(last) => out.push_str(last),
        None => out.push_str(segment),
    }
    segment.clear();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    struct Left;
    struct Right;

    #[test]
    fn structurally_identical_types_are_distinct_keys() {
        assert_ne!(DependencyKey::of::<Left>(), DependencyKey::of::<Right>());
        assert_eq!(DependencyKey::of::<Left>(), DependencyKey::of::<Left>());
    }

    #[test]
    fn type_name_keeps_the_full_path() {
        let key = DependencyKey::of::<Left>();
        assert!(key.type_name().ends_with("tests::Left"));
        assert_eq!(key.display_name(), "Left");
    }

    #[test]
    fn display_strips_module_paths() {
        assert_eq!(DependencyKey::of::<Left>().to_string(), "Left");
        assert_eq!(
            DependencyKey::of::<Arc<Option<String>>>().to_string(),
            "Arc<Option<String>>"
        );
    }

    #[test]
    fn short_name_keeps_generic_punctuation() {
        assert_eq!(
            short_type_name("std::collections::HashMap<alloc::string::String, i32>"),
            "HashMap<String, i32>"
        );
    }
}
