//! UUID v7 utilities for time-ordered identifiers.
//!
//! Task, note, rule and session ids are UUIDv7 strings, so sorting by id
//! matches creation order.

use uuid::Uuid;

/// Generate a new UUIDv7 identifier.
#[inline]
pub fn new_v7() -> Uuid {
    Uuid::now_v7()
}

/// Generate a new UUIDv7 identifier in its hyphenated text form.
///
/// # Example
///
/// ```
/// use starcrunch_core::uuid_utils::new_id;
///
/// let id = new_id();
/// assert_eq!(id.len(), 36);
/// ```
pub fn new_id() -> String {
    new_v7().to_string()
}

/// Check if a UUID is version 7.
#[inline]
pub fn is_v7(uuid: &Uuid) -> bool {
    uuid.get_version_num() == 7
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_v7_is_v7() {
        assert!(is_v7(&new_v7()));
    }

    #[test]
    fn test_new_ids_are_time_ordered() {
        let a = new_id();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let b = new_id();
        assert!(b > a);
    }

    #[test]
    fn test_v4_is_not_v7() {
        assert!(!is_v7(&Uuid::new_v4()));
    }
}
