//! Per-kind monotonic identifier allocation.
//!
//! Counters only move forward: an identifier handed out once is never issued
//! again for that kind, even after the entity is deleted. A counter that has
//! handed out `u64::MAX` is exhausted rather than wrapping to zero.

use crate::types::EntityKind;

/// Default first student identifier.
pub const STUDENT_ID_BASE: u64 = 1000;
/// Default first course identifier.
pub const COURSE_ID_BASE: u64 = 100;
/// Largest base a configuration may ask for; leaves half the id space free.
pub const MAX_ID_BASE: u64 = u64::MAX / 2;

#[derive(Debug, Clone)]
pub struct IdentifierAllocator {
    next_student: Option<u64>,
    next_course: Option<u64>,
}

impl Default for IdentifierAllocator {
    fn default() -> Self {
        Self::with_bases(STUDENT_ID_BASE, COURSE_ID_BASE)
    }
}

impl IdentifierAllocator {
    pub fn with_bases(student_base: u64, course_base: u64) -> Self {
        Self { next_student: Some(student_base), next_course: Some(course_base) }
    }

    /// Issue the next identifier for `kind`, or `None` once the kind is
    /// exhausted.
    pub fn next(&mut self, kind: EntityKind) -> Option<u64> {
        let counter = self.counter_mut(kind);
        let id = (*counter)?;
        *counter = id.checked_add(1);
        Some(id)
    }

    /// The value the next call to [`next`](Self::next) would return.
    pub fn peek(&self, kind: EntityKind) -> Option<u64> {
        match kind {
            EntityKind::Student => self.next_student,
            EntityKind::Course => self.next_course,
        }
    }

    fn counter_mut(&mut self, kind: EntityKind) -> &mut Option<u64> {
        match kind {
            EntityKind::Student => &mut self.next_student,
            EntityKind::Course => &mut self.next_course,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_bases() {
        let mut alloc = IdentifierAllocator::default();
        assert_eq!(alloc.next(EntityKind::Student), Some(1000));
        assert_eq!(alloc.next(EntityKind::Course), Some(100));
        assert_eq!(alloc.next(EntityKind::Student), Some(1001));
    }

    #[test]
    fn kinds_are_independent() {
        let mut alloc = IdentifierAllocator::with_bases(1, 1);
        assert_eq!(alloc.next(EntityKind::Course), Some(1));
        assert_eq!(alloc.next(EntityKind::Course), Some(2));
        assert_eq!(alloc.peek(EntityKind::Student), Some(1));
    }

    #[test]
    fn peek_does_not_consume() {
        let mut alloc = IdentifierAllocator::default();
        assert_eq!(alloc.peek(EntityKind::Course), Some(100));
        assert_eq!(alloc.next(EntityKind::Course), Some(100));
        assert_eq!(alloc.peek(EntityKind::Course), Some(101));
    }

    #[test]
    fn counter_at_max_is_exhausted_not_wrapped() {
        let mut alloc = IdentifierAllocator::with_bases(u64::MAX, 7);
        assert_eq!(alloc.next(EntityKind::Student), Some(u64::MAX));
        assert_eq!(alloc.next(EntityKind::Student), None);
        assert_eq!(alloc.next(EntityKind::Student), None);
        assert_eq!(alloc.peek(EntityKind::Student), None);
        assert_eq!(alloc.next(EntityKind::Course), Some(7));
    }
}
