//! Input validation for timetabling catalogs.
//!
//! Checks structural integrity of activities and resources before any
//! schedule is built. Detects:
//! - Empty activity, room, facilitator, or time slot lists
//! - Duplicate IDs (and duplicate time slot ordering values)
//! - Facilitator and preferred-room references to unknown entities
//! - Zero enrollments or capacities
//! - Linked courses without sections

use std::collections::HashSet;

use crate::models::{Activity, Facilitator, Room, TimeSlot};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// A required list is empty.
    Empty,
    /// Two entities share the same ID or ordering value.
    DuplicateId,
    /// An activity references a facilitator that doesn't exist.
    InvalidFacilitatorReference,
    /// An activity references a room that doesn't exist.
    InvalidRoomReference,
    /// A linked course has no activities.
    InvalidCourseReference,
    /// A count that must be positive is zero.
    NonPositive,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates catalog parts.
///
/// Checks:
/// 1. No list is empty
/// 2. No duplicate activity, room, facilitator, or time slot IDs
/// 3. No two time slots share an ordering value
/// 4. Enrollments and capacities are positive
/// 5. Facilitator and preferred-room references point to existing entities
/// 6. Every linked course code has at least one activity
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_catalog(
    activities: &[Activity],
    rooms: &[Room],
    facilitators: &[Facilitator],
    time_slots: &[TimeSlot],
    linked_courses: &[(String, String)],
) -> ValidationResult {
    let mut errors = Vec::new();

    for (name, len) in [
        ("activities", activities.len()),
        ("rooms", rooms.len()),
        ("facilitators", facilitators.len()),
        ("time slots", time_slots.len()),
    ] {
        if len == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::Empty,
                format!("Catalog has no {name}"),
            ));
        }
    }

    collect_unique("activity", activities.iter().map(|a| a.id.as_str()), &mut errors);
    let room_ids = collect_unique("room", rooms.iter().map(|r| r.id.as_str()), &mut errors);
    let facilitator_ids = collect_unique(
        "facilitator",
        facilitators.iter().map(|f| f.id.as_str()),
        &mut errors,
    );
    collect_unique("time slot", time_slots.iter().map(|s| s.id.as_str()), &mut errors);

    let mut orders = HashSet::new();
    for slot in time_slots {
        if !orders.insert(slot.order) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Time slot '{}' repeats ordering value {}", slot.id, slot.order),
            ));
        }
    }

    for act in activities {
        if act.expected_enrollment == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::NonPositive,
                format!("Activity '{}' has zero expected enrollment", act.id),
            ));
        }
    }
    for room in rooms {
        if room.capacity == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::NonPositive,
                format!("Room '{}' has zero capacity", room.id),
            ));
        }
    }

    // Check facilitator and room references
    for act in activities {
        for fac in act.preferred_facilitators.iter().chain(&act.other_facilitators) {
            if !facilitator_ids.contains(fac.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidFacilitatorReference,
                    format!(
                        "Activity '{}' references unknown facilitator '{}'",
                        act.id, fac
                    ),
                ));
            }
        }
        for room in &act.preferred_rooms {
            if !room_ids.contains(room.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidRoomReference,
                    format!("Activity '{}' references unknown room '{}'", act.id, room),
                ));
            }
        }
    }

    let courses: HashSet<&str> = activities.iter().map(|a| a.course.as_str()).collect();
    for (a, b) in linked_courses {
        for course in [a, b] {
            if !courses.contains(course.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidCourseReference,
                    format!("Linked course '{course}' has no activities"),
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn collect_unique<'a>(
    kind: &str,
    ids: impl Iterator<Item = &'a str>,
    errors: &mut Vec<ValidationError>,
) -> HashSet<&'a str> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate {kind} ID: {id}"),
            ));
        }
    }
    seen
}
