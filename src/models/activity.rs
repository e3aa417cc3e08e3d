//! Activity model.
//!
//! An activity is one class section that needs a room, a time slot, and
//! a facilitator. Sections of the same course share a `course` code,
//! which drives the section spacing rules.

use serde::{Deserialize, Serialize};

/// A class activity to be scheduled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    /// Unique activity identifier (e.g., "SLA101A").
    pub id: String,
    /// Course code shared by all sections (e.g., "SLA101").
    pub course: String,
    /// Expected number of enrolled students.
    pub expected_enrollment: u32,
    /// Facilitators the department prefers for this activity.
    pub preferred_facilitators: Vec<String>,
    /// Facilitators that are acceptable but not preferred.
    pub other_facilitators: Vec<String>,
    /// Rooms the activity would rather be held in (may be empty).
    pub preferred_rooms: Vec<String>,
    /// Equipment the room must provide.
    pub equipment: EquipmentNeeds,
}

/// Equipment an activity requires from its room.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipmentNeeds {
    /// Needs a lab.
    pub lab: bool,
    /// Needs a projector.
    pub projector: bool,
}

impl Activity {
    /// Creates an activity whose course code is its own id.
    pub fn new(id: impl Into<String>, expected_enrollment: u32) -> Self {
        let id = id.into();
        Self {
            course: id.clone(),
            id,
            expected_enrollment,
            preferred_facilitators: Vec::new(),
            other_facilitators: Vec::new(),
            preferred_rooms: Vec::new(),
            equipment: EquipmentNeeds::default(),
        }
    }

    /// Sets the course code (sections of one course share it).
    pub fn with_course(mut self, course: impl Into<String>) -> Self {
        self.course = course.into();
        self
    }

    /// Sets the preferred facilitators.
    pub fn with_preferred<I, S>(mut self, facilitators: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.preferred_facilitators = facilitators.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the other acceptable facilitators.
    pub fn with_others<I, S>(mut self, facilitators: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.other_facilitators = facilitators.into_iter().map(Into::into).collect();
        self
    }

    /// Adds a preferred room.
    pub fn with_preferred_room(mut self, room_id: impl Into<String>) -> Self {
        self.preferred_rooms.push(room_id.into());
        self
    }

    /// Sets equipment needs.
    pub fn with_equipment(mut self, lab: bool, projector: bool) -> Self {
        self.equipment = EquipmentNeeds { lab, projector };
        self
    }

    /// Whether `facilitator_id` appears in either facilitator list.
    pub fn lists_facilitator(&self, facilitator_id: &str) -> bool {
        self.preferred_facilitators.iter().any(|f| f == facilitator_id)
            || self.other_facilitators.iter().any(|f| f == facilitator_id)
    }
}
