//! Resource models: rooms, facilitators, and time slots.
//!
//! The three resources an activity is assigned. All are immutable once
//! placed in a [`Catalog`](super::Catalog).

use serde::{Deserialize, Serialize};

use super::Activity;

/// A room that can host activities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    /// Unique room identifier (e.g., "Roman 216").
    pub id: String,
    /// Seat count.
    pub capacity: u32,
    /// Building the room belongs to.
    pub building: String,
    /// Installed equipment.
    pub equipment: Equipment,
}

/// Equipment installed in a room.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Equipment {
    /// Has a lab.
    pub lab: bool,
    /// Has a projector.
    pub projector: bool,
}

/// A person who can facilitate activities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Facilitator {
    /// Unique facilitator identifier.
    pub id: String,
    /// Has other commitments: the underload penalty only applies once
    /// this facilitator oversees at least two activities.
    pub reduced_load: bool,
}

/// How an activity regards a facilitator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Preference {
    /// Listed as preferred.
    Preferred,
    /// Listed as acceptable.
    Other,
    /// Not listed at all.
    Unlisted,
}

/// A time slot in the day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    /// Display label (e.g., "10 AM").
    pub id: String,
    /// Ordering value in hours; slot distance is the difference.
    pub order: i32,
}

impl Room {
    /// Creates a room without equipment.
    ///
    /// The building defaults to the first word of the id
    /// ("Beach 201" → "Beach").
    pub fn new(id: impl Into<String>, capacity: u32) -> Self {
        let id = id.into();
        let building = id.split_whitespace().next().unwrap_or_default().to_string();
        Self {
            id,
            capacity,
            building,
            equipment: Equipment::default(),
        }
    }

    /// Overrides the building.
    pub fn with_building(mut self, building: impl Into<String>) -> Self {
        self.building = building.into();
        self
    }

    /// Sets installed equipment.
    pub fn with_equipment(mut self, lab: bool, projector: bool) -> Self {
        self.equipment = Equipment { lab, projector };
        self
    }

    /// Whether the room provides everything the activity needs.
    pub fn satisfies(&self, activity: &Activity) -> bool {
        (!activity.equipment.lab || self.equipment.lab)
            && (!activity.equipment.projector || self.equipment.projector)
    }
}

impl Facilitator {
    /// Creates a facilitator with a regular load.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            reduced_load: false,
        }
    }

    /// Marks the facilitator as having a reduced load.
    pub fn with_reduced_load(mut self) -> Self {
        self.reduced_load = true;
        self
    }

    /// Preference level of `activity` for this facilitator.
    ///
    /// Preferred wins when a facilitator appears in both lists.
    pub fn preference_for(&self, activity: &Activity) -> Preference {
        if activity.preferred_facilitators.iter().any(|f| *f == self.id) {
            Preference::Preferred
        } else if activity.other_facilitators.iter().any(|f| *f == self.id) {
            Preference::Other
        } else {
            Preference::Unlisted
        }
    }
}

impl TimeSlot {
    /// Creates a time slot.
    pub fn new(id: impl Into<String>, order: i32) -> Self {
        Self {
            id: id.into(),
            order,
        }
    }

    /// Absolute distance to another slot, in hours.
    #[inline]
    pub fn distance(&self, other: &TimeSlot) -> u32 {
        self.order.abs_diff(other.order)
    }
}
