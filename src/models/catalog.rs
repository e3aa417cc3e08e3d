//! Domain catalog.
//!
//! The immutable description of everything a schedule may use: the
//! activities to place, and the rooms, facilitators, and time slots to
//! place them in. Built once, validated, and passed by reference to the
//! evaluator, population manager, and operators.
//!
//! Derived relations are precomputed at build time:
//! - **Section pairs**: every pair of activities sharing a course code.
//! - **Cross pairs**: every section of a linked course A against every
//!   section of its partner course B.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{Activity, Facilitator, Preference, Room, TimeSlot};
use crate::error::{Error, Result};
use crate::validation::validate_catalog;

/// Immutable, validated scheduling catalog.
#[derive(Debug, Clone)]
pub struct Catalog {
    activities: Vec<Activity>,
    rooms: Vec<Room>,
    facilitators: Vec<Facilitator>,
    time_slots: Vec<TimeSlot>,
    linked_courses: Vec<(String, String)>,
    remote_buildings: Vec<String>,

    activity_index: HashMap<String, usize>,
    room_index: HashMap<String, usize>,
    facilitator_index: HashMap<String, usize>,
    /// preferences[activity][facilitator]
    preferences: Vec<Vec<Preference>>,
    /// preferred_rooms[activity] as room indices.
    preferred_rooms: Vec<Vec<usize>>,
    /// Number of catalog activities listing each facilitator.
    listings: Vec<usize>,
    remote_rooms: Vec<bool>,
    section_pairs: Vec<(usize, usize)>,
    cross_pairs: Vec<(usize, usize)>,
}

/// Entity counts of a catalog.
///
/// Every schedule records the shape of the catalog it was built from, so
/// a schedule handed to a component working on another catalog is
/// rejected instead of indexing past its tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CatalogShape {
    pub activities: usize,
    pub rooms: usize,
    pub time_slots: usize,
    pub facilitators: usize,
}

/// Collects catalog parts; [`CatalogBuilder::build`] validates them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogBuilder {
    pub activities: Vec<Activity>,
    pub rooms: Vec<Room>,
    pub facilitators: Vec<Facilitator>,
    pub time_slots: Vec<TimeSlot>,
    /// Course code pairs subject to cross-section interaction rules.
    pub linked_courses: Vec<(String, String)>,
    /// Buildings whose rooms count as "remote" for the proximity modifier.
    pub remote_buildings: Vec<String>,
}

impl CatalogBuilder {
    /// Adds an activity.
    pub fn with_activity(mut self, activity: Activity) -> Self {
        self.activities.push(activity);
        self
    }

    /// Adds a room.
    pub fn with_room(mut self, room: Room) -> Self {
        self.rooms.push(room);
        self
    }

    /// Adds a facilitator.
    pub fn with_facilitator(mut self, facilitator: Facilitator) -> Self {
        self.facilitators.push(facilitator);
        self
    }

    /// Adds a time slot.
    pub fn with_time_slot(mut self, slot: TimeSlot) -> Self {
        self.time_slots.push(slot);
        self
    }

    /// Links two course codes for cross-section interaction scoring.
    pub fn with_linked_courses(mut self, a: impl Into<String>, b: impl Into<String>) -> Self {
        self.linked_courses.push((a.into(), b.into()));
        self
    }

    /// Marks a building as remote.
    pub fn with_remote_building(mut self, building: impl Into<String>) -> Self {
        self.remote_buildings.push(building.into());
        self
    }

    /// Validates the parts and builds the catalog.
    pub fn build(self) -> Result<Catalog> {
        validate_catalog(
            &self.activities,
            &self.rooms,
            &self.facilitators,
            &self.time_slots,
            &self.linked_courses,
        )
        .map_err(|errors| Error::InvalidCatalog { errors })?;

        Ok(Catalog::from_parts(self))
    }
}

impl Catalog {
    /// Starts an empty builder.
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::default()
    }

    /// Validates and builds a catalog with no linked courses or remote
    /// buildings.
    pub fn new(
        activities: Vec<Activity>,
        rooms: Vec<Room>,
        facilitators: Vec<Facilitator>,
        time_slots: Vec<TimeSlot>,
    ) -> Result<Self> {
        CatalogBuilder {
            activities,
            rooms,
            facilitators,
            time_slots,
            ..CatalogBuilder::default()
        }
        .build()
    }

    fn from_parts(parts: CatalogBuilder) -> Self {
        let CatalogBuilder {
            activities,
            rooms,
            facilitators,
            time_slots,
            linked_courses,
            remote_buildings,
        } = parts;

        let activity_index = index_by(&activities, |a| &a.id);
        let room_index = index_by(&rooms, |r| &r.id);
        let facilitator_index = index_by(&facilitators, |f| &f.id);

        let preferences = activities
            .iter()
            .map(|a| facilitators.iter().map(|f| f.preference_for(a)).collect())
            .collect();

        let preferred_rooms = activities
            .iter()
            .map(|a| {
                a.preferred_rooms
                    .iter()
                    .filter_map(|id| room_index.get(id).copied())
                    .collect()
            })
            .collect();

        let listings = facilitators
            .iter()
            .map(|f| activities.iter().filter(|a| a.lists_facilitator(&f.id)).count())
            .collect();

        let remote_rooms = rooms
            .iter()
            .map(|r| remote_buildings.iter().any(|b| *b == r.building))
            .collect();

        let mut section_pairs = Vec::new();
        for i in 0..activities.len() {
            for j in (i + 1)..activities.len() {
                if activities[i].course == activities[j].course {
                    section_pairs.push((i, j));
                }
            }
        }

        let mut cross_pairs = Vec::new();
        for (course_a, course_b) in &linked_courses {
            for (i, a) in activities.iter().enumerate().filter(|(_, a)| a.course == *course_a) {
                for (j, _) in activities.iter().enumerate().filter(|(_, b)| b.course == *course_b) {
                    if i != j && a.course != activities[j].course {
                        cross_pairs.push((i, j));
                    }
                }
            }
        }

        Self {
            activities,
            rooms,
            facilitators,
            time_slots,
            linked_courses,
            remote_buildings,
            activity_index,
            room_index,
            facilitator_index,
            preferences,
            preferred_rooms,
            listings,
            remote_rooms,
            section_pairs,
            cross_pairs,
        }
    }

    /// The SLA data set: 11 activities, 9 rooms, 10 facilitators,
    /// six hourly slots from 10 AM to 3 PM.
    pub fn sla() -> Self {
        let pref_intro = ["Glen", "Lock", "Banks"];
        let other_intro = ["Numen", "Richards", "Shaw", "Singer"];
        let pref_mid = ["Glen", "Banks", "Zeldin", "Lock", "Singer"];
        let other_mid = ["Richards", "Uther", "Shaw"];

        let mut parts = Catalog::builder()
            .with_activity(sla_intro("SLA101A", "SLA101", 40, false, &pref_intro, &other_intro))
            .with_activity(sla_intro("SLA101B", "SLA101", 35, false, &pref_intro, &other_intro))
            .with_activity(sla_intro("SLA191A", "SLA191", 45, true, &pref_intro, &other_intro))
            .with_activity(sla_intro("SLA191B", "SLA191", 40, true, &pref_intro, &other_intro))
            .with_activity(
                Activity::new("SLA201", 60)
                    .with_preferred(pref_mid)
                    .with_others(other_mid),
            )
            .with_activity(
                Activity::new("SLA291", 50)
                    .with_preferred(pref_mid)
                    .with_others(other_mid)
                    .with_equipment(true, false),
            )
            .with_activity(
                Activity::new("SLA303", 25)
                    .with_preferred(["Glen", "Zeldin"])
                    .with_others(["Banks"])
                    .with_equipment(true, true),
            )
            .with_activity(
                Activity::new("SLA304", 20)
                    .with_preferred(["Singer", "Uther"])
                    .with_others(["Richards"])
                    .with_equipment(true, false),
            )
            .with_activity(
                Activity::new("SLA394", 15)
                    .with_preferred(["Tyler", "Singer"])
                    .with_others(["Richards", "Zeldin"]),
            )
            .with_activity(
                // Zeldin appears in both lists; the preferred listing wins.
                Activity::new("SLA449", 30)
                    .with_preferred(["Tyler", "Zeldin", "Uther"])
                    .with_others(["Zeldin", "Shaw"])
                    .with_equipment(false, true),
            )
            .with_activity(
                Activity::new("SLA451", 90)
                    .with_preferred(["Lock", "Banks", "Zeldin"])
                    .with_others(["Tyler", "Singer", "Shaw", "Glen"])
                    .with_equipment(true, true),
            )
            .with_room(Room::new("Beach 201", 18).with_equipment(false, true))
            .with_room(Room::new("Beach 301", 25).with_equipment(true, true))
            .with_room(Room::new("Frank 119", 95).with_equipment(true, true))
            .with_room(Room::new("Loft 206", 55))
            .with_room(Room::new("Loft 310", 48).with_equipment(true, false))
            .with_room(Room::new("James 325", 110).with_equipment(true, true))
            .with_room(Room::new("Roman 201", 40))
            .with_room(Room::new("Roman 216", 80).with_equipment(true, true))
            .with_room(Room::new("Slater 003", 32).with_equipment(true, true))
            .with_linked_courses("SLA101", "SLA191")
            .with_remote_building("Beach")
            .with_remote_building("Roman");

        for name in [
            "Lock", "Glen", "Banks", "Richards", "Shaw", "Singer", "Uther", "Tyler", "Numen",
            "Zeldin",
        ] {
            let facilitator = Facilitator::new(name);
            parts = parts.with_facilitator(if name == "Tyler" {
                facilitator.with_reduced_load()
            } else {
                facilitator
            });
        }

        for (label, hour) in [
            ("10 AM", 10),
            ("11 AM", 11),
            ("12 PM", 12),
            ("1 PM", 13),
            ("2 PM", 14),
            ("3 PM", 15),
        ] {
            parts = parts.with_time_slot(TimeSlot::new(label, hour));
        }

        Self::from_parts(parts)
    }

    pub fn activities(&self) -> &[Activity] {
        &self.activities
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn facilitators(&self) -> &[Facilitator] {
        &self.facilitators
    }

    pub fn time_slots(&self) -> &[TimeSlot] {
        &self.time_slots
    }

    pub fn linked_courses(&self) -> &[(String, String)] {
        &self.linked_courses
    }

    pub fn remote_buildings(&self) -> &[String] {
        &self.remote_buildings
    }

    /// Number of activities (the schedule length).
    #[inline]
    pub fn activity_count(&self) -> usize {
        self.activities.len()
    }

    /// Entity counts, as recorded on schedules built from this catalog.
    pub fn shape(&self) -> CatalogShape {
        CatalogShape {
            activities: self.activities.len(),
            rooms: self.rooms.len(),
            time_slots: self.time_slots.len(),
            facilitators: self.facilitators.len(),
        }
    }

    pub fn activity_position(&self, id: &str) -> Option<usize> {
        self.activity_index.get(id).copied()
    }

    pub fn room_position(&self, id: &str) -> Option<usize> {
        self.room_index.get(id).copied()
    }

    pub fn facilitator_position(&self, id: &str) -> Option<usize> {
        self.facilitator_index.get(id).copied()
    }

    pub fn time_slot_position(&self, id: &str) -> Option<usize> {
        self.time_slots.iter().position(|s| s.id == id)
    }

    /// Preference of activity `activity` for facilitator `facilitator`.
    #[inline]
    pub fn preference(&self, activity: usize, facilitator: usize) -> Preference {
        self.preferences[activity][facilitator]
    }

    /// Whether `room` is in the activity's preferred room list.
    pub fn is_preferred_room(&self, activity: usize, room: usize) -> bool {
        self.preferred_rooms[activity].contains(&room)
    }

    /// Number of catalog activities that list the facilitator.
    pub fn listing_count(&self, facilitator: usize) -> usize {
        self.listings[facilitator]
    }

    /// Whether the room lies in a remote building.
    #[inline]
    pub fn is_remote_room(&self, room: usize) -> bool {
        self.remote_rooms[room]
    }

    /// Activity index pairs that are sections of one course.
    pub fn section_pairs(&self) -> &[(usize, usize)] {
        &self.section_pairs
    }

    /// Activity index pairs subject to cross-section interaction rules.
    pub fn cross_pairs(&self) -> &[(usize, usize)] {
        &self.cross_pairs
    }
}

fn sla_intro(
    id: &str,
    course: &str,
    enrollment: u32,
    lab: bool,
    preferred: &[&str],
    others: &[&str],
) -> Activity {
    Activity::new(id, enrollment)
        .with_course(course)
        .with_preferred(preferred.iter().copied())
        .with_others(others.iter().copied())
        .with_equipment(lab, false)
}

fn index_by<T>(items: &[T], key: impl Fn(&T) -> &String) -> HashMap<String, usize> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| (key(item).clone(), i))
        .collect()
}
