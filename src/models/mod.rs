//! Timetabling domain models.
//!
//! Provides the catalog of activities and resources, and the schedule
//! (solution) representation.
//!
//! # Domain Mappings
//!
//! | u-timetable | University | Conference | Clinic |
//! |-------------|-----------|------------|--------|
//! | Activity | Course section | Session | Appointment block |
//! | Room | Classroom | Hall | Exam room |
//! | Facilitator | Instructor | Speaker | Physician |
//! | TimeSlot | Class hour | Track slot | Shift hour |

mod activity;
mod catalog;
mod resource;
mod schedule;

pub use activity::{Activity, EquipmentNeeds};
pub use catalog::{Catalog, CatalogBuilder, CatalogShape};
pub use resource::{Equipment, Facilitator, Preference, Room, TimeSlot};
pub use schedule::{Assignment, Schedule};
