//! Schedule (solution) model.
//!
//! A schedule is one complete candidate: exactly one [`Assignment`] per
//! catalog activity, ordered by activity index. Its genes never change
//! after construction; operators build new schedules instead.
//!
//! The fitness cache is written once by the evaluator and is empty on
//! every fresh or copied schedule.
//!
//! A schedule remembers the [`CatalogShape`] it was built against;
//! [`Schedule::check_catalog`] rejects it anywhere else.

use std::collections::HashSet;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use super::{Catalog, CatalogShape};
use crate::error::{Error, Result};
use crate::fitness::FitnessReport;

/// One gene: where, when, and by whom an activity is held.
///
/// Fields are catalog indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Assignment {
    /// Activity index.
    pub activity: usize,
    /// Room index.
    pub room: usize,
    /// Time slot index.
    pub slot: usize,
    /// Facilitator index.
    pub facilitator: usize,
}

/// A complete schedule covering every activity exactly once.
#[derive(Debug)]
pub struct Schedule {
    assignments: Vec<Assignment>,
    shape: CatalogShape,
    report: OnceLock<FitnessReport>,
}

impl Assignment {
    /// Creates an assignment.
    pub fn new(activity: usize, room: usize, slot: usize, facilitator: usize) -> Self {
        Self {
            activity,
            room,
            slot,
            facilitator,
        }
    }
}

impl Schedule {
    /// Builds a schedule, checking that every catalog activity appears
    /// exactly once and that all indices exist in the catalog.
    ///
    /// Assignments may arrive in any order; they are stored by activity.
    pub fn new(catalog: &Catalog, mut assignments: Vec<Assignment>) -> Result<Self> {
        let n = catalog.activity_count();
        if assignments.len() != n {
            return Err(Error::MalformedSchedule(format!(
                "expected {n} assignments, got {}",
                assignments.len()
            )));
        }

        let mut seen = HashSet::with_capacity(n);
        for a in &assignments {
            if a.activity >= n {
                return Err(Error::MalformedSchedule(format!(
                    "unknown activity index {}",
                    a.activity
                )));
            }
            if !seen.insert(a.activity) {
                return Err(Error::MalformedSchedule(format!(
                    "activity '{}' assigned more than once",
                    catalog.activities()[a.activity].id
                )));
            }
            if a.room >= catalog.rooms().len() {
                return Err(Error::MalformedSchedule(format!(
                    "unknown room index {}",
                    a.room
                )));
            }
            if a.slot >= catalog.time_slots().len() {
                return Err(Error::MalformedSchedule(format!(
                    "unknown time slot index {}",
                    a.slot
                )));
            }
            if a.facilitator >= catalog.facilitators().len() {
                return Err(Error::MalformedSchedule(format!(
                    "unknown facilitator index {}",
                    a.facilitator
                )));
            }
        }

        assignments.sort_by_key(|a| a.activity);
        Ok(Self {
            assignments,
            shape: catalog.shape(),
            report: OnceLock::new(),
        })
    }

    /// Builds a schedule from ids, for hand-written fixtures.
    ///
    /// Each row is `(activity, room, time slot, facilitator)`.
    pub fn from_ids(catalog: &Catalog, rows: &[(&str, &str, &str, &str)]) -> Result<Self> {
        let lookup = |kind: &str, id: &str, pos: Option<usize>| {
            pos.ok_or_else(|| Error::MalformedSchedule(format!("unknown {kind} '{id}'")))
        };
        let assignments = rows
            .iter()
            .map(|&(activity, room, slot, facilitator)| {
                Ok(Assignment::new(
                    lookup("activity", activity, catalog.activity_position(activity))?,
                    lookup("room", room, catalog.room_position(room))?,
                    lookup("time slot", slot, catalog.time_slot_position(slot))?,
                    lookup(
                        "facilitator",
                        facilitator,
                        catalog.facilitator_position(facilitator),
                    )?,
                ))
            })
            .collect::<Result<Vec<_>>>()?;
        Self::new(catalog, assignments)
    }

    /// All assignments, ordered by activity index.
    pub fn assignments(&self) -> &[Assignment] {
        &self.assignments
    }

    /// Assignment of the activity at `activity` index.
    pub fn assignment(&self, activity: usize) -> Option<&Assignment> {
        self.assignments.get(activity)
    }

    /// Assignment of the activity with the given id.
    pub fn assignment_by_id(&self, catalog: &Catalog, activity_id: &str) -> Option<&Assignment> {
        catalog
            .activity_position(activity_id)
            .and_then(|idx| self.assignment(idx))
    }

    /// Number of assignments.
    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// Shape of the catalog this schedule was built from.
    pub fn shape(&self) -> CatalogShape {
        self.shape
    }

    /// Fails with [`Error::MalformedSchedule`] unless the schedule was
    /// built from a catalog shaped like `catalog`.
    pub fn check_catalog(&self, catalog: &Catalog) -> Result<()> {
        let expected = catalog.shape();
        if self.shape != expected {
            return Err(Error::MalformedSchedule(format!(
                "built for a catalog of {:?}, used with {:?}",
                self.shape, expected
            )));
        }
        Ok(())
    }

    /// Independent copy of the genes with an empty fitness cache.
    pub fn copy(&self) -> Self {
        Self {
            assignments: self.assignments.clone(),
            shape: self.shape,
            report: OnceLock::new(),
        }
    }

    /// Consumes the schedule, returning its genes.
    pub fn into_assignments(self) -> Vec<Assignment> {
        self.assignments
    }

    /// Cached fitness, if the schedule has been evaluated.
    pub fn fitness(&self) -> Option<f64> {
        self.report.get().map(|r| r.total)
    }

    /// Cached fitness report, if the schedule has been evaluated.
    pub fn report(&self) -> Option<&FitnessReport> {
        self.report.get()
    }

    /// Whether the evaluator has scored this schedule.
    pub fn is_evaluated(&self) -> bool {
        self.report.get().is_some()
    }

    /// Returns the cached report, computing it with `f` on first use.
    pub(crate) fn report_or_init(&self, f: impl FnOnce() -> FitnessReport) -> &FitnessReport {
        self.report.get_or_init(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn genes(catalog: &Catalog) -> Vec<Assignment> {
        (0..catalog.activity_count())
            .map(|i| Assignment::new(i, i % catalog.rooms().len(), i % 6, i % 10))
            .collect()
    }

    #[test]
    fn test_schedule_covers_all_activities() {
        let c = Catalog::sla();
        let s = Schedule::new(&c, genes(&c)).unwrap();
        assert_eq!(s.len(), 11);
        for (i, a) in s.assignments().iter().enumerate() {
            assert_eq!(a.activity, i);
        }
    }

    #[test]
    fn test_schedule_sorts_by_activity() {
        let c = Catalog::sla();
        let mut g = genes(&c);
        g.reverse();
        let s = Schedule::new(&c, g).unwrap();
        assert_eq!(s.assignment(0).unwrap().activity, 0);
        assert_eq!(s.assignment(10).unwrap().activity, 10);
    }

    #[test]
    fn test_missing_activity_rejected() {
        let c = Catalog::sla();
        let mut g = genes(&c);
        g.pop();
        assert!(matches!(
            Schedule::new(&c, g),
            Err(Error::MalformedSchedule(_))
        ));
    }

    #[test]
    fn test_duplicate_activity_rejected() {
        let c = Catalog::sla();
        let mut g = genes(&c);
        g[10].activity = 0;
        let err = Schedule::new(&c, g).unwrap_err();
        assert!(err.to_string().contains("SLA101A"));
    }

    #[test]
    fn test_out_of_range_indices_rejected() {
        let c = Catalog::sla();
        let mut g = genes(&c);
        g[3].room = 99;
        assert!(Schedule::new(&c, g).is_err());

        let mut g = genes(&c);
        g[3].slot = 6;
        assert!(Schedule::new(&c, g).is_err());

        let mut g = genes(&c);
        g[3].facilitator = 10;
        assert!(Schedule::new(&c, g).is_err());
    }

    #[test]
    fn test_from_ids() {
        let c = Catalog::sla();
        let rows: Vec<(&str, &str, &str, &str)> = c
            .activities()
            .iter()
            .map(|a| (a.id.as_str(), "Loft 206", "10 AM", "Glen"))
            .collect();
        let s = Schedule::from_ids(&c, &rows).unwrap();
        let a = s.assignment_by_id(&c, "SLA451").unwrap();
        assert_eq!(c.rooms()[a.room].id, "Loft 206");
        assert_eq!(c.facilitators()[a.facilitator].id, "Glen");

        let bad = [("SLA101A", "Nowhere", "10 AM", "Glen")];
        assert!(Schedule::from_ids(&c, &bad).is_err());
    }

    #[test]
    fn test_foreign_catalog_rejected() {
        use crate::models::{Activity, Facilitator, Room, TimeSlot};

        let c = Catalog::sla();
        let s = Schedule::new(&c, genes(&c)).unwrap();
        assert!(s.check_catalog(&c).is_ok());
        assert!(s.copy().check_catalog(&c).is_ok());

        let other = Catalog::builder()
            .with_activity(Activity::new("X1", 10))
            .with_activity(Activity::new("X2", 10))
            .with_room(Room::new("Hall", 20))
            .with_facilitator(Facilitator::new("F"))
            .with_time_slot(TimeSlot::new("9", 9))
            .build()
            .unwrap();
        assert!(matches!(
            s.check_catalog(&other),
            Err(Error::MalformedSchedule(_))
        ));
    }

    #[test]
    fn test_copy_is_independent_and_unscored() {
        let c = Catalog::sla();
        let original = Schedule::new(&c, genes(&c)).unwrap();
        original.report_or_init(|| FitnessReport::from_terms(Vec::new()));
        assert!(original.is_evaluated());

        let copy = original.copy();
        assert!(!copy.is_evaluated());
        assert_eq!(copy.assignments(), original.assignments());

        let mut changed = copy.into_assignments();
        changed[0].room = (changed[0].room + 1) % c.rooms().len();
        let mutated = Schedule::new(&c, changed).unwrap();

        assert_ne!(mutated.assignments(), original.assignments());
        assert_eq!(original.fitness(), Some(0.0));
    }
}
