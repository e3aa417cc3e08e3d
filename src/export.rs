//! Flat tabular views of results.
//!
//! Rows serialize with `csv` (or any serde format); the crate itself
//! never opens files.

use std::io;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::ga::RunHistory;
use crate::models::{Catalog, Schedule};

/// One assignment of a schedule, by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRow {
    pub activity: String,
    pub room: String,
    pub building: String,
    pub time: String,
    pub facilitator: String,
    pub enrollment: u32,
    pub capacity: u32,
}

/// One generation of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRow {
    pub generation: usize,
    pub best: f64,
    pub mean: f64,
    pub worst: f64,
    /// Empty when undefined.
    pub improvement: Option<f64>,
    pub mutation_rate: f64,
}

/// Rows of `schedule` ordered by time slot, then activity.
///
/// Fails with [`Error::MalformedSchedule`](crate::Error::MalformedSchedule)
/// if `schedule` was built from another catalog.
pub fn schedule_rows(catalog: &Catalog, schedule: &Schedule) -> Result<Vec<ScheduleRow>> {
    schedule.check_catalog(catalog)?;
    let mut genes = schedule.assignments().to_vec();
    genes.sort_by_key(|g| (catalog.time_slots()[g.slot].order, g.activity));
    let rows = genes
        .iter()
        .map(|g| {
            let activity = &catalog.activities()[g.activity];
            let room = &catalog.rooms()[g.room];
            ScheduleRow {
                activity: activity.id.clone(),
                room: room.id.clone(),
                building: room.building.clone(),
                time: catalog.time_slots()[g.slot].id.clone(),
                facilitator: catalog.facilitators()[g.facilitator].id.clone(),
                enrollment: activity.expected_enrollment,
                capacity: room.capacity,
            }
        })
        .collect();
    Ok(rows)
}

/// One row per recorded generation.
pub fn history_rows(history: &RunHistory) -> Vec<HistoryRow> {
    history
        .iter()
        .map(|g| HistoryRow {
            generation: g.generation,
            best: g.best,
            mean: g.mean,
            worst: g.worst,
            improvement: g.improvement,
            mutation_rate: g.mutation_rate,
        })
        .collect()
}

/// Writes `rows` as CSV with a header line.
pub fn write_csv<T, W>(rows: &[T], writer: W) -> Result<()>
where
    T: Serialize,
    W: io::Write,
{
    let mut wtr = csv::Writer::from_writer(writer);
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush().map_err(csv::Error::from)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::ga::GenerationStats;
    use crate::models::{Activity, Facilitator, Room, TimeSlot};

    fn sample_schedule(catalog: &Catalog) -> Schedule {
        Schedule::from_ids(
            catalog,
            &[
                ("SLA101A", "Slater 003", "10 AM", "Glen"),
                ("SLA101B", "Roman 216", "2 PM", "Lock"),
                ("SLA191A", "Beach 201", "11 AM", "Banks"),
                ("SLA191B", "Loft 206", "1 PM", "Zeldin"),
                ("SLA201", "Frank 119", "12 PM", "Richards"),
                ("SLA291", "James 325", "3 PM", "Shaw"),
                ("SLA303", "Loft 310", "10 AM", "Singer"),
                ("SLA304", "Roman 201", "11 AM", "Uther"),
                ("SLA394", "Beach 301", "1 PM", "Tyler"),
                ("SLA449", "Loft 206", "2 PM", "Numen"),
                ("SLA451", "Frank 119", "3 PM", "Glen"),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_schedule_rows_by_time() {
        let catalog = Catalog::sla();
        let rows = schedule_rows(&catalog, &sample_schedule(&catalog)).unwrap();
        assert_eq!(rows.len(), 11);
        assert_eq!(rows[0].time, "10 AM");
        assert_eq!(rows[0].activity, "SLA101A");
        assert_eq!(rows[1].activity, "SLA303");
        assert_eq!(rows[0].building, "Slater");
        assert_eq!(rows[10].time, "3 PM");
    }

    #[test]
    fn test_schedule_rows_reject_foreign_catalog() {
        let sla = Catalog::sla();
        let schedule = sample_schedule(&sla);
        let other = Catalog::builder()
            .with_activity(Activity::new("X1", 10))
            .with_activity(Activity::new("X2", 10))
            .with_room(Room::new("Hall", 20))
            .with_facilitator(Facilitator::new("F"))
            .with_time_slot(TimeSlot::new("9", 9))
            .build()
            .unwrap();
        assert!(matches!(
            schedule_rows(&other, &schedule),
            Err(Error::MalformedSchedule(_))
        ));
    }

    #[test]
    fn test_write_schedule_csv() {
        let catalog = Catalog::sla();
        let rows = schedule_rows(&catalog, &sample_schedule(&catalog)).unwrap();
        let mut out = Vec::new();
        write_csv(&rows, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("activity,room,building,time,facilitator,enrollment,capacity")
        );
        assert_eq!(lines.count(), 11);
    }

    #[test]
    fn test_write_history_csv() {
        let mut history = RunHistory::new();
        history.push(GenerationStats {
            generation: 0,
            best: 2.5,
            mean: 1.0,
            worst: -3.0,
            improvement: None,
            mutation_rate: 0.01,
        });
        history.push(GenerationStats {
            generation: 1,
            best: 3.0,
            mean: 1.5,
            worst: -2.0,
            improvement: Some(0.5),
            mutation_rate: 0.01,
        });

        let mut out = Vec::new();
        write_csv(&history_rows(&history), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "generation,best,mean,worst,improvement,mutation_rate");
        assert_eq!(lines[1], "0,2.5,1.0,-3.0,,0.01");
        assert_eq!(lines[2], "1,3.0,1.5,-2.0,0.5,0.01");
    }
}
