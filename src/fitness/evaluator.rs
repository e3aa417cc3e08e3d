//! Schedule fitness evaluation.
//!
//! # Algorithm
//!
//! 1. Per activity: room fit, equipment, preferred room, facilitator preference.
//! 2. Per (room, slot) and (facilitator, slot) group: conflicts and sole-slot bonuses.
//! 3. Per facilitator: load bounds.
//! 4. Per section pair and cross pair: slot spacing.
//!
//! Every rule runs on every call; nothing short-circuits. A schedule built
//! from a differently shaped catalog is rejected before any rule runs.
//!
//! # Complexity
//! O(n²) in the number of activities for pairwise conflict enumeration.

use std::sync::Arc;

use log::trace;
use rayon::prelude::*;

use super::{FitnessReport, FitnessRules, FitnessTerm, RuleKind};
use crate::error::Result;
use crate::models::{Assignment, Catalog, Preference, Schedule};

/// Scores schedules against a rule table.
///
/// Stateless apart from its configuration: evaluating the same schedule
/// twice yields identical reports.
#[derive(Debug, Clone)]
pub struct FitnessEvaluator<'a> {
    catalog: &'a Catalog,
    rules: FitnessRules,
}

impl<'a> FitnessEvaluator<'a> {
    /// Creates an evaluator for schedules built from `catalog`.
    pub fn new(catalog: &'a Catalog, rules: FitnessRules) -> Self {
        Self { catalog, rules }
    }

    pub fn catalog(&self) -> &'a Catalog {
        self.catalog
    }

    pub fn rules(&self) -> &FitnessRules {
        &self.rules
    }

    /// Computes the full report for a schedule. Ignores the cache.
    ///
    /// Fails with [`Error::MalformedSchedule`](crate::Error::MalformedSchedule)
    /// if the schedule was built from another catalog.
    pub fn evaluate(&self, schedule: &Schedule) -> Result<FitnessReport> {
        schedule.check_catalog(self.catalog)?;
        Ok(self.build_report(schedule))
    }

    /// Fitness of a schedule, evaluating and caching it on first use.
    pub fn score(&self, schedule: &Schedule) -> Result<f64> {
        schedule.check_catalog(self.catalog)?;
        Ok(schedule.report_or_init(|| self.build_report(schedule)).total)
    }

    /// Scores every schedule that has not been scored yet.
    ///
    /// Returns the fitness values in population order.
    pub fn score_all(&self, schedules: &[Arc<Schedule>], parallel: bool) -> Result<Vec<f64>> {
        let pending = schedules.iter().filter(|s| !s.is_evaluated()).count();
        trace!("evaluating {pending} of {} schedules", schedules.len());

        if parallel {
            schedules.par_iter().map(|s| self.score(s)).collect()
        } else {
            schedules.iter().map(|s| self.score(s)).collect()
        }
    }

    fn build_report(&self, schedule: &Schedule) -> FitnessReport {
        let genes = schedule.assignments();
        let mut terms = Vec::new();

        for gene in genes {
            self.room_fit(gene, &mut terms);
            self.facilitator_preference(gene, &mut terms);
        }
        self.room_conflicts(genes, &mut terms);
        self.facilitator_slots(genes, &mut terms);
        self.facilitator_loads(genes, &mut terms);
        self.section_spacing(genes, &mut terms);
        self.cross_sections(genes, &mut terms);

        FitnessReport::from_terms(terms)
    }

    fn push(terms: &mut Vec<FitnessTerm>, kind: RuleKind, subject: String, value: f64) {
        if value != 0.0 {
            terms.push(FitnessTerm {
                kind,
                subject,
                value,
            });
        }
    }

    fn activity_id(&self, idx: usize) -> &str {
        &self.catalog.activities()[idx].id
    }

    fn pair_subject(&self, a: usize, b: usize) -> String {
        format!("{}/{}", self.activity_id(a), self.activity_id(b))
    }

    fn slot_distance(&self, a: &Assignment, b: &Assignment) -> u32 {
        let slots = self.catalog.time_slots();
        slots[a.slot].distance(&slots[b.slot])
    }

    fn room_fit(&self, gene: &Assignment, terms: &mut Vec<FitnessTerm>) {
        let r = &self.rules;
        let activity = &self.catalog.activities()[gene.activity];
        let room = &self.catalog.rooms()[gene.room];
        let subject = || activity.id.clone();

        let enrollment = activity.expected_enrollment;
        if room.capacity < enrollment {
            let shortfall = f64::from(enrollment - room.capacity);
            let value = r.room_too_small + r.room_shortfall_per_seat * shortfall;
            Self::push(terms, RuleKind::RoomTooSmall, subject(), value);
        } else {
            let ratio = f64::from(room.capacity) / f64::from(enrollment);
            if ratio > r.severe_oversize_ratio {
                Self::push(terms, RuleKind::RoomSeverelyOversized, subject(), r.room_severely_oversized);
            } else if ratio > r.oversize_ratio {
                Self::push(terms, RuleKind::RoomOversized, subject(), r.room_oversized);
            } else {
                Self::push(terms, RuleKind::RoomGoodFit, subject(), r.room_good_fit);
            }
        }

        if !room.satisfies(activity) {
            Self::push(terms, RuleKind::MissingEquipment, subject(), r.missing_equipment);
        }
        if self.catalog.is_preferred_room(gene.activity, gene.room) {
            Self::push(terms, RuleKind::PreferredRoom, subject(), r.preferred_room);
        }
    }

    fn facilitator_preference(&self, gene: &Assignment, terms: &mut Vec<FitnessTerm>) {
        let r = &self.rules;
        let (kind, value) = match self.catalog.preference(gene.activity, gene.facilitator) {
            Preference::Preferred => (RuleKind::FacilitatorPreferred, r.facilitator_preferred),
            Preference::Other => (RuleKind::FacilitatorOther, r.facilitator_other),
            Preference::Unlisted => (RuleKind::FacilitatorUnlisted, r.facilitator_unlisted),
        };
        Self::push(terms, kind, self.activity_id(gene.activity).to_string(), value);
    }

    fn room_conflicts(&self, genes: &[Assignment], terms: &mut Vec<FitnessTerm>) {
        for (i, a) in genes.iter().enumerate() {
            for b in &genes[i + 1..] {
                if a.room == b.room && a.slot == b.slot {
                    Self::push(
                        terms,
                        RuleKind::RoomConflict,
                        self.pair_subject(a.activity, b.activity),
                        self.rules.room_conflict,
                    );
                }
            }
        }
    }

    fn facilitator_slots(&self, genes: &[Assignment], terms: &mut Vec<FitnessTerm>) {
        for a in genes {
            let sharing = genes
                .iter()
                .filter(|b| b.facilitator == a.facilitator && b.slot == a.slot)
                .count();
            if sharing == 1 {
                Self::push(
                    terms,
                    RuleKind::FacilitatorSoleInSlot,
                    self.activity_id(a.activity).to_string(),
                    self.rules.facilitator_sole_in_slot,
                );
            }
        }
        for (i, a) in genes.iter().enumerate() {
            for b in &genes[i + 1..] {
                if a.facilitator == b.facilitator && a.slot == b.slot {
                    Self::push(
                        terms,
                        RuleKind::FacilitatorTimeConflict,
                        self.pair_subject(a.activity, b.activity),
                        self.rules.facilitator_time_conflict,
                    );
                }
            }
        }
    }

    fn facilitator_loads(&self, genes: &[Assignment], terms: &mut Vec<FitnessTerm>) {
        let r = &self.rules;
        let mut loads = vec![0usize; self.catalog.facilitators().len()];
        for gene in genes {
            loads[gene.facilitator] += 1;
        }

        for (idx, &load) in loads.iter().enumerate() {
            // Unassigned facilitators are not scored.
            if load == 0 {
                continue;
            }
            let facilitator = &self.catalog.facilitators()[idx];
            let subject = || facilitator.id.clone();

            if load > r.max_load {
                Self::push(terms, RuleKind::FacilitatorOverload, subject(), r.facilitator_overload);
            } else if load < r.min_load {
                let rarely_listed = self.catalog.listing_count(idx) <= r.exempt_listing_limit;
                let reduced = facilitator.reduced_load && load < r.reduced_load_floor;
                if !rarely_listed && !reduced {
                    Self::push(terms, RuleKind::FacilitatorUnderload, subject(), r.facilitator_underload);
                }
            }

            let band_min = if facilitator.reduced_load { 1 } else { r.ideal_load_min };
            if (band_min..=r.ideal_load_max).contains(&load) {
                Self::push(terms, RuleKind::FacilitatorBalancedLoad, subject(), r.balanced_load);
            }
        }
    }

    fn section_spacing(&self, genes: &[Assignment], terms: &mut Vec<FitnessTerm>) {
        let r = &self.rules;
        for &(i, j) in self.catalog.section_pairs() {
            let distance = self.slot_distance(&genes[i], &genes[j]);
            let (kind, value) = if distance == 0 {
                (RuleKind::SectionSameSlot, r.section_same_slot)
            } else if distance > r.section_min_gap {
                (RuleKind::SectionWellSpaced, r.section_well_spaced)
            } else if distance == 1 {
                (RuleKind::SectionAdjacent, r.section_adjacent)
            } else {
                continue;
            };
            Self::push(terms, kind, self.pair_subject(i, j), value);
        }
    }

    fn cross_sections(&self, genes: &[Assignment], terms: &mut Vec<FitnessTerm>) {
        let r = &self.rules;
        for &(i, j) in self.catalog.cross_pairs() {
            let (a, b) = (&genes[i], &genes[j]);
            let subject = || self.pair_subject(i, j);
            match self.slot_distance(a, b) {
                0 => Self::push(terms, RuleKind::CrossSameSlot, subject(), r.cross_same_slot),
                1 => {
                    Self::push(terms, RuleKind::CrossConsecutive, subject(), r.cross_consecutive);
                    if self.catalog.is_remote_room(a.room) != self.catalog.is_remote_room(b.room) {
                        Self::push(
                            terms,
                            RuleKind::CrossBuildingMismatch,
                            subject(),
                            r.cross_building_mismatch,
                        );
                    }
                }
                2 => Self::push(terms, RuleKind::CrossOneSlotGap, subject(), r.cross_one_slot_gap),
                _ => Self::push(terms, RuleKind::CrossFarApart, subject(), r.cross_far_apart),
            }
        }
    }
}
