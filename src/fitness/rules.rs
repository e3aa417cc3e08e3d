//! Fitness rule table.
//!
//! Every magnitude and threshold the evaluator uses. Defaults follow the
//! SLA assignment rules; rules not in that set (equipment, preferred
//! rooms, balanced load, far-apart cross sections) default to zero and
//! contribute nothing until enabled.

use serde::{Deserialize, Serialize};

/// Rule magnitudes and thresholds for [`FitnessEvaluator`](super::FitnessEvaluator).
///
/// Penalties are negative, bonuses positive. A zero magnitude disables
/// the rule and keeps it out of the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitnessRules {
    // Room fit
    /// Room capacity below expected enrollment.
    pub room_too_small: f64,
    /// Added per missing seat when the room is too small.
    pub room_shortfall_per_seat: f64,
    /// Capacity / enrollment ratio above which a room is oversized.
    pub oversize_ratio: f64,
    pub room_oversized: f64,
    /// Capacity / enrollment ratio above which a room is severely oversized.
    pub severe_oversize_ratio: f64,
    pub room_severely_oversized: f64,
    /// Capacity within `[enrollment, oversize_ratio * enrollment]`.
    pub room_good_fit: f64,
    /// Room lacks equipment the activity needs.
    pub missing_equipment: f64,
    /// Room is on the activity's preferred list.
    pub preferred_room: f64,

    /// Per pair of activities sharing a room and slot.
    pub room_conflict: f64,

    // Facilitator preference
    pub facilitator_preferred: f64,
    pub facilitator_other: f64,
    pub facilitator_unlisted: f64,

    // Facilitator time
    /// Per activity whose facilitator has nothing else in that slot.
    pub facilitator_sole_in_slot: f64,
    /// Per pair of activities sharing a facilitator and slot.
    pub facilitator_time_conflict: f64,

    // Facilitator load
    /// Loads above this are overloaded.
    pub max_load: usize,
    pub facilitator_overload: f64,
    /// Nonzero loads below this are underloaded.
    pub min_load: usize,
    pub facilitator_underload: f64,
    /// Reduced-load facilitators are only underloaded from this load upward.
    pub reduced_load_floor: usize,
    /// Facilitators listed by at most this many catalog activities are
    /// never underloaded. Zero disables the exemption.
    pub exempt_listing_limit: usize,
    pub ideal_load_min: usize,
    pub ideal_load_max: usize,
    pub balanced_load: f64,

    // Section spacing
    pub section_same_slot: f64,
    /// Sections further apart than this many hours are well spaced.
    pub section_min_gap: u32,
    pub section_well_spaced: f64,
    pub section_adjacent: f64,

    // Cross-section interaction
    pub cross_same_slot: f64,
    pub cross_consecutive: f64,
    /// Consecutive pair where exactly one room is in a remote building.
    pub cross_building_mismatch: f64,
    /// Pair separated by exactly one slot.
    pub cross_one_slot_gap: f64,
    pub cross_far_apart: f64,
}

impl Default for FitnessRules {
    fn default() -> Self {
        Self {
            room_too_small: -0.5,
            room_shortfall_per_seat: 0.0,
            oversize_ratio: 3.0,
            room_oversized: -0.2,
            severe_oversize_ratio: 6.0,
            room_severely_oversized: -0.4,
            room_good_fit: 0.3,
            missing_equipment: 0.0,
            preferred_room: 0.0,

            room_conflict: -0.5,

            facilitator_preferred: 0.5,
            facilitator_other: 0.2,
            facilitator_unlisted: -0.1,

            facilitator_sole_in_slot: 0.2,
            facilitator_time_conflict: -0.2,

            max_load: 4,
            facilitator_overload: -0.5,
            min_load: 3,
            facilitator_underload: -0.4,
            reduced_load_floor: 2,
            exempt_listing_limit: 2,
            ideal_load_min: 2,
            ideal_load_max: 4,
            balanced_load: 0.0,

            section_same_slot: -0.5,
            section_min_gap: 4,
            section_well_spaced: 0.5,
            section_adjacent: 0.0,

            cross_same_slot: -0.25,
            cross_consecutive: 0.5,
            cross_building_mismatch: -0.4,
            cross_one_slot_gap: 0.25,
            cross_far_apart: 0.0,
        }
    }
}

impl FitnessRules {
    /// Enables the equipment penalty.
    pub fn with_missing_equipment(mut self, penalty: f64) -> Self {
        self.missing_equipment = penalty;
        self
    }

    /// Enables the preferred-room bonus.
    pub fn with_preferred_room(mut self, bonus: f64) -> Self {
        self.preferred_room = bonus;
        self
    }

    /// Enables the balanced-load bonus.
    pub fn with_balanced_load(mut self, bonus: f64) -> Self {
        self.balanced_load = bonus;
        self
    }

    /// Sets the per-seat shortfall scaling for undersized rooms.
    pub fn with_shortfall_per_seat(mut self, penalty: f64) -> Self {
        self.room_shortfall_per_seat = penalty;
        self
    }

    /// Sets the listing-count underload exemption (0 disables it).
    pub fn with_exempt_listing_limit(mut self, limit: usize) -> Self {
        self.exempt_listing_limit = limit;
        self
    }
}
