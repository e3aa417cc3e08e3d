//! Itemized fitness report.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single scoring rule outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RuleKind {
    RoomTooSmall,
    RoomOversized,
    RoomSeverelyOversized,
    RoomGoodFit,
    MissingEquipment,
    PreferredRoom,
    RoomConflict,
    FacilitatorPreferred,
    FacilitatorOther,
    FacilitatorUnlisted,
    FacilitatorSoleInSlot,
    FacilitatorTimeConflict,
    FacilitatorOverload,
    FacilitatorUnderload,
    FacilitatorBalancedLoad,
    SectionSameSlot,
    SectionWellSpaced,
    SectionAdjacent,
    CrossSameSlot,
    CrossConsecutive,
    CrossBuildingMismatch,
    CrossOneSlotGap,
    CrossFarApart,
}

/// Rule grouping used for report breakdowns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RuleCategory {
    RoomFit,
    RoomConflict,
    FacilitatorPreference,
    FacilitatorTime,
    FacilitatorLoad,
    SectionSpacing,
    CrossSection,
}

impl RuleKind {
    /// Category the rule belongs to.
    pub fn category(self) -> RuleCategory {
        use RuleKind::*;
        match self {
            RoomTooSmall | RoomOversized | RoomSeverelyOversized | RoomGoodFit
            | MissingEquipment | PreferredRoom => RuleCategory::RoomFit,
            RoomConflict => RuleCategory::RoomConflict,
            FacilitatorPreferred | FacilitatorOther | FacilitatorUnlisted => {
                RuleCategory::FacilitatorPreference
            }
            FacilitatorSoleInSlot | FacilitatorTimeConflict => RuleCategory::FacilitatorTime,
            FacilitatorOverload | FacilitatorUnderload | FacilitatorBalancedLoad => {
                RuleCategory::FacilitatorLoad
            }
            SectionSameSlot | SectionWellSpaced | SectionAdjacent => RuleCategory::SectionSpacing,
            CrossSameSlot | CrossConsecutive | CrossBuildingMismatch | CrossOneSlotGap
            | CrossFarApart => RuleCategory::CrossSection,
        }
    }
}

/// One contribution to a schedule's fitness.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitnessTerm {
    /// Which rule fired.
    pub kind: RuleKind,
    /// What it fired on: an activity, an "A/B" activity pair, or a facilitator.
    pub subject: String,
    /// Signed contribution.
    pub value: f64,
}

/// Breakdown of a schedule's fitness: every contributing term and their sum.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FitnessReport {
    /// Contributing terms in evaluation order.
    pub terms: Vec<FitnessTerm>,
    /// Signed sum of all terms.
    pub total: f64,
}

impl FitnessReport {
    /// Builds a report, summing the terms in order.
    pub fn from_terms(terms: Vec<FitnessTerm>) -> Self {
        let total = terms.iter().map(|t| t.value).sum();
        Self { terms, total }
    }

    /// Sum of the terms in one category.
    pub fn category_total(&self, category: RuleCategory) -> f64 {
        self.terms
            .iter()
            .filter(|t| t.kind.category() == category)
            .map(|t| t.value)
            .sum()
    }

    /// Per-category sums (categories without terms are omitted).
    pub fn breakdown(&self) -> BTreeMap<RuleCategory, f64> {
        let mut out = BTreeMap::new();
        for t in &self.terms {
            *out.entry(t.kind.category()).or_insert(0.0) += t.value;
        }
        out
    }

    /// Number of terms of `kind`.
    pub fn count(&self, kind: RuleKind) -> usize {
        self.terms.iter().filter(|t| t.kind == kind).count()
    }

    /// Counts of every penalizing rule that fired.
    pub fn violations(&self) -> BTreeMap<RuleKind, usize> {
        let mut out = BTreeMap::new();
        for t in self.terms.iter().filter(|t| t.value < 0.0) {
            *out.entry(t.kind).or_insert(0) += 1;
        }
        out
    }

    /// No room or facilitator double-booking.
    pub fn is_feasible(&self) -> bool {
        self.count(RuleKind::RoomConflict) == 0 && self.count(RuleKind::FacilitatorTimeConflict) == 0
    }
}
