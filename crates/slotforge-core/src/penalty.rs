//! Business-rule categories and their penalty weights.

use std::collections::BTreeMap;
use std::fmt;

use tracing::warn;

use crate::cost::Cost;
use crate::error::{Result, ScheduleError};

/// Built-in business rules evaluated for every schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BusinessConstraint {
    BofOverlappingPrg,
    BofOverlappingBof,
    BofOverlappingAreaWg,
    BofOverlappingAreaMeeting,
    AreaOverlappingInArea,
    AreaOverlappingOtherArea,
    SessionOverlapAd,
    SessionsOutOfOrder,
    /// Also charged for placements in a too-small room or too-short slot.
    SessionRequiresTrim,
}

impl BusinessConstraint {
    pub const ALL: [BusinessConstraint; 9] = [
        BusinessConstraint::BofOverlappingPrg,
        BusinessConstraint::BofOverlappingBof,
        BusinessConstraint::BofOverlappingAreaWg,
        BusinessConstraint::BofOverlappingAreaMeeting,
        BusinessConstraint::AreaOverlappingInArea,
        BusinessConstraint::AreaOverlappingOtherArea,
        BusinessConstraint::SessionOverlapAd,
        BusinessConstraint::SessionsOutOfOrder,
        BusinessConstraint::SessionRequiresTrim,
    ];

    pub const fn slug(&self) -> &'static str {
        match self {
            BusinessConstraint::BofOverlappingPrg => "bof_overlapping_prg",
            BusinessConstraint::BofOverlappingBof => "bof_overlapping_bof",
            BusinessConstraint::BofOverlappingAreaWg => "bof_overlapping_area_wg",
            BusinessConstraint::BofOverlappingAreaMeeting => "bof_overlapping_area_meeting",
            BusinessConstraint::AreaOverlappingInArea => "area_overlapping_in_area",
            BusinessConstraint::AreaOverlappingOtherArea => "area_overlapping_other_area",
            BusinessConstraint::SessionOverlapAd => "session_overlap_ad",
            BusinessConstraint::SessionsOutOfOrder => "sessions_out_of_order",
            BusinessConstraint::SessionRequiresTrim => "session_requires_trim",
        }
    }

    pub const fn is_mandatory(&self) -> bool {
        matches!(self, BusinessConstraint::SessionRequiresTrim)
    }
}

impl fmt::Display for BusinessConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// Constraint categories that may appear on raw constraint records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstraintKind {
    /// `conflict`, `conflic2` or `conflic3`: must not overlap the target group.
    GroupConflict,
    /// `bethere`: a person who must be able to attend.
    KeyPerson,
    /// `time_relation`: day relation between the group's first two sessions.
    TimeRelation,
    /// `wg_adjacent`: must sit directly before or after the target group.
    WgAdjacent,
    /// `timerange`: day/time-of-day buckets the group cannot use.
    TimeRange,
}

impl ConstraintKind {
    /// Maps a category slug to its kind, or `None` for unknown categories.
    pub fn from_slug(slug: &str) -> Option<Self> {
        match slug {
            "conflict" | "conflic2" | "conflic3" => Some(ConstraintKind::GroupConflict),
            "bethere" => Some(ConstraintKind::KeyPerson),
            "time_relation" => Some(ConstraintKind::TimeRelation),
            "wg_adjacent" => Some(ConstraintKind::WgAdjacent),
            "timerange" => Some(ConstraintKind::TimeRange),
            _ => None,
        }
    }
}

/// Penalty weight per category slug.
///
/// Covers both business rules and constraint categories. Construction fails
/// when a mandatory business rule has no weight; any other missing weight
/// counts as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PenaltyTable {
    weights: BTreeMap<String, u64>,
}

impl PenaltyTable {
    /// Creates a table, checking mandatory weights are present.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::MissingPenalty`] if `session_requires_trim` is absent.
    pub fn new(weights: BTreeMap<String, u64>) -> Result<Self> {
        for constraint in BusinessConstraint::ALL {
            if weights.contains_key(constraint.slug()) {
                continue;
            }
            if constraint.is_mandatory() {
                return Err(ScheduleError::MissingPenalty(constraint.slug()));
            }
            warn!(
                event = "missing_penalty",
                category = constraint.slug(),
                "no penalty weight configured, using 0"
            );
        }
        Ok(Self { weights })
    }

    /// Returns the weight of a business rule.
    pub fn business(&self, constraint: BusinessConstraint) -> Cost {
        self.weight(constraint.slug())
    }

    /// Returns the weight registered under a slug, zero if absent.
    pub fn weight(&self, slug: &str) -> Cost {
        self.weights.get(slug).copied().map(Cost::of).unwrap_or(Cost::ZERO)
    }
}
