//! Cost model for a schedule mapping.
//!
//! Every placed session contributes, in order:
//! 1. placement costs: unavailable time range, too small room, too short slot
//! 2. overlap conflicts: double booking, group conflicts, key people
//! 3. business rules against overlapping sessions
//! 4. same-group costs: chronological order and time relation
//! 5. adjacency, only when base-schedule sessions are not included

use std::collections::HashMap;

use slotforge_core::{BusinessConstraint, Cost, CostReport, PenaltyTable, Session, TimeSlot};
use smallvec::SmallVec;

use crate::assignment::Assignment;
use crate::cache::{OverlapCheck, OverlapCostCache, OverlapKey};

/// Per-session totals from one evaluation, in slot order.
pub type SessionCosts = Vec<(usize, Cost)>;

/// Borrowed view of the data a cost evaluation needs.
#[derive(Debug, Clone, Copy)]
pub struct CostModel<'a> {
    timeslots: &'a [TimeSlot],
    sessions: &'a [Session],
    penalties: &'a PenaltyTable,
}

impl<'a> CostModel<'a> {
    pub fn new(
        timeslots: &'a [TimeSlot],
        sessions: &'a [Session],
        penalties: &'a PenaltyTable,
    ) -> Self {
        Self {
            timeslots,
            sessions,
            penalties,
        }
    }

    /// Evaluates `assignment`.
    ///
    /// With `include_fixed` unset, placement costs of fixed sessions are
    /// skipped and adjacency is evaluated. With it set, the reverse holds.
    pub fn evaluate(
        &self,
        assignment: &Assignment,
        include_fixed: bool,
        cache: &mut OverlapCostCache,
    ) -> (CostReport, SessionCosts) {
        let mut by_group: HashMap<&str, Vec<(usize, usize)>> = HashMap::new();
        for (slot, session) in assignment.iter() {
            by_group
                .entry(self.sessions[session].group.as_str())
                .or_default()
                .push((slot, session));
        }

        let mut report = CostReport::new();
        let mut per_session = Vec::with_capacity(assignment.len());

        for (slot_index, session_index) in assignment.iter() {
            let slot = &self.timeslots[slot_index];
            let session = &self.sessions[session_index];
            let mut own = CostReport::new();

            if include_fixed || !session.is_fixed {
                own.absorb(self.placement_cost(session, slot));
            }

            let overlapping: SmallVec<[usize; 8]> = slot
                .overlaps()
                .iter()
                .filter_map(|&other| assignment.get(other))
                .collect();
            if overlapping.len() > 1 {
                let key = OverlapKey::new(
                    OverlapCheck::Conflicts,
                    session_index,
                    overlapping.iter().copied(),
                );
                own.extend_from(
                    cache.get_or_insert_with(key, || self.conflict_cost(session, &overlapping)),
                );
                let key = OverlapKey::new(
                    OverlapCheck::BusinessLogic,
                    session_index,
                    overlapping.iter().copied(),
                );
                own.extend_from(
                    cache.get_or_insert_with(key, || {
                        self.business_logic_cost(session, &overlapping)
                    }),
                );
            }

            if let Some(group) = by_group.get(session.group.as_str()) {
                own.absorb(self.same_group_cost(session, group, include_fixed));
            }

            if !include_fixed {
                own.absorb(self.adjacency_cost(session, slot, assignment));
            }

            per_session.push((session_index, own.cost));
            report.absorb(own);
        }

        (report, per_session)
    }

    fn placement_cost(&self, session: &Session, slot: &TimeSlot) -> CostReport {
        let mut report = CostReport::new();
        let constraints = &session.constraints;
        if constraints.timeranges_unavailable.contains(&slot.time_range) {
            report.push(
                format!(
                    "{}: scheduled in unavailable time range {}",
                    session.group, slot.time_range
                ),
                constraints.timeranges_unavailable_penalty,
            );
        }

        let trim = self.penalties.business(BusinessConstraint::SessionRequiresTrim);
        if session.attendees > slot.capacity {
            report.push(
                format!(
                    "{}: scheduled in too small room ({} seats for {} attendees)",
                    session.group, slot.capacity, session.attendees
                ),
                trim,
            );
        }
        if session.requested_duration > slot.duration {
            report.push(
                format!(
                    "{}: scheduled in too short timeslot ({} minutes for {} requested)",
                    session.group,
                    slot.duration.num_minutes(),
                    session.requested_duration.num_minutes()
                ),
                trim,
            );
        }
        report
    }

    fn conflict_cost(&self, session: &Session, overlapping: &[usize]) -> CostReport {
        let mut report = CostReport::new();
        let constraints = &session.constraints;
        for other in self.others(session, overlapping) {
            if other.group == session.group {
                report.push(
                    format!(
                        "{}: scheduled twice in overlapping slots (session {} and {})",
                        session.group, session.id, other.id
                    ),
                    Cost::INFINITE,
                );
            }
            if let Some(&penalty) = constraints.conflict_groups.get(&other.group) {
                report.push(
                    format!("{}: group conflict with {}", session.group, other.group),
                    penalty,
                );
            }

            let shared: Vec<_> = constraints
                .conflict_people
                .intersection(&other.constraints.conflict_people)
                .collect();
            if !shared.is_empty() {
                for person in &shared {
                    report.violations.push(format!(
                        "{}: conflict with key person {}, also needed by {}",
                        session.group, person, other.group
                    ));
                }
                report.cost += constraints.conflict_people_penalty.times(shared.len());
            }
        }
        report
    }

    fn business_logic_cost(&self, session: &Session, overlapping: &[usize]) -> CostReport {
        let mut report = CostReport::new();
        let mut charge = |rule: BusinessConstraint, other: &Session| {
            report.push(
                format!("{}: {} with {}", session.group, rule, other.group),
                self.penalties.business(rule),
            );
        };

        for other in self.others(session, overlapping) {
            if session.is_bof {
                if other.is_proposed_research_group {
                    charge(BusinessConstraint::BofOverlappingPrg, other);
                }
                if other.is_bof {
                    charge(BusinessConstraint::BofOverlappingBof, other);
                }
                if session.parent.is_some() && session.parent == other.parent {
                    charge(BusinessConstraint::BofOverlappingAreaWg, other);
                }
                if other.is_area_meeting {
                    charge(BusinessConstraint::BofOverlappingAreaMeeting, other);
                }
            }
            if session.is_area_meeting {
                if other.parent.as_deref() == Some(session.group.as_str()) {
                    charge(BusinessConstraint::AreaOverlappingInArea, other);
                }
                if other.is_area_meeting {
                    charge(BusinessConstraint::AreaOverlappingOtherArea, other);
                }
            }
            if session.responsible_person.is_some()
                && session.responsible_person == other.responsible_person
            {
                charge(BusinessConstraint::SessionOverlapAd, other);
            }
        }
        report
    }

    fn same_group_cost(
        &self,
        session: &Session,
        group: &[(usize, usize)],
        include_fixed: bool,
    ) -> CostReport {
        let mut report = CostReport::new();
        if group.len() < 2 {
            return report;
        }
        if !include_fixed && group.iter().all(|&(_, s)| self.sessions[s].is_fixed) {
            return report;
        }

        let mut ordered = group.to_vec();
        ordered.sort_by_key(|&(slot, _)| (self.timeslots[slot].start, slot));

        // A base schedule that is already out of order cannot be repaired.
        let fixed_in_order = is_ascending(
            ordered
                .iter()
                .map(|&(_, s)| &self.sessions[s])
                .filter(|s| s.is_fixed)
                .map(|s| s.id),
        );
        if (include_fixed || fixed_in_order)
            && !is_ascending(ordered.iter().map(|&(_, s)| self.sessions[s].id))
        {
            report.push(
                format!("{}: sessions out of order", session.group),
                self.penalties.business(BusinessConstraint::SessionsOutOfOrder),
            );
        }

        if let Some(requirement) = session.constraints.time_relation {
            let first = self.timeslots[ordered[0].0].date();
            let second = self.timeslots[ordered[1].0].date();
            let days_apart = (second - first).num_days().abs();
            if !requirement.relation.is_satisfied(days_apart) {
                report.push(
                    format!(
                        "{}: requested time relation {} but sessions are {} days apart",
                        session.group,
                        requirement.relation.slug(),
                        days_apart
                    ),
                    requirement.penalty,
                );
            }
        }
        report
    }

    fn adjacency_cost(
        &self,
        session: &Session,
        slot: &TimeSlot,
        assignment: &Assignment,
    ) -> CostReport {
        let mut report = CostReport::new();
        let Some(requirement) = &session.constraints.wg_adjacent else {
            return report;
        };
        let adjacent = slot
            .adjacent()
            .iter()
            .filter_map(|&other| assignment.get(other))
            .any(|other| self.sessions[other].group == requirement.group);
        if !adjacent {
            report.push(
                format!(
                    "{}: requested adjacency with {} is not met",
                    session.group, requirement.group
                ),
                requirement.penalty,
            );
        }
        report
    }

    /// Overlapping sessions other than `session`. Pairs of two fixed
    /// sessions are never charged.
    fn others<'s>(
        &self,
        session: &'s Session,
        overlapping: &'s [usize],
    ) -> impl Iterator<Item = &'a Session> + 's
    where
        'a: 's,
    {
        let sessions = self.sessions;
        overlapping
            .iter()
            .map(move |&o| &sessions[o])
            .filter(move |other| {
                other.index != session.index && !(session.is_fixed && other.is_fixed)
            })
    }
}

fn is_ascending<T: PartialOrd>(mut items: impl Iterator<Item = T>) -> bool {
    let Some(mut previous) = items.next() else {
        return true;
    };
    for item in items {
        if item < previous {
            return false;
        }
        previous = item;
    }
    true
}
