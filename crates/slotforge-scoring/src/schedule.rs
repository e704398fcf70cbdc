//! The schedule under optimisation.

use std::borrow::Cow;

use slotforge_core::{
    BusinessConstraint, Cost, CostReport, PenaltyTable, Result, ScheduleError, Session, TimeSlot,
};
use tracing::{debug, trace};

use crate::assignment::Assignment;
use crate::cache::OverlapCostCache;
use crate::cost_model::CostModel;

/// Costs that no move can change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FixedCosts {
    /// Trims applied while matching requests to the available rooms.
    pub capacity: CostReport,
    /// Cost of the base schedule evaluated on its own.
    pub base: CostReport,
}

impl FixedCosts {
    pub fn total(&self) -> Cost {
        self.capacity.cost + self.base.cost
    }
}

/// Best mapping seen so far and its total cost.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BestSchedule {
    pub cost: Cost,
    pub assignment: Assignment,
}

/// Slots, sessions and the current mapping between them.
///
/// Sessions and slots referenced by the base schedule are fixed. The
/// mapping held here only ever contains movable sessions in movable slots;
/// the base schedule is laid over it for every evaluation.
#[derive(Debug, Clone)]
pub struct Schedule {
    timeslots: Vec<TimeSlot>,
    sessions: Vec<Session>,
    penalties: PenaltyTable,
    assignment: Assignment,
    base: Option<Assignment>,
    fixed: FixedCosts,
    best: Option<BestSchedule>,
    cache: OverlapCostCache,
}

impl Schedule {
    /// Creates an empty schedule.
    ///
    /// Slot and session indices must match their positions. Every slot and
    /// session placed in `base` is marked fixed.
    pub fn new(
        mut timeslots: Vec<TimeSlot>,
        mut sessions: Vec<Session>,
        penalties: PenaltyTable,
        base: Option<Assignment>,
    ) -> Result<Self> {
        for (position, slot) in timeslots.iter().enumerate() {
            if slot.index != position {
                return Err(ScheduleError::Internal(format!(
                    "timeslot {} has index {} at position {}",
                    slot.id, slot.index, position
                )));
            }
        }
        for (position, session) in sessions.iter().enumerate() {
            if session.index != position {
                return Err(ScheduleError::Internal(format!(
                    "session {} has index {} at position {}",
                    session.id, session.index, position
                )));
            }
        }

        if let Some(base) = &base {
            if base.slot_count() != timeslots.len() {
                return Err(ScheduleError::Internal(format!(
                    "base schedule covers {} slots, expected {}",
                    base.slot_count(),
                    timeslots.len()
                )));
            }
            for (slot, session) in base.iter() {
                let session = sessions.get_mut(session).ok_or_else(|| {
                    ScheduleError::Internal(format!("base schedule names session {session}"))
                })?;
                session.is_fixed = true;
                timeslots[slot].is_fixed = true;
            }
        }

        let assignment = Assignment::with_slot_count(timeslots.len());
        Ok(Self {
            timeslots,
            sessions,
            penalties,
            assignment,
            base,
            fixed: FixedCosts::default(),
            best: None,
            cache: OverlapCostCache::default(),
        })
    }

    pub fn timeslots(&self) -> &[TimeSlot] {
        &self.timeslots
    }

    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    pub fn timeslot(&self, index: usize) -> &TimeSlot {
        &self.timeslots[index]
    }

    pub fn session(&self, index: usize) -> &Session {
        &self.sessions[index]
    }

    /// Mutable access to a session. Flushes the overlap cache.
    pub fn session_mut(&mut self, index: usize) -> &mut Session {
        self.cache.invalidate();
        &mut self.sessions[index]
    }

    pub fn penalties(&self) -> &PenaltyTable {
        &self.penalties
    }

    /// The movable mapping.
    pub fn assignment(&self) -> &Assignment {
        &self.assignment
    }

    pub fn base_schedule(&self) -> Option<&Assignment> {
        self.base.as_ref()
    }

    pub fn fixed_costs(&self) -> &FixedCosts {
        &self.fixed
    }

    pub fn best(&self) -> Option<&BestSchedule> {
        self.best.as_ref()
    }

    pub fn cache(&self) -> &OverlapCostCache {
        &self.cache
    }

    /// Sessions not pinned by the base schedule.
    pub fn movable_sessions(&self) -> impl Iterator<Item = &Session> {
        self.sessions.iter().filter(|s| !s.is_fixed)
    }

    /// Slots not pinned by the base schedule.
    pub fn movable_timeslots(&self) -> impl Iterator<Item = &TimeSlot> {
        self.timeslots.iter().filter(|t| !t.is_fixed)
    }

    pub fn movable_session_indices(&self) -> Vec<usize> {
        self.movable_sessions().map(|s| s.index).collect()
    }

    pub fn movable_slot_indices(&self) -> Vec<usize> {
        self.movable_timeslots().map(|t| t.index).collect()
    }

    /// Movable sessions with no slot yet.
    pub fn unplaced_sessions(&self) -> Vec<usize> {
        self.movable_sessions()
            .filter(|s| !self.assignment.contains_session(s.index))
            .map(|s| s.index)
            .collect()
    }

    /// Places a movable session in a free movable slot.
    pub fn place(&mut self, slot: usize, session: usize) -> Result<()> {
        if self.timeslots[slot].is_fixed || self.sessions[session].is_fixed {
            return Err(ScheduleError::Internal(format!(
                "cannot place session {} in slot {}: fixed",
                self.sessions[session].id, self.timeslots[slot].id
            )));
        }
        if let Some(occupant) = self.assignment.get(slot) {
            return Err(ScheduleError::Internal(format!(
                "slot {} already holds session {}",
                self.timeslots[slot].id, self.sessions[occupant].id
            )));
        }
        if self.assignment.contains_session(session) {
            return Err(ScheduleError::Internal(format!(
                "session {} is already placed",
                self.sessions[session].id
            )));
        }
        self.assignment.place(slot, session);
        Ok(())
    }

    /// Replaces the movable mapping, returning the previous one.
    pub fn replace_assignment(&mut self, assignment: Assignment) -> Assignment {
        std::mem::replace(&mut self.assignment, assignment)
    }

    /// Cost of `candidate`, or of the live mapping when `None`, with the
    /// base schedule laid over it.
    ///
    /// Evaluating the live mapping records each session's `last_cost`.
    pub fn calculate_dynamic_cost(&mut self, candidate: Option<&Assignment>) -> CostReport {
        let target = candidate.unwrap_or(&self.assignment);
        let merged = match &self.base {
            Some(base) => Cow::Owned(target.overlay(base)),
            None => Cow::Borrowed(target),
        };
        let model = CostModel::new(&self.timeslots, &self.sessions, &self.penalties);
        let (report, per_session) = model.evaluate(&merged, false, &mut self.cache);

        if candidate.is_none() {
            for (session, cost) in per_session {
                self.sessions[session].last_cost = Some(cost);
            }
        }
        report
    }

    /// Cost of the base schedule alone, fixed sessions included.
    pub fn calculate_base_cost(&mut self) -> CostReport {
        let Some(base) = &self.base else {
            return CostReport::new();
        };
        let model = CostModel::new(&self.timeslots, &self.sessions, &self.penalties);
        model.evaluate(base, true, &mut self.cache).0
    }

    /// Stores the base schedule's own cost as a fixed contribution.
    pub fn capture_base_cost(&mut self) {
        self.fixed.base = self.calculate_base_cost();
        debug!(
            event = "base_cost",
            cost = self.fixed.base.cost.value(),
            violations = self.fixed.base.violations.len(),
        );
    }

    /// Records a capacity trim and charges the trim penalty for it.
    pub fn record_trim(&mut self, violation: String) {
        let cost = self.penalties.business(BusinessConstraint::SessionRequiresTrim);
        self.fixed.capacity.push(violation, cost);
    }

    /// Dynamic cost plus fixed costs, with every violation message.
    pub fn total_schedule_cost(&mut self) -> CostReport {
        let mut report = self.calculate_dynamic_cost(None);
        report.extend_from(&self.fixed.base);
        report.extend_from(&self.fixed.capacity);
        report
    }

    /// Whether the sessions in slots `a` and `b` fit each other's slot.
    ///
    /// Fixed slots never take part in a switch.
    pub fn switch_is_feasible(&self, a: usize, b: usize) -> bool {
        if self.timeslots[a].is_fixed || self.timeslots[b].is_fixed {
            return false;
        }
        let fits = |session: Option<usize>, slot: usize| {
            session.map_or(true, |s| self.sessions[s].fits_in(&self.timeslots[slot]))
        };
        fits(self.assignment.get(a), b) && fits(self.assignment.get(b), a)
    }

    /// Dynamic cost after switching the contents of slots `a` and `b`.
    /// Infinite when the switch is infeasible.
    pub fn cost_for_switch(&mut self, a: usize, b: usize) -> Cost {
        if !self.switch_is_feasible(a, b) {
            return Cost::INFINITE;
        }
        let mut proposed = self.assignment.clone();
        proposed.swap(a, b);
        self.calculate_dynamic_cost(Some(&proposed)).cost
    }

    /// Exchanges the contents of slots `a` and `b`, either of which may be
    /// empty.
    pub fn switch_sessions(&mut self, a: usize, b: usize) {
        trace!(
            event = "switch",
            from = %self.timeslots[a].id,
            to = %self.timeslots[b].id,
        );
        self.assignment.swap(a, b);
    }

    /// Snapshots the live mapping if `cost` strictly improves on the best.
    pub fn offer_best(&mut self, cost: Cost) -> bool {
        if self.best.as_ref().is_some_and(|best| cost >= best.cost) {
            return false;
        }
        self.best = Some(BestSchedule {
            cost,
            assignment: self.assignment.clone(),
        });
        true
    }

    pub fn set_best(&mut self, best: BestSchedule) {
        self.best = Some(best);
    }

    /// Reinstates the best snapshot, if any.
    pub fn restore_best(&mut self) -> bool {
        match &self.best {
            Some(best) => {
                self.assignment = best.assignment.clone();
                true
            }
            None => false,
        }
    }

    /// Flushes the overlap cache.
    pub fn invalidate_cache(&mut self) {
        self.cache.invalidate();
    }
}
