//! Exploring agent: abilities, decision history, and transient ability state.

use std::collections::BTreeSet;

use maze_explorer_core::{
    Action, Capabilities, CapabilityError, DecisionRecord, Outcome, Position, State,
};

/// Number of cells the omni-vision sweep reaches in each direction.
pub const OMNI_VISION_DURATION: u32 = 3;

/// Turns that must pass after a sweep before omni-vision can fire again.
pub const OMNI_VISION_COOLDOWN: u32 = 5;

/// Activation state of the omni-vision ability.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OmniVision {
    active: bool,
    cooldown: u32,
}

impl OmniVision {
    /// Whether the next sense performs a full sweep.
    #[must_use]
    pub const fn active(&self) -> bool {
        self.active
    }

    /// Turns left before the ability can be activated again.
    #[must_use]
    pub const fn cooldown(&self) -> u32 {
        self.cooldown
    }
}

/// Named explorer carrying a fixed capability set and an episode history.
#[derive(Clone, Debug)]
pub struct Agent {
    name: String,
    capabilities: Capabilities,
    history: Vec<DecisionRecord>,
    visited: BTreeSet<Position>,
    decision_points: BTreeSet<Position>,
    omni_vision: OmniVision,
}

impl Agent {
    /// Creates an agent after validating its capability set.
    pub fn new<T>(name: T, capabilities: Capabilities) -> Result<Self, CapabilityError>
    where
        T: Into<String>,
    {
        Ok(Self {
            name: name.into(),
            capabilities: capabilities.validate()?,
            history: Vec::new(),
            visited: BTreeSet::new(),
            decision_points: BTreeSet::new(),
            omni_vision: OmniVision::default(),
        })
    }

    /// Display name of the agent.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Capability set fixed at construction.
    #[must_use]
    pub const fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    /// Decision records in the order they were appended.
    #[must_use]
    pub fn history(&self) -> &[DecisionRecord] {
        &self.history
    }

    /// Positions from which the agent has acted.
    #[must_use]
    pub const fn visited(&self) -> &BTreeSet<Position> {
        &self.visited
    }

    /// Visited positions where more than one navigation action was permitted.
    #[must_use]
    pub const fn decision_points(&self) -> &BTreeSet<Position> {
        &self.decision_points
    }

    /// Current omni-vision state.
    #[must_use]
    pub const fn omni_vision(&self) -> OmniVision {
        self.omni_vision
    }

    /// Capability gate consulted by the engine before mutating state.
    ///
    /// Only turns are gated; every other action is always permitted here.
    #[must_use]
    pub const fn can_perform(&self, action: Action) -> bool {
        match action {
            Action::TurnLeft => self.capabilities.can_turn_left,
            Action::TurnRight => self.capabilities.can_turn_right,
            Action::Advance | Action::Sense | Action::ActivateOmniVision => true,
        }
    }

    /// Appends a decision and updates the visited and decision-point sets.
    pub fn record_decision(&mut self, state: State, action: Action, outcome: Outcome) {
        self.history
            .push(DecisionRecord::new(state, action, outcome));
        let _ = self.visited.insert(state.position);

        let permitted = Action::NAVIGATION
            .into_iter()
            .filter(|candidate| self.can_perform(*candidate))
            .count();
        if permitted > 1 {
            let _ = self.decision_points.insert(state.position);
        }
    }

    /// Whether an activation request would currently take effect.
    #[must_use]
    pub const fn omni_vision_ready(&self) -> bool {
        self.capabilities.omni_vision && self.omni_vision.cooldown == 0 && !self.omni_vision.active
    }

    /// Arms omni-vision, returning `false` when the request has no effect.
    pub fn try_activate_omni_vision(&mut self) -> bool {
        if !self.omni_vision_ready() {
            return false;
        }
        self.omni_vision.active = true;
        true
    }

    /// Ends an omni-vision sweep and starts the cooldown.
    pub(crate) fn finish_omni_vision_sweep(&mut self) {
        self.omni_vision.active = false;
        self.omni_vision.cooldown = OMNI_VISION_COOLDOWN;
    }

    /// Advances the cooldown by one simulation turn, never below zero.
    pub fn tick_cooldown(&mut self) -> u32 {
        self.omni_vision.cooldown = self.omni_vision.cooldown.saturating_sub(1);
        self.omni_vision.cooldown
    }

    /// Clears episodic state while keeping the capability set.
    pub fn reset_episode(&mut self) {
        self.history.clear();
        self.visited.clear();
        self.decision_points.clear();
        self.omni_vision = OmniVision::default();
    }
}
