//! Swarm orchestrator.
//!
//! A [`Swarm`] runs one agent policy across a set of game sessions:
//! it owns the scorecard for the run's whole lifetime, drives each
//! (agent, game) unit to completion or failure in caller order, and
//! converges every terminal path — normal completion, run-level
//! failure, external interrupt — onto a single scorecard-close routine
//! that executes at most once.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{info, Instrument};

use crate::agent::AgentContext;
use crate::api::GameService;
use crate::config::SwarmConfig;
use crate::domain::{
    FrameResponse, GameAction, GameState, GameUnit, Result, RunOutcome, SwarmState, UnitReport,
};
use crate::metrics::METRICS;
use crate::obs;
use crate::recorder::Recorder;
use crate::registry::{AgentKind, AgentRegistry};
use crate::scorecard::{ScorecardClient, ScorecardReport};

/// Orchestrator for one run of `agent_id` across `games`.
pub struct Swarm {
    config: SwarmConfig,
    registry: AgentRegistry,
    service: Arc<dyn GameService>,
    scorecard: ScorecardClient,
    agent_id: String,
    units: Vec<GameUnit>,
    /// The only state shared with the interrupt path: written once on
    /// open, taken exactly once by whichever close path gets there first.
    card_id: Mutex<Option<String>>,
    state: std::sync::Mutex<SwarmState>,
}

impl Swarm {
    /// Build a swarm from a chosen agent identifier and a game list.
    ///
    /// Units execute in the order of `games`; the list is consumed
    /// exactly once per run.
    pub fn new(
        config: SwarmConfig,
        registry: AgentRegistry,
        service: Arc<dyn GameService>,
        agent_id: impl Into<String>,
        games: Vec<String>,
    ) -> Self {
        let agent_id = agent_id.into();
        let units = games
            .into_iter()
            .map(|game_id| GameUnit::new(game_id, agent_id.clone()))
            .collect();
        let scorecard = ScorecardClient::new(Arc::clone(&service));
        Self {
            config,
            registry,
            service,
            scorecard,
            agent_id,
            units,
            card_id: Mutex::new(None),
            state: std::sync::Mutex::new(SwarmState::Created),
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SwarmState {
        *self.state.lock().unwrap()
    }

    /// The scorecard id currently held, if the run is open.
    pub async fn card_id(&self) -> Option<String> {
        self.card_id.lock().await.clone()
    }

    fn set_state(&self, next: SwarmState) {
        *self.state.lock().unwrap() = next;
    }

    /// Transition to `next` unless a terminal state was already reached.
    fn set_state_if_live(&self, next: SwarmState) {
        let mut state = self.state.lock().unwrap();
        if !state.is_terminal() {
            *state = next;
        }
    }

    /// Run the swarm to a terminal state.
    ///
    /// Opens the scorecard (failure here is fatal to the run and the
    /// swarm transitions straight to `Failed`), executes every unit in
    /// caller order with per-unit failure isolation, then closes the
    /// scorecard exactly once and logs the final report.
    pub async fn main(&self) -> Result<Vec<UnitReport>> {
        // Resolve before any remote call: an unknown agent identifier
        // must never open a scorecard.
        if let Err(e) = self.registry.resolve(&self.agent_id) {
            self.set_state(SwarmState::Failed);
            return Err(e);
        }

        let mut tags = vec!["agent".to_string(), self.agent_id.clone()];
        tags.extend(self.config.tags.iter().cloned());

        let card_id = match self.scorecard.open(&tags).await {
            Ok(card_id) => card_id,
            Err(e) => {
                self.set_state(SwarmState::Failed);
                return Err(e);
            }
        };
        obs::emit_scorecard_opened(&card_id, &self.agent_id, &tags);
        self.set_state(SwarmState::ScorecardOpen);
        *self.card_id.lock().await = Some(card_id.clone());

        self.set_state(SwarmState::Executing);
        let reports = self
            .execute_units(&card_id)
            .instrument(obs::run_span(&card_id))
            .await;

        self.set_state_if_live(SwarmState::Completed);
        self.finish().await;
        Ok(reports)
    }

    /// Execute every unit in caller order; one report per unit.
    async fn execute_units(&self, card_id: &str) -> Vec<UnitReport> {
        let mut reports = Vec::with_capacity(self.units.len());
        for unit in &self.units {
            if self.state().is_terminal() {
                // An external cleanup preempted the run; remaining
                // units are abandoned unstarted.
                reports.push(UnitReport {
                    unit: unit.clone(),
                    outcome: RunOutcome::Interrupted,
                    actions_taken: 0,
                    final_score: None,
                });
                continue;
            }
            obs::emit_unit_started(&unit.game_id, &unit.agent_id);
            let report = self.run_unit(unit, card_id).await;
            obs::emit_unit_finished(&unit.game_id, &report.outcome, report.actions_taken);
            match report.outcome {
                RunOutcome::Failed(_) => METRICS.inc_units_failed(),
                _ => METRICS.inc_units_completed(),
            }
            reports.push(report);
        }
        reports
    }

    /// Drive a single unit's decide/observe loop to its outcome.
    ///
    /// All failures inside the unit are converted into its
    /// [`RunOutcome`]; nothing here aborts sibling units.
    async fn run_unit(&self, unit: &GameUnit, card_id: &str) -> UnitReport {
        let outcome = self.drive_unit(unit, card_id).await;
        let (outcome, actions_taken, final_score) = match outcome {
            Ok(done) => done,
            Err((e, actions_taken, final_score)) => {
                (RunOutcome::Failed(e), actions_taken, final_score)
            }
        };
        UnitReport {
            unit: unit.clone(),
            outcome,
            actions_taken,
            final_score,
        }
    }

    #[allow(clippy::type_complexity)]
    async fn drive_unit(
        &self,
        unit: &GameUnit,
        card_id: &str,
    ) -> std::result::Result<(RunOutcome, u32, Option<i64>), (String, u32, Option<i64>)> {
        let ctx = AgentContext {
            game_id: unit.game_id.clone(),
            config: self.config.clone(),
        };
        let descriptor = self
            .registry
            .resolve(&unit.agent_id)
            .map_err(|e| (e.to_string(), 0, None))?;
        let mut agent = descriptor
            .construct(&ctx)
            .map_err(|e| (e.to_string(), 0, None))?;

        // Only live policy runs are recorded; replaying a recording
        // does not re-record itself.
        let mut recorder = if descriptor.kind == AgentKind::Policy {
            Some(
                Recorder::create(&self.config.recordings_dir, &unit.game_id, &unit.agent_id)
                    .map_err(|e| (e.to_string(), 0, None))?,
            )
        } else {
            None
        };

        // The session starts unplayed; the agent's first decision is
        // expected to be a reset.
        let mut latest = FrameResponse {
            game_id: unit.game_id.clone(),
            guid: String::new(),
            frame: serde_json::Value::Null,
            state: GameState::NotPlayed,
            score: 0,
        };
        let mut actions_taken = 0u32;
        let mut final_score = None;

        let outcome = loop {
            if self.state().is_terminal() {
                break RunOutcome::Interrupted;
            }
            if actions_taken >= self.config.max_actions {
                info!(
                    event = "unit.budget_reached",
                    game_id = %unit.game_id,
                    max_actions = self.config.max_actions,
                );
                break RunOutcome::Completed;
            }

            let action = match agent.decide(&latest).await {
                Ok(Some(action)) => action,
                Ok(None) => break RunOutcome::Completed,
                Err(e) => {
                    // AgentDecisionFailure: isolated to this unit
                    self.finalize_recorder(recorder.take());
                    return Err((e.to_string(), actions_taken, final_score));
                }
            };

            if let Some(rec) = recorder.as_mut() {
                // A lost trace entry would make playback non-reproducible
                if let Err(e) = rec.append(&latest, &action) {
                    self.finalize_recorder(recorder.take());
                    return Err((e.to_string(), actions_taken, final_score));
                }
            }

            let next = match &action {
                GameAction::Reset => self.service.reset_game(&unit.game_id, card_id).await,
                other => {
                    self.service
                        .execute_action(&unit.game_id, &latest.guid, other)
                        .await
                }
            };
            match next {
                Ok(frame) => {
                    actions_taken += 1;
                    METRICS.inc_actions();
                    final_score = Some(frame.score);
                    latest = frame;
                }
                Err(e) => {
                    self.finalize_recorder(recorder.take());
                    return Err((e.to_string(), actions_taken, final_score));
                }
            }
        };

        self.finalize_recorder(recorder.take());
        Ok((outcome, actions_taken, final_score))
    }

    /// Publish whatever trace the unit produced, on every exit path.
    fn finalize_recorder(&self, recorder: Option<Recorder>) {
        if let Some(rec) = recorder {
            if rec.is_empty() {
                if let Err(e) = rec.discard() {
                    tracing::warn!(event = "recorder.discard_error", error = %e);
                }
            } else if let Err(e) = rec.finalize() {
                tracing::warn!(event = "recorder.finalize_error", error = %e);
            }
        }
    }

    /// Close the scorecard (at most once) and log the final report.
    async fn finish(&self) -> Option<ScorecardReport> {
        let report = self.scorecard.close_once(&self.card_id).await;
        if let Some(report) = &report {
            info!("--- SCORECARD REPORT ---");
            match serde_json::to_string_pretty(report) {
                Ok(json) => info!("{json}"),
                Err(e) => tracing::warn!(event = "scorecard.render_error", error = %e),
            }
            info!(
                "View your scorecard online: {}",
                report.view_url(&self.config.root_url)
            );
        }
        METRICS.flush();
        report
    }

    /// Unwind the run from an interrupt context.
    ///
    /// Idempotent and safe to call while `main` is still executing:
    /// the in-progress unit is abandoned at its current point, the
    /// scorecard is closed with whatever aggregate the remote service
    /// has, and the report (if this call performed the close) is
    /// returned. Calling after the run already reached a terminal
    /// state is a no-op.
    pub async fn cleanup(&self) -> Option<ScorecardReport> {
        let preempted = {
            let mut state = self.state.lock().unwrap();
            if state.is_terminal() {
                false
            } else {
                *state = SwarmState::Interrupted;
                true
            }
        };
        if preempted {
            obs::emit_interrupt();
        }
        self.finish().await
    }
}
