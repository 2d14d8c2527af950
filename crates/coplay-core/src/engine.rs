//! The turn engine: one loop iteration per agent turn.
//!
//! Each step runs the phase cycle awaiting-model, validating, then
//! either applying or retrying. A valid turn applies its effects in a
//! fixed order (action, world patch, self update, memory, feedback)
//! and yields a [`TurnReport`]; an invalid response leaves the world
//! bit-identical, appends a corrective message, and asks the model
//! again. The engine never renders and never polls input; the
//! presentation layer drives it through [`TurnEngine::step`].

use std::fmt::Write as _;

use coplay_types::{ActionIntent, ChatMessage, SceneView, TurnReport, WorldSnapshot};
use coplay_world::resolve::resolve;
use coplay_world::{Actor, MemoryCategory, WorldModel, patch};
use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::error::{ChatError, EngineError};
use crate::history::ConversationHistory;
use crate::validate::{ValidatedTurn, validate};

/// Sent after every rejected response.
const CORRECTIVE_PROMPT: &str = "That response was not valid. Answer again with \
     exactly one JSON object in the agreed schema and nothing else.";

/// A chat-completion backend.
///
/// Implementations receive the entire conversation history on every
/// call and return the raw response text. The engine treats any error
/// as fatal for the session.
pub trait ChatClient {
    /// Request one completion for the given message sequence.
    fn complete(
        &mut self,
        messages: &[ChatMessage],
    ) -> impl Future<Output = Result<String, ChatError>>;
}

/// Where the engine stands in the turn cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnPhase {
    /// A prompt is (or is about to be) in flight to the model.
    AwaitingModel,
    /// A raw response is being validated.
    Validating,
    /// A validated turn's effects are being applied.
    Applying,
    /// The last response was rejected; a corrective prompt was appended.
    Retrying,
    /// Terminal: quit, turn budget exhausted, or transport failure.
    Ended,
}

/// The session-scoped turn engine.
///
/// Owns the world model, the conversation history, and the model
/// client for the lifetime of one session. All state dies with the
/// process; there is no persistence layer.
#[derive(Debug)]
pub struct TurnEngine<C> {
    client: C,
    world: WorldModel,
    history: ConversationHistory,
    config: EngineConfig,
    completed_turns: u32,
    phase: TurnPhase,
}

impl<C: ChatClient> TurnEngine<C> {
    /// Build an engine around a world, a client, and a system instruction.
    pub fn new(
        client: C,
        world: WorldModel,
        config: EngineConfig,
        system_instruction: impl Into<String>,
    ) -> Self {
        Self {
            client,
            world,
            history: ConversationHistory::new(system_instruction),
            config,
            completed_turns: 0,
            phase: TurnPhase::AwaitingModel,
        }
    }

    /// Run one full turn: resolve the human's action (if any), prompt
    /// the model, validate, and apply.
    ///
    /// On a rejected response the world stays untouched, the raw
    /// response and a corrective message land in the history, and the
    /// model is asked again; the loop runs until a valid turn arrives
    /// or the configured retry cap trips.
    ///
    /// # Errors
    ///
    /// [`EngineError::SessionEnded`] if the session is over,
    /// [`EngineError::Transport`] (terminal) if the client fails, and
    /// [`EngineError::RetryBudgetExhausted`] (recoverable) if the cap
    /// trips first.
    pub async fn step(&mut self, human: Option<ActionIntent>) -> Result<TurnReport, EngineError> {
        if self.phase == TurnPhase::Ended {
            return Err(EngineError::SessionEnded);
        }

        // The human acts first; the agent sees the outcome in its prompt.
        let human_round = human.map(|intent| {
            let description = intent.describe().to_owned();
            let reaction = resolve(&mut self.world, Actor::Human, &intent);
            debug!(action = %description, reaction = %reaction, "human action resolved");
            (description, reaction)
        });

        self.history.user(self.state_prompt(human_round.as_ref()));

        let mut rejected: u32 = 0;
        loop {
            self.phase = TurnPhase::AwaitingModel;
            let raw = match self.client.complete(self.history.messages()).await {
                Ok(raw) => raw,
                Err(e) => {
                    warn!(error = %e, "transport failed, ending session");
                    self.phase = TurnPhase::Ended;
                    return Err(EngineError::Transport(e.0));
                }
            };

            self.phase = TurnPhase::Validating;
            // Raw responses are recorded verbatim, valid or not.
            self.history.assistant(&raw);
            match validate(&raw, self.config.mode) {
                Ok(validated) => {
                    self.phase = TurnPhase::Applying;
                    return Ok(self.apply(validated, human_round));
                }
                Err(rejection) => {
                    rejected = rejected.saturating_add(1);
                    warn!(error = %rejection, attempt = rejected, "turn rejected");
                    self.history.user(CORRECTIVE_PROMPT);
                    self.phase = TurnPhase::Retrying;
                    if let Some(cap) = self.config.max_retries {
                        if rejected > cap {
                            self.phase = TurnPhase::AwaitingModel;
                            return Err(EngineError::RetryBudgetExhausted { attempts: rejected });
                        }
                    }
                }
            }
        }
    }

    /// Append a human hint to the conversation before the next turn.
    pub fn hint(&mut self, text: &str) {
        if self.phase != TurnPhase::Ended {
            self.history.hint(text);
        }
    }

    /// End the session. Every mutation already applied stays applied.
    pub fn quit(&mut self) {
        info!(turns = self.completed_turns, "session ended by request");
        self.phase = TurnPhase::Ended;
    }

    /// The world, read-only.
    pub const fn world(&self) -> &WorldModel {
        &self.world
    }

    /// A display snapshot of the current world state.
    pub fn snapshot(&self) -> WorldSnapshot {
        self.world.snapshot()
    }

    /// The conversation so far, read-only.
    pub const fn history(&self) -> &ConversationHistory {
        &self.history
    }

    /// The current phase of the turn cycle.
    pub const fn phase(&self) -> TurnPhase {
        self.phase
    }

    /// True once the session has reached its terminal state.
    pub fn is_ended(&self) -> bool {
        self.phase == TurnPhase::Ended
    }

    /// Completed turns so far.
    pub const fn turns_taken(&self) -> u32 {
        self.completed_turns
    }

    /// Apply a validated turn's effects in their fixed order.
    fn apply(
        &mut self,
        validated: ValidatedTurn,
        human_round: Option<(String, String)>,
    ) -> TurnReport {
        let ValidatedTurn { turn, intent } = validated;

        let reaction = resolve(&mut self.world, Actor::Agent, &intent);
        let patch_effects = turn
            .world_patch
            .as_ref()
            .map(|p| patch::apply(&mut self.world, p))
            .unwrap_or_default();
        if let Some(update) = turn.self_update.as_deref() {
            self.world.append_identity(update);
        }
        for (name, text) in turn.memory_entries() {
            if let Some(category) = MemoryCategory::parse(name) {
                self.world.record_memory(category, text);
            }
        }

        // Feed the outcome back so the model sees its own consequences.
        let mut feedback = format!("World reaction: {reaction}");
        for effect in &patch_effects {
            feedback.push('\n');
            feedback.push_str(effect);
        }
        feedback.push('\n');
        feedback.push_str("New state: ");
        feedback.push_str(&self.scene_summary());
        self.history.user(feedback);

        self.completed_turns = self.completed_turns.saturating_add(1);
        info!(
            turn = self.completed_turns,
            action = intent.describe(),
            reaction = %reaction,
            "turn applied"
        );
        if self.completed_turns >= self.config.max_turns {
            info!(turns = self.completed_turns, "turn budget exhausted");
            self.phase = TurnPhase::Ended;
        } else {
            self.phase = TurnPhase::AwaitingModel;
        }

        TurnReport {
            turn: self.completed_turns,
            thoughts: turn.thoughts,
            speech: turn.speech,
            design_feedback: turn.design_feedback,
            perceptions: turn.perceptions.unwrap_or_default(),
            reaction,
            human_reaction: human_round.map(|(_, r)| r),
            patch_effects,
        }
    }

    /// Compose the outbound state prompt for this turn.
    fn state_prompt(&self, human_round: Option<&(String, String)>) -> String {
        let mut prompt = format!(
            "Turn {}. {}",
            self.completed_turns.saturating_add(1),
            self.scene_summary()
        );
        if let Some((action, reaction)) = human_round {
            let _ = write!(prompt, " Ben's action \"{action}\": {reaction}");
        }
        prompt.push_str(" Respond with exactly one JSON object in the agreed schema.");
        prompt
    }

    /// One-line summary of the current scene, inventory, and notes.
    ///
    /// Shared by the outbound state prompt and the post-apply feedback
    /// message.
    fn scene_summary(&self) -> String {
        let snapshot = self.world.snapshot();
        let mut summary = String::new();
        match &snapshot.scene {
            SceneView::Grid(view) => {
                let _ = write!(
                    summary,
                    "Grid {}x{}. Ava at ({}, {}).",
                    view.width, view.height, view.agent.0, view.agent.1
                );
                if let Some((x, y)) = view.human {
                    let _ = write!(summary, " Ben at ({x}, {y}).");
                }
            }
            SceneView::Graph {
                location,
                items_here,
                exits_here,
            } => {
                let _ = write!(summary, "You are in {location}.");
                if items_here.is_empty() {
                    summary.push_str(" Nothing lies here.");
                } else {
                    let _ = write!(summary, " Items here: {}.", items_here.join(", "));
                }
                if exits_here.is_empty() {
                    summary.push_str(" There are no exits.");
                } else {
                    let _ = write!(summary, " Exits: {}.", exits_here.join(", "));
                }
            }
        }
        if !snapshot.inventory.is_empty() {
            let _ = write!(summary, " Inventory: {}.", snapshot.inventory.join(", "));
        }
        if !snapshot.notes.is_empty() {
            let _ = write!(summary, " Notes: {}.", snapshot.notes);
        }
        summary
    }
}
