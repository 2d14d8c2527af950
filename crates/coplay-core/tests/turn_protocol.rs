//! End-to-end turn protocol tests over a scripted model client.
//!
//! The script plays the model: each entry is one raw "response",
//! consumed in order. Transport failure is simulated by exhausting
//! the script.

use std::collections::VecDeque;

use coplay_core::{ChatClient, ChatError, EngineConfig, EngineError, TurnEngine};
use coplay_types::{ActionIntent, ChatMessage, GridAction, Role};
use coplay_world::{Actor, MemoryCategory, starting};

struct Script {
    responses: VecDeque<String>,
}

impl Script {
    fn of(lines: &[&str]) -> Self {
        Self {
            responses: lines.iter().map(|l| (*l).to_owned()).collect(),
        }
    }
}

impl ChatClient for Script {
    async fn complete(&mut self, _messages: &[ChatMessage]) -> Result<String, ChatError> {
        self.responses
            .pop_front()
            .ok_or_else(|| ChatError("script exhausted".to_owned()))
    }
}

fn grid_engine(script: Script) -> TurnEngine<Script> {
    TurnEngine::new(
        script,
        starting::solo_grid(7, 5),
        EngineConfig::grid(),
        "You are Ava.",
    )
}

fn lifesim_engine(script: Script) -> TurnEngine<Script> {
    TurnEngine::new(
        script,
        starting::lifesim_world(),
        EngineConfig::graph(),
        "You are Ava.",
    )
}

#[tokio::test]
async fn prose_wrapped_json_is_accepted() {
    let script = Script::of(&["Sure! Here is my turn: {\"action\": \"take the key\"} Done."]);
    let mut engine = lifesim_engine(script);

    let report = engine.step(None).await;
    assert!(report.is_ok());
    let report = report.unwrap_or_default();
    assert_eq!(report.turn, 1);
    assert_eq!(report.reaction, "Ava takes Key.");
    assert_eq!(engine.world().inventory(Actor::Agent), ["Key"]);
}

#[tokio::test]
async fn omitted_fields_take_their_defaults() {
    let script = Script::of(&["{}"]);
    let mut engine = grid_engine(script);

    let report = engine.step(None).await;
    assert!(report.is_ok());
    // Absent action defaults to wait; the agent starts centered on 7x5.
    assert_eq!(report.unwrap_or_default().reaction, "Ava wait -> (3, 2)");
}

#[tokio::test]
async fn unknown_grid_token_triggers_corrective_retry() {
    let script = Script::of(&["{\"action\": \"fly\"}", "{\"action\": \"move_left\"}"]);
    let mut engine = grid_engine(script);

    let report = engine.step(None).await;
    assert!(report.is_ok());
    let report = report.unwrap_or_default();
    // Still one turn, completed by the second response.
    assert_eq!(report.turn, 1);
    assert_eq!(report.reaction, "Ava move_left -> (2, 2)");

    // Both raw responses are in the history, verbatim, plus a corrective.
    let messages = engine.history().messages();
    let assistants = messages.iter().filter(|m| m.role == Role::Assistant).count();
    assert_eq!(assistants, 2);
    assert!(
        messages
            .iter()
            .any(|m| m.role == Role::User && m.content.starts_with("That response was not valid"))
    );
}

#[tokio::test]
async fn malformed_output_leaves_the_world_bit_identical() {
    let script = Script::of(&["not even close", "{\"action\": \"fly\", \"oops\": 1}"]);
    let mut engine = TurnEngine::new(
        script,
        starting::solo_grid(7, 5),
        EngineConfig::grid().with_retry_cap(1),
        "You are Ava.",
    );

    let before = engine.world().clone();
    let result = engine.step(None).await;
    assert_eq!(
        result.err(),
        Some(EngineError::RetryBudgetExhausted { attempts: 2 })
    );
    // Both rejections together must not have touched the world at all.
    assert_eq!(engine.world(), &before);
}

#[tokio::test]
async fn feedback_summarizes_reaction_and_new_state() {
    let script = Script::of(&["{\"action\": \"take the key\"}"]);
    let mut engine = lifesim_engine(script);

    assert!(engine.step(None).await.is_ok());
    // The post-apply feedback message carries the reaction and a
    // summary of the state after the mutation landed.
    let feedback = engine
        .history()
        .messages()
        .last()
        .map(|m| m.content.clone())
        .unwrap_or_default();
    assert!(feedback.contains("World reaction: Ava takes Key."));
    assert!(feedback.contains("New state:"));
    assert!(feedback.contains("Inventory: Key."));
}

#[tokio::test]
async fn transport_failure_ends_the_session_but_keeps_state() {
    let script = Script::of(&["{\"action\": \"take the key\"}"]);
    let mut engine = lifesim_engine(script);

    assert!(engine.step(None).await.is_ok());

    // The script is exhausted; the next completion fails.
    let result = engine.step(None).await;
    assert!(matches!(result, Err(EngineError::Transport(_))));
    assert!(engine.is_ended());
    // Mutations applied before the failure stay applied.
    assert_eq!(engine.world().inventory(Actor::Agent), ["Key"]);

    assert_eq!(
        engine.step(None).await.err(),
        Some(EngineError::SessionEnded)
    );
}

#[tokio::test]
async fn retry_cap_is_recoverable() {
    let script = Script::of(&["garbage", "also garbage", "{\"action\": \"look around\"}"]);
    let mut engine = TurnEngine::new(
        script,
        starting::lifesim_world(),
        EngineConfig::graph().with_retry_cap(1),
        "You are Ava.",
    );

    let result = engine.step(None).await;
    assert_eq!(
        result.err(),
        Some(EngineError::RetryBudgetExhausted { attempts: 2 })
    );
    assert!(!engine.is_ended());

    // The session survives; the next step succeeds normally.
    let report = engine.step(None).await;
    assert!(report.is_ok());
    assert_eq!(report.unwrap_or_default().reaction, "You see Key.");
}

#[tokio::test]
async fn quit_preserves_applied_mutations() {
    let script = Script::of(&["{\"action\": \"take the key\"}"]);
    let mut engine = lifesim_engine(script);

    assert!(engine.step(None).await.is_ok());
    engine.quit();
    assert!(engine.is_ended());
    assert_eq!(
        engine.step(None).await.err(),
        Some(EngineError::SessionEnded)
    );
    assert_eq!(engine.world().inventory(Actor::Agent), ["Key"]);
}

#[tokio::test]
async fn turn_budget_ends_the_session() {
    let script = Script::of(&["{}", "{}"]);
    let mut engine = TurnEngine::new(
        script,
        starting::lifesim_world(),
        EngineConfig::graph().with_max_turns(1),
        "You are Ava.",
    );

    assert!(engine.step(None).await.is_ok());
    assert!(engine.is_ended());
    assert_eq!(
        engine.step(None).await.err(),
        Some(EngineError::SessionEnded)
    );
}

#[tokio::test]
async fn key_unlocks_the_garden() {
    let script = Script::of(&[
        "{\"action\": \"take the key\"}",
        "{\"action\": \"go north\"}",
        "{\"action\": \"open the door\"}",
        "{\"action\": \"go east\"}",
        "{\"action\": \"take the flower\"}",
    ]);
    let mut engine = lifesim_engine(script);

    for _ in 0..5 {
        let report = engine.step(None).await;
        assert!(report.is_ok());
    }
    assert_eq!(engine.world().location(Actor::Agent), Some("Garden"));
    assert_eq!(engine.world().inventory(Actor::Agent), ["Key", "Flower"]);
}

#[tokio::test]
async fn patch_self_update_and_memory_all_apply() {
    let script = Script::of(&[
        "{\"action\": \"look around\", \"self_update\": \"likes gardens\", \
         \"experience\": \"saw a key\", \"world_patch\": {\
         \"open_exit\": {\"from\": \"Room\", \"dir\": \"down\", \"to\": \"Cellar\"}, \
         \"set_goal\": {\"text\": \"Find the flower\"}}}",
    ]);
    let mut engine = lifesim_engine(script);

    let report = engine.step(None).await;
    assert!(report.is_ok());
    let report = report.unwrap_or_default();
    assert!(report.patch_effects.iter().any(|e| e.contains("Cellar")));
    assert!(
        report
            .patch_effects
            .iter()
            .any(|e| e.contains("Find the flower"))
    );

    let world = engine.world();
    assert!(world.identity().contains("likes gardens"));
    assert!(world.notes().contains("Find the flower"));
    assert_eq!(
        world.memory().entries(MemoryCategory::Experience),
        ["saw a key"]
    );
    assert!(
        world
            .place("Room")
            .is_some_and(|p| p.exits.get("down").is_some_and(|to| to == "Cellar"))
    );
}

#[tokio::test]
async fn human_acts_first_and_appears_in_the_prompt() {
    let script = Script::of(&["{}"]);
    let mut engine = TurnEngine::new(
        script,
        starting::coplay_grid(7, 5),
        EngineConfig::grid(),
        "You are Ava.",
    );

    let report = engine
        .step(Some(ActionIntent::Grid(GridAction::MoveRight)))
        .await;
    assert!(report.is_ok());
    assert_eq!(
        report.unwrap_or_default().human_reaction.as_deref(),
        Some("Ben move_right -> (1, 0)")
    );
    // The outgoing state prompt carried the human's round.
    assert!(
        engine
            .history()
            .messages()
            .iter()
            .any(|m| m.role == Role::User && m.content.contains("Ben's action"))
    );
}

#[tokio::test]
async fn hints_land_in_the_history() {
    let script = Script::of(&[]);
    let mut engine = lifesim_engine(script);
    engine.hint("try the door to the east");
    assert_eq!(
        engine.history().messages().last().map(|m| m.content.as_str()),
        Some("Hint from Ben: try the door to the east")
    );
}
