//! Console presentation: rendering turn results and reading Ben's input.
//!
//! The engine never touches stdin or stdout; this module is the whole
//! presentation layer of the console runner. One line of input is read
//! per turn and mapped onto a [`HumanIntent`], and after each applied
//! turn the report and a world snapshot are printed.

use std::io::{BufRead, Write};

use coplay_types::{ActionIntent, GridAction, HumanIntent, SceneView, TurnReport, WorldSnapshot};

use crate::config::Variant;
use crate::error::RunnerError;

/// Prompt for and parse one line of input from Ben.
///
/// Returns `None` when Ben passes (empty line), which steps the engine
/// without a human action.
///
/// # Errors
///
/// Returns [`RunnerError::Io`] if stdin or stdout fail.
pub fn read_intent(variant: Variant) -> Result<Option<HumanIntent>, RunnerError> {
    let mut stdout = std::io::stdout();
    write!(stdout, "> ")?;
    stdout.flush()?;

    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(parse_intent(variant, line.trim()))
}

/// Map one input line onto a human intent.
///
/// Grid sessions: `w`/`a`/`s`/`d` move, `e` interacts, `q` quits, an
/// empty line passes, anything else becomes a hint for Ava. Lifesim
/// sessions have no Ben on the map, so everything except `q` and the
/// empty line is a hint.
pub fn parse_intent(variant: Variant, line: &str) -> Option<HumanIntent> {
    if line.is_empty() {
        return None;
    }
    if line == "q" {
        return Some(HumanIntent::Quit);
    }
    if variant == Variant::Grid {
        let action = match line {
            "w" => Some(GridAction::MoveUp),
            "s" => Some(GridAction::MoveDown),
            "a" => Some(GridAction::MoveLeft),
            "d" => Some(GridAction::MoveRight),
            "e" => Some(GridAction::Interact),
            _ => None,
        };
        if let Some(action) = action {
            return Some(HumanIntent::Act(ActionIntent::Grid(action)));
        }
    }
    Some(HumanIntent::Hint(line.to_owned()))
}

/// Print one applied turn and the resulting world state.
pub fn render(report: &TurnReport, snapshot: &WorldSnapshot) {
    println!("--- Turn {} ---", report.turn);
    if !report.thoughts.is_empty() {
        println!("Ava thinks: {}", report.thoughts);
    }
    if !report.speech.is_empty() {
        println!("Ava says: \"{}\"", report.speech);
    }
    if !report.perceptions.is_empty() {
        println!("Ava perceives: {}", report.perceptions);
    }
    if let Some(human_reaction) = &report.human_reaction {
        println!("Ben: {human_reaction}");
    }
    println!("World: {}", report.reaction);
    for effect in &report.patch_effects {
        println!("  * {effect}");
    }
    if !report.design_feedback.is_empty() {
        println!("Design feedback: {}", report.design_feedback);
    }

    match &snapshot.scene {
        SceneView::Grid(view) => {
            print!(
                "Grid {}x{}, Ava at ({}, {})",
                view.width, view.height, view.agent.0, view.agent.1
            );
            if let Some((x, y)) = view.human {
                print!(", Ben at ({x}, {y})");
            }
            println!();
        }
        SceneView::Graph {
            location,
            items_here,
            exits_here,
        } => {
            print!("In {location}");
            if !items_here.is_empty() {
                print!(". Items: {}", items_here.join(", "));
            }
            if !exits_here.is_empty() {
                print!(". Exits: {}", exits_here.join(", "));
            }
            println!();
        }
    }
    if !snapshot.inventory.is_empty() {
        println!("Inventory: {}", snapshot.inventory.join(", "));
    }
    if !snapshot.notes.is_empty() {
        println!("Notes: {}", snapshot.notes);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_keys_map_to_actions() {
        assert_eq!(
            parse_intent(Variant::Grid, "w"),
            Some(HumanIntent::Act(ActionIntent::Grid(GridAction::MoveUp)))
        );
        assert_eq!(
            parse_intent(Variant::Grid, "e"),
            Some(HumanIntent::Act(ActionIntent::Grid(GridAction::Interact)))
        );
    }

    #[test]
    fn quit_and_pass_work_in_both_variants() {
        for variant in [Variant::Grid, Variant::Lifesim] {
            assert_eq!(parse_intent(variant, "q"), Some(HumanIntent::Quit));
            assert_eq!(parse_intent(variant, ""), None);
        }
    }

    #[test]
    fn free_text_becomes_a_hint() {
        assert_eq!(
            parse_intent(Variant::Lifesim, "try the door"),
            Some(HumanIntent::Hint("try the door".to_owned()))
        );
        // Movement keys are just text when there is no grid.
        assert_eq!(
            parse_intent(Variant::Lifesim, "w"),
            Some(HumanIntent::Hint("w".to_owned()))
        );
    }
}
