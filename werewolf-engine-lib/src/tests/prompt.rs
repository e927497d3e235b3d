use werewolf_game_lib::ChoiceSpec;
use werewolf_game_lib::Seat;

use crate::prompt::compose_user_prompt;
use crate::prompt::render_decision_llm;
use crate::prompt::render_decision_menu;
use crate::prompt::render_state;
use crate::prompt::system;
use crate::state::GameState;
use crate::tests::common::standard_players;

/// Layer 1 must stay cacheable: role rules only, nothing about the game in
/// progress.
#[test]
fn system_prompts_carry_no_game_state() {
    let prompts = [
        system::WEREWOLF,
        system::WITCH,
        system::GUARD,
        system::SEER,
        system::NOMINATION,
        system::CAMPAIGN_STAY,
        system::CAMPAIGN_SPEECH,
        system::OPT_OUT,
        system::ELECTION,
        system::DISCUSSION_DIRECTION,
        system::DISCUSSION,
        system::VOTING,
        system::HUNTER_SHOOT,
        system::BADGE_TRANSFER,
        system::LAST_WORDS,
    ];

    for prompt in prompts {
        assert!(!prompt.is_empty());
        for phrase in ["seat 0", "day 1", "Seat ", "Day "] {
            assert!(
                !prompt.contains(phrase),
                "layer-1 prompt leaks state: {prompt}"
            );
        }
    }
}

#[test]
fn state_render_shows_the_snapshot() {
    let mut state = GameState::new(standard_players());
    state.elect_sheriff(Seat(8));
    state.set_day(3);

    let rendered = render_state(&state, Seat(9));

    assert!(rendered.contains("You are seat 9"));
    assert!(rendered.contains("day 3"));
    assert!(rendered.contains("Seat 8 holds the sheriff badge"));
    assert!(rendered.contains("Living seats: 0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11"));
    assert!(!rendered.contains("teammates"));
}

#[test]
fn werewolves_see_their_teammates() {
    let state = GameState::new(standard_players());

    let rendered = render_state(&state, Seat(0));
    assert!(rendered.contains("Your werewolf teammates: seats 1, 2, 3"));

    // Nobody else gets the roster.
    let villager_view = render_state(&state, Seat(8));
    assert!(!villager_view.contains("teammates"));
}

/// Both renderings of a decision present exactly the same choice set.
#[test]
fn menu_and_llm_renderings_agree_on_options() {
    let spec = ChoiceSpec::seats("Who do you vote to banish?", [Seat(1), Seat(4)], true);

    let llm = render_decision_llm(&spec);
    let menu = render_decision_menu(&spec);

    for option in &spec.options {
        assert!(llm.contains(&option.value));
        assert!(menu.contains(&option.display));
    }
    assert!(llm.contains("skip"));
    assert!(menu.contains("Skip / Pass / Abstain"));
    assert!(llm.contains(&spec.prompt));
    assert!(menu.contains(&spec.prompt));
}

#[test]
fn text_decisions_render_without_options() {
    let spec = ChoiceSpec::text("These are your last words. What do you say?");

    let llm = render_decision_llm(&spec);

    assert!(llm.contains("last words"));
    assert!(!llm.contains("Available options"));
}

#[test]
fn user_prompt_layers_compose_in_order() {
    let composed = compose_user_prompt("STATE\n", "HISTORY\n", "DECISION\n");

    let state_at = composed.find("STATE").unwrap();
    let history_at = composed.find("HISTORY").unwrap();
    let decision_at = composed.find("DECISION").unwrap();
    assert!(state_at < history_at && history_at < decision_at);

    // No history section when there is nothing to show.
    let bare = compose_user_prompt("STATE\n", "", "DECISION\n");
    assert!(!bare.contains("seen so far"));
}
