//! End-to-end scenarios across whole games: quest arithmetic, vote
//! escalation, the lady sub-game, and both assassination endings.

use avalon_engine::{Game, GameError, GamePhase, GameRng, Role};

fn five_player_game(seed: u64) -> Game {
    let mut game = Game::new("flow-test").unwrap();
    for name in ["a", "b", "c", "d", "e"] {
        game.add_participant(name).unwrap();
    }
    game.play(&mut GameRng::new(seed)).unwrap();
    game.proceed_to_game().unwrap();
    game
}

fn roster(game: &Game) -> Vec<String> {
    game.participants()
        .iter()
        .map(|p| p.identity().to_owned())
        .collect()
}

/// King proposes the first `team_size` roster members and confirms.
fn propose_first_members(game: &mut Game) {
    let size = game.current_round().unwrap().team_size;
    let king = game.king().unwrap().to_owned();
    for id in roster(game).into_iter().take(size) {
        game.select_for_team(&king, &id).unwrap();
    }
    game.confirm_team(&king).unwrap();
}

/// Everyone but the auto-approving king votes approve; resolves the ballot.
fn approve_team(game: &mut Game) {
    let king = game.king().unwrap().to_owned();
    for id in roster(game) {
        if id != king {
            game.vote(&id, true).unwrap();
        }
    }
    assert_eq!(game.resolve_vote().unwrap(), Some(true));
    assert_eq!(game.phase(), GamePhase::Quest);
}

/// Runs one full quest round where every team member casts `succeed`.
fn run_round(game: &mut Game, succeed: bool) -> (bool, usize) {
    propose_first_members(game);
    approve_team(game);
    let team: Vec<String> = game.current_team().to_vec();
    for id in &team {
        game.quest_action(id, succeed).unwrap();
    }
    game.resolve_quest().unwrap().unwrap()
}

fn pass_lady_if_needed(game: &mut Game) {
    if game.phase() == GamePhase::Lady {
        let lady = game.lady().unwrap().to_owned();
        let target = game.next_lady_candidates()[0].identity().to_owned();
        game.set_next_lady(&lady, &target, false).unwrap();
        assert_eq!(game.phase(), GamePhase::TeamBuilding);
    }
}

#[test]
fn first_round_quest_fails_on_single_fail_vote() {
    let mut game = five_player_game(1);
    // Round 1 for five players: team of two, one fail vote fails the quest.
    propose_first_members(&mut game);
    approve_team(&mut game);

    let team: Vec<String> = game.current_team().to_vec();
    game.quest_action(&team[0], false).unwrap();
    assert_eq!(game.resolve_quest().unwrap(), None, "one action outstanding");

    game.quest_action(&team[1], true).unwrap();
    let (succeeded, fails) = game.resolve_quest().unwrap().unwrap();
    assert!(!succeeded);
    assert_eq!(fails, 1);
    assert_eq!(game.round_result(), [false]);
}

#[test]
fn good_victory_routes_through_guess_merlin() {
    let mut game = five_player_game(7);

    assert_eq!(run_round(&mut game, true), (true, 0));
    assert_eq!(game.phase(), GamePhase::TeamBuilding);

    assert_eq!(run_round(&mut game, true), (true, 0));
    // Two recorded rounds reach the lady step.
    assert_eq!(game.phase(), GamePhase::Lady);
    pass_lady_if_needed(&mut game);

    assert_eq!(run_round(&mut game, true), (true, 0));
    assert_eq!(game.phase(), GamePhase::GuessMerlin);
    assert_eq!(game.game_result(), None, "good must survive the assassin");

    let assassin = game.assassin().unwrap().identity().to_owned();
    let servant = game
        .participants()
        .iter()
        .find(|p| p.role == Some(Role::Servant))
        .unwrap()
        .identity()
        .to_owned();

    // Dry run validates without finishing the game.
    let target = game.guess_merlin(&assassin, &servant, true).unwrap();
    assert_eq!(target.identity(), servant);
    assert_eq!(game.phase(), GamePhase::GuessMerlin);

    // Wrong guess: servants win.
    game.guess_merlin(&assassin, &servant, false).unwrap();
    assert_eq!(game.phase(), GamePhase::Finished);
    assert_eq!(game.game_result(), Some(true));
}

#[test]
fn guessing_the_real_merlin_reverses_the_verdict() {
    let mut game = five_player_game(7);
    for _ in 0..3 {
        run_round(&mut game, true);
        pass_lady_if_needed(&mut game);
    }
    assert_eq!(game.phase(), GamePhase::GuessMerlin);

    let assassin = game.assassin().unwrap().identity().to_owned();
    let merlin = game
        .participants()
        .iter()
        .find(|p| p.role == Some(Role::Merlin))
        .unwrap()
        .identity()
        .to_owned();

    game.guess_merlin(&assassin, &merlin, false).unwrap();
    assert_eq!(game.game_result(), Some(false));
}

#[test]
fn guess_merlin_guard_rails() {
    let mut game = five_player_game(11);
    for _ in 0..3 {
        run_round(&mut game, true);
        pass_lady_if_needed(&mut game);
    }
    assert_eq!(game.phase(), GamePhase::GuessMerlin);

    let assassin = game.assassin().unwrap().identity().to_owned();
    let mordred = game
        .participants()
        .iter()
        .find(|p| p.role == Some(Role::Mordred))
        .unwrap()
        .identity()
        .to_owned();
    let servant = game
        .participants()
        .iter()
        .find(|p| p.role == Some(Role::Servant))
        .unwrap()
        .identity()
        .to_owned();

    // Only the assassin may guess.
    assert_eq!(
        game.guess_merlin(&servant, &servant, false),
        Err(GameError::OnlyAssassinCanDo)
    );
    // Evil-aligned targets are rejected.
    assert_eq!(
        game.guess_merlin(&assassin, &mordred, false),
        Err(GameError::EvilMerlinGuess)
    );
    assert_eq!(game.phase(), GamePhase::GuessMerlin);
}

#[test]
fn three_failed_quests_finish_for_evil() {
    let mut game = five_player_game(3);

    assert_eq!(run_round(&mut game, false), (false, 2));
    assert_eq!(game.phase(), GamePhase::TeamBuilding);

    run_round(&mut game, false);
    assert_eq!(game.phase(), GamePhase::Lady);
    pass_lady_if_needed(&mut game);

    run_round(&mut game, false);
    assert_eq!(game.phase(), GamePhase::Finished);
    assert_eq!(game.game_result(), Some(false));
    assert_eq!(game.round_result(), [false, false, false]);
}

#[test]
fn full_rejection_cycle_scores_a_round_for_evil() {
    let mut game = five_player_game(5);
    let first_king = game.king().unwrap().to_owned();

    for rejection in 1..=5usize {
        propose_first_members(&mut game);
        // Everyone but the auto-approving king rejects: 1 vs 4.
        let king = game.king().unwrap().to_owned();
        for id in roster(&game) {
            if id != king {
                game.vote(&id, false).unwrap();
            }
        }
        assert_eq!(game.resolve_vote().unwrap(), Some(false));
        assert_eq!(game.phase(), GamePhase::TeamBuilding);

        if rejection < 5 {
            assert_eq!(game.failed_voting_count(), rejection);
            assert!(game.round_result().is_empty());
        } else {
            // Fifth consecutive rejection: recorded as an evil round,
            // counter reset.
            assert_eq!(game.failed_voting_count(), 0);
            assert_eq!(game.round_result(), [false]);
        }
    }

    // Five rotations bring the crown back around.
    assert_eq!(game.king(), Some(first_king.as_str()));
}

#[test]
fn approval_resets_the_rejection_counter() {
    let mut game = five_player_game(9);

    // One rejection first.
    propose_first_members(&mut game);
    let king = game.king().unwrap().to_owned();
    for id in roster(&game) {
        if id != king {
            game.vote(&id, false).unwrap();
        }
    }
    assert_eq!(game.resolve_vote().unwrap(), Some(false));
    assert_eq!(game.failed_voting_count(), 1);

    // Then an approval.
    propose_first_members(&mut game);
    approve_team(&mut game);
    assert_eq!(game.failed_voting_count(), 0);
}

#[test]
fn king_advances_cyclically_between_rounds() {
    let mut game = five_player_game(13);
    let ids = roster(&game);

    let king_before = game.king().unwrap().to_owned();
    run_round(&mut game, true);
    assert_eq!(game.phase(), GamePhase::TeamBuilding);

    let before = ids.iter().position(|id| *id == king_before).unwrap();
    let expected = &ids[(before + 1) % ids.len()];
    assert_eq!(game.king(), Some(expected.as_str()));
}

#[test]
fn lady_token_moves_and_history_is_kept() {
    let mut game = five_player_game(17);
    run_round(&mut game, true);
    run_round(&mut game, false);
    assert_eq!(game.phase(), GamePhase::Lady);

    let first_lady = game.lady().unwrap().to_owned();
    let candidates = game.next_lady_candidates();
    assert_eq!(candidates.len(), 4, "everyone but the holder is eligible");

    let target = candidates[0].identity().to_owned();

    // Dry run changes nothing.
    game.set_next_lady(&first_lady, &target, true).unwrap();
    assert_eq!(game.phase(), GamePhase::Lady);
    assert_eq!(game.lady(), Some(first_lady.as_str()));

    // Only the lady can pass the token.
    let imposter = roster(&game)
        .into_iter()
        .find(|id| *id != first_lady)
        .unwrap();
    assert_eq!(
        game.set_next_lady(&imposter, &target, false),
        Err(GameError::OnlyLadyCanDo)
    );

    game.set_next_lady(&first_lady, &target, false).unwrap();
    assert_eq!(game.phase(), GamePhase::TeamBuilding);
    assert_eq!(game.lady(), Some(target.as_str()));
    assert_eq!(game.past_ladies(), [first_lady.clone()]);

    // Past holders are no longer eligible.
    assert!(game
        .next_lady_candidates()
        .iter()
        .all(|p| p.identity() != first_lady));

    // Passing back to a past lady is refused.
    let mut replay = game.clone();
    assert_eq!(
        replay.set_next_lady(&target, &first_lady, false),
        Err(GameError::IneligibleLady(first_lady))
    );
}

#[test]
fn seven_player_round_four_needs_two_fails() {
    let mut game = Game::new("seven").unwrap();
    for name in ["a", "b", "c", "d", "e", "f", "g"] {
        game.add_participant(name).unwrap();
    }
    game.play(&mut GameRng::new(23)).unwrap();
    game.proceed_to_game().unwrap();

    // Alternate to reach round 4 without ending the game: S F S.
    run_round(&mut game, true);
    run_round(&mut game, false);
    pass_lady_if_needed(&mut game);
    run_round(&mut game, true);
    pass_lady_if_needed(&mut game);
    assert_eq!(game.round_result(), [true, false, true]);

    // Round 4 for seven players: team of four, threshold two.
    assert_eq!(game.current_round().unwrap().fail_threshold, 2);
    propose_first_members(&mut game);
    approve_team(&mut game);

    let team: Vec<String> = game.current_team().to_vec();
    game.quest_action(&team[0], false).unwrap();
    for id in &team[1..] {
        game.quest_action(id, true).unwrap();
    }
    // A single fail is under the threshold: the quest still succeeds.
    assert_eq!(game.resolve_quest().unwrap(), Some((true, 1)));
    assert_eq!(game.round_result(), [true, false, true, true]);
}
