use std::sync::Arc;

use matchbox::learner::{LearnerConfig, LearningAgent};
use matchbox::session::{SessionManager, SessionPhase};
use matchbox::tictactoe::{Board, Player};
use matchbox::Error;

fn manager(seed: u64) -> SessionManager {
    let agent = Arc::new(LearningAgent::with_seed(LearnerConfig::default(), seed).unwrap());
    SessionManager::new(agent)
}

#[test]
fn a_full_game_flows_through_the_phase_machine() {
    let manager = manager(42);
    let mut view = manager.create_session(false).unwrap();
    assert_eq!(view.phase, SessionPhase::AwaitingOpponentMove);

    let mut phases = vec![view.phase];
    while view.phase != SessionPhase::Finished {
        view = match view.phase {
            SessionPhase::AwaitingOpponentMove => {
                let pos = view.legal_moves[0];
                manager.apply_opponent_move(&view.id, pos).unwrap()
            }
            SessionPhase::AwaitingAgentMove => manager.agent_move(&view.id).unwrap(),
            SessionPhase::Finished => break,
        };
        phases.push(view.phase);
    }

    assert_eq!(view.phase, SessionPhase::Finished);
    assert!(view.outcome.is_some());
    assert!(view.legal_moves.is_empty());
    assert_eq!(view.current_turn, None);
    // Phases strictly alternate until the game ends.
    for pair in phases.windows(2) {
        assert_ne!(pair[0], pair[1]);
    }

    // The finished game reinforced the agent exactly once.
    assert_eq!(manager.agent().statistics().games_played, 1);
}

#[test]
fn session_views_are_consistent_with_the_move_log() {
    let manager = manager(7);
    let view = manager.create_session(true).unwrap();

    assert_eq!(view.moves.len(), 1);
    let entry = &view.moves[0];
    assert_eq!(entry.player, Player::X);
    assert_eq!(entry.board_after, view.board);

    let board = Board::from_encoding(&view.board).unwrap();
    assert_eq!(board.legal_moves(), view.legal_moves);
}

#[test]
fn invalid_inputs_map_to_distinct_errors() {
    let manager = manager(42);
    let view = manager.create_session(false).unwrap();

    assert!(matches!(
        manager.apply_opponent_move("missing-id", 0),
        Err(Error::SessionNotFound { .. })
    ));
    assert!(matches!(
        manager.apply_opponent_move(&view.id, 9),
        Err(Error::InvalidPosition { position: 9 })
    ));

    manager.apply_opponent_move(&view.id, 4).unwrap();
    // Same cell again, and it is no longer the opponent's turn anyway.
    assert!(matches!(
        manager.apply_opponent_move(&view.id, 4),
        Err(Error::NotYourTurn { .. })
    ));

    manager.agent_move(&view.id).unwrap();
    let occupied = manager.session(&view.id).unwrap().moves[1].position;
    assert!(matches!(
        manager.apply_opponent_move(&view.id, occupied),
        Err(Error::OccupiedCell { .. })
    ));
}

#[test]
fn rejected_moves_leave_the_session_untouched() {
    let manager = manager(42);
    let view = manager.create_session(false).unwrap();
    manager.apply_opponent_move(&view.id, 0).unwrap();
    let before = manager.session(&view.id).unwrap();

    let _ = manager.apply_opponent_move(&view.id, 1);
    let _ = manager.apply_opponent_move(&view.id, 9);

    let after = manager.session(&view.id).unwrap();
    assert_eq!(after.board, before.board);
    assert_eq!(after.moves.len(), before.moves.len());
    assert_eq!(after.phase, before.phase);
}

/// Drive games until one ends on an opponent move, then race a second
/// terminal submission against the finished session.
#[test]
fn terminal_moves_reinforce_exactly_once_under_contention() {
    let manager = manager(1234);

    let mut raced = false;
    for _ in 0..50 {
        let mut view = manager.create_session(false).unwrap();

        'game: while view.phase != SessionPhase::Finished {
            view = match view.phase {
                SessionPhase::AwaitingAgentMove => manager.agent_move(&view.id).unwrap(),
                SessionPhase::AwaitingOpponentMove => {
                    let board = Board::from_encoding(&view.board).unwrap();
                    let opponent = view.agent_mark.opponent();

                    // Prefer a move that ends the game so the race below is
                    // meaningful.
                    let terminal = view.legal_moves.iter().copied().find(|&pos| {
                        board
                            .make_move(pos, opponent)
                            .is_ok_and(|b| b.is_terminal())
                    });

                    if let Some(pos) = terminal {
                        let games_before = manager.agent().statistics().games_played;

                        let (first, second) = std::thread::scope(|scope| {
                            let a = scope.spawn(|| manager.apply_opponent_move(&view.id, pos));
                            let b = scope.spawn(|| manager.apply_opponent_move(&view.id, pos));
                            (a.join().unwrap(), b.join().unwrap())
                        });

                        let oks = [&first, &second].iter().filter(|r| r.is_ok()).count();
                        assert_eq!(oks, 1, "exactly one terminal submission must win");
                        for result in [first, second] {
                            if let Err(err) = result {
                                assert!(matches!(err, Error::SessionFinished { .. }));
                            }
                        }
                        assert_eq!(
                            manager.agent().statistics().games_played,
                            games_before + 1,
                            "reinforcement must fire exactly once"
                        );

                        raced = true;
                        break 'game;
                    }

                    let pos = view.legal_moves[0];
                    manager.apply_opponent_move(&view.id, pos).unwrap()
                }
                SessionPhase::Finished => break,
            };
        }

        manager.remove_session(&view.id);
        if raced {
            break;
        }
    }

    assert!(raced, "no game ended on an opponent move in 50 attempts");
}

#[test]
fn abandoned_sessions_never_reinforce() {
    let manager = manager(42);
    let view = manager.create_session(false).unwrap();
    manager.apply_opponent_move(&view.id, 0).unwrap();
    manager.agent_move(&view.id).unwrap();

    assert!(manager.remove_session(&view.id));
    assert_eq!(manager.agent().statistics().games_played, 0);
}
