//! Integration tests: a full memorization drill, from importing a study
//! record to the graded report, with the computer's replies running
//! through the real timer on a tokio runtime.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use xiangqi_core::{parse_record, Square};
use xiangqi_practice::{
    ComputerTimer, Grade, MoveVerdict, PlyOutcome, PracticeConfig, PracticeSession, PracticeSide,
    SessionState,
};

fn sq(row: u8, col: u8) -> Square {
    Square::new(row, col)
}

/// Import a short study and drill it as red, with the computer playing
/// black's replies through the timer.
#[tokio::test(start_paused = true)]
async fn test_drill_with_timed_computer_replies() {
    let game = parse_record("1. 炮二平五 馬8進7 2. 傌二進三").unwrap();
    let session = PracticeSession::start(game.tree, PracticeConfig::default());
    let session = Arc::new(Mutex::new(session));

    assert_eq!(
        session.lock().unwrap().state(),
        SessionState::AwaitingPlayerMove
    );
    let verdict = session.lock().unwrap().propose_move(sq(7, 7), sq(7, 4));
    assert!(matches!(verdict, MoveVerdict::Correct(_)));

    // Arm the reply timer the way a frontend would.
    let mut timer = ComputerTimer::new();
    let (generation, delay) = {
        let guard = session.lock().unwrap();
        assert_eq!(guard.state(), SessionState::AwaitingComputerMove);
        (guard.generation(), guard.config().computer_delay)
    };
    let handle = session.clone();
    timer.schedule(delay, move || {
        let mut rng = StdRng::seed_from_u64(3);
        handle
            .lock()
            .unwrap()
            .on_computer_timer(generation, &mut rng);
    });

    tokio::time::sleep(delay + Duration::from_millis(50)).await;
    tokio::task::yield_now().await;

    let mut guard = session.lock().unwrap();
    assert_eq!(guard.state(), SessionState::AwaitingPlayerMove);
    assert!(matches!(
        guard.propose_move(sq(9, 7), sq(7, 6)),
        MoveVerdict::Correct(_)
    ));
    assert_eq!(guard.state(), SessionState::Finished);

    let report = guard.report();
    assert_eq!(report.score, 100);
    assert_eq!(report.grade, Grade::S);
    assert_eq!(report.plies.len(), 3);
    // The computer's reply counts as a graded, clean ply.
    assert_eq!(report.plies[1].outcome, PlyOutcome::Correct);
}

/// Stopping the session before the timer fires must leave it untouched:
/// the armed reply carries a generation the session no longer accepts.
#[tokio::test(start_paused = true)]
async fn test_stop_invalidates_the_armed_reply() {
    let game = parse_record("1. 炮二平五 馬8進7").unwrap();
    let config = PracticeConfig {
        player_side: PracticeSide::Black,
        ..PracticeConfig::default()
    };
    let session = Arc::new(Mutex::new(PracticeSession::start(game.tree, config)));
    assert_eq!(
        session.lock().unwrap().state(),
        SessionState::AwaitingComputerMove
    );

    let mut timer = ComputerTimer::new();
    let (generation, delay) = {
        let guard = session.lock().unwrap();
        (guard.generation(), guard.config().computer_delay)
    };
    let handle = session.clone();
    timer.schedule(delay, move || {
        let mut rng = StdRng::seed_from_u64(0);
        handle
            .lock()
            .unwrap()
            .on_computer_timer(generation, &mut rng);
    });

    session.lock().unwrap().stop();

    tokio::time::sleep(delay + Duration::from_millis(50)).await;
    tokio::task::yield_now().await;

    let guard = session.lock().unwrap();
    assert_eq!(guard.state(), SessionState::Idle);
    assert_eq!(guard.current(), guard.tree().root_id());
}

/// Misses recorded at a position mark the ply played from it, and the
/// score reflects every miss, not just distinct positions.
#[tokio::test]
async fn test_report_attributes_misses_to_positions() {
    let game = parse_record("1. 炮二平五 馬8進7 2. 傌二進三").unwrap();
    let mut session = PracticeSession::start(game.tree, PracticeConfig::default());

    // Two misses at the start, then the right answer.
    assert!(matches!(
        session.propose_move(sq(7, 1), sq(7, 4)),
        MoveVerdict::Wrong { .. }
    ));
    assert!(matches!(
        session.propose_move(sq(9, 0), sq(8, 0)),
        MoveVerdict::Wrong { .. }
    ));
    session.propose_move(sq(7, 7), sq(7, 4));

    let mut rng = StdRng::seed_from_u64(9);
    let generation = session.generation();
    session.on_computer_timer(generation, &mut rng);
    session.propose_move(sq(9, 7), sq(7, 6));

    assert_eq!(session.errors().len(), 1);
    assert_eq!(session.errors()[0].count, 2);

    let report = session.report();
    assert_eq!(report.plies[0].outcome, PlyOutcome::Erred);
    assert_eq!(report.plies[2].outcome, PlyOutcome::Correct);
    // 2 successes over 4 attempts.
    assert_eq!(report.score, 50);
    assert_eq!(report.grade, Grade::C);
}
