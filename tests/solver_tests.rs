use std::sync::Arc;

use kokoword::solver::pick_first_guess;
use kokoword::{
    Clue, Game, GameState, NullSink, ProgressEvent, SolverConfig, SolverError, Vocabulary, Word,
    WordleSolver,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn w(s: &str) -> Word {
    s.parse().unwrap()
}

fn c(s: &str) -> Clue {
    s.parse().unwrap()
}

fn small_solver(solutions: &str, guesses: &str, seed: u64) -> WordleSolver {
    let vocabulary = Vocabulary::parse(solutions, guesses).unwrap();
    let config = SolverConfig::default().with_workers(2).with_seed(seed);
    WordleSolver::new(vocabulary, config).unwrap()
}

fn full_solver(seed: u64) -> WordleSolver {
    let config = SolverConfig::default().with_workers(4).with_seed(seed);
    WordleSolver::new(Vocabulary::embedded().unwrap(), config).unwrap()
}

#[test]
fn test_solve_with_fixed_opening() {
    let mut solver = small_solver("CRANE\nTRACE\nSLATE\nGRAPE\nPLATE\n", "", 1);
    let game = solver
        .play_with_opening(&w("TRACE"), w("CRANE"), &mut NullSink)
        .unwrap();

    assert_eq!(game.state(), GameState::Solved);
    assert_eq!(game.guess_count(), 2);
    assert_eq!(game.clues()[0].to_string(), "C?R+A+N-E+");
    assert!(game.clues()[1].is_solved());
    assert_eq!(*solver.candidates_for(&game.clues()[..1]), vec![w("TRACE")]);
}

#[test]
fn test_progress_events_in_order() {
    let mut solver = small_solver("CRANE\nTRACE\nSLATE\nGRAPE\nPLATE\n", "", 1);
    let mut events = Vec::new();
    let mut sink = |event: ProgressEvent<'_>| {
        events.push(match event {
            ProgressEvent::FirstGuess { .. } => "first",
            ProgressEvent::Candidates { .. } => "candidates",
            ProgressEvent::TopGuesses { .. } => "top",
            ProgressEvent::Guessed { .. } => "guessed",
            ProgressEvent::Solved { .. } => "solved",
        })
    };
    solver
        .play_with_opening(&w("TRACE"), w("CRANE"), &mut sink)
        .unwrap();
    assert_eq!(events, ["first", "guessed", "candidates", "guessed", "solved"]);
}

#[test]
fn test_opening_must_be_in_guess_list() {
    let mut solver = small_solver("CRANE\nTRACE\nSLATE\n", "ROATE\n", 1);
    let err = solver
        .play_with_opening(&w("TRACE"), w("QQQQQ"), &mut NullSink)
        .unwrap_err();
    assert!(matches!(err, SolverError::InvalidWord { ref word, .. } if word == "QQQQQ"));

    let game = Game::new(w("TRACE"), solver.vocabulary()).unwrap();
    assert!(game.clone().with_opening(w("ROATE"), solver.vocabulary()).is_ok());
    assert!(game.with_opening(w("ZZZZZ"), solver.vocabulary()).is_err());
}

#[test]
fn test_hidden_word_must_be_a_solution() {
    let mut solver = full_solver(3);
    let err = Game::new(w("XYLYL"), solver.vocabulary()).unwrap_err();
    assert!(matches!(err, SolverError::InvalidWord { .. }));
    assert_eq!(err.code(), "W001");
    assert!(solver.play_one_game(&w("XYLYL"), &mut NullSink).is_err());
}

#[test]
fn test_solves_bundled_solutions() {
    let mut solver = full_solver(11);
    let targets: Vec<Word> = solver.vocabulary().solutions().iter().step_by(33).copied().collect();
    for target in &targets {
        let game = Game::new(*target, solver.vocabulary()).unwrap();
        let game = solver.play(game, &mut NullSink).unwrap();
        assert!(game.guess_count() <= 8, "{target} took {} guesses", game.guess_count());
        let last = game.clues().last().unwrap();
        assert!(last.is_solved());
        assert_eq!(last.guess(), *target);
    }
}

#[test]
fn test_every_clue_keeps_the_hidden_word() {
    let mut solver = full_solver(5);
    let hidden = solver.vocabulary().solutions()[100];
    let game = solver
        .play(Game::new(hidden, solver.vocabulary()).unwrap(), &mut NullSink)
        .unwrap();
    for end in 1..game.clues().len() {
        let candidates = solver.candidates_for(&game.clues()[..end]);
        assert!(candidates.contains(&hidden));
    }
}

#[test]
fn test_seeded_games_repeat() {
    let mut first = full_solver(42);
    let mut second = full_solver(42);
    let targets: Vec<Word> = first.vocabulary().solutions().iter().step_by(97).copied().collect();
    for hidden in targets {
        let a = first.play(Game::new(hidden, first.vocabulary()).unwrap(), &mut NullSink).unwrap();
        let b = second.play(Game::new(hidden, second.vocabulary()).unwrap(), &mut NullSink).unwrap();
        assert_eq!(a.clues(), b.clues());
    }
}

#[test]
fn test_opening_weighted_toward_top() {
    let openings = [w("RAISE"), w("ROATE"), w("SLATE")];
    let mut rng = StdRng::seed_from_u64(9);
    let mut counts = [0usize; 3];
    for _ in 0..6000 {
        let pick = pick_first_guess(&openings, &mut rng).unwrap();
        let index = openings.iter().position(|o| *o == pick).unwrap();
        counts[index] += 1;
    }
    // Expected 3000, 2000, 1000.
    assert!(counts[0] > counts[1] && counts[1] > counts[2], "{counts:?}");
    assert!(counts[2] > 800 && counts[2] < 1200, "{counts:?}");
    assert!(pick_first_guess(&[], &mut rng).is_none());
}

#[test]
fn test_openings_limited_to_guess_list() {
    let solver = small_solver("CRANE\nTRACE\n", "ROATE\nSALET\n", 1);
    assert_eq!(solver.openings(), [w("ROATE"), w("SALET"), w("TRACE"), w("CRANE")]);
}

#[test]
fn test_two_candidates_guess_one_at_random() {
    let mut solver = small_solver("BOBBY\nHOBBY\n", "", 2);
    assert!(solver.openings().is_empty());
    let suggestion = solver.suggest(&[], &mut NullSink).unwrap();
    assert!(suggestion.guess == w("BOBBY") || suggestion.guess == w("HOBBY"));
    assert!(suggestion.ranked.is_empty());
}

#[test]
fn test_first_guess_searched_without_openings() {
    let mut solver = small_solver("BOBBY\nHOBBY\nLOBBY\n", "", 2);
    let mut first_guess = None;
    let mut sink = |event: ProgressEvent<'_>| {
        if let ProgressEvent::FirstGuess { guess } = event {
            first_guess = Some(guess);
        }
    };
    let suggestion = solver.suggest(&[], &mut sink).unwrap();
    assert_eq!(first_guess, Some(suggestion.guess));
    assert_eq!(suggestion.ranked.len(), 3);
    assert_eq!(suggestion.ranked[0].guess, suggestion.guess);
}

#[test]
fn test_top_guesses_respect_limit() {
    let vocabulary = Vocabulary::embedded().unwrap();
    let config = SolverConfig {
        workers: 2,
        top_n: 1,
        seed: Some(4),
    };
    let mut solver = WordleSolver::new(vocabulary, config).unwrap();
    let mut shown_counts = Vec::new();
    let mut sink = |event: ProgressEvent<'_>| {
        if let ProgressEvent::TopGuesses { shown, total } = event {
            assert!(total >= shown.len());
            shown_counts.push(shown.len());
        }
    };
    let suggestion = solver.suggest(&[c("R-A-I?S-E-")], &mut sink).unwrap();
    assert_eq!(shown_counts, [1]);
    assert_eq!(suggestion.ranked[0].guess, suggestion.guess);
}

#[test]
fn test_contradictory_history_has_no_candidates() {
    let mut solver = full_solver(6);
    let err = solver
        .suggest(&[c("C+R-A-N-E-"), c("T+R-A-C-E-")], &mut NullSink)
        .unwrap_err();
    assert!(matches!(err, SolverError::NoCandidates { .. }));
    assert_eq!(err.code(), "S002");
}

#[test]
fn test_candidates_are_memoized() {
    let mut solver = full_solver(8);
    let all = solver.candidates_for(&[]);
    assert_eq!(all.len(), solver.vocabulary().solutions().len());

    let clues = [c("S-L-A?T-E?")];
    let first = solver.candidates_for(&clues);
    let second = solver.candidates_for(&clues);
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(solver.memoized_histories(), 2);
    assert!(first.len() < all.len());

    solver.clear_caches();
    let third = solver.candidates_for(&clues);
    assert!(!Arc::ptr_eq(&first, &third));
    assert_eq!(first, third);
}

#[test]
fn test_benchmark_distribution_covers_every_game() {
    let mut solver = full_solver(12);
    let distribution = solver.benchmark_guess_distribution(Some(12)).unwrap();
    let games: usize = distribution.iter().map(|(_, count)| count).sum();
    assert_eq!(games, 12);
    assert_eq!(solver.memoized_histories(), 0);
    assert!(distribution.iter().all(|(guesses, _)| *guesses >= 1));
}

#[test]
fn test_vocabulary_lists() {
    let vocabulary = Vocabulary::parse("# answers\ntrace\n\nCRANE\ntrace\n", "xylyl\n").unwrap();
    assert_eq!(vocabulary.solutions(), [w("CRANE"), w("TRACE")]);
    assert_eq!(vocabulary.guesses(), [w("CRANE"), w("TRACE"), w("XYLYL")]);
    assert!(vocabulary.is_guess(&w("TRACE")));
    assert!(!vocabulary.is_solution(&w("XYLYL")));

    let err = Vocabulary::parse("CRANE\nTRACES\n", "").unwrap_err();
    assert!(err.to_string().contains("line 2"));
}

#[test]
fn test_missing_word_list_is_io_error() {
    let err = Vocabulary::load_from_paths("/nonexistent/solutions.txt", "/nonexistent/guesses.txt")
        .unwrap_err();
    assert!(matches!(err, SolverError::Io { .. }));
    assert_eq!(err.code(), "V001");
}
