use kokoword::constraints::ConstraintCache;
use kokoword::{
    compile, compile_history, filter, Clue, ConstraintSet, CountSpec, PositionFilter, SolverError,
    Vocabulary, Word,
};

fn w(s: &str) -> Word {
    s.parse().unwrap()
}

fn c(s: &str) -> Clue {
    s.parse().unwrap()
}

fn sample_words() -> Vec<Word> {
    let vocabulary = Vocabulary::embedded().unwrap();
    vocabulary.solutions().iter().step_by(8).copied().collect()
}

#[test]
fn test_all_miss_clue_excludes_every_letter() {
    let constraints = compile(&[c("O-R-A-T-E-")]);
    assert!(!constraints.matches(&w("ROATE")));
    assert!(!constraints.matches(&w("STYLE")));
    assert!(constraints.matches(&w("SLICK")));
    assert!(constraints.matches(&w("BUMPY")));
}

#[test]
fn test_present_requires_letter_elsewhere() {
    let constraints = compile(&[c("C?R+A+N-E+")]);
    assert!(constraints.matches(&w("TRACE")));
    assert!(!constraints.matches(&w("CRANE")));
    assert!(!constraints.matches(&w("GRAPE")));
    assert_eq!(constraints.to_string(), "[^CN]RA[^N]E C>=1");
}

#[test]
fn test_hit_tallies_are_implied_by_pins() {
    let constraints = ConstraintSet::from_clue(&c("C?R+A+N-E+"));
    let specs: Vec<_> = constraints.count_specs().iter().collect();
    assert_eq!(specs, vec![(&b'C', &CountSpec::AtLeast(1))]);
    assert_eq!(constraints.positions()[1], PositionFilter::Equals(b'R'));
}

#[test]
fn test_miss_after_present_makes_count_exact() {
    let clue = Clue::compute(&w("ABIDE"), &w("SPEED"));
    assert_eq!(clue.to_string(), "S-P-E?E-D?");
    let constraints = ConstraintSet::from_clue(&clue);
    assert_eq!(constraints.count_specs().get(&b'E'), Some(&CountSpec::Exactly(1)));
    assert_eq!(constraints.count_specs().get(&b'D'), Some(&CountSpec::AtLeast(1)));
    assert!(constraints.matches(&w("ABIDE")));
    assert!(!constraints.matches(&w("EERIE")));
}

#[test]
fn test_exact_count_survives_later_hits() {
    let clue = Clue::compute(&w("CREEP"), &w("GEESE"));
    assert_eq!(clue.to_string(), "G-E?E+S-E-");
    let constraints = ConstraintSet::from_clue(&clue);
    assert_eq!(constraints.count_specs().get(&b'E'), Some(&CountSpec::Exactly(2)));
    assert!(constraints.matches(&w("CREEP")));
    assert!(!constraints.matches(&w("EMCEE")));
}

#[test]
fn test_hit_then_miss_is_exact() {
    let clue = Clue::compute(&w("EVICT"), &w("EERIE"));
    assert_eq!(clue.to_string(), "E+E-R-I?E-");
    let constraints = ConstraintSet::from_clue(&clue);
    assert_eq!(constraints.count_specs().get(&b'E'), Some(&CountSpec::Exactly(1)));
    assert!(constraints.matches(&w("EVICT")));
    assert!(!constraints.matches(&w("ELITE")));
}

#[test]
fn test_miss_before_hit_excludes_unpinned_positions() {
    let clue = Clue::compute(&w("ABIDE"), &w("EERIE"));
    let constraints = ConstraintSet::from_clue(&clue);
    assert!(constraints.count_specs().get(&b'E').is_none());
    assert_eq!(constraints.positions()[4], PositionFilter::Equals(b'E'));
    assert!(constraints.matches(&w("ABIDE")));
    assert!(!constraints.matches(&w("IDLEE")));
}

#[test]
fn test_single_clue_keeps_its_solution() {
    let words = sample_words();
    for solution in &words {
        for guess in &words {
            let clue = Clue::compute(solution, guess);
            let survivors = filter(&words, &compile(&[clue]));
            assert!(survivors.contains(solution), "{clue} dropped {solution}");
        }
    }
}

#[test]
fn test_history_keeps_its_solution() {
    let words = sample_words();
    let openers = [w("RAISE"), w("CLOTH"), w("DUMPY")];
    for solution in &words {
        let clues: Vec<Clue> = openers.iter().map(|g| Clue::compute(solution, g)).collect();
        assert!(compile(&clues).matches(solution), "history dropped {solution}");
    }
}

#[test]
fn test_filter_is_idempotent() {
    let words = sample_words();
    let constraints = compile(&[Clue::compute(&w("MOUNT"), &w("RAISE"))]);
    let once = filter(&words, &constraints);
    let twice = filter(&once, &constraints);
    assert_eq!(once, twice);
}

#[test]
fn test_appending_clues_never_grows_candidates() {
    let words = sample_words();
    for solution in words.iter().take(40) {
        let mut clues = Vec::new();
        let mut previous = words.len();
        for guess in [w("SLATE"), w("CHORD"), w("BUMPY"), w("FIGHT")] {
            clues.push(Clue::compute(solution, &guess));
            let count = filter(&words, &compile(&clues)).len();
            assert!(count <= previous);
            previous = count;
        }
    }
}

#[test]
fn test_merge_detects_contradiction() {
    let constraints = compile(&[c("C+R-A-N-E-"), c("T+R-A-C-E-")]);
    assert!(!constraints.is_satisfiable());
    assert!(!constraints.matches(&w("CLOTH")));
    assert!(!constraints.matches(&w("TOUCH")));
}

#[test]
fn test_merge_keeps_tighter_count() {
    let merged = ConstraintSet::from_clue(&c("E?X-X-X-X-")).merge(&ConstraintSet::from_clue(&c(
        "Y-E?E?Y-Y-",
    )));
    assert_eq!(merged.count_specs().get(&b'E'), Some(&CountSpec::AtLeast(2)));
    assert!(merged.matches(&w("BBBEE")));
    assert!(!merged.matches(&w("BBBEB")));
}

#[test]
fn test_compile_history_matches_compile() {
    let clues = vec![c("S-L-A?T-E?"), c("O?C-E+A+N-")];
    let from_key = compile_history("S-L-A?T-E?O?C-E+A+N-").unwrap();
    assert_eq!(from_key, compile(&clues));
}

#[test]
fn test_compile_history_rejects_malformed_marker() {
    let err = compile_history("S-L-A?T-E!").unwrap_err();
    assert!(matches!(err, SolverError::InvalidClueFormat { .. }));
}

#[test]
fn test_empty_history_accepts_everything() {
    let words = sample_words();
    assert_eq!(filter(&words, &compile(&[])), words);
}

#[test]
fn test_constraint_cache_reuses_compiled_sets() {
    let mut cache = ConstraintCache::new();
    let clues = vec![c("C?R+A+N-E+")];
    let first = cache.get_or_compile(&clues);
    let second = cache.get_or_compile(&clues);
    assert!(std::sync::Arc::ptr_eq(&first, &second));
    assert_eq!(cache.len(), 1);
    cache.clear();
    assert!(cache.is_empty());
}
