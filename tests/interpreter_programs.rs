use pretty_assertions::assert_eq;
use verdigris::engines::evaluation::{Interpreter, StatementKind};
use verdigris::VerdigrisError;

const COUNTDOWN: &str = "define x\ninput x\nwhile ( x > 0 )\nlet x <- x - 1\nend while\noutput x";

#[test]
fn test_countdown_outputs_zero() {
    let mut terp = Interpreter::new(Some(vec![5]));
    let summary = terp.parse(COUNTDOWN).unwrap();

    assert!(summary.syntax_errors.is_empty());
    assert!(terp.go(None));
    assert_eq!(terp.outputs(), &[0]);
}

#[test]
fn test_mismatched_end_fails_and_drops_the_block() {
    let text = "define x\ninput x\nwhile ( x > 0 )\nlet x <- x - 1\nend if\noutput x";
    let mut terp = Interpreter::new(Some(vec![5]));

    let err = terp.parse(text).unwrap_err();
    assert!(matches!(err, VerdigrisError::BlockMismatch { line: 5, .. }));
    assert!(terp
        .program()
        .iter()
        .all(|s| s.kind() != StatementKind::Loop));
}

#[test]
fn test_loop_budget_caps_iterations_without_failing() {
    let text = "define x\nwhile ( 1 = 1 )\nlet x <- x + 1\nend while\noutput x";
    let mut terp = Interpreter::new(Some(vec![]));
    terp.parse(text).unwrap();

    assert!(terp.go(Some(7)));
    assert_eq!(terp.outputs(), &[7]);
}

#[test]
fn test_budget_is_shared_by_nested_loops() {
    let text = "define i, n\nwhile ( i < 3 )\nlet i <- i + 1\nwhile ( 0 = 0 )\nlet n <- n + 1\nend while\nend while\noutput i\noutput n";
    let mut terp = Interpreter::new(Some(vec![]));
    terp.parse(text).unwrap();

    assert!(terp.go(Some(4)));
    assert_eq!(terp.outputs(), &[1, 3]);
}

#[test]
fn test_runaway_nested_loops_stay_within_budget() {
    let text = "while ( 1 = 1 )\nwhile ( 1 = 1 )\nwhile ( 1 = 1 )\noutput 1\nend while\nend while\nend while";
    let mut terp = Interpreter::new(Some(vec![]));
    terp.parse(text).unwrap();

    assert!(terp.go(Some(100)));
    assert!(terp.outputs().len() <= 100);
    assert_eq!(terp.outputs().len(), 98);

    // every run starts with the full budget again
    assert!(terp.go(Some(100)));
    assert_eq!(terp.outputs().len(), 98);
}

#[test]
fn test_missing_input_flags_failure_but_keeps_running() {
    let text = "define a , b\ninput a\ninput b\nlet a <- a + 1\noutput a\noutput b";
    let mut terp = Interpreter::new(Some(vec![41]));
    terp.parse(text).unwrap();

    assert!(!terp.go(None));
    assert_eq!(terp.outputs(), &[42, 0]);
}

#[test]
fn test_comments_and_keywords_are_case_insensitive() {
    let text = "# factor a number\nDEFINE n\nINPUT n\nIf ( n % 2 = 0 )\nOUTPUT 2\nEnd If";
    let mut terp = Interpreter::new(Some(vec![8]));
    let summary = terp.parse(text).unwrap();

    // `n % 2 = 0` is not a valid condition shape
    assert_eq!(summary.syntax_errors.len(), 1);
    assert!(terp.go(None));
    assert!(terp.outputs().is_empty());
}

#[test]
fn test_modulo_and_division_programs() {
    let text = "define n, r, q\ninput n\nlet r <- n % 4\nlet q <- n / 0\noutput r\noutput q";
    let mut terp = Interpreter::new(Some(vec![10]));
    terp.parse(text).unwrap();

    assert!(terp.go(None));
    assert_eq!(terp.outputs(), &[2, 0]);
}
