use kut::assertion::evaluator::{
    DEFAULT_EPSILON, approx_equal, different, different_ns, equal, equal_ns, fault_message, is_false,
    is_true, less, less_ns, no_throw, throws,
};
use kut::{AssertionKind, Operands};

// ============================================================================
// Binary comparisons
// ============================================================================

#[test]
fn equal_passes_and_captures_operands() {
    let result = equal("x", &3, "y", &3);
    assert!(result.passed);
    assert_eq!(result.kind, AssertionKind::Equal);
    assert_eq!(result.expression, "x == y");
    assert_eq!(
        result.operands,
        Some(Operands {
            left_text: "x".into(),
            right_text: "y".into(),
            left_value: "3".into(),
            right_value: "3".into(),
        })
    );
}

#[test]
fn equal_fails_on_mismatch() {
    let result = equal("name", "alice", "expected", "bob");
    assert!(!result.passed);
    let ops = result.operands.expect("streaming variant captures operands");
    assert_eq!(ops.left_value, "\"alice\"");
    assert_eq!(ops.right_value, "\"bob\"");
}

#[test]
fn different_and_less() {
    assert!(different("a", &1, "b", &2).passed);
    assert!(!different("a", &1, "b", &1).passed);
    assert_eq!(different("a", &1, "b", &2).expression, "a != b");

    assert!(less("a", &1, "b", &2).passed);
    assert!(!less("a", &2, "b", &2).passed);
    assert_eq!(less("a", &1, "b", &2).expression, "a < b");
}

#[test]
fn no_stream_variants_never_capture_values() {
    struct Opaque(u8);
    impl PartialEq for Opaque {
        fn eq(&self, other: &Self) -> bool {
            self.0 == other.0
        }
    }
    impl PartialOrd for Opaque {
        fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
            self.0.partial_cmp(&other.0)
        }
    }

    let eq = equal_ns("a", &Opaque(1), "b", &Opaque(1));
    assert!(eq.passed);
    assert!(eq.operands.is_none());

    let ne = different_ns("a", &Opaque(1), "b", &Opaque(1));
    assert!(!ne.passed);
    assert!(ne.operands.is_none());

    let lt = less_ns("a", &Opaque(1), "b", &Opaque(2));
    assert!(lt.passed);
    assert!(lt.operands.is_none());
}

#[test]
fn self_comparison_never_fails() {
    let x = 42.5f64;
    assert!(equal("x", &x, "x", &x).passed);
    assert!(!less("x", &x, "x", &x).passed, "x < x must be false");
    assert!(!different("x", &x, "x", &x).passed, "x != x must be false");
}

// ============================================================================
// Approximate equality
// ============================================================================

#[test]
fn approx_equal_uses_epsilon() {
    assert_eq!(DEFAULT_EPSILON, 1e-9);
    assert!(approx_equal("a", 0.1 + 0.2, "b", 0.3, DEFAULT_EPSILON).passed);
    assert!(!approx_equal("a", 1.0, "b", 1.001, DEFAULT_EPSILON).passed);
    assert!(approx_equal("a", 1.0, "b", 1.001, 1e-2).passed);
}

#[test]
fn approx_equal_nan_never_passes() {
    assert!(!approx_equal("a", f64::NAN, "b", f64::NAN, 1.0).passed);
}

// ============================================================================
// Truth
// ============================================================================

#[test]
fn truth_and_falsity() {
    let t = is_true("ready", true);
    assert!(t.passed);
    assert_eq!(t.expression, "ready is TRUE");
    assert!(!is_true("ready", false).passed);

    let f = is_false("broken", false);
    assert!(f.passed);
    assert_eq!(f.expression, "broken is FALSE");
    assert!(!is_false("broken", true).passed);
}

// ============================================================================
// Throw expectations
// ============================================================================

#[test]
fn throws_passes_on_error_and_keeps_message() {
    let evaluated = throws("parse", || "abc".parse::<i32>());
    assert!(evaluated.result.passed);
    assert!(evaluated.fault.is_none());
    let detail = evaluated.result.detail.unwrap();
    assert!(detail.contains("invalid digit"), "got: {}", detail);
}

#[test]
fn throws_fails_when_no_error() {
    let evaluated = throws("parse", || "12".parse::<i32>());
    assert!(!evaluated.result.passed);
    assert!(evaluated.fault.is_none());
    assert_eq!(evaluated.result.kind, AssertionKind::Throws);
}

#[test]
fn no_throw_mirrors_throws() {
    assert!(no_throw("parse", || "12".parse::<i32>()).result.passed);

    let failed = no_throw("parse", || "x".parse::<i32>());
    assert!(!failed.result.passed);
    assert!(failed.result.detail.unwrap().starts_with("error msg:"));
}

#[test]
fn panic_is_a_failure_with_fault_payload() {
    let evaluated = throws("explode", || -> Result<(), String> { panic!("kaboom") });
    assert!(!evaluated.result.passed);
    let fault = evaluated.fault.expect("panic payload must be handed back");
    assert_eq!(fault_message(&fault), "kaboom");

    let evaluated = no_throw("explode", || -> Result<(), String> { panic!("{}", 7) });
    assert!(!evaluated.result.passed);
    assert_eq!(fault_message(&evaluated.fault.unwrap()), "7");
}
