use std::any::Any;
use std::fmt::{self, Debug};
use std::panic::{self, AssertUnwindSafe};

use crate::assertion::assertion_model::{AssertionKind, AssertionResult, Operands};

/// Tolerance used by [`approx_equal`] when the configuration does not override it.
pub const DEFAULT_EPSILON: f64 = 1e-9;

/// Payload of a panic caught while evaluating a throw expectation.
pub type Fault = Box<dyn Any + Send + 'static>;

/// Outcome of a throw expectation: the assertion result, plus the panic payload
/// when the operation faulted instead of returning. The payload must be re-raised
/// by whoever records the result.
pub struct Evaluated {
    pub result: AssertionResult,
    pub fault: Option<Fault>,
}

impl fmt::Debug for Evaluated {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Evaluated")
            .field("result", &self.result)
            .field("fault", &self.fault.as_ref().map(fault_message))
            .finish()
    }
}

// ============================================================================
// Binary comparisons
// ============================================================================

pub fn equal<A, B>(left_text: &str, a: &A, right_text: &str, b: &B) -> AssertionResult
where
    A: PartialEq<B> + Debug + ?Sized,
    B: Debug + ?Sized,
{
    binary(AssertionKind::Equal, a == b, left_text, "==", right_text)
        .with_operands(operands(left_text, a, right_text, b))
}

pub fn different<A, B>(left_text: &str, a: &A, right_text: &str, b: &B) -> AssertionResult
where
    A: PartialEq<B> + Debug + ?Sized,
    B: Debug + ?Sized,
{
    binary(AssertionKind::Different, a != b, left_text, "!=", right_text)
        .with_operands(operands(left_text, a, right_text, b))
}

pub fn less<A, B>(left_text: &str, a: &A, right_text: &str, b: &B) -> AssertionResult
where
    A: PartialOrd<B> + Debug + ?Sized,
    B: Debug + ?Sized,
{
    binary(AssertionKind::Less, a < b, left_text, "<", right_text)
        .with_operands(operands(left_text, a, right_text, b))
}

/// `equal` for operand types without a `Debug` rendering.
pub fn equal_ns<A, B>(left_text: &str, a: &A, right_text: &str, b: &B) -> AssertionResult
where
    A: PartialEq<B> + ?Sized,
    B: ?Sized,
{
    binary(AssertionKind::Equal, a == b, left_text, "==", right_text)
}

/// `different` for operand types without a `Debug` rendering.
pub fn different_ns<A, B>(left_text: &str, a: &A, right_text: &str, b: &B) -> AssertionResult
where
    A: PartialEq<B> + ?Sized,
    B: ?Sized,
{
    binary(AssertionKind::Different, a != b, left_text, "!=", right_text)
}

/// `less` for operand types without a `Debug` rendering.
pub fn less_ns<A, B>(left_text: &str, a: &A, right_text: &str, b: &B) -> AssertionResult
where
    A: PartialOrd<B> + ?Sized,
    B: ?Sized,
{
    binary(AssertionKind::Less, a < b, left_text, "<", right_text)
}

/// Floating-point equality within `epsilon`. NaN on either side never compares equal.
pub fn approx_equal(left_text: &str, a: f64, right_text: &str, b: f64, epsilon: f64) -> AssertionResult {
    let passed = (a - b).abs() < epsilon;
    binary(AssertionKind::ApproxEqual, passed, left_text, "==", right_text)
        .with_operands(operands(left_text, &a, right_text, &b))
}

// ============================================================================
// Truth
// ============================================================================

pub fn is_true(text: &str, value: bool) -> AssertionResult {
    AssertionResult::new(AssertionKind::True, value, format!("{} is TRUE", text))
}

pub fn is_false(text: &str, value: bool) -> AssertionResult {
    AssertionResult::new(AssertionKind::False, !value, format!("{} is FALSE", text))
}

// ============================================================================
// Throw expectations
// ============================================================================

/// Passes iff `op` returns `Err`. The error's message is kept as the detail.
/// A panic inside `op` is a failure and its payload is returned for re-raising.
pub fn throws<T, E, F>(text: &str, op: F) -> Evaluated
where
    E: fmt::Display,
    F: FnOnce() -> Result<T, E>,
{
    match panic::catch_unwind(AssertUnwindSafe(op)) {
        Ok(Err(e)) => Evaluated {
            result: AssertionResult::new(AssertionKind::Throws, true, text)
                .with_detail(format!("handled error raised, msg={}", e)),
            fault: None,
        },
        Ok(Ok(_)) => Evaluated {
            result: AssertionResult::new(AssertionKind::Throws, false, text)
                .with_detail("statement did NOT raise an error"),
            fault: None,
        },
        Err(payload) => faulted(AssertionKind::Throws, text, payload),
    }
}

/// Passes iff `op` returns `Ok`. A returned error fails with its message as the
/// detail; a panic fails and its payload is returned for re-raising.
pub fn no_throw<T, E, F>(text: &str, op: F) -> Evaluated
where
    E: fmt::Display,
    F: FnOnce() -> Result<T, E>,
{
    match panic::catch_unwind(AssertUnwindSafe(op)) {
        Ok(Ok(_)) => Evaluated {
            result: AssertionResult::new(AssertionKind::NoThrow, true, text)
                .with_detail("no error raised"),
            fault: None,
        },
        Ok(Err(e)) => Evaluated {
            result: AssertionResult::new(AssertionKind::NoThrow, false, text)
                .with_detail(format!("error msg: {}", e)),
            fault: None,
        },
        Err(payload) => faulted(AssertionKind::NoThrow, text, payload),
    }
}

/// Best-effort text of a panic payload.
pub fn fault_message(fault: &Fault) -> String {
    if let Some(s) = fault.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = fault.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown fault".to_string()
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn faulted(kind: AssertionKind, text: &str, payload: Fault) -> Evaluated {
    let detail = format!("unhandled fault: {}", fault_message(&payload));
    Evaluated {
        result: AssertionResult::new(kind, false, text).with_detail(detail),
        fault: Some(payload),
    }
}

fn binary(kind: AssertionKind, passed: bool, left_text: &str, op: &str, right_text: &str) -> AssertionResult {
    AssertionResult::new(kind, passed, format!("{} {} {}", left_text, op, right_text))
}

fn operands<A, B>(left_text: &str, a: &A, right_text: &str, b: &B) -> Operands
where
    A: Debug + ?Sized,
    B: Debug + ?Sized,
{
    Operands {
        left_text: left_text.to_string(),
        right_text: right_text.to_string(),
        left_value: format!("{:?}", a),
        right_value: format!("{:?}", b),
    }
}
