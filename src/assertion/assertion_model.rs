use serde::{Deserialize, Serialize};

/// The predicate category an assertion was evaluated with.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AssertionKind {
    /// `a == b`
    Equal,

    /// `a != b`
    Different,

    /// `a < b`
    Less,

    /// `a` holds
    True,

    /// `a` does not hold
    False,

    /// `|a - b| < epsilon`
    ApproxEqual,

    /// The operation must return an error
    Throws,

    /// The operation must not return an error
    NoThrow,

    /// A folded loop block
    Loop,
}

impl AssertionKind {
    /// Operator label used when the assertion is registered inside a loop block.
    pub fn loop_label(&self) -> &'static str {
        match self {
            AssertionKind::Equal | AssertionKind::ApproxEqual => "EQUAL",
            AssertionKind::Different => "DIFF",
            AssertionKind::Less => "LESS",
            AssertionKind::True => "TRUE",
            AssertionKind::False => "FALSE",
            AssertionKind::Throws => "THROW",
            AssertionKind::NoThrow => "NOTHROW",
            AssertionKind::Loop => "LOOP",
        }
    }
}

/// Source text and rendered values of both sides of a binary assertion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Operands {
    pub left_text: String,
    pub right_text: String,
    pub left_value: String,
    pub right_value: String,
}

/// Result of evaluating a single assertion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssertionResult {
    /// Which predicate was evaluated
    pub kind: AssertionKind,

    /// Whether the assertion passed
    pub passed: bool,

    /// Literal text of the checked expression(s), as supplied by the caller
    pub expression: String,

    /// Operand values, captured only by the streaming variants
    pub operands: Option<Operands>,

    /// Extra context: a captured error message or a caller-supplied note
    pub detail: Option<String>,
}

impl AssertionResult {
    pub fn new(kind: AssertionKind, passed: bool, expression: impl Into<String>) -> Self {
        Self {
            kind,
            passed,
            expression: expression.into(),
            operands: None,
            detail: None,
        }
    }

    pub fn with_operands(mut self, operands: Operands) -> Self {
        self.operands = Some(operands);
        self
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}
