use serde::Serialize;

use crate::assertion::assertion_model::{AssertionKind, AssertionResult};

// ============================================================================
// Loop aggregation: many iterations folded into one assertion slot
// ============================================================================

/// One assertion site inside a loop body, identified by call order.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct LoopSlot {
    pub kind: AssertionKind,
    pub left_text: String,
    pub right_text: String,

    /// Number of iterations in which this assertion failed
    pub failed: usize,
}

impl LoopSlot {
    /// `left OP right`, or `left OP` for unary checks.
    pub fn description(&self) -> String {
        if self.right_text.is_empty() {
            format!("{} {}", self.left_text, self.kind.loop_label())
        } else {
            format!("{} {} {}", self.left_text, self.kind.loop_label(), self.right_text)
        }
    }
}

/// First point where an iteration stopped following the call sequence
/// registered by iteration 0.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Divergence {
    pub iteration: usize,
    pub slot: usize,
    pub reason: String,
}

/// Runs a group of assertions over a fixed number of iterations and counts,
/// per assertion site, how many iterations failed.
///
/// Iteration 0 registers the sequence of assertion calls. Every later iteration
/// must make the same calls in the same order; the first deviation is recorded
/// as a [`Divergence`] and fails the loop.
#[derive(Debug)]
pub struct LoopAggregator {
    iteration_count: usize,
    iteration: usize,
    cursor: usize,
    slots: Vec<LoopSlot>,
    any_failure: bool,
    divergence: Option<Divergence>,
    finished: bool,
}

impl LoopAggregator {
    pub fn begin(iteration_count: usize) -> Self {
        Self {
            iteration_count,
            iteration: 0,
            cursor: 0,
            slots: Vec::new(),
            any_failure: false,
            divergence: None,
            finished: false,
        }
    }

    /// Mark the start of iteration `iteration`, closing the previous one.
    pub fn start_iteration(&mut self, iteration: usize) {
        if iteration > 0 {
            self.close_iteration();
        }
        self.iteration = iteration;
        self.cursor = 0;
    }

    pub fn iteration_count(&self) -> usize {
        self.iteration_count
    }

    pub fn slots(&self) -> &[LoopSlot] {
        &self.slots
    }

    pub fn divergence(&self) -> Option<&Divergence> {
        self.divergence.as_ref()
    }

    pub fn any_failure(&self) -> bool {
        self.any_failure
    }

    // ------------------------------------------------------------------------
    // Checks
    // ------------------------------------------------------------------------

    pub fn is_true(&mut self, text: &str, value: bool) {
        self.check(AssertionKind::True, text, "", value);
    }

    pub fn is_false(&mut self, text: &str, value: bool) {
        self.check(AssertionKind::False, text, "", !value);
    }

    pub fn equal<A, B>(&mut self, left_text: &str, a: &A, right_text: &str, b: &B)
    where
        A: PartialEq<B> + ?Sized,
        B: ?Sized,
    {
        self.check(AssertionKind::Equal, left_text, right_text, a == b);
    }

    pub fn different<A, B>(&mut self, left_text: &str, a: &A, right_text: &str, b: &B)
    where
        A: PartialEq<B> + ?Sized,
        B: ?Sized,
    {
        self.check(AssertionKind::Different, left_text, right_text, a != b);
    }

    pub fn less<A, B>(&mut self, left_text: &str, a: &A, right_text: &str, b: &B)
    where
        A: PartialOrd<B> + ?Sized,
        B: ?Sized,
    {
        self.check(AssertionKind::Less, left_text, right_text, a < b);
    }

    // ------------------------------------------------------------------------
    // Folding
    // ------------------------------------------------------------------------

    /// Fold the whole loop into a single assertion outcome: it passes iff no
    /// iteration failed and every iteration followed the registered sequence.
    pub fn end(&mut self) -> AssertionResult {
        if !self.finished {
            if self.iteration_count > 0 {
                self.close_iteration();
            }
            self.finished = true;
        }

        let passed = !self.any_failure && self.divergence.is_none();
        let result = AssertionResult::new(
            AssertionKind::Loop,
            passed,
            format!("loop of {} iterations", self.iteration_count),
        );
        match &self.divergence {
            Some(d) => result.with_detail(format!(
                "loop body diverged at iteration {}, slot {}: {}",
                d.iteration,
                d.slot + 1,
                d.reason
            )),
            None => result,
        }
    }

    /// One line per assertion site: `subtest N.i, expr: ..., failed: m/K (p%)`.
    pub fn summary_lines(&self, test_number: usize) -> Vec<String> {
        self.slots
            .iter()
            .enumerate()
            .map(|(i, slot)| {
                format!(
                    "   - subtest {}.{}, expr: {}, failed: {}",
                    test_number,
                    i + 1,
                    slot.description(),
                    failure_ratio(slot.failed, self.iteration_count)
                )
            })
            .collect()
    }

    fn check(&mut self, kind: AssertionKind, left_text: &str, right_text: &str, passed: bool) {
        if !passed {
            self.any_failure = true;
        }

        let aligned = if self.iteration == 0 {
            self.slots.push(LoopSlot {
                kind,
                left_text: left_text.to_string(),
                right_text: right_text.to_string(),
                failed: 0,
            });
            true
        } else {
            match self.slots.get(self.cursor) {
                Some(slot) if slot.kind == kind && slot.left_text == left_text && slot.right_text == right_text => true,
                Some(slot) => {
                    let reason = format!(
                        "expected '{}', got '{} {} {}'",
                        slot.description(),
                        left_text,
                        kind.loop_label(),
                        right_text
                    );
                    self.diverge(reason);
                    false
                }
                None => {
                    let reason = format!(
                        "extra assertion '{} {} {}' beyond the {} registered",
                        left_text,
                        kind.loop_label(),
                        right_text,
                        self.slots.len()
                    );
                    self.diverge(reason);
                    false
                }
            }
        };

        if aligned && !passed {
            self.slots[self.cursor].failed += 1;
        }
        self.cursor += 1;
    }

    fn close_iteration(&mut self) {
        if self.iteration > 0 && self.cursor < self.slots.len() {
            let reason = format!(
                "iteration ran {} of {} registered assertions",
                self.cursor,
                self.slots.len()
            );
            self.diverge(reason);
        }
    }

    fn diverge(&mut self, reason: String) {
        if self.divergence.is_none() {
            self.divergence = Some(Divergence {
                iteration: self.iteration,
                slot: self.cursor,
                reason,
            });
        }
    }
}

/// `m/K (p%)`; the percentage keeps one decimal only when it is not whole.
pub fn failure_ratio(failed: usize, total: usize) -> String {
    if total == 0 {
        return format!("{}/{} (0%)", failed, total);
    }
    let percent = 100.0 * failed as f64 / total as f64;
    if percent.fract() == 0.0 {
        format!("{}/{} ({:.0}%)", failed, total, percent)
    } else {
        format!("{}/{} ({:.1}%)", failed, total, percent)
    }
}
