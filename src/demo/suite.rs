use crate::context::context::{TestFlow, UnitTestContext};
use crate::demo::sample::{RunningStats, Stack, StackError, gcd, parse_ratio};
use crate::suite::error::KutError;
use crate::suite::runner::{SuiteRunner, TestedClass};

/// Register the demonstration unit tests on a started runner.
///
/// With `broken` set, a function test with deliberate failures is appended so
/// the failure report and the non-zero exit status can be seen.
pub fn run_demo_suite(runner: &mut SuiteRunner, broken: bool) -> Result<(), KutError> {
    runner.run_class_test::<Stack>()?;
    runner.run_class_test::<RunningStats>()?;
    runner.run_function_test("gcd", test_gcd)?;
    runner.run_function_test("parse_ratio", test_parse_ratio)?;
    if broken {
        runner.run_function_test("broken_expectations", test_broken_expectations)?;
    }
    Ok(())
}

impl TestedClass for Stack {
    fn unit_test(&mut self, t: &mut UnitTestContext<'_>) -> TestFlow {
        t.message("fresh stack");
        t.is_true("is_empty()", self.is_empty())?;
        t.equal("capacity()", &self.capacity(), "DEFAULT_CAPACITY", &Stack::DEFAULT_CAPACITY)?;
        t.throws("pop() on empty", || self.pop())?;

        t.message("push until full");
        for v in 0..Stack::DEFAULT_CAPACITY as i64 {
            t.no_throw_with("push(v)", || self.push(v), "v", &v)?;
        }
        t.equal("len()", &self.len(), "capacity()", &self.capacity())?;
        t.throws("push(99) on full", || self.push(99))?;
        t.equal("peek()", &self.peek(), "Some(7)", &Some(7i64))?;

        t.message("drain");
        let capacity = self.capacity();
        t.repeat(capacity, |i, lp| {
            let expected = (capacity - 1 - i) as i64;
            let popped = self.pop();
            lp.equal("pop()", &popped, "Ok(expected)", &Ok::<i64, StackError>(expected));
        })?;
        t.is_true("is_empty()", self.is_empty())
    }
}

impl TestedClass for RunningStats {
    fn unit_test(&mut self, t: &mut UnitTestContext<'_>) -> TestFlow {
        t.message("empty accumulator");
        t.equal("count()", &self.count(), "0", &0u64)?;
        t.approx_equal("variance()", self.variance(), "0.0", 0.0)?;

        t.message("known samples");
        for x in [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0] {
            self.push(x);
        }
        t.diag(&format!("samples: {}, mean: {}, variance: {}", self.count(), self.mean(), self.variance()));
        t.approx_equal("mean()", self.mean(), "5.0", 5.0)?;
        t.approx_equal("variance()", self.variance(), "4.0", 4.0)?;
        t.less("0.0", &0.0f64, "variance()", &self.variance())
    }
}

fn test_gcd(t: &mut UnitTestContext<'_>) -> TestFlow {
    t.message("fixed values");
    t.equal("gcd(12, 18)", &gcd(12, 18), "6", &6u64)?;
    t.equal("gcd(7, 0)", &gcd(7, 0), "7", &7u64)?;
    t.different("gcd(9, 6)", &gcd(9, 6), "1", &1u64)?;

    t.exec("properties", |t| {
        t.repeat(200, |i, lp| {
            let a = (i as u64 * 7919) % 1009 + 1;
            let b = (i as u64 * 104_729) % 997 + 1;
            let g = gcd(a, b);
            lp.equal("a % g", &(a % g), "0", &0u64);
            lp.equal("b % g", &(b % g), "0", &0u64);
            lp.equal("gcd(b, a)", &gcd(b, a), "g", &g);
        })
    })
}

fn test_parse_ratio(t: &mut UnitTestContext<'_>) -> TestFlow {
    t.message("well-formed input");
    t.no_throw("parse_ratio(\"3/4\")", || parse_ratio("3/4"))?;
    t.approx_equal(
        "parse_ratio(\"1/3\")",
        parse_ratio("1/3").unwrap_or(f64::NAN),
        "1.0 / 3.0",
        1.0 / 3.0,
    )?;

    t.message("malformed input");
    t.throws("parse_ratio(\"3\")", || parse_ratio("3"))?;
    t.throws_with("parse_ratio(text)", || parse_ratio("x/2"), "text", "x/2")?;
    t.throws("parse_ratio(\"1/0\")", || parse_ratio("1/0"))
}

fn test_broken_expectations(t: &mut UnitTestContext<'_>) -> TestFlow {
    t.message("rounding");
    t.equal("(2.5f64).round()", &(2.5f64).round(), "2.0", &2.0f64)?;
    t.is_true_with("0.1 + 0.2 == 0.3", 0.1 + 0.2 == 0.3, "0.1 + 0.2", &(0.1 + 0.2))?;

    t.message("sampled");
    t.repeat(50, |i, lp| {
        lp.is_false("i in 10..=20", (10..=20).contains(&i));
    })
}
