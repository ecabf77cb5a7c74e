//! Small types and functions exercised by the bundled demonstration suite.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StackError {
    #[error("stack is full (capacity {0})")]
    Full(usize),

    #[error("stack is empty")]
    Empty,
}

/// Fixed-capacity stack of integers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stack {
    items: Vec<i64>,
    capacity: usize,
}

impl Stack {
    pub const DEFAULT_CAPACITY: usize = 8;

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, value: i64) -> Result<(), StackError> {
        if self.items.len() == self.capacity {
            return Err(StackError::Full(self.capacity));
        }
        self.items.push(value);
        Ok(())
    }

    pub fn pop(&mut self) -> Result<i64, StackError> {
        self.items.pop().ok_or(StackError::Empty)
    }

    pub fn peek(&self) -> Option<i64> {
        self.items.last().copied()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for Stack {
    fn default() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }
}

/// Streaming mean and variance (Welford).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
}

impl RunningStats {
    pub fn push(&mut self, x: f64) {
        self.count += 1;
        let delta = x - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (x - self.mean);
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Population variance; zero until two samples were pushed.
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / self.count as f64
        }
    }
}

pub fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        let r = a % b;
        a = b;
        b = r;
    }
    a
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RatioError {
    #[error("missing '/' in '{0}'")]
    MissingSlash(String),

    #[error("invalid number '{0}'")]
    InvalidNumber(String),

    #[error("zero denominator")]
    ZeroDenominator,
}

/// Parse `"num/den"` into its quotient.
pub fn parse_ratio(text: &str) -> Result<f64, RatioError> {
    let (num, den) = text
        .split_once('/')
        .ok_or_else(|| RatioError::MissingSlash(text.to_string()))?;
    let num: f64 = num
        .trim()
        .parse()
        .map_err(|_| RatioError::InvalidNumber(num.trim().to_string()))?;
    let den: f64 = den
        .trim()
        .parse()
        .map_err(|_| RatioError::InvalidNumber(den.trim().to_string()))?;
    if den == 0.0 {
        return Err(RatioError::ZeroDenominator);
    }
    Ok(num / den)
}
