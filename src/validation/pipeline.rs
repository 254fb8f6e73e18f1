//! Ordered rule-list pipeline
//!
//! A pipeline is a fixed, build-time list of independent rule functions
//! evaluated in order. The first failing rule short-circuits the run;
//! downstream rules never see the input.

use super::ValidationError;

/// A single stateless rule over a borrowed input.
pub type Rule<T> = fn(&T) -> Result<(), ValidationError>;

/// An ordered set of rules applied in sequence with early exit.
pub struct Pipeline<T: ?Sized> {
    rules: Vec<Rule<T>>,
}

impl<T: ?Sized> Pipeline<T> {
    /// Build a pipeline from an ordered rule list.
    pub fn new(rules: Vec<Rule<T>>) -> Self {
        Self { rules }
    }

    /// Run every rule in order; the first `Err` wins.
    pub fn run(&self, input: &T) -> Result<(), ValidationError> {
        for rule in &self.rules {
            rule(input)?;
        }
        Ok(())
    }

    /// Number of rules in the pipeline.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
