//! FILENAME: core/pivot-engine/src/accumulator.rs
//! Incremental reduction state for one group.

use crate::definition::AggregationType;

/// Accumulator for computing aggregates incrementally.
/// Stores the intermediate state needed for every `AggregationType`.
#[derive(Debug, Clone, Default)]
pub struct AggregateAccumulator {
    pub sum: f64,
    pub count: u64,
    pub min: Option<f64>,
    pub max: Option<f64>,
    /// Sum of squared differences from the mean (Welford's algorithm).
    pub m2: f64,
    pub mean: f64,
}

impl AggregateAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a numeric value to the accumulator.
    pub fn add_number(&mut self, value: f64) {
        self.count += 1;
        self.sum += value;

        self.min = Some(self.min.map_or(value, |m| m.min(value)));
        self.max = Some(self.max.map_or(value, |m| m.max(value)));

        // Welford's algorithm for variance
        let delta = value - self.mean;
        self.mean += delta / (self.count as f64);
        let delta2 = value - self.mean;
        self.m2 += delta * delta2;
    }

    /// Computes the final aggregate value.
    /// Groups that saw no numbers yield 0 for every reduction.
    pub fn compute(&self, aggregation: AggregationType) -> f64 {
        match aggregation {
            AggregationType::Sum => self.sum,
            AggregationType::Count => self.count as f64,
            AggregationType::Average => {
                if self.count > 0 {
                    self.sum / (self.count as f64)
                } else {
                    0.0
                }
            }
            AggregationType::Min => self.min.unwrap_or(0.0),
            AggregationType::Max => self.max.unwrap_or(0.0),
            AggregationType::Var => {
                if self.count > 1 {
                    self.m2 / ((self.count - 1) as f64)
                } else {
                    0.0
                }
            }
            AggregationType::StdDev => {
                if self.count > 1 {
                    (self.m2 / ((self.count - 1) as f64)).sqrt()
                } else {
                    0.0
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(values: &[f64]) -> AggregateAccumulator {
        let mut acc = AggregateAccumulator::new();
        for v in values {
            acc.add_number(*v);
        }
        acc
    }

    #[test]
    fn test_basic_reductions() {
        let acc = filled(&[2.0, 4.0, 9.0]);
        assert_eq!(acc.compute(AggregationType::Sum), 15.0);
        assert_eq!(acc.compute(AggregationType::Count), 3.0);
        assert_eq!(acc.compute(AggregationType::Average), 5.0);
        assert_eq!(acc.compute(AggregationType::Min), 2.0);
        assert_eq!(acc.compute(AggregationType::Max), 9.0);
    }

    #[test]
    fn test_sample_variance() {
        let acc = filled(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        let var = acc.compute(AggregationType::Var);
        assert!((var - 32.0 / 7.0).abs() < 1e-12);
        let sd = acc.compute(AggregationType::StdDev);
        assert!((sd - (32.0f64 / 7.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_empty_group_yields_zero() {
        let acc = AggregateAccumulator::new();
        assert_eq!(acc.compute(AggregationType::Average), 0.0);
        assert_eq!(acc.compute(AggregationType::Min), 0.0);
        assert_eq!(acc.compute(AggregationType::StdDev), 0.0);
    }
}
