//! Descriptive statistics for one group of run-time samples: count,
//! mean, sample standard deviation, variance, min, max. Run times are
//! fractional, so everything is f64 based; sample statistics use
//! Bessel's correction and are NaN for a single value, which is the
//! numeric convention the consumers (table, markers) rely on.

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum StatsError {
    #[error("no inputs given")]
    NoInputs,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (n-1 denominator); NaN for count == 1
    pub sd: f64,
    /// `sd` squared
    pub var: f64,
    pub min: f64,
    pub max: f64,
}

impl Summary {
    pub fn from_values(values: &[f64]) -> Result<Self, StatsError> {
        let count = values.len();
        if count == 0 {
            return Err(StatsError::NoInputs);
        }
        let mean = values.iter().sum::<f64>() / count as f64;
        let var = if count >= 2 {
            values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (count - 1) as f64
        } else {
            f64::NAN
        };
        let sd = var.sqrt();
        let (min, max) = values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), v| {
                (min.min(*v), max.max(*v))
            });
        Ok(Summary {
            count,
            mean,
            sd,
            var,
            min,
            max,
        })
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn t_basic() {
        let s = Summary::from_values(&[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(s.count, 3);
        assert_relative_eq!(s.mean, 2.0);
        assert_relative_eq!(s.sd, 1.0);
        assert_relative_eq!(s.var, 1.0);
        assert_relative_eq!(s.min, 1.0);
        assert_relative_eq!(s.max, 3.0);
    }

    #[test]
    fn t_var_is_sd_squared() {
        let s = Summary::from_values(&[23.0, 4.0, 8.0, 30.0, 7.0]).unwrap();
        assert_relative_eq!(s.var, s.sd * s.sd, max_relative = 1e-12);
    }

    #[test]
    fn t_single_sample_is_nan_not_error() {
        let s = Summary::from_values(&[5.5]).unwrap();
        assert_eq!(s.count, 1);
        assert_relative_eq!(s.mean, 5.5);
        assert!(s.sd.is_nan());
        assert!(s.var.is_nan());
        assert_relative_eq!(s.min, 5.5);
        assert_relative_eq!(s.max, 5.5);
    }

    #[test]
    fn t_empty() {
        assert_eq!(Summary::from_values(&[]), Err(StatsError::NoInputs));
    }

    #[test]
    fn t_unsorted_input() {
        let s = Summary::from_values(&[3.0, 1.0, 2.0]).unwrap();
        assert_relative_eq!(s.min, 1.0);
        assert_relative_eq!(s.max, 3.0);
    }
}
