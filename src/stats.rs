//! Small descriptive statistics shared by the pipeline stages.

/// Arithmetic mean; `0.0` for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation (denominator `n`); `0.0` for an empty slice.
pub fn population_std(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    var.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_of_values() {
        assert!((mean(&[1.0, 2.0, 3.0, 6.0]) - 3.0).abs() < 1e-12);
    }

    #[test]
    fn population_std_uses_n() {
        // deviations: -2, 0, 2 -> var = 8/3
        let s = population_std(&[1.0, 3.0, 5.0]);
        assert!((s - (8.0_f64 / 3.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn empty_inputs_are_zero() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(population_std(&[]), 0.0);
    }

    #[test]
    fn constant_series_has_zero_std() {
        assert_eq!(population_std(&[4.0; 10]), 0.0);
    }
}
