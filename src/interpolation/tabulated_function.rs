use crate::error::{CollisionError, Result};
use crate::interpolation::InterpolationPolicy;

//=====================================================================
// A single-region y(x) table with one interpolation policy. Used for
// form factors, scattering functions, occupation numbers, cutoff cross
// section ratios and energy losses.
//=====================================================================
#[derive(Debug, Clone, PartialEq)]
pub struct TabulatedFunction {
    x: Vec<f64>,
    y: Vec<f64>,
    policy: InterpolationPolicy,
}

impl TabulatedFunction {
    pub fn new(x: Vec<f64>, y: Vec<f64>, policy: InterpolationPolicy) -> Result<Self> {
        if x.len() != y.len() {
            return Err(CollisionError::configuration(format!(
                "TabulatedFunction: x ({}) and y ({}) vectors must be of the same length",
                x.len(),
                y.len()
            )));
        }
        if x.len() < 2 {
            return Err(CollisionError::configuration(
                "TabulatedFunction: at least two points are required",
            ));
        }
        if x.windows(2).any(|pair| !(pair[0] < pair[1])) {
            return Err(CollisionError::configuration(
                "TabulatedFunction: x values must be strictly ascending",
            ));
        }
        // Zeros are tolerated at the ends of a segment, everything else must be
        // representable by the policy
        let bad_x = x.iter().any(|&v| v != 0.0 && !policy.is_indep_var_in_valid_range(v));
        let bad_y = y.iter().any(|&v| v != 0.0 && !policy.is_dep_var_in_valid_range(v));
        if bad_x || bad_y {
            return Err(CollisionError::configuration(format!(
                "TabulatedFunction: values outside of the valid range for {} interpolation",
                policy
            )));
        }
        Ok(Self { x, y, policy })
    }

    pub fn x(&self) -> &[f64] {
        &self.x
    }

    pub fn y(&self) -> &[f64] {
        &self.y
    }

    pub fn policy(&self) -> InterpolationPolicy {
        self.policy
    }

    pub fn lower_bound(&self) -> f64 {
        self.x[0]
    }

    pub fn upper_bound(&self) -> f64 {
        self.x[self.x.len() - 1]
    }

    pub fn is_within_bounds(&self, x_val: f64) -> bool {
        self.lower_bound() <= x_val && x_val <= self.upper_bound()
    }

    // Evaluate the table, failing outside of its bounds
    pub fn evaluate(&self, x_val: f64) -> Result<f64> {
        if !self.is_within_bounds(x_val) {
            return Err(CollisionError::OutOfBounds {
                value: x_val,
                lower: self.lower_bound(),
                upper: self.upper_bound(),
            });
        }
        Ok(self.evaluate_in_bounds(x_val))
    }

    // Evaluate the table, holding the end values outside of its bounds
    pub fn evaluate_clamped(&self, x_val: f64) -> f64 {
        if x_val <= self.lower_bound() {
            self.y[0]
        } else if x_val >= self.upper_bound() {
            self.y[self.y.len() - 1]
        } else {
            self.evaluate_in_bounds(x_val)
        }
    }

    fn evaluate_in_bounds(&self, x_val: f64) -> f64 {
        // Index of the first point above x_val
        let upper = self.x.partition_point(|&x| x <= x_val);
        // We are exactly on a data point, exit early by returning the value
        if upper > 0 && self.x[upper - 1] == x_val {
            return self.y[upper - 1];
        }
        let idx = upper - 1;
        self.policy.interpolate_with_zero_fallback(
            self.x[idx],
            self.x[idx + 1],
            x_val,
            self.y[idx],
            self.y[idx + 1],
        )
    }
}

//=====================================================================
// A lin-lin tabulated pdf with its running (unnormalized) integral.
// Sampling inverts the quadratic cdf of each linear pdf segment.
//=====================================================================
#[derive(Debug, Clone, PartialEq)]
pub struct TabularDistribution {
    x: Vec<f64>,
    pdf: Vec<f64>,
    cdf: Vec<f64>,
    slope: Vec<f64>,
}

impl TabularDistribution {
    pub fn new(x: Vec<f64>, pdf: Vec<f64>) -> Result<Self> {
        if x.len() != pdf.len() || x.len() < 2 {
            return Err(CollisionError::configuration(format!(
                "TabularDistribution: need matching x ({}) and pdf ({}) vectors with at least two points",
                x.len(),
                pdf.len()
            )));
        }
        if x.windows(2).any(|pair| !(pair[0] < pair[1])) {
            return Err(CollisionError::configuration(
                "TabularDistribution: x values must be strictly ascending",
            ));
        }
        if pdf.iter().any(|&p| !(p >= 0.0) || !p.is_finite()) {
            return Err(CollisionError::configuration(
                "TabularDistribution: pdf values must be finite and non-negative",
            ));
        }

        let mut cdf = Vec::with_capacity(x.len());
        let mut slope = Vec::with_capacity(x.len());
        cdf.push(0.0);
        for i in 0..x.len() - 1 {
            let dx = x[i + 1] - x[i];
            cdf.push(cdf[i] + dx * (pdf[i] + pdf[i + 1]) / 2.0);
            slope.push((pdf[i + 1] - pdf[i]) / dx);
        }
        slope.push(0.0);

        if !(cdf[cdf.len() - 1] > 0.0) {
            return Err(CollisionError::configuration(
                "TabularDistribution: the pdf integrates to zero",
            ));
        }
        Ok(Self { x, pdf, cdf, slope })
    }

    pub fn x(&self) -> &[f64] {
        &self.x
    }

    pub fn pdf_values(&self) -> &[f64] {
        &self.pdf
    }

    pub fn lower_bound(&self) -> f64 {
        self.x[0]
    }

    pub fn upper_bound(&self) -> f64 {
        self.x[self.x.len() - 1]
    }

    // Integral of the pdf over the whole table
    pub fn total(&self) -> f64 {
        self.cdf[self.cdf.len() - 1]
    }

    fn lower_bin(&self, x_val: f64) -> usize {
        self.x.partition_point(|&x| x <= x_val).clamp(1, self.x.len() - 1) - 1
    }

    // Unnormalized pdf, zero outside of the table
    pub fn evaluate(&self, x_val: f64) -> f64 {
        if x_val < self.lower_bound() || x_val > self.upper_bound() {
            return 0.0;
        }
        let i = self.lower_bin(x_val);
        self.pdf[i] + self.slope[i] * (x_val - self.x[i])
    }

    // Unnormalized cdf
    pub fn evaluate_cdf(&self, x_val: f64) -> f64 {
        if x_val <= self.lower_bound() {
            return 0.0;
        }
        if x_val >= self.upper_bound() {
            return self.total();
        }
        let i = self.lower_bin(x_val);
        let dx = x_val - self.x[i];
        self.cdf[i] + dx * self.pdf[i] + dx * dx * self.slope[i] / 2.0
    }

    // Find x such that the unnormalized cdf equals `target`
    pub fn sample_unnormalized(&self, target: f64) -> f64 {
        let target = target.clamp(0.0, self.total());
        let i = self.cdf.partition_point(|&c| c < target).clamp(1, self.cdf.len() - 1) - 1;
        let diff = target - self.cdf[i];
        let x0 = self.x[i];
        let pdf0 = self.pdf[i];
        let slope = self.slope[i];

        let x = if slope != 0.0 {
            let discriminant = (pdf0 * pdf0 + 2.0 * slope * diff).max(0.0);
            x0 + (discriminant.sqrt() - pdf0) / slope
        } else if pdf0 > 0.0 {
            x0 + diff / pdf0
        } else {
            x0
        };
        x.clamp(x0, self.x[i + 1])
    }

    // Sample with a random number in [0, 1] scaled by the integral up to
    // `max_x` (the whole table when max_x is past its end)
    pub fn sample_in_subrange(&self, random_number: f64, max_x: f64) -> f64 {
        self.sample_unnormalized(random_number * self.evaluate_cdf(max_x))
    }

    pub fn sample(&self, random_number: f64) -> f64 {
        self.sample_unnormalized(random_number * self.total())
    }
}

#[cfg(test)]
mod tests {
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    use super::*;

    #[test]
    fn test_linlin_evaluate() {
        let table =
            TabulatedFunction::new(vec![1.0, 2.0, 3.0], vec![2.0, 4.0, 6.0], InterpolationPolicy::LinLin)
                .unwrap();
        assert_eq!(table.evaluate(1.0).unwrap(), 2.0);
        assert_eq!(table.evaluate(1.5).unwrap(), 3.0);
        assert_eq!(table.evaluate(2.0).unwrap(), 4.0);
        assert_eq!(table.evaluate(2.5).unwrap(), 5.0);
        assert_eq!(table.evaluate(3.0).unwrap(), 6.0);
        assert!(table.evaluate(3.1).is_err());
        assert_eq!(table.evaluate_clamped(3.1), 6.0);
        assert_eq!(table.evaluate_clamped(0.1), 2.0);
    }

    #[test]
    fn test_loglog_evaluate() {
        let table = TabulatedFunction::new(
            vec![1.0, 2.0, 3.0],
            vec![2.0, 5.0, 10.0],
            InterpolationPolicy::LogLog,
        )
        .unwrap();
        assert!((table.evaluate(1.5).unwrap() - 3.418298).abs() < 1e-5);
        assert!((table.evaluate(2.5).unwrap() - 7.322152).abs() < 1e-5);
        assert_eq!(table.evaluate(3.0).unwrap(), 10.0);
    }

    #[test]
    fn test_loglog_with_trailing_zero() {
        // Form factors drop to zero at the end of their grids
        let table = TabulatedFunction::new(
            vec![1.0, 2.0, 4.0],
            vec![4.0, 1.0, 0.0],
            InterpolationPolicy::LogLog,
        )
        .unwrap();
        let value = table.evaluate(3.0).unwrap();
        assert!(value.is_finite());
        assert!(value > 0.0 && value < 1.0);
    }

    #[test]
    fn test_invalid_tables() {
        assert!(TabulatedFunction::new(vec![1.0, 2.0], vec![1.0], InterpolationPolicy::LinLin).is_err());
        assert!(TabulatedFunction::new(vec![2.0, 1.0], vec![1.0, 1.0], InterpolationPolicy::LinLin).is_err());
        assert!(TabulatedFunction::new(vec![1.0], vec![1.0], InterpolationPolicy::LinLin).is_err());
        assert!(
            TabulatedFunction::new(vec![-1.0, 1.0], vec![1.0, 1.0], InterpolationPolicy::LogLog).is_err()
        );
    }

    #[test]
    fn test_distribution_cdf() {
        let dist = TabularDistribution::new(vec![0.0, 1.0, 2.0], vec![1.0, 1.0, 3.0]).unwrap();
        assert_eq!(dist.total(), 3.0);
        assert_eq!(dist.evaluate_cdf(0.0), 0.0);
        assert_eq!(dist.evaluate_cdf(1.0), 1.0);
        assert_abs_diff_eq!(dist.evaluate_cdf(1.5), 1.0 + 0.5 + 0.25 * 2.0 / 2.0, epsilon = 1e-14);
        assert_eq!(dist.evaluate_cdf(5.0), 3.0);
        assert_eq!(dist.evaluate(1.5), 2.0);
        assert_eq!(dist.evaluate(2.5), 0.0);
    }

    #[test]
    fn test_distribution_sample_inverts_cdf() {
        let dist = TabularDistribution::new(vec![0.0, 1.0, 2.0], vec![1.0, 1.0, 3.0]).unwrap();
        assert_eq!(dist.sample(0.0), 0.0);
        assert_eq!(dist.sample(1.0), 2.0);
        for rn in [0.1, 0.25, 1.0 / 3.0, 0.5, 0.75, 0.9] {
            let x = dist.sample(rn);
            assert_relative_eq!(dist.evaluate_cdf(x) / dist.total(), rn, max_relative = 1e-12);
        }
    }

    #[test]
    fn test_distribution_subrange() {
        let dist = TabularDistribution::new(vec![0.0, 1.0, 2.0], vec![1.0, 1.0, 3.0]).unwrap();
        // Only the first (flat) bin is available below x = 1
        assert_abs_diff_eq!(dist.sample_in_subrange(0.5, 1.0), 0.5, epsilon = 1e-14);
        assert_abs_diff_eq!(dist.sample_in_subrange(1.0, 1.0), 1.0, epsilon = 1e-14);
    }

    #[test]
    fn test_distribution_rejects_negative_pdf() {
        assert!(TabularDistribution::new(vec![0.0, 1.0], vec![1.0, -1.0]).is_err());
        assert!(TabularDistribution::new(vec![0.0, 1.0], vec![0.0, 0.0]).is_err());
    }
}
