use num_enum::{IntoPrimitive, TryFromPrimitive};
use strum_macros::{Display, EnumIter};

//=====================================================================
// How a variable is stored: as is, or as its natural logarithm.
//=====================================================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Processing {
    Lin,
    Log,
}

impl Processing {
    #[inline(always)]
    fn process(self, value: f64) -> f64 {
        match self {
            Processing::Lin => value,
            Processing::Log => value.ln(),
        }
    }

    #[inline(always)]
    fn recover(self, value: f64) -> f64 {
        match self {
            Processing::Lin => value,
            Processing::Log => value.exp(),
        }
    }

    #[inline(always)]
    fn is_in_valid_range(self, value: f64) -> bool {
        match self {
            Processing::Lin => value.is_finite(),
            Processing::Log => value > 0.0 && value.is_finite(),
        }
    }
}

//=====================================================================
// Interpolation policies, named dependent-then-independent like the
// ENDF interpolation laws they share codes with (LinLog is linear in y
// and logarithmic in x).
//=====================================================================
#[repr(u8)]
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, TryFromPrimitive, IntoPrimitive,
)]
pub enum InterpolationPolicy {
    LinLin = 2,
    LinLog = 3,
    LogLin = 4,
    LogLog = 5,
}

impl InterpolationPolicy {
    pub fn from_processing(dep: Processing, indep: Processing) -> Self {
        match (dep, indep) {
            (Processing::Lin, Processing::Lin) => InterpolationPolicy::LinLin,
            (Processing::Lin, Processing::Log) => InterpolationPolicy::LinLog,
            (Processing::Log, Processing::Lin) => InterpolationPolicy::LogLin,
            (Processing::Log, Processing::Log) => InterpolationPolicy::LogLog,
        }
    }

    #[inline(always)]
    pub fn dep_processing(&self) -> Processing {
        match self {
            InterpolationPolicy::LinLin | InterpolationPolicy::LinLog => Processing::Lin,
            InterpolationPolicy::LogLin | InterpolationPolicy::LogLog => Processing::Log,
        }
    }

    #[inline(always)]
    pub fn indep_processing(&self) -> Processing {
        match self {
            InterpolationPolicy::LinLin | InterpolationPolicy::LogLin => Processing::Lin,
            InterpolationPolicy::LinLog | InterpolationPolicy::LogLog => Processing::Log,
        }
    }

    // Same dependent treatment, linear independent variable
    pub fn with_lin_indep(&self) -> Self {
        Self::from_processing(self.dep_processing(), Processing::Lin)
    }

    // Linear dependent variable, same independent treatment
    pub fn with_lin_dep(&self) -> Self {
        Self::from_processing(Processing::Lin, self.indep_processing())
    }

    #[inline(always)]
    pub fn process_indep_var(&self, x: f64) -> f64 {
        self.indep_processing().process(x)
    }

    #[inline(always)]
    pub fn process_dep_var(&self, y: f64) -> f64 {
        self.dep_processing().process(y)
    }

    #[inline(always)]
    pub fn recover_processed_indep_var(&self, processed_x: f64) -> f64 {
        self.indep_processing().recover(processed_x)
    }

    #[inline(always)]
    pub fn recover_processed_dep_var(&self, processed_y: f64) -> f64 {
        self.dep_processing().recover(processed_y)
    }

    pub fn is_indep_var_in_valid_range(&self, x: f64) -> bool {
        self.indep_processing().is_in_valid_range(x)
    }

    pub fn is_dep_var_in_valid_range(&self, y: f64) -> bool {
        self.dep_processing().is_in_valid_range(y)
    }

    // Interpolate between (x0, y0) and (x1, y1) using raw values
    #[inline]
    pub fn interpolate(&self, x0: f64, x1: f64, x: f64, y0: f64, y1: f64) -> f64 {
        match self {
            InterpolationPolicy::LinLin => y0 + (y1 - y0) * (x - x0) / (x1 - x0),
            InterpolationPolicy::LinLog => y0 + (y1 - y0) * (x / x0).ln() / (x1 / x0).ln(),
            InterpolationPolicy::LogLin => y0 * (y1 / y0).powf((x - x0) / (x1 - x0)),
            InterpolationPolicy::LogLog => y0 * (y1 / y0).powf((x / x0).ln() / (x1 / x0).ln()),
        }
    }

    // Interpolate from an already processed lower point and slope
    #[inline]
    pub fn interpolate_processed(
        &self,
        processed_x0: f64,
        processed_x: f64,
        processed_y0: f64,
        processed_slope: f64,
    ) -> f64 {
        self.recover_processed_dep_var(processed_y0 + processed_slope * (processed_x - processed_x0))
    }

    // Interpolate, but fall back to a linear treatment of any variable that is
    // exactly zero at either end of the segment and cannot be taken the log of.
    pub fn interpolate_with_zero_fallback(&self, x0: f64, x1: f64, x: f64, y0: f64, y1: f64) -> f64 {
        let mut policy = *self;
        if policy.indep_processing() == Processing::Log && (x0 == 0.0 || x1 == 0.0) {
            policy = policy.with_lin_indep();
        }
        if policy.dep_processing() == Processing::Log && (y0 == 0.0 || y1 == 0.0) {
            policy = policy.with_lin_dep();
        }
        policy.interpolate(x0, x1, x, y0, y1)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn test_endf_codes() {
        assert_eq!(InterpolationPolicy::try_from(2u8).unwrap(), InterpolationPolicy::LinLin);
        assert_eq!(InterpolationPolicy::try_from(3u8).unwrap(), InterpolationPolicy::LinLog);
        assert_eq!(InterpolationPolicy::try_from(4u8).unwrap(), InterpolationPolicy::LogLin);
        assert_eq!(InterpolationPolicy::try_from(5u8).unwrap(), InterpolationPolicy::LogLog);
        // Histogram and Gamow laws have no cross section counterpart here
        assert!(InterpolationPolicy::try_from(1u8).is_err());
        assert!(InterpolationPolicy::try_from(6u8).is_err());
        assert_eq!(u8::from(InterpolationPolicy::LogLog), 5);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", InterpolationPolicy::LinLin), "LinLin");
        assert_eq!(format!("{}", InterpolationPolicy::LogLog), "LogLog");
    }

    #[test]
    fn test_sub_policies() {
        assert_eq!(InterpolationPolicy::LogLog.with_lin_indep(), InterpolationPolicy::LogLin);
        assert_eq!(InterpolationPolicy::LogLog.with_lin_dep(), InterpolationPolicy::LinLog);
        assert_eq!(InterpolationPolicy::LinLog.with_lin_indep(), InterpolationPolicy::LinLin);
        assert_eq!(InterpolationPolicy::LogLin.with_lin_dep(), InterpolationPolicy::LinLin);
    }

    #[test]
    fn test_processing() {
        let policy = InterpolationPolicy::LinLog;
        assert_eq!(policy.process_indep_var(1.0), 0.0);
        assert_eq!(policy.process_dep_var(2.0), 2.0);
        assert_eq!(policy.recover_processed_indep_var(0.0), 1.0);

        let policy = InterpolationPolicy::LogLin;
        assert_eq!(policy.process_indep_var(2.0), 2.0);
        assert_eq!(policy.process_dep_var(1.0), 0.0);
        assert_eq!(policy.recover_processed_dep_var(0.0), 1.0);
    }

    #[test]
    fn test_loglog_round_trip() {
        let policy = InterpolationPolicy::LogLog;
        for x in [1e-11, 1e-5, 0.3, 1.0, 17.0, 1e5] {
            assert_relative_eq!(
                policy.recover_processed_indep_var(policy.process_indep_var(x)),
                x,
                max_relative = 1e-15
            );
        }
    }

    #[test]
    fn test_valid_ranges() {
        assert!(InterpolationPolicy::LogLog.is_indep_var_in_valid_range(1e-300));
        assert!(!InterpolationPolicy::LogLog.is_indep_var_in_valid_range(0.0));
        assert!(!InterpolationPolicy::LogLin.is_dep_var_in_valid_range(-1.0));
        assert!(InterpolationPolicy::LinLin.is_dep_var_in_valid_range(-1.0));
        assert!(!InterpolationPolicy::LinLin.is_dep_var_in_valid_range(f64::INFINITY));
    }

    #[test]
    fn test_interpolate() {
        let result = InterpolationPolicy::LinLin.interpolate(1.0, 2.0, 1.5, 2.0, 4.0);
        assert_eq!(result, 3.0);
        let result = InterpolationPolicy::LinLog.interpolate(1.0, 2.0, 1.5, 2.0, 5.0);
        assert!((result - 3.754888).abs() < 1e-5);
        let result = InterpolationPolicy::LogLin.interpolate(1.0, 2.0, 1.5, 2.0, 5.0);
        assert!((result - 3.162278).abs() < 1e-5);
        let result = InterpolationPolicy::LogLog.interpolate(1.0, 2.0, 1.5, 2.0, 5.0);
        assert!((result - 3.418298).abs() < 1e-5);
        let result = InterpolationPolicy::LogLog.interpolate(2.0, 3.0, 2.5, 5.0, 10.0);
        assert!((result - 7.322152).abs() < 1e-5);
    }

    #[test]
    fn test_processed_matches_raw() {
        for policy in InterpolationPolicy::iter() {
            let (x0, x1, y0, y1) = (2.0, 8.0, 3.0, 12.0);
            let processed_slope = (policy.process_dep_var(y1) - policy.process_dep_var(y0))
                / (policy.process_indep_var(x1) - policy.process_indep_var(x0));
            let processed = policy.interpolate_processed(
                policy.process_indep_var(x0),
                policy.process_indep_var(5.0),
                policy.process_dep_var(y0),
                processed_slope,
            );
            assert_relative_eq!(processed, policy.interpolate(x0, x1, 5.0, y0, y1), max_relative = 1e-12);
        }
    }

    #[test]
    fn test_zero_fallback() {
        // log(0) would poison the result without the fallback
        let result = InterpolationPolicy::LogLog.interpolate_with_zero_fallback(1.0, 2.0, 1.5, 0.0, 4.0);
        assert!(result.is_finite());
        assert!((result - 4.0 * (1.5f64).ln() / (2.0f64).ln()).abs() < 1e-12);

        let result = InterpolationPolicy::LogLog.interpolate_with_zero_fallback(0.0, 2.0, 1.0, 2.0, 8.0);
        assert!((result - 4.0).abs() < 1e-12);
    }
}
