use chrono::TimeDelta;

quantity!(Hours, f64, "h");
quantity!(Days, f64, "d");

impl From<TimeDelta> for Hours {
    fn from(time_delta: TimeDelta) -> Self {
        Self(time_delta.as_seconds_f64() / 3600.0)
    }
}

impl From<TimeDelta> for Days {
    fn from(time_delta: TimeDelta) -> Self {
        Self(time_delta.as_seconds_f64() / 86400.0)
    }
}

impl Days {
    pub const fn years(self) -> f64 {
        self.0 / 365.0
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn test_from_time_delta() {
        assert_abs_diff_eq!(Hours::from(TimeDelta::minutes(90)).0, 1.5);
        assert_abs_diff_eq!(Days::from(TimeDelta::hours(36)).0, 1.5);
    }

    #[test]
    fn test_years() {
        assert_abs_diff_eq!(Days(730.0).years(), 2.0);
    }
}
