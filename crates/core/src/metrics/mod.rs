mod business;

pub use business::{business_metrics, BusinessMetrics, MonthlySignups, SIGNUP_MONTHS};
