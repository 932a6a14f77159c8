//! Shared precondition checks.
//!
//! Every rejection is logged at `debug` before it is returned so a pipeline
//! running many indicators can see which one bailed out and why.

use tracing::debug;

use crate::{Float, IndicatorError, Result};

/// Rejects a zero window/period.
pub(crate) fn period(indicator: &'static str, period: usize) -> Result<()> {
    if period == 0 {
        debug!(indicator, period, "rejected period");
        return Err(IndicatorError::invalid_period(
            period,
            "period must be greater than zero",
        ));
    }
    Ok(())
}

/// Requires at least `required` observations.
pub(crate) fn min_len(indicator: &'static str, required: usize, actual: usize) -> Result<()> {
    if actual < required {
        debug!(indicator, required, actual, "insufficient data");
        return Err(IndicatorError::insufficient_data(required, actual));
    }
    Ok(())
}

/// Requires `series` to have exactly `expected` values.
pub(crate) fn aligned(
    indicator: &'static str,
    series: &'static str,
    expected: usize,
    actual: usize,
) -> Result<()> {
    if expected != actual {
        debug!(indicator, series, expected, actual, "misaligned input");
        return Err(IndicatorError::misaligned_input(series, expected, actual));
    }
    Ok(())
}

/// Rejects NaN and infinite values.
pub(crate) fn finite(indicator: &'static str, series: &'static str, data: &[Float]) -> Result<()> {
    if let Some(index) = data.iter().position(|v| !v.is_finite()) {
        debug!(indicator, series, index, "non-finite input value");
        return Err(IndicatorError::invalid_input(format!(
            "{} contains a non-finite value at index {}",
            series, index
        )));
    }
    Ok(())
}
