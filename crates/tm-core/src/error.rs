//! Error types and handling for the indicator library
//!
//! This module defines the `IndicatorError` enum which represents all possible
//! errors an indicator can report. Each indicator validates its inputs before
//! computing anything, so callers receive one of these variants instead of a
//! silently wrong series (NaN, empty output) or a panic.

use std::fmt;

/// Error type for indicator operations
///
/// Strategy pipelines can match on the variant to decide whether to skip,
/// backfill, or abort a single indicator without tearing down the rest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndicatorError {
    /// Not enough observations for the requested window or period
    InsufficientData {
        /// Required minimum data length
        required: usize,
        /// Actual data length provided
        actual: usize,
    },

    /// Two series that must share a time index have different lengths
    MisalignedInput {
        /// Name of the offending series
        series: String,
        /// Length of the reference series
        expected: usize,
        /// Length of the offending series
        actual: usize,
    },

    /// A ratio whose denominator is zero and no fallback policy applies
    DivisionByZero {
        /// What was being divided
        context: String,
    },

    /// Invalid period parameter (e.g. zero)
    InvalidPeriod {
        /// The invalid period value
        period: usize,
        /// Description of why it's invalid
        reason: String,
    },

    /// Invalid non-period parameter value
    InvalidParameter {
        /// Parameter name
        name: String,
        /// Invalid value (as string for flexible representation)
        value: String,
        /// Expected value description
        expected: String,
    },

    /// Invalid input data (NaN or infinite values)
    InvalidInput {
        /// Description of the invalid input
        message: String,
    },
}

impl IndicatorError {
    /// Creates an InsufficientData error
    ///
    /// # Example
    ///
    /// ```rust
    /// use tm_core::error::IndicatorError;
    ///
    /// let err = IndicatorError::insufficient_data(20, 10);
    /// assert_eq!(err.to_string(), "Insufficient data: required 20 data points, got 10");
    /// ```
    pub fn insufficient_data(required: usize, actual: usize) -> Self {
        IndicatorError::InsufficientData { required, actual }
    }

    /// Creates a MisalignedInput error
    ///
    /// # Example
    ///
    /// ```rust
    /// use tm_core::error::IndicatorError;
    ///
    /// let err = IndicatorError::misaligned_input("volumes", 30, 29);
    /// ```
    pub fn misaligned_input<S: Into<String>>(series: S, expected: usize, actual: usize) -> Self {
        IndicatorError::MisalignedInput {
            series: series.into(),
            expected,
            actual,
        }
    }

    /// Creates a DivisionByZero error
    pub fn division_by_zero<S: Into<String>>(context: S) -> Self {
        IndicatorError::DivisionByZero {
            context: context.into(),
        }
    }

    /// Creates an InvalidPeriod error
    ///
    /// # Example
    ///
    /// ```rust
    /// use tm_core::error::IndicatorError;
    ///
    /// let err = IndicatorError::invalid_period(0, "period must be greater than zero");
    /// ```
    pub fn invalid_period<S: Into<String>>(period: usize, reason: S) -> Self {
        IndicatorError::InvalidPeriod {
            period,
            reason: reason.into(),
        }
    }

    /// Creates an InvalidParameter error
    ///
    /// # Example
    ///
    /// ```rust
    /// use tm_core::error::IndicatorError;
    ///
    /// let err = IndicatorError::invalid_parameter("acceleration", "1.5", "value in (0, max_acceleration]");
    /// ```
    pub fn invalid_parameter<N, V, E>(name: N, value: V, expected: E) -> Self
    where
        N: Into<String>,
        V: Into<String>,
        E: Into<String>,
    {
        IndicatorError::InvalidParameter {
            name: name.into(),
            value: value.into(),
            expected: expected.into(),
        }
    }

    /// Creates an InvalidInput error
    pub fn invalid_input<S: Into<String>>(message: S) -> Self {
        IndicatorError::InvalidInput {
            message: message.into(),
        }
    }
}

impl fmt::Display for IndicatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorError::InsufficientData { required, actual } => {
                write!(
                    f,
                    "Insufficient data: required {} data points, got {}",
                    required, actual
                )
            }
            IndicatorError::MisalignedInput {
                series,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "Misaligned input: '{}' has {} values, expected {}",
                    series, actual, expected
                )
            }
            IndicatorError::DivisionByZero { context } => {
                write!(f, "Division by zero: {}", context)
            }
            IndicatorError::InvalidPeriod { period, reason } => {
                write!(f, "Invalid period {}: {}", period, reason)
            }
            IndicatorError::InvalidParameter {
                name,
                value,
                expected,
            } => {
                write!(
                    f,
                    "Invalid parameter '{}': got '{}', expected {}",
                    name, value, expected
                )
            }
            IndicatorError::InvalidInput { message } => {
                write!(f, "Invalid input: {}", message)
            }
        }
    }
}

impl std::error::Error for IndicatorError {}

/// Result type alias for indicator operations
pub type Result<T> = core::result::Result<T, IndicatorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_data_message_format() {
        let err = IndicatorError::InsufficientData {
            required: 100,
            actual: 42,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient data: required 100 data points, got 42"
        );
    }

    #[test]
    fn test_misaligned_input_message_format() {
        let err = IndicatorError::misaligned_input("volumes", 10, 9);
        assert_eq!(
            err.to_string(),
            "Misaligned input: 'volumes' has 9 values, expected 10"
        );
    }

    #[test]
    fn test_division_by_zero_message_format() {
        let err = IndicatorError::division_by_zero("average loss is zero");
        assert_eq!(err.to_string(), "Division by zero: average loss is zero");
    }

    #[test]
    fn test_invalid_period_creation() {
        let err = IndicatorError::invalid_period(0, "must be positive");
        assert_eq!(err.to_string(), "Invalid period 0: must be positive");
    }

    #[test]
    fn test_invalid_parameter_creation() {
        let err = IndicatorError::invalid_parameter("alpha", "1.5", "value in [0.0, 1.0]");
        assert_eq!(
            err.to_string(),
            "Invalid parameter 'alpha': got '1.5', expected value in [0.0, 1.0]"
        );
    }

    #[test]
    fn test_convenience_methods_create_correct_variants() {
        assert!(matches!(
            IndicatorError::insufficient_data(10, 5),
            IndicatorError::InsufficientData { .. }
        ));
        assert!(matches!(
            IndicatorError::misaligned_input("lows", 3, 2),
            IndicatorError::MisalignedInput { .. }
        ));
        assert!(matches!(
            IndicatorError::division_by_zero("rs"),
            IndicatorError::DivisionByZero { .. }
        ));
        assert!(matches!(
            IndicatorError::invalid_input("NaN value"),
            IndicatorError::InvalidInput { .. }
        ));
    }

    #[test]
    fn test_question_mark_operator() {
        fn inner() -> Result<()> {
            Err(IndicatorError::insufficient_data(3, 1))
        }

        fn outer() -> Result<()> {
            inner()?;
            Ok(())
        }

        assert_eq!(outer(), Err(IndicatorError::insufficient_data(3, 1)));
    }

    #[test]
    fn test_boxes_into_std_error() {
        let boxed: Box<dyn std::error::Error> = Box::new(IndicatorError::invalid_input("x"));
        assert_eq!(boxed.to_string(), "Invalid input: x");
    }
}
