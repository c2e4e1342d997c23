//! How a timing value is extracted from the standard output of a
//! benchmarked executable.

use std::num::ParseFloatError;

use crate::task::Category;

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum TimingParseError {
    #[error("the program produced no output")]
    NoOutput,
    #[error("timing line {line:?} is not a floating point number: {error}")]
    NotANumber {
        line: String,
        error: ParseFloatError,
    },
    #[error("timing value {0} is not a finite number")]
    NotFinite(f64),
    #[error("timing value {0} is negative")]
    Negative(f64),
}

/// Where the timing value is located in the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputContract {
    /// The whole output (modulo surrounding whitespace) is the number
    WholeOutput,
    /// Diagnostic lines may come first, the last line that isn't
    /// blank holds the number
    LastNonEmptyLine,
}

impl OutputContract {
    pub fn for_category(category: Category) -> Self {
        match category {
            Category::Simple => OutputContract::WholeOutput,
            Category::OpenMp | Category::Mpi => OutputContract::LastNonEmptyLine,
        }
    }

    /// Returns the time in seconds.
    pub fn parse(self, output: &str) -> Result<f64, TimingParseError> {
        let line = match self {
            OutputContract::WholeOutput => output.trim(),
            OutputContract::LastNonEmptyLine => output
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .last()
                .unwrap_or(""),
        };
        if line.is_empty() {
            return Err(TimingParseError::NoOutput);
        }
        let value: f64 = line.parse().map_err(|error| TimingParseError::NotANumber {
            line: line.to_owned(),
            error,
        })?;
        if !value.is_finite() {
            Err(TimingParseError::NotFinite(value))
        } else if value < 0. {
            Err(TimingParseError::Negative(value))
        } else {
            Ok(value)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use OutputContract::*;

    #[test]
    fn t_whole_output() {
        assert_eq!(WholeOutput.parse("1.25\n"), Ok(1.25));
        assert_eq!(WholeOutput.parse("  3e-2 "), Ok(0.03));
        assert_eq!(WholeOutput.parse(""), Err(TimingParseError::NoOutput));
        assert!(matches!(
            WholeOutput.parse("starting\n1.0\n"),
            Err(TimingParseError::NotANumber { .. })
        ));
    }

    #[test]
    fn t_last_non_empty_line() {
        assert_eq!(
            LastNonEmptyLine.parse("threads: 4\nchecksum 1234\n0.5\n"),
            Ok(0.5)
        );
        // Trailing whitespace of any length is tolerated
        assert_eq!(LastNonEmptyLine.parse("0.5\n\n  \n"), Ok(0.5));
        assert_eq!(LastNonEmptyLine.parse("0.5"), Ok(0.5));
        assert_eq!(LastNonEmptyLine.parse("\n\n"), Err(TimingParseError::NoOutput));
    }

    #[test]
    fn t_rejects_garbage() {
        let err = LastNonEmptyLine.parse("0.5\nSegmentation fault\n").unwrap_err();
        assert_eq!(
            err.to_string(),
            "timing line \"Segmentation fault\" is not a floating point number: \
             invalid float literal"
        );
        assert_eq!(
            LastNonEmptyLine.parse("inf\n"),
            Err(TimingParseError::NotFinite(f64::INFINITY))
        );
        assert_eq!(
            LastNonEmptyLine.parse("-1\n"),
            Err(TimingParseError::Negative(-1.))
        );
        assert!(matches!(
            LastNonEmptyLine.parse("NaN\n"),
            Err(TimingParseError::NotFinite(_))
        ));
    }

    #[test]
    fn t_for_category() {
        assert_eq!(OutputContract::for_category(Category::Simple), WholeOutput);
        assert_eq!(OutputContract::for_category(Category::Mpi), LastNonEmptyLine);
    }
}
