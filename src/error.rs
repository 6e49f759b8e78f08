use strum_macros::Display;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PlannerError>;

/// Terminal status reported by the solving engine when no solution
/// can be read back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "UPPERCASE")]
pub enum SolverStatus {
    Infeasible,
    Unbounded,
    Error,
}

#[derive(Debug, Error)]
pub enum PlannerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid CSV header: {0}")]
    CsvHeader(String),

    #[error("Invalid CSV row {row}: expected at least {expected} columns, got {got}")]
    CsvRow {
        row: usize,
        expected: usize,
        got: usize,
    },

    #[error("Invalid value '{value}' for column '{field}' at row {row}")]
    FieldParse {
        row: usize,
        field: &'static str,
        value: String,
        #[source]
        source: std::num::ParseFloatError,
    },

    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error("Model construction error: {0}")]
    Model(String),

    #[error("Solver returned {status}: {message}")]
    Solver {
        status: SolverStatus,
        message: String,
    },

    #[error("Solution extraction error: {0}")]
    Extraction(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Image(#[from] image::ImageError),
}

impl From<toml::de::Error> for PlannerError {
    fn from(err: toml::de::Error) -> Self {
        PlannerError::Config(format!("TOML parse error: {}", err))
    }
}

impl From<serde_json::Error> for PlannerError {
    fn from(err: serde_json::Error) -> Self {
        PlannerError::Io(std::io::Error::other(format!("JSON error: {}", err)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solver_status_display_is_uppercase() {
        assert_eq!(SolverStatus::Infeasible.to_string(), "INFEASIBLE");
        assert_eq!(SolverStatus::Unbounded.to_string(), "UNBOUNDED");
        assert_eq!(SolverStatus::Error.to_string(), "ERROR");
    }

    #[test]
    fn solver_error_message_carries_status() {
        let err = PlannerError::Solver {
            status: SolverStatus::Infeasible,
            message: "no feasible point".to_string(),
        };
        assert_eq!(err.to_string(), "Solver returned INFEASIBLE: no feasible point");
    }
}
