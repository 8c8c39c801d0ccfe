use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sea_orm::DbErr),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Data integrity fault: {0}")]
    DataIntegrityFault(String),

    #[error("Not enough tickets: requested {requested}, could only reserve {reserved}")]
    NotEnoughTickets { requested: u64, reserved: u64 },

    #[error("Shrinking ticket inventory is not implemented: {current} tickets exist, target quota is {target}")]
    UnsupportedShrink { current: i64, target: i64 },
}

impl AppError {
    /// Recoverable errors are expected business outcomes the caller can act
    /// on; everything else indicates a bug or a broken storage substrate.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            AppError::NotFound(_) | AppError::NotEnoughTickets { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recoverable_classification() {
        assert!(
            AppError::NotEnoughTickets {
                requested: 3,
                reserved: 1
            }
            .is_recoverable()
        );
        assert!(AppError::NotFound("events slug='x'".into()).is_recoverable());
        assert!(!AppError::DataIntegrityFault("dup".into()).is_recoverable());
        assert!(
            !AppError::UnsupportedShrink {
                current: 10,
                target: 5
            }
            .is_recoverable()
        );
    }
}
