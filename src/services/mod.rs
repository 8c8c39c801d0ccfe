pub mod event_service;
pub mod order_service;
pub mod product_service;
pub mod ticket_service;

pub use event_service::*;
pub use order_service::*;
pub use product_service::*;
pub use ticket_service::*;

use crate::error::{AppError, AppResult};

/// Point lookups read LIMIT 2 so that a second row hiding behind a unique
/// constraint is detected instead of silently picking one.
pub(crate) fn expect_single_row<T>(mut rows: Vec<T>, description: &str) -> AppResult<T> {
    if rows.len() > 1 {
        return Err(AppError::DataIntegrityFault(format!(
            "multiple rows match {description}"
        )));
    }
    rows.pop()
        .ok_or_else(|| AppError::NotFound(description.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expect_single_row_outcomes() {
        assert_eq!(expect_single_row(vec![7], "x").unwrap(), 7);
        assert!(matches!(
            expect_single_row(Vec::<i64>::new(), "x"),
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            expect_single_row(vec![1, 2], "x"),
            Err(AppError::DataIntegrityFault(_))
        ));
    }
}
