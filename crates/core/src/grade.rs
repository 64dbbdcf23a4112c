//! Comment grade rules.
//!
//! `movies.average_grade` is computed by the `trg_comments_average_grade`
//! trigger, not here.

use std::borrow::Cow;

use validator::ValidationError;

/// Lowest grade a comment may carry.
pub const MIN_GRADE: f64 = 1.0;

/// Highest grade a comment may carry.
pub const MAX_GRADE: f64 = 5.0;

/// `validator` hook: grade must lie in `[1.0, 5.0]` with at most one decimal.
///
/// Takes the value itself: validator passes `Copy` fields by value.
pub fn validate_grade(grade: f64) -> Result<(), ValidationError> {
    if !grade.is_finite() || !(MIN_GRADE..=MAX_GRADE).contains(&grade) {
        let mut err = ValidationError::new("grade_range");
        err.message = Some(Cow::from("The grade field must be between 1.0 and 5.0."));
        return Err(err);
    }
    if (grade * 10.0 - (grade * 10.0).round()).abs() > 1e-9 {
        let mut err = ValidationError::new("grade_precision");
        err.message = Some(Cow::from(
            "The grade field accepts at most one decimal place.",
        ));
        return Err(err);
    }
    Ok(())
}
