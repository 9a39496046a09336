//! Progress arithmetic, recomputed on every mutation.

/// Progress percentage = completed / total, rounded to nearest integer.
/// A course with zero lessons reports 0%.
pub fn progress_pct(completed: usize, total: usize) -> i32 {
    if total == 0 {
        return 0;
    }
    ((completed as f64 / total as f64) * 100.0).round() as i32
}

/// Dashboard learning hours: half an hour per completed lesson, rounded.
pub fn learning_hours(completed_lessons: usize) -> i64 {
    ((completed_lessons as f64) * 0.5).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_half_complete() {
        assert_eq!(progress_pct(2, 4), 50);
    }

    #[test]
    fn test_fully_complete() {
        assert_eq!(progress_pct(4, 4), 100);
    }

    #[test]
    fn test_zero_lessons_no_division_error() {
        assert_eq!(progress_pct(0, 0), 0);
        assert_eq!(progress_pct(3, 0), 0);
    }

    #[test]
    fn test_rounding() {
        assert_eq!(progress_pct(1, 3), 33);
        assert_eq!(progress_pct(2, 3), 67);
    }

    #[test]
    fn test_learning_hours() {
        assert_eq!(learning_hours(0), 0);
        assert_eq!(learning_hours(3), 2); // 1.5h rounds up
        assert_eq!(learning_hours(4), 2);
    }
}
