use std::str::FromStr;

use sqlx::types::Uuid;

use crate::errors::ApiError;

/// Mean of the ratings rounded to one decimal place, half away from zero.
/// A course with no reviews scores 0.
pub fn average_rating(ratings: &[i32]) -> f64 {
    if ratings.is_empty() {
        return 0.0;
    }
    let mean = ratings.iter().map(|r| f64::from(*r)).sum::<f64>() / ratings.len() as f64;
    (mean * 10.0).round() / 10.0
}

/// Sum of lecture durations in seconds. Zero-length lectures contribute
/// zero; they are never skipped.
pub fn total_duration(durations: impl IntoIterator<Item = i32>) -> i64 {
    durations.into_iter().map(i64::from).sum()
}

/// Whether the viewer may see a lecture's video reference: the course's
/// instructor, an enrolled user, or anyone for a preview lecture.
pub fn can_view_video(is_instructor: bool, is_enrolled: bool, is_preview: bool) -> bool {
    is_instructor || is_enrolled || is_preview
}

pub fn parse_uuid(value: &str, what: &'static str) -> Result<Uuid, ApiError> {
    Uuid::from_str(value).map_err(|_e| ApiError::Validation(format!("invalid {what}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_reviews_means_zero() {
        assert_eq!(average_rating(&[]), 0.0);
    }

    #[test]
    fn average_is_rounded_to_one_decimal() {
        assert_eq!(average_rating(&[4, 5]), 4.5);
        assert_eq!(average_rating(&[4, 4, 5]), 4.3);
        assert_eq!(average_rating(&[5, 5, 5]), 5.0);
        assert_eq!(average_rating(&[0, 1]), 0.5);
    }

    #[test]
    fn half_rounds_away_from_zero() {
        // mean 0.25 -> 2.5 on the x10 scale -> rounds up, not to even
        assert_eq!(average_rating(&[0, 0, 0, 1]), 0.3);
        // mean 4.75 -> 47.5 -> 4.8
        assert_eq!(average_rating(&[4, 5, 5, 5]), 4.8);
    }

    #[test]
    fn durations_sum_across_all_lectures() {
        assert_eq!(total_duration([600, 300]), 900);
        assert_eq!(total_duration([]), 0);
    }

    #[test]
    fn zero_duration_lectures_still_count() {
        assert_eq!(total_duration([600, 0, 300]), 900);
        assert_eq!(total_duration([0, 0]), 0);
    }

    #[test]
    fn video_visibility_truth_table() {
        assert!(can_view_video(true, false, false));
        assert!(can_view_video(false, true, false));
        assert!(can_view_video(false, false, true));
        assert!(can_view_video(true, true, true));
        assert!(!can_view_video(false, false, false));
    }

    #[test]
    fn bad_uuid_is_a_validation_error() {
        assert!(parse_uuid("not-a-uuid", "course id").is_err());
        assert!(parse_uuid("0be0e9e4-9af3-4a8b-9d1b-6a3f3a1c2d4e", "course id").is_ok());
    }
}
