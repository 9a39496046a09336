//! Course and lesson models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Course lifecycle status, stored as lowercase text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum CourseStatus {
    Draft,
    Published,
    Archived,
}

impl CourseStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            CourseStatus::Draft => "draft",
            CourseStatus::Published => "published",
            CourseStatus::Archived => "archived",
        }
    }

    pub fn parse(s: &str) -> Option<CourseStatus> {
        match s {
            "draft" => Some(CourseStatus::Draft),
            "published" => Some(CourseStatus::Published),
            "archived" => Some(CourseStatus::Archived),
            _ => None,
        }
    }
}

/// Course row
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Course {
    pub course_id: i64,
    pub title: String,
    pub description: String,
    /// Price in major currency units, e.g. 499.00
    #[schema(value_type = String, example = "499.00")]
    pub price: Decimal,
    pub category: String,
    pub thumbnail: Option<String>,
    pub video: Option<String>,
    pub instructor_id: i64,
    pub status: CourseStatus,
    pub created_at: DateTime<Utc>,
}

/// Catalog entry shown when browsing published courses.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CourseSummary {
    pub course_id: i64,
    pub title: String,
    pub description: String,
    #[schema(value_type = String)]
    pub price: Decimal,
    pub category: String,
    pub thumbnail: Option<String>,
    pub instructor_name: String,
    pub created_at: DateTime<Utc>,
}

/// Lesson row
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Lesson {
    pub lesson_id: i64,
    pub course_id: i64,
    pub title: String,
    pub position: i32,
    pub video_url: String,
    pub duration_minutes: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse() {
        assert_eq!(CourseStatus::parse("published"), Some(CourseStatus::Published));
        assert_eq!(CourseStatus::parse("deleted"), None);
    }

    #[test]
    fn test_status_serde_lowercase() {
        let json = serde_json::to_string(&CourseStatus::Archived).unwrap();
        assert_eq!(json, "\"archived\"");
    }
}
