use serde::{Deserialize, Serialize};

use crate::classroom::dto;

/// One row of `courses.json` or `topics-<courseId>.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub id: String,
    pub name: String,
}

impl From<dto::Course> for CacheEntry {
    fn from(course: dto::Course) -> Self {
        Self {
            id: course.id,
            name: course.name,
        }
    }
}

impl From<dto::Topic> for CacheEntry {
    fn from(topic: dto::Topic) -> Self {
        Self {
            id: topic.topic_id,
            name: topic.name,
        }
    }
}
