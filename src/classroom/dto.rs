use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListCoursesResponse {
    #[serde(default)]
    pub courses: Vec<Course>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTopicsResponse {
    #[serde(default)]
    pub topic: Vec<Topic>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Course {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    pub topic_id: String,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct CreateTopicRequest<'a> {
    pub name: &'a str,
}

/// Request body for `courses.courseWork.create`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseWork {
    pub title: String,
    pub description: String,
    pub state: String,
    pub due_date: Date,
    pub due_time: TimeOfDay,
    pub max_points: f64,
    pub work_type: String,
    pub topic_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Date {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

/// `hours` is signed: the fixed due-time shift can push it below zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeOfDay {
    pub hours: i32,
    pub minutes: i32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedCourseWork {
    pub id: String,
}

/// A list response that may continue on another page.
pub trait Paged {
    type Item;

    fn into_parts(self) -> (Vec<Self::Item>, Option<String>);
}

impl Paged for ListCoursesResponse {
    type Item = Course;

    fn into_parts(self) -> (Vec<Course>, Option<String>) {
        (self.courses, self.next_page_token)
    }
}

impl Paged for ListTopicsResponse {
    type Item = Topic;

    fn into_parts(self) -> (Vec<Topic>, Option<String>) {
        (self.topic, self.next_page_token)
    }
}
