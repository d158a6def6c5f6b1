#![allow(dead_code)]

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use classhard::classroom::{ClassroomClient, dto};
use classhard::error::AppError;

/// In-memory classroom that records every call it receives.
#[derive(Default)]
pub struct RecordingClient {
    pub courses: Vec<dto::Course>,
    pub topics: HashMap<String, Vec<dto::Topic>>,
    /// Fail the n-th (0-based) coursework creation.
    pub fail_coursework_at: Option<usize>,
    pub calls: Mutex<Vec<String>>,
    pub created: Mutex<Vec<(String, dto::CourseWork)>>,
}

impl RecordingClient {
    pub fn with_courses(courses: &[(&str, &str)]) -> Self {
        Self {
            courses: courses
                .iter()
                .map(|(id, name)| dto::Course {
                    id: id.to_string(),
                    name: name.to_string(),
                })
                .collect(),
            ..Default::default()
        }
    }

    pub fn with_topics(mut self, course_id: &str, topics: &[(&str, &str)]) -> Self {
        self.topics.insert(
            course_id.to_string(),
            topics
                .iter()
                .map(|(id, name)| dto::Topic {
                    topic_id: id.to_string(),
                    name: name.to_string(),
                })
                .collect(),
        );
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn created(&self) -> Vec<(String, dto::CourseWork)> {
        self.created.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl ClassroomClient for RecordingClient {
    async fn list_courses(&self) -> Result<Vec<dto::Course>, AppError> {
        self.record("list_courses".to_string());
        Ok(self.courses.clone())
    }

    async fn list_topics(&self, course_id: &str) -> Result<Vec<dto::Topic>, AppError> {
        self.record(format!("list_topics {}", course_id));
        Ok(self.topics.get(course_id).cloned().unwrap_or_default())
    }

    async fn create_topic(&self, course_id: &str, name: &str) -> Result<dto::Topic, AppError> {
        self.record(format!("create_topic {} {}", course_id, name));
        Ok(dto::Topic {
            topic_id: format!("new-{}", name),
            name: name.to_string(),
        })
    }

    async fn create_coursework(
        &self,
        course_id: &str,
        body: &dto::CourseWork,
    ) -> Result<dto::CreatedCourseWork, AppError> {
        self.record(format!("create_coursework {} {}", course_id, body.title));
        let mut created = self.created.lock().unwrap();
        if self.fail_coursework_at == Some(created.len()) {
            return Err(AppError::Remote {
                status: 500,
                body: "backend error".to_string(),
            });
        }
        created.push((course_id.to_string(), body.clone()));
        Ok(dto::CreatedCourseWork {
            id: format!("cw-{}", created.len()),
        })
    }
}

pub fn write(dir: &Path, name: &str, contents: &str) {
    std::fs::write(dir.join(name), contents).unwrap();
}

pub fn read_json(dir: &Path, name: &str) -> serde_json::Value {
    serde_json::from_str(&std::fs::read_to_string(dir.join(name)).unwrap()).unwrap()
}
