use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::AppError;
use crate::store;

pub const DEFAULT_MAX_POINTS: f64 = 100.0;
pub const DEFAULT_WORK_TYPE: &str = "ASSIGNMENT";

/// One entry of `courseWorks.json[topic][slot]`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseworkDefinition {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub max_points: Option<f64>,
    #[serde(default)]
    pub work_type: Option<String>,
    #[serde(default)]
    pub due_days: Option<i64>,
    #[serde(default)]
    pub due_time: Option<DueTimeSpec>,
}

/// Due time as written in the definitions file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct DueTimeSpec {
    pub h: i32,
    pub m: i32,
}

/// `courseWorks.json`: topic name -> slot key -> ordered definitions.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct CourseworkCatalog(HashMap<String, HashMap<String, Vec<CourseworkDefinition>>>);

impl CourseworkCatalog {
    pub async fn load(path: &Path) -> Result<Self, AppError> {
        let catalog: Self = store::read_json(path).await?;
        catalog
            .validate()
            .map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))?;
        Ok(catalog)
    }

    pub fn definitions_for(&self, topic: &str, slot: &str) -> Result<&[CourseworkDefinition], AppError> {
        self.0
            .get(topic)
            .and_then(|slots| slots.get(slot))
            .map(Vec::as_slice)
            .ok_or_else(|| AppError::MissingCoursework {
                topic: topic.to_string(),
                slot: slot.to_string(),
            })
    }

    fn validate(&self) -> Result<(), String> {
        for (topic, slots) in &self.0 {
            for (slot, definitions) in slots {
                for (i, def) in definitions.iter().enumerate() {
                    def.validate()
                        .map_err(|e| format!("{}/{}[{}]: {}", topic, slot, i, e))?;
                }
            }
        }
        Ok(())
    }
}

impl CourseworkDefinition {
    fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("title is empty".to_string());
        }
        if let Some(t) = self.due_time {
            if !(0..24).contains(&t.h) || !(0..60).contains(&t.m) {
                return Err(format!("dueTime {{h:{}, m:{}}} is out of range", t.h, t.m));
            }
        }
        Ok(())
    }
}
