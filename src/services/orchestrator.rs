use std::path::PathBuf;

use chrono::{NaiveDate, Timelike};
use tracing::info;

use crate::cache::{CatalogCache, CatalogKind};
use crate::classroom::ClassroomClient;
use crate::config::AppConfig;
use crate::error::AppError;
use crate::models::{CourseworkCatalog, CourseworkDefinition, Schedule};
use crate::services::clock::Clock;
use crate::services::coursework_builder;
use crate::services::schedule_resolver::{ResolvedSlot, resolve_slot};

/// Everything decided from local files before any remote call.
#[derive(Debug, Clone)]
pub struct Plan {
    pub today: NaiveDate,
    pub course: String,
    pub topic: String,
    pub slot: String,
    pub definitions: Vec<CourseworkDefinition>,
}

#[derive(Debug)]
pub struct SubmissionStats {
    pub course_id: String,
    pub topic_id: String,
    pub topic_created: bool,
    pub submitted: usize,
}

pub struct Orchestrator {
    schedules_path: PathBuf,
    course_works_path: PathBuf,
    cache: CatalogCache,
}

impl Orchestrator {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            schedules_path: config.schedules_path(),
            course_works_path: config.course_works_path(),
            cache: CatalogCache::new(config.cache_dir()),
        }
    }

    /// Works out what to submit at the clock's current local time.
    /// `Ok(None)` means nothing is scheduled for this date and time slot.
    pub async fn plan(&self, clock: &dyn Clock) -> Result<Option<Plan>, AppError> {
        let now = clock.now();
        let today = now.date();
        let schedule = Schedule::load(&self.schedules_path).await?;

        let Some(ResolvedSlot { topic, slot }) = resolve_slot(&schedule, today, now.hour()) else {
            info!("Nothing scheduled for {} at {:02}:00", today, now.hour());
            return Ok(None);
        };
        info!("Scheduled for {}: topic '{}', slot '{}'", today, topic, slot);

        let catalog = CourseworkCatalog::load(&self.course_works_path).await?;
        let definitions = catalog.definitions_for(&topic, &slot)?.to_vec();

        Ok(Some(Plan {
            today,
            course: schedule.course,
            topic,
            slot,
            definitions,
        }))
    }

    /// Resolves the course and topic, then creates each coursework item in
    /// order. Items created before a failing call stay created.
    pub async fn submit(
        &self,
        client: &dyn ClassroomClient,
        plan: &Plan,
    ) -> Result<SubmissionStats, AppError> {
        let course_id = self
            .cache
            .resolve_id(client, CatalogKind::Course, &plan.course)
            .await?
            .ok_or_else(|| AppError::CourseNotFound(plan.course.clone()))?;
        info!("Course '{}' -> {}", plan.course, course_id);

        let topic_kind = CatalogKind::Topic {
            course_id: &course_id,
        };
        let (topic_id, topic_created) = match self.cache.resolve_id(client, topic_kind, &plan.topic).await? {
            Some(id) => (id, false),
            None => {
                let topic = client.create_topic(&course_id, &plan.topic).await?;
                info!("Created topic '{}' -> {}", plan.topic, topic.topic_id);
                (topic.topic_id, true)
            }
        };

        let requests = coursework_builder::build_requests(&plan.definitions, plan.today, &topic_id)?;

        let mut submitted = 0;
        for request in &requests {
            let created = client.create_coursework(&course_id, request).await?;
            info!("Created coursework '{}' -> {}", request.title, created.id);
            submitted += 1;
        }

        let stats = SubmissionStats {
            course_id,
            topic_id,
            topic_created,
            submitted,
        };
        info!("Submission completed: {:?}", stats);
        Ok(stats)
    }
}
