pub mod dto;

use std::future::Future;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::AppError;

use self::dto::Paged;

const PAGE_SIZE: &str = "100";

/// The remote catalog: everything this program asks of the classroom service.
#[async_trait]
pub trait ClassroomClient: Send + Sync {
    async fn list_courses(&self) -> Result<Vec<dto::Course>, AppError>;
    async fn list_topics(&self, course_id: &str) -> Result<Vec<dto::Topic>, AppError>;
    async fn create_topic(&self, course_id: &str, name: &str) -> Result<dto::Topic, AppError>;
    async fn create_coursework(
        &self,
        course_id: &str,
        body: &dto::CourseWork,
    ) -> Result<dto::CreatedCourseWork, AppError>;
}

pub struct ClassroomHttpClient {
    client: Client,
    api_base: String,
    access_token: String,
}

impl ClassroomHttpClient {
    pub fn new(api_base: impl Into<String>, access_token: impl Into<String>) -> Result<Self, AppError> {
        let client = Client::builder().build()?;
        Ok(Self::with_client(client, api_base, access_token))
    }

    pub fn with_client(
        client: Client,
        api_base: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Self {
        Self {
            client,
            api_base: api_base.into(),
            access_token: access_token.into(),
        }
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, AppError> {
        let response = request.bearer_auth(&self.access_token).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Remote {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json::<T>().await?)
    }

    async fn list_all<P>(&self, url: &str) -> Result<Vec<P::Item>, AppError>
    where
        P: Paged + DeserializeOwned,
    {
        collect_pages(|page_token: Option<String>| {
            let mut request = self.client.get(url).query(&[("pageSize", PAGE_SIZE)]);
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token.as_str())]);
            }
            self.send::<P>(request)
        })
        .await
    }
}

/// Calls `fetch` with each successive `nextPageToken` (starting from none)
/// until a page comes back without one, so callers always see the complete
/// listing. An error on any page discards what was collected.
async fn collect_pages<P, F, Fut>(mut fetch: F) -> Result<Vec<P::Item>, AppError>
where
    P: Paged,
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<P, AppError>>,
{
    let mut items = Vec::new();
    let mut page_token: Option<String> = None;

    loop {
        let (mut batch, next) = fetch(page_token.take()).await?.into_parts();
        debug!("page returned {} items", batch.len());
        items.append(&mut batch);

        match next.filter(|t| !t.is_empty()) {
            Some(token) => page_token = Some(token),
            None => break,
        }
    }

    Ok(items)
}

#[async_trait]
impl ClassroomClient for ClassroomHttpClient {
    async fn list_courses(&self) -> Result<Vec<dto::Course>, AppError> {
        let url = format!("{}/courses", self.api_base);
        self.list_all::<dto::ListCoursesResponse>(&url).await
    }

    async fn list_topics(&self, course_id: &str) -> Result<Vec<dto::Topic>, AppError> {
        let url = format!("{}/courses/{}/topics", self.api_base, course_id);
        self.list_all::<dto::ListTopicsResponse>(&url).await
    }

    async fn create_topic(&self, course_id: &str, name: &str) -> Result<dto::Topic, AppError> {
        let url = format!("{}/courses/{}/topics", self.api_base, course_id);
        let request = self.client.post(&url).json(&dto::CreateTopicRequest { name });
        self.send(request).await
    }

    async fn create_coursework(
        &self,
        course_id: &str,
        body: &dto::CourseWork,
    ) -> Result<dto::CreatedCourseWork, AppError> {
        let url = format!("{}/courses/{}/courseWork", self.api_base, course_id);
        let request = self.client.post(&url).json(body);
        self.send(request).await
    }
}
