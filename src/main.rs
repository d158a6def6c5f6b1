use classhard::auth::Authenticator;
use classhard::classroom::ClassroomHttpClient;
use classhard::config::AppConfig;
use classhard::services::{Orchestrator, SystemClock};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "classhard=info".to_string()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = AppConfig::new_from_env()?;
    let orchestrator = Orchestrator::new(&config);

    if let Some(plan) = orchestrator.plan(&SystemClock).await? {
        let authenticator = Authenticator::from_config(&config).await?;
        let access_token = authenticator.access_token().await?;
        let client = ClassroomHttpClient::new(config.api_base.clone(), access_token)?;

        let stats = orchestrator.submit(&client, &plan).await?;
        info!(
            "Submitted {} coursework to course {} (topic {})",
            stats.submitted, stats.course_id, stats.topic_id
        );
    }

    println!();
    Ok(())
}
