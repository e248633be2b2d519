use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::Serialize;
use shoe_recommendation_service::{
    models::{EventType, UserId},
    services::{
        recommendation_log::JsonLinesLogStore, PersonalizedServices, Recommendation,
    },
    Config, Dataset, DatasetInsights, RecommendationPipeline,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const INSIGHTS_TOP_K: usize = 5;

#[derive(Debug, Serialize)]
struct EventReport {
    event: EventType,
    recommendations: BTreeMap<UserId, Vec<Recommendation>>,
}

#[derive(Debug, Serialize)]
struct ModelSummary {
    generation: u64,
    trained_at: DateTime<Utc>,
    users: usize,
    shoes: usize,
    latent_dim: usize,
    vocabulary_version: u32,
    final_loss: Option<f32>,
}

#[derive(Debug, Serialize)]
struct Report {
    service: String,
    generated_at: DateTime<Utc>,
    model: ModelSummary,
    insights: DatasetInsights,
    recommendations: BTreeMap<UserId, Vec<Recommendation>>,
    event: Option<EventReport>,
    personalized_services: PersonalizedServices,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    // Load config
    let config = Config::from_env().context("Failed to load config")?;
    config.validate()?;

    info!(
        "Starting {} with data from {}",
        config.service.service_name,
        config.service.data_dir.display()
    );

    let dataset = Arc::new(Dataset::load_dir(&config.service.data_dir)?);
    let store = JsonLinesLogStore::open(&config.service.log_path)
        .context("Failed to open recommendation log")?;

    let pipeline = Arc::new(RecommendationPipeline::new(
        config.training.clone(),
        config.weights.clone(),
        config.rules.clone(),
        store,
    ));

    // Training is CPU bound; keep it off the async workers
    let generation = {
        let pipeline = Arc::clone(&pipeline);
        let dataset = Arc::clone(&dataset);
        tokio::task::spawn_blocking(move || pipeline.train(&dataset))
            .await
            .context("Training task panicked")??
    };

    let snapshot = pipeline
        .models()
        .current()
        .context("No model published after training")?;

    let now = Utc::now();
    let catalog = dataset.catalog();

    let mut recommendations = BTreeMap::new();
    for user in catalog.users() {
        let served = pipeline.recommend(catalog, user, config.service.top_n, now)?;
        recommendations.insert(user.user_id, served);
    }

    let event = match config.event()? {
        Some(event) => {
            let mut per_user = BTreeMap::new();
            for user in catalog.users() {
                match pipeline.recommend_for_event(catalog, user, event, config.service.top_n, now) {
                    Ok(served) => {
                        per_user.insert(user.user_id, served);
                    }
                    Err(e) => warn!(user_id = user.user_id, error = %e, "Event recommendation failed"),
                }
            }
            Some(EventReport {
                event,
                recommendations: per_user,
            })
        }
        None => None,
    };

    let report = Report {
        service: config.service.service_name.clone(),
        generated_at: now,
        model: ModelSummary {
            generation,
            trained_at: snapshot.model.trained_at(),
            users: snapshot.model.user_count(),
            shoes: snapshot.model.item_count(),
            latent_dim: snapshot.model.latent_dim(),
            vocabulary_version: snapshot.model.vocabulary_version(),
            final_loss: snapshot.model.epoch_losses().last().copied(),
        },
        insights: DatasetInsights::compute(&dataset, INSIGHTS_TOP_K),
        recommendations,
        event,
        personalized_services: pipeline.personalized_services(&dataset, config.service.weather, now),
    };

    println!("{}", serde_json::to_string_pretty(&report)?);

    info!(
        users = catalog.user_count(),
        generation = generation,
        "Recommendation run complete"
    );

    Ok(())
}
