use aws_sdk_bedrockruntime::config::Region;
use chrono::Utc;
use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;
use skill_coach_core::envelope::HandlerResponse;
use skill_coach_lambda::adapters::text_generation::BedrockTextGenerator;
use skill_coach_lambda::config::RoadmapConfig;
use skill_coach_lambda::handlers::roadmap::handle_roadmap_event;
use skill_coach_lambda::handlers::Invocation;
use skill_coach_lambda::logging::{init_logging, log_info};

struct RuntimeDependencies {
    config: RoadmapConfig,
    generator: BedrockTextGenerator,
}

async fn handle_request(
    event: LambdaEvent<Value>,
    deps: &RuntimeDependencies,
) -> Result<HandlerResponse, Error> {
    let invocation = Invocation::new(event.context.request_id.clone(), Utc::now());
    Ok(handle_roadmap_event(
        event.payload,
        &deps.generator,
        &deps.config.generation,
        &invocation,
    ))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    init_logging();

    let config = RoadmapConfig::from_env()?;
    let aws_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new(config.region.clone()))
        .load()
        .await;
    let deps = RuntimeDependencies {
        generator: BedrockTextGenerator::new(aws_sdk_bedrockruntime::Client::new(&aws_config)),
        config,
    };

    log_info(
        "roadmap_lambda",
        "cold_start",
        serde_json::json!({
            "region": deps.config.region.clone(),
            "model_id": deps.config.generation.model_id.clone(),
            "temperature": deps.config.generation.temperature,
            "max_tokens": deps.config.generation.max_tokens,
        }),
    );

    let deps = &deps;
    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| async move {
        handle_request(event, deps).await
    }))
    .await
}
