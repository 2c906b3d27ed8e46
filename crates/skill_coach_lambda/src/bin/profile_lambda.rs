use chrono::Utc;
use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;
use skill_coach_core::envelope::HandlerResponse;
use skill_coach_lambda::adapters::profile_store::DynamoProfileStore;
use skill_coach_lambda::config::ProfileStoreConfig;
use skill_coach_lambda::handlers::profile::handle_profile_event;
use skill_coach_lambda::handlers::Invocation;
use skill_coach_lambda::logging::{init_logging, log_info};

async fn handle_request(
    event: LambdaEvent<Value>,
    store: &DynamoProfileStore,
) -> Result<HandlerResponse, Error> {
    let invocation = Invocation::new(event.context.request_id.clone(), Utc::now());
    Ok(handle_profile_event(event.payload, store, &invocation))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    init_logging();

    let config = ProfileStoreConfig::from_env();
    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let store = DynamoProfileStore::new(
        aws_sdk_dynamodb::Client::new(&aws_config),
        config.table_name,
    );

    log_info(
        "profile_lambda",
        "cold_start",
        serde_json::json!({ "table_name": store.table_name() }),
    );

    let store = &store;
    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| async move {
        handle_request(event, store).await
    }))
    .await
}
