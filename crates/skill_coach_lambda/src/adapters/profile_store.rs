use std::collections::HashMap;

use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::types::{AttributeValue, ReturnValue};
use chrono::{DateTime, SecondsFormat, Utc};
use skill_coach_core::error::UpstreamError;
use skill_coach_core::profile::{ProfileUpsert, UserSkillProfile};

pub const USER_ID_ATTRIBUTE: &str = "user_id";

// `if_not_exists` keeps the first write's timestamp, so one call covers both
// the insert and the overwrite case.
const UPSERT_EXPRESSION: &str = "SET weak_topics = :weak_topics, \
     strong_topics = :strong_topics, \
     total_solved = :total_solved, \
     updated_at = :written_at, \
     created_at = if_not_exists(created_at, :written_at)";

pub trait ProfileRepository {
    /// Overwrites the record for `upsert.user_id` and returns it as stored.
    fn upsert_profile(&self, upsert: &ProfileUpsert) -> Result<UserSkillProfile, UpstreamError>;

    fn fetch_profile(&self, user_id: &str) -> Result<Option<UserSkillProfile>, UpstreamError>;
}

pub struct DynamoProfileStore {
    table_name: String,
    client: aws_sdk_dynamodb::Client,
}

impl DynamoProfileStore {
    pub fn new(client: aws_sdk_dynamodb::Client, table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            client,
        }
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }
}

impl ProfileRepository for DynamoProfileStore {
    fn upsert_profile(&self, upsert: &ProfileUpsert) -> Result<UserSkillProfile, UpstreamError> {
        let client = self.client.clone();
        let table_name = self.table_name.clone();
        let user_id = upsert.user_id.clone();
        let weak_topics = av_string_list(&upsert.data.weak_topics);
        let strong_topics = av_string_list(&upsert.data.strong_topics);
        let total_solved = av_n(upsert.data.total_solved);
        let written_at = av_timestamp(upsert.written_at);

        let attributes = tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                client
                    .update_item()
                    .table_name(table_name)
                    .key(USER_ID_ATTRIBUTE, av_s(user_id))
                    .update_expression(UPSERT_EXPRESSION)
                    .expression_attribute_values(":weak_topics", weak_topics)
                    .expression_attribute_values(":strong_topics", strong_topics)
                    .expression_attribute_values(":total_solved", total_solved)
                    .expression_attribute_values(":written_at", written_at)
                    .return_values(ReturnValue::AllNew)
                    .send()
                    .await
                    .map(|output| output.attributes)
                    .map_err(|error| {
                        UpstreamError::Store(format!(
                            "update_item on '{}' failed: {}",
                            self.table_name,
                            DisplayErrorContext(&error)
                        ))
                    })
            })
        })?;

        let attributes = attributes.ok_or_else(|| {
            UpstreamError::Store("update_item returned no attributes".to_string())
        })?;
        decode_profile_item(&attributes)
    }

    fn fetch_profile(&self, user_id: &str) -> Result<Option<UserSkillProfile>, UpstreamError> {
        let client = self.client.clone();
        let table_name = self.table_name.clone();
        let key = av_s(user_id);

        let item = tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                client
                    .get_item()
                    .table_name(table_name)
                    .key(USER_ID_ATTRIBUTE, key)
                    .consistent_read(true)
                    .send()
                    .await
                    .map(|output| output.item)
                    .map_err(|error| {
                        UpstreamError::Store(format!(
                            "get_item on '{}' failed: {}",
                            self.table_name,
                            DisplayErrorContext(&error)
                        ))
                    })
            })
        })?;

        item.as_ref().map(decode_profile_item).transpose()
    }
}

pub fn decode_profile_item(
    item: &HashMap<String, AttributeValue>,
) -> Result<UserSkillProfile, UpstreamError> {
    Ok(UserSkillProfile {
        user_id: extract_string(item, USER_ID_ATTRIBUTE)
            .ok_or_else(|| malformed_item(USER_ID_ATTRIBUTE))?,
        weak_topics: extract_string_list(item, "weak_topics")
            .ok_or_else(|| malformed_item("weak_topics"))?,
        strong_topics: extract_string_list(item, "strong_topics").unwrap_or_default(),
        total_solved: extract_number(item, "total_solved")
            .ok_or_else(|| malformed_item("total_solved"))?,
        created_at: extract_datetime(item, "created_at")
            .ok_or_else(|| malformed_item("created_at"))?,
        updated_at: extract_datetime(item, "updated_at")
            .ok_or_else(|| malformed_item("updated_at"))?,
    })
}

pub fn encode_profile_item(profile: &UserSkillProfile) -> HashMap<String, AttributeValue> {
    HashMap::from([
        (USER_ID_ATTRIBUTE.to_string(), av_s(&profile.user_id)),
        ("weak_topics".to_string(), av_string_list(&profile.weak_topics)),
        ("strong_topics".to_string(), av_string_list(&profile.strong_topics)),
        ("total_solved".to_string(), av_n(profile.total_solved)),
        ("created_at".to_string(), av_timestamp(profile.created_at)),
        ("updated_at".to_string(), av_timestamp(profile.updated_at)),
    ])
}

fn malformed_item(attribute: &str) -> UpstreamError {
    UpstreamError::Store(format!(
        "stored profile item has a missing or invalid '{attribute}' attribute"
    ))
}

fn av_s(s: impl Into<String>) -> AttributeValue {
    AttributeValue::S(s.into())
}

fn av_n(n: impl ToString) -> AttributeValue {
    AttributeValue::N(n.to_string())
}

// Lists rather than string sets: sets cannot be empty and lose ordering.
fn av_string_list(values: &[String]) -> AttributeValue {
    AttributeValue::L(values.iter().map(av_s).collect())
}

fn av_timestamp(at: DateTime<Utc>) -> AttributeValue {
    av_s(at.to_rfc3339_opts(SecondsFormat::Micros, true))
}

fn extract_string(item: &HashMap<String, AttributeValue>, key: &str) -> Option<String> {
    item.get(key).and_then(|v| v.as_s().ok()).cloned()
}

fn extract_number(item: &HashMap<String, AttributeValue>, key: &str) -> Option<u64> {
    item.get(key)
        .and_then(|v| v.as_n().ok())
        .and_then(|s| s.parse::<u64>().ok())
}

fn extract_string_list(item: &HashMap<String, AttributeValue>, key: &str) -> Option<Vec<String>> {
    item.get(key)
        .and_then(|v| v.as_l().ok())
        .and_then(|values| {
            values
                .iter()
                .map(|value| value.as_s().ok().cloned())
                .collect::<Option<Vec<_>>>()
        })
}

fn extract_datetime(item: &HashMap<String, AttributeValue>, key: &str) -> Option<DateTime<Utc>> {
    extract_string(item, key)
        .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use aws_sdk_dynamodb::operation::get_item::GetItemOutput;
    use aws_sdk_dynamodb::operation::update_item::{UpdateItemError, UpdateItemOutput};
    use aws_sdk_dynamodb::types::error::ResourceNotFoundException;
    use aws_smithy_mocks::{mock, mock_client};
    use chrono::TimeZone;
    use skill_coach_core::profile::ProfileData;

    use super::*;

    const TABLE: &str = "UserSkillProfiles";

    fn sample_profile() -> UserSkillProfile {
        UserSkillProfile {
            user_id: "user-42".to_string(),
            weak_topics: vec!["Graphs".to_string(), "Dynamic Programming".to_string()],
            strong_topics: Vec::new(),
            total_solved: 150,
            created_at: Utc.with_ymd_and_hms(2026, 1, 5, 9, 30, 0).unwrap(),
            updated_at: Utc.with_ymd_and_hms(2026, 2, 14, 18, 0, 0).unwrap(),
        }
    }

    #[test]
    fn item_codec_preserves_every_field() {
        let profile = sample_profile();
        let item = encode_profile_item(&profile);
        assert_eq!(decode_profile_item(&item).expect("item should decode"), profile);
    }

    #[test]
    fn topics_are_stored_as_ordered_lists() {
        let item = encode_profile_item(&sample_profile());
        let weak = item["weak_topics"].as_l().expect("weak_topics should be a list");
        assert_eq!(weak[0].as_s().unwrap(), "Graphs");
        assert_eq!(weak[1].as_s().unwrap(), "Dynamic Programming");
        assert!(item["strong_topics"].as_l().unwrap().is_empty());
    }

    #[test]
    fn missing_strong_topics_defaults_to_empty() {
        let mut item = encode_profile_item(&sample_profile());
        item.remove("strong_topics");
        let decoded = decode_profile_item(&item).expect("item should decode");
        assert!(decoded.strong_topics.is_empty());
    }

    #[test]
    fn malformed_item_reports_attribute_name() {
        let mut item = encode_profile_item(&sample_profile());
        item.insert("total_solved".to_string(), av_s("many"));
        let error = decode_profile_item(&item).expect_err("should fail");
        assert!(error.to_string().contains("'total_solved'"));
    }

    #[test]
    fn timestamps_use_fixed_width_utc_format() {
        let item = encode_profile_item(&sample_profile());
        assert_eq!(
            item["created_at"].as_s().unwrap(),
            "2026-01-05T09:30:00.000000Z"
        );
    }

    fn upsert_for(profile: &UserSkillProfile) -> ProfileUpsert {
        ProfileUpsert {
            user_id: profile.user_id.clone(),
            data: ProfileData {
                weak_topics: profile.weak_topics.clone(),
                strong_topics: profile.strong_topics.clone(),
                total_solved: profile.total_solved,
            },
            written_at: profile.updated_at,
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn upsert_keeps_created_at_through_if_not_exists() {
        assert!(UPSERT_EXPRESSION.contains("created_at = if_not_exists(created_at, :written_at)"));
        assert!(!UPSERT_EXPRESSION.contains("created_at = :written_at"));

        let stored = sample_profile();
        let returned_item = encode_profile_item(&stored);
        let update = mock!(aws_sdk_dynamodb::Client::update_item)
            .match_requests(|input| {
                let values = input.expression_attribute_values().cloned().unwrap_or_default();
                input.table_name() == Some(TABLE)
                    && input.key().and_then(|key| key.get(USER_ID_ATTRIBUTE))
                        == Some(&AttributeValue::S("user-42".to_string()))
                    && input.update_expression() == Some(UPSERT_EXPRESSION)
                    && input.return_values() == Some(&ReturnValue::AllNew)
                    && values.get(":written_at")
                        == Some(&AttributeValue::S("2026-02-14T18:00:00.000000Z".to_string()))
                    && values.get(":total_solved") == Some(&AttributeValue::N("150".to_string()))
                    && !values.contains_key(":created_at")
            })
            .then_output(move || {
                UpdateItemOutput::builder()
                    .set_attributes(Some(returned_item.clone()))
                    .build()
            });
        let store = DynamoProfileStore::new(mock_client!(aws_sdk_dynamodb, [&update]), TABLE);

        let profile = store
            .upsert_profile(&upsert_for(&stored))
            .expect("upsert should succeed");

        assert_eq!(update.num_calls(), 1);
        assert_eq!(profile, stored);
        assert!(profile.created_at < profile.updated_at);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn upsert_without_returned_attributes_is_a_store_error() {
        let update = mock!(aws_sdk_dynamodb::Client::update_item)
            .then_output(|| UpdateItemOutput::builder().build());
        let store = DynamoProfileStore::new(mock_client!(aws_sdk_dynamodb, [&update]), TABLE);

        let error = store
            .upsert_profile(&upsert_for(&sample_profile()))
            .expect_err("missing attributes should fail");

        assert!(matches!(error, UpstreamError::Store(_)));
        assert!(error.to_string().contains("no attributes"));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn upsert_service_error_names_the_table() {
        let update = mock!(aws_sdk_dynamodb::Client::update_item).then_error(|| {
            UpdateItemError::ResourceNotFoundException(
                ResourceNotFoundException::builder()
                    .message("Requested resource not found")
                    .build(),
            )
        });
        let store = DynamoProfileStore::new(mock_client!(aws_sdk_dynamodb, [&update]), TABLE);

        let error = store
            .upsert_profile(&upsert_for(&sample_profile()))
            .expect_err("service error should surface");

        assert!(matches!(error, UpstreamError::Store(_)));
        assert!(error.to_string().contains(TABLE));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn fetch_decodes_item_with_consistent_read() {
        let stored = sample_profile();
        let item = encode_profile_item(&stored);
        let get = mock!(aws_sdk_dynamodb::Client::get_item)
            .match_requests(|input| {
                input.table_name() == Some(TABLE)
                    && input.consistent_read() == Some(true)
                    && input.key().and_then(|key| key.get(USER_ID_ATTRIBUTE))
                        == Some(&AttributeValue::S("user-42".to_string()))
            })
            .then_output(move || GetItemOutput::builder().set_item(Some(item.clone())).build());
        let store = DynamoProfileStore::new(mock_client!(aws_sdk_dynamodb, [&get]), TABLE);

        let profile = store.fetch_profile("user-42").expect("read should succeed");

        assert_eq!(get.num_calls(), 1);
        assert_eq!(profile, Some(stored));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn fetch_without_item_is_none() {
        let get = mock!(aws_sdk_dynamodb::Client::get_item)
            .then_output(|| GetItemOutput::builder().build());
        let store = DynamoProfileStore::new(mock_client!(aws_sdk_dynamodb, [&get]), TABLE);

        assert_eq!(store.fetch_profile("ghost").expect("read should succeed"), None);
        assert_eq!(get.num_calls(), 1);
    }
}
