//! Request descriptor construction.
//!
//! The endpoint takes two query parameters, `variables` and `features`, each
//! a percent-encoded JSON object. Key order in both objects is fixed so the
//! encoded URL is byte-stable for a given cursor.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::model::Cursor;

pub const DEFAULT_ENDPOINT: &str = "https://x.com/i/api/graphql/OSXFkKmGvfw_6pGgGtkWFg/Followers";

/// Followers requested per page.
pub const PAGE_SIZE: u32 = 20;

/// Feature flags sent with every request, in serialization order.
pub const FEATURE_FLAGS: [(&str, bool); 23] = [
    ("articles_preview_enabled", true),
    ("c9s_tweet_anatomy_moderator_badge_enabled", true),
    ("communities_web_enable_tweet_community_results_fetch", true),
    ("creator_subscriptions_quote_tweet_preview_enabled", false),
    ("creator_subscriptions_tweet_preview_api_enabled", true),
    ("freedom_of_speech_not_reach_fetch_enabled", true),
    ("graphql_is_translatable_rweb_tweet_is_translatable_enabled", true),
    ("longform_notetweets_consumption_enabled", true),
    ("longform_notetweets_inline_media_enabled", true),
    ("longform_notetweets_rich_text_read_enabled", true),
    ("responsive_web_edit_tweet_api_enabled", true),
    ("responsive_web_enhance_cards_enabled", false),
    ("responsive_web_graphql_exclude_directive_enabled", true),
    ("responsive_web_graphql_skip_user_profile_image_extensions_enabled", false),
    ("responsive_web_graphql_timeline_navigation_enabled", true),
    ("responsive_web_twitter_article_tweet_consumption_enabled", true),
    ("rweb_tipjar_consumption_enabled", true),
    ("rweb_video_timestamps_enabled", true),
    ("standardized_nudges_misinfo", true),
    ("tweet_awards_web_tipping_enabled", false),
    ("tweet_with_visibility_results_prefer_gql_limited_actions_policy_enabled", true),
    ("verified_phone_label_enabled", false),
    ("view_counts_everywhere_api_enabled", true),
];

/// Feature flags keyed for serialization. Keys serialize in ascending order
/// regardless of how the map was populated.
pub type Features = BTreeMap<String, bool>;

pub fn default_features() -> Features {
    FEATURE_FLAGS
        .iter()
        .map(|(key, value)| (key.to_string(), *value))
        .collect()
}

/// The `variables` object. Field order here is the wire order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Variables {
    pub user_id: String,
    pub count: u32,
    pub cursor: String,
    pub include_promoted_content: bool,
}

impl Variables {
    pub fn new(user_id: impl Into<String>, cursor: &Cursor) -> Self {
        Self {
            user_id: user_id.into(),
            count: PAGE_SIZE,
            cursor: cursor.token(),
            include_promoted_content: false,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(Error::Query)
    }

    pub fn to_param(&self) -> Result<String> {
        Ok(urlencoding::encode(&self.to_json()?).into_owned())
    }
}

pub fn features_to_param(features: &Features) -> Result<String> {
    let json = serde_json::to_string(features).map_err(Error::Query)?;
    Ok(urlencoding::encode(&json).into_owned())
}

/// Build the full request URL for one page.
pub fn build_url(endpoint: &str, variables: &Variables, features: &Features) -> Result<String> {
    Ok(format!(
        "{}?variables={}&features={}",
        endpoint,
        variables.to_param()?,
        features_to_param(features)?
    ))
}

/// Builds page URLs for a fixed account and endpoint.
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    endpoint: String,
    user_id: String,
    features: Features,
}

impl QueryBuilder {
    pub fn new(endpoint: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            user_id: user_id.into(),
            features: default_features(),
        }
    }

    pub fn variables(&self, cursor: &Cursor) -> Variables {
        Variables::new(self.user_id.clone(), cursor)
    }

    pub fn url(&self, cursor: &Cursor) -> Result<String> {
        build_url(&self.endpoint, &self.variables(cursor), &self.features)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const VARIABLES_PARAM: &str = "%7B%22userId%22%3A%221234567890%22%2C%22count%22%3A20%2C%22cursor%22%3A%221234567891234567890%7C1234567891234567890%22%2C%22includePromotedContent%22%3Afalse%7D";

    const FEATURES_PARAM: &str = "%7B%22articles_preview_enabled%22%3Atrue%2C%22c9s_tweet_anatomy_moderator_badge_enabled%22%3Atrue%2C%22communities_web_enable_tweet_community_results_fetch%22%3Atrue%2C%22creator_subscriptions_quote_tweet_preview_enabled%22%3Afalse%2C%22creator_subscriptions_tweet_preview_api_enabled%22%3Atrue%2C%22freedom_of_speech_not_reach_fetch_enabled%22%3Atrue%2C%22graphql_is_translatable_rweb_tweet_is_translatable_enabled%22%3Atrue%2C%22longform_notetweets_consumption_enabled%22%3Atrue%2C%22longform_notetweets_inline_media_enabled%22%3Atrue%2C%22longform_notetweets_rich_text_read_enabled%22%3Atrue%2C%22responsive_web_edit_tweet_api_enabled%22%3Atrue%2C%22responsive_web_enhance_cards_enabled%22%3Afalse%2C%22responsive_web_graphql_exclude_directive_enabled%22%3Atrue%2C%22responsive_web_graphql_skip_user_profile_image_extensions_enabled%22%3Afalse%2C%22responsive_web_graphql_timeline_navigation_enabled%22%3Atrue%2C%22responsive_web_twitter_article_tweet_consumption_enabled%22%3Atrue%2C%22rweb_tipjar_consumption_enabled%22%3Atrue%2C%22rweb_video_timestamps_enabled%22%3Atrue%2C%22standardized_nudges_misinfo%22%3Atrue%2C%22tweet_awards_web_tipping_enabled%22%3Afalse%2C%22tweet_with_visibility_results_prefer_gql_limited_actions_policy_enabled%22%3Atrue%2C%22verified_phone_label_enabled%22%3Afalse%2C%22view_counts_everywhere_api_enabled%22%3Atrue%7D";

    fn sample_variables() -> Variables {
        Variables {
            user_id: "1234567890".to_string(),
            count: 20,
            cursor: "1234567891234567890|1234567891234567890".to_string(),
            include_promoted_content: false,
        }
    }

    #[test]
    fn test_variables_to_param() {
        assert_eq!(sample_variables().to_param().unwrap(), VARIABLES_PARAM);
    }

    #[test]
    fn test_default_features_to_param() {
        assert_eq!(features_to_param(&default_features()).unwrap(), FEATURES_PARAM);
    }

    #[test]
    fn test_features_insertion_order_is_irrelevant() {
        let reversed: Features = FEATURE_FLAGS
            .iter()
            .rev()
            .map(|(key, value)| (key.to_string(), *value))
            .collect();
        assert_eq!(features_to_param(&reversed).unwrap(), FEATURES_PARAM);
    }

    #[test]
    fn test_build_url_golden() {
        let url = build_url(DEFAULT_ENDPOINT, &sample_variables(), &default_features()).unwrap();
        let expected = format!(
            "https://x.com/i/api/graphql/OSXFkKmGvfw_6pGgGtkWFg/Followers?variables={}&features={}",
            VARIABLES_PARAM, FEATURES_PARAM
        );
        assert_eq!(url, expected);
    }

    #[test]
    fn test_query_builder_is_deterministic() {
        let builder = QueryBuilder::new(DEFAULT_ENDPOINT, "1234567890");
        let cursor = Cursor::new("1234567891234567890", "1234567891234567890");

        let first = builder.url(&cursor).unwrap();
        for _ in 0..5 {
            assert_eq!(builder.url(&cursor).unwrap(), first);
        }
        assert_eq!(builder.variables(&cursor), sample_variables());
        assert!(first.contains(VARIABLES_PARAM));
    }
}
