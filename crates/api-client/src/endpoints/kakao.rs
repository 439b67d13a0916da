//! Keyword search through the Kakao Local API

use crate::client::GeoClient;
use crate::error::{ApiError, ApiResult};
use async_trait::async_trait;
use opendonate_core::error::ErrorCode;
use opendonate_core::Result;
use opendonate_location::{AddressSearch, PlaceCandidate};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::Deserialize;
use tracing::debug;

/// Keyword search backed by Kakao Local `search/keyword`
#[derive(Clone)]
pub struct KakaoAddressSearch {
    client: GeoClient,
}

/// Keyword search response
#[derive(Debug, Clone, Deserialize)]
pub struct KeywordResponse {
    /// Matching places; absent when nothing matched
    #[serde(default)]
    pub documents: Vec<PlaceCandidate>,
}

impl KakaoAddressSearch {
    pub(crate) fn new(client: GeoClient) -> Self {
        Self { client }
    }

    /// Raw keyword search
    pub async fn keyword(&self, keyword: &str) -> ApiResult<KeywordResponse> {
        let config = self.client.config();
        let key = config
            .kakao_api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(ApiError::MissingApiKey("kakao keyword search"))?;

        let mut headers = HeaderMap::new();
        let auth = HeaderValue::from_str(&format!("KakaoAK {key}"))
            .map_err(|_| ApiError::config("Kakao API key contains invalid header characters"))?;
        headers.insert(AUTHORIZATION, auth);

        let query = [
            ("query", keyword.to_string()),
            ("size", config.search_size.to_string()),
        ];
        self.client.get_json(&config.search_url, &query, headers).await
    }
}

#[async_trait]
impl AddressSearch for KakaoAddressSearch {
    async fn search(&self, keyword: &str) -> Result<Vec<PlaceCandidate>> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Ok(Vec::new());
        }

        let response = self
            .keyword(keyword)
            .await
            .map_err(|e| e.into_service_error(ErrorCode::SearchFailed))?;
        debug!(keyword, results = response.documents.len(), "Keyword search");
        Ok(response.documents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use httpmock::prelude::*;
    use serde_json::json;

    fn search(server: &MockServer, key: Option<&str>) -> KakaoAddressSearch {
        let mut config = ClientConfig::default().with_search_url(server.url("/v2/local/search/keyword.json"));
        config.kakao_api_key = key.map(str::to_string);
        GeoClient::with_config(config).unwrap().address_search()
    }

    #[tokio::test]
    async fn test_keyword_search() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/v2/local/search/keyword.json")
                    .query_param("query", "역삼역")
                    .query_param("size", "10")
                    .header("authorization", "KakaoAK test-key");
                then.status(200).json_body(json!({
                    "meta": {"total_count": 1},
                    "documents": [{
                        "id": "21160803",
                        "place_name": "역삼역 2호선",
                        "address_name": "서울 강남구 역삼동 804",
                        "road_address_name": "서울 강남구 강남대로 지하 396",
                        "category_name": "교통,수송 > 지하철,전철",
                        "distance": "",
                        "phone": "02-6110-2221",
                        "place_url": "http://place.map.kakao.com/21160803",
                        "x": "127.036394",
                        "y": "37.500622"
                    }]
                }));
            })
            .await;

        let results = search(&server, Some("test-key")).search(" 역삼역 ").await.unwrap();

        mock.assert_async().await;
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].place_name, "역삼역 2호선");
        assert_eq!(results[0].y, "37.500622");
    }

    #[tokio::test]
    async fn test_no_documents() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET);
                then.status(200).json_body(json!({"meta": {"total_count": 0}}));
            })
            .await;

        let results = search(&server, Some("k")).search("없는장소").await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_missing_key_makes_no_request() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET);
                then.status(200).json_body(json!({"documents": []}));
            })
            .await;

        let err = search(&server, None).search("역삼역").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigError);
        mock.assert_hits_async(0).await;
    }

    #[tokio::test]
    async fn test_unauthorized() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET);
                then.status(401).json_body(json!({"errorType": "AccessDeniedError"}));
            })
            .await;

        let err = search(&server, Some("bad")).search("역삼역").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::SearchFailed);
    }
}
