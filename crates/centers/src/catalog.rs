//! Read-only donation center catalog.
//!
//! The catalog is built once at startup, either from the built-in centers or
//! from a JSON array of center documents, and is never mutated afterwards.

use crate::model::{DonationCenter, LatestPost};
use opendonate_core::error::{Error, ErrorCode, Result, ResultExt};
use opendonate_core::validation::ValidationResult;
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, warn};

/// Immutable list of centers with unique ids.
#[derive(Debug, Clone)]
pub struct Catalog {
    centers: Vec<DonationCenter>,
}

impl Catalog {
    /// Build a catalog, rejecting duplicate ids and invalid records.
    pub fn new(centers: Vec<DonationCenter>) -> Result<Self> {
        let mut report = ValidationResult::new();
        let mut seen = HashSet::new();

        for center in &centers {
            if !seen.insert(center.id.as_str()) {
                return Err(Error::new(
                    ErrorCode::DuplicateId,
                    format!("Duplicate center id: {}", center.id),
                ));
            }
            report.merge(center.validate());
        }

        for warning in report.warnings() {
            warn!(%warning, "Catalog warning");
        }
        report.into_result_with(ErrorCode::MalformedDocument)?;

        Ok(Self { centers })
    }

    /// The centers shipped with the application.
    pub fn builtin() -> Self {
        Self {
            centers: builtin_centers(),
        }
    }

    /// Load a JSON array of center documents.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::from(e).with_context(format!("reading {}", path.display())))?;
        let catalog = Self::from_json(&content)
            .context(format!("catalog {}", path.display()))
            .with_suggestion("Fix the file or unset matching.catalog_path to use the built-in centers")?;
        debug!(path = %path.display(), centers = catalog.len(), "Loaded catalog");
        Ok(catalog)
    }

    /// Parse a JSON array of center documents.
    pub fn from_json(content: &str) -> Result<Self> {
        let centers: Vec<DonationCenter> = serde_json::from_str(content)
            .map_err(|e| Error::new(ErrorCode::MalformedDocument, format!("Invalid catalog: {e}")))?;
        Self::new(centers)
    }

    /// All centers in catalog order
    pub fn centers(&self) -> &[DonationCenter] {
        &self.centers
    }

    /// Center detail lookup
    pub fn find_by_id(&self, id: &str) -> Option<&DonationCenter> {
        self.centers.iter().find(|c| c.id == id)
    }

    pub fn len(&self) -> usize {
        self.centers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.centers.is_empty()
    }
}

#[allow(clippy::too_many_arguments)]
fn center(
    id: &str,
    name: &str,
    address: &str,
    district: &str,
    neighborhood: &str,
    (latitude, longitude): (f64, f64),
    description: &str,
    categories: &[&str],
    latest_post: Option<LatestPost>,
) -> DonationCenter {
    DonationCenter {
        id: id.to_string(),
        name: name.to_string(),
        address: address.to_string(),
        district: district.to_string(),
        neighborhood: neighborhood.to_string(),
        latitude,
        longitude,
        description: description.to_string(),
        image_url: format!("/images/center{id}.jpg"),
        categories: categories.iter().map(|c| (*c).to_string()).collect(),
        latest_post,
    }
}

fn post(title: &str, content: &str, date: &str, is_new: bool) -> Option<LatestPost> {
    Some(LatestPost {
        title: title.to_string(),
        content: content.to_string(),
        date: date.to_string(),
        is_new,
    })
}

fn builtin_centers() -> Vec<DonationCenter> {
    vec![
        center(
            "1",
            "강남구 사회복지관",
            "서울특별시 강남구 역삼동 123-45",
            "강남구",
            "역삼동",
            (37.5665, 127.0018),
            "강남구 지역 주민을 위한 복지 서비스",
            &["아동/청소년", "어르신", "가족"],
            post(
                "2024년 1월 기부 현황 보고",
                "이번 달에는 총 150명의 어린이들이 따뜻한 겨울을 보낼 수 있도록 도움을 받았습니다.",
                "2024-01-15",
                true,
            ),
        ),
        center(
            "2",
            "서초구 기부센터",
            "서울특별시 서초구 서초동 456-78",
            "서초구",
            "서초동",
            (37.4837, 127.0324),
            "서초구 지역 기부 활동 지원",
            &["지구촌", "환경"],
            post(
                "환경 보호 캠페인 성과",
                "지구촌 환경 보호를 위한 나무 심기 캠페인이 성공적으로 완료되었습니다.",
                "2024-01-10",
                false,
            ),
        ),
        center(
            "3",
            "마포구 후원센터",
            "서울특별시 마포구 합정동 789-12",
            "마포구",
            "합정동",
            (37.5492, 126.9136),
            "마포구 지역 후원 활동",
            &["장애인", "동물"],
            post(
                "반려동물 입양 성사",
                "이번 주에 5마리의 반려동물이 새로운 가족을 찾았습니다.",
                "2024-01-18",
                true,
            ),
        ),
        center(
            "4",
            "종로구 기부센터",
            "서울특별시 종로구 종로1가 1-1",
            "종로구",
            "종로1가",
            (37.5704, 126.991),
            "종로구 지역 기부 활동",
            &["기타"],
            None,
        ),
        center(
            "5",
            "북구 사회복지관",
            "광주광역시 북구 용봉동 123-45",
            "북구",
            "용봉동",
            (35.1595, 126.8526),
            "북구 지역 주민을 위한 복지 서비스",
            &["아동/청소년", "어르신"],
            post(
                "어르신 봉사활동 후기",
                "지난 주에 진행된 어르신 봉사활동에서 많은 분들이 감사 인사를 전해주셨습니다.",
                "2024-01-20",
                true,
            ),
        ),
        center(
            "6",
            "북구 기부센터",
            "광주광역시 북구 운암동 456-78",
            "북구",
            "운암동",
            (35.1689, 126.8723),
            "북구 지역 기부 활동 지원",
            &["가족", "환경"],
            post(
                "가족 지원 프로그램 안내",
                "새로운 가족 지원 프로그램이 시작되었습니다. 많은 관심 부탁드립니다.",
                "2024-01-12",
                false,
            ),
        ),
    ]
}
