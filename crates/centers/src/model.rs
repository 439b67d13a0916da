//! Center records and donation categories.

use opendonate_core::validation::{ValidationResult, Validator};
use opendonate_geo::{Coordinate, Located};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A donation center. Static reference data, never mutated at runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationCenter {
    /// Unique within a catalog
    pub id: String,
    pub name: String,
    pub address: String,
    /// 구 unit, compared verbatim
    pub district: String,
    /// 동 unit, compared verbatim
    pub neighborhood: String,
    pub latitude: f64,
    pub longitude: f64,
    pub description: String,
    #[serde(default)]
    pub image_url: String,
    /// Category labels, e.g. `아동/청소년`
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub latest_post: Option<LatestPost>,
}

impl DonationCenter {
    /// Position as a coordinate
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }

    /// True if the center lists the category label
    pub fn has_category(&self, category: &str) -> bool {
        self.categories.iter().any(|c| c == category)
    }

    /// Field-level checks applied when a catalog is loaded
    pub fn validate(&self) -> ValidationResult {
        let field = |name: &str| format!("centers[{}].{name}", self.id);

        Validator::new()
            .required(&field("id"), &self.id)
            .required(&field("name"), &self.name)
            .required(&field("district"), &self.district)
            .range(&field("latitude"), self.latitude, -90.0, 90.0)
            .range(&field("longitude"), self.longitude, -180.0, 180.0)
            .warn_if(
                &field("categories"),
                self.categories.is_empty(),
                "Center has no categories and never appears in category browsing",
            )
            .validate()
    }
}

impl Located for DonationCenter {
    fn coordinate(&self) -> Coordinate {
        DonationCenter::coordinate(self)
    }
}

/// Most recent announcement published by a center.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LatestPost {
    pub title: String,
    pub content: String,
    /// `YYYY-MM-DD`
    pub date: String,
    #[serde(default)]
    pub is_new: bool,
}

/// Donation categories used for browsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Children,
    Elderly,
    Family,
    Global,
    Disabled,
    Animals,
    Environment,
    Others,
}

impl Category {
    /// All categories in display order
    pub const ALL: [Category; 8] = [
        Category::Children,
        Category::Elderly,
        Category::Family,
        Category::Global,
        Category::Disabled,
        Category::Animals,
        Category::Environment,
        Category::Others,
    ];

    /// Stable identifier
    pub fn id(self) -> &'static str {
        match self {
            Category::Children => "children",
            Category::Elderly => "elderly",
            Category::Family => "family",
            Category::Global => "global",
            Category::Disabled => "disabled",
            Category::Animals => "animals",
            Category::Environment => "environment",
            Category::Others => "others",
        }
    }

    /// Label stored on center records
    pub fn label(self) -> &'static str {
        match self {
            Category::Children => "아동/청소년",
            Category::Elderly => "어르신",
            Category::Family => "가족",
            Category::Global => "지구촌",
            Category::Disabled => "장애인",
            Category::Animals => "동물",
            Category::Environment => "환경",
            Category::Others => "기타",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Category::Children => "😊",
            Category::Elderly => "👴",
            Category::Family => "👨‍👩‍👧‍👦",
            Category::Global => "🌍",
            Category::Disabled => "♿",
            Category::Animals => "🐱",
            Category::Environment => "🌳",
            Category::Others => "💬",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Category::Children => "어린이와 청소년을 위한 기부",
            Category::Elderly => "노인을 위한 기부",
            Category::Family => "가족을 위한 기부",
            Category::Global => "국제 구호를 위한 기부",
            Category::Disabled => "장애인을 위한 기부",
            Category::Animals => "동물 보호를 위한 기부",
            Category::Environment => "환경 보호를 위한 기부",
            Category::Others => "기타 기부",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = String;

    /// Accepts either the identifier (`children`) or the label (`아동/청소년`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.id().eq_ignore_ascii_case(s) || c.label() == s)
            .ok_or_else(|| format!("unknown category: {s}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_parsing() {
        assert_eq!("children".parse::<Category>().unwrap(), Category::Children);
        assert_eq!("ANIMALS".parse::<Category>().unwrap(), Category::Animals);
        assert_eq!("어르신".parse::<Category>().unwrap(), Category::Elderly);
        assert!("잡화".parse::<Category>().is_err());
    }

    #[test]
    fn test_category_labels_unique() {
        let mut labels: Vec<_> = Category::ALL.iter().map(|c| c.label()).collect();
        labels.sort_unstable();
        labels.dedup();
        assert_eq!(labels.len(), Category::ALL.len());
    }

    #[test]
    fn test_center_json_shape() {
        let json = r#"{
            "id": "7",
            "name": "테스트 센터",
            "address": "서울특별시 중구 명동 1",
            "district": "중구",
            "neighborhood": "명동",
            "latitude": 37.56,
            "longitude": 126.98,
            "description": "",
            "categories": ["기타"],
            "latestPost": {"title": "t", "content": "c", "date": "2024-01-01", "isNew": true}
        }"#;
        let center: DonationCenter = serde_json::from_str(json).unwrap();
        assert!(center.has_category("기타"));
        assert!(center.latest_post.unwrap().is_new);
        assert!(center.image_url.is_empty());
    }

    #[test]
    fn test_center_validation() {
        let center: DonationCenter = serde_json::from_value(serde_json::json!({
            "id": "x", "name": "", "address": "", "district": "중구", "neighborhood": "",
            "latitude": 137.0, "longitude": 0.0, "description": ""
        }))
        .unwrap();

        let result = center.validate();
        assert_eq!(result.errors().len(), 2);
        assert_eq!(result.warnings().len(), 1);
    }
}
