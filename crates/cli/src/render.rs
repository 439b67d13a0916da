//! Text renderers for domain values
//!
//! Each renderer returns the text block instead of printing it. Styling is
//! applied only when stdout supports color.

use crate::output::{format_count, format_distance, format_won};
use chrono::{DateTime, Local, Utc};
use opendonate_centers::{CenterDonations, Category, DonationCenter, MatchTier, PseudoStat};
use opendonate_community::{Comment, CommunityPost};
use opendonate_location::{LocationInfo, PlaceCandidate};
use owo_colors::{OwoColorize, Stream::Stdout};
use std::fmt::Write;

/// One line per center: `[id] name · district neighborhood (distance)`
pub fn center_line(center: &DonationCenter, distance_km: Option<f64>) -> String {
    let mut line = format!(
        "[{}] {} · {} {}",
        center.id,
        center.name.if_supports_color(Stdout, |t| t.bold()),
        center.district,
        center.neighborhood
    );
    if let Some(km) = distance_km {
        let _ = write!(line, " ({})", format_distance(km));
    }
    line
}

/// Full center card with categories, latest post and mock donations
pub fn center_detail(center: &DonationCenter, donations: &CenterDonations) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", center.name.if_supports_color(Stdout, |t| t.bold()));
    let _ = writeln!(out, "  주소: {}", center.address);
    let _ = writeln!(out, "  지역: {} {}", center.district, center.neighborhood);
    let _ = writeln!(out, "  좌표: {:.4}, {:.4}", center.latitude, center.longitude);
    if !center.categories.is_empty() {
        let _ = writeln!(out, "  분야: {}", center.categories.join(", "));
    }
    let _ = writeln!(out, "  소개: {}", center.description);
    if let Some(post) = &center.latest_post {
        let badge = if post.is_new { " NEW" } else { "" };
        let _ = writeln!(out, "  최근 소식: {} ({}){}", post.title, post.date, badge);
    }
    let _ = writeln!(out, "  누적 기부금: {}", format_won(donations.total_amount));
    let _ = write!(out, "  나의 기부금: {}", format_won(donations.my_amount));
    out
}

/// Heading for a match selection
pub fn tier_heading(tier: MatchTier, count: usize) -> String {
    match tier {
        MatchTier::Exact => format!("우리 동네 기부처 {count}곳"),
        MatchTier::District => format!("우리 구 기부처 {count}곳"),
        MatchTier::Nearby => format!("가까운 기부처 {count}곳"),
    }
}

/// Category with icon and description
pub fn category_line(category: Category) -> String {
    format!(
        "{} {} ({}) - {}",
        category.icon(),
        category.label(),
        category.id(),
        category.description()
    )
}

/// Resolved location block
pub fn location_block(location: &LocationInfo) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", location.name.if_supports_color(Stdout, |t| t.bold()));
    let _ = writeln!(out, "  주소: {}", location.address);
    let _ = writeln!(out, "  구: {}", location.district);
    let _ = writeln!(out, "  동: {}", location.neighborhood);
    let _ = write!(out, "  좌표: {:.6}, {:.6}", location.latitude, location.longitude);
    out
}

/// Numbered search candidate
pub fn candidate_line(index: usize, candidate: &PlaceCandidate) -> String {
    let address = if candidate.road_address_name.is_empty() {
        &candidate.address_name
    } else {
        &candidate.road_address_name
    };
    format!(
        "{:>2}. {} · {}",
        index + 1,
        candidate.place_name.if_supports_color(Stdout, |t| t.bold()),
        address
    )
}

/// Donation totals with the "as of" label
pub fn stats_block(title: &str, stat: &PseudoStat, as_of: &str) -> String {
    format!(
        "{}\n  기부금: {}\n  기부 횟수: {}\n  {}",
        title.if_supports_color(Stdout, |t| t.bold()),
        format_won(stat.amount),
        format_count(stat.count),
        as_of.if_supports_color(Stdout, |t| t.dimmed())
    )
}

fn local_time(at: &DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%Y.%m.%d %H:%M").to_string()
}

/// Board listing line
pub fn post_line(post: &CommunityPost) -> String {
    let pin = if post.is_pinned { "📌 " } else { "" };
    format!(
        "{pin}[{}] {} - {} · 조회 {} · 좋아요 {} · 댓글 {} · {}",
        post.category,
        post.title.if_supports_color(Stdout, |t| t.bold()),
        post.author.display_name,
        post.views,
        post.likes,
        post.comment_count,
        local_time(&post.created_at)
    )
}

/// Post with body and comments
pub fn post_detail(post: &CommunityPost) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", post_line(post));
    let _ = writeln!(out, "  id: {}", post.id);
    let _ = writeln!(out);
    for line in post.content.lines() {
        let _ = writeln!(out, "  {line}");
    }
    for attachment in &post.attachments {
        let _ = writeln!(out, "  첨부: {attachment}");
    }
    let _ = writeln!(out);
    let _ = write!(out, "  댓글 {}개", post.comments.len());
    for comment in &post.comments {
        let _ = write!(out, "\n{}", comment_line(comment));
    }
    out
}

/// Indented comment line
pub fn comment_line(comment: &Comment) -> String {
    format!(
        "    └ {}: {} ({})",
        comment.author.display_name,
        comment.content,
        local_time(&comment.created_at)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use opendonate_centers::Catalog;
    use opendonate_community::{Author, PostCategory};

    fn post() -> CommunityPost {
        let at = DateTime::parse_from_rfc3339("2024-03-01T09:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        CommunityPost {
            id: "p1".into(),
            title: "첫 기부 후기".into(),
            content: "따뜻한 하루\n감사합니다".into(),
            attachments: vec![],
            author: Author {
                id: "u1".into(),
                display_name: "홍길동".into(),
                photo_url: None,
            },
            category: PostCategory::DonationReview,
            created_at: at,
            updated_at: at,
            is_pinned: true,
            views: 3,
            likes: 1,
            comments: vec![],
            comment_count: 0,
        }
    }

    #[test]
    fn test_center_line() {
        let catalog = Catalog::builtin();
        let center = catalog.find_by_id("1").unwrap();
        let line = center_line(center, Some(0.42));
        assert!(line.starts_with("[1] "));
        assert!(line.contains("강남구"));
        assert!(line.ends_with("(420m)"));
    }

    #[test]
    fn test_center_detail_has_donations() {
        let catalog = Catalog::builtin();
        let center = catalog.find_by_id("1").unwrap();
        let text = center_detail(center, &opendonate_centers::center_mock_donation("1"));
        assert!(text.contains("누적 기부금: 2,209,810원"));
        assert!(text.contains("나의 기부금: 63,220원"));
    }

    #[test]
    fn test_tier_heading() {
        assert_eq!(tier_heading(MatchTier::Exact, 2), "우리 동네 기부처 2곳");
        assert_eq!(tier_heading(MatchTier::District, 3), "우리 구 기부처 3곳");
        assert_eq!(tier_heading(MatchTier::Nearby, 1), "가까운 기부처 1곳");
    }

    #[test]
    fn test_candidate_prefers_road_address() {
        let candidate = PlaceCandidate {
            place_name: "역삼역".into(),
            address_name: "서울 강남구 역삼동 804".into(),
            road_address_name: "서울 강남구 강남대로 지하 396".into(),
            ..PlaceCandidate::default()
        };
        let line = candidate_line(0, &candidate);
        assert!(line.starts_with(" 1. "));
        assert!(line.ends_with("강남대로 지하 396"));
    }

    #[test]
    fn test_stats_block() {
        let stat = PseudoStat {
            amount: 21_378_786_975,
            count: 567_923,
        };
        let text = stats_block("전체 기부 현황", &stat, "2024.03.01 09시 기준");
        assert!(text.contains("21,378,786,975원"));
        assert!(text.contains("567,923건"));
    }

    #[test]
    fn test_post_detail() {
        let text = post_detail(&post());
        assert!(text.starts_with("📌 [기부후기]"));
        assert!(text.contains("  감사합니다"));
        assert!(text.contains("댓글 0개"));
    }
}
