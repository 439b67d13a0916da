//! Center commands: find, nearby, category, detail, categories

use crate::app::App;
use anyhow::{anyhow, Result};
use opendonate_centers::{center_mock_donation, matcher, Category, DonationCenter, MatchTier};
use opendonate_cli::output::print_json;
use opendonate_cli::{render, Status};
use opendonate_geo::Coordinate;
use opendonate_telemetry::Event;
use serde::Serialize;
use serde_json::json;

#[derive(Serialize)]
struct SelectionOutput<'a> {
    tier: MatchTier,
    district: &'a str,
    neighborhood: &'a str,
    centers: Vec<&'a DonationCenter>,
}

#[derive(Serialize)]
struct NearbyOutput<'a> {
    distance_km: f64,
    #[serde(flatten)]
    center: &'a DonationCenter,
}

fn location_required() -> anyhow::Error {
    anyhow!("No location set. Run `opendonate locate` or `opendonate select`, or pass --lat and --lng")
}

/// Local match (neighborhood, or the whole district when only --district is
/// given), else centers within the radius of the origin
pub fn find(
    app: &App,
    district: Option<String>,
    neighborhood: Option<String>,
    origin: Option<(f64, f64)>,
    radius: Option<f64>,
) -> Result<()> {
    let catalog = app.catalog()?;
    let saved = app.saved_location()?;

    let local = match (&district, &saved) {
        (Some(district), _) => Some((district.clone(), neighborhood)),
        (None, Some(location)) => Some((location.district.clone(), Some(location.neighborhood.clone()))),
        (None, None) => None,
    };
    let radius_km = radius.unwrap_or_else(|| app.radius_km());

    let matched = local
        .as_ref()
        .and_then(|(d, n)| matcher::local_match(catalog.centers(), d, n.as_deref()));
    let (selection, origin) = match matched {
        Some(selection) => (selection, None),
        None => {
            let origin = match origin {
                Some((lat, lng)) => Coordinate::new(lat, lng),
                None => saved
                    .as_ref()
                    .map(|l| l.coordinate())
                    .ok_or_else(location_required)?,
            };
            (matcher::proximity_match(catalog.centers(), &origin, radius_km), Some(origin))
        }
    };

    let (district, neighborhood) = local.unwrap_or_default();
    let neighborhood = neighborhood.unwrap_or_default();
    Event::new(
        match selection.tier {
            MatchTier::Exact => "match.exact",
            MatchTier::District => "match.district",
            MatchTier::Nearby => "match.nearby",
        },
        json!({
            "district": district,
            "neighborhood": neighborhood,
            "results": selection.centers.len(),
        }),
    )
    .log();

    if app.is_json() {
        print_json(&SelectionOutput {
            tier: selection.tier,
            district: &district,
            neighborhood: &neighborhood,
            centers: selection.centers,
        })?;
        return Ok(());
    }

    if selection.is_empty() {
        Status::warning(&format!("{radius_km}km 안에 기부처가 없어요"));
        return Ok(());
    }
    Status::header(&render::tier_heading(selection.tier, selection.centers.len()));
    for center in &selection.centers {
        let distance = origin.map(|o| opendonate_geo::haversine_distance(&o, &center.coordinate()));
        println!("{}", render::center_line(center, distance));
    }
    Ok(())
}

pub fn nearby(app: &App, origin: Option<(f64, f64)>, limit: usize) -> Result<()> {
    let catalog = app.catalog()?;
    let origin = app.origin(origin)?.ok_or_else(location_required)?;
    let ranked = matcher::nearest(catalog.centers(), &origin, Some(limit));

    if app.is_json() {
        let out: Vec<NearbyOutput<'_>> = ranked
            .iter()
            .map(|n| NearbyOutput {
                distance_km: n.distance_km,
                center: n.item,
            })
            .collect();
        print_json(&out)?;
        return Ok(());
    }
    for entry in &ranked {
        println!("{}", render::center_line(entry.item, Some(entry.distance_km)));
    }
    Ok(())
}

/// Category browsing, narrowed to a district when one is known
pub fn category(app: &App, category: Category, district: Option<String>, all: bool) -> Result<()> {
    let catalog = app.catalog()?;
    let district = match (district, all) {
        (Some(d), _) => Some(d),
        (None, true) => None,
        (None, false) => app.saved_location()?.map(|l| l.district),
    };
    let centers = matcher::browse_category(catalog.centers(), category.label(), district.as_deref());

    if app.is_json() {
        print_json(&centers)?;
        return Ok(());
    }
    let scope = district.as_deref().unwrap_or("전체 지역");
    Status::header(&format!("{} {} · {}", category.icon(), category.label(), scope));
    if centers.is_empty() {
        Status::warning("해당 분야의 기부처가 없어요");
    }
    for center in centers {
        println!("{}", render::center_line(center, None));
    }
    Ok(())
}

pub fn detail(app: &App, id: &str) -> Result<()> {
    let catalog = app.catalog()?;
    let center = catalog
        .find_by_id(id)
        .ok_or_else(|| anyhow!("Center {id} not found"))?;
    let donations = center_mock_donation(&center.id);

    if app.is_json() {
        print_json(&serde_json::json!({ "center": center, "donations": donations }))?;
        return Ok(());
    }
    println!("{}", render::center_detail(center, &donations));
    Ok(())
}

pub fn categories(app: &App) -> Result<()> {
    if app.is_json() {
        let out: Vec<_> = Category::ALL
            .iter()
            .map(|c| {
                serde_json::json!({
                    "id": c.id(),
                    "label": c.label(),
                    "icon": c.icon(),
                    "description": c.description(),
                })
            })
            .collect();
        print_json(&out)?;
        return Ok(());
    }
    for category in Category::ALL {
        println!("{}", render::category_line(category));
    }
    Ok(())
}
