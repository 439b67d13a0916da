//! Location commands: resolve, locate, search, select, show, set, clear

use crate::app::App;
use anyhow::{bail, Result};
use opendonate_cli::output::print_json;
use opendonate_cli::{render, Status};
use opendonate_geo::Coordinate;
use opendonate_location::{FixedGeolocator, LocationInfo};
use opendonate_telemetry::{metrics, Timer};
use std::sync::Arc;

/// District and neighborhood from address text, no network
pub fn resolve(app: &App, address: &str) -> Result<()> {
    let parts = opendonate_geo::resolve(address);
    if app.is_json() {
        print_json(&parts)?;
        return Ok(());
    }
    println!("구: {}", parts.district);
    println!("동: {}", parts.neighborhood);
    Ok(())
}

/// Resolve a reported device position
pub async fn locate(app: &App, lat: f64, lng: f64) -> Result<()> {
    let service = app.location_service(Arc::new(FixedGeolocator(Coordinate::new(lat, lng))))?;
    let timer = Timer::start("location.resolve_ms");
    let location = service.request_location().await?;
    timer.stop();
    print_location(app, &location, "현재 위치로 설정했어요")
}

/// Resolve an explicit coordinate
pub async fn set(app: &App, lat: f64, lng: f64) -> Result<()> {
    let service = app.location_service_without_device()?;
    let timer = Timer::start("location.resolve_ms");
    let location = service.set_custom_location(lat, lng).await?;
    timer.stop();
    print_location(app, &location, "위치를 설정했어요")
}

pub async fn search(app: &App, keyword: &str) -> Result<()> {
    let service = app.location_service_without_device()?;
    let results = service.search(keyword).await;
    if results.is_empty() {
        metrics().increment("search.empty");
    }

    if app.is_json() {
        print_json(&results)?;
        return Ok(());
    }
    if results.is_empty() {
        Status::warning(&format!("'{}' 검색 결과가 없어요", keyword.trim()));
        return Ok(());
    }
    for (i, candidate) in results.iter().enumerate() {
        println!("{}", render::candidate_line(i, candidate));
    }
    Ok(())
}

/// Search, then adopt the `index`-th (1-based) result
pub async fn select(app: &App, keyword: &str, index: usize) -> Result<()> {
    let service = app.location_service_without_device()?;
    let results = service.search(keyword).await;
    let Some(candidate) = index.checked_sub(1).and_then(|i| results.get(i)) else {
        bail!(
            "No search result #{index} for '{}' ({} found)",
            keyword.trim(),
            results.len()
        );
    };
    let location = service.select_search_result(candidate)?;
    print_location(app, &location, "검색한 위치로 설정했어요")
}

pub fn show(app: &App) -> Result<()> {
    let saved = app.saved_location()?;
    if app.is_json() {
        print_json(&saved)?;
        return Ok(());
    }
    match saved {
        Some(location) => {
            Status::header(&location.home_label());
            println!("{}", render::location_block(&location));
        }
        None => Status::info("저장된 위치가 없어요. `opendonate locate` 또는 `opendonate select`로 설정하세요."),
    }
    Ok(())
}

pub fn clear(app: &App) -> Result<()> {
    let removed = app.location_store()?.clear()?;
    if app.is_json() {
        print_json(&serde_json::json!({ "removed": removed }))?;
    } else if removed {
        Status::success("저장된 위치를 삭제했어요");
    } else {
        Status::info("저장된 위치가 없어요");
    }
    Ok(())
}

fn print_location(app: &App, location: &LocationInfo, message: &str) -> Result<()> {
    if app.is_json() {
        print_json(location)?;
        return Ok(());
    }
    Status::success(&format!("{message}: {}", location.home_label()));
    println!("{}", render::location_block(location));
    Ok(())
}
