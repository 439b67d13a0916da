//! Donation figures

use crate::app::App;
use anyhow::{anyhow, Result};
use chrono::Local;
use opendonate_centers::stats;
use opendonate_cli::output::print_json;
use opendonate_cli::render;

pub fn run(app: &App, user: Option<&str>, center: Option<&str>) -> Result<()> {
    let as_of = stats::as_of_label(&Local::now());

    if let Some(id) = center {
        let catalog = app.catalog()?;
        let center = catalog
            .find_by_id(id)
            .ok_or_else(|| anyhow!("Center {id} not found"))?;
        let donations = stats::center_mock_donation(&center.id);
        if app.is_json() {
            print_json(&serde_json::json!({
                "center_id": center.id,
                "total_amount": donations.total_amount,
                "my_amount": donations.my_amount,
                "as_of": as_of,
            }))?;
        } else {
            println!("{}", render::center_detail(center, &donations));
            println!("  {as_of}");
        }
        return Ok(());
    }

    let stat = stats::stats_for(user);
    if app.is_json() {
        print_json(&serde_json::json!({
            "user": user,
            "amount": stat.amount,
            "count": stat.count,
            "as_of": as_of,
        }))?;
        return Ok(());
    }
    let title = match user {
        Some(uid) => format!("{uid}님의 기부 현황"),
        None => "전체 기부 현황".to_string(),
    };
    println!("{}", render::stats_block(&title, &stat, &as_of));
    Ok(())
}
