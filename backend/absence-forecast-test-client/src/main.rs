// src/main.rs

use reqwest::Client;
use serde::Deserialize;
use std::error::Error;

// Response types
#[derive(Debug, Deserialize)]
struct HealthResponse {
    status: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Pattern {
    period: String,
    probability: f64,
    historical_count: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Alert {
    id: String,
    risk_level: String,
    expected_absences: u32,
    available_staff: i64,
    week_start_date: String,
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Redistribution {
    source_team: String,
    target_team: String,
    employee_names: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let base_url = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("FORECAST_BASE_URL").ok())
        .unwrap_or_else(|| "http://localhost:3000".to_string());
    let client = Client::new();

    // Test 1: Health check
    println!("\n🔍 Testing health check endpoint...");
    let health_response = client
        .get(format!("{}/health", base_url))
        .send()
        .await?
        .json::<HealthResponse>()
        .await?;
    println!("Health check response: {:?}", health_response);

    // Test 2: Patterns
    println!("\n🔍 Testing patterns endpoint...");
    let patterns = client
        .get(format!("{}/api/patterns", base_url))
        .send()
        .await?
        .json::<Vec<Pattern>>()
        .await?;
    for pattern in &patterns {
        println!(
            " - {} (p={:.2}, historical={})",
            pattern.period, pattern.probability, pattern.historical_count
        );
    }

    // Test 3: Alerts for the next 12 weeks
    println!("\n🔍 Testing alerts endpoint...");
    let alerts = client
        .get(format!("{}/api/alerts?weeks=12", base_url))
        .send()
        .await?
        .json::<Vec<Alert>>()
        .await?;
    if alerts.is_empty() {
        println!("No alerts in the next 12 weeks.");
    }
    for alert in &alerts {
        println!(
            " - [{}] {} week of {}: {} expected, {} available. {}",
            alert.risk_level,
            alert.id,
            alert.week_start_date,
            alert.expected_absences,
            alert.available_staff,
            alert.message
        );
    }

    // Test 4: Summary
    println!("\n🔍 Testing alert summary endpoint...");
    let summary = client
        .get(format!("{}/api/alerts/summary", base_url))
        .send()
        .await?
        .json::<serde_json::Value>()
        .await?;
    println!("Summary: {}", serde_json::to_string_pretty(&summary)?);

    // Test 5: Redistributions for the first alert
    if let Some(alert) = alerts.first() {
        println!("\n🔍 Testing redistributions for {}...", alert.id);
        let response = client
            .post(format!("{}/api/alerts/{}/redistributions", base_url, alert.id))
            .send()
            .await?;
        println!("Redistribution response status: {}", response.status());

        if response.status().is_success() {
            let moves = response.json::<Vec<Redistribution>>().await?;
            for m in &moves {
                println!(
                    " - {} -> {}: {}",
                    m.source_team,
                    m.target_team,
                    m.employee_names.join(", ")
                );
            }
        } else {
            println!("Failed to get redistributions: {}", response.text().await?);
        }
    }

    // Test 6: Unknown alert
    println!("\n🔍 Testing unknown alert id...");
    let missing = client
        .post(format!("{}/api/alerts/alert-week-999/redistributions", base_url))
        .send()
        .await?;
    println!("Unknown alert status (expect 404): {}", missing.status());

    println!("\n✅ Testing complete!");

    Ok(())
}
