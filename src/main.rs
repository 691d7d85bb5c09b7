use std::process::ExitCode;

use anyhow::Result;
use skycast_core::{AppError, Config};
use skycast_forecast::StaticLocation;
use skycast_ui::error_mapping;
use skycast_ui::services::{client_from_config, options_from_config};
use skycast_ui::{ForecastModel, ForecastSession, ForecastViewState};
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Initialize core
    skycast_core::init()?;

    let config = match Config::load_validated() {
        Ok((config, _)) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {:#}", e);
            eprintln!("{}", AppError::from_anyhow(e).user_message());
            return Ok(ExitCode::FAILURE);
        }
    };
    let weather = &config.weather;

    // An explicit query wins over the configured default location
    let query = std::env::args()
        .nth(1)
        .unwrap_or_else(|| weather.default_location.clone());

    let client = match client_from_config(weather) {
        Ok(client) => client,
        Err(e) => {
            tracing::error!("Failed to build forecast client: {}", e);
            eprintln!("{}", error_mapping::user_message(&e));
            return Ok(ExitCode::FAILURE);
        }
    };
    let session = ForecastSession::new(
        client,
        StaticLocation::new(query),
        options_from_config(weather),
    );

    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c.cancel();
        }
    });

    tracing::info!("skycast started");

    let model = ForecastModel::new();
    // Failures are already logged by the session and mapped into the model.
    let result = session.run_with_cancel(&model, &cancel).await;
    let state = model.snapshot();

    if result.is_err() {
        let message = state.error_message.as_deref().unwrap_or("Forecast failed");
        eprintln!("{}", message);
        return Ok(ExitCode::FAILURE);
    }

    print_view(&state);
    Ok(ExitCode::SUCCESS)
}

fn print_view(state: &ForecastViewState) {
    if let Some(current) = &state.current {
        println!("{}", current.location_name);
        println!("  {}  {}", current.temperature, current.condition);
        println!("  {}", current.feels_like);
        for row in &current.details {
            println!("  {:<11}{}", row.title, row.value);
        }
    }

    println!("\nToday:");
    let hourly: Vec<_> = state
        .hourly
        .iter()
        .map(|h| format!("{} {}", h.label, h.temperature))
        .collect();
    println!("  {}", hourly.join("  "));

    println!("\n{}:", state.daily_header());
    for day in &state.daily {
        println!("  {:<10}{}", day.day, day.temperature);
    }
}
