//! `hrchat providers` subcommands.

use anyhow::{anyhow, Result};
use hrchat_runtime::{build_registry, ModelMode, RuntimeConfig};
use serde::Serialize;

use crate::cli::ProvidersAction;
use crate::output;

#[derive(Serialize)]
struct ProviderInfo {
    id: &'static str,
    model: String,
    endpoint: String,
    status: String,
}

pub async fn handle(action: ProvidersAction) -> Result<()> {
    let config = RuntimeConfig::from_env()?;
    match action {
        ProvidersAction::List => list(&config),
        ProvidersAction::Test { provider } => test(&config, &provider).await,
        ProvidersAction::Models { provider } => models(&config, &provider).await,
    }
}

fn list(config: &RuntimeConfig) -> Result<()> {
    let (registry, unavailable) = build_registry(config);
    let available = registry.list_providers();

    output::header(&format!("Model back ends (MODEL_MODE={})", config.mode));

    let mut infos = Vec::new();
    for mode in ModelMode::ALL {
        let status = if available.iter().any(|id| id == mode.as_str()) {
            "configured".to_string()
        } else {
            unavailable
                .iter()
                .find(|(m, _)| *m == mode)
                .map(|(_, e)| e.to_string())
                .unwrap_or_else(|| "unavailable".to_string())
        };
        let model = if mode == config.mode {
            config.model.clone()
        } else {
            mode.model_from_env()
        };
        let endpoint = match mode {
            ModelMode::Groq => config.groq_base_url.clone(),
            ModelMode::Local => config.ollama_base_url.clone(),
        };
        infos.push(ProviderInfo {
            id: mode.as_str(),
            model,
            endpoint,
            status,
        });
    }

    let mut table = output::table();
    output::table_header(&mut table, &["Provider", "Model", "Endpoint", "Status"]);
    for info in &infos {
        table.add_row(vec![
            info.id.to_string(),
            info.model.clone(),
            info.endpoint.clone(),
            info.status.clone(),
        ]);
    }
    output::table_print(&table, &infos);
    Ok(())
}

async fn test(config: &RuntimeConfig, provider_id: &str) -> Result<()> {
    let (registry, _) = build_registry(config);
    let provider = registry.get_provider(provider_id)?;

    let spinner = output::spinner(&format!("Testing {provider_id} connectivity..."));
    match provider.list_models().await {
        Ok(models) => {
            output::spinner_success(
                &spinner,
                &format!("{} is reachable ({} models)", provider_id, models.len()),
            );
            Ok(())
        }
        Err(e) => {
            output::spinner_error(&spinner, &format!("{provider_id} connection failed"));
            Err(anyhow!("Provider test failed: {e}"))
        }
    }
}

async fn models(config: &RuntimeConfig, provider_id: &str) -> Result<()> {
    let (registry, _) = build_registry(config);
    let provider = registry.get_provider(provider_id)?;

    let spinner = output::spinner(&format!("Fetching models for {provider_id}..."));
    let models = match provider.list_models().await {
        Ok(models) => {
            output::spinner_clear(&spinner);
            models
        }
        Err(e) => {
            output::spinner_error(&spinner, "Failed to fetch models");
            return Err(anyhow!("Failed to list models: {e}"));
        }
    };

    output::header(&format!("Models for {provider_id}"));
    if models.is_empty() {
        output::dim("No models returned");
        return Ok(());
    }

    let mut table = output::table();
    output::table_header(&mut table, &["Model", "Default"]);
    for model in &models {
        let default = if model == provider.default_model() { "*" } else { "" };
        table.add_row(vec![model.clone(), default.to_string()]);
    }
    output::table_print(&table, &models);
    Ok(())
}
