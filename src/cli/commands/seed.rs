use std::path::PathBuf;

use anyhow::{anyhow, Context};
use clap::Args;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::api::{CtrlVocPayload, PropertyPayload};
use crate::cli::utils::{output_success, output_warning};
use crate::cli::OutputFormat;
use crate::config::config;
use crate::database::{DatabaseManager, Stores};
use crate::error::ApiError;
use crate::rules::{normalize_name, validate_controlled_vocabulary};

#[derive(Args, Debug)]
pub struct SeedArgs {
    #[arg(help = "YAML fixture with controlled_vocabularies and properties")]
    pub fixture: PathBuf,
}

/// Fixture file layout. Vocabularies load first so properties can point at
/// them by name instead of by id.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Fixture {
    #[serde(default)]
    pub controlled_vocabularies: Vec<CtrlVocPayload>,
    #[serde(default)]
    pub properties: Vec<Value>,
}

#[derive(Debug, Default, PartialEq)]
pub struct SeedReport {
    pub vocabularies_added: usize,
    pub properties_added: usize,
    pub skipped: Vec<String>,
}

pub async fn handle(args: SeedArgs, output_format: OutputFormat) -> anyhow::Result<()> {
    let raw = std::fs::read_to_string(&args.fixture)
        .with_context(|| format!("failed to read {}", args.fixture.display()))?;
    let fixture: Fixture = serde_yaml::from_str(&raw)
        .with_context(|| format!("invalid fixture {}", args.fixture.display()))?;

    let database = &config().database;
    if database.url.is_none() {
        output_warning(
            &output_format,
            "DATABASE_URL is not set; seeded entries only live for this process",
        );
    }
    let stores = DatabaseManager::open(database).await?;

    let report = seed(&stores, fixture).await?;
    for name in &report.skipped {
        output_warning(&output_format, &format!("'{}' already exists, skipped", name));
    }

    output_success(
        &output_format,
        &format!(
            "Seeded {} controlled vocabularies and {} properties",
            report.vocabularies_added, report.properties_added
        ),
        Some(json!({
            "controlled_vocabularies": report.vocabularies_added,
            "properties": report.properties_added,
            "skipped": report.skipped,
        })),
    )
}

/// Inserts every fixture entry whose name is not taken yet
pub async fn seed(stores: &Stores, fixture: Fixture) -> anyhow::Result<SeedReport> {
    let mut report = SeedReport::default();

    for (index, payload) in fixture.controlled_vocabularies.into_iter().enumerate() {
        let entry = payload
            .into_vocabulary()
            .map_err(|e| entry_error("controlled_vocabularies", index, &e))?;

        if stores.vocabularies.find_by_name(&entry.name).await?.is_some() {
            report.skipped.push(entry.name);
            continue;
        }
        let record = stores.vocabularies.insert(entry).await?;
        tracing::info!("Seeded controlled vocabulary '{}' ({})", record.document.name, record.id);
        report.vocabularies_added += 1;
    }

    for (index, mut value) in fixture.properties.into_iter().enumerate() {
        resolve_vocabulary_name(stores, &mut value)
            .await
            .with_context(|| format!("properties[{}]", index))?;

        let payload: PropertyPayload = serde_json::from_value(value)
            .with_context(|| format!("properties[{}]", index))?;
        let mut entry = payload
            .into_property()
            .map_err(|e| entry_error("properties", index, &e))?;
        validate_controlled_vocabulary(&mut entry);

        if stores.properties.find_by_name(&entry.name).await?.is_some() {
            report.skipped.push(entry.name);
            continue;
        }
        let record = stores.properties.insert(entry).await?;
        tracing::info!("Seeded property '{}' ({})", record.document.name, record.id);
        report.properties_added += 1;
    }

    Ok(report)
}

/// Swaps a vocabulary name in `vocabulary_type.controlled_vocabulary` for the
/// stored id. Ids and non-string references pass through untouched.
async fn resolve_vocabulary_name(stores: &Stores, property: &mut Value) -> anyhow::Result<()> {
    let Some(reference) = property
        .get_mut("vocabulary_type")
        .and_then(|vocabulary_type| vocabulary_type.get_mut("controlled_vocabulary"))
    else {
        return Ok(());
    };
    let Some(name) = reference.as_str() else {
        return Ok(());
    };
    if Uuid::parse_str(name).is_ok() {
        return Ok(());
    }

    let record = stores
        .vocabularies
        .find_by_name(&normalize_name(name))
        .await?
        .ok_or_else(|| anyhow!("unknown controlled vocabulary '{}'", name))?;
    *reference = Value::String(record.id.to_string());
    Ok(())
}

fn entry_error(collection: &str, index: usize, error: &ApiError) -> anyhow::Error {
    let mut detail = error.message().to_string();
    if let ApiError::ValidationError {
        field_errors: Some(fields),
        ..
    } = error
    {
        let mut fields: Vec<_> = fields.iter().collect();
        fields.sort();
        for (field, problem) in fields {
            detail.push_str(&format!("; {}: {}", field, problem));
        }
    }
    anyhow!("{}[{}]: {}", collection, index, detail)
}
