// rdsrestoretool/src/config/mod.rs
use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::Deserialize;
use std::fs;
use std::path::Path;

pub const DEFAULT_INSTANCE_CLASS: &str = "db.t3.small";
pub const DEFAULT_ENGINE: &str = "aurora-mysql";
const DEFAULT_RESTORE_TIME: &str = "01:00:00";

/// Struct for deserializing config.json. Everything is optional at this
/// stage; validation happens when the typed request is built.
#[derive(Debug, Clone, Deserialize)]
pub struct RawJsonConfig {
    pub region: Option<String>,
    pub source_cluster_id: Option<String>,
    pub destination_cluster_id: Option<String>,
    pub subnet_group: Option<String>,
    pub security_group_id: Option<String>,
    pub restore_date: Option<String>,
    pub restore_time: Option<String>,
    pub instance_class: Option<String>,
    pub engine: Option<String>,
}

/// Immutable input to one restore orchestration run. Constructed once at
/// the boundary and passed into the core, which never reads ambient
/// process state.
#[derive(Debug, Clone)]
pub struct RestoreRequest {
    pub region: String,
    pub source_cluster_id: String,
    pub destination_cluster_id: String,
    pub subnet_group: Option<String>,
    pub security_group_id: Option<String>,
    /// Explicit restore point; `None` means the latest restorable time.
    pub restore_to_time: Option<DateTime<Utc>>,
    pub instance_class: String,
    pub engine: String,
}

impl RestoreRequest {
    pub fn load_from_json(config_path: &Path) -> Result<Self> {
        let config_content = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;
        let raw: RawJsonConfig = serde_json::from_str(&config_content).with_context(|| {
            format!(
                "Failed to parse JSON from config file at {}",
                config_path.display()
            )
        })?;
        Self::from_raw(raw)
    }

    pub fn from_raw(raw: RawJsonConfig) -> Result<Self> {
        let region = require_non_empty(raw.region, "region")?;
        let source_cluster_id = require_non_empty(raw.source_cluster_id, "source_cluster_id")?;
        let destination_cluster_id =
            require_non_empty(raw.destination_cluster_id, "destination_cluster_id")?;

        if source_cluster_id == destination_cluster_id {
            anyhow::bail!(
                "source_cluster_id and destination_cluster_id must name different clusters"
            );
        }

        let restore_to_time =
            parse_restore_point(raw.restore_date.as_deref(), raw.restore_time.as_deref())?;

        Ok(RestoreRequest {
            region,
            source_cluster_id,
            destination_cluster_id,
            subnet_group: raw.subnet_group.filter(|s| !s.trim().is_empty()),
            security_group_id: raw.security_group_id.filter(|s| !s.trim().is_empty()),
            restore_to_time,
            instance_class: raw
                .instance_class
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_INSTANCE_CLASS.to_string()),
            engine: raw
                .engine
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_ENGINE.to_string()),
        })
    }
}

fn require_non_empty(value: Option<String>, key: &str) -> Result<String> {
    value
        .filter(|s| !s.trim().is_empty())
        .with_context(|| format!("{key} must be set in config.json"))
}

/// Combines the configured restore date and time into an explicit UTC
/// restore point. A date without a time defaults to 01:00:00; a time
/// without a date is rejected rather than silently ignored.
fn parse_restore_point(date: Option<&str>, time: Option<&str>) -> Result<Option<DateTime<Utc>>> {
    let date = date.map(str::trim).filter(|d| !d.is_empty());
    let time = time.map(str::trim).filter(|t| !t.is_empty());

    let Some(date) = date else {
        if time.is_some() {
            anyhow::bail!("restore_time is set but restore_date is missing; set both or neither");
        }
        return Ok(None);
    };

    let parsed_date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .with_context(|| format!("restore_date [{date}] is not in YYYY-MM-DD format"))?;
    let time = time.unwrap_or(DEFAULT_RESTORE_TIME);
    let parsed_time = NaiveTime::parse_from_str(time, "%H:%M:%S")
        .with_context(|| format!("restore_time [{time}] is not in HH:MM:SS format"))?;

    Ok(Some(parsed_date.and_time(parsed_time).and_utc()))
}
