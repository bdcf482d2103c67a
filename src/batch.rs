//! Batches of styles given as a JSON array, as used for sprite sheets.

use crate::{FontRegistry, Settings, Style};

#[derive(Debug, thiserror::Error)]
#[error("malformed style batch: {0}")]
pub struct BatchError(#[from] serde_json::Error);

/// Parses a JSON array of style objects.
///
/// Empty input and `null` are empty batches.
pub fn parse(json: &str) -> Result<Vec<Settings>, BatchError> {
    if json.trim().is_empty() {
        return Ok(Vec::new());
    }
    let batch: Option<Vec<Settings>> = serde_json::from_str(json)?;
    Ok(batch.unwrap_or_default())
}

/// Parses and resolves a batch of styles, each against the same parent.
pub fn resolve(
    json: &str,
    parent: Option<&Style>,
    registry: &dyn FontRegistry,
) -> Result<Vec<Style>, BatchError> {
    let styles: Vec<Style> = parse(json)?
        .iter()
        .map(|settings| Style::resolve(settings, parent, registry))
        .collect();
    log::debug!("Resolved a batch of {} styles", styles.len());
    Ok(styles)
}
