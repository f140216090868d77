use super::types::ReportModel;
use anyhow::Result;

/// Serialize the report model as pretty JSON
pub fn generate(model: &ReportModel) -> Result<String> {
    let json = serde_json::to_string_pretty(model)?;
    Ok(json)
}
