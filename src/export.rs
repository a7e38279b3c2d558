//! CSV rendering of a filtered village list.

use crate::error::{AtlasError, Result};
use crate::types::Village;
use csv::{QuoteStyle, WriterBuilder};

/// Render villages as CSV with columns Name, Region, Status, Population,
/// Coords.
///
/// Every field is wrapped in double quotes with embedded quotes doubled.
/// Status uses its human-readable label; population is empty when unknown;
/// coords are comma-joined and empty when the record has no finite position.
pub fn export_csv(villages: &[Village]) -> Result<String> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .from_writer(Vec::new());

    writer.write_record(["Name", "Region", "Status", "Population", "Coords"])?;

    for village in villages {
        let population = village
            .population
            .map(|p| p.to_string())
            .unwrap_or_default();
        let coords = village
            .map_position()
            .map(|[lat, lng]| format!("{lat},{lng}"))
            .unwrap_or_default();

        writer.write_record([
            village.name.as_str(),
            village.region.as_str(),
            village.status.label(),
            population.as_str(),
            coords.as_str(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| AtlasError::Export(e.to_string()))?;
    Ok(String::from_utf8(bytes)?)
}
