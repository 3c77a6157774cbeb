use anyhow::{bail, Context};
use log::warn;
use poscore::pos::pricebook::PricebookRow;
use poscore::pos::Pricebook;
use std::fs;
use std::path::Path;

/// Loads a pricebook exported as a JSON array of row objects.
pub fn load_pricebook<P: AsRef<Path>>(path: P) -> anyhow::Result<Pricebook> {
    let path_ref = path.as_ref();
    let contents = fs::read_to_string(path_ref)
        .with_context(|| format!("reading pricebook {}", path_ref.display()))?;
    let rows: Vec<PricebookRow> = serde_json::from_str(&contents)
        .with_context(|| format!("parsing pricebook {}", path_ref.display()))?;

    let mut pricebook = Pricebook::new();
    let report = pricebook.import(&rows);
    if !report.success {
        bail!("{}: {}", path_ref.display(), report.message);
    }
    for error in report.errors.iter().flatten() {
        warn!("{}: skipped {}", path_ref.display(), error);
    }
    Ok(pricebook)
}
