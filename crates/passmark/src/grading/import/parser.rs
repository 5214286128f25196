use serde::{Deserialize, Deserializer};
use std::io::Read;

#[derive(Debug, Deserialize)]
pub(crate) struct SheetRow {
    #[serde(rename = "Grade", default, deserialize_with = "empty_cell_as_none")]
    pub(crate) grade: Option<f64>,
    #[serde(rename = "Percentage", default, deserialize_with = "empty_cell_as_none")]
    pub(crate) weight_percent: Option<f64>,
}

impl SheetRow {
    /// Grade sheets exported from the entry form carry trailing template
    /// rows with both cells empty; those are not data.
    pub(crate) fn is_blank(&self) -> bool {
        self.grade.is_none() && self.weight_percent.is_none()
    }
}

pub(crate) fn parse_rows<R: Read>(reader: R) -> Result<Vec<SheetRow>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut rows = Vec::new();

    for record in csv_reader.deserialize::<SheetRow>() {
        rows.push(record?);
    }

    Ok(rows)
}

fn empty_cell_as_none<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    match opt.as_deref().map(str::trim).filter(|value| !value.is_empty()) {
        None => Ok(None),
        Some(value) => value
            .parse::<f64>()
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}
