use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::error::{Result, RosterError};
use crate::models::Worker;

#[derive(Deserialize)]
struct CsvRow {
    #[serde(rename = "NIPP_Pekerja")]
    id: String,
    #[serde(rename = "Nama_Pekerja", default)]
    name: Option<String>,
    #[serde(rename = "Jabatan", default)]
    title: Option<String>,
    #[serde(rename = "Posisi", default)]
    post: Option<String>,
    #[serde(rename = "NIPP_Atasan", default)]
    supervisor_id: Option<String>,
    #[serde(rename = "Skor_KPI_Final")]
    score: f64,
}

pub fn load_roster(path: &Path) -> Result<Vec<Worker>> {
    let file = std::fs::File::open(path)?;
    let workers = read_roster(file)?;
    info!(path = %path.display(), workers = workers.len(), "roster loaded");
    Ok(workers)
}

/// Position comes from `Jabatan` when the header has it, otherwise from
/// `Posisi`.
pub fn read_roster<R: Read>(reader: R) -> Result<Vec<Worker>> {
    let mut reader = csv::Reader::from_reader(reader);
    let has_title = reader
        .headers()
        .map_err(|source| RosterError::Csv { row: 0, source })?
        .iter()
        .any(|header| header == "Jabatan");
    let mut workers = Vec::new();

    for (idx, result) in reader.deserialize::<CsvRow>().enumerate() {
        let row = idx + 1;
        let record = result.map_err(|source| RosterError::Csv { row, source })?;

        let id = record.id.trim().to_string();
        if id.is_empty() {
            return Err(RosterError::BlankId { row });
        }
        if !record.score.is_finite() {
            return Err(RosterError::NonFiniteScore { row, id });
        }

        workers.push(Worker {
            id,
            name: non_blank(record.name),
            position: if has_title {
                non_blank(record.title)
            } else {
                non_blank(record.post)
            },
            supervisor_id: non_blank(record.supervisor_id),
            score: record.score,
        });
    }

    Ok(workers)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
