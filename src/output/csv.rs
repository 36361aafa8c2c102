//! CSV export and id input files

use crate::core::transform::{header, ExportRow};
use crate::domain::{BatchError, ResourceId, ResourceKind, ResourceRef, Result};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

/// Write a header plus one record per row
///
/// The header is the kind's schema, so an export with no rows still produces
/// a valid file.
pub fn write_export_csv<W: Write>(kind: ResourceKind, rows: &[ExportRow], writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(header(kind))?;

    for row in rows {
        if row.resource().kind != kind {
            return Err(BatchError::Output(format!(
                "row for {} does not belong in a {kind} export",
                row.resource()
            )));
        }
        wtr.write_record(row.to_record())?;
    }

    wtr.flush()
        .map_err(|e| BatchError::Output(format!("Failed to flush CSV: {e}")))?;
    Ok(())
}

/// Export destination, created before the run starts so an unusable path
/// fails without touching the server
#[derive(Debug)]
pub struct ExportFile {
    path: PathBuf,
    file: std::fs::File,
}

impl ExportFile {
    /// Create (or truncate) `path`
    pub async fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = tokio::fs::File::create(&path).await.map_err(|e| {
            BatchError::Output(format!("Failed to create {}: {e}", path.display()))
        })?;
        Ok(Self {
            path,
            file: file.into_std().await,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the header and `rows` on the blocking pool
    pub async fn write(self, kind: ResourceKind, rows: Vec<ExportRow>) -> Result<()> {
        let Self { path, file } = self;
        let count = rows.len();

        tokio::task::spawn_blocking(move || write_export_csv(kind, &rows, file))
            .await
            .map_err(|e| BatchError::Output(format!("CSV writer task failed: {e}")))??;

        tracing::info!(path = %path.display(), rows = count, "Export written");
        Ok(())
    }
}

/// Ids read from an id CSV
#[derive(Debug, Default)]
pub struct IdList {
    /// Valid ids in file order, duplicates removed
    pub refs: Vec<ResourceRef>,
    /// Skipped data rows as (line number, reason)
    pub skipped: Vec<(usize, String)>,
}

/// Read the `id` column of a CSV, typically a previous export
///
/// Rows with a blank or invalid id are skipped with a warning. A file without
/// an `id` column is an error.
pub fn read_id_csv<R: Read>(reader: R, kind: ResourceKind) -> Result<IdList> {
    let mut rdr = csv::Reader::from_reader(reader);
    let id_index = rdr
        .headers()?
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case("id"))
        .ok_or_else(|| BatchError::Validation("CSV has no 'id' column".to_string()))?;

    let mut list = IdList::default();
    for (pos, record) in rdr.records().enumerate() {
        // header is line 1
        let line = pos + 2;
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                list.skipped.push((line, e.to_string()));
                continue;
            }
        };

        let raw = record.get(id_index).unwrap_or_default();
        match raw.parse::<ResourceId>() {
            Ok(id) => {
                let resource = ResourceRef::new(id, kind);
                if !list.refs.contains(&resource) {
                    list.refs.push(resource);
                }
            }
            Err(reason) => list.skipped.push((line, reason)),
        }
    }

    for (line, reason) in &list.skipped {
        tracing::warn!(line, reason = %reason, "Skipping id CSV row");
    }

    Ok(list)
}

/// Read `path` and parse its ids
pub async fn read_id_file(path: impl AsRef<Path>, kind: ResourceKind) -> Result<IdList> {
    let path = path.as_ref();
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| BatchError::Output(format!("Failed to open {}: {e}", path.display())))?;
    read_id_csv(bytes.as_slice(), kind)
}
