use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::errors::GenerationError;
use crate::record::Record;

/// Write a record batch as CSV. Column order is the projection order of the
/// first record; every record in a batch shares it. Nulls render as empty
/// cells.
pub fn write_records_csv(path: &Path, records: &[Record]) -> Result<u64, GenerationError> {
    let writer = BufWriter::new(File::create(path)?);
    let counting = CountingWriter::new(writer);
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(counting);

    if let Some(first) = records.first() {
        let header: Vec<&str> = first.field_names().collect();
        writer.write_record(&header)?;

        for record in records {
            let row: Vec<String> = header
                .iter()
                .map(|name| record.get(name).map(|value| value.render()).unwrap_or_default())
                .collect();
            writer.write_record(&row)?;
        }
    }

    writer.flush()?;
    let counting = writer
        .into_inner()
        .map_err(|err| GenerationError::Io(err.into_error()))?;
    Ok(counting.bytes_written())
}

struct CountingWriter<W: Write> {
    inner: W,
    bytes: u64,
}

impl<W: Write> CountingWriter<W> {
    fn new(inner: W) -> Self {
        Self { inner, bytes: 0 }
    }

    fn bytes_written(&self) -> u64 {
        self.bytes
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let size = self.inner.write(buf)?;
        self.bytes = self.bytes.saturating_add(size as u64);
        Ok(size)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}
