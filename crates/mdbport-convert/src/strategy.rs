//! How a table is walked page by page

use mdbport_core::{MdbportError, PageCursor, Result, RowBatch, TableProbe, Value};

/// Paging strategy, chosen once per table from its probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PagingStrategy {
    /// Keyset paging on an integer identity column. Pages are disjoint and
    /// in ascending identity order whatever the batch size.
    Identity { column: String },
    /// Offset paging in the source's natural order. See
    /// [`PageCursor::Position`] for what this does not guarantee.
    Position,
}

impl PagingStrategy {
    /// Pick identity paging when the table has a column whose name matches
    /// one of `identity_columns` (ignoring ASCII case) and whose sampled
    /// value is an integer. An empty table has no sample and accepts the
    /// first matching column.
    ///
    /// The probe sees one row only; [`TableSource::is_unique_key`] still has
    /// to confirm the column before identity pages can be trusted.
    ///
    /// [`TableSource::is_unique_key`]: mdbport_core::TableSource::is_unique_key
    pub fn choose(probe: &TableProbe, identity_columns: &[String]) -> Self {
        for candidate in identity_columns {
            let Some(idx) = probe
                .columns
                .iter()
                .position(|c| c.eq_ignore_ascii_case(candidate))
            else {
                continue;
            };

            let usable =
                probe.sample.is_none() || probe.sample_value(idx).is_some_and(Value::is_integer);
            if usable {
                return PagingStrategy::Identity {
                    column: probe.columns[idx].clone(),
                };
            }
        }
        PagingStrategy::Position
    }

    pub fn first_cursor(&self) -> PageCursor {
        match self {
            PagingStrategy::Identity { column } => PageCursor::Identity {
                column: column.clone(),
                after: None,
            },
            PagingStrategy::Position => PageCursor::Position { skip: 0 },
        }
    }

    /// Cursor for the page after `batch`, `None` when `current` already
    /// covered the rest of the table.
    ///
    /// Identity paging fails if the batch has no integer identity or the
    /// identity did not move forward, since the next read would repeat it.
    pub fn next_cursor(&self, current: &PageCursor, batch: &RowBatch) -> Result<Option<PageCursor>> {
        match current {
            PageCursor::Unbounded => Ok(None),
            PageCursor::Position { skip } => Ok(Some(PageCursor::Position {
                skip: skip + batch.len() as u64,
            })),
            PageCursor::Identity { column, after } => {
                let idx = batch.column_index(column).ok_or_else(|| {
                    MdbportError::Other(format!("identity column '{}' missing from batch", column))
                })?;
                let max = batch.max_integer(idx).ok_or_else(|| {
                    MdbportError::Other(format!(
                        "identity column '{}' holds no integer values",
                        column
                    ))
                })?;
                if after.is_some_and(|after| max <= after) {
                    return Err(MdbportError::Other(format!(
                        "identity column '{}' did not advance past {}",
                        column, max
                    )));
                }
                Ok(Some(PageCursor::Identity {
                    column: column.clone(),
                    after: Some(max),
                }))
            }
        }
    }
}
