//! Helpers for working within SQLite's statement limits.

/// Bound parameters allowed in one statement.
///
/// SQLite's compile-time `SQLITE_MAX_VARIABLE_NUMBER` defaults to 999 on
/// older builds; staying under it keeps statements portable across builds.
pub const SQLITE_MAX_BIND_PARAMS: usize = 999;

/// Rows per multi-row `INSERT` for a table with `columns` bound columns.
pub const fn rows_per_insert(columns: usize) -> usize {
    SQLITE_MAX_BIND_PARAMS / columns
}

/// Chunk a slice so each chunk fits in one multi-row `INSERT`.
pub fn chunk_for_insert<T>(items: &[T], columns: usize) -> impl Iterator<Item = &[T]> {
    items.chunks(rows_per_insert(columns).max(1))
}
