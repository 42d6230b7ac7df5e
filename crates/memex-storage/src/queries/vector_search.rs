//! Dense vector index: brute-force L2/cosine scan over blob-stored f32
//! vectors (§3.2, §4.1). No sqlite-vec extension is loaded, matching the
//! fallback path `cortex-vector`'s own search engine uses when that
//! extension isn't present.

use rusqlite::{params, Connection};

use memex_core::errors::{MemexResult, StorageError};

/// Attach or replace a unit-norm vector for `row_id` (§4.1 `insert_vec`).
pub fn insert_vec(conn: &Connection, row_id: i64, vector: &[f32]) -> MemexResult<()> {
    let blob = f32_vec_to_bytes(vector);
    conn.execute(
        "INSERT INTO entry_vectors (row_id, dims, vector) VALUES (?1, ?2, ?3)
         ON CONFLICT(row_id) DO UPDATE SET dims = excluded.dims, vector = excluded.vector",
        params![row_id, vector.len() as i64, blob],
    )
    .map_err(StorageError::from)?;
    Ok(())
}

pub fn get_vec(conn: &Connection, row_id: i64) -> MemexResult<Option<Vec<f32>>> {
    let row: Option<(Vec<u8>, i64)> = conn
        .query_row(
            "SELECT vector, dims FROM entry_vectors WHERE row_id = ?1",
            params![row_id],
            |r| Ok((r.get(0)?, r.get(1)?)),
        )
        .optional_storage()?;
    Ok(row.map(|(blob, dims)| bytes_to_f32_vec(&blob, dims as usize)))
}

/// `search_vec(v, limit) -> (row_id, distance) ordered by ascending
/// distance`. Distance is L2 on unit-norm vectors (§4.1).
pub fn search_vec(
    conn: &Connection,
    query: &[f32],
    limit: usize,
) -> MemexResult<Vec<(i64, f32)>> {
    let query_norm_sq: f32 = query.iter().map(|x| x * x).sum();
    if query_norm_sq == 0.0 {
        return Ok(Vec::new());
    }

    let mut stmt = conn
        .prepare("SELECT row_id, vector, dims FROM entry_vectors")
        .map_err(StorageError::from)?;
    let rows = stmt
        .query_map([], |row| {
            let row_id: i64 = row.get(0)?;
            let blob: Vec<u8> = row.get(1)?;
            let dims: i64 = row.get(2)?;
            Ok((row_id, blob, dims))
        })
        .map_err(StorageError::from)?;

    let mut scored = Vec::new();
    for r in rows {
        let (row_id, blob, dims) = r.map_err(StorageError::from)?;
        if dims as usize != query.len() {
            continue;
        }
        let stored = bytes_to_f32_vec(&blob, dims as usize);
        let distance = l2_distance(query, &stored);
        scored.push((row_id, distance));
    }

    scored.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(limit);
    Ok(scored)
}

fn f32_vec_to_bytes(v: &[f32]) -> Vec<u8> {
    v.iter().flat_map(|f| f.to_le_bytes()).collect()
}

fn bytes_to_f32_vec(bytes: &[u8], expected_dims: usize) -> Vec<f32> {
    let mut result = Vec::with_capacity(expected_dims);
    for chunk in bytes.chunks_exact(4) {
        result.push(f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]));
    }
    result
}

fn l2_distance(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f32>()
        .sqrt()
}

trait OptionalStorage<T> {
    fn optional_storage(self) -> MemexResult<Option<T>>;
}

impl<T> OptionalStorage<T> for Result<T, rusqlite::Error> {
    fn optional_storage(self) -> MemexResult<Option<T>> {
        match self {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(StorageError::from(e).into()),
        }
    }
}
