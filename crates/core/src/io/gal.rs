//! GAL adjacency-list format
//!
//! The GAL text format stores neighbor membership (not weights): a header
//! line with the unit count, then for each unit a line `id k` followed by
//! a line listing its k neighbor ids. Weights travel out of band, so a
//! round trip preserves membership only.

use std::fs;
use std::io::Write as _;
use std::path::Path;

use crate::error::{Error, Result};
use crate::units::UnitId;

/// Neighbor membership keyed by unit id, in file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdjacencyList {
    /// Unit ids in order of appearance.
    pub ids: Vec<UnitId>,
    /// Per-unit neighbor ids, parallel to `ids`.
    pub neighbors: Vec<Vec<UnitId>>,
}

impl AdjacencyList {
    /// Number of units.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Write an adjacency list to a GAL file.
pub fn write_gal<P: AsRef<Path>>(path: P, adjacency: &AdjacencyList) -> Result<()> {
    let mut file = fs::File::create(path)?;
    write!(file, "{}", format_gal(adjacency)?)?;
    Ok(())
}

/// Render an adjacency list as GAL text.
pub fn format_gal(adjacency: &AdjacencyList) -> Result<String> {
    if adjacency.ids.len() != adjacency.neighbors.len() {
        return Err(Error::LengthMismatch {
            expected: adjacency.ids.len(),
            actual: adjacency.neighbors.len(),
        });
    }

    let mut out = String::new();
    out.push_str(&format!("{}\n", adjacency.ids.len()));
    for (id, neighbors) in adjacency.ids.iter().zip(&adjacency.neighbors) {
        out.push_str(&format!("{} {}\n", id, neighbors.len()));
        out.push_str(&neighbors.join(" "));
        out.push('\n');
    }
    Ok(out)
}

/// Read a GAL file into an adjacency list.
pub fn read_gal<P: AsRef<Path>>(path: P) -> Result<AdjacencyList> {
    let text = fs::read_to_string(path)?;
    parse_gal(&text)
}

/// Parse GAL text into an adjacency list.
pub fn parse_gal(text: &str) -> Result<AdjacencyList> {
    let mut lines = text.lines().filter(|l| !l.trim().is_empty());

    let header = lines.next().ok_or_else(|| gal_error("empty file"))?;
    // Some GAL writers emit "0 n file-stem id-variable"; the count is the
    // sole mandatory field, or the second when four are present.
    let fields: Vec<&str> = header.split_whitespace().collect();
    let count_field = match fields.len() {
        1 => fields[0],
        4 => fields[1],
        _ => return Err(gal_error("header must have 1 or 4 fields")),
    };
    let n: usize = count_field
        .parse()
        .map_err(|_| gal_error("header count is not an integer"))?;

    let mut ids = Vec::with_capacity(n);
    let mut neighbors = Vec::with_capacity(n);

    for _ in 0..n {
        let head = lines
            .next()
            .ok_or_else(|| gal_error("truncated file: missing unit line"))?;
        let mut parts = head.split_whitespace();
        let id = parts
            .next()
            .ok_or_else(|| gal_error("unit line missing id"))?;
        let k: usize = parts
            .next()
            .ok_or_else(|| gal_error("unit line missing neighbor count"))?
            .parse()
            .map_err(|_| gal_error("neighbor count is not an integer"))?;

        let unit_neighbors: Vec<UnitId> = if k == 0 {
            // Island: some writers omit the (empty) neighbor line
            Vec::new()
        } else {
            let line = lines
                .next()
                .ok_or_else(|| gal_error("truncated file: missing neighbor line"))?;
            let parsed: Vec<UnitId> =
                line.split_whitespace().map(str::to_string).collect();
            if parsed.len() != k {
                return Err(gal_error(&format!(
                    "unit {} declares {} neighbors but lists {}",
                    id,
                    k,
                    parsed.len()
                )));
            }
            parsed
        };

        ids.push(id.to_string());
        neighbors.push(unit_neighbors);
    }

    Ok(AdjacencyList { ids, neighbors })
}

fn gal_error(reason: &str) -> Error {
    Error::Format {
        format: "GAL",
        reason: reason.to_string(),
    }
}
