//! Core data models for artist resolution.
//!
//! Search candidates, the artist record returned by the detail endpoint, and
//! the fixed-column result table produced for a batch of search terms.

use serde::Serialize;
use serde_json::Value;
use std::fmt;

use crate::json_path::{lookup, lookup_str, lookup_u64};

/// Genius artist identifier.
pub type ArtistId = u64;

// ============================================================================
// Search Models
// ============================================================================

/// Primary artist of one search hit, kept only when it has a non-zero id and a
/// non-empty name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Candidate {
    pub id: ArtistId,
    pub name: String,
}

impl Candidate {
    pub fn new(id: ArtistId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// Read `result.primary_artist.{id,name}` from one hit.
    pub fn from_hit(hit: &Value) -> Option<Self> {
        let id = lookup_u64(hit, &["result", "primary_artist", "id"]).filter(|&id| id != 0)?;
        let name = lookup_str(hit, &["result", "primary_artist", "name"]).filter(|n| !n.is_empty())?;
        Some(Self::new(id, name))
    }
}

/// Which rule of the matching policy picked a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchTier {
    /// Trimmed, case-insensitive name equality
    Exact,
    /// Closest name by sequence ratio, at or above the cutoff
    Fuzzy,
    /// First candidate in hit order
    Fallback,
}

impl fmt::Display for MatchTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MatchTier::Exact => "exact",
            MatchTier::Fuzzy => "fuzzy",
            MatchTier::Fallback => "fallback",
        };
        f.write_str(s)
    }
}

// ============================================================================
// Artist Record
// ============================================================================

/// Follower count fields, in lookup priority order.
const FOLLOWER_PATHS: [&[&str]; 3] = [&["followers_count"], &["followers"], &["stats", "followers"]];

/// The `response.artist` object from `/artists/{id}`, kept as raw JSON.
#[derive(Clone, Debug, PartialEq)]
pub struct ArtistRecord {
    raw: Value,
}

impl ArtistRecord {
    pub fn new(raw: Value) -> Self {
        Self { raw }
    }

    /// Extract `response.artist` from a detail response.
    pub fn from_response(body: &Value) -> Option<Self> {
        lookup(body, &["response", "artist"]).cloned().map(Self::new)
    }

    pub fn name(&self) -> Option<&str> {
        lookup_str(&self.raw, &["name"])
    }

    pub fn id(&self) -> Option<ArtistId> {
        lookup_u64(&self.raw, &["id"])
    }

    /// First follower field that is present (non-null) decides the count,
    /// so a stored `0` is kept. A present but non-integer value reads as absent.
    pub fn followers_count(&self) -> Option<u64> {
        FOLLOWER_PATHS
            .iter()
            .find_map(|path| lookup(&self.raw, path))
            .and_then(Value::as_u64)
    }

    pub fn raw(&self) -> &Value {
        &self.raw
    }
}

// ============================================================================
// Output Models
// ============================================================================

/// Column names of the result table, in order.
pub const COLUMNS: [&str; 4] = ["search_term", "artist_name", "artist_id", "followers_count"];

/// One output row per input search term.
///
/// When resolution failed or found nothing, only `search_term` is set.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ResolutionRow {
    pub search_term: String,
    pub artist_name: Option<String>,
    pub artist_id: Option<ArtistId>,
    pub followers_count: Option<u64>,
}

impl ResolutionRow {
    pub fn unresolved(search_term: impl Into<String>) -> Self {
        Self {
            search_term: search_term.into(),
            artist_name: None,
            artist_id: None,
            followers_count: None,
        }
    }

    pub fn from_record(search_term: impl Into<String>, record: &ArtistRecord) -> Self {
        Self {
            search_term: search_term.into(),
            artist_name: record.name().map(str::to_string),
            artist_id: record.id(),
            followers_count: record.followers_count(),
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.artist_name.is_some() || self.artist_id.is_some() || self.followers_count.is_some()
    }

    fn cells(&self) -> [String; 4] {
        fn opt<T: ToString>(v: &Option<T>) -> String {
            v.as_ref().map_or_else(|| "None".to_string(), T::to_string)
        }
        [
            self.search_term.clone(),
            opt(&self.artist_name),
            opt(&self.artist_id),
            opt(&self.followers_count),
        ]
    }
}

/// Ordered rows with the fixed `COLUMNS` schema, even when empty.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ResultTable {
    rows: Vec<ResolutionRow>,
}

impl ResultTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, row: ResolutionRow) {
        self.rows.push(row);
    }

    pub fn columns(&self) -> &'static [&'static str] {
        &COLUMNS
    }

    pub fn rows(&self) -> &[ResolutionRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn resolved_count(&self) -> usize {
        self.rows.iter().filter(|r| r.is_resolved()).count()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Write the table as a JSON array of row objects.
    pub fn write_json(&self, path: &std::path::Path) -> anyhow::Result<()> {
        let json = self.to_json()?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

impl FromIterator<ResolutionRow> for ResultTable {
    fn from_iter<I: IntoIterator<Item = ResolutionRow>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for ResultTable {
    /// Aligned text table with a leading row index column.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cells: Vec<[String; 4]> = self.rows.iter().map(ResolutionRow::cells).collect();
        let index_width = self.rows.len().saturating_sub(1).to_string().len();

        let mut widths = COLUMNS.map(str::len);
        for row in &cells {
            for (w, cell) in widths.iter_mut().zip(row) {
                *w = (*w).max(cell.chars().count());
            }
        }

        write!(f, "{:index_width$}", "")?;
        for (name, w) in COLUMNS.iter().zip(widths) {
            write!(f, "  {:<w$}", name)?;
        }
        for (i, row) in cells.iter().enumerate() {
            writeln!(f)?;
            write!(f, "{:<index_width$}", i)?;
            for (cell, w) in row.iter().zip(widths) {
                write!(f, "  {:<w$}", cell)?;
            }
        }
        Ok(())
    }
}
