//! Picking one search candidate and shaping it into metadata.

use crate::api::types::{AuthorEntry, MalEntity, MangaEntry};
use shared::{DetailsRecord, MihonStatus};

/// How the chosen candidate relates to the folder name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    /// Title or English title equals the query, ignoring case
    Exact,
    /// One title contains the other
    Partial,
    /// Nothing matched; the first (most popular) candidate was used
    Fallback,
}

impl MatchKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchKind::Exact => "exact",
            MatchKind::Partial => "partial",
            MatchKind::Fallback => "fallback",
        }
    }
}

/// Metadata for one title, ready to be written
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub mal_id: u32,
    pub title: String,
    pub author: String,
    pub artist: String,
    pub description: String,
    pub genres: Vec<String>,
    pub status: MihonStatus,
    pub cover_url: Option<String>,
    pub match_kind: MatchKind,
}

impl SearchResult {
    /// Build the persisted record
    pub fn to_details(&self) -> DetailsRecord {
        DetailsRecord::new(
            self.title.clone(),
            self.author.clone(),
            self.artist.clone(),
            self.description.clone(),
            self.genres.clone(),
            self.status,
        )
    }

    /// Whether the folder name should be flagged as differing from the match.
    ///
    /// An exact match may have hit the English title, so it never differs.
    pub fn differs_from(&self, folder_name: &str) -> bool {
        self.match_kind != MatchKind::Exact && normalize(&self.title) != normalize(folder_name)
    }
}

/// Choose the candidate that best matches `query`.
///
/// Order of preference: the first exact (case-insensitive) match on the
/// title or English title, then the highest containment score, then the
/// first candidate. Ties keep the earlier candidate, so the result only
/// depends on the response order.
pub fn select_candidate<'a>(
    query: &str,
    candidates: &'a [MangaEntry],
) -> Option<(&'a MangaEntry, MatchKind)> {
    let query = normalize(query);
    let mut best: Option<(&MangaEntry, f64)> = None;

    for candidate in candidates {
        let titles = candidate_titles(candidate);

        if titles.iter().any(|title| *title == query) {
            return Some((candidate, MatchKind::Exact));
        }

        let score = titles
            .iter()
            .find(|title| title.contains(&query) || query.contains(title.as_str()))
            .map(|title| containment_score(&query, title));

        if let Some(score) = score {
            if best.map_or(true, |(_, best_score)| score > best_score) {
                best = Some((candidate, score));
            }
        }
    }

    best.map(|(candidate, _)| (candidate, MatchKind::Partial))
        .or_else(|| candidates.first().map(|first| (first, MatchKind::Fallback)))
}

/// Shape a search candidate into a [`SearchResult`]
pub fn build_search_result(
    entry: &MangaEntry,
    match_kind: MatchKind,
    include_themes: bool,
) -> SearchResult {
    let (author, artist) = credits(&entry.authors);

    let mut genres = names(&entry.genres);
    if include_themes {
        genres.extend(names(&entry.themes));
        genres.extend(names(&entry.demographics));
    }

    SearchResult {
        mal_id: entry.mal_id,
        title: entry.title.clone(),
        author,
        artist,
        description: entry.synopsis.clone().unwrap_or_default(),
        genres,
        status: MihonStatus::from_mal(entry.status.as_deref()),
        cover_url: entry.images.best_url().map(str::to_string),
        match_kind,
    }
}

fn normalize(title: &str) -> String {
    title.trim().to_lowercase()
}

/// Lowercased non-empty titles: the main one first, then the English one
fn candidate_titles(entry: &MangaEntry) -> Vec<String> {
    std::iter::once(entry.title.as_str())
        .chain(entry.title_english.as_deref())
        .map(normalize)
        .filter(|title| !title.is_empty())
        .collect()
}

fn containment_score(query: &str, title: &str) -> f64 {
    query.chars().count() as f64 / title.chars().count().max(1) as f64
}

/// Author and artist strings.
///
/// Entries carrying a role are split into "Story" and "Art" credits. A side
/// without a matching credit, or a list without roles, uses the first name.
fn credits(authors: &[AuthorEntry]) -> (String, String) {
    let first = authors
        .first()
        .map(|author| author.name.clone())
        .unwrap_or_default();

    let author = credited(authors, "story").unwrap_or_else(|| first.clone());
    let artist = credited(authors, "art").unwrap_or(first);

    (author, artist)
}

fn credited(authors: &[AuthorEntry], role: &str) -> Option<String> {
    let names: Vec<&str> = authors
        .iter()
        .filter(|author| {
            author
                .role
                .as_deref()
                .is_some_and(|r| r.to_lowercase().contains(role))
        })
        .map(|author| author.name.as_str())
        .collect();

    (!names.is_empty()).then(|| names.join(", "))
}

fn names(entities: &[MalEntity]) -> Vec<String> {
    entities.iter().map(|entity| entity.name.clone()).collect()
}
