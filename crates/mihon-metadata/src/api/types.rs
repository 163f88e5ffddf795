//! Jikan API v4 response types.
//!
//! Only the parts of the manga search payload the fetcher reads are modelled;
//! unknown fields are ignored.

use serde::{Deserialize, Serialize};

/// Search response (`GET /manga?q=...`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub data: Vec<MangaEntry>,
}

/// One manga in a search result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MangaEntry {
    pub mal_id: u32,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub images: MangaImages,

    // Titles
    #[serde(default)]
    pub title: String,
    pub title_english: Option<String>,
    pub title_japanese: Option<String>,

    // Type and status
    #[serde(rename = "type")]
    pub manga_type: Option<String>,
    pub status: Option<String>,
    #[serde(default)]
    pub publishing: bool,

    pub synopsis: Option<String>,

    // People
    #[serde(default)]
    pub authors: Vec<AuthorEntry>,

    // Genres, themes, demographics
    #[serde(default)]
    pub genres: Vec<MalEntity>,
    #[serde(default)]
    pub themes: Vec<MalEntity>,
    #[serde(default)]
    pub demographics: Vec<MalEntity>,
}

/// Manga images, per encoding
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MangaImages {
    #[serde(default)]
    pub jpg: Option<ImageSet>,
    #[serde(default)]
    pub webp: Option<ImageSet>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImageSet {
    pub image_url: Option<String>,
    pub small_image_url: Option<String>,
    pub large_image_url: Option<String>,
}

impl MangaImages {
    /// Best available cover URL, largest variant first
    pub fn best_url(&self) -> Option<&str> {
        let sets: Vec<&ImageSet> = [self.jpg.as_ref(), self.webp.as_ref()]
            .into_iter()
            .flatten()
            .collect();

        let large = sets.iter().copied().filter_map(|s| s.large_image_url.as_deref());
        let regular = sets.iter().copied().filter_map(|s| s.image_url.as_deref());
        let small = sets.iter().copied().filter_map(|s| s.small_image_url.as_deref());

        large
            .chain(regular)
            .chain(small)
            .find(|url| !url.is_empty())
    }
}

/// Credited person
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorEntry {
    #[serde(default)]
    pub mal_id: u32,
    pub name: String,
    /// e.g. "Story & Art"; absent from search results
    #[serde(default)]
    pub role: Option<String>,
}

/// MAL entity (genre, theme, demographic)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MalEntity {
    pub mal_id: u32,
    #[serde(rename = "type", default)]
    pub entity_type: String,
    pub name: String,
    #[serde(default)]
    pub url: String,
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn test_parse_search_response() {
        let response: SearchResponse = serde_json::from_str(BERSERK_SEARCH).unwrap();
        assert_eq!(response.data.len(), 2);

        let berserk = &response.data[0];
        assert_eq!(berserk.title, "Berserk");
        assert_eq!(berserk.status.as_deref(), Some("On Hiatus"));
        assert_eq!(berserk.authors.len(), 2);
        assert!(berserk.authors[0].role.is_none());
        assert_eq!(berserk.genres[1].name, "Adventure");

        // Sparse entries still parse
        let prototype = &response.data[1];
        assert!(prototype.authors.is_empty());
        assert!(prototype.genres.is_empty());
        assert!(prototype.synopsis.is_none());
    }

    #[test]
    fn test_parse_empty_search() {
        let response: SearchResponse = serde_json::from_str(EMPTY_SEARCH).unwrap();
        assert!(response.data.is_empty());
    }

    #[test]
    fn test_best_cover_url() {
        let response: SearchResponse = serde_json::from_str(BERSERK_SEARCH).unwrap();

        assert_eq!(
            response.data[0].images.best_url(),
            Some("https://cdn.myanimelist.net/images/manga/1/157897l.jpg")
        );
        assert_eq!(response.data[1].images.best_url(), None);
    }

    #[test]
    fn test_best_cover_url_falls_back_to_webp() {
        let images = MangaImages {
            jpg: Some(ImageSet {
                image_url: None,
                small_image_url: Some("small.jpg".to_string()),
                large_image_url: Some(String::new()),
            }),
            webp: Some(ImageSet {
                image_url: None,
                small_image_url: None,
                large_image_url: Some("large.webp".to_string()),
            }),
        };

        assert_eq!(images.best_url(), Some("large.webp"));
    }
}
