//! Result presenter: shapes movie summaries into render-ready records.

use cinedeck_api::tmdb::MovieSummary;

/// Default TMDB image base URL.
pub const DEFAULT_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p";

/// Poster shown when a movie has no poster path.
pub const PLACEHOLDER_POSTER_URL: &str = "https://via.placeholder.com/200x300?text=No+Image";

/// Synopsis shown when a movie has no overview.
pub const NO_SYNOPSIS: &str = "概要なし";

/// Suffix appended to a truncated synopsis.
pub const ELLIPSIS: &str = "...";

/// Poster image size segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSize {
    /// 200px wide thumbnails (search results).
    W200,
    /// 500px wide posters (carousel, list).
    W500,
}

impl ImageSize {
    /// Every supported size.
    pub const ALL: [Self; 2] = [Self::W200, Self::W500];

    /// URL path segment.
    #[must_use]
    pub const fn segment(self) -> &'static str {
        match self {
            Self::W200 => "w200",
            Self::W500 => "w500",
        }
    }
}

/// How one view presents its records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresentationProfile {
    /// Poster size.
    pub image_size: ImageSize,
    /// Synopsis character budget (`None` = untruncated).
    pub synopsis_budget: Option<usize>,
}

/// A display-ready movie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderRecord {
    /// TMDB movie ID.
    pub id: u64,
    /// Title.
    pub title: String,
    /// Absolute poster URL or the placeholder.
    pub poster_url: String,
    /// Possibly truncated overview, or [`NO_SYNOPSIS`].
    pub synopsis: String,
}

/// Maps movies to records for a fixed image base and profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Presenter {
    image_base_url: String,
    profile: PresentationProfile,
}

impl Presenter {
    /// Creates a presenter. A trailing `/` on the base URL is ignored.
    pub fn new(image_base_url: impl Into<String>, profile: PresentationProfile) -> Self {
        let mut image_base_url = image_base_url.into();
        while image_base_url.ends_with('/') {
            image_base_url.pop();
        }
        Self {
            image_base_url,
            profile,
        }
    }

    /// Profile this presenter applies.
    #[must_use]
    pub const fn profile(&self) -> PresentationProfile {
        self.profile
    }

    /// Presents one movie.
    #[must_use]
    pub fn present(&self, movie: &MovieSummary) -> RenderRecord {
        RenderRecord {
            id: movie.id,
            title: movie.title.clone(),
            poster_url: poster_url(
                &self.image_base_url,
                self.profile.image_size,
                movie.poster_path.as_deref(),
            ),
            synopsis: synopsis(&movie.overview, self.profile.synopsis_budget),
        }
    }

    /// Presents a result list, preserving order.
    #[must_use]
    pub fn present_all(&self, movies: &[MovieSummary]) -> Vec<RenderRecord> {
        movies.iter().map(|movie| self.present(movie)).collect()
    }
}

/// Builds `base/size + path`, or the placeholder when the path is absent.
#[must_use]
pub fn poster_url(image_base_url: &str, size: ImageSize, poster_path: Option<&str>) -> String {
    poster_path.map_or_else(
        || String::from(PLACEHOLDER_POSTER_URL),
        |path| format!("{image_base_url}/{}{path}", size.segment()),
    )
}

/// Truncates an overview to `budget` characters.
///
/// An overview no longer than the budget is returned as is; a longer one is
/// cut and gets exactly one [`ELLIPSIS`]. Empty overviews become
/// [`NO_SYNOPSIS`].
#[must_use]
pub fn synopsis(overview: &str, budget: Option<usize>) -> String {
    if overview.is_empty() {
        return String::from(NO_SYNOPSIS);
    }
    let Some(budget) = budget else {
        return String::from(overview);
    };
    match overview.char_indices().nth(budget) {
        Some((cut, _)) => {
            let mut truncated = String::with_capacity(cut.saturating_add(ELLIPSIS.len()));
            truncated.push_str(overview.get(..cut).unwrap_or(overview));
            truncated.push_str(ELLIPSIS);
            truncated
        }
        None => String::from(overview),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use super::*;

    fn profile(image_size: ImageSize, synopsis_budget: Option<usize>) -> PresentationProfile {
        PresentationProfile {
            image_size,
            synopsis_budget,
        }
    }

    #[test]
    fn test_poster_url_for_every_size() {
        // Arrange
        let movie = MovieSummary::new(1, "A", "x").poster_path("/abc.jpg");

        for size in ImageSize::ALL {
            let presenter = Presenter::new(DEFAULT_IMAGE_BASE_URL, profile(size, None));

            // Act
            let record = presenter.present(&movie);

            // Assert
            assert_eq!(
                record.poster_url,
                format!("https://image.tmdb.org/t/p/{}/abc.jpg", size.segment())
            );
        }
    }

    #[test]
    fn test_missing_poster_uses_placeholder() {
        // Arrange
        let movie = MovieSummary::new(1, "A", "x");
        let presenter = Presenter::new(DEFAULT_IMAGE_BASE_URL, profile(ImageSize::W200, None));

        // Act
        let record = presenter.present(&movie);

        // Assert
        assert_eq!(record.poster_url, PLACEHOLDER_POSTER_URL);
    }

    #[test]
    fn test_image_base_trailing_slash_ignored() {
        // Arrange
        let movie = MovieSummary::new(1, "A", "x").poster_path("/p.jpg");
        let presenter = Presenter::new(
            "http://images.local/t/p/",
            profile(ImageSize::W500, None),
        );

        // Act
        let record = presenter.present(&movie);

        // Assert
        assert_eq!(record.poster_url, "http://images.local/t/p/w500/p.jpg");
    }

    #[test]
    fn test_synopsis_exact_budget_not_truncated() {
        // Arrange
        let overview = "a".repeat(100);

        // Act
        let result = synopsis(&overview, Some(100));

        // Assert
        assert_eq!(result, overview);
    }

    #[test]
    fn test_synopsis_budget_plus_one_truncated_once() {
        // Arrange
        let overview = "a".repeat(151);

        // Act
        let result = synopsis(&overview, Some(150));

        // Assert
        assert_eq!(result, format!("{}...", "a".repeat(150)));
        assert_eq!(result.matches(ELLIPSIS).count(), 1);
    }

    #[test]
    fn test_synopsis_counts_characters_not_bytes() {
        // Arrange
        let overview = "映".repeat(101);

        // Act
        let result = synopsis(&overview, Some(100));

        // Assert
        assert_eq!(result.chars().count(), 103);
        assert!(result.starts_with(&"映".repeat(100)));
        assert!(result.ends_with(ELLIPSIS));
    }

    #[test]
    fn test_synopsis_empty_overview() {
        // Arrange & Act & Assert
        assert_eq!(synopsis("", Some(100)), NO_SYNOPSIS);
        assert_eq!(synopsis("", None), NO_SYNOPSIS);
    }

    #[test]
    fn test_synopsis_unbounded() {
        // Arrange
        let overview = "b".repeat(1000);

        // Act & Assert
        assert_eq!(synopsis(&overview, None), overview);
    }

    #[test]
    fn test_present_all_preserves_order() {
        // Arrange
        let movies = vec![
            MovieSummary::new(3, "C", ""),
            MovieSummary::new(1, "A", "short"),
        ];
        let presenter = Presenter::new(DEFAULT_IMAGE_BASE_URL, profile(ImageSize::W500, Some(100)));

        // Act
        let records = presenter.present_all(&movies);

        // Assert
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, 3);
        assert_eq!(records[0].synopsis, NO_SYNOPSIS);
        assert_eq!(records[1].synopsis, "short");
    }

    #[test]
    fn test_present_all_empty() {
        // Arrange
        let presenter = Presenter::new(DEFAULT_IMAGE_BASE_URL, profile(ImageSize::W500, Some(100)));

        // Act & Assert
        assert!(presenter.present_all(&[]).is_empty());
    }

    #[test]
    fn test_present_is_deterministic() {
        // Arrange
        let movie = MovieSummary::new(9, "Z", "c".repeat(120)).poster_path("/z.jpg");
        let presenter = Presenter::new(DEFAULT_IMAGE_BASE_URL, profile(ImageSize::W500, Some(100)));

        // Act & Assert
        assert_eq!(presenter.present(&movie), presenter.present(&movie));
    }
}
