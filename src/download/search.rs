use std::path::Path;

use super::DownloadError;

/// Source of image URLs for a text query.
pub trait ImageSearch {
    /// Return at most `max_results` image URLs for `query`.
    fn image_urls(&self, query: &str, max_results: usize) -> Result<Vec<String>, DownloadError>;
}

/// Fixed list of URLs, returned for any query.
#[derive(Debug, Clone, Default)]
pub struct UrlListSearch {
    urls: Vec<String>,
}

impl UrlListSearch {
    pub fn new(urls: Vec<String>) -> Self {
        Self { urls }
    }

    /// Parse one URL per line; blank lines and `#` comments are ignored.
    pub fn parse(text: &str) -> Self {
        let urls = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(String::from)
            .collect();
        Self { urls }
    }

    pub fn from_file(path: &Path) -> Result<Self, DownloadError> {
        let text = std::fs::read_to_string(path).map_err(|err| {
            DownloadError::Search(format!("failed to read {}: {err}", path.display()))
        })?;
        Ok(Self::parse(&text))
    }

    pub fn urls(&self) -> &[String] {
        &self.urls
    }
}

impl ImageSearch for UrlListSearch {
    fn image_urls(&self, _query: &str, max_results: usize) -> Result<Vec<String>, DownloadError> {
        Ok(self.urls.iter().take(max_results).cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_skips_comments_and_blanks() {
        let search = UrlListSearch::parse(
            "# cats\nhttp://a/1.jpg\n\n   http://a/2.jpg  \n#http://skip\n",
        );
        assert_eq!(search.urls(), &["http://a/1.jpg", "http://a/2.jpg"]);
    }

    #[test]
    fn results_are_capped() {
        let search = UrlListSearch::new(vec!["a".into(), "b".into(), "c".into()]);
        assert_eq!(search.image_urls("q", 2).unwrap(), vec!["a", "b"]);
        assert_eq!(search.image_urls("q", 10).unwrap().len(), 3);
    }

    #[test]
    fn missing_file_is_a_search_error() {
        let err = UrlListSearch::from_file(Path::new("/definitely/not/here.txt")).unwrap_err();
        assert!(matches!(err, DownloadError::Search(_)));
    }
}
