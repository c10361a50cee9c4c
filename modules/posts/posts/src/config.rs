use serde::Deserialize;

/// Configuration for the posts module.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PostsConfig {
    /// Longest accepted title, in characters.
    pub max_title_length: usize,
}

impl Default for PostsConfig {
    fn default() -> Self {
        Self {
            max_title_length: 255,
        }
    }
}
