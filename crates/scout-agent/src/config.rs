use serde::{Deserialize, Serialize};

/// Tunables for one research run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchConfig {
    /// Maximum number of dispatched actions before forced synthesis.
    #[serde(default = "default_max_interactions")]
    pub max_interactions: u32,

    /// Attempts per reasoning-service call before escalating.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Results requested per search.
    #[serde(default = "default_search_top_k")]
    pub search_top_k: usize,

    /// Fragments retrieved from the index when drafting a section.
    #[serde(default = "default_retrieve_k")]
    pub retrieve_k: usize,

    /// Context window (characters) around the matched sentence for
    /// high-ranked results.
    #[serde(default = "default_context_chars")]
    pub context_chars: usize,

    /// Context window for lower-ranked results.
    #[serde(default = "default_context_chars_low")]
    pub context_chars_low: usize,

    /// Results ranked below this cutoff get the smaller window.
    #[serde(default = "default_high_rank_cutoff")]
    pub high_rank_cutoff: usize,
}

fn default_max_interactions() -> u32 {
    20
}

fn default_max_retries() -> u32 {
    3
}

fn default_search_top_k() -> usize {
    10
}

fn default_retrieve_k() -> usize {
    3
}

fn default_context_chars() -> usize {
    4000
}

fn default_context_chars_low() -> usize {
    2000
}

fn default_high_rank_cutoff() -> usize {
    5
}

impl Default for ResearchConfig {
    fn default() -> Self {
        Self {
            max_interactions: default_max_interactions(),
            max_retries: default_max_retries(),
            search_top_k: default_search_top_k(),
            retrieve_k: default_retrieve_k(),
            context_chars: default_context_chars(),
            context_chars_low: default_context_chars_low(),
            high_rank_cutoff: default_high_rank_cutoff(),
        }
    }
}

impl ResearchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_interactions(mut self, max_interactions: u32) -> Self {
        self.max_interactions = max_interactions;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_search_top_k(mut self, search_top_k: usize) -> Self {
        self.search_top_k = search_top_k;
        self
    }

    pub fn with_retrieve_k(mut self, retrieve_k: usize) -> Self {
        self.retrieve_k = retrieve_k;
        self
    }

    /// Window size for a result at the given rank.
    pub fn window_for_rank(&self, rank: usize) -> usize {
        if rank < self.high_rank_cutoff {
            self.context_chars
        } else {
            self.context_chars_low
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = ResearchConfig::default();
        assert_eq!(config.max_interactions, 20);
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.search_top_k, 10);
        assert_eq!(config.retrieve_k, 3);
    }

    #[test]
    fn test_window_for_rank() {
        let config = ResearchConfig::default();
        assert_eq!(config.window_for_rank(0), 4000);
        assert_eq!(config.window_for_rank(4), 4000);
        assert_eq!(config.window_for_rank(5), 2000);
        assert_eq!(config.window_for_rank(9), 2000);
    }

    #[test]
    fn test_config_builder() {
        let config = ResearchConfig::new()
            .with_max_interactions(3)
            .with_max_retries(1)
            .with_search_top_k(5);
        assert_eq!(config.max_interactions, 3);
        assert_eq!(config.max_retries, 1);
        assert_eq!(config.search_top_k, 5);
    }
}
