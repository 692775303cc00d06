//! Scoreboard scope filter

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Restricts a scoreboard build to a subset of teams.
///
/// Empty vectors mean "no restriction" for that dimension; the dimensions
/// combine conjunctively.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Filter {
    pub categories: Vec<Uuid>,
    pub affiliations: Vec<Uuid>,
    pub countries: Vec<String>,
    pub teams: Vec<Uuid>,
}

impl Filter {
    /// A filter that keeps every team
    pub fn none() -> Self {
        Self::default()
    }

    /// Restrict to a single team
    pub fn for_team(team_id: Uuid) -> Self {
        Self {
            teams: vec![team_id],
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
            && self.affiliations.is_empty()
            && self.countries.is_empty()
            && self.teams.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_filter() {
        assert!(Filter::none().is_empty());
        assert!(!Filter::for_team(Uuid::new_v4()).is_empty());
    }
}
