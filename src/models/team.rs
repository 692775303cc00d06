//! Team, category and affiliation models

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Team database model
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Team {
    pub id: Uuid,
    pub name: String,
    pub display_name: Option<String>,
    pub category_id: Uuid,
    pub affiliation_id: Option<Uuid>,
    /// Fixed penalty offset added to the team's total time, in scoreboard
    /// time units
    pub penalty: i64,
    pub enabled: bool,
}

impl Team {
    /// Name shown on the scoreboard
    pub fn effective_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.name)
    }
}

/// Team category database model.
///
/// The sort order partitions the scoreboard: teams are only ever ranked
/// against teams in a category with the same sort order.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct TeamCategory {
    pub id: Uuid,
    pub name: String,
    pub sort_order: i32,
    pub visible: bool,
}

/// Team affiliation database model
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct TeamAffiliation {
    pub id: Uuid,
    pub name: String,
    /// ISO 3166-1 alpha-3 country code
    pub country: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_name_prefers_display_name() {
        let mut team = Team {
            id: Uuid::new_v4(),
            name: "team-42".to_string(),
            display_name: Some("The Answer".to_string()),
            category_id: Uuid::new_v4(),
            affiliation_id: None,
            penalty: 0,
            enabled: true,
        };
        assert_eq!(team.effective_name(), "The Answer");

        team.display_name = None;
        assert_eq!(team.effective_name(), "team-42");
    }
}
