use serde::{Deserialize, Serialize};

use crate::config;

// ---------------------------------------------------------------------------
// Pack — one purchasable expansion in the public catalog
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pack {
    pub code: String,
    pub name: String,
}

// ---------------------------------------------------------------------------
// Card — one card record as served by the public card API
// ---------------------------------------------------------------------------

/// The card API's cost field is usually a number but occasionally a string
/// (e.g. "X" costs), so it is kept loosely typed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CardCost {
    Number(i64),
    Text(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Card {
    pub code: String,
    pub name: String,
    pub pack_code: String,
    pub pack_name: Option<String>,
    pub type_code: Option<String>,
    pub type_name: Option<String>,
    pub sphere_code: Option<String>,
    pub sphere_name: Option<String>,
    pub cost: Option<CardCost>,
    pub threat: Option<i64>,
    pub willpower: Option<i64>,
    pub attack: Option<i64>,
    pub defense: Option<i64>,
    pub health: Option<i64>,
    pub traits: Option<String>,
    pub text: Option<String>,
}

impl Card {
    /// Whether this card belongs to the player card pool (as opposed to
    /// encounter and quest cards).
    pub fn is_player_card(&self) -> bool {
        self.type_code
            .as_deref()
            .map(|t| config::PLAYER_TYPE_CODES.contains(&t))
            .unwrap_or(false)
    }

    /// One-line stat summary for display.
    ///
    /// Heroes show threat and the full stat block; other cards show cost and
    /// the stat block only when at least one stat is present.
    pub fn stats_line(&self) -> String {
        fn stat(v: Option<i64>) -> String {
            v.map(|n| n.to_string()).unwrap_or_else(|| "-".to_string())
        }

        if self.type_code.as_deref() == Some("hero") {
            return format!(
                "Threat {} * {}/{}/{}/{}",
                stat(self.threat),
                stat(self.willpower),
                stat(self.attack),
                stat(self.defense),
                stat(self.health),
            );
        }

        let cost = match &self.cost {
            Some(CardCost::Number(n)) => n.to_string(),
            Some(CardCost::Text(s)) => s.clone(),
            None => "-".to_string(),
        };
        let mut line = format!("Cost {}", cost);

        if self.willpower.is_some()
            || self.attack.is_some()
            || self.defense.is_some()
            || self.health.is_some()
        {
            line.push_str(&format!(
                " * {}/{}/{}/{}",
                stat(self.willpower),
                stat(self.attack),
                stat(self.defense),
                stat(self.health),
            ));
        }

        line
    }
}
