//! Input checks applied before anything reaches the factory or mutators.
//!
//! Rejections carry the message shown to the user. Accepted values are
//! passed through as typed; nothing is trimmed or normalised here except
//! the odds text.

use std::str::FromStr;

use anyhow::Result;

use crate::model::BetInput;
use crate::odds::parse_odds;

/// Text fields of a live prediction form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LiveFields {
    pub league: String,
    pub home_team: String,
    pub away_team: String,
    pub prediction: String,
    pub minute: String,
}

impl LiveFields {
    pub fn validate(&self) -> Result<()> {
        require("league", &self.league)?;
        require("home team", &self.home_team)?;
        require("away team", &self.away_team)?;
        require("prediction", &self.prediction)?;
        require("minute", &self.minute)?;
        Ok(())
    }
}

/// A bet row as entered, with odds still in text form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BetDraft {
    pub league: String,
    pub home_team: String,
    pub away_team: String,
    pub prediction: String,
    pub odds: String,
}

impl BetDraft {
    /// Check the match fields and parse the odds.
    pub fn into_input(self) -> Result<BetInput> {
        require("league", &self.league)?;
        require("home team", &self.home_team)?;
        require("away team", &self.away_team)?;
        require("prediction", &self.prediction)?;
        let odds = parse_odds(&self.odds)?;
        Ok(BetInput {
            league: self.league,
            home_team: self.home_team,
            away_team: self.away_team,
            prediction: self.prediction,
            odds,
        })
    }
}

/// Parses `league|home|away|prediction|odds`.
impl FromStr for BetDraft {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split('|').collect();
        anyhow::ensure!(
            parts.len() == 5,
            "bet must look like 'league|home|away|prediction|odds', got '{s}'"
        );
        Ok(BetDraft {
            league: parts[0].to_string(),
            home_team: parts[1].to_string(),
            away_team: parts[2].to_string(),
            prediction: parts[3].to_string(),
            odds: parts[4].to_string(),
        })
    }
}

/// A combined coupon ready to publish or to replace an existing one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CouponDraft {
    pub title: String,
    pub bets: Vec<BetInput>,
}

impl CouponDraft {
    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(
            !self.title.trim().is_empty() && !self.bets.is_empty(),
            "a coupon needs a title and at least one bet"
        );
        for (i, bet) in self.bets.iter().enumerate() {
            anyhow::ensure!(
                bet.odds.is_finite() && bet.odds > 1.0,
                "bet {i} has invalid odds {}: must be greater than 1",
                bet.odds
            );
        }
        Ok(())
    }
}

fn require(field: &str, value: &str) -> Result<()> {
    anyhow::ensure!(!value.trim().is_empty(), "{field} must not be blank");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn live() -> LiveFields {
        LiveFields {
            league: "Süper Lig".to_string(),
            home_team: "A".to_string(),
            away_team: "B".to_string(),
            prediction: "MS 1".to_string(),
            minute: "24".to_string(),
        }
    }

    #[test]
    fn complete_live_fields_pass() {
        live().validate().unwrap();
    }

    #[test]
    fn blank_minute_is_rejected() {
        let fields = LiveFields {
            minute: "   ".to_string(),
            ..live()
        };
        let err = fields.validate().unwrap_err().to_string();
        assert!(err.contains("minute"), "got: {err}");
    }

    #[test]
    fn minute_is_not_checked_numerically() {
        let fields = LiveFields {
            minute: "45+2".to_string(),
            ..live()
        };
        fields.validate().unwrap();
    }

    #[test]
    fn bet_draft_parses_pipe_format() {
        let draft: BetDraft = "Premier League|Arsenal|Chelsea|KG Var|1,72".parse().unwrap();
        let input = draft.into_input().unwrap();
        assert_eq!(input.home_team, "Arsenal");
        assert_eq!(input.prediction, "KG Var");
        assert_eq!(input.odds, 1.72);
    }

    #[test]
    fn bet_draft_rejects_wrong_arity() {
        assert!("a|b|c|1.5".parse::<BetDraft>().is_err());
        assert!("a|b|c|d|1.5|x".parse::<BetDraft>().is_err());
    }

    #[test]
    fn bet_draft_rejects_blank_team() {
        let draft: BetDraft = "L| |B|1|1.5".parse().unwrap();
        assert!(draft.into_input().is_err());
    }

    #[test]
    fn bet_draft_rejects_low_odds() {
        let draft: BetDraft = "L|A|B|1|1".parse().unwrap();
        let err = draft.into_input().unwrap_err().to_string();
        assert!(err.contains("greater than 1"), "got: {err}");
    }

    #[test]
    fn coupon_needs_title_and_bets() {
        let empty = CouponDraft {
            title: "Daily".to_string(),
            bets: vec![],
        };
        assert!(empty.validate().is_err());

        let untitled = CouponDraft {
            title: " ".to_string(),
            bets: vec![BetInput {
                league: "L".to_string(),
                home_team: "A".to_string(),
                away_team: "B".to_string(),
                prediction: "1".to_string(),
                odds: 1.5,
            }],
        };
        assert!(untitled.validate().is_err());

        let ok = CouponDraft {
            title: "Daily".to_string(),
            ..untitled
        };
        ok.validate().unwrap();
    }
}
