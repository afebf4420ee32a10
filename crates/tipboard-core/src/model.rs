use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::odds::{self, Payout};

/// Lifecycle state shared by records and individual bets.
///
/// The serialized values match what earlier releases of the board wrote to
/// storage, so existing data keeps loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Status {
    #[default]
    #[serde(rename = "Beklemede")]
    Pending,
    #[serde(rename = "Kazandı")]
    Won,
    #[serde(rename = "Kaybetti")]
    Lost,
}

impl Status {
    /// States reachable in a single step.
    ///
    /// Pending settles to Won or Lost; a settled state can only be reverted
    /// to Pending. Won and Lost are never directly adjacent.
    pub fn next_states(self) -> &'static [Status] {
        match self {
            Status::Pending => &[Status::Won, Status::Lost],
            Status::Won | Status::Lost => &[Status::Pending],
        }
    }

    pub fn can_transition_to(self, next: Status) -> bool {
        self.next_states().contains(&next)
    }

    pub fn label(self) -> &'static str {
        match self {
            Status::Pending => "pending",
            Status::Won => "won",
            Status::Lost => "lost",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Status {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Status::Pending),
            "won" => Ok(Status::Won),
            "lost" => Ok(Status::Lost),
            other => anyhow::bail!("unknown status '{other}' (expected pending, won or lost)"),
        }
    }
}

/// Discriminates the two record shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RecordKind {
    #[default]
    Live,
    Combined,
}

impl RecordKind {
    /// Value of the `type` discriminator in persisted records.
    pub fn wire_tag(self) -> &'static str {
        match self {
            RecordKind::Live => "Canlı",
            RecordKind::Combined => "Kombine",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RecordKind::Live => "live",
            RecordKind::Combined => "combined",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for RecordKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "live" => Ok(RecordKind::Live),
            "combined" | "coupon" => Ok(RecordKind::Combined),
            other => anyhow::bail!("unknown record kind '{other}' (expected live or combined)"),
        }
    }
}

/// A single leg of a combined coupon. Owned by exactly one coupon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bet {
    pub league: String,
    pub home_team: String,
    pub away_team: String,
    pub prediction: String,
    pub odds: f64,
    #[serde(default)]
    pub status: Status,
}

impl Bet {
    /// Whether two bets describe the same fixture and pick.
    pub fn same_pick(&self, other: &BetInput) -> bool {
        self.home_team == other.home_team
            && self.away_team == other.away_team
            && self.prediction == other.prediction
    }
}

/// Bet fields as submitted, before a status is attached.
#[derive(Debug, Clone, PartialEq)]
pub struct BetInput {
    pub league: String,
    pub home_team: String,
    pub away_team: String,
    pub prediction: String,
    pub odds: f64,
}

impl BetInput {
    pub fn with_status(self, status: Status) -> Bet {
        Bet {
            league: self.league,
            home_team: self.home_team,
            away_team: self.away_team,
            prediction: self.prediction,
            odds: self.odds,
            status,
        }
    }
}

impl From<&Bet> for BetInput {
    fn from(bet: &Bet) -> Self {
        BetInput {
            league: bet.league.clone(),
            home_team: bet.home_team.clone(),
            away_team: bet.away_team.clone(),
            prediction: bet.prediction.clone(),
            odds: bet.odds,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LivePrediction {
    pub id: String,
    pub status: Status,
    pub timestamp: i64,
    pub league: String,
    pub home_team: String,
    pub away_team: String,
    pub prediction: String,
    /// Match minute as entered; not validated as a number.
    pub minute: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinedCoupon {
    pub id: String,
    pub status: Status,
    pub timestamp: i64,
    pub title: String,
    pub bets: Vec<Bet>,
    pub total_odds: f64,
    pub potential_winnings: f64,
}

impl CombinedCoupon {
    /// Recompute `total_odds` and `potential_winnings` from the current bets.
    pub fn refresh_payout(&mut self) {
        let Payout {
            total_odds,
            potential_winnings,
        } = odds::recompute(self.bets.iter().map(|b| b.odds));
        self.total_odds = total_odds;
        self.potential_winnings = potential_winnings;
    }
}

/// Either record shape, tagged by `type` in storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Record {
    #[serde(rename = "Canlı")]
    Live(LivePrediction),
    #[serde(rename = "Kombine")]
    Combined(CombinedCoupon),
}

impl Record {
    pub fn id(&self) -> &str {
        match self {
            Record::Live(p) => &p.id,
            Record::Combined(c) => &c.id,
        }
    }

    pub fn kind(&self) -> RecordKind {
        match self {
            Record::Live(_) => RecordKind::Live,
            Record::Combined(_) => RecordKind::Combined,
        }
    }

    pub fn status(&self) -> Status {
        match self {
            Record::Live(p) => p.status,
            Record::Combined(c) => c.status,
        }
    }

    pub fn timestamp(&self) -> i64 {
        match self {
            Record::Live(p) => p.timestamp,
            Record::Combined(c) => c.timestamp,
        }
    }

    pub(crate) fn set_status(&mut self, status: Status) {
        match self {
            Record::Live(p) => p.status = status,
            Record::Combined(c) => c.status = status,
        }
    }
}

impl From<LivePrediction> for Record {
    fn from(p: LivePrediction) -> Self {
        Record::Live(p)
    }
}

impl From<CombinedCoupon> for Record {
    fn from(c: CombinedCoupon) -> Self {
        Record::Combined(c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_live() -> LivePrediction {
        LivePrediction {
            id: "live-1".to_string(),
            status: Status::Pending,
            timestamp: 1_700_000_000_000,
            league: "Süper Lig".to_string(),
            home_team: "A".to_string(),
            away_team: "B".to_string(),
            prediction: "MS 1".to_string(),
            minute: "24".to_string(),
        }
    }

    #[test]
    fn pending_reaches_only_settled_states() {
        assert!(Status::Pending.can_transition_to(Status::Won));
        assert!(Status::Pending.can_transition_to(Status::Lost));
        assert!(!Status::Pending.can_transition_to(Status::Pending));
    }

    #[test]
    fn settled_states_only_revert_to_pending() {
        for settled in [Status::Won, Status::Lost] {
            assert_eq!(settled.next_states(), &[Status::Pending]);
        }
        assert!(!Status::Won.can_transition_to(Status::Lost));
        assert!(!Status::Lost.can_transition_to(Status::Won));
    }

    #[test]
    fn status_parses_case_insensitively() {
        assert_eq!("WON".parse::<Status>().unwrap(), Status::Won);
        assert_eq!(" lost ".parse::<Status>().unwrap(), Status::Lost);
        assert!("draw".parse::<Status>().is_err());
    }

    #[test]
    fn live_record_uses_storage_tags() {
        let json = serde_json::to_value(Record::Live(sample_live())).unwrap();
        assert_eq!(json["type"], "Canlı");
        assert_eq!(json["status"], "Beklemede");
        assert_eq!(json["homeTeam"], "A");
        assert_eq!(json["minute"], "24");
    }

    #[test]
    fn coupon_record_round_trips_through_json() {
        let mut coupon = CombinedCoupon {
            id: "c-1".to_string(),
            status: Status::Won,
            timestamp: 42,
            title: "Banker".to_string(),
            bets: vec![Bet {
                league: "L".to_string(),
                home_team: "X".to_string(),
                away_team: "Y".to_string(),
                prediction: "2.5 Üst".to_string(),
                odds: 1.85,
                status: Status::Lost,
            }],
            total_odds: 0.0,
            potential_winnings: 0.0,
        };
        coupon.refresh_payout();
        let record = Record::Combined(coupon);

        let text = serde_json::to_string(&record).unwrap();
        assert!(text.contains("\"type\":\"Kombine\""));
        assert!(text.contains("\"totalOdds\""));
        let back: Record = serde_json::from_str(&text).unwrap();
        assert_eq!(back, record);
        assert_eq!(back.kind(), RecordKind::Combined);
        assert_eq!(back.status(), Status::Won);
    }

    #[test]
    fn bet_without_status_defaults_to_pending() {
        let bet: Bet = serde_json::from_str(
            r#"{"league":"L","homeTeam":"X","awayTeam":"Y","prediction":"1","odds":2.0}"#,
        )
        .unwrap();
        assert_eq!(bet.status, Status::Pending);
    }

    #[test]
    fn set_status_touches_only_status() {
        let mut record = Record::Live(sample_live());
        record.set_status(Status::Lost);
        assert_eq!(record.status(), Status::Lost);
        assert_eq!(record.id(), "live-1");
        assert_eq!(record.timestamp(), 1_700_000_000_000);
    }
}
