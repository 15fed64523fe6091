//! Betting pick selection from bookmaker odds

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use time::macros::format_description;

use crate::model::RiskLevel;

/// An upcoming fixture with averaged 1X2 decimal prices
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OddsEvent {
    pub id: String,
    pub league: String,
    pub home_team: String,
    pub away_team: String,
    #[serde(with = "time::serde::rfc3339")]
    pub commence_time: OffsetDateTime,
    pub home_price: Option<f64>,
    pub draw_price: Option<f64>,
    pub away_price: Option<f64>,
}

/// Outcome being tipped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Selection {
    HomeWin,
    Draw,
    AwayWin,
    HomeOrDraw,
    AwayOrDraw,
    HomeOrAway,
}

impl Selection {
    pub fn label(&self) -> &'static str {
        match self {
            Selection::HomeWin => "Home Win",
            Selection::Draw => "Draw",
            Selection::AwayWin => "Away Win",
            Selection::HomeOrDraw => "Home or Draw",
            Selection::AwayOrDraw => "Away or Draw",
            Selection::HomeOrAway => "Home or Away",
        }
    }

    pub fn market(&self) -> &'static str {
        match self {
            Selection::HomeWin | Selection::Draw | Selection::AwayWin => "1X2",
            _ => "Double Chance",
        }
    }

    /// Every selection priced from one event's 1X2 odds
    fn priced(event: &OddsEvent) -> [(Selection, Option<f64>); 6] {
        let (home, draw, away) = (event.home_price, event.draw_price, event.away_price);
        [
            (Selection::HomeWin, home),
            (Selection::Draw, draw),
            (Selection::AwayWin, away),
            (Selection::HomeOrDraw, double_chance_price(home, draw)),
            (Selection::AwayOrDraw, double_chance_price(away, draw)),
            (Selection::HomeOrAway, double_chance_price(home, away)),
        ]
    }
}

/// Approximate double chance price from two 1X2 prices.
///
/// The implied probabilities are summed and a 5% margin taken off, rounded
/// to two decimals. Prices at or below 1.01 give nothing.
pub fn double_chance_price(first: Option<f64>, second: Option<f64>) -> Option<f64> {
    let (first, second) = (first?, second?);
    if !(first.is_finite() && second.is_finite()) || first <= 1.01 || second <= 1.01 {
        return None;
    }

    let price = DOUBLE_CHANCE_MARGIN / (1.0 / first + 1.0 / second);
    Some((price * 100.0).round() / 100.0)
}

const DOUBLE_CHANCE_MARGIN: f64 = 0.95;

/// A selected tip
#[derive(Debug, Clone, PartialEq)]
pub struct Pick {
    pub event: OddsEvent,
    pub selection: Selection,
    pub price: f64,
    /// Percentage, inside the risk level's confidence range
    pub confidence: u8,
    pub risk_level: RiskLevel,
}

impl Pick {
    pub fn title(&self) -> String {
        format!("{} vs {}", self.event.home_team, self.event.away_team)
    }

    /// Multi-line description used as the content body
    pub fn summary(&self) -> String {
        let kickoff = self
            .event
            .commence_time
            .format(format_description!(
                "[day] [month repr:short] [year], [hour]:[minute] UTC"
            ))
            .unwrap_or_else(|_| self.event.commence_time.to_string());

        let (home, away) = (&self.event.home_team, &self.event.away_team);
        let teams = match self.selection {
            Selection::HomeWin => Some(home.clone()),
            Selection::AwayWin => Some(away.clone()),
            Selection::Draw => None,
            Selection::HomeOrDraw => Some(format!("{} or draw", home)),
            Selection::AwayOrDraw => Some(format!("{} or draw", away)),
            Selection::HomeOrAway => Some(format!("{} or {}", home, away)),
        };
        let pick = match teams {
            Some(teams) => format!("{} ({})", self.selection.label(), teams),
            None => self.selection.label().to_string(),
        };

        format!(
            "🏆 {}\n🕒 {}\n🎯 Pick: {} @ {:.2}\n📊 Confidence: {}%",
            self.event.league, kickoff, pick, self.price, self.confidence
        )
    }
}

/// Confidence for a price at the given risk level.
///
/// Linear across the odds range: the shortest price gets the top of the
/// confidence range, the longest the bottom. Out-of-range prices clamp.
pub fn confidence_for(risk: RiskLevel, price: f64) -> u8 {
    let (min_odds, max_odds) = risk.odds_range();
    let (min_conf, max_conf) = risk.confidence_range();

    let span = max_odds - min_odds;
    let position = if span > 0.0 {
        ((price - min_odds) / span).clamp(0.0, 1.0)
    } else {
        0.5
    };

    let confidence = f64::from(max_conf) - position * f64::from(max_conf - min_conf);
    confidence.round() as u8
}

/// Choose the tip for `risk` among events that have not kicked off yet.
///
/// Both 1X2 and double chance outcomes are candidates. Outcomes priced
/// inside the risk range are preferred, closest to the middle of the range
/// first. When nothing is in range the outcome closest
/// to the middle overall is used instead.
pub fn select_pick(events: &[OddsEvent], risk: RiskLevel, now: OffsetDateTime) -> Option<Pick> {
    let (min_odds, max_odds) = risk.odds_range();
    let target = (min_odds + max_odds) / 2.0;

    let candidates: Vec<(&OddsEvent, Selection, f64)> = events
        .iter()
        .filter(|event| event.commence_time > now)
        .flat_map(|event| {
            Selection::priced(event)
                .into_iter()
                .filter_map(move |(selection, price)| {
                    price
                        .filter(|p| p.is_finite() && *p > 1.0)
                        .map(|p| (event, selection, p))
                })
        })
        .collect();

    let in_range = closest_to(
        candidates
            .iter()
            .filter(|(_, _, price)| (min_odds..=max_odds).contains(price)),
        target,
    );
    let chosen = in_range.or_else(|| closest_to(candidates.iter(), target))?;

    let (event, selection, price) = chosen;
    Some(Pick {
        event: event.clone(),
        selection,
        price,
        confidence: confidence_for(risk, price),
        risk_level: risk,
    })
}

fn closest_to<'a, 'e: 'a>(
    pool: impl Iterator<Item = &'a (&'e OddsEvent, Selection, f64)>,
    target: f64,
) -> Option<(&'e OddsEvent, Selection, f64)> {
    pool.min_by(|a, b| (a.2 - target).abs().total_cmp(&(b.2 - target).abs()))
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Duration;
    use time::macros::datetime;

    const NOW: OffsetDateTime = datetime!(2025-01-17 12:00 UTC);

    fn event(id: &str, home: f64, draw: f64, away: f64) -> OddsEvent {
        OddsEvent {
            id: id.to_string(),
            league: "EPL".to_string(),
            home_team: format!("Home {id}"),
            away_team: format!("Away {id}"),
            commence_time: NOW + Duration::hours(3),
            home_price: Some(home),
            draw_price: Some(draw),
            away_price: Some(away),
        }
    }

    #[test]
    fn test_safe_pick_prefers_in_range_closest_to_middle() {
        let events = vec![
            event("a", 1.22, 5.0, 9.0),
            event("b", 4.2, 3.6, 1.40),
            event("c", 2.0, 3.2, 3.5),
        ];

        let pick = select_pick(&events, RiskLevel::Safe, NOW).unwrap();

        assert_eq!(pick.event.id, "b");
        assert_eq!(pick.selection, Selection::AwayWin);
        assert_eq!(pick.price, 1.40);
        assert_eq!(pick.risk_level, RiskLevel::Safe);
    }

    #[test]
    fn test_risky_pick_can_select_draw() {
        let events = vec![event("a", 1.5, 3.4, 12.0)];

        let pick = select_pick(&events, RiskLevel::Risky, NOW).unwrap();

        assert_eq!(pick.selection, Selection::Draw);
        assert_eq!(pick.price, 3.4);
    }

    #[test]
    fn test_falls_back_to_closest_when_nothing_in_range() {
        let events = vec![event("a", 1.10, 7.0, 12.0), event("b", 1.62, 3.9, 5.0)];

        let pick = select_pick(&events, RiskLevel::Safe, NOW).unwrap();

        // nearest is b's home-or-away at 1.16, just under the range
        assert_eq!(pick.event.id, "b");
        assert_eq!(pick.selection, Selection::HomeOrAway);
        assert_eq!(pick.price, 1.16);
        assert_eq!(pick.confidence, 95);
    }

    #[test]
    fn test_safe_pick_uses_double_chance_when_no_1x2_in_range() {
        let cases = [
            (event("a", 1.9, 3.4, 4.2), Selection::HomeOrAway, 1.24),
            (event("b", 3.0, 2.9, 2.6), Selection::HomeOrDraw, 1.40),
            (event("c", 2.6, 3.0, 2.9), Selection::AwayOrDraw, 1.40),
        ];

        for (event, selection, price) in cases {
            let pick = select_pick(std::slice::from_ref(&event), RiskLevel::Safe, NOW).unwrap();
            assert_eq!(pick.selection, selection, "event {}", event.id);
            assert_eq!(pick.price, price);
            assert_eq!(pick.selection.market(), "Double Chance");
            assert!((85..=95).contains(&pick.confidence));
        }
    }

    #[test]
    fn test_double_chance_price() {
        assert_eq!(double_chance_price(Some(2.0), Some(2.0)), Some(0.95));
        assert_eq!(double_chance_price(Some(1.9), Some(4.2)), Some(1.24));
        assert_eq!(double_chance_price(Some(1.01), Some(3.0)), None);
        assert_eq!(double_chance_price(None, Some(3.0)), None);
        assert_eq!(double_chance_price(Some(f64::NAN), Some(3.0)), None);
    }

    #[test]
    fn test_summary_names_both_sides_of_double_chance() {
        let pick = select_pick(&[event("b", 3.0, 2.9, 2.6)], RiskLevel::Safe, NOW).unwrap();

        assert!(pick.summary().contains("Pick: Home or Draw (Home b or draw) @ 1.40"));
    }

    #[test]
    fn test_skips_started_events_and_missing_prices() {
        let mut started = event("started", 1.35, 4.0, 7.0);
        started.commence_time = NOW - Duration::minutes(5);
        let mut no_prices = event("empty", 1.0, 1.0, 1.0);
        no_prices.home_price = None;
        no_prices.draw_price = None;
        no_prices.away_price = None;

        assert!(select_pick(&[started, no_prices], RiskLevel::Safe, NOW).is_none());
        assert!(select_pick(&[], RiskLevel::Value, NOW).is_none());
    }

    #[test]
    fn test_confidence_interpolates_and_clamps() {
        assert_eq!(confidence_for(RiskLevel::Safe, 1.20), 95);
        assert_eq!(confidence_for(RiskLevel::Safe, 1.55), 85);
        assert_eq!(confidence_for(RiskLevel::Value, 1.60), 80);
        assert_eq!(confidence_for(RiskLevel::Value, 2.20), 65);
        assert_eq!(confidence_for(RiskLevel::Risky, 50.0), 45);
        assert_eq!(confidence_for(RiskLevel::Risky, 1.01), 60);
    }

    #[test]
    fn test_summary_mentions_pick_and_kickoff() {
        let pick = select_pick(&[event("a", 1.45, 4.0, 6.0)], RiskLevel::Safe, NOW).unwrap();

        assert_eq!(pick.title(), "Home a vs Away a");
        let summary = pick.summary();
        assert!(summary.contains("Pick: Home Win (Home a) @ 1.45"));
        assert!(summary.contains("17 Jan 2025, 15:00 UTC"));
        assert!(summary.contains(&format!("Confidence: {}%", pick.confidence)));
    }
}
