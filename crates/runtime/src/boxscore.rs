//! Read-side box score: per-team totals reconstructed from the committed
//! event feed.
//!
//! This fold is independent of the derivation engine's delta path, which
//! makes it a live check of the scoreboard ledger: the game record's
//! scores must equal the points carried by its events.

use std::collections::HashMap;

use serde_json::json;

use score_core::{EventKind, RecordId, StatLine, TeamSide};

use crate::gateway::Gateway;
use crate::store::{Predicate, Result, SortSpec};

/// Per-team totals plus the persisted scoreboard for comparison.
#[derive(Debug, Clone)]
pub struct BoxScore {
    pub home: StatLine,
    pub away: StatLine,
    pub home_score: u32,
    pub away_score: u32,
    pub event_count: usize,
}

impl BoxScore {
    /// Whether the scoreboard ledger matches the event feed.
    pub fn ledger_consistent(&self) -> bool {
        self.home.points + self.away.points == self.home_score + self.away_score
    }
}

/// Folds the game's committed events into per-team totals.
///
/// Events from players no longer on either roster are skipped; they cannot
/// be attributed to a side.
pub async fn box_score(gateway: &Gateway, game_id: &RecordId) -> Result<BoxScore> {
    let game = gateway.games.get(game_id).await?;

    let mut predicate = Predicate::new();
    predicate.insert("game_id".to_owned(), json!(game_id));
    let players = gateway
        .players
        .filter(&predicate, Some(SortSpec::ascending("jersey")), None)
        .await?;
    let events = gateway.events.filter(&predicate, None, None).await?;

    let side_of: HashMap<&RecordId, TeamSide> = players
        .iter()
        .map(|player| (&player.id, player.side))
        .collect();

    let mut home = StatLine::default();
    let mut away = StatLine::default();
    let mut counted = 0;
    for event in &events {
        let Some(side) = side_of.get(&event.player_id) else {
            continue;
        };
        let totals = match side {
            TeamSide::Home => &mut home,
            TeamSide::Away => &mut away,
        };
        tally(totals, event.kind);
        counted += 1;
    }

    Ok(BoxScore {
        home,
        away,
        home_score: game.home_score,
        away_score: game.away_score,
        event_count: counted,
    })
}

fn tally(totals: &mut StatLine, kind: EventKind) {
    match kind {
        EventKind::TwoMade => {
            totals.points += 2;
            totals.fgm += 1;
            totals.fga += 1;
        }
        EventKind::TwoMissed => totals.fga += 1,
        EventKind::ThreeMade => {
            totals.points += 3;
            totals.fgm += 1;
            totals.fga += 1;
            totals.tpm += 1;
            totals.tpa += 1;
        }
        EventKind::ThreeMissed => {
            totals.fga += 1;
            totals.tpa += 1;
        }
        EventKind::FreeThrowMade => {
            totals.points += 1;
            totals.ftm += 1;
            totals.fta += 1;
        }
        EventKind::FreeThrowMissed => totals.fta += 1,
        EventKind::Assist => totals.assists += 1,
        EventKind::Steal => totals.steals += 1,
        EventKind::Block => totals.blocks += 1,
        EventKind::Turnover => totals.turnovers += 1,
        EventKind::OffensiveRebound => totals.oreb += 1,
        EventKind::DefensiveRebound => totals.dreb += 1,
        EventKind::FoulPersonal
        | EventKind::FoulOffensive
        | EventKind::FoulTechnical
        | EventKind::FoulUnsportsmanlike => totals.fouls += 1,
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn tally_points_agree_with_event_points() {
        for kind in EventKind::iter() {
            let mut totals = StatLine::default();
            tally(&mut totals, kind);
            assert_eq!(totals.points, kind.points(), "{kind}");
        }
    }
}
