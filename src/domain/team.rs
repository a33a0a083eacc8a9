//! Team entity: roster, lineup and defensive-position maps, win/loss record,
//! and cached aggregate stats.
//!
//! Aggregates come in two flavors that deliberately coexist: cached fields
//! (`wl_avg`, `bat_avg`, `team_era`) refreshed only by their `set_*`
//! recalculators, and on-demand totals (`team_hits`, `team_era_total`, ...)
//! recomputed from the roster on every call. League-wide readers consume the
//! cached fields; barset/ERA builders consume the on-demand totals.

use crate::domain::player::Player;
use crate::domain::stats::{format_decimal, name_hash, round3, StatValue};
use regex::Regex;
use std::collections::BTreeMap;

/// The nine defensive positions, in display order
pub const FIELD_POSITIONS: [&str; 9] = [
    "pitcher",
    "catcher",
    "first base",
    "second base",
    "third base",
    "shortstop",
    "left field",
    "center field",
    "right field",
];

/// Parse a lineup slot key. Slots are positive decimal strings ("1", "2", ...).
pub fn parse_lineup_slot(key: &str) -> Option<u32> {
    let re = Regex::new(r"^[1-9][0-9]*$").unwrap();
    if re.is_match(key) {
        key.parse().ok()
    } else {
        None
    }
}

/// A team in the league
#[derive(Debug, Clone)]
pub struct Team {
    pub name: String,
    /// Deterministic hash of the team name
    pub team_id: i64,
    pub league_id: i64,
    pub manager: String,
    pub players: Vec<Player>,
    /// Batting order: slot number → player name
    pub lineup: BTreeMap<u32, Option<String>>,
    /// Defensive assignment: position → player name
    pub positions: BTreeMap<String, Option<String>>,
    pub wins: i64,
    pub losses: i64,
    pub games_played: i64,
    /// Cached aggregates, refreshed by the `set_*` recalculators
    pub wl_avg: f64,
    pub bat_avg: f64,
    pub team_era: f64,
    pub max_roster: usize,
}

impl Team {
    /// Create an empty team with the nine starting lineup slots and the
    /// standard defensive positions unassigned
    pub fn new(league_id: i64, name: &str, manager: &str, max_roster: usize) -> Self {
        let lineup = (1..=9).map(|slot| (slot, None)).collect();
        let positions = FIELD_POSITIONS
            .iter()
            .map(|pos| (pos.to_string(), None))
            .collect();
        Self {
            name: name.to_string(),
            team_id: name_hash(name),
            league_id,
            manager: manager.to_string(),
            players: Vec::new(),
            lineup,
            positions,
            wins: 0,
            losses: 0,
            games_played: 0,
            wl_avg: 0.0,
            bat_avg: 0.0,
            team_era: 0.0,
            max_roster,
        }
    }

    /// Extend the lineup with empty numeric slots up to the roster capacity
    pub fn populate_lineup(&mut self) {
        for slot in 10..=self.max_roster as u32 {
            self.lineup.entry(slot).or_insert(None);
        }
    }

    /// Rename the team; the id follows the name
    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
        self.team_id = name_hash(name);
    }

    pub fn roster_size(&self) -> usize {
        self.players.len()
    }

    // ------------------------------------------------------------------ //
    // roster

    /// Append a player if capacity allows. Full rosters reject the add.
    pub fn add_player(&mut self, player: Player) -> bool {
        if self.players.len() < self.max_roster {
            self.players.push(player);
            true
        } else {
            tracing::warn!(team = %self.name, "roster is full");
            false
        }
    }

    /// Remove the *last* roster entry whose name matches exactly, returning
    /// it. No-op when no entry matches.
    pub fn remove_player(&mut self, name: &str) -> Option<Player> {
        let mut found = None;
        for (i, player) in self.players.iter().enumerate() {
            if player.name == name {
                found = Some(i);
            }
        }
        match found {
            Some(i) => Some(self.players.remove(i)),
            None => {
                tracing::debug!(team = %self.name, player = name, "remove_player: no match");
                None
            }
        }
    }

    /// Case-insensitive, whitespace-trimmed player lookup
    pub fn get_player(&self, name: &str) -> Option<&Player> {
        let target = name.trim().to_lowercase();
        self.players
            .iter()
            .find(|p| p.name.trim().to_lowercase() == target)
    }

    pub fn get_player_mut(&mut self, name: &str) -> Option<&mut Player> {
        let target = name.trim().to_lowercase();
        self.players
            .iter_mut()
            .find(|p| p.name.trim().to_lowercase() == target)
    }

    // ------------------------------------------------------------------ //
    // on-demand totals

    pub fn team_hits(&self) -> i64 {
        self.players.iter().map(|p| p.batting.hit).sum()
    }

    pub fn team_so(&self) -> i64 {
        self.players.iter().map(|p| p.batting.so).sum()
    }

    pub fn team_runs(&self) -> i64 {
        self.players.iter().map(|p| p.batting.runs).sum()
    }

    /// Sum of ERA over roster entries whose position list names "pitcher"
    pub fn team_era_total(&self) -> f64 {
        self.players
            .iter()
            .filter(|p| p.is_pitcher())
            .map(|p| p.era())
            .sum()
    }

    /// Strikeouts thrown, summed over position pitchers
    pub fn team_k(&self) -> i64 {
        self.players
            .iter()
            .filter(|p| p.is_pitcher())
            .map(|p| p.pitching.as_ref().map(|s| s.p_so).unwrap_or(0))
            .sum()
    }

    /// Team ERA formatted to three decimals; a team with no position
    /// pitcher totals 0.000
    pub fn calc_team_era(&self) -> String {
        format_decimal(self.team_era_total())
    }

    pub fn calc_wl_avg(&self) -> f64 {
        if self.games_played > 0 && self.wins > 0 {
            self.wins as f64 / self.games_played as f64
        } else {
            0.0
        }
    }

    /// Mean of the players' cached batting averages
    pub fn calc_bat_avg(&self) -> f64 {
        if self.players.is_empty() {
            return 0.0;
        }
        let total: f64 = self.players.iter().map(|p| p.batting.avg).sum();
        total / self.players.len() as f64
    }

    // ------------------------------------------------------------------ //
    // record setters (guards reject with a warn, never fail loudly)

    pub fn set_games_played(&mut self, val: i64) -> bool {
        if self.games_played + val < 0 {
            return false;
        }
        self.games_played += val;
        true
    }

    pub fn set_wins(&mut self, val: i64) -> bool {
        if self.wins + val < 0 {
            return false;
        }
        if self.games_played > 0 && self.wins + val + self.losses <= self.games_played {
            self.wins += val;
            return true;
        }
        tracing::warn!(
            team = %self.name,
            "wins-losses cannot exceed games played (W:{} L:{} G:{})",
            self.wins,
            self.losses,
            self.games_played
        );
        false
    }

    pub fn set_losses(&mut self, val: i64) -> bool {
        if self.losses + val < 0 {
            return false;
        }
        if self.games_played > 0 && self.losses + val + self.wins <= self.games_played {
            self.losses += val;
            return true;
        }
        tracing::warn!(
            team = %self.name,
            "wins-losses cannot exceed games played (W:{} L:{} G:{})",
            self.wins,
            self.losses,
            self.games_played
        );
        false
    }

    /// Shrink/grow the roster cap; cannot drop below the current roster
    pub fn set_max_roster(&mut self, val: usize) -> bool {
        if val < self.players.len() {
            tracing::warn!(
                team = %self.name,
                "roster cap {} cannot be less than current roster {}",
                val,
                self.players.len()
            );
            return false;
        }
        self.max_roster = val;
        true
    }

    pub fn set_manager(&mut self, val: &str) {
        self.manager = val.to_string();
    }

    pub fn set_wl_avg(&mut self) {
        self.wl_avg = round3(self.calc_wl_avg());
    }

    pub fn set_bat_avg(&mut self) {
        self.bat_avg = round3(self.calc_bat_avg());
    }

    pub fn set_team_era(&mut self) {
        self.team_era = round3(self.team_era_total());
    }

    // ------------------------------------------------------------------ //
    // lineup / defensive positions
    //
    // Replace-confirmation belongs to the presentation layer: it queries
    // the current occupant with the *_conflict reader, asks, then writes.

    pub fn lineup_conflict(&self, slot: u32) -> Option<&str> {
        self.lineup.get(&slot).and_then(|v| v.as_deref())
    }

    /// Assign a lineup slot, returning the previous occupant
    pub fn set_lineup_slot(&mut self, slot: u32, player: Option<String>) -> Option<String> {
        self.lineup.insert(slot, player).flatten()
    }

    pub fn position_conflict(&self, position: &str) -> Option<&str> {
        self.positions.get(position).and_then(|v| v.as_deref())
    }

    /// Assign a defensive position, returning the previous occupant
    pub fn set_position(&mut self, position: &str, player: Option<String>) -> Option<String> {
        self.positions.insert(position.to_string(), player).flatten()
    }

    pub fn lineup_text(&self) -> String {
        let mut ret = String::new();
        for (slot, name) in &self.lineup {
            ret.push_str(&format!("{}: {}\n", slot, name.as_deref().unwrap_or("None")));
        }
        ret
    }

    pub fn positions_text(&self) -> String {
        let mut ret = String::new();
        for pos in FIELD_POSITIONS {
            if let Some(name) = self.positions.get(pos) {
                ret.push_str(&format!("{}: {}\n", pos, name.as_deref().unwrap_or("None")));
            }
        }
        ret
    }

    // ------------------------------------------------------------------ //
    // detail-view export

    /// Team stats as (label, value) pairs
    pub fn all_stats(&self) -> Vec<(String, String)> {
        let player_names: Vec<&str> = self.players.iter().map(|p| p.name.as_str()).collect();
        vec![
            ("Team".to_string(), self.name.clone()),
            ("Manager".to_string(), self.manager.clone()),
            (
                "Roster".to_string(),
                format!("{} / {}", self.roster_size(), self.max_roster),
            ),
            ("Players".to_string(), format!("[{}]", player_names.join(", "))),
            ("G".to_string(), self.games_played.to_string()),
            ("Wins".to_string(), self.wins.to_string()),
            ("Losses".to_string(), self.losses.to_string()),
            ("W-L".to_string(), format_decimal(self.wl_avg)),
            ("AVG".to_string(), format_decimal(self.bat_avg)),
            ("Team Era".to_string(), format_decimal(self.team_era)),
        ]
    }

    /// Stats plus lineup and position assignments, for the detail pane
    pub fn return_stats(&self) -> Vec<(String, String)> {
        let mut ret = self.all_stats();
        ret.push(("Lineup".to_string(), "----- -----".to_string()));
        for (slot, name) in &self.lineup {
            ret.push((slot.to_string(), name.as_deref().unwrap_or("None").to_string()));
        }
        ret.push(("Positions".to_string(), "----- -----".to_string()));
        for pos in FIELD_POSITIONS {
            if let Some(name) = self.positions.get(pos) {
                ret.push((pos.to_string(), name.as_deref().unwrap_or("None").to_string()));
            }
        }
        ret
    }

    // ------------------------------------------------------------------ //
    // keyed access (undo restore, hydration)

    pub fn stat(&self, key: TeamStat) -> StatValue {
        match key {
            TeamStat::GamesPlayed => StatValue::Int(self.games_played),
            TeamStat::Wins => StatValue::Int(self.wins),
            TeamStat::Losses => StatValue::Int(self.losses),
            TeamStat::WlAvg => StatValue::Float(self.wl_avg),
            TeamStat::BatAvg => StatValue::Float(self.bat_avg),
            TeamStat::TeamEra => StatValue::Float(self.team_era),
            TeamStat::MaxRoster => StatValue::Int(self.max_roster as i64),
            TeamStat::Manager => StatValue::Text(self.manager.clone()),
        }
    }

    /// Write a stat key absolutely, bypassing guards
    pub fn write_stat(&mut self, key: TeamStat, value: StatValue) {
        match key {
            TeamStat::GamesPlayed => self.games_played = value.as_int(),
            TeamStat::Wins => self.wins = value.as_int(),
            TeamStat::Losses => self.losses = value.as_int(),
            TeamStat::WlAvg => self.wl_avg = value.as_float(),
            TeamStat::BatAvg => self.bat_avg = value.as_float(),
            TeamStat::TeamEra => self.team_era = value.as_float(),
            TeamStat::MaxRoster => self.max_roster = value.as_int().max(0) as usize,
            TeamStat::Manager => self.manager = value.to_string(),
        }
    }
}

impl std::fmt::Display for Team {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let player_names: Vec<&str> = self.players.iter().map(|p| p.name.as_str()).collect();
        writeln!(f, "Team: {}", self.name)?;
        writeln!(f, "Manager: {}", self.manager)?;
        writeln!(f, "Roster: {} / {}", self.roster_size(), self.max_roster)?;
        writeln!(f, "Players: [{}]", player_names.join(", "))?;
        writeln!(f, "G: {}", self.games_played)?;
        writeln!(f, "Wins: {}", self.wins)?;
        writeln!(f, "Losses: {}", self.losses)?;
        writeln!(f, "W-L: {}", format_decimal(self.wl_avg))?;
        writeln!(f, "AVG: {}", format_decimal(self.bat_avg))?;
        write!(f, "Team Era: {}", format_decimal(self.team_era))
    }
}

/// Stat key for keyed reads/writes on a team
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeamStat {
    GamesPlayed,
    Wins,
    Losses,
    WlAvg,
    BatAvg,
    TeamEra,
    MaxRoster,
    Manager,
}

impl TeamStat {
    pub fn label(&self) -> &'static str {
        match self {
            Self::GamesPlayed => "games_played",
            Self::Wins => "wins",
            Self::Losses => "losses",
            Self::WlAvg => "wl_avg",
            Self::BatAvg => "bat_avg",
            Self::TeamEra => "team_era",
            Self::MaxRoster => "max_roster",
            Self::Manager => "manager",
        }
    }

    /// Resolve a stored table field name to a stat key
    pub fn from_field(field: &str) -> Option<Self> {
        let key = match field {
            "games_played" => Self::GamesPlayed,
            "wins" => Self::Wins,
            "losses" => Self::Losses,
            "wl_avg" => Self::WlAvg,
            "bat_avg" => Self::BatAvg,
            "team_era" => Self::TeamEra,
            "max_roster" => Self::MaxRoster,
            "manager" => Self::Manager,
            _ => return None,
        };
        Some(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::player::PlayerStat;

    fn team() -> Team {
        Team::new(7, "Beef Sliders", "Pat Muller", 12)
    }

    fn player(name: &str, number: i64, positions: &[&str]) -> Player {
        Player::new(
            name,
            number,
            name_hash("Beef Sliders"),
            "Beef Sliders",
            7,
            positions.iter().map(|s| s.to_string()).collect(),
        )
    }

    #[test]
    fn test_roster_capacity() {
        let mut t = Team::new(7, "Tiny", "Mgr", 2);
        assert!(t.add_player(player("A", 1, &["catcher"])));
        assert!(t.add_player(player("B", 2, &["shortstop"])));
        assert!(!t.add_player(player("C", 3, &["left field"])));
        assert_eq!(t.roster_size(), 2);
    }

    #[test]
    fn test_remove_player_takes_last_match() {
        let mut t = team();
        t.add_player(player("Sam Ode", 4, &["catcher"]));
        t.add_player(player("Sam Ode", 9, &["shortstop"]));
        let removed = t.remove_player("Sam Ode").unwrap();
        assert_eq!(removed.number, 9);
        assert_eq!(t.players[0].number, 4);
        assert!(t.remove_player("Nobody").is_none());
    }

    #[test]
    fn test_win_loss_guard() {
        let mut t = team();
        assert!(!t.set_wins(1)); // no games played yet
        t.set_games_played(3);
        assert!(t.set_wins(2));
        assert!(t.set_losses(1));
        assert!(!t.set_wins(1)); // would exceed games played
        assert_eq!((t.wins, t.losses, t.games_played), (2, 1, 3));
    }

    #[test]
    fn test_team_era_three_decimals() {
        let mut t = team();
        let mut ace = player("Ace", 11, &["pitcher"]);
        ace.write_stat(PlayerStat::Era, StatValue::Float(3.0));
        t.add_player(ace);
        t.add_player(player("Bat", 12, &["catcher"]));
        assert_eq!(t.calc_team_era(), "3.000");

        let no_pitchers = team();
        assert_eq!(no_pitchers.calc_team_era(), "0.000");
    }

    #[test]
    fn test_bat_avg_is_roster_mean() {
        let mut t = team();
        let mut a = player("A", 1, &["catcher"]);
        a.write_stat(PlayerStat::Avg, StatValue::Float(0.300));
        let mut b = player("B", 2, &["shortstop"]);
        b.write_stat(PlayerStat::Avg, StatValue::Float(0.100));
        t.add_player(a);
        t.add_player(b);
        t.set_bat_avg();
        assert_eq!(t.bat_avg, 0.2);
    }

    #[test]
    fn test_lineup_slots() {
        let mut t = team();
        assert_eq!(t.lineup.len(), 9);
        t.populate_lineup();
        assert_eq!(t.lineup.len(), 12);

        assert!(t.lineup_conflict(3).is_none());
        assert_eq!(t.set_lineup_slot(3, Some("Sam Ode".into())), None);
        assert_eq!(t.lineup_conflict(3), Some("Sam Ode"));
        let prev = t.set_lineup_slot(3, Some("Ivy Okafor".into()));
        assert_eq!(prev.as_deref(), Some("Sam Ode"));
    }

    #[test]
    fn test_parse_lineup_slot() {
        assert_eq!(parse_lineup_slot("1"), Some(1));
        assert_eq!(parse_lineup_slot("12"), Some(12));
        assert_eq!(parse_lineup_slot("0"), None);
        assert_eq!(parse_lineup_slot("pitcher"), None);
        assert_eq!(parse_lineup_slot("01"), None);
    }

    #[test]
    fn test_max_roster_floor() {
        let mut t = team();
        t.add_player(player("A", 1, &["catcher"]));
        t.add_player(player("B", 2, &["shortstop"]));
        assert!(!t.set_max_roster(1));
        assert!(t.set_max_roster(2));
        assert_eq!(t.max_roster, 2);
    }
}
