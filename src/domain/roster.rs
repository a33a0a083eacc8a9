//! Ordered store of [`Team`] entities.
//!
//! Teams live in an arena (`slots`) addressed by stable [`TeamKey`]s, with a
//! separate `order` list holding insertion order. Undo records hold a
//! `TeamKey` as their non-owning reference into this storage; removing a team
//! vacates its slot without disturbing any other key. Vacated slots are not
//! reused.
//!
//! Lookup and removal deliberately disagree on case handling: `find_team`
//! normalizes (trim + lowercase) while `remove_team` matches byte-for-byte.
//! That asymmetry, the first-team-only `find_player` traversal, and the
//! whole-traversal abort in the barset builders are shipped behaviors kept
//! behind the flags in [`QuirksConfig`].

use crate::config::QuirksConfig;
use crate::domain::player::Player;
use crate::domain::stats::{aggregate_float_text, format_decimal, round3};
use crate::domain::team::Team;

/// Stable handle to a team slot in the roster arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TeamKey(usize);

/// Per-team stat column for bar charts: hits, strikeouts, runs, era,
/// pitcher strikeouts, batting average
#[derive(Debug, Clone, PartialEq)]
pub struct TeamBarStats {
    pub hits: i64,
    pub so: i64,
    pub runs: i64,
    pub era: f64,
    pub k: i64,
    pub avg: f64,
}

/// Canonical ordered collection of teams
#[derive(Debug, Clone, Default)]
pub struct RosterList {
    slots: Vec<Option<Team>>,
    order: Vec<TeamKey>,
    count: usize,
    quirks: QuirksConfig,
}

fn norm(name: &str) -> String {
    name.trim().to_lowercase()
}

impl RosterList {
    pub fn new(quirks: QuirksConfig) -> Self {
        Self {
            slots: Vec::new(),
            order: Vec::new(),
            count: 0,
            quirks,
        }
    }

    /// Number of teams currently reachable
    pub fn len(&self) -> usize {
        debug_assert_eq!(self.count, self.order.len());
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Teams in insertion order
    pub fn teams(&self) -> impl Iterator<Item = &Team> {
        self.order.iter().filter_map(|k| self.slots[k.0].as_ref())
    }

    pub fn team(&self, key: TeamKey) -> Option<&Team> {
        self.slots.get(key.0).and_then(|slot| slot.as_ref())
    }

    pub fn team_mut(&mut self, key: TeamKey) -> Option<&mut Team> {
        self.slots.get_mut(key.0).and_then(|slot| slot.as_mut())
    }

    // ------------------------------------------------------------------ //
    // structural mutation

    /// Append a team at the tail. Duplicate names are accepted; two teams
    /// with identical names coexist and lookups return the first.
    pub fn add_team(&mut self, team: Team) -> TeamKey {
        let key = TeamKey(self.slots.len());
        self.slots.push(Some(team));
        self.order.push(key);
        self.count += 1;
        key
    }

    /// Remove the first team whose name matches `target` by exact case
    /// (lookup normalization instead when `quirks.case_sensitive_removal`
    /// is off). No-op returning `None` when nothing matches — including a
    /// name that differs only in case, which `find_team` *would* find.
    pub fn remove_team(&mut self, target: &str) -> Option<Team> {
        let target_n = norm(target);
        let pos = self.order.iter().position(|k| {
            self.slots[k.0].as_ref().is_some_and(|t| {
                if self.quirks.case_sensitive_removal {
                    t.name == target
                } else {
                    norm(&t.name) == target_n
                }
            })
        })?;
        let key = self.order.remove(pos);
        self.count -= 1;
        self.slots[key.0].take()
    }

    // ------------------------------------------------------------------ //
    // lookups

    /// Case-insensitive, whitespace-trimmed team lookup
    pub fn find_team(&self, target: &str) -> Option<&Team> {
        let target_n = norm(target);
        self.teams().find(|t| norm(&t.name) == target_n)
    }

    pub fn find_team_mut(&mut self, target: &str) -> Option<&mut Team> {
        let key = self.find_team_key(target)?;
        self.team_mut(key)
    }

    /// Key of the first team matching the lookup normalization
    pub fn find_team_key(&self, target: &str) -> Option<TeamKey> {
        let target_n = norm(target);
        self.order
            .iter()
            .copied()
            .find(|k| self.slots[k.0].as_ref().is_some_and(|t| norm(&t.name) == target_n))
    }

    /// Exact integer id match
    pub fn find_team_by_id(&self, target: i64) -> Option<&Team> {
        self.teams().find(|t| t.team_id == target)
    }

    /// Key of the first team with a matching integer id
    pub fn find_team_key_by_id(&self, target: i64) -> Option<TeamKey> {
        self.order
            .iter()
            .copied()
            .find(|k| self.slots[k.0].as_ref().is_some_and(|t| t.team_id == target))
    }

    /// Player lookup by case-insensitive name.
    ///
    /// With `quirks.first_team_player_scan` on (the default), only the first
    /// team's roster is inspected before the search gives up — the shipped
    /// traversal never reached the remaining teams. Off, every team is
    /// scanned.
    pub fn find_player(&self, target: &str) -> Option<&Player> {
        let target_l = target.to_lowercase();
        if self.quirks.first_team_player_scan {
            let first = self.teams().next()?;
            return first
                .players
                .iter()
                .find(|p| p.name.to_lowercase() == target_l);
        }
        for team in self.teams() {
            if let Some(p) = team
                .players
                .iter()
                .find(|p| p.name.to_lowercase() == target_l)
            {
                return Some(p);
            }
        }
        None
    }

    /// All players with a matching jersey number, across every team
    pub fn find_player_by_number(&self, target: i64) -> Vec<&Player> {
        self.teams()
            .flat_map(|t| t.players.iter())
            .filter(|p| p.number == target)
            .collect()
    }

    // ------------------------------------------------------------------ //
    // aggregate readers (one full traversal each)

    /// Summary of every team and its players' primary positions
    pub fn view_all(&self) -> String {
        if self.is_empty() {
            return String::new();
        }
        let mut ret = String::new();
        for team in self.teams() {
            let players: Vec<String> = team
                .players
                .iter()
                .map(|p| format!("{}: {}", p.name, p.primary_position()))
                .collect();
            ret.push_str(&format!(
                "\nTeam: {}\nPlayers: [{}]\n",
                team.name,
                players.join(", ")
            ));
        }
        ret
    }

    /// All team names, or `None` for an empty league
    pub fn get_all_team_names(&self) -> Option<Vec<String>> {
        if self.is_empty() {
            return None;
        }
        Some(self.teams().map(|t| t.name.clone()).collect())
    }

    /// (player, team, number) for every player in the league
    pub fn get_all_players_num(&self) -> Vec<(String, String, String)> {
        self.teams()
            .flat_map(|t| t.players.iter())
            .map(|p| (p.name.clone(), p.team_name.clone(), p.number.to_string()))
            .collect()
    }

    /// (player, team, batting average) for every player in the league
    pub fn get_all_players_avg(&self) -> Vec<(String, String, String)> {
        self.teams()
            .flat_map(|t| t.players.iter())
            .map(|p| {
                (
                    p.name.clone(),
                    p.team_name.clone(),
                    format_decimal(p.batting.avg),
                )
            })
            .collect()
    }

    /// (team, roster cap, cached batting average) leaderboard rows
    pub fn get_all_avg(&self) -> Vec<(String, usize, String)> {
        self.teams()
            .map(|t| (t.name.clone(), t.max_roster, format_decimal(t.bat_avg)))
            .collect()
    }

    /// (team, roster cap, cached win-loss average) leaderboard rows
    pub fn get_all_wl(&self) -> Vec<(String, usize, String)> {
        self.teams()
            .map(|t| (t.name.clone(), t.max_roster, format_decimal(t.wl_avg)))
            .collect()
    }

    /// Per-team ERA totals over position pitchers, running total reset per
    /// team. A team with no pitcher reports `"0"`; totals that saw a pitcher
    /// render in the immediate float style (`"3.5"`, `"3.0"`) rather than
    /// through the 3-decimal formatter — both spellings are load-bearing at
    /// existing call sites.
    pub fn get_team_era(&self) -> Vec<(String, String)> {
        let mut ret = Vec::new();
        for team in self.teams() {
            let mut total = 0.0;
            let mut saw_pitcher = false;
            for player in &team.players {
                if player.is_pitcher() {
                    total += player.era();
                    saw_pitcher = true;
                }
            }
            let text = if saw_pitcher {
                aggregate_float_text(total)
            } else {
                "0".to_string()
            };
            ret.push((team.name.clone(), text));
        }
        ret
    }

    /// Chart columns: team names plus parallel stat vectors.
    ///
    /// Returns `None` for an empty league, and — with
    /// `quirks.abort_barset_on_zero_hits` on (the default) — for *any* team
    /// with zero recorded hits: the whole traversal is abandoned, not just
    /// that team. Off, zero-hit teams are skipped and the rest survive.
    pub fn get_team_objs_barset(&self) -> Option<(Vec<String>, Vec<TeamBarStats>)> {
        if self.is_empty() {
            return None;
        }
        self.collect_barset(|_| true)
    }

    /// Chart columns restricted to the named teams. Unlike the unfiltered
    /// variant there is no upfront empty-league check: an empty league (or
    /// an unmatched filter) yields empty columns, not the failure sentinel.
    pub fn get_team_objs_barset_spec(
        &self,
        names: &[String],
    ) -> Option<(Vec<String>, Vec<TeamBarStats>)> {
        self.collect_barset(|team| names.iter().any(|n| n == &team.name))
    }

    fn collect_barset<F>(&self, include: F) -> Option<(Vec<String>, Vec<TeamBarStats>)>
    where
        F: Fn(&Team) -> bool,
    {
        let mut names = Vec::new();
        let mut stats = Vec::new();
        for team in self.teams() {
            if !include(team) {
                continue;
            }
            let hits = team.team_hits();
            if hits == 0 {
                if self.quirks.abort_barset_on_zero_hits {
                    return None;
                }
                continue;
            }
            names.push(team.name.clone());
            stats.push(TeamBarStats {
                hits,
                so: team.team_so(),
                runs: team.team_runs(),
                era: team.team_era_total(),
                k: team.team_k(),
                avg: round3(team.bat_avg),
            });
        }
        Some((names, stats))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::player::PlayerStat;
    use crate::domain::stats::StatValue;

    fn roster() -> RosterList {
        RosterList::new(QuirksConfig::default())
    }

    fn team(name: &str) -> Team {
        Team::new(9, name, "Mgr", 12)
    }

    fn player(name: &str, number: i64, team_name: &str, positions: &[&str]) -> Player {
        Player::new(
            name,
            number,
            0,
            team_name,
            9,
            positions.iter().map(|s| s.to_string()).collect(),
        )
    }

    fn pitcher_with_era(name: &str, team_name: &str, era: f64) -> Player {
        let mut p = Player::new_pitcher(name, 1, 0, team_name, 9, vec!["pitcher".into()]);
        p.write_stat(PlayerStat::Era, StatValue::Float(era));
        p
    }

    #[test]
    fn test_count_tracks_appends_including_duplicates() {
        let mut list = roster();
        list.add_team(team("Beef"));
        list.add_team(team("Beef"));
        list.add_team(team("Chicken"));
        assert_eq!(list.len(), 3);
        list.remove_team("Beef");
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_lookup_is_case_insensitive_but_removal_is_not() {
        let mut list = roster();
        list.add_team(team("Beef"));

        assert!(list.find_team("BEEF").is_some());
        assert!(list.find_team("  beef  ").is_some());

        // removal matches exact case only
        assert!(list.remove_team("BEEF").is_none());
        assert_eq!(list.len(), 1);
        assert!(list.remove_team("Beef").is_some());
        assert_eq!(list.len(), 0);
    }

    #[test]
    fn test_case_insensitive_removal_behind_flag() {
        let quirks = QuirksConfig {
            case_sensitive_removal: false,
            ..QuirksConfig::default()
        };
        let mut list = RosterList::new(quirks);
        list.add_team(team("Beef"));
        assert!(list.remove_team("BEEF").is_some());
        assert!(list.is_empty());
    }

    #[test]
    fn test_single_team_removal_empties_list() {
        let mut list = roster();
        list.add_team(team("Solo"));
        assert!(list.remove_team("Solo").is_some());
        assert!(list.is_empty());
        assert!(list.find_team("Solo").is_none());
    }

    #[test]
    fn test_find_team_by_id() {
        let mut list = roster();
        list.add_team(team("Beef"));
        let id = list.find_team("Beef").unwrap().team_id;
        assert_eq!(list.find_team_by_id(id).unwrap().name, "Beef");
        assert!(list.find_team_by_id(id + 1).is_none());
    }

    #[test]
    fn test_find_player_scans_first_team_only() {
        let mut list = roster();
        let mut a = team("A");
        a.add_player(player("Early Bird", 3, "A", &["catcher"]));
        let mut b = team("B");
        b.add_player(player("Late Riser", 4, "B", &["shortstop"]));
        list.add_team(a);
        list.add_team(b);

        assert!(list.find_player("early bird").is_some());
        // legacy traversal never reaches team B
        assert!(list.find_player("Late Riser").is_none());
    }

    #[test]
    fn test_find_player_full_scan_behind_flag() {
        let quirks = QuirksConfig {
            first_team_player_scan: false,
            ..QuirksConfig::default()
        };
        let mut list = RosterList::new(quirks);
        let mut a = team("A");
        a.add_player(player("Early Bird", 3, "A", &["catcher"]));
        let mut b = team("B");
        b.add_player(player("Late Riser", 4, "B", &["shortstop"]));
        list.add_team(a);
        list.add_team(b);

        assert_eq!(list.find_player("Late Riser").unwrap().name, "Late Riser");
    }

    #[test]
    fn test_find_player_by_number_spans_teams() {
        let mut list = roster();
        let mut a = team("A");
        a.add_player(player("One", 7, "A", &["catcher"]));
        let mut b = team("B");
        b.add_player(player("Two", 7, "B", &["shortstop"]));
        b.add_player(player("Three", 8, "B", &["left field"]));
        list.add_team(a);
        list.add_team(b);

        let sevens = list.find_player_by_number(7);
        assert_eq!(sevens.len(), 2);
        assert!(list.find_player_by_number(99).is_empty());
    }

    #[test]
    fn test_empty_league_readers() {
        let list = roster();
        assert_eq!(list.view_all(), "");
        assert!(list.get_all_team_names().is_none());
        assert!(list.get_all_players_num().is_empty());
        assert!(list.get_team_era().is_empty());
        assert!(list.get_team_objs_barset().is_none());
        // the filtered variant skips the empty check and yields empty columns
        let (names, stats) = list.get_team_objs_barset_spec(&["A".into()]).unwrap();
        assert!(names.is_empty());
        assert!(stats.is_empty());
    }

    #[test]
    fn test_view_all_lists_primary_positions() {
        let mut list = roster();
        let mut a = team("Beef Sliders");
        a.add_player(player("Ivy Okafor", 12, "Beef Sliders", &["catcher", "first base"]));
        a.add_player(pitcher_with_era("Sal Moreno", "Beef Sliders", 3.5));
        list.add_team(a);

        assert_eq!(
            list.view_all(),
            "\nTeam: Beef Sliders\nPlayers: [Ivy Okafor: catcher, Sal Moreno: pitcher]\n"
        );
    }

    #[test]
    fn test_league_era_mixes_float_and_zero_spellings() {
        let mut list = roster();
        let mut a = team("A");
        a.add_player(pitcher_with_era("Ace", "A", 3.5));
        a.add_player(player("Bat", 2, "A", &["catcher"]));
        let b = team("B");
        list.add_team(a);
        list.add_team(b);

        insta::assert_debug_snapshot!(list.get_team_era(), @r###"
        [
            (
                "A",
                "3.5",
            ),
            (
                "B",
                "0",
            ),
        ]
        "###);
    }

    #[test]
    fn test_barset_aborts_on_zero_hit_team() {
        let mut list = roster();
        for name in ["A", "B", "C"] {
            let mut t = team(name);
            let mut p = player("Hitter", 5, name, &["catcher"]);
            if name != "B" {
                p.set_hit(3);
            }
            t.add_player(p);
            list.add_team(t);
        }

        // team B has zero hits: the whole traversal fails
        assert!(list.get_team_objs_barset().is_none());
    }

    #[test]
    fn test_barset_skips_zero_hit_team_behind_flag() {
        let quirks = QuirksConfig {
            abort_barset_on_zero_hits: false,
            ..QuirksConfig::default()
        };
        let mut list = RosterList::new(quirks);
        for name in ["A", "B", "C"] {
            let mut t = team(name);
            let mut p = player("Hitter", 5, name, &["catcher"]);
            if name != "B" {
                p.set_hit(3);
            }
            t.add_player(p);
            list.add_team(t);
        }

        let (names, stats) = list.get_team_objs_barset().unwrap();
        assert_eq!(names, vec!["A".to_string(), "C".to_string()]);
        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].hits, 3);
    }

    #[test]
    fn test_barset_columns() {
        let mut list = roster();
        let mut t = team("A");
        let mut hitter = player("Hitter", 5, "A", &["catcher"]);
        hitter.set_hit(4);
        hitter.set_so(2);
        t.add_player(hitter);
        t.add_player(pitcher_with_era("Ace", "A", 2.25));
        list.add_team(t);

        let (names, stats) = list.get_team_objs_barset().unwrap();
        assert_eq!(names, vec!["A".to_string()]);
        assert_eq!(stats[0].hits, 4);
        assert_eq!(stats[0].so, 2);
        assert_eq!(stats[0].era, 2.25);
    }

    #[test]
    fn test_duplicate_names_resolve_to_first() {
        let mut list = roster();
        let mut first = team("Beef");
        first.set_manager("First Mgr");
        let mut second = team("Beef");
        second.set_manager("Second Mgr");
        list.add_team(first);
        list.add_team(second);

        assert_eq!(list.find_team("beef").unwrap().manager, "First Mgr");
        // removal also takes the first match
        list.remove_team("Beef");
        assert_eq!(list.find_team("beef").unwrap().manager, "Second Mgr");
    }

    #[test]
    fn test_team_keys_stay_stable_across_removal() {
        let mut list = roster();
        let ka = list.add_team(team("A"));
        let kb = list.add_team(team("B"));
        list.remove_team("A");
        assert!(list.team(ka).is_none());
        assert_eq!(list.team(kb).unwrap().name, "B");
    }
}
