//! Row classification and league hydration.
//!
//! The storage layer emits per-table row batches — `(table tag, ordered
//! field schema, positionally aligned values)` — in no guaranteed order.
//! [`InstanceBuilder`] keeps the three components in lock-step queues,
//! classifies one row at a time off the tail, and positions the resulting
//! [`TypedInstance`]s: the league instance anchors position 0, the team
//! instance position 1, and player/pitcher instances follow in arrival
//! order. [`hydrate`] then folds the positioned sequence into a seeded
//! [`League`].

use crate::config::AppConfig;
use crate::domain::{name_hash, parse_lineup_slot, StatValue};
use crate::domain::{League, Player, PlayerStat, Team, TeamStat};
use crate::error::LoadError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;

/// Safety bound on classification passes. A malformed queue yields whatever
/// was classified so far instead of spinning; callers that need exactness
/// compare output length against the rows they enqueued.
pub const MAX_CLASSIFY_PASSES: usize = 10_000;

/// Source table of a queued row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableTag {
    League,
    Team,
    Player,
    Pitcher,
}

impl TableTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::League => "league",
            Self::Team => "team",
            Self::Player => "player",
            Self::Pitcher => "pitcher",
        }
    }
}

impl FromStr for TableTag {
    type Err = LoadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "league" => Ok(Self::League),
            "team" => Ok(Self::Team),
            "player" => Ok(Self::Player),
            "pitcher" => Ok(Self::Pitcher),
            other => Err(LoadError::UnknownTable(other.to_string())),
        }
    }
}

impl std::fmt::Display for TableTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One reconstructed record: its table tag and ordered field/value pairs
#[derive(Debug, Clone, PartialEq)]
pub struct TypedInstance {
    pub tag: TableTag,
    pub fields: Vec<(String, Value)>,
}

/// Reassembles typed instances from table-tagged row batches.
///
/// The three queues (tags, schemas, values) always have equal length: every
/// enqueue appends to all three, every classification removes one element
/// from each.
#[derive(Debug, Clone, Default)]
pub struct InstanceBuilder {
    tags: Vec<TableTag>,
    schemas: Vec<Vec<String>>,
    values: Vec<Vec<Value>>,
    instances: Vec<TypedInstance>,
    /// League/team instances classified so far; they occupy the front of
    /// the output and player rows land behind them
    front_slots: usize,
    /// League instances classified so far; the team slot sits behind them
    leagues_seen: usize,
}

impl InstanceBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue one row. The schema lists field names in table order; values
    /// align positionally.
    pub fn enqueue(&mut self, tag: TableTag, schema: Vec<String>, values: Vec<Value>) {
        self.tags.push(tag);
        self.schemas.push(schema);
        self.values.push(values);
    }

    /// Rows still waiting to be classified
    pub fn queued(&self) -> usize {
        debug_assert_eq!(self.tags.len(), self.schemas.len());
        debug_assert_eq!(self.tags.len(), self.values.len());
        self.tags.len()
    }

    /// Instances classified so far
    pub fn built(&self) -> usize {
        self.instances.len()
    }

    /// First positioned instance, without removing it
    pub fn peek(&self) -> Option<&TypedInstance> {
        self.instances.first()
    }

    /// Classify the most recently enqueued row: zip its schema with its
    /// values, position the instance, and consume the row from all three
    /// queues. Returns `false` when nothing is queued.
    ///
    /// Positioning: a league instance inserts at index 0 and a team instance
    /// directly behind the leagues classified so far — with one of each,
    /// they end up at positions 0 and 1. Player and pitcher instances
    /// insert behind every front instance but ahead of previously
    /// classified players; since classification walks the queue from the
    /// tail, that preserves their arrival order. Extra league/team rows are
    /// not deduped: the last one classified wins the front slot and pushes
    /// the earlier ones right.
    pub fn classify_one(&mut self) -> bool {
        let tag = match self.tags.pop() {
            Some(tag) => tag,
            None => return false,
        };
        let schema = self.schemas.pop().unwrap_or_default();
        let values = self.values.pop().unwrap_or_default();

        // schema order defines field order; a short side truncates the zip
        let fields: Vec<(String, Value)> = schema.into_iter().zip(values).collect();
        let instance = TypedInstance { tag, fields };

        match tag {
            TableTag::League => {
                self.instances.insert(0, instance);
                self.leagues_seen += 1;
                self.front_slots += 1;
            }
            TableTag::Team => {
                let idx = self.leagues_seen.min(self.instances.len());
                self.instances.insert(idx, instance);
                self.front_slots += 1;
            }
            TableTag::Player | TableTag::Pitcher => {
                let idx = self.front_slots.min(self.instances.len());
                self.instances.insert(idx, instance);
            }
        }
        true
    }

    /// Classify until the queues drain or the pass guard trips, then hand
    /// off the accumulated sequence. The builder retains nothing.
    pub fn build_all(&mut self) -> Vec<TypedInstance> {
        let mut passes = 0;
        while !self.tags.is_empty() && !self.values.is_empty() && passes < MAX_CLASSIFY_PASSES {
            if !self.classify_one() {
                break;
            }
            passes += 1;
        }
        if !self.tags.is_empty() {
            tracing::warn!(
                remaining = self.tags.len(),
                "classification guard tripped; returning partial output"
            );
        }
        self.front_slots = 0;
        self.leagues_seen = 0;
        std::mem::take(&mut self.instances)
    }
}

// ---------------------------------------------------------------------- //
// hydration

/// Build a seeded league from a positioned instance sequence.
///
/// Instances are folded in table order (league → team → player → pitcher).
/// Teams merge into the roster by id, then by name; players resolve their
/// team by name, then by id, and are dropped with a warning when neither
/// resolves or the roster is full. Null values are skipped throughout.
pub fn hydrate(instances: Vec<TypedInstance>, config: &AppConfig) -> League {
    let mut league = League::new(config);

    let mut leagues = Vec::new();
    let mut teams = Vec::new();
    let mut players = Vec::new();
    for instance in instances {
        match instance.tag {
            TableTag::League => leagues.push(instance),
            TableTag::Team => teams.push(instance),
            TableTag::Player | TableTag::Pitcher => players.push(instance),
        }
    }

    for instance in &leagues {
        for (field, value) in &instance.fields {
            if value.is_null() || field == "leagueID" {
                continue;
            }
            let text = value_text(value);
            if !league.apply_field(field, &text) {
                tracing::debug!(field = %field, "unmapped league field");
            }
        }
    }

    for instance in &teams {
        let team = team_from_fields(&instance.fields, &league, config);
        merge_team(&mut league, team);
    }

    for instance in &players {
        let pitcher = instance.tag == TableTag::Pitcher;
        attach_player(&mut league, &instance.fields, pitcher);
    }

    league
}

fn team_from_fields(fields: &[(String, Value)], league: &League, config: &AppConfig) -> Team {
    let mut team = Team::new(
        league.league_id,
        "team",
        "manager",
        config.league.default_max_roster,
    );
    let mut id_override = None;

    for (field, value) in fields {
        if value.is_null() {
            continue;
        }
        match field.as_str() {
            "name" => team.set_name(&value_text(value)),
            "manager" => team.set_manager(&value_text(value)),
            "teamID" => id_override = value_i64(value),
            "leagueID" => {
                if let Some(id) = value_i64(value) {
                    team.league_id = id;
                }
            }
            // roster membership comes from the player tables; images stay
            // with the presentation layer
            "players" | "logo" => {}
            "lineup" => {
                for (slot, name) in object_entries(value) {
                    if let Some(slot) = parse_lineup_slot(&slot) {
                        team.set_lineup_slot(slot, name);
                    }
                }
            }
            "positions" => {
                for (position, name) in object_entries(value) {
                    team.set_position(&position, name);
                }
            }
            other => match TeamStat::from_field(other) {
                Some(key) => team.write_stat(key, json_stat(value)),
                None => tracing::debug!(field = %other, "unmapped team field"),
            },
        }
    }
    if let Some(id) = id_override {
        team.team_id = id;
    }
    team
}

/// Merge by id first, then by name; otherwise append as a new team
fn merge_team(league: &mut League, team: Team) {
    let existing = league
        .roster
        .find_team_key_by_id(team.team_id)
        .or_else(|| league.roster.find_team_key(&team.name));
    match existing.and_then(|key| league.roster.team_mut(key)) {
        Some(current) => {
            current.manager = team.manager;
            current.wins = team.wins;
            current.losses = team.losses;
            current.games_played = team.games_played;
            current.wl_avg = team.wl_avg;
            current.bat_avg = team.bat_avg;
            current.team_era = team.team_era;
            current.max_roster = team.max_roster;
            current.lineup = team.lineup;
            current.positions = team.positions;
        }
        None => {
            league.roster.add_team(team);
        }
    }
}

fn attach_player(league: &mut League, fields: &[(String, Value)], pitcher: bool) {
    let mut player = if pitcher {
        Player::new_pitcher("player", 0, 0, "", league.league_id, Vec::new())
    } else {
        Player::new("player", 0, 0, "", league.league_id, Vec::new())
    };
    let mut team_name = None;
    let mut team_id = None;

    for (field, value) in fields {
        if value.is_null() {
            continue;
        }
        match field.as_str() {
            "name" => {
                player.name = value_text(value);
                player.player_id = name_hash(&player.name);
            }
            "number" => player.number = value_i64(value).unwrap_or(0),
            "positions" => player.positions = string_list(value),
            "team" => team_name = Some(value_text(value)),
            "teamID" => team_id = value_i64(value),
            "playerID" => {
                if let Some(id) = value_i64(value) {
                    player.player_id = id;
                }
            }
            "leagueID" | "image" => {}
            other => match PlayerStat::from_field(other) {
                Some(key) => player.write_stat(key, json_stat(value)),
                None => tracing::debug!(field = %other, "unmapped player field"),
            },
        }
    }

    let key = team_name
        .as_deref()
        .and_then(|name| league.roster.find_team_key(name))
        .or_else(|| team_id.and_then(|id| league.roster.find_team_key_by_id(id)));
    let Some(team) = key.and_then(|k| league.roster.team_mut(k)) else {
        tracing::warn!(player = %player.name, "no team resolved for player; dropping");
        return;
    };
    player.team_id = team.team_id;
    player.team_name = team.name.clone();
    team.add_player(player);
}

// ---------------------------------------------------------------------- //
// value coercion — storage delivers strings and numbers interchangeably

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn value_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().map(|f| f as i64))
        }
        _ => None,
    }
}

fn json_stat(value: &Value) -> StatValue {
    match value {
        Value::Number(n) => match n.as_i64() {
            Some(i) => StatValue::Int(i),
            None => StatValue::Float(n.as_f64().unwrap_or(0.0)),
        },
        Value::String(s) => {
            let s = s.trim();
            if let Ok(i) = s.parse::<i64>() {
                StatValue::Int(i)
            } else if let Ok(f) = s.parse::<f64>() {
                StatValue::Float(f)
            } else {
                StatValue::Text(s.to_string())
            }
        }
        _ => StatValue::Int(0),
    }
}

/// Entries of a JSON object, parsing one level of string-encoded JSON the
/// way stored lineup/position columns arrive
fn object_entries(value: &Value) -> Vec<(String, Option<String>)> {
    let parsed;
    let object = match value {
        Value::String(s) => {
            parsed = serde_json::from_str::<Value>(s).unwrap_or(Value::Null);
            &parsed
        }
        other => other,
    };
    match object.as_object() {
        Some(map) => map
            .iter()
            .map(|(k, v)| (k.clone(), v.as_str().map(str::to_string)))
            .collect(),
        None => Vec::new(),
    }
}

fn string_list(value: &Value) -> Vec<String> {
    let parsed;
    let list = match value {
        Value::String(s) => {
            parsed = serde_json::from_str::<Value>(s).unwrap_or(Value::Null);
            match &parsed {
                Value::Array(_) => &parsed,
                // a bare string is a single position
                _ => return vec![s.clone()],
            }
        }
        other => other,
    };
    match list.as_array() {
        Some(items) => items
            .iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect(),
        None => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(fields: &[(&str, Value)]) -> (Vec<String>, Vec<Value>) {
        (
            fields.iter().map(|(k, _)| k.to_string()).collect(),
            fields.iter().map(|(_, v)| v.clone()).collect(),
        )
    }

    fn enqueue(builder: &mut InstanceBuilder, tag: TableTag, fields: &[(&str, Value)]) {
        let (schema, values) = row(fields);
        builder.enqueue(tag, schema, values);
    }

    #[test]
    fn test_arbitrary_arrival_order_positions_league_and_team_first() {
        let mut builder = InstanceBuilder::new();
        enqueue(&mut builder, TableTag::Player, &[("name", json!("P"))]);
        enqueue(&mut builder, TableTag::Team, &[("name", json!("T"))]);
        enqueue(&mut builder, TableTag::League, &[("name", json!("L"))]);
        enqueue(&mut builder, TableTag::Pitcher, &[("name", json!("Pi"))]);

        let out = builder.build_all();
        let tags: Vec<TableTag> = out.iter().map(|i| i.tag).collect();
        assert_eq!(
            tags,
            vec![
                TableTag::League,
                TableTag::Team,
                TableTag::Player,
                TableTag::Pitcher
            ]
        );
        assert_eq!(out.len(), 4);
        assert_eq!(builder.queued(), 0);
    }

    #[test]
    fn test_storage_order_also_positions_correctly() {
        // the common storage order: league, team, then roster rows
        let mut builder = InstanceBuilder::new();
        enqueue(&mut builder, TableTag::League, &[("name", json!("L"))]);
        enqueue(&mut builder, TableTag::Team, &[("name", json!("T"))]);
        enqueue(&mut builder, TableTag::Player, &[("name", json!("P1"))]);
        enqueue(&mut builder, TableTag::Player, &[("name", json!("P2"))]);
        enqueue(&mut builder, TableTag::Pitcher, &[("name", json!("Pi"))]);

        let out = builder.build_all();
        let names: Vec<&Value> = out.iter().map(|i| &i.fields[0].1).collect();
        assert_eq!(out[0].tag, TableTag::League);
        assert_eq!(out[1].tag, TableTag::Team);
        // player rows keep their arrival order
        assert_eq!(names[2], &json!("P1"));
        assert_eq!(names[3], &json!("P2"));
        assert_eq!(names[4], &json!("Pi"));
    }

    #[test]
    fn test_duplicate_league_rows_contend_for_slot_zero() {
        let mut builder = InstanceBuilder::new();
        enqueue(&mut builder, TableTag::League, &[("name", json!("first"))]);
        enqueue(&mut builder, TableTag::League, &[("name", json!("second"))]);

        let out = builder.build_all();
        // nothing is deduped; the last classified row holds position 0
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].fields[0].1, json!("first"));
    }

    #[test]
    fn test_schema_zip_truncates_to_shorter_side() {
        let mut builder = InstanceBuilder::new();
        builder.enqueue(
            TableTag::Team,
            vec!["name".into(), "manager".into(), "wins".into()],
            vec![json!("T"), json!("M")],
        );
        let out = builder.build_all();
        assert_eq!(out[0].fields.len(), 2);
        assert_eq!(out[0].fields[1].0, "manager");
    }

    #[test]
    fn test_classify_one_on_empty_queue() {
        let mut builder = InstanceBuilder::new();
        assert!(!builder.classify_one());
        assert!(builder.build_all().is_empty());
    }

    #[test]
    fn test_build_all_hands_off_instances() {
        let mut builder = InstanceBuilder::new();
        enqueue(&mut builder, TableTag::Team, &[("name", json!("T"))]);
        let first = builder.build_all();
        assert_eq!(first.len(), 1);
        assert_eq!(builder.built(), 0);
        assert!(builder.build_all().is_empty());
    }

    #[test]
    fn test_unknown_table_tag_is_an_error() {
        assert!("league".parse::<TableTag>().is_ok());
        assert!("franchise".parse::<TableTag>().is_err());
    }

    #[test]
    fn test_hydrate_end_to_end() {
        let config = AppConfig::default();
        let mut builder = InstanceBuilder::new();
        enqueue(
            &mut builder,
            TableTag::Player,
            &[
                ("name", json!("Ivy Okafor")),
                ("number", json!("12")),
                ("team", json!("B")),
                ("positions", json!(r#"["catcher"]"#)),
                ("hit", json!(4)),
                ("at_bat", json!(10)),
            ],
        );
        enqueue(&mut builder, TableTag::Team, &[("name", json!("A"))]);
        enqueue(&mut builder, TableTag::Team, &[("name", json!("B"))]);
        enqueue(
            &mut builder,
            TableTag::League,
            &[("name", json!("Sunday League")), ("commissioner", json!("R. Ortiz"))],
        );
        enqueue(
            &mut builder,
            TableTag::Pitcher,
            &[
                ("name", json!("Sal Moreno")),
                ("number", json!(21)),
                ("team", json!("A")),
                ("positions", json!(r#"["pitcher"]"#)),
                ("era", json!("3.5")),
            ],
        );

        let league = hydrate(builder.build_all(), &config);
        assert_eq!(league.name, "Sunday League");
        assert_eq!(league.admin.commissioner.as_deref(), Some("R. Ortiz"));
        assert_eq!(league.roster.len(), 2);

        // team A has the pitcher, team B does not
        assert_eq!(
            league.roster.get_team_era(),
            vec![
                ("A".to_string(), "3.5".to_string()),
                ("B".to_string(), "0".to_string())
            ]
        );

        let b = league.roster.find_team("B").unwrap();
        assert_eq!(b.players.len(), 1);
        assert_eq!(b.players[0].batting.hit, 4);
        assert_eq!(b.players[0].team_name, "B");
    }

    #[test]
    fn test_hydrate_merges_duplicate_team_rows() {
        let config = AppConfig::default();
        let mut builder = InstanceBuilder::new();
        enqueue(
            &mut builder,
            TableTag::Team,
            &[("name", json!("A")), ("manager", json!("First"))],
        );
        enqueue(
            &mut builder,
            TableTag::Team,
            &[("name", json!("A")), ("manager", json!("Second")), ("wins", json!(0))],
        );
        let league = hydrate(builder.build_all(), &config);
        assert_eq!(league.roster.len(), 1);
        assert_eq!(league.roster.find_team("A").unwrap().manager, "Second");
    }

    #[test]
    fn test_hydrate_drops_unresolvable_player() {
        let config = AppConfig::default();
        let mut builder = InstanceBuilder::new();
        enqueue(
            &mut builder,
            TableTag::Player,
            &[("name", json!("Lost Soul")), ("team", json!("Nowhere"))],
        );
        let league = hydrate(builder.build_all(), &config);
        assert!(league.roster.is_empty());
    }

    #[test]
    fn test_hydrate_parses_lineup_column() {
        let config = AppConfig::default();
        let mut builder = InstanceBuilder::new();
        enqueue(
            &mut builder,
            TableTag::Team,
            &[
                ("name", json!("A")),
                ("lineup", json!(r#"{"1": "Ivy Okafor", "2": null}"#)),
            ],
        );
        let league = hydrate(builder.build_all(), &config);
        let team = league.roster.find_team("A").unwrap();
        assert_eq!(team.lineup_conflict(1), Some("Ivy Okafor"));
        assert_eq!(team.lineup_conflict(2), None);
    }
}
