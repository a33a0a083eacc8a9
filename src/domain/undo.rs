//! Single-level undo of stat mutations.
//!
//! Each mutation the presentation layer applies is preceded by pushing a
//! [`StatChangeRecord`] snapshotting the prior value; undoing pops the top
//! record and writes that value back. Exactly one level deep per pop — there
//! is no redo stack, and repeating a mutation after an undo simply records
//! afresh.
//!
//! Records carry no callable: they are tagged commands (operation kind plus
//! payload) with an explicit revert path. The `TeamKey` inside is a
//! non-owning reference into [`RosterList`] storage; if the target vanished
//! before the undo fired, the revert is a logged no-op.

use crate::domain::player::{Player, PlayerStat};
use crate::domain::roster::{RosterList, TeamKey};
use crate::domain::stats::StatValue;
use crate::domain::team::{Team, TeamStat};

/// Whether a record targets the team itself or one of its players
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeScope {
    Team,
    Player,
}

/// The reversible operation inside a record
#[derive(Debug, Clone)]
pub enum UndoOp {
    /// Restore a team stat to its prior value
    TeamStat { key: TeamStat, prev: StatValue },
    /// Restore a player stat to its prior value
    PlayerStat { key: PlayerStat, prev: StatValue },
    /// Restore a cascading batting counter: the counter returns to its
    /// prior value and `pa` (and `at_bat` when the outcome was an at-bat)
    /// rolls back by the applied delta
    PlayerCounter {
        key: PlayerStat,
        prev: i64,
        delta: i64,
        cascades_at_bat: bool,
    },
    /// Restore a lineup slot's occupant
    LineupSlot { slot: u32, prev: Option<String> },
    /// Restore a defensive position's occupant
    Position {
        position: String,
        prev: Option<String>,
    },
}

/// One undoable mutation's context
#[derive(Debug, Clone)]
pub struct StatChangeRecord {
    /// Non-owning reference to the target team's slot
    pub team: TeamKey,
    /// Display name of the mutated entity (team or player)
    pub display_name: String,
    pub scope: ChangeScope,
    /// Player name within the team, for player-scoped records
    pub player: Option<String>,
    pub op: UndoOp,
}

impl StatChangeRecord {
    /// Snapshot a team stat ahead of mutating it
    pub fn team_stat(key: TeamKey, team: &Team, stat: TeamStat) -> Self {
        Self {
            team: key,
            display_name: team.name.clone(),
            scope: ChangeScope::Team,
            player: None,
            op: UndoOp::TeamStat {
                key: stat,
                prev: team.stat(stat),
            },
        }
    }

    /// Snapshot a lineup slot ahead of reassigning it
    pub fn lineup_slot(key: TeamKey, team: &Team, slot: u32) -> Self {
        Self {
            team: key,
            display_name: team.name.clone(),
            scope: ChangeScope::Team,
            player: None,
            op: UndoOp::LineupSlot {
                slot,
                prev: team.lineup_conflict(slot).map(str::to_string),
            },
        }
    }

    /// Snapshot a defensive position ahead of reassigning it
    pub fn position(key: TeamKey, team: &Team, position: &str) -> Self {
        Self {
            team: key,
            display_name: team.name.clone(),
            scope: ChangeScope::Team,
            player: None,
            op: UndoOp::Position {
                position: position.to_string(),
                prev: team.position_conflict(position).map(str::to_string),
            },
        }
    }

    /// Snapshot a player stat ahead of mutating it
    pub fn player_stat(key: TeamKey, player: &Player, stat: PlayerStat) -> Self {
        Self {
            team: key,
            display_name: player.name.clone(),
            scope: ChangeScope::Player,
            player: Some(player.name.clone()),
            op: UndoOp::PlayerStat {
                key: stat,
                prev: player.stat(stat),
            },
        }
    }

    /// Snapshot a cascading batting counter ahead of applying `delta`
    pub fn player_counter(
        key: TeamKey,
        player: &Player,
        stat: PlayerStat,
        delta: i64,
        cascades_at_bat: bool,
    ) -> Self {
        Self {
            team: key,
            display_name: player.name.clone(),
            scope: ChangeScope::Player,
            player: Some(player.name.clone()),
            op: UndoOp::PlayerCounter {
                key: stat,
                prev: player.stat(stat).as_int(),
                delta,
                cascades_at_bat,
            },
        }
    }

    /// Label of the stat this record restores
    pub fn stat_label(&self) -> &str {
        match &self.op {
            UndoOp::TeamStat { key, .. } => key.label(),
            UndoOp::PlayerStat { key, .. } | UndoOp::PlayerCounter { key, .. } => key.label(),
            UndoOp::LineupSlot { .. } => "lineup",
            UndoOp::Position { .. } => "positions",
        }
    }

    fn prev_text(&self) -> String {
        match &self.op {
            UndoOp::TeamStat { prev, .. } | UndoOp::PlayerStat { prev, .. } => prev.to_string(),
            UndoOp::PlayerCounter { prev, .. } => prev.to_string(),
            UndoOp::LineupSlot { prev, .. } | UndoOp::Position { prev, .. } => {
                prev.clone().unwrap_or_else(|| "None".to_string())
            }
        }
    }

    /// Re-apply the stored prior value to revert the mutation. Returns
    /// `false` (logged) when the target no longer exists.
    pub fn revert(&self, roster: &mut RosterList) -> bool {
        let Some(team) = roster.team_mut(self.team) else {
            tracing::warn!(target = %self.display_name, "undo target team no longer exists");
            return false;
        };
        match &self.op {
            UndoOp::TeamStat { key, prev } => {
                team.write_stat(*key, prev.clone());
                true
            }
            UndoOp::LineupSlot { slot, prev } => {
                team.set_lineup_slot(*slot, prev.clone());
                true
            }
            UndoOp::Position { position, prev } => {
                team.set_position(position, prev.clone());
                true
            }
            UndoOp::PlayerStat { key, prev } => match self.target_player(team) {
                Some(player) => {
                    player.write_stat(*key, prev.clone());
                    true
                }
                None => false,
            },
            UndoOp::PlayerCounter {
                key,
                prev,
                delta,
                cascades_at_bat,
            } => match self.target_player(team) {
                Some(player) => {
                    player.batting.pa -= delta;
                    if *cascades_at_bat {
                        player.batting.at_bat -= delta;
                    }
                    player.write_stat(*key, StatValue::Int(*prev));
                    true
                }
                None => false,
            },
        }
    }

    fn target_player<'a>(&self, team: &'a mut Team) -> Option<&'a mut Player> {
        let name = match &self.player {
            Some(name) => name,
            None => {
                tracing::warn!(target = %self.display_name, "player-scoped record has no player");
                return None;
            }
        };
        let found = team.get_player_mut(name);
        if found.is_none() {
            tracing::warn!(player = %name, "undo target player no longer exists");
        }
        found
    }
}

impl std::fmt::Display for StatChangeRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Obj: {} - Stat: {} - L: {}",
            self.display_name,
            self.stat_label(),
            self.prev_text()
        )
    }
}

/// LIFO store of stat-change records
#[derive(Debug, Clone, Default)]
pub struct UndoStack {
    records: Vec<StatChangeRecord>,
}

impl UndoStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn size(&self) -> usize {
        self.records.len()
    }

    /// Record a mutation about to be applied
    pub fn push(&mut self, record: StatChangeRecord) {
        self.records.push(record);
    }

    /// Remove and return the most recent record; `None` on empty, never an
    /// error
    pub fn pop(&mut self) -> Option<StatChangeRecord> {
        self.records.pop()
    }

    /// Earliest record still held
    pub fn peek_first(&self) -> Option<&StatChangeRecord> {
        self.records.first()
    }

    /// Most recent record
    pub fn peek_last(&self) -> Option<&StatChangeRecord> {
        self.records.last()
    }

    /// Record just below the top, when there are at least two
    pub fn peek_second_last(&self) -> Option<&StatChangeRecord> {
        self.records.len().checked_sub(2).map(|i| &self.records[i])
    }

    /// Pop the most recent record and revert it. One level deep: a second
    /// call reverts the mutation before it, and so on. Returns `false` on an
    /// empty stack or a vanished target (the record is consumed either way).
    pub fn undo(&mut self, roster: &mut RosterList) -> bool {
        match self.pop() {
            Some(record) => record.revert(roster),
            None => false,
        }
    }
}

impl std::fmt::Display for UndoStack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            return write!(f, "Stack Empty");
        }
        for (i, record) in self.records.iter().enumerate() {
            writeln!(f, "{}:  {}", i + 1, record)?;
        }
        Ok(())
    }
}
