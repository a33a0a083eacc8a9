//! Player and pitcher entities.
//!
//! A roster entry is always a [`Player`]; pitcher rows carry an additional
//! [`PitchingStats`] block. Aggregation paths decide "is a pitcher" from the
//! position list, not from the presence of that block.
//!
//! Counter setters are increments with cascade semantics: an at-bat outcome
//! (hit, strikeout, put out) also advances `at_bat` and `pa`, while a plate
//! appearance that is not an at-bat (walk, hit-by-pitch, sacrifice fly,
//! fielder's choice) advances `pa` only. Breakdown counters (home runs,
//! singles, ...) validate against the grouped totals they decompose.
//! Rejected updates are no-ops reported through `tracing::warn!`; the
//! presentation layer owns any dialog surface.

use crate::domain::stats::{format_decimal, name_hash, round3, StatValue};

/// Batting counters and derived stats carried by every roster entry
#[derive(Debug, Clone, Default)]
pub struct BattingStats {
    pub pa: i64,
    pub at_bat: i64,
    pub fielder_choice: i64,
    pub hit: i64,
    pub bb: i64,
    pub hbp: i64,
    pub put_out: i64,
    pub so: i64,
    pub hr: i64,
    pub rbi: i64,
    pub runs: i64,
    pub singles: i64,
    pub doubles: i64,
    pub triples: i64,
    pub sac_fly: i64,
    pub obp: f64,
    pub babip: f64,
    pub slg: f64,
    pub avg: f64,
    pub iso: f64,
}

/// Pitching counters and derived stats, present only for pitcher entries
#[derive(Debug, Clone, Default)]
pub struct PitchingStats {
    pub wins: i64,
    pub losses: i64,
    pub games_played: i64,
    pub games_started: i64,
    pub games_completed: i64,
    pub shutouts: i64,
    pub saves: i64,
    pub save_ops: i64,
    pub ip: i64,
    pub er: i64,
    pub p_at_bats: i64,
    pub p_hits: i64,
    pub p_runs: i64,
    pub p_hr: i64,
    pub p_hb: i64,
    pub p_bb: i64,
    pub p_so: i64,
    pub era: f64,
    pub whip: f64,
    pub p_avg: f64,
    pub k_9: f64,
    pub bb_9: f64,
}

/// A rostered player
#[derive(Debug, Clone)]
pub struct Player {
    pub name: String,
    /// Deterministic hash of the player name
    pub player_id: i64,
    pub number: i64,
    /// Non-owning back-reference to the owning team
    pub team_id: i64,
    pub team_name: String,
    pub league_id: i64,
    /// Position list, primary first
    pub positions: Vec<String>,
    pub batting: BattingStats,
    pub pitching: Option<PitchingStats>,
}

impl Player {
    /// Create a batter with zeroed stats
    pub fn new(
        name: &str,
        number: i64,
        team_id: i64,
        team_name: &str,
        league_id: i64,
        positions: Vec<String>,
    ) -> Self {
        Self {
            name: name.to_string(),
            player_id: name_hash(name),
            number,
            team_id,
            team_name: team_name.to_string(),
            league_id,
            positions,
            batting: BattingStats::default(),
            pitching: None,
        }
    }

    /// Create a pitcher: a player with the pitching block attached
    pub fn new_pitcher(
        name: &str,
        number: i64,
        team_id: i64,
        team_name: &str,
        league_id: i64,
        positions: Vec<String>,
    ) -> Self {
        let mut player = Self::new(name, number, team_id, team_name, league_id, positions);
        player.pitching = Some(PitchingStats::default());
        player
    }

    /// Primary position (first entry), or empty when unassigned
    pub fn primary_position(&self) -> &str {
        self.positions.first().map(String::as_str).unwrap_or("")
    }

    /// Pitcher for aggregation purposes: the position list names "pitcher"
    pub fn is_pitcher(&self) -> bool {
        self.positions.iter().any(|p| p == "pitcher")
    }

    /// ERA, or 0.0 for entries without a pitching block
    pub fn era(&self) -> f64 {
        self.pitching.as_ref().map(|p| p.era).unwrap_or(0.0)
    }

    fn pitching_mut(&mut self) -> &mut PitchingStats {
        self.pitching.get_or_insert_with(PitchingStats::default)
    }

    // ------------------------------------------------------------------ //
    // batting setters

    pub fn set_pa(&mut self, val: i64) {
        self.batting.pa += val;
    }

    pub fn set_at_bat(&mut self, val: i64) {
        self.batting.at_bat += val;
    }

    pub fn set_hit(&mut self, val: i64) {
        self.batting.hit += val;
        self.set_at_bat(val);
        self.set_pa(val);
    }

    pub fn set_bb(&mut self, val: i64) {
        self.batting.bb += val;
        self.set_pa(val);
    }

    pub fn set_hbp(&mut self, val: i64) {
        self.batting.hbp += val;
        self.set_pa(val);
    }

    pub fn set_so(&mut self, val: i64) {
        self.batting.so += val;
        self.set_pa(val);
        self.set_at_bat(val);
    }

    pub fn set_put_out(&mut self, val: i64) {
        self.batting.put_out += val;
        self.set_pa(val);
        self.set_at_bat(val);
    }

    pub fn set_sac_fly(&mut self, val: i64) {
        self.batting.sac_fly += val;
        self.set_pa(val);
    }

    pub fn set_fielder_choice(&mut self, val: i64) {
        self.batting.fielder_choice += val;
        self.set_pa(val);
    }

    pub fn set_hr(&mut self, val: i64) {
        self.validate_breakdown(PlayerStat::Hit, PlayerStat::Hr, val);
    }

    pub fn set_singles(&mut self, val: i64) {
        self.validate_breakdown(PlayerStat::Hit, PlayerStat::Singles, val);
    }

    pub fn set_doubles(&mut self, val: i64) {
        self.validate_breakdown(PlayerStat::Hit, PlayerStat::Doubles, val);
    }

    pub fn set_triples(&mut self, val: i64) {
        self.validate_breakdown(PlayerStat::Hit, PlayerStat::Triples, val);
    }

    pub fn set_rbi(&mut self, val: i64) {
        if self.batting.rbi + val < 0 {
            self.batting.rbi = 0;
        } else if self.batting.at_bat > 0 {
            self.batting.rbi += val;
        }
    }

    pub fn set_runs(&mut self, val: i64) {
        if self.batting.runs + val < 0 {
            self.batting.runs = 0;
        } else if self.batting.at_bat > 0 {
            self.batting.runs += val;
        }
    }

    /// Grouped maximum for breakdown validation: the hit breakdown group and
    /// the at-bat outcome group each cap at their parent counter.
    fn breakdown_total(&self, key: PlayerStat) -> i64 {
        const HIT_GROUP: [PlayerStat; 5] = [
            PlayerStat::Hr,
            PlayerStat::Runs,
            PlayerStat::Singles,
            PlayerStat::Doubles,
            PlayerStat::Triples,
        ];
        const AT_BAT_GROUP: [PlayerStat; 4] = [
            PlayerStat::Hit,
            PlayerStat::Bb,
            PlayerStat::So,
            PlayerStat::SacFly,
        ];
        let group: &[PlayerStat] = if HIT_GROUP.contains(&key) {
            &HIT_GROUP
        } else if AT_BAT_GROUP.contains(&key) {
            &AT_BAT_GROUP
        } else {
            return 0;
        };
        group.iter().map(|k| self.stat(*k).as_int()).sum()
    }

    fn validate_breakdown(&mut self, limit: PlayerStat, update: PlayerStat, val: i64) {
        let limit_val = self.stat(limit).as_int();
        let new_total = self.breakdown_total(update) + val;
        if new_total > limit_val {
            tracing::warn!(
                player = %self.name,
                "{} update total cannot exceed {} {}",
                update.label(),
                limit.label(),
                limit_val
            );
            return;
        }
        let new_val = self.stat(update).as_int() + val;
        self.write_stat(update, StatValue::Int(new_val));
    }

    // ------------------------------------------------------------------ //
    // derived batting stats

    pub fn set_avg(&mut self) {
        self.batting.avg = round3(self.calc_avg());
    }

    pub fn set_obp(&mut self) {
        self.batting.obp = round3(self.calc_obp());
    }

    pub fn set_babip(&mut self) {
        self.batting.babip = round3(self.calc_babip());
    }

    pub fn set_slg(&mut self) {
        self.batting.slg = round3(self.calc_slg());
    }

    pub fn set_iso(&mut self) {
        self.batting.iso = round3(self.calc_iso());
    }

    pub fn calc_avg(&self) -> f64 {
        let b = &self.batting;
        if b.hit == 0 || b.at_bat == 0 {
            return 0.0;
        }
        b.hit as f64 / b.at_bat as f64
    }

    pub fn calc_obp(&self) -> f64 {
        let b = &self.batting;
        if b.pa == 0 || b.at_bat == 0 {
            return 0.0;
        }
        let denom = b.at_bat + b.bb + b.hbp + b.sac_fly;
        if denom == 0 {
            return 0.0;
        }
        (b.hit + b.bb + b.hbp) as f64 / denom as f64
    }

    pub fn calc_babip(&self) -> f64 {
        let b = &self.batting;
        let denom = b.at_bat - b.so - b.hr + b.sac_fly;
        if denom <= 0 {
            return 0.0;
        }
        (b.hit - b.hr) as f64 / denom as f64
    }

    pub fn calc_slg(&self) -> f64 {
        let b = &self.batting;
        if b.at_bat == 0 {
            return 0.0;
        }
        (b.singles + 2 * b.doubles + 3 * b.triples + 4 * b.hr) as f64 / b.at_bat as f64
    }

    pub fn calc_iso(&self) -> f64 {
        // legacy formula: extra bases divided by SLG, minus AVG
        let b = &self.batting;
        if b.at_bat == 0 {
            return 0.0;
        }
        if b.slg - b.avg > 0.0 {
            return (b.doubles + 2 * b.triples + 3 * b.hr) as f64 / b.slg - b.avg;
        }
        0.0
    }

    // ------------------------------------------------------------------ //
    // pitching setters

    pub fn set_p_wins(&mut self, val: i64) {
        let p = self.pitching_mut();
        let (gp, wins, losses) = (p.games_played, p.wins, p.losses);
        if gp > 0 && wins + losses == gp {
            tracing::warn!(player = %self.name, "update games played before wins and losses");
            return;
        }
        if wins + val + losses > gp {
            tracing::warn!(player = %self.name, "wins-losses do not match total games played");
            return;
        }
        self.pitching_mut().wins += val;
    }

    pub fn set_p_losses(&mut self, val: i64) {
        let p = self.pitching_mut();
        let (gp, wins, losses) = (p.games_played, p.wins, p.losses);
        if gp > 0 && wins + losses == gp {
            tracing::warn!(player = %self.name, "update games played before wins and losses");
            return;
        }
        if wins + val + losses > gp {
            tracing::warn!(player = %self.name, "wins-losses do not match total games played");
            return;
        }
        self.pitching_mut().losses += val;
    }

    pub fn set_p_games_played(&mut self, val: i64) {
        let p = self.pitching_mut();
        if p.games_played + val < 0 {
            return;
        }
        p.games_played += val;
    }

    pub fn set_p_at_bats(&mut self, val: i64) {
        let p = self.pitching_mut();
        if p.p_at_bats + val < 0 {
            return;
        }
        p.p_at_bats += val;
    }

    pub fn set_games_started(&mut self, val: i64) {
        let limit = self.pitching_mut().games_played;
        self.update_pitching_stat(PlayerStat::GamesStarted, val, limit);
    }

    pub fn set_games_completed(&mut self, val: i64) {
        let limit = self.pitching_mut().games_played;
        self.update_pitching_stat(PlayerStat::GamesCompleted, val, limit);
    }

    pub fn set_shutouts(&mut self, val: i64) {
        let limit = self.pitching_mut().games_completed;
        self.update_pitching_stat(PlayerStat::Shutouts, val, limit);
    }

    pub fn set_saves(&mut self, val: i64) {
        let limit = self.pitching_mut().games_played;
        self.update_pitching_stat(PlayerStat::Saves, val, limit);
    }

    pub fn set_save_ops(&mut self, val: i64) {
        let limit = self.pitching_mut().games_played;
        self.update_pitching_stat(PlayerStat::SaveOps, val, limit);
    }

    pub fn set_er(&mut self, val: i64) {
        let limit = self.pitching_mut().p_at_bats;
        self.update_pitching_stat(PlayerStat::Er, val, limit);
    }

    pub fn set_ip(&mut self, val: i64) {
        let limit = 9 * self.pitching_mut().games_played;
        self.update_pitching_stat(PlayerStat::Ip, val, limit);
    }

    pub fn set_p_runs(&mut self, val: i64) {
        let limit = self.pitching_mut().p_at_bats;
        self.update_pitching_stat(PlayerStat::PRuns, val, limit);
    }

    pub fn set_p_hits(&mut self, val: i64) {
        self.update_opposing_batter_stat(PlayerStat::PHits, val);
    }

    pub fn set_p_bb(&mut self, val: i64) {
        self.update_opposing_batter_stat(PlayerStat::PBb, val);
    }

    pub fn set_p_so(&mut self, val: i64) {
        self.update_opposing_batter_stat(PlayerStat::PSo, val);
    }

    pub fn set_p_hr(&mut self, val: i64) {
        self.update_opposing_batter_stat(PlayerStat::PHr, val);
    }

    pub fn set_p_hb(&mut self, val: i64) {
        self.update_opposing_batter_stat(PlayerStat::PHb, val);
    }

    /// Increment with a lower bound of zero and a per-stat ceiling
    fn update_pitching_stat(&mut self, key: PlayerStat, val: i64, limit: i64) {
        let current = self.stat(key).as_int();
        if current + val < 0 {
            tracing::warn!(player = %self.name, "{} cannot go below zero", key.label());
            return;
        }
        if current + val > limit {
            tracing::warn!(player = %self.name, "{} cannot exceed {}", key.label(), limit);
            return;
        }
        self.write_stat(key, StatValue::Int(current + val));
    }

    /// Opposing-batter outcomes share one combined ceiling: plate results
    /// against this pitcher cannot exceed batters faced.
    fn update_opposing_batter_stat(&mut self, key: PlayerStat, val: i64) {
        let p = self.pitching_mut();
        let combined = p.p_hits + p.p_bb + p.p_so + p.p_hr + p.p_hb;
        let limit = p.p_at_bats;
        let current = self.stat(key).as_int();
        if current + val < 0 {
            tracing::warn!(player = %self.name, "{} cannot go below zero", key.label());
            return;
        }
        if combined + val > limit {
            tracing::warn!(player = %self.name, "combined stats cannot exceed {}", limit);
            return;
        }
        self.write_stat(key, StatValue::Int(current + val));
    }

    // ------------------------------------------------------------------ //
    // derived pitching stats

    pub fn set_era(&mut self) {
        let era = round3(self.calc_era());
        self.pitching_mut().era = era;
    }

    pub fn set_whip(&mut self) {
        let whip = round3(self.calc_whip());
        self.pitching_mut().whip = whip;
    }

    pub fn set_p_avg(&mut self) {
        let avg = round3(self.calc_p_avg());
        self.pitching_mut().p_avg = avg;
    }

    pub fn set_k_9(&mut self) {
        let k = round3(self.calc_k_9());
        self.pitching_mut().k_9 = k;
    }

    pub fn set_bb_9(&mut self) {
        let bb = round3(self.calc_bb_9());
        self.pitching_mut().bb_9 = bb;
    }

    pub fn calc_era(&self) -> f64 {
        match &self.pitching {
            Some(p) if p.ip > 0 => (p.er as f64 / p.ip as f64) * 9.0,
            _ => 0.0,
        }
    }

    pub fn calc_whip(&self) -> f64 {
        match &self.pitching {
            Some(p) if p.ip > 0 => (p.p_bb + p.p_hits) as f64 / p.ip as f64,
            _ => 0.0,
        }
    }

    pub fn calc_p_avg(&self) -> f64 {
        match &self.pitching {
            Some(p) if p.p_at_bats > 0 => p.p_hits as f64 / p.p_at_bats as f64,
            _ => 0.0,
        }
    }

    pub fn calc_k_9(&self) -> f64 {
        match &self.pitching {
            Some(p) if p.ip > 0 => (p.p_so as f64 / p.ip as f64) * 9.0,
            _ => 0.0,
        }
    }

    pub fn calc_bb_9(&self) -> f64 {
        // batting walks, not p_bb, feed bb/9 in the legacy formula
        match &self.pitching {
            Some(p) if p.ip > 0 => (self.batting.bb as f64 / p.ip as f64) * 9.0,
            _ => 0.0,
        }
    }

    // ------------------------------------------------------------------ //
    // keyed access (undo restore, hydration)

    /// Read the value behind a stat key
    pub fn stat(&self, key: PlayerStat) -> StatValue {
        use PlayerStat::*;
        let b = &self.batting;
        let p = self.pitching.as_ref();
        match key {
            Pa => StatValue::Int(b.pa),
            AtBat => StatValue::Int(b.at_bat),
            FielderChoice => StatValue::Int(b.fielder_choice),
            Hit => StatValue::Int(b.hit),
            Bb => StatValue::Int(b.bb),
            Hbp => StatValue::Int(b.hbp),
            PutOut => StatValue::Int(b.put_out),
            So => StatValue::Int(b.so),
            Hr => StatValue::Int(b.hr),
            Rbi => StatValue::Int(b.rbi),
            Runs => StatValue::Int(b.runs),
            Singles => StatValue::Int(b.singles),
            Doubles => StatValue::Int(b.doubles),
            Triples => StatValue::Int(b.triples),
            SacFly => StatValue::Int(b.sac_fly),
            Obp => StatValue::Float(b.obp),
            Babip => StatValue::Float(b.babip),
            Slg => StatValue::Float(b.slg),
            Avg => StatValue::Float(b.avg),
            Iso => StatValue::Float(b.iso),
            Wins => StatValue::Int(p.map(|p| p.wins).unwrap_or(0)),
            Losses => StatValue::Int(p.map(|p| p.losses).unwrap_or(0)),
            GamesPlayed => StatValue::Int(p.map(|p| p.games_played).unwrap_or(0)),
            GamesStarted => StatValue::Int(p.map(|p| p.games_started).unwrap_or(0)),
            GamesCompleted => StatValue::Int(p.map(|p| p.games_completed).unwrap_or(0)),
            Shutouts => StatValue::Int(p.map(|p| p.shutouts).unwrap_or(0)),
            Saves => StatValue::Int(p.map(|p| p.saves).unwrap_or(0)),
            SaveOps => StatValue::Int(p.map(|p| p.save_ops).unwrap_or(0)),
            Ip => StatValue::Int(p.map(|p| p.ip).unwrap_or(0)),
            Er => StatValue::Int(p.map(|p| p.er).unwrap_or(0)),
            PAtBats => StatValue::Int(p.map(|p| p.p_at_bats).unwrap_or(0)),
            PHits => StatValue::Int(p.map(|p| p.p_hits).unwrap_or(0)),
            PRuns => StatValue::Int(p.map(|p| p.p_runs).unwrap_or(0)),
            PHr => StatValue::Int(p.map(|p| p.p_hr).unwrap_or(0)),
            PHb => StatValue::Int(p.map(|p| p.p_hb).unwrap_or(0)),
            PBb => StatValue::Int(p.map(|p| p.p_bb).unwrap_or(0)),
            PSo => StatValue::Int(p.map(|p| p.p_so).unwrap_or(0)),
            Era => StatValue::Float(p.map(|p| p.era).unwrap_or(0.0)),
            Whip => StatValue::Float(p.map(|p| p.whip).unwrap_or(0.0)),
            PAvg => StatValue::Float(p.map(|p| p.p_avg).unwrap_or(0.0)),
            K9 => StatValue::Float(p.map(|p| p.k_9).unwrap_or(0.0)),
            Bb9 => StatValue::Float(p.map(|p| p.bb_9).unwrap_or(0.0)),
        }
    }

    /// Write a stat key absolutely, bypassing guards. Undo restores and
    /// hydration go through here.
    pub fn write_stat(&mut self, key: PlayerStat, value: StatValue) {
        use PlayerStat::*;
        match key {
            Pa => self.batting.pa = value.as_int(),
            AtBat => self.batting.at_bat = value.as_int(),
            FielderChoice => self.batting.fielder_choice = value.as_int(),
            Hit => self.batting.hit = value.as_int(),
            Bb => self.batting.bb = value.as_int(),
            Hbp => self.batting.hbp = value.as_int(),
            PutOut => self.batting.put_out = value.as_int(),
            So => self.batting.so = value.as_int(),
            Hr => self.batting.hr = value.as_int(),
            Rbi => self.batting.rbi = value.as_int(),
            Runs => self.batting.runs = value.as_int(),
            Singles => self.batting.singles = value.as_int(),
            Doubles => self.batting.doubles = value.as_int(),
            Triples => self.batting.triples = value.as_int(),
            SacFly => self.batting.sac_fly = value.as_int(),
            Obp => self.batting.obp = value.as_float(),
            Babip => self.batting.babip = value.as_float(),
            Slg => self.batting.slg = value.as_float(),
            Avg => self.batting.avg = value.as_float(),
            Iso => self.batting.iso = value.as_float(),
            Wins => self.pitching_mut().wins = value.as_int(),
            Losses => self.pitching_mut().losses = value.as_int(),
            GamesPlayed => self.pitching_mut().games_played = value.as_int(),
            GamesStarted => self.pitching_mut().games_started = value.as_int(),
            GamesCompleted => self.pitching_mut().games_completed = value.as_int(),
            Shutouts => self.pitching_mut().shutouts = value.as_int(),
            Saves => self.pitching_mut().saves = value.as_int(),
            SaveOps => self.pitching_mut().save_ops = value.as_int(),
            Ip => self.pitching_mut().ip = value.as_int(),
            Er => self.pitching_mut().er = value.as_int(),
            PAtBats => self.pitching_mut().p_at_bats = value.as_int(),
            PHits => self.pitching_mut().p_hits = value.as_int(),
            PRuns => self.pitching_mut().p_runs = value.as_int(),
            PHr => self.pitching_mut().p_hr = value.as_int(),
            PHb => self.pitching_mut().p_hb = value.as_int(),
            PBb => self.pitching_mut().p_bb = value.as_int(),
            PSo => self.pitching_mut().p_so = value.as_int(),
            Era => self.pitching_mut().era = value.as_float(),
            Whip => self.pitching_mut().whip = value.as_float(),
            PAvg => self.pitching_mut().p_avg = value.as_float(),
            K9 => self.pitching_mut().k_9 = value.as_float(),
            Bb9 => self.pitching_mut().bb_9 = value.as_float(),
        }
    }
}

impl std::fmt::Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let b = &self.batting;
        let secondary = self
            .positions
            .get(1..)
            .unwrap_or(&[])
            .join(", ");
        writeln!(f, "Name: {}", self.name)?;
        writeln!(f, "Number: {}", self.number)?;
        writeln!(f, "Primary Position: {}", self.primary_position())?;
        writeln!(f, "  Secondary Positions: {}", secondary)?;
        writeln!(f, "PA: {}", b.pa)?;
        writeln!(f, "At Bats: {}", b.at_bat)?;
        writeln!(f, "Hits: {}", b.hit)?;
        writeln!(f, "Walks: {}", b.bb)?;
        writeln!(f, "HBP: {}", b.hbp)?;
        writeln!(f, "SO: {}", b.so)?;
        writeln!(f, "Put Out: {}", b.put_out)?;
        writeln!(f, "HR: {}", b.hr)?;
        writeln!(f, "Runs: {}", b.runs)?;
        writeln!(f, "RBI: {}", b.rbi)?;
        writeln!(f, "OBP: {}", format_decimal(b.obp))?;
        writeln!(f, "BABIP: {}", format_decimal(b.babip))?;
        writeln!(f, "SLG: {}", format_decimal(b.slg))?;
        writeln!(f, "AVG: {}", format_decimal(b.avg))?;
        write!(f, "ISO: {}", format_decimal(b.iso))?;
        if let Some(p) = &self.pitching {
            writeln!(f)?;
            writeln!(f, "Pitching: ----- -----")?;
            writeln!(f, " Wins: {}", p.wins)?;
            writeln!(f, " Losses: {}", p.losses)?;
            writeln!(f, " G: {}", p.games_played)?;
            writeln!(f, " ERA: {}", format_decimal(p.era))?;
            writeln!(f, " IP: {}", p.ip)?;
            writeln!(f, " At Bats: {}", p.p_at_bats)?;
            writeln!(f, " SO: {}", p.p_so)?;
            writeln!(f, " BB: {}", p.p_bb)?;
            writeln!(f, " AVG: {}", format_decimal(p.p_avg))?;
            writeln!(f, " WHIP: {}", format_decimal(p.whip))?;
            writeln!(f, " K9: {}", format_decimal(p.k_9))?;
            write!(f, " BB9: {}", format_decimal(p.bb_9))?;
        }
        Ok(())
    }
}

/// Stat key for keyed reads/writes on a player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerStat {
    Pa,
    AtBat,
    FielderChoice,
    Hit,
    Bb,
    Hbp,
    PutOut,
    So,
    Hr,
    Rbi,
    Runs,
    Singles,
    Doubles,
    Triples,
    SacFly,
    Obp,
    Babip,
    Slg,
    Avg,
    Iso,
    Wins,
    Losses,
    GamesPlayed,
    GamesStarted,
    GamesCompleted,
    Shutouts,
    Saves,
    SaveOps,
    Ip,
    Er,
    PAtBats,
    PHits,
    PRuns,
    PHr,
    PHb,
    PBb,
    PSo,
    Era,
    Whip,
    PAvg,
    K9,
    Bb9,
}

impl PlayerStat {
    /// Column/display label, matching the stored table field names
    pub fn label(&self) -> &'static str {
        use PlayerStat::*;
        match self {
            Pa => "pa",
            AtBat => "at_bat",
            FielderChoice => "fielder_choice",
            Hit => "hit",
            Bb => "bb",
            Hbp => "hbp",
            PutOut => "put_out",
            So => "so",
            Hr => "hr",
            Rbi => "rbi",
            Runs => "runs",
            Singles => "singles",
            Doubles => "doubles",
            Triples => "triples",
            SacFly => "sac_fly",
            Obp => "OBP",
            Babip => "BABIP",
            Slg => "SLG",
            Avg => "AVG",
            Iso => "ISO",
            Wins => "wins",
            Losses => "losses",
            GamesPlayed => "games_played",
            GamesStarted => "games_started",
            GamesCompleted => "games_completed",
            Shutouts => "shutouts",
            Saves => "saves",
            SaveOps => "save_ops",
            Ip => "ip",
            Er => "er",
            PAtBats => "p_at_bats",
            PHits => "p_hits",
            PRuns => "p_runs",
            PHr => "p_hr",
            PHb => "p_hb",
            PBb => "p_bb",
            PSo => "p_so",
            Era => "era",
            Whip => "WHIP",
            PAvg => "p_avg",
            K9 => "k_9",
            Bb9 => "bb_9",
        }
    }

    /// Resolve a stored table field name to a stat key
    pub fn from_field(field: &str) -> Option<Self> {
        use PlayerStat::*;
        let key = match field {
            "pa" => Pa,
            "at_bat" => AtBat,
            "fielder_choice" => FielderChoice,
            "hit" => Hit,
            "bb" => Bb,
            "hbp" => Hbp,
            "put_out" => PutOut,
            "so" => So,
            "hr" => Hr,
            "rbi" => Rbi,
            "runs" => Runs,
            "singles" => Singles,
            "doubles" => Doubles,
            "triples" => Triples,
            "sac_fly" => SacFly,
            "OBP" => Obp,
            "BABIP" => Babip,
            "SLG" => Slg,
            "AVG" => Avg,
            "ISO" => Iso,
            "wins" => Wins,
            "losses" => Losses,
            "games_played" => GamesPlayed,
            "games_started" => GamesStarted,
            "games_completed" => GamesCompleted,
            "shutouts" => Shutouts,
            "saves" => Saves,
            "save_ops" => SaveOps,
            "ip" => Ip,
            "er" => Er,
            "p_at_bats" => PAtBats,
            "p_hits" => PHits,
            "p_runs" => PRuns,
            "p_hr" => PHr,
            "p_hb" => PHb,
            "p_bb" => PBb,
            "p_so" => PSo,
            "era" => Era,
            "WHIP" => Whip,
            "p_avg" => PAvg,
            "k_9" => K9,
            "bb_9" => Bb9,
            _ => return None,
        };
        Some(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn batter() -> Player {
        Player::new("Ivy Okafor", 12, 1, "Beef Sliders", 9, vec!["catcher".into()])
    }

    fn pitcher() -> Player {
        Player::new_pitcher(
            "Sal Moreno",
            21,
            1,
            "Beef Sliders",
            9,
            vec!["pitcher".into(), "first base".into()],
        )
    }

    #[test]
    fn test_hit_cascades_into_at_bat_and_pa() {
        let mut p = batter();
        p.set_hit(2);
        assert_eq!(p.batting.hit, 2);
        assert_eq!(p.batting.at_bat, 2);
        assert_eq!(p.batting.pa, 2);

        p.set_bb(1);
        assert_eq!(p.batting.bb, 1);
        assert_eq!(p.batting.at_bat, 2);
        assert_eq!(p.batting.pa, 3);

        p.set_so(1);
        assert_eq!(p.batting.so, 1);
        assert_eq!(p.batting.at_bat, 3);
        assert_eq!(p.batting.pa, 4);
    }

    #[test]
    fn test_breakdown_rejects_excess_home_runs() {
        let mut p = batter();
        p.set_hit(2);
        p.set_hr(3);
        assert_eq!(p.batting.hr, 0);
        p.set_hr(2);
        assert_eq!(p.batting.hr, 2);
    }

    #[test]
    fn test_runs_require_at_bats() {
        let mut p = batter();
        p.set_runs(2);
        assert_eq!(p.batting.runs, 0);
        p.set_hit(3);
        p.set_runs(2);
        assert_eq!(p.batting.runs, 2);
        // negative past zero clamps
        p.set_runs(-5);
        assert_eq!(p.batting.runs, 0);
    }

    #[test]
    fn test_batting_average() {
        let mut p = batter();
        p.set_hit(2);
        p.set_so(4);
        p.set_avg();
        assert_eq!(p.batting.avg, 0.333);
        assert_eq!(format_decimal(p.batting.avg), "0.333");
    }

    #[test]
    fn test_pitcher_win_guard() {
        let mut p = pitcher();
        p.set_p_wins(1);
        assert_eq!(p.pitching.as_ref().unwrap().wins, 0);
        p.set_p_games_played(3);
        p.set_p_wins(2);
        p.set_p_losses(1);
        let stats = p.pitching.as_ref().unwrap();
        assert_eq!(stats.wins, 2);
        assert_eq!(stats.losses, 1);
    }

    #[test]
    fn test_era_from_earned_runs() {
        let mut p = pitcher();
        p.set_p_games_played(2);
        p.set_p_at_bats(40);
        p.set_ip(9);
        p.set_er(4);
        p.set_era();
        assert_eq!(p.pitching.as_ref().unwrap().era, 4.0);
    }

    #[test]
    fn test_is_pitcher_reads_positions() {
        let mut p = batter();
        assert!(!p.is_pitcher());
        p.positions.push("pitcher".into());
        assert!(p.is_pitcher());
        // position-only pitcher with no pitching block has era 0
        assert_eq!(p.era(), 0.0);
    }

    #[test]
    fn test_keyed_write_restores_absolutely() {
        let mut p = batter();
        p.set_hit(5);
        p.write_stat(PlayerStat::Hit, StatValue::Int(1));
        assert_eq!(p.batting.hit, 1);
        // cascade counters untouched by an absolute restore
        assert_eq!(p.batting.at_bat, 5);
    }

    #[test]
    fn test_field_round_trip() {
        for key in [PlayerStat::Hit, PlayerStat::Avg, PlayerStat::PSo, PlayerStat::Bb9] {
            assert_eq!(PlayerStat::from_field(key.label()), Some(key));
        }
        assert_eq!(PlayerStat::from_field("lineup"), None);
    }
}
