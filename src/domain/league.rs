//! League root entity: identity, office assignments, and the roster.

use crate::config::AppConfig;
use crate::domain::roster::RosterList;
use crate::domain::stats::name_hash;

/// League office assignments and season bounds
#[derive(Debug, Clone, Default)]
pub struct AdminInfo {
    pub commissioner: Option<String>,
    pub treasurer: Option<String>,
    pub communications: Option<String>,
    pub historian: Option<String>,
    pub recruitment: Option<String>,
    pub season_start: Option<String>,
    pub season_stop: Option<String>,
}

/// The league: admin context plus the team roster
#[derive(Debug, Clone)]
pub struct League {
    pub name: String,
    /// Deterministic hash of the league name
    pub league_id: i64,
    pub admin: AdminInfo,
    pub date: Option<String>,
    pub season: Option<String>,
    pub location: Option<String>,
    pub roster: RosterList,
}

impl League {
    pub fn new(config: &AppConfig) -> Self {
        let name = config.league.name.clone();
        Self {
            league_id: name_hash(&name),
            name,
            admin: AdminInfo::default(),
            date: None,
            season: None,
            location: None,
            roster: RosterList::new(config.quirks.clone()),
        }
    }

    /// Rename the league; the id follows the name
    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
        self.league_id = name_hash(name);
    }

    /// True until the league has been given a real name
    pub fn is_default_name(&self) -> bool {
        self.name == "League"
    }

    /// Apply a stored league field by column name. Unknown fields are
    /// ignored and reported back to the caller.
    pub fn apply_field(&mut self, field: &str, value: &str) -> bool {
        match field.to_lowercase().as_str() {
            "name" => self.set_name(value),
            "commissioner" => self.admin.commissioner = Some(value.to_string()),
            "treasurer" => self.admin.treasurer = Some(value.to_string()),
            "communications" => self.admin.communications = Some(value.to_string()),
            "historian" => self.admin.historian = Some(value.to_string()),
            "recruitment" => self.admin.recruitment = Some(value.to_string()),
            "start" | "season_start" => self.admin.season_start = Some(value.to_string()),
            "stop" | "season_end" => self.admin.season_stop = Some(value.to_string()),
            "date" => self.date = Some(value.to_string()),
            "season" => self.season = Some(value.to_string()),
            "location" => self.location = Some(value.to_string()),
            _ => return false,
        }
        true
    }

    /// Admin pane rows as (label, value) pairs
    pub fn return_admin(&self) -> Vec<(String, String)> {
        let text = |v: &Option<String>| v.clone().unwrap_or_else(|| "None".to_string());
        vec![
            ("League Name".to_string(), self.name.clone()),
            ("Commissioner".to_string(), text(&self.admin.commissioner)),
            ("Historian".to_string(), text(&self.admin.historian)),
            ("Treasurer".to_string(), text(&self.admin.treasurer)),
            ("Recruitment".to_string(), text(&self.admin.recruitment)),
            (
                "Communications".to_string(),
                text(&self.admin.communications),
            ),
            ("Season Start".to_string(), text(&self.admin.season_start)),
            ("Season End".to_string(), text(&self.admin.season_stop)),
        ]
    }
}

impl std::fmt::Display for League {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.roster.is_empty() {
            return Ok(());
        }
        writeln!(f, "{}", self.name)?;
        for team in self.roster.teams() {
            writeln!(f, "Team: {}", team.name)?;
        }
        Ok(())
    }
}
