pub mod client;
pub mod highlight;
pub mod statsapi;

use chrono::{DateTime, NaiveDate, Utc};

// ---------------------------------------------------------------------------
// Domain types: clean model, independent of the stats API wire format
// ---------------------------------------------------------------------------

/// Target widths for the three image slots a listing needs.
pub const FANART_WIDTH: u32 = 1920;
pub const THUMB_WIDTH: u32 = 960;
pub const ICON_WIDTH: u32 = 640;

/// Which shape of the upstream JSON to read. The API changed how game records and
/// highlight classification are delivered; both shapes stay supported, one is picked
/// at start-up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SchemaVersion {
    /// Hydrated schedule records (`gameDate`), highlight type from the slug prefix.
    #[default]
    Current,
    /// Per-game live feed (`datetime.dateTime`), highlight type from the
    /// `keywordsDisplay` taxonomy entry.
    Legacy,
}

impl SchemaVersion {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "current" => Some(SchemaVersion::Current),
            "legacy" => Some(SchemaVersion::Legacy),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ContentType {
    #[default]
    Highlight,
    CondensedGame,
    Recap,
}

impl ContentType {
    pub fn label(&self) -> &'static str {
        match self {
            ContentType::Highlight => "Highlight",
            ContentType::CondensedGame => "Condensed Game",
            ContentType::Recap => "Recap",
        }
    }

    pub fn badge(&self) -> char {
        match self {
            ContentType::Highlight => 'H',
            ContentType::CondensedGame => 'C',
            ContentType::Recap => 'R',
        }
    }
}

/// A playable video clip belonging to a game.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Highlight {
    pub url: Option<String>, // None = no usable playback, dropped on load
    pub title: String,
    pub description: String,
    pub short_description: String,
    pub duration_secs: u32,
    pub fanart_url: Option<String>,
    pub thumb_url: Option<String>,
    pub icon_url: Option<String>,
    pub content_type: ContentType,
}

impl Highlight {
    pub fn is_playable(&self) -> bool {
        self.url.is_some()
    }

    /// "m:ss", or "h:mm:ss" for anything an hour or longer.
    pub fn duration_label(&self) -> String {
        let (h, m, s) = (
            self.duration_secs / 3600,
            (self.duration_secs % 3600) / 60,
            self.duration_secs % 60,
        );
        if h > 0 { format!("{h}:{m:02}:{s:02}") } else { format!("{m}:{s:02}") }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Game {
    pub id: String,
    pub start_time: Option<DateTime<Utc>>,
    pub title: String,           // "Boston Red Sox (BOS) @ New York Yankees (NYY)"
    pub short_title: String,     // "BOS@NYY"
    pub title_with_time: String, // "2019-04-16 19:05: Boston Red Sox (BOS) @ ..."
    pub fanart_url: Option<String>,
    pub thumb_url: Option<String>,
    pub icon_url: Option<String>,
    pub description: Option<String>,
    pub short_description: Option<String>,
    pub score: Option<(u16, u16)>, // (away_runs, home_runs)
    /// Empty until `MlbApi::load_highlights` runs.
    pub highlights: Vec<Highlight>,
}

impl Game {
    /// A game the API had nothing for. Only the id is known.
    pub fn empty(id: impl Into<String>) -> Self {
        Self { id: id.into(), ..Self::default() }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_empty()
    }

    /// Games without a recap article have no description or images.
    pub fn has_recap(&self) -> bool {
        self.description.is_some()
    }
}

#[derive(Debug, Clone, Default)]
pub struct GameDay {
    pub date: NaiveDate,
    pub games: Vec<Game>,
}

#[derive(Debug, Clone, Default)]
pub struct GamesByTeam {
    pub team_id: u32,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub games: Vec<Game>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Team {
    pub id: u32,
    pub name: String,         // "Seattle Mariners"
    pub abbreviation: String, // "SEA"
}

impl Team {
    pub fn label(&self) -> String {
        format!("{} ({})", self.name, self.abbreviation)
    }

    pub fn logo_url(&self) -> String {
        format!("http://www.mlbstatic.com/mlb.com/images/share/{}.jpg", self.id)
    }
}

/// Regular-season bounds for one year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeasonDates {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl SeasonDates {
    /// Every date from `min(today, end)` back to opening day, newest first.
    pub fn gamedays_until(&self, today: NaiveDate) -> Vec<NaiveDate> {
        let last = today.min(self.end);
        let mut days = Vec::new();
        let mut day = last;
        while day >= self.start {
            days.push(day);
            match day.pred_opt() {
                Some(prev) => day = prev,
                None => break,
            }
        }
        days
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn gamedays_run_newest_first_down_to_opening_day() {
        let season = SeasonDates { start: date(2019, 3, 28), end: date(2019, 9, 29) };
        let days = season.gamedays_until(date(2019, 3, 30));
        assert_eq!(days, vec![date(2019, 3, 30), date(2019, 3, 29), date(2019, 3, 28)]);
    }

    #[test]
    fn gamedays_stop_at_season_end() {
        let season = SeasonDates { start: date(2019, 9, 27), end: date(2019, 9, 29) };
        let days = season.gamedays_until(date(2019, 10, 15));
        assert_eq!(days.first(), Some(&date(2019, 9, 29)));
        assert_eq!(days.len(), 3);
    }

    #[test]
    fn no_gamedays_before_opening_day() {
        let season = SeasonDates { start: date(2027, 3, 25), end: date(2027, 9, 26) };
        assert!(season.gamedays_until(date(2027, 1, 10)).is_empty());
    }

    #[test]
    fn duration_label_formats() {
        let h = Highlight { duration_secs: 45, ..Default::default() };
        assert_eq!(h.duration_label(), "0:45");
        let h = Highlight { duration_secs: 3723, ..Default::default() };
        assert_eq!(h.duration_label(), "1:02:03");
    }

    #[test]
    fn schema_version_parses_case_insensitively() {
        assert_eq!(SchemaVersion::parse("Legacy"), Some(SchemaVersion::Legacy));
        assert_eq!(SchemaVersion::parse(" current "), Some(SchemaVersion::Current));
        assert_eq!(SchemaVersion::parse("v3"), None);
    }

    #[test]
    fn team_logo_uses_team_id() {
        let team = Team { id: 136, name: "Seattle Mariners".into(), abbreviation: "SEA".into() };
        assert_eq!(team.label(), "Seattle Mariners (SEA)");
        assert!(team.logo_url().ends_with("/136.jpg"));
    }
}
