use crate::app::Screen;
use crate::state::network::TEAM_WINDOW_DAYS;
use chrono::NaiveDate;
use mlb_api::{Game, Highlight, Team};

pub const HOME_ENTRIES: [&str; 2] = ["Games by Date", "Games by Team"];

// ---------------------------------------------------------------------------
// List cursor shared by every screen
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    pub selected: usize,
}

impl Cursor {
    pub fn down(&mut self, len: usize) {
        if self.selected + 1 < len {
            self.selected += 1;
        }
    }

    pub fn up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn reset(&mut self) {
        self.selected = 0;
    }
}

// ---------------------------------------------------------------------------
// Gamedays / teams: loaded once, None until the first response arrives
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct GamedaysState {
    pub days: Option<Vec<NaiveDate>>,
    pub cursor: Cursor,
    /// A load request is out and has not been answered yet.
    pub pending: bool,
}

impl GamedaysState {
    pub fn load(&mut self, days: Vec<NaiveDate>) {
        self.days = Some(days);
        self.pending = false;
        self.cursor.reset();
    }

    /// True when a load should be sent: nothing loaded and nothing in flight.
    pub fn request(&mut self) -> bool {
        let needed = self.days.is_none() && !self.pending;
        self.pending |= needed;
        needed
    }

    pub fn len(&self) -> usize {
        self.days.as_ref().map_or(0, Vec::len)
    }

    pub fn selected(&self) -> Option<NaiveDate> {
        self.days.as_ref()?.get(self.cursor.selected).copied()
    }
}

#[derive(Debug, Default)]
pub struct TeamsState {
    pub teams: Option<Vec<Team>>,
    pub cursor: Cursor,
    /// A load request is out and has not been answered yet.
    pub pending: bool,
}

impl TeamsState {
    pub fn load(&mut self, teams: Vec<Team>) {
        self.teams = Some(teams);
        self.pending = false;
        self.cursor.reset();
    }

    /// True when a load should be sent: nothing loaded and nothing in flight.
    pub fn request(&mut self) -> bool {
        let needed = self.teams.is_none() && !self.pending;
        self.pending |= needed;
        needed
    }

    pub fn len(&self) -> usize {
        self.teams.as_ref().map_or(0, Vec::len)
    }

    pub fn selected(&self) -> Option<&Team> {
        self.teams.as_ref()?.get(self.cursor.selected)
    }
}

// ---------------------------------------------------------------------------
// Game list: either one gameday or one team's recent games
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GamesSource {
    Day(NaiveDate),
    Team { team_id: u32, label: String },
}

impl GamesSource {
    pub fn title(&self) -> String {
        match self {
            GamesSource::Day(date) => date.format("%A, %B %-d, %Y").to_string(),
            GamesSource::Team { label, .. } => format!("{label}, last {TEAM_WINDOW_DAYS} days"),
        }
    }
}

#[derive(Debug, Default)]
pub struct GamesState {
    pub source: Option<GamesSource>,
    /// None while the request for `source` is in flight.
    pub games: Option<Vec<Game>>,
    pub cursor: Cursor,
}

impl GamesState {
    pub fn begin(&mut self, source: GamesSource) {
        self.source = Some(source);
        self.games = None;
        self.cursor.reset();
    }

    /// Store `games` if they answer the current request. Late responses for a list
    /// the user already left are dropped.
    pub fn finish(&mut self, source: &GamesSource, games: Vec<Game>) -> bool {
        if self.source.as_ref() != Some(source) {
            return false;
        }
        self.games = Some(games);
        self.cursor.reset();
        true
    }

    pub fn len(&self) -> usize {
        self.games.as_ref().map_or(0, Vec::len)
    }

    pub fn selected(&self) -> Option<&Game> {
        self.games.as_ref()?.get(self.cursor.selected)
    }
}

// ---------------------------------------------------------------------------
// Highlights of one game
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct HighlightsState {
    pub game_id: Option<String>,
    pub game: Option<Game>,
    pub cursor: Cursor,
}

impl HighlightsState {
    pub fn begin(&mut self, game_id: &str) {
        self.game_id = Some(game_id.to_owned());
        self.game = None;
        self.cursor.reset();
    }

    pub fn finish(&mut self, game: Game) -> bool {
        if self.game_id.as_deref() != Some(game.id.as_str()) {
            return false;
        }
        self.game = Some(game);
        self.cursor.reset();
        true
    }

    pub fn len(&self) -> usize {
        self.game.as_ref().map_or(0, |g| g.highlights.len())
    }

    pub fn selected(&self) -> Option<&Highlight> {
        self.game.as_ref()?.highlights.get(self.cursor.selected)
    }
}

// ---------------------------------------------------------------------------
// Root app state
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct AppState {
    pub screen: Screen,
    /// Screens to return to on Esc, innermost last.
    pub history: Vec<Screen>,
    /// Where `?` was pressed from.
    pub help_return: Screen,
    pub home: Cursor,
    pub gamedays: GamedaysState,
    pub teams: TeamsState,
    pub games: GamesState,
    pub highlights: HighlightsState,
    pub show_logs: bool,
    pub last_error: Option<String>,
    pub status: Option<String>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Breadcrumb from Home to the current screen.
    pub fn trail(&self) -> Vec<Screen> {
        let current = if self.screen == Screen::Help { self.help_return } else { self.screen };
        let mut trail = self.history.clone();
        trail.push(current);
        trail
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn game(id: &str) -> Game {
        Game { id: id.into(), title: format!("game {id}"), ..Game::default() }
    }

    #[test]
    fn cursor_stays_in_bounds() {
        let mut cursor = Cursor::default();
        cursor.up();
        assert_eq!(cursor.selected, 0);
        cursor.down(2);
        cursor.down(2);
        assert_eq!(cursor.selected, 1);
        cursor.down(0);
        assert_eq!(cursor.selected, 1);
    }

    #[test]
    fn gamedays_requested_once_until_answered() {
        let mut gamedays = GamedaysState::default();
        assert!(gamedays.request());
        assert!(!gamedays.request());

        gamedays.load(vec![date(2019, 4, 16)]);
        assert!(!gamedays.pending);
        assert!(!gamedays.request());
    }

    #[test]
    fn games_finish_ignores_stale_source() {
        let mut games = GamesState::default();
        games.begin(GamesSource::Day(date(2019, 4, 16)));
        assert!(games.games.is_none());

        let stale = GamesSource::Day(date(2019, 4, 15));
        assert!(!games.finish(&stale, vec![game("1")]));
        assert!(games.games.is_none());

        assert!(games.finish(&GamesSource::Day(date(2019, 4, 16)), vec![game("2"), game("3")]));
        assert_eq!(games.len(), 2);
        assert_eq!(games.selected().map(|g| g.id.as_str()), Some("2"));
    }

    #[test]
    fn highlights_finish_matches_game_id() {
        let mut highlights = HighlightsState::default();
        highlights.begin("565997");
        assert!(!highlights.finish(game("1")));
        assert!(highlights.finish(game("565997")));
        assert_eq!(highlights.len(), 0);
        assert!(highlights.selected().is_none());
    }

    #[test]
    fn games_source_titles() {
        assert_eq!(GamesSource::Day(date(2019, 4, 6)).title(), "Saturday, April 6, 2019");
        let team = GamesSource::Team { team_id: 136, label: "Seattle Mariners (SEA)".into() };
        assert_eq!(team.title(), "Seattle Mariners (SEA), last 30 days");
    }

    #[test]
    fn trail_ends_at_screen_help_was_opened_from() {
        let mut state = AppState::new();
        state.history = vec![Screen::Home, Screen::Gamedays];
        state.screen = Screen::Help;
        state.help_return = Screen::Games;
        assert_eq!(state.trail(), vec![Screen::Home, Screen::Gamedays, Screen::Games]);
    }
}
