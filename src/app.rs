use crate::state::app_settings::AppSettings;
use crate::state::app_state::{AppState, GamesSource, HOME_ENTRIES};
use crate::state::messages::NetworkRequest;
use chrono::NaiveDate;
use mlb_api::{Game, GameDay, GamesByTeam, Team};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Screen {
    #[default]
    Home,
    Gamedays,
    Teams,
    Games,
    Highlights,
    Help,
}

impl Screen {
    pub fn label(&self) -> &'static str {
        match self {
            Screen::Home => "Home",
            Screen::Gamedays => "Gamedays",
            Screen::Teams => "Teams",
            Screen::Games => "Games",
            Screen::Highlights => "Highlights",
            Screen::Help => "Help",
        }
    }
}

pub struct App {
    pub settings: AppSettings,
    pub state: AppState,
}

impl App {
    pub fn new() -> Self {
        let app = Self::with_settings(AppSettings::load());

        if let Some(level) = app.settings.log_level {
            log::set_max_level(level);
            tui_logger::set_default_level(level);
        }

        app
    }

    pub fn with_settings(settings: AppSettings) -> Self {
        Self { settings, state: AppState::new() }
    }

    // -----------------------------------------------------------------------
    // Network response handlers, called from main_ui_loop
    // -----------------------------------------------------------------------

    pub fn on_gamedays_loaded(&mut self, days: Vec<NaiveDate>) {
        if days.is_empty() {
            self.state.status = Some("No gamedays yet this season".to_string());
        }
        self.state.gamedays.load(days);
    }

    pub fn on_game_day_loaded(&mut self, day: GameDay) {
        let source = GamesSource::Day(day.date);
        self.finish_games(&source, day.games);
    }

    pub fn on_teams_loaded(&mut self, teams: Vec<Team>) {
        self.state.teams.load(teams);
    }

    pub fn on_team_games_loaded(&mut self, result: GamesByTeam) {
        let label = self
            .state
            .games
            .source
            .as_ref()
            .and_then(|s| match s {
                GamesSource::Team { team_id, label } if *team_id == result.team_id => Some(label.clone()),
                _ => None,
            });
        let Some(label) = label else {
            return;
        };
        let source = GamesSource::Team { team_id: result.team_id, label };
        self.finish_games(&source, result.games);
    }

    pub fn on_highlights_loaded(&mut self, game: Game) {
        let id = game.id.clone();
        let count = game.highlights.len();
        if self.state.highlights.finish(game) && count == 0 {
            self.state.status = Some(format!("No playable highlights for game {id}"));
        }
    }

    pub fn on_error(&mut self, message: String) {
        // The failed request is not named; release both so the next visit retries
        self.state.gamedays.pending = false;
        self.state.teams.pending = false;
        self.state.last_error = Some(message);
    }

    fn finish_games(&mut self, source: &GamesSource, games: Vec<Game>) {
        let count = games.len();
        if self.state.games.finish(source, games) {
            self.state.status = Some(match count {
                0 => format!("No games: {}", source.title()),
                1 => "1 game".to_string(),
                n => format!("{n} games"),
            });
        }
    }

    /// The gamedays load, unless the list is already loaded or on its way.
    pub fn request_gamedays(&mut self) -> Option<NetworkRequest> {
        self.state.gamedays.request().then_some(NetworkRequest::LoadGamedays)
    }

    pub fn request_teams(&mut self) -> Option<NetworkRequest> {
        self.state.teams.request().then_some(NetworkRequest::LoadTeams)
    }

    // -----------------------------------------------------------------------
    // Screen management
    // -----------------------------------------------------------------------

    pub fn open(&mut self, next: Screen) {
        if self.state.screen == next {
            return;
        }
        self.state.history.push(self.state.screen);
        self.state.screen = next;
    }

    pub fn back(&mut self) {
        if self.state.screen == Screen::Help {
            self.exit_help();
            return;
        }
        if let Some(previous) = self.state.history.pop() {
            self.state.screen = previous;
            self.state.status = None;
            self.state.last_error = None;
        }
    }

    pub fn show_help(&mut self) {
        if self.state.screen != Screen::Help {
            self.state.help_return = self.state.screen;
            self.state.screen = Screen::Help;
        }
    }

    pub fn exit_help(&mut self) {
        if self.state.screen == Screen::Help {
            self.state.screen = self.state.help_return;
        }
    }

    pub fn toggle_show_logs(&mut self) {
        self.state.show_logs = !self.state.show_logs;
    }

    pub fn toggle_full_screen(&mut self) {
        self.settings.full_screen = !self.settings.full_screen;
    }

    // -----------------------------------------------------------------------
    // List navigation
    // -----------------------------------------------------------------------

    pub fn move_down(&mut self) {
        let state = &mut self.state;
        match state.screen {
            Screen::Home => state.home.down(HOME_ENTRIES.len()),
            Screen::Gamedays => {
                let len = state.gamedays.len();
                state.gamedays.cursor.down(len);
            }
            Screen::Teams => {
                let len = state.teams.len();
                state.teams.cursor.down(len);
            }
            Screen::Games => {
                let len = state.games.len();
                state.games.cursor.down(len);
            }
            Screen::Highlights => {
                let len = state.highlights.len();
                state.highlights.cursor.down(len);
            }
            Screen::Help => {}
        }
    }

    pub fn move_up(&mut self) {
        let state = &mut self.state;
        match state.screen {
            Screen::Home => state.home.up(),
            Screen::Gamedays => state.gamedays.cursor.up(),
            Screen::Teams => state.teams.cursor.up(),
            Screen::Games => state.games.cursor.up(),
            Screen::Highlights => state.highlights.cursor.up(),
            Screen::Help => {}
        }
    }

    /// Enter on the current screen. Returns the request that fills the screen
    /// being opened, if it needs one.
    pub fn select(&mut self) -> Option<NetworkRequest> {
        self.state.last_error = None;
        self.state.status = None;

        match self.state.screen {
            Screen::Home => {
                if self.state.home.selected == 0 {
                    self.open(Screen::Gamedays);
                    self.request_gamedays()
                } else {
                    self.open(Screen::Teams);
                    self.request_teams()
                }
            }
            Screen::Gamedays => {
                let date = self.state.gamedays.selected()?;
                self.state.games.begin(GamesSource::Day(date));
                self.open(Screen::Games);
                Some(NetworkRequest::LoadGameDay { date })
            }
            Screen::Teams => {
                let team = self.state.teams.selected()?;
                let (team_id, label) = (team.id, team.label());
                self.state.games.begin(GamesSource::Team { team_id, label });
                self.open(Screen::Games);
                Some(NetworkRequest::LoadTeamGames { team_id })
            }
            Screen::Games => {
                let game = self.state.games.selected()?.clone();
                self.state.highlights.begin(&game.id);
                self.open(Screen::Highlights);
                Some(NetworkRequest::LoadHighlights { game: Box::new(game) })
            }
            Screen::Highlights => {
                let highlight = self.state.highlights.selected()?;
                self.state.status = highlight.url.as_ref().map(|url| format!("Play: {url}"));
                None
            }
            Screen::Help => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mlb_api::{ContentType, Highlight};

    fn app() -> App {
        App::with_settings(AppSettings::default())
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn game(id: &str) -> Game {
        Game { id: id.into(), title: format!("game {id}"), ..Game::default() }
    }

    #[test]
    fn home_opens_gamedays_and_requests_them_once() {
        let mut app = app();
        assert!(matches!(app.select(), Some(NetworkRequest::LoadGamedays)));
        assert_eq!(app.state.screen, Screen::Gamedays);

        app.on_gamedays_loaded(vec![date(2019, 4, 16), date(2019, 4, 15)]);
        app.back();
        assert_eq!(app.state.screen, Screen::Home);
        assert!(app.select().is_none());
    }

    #[test]
    fn gamedays_opened_during_startup_load_are_not_requested_again() {
        let mut app = app();
        assert!(matches!(app.request_gamedays(), Some(NetworkRequest::LoadGamedays)));

        assert!(app.select().is_none());
        assert_eq!(app.state.screen, Screen::Gamedays);

        app.on_gamedays_loaded(vec![date(2019, 4, 16)]);
        assert_eq!(app.state.gamedays.len(), 1);
    }

    #[test]
    fn failed_load_is_retried_on_next_visit() {
        let mut app = app();
        assert!(app.request_gamedays().is_some());
        app.on_error("network down".into());

        assert!(matches!(app.select(), Some(NetworkRequest::LoadGamedays)));
        assert_eq!(app.state.last_error, None);
    }

    #[test]
    fn home_second_entry_opens_teams() {
        let mut app = app();
        app.move_down();
        app.move_down();
        assert_eq!(app.state.home.selected, 1);
        assert!(matches!(app.select(), Some(NetworkRequest::LoadTeams)));
        assert_eq!(app.state.screen, Screen::Teams);
    }

    #[test]
    fn gameday_to_games_to_highlights() {
        let mut app = app();
        app.select();
        app.on_gamedays_loaded(vec![date(2019, 4, 16), date(2019, 4, 15)]);
        app.move_down();

        match app.select() {
            Some(NetworkRequest::LoadGameDay { date: d }) => assert_eq!(d, date(2019, 4, 15)),
            other => panic!("unexpected request {other:?}"),
        }
        assert_eq!(app.state.screen, Screen::Games);
        assert!(app.state.games.games.is_none());

        app.on_game_day_loaded(GameDay { date: date(2019, 4, 15), games: vec![game("7"), game("8")] });
        assert_eq!(app.state.games.len(), 2);
        app.move_down();

        match app.select() {
            Some(NetworkRequest::LoadHighlights { game }) => assert_eq!(game.id, "8"),
            other => panic!("unexpected request {other:?}"),
        }
        assert_eq!(
            app.state.trail(),
            vec![Screen::Home, Screen::Gamedays, Screen::Games, Screen::Highlights]
        );
    }

    #[test]
    fn late_game_day_response_is_ignored() {
        let mut app = app();
        app.state.games.begin(GamesSource::Day(date(2019, 4, 16)));
        app.on_game_day_loaded(GameDay { date: date(2019, 4, 15), games: vec![game("1")] });
        assert!(app.state.games.games.is_none());
    }

    #[test]
    fn team_games_fill_list_for_selected_team() {
        let mut app = app();
        app.state.screen = Screen::Teams;
        app.state.history = vec![Screen::Home];
        app.on_teams_loaded(vec![Team { id: 136, name: "Seattle Mariners".into(), abbreviation: "SEA".into() }]);

        assert!(matches!(app.select(), Some(NetworkRequest::LoadTeamGames { team_id: 136 })));
        app.on_team_games_loaded(GamesByTeam {
            team_id: 136,
            start: date(2019, 3, 17),
            end: date(2019, 4, 16),
            games: vec![game("1")],
        });
        assert_eq!(app.state.games.len(), 1);
        assert_eq!(app.state.status.as_deref(), Some("1 game"));
    }

    #[test]
    fn highlight_enter_shows_url() {
        let mut app = app();
        app.state.screen = Screen::Highlights;
        app.state.highlights.begin("1");
        let mut g = game("1");
        g.highlights.push(Highlight {
            url: Some("https://cuts.mlb.com/recap.mp4".into()),
            content_type: ContentType::Recap,
            ..Highlight::default()
        });
        app.on_highlights_loaded(g);

        assert!(app.select().is_none());
        assert_eq!(app.state.status.as_deref(), Some("Play: https://cuts.mlb.com/recap.mp4"));
    }

    #[test]
    fn help_returns_to_previous_screen() {
        let mut app = app();
        app.open(Screen::Teams);
        app.show_help();
        assert_eq!(app.state.screen, Screen::Help);
        app.back();
        assert_eq!(app.state.screen, Screen::Teams);
        app.back();
        assert_eq!(app.state.screen, Screen::Home);
        app.back();
        assert_eq!(app.state.screen, Screen::Home);
    }
}
