use crate::state::network::LoadingState;
use chrono::NaiveDate;
use crossterm::event::KeyEvent;
use mlb_api::{Game, GameDay, GamesByTeam, Team};

#[derive(Debug, Clone)]
pub enum NetworkRequest {
    LoadGamedays,
    LoadGameDay { date: NaiveDate },
    LoadTeams,
    LoadTeamGames { team_id: u32 },
    /// The game travels to the worker and comes back with its highlights filled in.
    LoadHighlights { game: Box<Game> },
}

#[derive(Debug)]
pub enum NetworkResponse {
    LoadingStateChanged { loading_state: LoadingState },
    GamedaysLoaded { days: Vec<NaiveDate> },
    GameDayLoaded { day: GameDay },
    TeamsLoaded { teams: Vec<Team> },
    TeamGamesLoaded { games: GamesByTeam },
    HighlightsLoaded { game: Box<Game> },
    Error { message: String },
}

#[derive(Debug, Clone)]
pub enum UiEvent {
    KeyPressed(KeyEvent),
    Resize,
    AppStarted,
}
