use crate::state::messages::{NetworkRequest, NetworkResponse};
use chrono::{Days, Local, NaiveDate};
use log::{debug, error};
use mlb_api::client::{ApiConfig, ApiResult, MlbApi};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::mpsc;

const SPINNER_CHARS: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
pub const ERROR_CHAR: char = '!';

/// How far back "games by team" looks.
pub const TEAM_WINDOW_DAYS: u64 = 30;

#[derive(Debug, Copy, Clone)]
pub struct LoadingState {
    pub is_loading: bool,
    pub spinner_char: char,
}

impl Default for LoadingState {
    fn default() -> Self {
        Self { is_loading: false, spinner_char: ' ' }
    }
}

/// Owns the blocking API client. `run` must be called on a plain thread, never on
/// a runtime worker; the spinner task is spawned onto `runtime`.
pub struct NetworkWorker {
    client: MlbApi,
    requests: mpsc::Receiver<NetworkRequest>,
    responses: mpsc::Sender<NetworkResponse>,
    is_loading: Arc<AtomicBool>,
    runtime: Handle,
}

impl NetworkWorker {
    pub fn new(
        config: ApiConfig,
        requests: mpsc::Receiver<NetworkRequest>,
        responses: mpsc::Sender<NetworkResponse>,
        runtime: Handle,
    ) -> Self {
        Self {
            client: MlbApi::from_config(config),
            requests,
            responses,
            is_loading: Arc::new(AtomicBool::new(false)),
            runtime,
        }
    }

    pub fn run(mut self) {
        while let Some(request) = self.requests.blocking_recv() {
            self.start_loading_animation();

            let result = match request {
                NetworkRequest::LoadGamedays => self.handle_load_gamedays(),
                NetworkRequest::LoadGameDay { date } => self.handle_load_game_day(date),
                NetworkRequest::LoadTeams => self.handle_load_teams(),
                NetworkRequest::LoadTeamGames { team_id } => self.handle_load_team_games(team_id),
                NetworkRequest::LoadHighlights { game } => self.handle_load_highlights(game),
            };

            debug!("network request complete");
            self.stop_loading_animation(result.is_ok());

            let response = result.unwrap_or_else(|err| NetworkResponse::Error {
                message: err.to_string(),
            });

            if let Err(e) = self.responses.blocking_send(response) {
                error!("Failed to send network response: {e}");
                break;
            }
        }
        debug!("network worker stopped");
    }

    fn handle_load_gamedays(&self) -> ApiResult<NetworkResponse> {
        let today = Local::now().date_naive();
        debug!("loading gamedays up to {today}");
        let days = self.client.season_gamedays(today)?;
        Ok(NetworkResponse::GamedaysLoaded { days })
    }

    fn handle_load_game_day(&self, date: NaiveDate) -> ApiResult<NetworkResponse> {
        debug!("loading games for {date}");
        let day = self.client.game_day(date)?;
        Ok(NetworkResponse::GameDayLoaded { day })
    }

    fn handle_load_teams(&self) -> ApiResult<NetworkResponse> {
        debug!("loading teams");
        let teams = self.client.teams()?;
        Ok(NetworkResponse::TeamsLoaded { teams })
    }

    fn handle_load_team_games(&self, team_id: u32) -> ApiResult<NetworkResponse> {
        let end = Local::now().date_naive();
        let start = end.checked_sub_days(Days::new(TEAM_WINDOW_DAYS)).unwrap_or(end);
        debug!("loading games for team {team_id} from {start} to {end}");
        let games = self.client.games_by_team(team_id, start, end)?;
        Ok(NetworkResponse::TeamGamesLoaded { games })
    }

    fn handle_load_highlights(&self, mut game: Box<mlb_api::Game>) -> ApiResult<NetworkResponse> {
        debug!("loading highlights for game {}", game.id);
        self.client.load_highlights(&mut game)?;
        Ok(NetworkResponse::HighlightsLoaded { game })
    }

    fn start_loading_animation(&self) {
        self.is_loading.store(true, Ordering::Relaxed);

        let mut loading_state = LoadingState { is_loading: true, spinner_char: SPINNER_CHARS[0] };
        let _ = self
            .responses
            .blocking_send(NetworkResponse::LoadingStateChanged { loading_state });

        let responses = self.responses.clone();
        let is_loading = self.is_loading.clone();

        self.runtime.spawn(async move {
            let mut spinner_index = 1;
            let mut interval = tokio::time::interval(Duration::from_millis(33));
            loop {
                interval.tick().await;
                if !is_loading.load(Ordering::Relaxed) {
                    break;
                }
                loading_state.spinner_char = SPINNER_CHARS[spinner_index];
                spinner_index = (spinner_index + 1) % SPINNER_CHARS.len();
                let _ = responses
                    .send(NetworkResponse::LoadingStateChanged { loading_state })
                    .await;
            }
        });
    }

    fn stop_loading_animation(&self, is_ok: bool) {
        self.is_loading.store(false, Ordering::Relaxed);
        std::thread::sleep(Duration::from_millis(15));

        let spinner_char = if is_ok { ' ' } else { ERROR_CHAR };
        let _ = self.responses.blocking_send(NetworkResponse::LoadingStateChanged {
            loading_state: LoadingState { is_loading: false, spinner_char },
        });
    }
}
