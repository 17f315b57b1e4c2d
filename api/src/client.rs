use crate::highlight::{collect_highlights, image_slots};
use crate::statsapi::{
    Article, GameContent, Linescore, LiveFeedResponse, RawId, ScheduleGame, ScheduleResponse,
    SeasonsResponse, TeamRef, TeamsResponse, Venue,
};
use crate::{Game, GameDay, GamesByTeam, SchemaVersion, SeasonDates, Team};
use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, Utc};
use log::{debug, warn};
use reqwest::blocking::Client;
use std::fmt;
use std::time::Duration;

pub type ApiResult<T> = Result<T, ApiError>;

pub const STATSAPI_BASE: &str = "https://statsapi.mlb.com/api/v1";
const SPORT_ID_MLB: u32 = 1;
/// Pulls team abbreviations, linescore, venue time zone and the recap article into
/// each schedule record, so one schedule call is enough to build a listing.
const SCHEDULE_HYDRATE: &str = "team,linescore,venue(timezone),game(content(editorial(recap)))";

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub schema: SchemaVersion,
    /// Schedule `gameType` filter, e.g. "R" (regular season) or "R,F,D,L,W".
    pub game_types: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: STATSAPI_BASE.to_owned(),
            schema: SchemaVersion::default(),
            game_types: "R".to_owned(),
        }
    }
}

impl ApiConfig {
    /// Defaults, overridden by `MLBHL_API_BASE`, `MLBHL_SCHEMA` and `MLBHL_GAME_TYPES`.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(base) = std::env::var("MLBHL_API_BASE")
            && !base.trim().is_empty()
        {
            config.base_url = base.trim().trim_end_matches('/').to_owned();
        }
        if let Ok(schema) = std::env::var("MLBHL_SCHEMA")
            && !schema.trim().is_empty()
        {
            match SchemaVersion::parse(&schema) {
                Some(version) => config.schema = version,
                None => warn!("unknown MLBHL_SCHEMA {schema:?}, using {:?}", config.schema),
            }
        }
        if let Ok(types) = std::env::var("MLBHL_GAME_TYPES")
            && !types.trim().is_empty()
        {
            config.game_types = types.trim().to_owned();
        }
        config
    }
}

/// Blocking client for the MLB stats API.
#[derive(Debug, Clone)]
pub struct MlbApi {
    client: Client,
    timeout: Duration,
    config: ApiConfig,
}

impl Default for MlbApi {
    fn default() -> Self {
        Self::from_config(ApiConfig::default())
    }
}

#[derive(Debug)]
pub enum ApiError {
    Network(reqwest::Error, String),
    Api(reqwest::Error, String),
    Parsing(reqwest::Error, String),
    /// A date or duration string that could not be read.
    Format(String),
    /// A structural field without which the entity is meaningless (e.g. team names).
    Schema(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(e, url) => write!(f, "Network error for {url}: {e}"),
            ApiError::Api(e, url) => write!(f, "API error for {url}: {e}"),
            ApiError::Parsing(e, url) => write!(f, "Parse error for {url}: {e}"),
            ApiError::Format(msg) => write!(f, "Format error: {msg}"),
            ApiError::Schema(msg) => write!(f, "Schema error: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::Network(e, _) | ApiError::Api(e, _) | ApiError::Parsing(e, _) => Some(e),
            _ => None,
        }
    }
}

impl ApiError {
    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Network(..) | ApiError::Api(..) | ApiError::Parsing(..))
    }
}

impl MlbApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: ApiConfig) -> Self {
        Self {
            client: Client::builder()
                .user_agent(concat!("mlbhl/", env!("CARGO_PKG_VERSION"), " (baseball highlights)"))
                .build()
                .unwrap_or_default(),
            timeout: Duration::from_secs(10),
            config,
        }
    }

    pub fn schema(&self) -> SchemaVersion {
        self.config.schema
    }

    /// All games scheduled on `date`, in schedule order.
    pub fn game_day(&self, date: NaiveDate) -> ApiResult<GameDay> {
        let url = format!(
            "{}/schedule?sportId={SPORT_ID_MLB}&startDate={date}&endDate={date}&gameType={}&hydrate={SCHEDULE_HYDRATE}",
            self.config.base_url, self.config.game_types
        );
        let raw: ScheduleResponse = self.get(&url)?;
        let games = self.games_from_schedule(&raw)?;
        debug!("{} games on {date}", games.len());
        Ok(GameDay { date, games })
    }

    /// Games of one team between `start` and `end` (inclusive), date order.
    pub fn games_by_team(&self, team_id: u32, start: NaiveDate, end: NaiveDate) -> ApiResult<GamesByTeam> {
        let url = format!(
            "{}/schedule?sportId={SPORT_ID_MLB}&startDate={start}&endDate={end}&teamId={team_id}&gameType={}&hydrate={SCHEDULE_HYDRATE}",
            self.config.base_url, self.config.game_types
        );
        let raw: ScheduleResponse = self.get(&url)?;
        let games = self.games_from_schedule(&raw)?;
        debug!("{} games for team {team_id} between {start} and {end}", games.len());
        Ok(GamesByTeam { team_id, start, end, games })
    }

    /// Build a game from its id alone. An id the API knows nothing about yields
    /// `Game::empty(id)` rather than an error.
    pub fn game(&self, id: &str) -> ApiResult<Game> {
        match self.config.schema {
            SchemaVersion::Current => {
                let url = format!(
                    "{}/schedule?sportId={SPORT_ID_MLB}&gamePk={id}&hydrate={SCHEDULE_HYDRATE}",
                    self.config.base_url
                );
                let raw: ScheduleResponse = self.get(&url)?;
                let record = flatten_schedule(&raw)
                    .into_iter()
                    .find(|g| g.game_pk.as_ref().map(RawId::as_string).as_deref() == Some(id));
                match record {
                    Some(record) => map_schedule_game(record),
                    None => {
                        debug!("schedule has no game {id}");
                        Ok(Game::empty(id))
                    }
                }
            }
            SchemaVersion::Legacy => {
                let url = format!("{}/game/{id}/feed/live", self.config.base_url);
                let feed: LiveFeedResponse = self.get(&url)?;
                if feed.game_data.is_none() {
                    debug!("live feed has no gameData for {id}");
                    return Ok(Game::empty(id));
                }
                let content: GameContent = self.get(&self.content_url(id))?;
                map_feed_game(id, &feed, content.recap())
            }
        }
    }

    /// Fetch the game's content feed and replace `game.highlights` with its playable
    /// clips, recap first and condensed game second.
    pub fn load_highlights(&self, game: &mut Game) -> ApiResult<()> {
        let content: GameContent = self.get(&self.content_url(&game.id))?;
        let items = content.highlight_items();
        game.highlights = collect_highlights(items, self.config.schema);
        debug!(
            "game {}: {} of {} highlights playable",
            game.id,
            game.highlights.len(),
            items.len()
        );
        Ok(())
    }

    /// Regular-season bounds for `year`, or None when the API has no season yet.
    pub fn season_dates(&self, year: i32) -> ApiResult<Option<SeasonDates>> {
        let url = format!("{}/seasons?sportId={SPORT_ID_MLB}&seasonId={year}", self.config.base_url);
        let raw: SeasonsResponse = self.get(&url)?;
        let Some(season) = raw.seasons.unwrap_or_default().into_iter().next() else {
            debug!("no season data for {year}");
            return Ok(None);
        };

        let start = season.regular_season_start_date.as_deref().map(parse_date);
        let end = season.regular_season_end_date.as_deref().map(parse_date);
        match (start, end) {
            (Some(Ok(start)), Some(Ok(end))) => Ok(Some(SeasonDates { start, end })),
            (Some(Err(e)), _) | (_, Some(Err(e))) => {
                warn!("season {year}: {e}");
                Ok(None)
            }
            _ => Ok(None),
        }
    }

    /// Every gameday of the current season up to `today`, newest first.
    pub fn season_gamedays(&self, today: NaiveDate) -> ApiResult<Vec<NaiveDate>> {
        Ok(self
            .season_dates(today.year())?
            .map(|season| season.gamedays_until(today))
            .unwrap_or_default())
    }

    /// All MLB teams, sorted by abbreviation.
    pub fn teams(&self) -> ApiResult<Vec<Team>> {
        let url = format!("{}/teams?sportId={SPORT_ID_MLB}", self.config.base_url);
        let raw: TeamsResponse = self.get(&url)?;
        let mut teams: Vec<Team> = raw
            .teams
            .unwrap_or_default()
            .into_iter()
            .filter_map(|t| {
                Some(Team {
                    id: t.id?,
                    name: t.name?,
                    abbreviation: t.abbreviation?,
                })
            })
            .collect();
        teams.sort_by(|a, b| a.abbreviation.cmp(&b.abbreviation));
        Ok(teams)
    }

    fn content_url(&self, id: &str) -> String {
        format!("{}/game/{id}/content", self.config.base_url)
    }

    fn games_from_schedule(&self, raw: &ScheduleResponse) -> ApiResult<Vec<Game>> {
        let mut games = Vec::new();
        for record in flatten_schedule(raw) {
            let game = match self.config.schema {
                SchemaVersion::Current => map_schedule_game(record),
                SchemaVersion::Legacy => match &record.game_pk {
                    Some(id) => self.game(&id.as_string()),
                    None => Err(ApiError::Schema("schedule record without gamePk".into())),
                },
            };
            match game {
                Ok(game) => games.push(game),
                Err(ApiError::Schema(msg)) => warn!("skipping game: {msg}"),
                Err(e) => return Err(e),
            }
        }
        Ok(games)
    }

    fn get<T: Default + serde::de::DeserializeOwned>(&self, url: &str) -> ApiResult<T> {
        debug!("GET {url}");
        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .map_err(|e| ApiError::Network(e, url.to_owned()))?;

        match response.error_for_status() {
            Ok(res) => res.json::<T>().map_err(|e| ApiError::Parsing(e, url.to_owned())),
            Err(e) => {
                if e.status() == Some(reqwest::StatusCode::NOT_FOUND) {
                    debug!("{url} answered 404, treating as empty");
                    Ok(T::default())
                } else {
                    Err(ApiError::Api(e, url.to_owned()))
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Mapping: stats API wire types → clean domain types
// ---------------------------------------------------------------------------

/// Every game record across all date buckets: date order, then schedule order.
pub fn flatten_schedule(raw: &ScheduleResponse) -> Vec<&ScheduleGame> {
    raw.dates
        .iter()
        .flatten()
        .flat_map(|d| d.games.iter().flatten())
        .collect()
}

/// Map a (hydrated) schedule record.
pub fn map_schedule_game(raw: &ScheduleGame) -> ApiResult<Game> {
    let id = raw
        .game_pk
        .as_ref()
        .map(RawId::as_string)
        .ok_or_else(|| ApiError::Schema("schedule record without gamePk".into()))?;

    let teams = raw.teams.as_ref();
    let away = teams.and_then(|t| t.away.as_ref()).and_then(|s| s.team.as_ref());
    let home = teams.and_then(|t| t.home.as_ref()).and_then(|s| s.team.as_ref());
    let matchup = Matchup::from_refs(&id, away, home)?;

    let start_time = raw.game_date.as_deref().and_then(parse_start_time);
    let recap = raw.content.as_ref().and_then(GameContent::recap);

    Ok(build_game(
        id,
        &matchup,
        start_time,
        venue_offset(raw.venue.as_ref()),
        recap,
        raw.linescore.as_ref(),
    ))
}

/// Map a live-feed response (older schema). No `gameData` means an empty game.
pub fn map_feed_game(id: &str, feed: &LiveFeedResponse, recap: Option<&Article>) -> ApiResult<Game> {
    let Some(data) = feed.game_data.as_ref() else {
        return Ok(Game::empty(id));
    };

    let teams = data.teams.as_ref();
    let matchup = Matchup::from_refs(
        id,
        teams.and_then(|t| t.away.as_ref()),
        teams.and_then(|t| t.home.as_ref()),
    )?;

    let start_time = data
        .datetime
        .as_ref()
        .and_then(|d| d.date_time.as_deref())
        .and_then(parse_start_time);
    let linescore = feed.live_data.as_ref().and_then(|l| l.linescore.as_ref());

    Ok(build_game(
        id.to_owned(),
        &matchup,
        start_time,
        venue_offset(data.venue.as_ref()),
        recap,
        linescore,
    ))
}

struct Matchup<'a> {
    away_name: &'a str,
    away_abbr: Option<&'a str>,
    home_name: &'a str,
    home_abbr: Option<&'a str>,
}

impl<'a> Matchup<'a> {
    fn from_refs(id: &str, away: Option<&'a TeamRef>, home: Option<&'a TeamRef>) -> ApiResult<Self> {
        let name = |side: Option<&'a TeamRef>, label: &str| {
            side.and_then(|t| t.name.as_deref())
                .ok_or_else(|| ApiError::Schema(format!("game {id}: missing {label} team name")))
        };
        Ok(Self {
            away_name: name(away, "away")?,
            away_abbr: away.and_then(|t| t.abbreviation.as_deref()),
            home_name: name(home, "home")?,
            home_abbr: home.and_then(|t| t.abbreviation.as_deref()),
        })
    }

    fn title(&self) -> String {
        format!(
            "{} @ {}",
            team_label(self.away_name, self.away_abbr),
            team_label(self.home_name, self.home_abbr)
        )
    }

    fn short_title(&self) -> String {
        format!(
            "{}@{}",
            self.away_abbr.unwrap_or(self.away_name),
            self.home_abbr.unwrap_or(self.home_name)
        )
    }
}

fn team_label(name: &str, abbr: Option<&str>) -> String {
    match abbr {
        Some(abbr) => format!("{name} ({abbr})"),
        None => name.to_owned(),
    }
}

fn build_game(
    id: String,
    matchup: &Matchup,
    start_time: Option<DateTime<Utc>>,
    offset: Option<FixedOffset>,
    recap: Option<&Article>,
    linescore: Option<&Linescore>,
) -> Game {
    let title = matchup.title();
    let title_with_time = match start_time {
        Some(start) => format!("{}: {title}", format_local(start, offset)),
        None => title.clone(),
    };

    let cuts = recap.and_then(|r| r.image.as_ref()).and_then(|i| i.cuts.as_deref());
    let (fanart_url, thumb_url, icon_url) = image_slots(cuts);

    Game {
        id,
        start_time,
        short_title: matchup.short_title(),
        title,
        title_with_time,
        fanart_url,
        thumb_url,
        icon_url,
        description: recap.and_then(|r| r.blurb.clone()),
        short_description: recap.and_then(|r| r.headline.clone()),
        score: linescore_score(linescore),
        highlights: Vec::new(),
    }
}

fn linescore_score(linescore: Option<&Linescore>) -> Option<(u16, u16)> {
    let teams = linescore?.teams.as_ref()?;
    let away = teams.away.as_ref()?.runs?;
    let home = teams.home.as_ref()?.runs?;
    Some((away, home))
}

fn venue_offset(venue: Option<&Venue>) -> Option<FixedOffset> {
    let hours = venue?.time_zone.as_ref()?.offset?;
    FixedOffset::east_opt(hours * 3600)
}

/// "YYYY-MM-DD HH:MM" in the venue's offset, or UTC when unknown.
fn format_local(start: DateTime<Utc>, offset: Option<FixedOffset>) -> String {
    match offset {
        Some(offset) => start.with_timezone(&offset).format("%Y-%m-%d %H:%M").to_string(),
        None => start.format("%Y-%m-%d %H:%M").to_string(),
    }
}

fn parse_start_time(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").map(|naive| naive.and_utc()))
        .ok()
}

fn parse_date(s: &str) -> ApiResult<NaiveDate> {
    NaiveDate::parse_from_str(s.get(..10).unwrap_or(s), "%Y-%m-%d")
        .map_err(|e| ApiError::Format(format!("invalid date {s:?}: {e}")))
}
