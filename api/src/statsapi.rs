//! MLB stats API raw wire types: serde shapes for statsapi.mlb.com responses.
//! Nearly every field is optional. The upstream schema drifts between seasons and the
//! mappers in client.rs and highlight.rs decide what an absent field means.
//!
//! Every field goes through `lenient` or `lenient_list`: a value of the wrong JSON type
//! reads as `None` (or drops out of its list) instead of failing the whole response.
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum Lenient<T> {
    Value(T),
    Other(IgnoredAny),
}

impl<T> Lenient<T> {
    fn into_option(self) -> Option<T> {
        match self {
            Lenient::Value(value) => Some(value),
            Lenient::Other(IgnoredAny) => None,
        }
    }
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Lenient::<T>::deserialize(deserializer)?.into_option())
}

/// Like `lenient`, and also drops the elements that don't fit `T`.
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let items: Option<Vec<Lenient<T>>> = lenient(deserializer)?;
    Ok(items.map(|items| items.into_iter().filter_map(Lenient::into_option).collect()))
}

/// Identifiers arrive as JSON numbers on most endpoints and as strings on a few.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum RawId {
    Int(u64),
    Str(String),
}

impl RawId {
    pub fn as_string(&self) -> String {
        match self {
            RawId::Int(n) => n.to_string(),
            RawId::Str(s) => s.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Schedule  (/schedule)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ScheduleResponse {
    #[serde(default, deserialize_with = "lenient_list")]
    pub dates: Option<Vec<ScheduleDate>>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ScheduleDate {
    #[serde(default, deserialize_with = "lenient_list")]
    pub games: Option<Vec<ScheduleGame>>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleGame {
    #[serde(default, deserialize_with = "lenient")]
    pub game_pk: Option<RawId>,
    #[serde(default, deserialize_with = "lenient")]
    pub game_date: Option<String>, // ISO 8601, UTC
    #[serde(default, deserialize_with = "lenient")]
    pub teams: Option<ScheduleTeams>,
    #[serde(default, deserialize_with = "lenient")]
    pub linescore: Option<Linescore>,
    #[serde(default, deserialize_with = "lenient")]
    pub venue: Option<Venue>,
    /// Present only with `hydrate=game(content(editorial(recap)))`.
    #[serde(default, deserialize_with = "lenient")]
    pub content: Option<GameContent>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ScheduleTeams {
    #[serde(default, deserialize_with = "lenient")]
    pub away: Option<ScheduleSide>,
    #[serde(default, deserialize_with = "lenient")]
    pub home: Option<ScheduleSide>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ScheduleSide {
    #[serde(default, deserialize_with = "lenient")]
    pub team: Option<TeamRef>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct TeamRef {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<u32>,
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub abbreviation: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct Linescore {
    #[serde(default, deserialize_with = "lenient")]
    pub teams: Option<LinescoreTeams>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct LinescoreTeams {
    #[serde(default, deserialize_with = "lenient")]
    pub away: Option<LinescoreSide>,
    #[serde(default, deserialize_with = "lenient")]
    pub home: Option<LinescoreSide>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct LinescoreSide {
    #[serde(default, deserialize_with = "lenient")]
    pub runs: Option<u16>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct Venue {
    #[serde(rename = "timeZone", default, deserialize_with = "lenient")]
    pub time_zone: Option<VenueTimeZone>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct VenueTimeZone {
    /// Whole hours from UTC, e.g. -4 for EDT.
    #[serde(default, deserialize_with = "lenient")]
    pub offset: Option<i32>,
}

// ---------------------------------------------------------------------------
// Live feed  (/game/{id}/feed/live), legacy game construction path
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct LiveFeedResponse {
    #[serde(default, deserialize_with = "lenient")]
    pub game_data: Option<FeedGameData>,
    #[serde(default, deserialize_with = "lenient")]
    pub live_data: Option<FeedLiveData>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct FeedGameData {
    #[serde(default, deserialize_with = "lenient")]
    pub datetime: Option<FeedDateTime>,
    #[serde(default, deserialize_with = "lenient")]
    pub teams: Option<FeedTeams>,
    #[serde(default, deserialize_with = "lenient")]
    pub venue: Option<Venue>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct FeedDateTime {
    #[serde(rename = "dateTime", default, deserialize_with = "lenient")]
    pub date_time: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct FeedTeams {
    #[serde(default, deserialize_with = "lenient")]
    pub away: Option<TeamRef>,
    #[serde(default, deserialize_with = "lenient")]
    pub home: Option<TeamRef>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct FeedLiveData {
    #[serde(default, deserialize_with = "lenient")]
    pub linescore: Option<Linescore>,
}

// ---------------------------------------------------------------------------
// Game content  (/game/{id}/content and the hydrated schedule `content` node)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
pub struct GameContent {
    #[serde(default, deserialize_with = "lenient")]
    pub editorial: Option<Editorial>,
    #[serde(default, deserialize_with = "lenient")]
    pub highlights: Option<HighlightsNode>,
}

impl GameContent {
    pub fn recap(&self) -> Option<&Article> {
        self.editorial.as_ref()?.recap.as_ref()?.mlb.as_ref()
    }

    pub fn highlight_items(&self) -> &[HighlightItem] {
        self.highlights
            .as_ref()
            .and_then(|h| h.highlights.as_ref())
            .and_then(|h| h.items.as_deref())
            .unwrap_or_default()
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct Editorial {
    #[serde(default, deserialize_with = "lenient")]
    pub recap: Option<RecapNode>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct RecapNode {
    #[serde(default, deserialize_with = "lenient")]
    pub mlb: Option<Article>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct Article {
    #[serde(default, deserialize_with = "lenient")]
    pub headline: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub blurb: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub image: Option<Image>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct Image {
    #[serde(default, deserialize_with = "lenient_list")]
    pub cuts: Option<Vec<ImageCut>>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ImageCut {
    #[serde(default, deserialize_with = "lenient")]
    pub width: Option<u32>,
    #[serde(default, deserialize_with = "lenient")]
    pub src: Option<String>,
}

/// `highlights.highlights.items`: the node is nested twice upstream.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct HighlightsNode {
    #[serde(default, deserialize_with = "lenient")]
    pub highlights: Option<HighlightList>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct HighlightList {
    #[serde(default, deserialize_with = "lenient_list")]
    pub items: Option<Vec<HighlightItem>>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct HighlightItem {
    #[serde(default, deserialize_with = "lenient")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub blurb: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub duration: Option<String>, // "00:01:23"
    #[serde(default, deserialize_with = "lenient")]
    pub slug: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub image: Option<Image>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub playbacks: Option<Vec<Playback>>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub keywords_display: Option<Vec<Keyword>>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct Playback {
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>, // "mp4Avc", "FLASH_2500K_1280X720", "hlsCloud", ...
    #[serde(default, deserialize_with = "lenient")]
    pub url: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct Keyword {
    #[serde(rename = "type", default, deserialize_with = "lenient")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub value: Option<String>,
}

// ---------------------------------------------------------------------------
// Seasons  (/seasons) and teams  (/teams)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
pub struct SeasonsResponse {
    #[serde(default, deserialize_with = "lenient_list")]
    pub seasons: Option<Vec<Season>>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Season {
    #[serde(default, deserialize_with = "lenient")]
    pub regular_season_start_date: Option<String>, // "2019-03-20"
    #[serde(default, deserialize_with = "lenient")]
    pub regular_season_end_date: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct TeamsResponse {
    #[serde(default, deserialize_with = "lenient_list")]
    pub teams: Option<Vec<TeamRef>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mistyped_leaf_reads_as_none() {
        let side: LinescoreSide = serde_json::from_str(r#"{"runs":"3"}"#).unwrap();
        assert_eq!(side.runs, None);

        let team: TeamRef = serde_json::from_str(r#"{"id":136,"name":null,"abbreviation":7}"#).unwrap();
        assert_eq!(team.id, Some(136));
        assert_eq!(team.name, None);
        assert_eq!(team.abbreviation, None);
    }

    #[test]
    fn mistyped_node_reads_as_none() {
        let game: ScheduleGame =
            serde_json::from_str(r#"{"gamePk":565997,"teams":"TBD","venue":{"timeZone":{"offset":"-4"}}}"#)
                .unwrap();
        assert_eq!(game.game_pk, Some(RawId::Int(565997)));
        assert!(game.teams.is_none());
        assert_eq!(game.venue.and_then(|v| v.time_zone).and_then(|tz| tz.offset), None);
    }

    #[test]
    fn list_drops_elements_of_the_wrong_shape() {
        let image: Image = serde_json::from_str(
            r#"{"cuts":[{"width":"640","src":"a.jpg"},42,{"width":960,"src":"b.jpg"}]}"#,
        )
        .unwrap();
        let cuts = image.cuts.unwrap();
        assert_eq!(cuts.len(), 2);
        assert_eq!(cuts[0].width, None);
        assert_eq!(cuts[1].width, Some(960));

        let image: Image = serde_json::from_str(r#"{"cuts":{"640x360":"a.jpg"}}"#).unwrap();
        assert!(image.cuts.is_none());
    }
}
