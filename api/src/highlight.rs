//! Mapping of raw highlight items into `Highlight`s, plus the small helpers the game
//! mapper shares with it (image cut selection, clock-duration parsing).

use crate::client::{ApiError, ApiResult};
use crate::statsapi::{HighlightItem, ImageCut, Playback};
use crate::{ContentType, FANART_WIDTH, Highlight, ICON_WIDTH, SchemaVersion, THUMB_WIDTH};
use chrono::{NaiveTime, Timelike};

const PLAYBACK_PRIMARY: &str = "mp4Avc";
const PLAYBACK_LEGACY: &str = "FLASH_2500K_1280X720";

/// Keyword type carrying the MLB content taxonomy in the legacy schema.
const TAXONOMY_KEYWORD: &str = "mlbtax";

/// URL of the first cut (in upstream order) no wider than `max_width`.
///
/// Upstream lists cuts widest first, so this is effectively "largest that fits", but
/// the rule is first-match: the order of `cuts` decides.
pub fn select_image(cuts: Option<&[ImageCut]>, max_width: u32) -> Option<String> {
    cuts?
        .iter()
        .filter(|c| c.width.is_some_and(|w| w <= max_width))
        .find_map(|c| c.src.clone())
}

/// Image URLs for the fanart / thumb / icon slots.
pub fn image_slots(cuts: Option<&[ImageCut]>) -> (Option<String>, Option<String>, Option<String>) {
    (
        select_image(cuts, FANART_WIDTH),
        select_image(cuts, THUMB_WIDTH),
        select_image(cuts, ICON_WIDTH),
    )
}

/// Parse a clock-style duration ("00:01:23", or "01:23" read as hours:minutes) into
/// seconds. Never defaults; callers decide what an unknown duration means.
pub fn parse_duration(text: &str) -> ApiResult<u32> {
    let text = text.trim();
    let time = NaiveTime::parse_from_str(text, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(text, "%H:%M"))
        .map_err(|e| ApiError::Format(format!("invalid duration {text:?}: {e}")))?;
    Ok(time.hour() * 3600 + time.minute() * 60 + time.second())
}

fn select_playback(playbacks: &[Playback]) -> Option<String> {
    let named = |name: &str| {
        playbacks
            .iter()
            .find(|p| p.name.as_deref() == Some(name))
            .and_then(|p| p.url.clone())
    };
    named(PLAYBACK_PRIMARY).or_else(|| named(PLAYBACK_LEGACY))
}

fn classify(raw: &HighlightItem, schema: SchemaVersion) -> ContentType {
    match schema {
        SchemaVersion::Legacy => {
            let taxonomy = raw
                .keywords_display
                .iter()
                .flatten()
                .find(|k| k.kind.as_deref() == Some(TAXONOMY_KEYWORD))
                .and_then(|k| k.value.as_deref());
            match taxonomy {
                Some("condensed_game") => ContentType::CondensedGame,
                Some("mlb_recap") => ContentType::Recap,
                _ => ContentType::Highlight,
            }
        }
        SchemaVersion::Current => match raw.slug.as_deref() {
            Some(slug) if slug.starts_with("cg-") => ContentType::CondensedGame,
            Some(slug) if slug.starts_with("recap-") => ContentType::Recap,
            _ => ContentType::Highlight,
        },
    }
}

/// Map one raw item. The result may have no URL; see [`collect_highlights`].
pub fn map_highlight(raw: &HighlightItem, schema: SchemaVersion) -> Highlight {
    let url = raw.playbacks.as_deref().and_then(select_playback);

    let duration_secs = match raw.duration.as_deref().map(parse_duration) {
        Some(Ok(secs)) => secs,
        Some(Err(e)) => {
            log::debug!("{e}; using 0");
            0
        }
        None => 0,
    };

    let cuts = raw.image.as_ref().and_then(|i| i.cuts.as_deref());
    let (fanart_url, thumb_url, icon_url) = image_slots(cuts);

    Highlight {
        url,
        title: raw.title.clone().unwrap_or_default(),
        description: raw.description.clone().unwrap_or_default(),
        short_description: raw.blurb.clone().unwrap_or_default(),
        duration_secs,
        fanart_url,
        thumb_url,
        icon_url,
        content_type: classify(raw, schema),
    }
}

/// Map every item, drop the unplayable ones, and put recap / condensed game up front.
pub fn collect_highlights(items: &[HighlightItem], schema: SchemaVersion) -> Vec<Highlight> {
    let mut highlights: Vec<Highlight> = items
        .iter()
        .map(|raw| map_highlight(raw, schema))
        .filter(Highlight::is_playable)
        .collect();
    order_highlights(&mut highlights);
    highlights
}

/// Two-pass move-to-front: first condensed game to index 0, then first recap to index 0.
/// Leaves `[Recap, CondensedGame, ...rest in source order]` when both exist.
pub fn order_highlights(highlights: &mut Vec<Highlight>) {
    move_first_to_front(highlights, ContentType::CondensedGame);
    move_first_to_front(highlights, ContentType::Recap);
}

fn move_first_to_front(highlights: &mut Vec<Highlight>, kind: ContentType) {
    if let Some(idx) = highlights.iter().position(|h| h.content_type == kind) {
        let item = highlights.remove(idx);
        highlights.insert(0, item);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statsapi::{Image, Keyword};

    fn cut(width: u32, src: &str) -> ImageCut {
        ImageCut { width: Some(width), src: Some(src.into()) }
    }

    fn playback(name: &str, url: &str) -> Playback {
        Playback { name: Some(name.into()), url: Some(url.into()) }
    }

    fn tagged(kind: ContentType, title: &str) -> Highlight {
        Highlight {
            url: Some(format!("https://video.example/{title}.mp4")),
            title: title.into(),
            content_type: kind,
            ..Default::default()
        }
    }

    fn kinds(highlights: &[Highlight]) -> Vec<char> {
        highlights.iter().map(|h| h.content_type.badge()).collect()
    }

    #[test]
    fn select_image_takes_first_cut_that_fits() {
        let cuts = vec![cut(1280, "a"), cut(640, "b"), cut(320, "c")];
        assert_eq!(select_image(Some(cuts.as_slice()), 960).as_deref(), Some("b"));
        assert_eq!(select_image(Some(cuts.as_slice()), 1920).as_deref(), Some("a"));
        assert_eq!(select_image(Some(cuts.as_slice()), 320).as_deref(), Some("c"));
    }

    #[test]
    fn select_image_is_first_match_not_closest() {
        let cuts = vec![cut(320, "small"), cut(900, "closer")];
        assert_eq!(select_image(Some(cuts.as_slice()), 960).as_deref(), Some("small"));
    }

    #[test]
    fn select_image_absent_when_nothing_fits() {
        let cuts = vec![cut(2048, "a"), cut(1280, "b")];
        assert_eq!(select_image(Some(cuts.as_slice()), 640), None);
        assert_eq!(select_image(Some(&[][..]), 640), None);
        assert_eq!(select_image(None, 640), None);
    }

    #[test]
    fn select_image_skips_cuts_without_width_or_src() {
        let cuts = vec![
            ImageCut { width: None, src: Some("nowidth".into()) },
            ImageCut { width: Some(100), src: None },
            cut(200, "ok"),
        ];
        assert_eq!(select_image(Some(cuts.as_slice()), 640).as_deref(), Some("ok"));
    }

    #[test]
    fn parse_duration_clock_strings() {
        assert_eq!(parse_duration("01:02:03").unwrap(), 3723);
        assert_eq!(parse_duration("00:00:45").unwrap(), 45);
        assert_eq!(parse_duration("00:15").unwrap(), 900);
    }

    #[test]
    fn parse_duration_rejects_garbage() {
        assert!(matches!(parse_duration("abc"), Err(ApiError::Format(_))));
        assert!(matches!(parse_duration(""), Err(ApiError::Format(_))));
        assert!(matches!(parse_duration("00:61:00"), Err(ApiError::Format(_))));
    }

    #[test]
    fn map_highlight_prefers_primary_playback() {
        let raw = HighlightItem {
            playbacks: Some(vec![
                playback("FLASH_2500K_1280X720", "https://legacy"),
                playback("mp4Avc", "https://primary"),
            ]),
            ..Default::default()
        };
        let h = map_highlight(&raw, SchemaVersion::Current);
        assert_eq!(h.url.as_deref(), Some("https://primary"));
    }

    #[test]
    fn map_highlight_falls_back_to_legacy_playback() {
        let raw = HighlightItem {
            playbacks: Some(vec![
                playback("hlsCloud", "https://hls"),
                playback("FLASH_2500K_1280X720", "https://legacy"),
            ]),
            ..Default::default()
        };
        let h = map_highlight(&raw, SchemaVersion::Current);
        assert_eq!(h.url.as_deref(), Some("https://legacy"));
    }

    #[test]
    fn map_highlight_defaults_missing_fields() {
        let raw = HighlightItem {
            duration: Some("not a time".into()),
            ..Default::default()
        };
        let h = map_highlight(&raw, SchemaVersion::Legacy);
        assert_eq!(h.url, None);
        assert_eq!(h.title, "");
        assert_eq!(h.description, "");
        assert_eq!(h.short_description, "");
        assert_eq!(h.duration_secs, 0);
        assert_eq!(h.thumb_url, None);
        assert_eq!(h.content_type, ContentType::Highlight);
    }

    #[test]
    fn map_highlight_fills_images_and_text() {
        let raw = HighlightItem {
            title: Some("Judge goes deep".into()),
            description: Some("Aaron Judge homers to left".into()),
            blurb: Some("Judge's 2-run shot".into()),
            duration: Some("00:00:38".into()),
            image: Some(Image {
                cuts: Some(vec![cut(2048, "xl"), cut(1920, "fan"), cut(960, "thumb"), cut(640, "icon")]),
            }),
            playbacks: Some(vec![playback("mp4Avc", "https://clip.mp4")]),
            ..Default::default()
        };
        let h = map_highlight(&raw, SchemaVersion::Current);
        assert_eq!(h.title, "Judge goes deep");
        assert_eq!(h.short_description, "Judge's 2-run shot");
        assert_eq!(h.duration_secs, 38);
        assert_eq!(h.fanart_url.as_deref(), Some("fan"));
        assert_eq!(h.thumb_url.as_deref(), Some("thumb"));
        assert_eq!(h.icon_url.as_deref(), Some("icon"));
    }

    #[test]
    fn legacy_schema_classifies_by_taxonomy_keyword() {
        let with_tax = |value: &str| HighlightItem {
            keywords_display: Some(vec![
                Keyword { kind: Some("team_id".into()), value: Some("147".into()) },
                Keyword { kind: Some("mlbtax".into()), value: Some(value.into()) },
            ]),
            slug: Some("recap-ignored-here".into()),
            ..Default::default()
        };
        assert_eq!(classify(&with_tax("condensed_game"), SchemaVersion::Legacy), ContentType::CondensedGame);
        assert_eq!(classify(&with_tax("mlb_recap"), SchemaVersion::Legacy), ContentType::Recap);
        assert_eq!(classify(&with_tax("home_run"), SchemaVersion::Legacy), ContentType::Highlight);
    }

    #[test]
    fn current_schema_classifies_by_slug_prefix() {
        let with_slug = |slug: &str| HighlightItem {
            slug: Some(slug.into()),
            keywords_display: Some(vec![Keyword {
                kind: Some("mlbtax".into()),
                value: Some("condensed_game".into()),
            }]),
            ..Default::default()
        };
        assert_eq!(classify(&with_slug("cg-nyy-bos-4-16"), SchemaVersion::Current), ContentType::CondensedGame);
        assert_eq!(classify(&with_slug("recap-nyy-bos"), SchemaVersion::Current), ContentType::Recap);
        assert_eq!(classify(&with_slug("judge-homers"), SchemaVersion::Current), ContentType::Highlight);
    }

    #[test]
    fn collect_drops_items_without_known_playback() {
        let items = vec![
            HighlightItem {
                title: Some("webm only".into()),
                playbacks: Some(vec![playback("WEBM", "https://clip.webm")]),
                ..Default::default()
            },
            HighlightItem { title: Some("no playbacks".into()), ..Default::default() },
            HighlightItem {
                title: Some("good".into()),
                playbacks: Some(vec![playback("mp4Avc", "https://clip.mp4")]),
                ..Default::default()
            },
        ];
        let highlights = collect_highlights(&items, SchemaVersion::Current);
        assert_eq!(highlights.len(), 1);
        assert_eq!(highlights[0].title, "good");
    }

    #[test]
    fn order_puts_recap_then_condensed_first() {
        let mut list = vec![
            tagged(ContentType::Highlight, "h1"),
            tagged(ContentType::CondensedGame, "c"),
            tagged(ContentType::Highlight, "h2"),
            tagged(ContentType::Recap, "r"),
        ];
        order_highlights(&mut list);
        assert_eq!(kinds(&list), vec!['R', 'C', 'H', 'H']);
        assert_eq!(list[2].title, "h1");
        assert_eq!(list[3].title, "h2");
    }

    #[test]
    fn order_with_only_recap() {
        let mut list = vec![tagged(ContentType::Highlight, "h"), tagged(ContentType::Recap, "r")];
        order_highlights(&mut list);
        assert_eq!(kinds(&list), vec!['R', 'H']);
    }

    #[test]
    fn order_with_only_condensed() {
        let mut list = vec![tagged(ContentType::Highlight, "h1"), tagged(ContentType::Highlight, "h2"), tagged(ContentType::CondensedGame, "c")];
        order_highlights(&mut list);
        assert_eq!(kinds(&list), vec!['C', 'H', 'H']);
        assert_eq!(list[1].title, "h1");
    }

    #[test]
    fn order_without_tagged_items_is_unchanged() {
        let mut list = vec![tagged(ContentType::Highlight, "a"), tagged(ContentType::Highlight, "b")];
        order_highlights(&mut list);
        assert_eq!(list[0].title, "a");
        assert_eq!(list[1].title, "b");
    }

    #[test]
    fn order_moves_only_the_first_of_duplicate_tags() {
        let mut list = vec![
            tagged(ContentType::Recap, "r1"),
            tagged(ContentType::Highlight, "h"),
            tagged(ContentType::CondensedGame, "c1"),
            tagged(ContentType::Recap, "r2"),
            tagged(ContentType::CondensedGame, "c2"),
        ];
        order_highlights(&mut list);
        let titles: Vec<&str> = list.iter().map(|h| h.title.as_str()).collect();
        assert_eq!(titles, vec!["r1", "c1", "h", "r2", "c2"]);
    }
}
