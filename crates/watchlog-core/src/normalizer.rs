//! Filename to search-title heuristics.
//!
//! Release names follow loose scene conventions: title words joined by dots,
//! an optional year, then episode markers, source, resolution, codec and a
//! release group. The title is whatever precedes the first recognizable
//! marker, so each stage cuts the name at its first hit.

use regex::Regex;
use std::sync::LazyLock;
use watchlog_models::NormalizedTitle;

static EXTENSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\.(?:mkv|mp4|avi|mov|wmv|flv|webm|m4v|mpg|mpeg|m2ts|ts)$")
        .expect("extension regex should compile")
});

static SITE_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^www\.[^.\s]+\.[a-z]{2,4}\s*-\s*").expect("site prefix regex should compile")
});

static TRAILING_BRACKETS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:\s*\[[^\[\]]*\])+\s*$").expect("trailing bracket regex should compile")
});

static GROUP_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\S)-[A-Za-z0-9]+$").expect("group suffix regex should compile"));

static EPISODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?:^|[^a-z0-9])(s\d{1,2}[\s._-]?e\d{1,3}(?:[\s._-]?e\d{1,3})*|\d{1,2}x\d{2,3})(?:$|[^a-z0-9])",
    )
    .expect("episode regex should compile")
});

static SEASON: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:^|[^a-z0-9])(s\d{1,2}|season[\s._-]?\d{1,2})(?:$|[^a-z0-9])")
        .expect("season regex should compile")
});

static DIGIT_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+").expect("digit run regex should compile"));

static QUALITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?:^|[\s._\-\[\(])(?:\d{3,4}[pi]|4k|uhd|web-?dl|web-?rip|hd-?rip|br-?rip|bd-?rip|remux|blu-?ray|dvd-?rip|dvdscr|hdtv|pdtv|sdtv|hdcam|telesync|amzn|dsnp|hmax|atvp)(?:$|[\s._\-\]\)])",
    )
    .expect("quality regex should compile")
});

// Case-sensitive: these words only mark a release when written in capitals.
static RELEASE_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:^|[\s._\-\[\(])(?:WEB|HDR10\+?|HDR|DV|NF|PROPER|REPACK|INTERNAL|LIMITED|EXTENDED|UNRATED|REMASTERED|IMAX|MULTI|SUBBED|DUBBED)(?:$|[\s._\-\]\)])",
    )
    .expect("release tag regex should compile")
});

static CODEC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?:^|[\s._\-\[\(])(?:[xh][\s.]?26[45]|hevc|avc|xvid|divx|av1|vp9|10-?bit|8-?bit|e?ac-?3|aac(?:[\s.]?\d\.\d)?|ddp?[\s.]?\d\.\d|ddp|dd\+|dts(?:-hd)?(?:-ma)?|truehd|atmos|flac|mp3)(?:$|[\s._\-\]\)])",
    )
    .expect("codec regex should compile")
});

static BRACKET_GROUP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[[^\]]*\]|\([^)]*\)|\{[^}]*\}").expect("bracket group regex should compile")
});

static STRAY_BRACKET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\[\]\(\)\{\}]").expect("stray bracket regex should compile"));

static LOOSE_HYPHENS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"-{2,}|\s+-+|-+\s+|^-+|-+$").expect("hyphen regex should compile")
});

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace regex should compile"));

/// Cleans a download filename into a search title.
///
/// Pure and deterministic. The result may be empty or too short to search;
/// callers check [`NormalizedTitle::is_searchable`].
pub fn normalize(filename: &str) -> NormalizedTitle {
    let mut noisy = false;
    let mut name = strip_container(filename, &mut noisy);

    let mut is_episodic = false;
    name = cut_at_marker(&name, &EPISODE, &mut is_episodic);
    name = cut_at_marker(&name, &SEASON, &mut is_episodic);
    noisy |= is_episodic;

    // Bare years count only in release-style names; in a clean title such
    // as "Blade Runner 2049" the number belongs to the title.
    let release_style = noisy
        || name.contains(|c: char| c == '.' || c == '_')
        || [&*QUALITY, &*RELEASE_TAG, &*CODEC].iter().any(|p| p.is_match(&name));

    let mut year = None;
    if let Some((y, start)) = first_year(&name, release_style) {
        year = Some(y);
        name.truncate(start);
    }

    for pattern in [&*QUALITY, &*RELEASE_TAG, &*CODEC] {
        name = cut_at_token(&name, pattern, &mut noisy);
    }

    let name = BRACKET_GROUP.replace_all(&name, " ");
    let name = STRAY_BRACKET.replace_all(&name, " ");
    let name = name.replace(|c: char| c == '.' || c == '_', " ");
    let name = LOOSE_HYPHENS.replace_all(&name, " ");
    let title = WHITESPACE.replace_all(&name, " ").trim().to_string();

    NormalizedTitle {
        title,
        year,
        is_episodic,
    }
}

/// Drops path segments, the container extension, a leading site prefix,
/// trailing bracket tags and, on release-style names, the `-GROUP` suffix.
fn strip_container(filename: &str, noisy: &mut bool) -> String {
    let base = filename
        .rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .unwrap_or(filename)
        .trim();

    let mut name = base.to_string();
    for pattern in [&*EXTENSION, &*SITE_PREFIX, &*TRAILING_BRACKETS] {
        if let Some(range) = pattern.find(&name).map(|m| m.range()) {
            *noisy = true;
            name.replace_range(range, "");
        }
    }

    let has_release_markers = EPISODE.is_match(&name)
        || SEASON.is_match(&name)
        || QUALITY.is_match(&name)
        || RELEASE_TAG.is_match(&name)
        || CODEC.is_match(&name);
    if has_release_markers {
        // Keep the character before the hyphen.
        if let Some(end) = GROUP_SUFFIX.captures(&name).and_then(|c| c.get(1)).map(|m| m.end()) {
            name.truncate(end);
        }
    }
    name
}

/// Ends the title at the first episode or season marker in capture group 1.
/// A marker with nothing but separators before it is removed on its own.
fn cut_at_marker(text: &str, pattern: &Regex, found: &mut bool) -> String {
    let mut current = text.to_string();
    while let Some(range) = pattern
        .captures(&current)
        .and_then(|caps| caps.get(1))
        .map(|m| m.range())
    {
        *found = true;
        if has_title_text(&current[..range.start]) {
            current.truncate(range.start);
            break;
        }
        current.replace_range(range, " ");
    }
    current
}

/// Same rule as [`cut_at_marker`] for delimiter-bounded tokens: the match
/// includes its leading delimiter, so truncation drops it too.
fn cut_at_token(text: &str, pattern: &Regex, noisy: &mut bool) -> String {
    let mut current = text.to_string();
    while let Some(range) = pattern.find(&current).map(|m| m.range()) {
        *noisy = true;
        if has_title_text(&current[..range.start]) {
            current.truncate(range.start);
            break;
        }
        current.replace_range(range, " ");
    }
    current
}

/// The first 1900-2099 token, left to right, that follows some title text.
/// Bracketed years always qualify, bare ones only when `allow_bare`.
/// Returns the year and the byte offset where the title ends.
/// A leading year is part of the title ("1917", "2001 A Space Odyssey").
fn first_year(text: &str, allow_bare: bool) -> Option<(u32, usize)> {
    DIGIT_RUN
        .find_iter(text)
        .filter(|m| m.as_str().len() == 4)
        .filter_map(|m| {
            let before = text[..m.start()].chars().next_back();
            let after = text[m.end()..].chars().next();
            if before.is_some_and(char::is_alphanumeric) || after.is_some_and(char::is_alphanumeric) {
                return None;
            }
            let enclosed = matches!(before, Some('(' | '[' | '{')) && matches!(after, Some(')' | ']' | '}'));
            if !(enclosed || allow_bare) || !has_title_text(&text[..m.start()]) {
                return None;
            }
            let year: u32 = m.as_str().parse().ok()?;
            (1900..=2099).contains(&year).then_some((year, m.start()))
        })
        .next()
}

fn has_title_text(text: &str) -> bool {
    text.chars().any(char::is_alphanumeric)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn title(filename: &str) -> String {
        normalize(filename).title
    }

    #[test]
    fn test_episode_release_with_tracker_tag() {
        let result = normalize("Love.Island.US.S05E22.1080p.WEB.h264-EDITH[eztv.re].mkv");
        assert_eq!(result.title, "Love Island US");
        assert!(result.is_episodic);
        assert_eq!(result.year, None);
    }

    #[test]
    fn test_movie_release_with_year() {
        let result = normalize("The.Matrix.1999.1080p.BluRay.x264-GROUP.mkv");
        assert_eq!(result.title, "The Matrix");
        assert_eq!(result.year, Some(1999));
        assert!(!result.is_episodic);
    }

    #[test]
    fn test_parenthesized_year_extracted() {
        let result = normalize("Arrival (2016) [2160p] [BluRay] [5.1] [YTS.MX].mp4");
        assert_eq!(result.title, "Arrival");
        assert_eq!(result.year, Some(2016));

        let result = normalize("Dune Part Two (2024) 1080p WEBRip x265 10bit");
        assert_eq!(result.title, "Dune Part Two");
        assert_eq!(result.year, Some(2024));
    }

    #[test]
    fn test_parenthesized_year_property() {
        for year in [1900u32, 1955, 1999, 2000, 2024, 2099] {
            let result = normalize(&format!("Some Film ({}) 720p.mkv", year));
            assert_eq!(result.year, Some(year));
            assert!(!result.title.contains(&year.to_string()), "{}", result.title);
        }
    }

    #[test]
    fn test_out_of_range_parenthesized_number_not_a_year() {
        let result = normalize("Fahrenheit (1850).mkv");
        assert_eq!(result.year, None);
        assert_eq!(result.title, "Fahrenheit");
    }

    #[test]
    fn test_first_of_several_years_wins() {
        for name in ["Some.Film.1984.2010.720p.mkv", "Some.Film.1984.(2010).720p.mkv"] {
            let result = normalize(name);
            assert_eq!(result.year, Some(1984), "{}", name);
            assert_eq!(result.title, "Some Film", "{}", name);
        }

        let result = normalize("Blade Runner 2049 (2017) [2160p] [BluRay] [5.1] [YTS.MX].mp4");
        assert_eq!(result.year, Some(2049));
        assert_eq!(result.title, "Blade Runner");
    }

    #[test]
    fn test_clean_title_keeps_its_number() {
        let result = normalize("Blade Runner 2049");
        assert_eq!(result.title, "Blade Runner 2049");
        assert_eq!(result.year, None);
    }

    #[test]
    fn test_multibyte_character_before_group_suffix() {
        let result = normalize("Kodoku.no.Gurume.S01E01.1080p.中字-GRP.mkv");
        assert_eq!(result.title, "Kodoku no Gurume");
        assert!(result.is_episodic);

        let result = normalize("Parasite.2019.1080p.BluRay.한글-GRP.mkv");
        assert_eq!(result.title, "Parasite");
        assert_eq!(result.year, Some(2019));
    }

    #[test]
    fn test_episode_marker_variants() {
        for name in [
            "Severance.S02E01.2160p.ATVP.WEB-DL.DDP5.1.H.265-NTb.mkv",
            "Severance s2e1 720p.mkv",
            "Severance.2x01.HDTV.mkv",
            "Severance.S02E01E02.1080p.mkv",
            "Severance S02 E01 1080p.mkv",
        ] {
            let result = normalize(name);
            assert!(result.is_episodic, "{}", name);
            assert_eq!(result.title, "Severance", "{}", name);
        }
    }

    #[test]
    fn test_season_pack_is_episodic() {
        let result = normalize("The.Bear.S03.1080p.HULU.WEB-DL.DDP5.1.H.264-NTb");
        assert!(result.is_episodic);
        assert_eq!(result.title, "The Bear");

        let result = normalize("Fargo Season 5 Complete 720p");
        assert!(result.is_episodic);
        assert_eq!(result.title, "Fargo");
    }

    #[test]
    fn test_show_with_year_in_name() {
        let result = normalize("Doctor.Who.2005.S01E01.Rose.DVDRip.XviD.avi");
        assert!(result.is_episodic);
        assert_eq!(result.title, "Doctor Who");
        assert_eq!(result.year, Some(2005));
    }

    #[test]
    fn test_leading_year_is_title() {
        let result = normalize("1917.2019.1080p.BluRay.x264.mkv");
        assert_eq!(result.title, "1917");
        assert_eq!(result.year, Some(2019));

        let result = normalize("2001.A.Space.Odyssey.1968.REMASTERED.1080p.mkv");
        assert_eq!(result.title, "2001 A Space Odyssey");
        assert_eq!(result.year, Some(1968));
    }

    #[test]
    fn test_intraword_hyphen_kept() {
        assert_eq!(title("Spider-Man.No.Way.Home.2021.1080p.WEBRip.mkv"), "Spider-Man No Way Home");
        assert_eq!(title("Spider-Man"), "Spider-Man");
    }

    #[test]
    fn test_site_prefix_and_path_removed() {
        assert_eq!(
            title("downloads/www.Torrenting.com - Oppenheimer.2023.1080p.mkv"),
            "Oppenheimer"
        );
        assert_eq!(title(r"C:\media\Arrival.2016.720p.mkv"), "Arrival");
    }

    #[test]
    fn test_uppercase_tags_only_in_capitals() {
        assert_eq!(title("The.Proper.Way.2019.PROPER.720p.mkv"), "The Proper Way");
        assert_eq!(title("Limited Partners"), "Limited Partners");
    }

    #[test]
    fn test_underscores_and_brackets() {
        assert_eq!(title("[SubGroup]_Cowboy_Bebop_(1998)_[BD_1080p].mkv"), "Cowboy Bebop");
        assert_eq!(normalize("[SubGroup]_Cowboy_Bebop_(1998)_[BD_1080p].mkv").year, Some(1998));
    }

    #[test]
    fn test_sparse_names_yield_unsearchable_titles() {
        assert!(!normalize("").is_searchable());
        assert!(!normalize("[eztv].mkv").is_searchable());
        assert!(!normalize("1080p.x264.mkv").is_searchable());
        assert!(!normalize("S01E01.mkv").is_searchable());
    }

    #[test]
    fn test_case_preserved() {
        assert_eq!(title("the.office.us.s01e01.720p.mkv"), "the office us");
    }

    #[test]
    fn test_idempotent_on_clean_titles() {
        for name in [
            "Love.Island.US.S05E22.1080p.WEB.h264-EDITH[eztv.re].mkv",
            "The.Matrix.1999.1080p.BluRay.x264-GROUP.mkv",
            "Blade Runner 2049 (2017) [2160p].mp4",
            "Spider-Man.No.Way.Home.2021.1080p.WEBRip.mkv",
            "1917.2019.1080p.BluRay.x264.mkv",
        ] {
            let once = normalize(name).title;
            let twice = normalize(&once).title;
            assert_eq!(once.split_whitespace().collect::<Vec<_>>(), twice.split_whitespace().collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_deterministic() {
        let name = "Oppenheimer.2023.IMAX.2160p.UHD.BluRay.REMUX.HDR.HEVC.Atmos-FGT.mkv";
        assert_eq!(normalize(name), normalize(name));
        assert_eq!(normalize(name).title, "Oppenheimer");
    }
}
