use crate::table::EntityKind;

pub const TEAM_STATS_ENDPOINT: &str = "leaguedashteamstats";
pub const PLAYER_STATS_ENDPOINT: &str = "leaguedashplayerstats";
pub const LEAGUE_ID: &str = "00";

// stats.nba.com rejects requests without browser-like headers
pub const REQUEST_HEADERS: &[(&str, &str)] = &[
    (
        "User-Agent",
        "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36",
    ),
    ("Accept", "application/json, text/plain, */*"),
    ("Accept-Language", "en-US,en;q=0.9"),
    ("Origin", "https://www.nba.com"),
    ("Referer", "https://www.nba.com/"),
    ("x-nba-stats-origin", "stats"),
    ("x-nba-stats-token", "true"),
];

// Dashboard filters left at their "everything" values
pub const DEFAULT_QUERY: &[(&str, &str)] = &[
    ("MeasureType", "Base"),
    ("LastNGames", "0"),
    ("Month", "0"),
    ("OpponentTeamID", "0"),
    ("PaceAdjust", "N"),
    ("Period", "0"),
    ("PlusMinus", "N"),
    ("Rank", "N"),
    ("TeamID", "0"),
    ("DateFrom", ""),
    ("DateTo", ""),
    ("GameSegment", ""),
    ("Location", ""),
    ("Outcome", ""),
    ("SeasonSegment", ""),
    ("VsConference", ""),
    ("VsDivision", ""),
];

pub fn endpoint_for(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Team => TEAM_STATS_ENDPOINT,
        EntityKind::Player => PLAYER_STATS_ENDPOINT,
    }
}

pub fn stats_url(base_url: &str, kind: EntityKind) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), endpoint_for(kind))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_per_kind() {
        assert_eq!(
            stats_url("https://stats.nba.com/stats/", EntityKind::Team),
            "https://stats.nba.com/stats/leaguedashteamstats"
        );
        assert_eq!(
            stats_url("http://localhost", EntityKind::Player),
            "http://localhost/leaguedashplayerstats"
        );
    }
}
