//! Embed host catalog
//!
//! Each host knows how to build a player URL for a movie, or for a single
//! episode when a season and episode are given. Ids are TMDB ids.

/// Host used when none is selected or an unknown id is requested
pub const DEFAULT_HOST: &str = "vidsrc-pro";

/// URL layout of a host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UrlScheme {
    /// `{base}/movie/{id}` and `{base}/tv/{id}/{season}/{episode}`
    PathSegments { base: &'static str },
    /// `{movie}{id}` and `{tv}{id}&{season_key}={s}&{episode_key}={e}`
    QueryString {
        movie: &'static str,
        tv: &'static str,
        season_key: &'static str,
        episode_key: &'static str,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmbedHost {
    pub id: &'static str,
    pub name: &'static str,
    scheme: UrlScheme,
}

/// Season and episode of a series
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Episode {
    pub season: u32,
    pub episode: u32,
}

const HOSTS: &[EmbedHost] = &[
    EmbedHost {
        id: "vidsrc-pro",
        name: "VidSrc.pro",
        scheme: UrlScheme::PathSegments {
            base: "https://vidsrc.pro/embed",
        },
    },
    EmbedHost {
        id: "vidsrc-me",
        name: "VidSrc.me",
        scheme: UrlScheme::QueryString {
            movie: "https://vidsrc.me/embed/movie?tmdb=",
            tv: "https://vidsrc.me/embed/tv?tmdb=",
            season_key: "season",
            episode_key: "episode",
        },
    },
    EmbedHost {
        id: "vidsrc-cc",
        name: "VidSrc.cc",
        scheme: UrlScheme::PathSegments {
            base: "https://vidsrc.cc/v2/embed",
        },
    },
    EmbedHost {
        id: "autoembed",
        name: "AutoEmbed",
        scheme: UrlScheme::QueryString {
            movie: "https://autoembed.cc/embed/player.php?id=",
            tv: "https://autoembed.cc/embed/player.php?id=",
            season_key: "s",
            episode_key: "e",
        },
    },
    EmbedHost {
        id: "superembed",
        name: "SuperEmbed",
        scheme: UrlScheme::QueryString {
            movie: "https://superembed.stream/movie.php?tmdb=",
            tv: "https://superembed.stream/series.php?tmdb=",
            season_key: "s",
            episode_key: "e",
        },
    },
    EmbedHost {
        id: "2embed",
        name: "2Embed",
        scheme: UrlScheme::QueryString {
            movie: "https://2embed.org/embed/movie?tmdb=",
            tv: "https://2embed.org/embed/series?tmdb=",
            season_key: "s",
            episode_key: "e",
        },
    },
    EmbedHost {
        id: "smashystream",
        name: "SmashyStream",
        scheme: UrlScheme::QueryString {
            movie: "https://embed.smashystream.com/playere.php?tmdb=",
            tv: "https://embed.smashystream.com/playere.php?tmdb=",
            season_key: "s",
            episode_key: "e",
        },
    },
    EmbedHost {
        id: "vidsrc-nl",
        name: "VidSrc.nl",
        scheme: UrlScheme::PathSegments {
            base: "https://vidsrc.nl/embed",
        },
    },
];

impl EmbedHost {
    /// Player URL for a movie, or for an episode when one is given
    ///
    /// Season or episode 0 counts as no episode and yields the movie URL.
    pub fn url(&self, media_id: u64, episode: Option<Episode>) -> String {
        let episode = episode.filter(|ep| ep.season != 0 && ep.episode != 0);
        match (self.scheme, episode) {
            (UrlScheme::PathSegments { base }, None) => format!("{}/movie/{}", base, media_id),
            (UrlScheme::PathSegments { base }, Some(ep)) => {
                format!("{}/tv/{}/{}/{}", base, media_id, ep.season, ep.episode)
            }
            (UrlScheme::QueryString { movie, .. }, None) => format!("{}{}", movie, media_id),
            (
                UrlScheme::QueryString {
                    tv,
                    season_key,
                    episode_key,
                    ..
                },
                Some(ep),
            ) => format!(
                "{}{}&{}={}&{}={}",
                tv, media_id, season_key, ep.season, episode_key, ep.episode
            ),
        }
    }
}

/// All known hosts, in display order
pub fn hosts() -> &'static [EmbedHost] {
    HOSTS
}

/// Looks up a host by id, falling back to [`DEFAULT_HOST`]
pub fn host(id: &str) -> &'static EmbedHost {
    HOSTS
        .iter()
        .find(|h| h.id == id)
        .or_else(|| HOSTS.iter().find(|h| h.id == DEFAULT_HOST))
        .unwrap_or(&HOSTS[0])
}
