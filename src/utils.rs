use std::time::Duration;

use chrono::{Datelike, NaiveDate};
use indicatif::{ProgressBar, ProgressStyle};
use rand::Rng;

use crate::{
    clock::Clock,
    types::{Season, SeasonName},
};

pub const CHALLENGE_LEN: usize = 128;
pub const CHALLENGE_ALPHABET: &[u8] =
    b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ.-_~";

/// Generates a PKCE code challenge.
///
/// MyAnimeList only supports the `plain` challenge method, so the same value
/// doubles as the code verifier during the token exchange.
pub fn generate_code_challenge() -> String {
    let mut rng = rand::rng();
    (0..CHALLENGE_LEN)
        .map(|_| CHALLENGE_ALPHABET[rng.random_range(0..CHALLENGE_ALPHABET.len())] as char)
        .collect()
}

/// Season the given date falls in.
///
/// January to March is winter, April to June spring, July to September
/// summer and October to December fall.
pub fn get_current_season(date: NaiveDate) -> Season {
    let name = match date.month() {
        1..=3 => SeasonName::Winter,
        4..=6 => SeasonName::Spring,
        7..=9 => SeasonName::Summer,
        _ => SeasonName::Fall,
    };

    Season {
        name,
        year: date.year(),
    }
}

/// Season following the one the given date falls in. Fall rolls over into
/// winter of the next year.
pub fn get_next_season(date: NaiveDate) -> Season {
    let current = get_current_season(date);
    let name = current.name.next();
    let year = if name == SeasonName::Winter {
        current.year + 1
    } else {
        current.year
    };

    Season { name, year }
}

pub fn season_from_clock(clock: &dyn Clock, current: bool) -> Season {
    let today = clock.today();
    if current {
        get_current_season(today)
    } else {
        get_next_season(today)
    }
}

/// Spinner shown on stderr while network requests are in flight.
pub fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }
    pb
}
