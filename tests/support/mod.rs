#![allow(dead_code)]

use std::fmt::Write as _;

use three_point_story::api::{Presentation, PresentationConfig};
use three_point_story::data::{InMemorySource, SourceTable};
use three_point_story::render::NullRenderer;

pub fn season_label(year: i32) -> String {
    format!("{year}-{:02}", (year + 1) % 100)
}

/// League averages 1979-80 through 2024-25 plus a summary row without a
/// season year.
pub fn league_csv() -> String {
    let mut csv = String::from("Season,Lg,FGA,3PA,3P%\n");
    for year in 1979..=2024 {
        let offset = f64::from(year - 1979);
        let three_pa = 2.8 + offset * 0.75;
        let pct = 0.280 + offset * 0.002;
        let _ = writeln!(
            csv,
            "{},NBA,{:.1},{:.1},{:.3}",
            season_label(year),
            88.0 - offset * 0.1,
            three_pa,
            pct
        );
    }
    csv.push_str("Total,NBA,,,\n");
    csv
}

/// Per-game team table 2000-01 through 2024-25. The 2001-02 Suns row has
/// no minutes.
pub fn team_csv(base_attempts: f64, skip_minutes_year: Option<i32>) -> String {
    let mut csv = String::from("Season,Tm,3PA,3P%,MP\n");
    for year in 2000..=2024 {
        let offset = f64::from(year - 2000);
        let minutes = if skip_minutes_year == Some(year) {
            String::new()
        } else {
            "241.5".to_owned()
        };
        let _ = writeln!(
            csv,
            "{},X,{:.1},{:.3},{}",
            season_label(year),
            base_attempts + offset * 1.1,
            0.350 + offset * 0.001,
            minutes
        );
    }
    csv
}

pub const TEAM_STATS_CSV: &str = "season,team,x3pa_per_game,x3p_percent,x3p_per_game
2019,Old Team,30.0,0.350,10.5
2020,Houston Rockets,45.3,0.345,15.6
2020,Dallas Mavericks,41.3,0.367,15.1
2020,League Average,34.1,0.358,12.2
2021,Utah Jazz,43.0,0.389,16.7
2021,LA Clippers,34.0,0.411,14.3
2021,Milwaukee Bucks,37.1,0.389,14.4
2021,Golden State Warriors,39.4,0.376,14.8
2021,Brooklyn Nets,35.8,0.392,14.0
2021,Low Volume Club,25.0,0.450,11.3
2021,Houston Rockets,41.0,0.340,13.9
2021,League Average,34.6,0.367,12.7
2022,Minnesota Timberwolves,41.3,0.357,14.8
2022,Boston Celtics,40.0,0.356,14.2
2022,League,35.2,0.354,12.4
2024,Boston Celtics,42.5,0.388,16.5
";

pub const PLAYER_SHOOTING_CSV: &str = "season,player,fg_percent
2024,Stephen Curry,0.450
2025,Stephen Curry,0.448
2025,Luka Doncic,0.470
2025,Low Volume Guy,0.500
2025,No Pct Guy,0.410
2025,Traded Player,0.430
2025,Traded Player,0.430
2025,Missing Per Game,0.400
";

pub const PLAYER_PER_GAME_CSV: &str = "season,player,team,x3pa_per_game,x3p_percent,x3p_per_game,g,mp_per_game
2024,Stephen Curry,GSW,11.8,0.408,4.8,74,32.7
2025,Stephen Curry,GSW,11.7,0.397,4.6,70,32.2
2025,Luka Doncic,DAL,10.4,0.368,3.8,50,35.4
2025,Low Volume Guy,XYZ,2.0,0.500,1.0,40,12.0
2025,No Pct Guy,ABC,6.0,,2.4,60,30.0
2025,Traded Player,TOT,6.0,0.380,2.3,60,28.0
2025,Traded Player,BOS,5.0,0.370,1.9,30,27.0
";

pub fn full_source() -> InMemorySource {
    source_without(&[])
}

/// Source holding every table except `missing`.
pub fn source_without(missing: &[SourceTable]) -> InMemorySource {
    let tables = [
        (SourceTable::League, league_csv()),
        (SourceTable::Suns, team_csv(15.0, Some(2001))),
        (SourceTable::Warriors, team_csv(18.0, None)),
        (SourceTable::Rockets, team_csv(21.0, None)),
        (SourceTable::TeamStats, TEAM_STATS_CSV.to_owned()),
        (SourceTable::PlayerShooting, PLAYER_SHOOTING_CSV.to_owned()),
        (SourceTable::PlayerPerGame, PLAYER_PER_GAME_CSV.to_owned()),
    ];
    tables
        .into_iter()
        .filter(|(table, _)| !missing.contains(table))
        .fold(InMemorySource::new(), |source, (table, csv)| {
            source.with_csv(table, &csv).expect("fixture csv")
        })
}

/// Full source with `table` swapped for `csv`.
pub fn source_replacing(table: SourceTable, csv: &str) -> InMemorySource {
    source_without(&[table])
        .with_csv(table, csv)
        .expect("fixture csv")
}

pub fn presentation(source: InMemorySource) -> Presentation<NullRenderer, InMemorySource> {
    Presentation::new(NullRenderer::default(), source, PresentationConfig::default())
        .expect("presentation init")
}
