//! Country-name location resolution for the bubble map.
//!
//! Approximate geographic centroids (latitude, longitude) keyed by the
//! English short names used in the dataset, plus a few common aliases.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

const CENTROIDS: &[(&str, f64, f64)] = &[
    ("Afghanistan", 33.9, 67.7),
    ("Albania", 41.2, 20.2),
    ("Algeria", 28.0, 1.7),
    ("American Samoa", -14.3, -170.7),
    ("Andorra", 42.5, 1.6),
    ("Argentina", -38.4, -63.6),
    ("Armenia", 40.1, 45.0),
    ("Australia", -25.3, 133.8),
    ("Austria", 47.5, 14.6),
    ("Bahamas", 25.0, -77.4),
    ("Bangladesh", 23.7, 90.4),
    ("Belarus", 53.7, 27.9),
    ("Belgium", 50.5, 4.5),
    ("Bolivia", -16.3, -63.6),
    ("Bosnia and Herzegovina", 43.9, 17.7),
    ("Brazil", -14.2, -51.9),
    ("Bulgaria", 42.7, 25.5),
    ("Cameroon", 7.4, 12.4),
    ("Canada", 56.1, -106.3),
    ("Central African Republic", 6.6, 20.9),
    ("Chile", -35.7, -71.5),
    ("China", 35.9, 104.2),
    ("Colombia", 4.6, -74.3),
    ("Costa Rica", 9.7, -83.8),
    ("Croatia", 45.1, 15.2),
    ("Cyprus", 35.1, 33.4),
    ("Czech Republic", 49.8, 15.5),
    ("Denmark", 56.3, 9.5),
    ("Dominican Republic", 18.7, -70.2),
    ("Ecuador", -1.8, -78.2),
    ("Egypt", 26.8, 30.8),
    ("El Salvador", 13.8, -88.9),
    ("Estonia", 58.6, 25.0),
    ("Ethiopia", 9.1, 40.5),
    ("Finland", 61.9, 25.7),
    ("France", 46.2, 2.2),
    ("Georgia", 42.3, 43.4),
    ("Germany", 51.2, 10.5),
    ("Ghana", 7.9, -1.0),
    ("Gibraltar", 36.1, -5.4),
    ("Greece", 39.1, 21.8),
    ("Guatemala", 15.8, -90.2),
    ("Honduras", 15.2, -86.2),
    ("Hong Kong", 22.4, 114.1),
    ("Hungary", 47.2, 19.5),
    ("Iceland", 64.9, -19.0),
    ("India", 20.6, 79.0),
    ("Indonesia", -0.8, 113.9),
    ("Iran", 32.4, 53.7),
    ("Iraq", 33.2, 43.7),
    ("Ireland", 53.4, -8.2),
    ("Isle of Man", 54.2, -4.5),
    ("Israel", 31.0, 34.9),
    ("Italy", 41.9, 12.6),
    ("Jamaica", 18.1, -77.3),
    ("Japan", 36.2, 138.3),
    ("Jersey", 49.2, -2.1),
    ("Jordan", 30.6, 36.2),
    ("Kazakhstan", 48.0, 66.9),
    ("Kenya", 0.0, 37.9),
    ("Kuwait", 29.3, 47.5),
    ("Latvia", 56.9, 24.6),
    ("Lebanon", 33.9, 35.9),
    ("Lithuania", 55.2, 23.9),
    ("Luxembourg", 49.8, 6.1),
    ("Malaysia", 4.2, 102.0),
    ("Malta", 35.9, 14.4),
    ("Mauritius", -20.3, 57.6),
    ("Mexico", 23.6, -102.6),
    ("Moldova", 47.4, 28.4),
    ("Morocco", 31.8, -7.1),
    ("Nepal", 28.4, 84.1),
    ("Netherlands", 52.1, 5.3),
    ("New Zealand", -40.9, 174.9),
    ("Nigeria", 9.1, 8.7),
    ("North Macedonia", 41.6, 21.7),
    ("Norway", 60.5, 8.5),
    ("Oman", 21.5, 55.9),
    ("Pakistan", 30.4, 69.3),
    ("Panama", 8.5, -80.8),
    ("Peru", -9.2, -75.0),
    ("Philippines", 12.9, 121.8),
    ("Poland", 51.9, 19.1),
    ("Portugal", 39.4, -8.2),
    ("Puerto Rico", 18.2, -66.6),
    ("Qatar", 25.4, 51.2),
    ("Romania", 45.9, 25.0),
    ("Russia", 61.5, 105.3),
    ("Saudi Arabia", 23.9, 45.1),
    ("Serbia", 44.0, 21.0),
    ("Singapore", 1.4, 103.8),
    ("Slovakia", 48.7, 19.7),
    ("Slovenia", 46.2, 15.0),
    ("South Africa", -30.6, 22.9),
    ("South Korea", 35.9, 127.8),
    ("Spain", 40.5, -3.7),
    ("Sri Lanka", 7.9, 80.8),
    ("Sweden", 60.1, 18.6),
    ("Switzerland", 46.8, 8.2),
    ("Taiwan", 23.7, 121.0),
    ("Thailand", 15.9, 101.0),
    ("Tunisia", 33.9, 9.5),
    ("Turkey", 39.0, 35.2),
    ("Uganda", 1.4, 32.3),
    ("Ukraine", 48.4, 31.2),
    ("United Arab Emirates", 23.4, 53.8),
    ("United Kingdom", 55.4, -3.4),
    ("United States", 37.1, -95.7),
    ("Uruguay", -32.5, -55.8),
    ("Uzbekistan", 41.4, 64.6),
    ("Venezuela", 6.4, -66.6),
    ("Vietnam", 14.1, 108.3),
    ("Zimbabwe", -19.0, 29.2),
];

const ALIASES: &[(&str, &str)] = &[
    ("USA", "United States"),
    ("US", "United States"),
    ("United States of America", "United States"),
    ("UK", "United Kingdom"),
    ("Great Britain", "United Kingdom"),
    ("Czechia", "Czech Republic"),
    ("Korea, Republic of", "South Korea"),
    ("Republic of Korea", "South Korea"),
    ("Russian Federation", "Russia"),
    ("Viet Nam", "Vietnam"),
    ("Türkiye", "Turkey"),
    ("Turkiye", "Turkey"),
    ("Iran, Islamic Republic of", "Iran"),
    ("Moldova, Republic of", "Moldova"),
    ("Bolivia, Plurinational State of", "Bolivia"),
    ("Hong Kong SAR", "Hong Kong"),
];

/// Centroid of a country given by name; case-insensitive, with aliases.
pub fn resolve_country(name: &str) -> Option<GeoPoint> {
    let name = name.trim();
    let canonical = ALIASES
        .iter()
        .find(|(alias, _)| alias.eq_ignore_ascii_case(name))
        .map_or(name, |(_, target)| *target);

    CENTROIDS
        .iter()
        .find(|(country, _, _)| country.eq_ignore_ascii_case(canonical))
        .map(|&(_, lat, lon)| GeoPoint { lat, lon })
}
