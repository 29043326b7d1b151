//! City and station segmentation.
//!
//! Timetables list a city name in capitals, followed by its stations in
//! ordinary case. Telling the two apart is a heuristic: the rule lives behind
//! [`CityNameClassifier`] so callers with other typesetting conventions can
//! swap it out.

use super::error::DirectionFault;

/// Decorations ignored when deciding whether a token is part of a city name.
pub const DECORATIONS: [char; 5] = ['-', '*', '\'', '.', '’'];

/// Decides whether a single token belongs to a city name.
pub trait CityNameClassifier {
    fn is_city_word(&self, token: &str) -> bool;
}

/// Accepts all-uppercase words, using Unicode case mapping.
///
/// Known misreads: upper-case station abbreviations ("ZI", "CHU") are taken
/// for city words, and city names typeset with lower-case particles
/// ("SAINT-JEAN-de-VÉDAS") are taken for stations. Words with no case at
/// all (CJK scripts, for instance) pass the case test and count as city
/// words.
#[derive(Debug, Default, Clone, Copy)]
pub struct UppercaseWord;

impl CityNameClassifier for UppercaseWord {
    fn is_city_word(&self, token: &str) -> bool {
        let bare: String = token.chars().filter(|c| !DECORATIONS.contains(c)).collect();
        if bare.parse::<i64>().is_ok() {
            return false;
        }
        bare.chars().any(char::is_alphabetic) && bare.to_uppercase() == bare
    }
}

/// A city and its stations in timetable order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CitySpot {
    pub city: String,
    pub stations: Vec<String>,
}

impl CitySpot {
    pub fn new(city: impl Into<String>) -> Self {
        CitySpot {
            city: city.into(),
            stations: Vec::new(),
        }
    }
}

/// Reads one city/station line into `cities`.
///
/// A leading run of city words opens a new city. Whatever follows the run,
/// or the whole line when there is no run, is a single station of the last
/// opened city.
pub fn parse_city_line(
    line: &str,
    cities: &mut Vec<CitySpot>,
    classifier: &dyn CityNameClassifier,
) -> Result<(), DirectionFault> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let run = tokens
        .iter()
        .take_while(|token| classifier.is_city_word(token))
        .count();

    if run > 0 {
        cities.push(CitySpot::new(tokens[..run].join(" ").replace('*', "")));
    }
    if run == tokens.len() {
        return Ok(());
    }

    let station = tokens[run..].join(" ");
    match cities.last_mut() {
        Some(spot) => {
            spot.stations.push(station);
            Ok(())
        }
        None => Err(DirectionFault::StationWithoutCity { station }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_all(lines: &[&str]) -> Result<Vec<CitySpot>, DirectionFault> {
        let mut cities = Vec::new();
        for line in lines {
            parse_city_line(line, &mut cities, &UppercaseWord)?;
        }
        Ok(cities)
    }

    #[test]
    fn test_uppercase_word() {
        let classifier = UppercaseWord;
        assert!(classifier.is_city_word("MONTPELLIER"));
        assert!(classifier.is_city_word("SÈTE"));
        assert!(classifier.is_city_word("CLERMONT-L'HÉRAULT"));
        assert!(classifier.is_city_word("ST.*"));
        assert!(!classifier.is_city_word("Gare"));
        assert!(!classifier.is_city_word("Védas"));
        assert!(!classifier.is_city_word("34"));
        assert!(!classifier.is_city_word("-12"));
        assert!(!classifier.is_city_word("/"));
        assert!(!classifier.is_city_word("*"));
    }

    #[test]
    fn test_cities_and_stations() {
        let cities = parse_all(&[
            "MONTPELLIER",
            "Place de France",
            "Odysseum",
            "SAINT JEAN DE VÉDAS*",
            "Centre",
        ])
        .unwrap();
        assert_eq!(
            cities,
            vec![
                CitySpot {
                    city: "MONTPELLIER".to_string(),
                    stations: vec!["Place de France".to_string(), "Odysseum".to_string()],
                },
                CitySpot {
                    city: "SAINT JEAN DE VÉDAS".to_string(),
                    stations: vec!["Centre".to_string()],
                },
            ]
        );
    }

    #[test]
    fn test_city_and_station_on_one_line() {
        let cities = parse_all(&["SÈTE Gare SNCF", "Mas Coulet"]).unwrap();
        assert_eq!(cities.len(), 1);
        assert_eq!(cities[0].city, "SÈTE");
        assert_eq!(cities[0].stations, vec!["Gare SNCF", "Mas Coulet"]);
    }

    #[test]
    fn test_city_run_starts_at_line_start() {
        // "SNCF" is upper case but does not lead the line
        let cities = parse_all(&["AGDE", "Gare   SNCF"]).unwrap();
        assert_eq!(cities.len(), 1);
        assert_eq!(cities[0].stations, vec!["Gare SNCF"]);
    }

    #[test]
    fn test_station_without_city() {
        assert_eq!(
            parse_all(&["Place de France"]),
            Err(DirectionFault::StationWithoutCity {
                station: "Place de France".to_string()
            })
        );
    }

    #[test]
    fn test_custom_classifier() {
        struct Known(&'static [&'static str]);
        impl CityNameClassifier for Known {
            fn is_city_word(&self, token: &str) -> bool {
                self.0.iter().any(|known| *known == token)
            }
        }

        let classifier = Known(&["Sète"]);
        let mut cities = Vec::new();
        parse_city_line("Sète", &mut cities, &classifier).unwrap();
        parse_city_line("ZI Nord", &mut cities, &classifier).unwrap();
        assert_eq!(cities[0].city, "Sète");
        assert_eq!(cities[0].stations, vec!["ZI Nord"]);
    }
}
