use std::str::FromStr;
use tracing::warn;

use super::error::DecodeError;

/// Weekday abbreviations in the order a concatenated token is scanned.
pub const DAYS: [&str; 10] = ["L", "Ma", "Me", "J", "V", "S", "Sa", "D", "Di", "F"];

/// Range ("à") and list ("/") separators.
pub const SEPARATORS: [&str; 2] = ["/", "à"];

const LIST: &str = "/";

/// One element of a day group: a day, a composite day or a separator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayElement {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
    RestDay,
    SundayAndRestDay,
    Through,
    And,
}

impl FromStr for DayElement {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "L" => Ok(DayElement::Monday),
            "Ma" => Ok(DayElement::Tuesday),
            "Me" => Ok(DayElement::Wednesday),
            "J" => Ok(DayElement::Thursday),
            "V" => Ok(DayElement::Friday),
            // Saturday and Sunday are typeset both ways in timetables
            "S" | "Sa" => Ok(DayElement::Saturday),
            "D" | "Di" => Ok(DayElement::Sunday),
            "F" => Ok(DayElement::RestDay),
            "DF" => Ok(DayElement::SundayAndRestDay),
            "à" => Ok(DayElement::Through),
            "/" => Ok(DayElement::And),
            _ => Err(()),
        }
    }
}

impl DayElement {
    /// Circulation code fragment for this element.
    pub fn code(&self) -> &'static str {
        match self {
            DayElement::Monday => "1",
            DayElement::Tuesday => "2",
            DayElement::Wednesday => "3",
            DayElement::Thursday => "4",
            DayElement::Friday => "5",
            DayElement::Saturday => "6",
            DayElement::Sunday => "7",
            DayElement::RestDay => "r",
            DayElement::SundayAndRestDay => "7,r",
            DayElement::Through => "-",
            DayElement::And => ",",
        }
    }
}

/// The other spelling of a weekend day, if it has one.
fn synonym(day: &str) -> Option<&'static str> {
    match day {
        "S" => Some("Sa"),
        "Sa" => Some("S"),
        "D" => Some("Di"),
        "Di" => Some("D"),
        _ => None,
    }
}

fn is_separator(token: &str) -> bool {
    SEPARATORS.contains(&token)
}

/// Decodes a `days=` specification into one circulation code per column.
///
/// An input like `L à V LMaMeJ LàS` gives `["1-5", "1,2,3,4", "1-6"]`.
pub fn decode_days(spec: &str) -> Result<Vec<String>, DecodeError> {
    let tokens: Vec<&str> = spec
        .split(' ')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .collect();

    let mut codes = Vec::new();
    for group in group_tokens(&tokens)? {
        let group = trim_separators(group);
        if group.is_empty() {
            warn!("ignoring day group made of separators only in {spec:?}");
            continue;
        }
        codes.push(render(&group)?);
    }
    Ok(codes)
}

/// Splits tokens into day groups, one per schedule column.
fn group_tokens<'a>(tokens: &[&'a str]) -> Result<Vec<Vec<&'a str>>, DecodeError> {
    let mut groups = Vec::new();
    let mut k = 0;
    while k < tokens.len() {
        // "L à V": the separator sits in the middle of a three token window
        if tokens.get(k + 1).is_some_and(|next| is_separator(next)) {
            let end = (k + 3).min(tokens.len());
            groups.push(tokens[k..end].to_vec());
            k = end;
        } else {
            groups.push(split_token(tokens[k])?);
            k += 1;
        }
    }
    Ok(groups)
}

/// Expands a token with no surrounding spaces into group elements.
fn split_token(token: &str) -> Result<Vec<&str>, DecodeError> {
    if token.parse::<DayElement>().is_ok() {
        return Ok(vec![token]);
    }
    if let Some(sep) = SEPARATORS.into_iter().find(|sep| token.contains(sep)) {
        // "LàS" reads as "L à S"
        let mut group = Vec::new();
        for (i, part) in token.split(sep).enumerate() {
            if i > 0 {
                group.push(sep);
            }
            if !part.is_empty() {
                group.push(part);
            }
        }
        return Ok(group);
    }
    expand_concatenated(token)
}

/// Reads a run of abbreviations such as `LMaMeJ` as a list of days.
fn expand_concatenated(token: &str) -> Result<Vec<&'static str>, DecodeError> {
    let mut members: Vec<&'static str> = Vec::new();
    for day in DAYS {
        if !token.contains(day) {
            continue;
        }
        if synonym(day).is_some_and(|mate| members.contains(&mate)) {
            continue;
        }
        members.push(day);
    }
    if members.is_empty() {
        return Err(DecodeError::UnknownDays(token.to_string()));
    }

    let mut group = Vec::with_capacity(members.len() * 2 - 1);
    for (i, day) in members.into_iter().enumerate() {
        if i > 0 {
            group.push(LIST);
        }
        group.push(day);
    }
    Ok(group)
}

fn trim_separators(mut group: Vec<&str>) -> Vec<&str> {
    while group.last().is_some_and(|e| is_separator(e)) {
        group.pop();
    }
    let leading = group.iter().take_while(|e| is_separator(e)).count();
    group.drain(..leading);
    group
}

fn render(group: &[&str]) -> Result<String, DecodeError> {
    group
        .iter()
        .map(|element| {
            element
                .parse::<DayElement>()
                .map(|e| e.code())
                .map_err(|_| DecodeError::UnknownDays(element.to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_ranges() {
        assert_eq!(decode_days("L à V").unwrap(), vec!["1-5"]);
        assert_eq!(decode_days("L à S").unwrap(), vec!["1-6"]);
        assert_eq!(decode_days("LàS").unwrap(), vec!["1-6"]);
        assert_eq!(decode_days("L / Me").unwrap(), vec!["1,3"]);
    }

    #[test]
    fn test_decode_concatenated() {
        assert_eq!(decode_days("LMaMeJ").unwrap(), vec!["1,2,3,4"]);
        assert_eq!(decode_days("MaJ").unwrap(), vec!["2,4"]);
        assert_eq!(decode_days("L/Ma/Me").unwrap(), vec!["1,2,3"]);
    }

    #[test]
    fn test_decode_mixed_line() {
        assert_eq!(
            decode_days("L à V LMaMeJ LàS").unwrap(),
            vec!["1-5", "1,2,3,4", "1-6"]
        );
        assert_eq!(
            decode_days("  L à V   S   DF ").unwrap(),
            vec!["1-5", "6", "7,r"]
        );
    }

    #[test]
    fn test_weekend_synonyms_counted_once() {
        assert_eq!(decode_days("LSa").unwrap(), vec!["1,6"]);
        assert_eq!(decode_days("SaDi").unwrap(), vec!["6,7"]);
        assert_eq!(decode_days("Di").unwrap(), vec!["7"]);
        assert_eq!(decode_days("VSDF").unwrap(), vec!["5,6,7,r"]);
    }

    #[test]
    fn test_no_trailing_separator() {
        assert_eq!(decode_days("L à").unwrap(), vec!["1"]);
        assert_eq!(decode_days("Là").unwrap(), vec!["1"]);
        assert_eq!(decode_days("V /").unwrap(), vec!["5"]);
    }

    #[test]
    fn test_unknown_days() {
        assert_eq!(
            decode_days("L à V xyz"),
            Err(DecodeError::UnknownDays("xyz".to_string()))
        );
        assert_eq!(
            decode_days("L à Z"),
            Err(DecodeError::UnknownDays("Z".to_string()))
        );
    }

    #[test]
    fn test_empty_spec() {
        assert!(decode_days("").unwrap().is_empty());
    }
}
