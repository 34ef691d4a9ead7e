use chrono::{Datelike, Local, NaiveDate};

/// Term tag for `date`: `ss<yy>` from April to September, otherwise
/// `ws<yy>` named after the year the winter term started in.
pub fn tag_for(date: NaiveDate) -> String {
    let year = date.year();
    match date.month() {
        4..=9 => format!("ss{:02}", year.rem_euclid(100)),
        10..=12 => format!("ws{:02}", year.rem_euclid(100)),
        _ => format!("ws{:02}", (year - 1).rem_euclid(100)),
    }
}

pub fn current() -> String {
    tag_for(Local::now().date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn summer_and_winter() {
        assert_eq!(tag_for(date(2024, 4, 1)), "ss24");
        assert_eq!(tag_for(date(2024, 9, 30)), "ss24");
        assert_eq!(tag_for(date(2024, 10, 1)), "ws24");
        assert_eq!(tag_for(date(2025, 2, 14)), "ws24");
        assert_eq!(tag_for(date(2000, 1, 1)), "ws99");
    }
}
