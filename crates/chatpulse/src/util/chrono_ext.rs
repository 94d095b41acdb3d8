use chrono::prelude::*;
use easy_ext::ext;

#[ext(DateTimeExt)]
pub(crate) impl DateTime<Utc> {
    /// Short month, day and 12-hour clock time, e.g. `Oct 19, 02:30 PM`.
    /// The timestamps in the digest are displayed in UTC.
    fn to_short_human_readable(&self) -> String {
        self.format("%b %-d, %I:%M %p").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use expect_test::expect;

    #[test]
    fn short_human_readable() {
        let test = |input: &str, expected: expect_test::Expect| {
            let date_time: DateTime<Utc> = input.parse().unwrap();
            expected.assert_eq(&date_time.to_short_human_readable());
        };

        test("2024-10-19T14:30:00Z", expect!["Oct 19, 02:30 PM"]);
        test("2024-01-05T00:07:59Z", expect!["Jan 5, 12:07 AM"]);
        test("2024-12-31T23:59:00Z", expect!["Dec 31, 11:59 PM"]);
    }
}
