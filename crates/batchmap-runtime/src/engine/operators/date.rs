//! Date parsing for `TO_DATE`
//!
//! Formats are either chrono strftime patterns (anything containing `%`) or
//! Java-style patterns as used by the configuration UI (`yyyy-MM-dd`,
//! `dd/MM/yyyy HH:mm:ss`). Quoted text in a Java pattern (`'T'`) is literal.

use crate::error::{EvalError, Result};
use chrono::{NaiveDate, NaiveDateTime};

const ISO_DATE: &str = "%Y-%m-%d";
const ISO_DATE_TIME: &str = "%Y-%m-%dT%H:%M:%S";

/// Parse `input` with `format`, returning an ISO-8601 date or date-time string
pub(crate) fn parse_date(input: &str, format: &str) -> Result<String> {
    let pattern = to_strftime(format);
    let trimmed = input.trim();

    if let Ok(date_time) = NaiveDateTime::parse_from_str(trimmed, &pattern) {
        return Ok(date_time.format(ISO_DATE_TIME).to_string());
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, &pattern) {
        return Ok(date.format(ISO_DATE).to_string());
    }

    tracing::debug!("'{}' does not match date pattern '{}'", input, pattern);
    Err(EvalError::date_parse(input, format))
}

/// Translate a Java-style pattern to strftime; `%` patterns pass through
pub(crate) fn to_strftime(format: &str) -> String {
    if format.contains('%') {
        return format.to_string();
    }

    let chars: Vec<char> = format.chars().collect();
    let mut out = String::with_capacity(format.len() * 2);
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if c == '\'' {
            // quoted literal; '' is a single quote
            i += 1;
            while i < chars.len() {
                if chars[i] == '\'' {
                    if chars.get(i + 1) == Some(&'\'') {
                        out.push('\'');
                        i += 2;
                        continue;
                    }
                    break;
                }
                out.push(chars[i]);
                i += 1;
            }
            i += 1;
            continue;
        }

        if !c.is_ascii_alphabetic() {
            out.push(c);
            i += 1;
            continue;
        }

        let run = chars[i..].iter().take_while(|&&x| x == c).count();
        let directive = match (c, run) {
            ('y', 2) => "%y",
            ('y', _) => "%Y",
            ('M', 1 | 2) => "%m",
            ('M', 3) => "%b",
            ('M', _) => "%B",
            ('d', _) => "%d",
            ('H', _) => "%H",
            ('h', _) => "%I",
            ('m', _) => "%M",
            ('s', _) => "%S",
            ('S', _) => "%3f",
            ('a', _) => "%p",
            ('E', 1..=3) => "%a",
            ('E', _) => "%A",
            _ => "",
        };

        if directive.is_empty() {
            // unknown letters are literal text
            out.extend(std::iter::repeat(c).take(run));
        } else {
            out.push_str(directive);
        }
        i += run;
    }

    out
}
