//! Helpers shared by the builtin tools.

use crate::services::Timeframe;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use daybook_protocol::ToolError;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Parse JSON args into a typed struct for tool calls.
pub(super) fn parse_args<T: DeserializeOwned>(args: Value) -> Result<T, ToolError> {
    serde_json::from_value(args).map_err(|err| ToolError::InvalidArguments(err.to_string()))
}

/// Parse a timeframe argument, rejecting unknown values.
pub(super) fn parse_timeframe(value: &str) -> Result<Timeframe, ToolError> {
    Timeframe::parse(value).ok_or_else(|| {
        ToolError::InvalidArguments(format!(
            "timeframe must be today, tomorrow, or week (got {value:?})"
        ))
    })
}

/// Parse an event timestamp in the user's offset.
///
/// Accepts RFC 3339, a local `YYYY-MM-DD HH:MM[:SS]`, or a bare date
/// (treated as midnight).
pub(super) fn parse_local_datetime(
    value: &str,
    offset: FixedOffset,
) -> Result<DateTime<FixedOffset>, ToolError> {
    let value = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Ok(parsed.with_timezone(&offset));
    }
    let naive = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M"))
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S"))
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M"))
        .or_else(|_| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .map(|date| date.and_time(NaiveTime::MIN))
        })
        .map_err(|_| ToolError::InvalidArguments(format!("unrecognized date: {value:?}")))?;
    naive
        .and_local_timezone(offset)
        .single()
        .ok_or_else(|| ToolError::InvalidArguments(format!("ambiguous date: {value:?}")))
}

/// Render a local timestamp for event and reminder summaries.
pub(super) fn display_time(instant: DateTime<FixedOffset>) -> String {
    instant.format("%Y-%m-%d %H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::{display_time, parse_local_datetime, parse_timeframe};
    use crate::services::Timeframe;
    use chrono::FixedOffset;
    use daybook_protocol::ToolError;
    use pretty_assertions::assert_eq;

    fn offset() -> FixedOffset {
        FixedOffset::east_opt(2 * 3600).expect("offset")
    }

    #[test]
    fn parse_timeframe_rejects_unknown_values() {
        assert_eq!(parse_timeframe("tomorrow").expect("ok"), Timeframe::Tomorrow);
        let err = parse_timeframe("next year").expect_err("rejected");
        assert!(matches!(err, ToolError::InvalidArguments(_)));
    }

    #[test]
    fn parse_local_datetime_accepts_common_shapes() {
        let with_offset =
            parse_local_datetime("2024-05-01T09:30:00+02:00", offset()).expect("rfc3339");
        assert_eq!(display_time(with_offset), "2024-05-01 09:30");

        let local = parse_local_datetime("2024-05-01 09:30", offset()).expect("local");
        assert_eq!(local, with_offset);

        let bare = parse_local_datetime("2024-05-01", offset()).expect("date");
        assert_eq!(display_time(bare), "2024-05-01 00:00");
    }

    #[test]
    fn parse_local_datetime_rejects_garbage() {
        let err = parse_local_datetime("next tuesday", offset()).expect_err("rejected");
        assert!(matches!(err, ToolError::InvalidArguments(_)));
    }
}
