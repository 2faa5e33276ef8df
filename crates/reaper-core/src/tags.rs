use crate::evaluate::parse_date;
use crate::{ReaperError, Result};
use chrono::NaiveDate;
use reaper_config::constants;
use reaper_provider::Tags;

/// Returns the value of the first tag whose key contains "expire", ignoring case.
pub fn find_expiration_key(tags: Option<&Tags>) -> Option<&str> {
    tags?
        .iter()
        .find(|(key, _)| {
            key.to_lowercase()
                .contains(constants::EXPIRE_TAG_FRAGMENT)
        })
        .map(|(_, value)| value.as_str())
}

/// Reads the `created` tag. `None` when the tag is missing.
pub fn find_created_date(tags: Option<&Tags>) -> Option<Result<NaiveDate>> {
    let value = tags?.get(constants::CREATED_TAG)?;
    Some(parse_created_date(value))
}

/// Accepts a bare date or an ISO timestamp; only the date part is kept.
pub fn parse_created_date(value: &str) -> Result<NaiveDate> {
    let date_part = value.split_once('T').map_or(value, |(date, _)| date);

    parse_date(date_part).ok_or_else(|| ReaperError::InvalidCreatedDate {
        value: value.to_string(),
    })
}
