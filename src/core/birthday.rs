//! Birthday tracking in `DD-MM` form.
//!
//! Dates are validated against a leap year so `29-02` is accepted. Callers
//! persist with [`StateStore::save_birthdays`] after a change.

use crate::core::state::StateStore;
use crate::entities::UserId;
use crate::errors::{Error, Result};
use chrono::{Datelike, NaiveDate};

const LEAP_YEAR: i32 = 2000;

/// Parses a strict `DD-MM` string into (day, month)
pub fn parse_birthday(date: &str) -> Result<(u32, u32)> {
    let invalid = || Error::InvalidBirthday {
        date: date.to_string(),
    };

    let (day, month) = date.split_once('-').ok_or_else(invalid)?;
    if day.len() != 2 || month.len() != 2 {
        return Err(invalid());
    }
    if !day.chars().chain(month.chars()).all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }

    let day: u32 = day.parse().map_err(|_| invalid())?;
    let month: u32 = month.parse().map_err(|_| invalid())?;
    NaiveDate::from_ymd_opt(LEAP_YEAR, month, day).ok_or_else(invalid)?;
    Ok((day, month))
}

/// Formats a date as `DD-MM`
#[must_use]
pub fn format_birthday(date: NaiveDate) -> String {
    format!("{:02}-{:02}", date.day(), date.month())
}

/// Stores the user's birthday; an invalid date leaves the old value untouched
pub async fn set(state: &StateStore, user_id: UserId, date: &str) -> Result<()> {
    parse_birthday(date)?;
    state
        .birthdays
        .write()
        .await
        .insert(user_id, date.to_string());
    Ok(())
}

/// Removes the user's birthday. Returns false if none was set.
pub async fn remove(state: &StateStore, user_id: UserId) -> bool {
    state.birthdays.write().await.remove(&user_id).is_some()
}

/// The user's birthday, if set
pub async fn get(state: &StateStore, user_id: UserId) -> Option<String> {
    state.birthdays.read().await.get(&user_id).cloned()
}

/// Users whose birthday falls on `today`
pub async fn today_birthdays(state: &StateStore, today: NaiveDate) -> Vec<UserId> {
    let key = format_birthday(today);
    state
        .birthdays
        .read()
        .await
        .iter()
        .filter(|(_, date)| **date == key)
        .map(|(id, _)| *id)
        .collect()
}
