//! Share token generation, link URLs and expiry arithmetic.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Days, LocalResult, Offset, TimeDelta, TimeZone, Utc};
use rand::RngCore;
use rand::rngs::OsRng;

use vault_core::error::AppError;
use vault_core::result::AppResult;

/// Random bytes per share token (256 bits).
const TOKEN_BYTES: usize = 32;

/// Generates share tokens and the URLs that carry them.
#[derive(Debug, Clone)]
pub struct LinkService {
    public_origin: String,
}

impl LinkService {
    /// Creates a link service for the given public origin.
    pub fn new(public_origin: &str) -> Self {
        Self {
            public_origin: public_origin.trim_end_matches('/').to_string(),
        }
    }

    /// Generates a token from the OS CSPRNG, base64url-encoded without
    /// padding.
    pub fn generate_token(&self) -> String {
        let mut bytes = [0u8; TOKEN_BYTES];
        OsRng.fill_bytes(&mut bytes);
        URL_SAFE_NO_PAD.encode(bytes)
    }

    /// The public URL for a token: `{origin}/shared/{token}`.
    pub fn share_url(&self, token: &str) -> String {
        format!("{}/shared/{token}", self.public_origin)
    }
}

/// `now` plus `days` calendar days in `now`'s time zone, so the expiry keeps
/// the same wall-clock time across DST changes.
///
/// A wall-clock time repeated by a fall-back transition resolves to its
/// earliest instant. One skipped by a spring-forward transition is read with
/// the offset in force before the skip, landing just after it.
pub fn expiry_after_days<Tz: TimeZone>(now: DateTime<Tz>, days: u32) -> AppResult<DateTime<Utc>> {
    let overflow = || AppError::validation(format!("Cannot add {days} days to the current time"));
    let tz = now.timezone();
    let target = now
        .naive_local()
        .checked_add_days(Days::new(u64::from(days)))
        .ok_or_else(overflow)?;

    match tz.from_local_datetime(&target) {
        LocalResult::Single(expires) | LocalResult::Ambiguous(expires, _) => {
            Ok(expires.with_timezone(&Utc))
        }
        LocalResult::None => {
            let before = target
                .checked_sub_signed(TimeDelta::days(1))
                .ok_or_else(overflow)?;
            let offset = tz
                .offset_from_local_datetime(&before)
                .earliest()
                .ok_or_else(overflow)?
                .fix();
            let utc = target
                .checked_sub_signed(TimeDelta::seconds(i64::from(offset.local_minus_utc())))
                .ok_or_else(overflow)?;
            Ok(utc.and_utc())
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use chrono::{FixedOffset, NaiveDate};
    use chrono_tz::America::New_York;

    #[test]
    fn test_token_shape_and_uniqueness() {
        let links = LinkService::new("https://vault.example.com");
        let tokens: HashSet<String> = (0..1000).map(|_| links.generate_token()).collect();

        assert_eq!(tokens.len(), 1000);
        for token in &tokens {
            assert_eq!(token.len(), 43);
            assert!(
                token
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
            );
        }
    }

    #[test]
    fn test_share_url() {
        let links = LinkService::new("https://vault.example.com/");
        assert_eq!(
            links.share_url("abc"),
            "https://vault.example.com/shared/abc"
        );
    }

    #[test]
    fn test_expiry_is_calendar_days() {
        let tz = FixedOffset::east_opt(2 * 3600).unwrap();
        let now = tz
            .from_local_datetime(
                &NaiveDate::from_ymd_opt(2024, 2, 27)
                    .unwrap()
                    .and_hms_opt(18, 30, 0)
                    .unwrap(),
            )
            .single()
            .unwrap();

        let expires = expiry_after_days(now, 7).unwrap();
        assert_eq!(expires.with_timezone(&tz).to_rfc3339(), "2024-03-05T18:30:00+02:00");
        assert_eq!(expires.to_rfc3339(), "2024-03-05T16:30:00+00:00");
    }

    #[test]
    fn test_expiry_keeps_wall_clock_across_dst() {
        let now = New_York.with_ymd_and_hms(2024, 3, 5, 12, 0, 0).single().unwrap();

        let expires = expiry_after_days(now, 7).unwrap();
        assert_eq!(
            expires.with_timezone(&New_York).to_rfc3339(),
            "2024-03-12T12:00:00-04:00"
        );
        assert_eq!(expires.to_rfc3339(), "2024-03-12T16:00:00+00:00");
    }

    #[test]
    fn test_expiry_inside_spring_forward_gap() {
        // 2024-03-10 02:30 does not exist in New York.
        let now = New_York.with_ymd_and_hms(2024, 3, 3, 2, 30, 0).single().unwrap();

        let expires = expiry_after_days(now, 7).unwrap();
        assert_eq!(expires.to_rfc3339(), "2024-03-10T07:30:00+00:00");
        assert_eq!(
            expires.with_timezone(&New_York).to_rfc3339(),
            "2024-03-10T03:30:00-04:00"
        );
    }

    #[test]
    fn test_expiry_inside_fall_back_overlap_takes_earliest() {
        // 2024-11-03 01:30 occurs twice in New York.
        let now = New_York.with_ymd_and_hms(2024, 10, 27, 1, 30, 0).single().unwrap();

        let expires = expiry_after_days(now, 7).unwrap();
        assert_eq!(expires.to_rfc3339(), "2024-11-03T05:30:00+00:00");
        assert_eq!(
            expires.with_timezone(&New_York).to_rfc3339(),
            "2024-11-03T01:30:00-04:00"
        );
    }

    #[test]
    fn test_expiry_overflow_is_validation_error() {
        let err = expiry_after_days(DateTime::<Utc>::MAX_UTC, 1).unwrap_err();
        assert!(err.message.contains("Cannot add 1 days"));
    }
}
