//! One-time password issuance and verification.
//!
//! The logic here is pure: it operates on an [`OtpChallenge`] value and an
//! explicit `now`, so the whole state machine (empty -> pending -> empty)
//! is testable without a database. The manager persists the challenge on
//! the account row and clears it on successful verification.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use subtle::ConstantTimeEq;

use super::models::OtpChallenge;

/// Number of digits in a code.
pub const OTP_LENGTH: usize = 6;

/// Minutes a code stays valid after issuance.
pub const OTP_TTL_MINUTES: i64 = 3;

/// Why a submitted code was rejected. Collapsed to a single
/// `AuthError::InvalidOtp` before leaving the crate; kept internally for
/// security-event logging only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OtpRejection {
    NoPendingChallenge,
    Expired,
    Mismatch,
}

impl OtpRejection {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            OtpRejection::NoPendingChallenge => "no_pending_challenge",
            OtpRejection::Expired => "expired",
            OtpRejection::Mismatch => "mismatch",
        }
    }
}

/// Issue a fresh challenge: a uniformly random six-digit code (leading
/// zeros allowed, so the value space is 000000-999999) expiring
/// [`OTP_TTL_MINUTES`] from `now`. Replaces any pending challenge.
pub fn issue(now: DateTime<Utc>) -> OtpChallenge {
    let code = rand::rng().random_range(0..1_000_000u32);
    OtpChallenge {
        code: format!("{code:06}"),
        expires_at: now + Duration::minutes(OTP_TTL_MINUTES),
    }
}

/// Verify a submitted code against the pending challenge, if any.
///
/// Succeeds only when a challenge is pending, `now` is strictly before its
/// expiry, and the submitted code matches exactly. Codes are compared as
/// strings (preserving leading zeros) in constant time.
pub(crate) fn verify(
    challenge: Option<&OtpChallenge>,
    submitted: &str,
    now: DateTime<Utc>,
) -> Result<(), OtpRejection> {
    let challenge = challenge.ok_or(OtpRejection::NoPendingChallenge)?;

    if now >= challenge.expires_at {
        return Err(OtpRejection::Expired);
    }

    if challenge.code.as_bytes().ct_eq(submitted.as_bytes()).into() {
        Ok(())
    } else {
        Err(OtpRejection::Mismatch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn challenge(code: &str, now: DateTime<Utc>) -> OtpChallenge {
        OtpChallenge {
            code: code.to_string(),
            expires_at: now + Duration::minutes(OTP_TTL_MINUTES),
        }
    }

    #[test]
    fn issued_codes_are_six_digits() {
        let now = Utc::now();
        for _ in 0..200 {
            let otp = issue(now);
            assert_eq!(otp.code.len(), OTP_LENGTH);
            assert!(otp.code.chars().all(|c| c.is_ascii_digit()));
            assert_eq!(otp.expires_at, now + Duration::minutes(OTP_TTL_MINUTES));
        }
    }

    #[test]
    fn exact_code_verifies_before_expiry() {
        let now = Utc::now();
        let otp = challenge("483920", now);
        assert!(verify(Some(&otp), "483920", now).is_ok());
        // Any instant strictly before expiry is still valid.
        let last_valid = otp.expires_at - Duration::seconds(1);
        assert!(verify(Some(&otp), "483920", last_valid).is_ok());
    }

    #[test]
    fn boundary_codes_verify() {
        // Leading zeros are legal code values and must survive the string
        // comparison untouched.
        let now = Utc::now();
        let low = challenge("000000", now);
        let high = challenge("999999", now);
        assert!(verify(Some(&low), "000000", now).is_ok());
        assert!(verify(Some(&high), "999999", now).is_ok());
        assert_eq!(verify(Some(&low), "0", now), Err(OtpRejection::Mismatch));
    }

    #[test]
    fn missing_challenge_is_rejected() {
        assert_eq!(
            verify(None, "123456", Utc::now()),
            Err(OtpRejection::NoPendingChallenge)
        );
    }

    #[test]
    fn expired_code_is_rejected() {
        let now = Utc::now();
        let otp = challenge("123456", now);
        assert_eq!(
            verify(Some(&otp), "123456", otp.expires_at),
            Err(OtpRejection::Expired)
        );
        assert_eq!(
            verify(Some(&otp), "123456", otp.expires_at + Duration::minutes(5)),
            Err(OtpRejection::Expired)
        );
    }

    #[test]
    fn wrong_code_is_rejected() {
        let now = Utc::now();
        let otp = challenge("123456", now);
        assert_eq!(
            verify(Some(&otp), "654321", now),
            Err(OtpRejection::Mismatch)
        );
    }

    #[test]
    fn numeric_equivalence_is_not_enough() {
        // "123" vs "000123" would compare equal numerically; string
        // comparison must reject it.
        let now = Utc::now();
        let otp = challenge("000123", now);
        assert_eq!(verify(Some(&otp), "123", now), Err(OtpRejection::Mismatch));
    }

    #[test]
    fn reissue_replaces_pending_challenge() {
        let now = Utc::now();
        let first = challenge("111111", now);
        let second = issue(now + Duration::seconds(30));
        // Only the latest challenge counts; at most one is live per account.
        assert!(verify(Some(&second), &second.code, now + Duration::seconds(31)).is_ok());
        assert_ne!(first.expires_at, second.expires_at);
    }
}
