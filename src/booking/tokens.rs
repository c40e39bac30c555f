use chrono::{DateTime, Duration, Utc};
use rand::{distributions::Alphanumeric, Rng};

/// How long a cancellation token stays usable after booking
pub const TOKEN_LIFETIME_HOURS: i64 = 48;

const TOKEN_LENGTH: usize = 32;

/// Generates an alphanumeric cancellation token
pub fn generate_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LENGTH)
        .map(char::from)
        .collect()
}

/// Expiry timestamp for a token issued at `now`
pub fn token_expiry(now: DateTime<Utc>) -> DateTime<Utc> {
    now + Duration::hours(TOKEN_LIFETIME_HOURS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_shape() {
        let token = generate_token();
        assert_eq!(token.len(), TOKEN_LENGTH);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_tokens_are_not_repeated() {
        assert_ne!(generate_token(), generate_token());
    }

    #[test]
    fn test_expiry_is_after_issue() {
        let now = Utc::now();
        assert!(token_expiry(now) > now);
    }
}
