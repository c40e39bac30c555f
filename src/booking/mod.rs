pub mod submission;
pub mod tokens;

pub use submission::{
    book_slot, cancel_by_token, cancel_range, validate_booking, BookingError, BookingRequest,
    CancelError,
};
pub use tokens::{generate_token, token_expiry, TOKEN_LIFETIME_HOURS};
