mod claims;
mod jwt;

pub use claims::{RoomClaims, VideoGrant};
pub use jwt::{AccessTokenIssuer, AccessTokenValidator, IssuedToken};
