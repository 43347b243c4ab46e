//! Card system: generated assets and the cards built from them.
//!
//! ## Key Types
//!
//! - `ImageRef`: Opaque reference to a displayable image
//! - `Asset`: Label plus image, produced by an asset provider
//! - `CardId`: `card-<pair>-<a|b>` identifier
//! - `Card`: Runtime card state (face-up, matched)

pub mod asset;
pub mod card;

pub use asset::{Asset, ImageRef};
pub use card::{Card, CardId, PairSide};
