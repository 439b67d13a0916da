//! Donation centers for Open Donate.
//!
//! - [`model`]: center records and the donation categories
//! - [`catalog`]: the read-only center catalog (built-in or loaded from JSON)
//! - [`matcher`]: district, neighborhood, category and proximity filters plus
//!   the exact-then-nearby selection policy
//! - [`stats`]: deterministic placeholder donation figures
//!
//! # Example
//!
//! ```
//! use opendonate_centers::{matcher, Catalog};
//! use opendonate_geo::Coordinate;
//!
//! let catalog = Catalog::builtin();
//! let selection = matcher::select(
//!     catalog.centers(),
//!     "강남구",
//!     "역삼동",
//!     &Coordinate::new(37.5665, 127.0018),
//!     5.0,
//! );
//! assert_eq!(selection.centers[0].id, "1");
//! ```

pub mod catalog;
pub mod matcher;
pub mod model;
pub mod stats;

pub use catalog::Catalog;
pub use matcher::{MatchTier, Selection};
pub use model::{Category, DonationCenter, LatestPost};
pub use stats::{center_mock_donation, seeded_pseudo_stat, CenterDonations, PseudoStat};
