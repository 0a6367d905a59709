//! Ingestion profiles.
//!
//! A profile is a TOML file holding a [`CanonicalSchema`](ship_model::CanonicalSchema),
//! the rules to validate it with, and normalization and mapping options.
//! Two profiles are built in: `shipment` for parcel exports and `fixture`
//! for tanker fixture lists. More can be placed in the directory named by
//! `SHIP_PROFILE_DIR`.

pub mod embedded;
pub mod error;
pub mod profile;
pub mod registry;

pub use embedded::{BUILTIN_PROFILES, builtin_names};
pub use error::{ProfileError, Result};
pub use profile::Profile;
pub use registry::{
    PROFILE_DIR_ENV_VAR, ProfileEntry, ProfileSource, list_profiles, load_profile,
    load_profile_file, load_profile_from, profile_dir,
};
