//! Built-in profiles, embedded at compile time.

/// Parcel shipments.
pub const SHIPMENT_PROFILE: &str = include_str!("../profiles/shipment.toml");

/// Tanker fixture lines.
pub const FIXTURE_PROFILE: &str = include_str!("../profiles/fixture.toml");

/// Name and TOML source of every built-in profile.
pub const BUILTIN_PROFILES: [(&str, &str); 2] =
    [("shipment", SHIPMENT_PROFILE), ("fixture", FIXTURE_PROFILE)];

pub fn builtin_source(name: &str) -> Option<&'static str> {
    BUILTIN_PROFILES
        .iter()
        .find(|(builtin, _)| builtin.eq_ignore_ascii_case(name))
        .map(|(_, source)| *source)
}

pub fn builtin_names() -> impl Iterator<Item = &'static str> {
    BUILTIN_PROFILES.iter().map(|(name, _)| *name)
}
