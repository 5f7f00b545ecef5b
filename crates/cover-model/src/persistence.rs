use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Per-token flags kept on the host document (spec §6 "Persisted state
/// layout").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenFlags {
    #[serde(default = "default_maximum_cover_grant")]
    pub maximum_cover_grant: f32,
    #[serde(default)]
    pub version: String,
}

fn default_maximum_cover_grant() -> f32 {
    1.0
}

impl Default for TokenFlags {
    fn default() -> Self {
        Self {
            maximum_cover_grant: default_maximum_cover_grant(),
            version: String::new(),
        }
    }
}

/// The last schema version that stored `maximumCoverGrant` as a legacy
/// integer bucket rather than a float (spec §6 "Migration rule").
const LEGACY_INTEGER_GRANT_CUTOFF: (u32, u32, u32) = (0, 6, 6);

/// `{0,1,2,3,4} -> {0, 0.5, 0.75, 0.9, 1.0}`, per the historical bucketing
/// (spec §6).
fn legacy_integer_grant_to_fraction(value: u8) -> f32 {
    match value {
        0 => 0.0,
        1 => 0.5,
        2 => 0.75,
        3 => 0.9,
        _ => 1.0,
    }
}

fn parse_version(version: &str) -> (u32, u32, u32) {
    let mut parts = version.split('.').map(|p| p.parse::<u32>().unwrap_or(0));
    (
        parts.next().unwrap_or(0),
        parts.next().unwrap_or(0),
        parts.next().unwrap_or(0),
    )
}

fn compare_versions(a: &str, b: (u32, u32, u32)) -> Ordering {
    parse_version(a).cmp(&b)
}

/// The schema version stamped onto a flags record once it has passed
/// through [`migrate_token_flags`], matching [`LEGACY_INTEGER_GRANT_CUTOFF`].
const MIGRATED_VERSION: &str = "0.6.6";

/// Applies the legacy `maximumCoverGrant` migration if `flags.version`
/// predates `0.6.6`: the stored `maximum_cover_grant` field holds the
/// legacy integer bucket `{0,1,2,3,4}` (serialized through the same `f32`
/// field), which this rewrites in place to the fractional value, then stamps
/// `flags.version` to `"0.6.6"`. Idempotent: re-running on already-migrated
/// flags (version at or past the cutoff) is a no-op, satisfying the
/// "re-saving and re-loading is the identity" round-trip law — without the
/// version stamp, a second pass would re-enter the branch and re-map the
/// now-fractional grant through the integer bucketing, corrupting it.
pub fn migrate_token_flags(flags: &mut TokenFlags) {
    if compare_versions(&flags.version, LEGACY_INTEGER_GRANT_CUTOFF) == Ordering::Less {
        let legacy_bucket = flags.maximum_cover_grant.round().clamp(0.0, 4.0) as u8;
        flags.maximum_cover_grant = legacy_integer_grant_to_fraction(legacy_bucket);
        flags.version = MIGRATED_VERSION.to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrates_legacy_bucket_two_to_three_quarters() {
        let mut flags = TokenFlags {
            maximum_cover_grant: 2.0,
            version: "0.6.5".to_string(),
        };
        migrate_token_flags(&mut flags);
        assert_eq!(flags.maximum_cover_grant, 0.75);
        assert_eq!(flags.version, "0.6.6", "migration should stamp the version forward");
    }

    #[test]
    fn re_running_migration_on_the_same_record_is_self_idempotent() {
        let mut flags = TokenFlags {
            maximum_cover_grant: 2.0,
            version: "0.6.5".to_string(),
        };
        migrate_token_flags(&mut flags);
        assert_eq!(flags.maximum_cover_grant, 0.75);

        // Without stamping `version` forward, this second call would
        // re-enter the legacy branch and map 0.75.round() == 1 -> 0.5,
        // corrupting an already-migrated value.
        migrate_token_flags(&mut flags);
        assert_eq!(flags.maximum_cover_grant, 0.75);
    }

    #[test]
    fn post_cutoff_version_is_left_untouched() {
        let mut flags = TokenFlags {
            maximum_cover_grant: 0.75,
            version: "0.6.6".to_string(),
        };
        migrate_token_flags(&mut flags);
        assert_eq!(flags.maximum_cover_grant, 0.75);
    }

    #[test]
    fn missing_version_string_is_treated_as_legacy() {
        let mut flags = TokenFlags {
            maximum_cover_grant: 0.0,
            version: String::new(),
        };
        migrate_token_flags(&mut flags);
        assert_eq!(flags.maximum_cover_grant, 0.0);
    }

    #[test]
    fn re_migrating_already_migrated_flags_is_identity() {
        let mut flags = TokenFlags {
            maximum_cover_grant: 0.75,
            version: "0.7.0".to_string(),
        };
        let before = flags.clone();
        migrate_token_flags(&mut flags);
        assert_eq!(flags, before);
    }
}
