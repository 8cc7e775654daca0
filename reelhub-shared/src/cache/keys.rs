/// Cache key names and TTLs for the aggregation queries
///
/// Every cached aggregation has exactly one key scheme and one TTL, listed
/// here so handlers cannot drift apart on either. Leaderboards tolerate an
/// hour of staleness; recency feeds are kept fresher.

use uuid::Uuid;

/// Brands ranked by total video views.
pub const TOP_BRANDS_KEY: &str = "top_brands";
pub const TOP_BRANDS_TTL_SECS: u64 = 600;

/// Most-viewed videos across the platform.
pub const TOP_VIDEOS_KEY: &str = "top_videos";
pub const TOP_VIDEOS_TTL_SECS: u64 = 3600;

/// Most recently created groups.
pub const RECENT_GROUPS_KEY: &str = "recent_groups";
pub const RECENT_GROUPS_TTL_SECS: u64 = 3600;

/// Most recently uploaded videos, platform-wide or per brand.
pub const RECENT_VIDEOS_TTL_SECS: u64 = 600;

/// Builds the recent-videos key for a brand scope, or the platform-wide key
/// when no brand is given.
pub fn recent_videos_key(brand_id: Option<Uuid>) -> String {
    match brand_id {
        Some(id) => format!("recent_videos:{}", id),
        None => "recent_videos:all".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recent_videos_key_scoped_to_brand() {
        let id = Uuid::new_v4();
        assert_eq!(recent_videos_key(Some(id)), format!("recent_videos:{}", id));
    }

    #[test]
    fn test_recent_videos_key_platform_wide() {
        assert_eq!(recent_videos_key(None), "recent_videos:all");
    }
}
