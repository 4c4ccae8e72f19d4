use crate::models::TierView;
use serde::Serialize;

/// A named milestone reached once a streak meets `min_days`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakTier {
    pub name: &'static str,
    pub min_days: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierDisplay {
    pub icon: &'static str,
    pub gradient: &'static str,
    pub image: &'static str,
}

/// Ascending by `min_days`.
pub const STREAK_TIERS: [StreakTier; 4] = [
    StreakTier { name: "Rising", min_days: 7 },
    StreakTier { name: "Consistent", min_days: 14 },
    StreakTier { name: "Elite", min_days: 30 },
    StreakTier { name: "Goated", min_days: 60 },
];

const TIER_DISPLAYS: [(&str, TierDisplay); 4] = [
    (
        "Rising",
        TierDisplay {
            icon: "trophy",
            gradient: "from-blue-400 to-blue-500",
            image: "/tier-1.png",
        },
    ),
    (
        "Consistent",
        TierDisplay {
            icon: "trophy",
            gradient: "from-blue-500 to-blue-600",
            image: "/tier-2.png",
        },
    ),
    (
        "Elite",
        TierDisplay {
            icon: "sparkles",
            gradient: "from-blue-600 to-indigo-600",
            image: "/tier-4.png",
        },
    ),
    (
        "Goated",
        TierDisplay {
            icon: "sparkles",
            gradient: "from-indigo-600 to-purple-600",
            image: "/tier-5.png",
        },
    ),
];

const FALLBACK_DISPLAY: TierDisplay = TierDisplay {
    icon: "fire",
    gradient: "from-blue-400 to-blue-500",
    image: "/tier-1.png",
};

pub fn get_streak_tier(streak: u32) -> Option<&'static StreakTier> {
    tier_in(&STREAK_TIERS, streak)
}

pub fn get_next_tier(streak: u32) -> Option<&'static StreakTier> {
    next_tier_in(&STREAK_TIERS, streak)
}

/// Highest qualifying tier; on equal thresholds the later entry wins.
pub fn tier_in(tiers: &[StreakTier], streak: u32) -> Option<&StreakTier> {
    tiers
        .iter()
        .filter(|tier| tier.min_days <= streak)
        .max_by_key(|tier| tier.min_days)
}

pub fn next_tier_in(tiers: &[StreakTier], streak: u32) -> Option<&StreakTier> {
    tiers
        .iter()
        .filter(|tier| tier.min_days > streak)
        .min_by_key(|tier| tier.min_days)
}

pub fn display_for(tier: &StreakTier) -> TierDisplay {
    TIER_DISPLAYS
        .iter()
        .find(|(name, _)| *name == tier.name)
        .map(|(_, display)| *display)
        .unwrap_or(FALLBACK_DISPLAY)
}

/// Percent of the way to the next tier, capped at 100.
pub fn tier_progress(streak: u32) -> f64 {
    match get_next_tier(streak) {
        Some(next) => (f64::from(streak) / f64::from(next.min_days) * 100.0).min(100.0),
        None => 100.0,
    }
}

pub fn days_to_next_tier(streak: u32) -> Option<u32> {
    get_next_tier(streak).map(|next| next.min_days - streak)
}

pub fn motivational_message(streak: u32) -> &'static str {
    match streak {
        0 => "Start your journey today!",
        1..=6 => "Building momentum...",
        7..=13 => "You're on your way up!",
        14..=29 => "Consistency is your superpower!",
        30..=59 => "You're in the elite now!",
        _ => "Absolutely Goated. Legend status.",
    }
}

pub fn tier_view(tier: &StreakTier) -> TierView {
    let display = display_for(tier);
    TierView {
        name: tier.name,
        min_days: tier.min_days,
        icon: display.icon,
        gradient: display.gradient,
        image: display.image,
    }
}

pub fn all_tier_views() -> Vec<TierView> {
    STREAK_TIERS.iter().map(tier_view).collect()
}
