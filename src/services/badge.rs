use crate::types::settings::BadgeSettings;
use crate::types::stats::BadgeState;

/// Badge for `tab_count` open tabs: the count as text, coloured by threshold.
pub fn badge_for_tab_count(tab_count: usize, settings: &BadgeSettings) -> BadgeState {
    let color = if tab_count > settings.high_tab_count {
        &settings.high_color
    } else if tab_count > settings.medium_tab_count {
        &settings.medium_color
    } else {
        &settings.low_color
    };

    BadgeState {
        text: tab_count.to_string(),
        color: color.clone(),
    }
}
