use chrono::NaiveDate;
use serde::Serialize;

use crate::interval::named_bounds;
use crate::selector::TimeRangeSelector;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct NavState {
    pub prev_enabled: bool,
    pub next_enabled: bool,
}

/// Which of the previous/next controls may be used.
///
/// Custom ranges are never paginated, the period containing today has no
/// "next", and `ThreeMonths` has no step at all. When `earliest` is known,
/// "previous" also stops at the period whose end would fall before it.
pub fn can_navigate(
    selector: &TimeRangeSelector,
    today: NaiveDate,
    earliest: Option<NaiveDate>,
) -> NavState {
    if selector.is_custom() {
        return NavState::default();
    }

    let next_enabled = selector.offset != 0;

    let prev_enabled = selector.kind.is_paginated()
        && match earliest {
            None => true,
            Some(floor) => selector
                .offset
                .checked_sub(1)
                .and_then(|offset| named_bounds(selector.kind, offset, today))
                .is_some_and(|(_, previous_end)| previous_end >= floor),
        };

    NavState {
        prev_enabled,
        next_enabled,
    }
}
