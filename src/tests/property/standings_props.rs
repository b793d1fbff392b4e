//! Property-based tests for scoreboard standings and the gallery index
//!
//! Tests invariants:
//! - Standings are sorted by points, highest first, ranks are 1..=n
//! - Ties keep server order
//! - Gallery years are unique and newest first

use proptest::prelude::*;

use crate::core::api::{GalleryImage, TeamPoints};
use crate::core::gallery::Gallery;
use crate::core::scoreboard::{Standings, PODIUM_SIZE};

fn arb_teams() -> impl Strategy<Value = Vec<TeamPoints>> {
    prop::collection::vec(0u64..50, 0..20).prop_map(|points| {
        points
            .into_iter()
            .enumerate()
            .map(|(i, total_points)| TeamPoints {
                group_name: format!("Team {i}"),
                total_points,
            })
            .collect()
    })
}

fn arb_images() -> impl Strategy<Value = Vec<GalleryImage>> {
    prop::collection::vec(2018i32..2026, 0..30).prop_map(|years| {
        years
            .into_iter()
            .enumerate()
            .map(|(i, year)| GalleryImage {
                id: i as u64,
                image: Some(format!("http://example.test/{i}.jpg")),
                caption: format!("Photo {i}"),
                year,
            })
            .collect()
    })
}

/// Server position of a generated team.
fn index_of(team: &TeamPoints) -> usize {
    team.group_name
        .trim_start_matches("Team ")
        .parse()
        .unwrap_or(usize::MAX)
}

proptest! {
    #[test]
    fn standings_sorted_and_stable(teams in arb_teams()) {
        let n = teams.len();
        let standings = Standings::new(teams);
        let ranked: Vec<_> = standings.ranked().collect();

        prop_assert_eq!(ranked.len(), n);
        for (i, r) in ranked.iter().enumerate() {
            prop_assert_eq!(r.rank, i + 1);
        }
        for pair in ranked.windows(2) {
            let (a, b) = (&pair[0].team, &pair[1].team);
            prop_assert!(a.total_points >= b.total_points);
            if a.total_points == b.total_points {
                prop_assert!(index_of(a) < index_of(b));
            }
        }
        prop_assert_eq!(standings.podium().count(), n.min(PODIUM_SIZE));
        prop_assert_eq!(standings.rest().count(), n.saturating_sub(PODIUM_SIZE));
    }

    #[test]
    fn gallery_years_unique_newest_first(images in arb_images()) {
        let gallery = Gallery::new(images.clone());
        let years = gallery.years();

        prop_assert!(years.windows(2).all(|w| w[0] > w[1]));
        prop_assert_eq!(gallery.year(), years.first().copied());
        prop_assert!(gallery.visible().iter().all(|img| Some(img.year) == gallery.year()));

        let newest = images.iter().map(|img| img.year).max();
        prop_assert_eq!(gallery.year(), newest);
    }
}
