use std::sync::atomic::{AtomicUsize, Ordering};

use proptest::prelude::*;
use tempfile::TempDir;

use cutsel_cli::cache::{CacheSettings, ContentCache};
use cutsel_cli::DomainError;
use cutsel_cli::domain::model::{correct_size_wraparound, Cut, TimingModel};
use cutsel_cli::utils::parse_index_range;

fn block_on<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
        .block_on(future)
}

proptest! {
    #[test]
    fn test_timing_model_text_round_trip(
        fps in prop::sample::select(vec![25.0, 29.97, 50.0, 23.976]),
        cuts in prop::collection::vec((0i64..2_000_000, 0i64..200_000), 1..12),
        size in any::<u64>(),
        suggested in prop::option::of("[A-Za-z0-9][A-Za-z0-9 ().'-]{0,30}[A-Za-z0-9)]"),
    ) {
        let cuts: Vec<Cut> = cuts.into_iter().map(|(s, d)| Cut::new(s, d)).collect();
        let mut model = TimingModel::new(fps, cuts, "show.avi".to_string(), size).unwrap();
        if let Some(name) = suggested {
            model = model.with_suggested_name(name);
        }

        let parsed = TimingModel::from_raw_text(&model.to_raw_text()).unwrap();
        prop_assert_eq!(parsed, model);
    }

    #[test]
    fn test_negative_durations_are_normalized(start in -100_000i64..100_000, duration in -100_000i64..100_000) {
        let cut = Cut::new(start, duration);

        // Invariant: durations are never negative and the far end is kept
        prop_assert!(cut.duration_frames >= 0);
        prop_assert_eq!(cut.start_frame, start.min(start + duration));
        prop_assert_eq!(cut.end_frame(), start.max(start + duration));
    }

    #[test]
    fn test_size_wraparound(size in i64::from(i32::MIN)..=i64::from(i32::MAX)) {
        let corrected = correct_size_wraparound(size);
        if size < 0 {
            prop_assert_eq!(corrected, (size + (1i64 << 32)) as u64);
            prop_assert!(corrected >= 1 << 31);
        } else {
            prop_assert_eq!(corrected, size as u64);
        }
    }

    #[test]
    fn test_range_selects_listed_indices(indices in prop::collection::vec(1usize..=40, 1..20)) {
        let input = indices.iter().map(usize::to_string).collect::<Vec<_>>().join(",");
        let parsed = parse_index_range(&input, 40).unwrap();

        let mut expected = indices.clone();
        expected.sort_unstable();
        expected.dedup();
        prop_assert_eq!(parsed, expected);
    }

    #[test]
    fn test_range_respects_bounds(a in 1usize..30, b in 1usize..30, max in 1usize..30) {
        let result = parse_index_range(&format!("{}-{}", a, b), max);
        if a <= b && b <= max {
            let parsed = result.unwrap();
            prop_assert_eq!(parsed, (a..=b).collect::<Vec<_>>());
        } else {
            prop_assert!(result.is_err());
        }
    }

    #[test]
    fn test_cache_fetches_once(key in "[a-zA-Z0-9_. -]{1,40}", content in "\\PC*") {
        let dir = TempDir::new().unwrap();
        let settings = || CacheSettings::new("cutlist").in_directory(Some(dir.path().to_path_buf()));
        let calls = AtomicUsize::new(0);
        let (counter, text) = (&calls, &content);
        let fetch = move || async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok::<String, DomainError>(text.clone())
        };

        let cache = ContentCache::open(settings()).unwrap();
        let first = block_on(cache.get_or_fetch(&key, fetch)).unwrap();
        let second = block_on(cache.get_or_fetch(&key, fetch)).unwrap();
        prop_assert_eq!(&first, &content);
        prop_assert_eq!(&second, &content);

        let reopened = ContentCache::open(settings()).unwrap();
        let third = block_on(reopened.get_or_fetch(&key, fetch)).unwrap();
        prop_assert_eq!(&third, &content);
        prop_assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
