use super::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

fn tracks(names: &[&str]) -> Vec<Track> {
    names
        .iter()
        .map(|n| Track::from_path(format!("/music/{n}.mp3")))
        .collect()
}

fn names(p: &Playlist) -> Vec<String> {
    p.tracks().iter().map(|t| t.display_name.clone()).collect()
}

fn loaded(n: usize) -> Playlist {
    let labels: Vec<String> = (0..n).map(|i| format!("t{i}")).collect();
    let refs: Vec<&str> = labels.iter().map(String::as_str).collect();
    let mut p = Playlist::new();
    p.load(tracks(&refs));
    p
}

#[test]
fn load_points_at_first_track() {
    let mut p = Playlist::new();
    p.load(tracks(&["A", "B", "C"]));
    assert_eq!(p.current_index(), Some(0));
    assert_eq!(p.current_track().unwrap().display_name, "A");
    assert!(!p.is_shuffled());
}

#[test]
fn load_empty_has_no_cursor() {
    let mut p = Playlist::new();
    p.load(Vec::new());
    assert_eq!(p.current_index(), None);
    assert!(p.current_track().is_none());
}

#[test]
fn next_wraps_around() {
    let mut p = loaded(3);
    assert_eq!(p.next(), Some(1));
    assert_eq!(p.next(), Some(2));
    assert_eq!(p.next(), Some(0));
}

#[test]
fn previous_wraps_around() {
    let mut p = loaded(3);
    assert_eq!(p.previous(), Some(2));
    assert_eq!(p.previous(), Some(1));
}

#[test]
fn next_and_previous_are_inverse() {
    for n in 1..6 {
        for start in 0..n {
            let mut p = loaded(n);
            p.select(start);
            p.next();
            p.previous();
            assert_eq!(p.current_index(), Some(start));
            p.previous();
            p.next();
            assert_eq!(p.current_index(), Some(start));
        }
    }
}

#[test]
fn navigation_on_empty_playlist_is_a_noop() {
    let mut p = Playlist::new();
    assert_eq!(p.next(), None);
    assert_eq!(p.previous(), None);
    assert_eq!(p.select(0), None);
    assert_eq!(p.current_index(), None);
}

#[test]
fn select_rejects_out_of_range() {
    let mut p = loaded(2);
    assert_eq!(p.select(1), Some(1));
    assert_eq!(p.select(5), None);
    assert_eq!(p.current_index(), Some(1));
}

#[test]
fn shuffle_puts_current_first_and_keeps_elements() {
    let mut p = loaded(8);
    p.select(5);
    let playing = p.current_id().unwrap();

    p.set_shuffle_with(true, &mut StdRng::seed_from_u64(7));

    assert!(p.is_shuffled());
    assert_eq!(p.current_index(), Some(0));
    assert_eq!(p.current_id(), Some(playing));

    let mut before: Vec<TrackId> = p.original_order.iter().map(|t| t.id).collect();
    let mut after: Vec<TrackId> = p.tracks().iter().map(|t| t.id).collect();
    before.sort();
    after.sort();
    assert_eq!(before, after);
}

#[test]
fn unshuffle_restores_original_order_and_follows_current_track() {
    let mut p = loaded(6);
    let original = names(&p);

    p.set_shuffle_with(true, &mut StdRng::seed_from_u64(42));
    p.next();
    p.next();
    let playing = p.current_id().unwrap();

    p.set_shuffle(false);

    assert!(!p.is_shuffled());
    assert_eq!(names(&p), original);
    assert_eq!(p.current_id(), Some(playing));
}

#[test]
fn shuffle_twice_is_a_noop() {
    let mut p = loaded(6);
    p.set_shuffle_with(true, &mut StdRng::seed_from_u64(1));
    let once = names(&p);
    p.set_shuffle_with(true, &mut StdRng::seed_from_u64(2));
    assert_eq!(names(&p), once);

    let mut q = loaded(3);
    let original = names(&q);
    q.set_shuffle(false);
    assert_eq!(names(&q), original);
}

#[test]
fn shuffle_flag_survives_on_empty_playlist() {
    let mut p = Playlist::new();
    p.set_shuffle(true);
    assert!(p.is_shuffled());
    assert!(p.is_empty());
}

#[test]
fn duplicate_paths_are_told_apart_by_id() {
    let mut p = Playlist::new();
    p.load(tracks(&["same", "other", "same"]));
    p.select(2);
    let playing = p.current_id().unwrap();

    p.set_shuffle_with(true, &mut StdRng::seed_from_u64(3));
    p.set_shuffle(false);

    assert_eq!(p.current_index(), Some(2));
    assert_eq!(p.current_id(), Some(playing));
}

#[test]
fn repeat_is_independent_of_shuffle() {
    let mut p = loaded(4);
    p.set_repeat(true);
    p.set_shuffle_with(true, &mut StdRng::seed_from_u64(9));
    assert!(p.is_repeating());
    p.set_shuffle(false);
    assert!(p.is_repeating());
    p.set_repeat(false);
    assert!(!p.is_shuffled());
    assert!(!p.is_repeating());
}

#[test]
fn clear_empties_tracks_but_keeps_modes() {
    let mut p = loaded(3);
    p.set_shuffle_with(true, &mut StdRng::seed_from_u64(5));
    p.set_repeat(true);
    p.clear();
    assert!(p.is_empty());
    assert!(p.original_order.is_empty());
    assert_eq!(p.current_index(), None);
    assert!(p.is_shuffled());
    assert!(p.is_repeating());
}

#[test]
fn set_resolved_applies_once_to_both_orders() {
    let mut p = loaded(3);
    let id = p.tracks()[1].id;
    p.set_shuffle_with(true, &mut StdRng::seed_from_u64(11));

    let first = ResolvedMetadata {
        title: Some("First".into()),
        ..ResolvedMetadata::default()
    };
    let second = ResolvedMetadata {
        title: Some("Second".into()),
        ..ResolvedMetadata::default()
    };
    assert!(p.set_resolved(id, first));
    assert!(!p.set_resolved(id, second));
    assert_eq!(p.track(id).unwrap().title(), "First");

    p.set_shuffle(false);
    assert_eq!(p.track(id).unwrap().title(), "First");
}

#[test]
fn set_resolved_for_unknown_track_is_ignored() {
    let mut p = loaded(2);
    let stray = Track::from_path("/elsewhere/x.mp3");
    assert!(!p.set_resolved(stray.id, ResolvedMetadata::default()));
}

#[test]
fn window_follows_play_order_and_wraps() {
    let mut p = loaded(4);
    let ids: Vec<TrackId> = p.tracks().iter().map(|t| t.id).collect();
    assert_eq!(p.window(2), ids[0..3]);

    p.select(3);
    assert_eq!(p.window(2), vec![ids[3], ids[0], ids[1]]);

    let mut small = loaded(2);
    assert_eq!(small.window(5).len(), 2);
    small.clear();
    assert!(small.window(2).is_empty());
}

fn with_cover() -> ResolvedMetadata {
    ResolvedMetadata {
        title: Some("Song".into()),
        album_art: Some(AlbumArt {
            mime_type: "image/png".into(),
            data: std::sync::Arc::from(&[1u8, 2, 3][..]),
        }),
        ..ResolvedMetadata::default()
    }
}

#[test]
fn covers_outside_the_kept_ids_are_released_and_can_come_back() {
    let mut p = loaded(3);
    let ids: Vec<TrackId> = p.tracks().iter().map(|t| t.id).collect();
    for id in &ids {
        p.set_resolved(*id, with_cover());
    }
    p.set_shuffle_with(true, &mut StdRng::seed_from_u64(3));

    let released = p.release_art_except(&[ids[0]]);
    assert_eq!(released.len(), 2);
    assert!(p.track(ids[0]).unwrap().album_art().is_some());
    assert!(p.track(ids[1]).unwrap().album_art().is_none());
    // Tags survive; only the cover is gone, from both orders.
    assert_eq!(p.track(ids[1]).unwrap().title(), "Song");
    assert!(p.original_order.iter().all(|t| t.id == ids[0] || t.album_art().is_none()));

    let art = with_cover().album_art.unwrap();
    assert!(p.restore_art(ids[1], art.clone()));
    assert!(p.track(ids[1]).unwrap().album_art().is_some());
    assert!(!p.restore_art(ids[1], art));
}
