use std::time::Duration;

use super::engine::SessionState;
use super::fake::{Call, FakeBackend};
use super::volume::Volume;
use super::*;
use crate::library::Track;

fn engine() -> PlaybackEngine<FakeBackend> {
    PlaybackEngine::new(FakeBackend::default(), 1.0)
}

fn ready(engine: &mut PlaybackEngine<FakeBackend>, load_id: LoadId, secs: u64) {
    assert!(engine.handle_event(&EngineEvent::Ready {
        load_id,
        duration: Some(Duration::from_secs(secs)),
    }));
}

#[test]
fn format_clock_floors_to_whole_seconds() {
    assert_eq!(format_clock(0.0), "0:00");
    assert_eq!(format_clock(65.0), "1:05");
    assert_eq!(format_clock(65.9), "1:05");
    assert_eq!(format_clock(3599.0), "59:59");
    assert_eq!(format_clock(3600.0), "60:00");
}

#[test]
fn format_clock_rejects_nonsense() {
    assert_eq!(format_clock(f64::NAN), "0:00");
    assert_eq!(format_clock(-3.0), "0:00");
    assert_eq!(format_clock(f64::INFINITY), "0:00");
    assert_eq!(format_duration(None), "0:00");
    assert_eq!(format_duration(Some(Duration::from_millis(61_500))), "1:01");
}

#[test]
fn volume_saturates_at_both_ends() {
    let mut v = Volume::new(0.9);
    for _ in 0..10 {
        v.adjust(0.05);
    }
    assert_eq!(v.level(), 1.0);
    for _ in 0..40 {
        v.adjust(-0.05);
    }
    assert_eq!(v.level(), 0.0);
    assert!(!v.set(f32::NAN));
    assert_eq!(v.level(), 0.0);
    assert_eq!(Volume::new(3.0).level(), 1.0);
}

#[test]
fn mute_round_trip_restores_exact_level() {
    let mut v = Volume::new(0.37);
    v.toggle_mute();
    assert!(v.is_muted());
    assert_eq!(v.level(), 0.0);
    v.toggle_mute();
    assert!(!v.is_muted());
    assert_eq!(v.level(), 0.37);
}

#[test]
fn unmute_from_zero_goes_to_full() {
    let mut v = Volume::new(0.0);
    v.toggle_mute();
    v.toggle_mute();
    assert_eq!(v.level(), 1.0);
}

#[test]
fn load_and_play_issues_load_then_play() {
    let mut e = engine();
    let t = Track::from_path("/m/a.mp3");
    let id = e.load_and_play(&t);

    assert_eq!(
        e.backend().calls,
        vec![Call::Load(id, t.path.clone(), 1.0), Call::Play]
    );
    let s = e.session().unwrap();
    assert_eq!(s.track_id, t.id);
    assert_eq!(s.state, SessionState::Loading);
    assert!(e.is_playing());
}

#[test]
fn each_load_gets_a_new_generation() {
    let mut e = engine();
    let a = e.load_and_play(&Track::from_path("/m/a.mp3"));
    let b = e.load_and_play(&Track::from_path("/m/b.mp3"));
    assert!(b > a);
}

#[test]
fn stale_events_are_dropped() {
    let mut e = engine();
    let old = e.load_and_play(&Track::from_path("/m/a.mp3"));
    let new = e.load_and_play(&Track::from_path("/m/b.mp3"));

    assert!(!e.handle_event(&EngineEvent::Ended { load_id: old }));
    assert!(!e.handle_event(&EngineEvent::Failed {
        load_id: old,
        reason: "gone".into(),
    }));
    assert!(e.is_playing());

    ready(&mut e, new, 100);
    assert_eq!(e.session().unwrap().state, SessionState::Ready);
}

#[test]
fn events_without_session_are_dropped() {
    let mut e = engine();
    assert!(!e.handle_event(&EngineEvent::Ended { load_id: LoadId(1) }));
}

#[test]
fn failed_load_leaves_session_paused_and_retries_on_toggle() {
    let mut e = engine();
    let t = Track::from_path("/m/broken.mp3");
    let first = e.load_and_play(&t);
    assert!(e.handle_event(&EngineEvent::Failed {
        load_id: first,
        reason: "decoder".into(),
    }));
    assert!(!e.is_playing());
    assert_eq!(e.session().unwrap().state, SessionState::Failed);
    assert!(!e.seek_absolute(3.0));

    assert!(e.toggle_play_pause());
    let retry = e.backend().last_load().unwrap();
    assert!(retry > first);
    assert_eq!(e.session().unwrap().load_id, retry);
    assert_eq!(e.backend().loaded_paths(), vec![t.path.clone(), t.path]);
}

#[test]
fn toggle_without_session_is_a_noop() {
    let mut e = engine();
    assert!(!e.toggle_play_pause());
    assert!(e.backend().calls.is_empty());
}

#[test]
fn toggle_flips_between_play_and_pause() {
    let mut e = engine();
    let id = e.load_and_play(&Track::from_path("/m/a.mp3"));
    ready(&mut e, id, 10);
    e.backend_mut().calls.clear();

    e.toggle_play_pause();
    assert!(!e.is_playing());
    e.toggle_play_pause();
    assert!(e.is_playing());
    assert_eq!(e.backend().calls, vec![Call::Pause, Call::Play]);
}

#[test]
fn seek_clamps_to_known_duration() {
    let mut e = engine();
    let id = e.load_and_play(&Track::from_path("/m/a.mp3"));
    ready(&mut e, id, 100);

    assert!(e.seek_absolute(250.0));
    assert_eq!(e.session().unwrap().position, Duration::from_secs(100));
    assert!(e.seek_absolute(-4.0));
    assert_eq!(e.session().unwrap().position, Duration::ZERO);
    assert!(!e.seek_absolute(f64::NAN));
}

#[test]
fn seek_with_unknown_duration_only_clamps_below() {
    let mut e = engine();
    e.load_and_play(&Track::from_path("/m/a.mp3"));
    assert!(e.seek_absolute(500.0));
    assert_eq!(e.session().unwrap().position, Duration::from_secs(500));
}

#[test]
fn seek_relative_moves_from_reported_position() {
    let mut e = engine();
    let id = e.load_and_play(&Track::from_path("/m/a.mp3"));
    ready(&mut e, id, 60);
    e.handle_event(&EngineEvent::Progress {
        load_id: id,
        position: Duration::from_secs(10),
    });

    e.seek_relative(5.0);
    assert_eq!(e.session().unwrap().position, Duration::from_secs(15));
    e.seek_relative(-30.0);
    assert_eq!(e.session().unwrap().position, Duration::ZERO);
    assert_eq!(e.backend().calls.last(), Some(&Call::Seek(Duration::ZERO)));
}

#[test]
fn volume_changes_reach_the_backend() {
    let mut e = PlaybackEngine::new(FakeBackend::default(), 0.5);
    e.adjust_volume(0.25);
    e.toggle_mute();
    e.toggle_mute();
    assert!(!e.set_volume(f32::NAN));
    assert_eq!(
        e.backend().calls,
        vec![
            Call::SetVolume(0.75),
            Call::SetVolume(0.0),
            Call::SetVolume(0.75)
        ]
    );
}

#[test]
fn ended_stops_the_session_until_restarted() {
    let mut e = engine();
    let id = e.load_and_play(&Track::from_path("/m/a.mp3"));
    ready(&mut e, id, 30);
    assert!(e.handle_event(&EngineEvent::Ended { load_id: id }));
    let s = e.session().unwrap();
    assert_eq!(s.state, SessionState::Ended);
    assert_eq!(s.fraction(), Some(1.0));
    assert!(!e.is_playing());
}

#[test]
fn stop_drops_the_session() {
    let mut e = engine();
    e.load_and_play(&Track::from_path("/m/a.mp3"));
    e.stop();
    assert!(e.session().is_none());
    assert_eq!(e.backend().calls.last(), Some(&Call::Stop));
    e.stop();
    assert_eq!(e.backend().calls.iter().filter(|c| **c == Call::Stop).count(), 1);
}
