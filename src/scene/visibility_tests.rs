use glam::Vec3;
use std::f32::consts::PI;
use crate::camera::RayFanConfig;
use crate::spatial::Entry;
use super::*;

fn narrow_fan() -> RayFanConfig {
    // ±10 degree azimuth/elevation, 3 degree step
    RayFanConfig {
        elevation_range: PI / 9.0,
        azimuth_range: PI / 9.0,
        angle_step: PI / 60.0,
        far_distance: 1000.0,
    }
}

// ============================================================================
// RayFanClassifier
// ============================================================================

#[test]
fn test_entry_ahead_is_hit_and_entry_far_away_is_unhit() {
    let ahead = Entry::new(Vec3::new(0.0, 0.0, -50.0), 1.0, "ahead");
    let distant = Entry::new(Vec3::new(2000.0, 2000.0, 2000.0), 1.0, "distant");
    let entries: Vec<&Entry> = vec![&ahead, &distant];

    let mut classifier = RayFanClassifier::new(narrow_fan());
    let snapshot = classifier
        .classify(Vec3::ZERO, Vec3::NEG_Z, &entries)
        .unwrap();

    assert!(snapshot.hit_ids.contains("ahead"));
    assert!(snapshot.unhit_ids.contains("distant"));
}

#[test]
fn test_entry_behind_camera_is_unhit() {
    let behind = Entry::new(Vec3::new(0.0, 0.0, 50.0), 1.0, "behind");
    let entries: Vec<&Entry> = vec![&behind];

    let mut classifier = RayFanClassifier::new(narrow_fan());
    let snapshot = classifier
        .classify(Vec3::ZERO, Vec3::NEG_Z, &entries)
        .unwrap();

    assert!(snapshot.unhit_ids.contains("behind"));
}

#[test]
fn test_entry_beyond_far_distance_is_unhit() {
    let config = RayFanConfig {
        far_distance: 100.0,
        ..narrow_fan()
    };
    let too_far = Entry::new(Vec3::new(0.0, 0.0, -500.0), 1.0, "too_far");
    let entries: Vec<&Entry> = vec![&too_far];

    let mut classifier = RayFanClassifier::new(config);
    let snapshot = classifier
        .classify(Vec3::ZERO, Vec3::NEG_Z, &entries)
        .unwrap();

    assert!(snapshot.unhit_ids.contains("too_far"));
}

#[test]
fn test_fan_follows_forward_axis() {
    // Same entry, two viewing directions
    let target = Entry::new(Vec3::new(50.0, 0.0, 0.0), 1.0, "target");
    let entries: Vec<&Entry> = vec![&target];
    let mut classifier = RayFanClassifier::new(narrow_fan());

    let looking_at_it = classifier
        .classify(Vec3::ZERO, Vec3::X, &entries)
        .unwrap();
    assert!(looking_at_it.hit_ids.contains("target"));

    let looking_away = classifier
        .classify(Vec3::ZERO, Vec3::NEG_X, &entries)
        .unwrap();
    assert!(looking_away.unhit_ids.contains("target"));
}

#[test]
fn test_large_radius_widens_the_target() {
    // Off-axis beyond a narrow fan, but the radius reaches into it
    let fat = Entry::new(Vec3::new(30.0, 0.0, -50.0), 40.0, "fat");
    let entries: Vec<&Entry> = vec![&fat];

    let mut classifier = RayFanClassifier::new(narrow_fan());
    let snapshot = classifier
        .classify(Vec3::ZERO, Vec3::NEG_Z, &entries)
        .unwrap();

    assert!(snapshot.hit_ids.contains("fat"));
}

#[test]
fn test_partition_is_disjoint_and_exhaustive() {
    let entries_owned: Vec<Entry> = (0..24)
        .map(|i| {
            let t = i as f32;
            Entry::new(
                Vec3::new(t * 30.0 - 360.0, (t * 17.0) % 200.0 - 100.0, -t * 25.0),
                2.0,
                format!("m{}", i),
            )
        })
        .collect();
    let entries: Vec<&Entry> = entries_owned.iter().collect();

    let mut classifier = RayFanClassifier::new(RayFanConfig::default());
    let snapshot = classifier
        .classify(Vec3::ZERO, Vec3::NEG_Z, &entries)
        .unwrap();

    assert_eq!(
        snapshot.hit_count() + snapshot.unhit_count(),
        entries.len()
    );
    for entry in &entries {
        let in_hit = snapshot.hit_ids.contains(&entry.mesh_id);
        let in_unhit = snapshot.unhit_ids.contains(&entry.mesh_id);
        assert!(in_hit != in_unhit, "'{}' must be in exactly one set", entry.mesh_id);
    }
}

#[test]
fn test_invalid_fan_config_surfaces_error() {
    let config = RayFanConfig {
        angle_step: 0.0,
        ..RayFanConfig::default()
    };
    let entry = Entry::new(Vec3::ZERO, 1.0, "x");
    let entries: Vec<&Entry> = vec![&entry];

    let mut classifier = RayFanClassifier::new(config);
    assert!(classifier.classify(Vec3::ZERO, Vec3::NEG_Z, &entries).is_err());
}

// ============================================================================
// AllVisibleClassifier
// ============================================================================

#[test]
fn test_all_visible_puts_everything_in_hit() {
    let a = Entry::new(Vec3::new(1e6, 1e6, 1e6), 1.0, "a");
    let b = Entry::new(Vec3::ZERO, 1.0, "b");
    let entries: Vec<&Entry> = vec![&a, &b];

    let mut classifier = AllVisibleClassifier::new();
    let snapshot = classifier
        .classify(Vec3::ZERO, Vec3::NEG_Z, &entries)
        .unwrap();

    assert_eq!(snapshot.hit_count(), 2);
    assert_eq!(snapshot.unhit_count(), 0);
}
