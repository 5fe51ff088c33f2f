use side_scroller::entities::*;
use side_scroller::states::{PlayerState, Sheet};

#[test]
fn entity_clone_and_eq() {
    // Enums derive PartialEq — equality comparisons must work
    assert_eq!(EnemyKind::Flying, EnemyKind::Flying);
    assert_ne!(EnemyKind::Flying, EnemyKind::Crawling);
    assert_eq!(GameStatus::Playing, GameStatus::Playing);
    assert_ne!(GameStatus::Playing, GameStatus::GameOver);
    assert_eq!(ParticleKind::Dust, ParticleKind::Dust);
    assert_ne!(ParticleKind::Dust, ParticleKind::Splash { gravity: 0.0 });

    // Clone must produce an equal value
    let kind = EnemyKind::Crawling;
    assert_eq!(kind.clone(), EnemyKind::Crawling);
}

#[test]
fn player_clone_is_independent() {
    let original = Player {
        x: 300.0,
        y: 792.0,
        width: 96.0,
        height: 168.0,
        speed: 0.0,
        max_speed: 10.0,
        velocity_y: 0.0,
        weight: 0.5,
        hit_points: 3,
        state: PlayerState::Idle,
        sheet: Sheet::Idle,
        animation: Animation::new(31, 25.0, true),
    };
    let mut cloned = original.clone();
    cloned.hit_points = 1;
    cloned.animation.frame = 5;
    assert_eq!(original.hit_points, 3);
    assert_eq!(original.animation.frame, 0);
}

#[test]
fn bounds_match_the_box() {
    let enemy = Enemy {
        kind: EnemyKind::Flying,
        x: 10.0,
        y: 20.0,
        width: 120.0,
        height: 104.0,
        speed_x: 1.0,
        speed_y: 0.0,
        flight: Some(FlightProfile { angle: 0.0, angle_velocity: 0.05 }),
        animation: Animation::new(7, 30.0, true),
        retired: false,
    };
    let r = enemy.bounds();
    assert_eq!(r, Rect { x: 10.0, y: 20.0, width: 120.0, height: 104.0 });
    assert_eq!(r.center(), (70.0, 72.0));
}

#[test]
fn animation_interval_and_last_frame() {
    let mut a = Animation::new(4, 20.0, false);
    assert_eq!(a.interval(), 50.0);
    assert_eq!(a.row, 0);
    assert!(!a.at_last_frame());
    a.frame = 4;
    assert!(a.at_last_frame());
}

#[test]
fn background_has_five_layers_nearest_last() {
    let bg = Background::new(1920.0, 1080.0);
    let modifiers: Vec<f32> = bg.layers.iter().map(|l| l.speed_modifier).collect();
    assert_eq!(modifiers, vec![1.0, 1.2, 1.4, 1.8, 2.0]);
    assert!(bg.layers.iter().all(|l| l.x == 0.0 && l.width == 1920.0 && l.height == 1080.0));
}
