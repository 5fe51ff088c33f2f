//! Player kinematics, animation timers and overlap tests.
//!
//! No rotation and no mass: horizontal motion is a clamp-and-reset speed,
//! vertical motion is Euler integration of one gravity scalar against a
//! flat ground line.

use crate::config::GameConfig;
use crate::controls::{Action, ControlSet};
use crate::entities::{Animation, Player, Rect};

/// Standard four-inequality AABB test. Touching edges do not overlap.
#[inline]
pub fn overlaps(a: &Rect, b: &Rect) -> bool {
    a.x < b.x + b.width && a.x + a.width > b.x && a.y < b.y + b.height && a.y + a.height > b.y
}

/// Ground line for the player's current box height.
pub fn ground_line(player: &Player, config: &GameConfig) -> f32 {
    config.ground_for(player.height)
}

pub fn is_on_ground(player: &Player, config: &GameConfig) -> bool {
    player.y >= ground_line(player, config)
}

/// Apply last tick's speed, then derive next tick's speed from held
/// directions and clamp `x` into the travel band.
pub fn move_horizontal(player: &mut Player, controls: ControlSet, config: &GameConfig) {
    if player.state.is_pinned() {
        player.speed = 0.0;
    }

    player.x += player.speed;

    player.speed = if controls.contains(Action::MoveLeft) {
        -player.max_speed
    } else if controls.contains(Action::MoveRight) {
        player.max_speed
    } else {
        0.0
    };

    player.x = player.x.clamp(config.travel_min, config.travel_max);
}

/// Advance `y` by the current velocity, then accumulate gravity while
/// airborne. On contact the velocity resets and `y` is pulled back onto the
/// ground line, so an overshooting fall never ends below it.
pub fn move_vertical(player: &mut Player, config: &GameConfig) {
    player.y += player.velocity_y;

    if is_on_ground(player, config) {
        player.velocity_y = 0.0;
        player.y = player.y.min(ground_line(player, config));
    } else {
        player.velocity_y += player.weight;
    }
}

/// Accumulate `dt` into the frame timer. Returns `true` on the tick the
/// timer fires; that tick the elapsed time is discarded.
pub fn step_timer(animation: &mut Animation, dt: f32) -> bool {
    if animation.timer > animation.interval() {
        animation.timer = 0.0;
        true
    } else {
        animation.timer += dt;
        false
    }
}

/// Step a looping or clamping sprite animation.
pub fn advance_animation(animation: &mut Animation, dt: f32) {
    if !step_timer(animation, dt) {
        return;
    }
    if animation.frame < animation.max_frame {
        animation.frame += 1;
    } else {
        animation.frame = if animation.looping { 0 } else { animation.max_frame };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x: f32, y: f32, w: f32, h: f32) -> Rect {
        Rect { x, y, width: w, height: h }
    }

    #[test]
    fn overlap_is_symmetric() {
        let a = rect(0.0, 0.0, 10.0, 10.0);
        let b = rect(5.0, 5.0, 10.0, 10.0);
        assert!(overlaps(&a, &b));
        assert!(overlaps(&b, &a));
    }

    #[test]
    fn touching_edges_do_not_overlap() {
        let a = rect(0.0, 0.0, 10.0, 10.0);
        assert!(!overlaps(&a, &rect(10.0, 0.0, 5.0, 5.0)));
        assert!(!overlaps(&a, &rect(0.0, 10.0, 5.0, 5.0)));
    }

    #[test]
    fn timer_fires_only_after_exceeding_interval() {
        // 10 fps → 100 ms per frame
        let mut anim = Animation::new(3, 10.0, true);
        assert!(!step_timer(&mut anim, 100.0)); // 0 → 100
        assert!(!step_timer(&mut anim, 1.0)); // 100 is not > 100 → 101
        assert!(step_timer(&mut anim, 1.0));
        assert_eq!(anim.timer, 0.0);
    }

    #[test]
    fn looping_animation_wraps() {
        let mut anim = Animation::new(1, 10.0, true);
        anim.frame = 1;
        anim.timer = 101.0;
        advance_animation(&mut anim, 16.0);
        assert_eq!(anim.frame, 0);
    }

    #[test]
    fn clamped_animation_holds_last_frame() {
        let mut anim = Animation::new(1, 10.0, false);
        anim.frame = 1;
        anim.timer = 101.0;
        advance_animation(&mut anim, 16.0);
        assert_eq!(anim.frame, 1);
    }
}
