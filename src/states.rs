//! Player finite-state machine.
//!
//! Each [`PlayerState`] owns a fixed [`StateProfile`] applied on entry, an
//! optional dust emitter, and a row in the transition table evaluated by
//! [`next_state`]. The table is pure: the same state, input summary and
//! kinematic snapshot always yield the same answer.

use serde::Serialize;

use crate::controls::{Action, ControlSet};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum PlayerState {
    Idle,
    Walking,
    Running,
    Sitting,
    Standing,
    Jumping,
    Falling,
    Fighting,
    Dashing,
    Dying,
}

/// Sprite sheet the renderer should draw from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Sheet {
    Idle,
    Walk,
    Run,
    Sit,
    Jump,
    Fight,
    Dash,
    Die,
}

/// Configuration a state applies to the player when entered.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StateProfile {
    pub sheet: Sheet,
    pub width: f32,
    pub height: f32,
    pub first_frame: u32,
    pub max_frame: u32,
    pub fps: f32,
    pub looping: bool,
    /// Replaces the player's max speed when set.
    pub max_speed: Option<f32>,
    /// Raise the player by this much on entry (taller boxes).
    pub lift: f32,
}

/// Where and how a state sheds a dust particle each tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DustSpec {
    /// Offset from the player's horizontal centre.
    pub dx: f32,
    /// Offset from the player's top edge.
    pub dy: f32,
    /// Fixed drift; `None` lets the particle pick a random one.
    pub speed_x: Option<f32>,
    pub speed_y: Option<f32>,
}

const fn dust(dx: f32, dy: f32, speed_x: Option<f32>, speed_y: Option<f32>) -> DustSpec {
    DustSpec { dx, dy, speed_x, speed_y }
}

impl PlayerState {
    pub const ALL: [PlayerState; 10] = [
        PlayerState::Idle,
        PlayerState::Walking,
        PlayerState::Running,
        PlayerState::Sitting,
        PlayerState::Standing,
        PlayerState::Jumping,
        PlayerState::Falling,
        PlayerState::Fighting,
        PlayerState::Dashing,
        PlayerState::Dying,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PlayerState::Idle => "IDLE",
            PlayerState::Walking => "WALKING",
            PlayerState::Running => "RUNNING",
            PlayerState::Sitting => "SITTING",
            PlayerState::Standing => "STANDING",
            PlayerState::Jumping => "JUMPING",
            PlayerState::Falling => "FALLING",
            PlayerState::Fighting => "FIGHTING",
            PlayerState::Dashing => "DASHING",
            PlayerState::Dying => "DYING",
        }
    }

    pub fn profile(self) -> StateProfile {
        let base = StateProfile {
            sheet: Sheet::Idle,
            width: 96.0,
            height: 168.0,
            first_frame: 0,
            max_frame: 7,
            fps: 25.0,
            looping: false,
            max_speed: None,
            lift: 0.0,
        };
        match self {
            PlayerState::Idle => StateProfile {
                max_frame: 31,
                looping: true,
                ..base
            },
            PlayerState::Walking => StateProfile {
                sheet: Sheet::Walk,
                width: 108.0,
                max_frame: 3,
                fps: 10.0,
                looping: true,
                max_speed: Some(5.0),
                ..base
            },
            PlayerState::Running => StateProfile {
                sheet: Sheet::Run,
                width: 102.0,
                fps: 30.0,
                looping: true,
                max_speed: Some(10.0),
                ..base
            },
            PlayerState::Sitting => StateProfile {
                sheet: Sheet::Sit,
                width: 132.0,
                max_frame: 3,
                fps: 40.0,
                ..base
            },
            PlayerState::Standing => StateProfile {
                sheet: Sheet::Sit,
                width: 132.0,
                first_frame: 3,
                max_frame: 5,
                fps: 40.0,
                ..base
            },
            PlayerState::Jumping => StateProfile {
                sheet: Sheet::Jump,
                width: 114.0,
                max_frame: 3,
                ..base
            },
            PlayerState::Falling => StateProfile {
                sheet: Sheet::Jump,
                width: 114.0,
                first_frame: 4,
                ..base
            },
            PlayerState::Fighting => StateProfile {
                sheet: Sheet::Fight,
                width: 156.0,
                height: 192.0,
                lift: 24.0,
                ..base
            },
            PlayerState::Dashing => StateProfile {
                sheet: Sheet::Dash,
                width: 108.0,
                ..base
            },
            PlayerState::Dying => StateProfile {
                sheet: Sheet::Die,
                width: 174.0,
                fps: 10.0,
                ..base
            },
        }
    }

    /// Dust emitted every tick while this state is active.
    pub fn dust(self) -> Option<DustSpec> {
        match self {
            PlayerState::Idle | PlayerState::Standing => Some(dust(10.0, 40.0, None, Some(1.7))),
            PlayerState::Walking | PlayerState::Running => Some(dust(0.0, 40.0, None, None)),
            PlayerState::Sitting => Some(dust(10.0, 95.0, None, Some(1.7))),
            PlayerState::Jumping | PlayerState::Falling => Some(dust(10.0, 40.0, None, None)),
            PlayerState::Fighting => Some(dust(-20.0, 75.0, None, None)),
            PlayerState::Dashing => Some(dust(10.0, 40.0, Some(5.0), None)),
            PlayerState::Dying => None,
        }
    }

    /// Whether touching an adversary in this state costs a hit point.
    pub fn is_vulnerable(self) -> bool {
        !matches!(
            self,
            PlayerState::Fighting | PlayerState::Dashing | PlayerState::Dying
        )
    }

    /// Horizontal motion is suppressed entirely in these states.
    pub fn is_pinned(self) -> bool {
        matches!(self, PlayerState::Sitting | PlayerState::Dying)
    }
}

// ── Input summary ─────────────────────────────────────────────────────────────

/// Composite view of one tick's controls, as every state reads them.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InputSummary {
    pub jump: bool,
    pub crouch: bool,
    pub move_left: bool,
    pub move_right: bool,
    pub run: bool,
    pub attack: bool,
    pub dash: bool,
    pub self_destruct: bool,
    /// Either horizontal direction held.
    pub moving: bool,
    /// None of jump, crouch or a direction held.
    pub idle: bool,
    /// Candidate speed tier handed to the world scroll on a transition.
    pub speed: f32,
}

impl InputSummary {
    pub fn from_controls(controls: ControlSet) -> Self {
        let jump = controls.contains(Action::Jump);
        let crouch = controls.contains(Action::Crouch);
        let move_left = controls.contains(Action::MoveLeft);
        let move_right = controls.contains(Action::MoveRight);
        let run = controls.contains(Action::Run);
        let attack = controls.contains(Action::Attack);
        let dash = controls.contains(Action::Dash);
        let self_destruct = controls.contains(Action::SelfDestruct);

        let mut speed = 0.0;
        if move_right {
            speed = if run { 6.0 } else { 3.0 };
        }
        if dash {
            speed = 8.0;
        }
        if crouch || self_destruct {
            speed = 0.0;
        }

        Self {
            jump,
            crouch,
            move_left,
            move_right,
            run,
            attack,
            dash,
            self_destruct,
            moving: move_left || move_right,
            idle: !(jump || crouch || move_left || move_right),
            speed,
        }
    }
}

/// The slice of player physics the transition table may look at.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Kinematics {
    pub on_ground: bool,
    pub velocity_y: f32,
    /// Gravity constant; a jump turns into a fall once `velocity_y` exceeds it.
    pub weight: f32,
    pub at_last_frame: bool,
}

/// A requested state change and the speed tier it hands the world scroll.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transition {
    pub to: PlayerState,
    pub speed: f32,
}

/// Evaluate the active state's guards in priority order; first match wins.
pub fn next_state(
    state: PlayerState,
    input: &InputSummary,
    kin: &Kinematics,
) -> Option<PlayerState> {
    use PlayerState::*;

    let locomotion = if input.run { Running } else { Walking };

    match state {
        Idle => first_match(&[
            (input.moving, locomotion),
            (input.crouch, Sitting),
            (input.jump, Jumping),
            (input.attack, Fighting),
            (input.dash, Dashing),
            (input.self_destruct, Dying),
        ]),
        Walking => first_match(&[
            (input.idle, Idle),
            (input.moving && input.run, Running),
            (input.jump, Jumping),
            (input.crouch, Sitting),
            (input.attack, Fighting),
            (input.dash, Dashing),
            (input.self_destruct, Dying),
        ]),
        Running => first_match(&[
            (input.idle, Idle),
            (input.moving && !input.run, Walking),
            (input.jump, Jumping),
            (input.crouch, Sitting),
            (input.attack, Fighting),
            (input.dash, Dashing),
            (input.self_destruct, Dying),
        ]),
        Sitting => first_match(&[(!input.crouch, Standing), (input.self_destruct, Dying)]),
        Standing => first_match(&[
            (kin.at_last_frame && input.idle, Idle),
            (input.moving, locomotion),
            (input.attack, Fighting),
            (input.dash, Dashing),
            (input.self_destruct, Dying),
        ]),
        Jumping => first_match(&[
            (kin.velocity_y > kin.weight, Falling),
            (input.attack, Fighting),
            (input.dash, Dashing),
            (input.self_destruct, Dying),
        ]),
        Falling => first_match(&[
            (kin.on_ground, Idle),
            (input.dash, Dashing),
            (input.self_destruct, Dying),
        ]),
        Fighting => first_match(&[(kin.at_last_frame, Idle), (input.self_destruct, Dying)]),
        Dashing => first_match(&[(kin.at_last_frame, Idle)]),
        Dying => None,
    }
}

fn first_match(guards: &[(bool, PlayerState)]) -> Option<PlayerState> {
    guards.iter().find(|(hit, _)| *hit).map(|(_, to)| *to)
}

/// [`next_state`] paired with the speed tier of this tick's input.
pub fn transition(
    state: PlayerState,
    input: &InputSummary,
    kin: &Kinematics,
) -> Option<Transition> {
    next_state(state, input, kin).map(|to| Transition {
        to,
        speed: input.speed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grounded() -> Kinematics {
        Kinematics {
            on_ground: true,
            velocity_y: 0.0,
            weight: 0.5,
            at_last_frame: false,
        }
    }

    fn summary(actions: &[Action]) -> InputSummary {
        InputSummary::from_controls(actions.iter().copied().collect())
    }

    #[test]
    fn speed_tiers() {
        assert_eq!(summary(&[]).speed, 0.0);
        assert_eq!(summary(&[Action::MoveRight]).speed, 3.0);
        assert_eq!(summary(&[Action::MoveRight, Action::Run]).speed, 6.0);
        assert_eq!(summary(&[Action::MoveRight, Action::Dash]).speed, 8.0);
        assert_eq!(summary(&[Action::MoveLeft]).speed, 0.0);
    }

    #[test]
    fn crouch_and_self_destruct_cancel_speed() {
        assert_eq!(summary(&[Action::MoveRight, Action::Crouch]).speed, 0.0);
        assert_eq!(summary(&[Action::Dash, Action::SelfDestruct]).speed, 0.0);
    }

    #[test]
    fn idle_flag_ignores_attack_and_dash() {
        assert!(summary(&[Action::Attack, Action::Dash, Action::Run]).idle);
        assert!(!summary(&[Action::Jump]).idle);
    }

    #[test]
    fn idle_prefers_movement_over_everything() {
        let input = summary(&[Action::MoveRight, Action::Jump, Action::Attack]);
        assert_eq!(next_state(PlayerState::Idle, &input, &grounded()), Some(PlayerState::Walking));
    }

    #[test]
    fn idle_moving_with_run_is_running() {
        let input = summary(&[Action::MoveLeft, Action::Run]);
        assert_eq!(next_state(PlayerState::Idle, &input, &grounded()), Some(PlayerState::Running));
    }

    #[test]
    fn walking_releases_to_idle() {
        assert_eq!(
            next_state(PlayerState::Walking, &summary(&[]), &grounded()),
            Some(PlayerState::Idle)
        );
    }

    #[test]
    fn running_drops_to_walking_without_modifier() {
        let input = summary(&[Action::MoveRight]);
        assert_eq!(next_state(PlayerState::Running, &input, &grounded()), Some(PlayerState::Walking));
    }

    #[test]
    fn sitting_stands_up_when_crouch_released() {
        assert_eq!(
            next_state(PlayerState::Sitting, &summary(&[Action::MoveRight]), &grounded()),
            Some(PlayerState::Standing)
        );
        assert_eq!(
            next_state(PlayerState::Sitting, &summary(&[Action::Crouch]), &grounded()),
            None
        );
    }

    #[test]
    fn standing_waits_for_last_frame_before_idle() {
        let mut kin = grounded();
        assert_eq!(next_state(PlayerState::Standing, &summary(&[]), &kin), None);
        kin.at_last_frame = true;
        assert_eq!(next_state(PlayerState::Standing, &summary(&[]), &kin), Some(PlayerState::Idle));
    }

    #[test]
    fn jumping_turns_into_falling_past_the_weight() {
        let mut kin = grounded();
        kin.on_ground = false;
        kin.velocity_y = 0.5;
        assert_eq!(next_state(PlayerState::Jumping, &summary(&[]), &kin), None);
        kin.velocity_y = 0.6;
        assert_eq!(next_state(PlayerState::Jumping, &summary(&[]), &kin), Some(PlayerState::Falling));
    }

    #[test]
    fn falling_lands_in_idle() {
        assert_eq!(
            next_state(PlayerState::Falling, &summary(&[Action::Dash]), &grounded()),
            Some(PlayerState::Idle)
        );
    }

    #[test]
    fn dashing_ignores_self_destruct() {
        assert_eq!(
            next_state(PlayerState::Dashing, &summary(&[Action::SelfDestruct]), &grounded()),
            None
        );
    }

    #[test]
    fn dying_is_terminal() {
        let all: ControlSet = Action::ALL.into_iter().collect();
        let mut kin = grounded();
        kin.at_last_frame = true;
        assert_eq!(
            next_state(PlayerState::Dying, &InputSummary::from_controls(all), &kin),
            None
        );
    }

    #[test]
    fn transition_carries_the_speed_tier() {
        let input = summary(&[Action::MoveRight, Action::Run]);
        let t = transition(PlayerState::Idle, &input, &grounded()).unwrap();
        assert_eq!(t, Transition { to: PlayerState::Running, speed: 6.0 });
    }

    #[test]
    fn dust_placement_per_state() {
        use PlayerState::*;
        let cases = [
            (Idle, Some(dust(10.0, 40.0, None, Some(1.7)))),
            (Walking, Some(dust(0.0, 40.0, None, None))),
            (Running, Some(dust(0.0, 40.0, None, None))),
            (Sitting, Some(dust(10.0, 95.0, None, Some(1.7)))),
            (Standing, Some(dust(10.0, 40.0, None, Some(1.7)))),
            (Jumping, Some(dust(10.0, 40.0, None, None))),
            (Falling, Some(dust(10.0, 40.0, None, None))),
            (Fighting, Some(dust(-20.0, 75.0, None, None))),
            (Dashing, Some(dust(10.0, 40.0, Some(5.0), None))),
            (Dying, None),
        ];
        for (state, expected) in cases {
            assert_eq!(state.dust(), expected, "{}", state.name());
        }
    }

    #[test]
    fn vulnerability() {
        let safe: Vec<_> = PlayerState::ALL
            .into_iter()
            .filter(|s| !s.is_vulnerable())
            .collect();
        assert_eq!(
            safe,
            vec![PlayerState::Fighting, PlayerState::Dashing, PlayerState::Dying]
        );
    }
}
