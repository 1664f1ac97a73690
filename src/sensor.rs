use egui::Pos2;
use serde::{Deserialize, Serialize};

/// When a press on a drag handle turns into a drag.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActivationConstraint {
    /// Start dragging on the first frame after the press.
    Immediate,
    /// Start once the pointer has moved `distance` points away from the press.
    Distance { distance: f32 },
    /// Start after holding for `delay_ms`. Moving more than `tolerance` points before that aborts.
    Delay { delay_ms: u32, tolerance: f32 },
}

impl Default for ActivationConstraint {
    fn default() -> Self {
        Self::Immediate
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Mouse,
    Touch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    Pending,
    Activate,
    Abort,
}

pub trait Sensor {
    fn enabled(&self) -> bool;
    fn constraint(&self) -> ActivationConstraint;
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MouseSensor {
    pub enabled: bool,
    pub activation: ActivationConstraint,
}

impl Default for MouseSensor {
    fn default() -> Self {
        Self {
            enabled: true,
            activation: ActivationConstraint::default(),
        }
    }
}

impl Sensor for MouseSensor {
    fn enabled(&self) -> bool {
        self.enabled
    }

    fn constraint(&self) -> ActivationConstraint {
        self.activation
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TouchSensor {
    pub enabled: bool,
    pub activation: ActivationConstraint,
}

impl Default for TouchSensor {
    fn default() -> Self {
        Self {
            enabled: true,
            activation: ActivationConstraint::default(),
        }
    }
}

impl Sensor for TouchSensor {
    fn enabled(&self) -> bool {
        self.enabled
    }

    fn constraint(&self) -> ActivationConstraint {
        self.activation
    }
}

/// The sensors a grid listens to. A disabled sensor ignores presses of its pointer kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Sensors {
    pub mouse: MouseSensor,
    pub touch: TouchSensor,
}

impl Sensors {
    /// The sensor handling presses of `kind`, `None` when it is disabled.
    pub fn for_kind(&self, kind: PointerKind) -> Option<&dyn Sensor> {
        let sensor: &dyn Sensor = match kind {
            PointerKind::Mouse => &self.mouse,
            PointerKind::Touch => &self.touch,
        };
        sensor.enabled().then_some(sensor)
    }
}

/// A press on a drag handle that has not become a drag yet.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingActivation<T> {
    pub id: T,
    pub kind: PointerKind,
    pub origin: Pos2,
    pub pressed_at: f64,
}

impl<T> PendingActivation<T> {
    pub fn new(id: T, kind: PointerKind, origin: Pos2, pressed_at: f64) -> Self {
        Self {
            id,
            kind,
            origin,
            pressed_at,
        }
    }

    pub fn evaluate(&self, constraint: ActivationConstraint, pointer: Pos2, now: f64) -> Activation {
        let moved = self.origin.distance(pointer);
        match constraint {
            ActivationConstraint::Immediate => Activation::Activate,
            ActivationConstraint::Distance { distance } => {
                if moved >= distance {
                    Activation::Activate
                } else {
                    Activation::Pending
                }
            }
            ActivationConstraint::Delay {
                delay_ms,
                tolerance,
            } => {
                if moved > tolerance {
                    Activation::Abort
                } else if now - self.pressed_at >= f64::from(delay_ms) / 1000.0 {
                    Activation::Activate
                } else {
                    Activation::Pending
                }
            }
        }
    }
}

/// What the grid knows about the current press on a drag handle.
#[derive(Debug, Clone, PartialEq)]
pub enum Press<T> {
    Idle,
    Pending(PendingActivation<T>),
    /// The press already started a drag or was aborted. Ignored until the pointer is released.
    Consumed,
}

impl<T> Default for Press<T> {
    fn default() -> Self {
        Self::Idle
    }
}

impl<T> Press<T> {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}
