//! Commands from the messaging layer
//!
//! Decoded commands arrive as [`LightCommand`]s. A set command carries a
//! [`UnitPatch`]: every field is optional and absent fields keep the value of
//! the unit being replaced. Decoders fill patches by protocol field name
//! through the [`UNIT_FIELDS`] table.

use crate::color::rgb_from_u32;
use crate::presets::{Flashlight, Preset};
use crate::unit::{LightUnit, LightUnitId};

const OP_NAME_SET: &str = "set";
const OP_NAME_REMOVE: &str = "rm";
const OP_NAME_CLEAR: &str = "clear";
const OP_NAME_FLASHLIGHT: &str = "flashlight";
const OP_NAME_FLASHLIGHT_1: &str = "flashlight1";
const OP_NAME_FLASHLIGHT_2: &str = "flashlight2";
const OP_NAME_FLASHLIGHT_3: &str = "flashlight3";
const OP_NAME_FLASHLIGHT_4: &str = "flashlight4";
const OP_NAME_FLASH: &str = "flash";
const OP_NAME_STOP_FLASHLIGHT: &str = "!flashlight";
const OP_NAME_STOP_FLASH: &str = "!flash";

/// Known command operations
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Op {
    Set,
    Remove,
    Clear,
    /// Start flashlight variant 1-4
    Flashlight(u8),
    StopFlashlight,
}

impl Op {
    pub fn parse_from_str(s: &str) -> Option<Self> {
        match s {
            OP_NAME_SET => Some(Self::Set),
            OP_NAME_REMOVE => Some(Self::Remove),
            OP_NAME_CLEAR => Some(Self::Clear),
            OP_NAME_FLASHLIGHT | OP_NAME_FLASHLIGHT_1 => Some(Self::Flashlight(1)),
            OP_NAME_FLASHLIGHT_2 => Some(Self::Flashlight(2)),
            OP_NAME_FLASHLIGHT_3 => Some(Self::Flashlight(3)),
            OP_NAME_FLASHLIGHT_4 | OP_NAME_FLASH => Some(Self::Flashlight(4)),
            OP_NAME_STOP_FLASHLIGHT | OP_NAME_STOP_FLASH => Some(Self::StopFlashlight),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Set => OP_NAME_SET,
            Self::Remove => OP_NAME_REMOVE,
            Self::Clear => OP_NAME_CLEAR,
            Self::Flashlight(2) => OP_NAME_FLASHLIGHT_2,
            Self::Flashlight(3) => OP_NAME_FLASHLIGHT_3,
            Self::Flashlight(4) => OP_NAME_FLASHLIGHT_4,
            Self::Flashlight(_) => OP_NAME_FLASHLIGHT_1,
            Self::StopFlashlight => OP_NAME_STOP_FLASHLIGHT,
        }
    }

    /// Built-in animation started or stopped by this op
    pub fn preset(self) -> Option<Preset> {
        match self {
            Self::Flashlight(number) => Flashlight::variant(number).map(Preset::Flashlight),
            Self::StopFlashlight => Some(Preset::StopFlashlight),
            Self::Set | Self::Remove | Self::Clear => None,
        }
    }
}

/// A decoded command
#[derive(Debug, Clone)]
pub enum LightCommand {
    /// Create or update a unit
    Set(SetCommand),
    /// Remove a unit (`0` removes all)
    Remove(LightUnitId),
    /// Remove all units
    Clear,
    /// Start or stop a built-in animation
    Preset(Preset),
}

/// Create or update a unit
#[derive(Debug, Clone, Default)]
pub struct SetCommand {
    /// Target id, `0` stores the unit under an anonymous id
    pub id: LightUnitId,
    pub patch: UnitPatch,
    /// Remove the current unit (and its dependents) before storing
    pub rm_before_add: bool,
}

/// Partial light unit definition
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UnitPatch {
    pub pixel_mask: Option<u64>,
    pub color: Option<u32>,
    pub brightness: Option<i8>,
    pub pixel_shift_up: Option<u32>,
    pub pixel_shift_down: Option<u32>,
    pub frames: Option<u32>,
    pub step: Option<u32>,
    pub speed: Option<u32>,
    pub expiration: Option<u64>,
    pub depends_on: Option<LightUnitId>,
    pub random_pixels: Option<bool>,
    pub same_random_color: Option<bool>,
    pub random_color: Option<bool>,
    pub rainbow_color: Option<bool>,
    pub keep_pixel_when_done: Option<bool>,
    pub blink: Option<bool>,
    pub pulse: Option<bool>,
}

/// Stores one decoded value into a patch
pub type FieldSetter = fn(&mut UnitPatch, u64);

/// Error returned for field names missing from [`UNIT_FIELDS`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownField;

/// Protocol field name -> patch setter
///
/// Integer fields narrower than 64 bits keep their low bits, booleans are
/// true for any non-zero value.
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
pub const UNIT_FIELDS: [(&str, FieldSetter); 17] = [
    ("pixelMask", |patch: &mut UnitPatch, value: u64| patch.pixel_mask = Some(value)),
    ("color", |patch: &mut UnitPatch, value: u64| patch.color = Some(value as u32)),
    ("brightness", |patch: &mut UnitPatch, value: u64| patch.brightness = Some(value as u8 as i8)),
    ("pixelShiftUp", |patch: &mut UnitPatch, value: u64| patch.pixel_shift_up = Some(value as u32)),
    ("pixelShiftDown", |patch: &mut UnitPatch, value: u64| patch.pixel_shift_down = Some(value as u32)),
    ("frames", |patch: &mut UnitPatch, value: u64| patch.frames = Some(value as u32)),
    ("step", |patch: &mut UnitPatch, value: u64| patch.step = Some(value as u32)),
    ("speed", |patch: &mut UnitPatch, value: u64| patch.speed = Some(value as u32)),
    ("expiration", |patch: &mut UnitPatch, value: u64| patch.expiration = Some(value)),
    ("dependsOn", |patch: &mut UnitPatch, value: u64| patch.depends_on = Some(value as LightUnitId)),
    ("randomPixels", |patch: &mut UnitPatch, value: u64| patch.random_pixels = Some(value != 0)),
    ("sameRandomColor", |patch: &mut UnitPatch, value: u64| patch.same_random_color = Some(value != 0)),
    ("randomColor", |patch: &mut UnitPatch, value: u64| patch.random_color = Some(value != 0)),
    ("rainbowColor", |patch: &mut UnitPatch, value: u64| patch.rainbow_color = Some(value != 0)),
    ("keepPixelWhenDone", |patch: &mut UnitPatch, value: u64| patch.keep_pixel_when_done = Some(value != 0)),
    ("blink", |patch: &mut UnitPatch, value: u64| patch.blink = Some(value != 0)),
    ("pulse", |patch: &mut UnitPatch, value: u64| patch.pulse = Some(value != 0)),
];

impl UnitPatch {
    /// Set a field by its protocol name
    pub fn set_field(&mut self, name: &str, value: u64) -> Result<(), UnknownField> {
        let (_, setter) = UNIT_FIELDS
            .iter()
            .find(|(field, _)| *field == name)
            .ok_or(UnknownField)?;
        setter(self, value);
        Ok(())
    }

    /// Overwrite the fields present in the patch
    ///
    /// Pixel shifts apply to the resulting mask, up before down. Shifts of
    /// 64 or more clear the mask.
    pub fn apply_to(&self, unit: &mut LightUnit) {
        if let Some(pixel_mask) = self.pixel_mask {
            unit.pixel_mask = pixel_mask;
        }
        if let Some(color) = self.color {
            unit.color = rgb_from_u32(color);
        }
        if let Some(brightness) = self.brightness {
            unit.brightness = brightness;
        }
        if let Some(shift) = self.pixel_shift_up {
            unit.pixel_mask = unit.pixel_mask.checked_shl(shift).unwrap_or(0);
        }
        if let Some(shift) = self.pixel_shift_down {
            unit.pixel_mask = unit.pixel_mask.checked_shr(shift).unwrap_or(0);
        }

        let animation = &mut unit.animation;
        apply_field(&mut animation.frames, self.frames);
        apply_field(&mut animation.step, self.step);
        apply_field(&mut animation.speed, self.speed);
        apply_field(&mut animation.expiration, self.expiration);
        apply_field(&mut animation.depends_on, self.depends_on);
        apply_field(&mut animation.random_pixels, self.random_pixels);
        apply_field(&mut animation.same_random_color, self.same_random_color);
        apply_field(&mut animation.random_color, self.random_color);
        apply_field(&mut animation.rainbow_color, self.rainbow_color);
        apply_field(&mut animation.keep_pixel_when_done, self.keep_pixel_when_done);
        apply_field(&mut animation.blink, self.blink);
        apply_field(&mut animation.pulse, self.pulse);
    }
}

#[inline]
fn apply_field<T: Copy>(target: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *target = value;
    }
}
