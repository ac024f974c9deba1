//! Animation clips and their keyframed channels.
//!
//! A channel animates exactly one property, chosen by [`AnimationTarget`].
//! Every value and tangent stored in the channel must be the
//! [`ChannelValue`] variant that target expects.

use glam::{Quat, Vec3};

use super::NO_ID;
use crate::BinString;
use crate::error::FormatError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum AnimationTarget {
    #[default]
    Unknown = 0,
    Weights = 1,
    Translation = 2,
    Rotation = 3,
    Scale = 4,
}

impl AnimationTarget {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Unknown),
            1 => Some(Self::Weights),
            2 => Some(Self::Translation),
            3 => Some(Self::Rotation),
            4 => Some(Self::Scale),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum InterpolationType {
    #[default]
    Unknown = 0,
    Linear = 1,
    Step = 2,
    CubicSpline = 3,
}

impl InterpolationType {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Unknown),
            1 => Some(Self::Linear),
            2 => Some(Self::Step),
            3 => Some(Self::CubicSpline),
            _ => None,
        }
    }
}

/// Keyframe value of an animation channel.
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelValue {
    /// Morph target weights
    Weights(Vec<f32>),
    Translation(Vec3),
    Rotation(Quat),
    /// Uniform scale
    Scale(f32),
}

impl ChannelValue {
    /// Target this value animates
    pub fn target(&self) -> AnimationTarget {
        match self {
            ChannelValue::Weights(_) => AnimationTarget::Weights,
            ChannelValue::Translation(_) => AnimationTarget::Translation,
            ChannelValue::Rotation(_) => AnimationTarget::Rotation,
            ChannelValue::Scale(_) => AnimationTarget::Scale,
        }
    }
}

/// Named collection of channel ids.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Animation {
    pub name: BinString,
    pub channels: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnimationChannel {
    pub node_id: u32,
    pub joint_id: u32,
    target: AnimationTarget,
    pub interpolation: InterpolationType,
    /// Morph weights per value; fixed at construction
    weight_count: u32,
    keyframes: Vec<f32>,
    tangents: Vec<[ChannelValue; 3]>,
    values: Vec<ChannelValue>,
}

impl AnimationChannel {
    pub fn new(target: AnimationTarget, interpolation: InterpolationType) -> Self {
        Self {
            node_id: NO_ID,
            joint_id: NO_ID,
            target,
            interpolation,
            weight_count: 0,
            keyframes: Vec::new(),
            tangents: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Morph weights channel carrying `weight_count` weights per value.
    pub fn with_weights(weight_count: u32, interpolation: InterpolationType) -> Self {
        Self {
            weight_count,
            ..Self::new(AnimationTarget::Weights, interpolation)
        }
    }

    pub fn target(&self) -> AnimationTarget {
        self.target
    }

    pub fn weight_count(&self) -> u32 {
        self.weight_count
    }

    /// True once a keyframe carries tangents. All keyframes of a channel are
    /// either plain or spline.
    pub fn is_spline(&self) -> bool {
        !self.tangents.is_empty()
    }

    pub fn keyframes(&self) -> &[f32] {
        &self.keyframes
    }

    pub fn values(&self) -> &[ChannelValue] {
        &self.values
    }

    pub fn tangents(&self) -> &[[ChannelValue; 3]] {
        &self.tangents
    }

    pub fn keyframe_count(&self) -> u32 {
        self.keyframes.len() as u32
    }

    fn check(&self, value: &ChannelValue) -> Result<(), FormatError> {
        if value.target() != self.target {
            return Err(FormatError::ChannelMismatch(self.target));
        }
        if let ChannelValue::Weights(w) = value {
            if w.len() != self.weight_count as usize {
                return Err(FormatError::ChannelMismatch(self.target));
            }
        }
        Ok(())
    }

    /// Append a keyframe at `time`.
    pub fn push_keyframe(&mut self, time: f32, value: ChannelValue) -> Result<(), FormatError> {
        if self.is_spline() {
            return Err(FormatError::MixedKeyframes);
        }
        self.check(&value)?;
        self.keyframes.push(time);
        self.values.push(value);
        Ok(())
    }

    /// Append a cubic-spline keyframe with its (in-tangent, value, out-tangent) triple.
    pub fn push_spline_keyframe(
        &mut self,
        time: f32,
        value: ChannelValue,
        tangents: [ChannelValue; 3],
    ) -> Result<(), FormatError> {
        if self.keyframes.len() != self.tangents.len() {
            return Err(FormatError::MixedKeyframes);
        }
        self.check(&value)?;
        for tangent in &tangents {
            self.check(tangent)?;
        }
        self.keyframes.push(time);
        self.values.push(value);
        self.tangents.push(tangents);
        Ok(())
    }
}
