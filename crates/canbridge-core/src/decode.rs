//! Frame decoding: raw CAN bytes to a semantic signal.

use serde::Serialize;

use crate::frame::CanFrame;
use crate::BLIND_SPOT_ALGORITHM;

/// Which side of the vehicle a blind-spot detection refers to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum Side {
    /// Left side (the default when byte 3 is absent or not 1).
    #[default]
    Left,
    /// Right side.
    Right,
}

/// Signal decoded from one CAN frame.
///
/// Derived per message, never persisted. `side` is populated only for
/// the blind-spot algorithm; every other algorithm leaves it `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedSignal {
    /// Detection active flag (byte 0 == 1).
    pub status: bool,
    /// Distance to the detected object in meters.
    pub distance_m: f64,
    /// Side classification, blind-spot only.
    pub side: Option<Side>,
}

/// Decode a CAN frame into a [`DecodedSignal`].
///
/// Total over all frames, including empty ones: every indexed access is
/// bounds-checked and a short frame degrades to default field values.
///
/// - `status` is true iff byte 0 equals 1.
/// - Distance is the little-endian u16 at bytes 1..=2, in centimeters;
///   frames shorter than 3 bytes read as 0.
/// - For `BlindSpotDetection` only, byte 3 == 1 selects [`Side::Right`],
///   anything else (including absence) selects [`Side::Left`].
pub fn decode(algorithm_id: &str, frame: &CanFrame) -> DecodedSignal {
    let data = &frame.data;

    let status = data.first().is_some_and(|b| *b == 1);

    let raw = if data.len() > 2 {
        u16::from(data[1]) | (u16::from(data[2]) << 8)
    } else {
        0
    };
    let distance_m = f64::from(raw) / 100.0;

    let side = if algorithm_id == BLIND_SPOT_ALGORITHM {
        if data.len() > 3 && data[3] == 1 {
            Some(Side::Right)
        } else {
            Some(Side::Left)
        }
    } else {
        None
    };

    DecodedSignal {
        status,
        distance_m,
        side,
    }
}
