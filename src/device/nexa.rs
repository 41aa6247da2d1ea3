// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Nexa (ArcTech) devices.

use std::any::Any;
use std::fmt;

use crate::error::ConstructionError;
use crate::types::Protocol;

use super::{Device, DeviceCommon, DeviceParameters};

pub(crate) const HOUSE_KEY: &str = "nexa_house";
pub(crate) const UNIT_KEY: &str = "nexa_unit";

/// Largest house code accepted by self-learning receivers (26 bits).
const MAX_LEARNING_HOUSE: u32 = (1 << 26) - 1;

/// Highest unit number on a house code.
const MAX_UNIT: u8 = 16;

/// House code of an ArcTech-addressed device.
///
/// Code-switch receivers use a rotary letter `A`–`P`; self-learning receivers
/// use a 26-bit number chosen by the transmitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HouseCode {
    /// Code-switch house letter, always uppercase.
    Letter(char),
    /// Self-learning house number.
    Learning(u32),
}

impl HouseCode {
    /// Parses a stored house code.
    ///
    /// # Errors
    ///
    /// Returns [`ConstructionError::InvalidParameter`] if the value is neither
    /// a letter `A`–`P` nor a number within the self-learning range.
    pub fn parse(value: &str) -> Result<Self, ConstructionError> {
        let mut chars = value.chars();
        if let (Some(c), None) = (chars.next(), chars.next())
            && c.is_ascii_alphabetic()
        {
            let upper = c.to_ascii_uppercase();
            if ('A'..='P').contains(&upper) {
                return Ok(Self::Letter(upper));
            }
            return Err(ConstructionError::invalid(
                HOUSE_KEY,
                value,
                "house letter must be in A..=P",
            ));
        }

        match value.parse::<u32>() {
            Ok(number) if number <= MAX_LEARNING_HOUSE => Ok(Self::Learning(number)),
            Ok(_) => Err(ConstructionError::invalid(
                HOUSE_KEY,
                value,
                format!("house number must be at most {MAX_LEARNING_HOUSE}"),
            )),
            Err(_) => Err(ConstructionError::invalid(
                HOUSE_KEY,
                value,
                "expected a house letter or number",
            )),
        }
    }
}

impl fmt::Display for HouseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Letter(c) => write!(f, "{c}"),
            Self::Learning(n) => write!(f, "{n}"),
        }
    }
}

/// Parses a unit number in `1..=16`.
pub(crate) fn parse_unit(value: &str) -> Result<u8, ConstructionError> {
    match value.parse::<u8>() {
        Ok(unit) if (1..=MAX_UNIT).contains(&unit) => Ok(unit),
        _ => Err(ConstructionError::invalid(
            UNIT_KEY,
            value,
            format!("unit must be in 1..={MAX_UNIT}"),
        )),
    }
}

/// A Nexa device, addressed by house code and unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Nexa {
    common: DeviceCommon,
    house: HouseCode,
    unit: u8,
}

impl Nexa {
    /// Parameters read from settings for this variant.
    pub const PARAMETERS: &'static [&'static str] = &[HOUSE_KEY, UNIT_KEY];

    /// Creates a Nexa device from already validated parts.
    #[must_use]
    pub fn new(model: i32, house: HouseCode, unit: u8) -> Self {
        Self {
            common: DeviceCommon::new(model),
            house,
            unit,
        }
    }

    /// Builds a Nexa device from stored parameters.
    ///
    /// # Errors
    ///
    /// Returns a [`ConstructionError`] if `nexa_house` or `nexa_unit` is
    /// missing or malformed.
    pub fn from_parameters(
        model: i32,
        params: &DeviceParameters,
    ) -> Result<Self, ConstructionError> {
        let house = HouseCode::parse(params.require(HOUSE_KEY)?)?;
        let unit = parse_unit(params.require(UNIT_KEY)?)?;
        Ok(Self::new(model, house, unit))
    }

    /// The house code.
    #[must_use]
    pub fn house(&self) -> HouseCode {
        self.house
    }

    /// The unit number (1-16).
    #[must_use]
    pub fn unit(&self) -> u8 {
        self.unit
    }
}

impl Device for Nexa {
    fn protocol(&self) -> Protocol {
        Protocol::ArcTech
    }

    fn common(&self) -> &DeviceCommon {
        &self.common
    }

    fn common_mut(&mut self) -> &mut DeviceCommon {
        &mut self.common
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
