// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Ikea Koppla devices.

use std::any::Any;

use crate::error::ConstructionError;
use crate::types::Protocol;

use super::{Device, DeviceCommon, DeviceParameters};

const SYSTEM_KEY: &str = "ikea_system";
const UNITS_KEY: &str = "ikea_units";
const FADE_KEY: &str = "ikea_fade";

const MAX_SYSTEM: u8 = 16;
const MAX_UNIT: u8 = 10;

/// Dimming transition used by the receiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Fade {
    /// Jump straight to the new level.
    #[default]
    Instant,
    /// Fade smoothly to the new level.
    Smooth,
}

impl Fade {
    /// Interprets a stored fade flag. Anything other than a truthy value
    /// (`true`, `1`, `yes`, `smooth`, any case) selects [`Fade::Instant`].
    #[must_use]
    pub fn from_flag(value: &str) -> Self {
        let truthy = ["true", "1", "yes", "smooth"]
            .iter()
            .any(|flag| flag.eq_ignore_ascii_case(value.trim()));
        if truthy { Self::Smooth } else { Self::Instant }
    }
}

/// An Ikea Koppla device: a system code plus one or more units on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ikea {
    common: DeviceCommon,
    system: u8,
    units: Vec<u8>,
    fade: Fade,
}

impl Ikea {
    /// Parameters read from settings for this variant.
    pub const PARAMETERS: &'static [&'static str] = &[SYSTEM_KEY, UNITS_KEY, FADE_KEY];

    /// Builds an Ikea device from stored parameters.
    ///
    /// `ikea_units` is a comma-separated list; duplicates are collapsed and
    /// the list is kept sorted. `ikea_fade` is optional.
    ///
    /// # Errors
    ///
    /// Returns a [`ConstructionError`] if the system code is missing or not in
    /// `1..=16`, or if the unit list is empty or contains a value outside
    /// `1..=10`.
    pub fn from_parameters(
        model: i32,
        params: &DeviceParameters,
    ) -> Result<Self, ConstructionError> {
        let raw_system = params.require(SYSTEM_KEY)?;
        let system = match raw_system.parse::<u8>() {
            Ok(system) if (1..=MAX_SYSTEM).contains(&system) => system,
            _ => {
                return Err(ConstructionError::invalid(
                    SYSTEM_KEY,
                    raw_system,
                    format!("system must be in 1..={MAX_SYSTEM}"),
                ));
            }
        };

        let raw_units = params.require(UNITS_KEY)?;
        let mut units = raw_units
            .split(',')
            .map(str::trim)
            .filter(|unit| !unit.is_empty())
            .map(|unit| match unit.parse::<u8>() {
                Ok(n) if (1..=MAX_UNIT).contains(&n) => Ok(n),
                _ => Err(ConstructionError::invalid(
                    UNITS_KEY,
                    raw_units,
                    format!("unit {unit:?} must be in 1..={MAX_UNIT}"),
                )),
            })
            .collect::<Result<Vec<_>, _>>()?;
        units.sort_unstable();
        units.dedup();
        if units.is_empty() {
            return Err(ConstructionError::MissingParameter(UNITS_KEY));
        }

        let fade = params.optional(FADE_KEY).map(Fade::from_flag).unwrap_or_default();

        Ok(Self {
            common: DeviceCommon::new(model),
            system,
            units,
            fade,
        })
    }

    /// The system code (1-16).
    #[must_use]
    pub fn system(&self) -> u8 {
        self.system
    }

    /// Addressed units, sorted and unique.
    #[must_use]
    pub fn units(&self) -> &[u8] {
        &self.units
    }

    /// The dimming transition.
    #[must_use]
    pub fn fade(&self) -> Fade {
        self.fade
    }
}

impl Device for Ikea {
    fn protocol(&self) -> Protocol {
        Protocol::Ikea
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

#[cfg(test)]
mod tests {
    use super::*;

    fn params(system: &str, units: &str) -> DeviceParameters {
        DeviceParameters::new()
            .with(SYSTEM_KEY, system)
            .with(UNITS_KEY, units)
    }

    #[test]
    fn builds_with_default_fade() {
        let ikea = Ikea::from_parameters(3, &params("2", "1")).unwrap();
        assert_eq!(ikea.system(), 2);
        assert_eq!(ikea.units(), &[1]);
        assert_eq!(ikea.fade(), Fade::Instant);
        assert_eq!(ikea.model(), 3);
    }

    #[test]
    fn units_are_sorted_and_deduplicated() {
        let ikea = Ikea::from_parameters(0, &params("1", "10, 3,3 ,1")).unwrap();
        assert_eq!(ikea.units(), &[1, 3, 10]);
    }

    #[test]
    fn smooth_fade_flag() {
        let params = params("1", "1").with(FADE_KEY, "TRUE");
        let ikea = Ikea::from_parameters(0, &params).unwrap();
        assert_eq!(ikea.fade(), Fade::Smooth);
    }

    #[test]
    fn fade_flag_parsing() {
        assert_eq!(Fade::from_flag("1"), Fade::Smooth);
        assert_eq!(Fade::from_flag("Smooth"), Fade::Smooth);
        assert_eq!(Fade::from_flag("false"), Fade::Instant);
        assert_eq!(Fade::from_flag("whatever"), Fade::Instant);
    }

    #[test]
    fn rejects_system_out_of_range() {
        assert!(Ikea::from_parameters(0, &params("0", "1")).is_err());
        assert!(Ikea::from_parameters(0, &params("17", "1")).is_err());
    }

    #[test]
    fn rejects_bad_unit() {
        let err = Ikea::from_parameters(0, &params("1", "1,11")).unwrap_err();
        assert!(matches!(
            err,
            ConstructionError::InvalidParameter { key: UNITS_KEY, .. }
        ));
    }

    #[test]
    fn rejects_empty_unit_list() {
        assert_eq!(
            Ikea::from_parameters(0, &params("1", " , ")),
            Err(ConstructionError::MissingParameter(UNITS_KEY))
        );
    }
}
