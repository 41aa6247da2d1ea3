// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Sartano devices.

use std::any::Any;

use crate::error::ConstructionError;
use crate::types::Protocol;

use super::{Device, DeviceCommon, DeviceParameters};

const CODE_KEY: &str = "sartano_code";

/// Number of DIP switches on a Sartano receiver.
const CODE_LENGTH: usize = 10;

/// A Sartano device, addressed by a ten-position DIP switch code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sartano {
    common: DeviceCommon,
    switches: [bool; CODE_LENGTH],
}

impl Sartano {
    /// Parameters read from settings for this variant.
    pub const PARAMETERS: &'static [&'static str] = &[CODE_KEY];

    /// Builds a Sartano device from stored parameters.
    ///
    /// The code is a string of exactly ten `0`/`1` characters, switch 1 first.
    ///
    /// # Errors
    ///
    /// Returns a [`ConstructionError`] if `sartano_code` is missing or is not
    /// a ten-character binary string.
    pub fn from_parameters(
        model: i32,
        params: &DeviceParameters,
    ) -> Result<Self, ConstructionError> {
        let code = params.require(CODE_KEY)?;
        if code.len() != CODE_LENGTH {
            return Err(ConstructionError::invalid(
                CODE_KEY,
                code,
                format!("code must have {CODE_LENGTH} positions"),
            ));
        }

        let mut switches = [false; CODE_LENGTH];
        for (switch, c) in switches.iter_mut().zip(code.chars()) {
            *switch = match c {
                '1' => true,
                '0' => false,
                _ => {
                    return Err(ConstructionError::invalid(
                        CODE_KEY,
                        code,
                        "code may only contain 0 and 1",
                    ));
                }
            };
        }

        Ok(Self {
            common: DeviceCommon::new(model),
            switches,
        })
    }

    /// Switch positions, switch 1 first.
    #[must_use]
    pub fn switches(&self) -> &[bool; CODE_LENGTH] {
        &self.switches
    }

    /// The code in its stored `0`/`1` form.
    #[must_use]
    pub fn code(&self) -> String {
        self.switches
            .iter()
            .map(|&on| if on { '1' } else { '0' })
            .collect()
    }
}

impl Device for Sartano {
    fn protocol(&self) -> Protocol {
        Protocol::Sartano
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

    fn build(code: &str) -> Result<Sartano, ConstructionError> {
        Sartano::from_parameters(0, &DeviceParameters::new().with(CODE_KEY, code))
    }

    #[test]
    fn parses_binary_code() {
        let sartano = build("1010000001").unwrap();
        assert_eq!(sartano.code(), "1010000001");
        assert!(sartano.switches()[0]);
        assert!(!sartano.switches()[1]);
    }

    #[test]
    fn rejects_wrong_length() {
        assert!(build("101").is_err());
        assert!(build("10100000011").is_err());
    }

    #[test]
    fn rejects_non_binary() {
        assert!(build("10100000x1").is_err());
    }

    #[test]
    fn missing_code() {
        assert_eq!(
            Sartano::from_parameters(0, &DeviceParameters::new()),
            Err(ConstructionError::MissingParameter(CODE_KEY))
        );
    }
}
