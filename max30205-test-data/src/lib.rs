// SPDX-License-Identifier: Apache-2.0
// Copyright © 2021 Will Ross
mod i2c_mock;

pub use i2c_mock::{
    mock_max30205_at_address, MockDelay, MockError, MockSensorBus, Operation, POWER_ON_T_HYST,
    POWER_ON_T_OS,
};
