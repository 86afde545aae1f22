#![allow(dead_code)]

use testbench::config::{ReadinessMode, TestbenchConfig};

/// Builder for `TestbenchConfig` to simplify test setup.
pub struct ConfigBuilder {
    config: TestbenchConfig,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: TestbenchConfig::default(),
        }
    }

    pub fn with_serial_program(mut self, program: &str) -> Self {
        self.config.serial.program = program.to_string();
        self
    }

    pub fn with_baud(mut self, baud: u32) -> Self {
        self.config.serial.baud = baud;
        self
    }

    pub fn unhosted_serial(mut self) -> Self {
        self.config.serial.hosted = false;
        self
    }

    pub fn without_elevation(mut self) -> Self {
        self.config.serial.elevate = false;
        self.config.bridge.elevate = false;
        self
    }

    pub fn with_make(mut self, make: &str) -> Self {
        self.config.launch.make = make.to_string();
        self
    }

    pub fn with_ready_line(mut self, line: &str) -> Self {
        self.config.bridge.ready_line = line.to_string();
        self.config.bridge.ready_regex = false;
        self
    }

    pub fn with_ready_regex(mut self, pattern: &str) -> Self {
        self.config.bridge.ready_line = pattern.to_string();
        self.config.bridge.ready_regex = true;
        self
    }

    pub fn with_timeout(mut self, timeout: &str) -> Self {
        self.config.bridge.timeout = timeout.to_string();
        self
    }

    pub fn with_delay_readiness(mut self, delay: &str) -> Self {
        self.config.bridge.readiness = ReadinessMode::Delay;
        self.config.bridge.delay = delay.to_string();
        self
    }

    pub fn with_grace_period(mut self, grace: &str) -> Self {
        self.config.launch.grace_period = grace.to_string();
        self
    }

    pub fn build(self) -> TestbenchConfig {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
