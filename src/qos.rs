// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

//! # Qos Policy
//!
//! Prefetch configuration applied to a channel before consuming. The values
//! are forwarded to the transport untouched; this layer does not second-guess
//! what the broker considers legal.

use crate::options::QosOptions;

/// Prefetch flow-control settings for a channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Qos {
    prefetch_size: u32,
    prefetch_count: u16,
    global: bool,
}

impl Qos {
    pub fn new(prefetch_size: u32, prefetch_count: u16, global: bool) -> Qos {
        Qos {
            prefetch_size,
            prefetch_count,
            global,
        }
    }

    /// Builds a Qos policy from options. There are no required fields.
    pub fn make(options: &QosOptions) -> Qos {
        let mut qos = Qos::default();
        qos.reconfigure(options);
        qos
    }

    /// Applies every option that is present, leaving absent fields unchanged.
    pub fn reconfigure(&mut self, options: &QosOptions) -> &mut Self {
        if let Some(prefetch_size) = options.prefetch_size {
            self.prefetch_size = prefetch_size;
        }

        if let Some(prefetch_count) = options.prefetch_count {
            self.prefetch_count = prefetch_count;
        }

        if let Some(global) = options.global {
            self.global = global;
        }

        self
    }

    pub fn prefetch_size(&self) -> u32 {
        self.prefetch_size
    }

    pub fn prefetch_count(&self) -> u16 {
        self.prefetch_count
    }

    pub fn is_global(&self) -> bool {
        self.global
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn make_without_options_yields_the_defaults() {
        let qos = Qos::make(&QosOptions::default());

        assert_eq!(qos.prefetch_size(), 0);
        assert_eq!(qos.prefetch_count(), 0);
        assert!(!qos.is_global());
    }

    #[test]
    fn reconfigure_leaves_absent_fields_unchanged() {
        let mut qos = Qos::new(1024, 50, true);
        qos.reconfigure(&QosOptions::default().prefetch_count(10));

        assert_eq!(qos.prefetch_size(), 1024);
        assert_eq!(qos.prefetch_count(), 10);
        assert!(qos.is_global());
    }

    #[test]
    fn reconfigure_is_idempotent() {
        let options = QosOptions::default().prefetch_size(2048).global(true);

        let mut once = Qos::default();
        once.reconfigure(&options);

        let mut twice = Qos::default();
        twice.reconfigure(&options);
        twice.reconfigure(&options);

        assert_eq!(once, twice);
    }
}
