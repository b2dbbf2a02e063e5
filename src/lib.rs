// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

//! # AMQP
//!
//! A configuration and lifecycle facade over an AMQP 0-9-1 client. Entities
//! (`Exchange`, `Queue`, `Qos`, `Consumer`) are built from partial option
//! structs and reconfigured field by field; the `Connection` orchestrator
//! memoizes a lazily opened channel and drives topology declaration, and the
//! `Producer`/`Consumer` pair publishes and dispatches messages through it.
//! The lapin binding in [`channel`] implements the transport seam defined in
//! [`transport`].

pub mod channel;
pub mod connection;
pub mod consumer;
pub mod errors;
pub mod exchange;
pub mod message;
pub mod options;
pub mod producer;
pub mod qos;
pub mod queue;
pub mod transport;
