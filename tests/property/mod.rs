// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests

mod message_framing;
