//! Test Module
//!
//! Cross-module test suites for the Whiteboard Tutor backend.
//!
//! ## Test Categories
//! - `brain_tests`: board/diagram classification, prompt hardening, augmentation
//! - `actor_tests`: model service lifecycle against a mocked llama.cpp server
//! - `integration_tests`: HTTP endpoints end to end with mocked collaborators

pub mod brain_tests;
