//! Shared utilities for the Kokuban whiteboard session service.

pub mod logger;
