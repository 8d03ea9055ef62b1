//! Test doubles for hardware devices.
