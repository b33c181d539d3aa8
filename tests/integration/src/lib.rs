//! End-to-end test package; the tests live under `tests/`.
