//! Unit tests for the task-source integration module.
