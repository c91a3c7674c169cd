//! Tests for the parameter file model

mod params_tests;
