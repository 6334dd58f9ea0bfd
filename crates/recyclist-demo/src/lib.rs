#![forbid(unsafe_code)]

//! Recyclist demo: a city list kept in sync with a map extent.

pub mod city;
pub mod cli;
pub mod layer;
pub mod map;
pub mod session;
pub mod surface;
