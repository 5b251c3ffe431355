//! Multi-modal freight route server.
//!
//! Loads a transport graph of locations and land, sea and air legs, and
//! answers: "what are the best few ways to ship from here to there, given
//! the countries I want to avoid and what I am carrying?"

pub mod cache;
pub mod config;
pub mod domain;
pub mod graph;
pub mod planner;
pub mod regulations;
pub mod web;
