//! Weiqi: a Go board with a small computer opponent.
//!
//! This crate implements the rules of Go (captures, suicide and simple ko),
//! a game record with undo, area scoring with hand-marked dead stones, and
//! three computer opponents of increasing strength.
//!
//! ## Modules
//!
//! - [`board`] - Board grid, colors and point names
//! - [`group`] - Connected groups and their liberties
//! - [`rules`] - Move legality and captures
//! - [`game`] - Game state and history
//! - [`policy`] - The [`policy::Strategy`] trait, random and heuristic play
//! - [`heuristic`] - One-ply move scoring
//! - [`montecarlo`] - Flat Monte Carlo over heuristic candidates
//! - [`playout`] - Random game simulation for candidate evaluation
//! - [`scoring`] - Area scoring and dead-stone marking
//! - [`session`] - Game session with a background engine
//! - [`config`] / [`constants`] - Engine configuration and defaults
//! - [`console`] - Text console
//!
//! ## Example
//!
//! ```
//! use weiqi::board::{parse_point, Color};
//! use weiqi::config::{AiConfig, Level};
//! use weiqi::game::Game;
//! use weiqi::session::Session;
//!
//! let mut session = Session::new(Game::new(9, Color::Black), 7.5, Some(1));
//! session.attempt_move(parse_point("C3", 9).unwrap()).unwrap();
//!
//! // Let the engine answer for white.
//! session.request_ai_move(&AiConfig::new(Level::Heuristic, 10, 5)).unwrap();
//! let reply = session.wait_ai().unwrap();
//! println!("white plays {}", reply.mv.name(9));
//! ```

pub mod board;
pub mod config;
pub mod console;
pub mod constants;
pub mod game;
pub mod group;
pub mod heuristic;
pub mod montecarlo;
pub mod playout;
pub mod policy;
pub mod rules;
pub mod scoring;
pub mod session;
