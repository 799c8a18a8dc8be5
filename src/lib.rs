pub mod combat;
pub mod compute;
pub mod config;
pub mod dive;
pub mod entities;
pub mod formation;
pub mod player;
pub mod pool;
pub mod services;
pub mod wave;
