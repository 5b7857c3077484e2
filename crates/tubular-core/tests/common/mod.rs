#![allow(dead_code)]

pub mod recording_sleeper;
pub mod scripted_server;
