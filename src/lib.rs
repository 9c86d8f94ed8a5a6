//! Interactive terminal wizard that turns a folder of timestamped camera
//! images into a timelapse video rendered by ffmpeg.

pub mod app;
pub mod config;
pub mod encoder;
pub mod error;
pub mod fs_access;
pub mod messaging;
pub mod ordering;
pub mod render;
pub mod state;
pub mod time_window;
pub mod tui;
pub mod wizard;
