pub mod canvas;
pub mod export;
pub mod gui;
pub mod import;
pub mod logging;
pub mod settings;
