pub mod bot;
pub mod services;
