// User interface components
pub mod app;
pub mod config;
pub mod plot_layers;
pub mod styles;
pub mod ui_plot_view;
pub mod ui_render;
pub mod utils;

// Re-export main app
pub use app::EventWindowApp;
pub use config::UI_CONFIG;
