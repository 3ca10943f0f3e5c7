//! LexScope query form — Dioxus-powered frontend for the insights server.

use dioxus::prelude::*;

mod app;
mod client;

use app::App;

fn main() {
    #[cfg(feature = "desktop")]
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("lexscope_desktop=info".parse().unwrap()),
        )
        .with_target(false)
        .init();

    #[cfg(feature = "desktop")]
    {
        use dioxus::desktop::{Config, LogicalSize, WindowBuilder};

        LaunchBuilder::new()
            .with_cfg(
                Config::default().with_menu(None).with_window(
                    WindowBuilder::new()
                        .with_title("Legal Insights")
                        .with_inner_size(LogicalSize::new(760.0, 560.0))
                        .with_min_inner_size(LogicalSize::new(480.0, 360.0))
                        .with_resizable(true),
                ),
            )
            .launch(App);
    }

    #[cfg(not(feature = "desktop"))]
    {
        dioxus::launch(App);
    }
}
