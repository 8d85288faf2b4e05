mod app;
mod audio;
mod clipboard;
mod config;
mod mpris;
mod player;
mod reel;
mod runtime;
mod share;
mod ui;

fn main() -> anyhow::Result<()> {
    runtime::run()
}
