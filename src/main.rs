use bevy::prelude::*;

mod core;
mod data;
mod interface;
mod item;
mod pressure;
mod tag;
mod upgrades;

use crate::core::{CorePlugin, resources::GameConfig, states};
use interface::debug_cli::DebugCliPlugin;
use upgrades::UpgradesPlugin;

fn main() {
    let config = GameConfig::load();
    let window_visible = config.window_visible;

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                visible: window_visible,
                ..default()
            }), // 默认隐藏窗口，纯 CLI 交互
            ..default()
        }))
        .insert_resource(config)
        .add_plugins(CorePlugin)
        .add_plugins(DebugCliPlugin)
        .add_plugins(data::DataPlugin)
        .add_plugins(UpgradesPlugin)
        .add_systems(Update, forward_log_event) // 简单打印
        .add_systems(Startup, |mut next: ResMut<NextState<states::AppState>>| {
            next.set(states::AppState::Loading);
        })
        .run();
}

fn forward_log_event(mut reader: EventReader<crate::core::events::LogEvent>) {
    for e in reader.read() {
        println!("> {}", e.0);
    }
}
